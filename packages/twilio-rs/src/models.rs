use serde::Deserialize;

/// Response from `POST /v2/Services/{sid}/Verifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct OTPResponse {
    /// Verification SID (`VE...`), used as the challenge handle for the check.
    pub sid: String,
    pub to: String,
    pub channel: String,
    pub status: String,
    #[serde(default)]
    pub valid: bool,
}

/// Response from `POST /v2/Services/{sid}/VerificationCheck`.
#[derive(Debug, Clone, Deserialize)]
pub struct OTPVerifyResponse {
    pub sid: String,
    pub status: String,
    #[serde(default)]
    pub valid: bool,
}

impl OTPVerifyResponse {
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }
}

/// Error body Twilio returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorBody {
    pub code: Option<u32>,
    pub message: Option<String>,
    pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_response() {
        let body = r#"{
            "sid": "VE0123456789abcdef0123456789abcdef",
            "service_sid": "VA0123456789abcdef0123456789abcdef",
            "to": "+380991234567",
            "channel": "sms",
            "status": "pending",
            "valid": false
        }"#;

        let parsed: OTPResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.sid, "VE0123456789abcdef0123456789abcdef");
        assert_eq!(parsed.status, "pending");
        assert!(!parsed.valid);
    }

    #[test]
    fn test_check_response_approval() {
        let approved: OTPVerifyResponse =
            serde_json::from_str(r#"{"sid": "VE1", "status": "approved", "valid": true}"#).unwrap();
        let pending: OTPVerifyResponse =
            serde_json::from_str(r#"{"sid": "VE1", "status": "pending"}"#).unwrap();

        assert!(approved.is_approved());
        assert!(!pending.is_approved());
        assert!(!pending.valid);
    }
}
