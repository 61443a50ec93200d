// Twilio Verify client: sends SMS one-time codes and checks them by verification SID.

pub mod models;

use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{OTPResponse, OTPVerifyResponse, TwilioErrorBody};

const DEFAULT_VERIFY_BASE_URL: &str = "https://verify.twilio.com";

/// Twilio error code for "Max check attempts reached" on a verification.
const MAX_CHECK_ATTEMPTS_CODE: u32 = 60202;

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub service_id: String,
    /// Override for the Verify API host (tests, proxies). Defaults to Twilio's.
    pub base_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// Too many wrong codes; this verification can no longer be approved.
    #[error("maximum check attempts reached for this verification")]
    MaxAttemptsReached,

    /// The verification does not exist anymore (expired, approved, or superseded).
    #[error("verification not found")]
    VerificationNotFound,

    /// The check went through but the code was not approved.
    #[error("verification not approved (status: {status})")]
    NotApproved { status: String },
}

impl TwilioError {
    /// Whether the error means the code/challenge was rejected, as opposed to
    /// Twilio being unreachable or misconfigured.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TwilioError::VerificationNotFound
                | TwilioError::NotApproved { .. }
                | TwilioError::MaxAttemptsReached
        )
    }
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn service_url(&self, resource: &str) -> String {
        let base = self
            .options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_VERIFY_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{base}/v2/Services/{serv_id}/{resource}",
            serv_id = self.options.service_id
        )
    }

    /// Start an SMS verification for an E.164 phone number.
    ///
    /// Returns the created verification; its `sid` identifies this challenge.
    pub async fn send_otp(&self, recipient: &str) -> Result<OTPResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Channel", "sms");

        let response = self
            .client
            .post(self.service_url("Verifications"))
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = api_error(status, response).await;
            error!(error = %err, "Twilio rejected verification request");
            return Err(err);
        }

        let verification = response.json::<OTPResponse>().await?;
        debug!(
            verification_sid = %verification.sid,
            status = %verification.status,
            "Twilio verification created"
        );
        Ok(verification)
    }

    /// Check a code against a specific verification.
    ///
    /// Checking by `VerificationSid` rather than `To` pins the check to one
    /// challenge; Twilio answers 404 once that verification is gone.
    pub async fn verify_otp(&self, verification_sid: &str, code: &str) -> Result<(), TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("VerificationSid", verification_sid);
        form_body.insert("Code", code);

        let response = self
            .client
            .post(self.service_url("VerificationCheck"))
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TwilioError::VerificationNotFound);
        }
        if !status.is_success() {
            return Err(check_error(api_error(status, response).await));
        }

        let result = response.json::<OTPVerifyResponse>().await?;
        if result.is_approved() {
            Ok(())
        } else {
            Err(TwilioError::NotApproved {
                status: result.status,
            })
        }
    }
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> TwilioError {
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, body)
}

/// Errors from `VerificationCheck` that mean the challenge is dead.
fn check_error(err: TwilioError) -> TwilioError {
    match err {
        TwilioError::Api {
            code: Some(MAX_CHECK_ATTEMPTS_CODE),
            ..
        } => TwilioError::MaxAttemptsReached,
        other => other,
    }
}

fn error_from_body(status: StatusCode, body: String) -> TwilioError {
    let parsed = serde_json::from_str::<TwilioErrorBody>(&body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed.and_then(|b| b.message).unwrap_or(body);
    TwilioError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(base_url: Option<&str>) -> TwilioOptions {
        TwilioOptions {
            account_sid: "AC_test".to_string(),
            auth_token: "token".to_string(),
            service_id: "VA_test".to_string(),
            base_url: base_url.map(str::to_string),
        }
    }

    #[test]
    fn test_service_url_default_host() {
        let service = TwilioService::new(options(None));
        assert_eq!(
            service.service_url("Verifications"),
            "https://verify.twilio.com/v2/Services/VA_test/Verifications"
        );
    }

    #[test]
    fn test_service_url_override_trims_slash() {
        let service = TwilioService::new(options(Some("http://localhost:9000/")));
        assert_eq!(
            service.service_url("VerificationCheck"),
            "http://localhost:9000/v2/Services/VA_test/VerificationCheck"
        );
    }

    #[test]
    fn test_rejection_classification() {
        assert!(TwilioError::VerificationNotFound.is_rejection());
        assert!(TwilioError::NotApproved {
            status: "pending".to_string()
        }
        .is_rejection());
        assert!(TwilioError::MaxAttemptsReached.is_rejection());
        assert!(!TwilioError::Api {
            status: 500,
            code: None,
            message: "boom".to_string()
        }
        .is_rejection());
    }

    #[test]
    fn test_error_body_keeps_code_and_message() {
        let err = error_from_body(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code": 60202, "message": "Max check attempts reached", "status": 429}"#.to_string(),
        );

        match err {
            TwilioError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 429);
                assert_eq!(code, Some(MAX_CHECK_ATTEMPTS_CODE));
                assert_eq!(message, "Max check attempts reached");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_exhausted_check_attempts_count_as_rejection() {
        let err = check_error(error_from_body(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code": 60202, "message": "Max check attempts reached", "status": 429}"#.to_string(),
        ));
        assert!(matches!(err, TwilioError::MaxAttemptsReached));
        assert!(err.is_rejection());

        // Plain rate limiting is still an outage, not a wrong code.
        let err = check_error(error_from_body(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code": 20429, "message": "Too Many Requests", "status": 429}"#.to_string(),
        ));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_error_body_falls_back_to_raw_text() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(matches!(
            err,
            TwilioError::Api { status: 502, code: None, ref message } if message == "upstream down"
        ));
    }
}
