//! Auth dependencies for the session flow (using traits for testability)
//!
//! All external services use trait abstractions so tests can inject
//! the doubles from `test_dependencies`.

use async_trait::async_trait;
use std::sync::Arc;
use twilio::{TwilioOptions, TwilioService};

use crate::common::Locale;
use crate::config::Config;
use crate::domains::auth::models::{
    ChallengeHandle, PhoneNumber, VerificationCode, DEFAULT_PHONE_DIGITS,
};
use crate::kernel::{BaseDocumentStore, BaseIdentityService, FirestoreDocumentStore, IdentityError};

// =============================================================================
// TwilioService Adapter (implements BaseIdentityService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseIdentityService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseIdentityService for TwilioAdapter {
    async fn request_code(&self, phone: &PhoneNumber) -> Result<ChallengeHandle, IdentityError> {
        self.0
            .send_otp(&phone.to_e164())
            .await
            .map(|verification| ChallengeHandle::new(verification.sid))
            .map_err(|e| IdentityError::Unavailable(e.into()))
    }

    async fn confirm(
        &self,
        handle: &ChallengeHandle,
        code: &VerificationCode,
    ) -> Result<(), IdentityError> {
        self.0
            .verify_otp(handle.as_str(), code.as_str())
            .await
            .map_err(|e| {
                if e.is_rejection() {
                    IdentityError::InvalidCode
                } else {
                    IdentityError::Unavailable(e.into())
                }
            })
    }
}

// =============================================================================
// AuthDeps
// =============================================================================

/// Dependencies shared by every flow instance
#[derive(Clone)]
pub struct AuthDeps {
    pub identity: Arc<dyn BaseIdentityService>,
    pub document_store: Arc<dyn BaseDocumentStore>,
    pub phone_digit_count: usize,
    pub locale: Locale,
}

impl AuthDeps {
    pub fn new(
        identity: Arc<dyn BaseIdentityService>,
        document_store: Arc<dyn BaseDocumentStore>,
    ) -> Self {
        Self {
            identity,
            document_store,
            phone_digit_count: DEFAULT_PHONE_DIGITS,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_phone_digit_count(mut self, digits: usize) -> Self {
        self.phone_digit_count = digits;
        self
    }

    /// Wire the production services (Twilio Verify + Firestore) from config
    pub fn from_config(config: &Config) -> Self {
        let twilio = Arc::new(TwilioService::new(TwilioOptions {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            service_id: config.twilio_verify_service_sid.clone(),
            base_url: None,
        }));
        let firestore = FirestoreDocumentStore::new(
            config.firestore_project_id.clone(),
            config.firestore_token.clone(),
            config.firestore_base_url.clone(),
        );

        Self::new(Arc::new(TwilioAdapter::new(twilio)), Arc::new(firestore))
            .with_locale(config.locale)
            .with_phone_digit_count(config.phone_digit_count)
    }
}
