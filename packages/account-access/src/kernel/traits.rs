// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The account gate and the session flow are domain code built on top of these.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityService)

use async_trait::async_trait;
use thiserror::Error;

use crate::domains::auth::models::{ChallengeHandle, PhoneNumber, VerificationCode};

// =============================================================================
// Identity Service Trait (Infrastructure - SMS/OTP)
// =============================================================================

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Wrong code, or the challenge expired or was superseded.
    #[error("verification code rejected")]
    InvalidCode,

    #[error("identity service unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait BaseIdentityService: Send + Sync {
    /// Send a one-time code to the phone number and return the challenge handle
    async fn request_code(&self, phone: &PhoneNumber) -> Result<ChallengeHandle, IdentityError>;

    /// Confirm a code against a previously issued challenge
    async fn confirm(
        &self,
        handle: &ChallengeHandle,
        code: &VerificationCode,
    ) -> Result<(), IdentityError>;
}

// =============================================================================
// Document Store Trait (Infrastructure)
// =============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    #[error("document could not be encoded: {0}")]
    Encode(String),
}

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Whether a document exists under `collection/key`
    async fn exists(&self, collection: &str, key: &str) -> Result<bool, StoreError>;

    /// Create or overwrite the document under `collection/key`
    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<(), StoreError>;
}
