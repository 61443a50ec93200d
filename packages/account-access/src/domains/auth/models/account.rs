use serde::{Deserialize, Serialize};

use super::PhoneNumber;
use crate::kernel::{BaseDocumentStore, StoreError};

/// Document-store collection holding one record per registered phone number.
pub const USERS_COLLECTION: &str = "users";

/// Persisted user profile, keyed by canonical phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Free-text fields collected on the registration screen.
///
/// Held verbatim until confirmation succeeds; only presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileField::Name => f.write_str("name"),
            ProfileField::Email => f.write_str("email"),
        }
    }
}

impl ProfileFields {
    /// First field left blank, if any.
    pub fn first_missing(&self) -> Option<ProfileField> {
        if self.name.trim().is_empty() {
            Some(ProfileField::Name)
        } else if self.email.trim().is_empty() {
            Some(ProfileField::Email)
        } else {
            None
        }
    }
}

// =============================================================================
// Store Queries - ALL document access for accounts goes through here
// =============================================================================

impl AccountRecord {
    pub fn new(phone: &PhoneNumber, profile: &ProfileFields) -> Self {
        Self {
            id: phone.as_str().to_string(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone_number: phone.as_str().to_string(),
        }
    }

    /// Key the record is stored under.
    pub fn key(&self) -> &str {
        &self.id
    }

    /// Check whether a record exists for this phone number
    pub async fn exists(
        phone: &PhoneNumber,
        store: &dyn BaseDocumentStore,
    ) -> Result<bool, StoreError> {
        store.exists(USERS_COLLECTION, phone.as_str()).await
    }

    /// Write the record under its key
    pub async fn insert(&self, store: &dyn BaseDocumentStore) -> Result<(), StoreError> {
        let document = serde_json::to_value(self).map_err(|e| StoreError::Encode(e.to_string()))?;
        store.put(USERS_COLLECTION, self.key(), &document).await
    }
}
