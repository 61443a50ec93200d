use std::sync::Arc;

use tracing::{debug, error};

use super::errors::FlowError;
use super::models::{AccountRecord, PhoneNumber};
use crate::kernel::BaseDocumentStore;

/// Account existence gate.
///
/// One read of the `users` collection keyed by canonical phone number, consulted
/// before any code is requested. The phone must already be canonical; the gate
/// does not validate it again. Failures are not retried.
#[derive(Clone)]
pub struct AccountGate {
    store: Arc<dyn BaseDocumentStore>,
}

impl AccountGate {
    pub fn new(store: Arc<dyn BaseDocumentStore>) -> Self {
        Self { store }
    }

    pub async fn check_exists(&self, phone: &PhoneNumber) -> Result<bool, FlowError> {
        match AccountRecord::exists(phone, self.store.as_ref()).await {
            Ok(exists) => {
                debug!(phone = %phone.fingerprint(), exists, "account lookup answered");
                Ok(exists)
            }
            Err(e) => {
                error!(phone = %phone.fingerprint(), error = %e, "account lookup failed");
                Err(e.into())
            }
        }
    }
}
