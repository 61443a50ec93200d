// TestDependencies - mock implementations for testing
//
// Provides spy services that can be injected into AuthDeps for tests.

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{AuthDeps, BaseDocumentStore, BaseIdentityService, IdentityError, StoreError};
use crate::domains::auth::models::{
    AccountRecord, ChallengeHandle, PhoneNumber, ProfileFields, VerificationCode, USERS_COLLECTION,
};

/// Consume one queued failure, if any are left.
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

// =============================================================================
// Mock Identity Service
// =============================================================================

/// Arguments captured from a confirm call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmCallArgs {
    pub handle: ChallengeHandle,
    pub code: String,
}

/// Identity service double.
///
/// Every `request_code` issues a fresh handle and supersedes any earlier handle
/// for the same phone number. A handle is consumed by a successful confirmation.
pub struct MockIdentityService {
    accepted_code: String,
    issued: AtomicUsize,
    live: Arc<Mutex<HashMap<PhoneNumber, ChallengeHandle>>>,
    request_calls: Arc<Mutex<Vec<PhoneNumber>>>,
    confirm_calls: Arc<Mutex<Vec<ConfirmCallArgs>>>,
    failing_requests: AtomicUsize,
    failing_confirms: AtomicUsize,
}

impl MockIdentityService {
    pub fn new(accepted_code: &str) -> Self {
        Self {
            accepted_code: accepted_code.to_string(),
            issued: AtomicUsize::new(0),
            live: Arc::new(Mutex::new(HashMap::new())),
            request_calls: Arc::new(Mutex::new(Vec::new())),
            confirm_calls: Arc::new(Mutex::new(Vec::new())),
            failing_requests: AtomicUsize::new(0),
            failing_confirms: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` code requests fail as unavailable
    pub fn fail_next_requests(self, n: usize) -> Self {
        self.queue_request_failures(n);
        self
    }

    /// Same as `fail_next_requests`, for a service already handed out
    pub fn queue_request_failures(&self, n: usize) {
        self.failing_requests.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` confirmations fail as unavailable
    pub fn fail_next_confirms(self, n: usize) -> Self {
        self.failing_confirms.store(n, Ordering::SeqCst);
        self
    }

    /// Phones a code was requested for, in order
    pub fn request_calls(&self) -> Vec<PhoneNumber> {
        self.request_calls.lock().unwrap().clone()
    }

    pub fn confirm_calls(&self) -> Vec<ConfirmCallArgs> {
        self.confirm_calls.lock().unwrap().clone()
    }

    /// The handle currently accepted for a phone, if any
    pub fn live_handle(&self, phone: &PhoneNumber) -> Option<ChallengeHandle> {
        self.live.lock().unwrap().get(phone).cloned()
    }
}

#[async_trait]
impl BaseIdentityService for MockIdentityService {
    async fn request_code(&self, phone: &PhoneNumber) -> Result<ChallengeHandle, IdentityError> {
        self.request_calls.lock().unwrap().push(phone.clone());

        if take_failure(&self.failing_requests) {
            return Err(IdentityError::Unavailable(anyhow!(
                "mock identity service offline"
            )));
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = ChallengeHandle::new(format!("VE-mock-{}", n));
        self.live
            .lock()
            .unwrap()
            .insert(phone.clone(), handle.clone());
        Ok(handle)
    }

    async fn confirm(
        &self,
        handle: &ChallengeHandle,
        code: &VerificationCode,
    ) -> Result<(), IdentityError> {
        self.confirm_calls.lock().unwrap().push(ConfirmCallArgs {
            handle: handle.clone(),
            code: code.as_str().to_string(),
        });

        if take_failure(&self.failing_confirms) {
            return Err(IdentityError::Unavailable(anyhow!(
                "mock identity service offline"
            )));
        }

        let mut live = self.live.lock().unwrap();
        let owner = live
            .iter()
            .find(|(_, live_handle)| *live_handle == handle)
            .map(|(phone, _)| phone.clone());

        match owner {
            Some(phone) if code.as_str() == self.accepted_code => {
                live.remove(&phone);
                Ok(())
            }
            _ => Err(IdentityError::InvalidCode),
        }
    }
}

// =============================================================================
// Mock Document Store
// =============================================================================

/// Arguments captured from a put call
#[derive(Debug, Clone, PartialEq)]
pub struct PutCallArgs {
    pub collection: String,
    pub key: String,
    pub document: Value,
}

pub struct MockDocumentStore {
    documents: Arc<Mutex<HashMap<(String, String), Value>>>,
    exists_calls: Arc<Mutex<Vec<(String, String)>>>,
    put_calls: Arc<Mutex<Vec<PutCallArgs>>>,
    failing_lookups: AtomicUsize,
    failing_puts: AtomicUsize,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
            exists_calls: Arc::new(Mutex::new(Vec::new())),
            put_calls: Arc::new(Mutex::new(Vec::new())),
            failing_lookups: AtomicUsize::new(0),
            failing_puts: AtomicUsize::new(0),
        }
    }

    /// Seed a registered account for the phone number
    pub fn with_account(self, phone: &PhoneNumber) -> Self {
        let record = AccountRecord::new(
            phone,
            &ProfileFields {
                name: "Existing User".to_string(),
                email: "existing@example.com".to_string(),
            },
        );
        self.documents.lock().unwrap().insert(
            (USERS_COLLECTION.to_string(), phone.as_str().to_string()),
            serde_json::to_value(record).unwrap(),
        );
        self
    }

    pub fn fail_next_lookups(self, n: usize) -> Self {
        self.failing_lookups.store(n, Ordering::SeqCst);
        self
    }

    pub fn fail_next_puts(self, n: usize) -> Self {
        self.failing_puts.store(n, Ordering::SeqCst);
        self
    }

    /// Keys looked up, as `(collection, key)`
    pub fn exists_calls(&self) -> Vec<(String, String)> {
        self.exists_calls.lock().unwrap().clone()
    }

    pub fn put_calls(&self) -> Vec<PutCallArgs> {
        self.put_calls.lock().unwrap().clone()
    }

    pub fn document(&self, collection: &str, key: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentStore for MockDocumentStore {
    async fn exists(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        self.exists_calls
            .lock()
            .unwrap()
            .push((collection.to_string(), key.to_string()));

        if take_failure(&self.failing_lookups) {
            return Err(StoreError::Unavailable(anyhow!("mock store offline")));
        }

        Ok(self
            .documents
            .lock()
            .unwrap()
            .contains_key(&(collection.to_string(), key.to_string())))
    }

    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        self.put_calls.lock().unwrap().push(PutCallArgs {
            collection: collection.to_string(),
            key: key.to_string(),
            document: document.clone(),
        });

        if take_failure(&self.failing_puts) {
            return Err(StoreError::Unavailable(anyhow!("mock store offline")));
        }

        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), key.to_string()), document.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of spies plus the `AuthDeps` wired to them
pub struct TestDependencies {
    pub identity: Arc<MockIdentityService>,
    pub document_store: Arc<MockDocumentStore>,
}

impl TestDependencies {
    pub fn new(identity: MockIdentityService, document_store: MockDocumentStore) -> Self {
        Self {
            identity: Arc::new(identity),
            document_store: Arc::new(document_store),
        }
    }

    pub fn deps(&self) -> AuthDeps {
        AuthDeps::new(self.identity.clone(), self.document_store.clone())
    }
}
