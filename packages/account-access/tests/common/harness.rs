//! Test harness wiring session flows to spy services.
//!
//! Each test gets fresh mocks; nothing is shared between tests.

use std::sync::Arc;

use account_access_core::domains::auth::models::{PhoneNumber, DEFAULT_PHONE_DIGITS};
use account_access_core::domains::auth::SessionFlow;
use account_access_core::kernel::{
    AuthDeps, MockDocumentStore, MockIdentityService, TestDependencies,
};
use test_context::AsyncTestContext;

/// Masked input as the phone field produces it.
pub const PHONE_INPUT: &str = "+38 (099) 123 - 45 - 67";
/// Canonical key for `PHONE_INPUT`.
pub const PHONE_KEY: &str = "380991234567";
/// The only code the mock identity service approves.
pub const VALID_CODE: &str = "123456";
pub const WRONG_CODE: &str = "654321";

pub fn phone() -> PhoneNumber {
    PhoneNumber::parse(PHONE_KEY, DEFAULT_PHONE_DIGITS).expect("test phone is canonical")
}

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Harness around a document store with no accounts in it.
///
/// # Example using test-context
///
/// ```ignore
/// #[test_context(FlowHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &FlowHarness) {
///     let flow = ctx.registration("Olena", "olena@example.com");
///     // ... test code
/// }
/// ```
pub struct FlowHarness {
    pub identity: Arc<MockIdentityService>,
    pub store: Arc<MockDocumentStore>,
    deps: AuthDeps,
}

impl FlowHarness {
    pub fn new(identity: MockIdentityService, store: MockDocumentStore) -> Self {
        init_tracing();
        let test_deps = TestDependencies::new(identity, store);
        Self {
            deps: test_deps.deps(),
            identity: test_deps.identity,
            store: test_deps.document_store,
        }
    }

    pub fn deps(&self) -> AuthDeps {
        self.deps.clone()
    }

    pub fn login(&self) -> SessionFlow {
        SessionFlow::login(self.deps())
    }

    pub fn registration(&self, name: &str, email: &str) -> SessionFlow {
        let flow = SessionFlow::registration(self.deps());
        flow.set_name(name);
        flow.set_email(email);
        flow
    }
}

impl AsyncTestContext for FlowHarness {
    async fn setup() -> Self {
        Self::new(MockIdentityService::new(VALID_CODE), MockDocumentStore::new())
    }
}

/// Harness whose store already holds an account for `PHONE_KEY`.
pub struct RegisteredUserHarness(pub FlowHarness);

impl std::ops::Deref for RegisteredUserHarness {
    type Target = FlowHarness;

    fn deref(&self) -> &FlowHarness {
        &self.0
    }
}

impl AsyncTestContext for RegisteredUserHarness {
    async fn setup() -> Self {
        Self(FlowHarness::new(
            MockIdentityService::new(VALID_CODE),
            MockDocumentStore::new().with_account(&phone()),
        ))
    }
}
