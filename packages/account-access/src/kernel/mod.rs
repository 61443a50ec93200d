//! Kernel module - service infrastructure and dependencies.

pub mod deps;
pub mod firestore;
pub mod memory_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{AuthDeps, TwilioAdapter};
pub use firestore::FirestoreDocumentStore;
pub use memory_store::MemoryDocumentStore;
pub use test_dependencies::{MockDocumentStore, MockIdentityService, TestDependencies};
pub use traits::*;
