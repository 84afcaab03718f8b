// aias-api: Async Rust client for the chapter's hosted document store (Firestore REST + in-memory)

pub mod error;
pub mod firestore;
pub mod memory;
pub mod path;
pub mod store;
pub mod transport;
pub mod value;

pub use error::Error;
pub use firestore::{FirestoreClient, FirestoreConfig};
pub use memory::MemoryStore;
pub use store::{Document, DocumentStore, Fields};
