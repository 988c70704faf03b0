pub mod config_io;
pub mod file_store;
pub mod lock;
pub mod project_io;
pub mod recovery;
pub mod snapshot;
pub mod store;

pub use file_store::FileStore;
pub use store::{MemoryStore, Store, StoreError};
