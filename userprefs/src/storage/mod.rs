mod backend;
mod config;
mod error;
mod model;
mod traits;


pub use backend::ObjectStoreBackend;
pub use config::StorageConfig;
pub use error::StorageError;
pub use model::{Container, Record};
pub use traits::{ContainerClient, RecordClient};
