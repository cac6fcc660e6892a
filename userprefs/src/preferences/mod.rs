mod config;
mod error;
mod multi;
mod naming;
mod resource;
mod single;
mod traits;


pub use config::{BackendKind, PreferenceConfig};
pub use error::PreferenceError;
pub use multi::{Change, MultiObjectStore, ReconcilePlan};
pub use resource::{PreferenceResource, build_store};
pub use single::SingleObjectStore;
pub use traits::PreferenceStore;
