pub mod matcher;
pub mod store;

pub use matcher::{score, search};
pub use store::{IdeaStore, StoreError};
