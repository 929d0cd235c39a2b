#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;
pub mod store;

pub use repository::{Storage, StorageError};
pub use store::WordStore;
