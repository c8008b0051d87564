//! Workout logging and head-to-head statistics for two training partners.

pub mod analysis;
pub mod catalog;
pub mod competition;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{BackupError, ImportError, StorageError, StoreError, ValidationError};
pub use import::{ImportSummary, MergeStrategy};
pub use models::{Exercise, Plan, Store, User, Workout, WorkoutSet};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use store::WorkoutStore;
