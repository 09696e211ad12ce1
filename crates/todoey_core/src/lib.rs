//! Core logic for the Todoey list app: colour-coded categories that own
//! ordered, searchable todo items, persisted in an embedded SQLite store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::item::{Item, ItemId};
pub use model::palette::{ColourRotation, PALETTE};
pub use model::ModelValidationError;
pub use repo::item_repo::ItemListQuery;
pub use repo::{RepoError, RepoResult};
pub use service::list_service::{ListService, ServiceError, ServiceResult};
pub use store::{ChangeSet, Store, StoreError, StoreResult, Subscription, WriteScope};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
