//! Embedded todo store: typed queries, transactional writes and live
//! result subscriptions.
//!
//! # Responsibility
//! - Own the SQLite connection for the process.
//! - Run every mutation inside a [`WriteScope`] backed by one transaction.
//! - Push fresh ordered snapshots to subscribers after each committed write.
//!
//! # Invariants
//! - Mutations are only reachable through [`Store::write`].
//! - A failed mutation or commit is rolled back and notifies nobody.
//! - Queries read through to storage, so they always reflect committed
//!   writes.
//! - The store is single-threaded (`!Send`); writes are serialized by
//!   `&mut self`.

mod live;
mod scope;

pub use live::{ChangeSet, Subscription};
pub use scope::WriteScope;

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::item_repo::{ItemListQuery, ItemRepository, SqliteItemRepository};
use crate::repo::{RepoError, RepoResult};
use live::SubscriberRegistry;
use log::{debug, error};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write failure. The attempted mutation was not applied.
#[derive(Debug)]
pub enum StoreError {
    /// The mutation closure failed; the transaction was rolled back.
    Mutation(RepoError),
    /// Opening or committing the transaction failed.
    Transaction(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mutation(err) => write!(f, "write rejected: {err}"),
            Self::Transaction(err) => write!(f, "write transaction failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mutation(err) => Some(err),
            Self::Transaction(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Transaction(DbError::Sqlite(value))
    }
}

/// Handle to the embedded category/item store.
pub struct Store {
    conn: Connection,
    subscribers: SubscriberRegistry,
}

impl Store {
    /// Opens (or creates) the store file at `path`.
    ///
    /// An error here is a startup precondition failure.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: SubscriberRegistry::default(),
        }
    }

    /// Raw connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// All categories in store default (insertion) order.
    pub fn categories(&self) -> RepoResult<Vec<Category>> {
        SqliteCategoryRepository::new(&self.conn).list_categories()
    }

    pub fn category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        SqliteCategoryRepository::new(&self.conn).get_category(id)
    }

    pub fn category_count(&self) -> RepoResult<usize> {
        SqliteCategoryRepository::new(&self.conn).count_categories()
    }

    /// Items of one category sorted by title, optionally filtered.
    pub fn items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        SqliteItemRepository::new(&self.conn).list_items(query)
    }

    pub fn item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        SqliteItemRepository::new(&self.conn).get_item(id)
    }

    /// Runs `mutation` in one immediate transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back otherwise. After a
    /// successful commit, subscribers whose query was touched receive a
    /// fresh snapshot before this call returns.
    pub fn write<T, F>(&mut self, mutation: F) -> StoreResult<T>
    where
        F: FnOnce(&mut WriteScope<'_>) -> RepoResult<T>,
    {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| {
                error!(
                    "event=store_write module=store status=error error_code=begin_failed error={err}"
                );
                StoreError::from(err)
            })?;

        let mut scope = WriteScope::new(&tx);
        let outcome = mutation(&mut scope);
        let changes = scope.into_changes();
        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "event=store_write module=store status=error duration_ms={} error_code=write_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(StoreError::Mutation(err));
            }
        };

        if let Err(err) = tx.commit() {
            error!(
                "event=store_write module=store status=error duration_ms={} error_code=commit_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }

        debug!(
            "event=store_write module=store status=ok duration_ms={} categories_touched={} item_lists_touched={}",
            started_at.elapsed().as_millis(),
            changes.categories_touched(),
            changes.item_lists_touched()
        );
        self.subscribers.notify(&self.conn, &changes);
        Ok(value)
    }

    /// Subscribes to the category list.
    ///
    /// `callback` receives the current list immediately and again after
    /// every committed write that touches categories.
    pub fn subscribe_categories<F>(&self, callback: F) -> RepoResult<Subscription>
    where
        F: Fn(&[Category]) + 'static,
    {
        let initial = self.categories()?;
        callback(&initial);
        Ok(self.subscribers.add_categories(callback))
    }

    /// Subscribes to the items matching `query`.
    ///
    /// `callback` receives the current result immediately and again after
    /// every committed write that touches the queried category's items.
    pub fn subscribe_items<F>(&self, query: ItemListQuery, callback: F) -> RepoResult<Subscription>
    where
        F: Fn(&[Item]) + 'static,
    {
        let initial = self.items(&query)?;
        callback(&initial);
        Ok(self.subscribers.add_items(query, callback))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
