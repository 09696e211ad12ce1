//! Mutation scope handed to [`Store::write`](super::Store::write).

use super::live::ChangeSet;
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Transaction-bound mutation API. Records which queries each mutation
/// touches so the store can notify subscribers after commit.
pub struct WriteScope<'tx> {
    conn: &'tx Connection,
    changes: ChangeSet,
}

impl<'tx> WriteScope<'tx> {
    pub(super) fn new(conn: &'tx Connection) -> Self {
        Self {
            conn,
            changes: ChangeSet::default(),
        }
    }

    pub(super) fn into_changes(self) -> ChangeSet {
        self.changes
    }

    fn categories(&self) -> SqliteCategoryRepository<'_> {
        SqliteCategoryRepository::new(self.conn)
    }

    fn items(&self) -> SqliteItemRepository<'_> {
        SqliteItemRepository::new(self.conn)
    }

    /// Reads a category as seen inside this transaction.
    pub fn category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.categories().get_category(id)
    }

    pub fn category_count(&self) -> RepoResult<usize> {
        self.categories().count_categories()
    }

    /// Reads an item as seen inside this transaction.
    pub fn item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.items().get_item(id)
    }

    pub fn add_category(&mut self, category: &Category) -> RepoResult<CategoryId> {
        let id = self.categories().insert_category(category)?;
        self.changes.touch_categories();
        Ok(id)
    }

    /// Deletes a category together with its items.
    pub fn delete_category(&mut self, id: CategoryId) -> RepoResult<usize> {
        let removed_items = self.categories().delete_category(id)?;
        self.changes.touch_categories();
        self.changes.touch_items_of(id);
        Ok(removed_items)
    }

    /// Appends an item to the end of its category's collection.
    pub fn append_item(&mut self, item: &Item) -> RepoResult<Item> {
        let appended = self.items().append_item(item)?;
        self.changes.touch_items_of(appended.category_uuid);
        Ok(appended)
    }

    pub fn set_item_done(&mut self, id: ItemId, done: bool) -> RepoResult<Item> {
        let mut item = self.item(id)?.ok_or(RepoError::ItemNotFound(id))?;
        self.items().set_item_done(id, done)?;
        item.done = done;
        self.changes.touch_items_of(item.category_uuid);
        Ok(item)
    }

    /// Removes an item; its category's collection shrinks accordingly.
    pub fn delete_item(&mut self, id: ItemId) -> RepoResult<Item> {
        let item = self.item(id)?.ok_or(RepoError::ItemNotFound(id))?;
        self.items().delete_item(id)?;
        self.changes.touch_items_of(item.category_uuid);
        Ok(item)
    }
}
