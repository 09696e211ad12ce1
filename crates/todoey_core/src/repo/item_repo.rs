//! Item repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing is scoped to one category and sorted `title ASC` in binary
//!   (code point) order, ties broken by append position.
//! - Title filtering is case- and diacritic-insensitive and is applied to
//!   the sorted list, so a filtered result is a subsequence of the
//!   unfiltered one.
//! - Appending requires the owning category to exist.

use super::{bool_to_int, parse_uuid, RepoError, RepoResult};
use crate::model::category::CategoryId;
use crate::model::item::{Item, ItemId};
use crate::model::text::fold_for_search;
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    category_uuid,
    title,
    done,
    date_created,
    position
FROM items";

/// Query options for listing the items of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListQuery {
    pub category_uuid: CategoryId,
    /// Substring filter on `title`. `None` and `Some("")` both mean
    /// unfiltered.
    pub title_filter: Option<String>,
}

impl ItemListQuery {
    pub fn all(category_uuid: CategoryId) -> Self {
        Self {
            category_uuid,
            title_filter: None,
        }
    }

    pub fn matching(category_uuid: CategoryId, filter: impl Into<String>) -> Self {
        Self {
            category_uuid,
            title_filter: Some(filter.into()),
        }
    }

    /// Filter text that actually narrows the result, if any.
    pub fn effective_filter(&self) -> Option<&str> {
        self.title_filter
            .as_deref()
            .filter(|filter| !filter.is_empty())
    }
}

/// Repository interface for item persistence.
pub trait ItemRepository {
    /// Appends `item` to its category and returns it with the assigned
    /// position.
    fn append_item(&self, item: &Item) -> RepoResult<Item>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    fn set_item_done(&self, id: ItemId, done: bool) -> RepoResult<()>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed item repository over a borrowed connection.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn next_position(&self, category_uuid: CategoryId) -> RepoResult<i64> {
        let position: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM items WHERE category_uuid = ?1;",
            [category_uuid.to_string()],
            |row| row.get(0),
        )?;
        Ok(position)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn append_item(&self, item: &Item) -> RepoResult<Item> {
        item.validate()?;
        if !self.category_exists(item.category_uuid)? {
            return Err(RepoError::CategoryNotFound(item.category_uuid));
        }

        let mut appended = item.clone();
        appended.position = self.next_position(item.category_uuid)?;

        self.conn.execute(
            "INSERT INTO items (
                uuid,
                category_uuid,
                title,
                done,
                date_created,
                position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                appended.uuid.to_string(),
                appended.category_uuid.to_string(),
                appended.title.as_str(),
                bool_to_int(appended.done),
                appended.date_created,
                appended.position,
            ],
        )?;

        Ok(appended)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE category_uuid = ?1
             ORDER BY title COLLATE BINARY ASC, position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([query.category_uuid.to_string()])?;
        let folded_filter = query.effective_filter().map(fold_for_search);

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let item = parse_item_row(row)?;
            let keep = folded_filter
                .as_deref()
                .map_or(true, |filter| fold_for_search(&item.title).contains(filter));
            if keep {
                items.push(item);
            }
        }

        Ok(items)
    }

    fn set_item_done(&self, id: ItemId, done: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items SET done = ?1 WHERE uuid = ?2;",
            params![bool_to_int(done), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }
        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category_uuid")?;

    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in items.done"
            )));
        }
    };

    let item = Item {
        uuid: parse_uuid(&uuid_text, "items.uuid")?,
        category_uuid: parse_uuid(&category_text, "items.category_uuid")?,
        title: row.get("title")?,
        done,
        date_created: row.get("date_created")?,
        position: row.get("position")?,
    };
    item.validate()?;
    Ok(item)
}
