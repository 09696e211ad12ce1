//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is store default order: `created_at ASC, rowid ASC`,
//!   which is insertion order.
//! - Deleting a category deletes its items in the same statement batch.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::category::{Category, CategoryId};
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    colour,
    created_at
FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn insert_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn count_categories(&self) -> RepoResult<usize>;
    /// Deletes one category and its items. Returns the removed item count.
    fn delete_category(&self, id: CategoryId) -> RepoResult<usize>;
}

/// SQLite-backed category repository over a borrowed connection.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn insert_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (uuid, name, colour, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                category.uuid.to_string(),
                category.name.as_str(),
                category.colour.as_str(),
                category.created_at,
            ],
        )?;

        Ok(category.uuid)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(into_category(read_category_columns(row)?)?));
        }

        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(into_category(read_category_columns(row)?)?);
        }
        Ok(categories)
    }

    fn count_categories(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("invalid category count {count}")))
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<usize> {
        let id_text = id.to_string();
        let removed_items = self
            .conn
            .execute("DELETE FROM items WHERE category_uuid = ?1;", [id_text.as_str()])?;
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE uuid = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(removed_items)
    }
}

struct CategoryColumns {
    uuid: String,
    name: String,
    colour: String,
    created_at: i64,
}

fn read_category_columns(row: &Row<'_>) -> RepoResult<CategoryColumns> {
    Ok(CategoryColumns {
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        colour: row.get("colour")?,
        created_at: row.get("created_at")?,
    })
}

fn into_category(columns: CategoryColumns) -> RepoResult<Category> {
    let category = Category {
        uuid: parse_uuid(&columns.uuid, "categories.uuid")?,
        name: columns.name,
        colour: columns.colour,
        created_at: columns.created_at,
    };
    category.validate()?;
    Ok(category)
}
