//! Category and item use-cases.
//!
//! # Responsibility
//! - Load, create and delete categories with round-robin colours.
//! - Load (sorted, optionally filtered), create, toggle and delete items.
//!
//! # Invariants
//! - Absent input (`None`) is a no-op; empty text is accepted as-is.
//! - Names and titles are capitalized before they reach the store.
//! - The colour rotation only advances after a committed creation, and is
//!   re-derived from the live count after a category deletion.
//! - Write failures are logged here and returned; nothing panics.

use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::model::palette::ColourRotation;
use crate::repo::item_repo::ItemListQuery;
use crate::repo::RepoError;
use crate::store::{Store, StoreError, Subscription};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from list service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Target category does not exist.
    CategoryNotFound(CategoryId),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Read failure.
    Repo(RepoError),
    /// Write failure; the mutation was not applied.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::ItemNotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Mutation(RepoError::CategoryNotFound(id)) => Self::CategoryNotFound(id),
            StoreError::Mutation(RepoError::ItemNotFound(id)) => Self::ItemNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Service context holding the store handle and the colour rotation.
pub struct ListService {
    store: Store,
    rotation: ColourRotation,
}

impl ListService {
    /// Creates the service, starting the colour rotation at the current
    /// category count.
    pub fn new(store: Store) -> ServiceResult<Self> {
        let rotation = ColourRotation::from_live_count(store.category_count()?);
        Ok(Self { store, rotation })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    /// Rotation slot the next created category will use.
    pub fn rotation(&self) -> ColourRotation {
        self.rotation
    }

    /// All categories in insertion order.
    pub fn load_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.store.categories()?)
    }

    pub fn get_category(&self, id: CategoryId) -> ServiceResult<Option<Category>> {
        Ok(self.store.category(id)?)
    }

    /// Creates a category from raw input.
    ///
    /// Returns `Ok(None)` without touching the store when `raw_name` is
    /// `None`.
    pub fn create_category(&mut self, raw_name: Option<&str>) -> ServiceResult<Option<Category>> {
        let Some(raw_name) = raw_name else {
            return Ok(None);
        };

        let category = Category::new(raw_name, self.rotation.peek());
        let result = self.store.write(|scope| scope.add_category(&category));
        if let Err(err) = result {
            error!("event=category_create module=service status=error error={err}");
            return Err(err.into());
        }

        self.rotation.advance();
        info!(
            "event=category_create module=service status=ok category={} next_colour_slot={}",
            category.uuid,
            self.rotation.index()
        );
        Ok(Some(category))
    }

    /// Deletes a category and its items, then re-derives the colour
    /// rotation from the remaining count.
    pub fn delete_category(&mut self, id: CategoryId) -> ServiceResult<()> {
        let result = self.store.write(|scope| scope.delete_category(id));
        self.resync_rotation();

        match result {
            Ok(removed_items) => {
                info!(
                    "event=category_delete module=service status=ok category={id} removed_items={removed_items}"
                );
                Ok(())
            }
            Err(err) => {
                error!("event=category_delete module=service status=error category={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Items of `category` sorted ascending by title.
    ///
    /// A non-empty `filter` keeps only titles containing it, ignoring case
    /// and diacritics. An empty filter is the same as no filter.
    pub fn load_items(
        &self,
        category: CategoryId,
        filter: Option<&str>,
    ) -> ServiceResult<Vec<Item>> {
        self.ensure_category(category)?;
        let query = item_query(category, filter);
        Ok(self.store.items(&query)?)
    }

    pub fn get_item(&self, id: ItemId) -> ServiceResult<Option<Item>> {
        Ok(self.store.item(id)?)
    }

    /// Appends a new item to `category`.
    ///
    /// Returns `Ok(None)` without touching the store when `raw_title` is
    /// `None`.
    pub fn create_item(
        &mut self,
        category: CategoryId,
        raw_title: Option<&str>,
    ) -> ServiceResult<Option<Item>> {
        let Some(raw_title) = raw_title else {
            return Ok(None);
        };

        let item = Item::new(category, raw_title);
        match self.store.write(|scope| scope.append_item(&item)) {
            Ok(appended) => {
                info!(
                    "event=item_create module=service status=ok category={category} item={} position={}",
                    appended.uuid, appended.position
                );
                Ok(Some(appended))
            }
            Err(err) => {
                error!("event=item_create module=service status=error category={category} error={err}");
                Err(err.into())
            }
        }
    }

    /// Flips the done flag and returns the updated item.
    pub fn toggle_done(&mut self, id: ItemId) -> ServiceResult<Item> {
        let result = self.store.write(|scope| {
            let current = scope.item(id)?.ok_or(RepoError::ItemNotFound(id))?;
            scope.set_item_done(id, !current.done)
        });

        match result {
            Ok(item) => {
                info!(
                    "event=item_toggle module=service status=ok item={id} done={}",
                    item.done
                );
                Ok(item)
            }
            Err(err) => {
                error!("event=item_toggle module=service status=error item={id} error={err}");
                Err(err.into())
            }
        }
    }

    pub fn delete_item(&mut self, id: ItemId) -> ServiceResult<()> {
        match self.store.write(|scope| scope.delete_item(id)) {
            Ok(item) => {
                info!(
                    "event=item_delete module=service status=ok item={id} category={}",
                    item.category_uuid
                );
                Ok(())
            }
            Err(err) => {
                error!("event=item_delete module=service status=error item={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Live category list. See [`Store::subscribe_categories`].
    pub fn subscribe_categories<F>(&self, callback: F) -> ServiceResult<Subscription>
    where
        F: Fn(&[Category]) + 'static,
    {
        Ok(self.store.subscribe_categories(callback)?)
    }

    /// Live item list for one category with the same filter semantics as
    /// [`ListService::load_items`].
    pub fn subscribe_items<F>(
        &self,
        category: CategoryId,
        filter: Option<&str>,
        callback: F,
    ) -> ServiceResult<Subscription>
    where
        F: Fn(&[Item]) + 'static,
    {
        self.ensure_category(category)?;
        Ok(self
            .store
            .subscribe_items(item_query(category, filter), callback)?)
    }

    fn ensure_category(&self, id: CategoryId) -> ServiceResult<()> {
        match self.store.category(id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::CategoryNotFound(id)),
        }
    }

    fn resync_rotation(&mut self) {
        match self.store.category_count() {
            Ok(count) => self.rotation = ColourRotation::from_live_count(count),
            Err(err) => warn!(
                "event=rotation_resync module=service status=error slot={} error={err}",
                self.rotation.index()
            ),
        }
    }
}

fn item_query(category: CategoryId, filter: Option<&str>) -> ItemListQuery {
    match filter {
        Some(filter) if !filter.is_empty() => ItemListQuery::matching(category, filter),
        _ => ItemListQuery::all(category),
    }
}
