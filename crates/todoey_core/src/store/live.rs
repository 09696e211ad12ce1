//! Live query subscriptions.
//!
//! Subscribers are kept in an `Rc<RefCell<..>>` registry. The registry is
//! never borrowed while a callback runs, so callbacks may drop their own
//! or other subscriptions.

use crate::model::category::{Category, CategoryId};
use crate::model::item::Item;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::item_repo::{ItemListQuery, ItemRepository, SqliteItemRepository};
use log::warn;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

type CategoryCallback = Rc<dyn Fn(&[Category])>;
type ItemCallback = Rc<dyn Fn(&[Item])>;

/// Queries touched by one committed write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    categories: bool,
    item_categories: BTreeSet<CategoryId>,
}

impl ChangeSet {
    pub(crate) fn touch_categories(&mut self) {
        self.categories = true;
    }

    pub(crate) fn touch_items_of(&mut self, category: CategoryId) {
        self.item_categories.insert(category);
    }

    pub fn categories_touched(&self) -> bool {
        self.categories
    }

    /// Number of distinct categories whose item list changed.
    pub fn item_lists_touched(&self) -> usize {
        self.item_categories.len()
    }

    pub fn touches_items_of(&self, category: CategoryId) -> bool {
        self.item_categories.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        !self.categories && self.item_categories.is_empty()
    }
}

#[derive(Clone)]
enum LiveQuery {
    Categories(CategoryCallback),
    Items {
        query: ItemListQuery,
        callback: ItemCallback,
    },
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, LiveQuery)>,
}

#[derive(Default)]
pub(super) struct SubscriberRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl SubscriberRegistry {
    pub(super) fn add_categories<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Category]) + 'static,
    {
        self.add(LiveQuery::Categories(Rc::new(callback)))
    }

    pub(super) fn add_items<F>(&self, query: ItemListQuery, callback: F) -> Subscription
    where
        F: Fn(&[Item]) + 'static,
    {
        self.add(LiveQuery::Items {
            query,
            callback: Rc::new(callback),
        })
    }

    pub(super) fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    fn add(&self, live: LiveQuery) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, live));
        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    fn is_live(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }

    /// Re-evaluates every subscription touched by `changes` and pushes the
    /// result, in registration order.
    ///
    /// An entry cancelled by an earlier callback in the same round is
    /// skipped.
    pub(super) fn notify(&self, conn: &Connection, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }

        let affected: Vec<(u64, LiveQuery)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, live)| match live {
                LiveQuery::Categories(_) => changes.categories_touched(),
                LiveQuery::Items { query, .. } => {
                    changes.touches_items_of(query.category_uuid)
                }
            })
            .cloned()
            .collect();

        for (id, live) in affected {
            if !self.is_live(id) {
                continue;
            }
            match live {
                LiveQuery::Categories(callback) => {
                    match SqliteCategoryRepository::new(conn).list_categories() {
                        Ok(categories) => callback(&categories),
                        Err(err) => warn!(
                            "event=live_refresh module=store status=error query=categories error={err}"
                        ),
                    }
                }
                LiveQuery::Items { query, callback } => {
                    match SqliteItemRepository::new(conn).list_items(&query) {
                        Ok(items) => callback(&items),
                        Err(err) => warn!(
                            "event=live_refresh module=store status=error query=items category={} error={err}",
                            query.category_uuid
                        ),
                    }
                }
            }
        }
    }
}

/// Live-query registration guard. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Explicitly ends the subscription. Same as dropping it.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        // The removed callback may own further subscriptions, so it is
        // dropped only after the registry borrow is released.
        let removed = match inner.try_borrow_mut() {
            Ok(mut registry) => registry
                .entries
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| registry.entries.remove(index)),
            Err(_) => {
                warn!(
                    "event=live_unsubscribe module=store status=error subscription={} error_code=registry_busy",
                    self.id
                );
                None
            }
        };
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeSet;
    use uuid::Uuid;

    #[test]
    fn change_set_tracks_touched_item_lists() {
        let category = Uuid::new_v4();
        let mut changes = ChangeSet::default();
        assert!(changes.is_empty());

        changes.touch_items_of(category);
        changes.touch_items_of(category);
        assert!(!changes.is_empty());
        assert!(!changes.categories_touched());
        assert!(changes.touches_items_of(category));
        assert!(!changes.touches_items_of(Uuid::new_v4()));
        assert_eq!(changes.item_lists_touched(), 1);
    }
}
