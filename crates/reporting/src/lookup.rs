//! Per-item lookups the engine performs: category names and last delivery dates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use larder_core::{CategoryId, InventoryItemId};
use larder_inventory::{Category, Delivery};

/// Resolves a category reference to its display name.
///
/// Returning `None` is not an error: the item is reported with an empty
/// category name.
pub trait CategoryResolver {
    fn category_name(&self, category_id: CategoryId) -> Option<String>;
}

impl<R: CategoryResolver + ?Sized> CategoryResolver for &R {
    fn category_name(&self, category_id: CategoryId) -> Option<String> {
        (**self).category_name(category_id)
    }
}

impl CategoryResolver for HashMap<CategoryId, String> {
    fn category_name(&self, category_id: CategoryId) -> Option<String> {
        self.get(&category_id).cloned()
    }
}

impl CategoryResolver for [Category] {
    fn category_name(&self, category_id: CategoryId) -> Option<String> {
        self.iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
    }
}

/// Resolver that never finds anything (every item gets an empty category).
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCategories;

impl CategoryResolver for NoCategories {
    fn category_name(&self, _category_id: CategoryId) -> Option<String> {
        None
    }
}

pub(crate) fn resolve_category<R: CategoryResolver + ?Sized>(
    resolver: &R,
    category_id: Option<CategoryId>,
) -> String {
    category_id
        .and_then(|id| resolver.category_name(id))
        .unwrap_or_default()
}

/// Most recent delivery timestamp per item, built once per report.
#[derive(Debug, Default, Clone)]
pub struct LastDeliveryIndex {
    latest: HashMap<InventoryItemId, DateTime<Utc>>,
}

impl LastDeliveryIndex {
    pub fn build(deliveries: &[Delivery]) -> Self {
        let mut latest: HashMap<InventoryItemId, DateTime<Utc>> = HashMap::new();
        for d in deliveries {
            latest
                .entry(d.inventory_item_id)
                .and_modify(|at| {
                    if d.delivered_at > *at {
                        *at = d.delivered_at;
                    }
                })
                .or_insert(d.delivered_at);
        }
        Self { latest }
    }

    pub fn last_delivery(&self, item_id: InventoryItemId) -> Option<DateTime<Utc>> {
        self.latest.get(&item_id).copied()
    }
}
