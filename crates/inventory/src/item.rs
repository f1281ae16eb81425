use serde::{Deserialize, Serialize};

use larder_core::{AccountId, AccountScoped, CategoryId, DomainError, DomainResult, Entity, InventoryItemId};

/// Catalog definition of a stocked item.
///
/// Read-only to the reporting engine. `min_stock_level <= max_stock_level` is
/// expected but not enforced here; the catalog treats the thresholds as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub account_id: AccountId,
    pub name: String,
    pub unit: String,
    pub cost_per_unit: f64,
    /// Preferred vendor; empty when none is set.
    pub vendor: String,
    pub min_stock_level: f64,
    pub max_stock_level: f64,
    pub category_id: Option<CategoryId>,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        account_id: AccountId,
        name: impl Into<String>,
        cost_per_unit: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        ensure_non_negative("cost_per_unit", cost_per_unit)?;

        Ok(Self {
            id,
            account_id,
            name,
            unit: String::new(),
            cost_per_unit,
            vendor: String::new(),
            min_stock_level: 0.0,
            max_stock_level: 0.0,
            category_id: None,
        })
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_stock_levels(mut self, min: f64, max: f64) -> DomainResult<Self> {
        ensure_non_negative("min_stock_level", min)?;
        ensure_non_negative("max_stock_level", max)?;
        self.min_stock_level = min;
        self.max_stock_level = max;
        Ok(self)
    }
}

fn ensure_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a finite non-negative number"
        )));
    }
    Ok(())
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AccountScoped for InventoryItem {
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item() -> InventoryItem {
        InventoryItem::new(InventoryItemId::new(1), AccountId::new(7), "Oat milk", 2.5).unwrap()
    }

    #[test]
    fn new_item_has_no_thresholds_or_vendor() {
        let item = item();
        assert_eq!(item.vendor, "");
        assert_eq!(item.category_id, None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = InventoryItem::new(InventoryItemId::new(1), AccountId::new(7), "  ", 1.0).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn negative_thresholds_are_rejected() {
        let err = item().with_stock_levels(-1.0, 10.0).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("min_stock_level")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn min_above_max_is_accepted_as_given() {
        let item = item().with_stock_levels(20.0, 5.0).unwrap();
        assert_eq!(item.min_stock_level, 20.0);
        assert_eq!(item.max_stock_level, 5.0);
    }

    proptest! {
        #[test]
        fn any_finite_non_negative_cost_is_accepted(cost in 0.0f64..1_000_000.0) {
            let item = InventoryItem::new(InventoryItemId::new(1), AccountId::new(1), "Beans", cost);
            prop_assert!(item.is_ok());
        }

        #[test]
        fn any_negative_cost_is_rejected(cost in -1_000_000.0f64..-0.0001) {
            let item = InventoryItem::new(InventoryItemId::new(1), AccountId::new(1), "Beans", cost);
            prop_assert!(item.is_err());
        }
    }
}
