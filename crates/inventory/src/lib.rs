//! Inventory domain records.
//!
//! Plain data owned by the catalog, snapshot and delivery collaborators.
//! Nothing here performs IO; constructors only validate field values.

pub mod delivery;
pub mod directory;
pub mod item;
pub mod snapshot;

pub use delivery::Delivery;
pub use directory::{Account, Category, Organization, User};
pub use item::InventoryItem;
pub use snapshot::InventorySnapshot;
