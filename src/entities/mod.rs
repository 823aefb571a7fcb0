// Entity Models
//
// Closed tags (category, badge) and the catalog entry record they describe.

pub mod badge;
pub mod catalog_entry;
pub mod category;

pub use badge::{BadgePolicy, BadgeTag};
pub use catalog_entry::{listing_fingerprint, CatalogEntry};
pub use category::CategoryTag;
