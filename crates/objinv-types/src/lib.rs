//! Foundation types for object inventories.
//!
//! An inventory maps documentation objects (modules, functions, glossary
//! terms...) to the location where a project documents them, so that another
//! documentation set can link to them.
//!
//! # Key Types
//!
//! - [`ObjectType`] — `domain:role` key such as `py:module` or `std:term`
//! - [`Entry`] — where one object lives and how to label it
//! - [`InventoryTable`] — two-level, insertion-ordered map of type → name → entry

pub mod entry;
pub mod error;
pub mod object_type;
pub mod table;

pub use entry::{Entry, LEGACY_PRIORITY, NO_DISPLAY_NAME};
pub use error::TypeError;
pub use object_type::ObjectType;
pub use table::{InventoryTable, TypeEntries};
