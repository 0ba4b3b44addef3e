//! Reference table loading.
//!
//! Most callers should use [`load_reference_table`] (from [`unified`]), which auto-detects the
//! format by file extension and loads the whole table into an in-memory
//! [`crate::types::ReferenceTable`].
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod unified;

pub use unified::{load_reference_table, TableFormat};
