//! Document model types for extracted PDF content.
//!
//! This module defines the intermediate representation (IR) that bridges
//! document extraction and output rendering. Every renderer reads the same
//! [`Extraction`] and none of them modifies it.

mod document;
mod form;
mod page;
mod table;

pub use document::{Extraction, Metadata};
pub use form::FormField;
pub use page::PageRecord;
pub use table::{cell_text, Cell, Table};
