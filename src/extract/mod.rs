//! Building the [`Extraction`](crate::model::Extraction) from a document.

mod normalizer;
mod options;
mod selector;

pub use normalizer::Normalizer;
pub use options::ExtractOptions;
pub use selector::{select_pages, PageSelection};
