//! Symbol indexing module
//!
//! Holds the class, class-method and free-method indices built from parsed
//! Java files, plus line-to-symbol resolution used by code search.

pub mod index;

pub use index::{Enclosing, Location, SymbolIndex};
