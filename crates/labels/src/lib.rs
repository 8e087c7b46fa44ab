//! Label selectors and URL search queries.
//!
//! This crate provides the filtering language used to select scenarios and
//! their run results by label:
//! - Selector parsing, serialization, and matching (`env in (prod,staging),!draft`)
//! - Label sets and the well-known `urth/` label keys
//! - A search-query adapter that carries a selector through URL query parameters

pub mod config;
pub mod error;
pub mod labels;
pub mod search;
pub mod selector;

// Re-export main types
pub use config::{QueryParamNames, SearchQueryConfig};
pub use error::{LabelsError, Result};
pub use labels::{LabelLookup, Labels};
pub use search::{QueryParams, SearchQuery};
pub use selector::{
    matches, parse_expression, parse_selector, stringify, LabelSelector, Operator, Rule, Selector,
};
