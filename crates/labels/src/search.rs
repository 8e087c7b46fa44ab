//! Search queries carried in URL query parameters.

mod params;
mod query;

pub use params::QueryParams;
pub use query::SearchQuery;
