pub mod curation;
pub mod filters;

pub use filters::{filter_articles, is_valid_url, load_articles};
