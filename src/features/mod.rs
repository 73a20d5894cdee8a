pub mod collect;
pub mod deliver;
pub mod post;
pub mod summarize;
