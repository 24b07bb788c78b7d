pub mod recommender;

pub use recommender::{recommend, recommend_from_tables, RecommendOptions};
