mod behavior;
mod news;
mod recommendation;

pub use behavior::BehaviorRecord;
pub use news::NewsArticle;
pub use recommendation::{NoResultReason, RecommendationOutcome};
