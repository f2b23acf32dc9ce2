mod health_score;
mod match_policy;

pub use health_score::HealthScorePolicy;
pub use match_policy::{MatchPolicy, DEFAULT_PARTIAL_MATCH_THRESHOLD, TEMPLATE_COMPONENT_COUNT};
