use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which signal produced a recommended item's score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Similarity-weighted neighbor ratings
    Collaborative,
    /// Tag overlap against the user's aggregated interests
    Content,
    /// Both signals contributed; scores were summed
    Hybrid,
    /// Global mean-rating fallback
    Popular,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Strategy::Collaborative => "collaborative",
            Strategy::Content => "content",
            Strategy::Hybrid => "hybrid",
            Strategy::Popular => "popular",
        };
        write!(f, "{}", label)
    }
}

/// Audit record of one recommendation response.
///
/// Captures the top result's strategy and every recommended item id, in
/// ranked order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub strategy: Strategy,
    pub recommended_items: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl RecommendationLog {
    /// Creates a new audit record
    pub fn new(user_id: Uuid, strategy: Strategy, recommended_items: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            strategy,
            recommended_items,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Strategy::Collaborative).unwrap(),
            "\"collaborative\""
        );
        assert_eq!(serde_json::to_string(&Strategy::Hybrid).unwrap(), "\"hybrid\"");
    }

    #[test]
    fn test_strategy_display_matches_serialization() {
        assert_eq!(Strategy::Popular.to_string(), "popular");
        assert_eq!(Strategy::Content.to_string(), "content");
    }

    #[test]
    fn test_new_log_keeps_ranked_order() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let log = RecommendationLog::new(Uuid::new_v4(), Strategy::Popular, ids.clone());
        assert_eq!(log.recommended_items, ids);
    }
}
