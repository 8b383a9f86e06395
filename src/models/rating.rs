use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest and highest score a rating may carry
pub const SCORE_RANGE: (f64, f64) = (0.0, 5.0);

/// One user's score for one item.
///
/// At most one rating exists per (user, item) pair; re-rating overwrites
/// the score in place while keeping the original timestamp and id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Creates a new rating observation
    pub fn new(user_id: Uuid, item_id: Uuid, score: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            item_id,
            score,
            created_at: Utc::now(),
        }
    }
}
