use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Item, Rating, RecommendationLog, Strategy, User};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub config: Arc<Config>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub users: HashMap<Uuid, User>,
    pub items: HashMap<Uuid, Item>,
    pub ratings: Vec<Rating>,
    pub recommendation_logs: Vec<RecommendationLog>,
}

impl AppState {
    /// Creates a new empty application state
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                users: HashMap::new(),
                items: HashMap::new(),
                ratings: Vec::new(),
                recommendation_logs: Vec::new(),
            })),
            config: Arc::new(config),
        }
    }
}

impl AppStateInner {
    /// Looks up a user by email, case-insensitively
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    /// Catalog listing ordered by title
    pub fn items_by_title(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        items
    }

    /// Records a rating, overwriting the score of an existing rating for
    /// the same (user, item) pair
    pub fn upsert_rating(&mut self, user_id: Uuid, item_id: Uuid, score: f64) -> Rating {
        if let Some(existing) = self
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.item_id == item_id)
        {
            existing.score = score;
            return existing.clone();
        }
        let rating = Rating::new(user_id, item_id, score);
        self.ratings.push(rating.clone());
        rating
    }

    /// A user's own ratings, most recent first
    pub fn user_ratings(&self, user_id: Uuid) -> Vec<&Rating> {
        let mut ratings: Vec<&Rating> = self
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ratings
    }

    /// Appends an audit record of a served recommendation response
    pub fn log_recommendations(
        &mut self,
        user_id: Uuid,
        strategy: Strategy,
        recommended_items: Vec<Uuid>,
    ) {
        self.recommendation_logs
            .push(RecommendationLog::new(user_id, strategy, recommended_items));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_inner() -> AppStateInner {
        AppStateInner {
            users: HashMap::new(),
            items: HashMap::new(),
            ratings: Vec::new(),
            recommendation_logs: Vec::new(),
        }
    }

    #[test]
    fn test_user_by_email_is_case_insensitive() {
        let mut inner = empty_inner();
        let user = User::new("Reader@Example.com".to_string(), None, "hash".to_string());
        let id = user.id;
        inner.users.insert(user.id, user);
        assert_eq!(inner.user_by_email("reader@example.com").map(|u| u.id), Some(id));
        assert!(inner.user_by_email("other@example.com").is_none());
    }

    #[test]
    fn test_upsert_rating_overwrites_score() {
        let mut inner = empty_inner();
        let user_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let first = inner.upsert_rating(user_id, item_id, 2.0);
        let second = inner.upsert_rating(user_id, item_id, 4.5);
        assert_eq!(inner.ratings.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(inner.ratings[0].score, 4.5);
    }

    #[test]
    fn test_upsert_rating_distinct_items() {
        let mut inner = empty_inner();
        let user_id = Uuid::new_v4();
        inner.upsert_rating(user_id, Uuid::new_v4(), 3.0);
        inner.upsert_rating(user_id, Uuid::new_v4(), 4.0);
        assert_eq!(inner.ratings.len(), 2);
    }

    #[test]
    fn test_items_by_title_sorted() {
        let mut inner = empty_inner();
        for title in ["Zebra", "Apple", "Mango"] {
            let item = Item::new(title.to_string(), None, None, None);
            inner.items.insert(item.id, item);
        }
        let titles: Vec<&str> = inner
            .items_by_title()
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Apple", "Mango", "Zebra"]);
    }
}
