use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account.
///
/// The password hash stays internal; API responses expose users through
/// dedicated response types. `preferences` holds the explicit interest
/// tags the user maintains, stored exactly as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with no preference tags
    pub fn new(email: String, full_name: Option<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            password_hash,
            preferences: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Replaces the explicit preference tag set.
    ///
    /// The submitted list wins wholesale; duplicates are dropped while
    /// first-seen order is kept.
    pub fn set_preferences(&mut self, tags: Vec<String>) {
        let mut seen = std::collections::HashSet::new();
        self.preferences = tags
            .into_iter()
            .filter(|tag| seen.insert(tag.clone()))
            .collect();
    }
}
