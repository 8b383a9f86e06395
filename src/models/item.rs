use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::tags;

/// A catalog entry that can be rated and recommended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier for the item
    pub id: Uuid,
    /// Display title
    pub title: String,
    pub description: Option<String>,
    /// Coarse grouping such as "Books" or "Movies"
    pub category: Option<String>,
    /// Comma-delimited free-text tags, e.g. "fiction,philosophy"
    pub tags: Option<String>,
}

impl Item {
    /// Creates a new catalog item
    pub fn new(
        title: String,
        description: Option<String>,
        category: Option<String>,
        tags: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            category,
            tags,
        }
    }

    /// The item's tags as a normalized token set
    pub fn tag_tokens(&self) -> HashSet<String> {
        tags::tokenize(self.tags.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item() {
        let item = Item::new(
            "Inception".to_string(),
            None,
            Some("Movies".to_string()),
            Some("science fiction,dreams".to_string()),
        );
        assert_eq!(item.title, "Inception");
        assert_eq!(item.category.as_deref(), Some("Movies"));
    }

    #[test]
    fn test_tag_tokens() {
        let item = Item::new(
            "Inception".to_string(),
            None,
            None,
            Some("Science Fiction, Dreams".to_string()),
        );
        let tokens = item.tag_tokens();
        assert!(tokens.contains("science fiction"));
        assert!(tokens.contains("dreams"));
    }

    #[test]
    fn test_tag_tokens_without_tags() {
        let item = Item::new("Untitled".to_string(), None, None, None);
        assert!(item.tag_tokens().is_empty());
    }
}
