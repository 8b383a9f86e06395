use crate::api::AppState;
use crate::models::Item;

/// Starter catalog inserted on first boot: (title, description, category, tags)
const SEED_ITEMS: &[(&str, &str, &str, &str)] = &[
    (
        "The Pragmatic Programmer",
        "A classic guide to pragmatic software craftsmanship.",
        "Books",
        "software,programming,career",
    ),
    (
        "Clean Code",
        "Best practices for writing clean, maintainable code.",
        "Books",
        "software,engineering,craftsmanship",
    ),
    (
        "Inception",
        "A mind-bending science fiction thriller by Christopher Nolan.",
        "Movies",
        "science fiction,dreams,thriller",
    ),
    (
        "Interstellar",
        "Exploring space and time to save humanity.",
        "Movies",
        "science fiction,space,drama",
    ),
    (
        "The Alchemist",
        "A philosophical tale about following one's dreams.",
        "Books",
        "fiction,philosophy,inspiration",
    ),
    (
        "Noise Cancelling Headphones",
        "Premium over-ear headphones with adaptive noise cancellation.",
        "Products",
        "audio,electronics,comfort",
    ),
    (
        "Smart Fitness Watch",
        "Track your workouts, sleep, and health metrics.",
        "Products",
        "fitness,wearable,health",
    ),
    (
        "Parasite",
        "Academy Award-winning social thriller from South Korea.",
        "Movies",
        "thriller,drama,international",
    ),
    (
        "Atomic Habits",
        "Build good habits and break bad ones with science-backed advice.",
        "Books",
        "productivity,self-help,psychology",
    ),
    (
        "Ergonomic Office Chair",
        "Comfortable office chair with lumbar support.",
        "Products",
        "office,comfort,health",
    ),
];

/// Seeds the demo catalog if the store is empty. Idempotent.
pub async fn seed_catalog(state: &AppState) {
    let mut inner = state.inner.write().await;
    if !inner.items.is_empty() {
        return;
    }
    for (title, description, category, tags) in SEED_ITEMS {
        let item = Item::new(
            title.to_string(),
            Some(description.to_string()),
            Some(category.to_string()),
            Some(tags.to_string()),
        );
        inner.items.insert(item.id, item);
    }
    tracing::info!(item_count = SEED_ITEMS.len(), "Seeded catalog");
}
