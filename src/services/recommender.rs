use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::models::{Item, Rating, Strategy, User};

/// All known ratings keyed by user, then by item.
///
/// Rebuilt from the rating snapshot on every request; the inner map is
/// ordered so that a user's rating vector can be derived by ascending
/// item id without an extra sort.
pub type RatingMatrix = HashMap<Uuid, BTreeMap<Uuid, f64>>;

/// A single recommendation produced by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub item: Item,
    pub score: f64,
    pub strategy: Strategy,
}

/// Hybrid recommender combining collaborative filtering, content-based
/// matching, and a popularity fallback.
///
/// The engine holds no state of its own: it borrows a snapshot of the
/// catalog and the ratings and recomputes everything per call, so
/// concurrent requests never share mutable data.
pub struct RecommenderEngine<'a> {
    items: &'a HashMap<Uuid, Item>,
    ratings: &'a [Rating],
}

impl<'a> RecommenderEngine<'a> {
    /// Creates an engine over a snapshot of the catalog and all ratings
    pub fn new(items: &'a HashMap<Uuid, Item>, ratings: &'a [Rating]) -> Self {
        Self { items, ratings }
    }

    /// Produces the final ranked recommendation list for a user.
    ///
    /// Collaborative and content scores are merged additively: an item
    /// surfaced by both signals gets the sum of its scores and the
    /// `hybrid` label. When neither signal yields anything the whole
    /// result is replaced by the popularity ranking. Items the user has
    /// already rated never appear, and the list never exceeds `top_k`.
    pub fn recommend(&self, user: &User, top_k: usize) -> Vec<Recommendation> {
        let collaborative = self.collaborative_filtering(user.id, top_k);
        let content = self.content_based(user, top_k);

        let mut combined: BTreeMap<Uuid, (f64, Strategy)> = BTreeMap::new();
        for (item_id, score) in collaborative {
            combined.insert(item_id, (score, Strategy::Collaborative));
        }
        for (item_id, score) in content {
            match combined.get_mut(&item_id) {
                Some(entry) => {
                    entry.0 += score;
                    entry.1 = Strategy::Hybrid;
                }
                None => {
                    combined.insert(item_id, (score, Strategy::Content));
                }
            }
        }

        // Total fallback: no personalized signal at all, rank everything
        // the user hasn't touched by mean historical rating.
        if combined.is_empty() {
            let rated = self.rated_item_ids(user.id);
            combined = self
                .items
                .values()
                .filter(|item| !rated.contains(&item.id))
                .map(|item| (item.id, (self.popularity_score(item.id), Strategy::Popular)))
                .collect();
        }

        let mut ranked: Vec<(Uuid, f64, Strategy)> = combined
            .into_iter()
            .map(|(item_id, (score, strategy))| (item_id, score, strategy))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);

        // Resolve ids to full items, dropping anything deleted since the
        // snapshot was taken rather than failing the request.
        ranked
            .into_iter()
            .filter_map(|(item_id, score, strategy)| {
                self.items.get(&item_id).map(|item| Recommendation {
                    item: item.clone(),
                    score,
                    strategy,
                })
            })
            .collect()
    }

    /// Scores unrated items by similarity-weighted neighbor ratings.
    ///
    /// Every neighbor with strictly positive cosine similarity to the
    /// target contributes `similarity * score` for each item the target
    /// has not rated; contributions are summed, not averaged, so items
    /// liked by many similar users outrank items liked by one.
    pub fn collaborative_filtering(&self, user_id: Uuid, top_k: usize) -> Vec<(Uuid, f64)> {
        let matrix = self.rating_matrix();
        let target_ratings = match matrix.get(&user_id) {
            Some(ratings) if !ratings.is_empty() => ratings,
            _ => return Vec::new(),
        };

        let target_vector = vector_from_ratings(target_ratings);
        let mut similarities: Vec<(Uuid, f64)> = Vec::new();
        for (other_user, other_ratings) in &matrix {
            if *other_user == user_id || other_ratings.is_empty() {
                continue;
            }
            let score = cosine_similarity(&target_vector, &vector_from_ratings(other_ratings));
            if score > 0.0 {
                similarities.push((*other_user, score));
            }
        }
        if similarities.is_empty() {
            return Vec::new();
        }

        let mut accumulated: BTreeMap<Uuid, f64> = BTreeMap::new();
        for (other_user, similarity) in &similarities {
            for (item_id, score) in &matrix[other_user] {
                if target_ratings.contains_key(item_id) {
                    continue;
                }
                *accumulated.entry(*item_id).or_insert(0.0) += similarity * score;
            }
        }

        let mut ranked: Vec<(Uuid, f64)> = accumulated.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);
        ranked
    }

    /// Scores unrated items by tag overlap against the user's aggregated
    /// tag set. The score is the fraction of the user's interests the
    /// item covers, with the user's set size as the denominator.
    pub fn content_based(&self, user: &User, top_k: usize) -> Vec<(Uuid, f64)> {
        let user_tags = self.user_tag_profile(user);
        if user_tags.is_empty() {
            return Vec::new();
        }
        let rated = self.rated_item_ids(user.id);

        let mut catalog: Vec<&Item> = self.items.values().collect();
        catalog.sort_by_key(|item| item.id);

        let mut scored: Vec<(Uuid, f64)> = Vec::new();
        for item in catalog {
            if rated.contains(&item.id) {
                continue;
            }
            let overlap = item
                .tag_tokens()
                .intersection(&user_tags)
                .count();
            if overlap > 0 {
                scored.push((item.id, overlap as f64 / user_tags.len() as f64));
            }
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Mean historical rating for an item, 0.0 if nobody has rated it
    pub fn popularity_score(&self, item_id: Uuid) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for rating in self.ratings.iter().filter(|r| r.item_id == item_id) {
            total += rating.score;
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Union of the user's explicit preference tags and the tokenized
    /// tags of every item the user has rated. Explicit tags are taken
    /// verbatim; only item tag strings go through tokenization.
    pub fn user_tag_profile(&self, user: &User) -> HashSet<String> {
        let mut profile: HashSet<String> = user.preferences.iter().cloned().collect();
        for rating in self.ratings.iter().filter(|r| r.user_id == user.id) {
            if let Some(item) = self.items.get(&rating.item_id) {
                profile.extend(item.tag_tokens());
            }
        }
        profile
    }

    fn rating_matrix(&self) -> RatingMatrix {
        let mut matrix: RatingMatrix = HashMap::new();
        for rating in self.ratings {
            matrix
                .entry(rating.user_id)
                .or_default()
                .insert(rating.item_id, rating.score);
        }
        matrix
    }

    fn rated_item_ids(&self, user_id: Uuid) -> HashSet<Uuid> {
        self.ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.item_id)
            .collect()
    }
}

/// Derives a user's rating vector: scores ordered by ascending item id,
/// scaled to unit length. A zero-norm vector is returned as-is.
fn vector_from_ratings(ratings: &BTreeMap<Uuid, f64>) -> Vec<f64> {
    let vector: Vec<f64> = ratings.values().copied().collect();
    let norm = euclidean_norm(&vector);
    if norm > 0.0 {
        vector.into_iter().map(|v| v / norm).collect()
    } else {
        vector
    }
}

/// Cosine similarity over two rating vectors.
///
/// The vectors are compared position-wise after truncating to the shorter
/// length; they are NOT aligned by shared item identity. Two users who
/// rated completely disjoint items can therefore still score high if
/// their score patterns line up rank-by-rank. This matches the shipped
/// scoring behavior and is pinned down by tests; changing it to per-item
/// alignment is a product decision, not a refactor.
pub fn cosine_similarity(vec_a: &[f64], vec_b: &[f64]) -> f64 {
    if vec_a.is_empty() || vec_b.is_empty() {
        return 0.0;
    }
    let min_len = vec_a.len().min(vec_b.len());
    let (vec_a, vec_b) = (&vec_a[..min_len], &vec_b[..min_len]);
    let numerator: f64 = vec_a.iter().zip(vec_b).map(|(a, b)| a * b).sum();
    let denominator = euclidean_norm(vec_a) * euclidean_norm(vec_b);
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn euclidean_norm(vector: &[f64]) -> f64 {
    vector.iter().map(|v| v * v).sum::<f64>().sqrt()
}
