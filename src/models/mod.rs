mod item;
mod rating;
mod recommendation;
mod user;

pub use item::Item;
pub use rating::{Rating, SCORE_RANGE};
pub use recommendation::{RecommendationLog, Strategy};
pub use user::User;
