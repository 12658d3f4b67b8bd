use std::sync::Arc;
use tracing::{ debug, info };

use crate::error::{ AppError, Result };
use crate::models::RatingRecord;
use crate::pool::{ acquire, StorePool };

/// Arithmetic mean of a user's ratings; `None` when there are none
pub fn mean_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    // Ratings are not range checked, so widen before summing
    let sum: i128 = ratings.iter().map(|&r| r as i128).sum();
    Some((sum as f64) / (ratings.len() as f64))
}

/// Maintains at most one rating per (user, book) pair.
///
/// No locking happens here: uniqueness comes from the store's upsert on the
/// composite record id and the unique index on `(userId, bookId)`. Neither
/// operation checks that the user or book exists.
#[derive(Clone)]
pub struct RatingService {
    db_pool: Arc<StorePool>,
}

impl RatingService {
    pub fn new(db_pool: Arc<StorePool>) -> Self {
        Self { db_pool }
    }

    /// Create the rating of `user_id` for `book_id`, or overwrite its value
    pub async fn rate_book(&self, book_id: &str, user_id: &str, rating: i64) -> Result<RatingRecord> {
        let conn = acquire(&self.db_pool).await?;

        let record = conn
            .upsert_rating(user_id, book_id, rating).await?
            .ok_or_else(|| {
                AppError::StoreResult(
                    format!("Upsert returned no rating for {}/{}", user_id, book_id)
                )
            })?;

        info!(user_id, book_id, rating, "Rated book");
        Ok(record)
    }

    /// Remove the rating if there is one. Returns whether a row was removed.
    pub async fn delete_rating(&self, book_id: &str, user_id: &str) -> Result<bool> {
        let conn = acquire(&self.db_pool).await?;
        let deleted = conn.delete_rating(user_id, book_id).await?;

        if deleted {
            info!(user_id, book_id, "Deleted rating");
        } else {
            debug!(user_id, book_id, "No rating to delete");
        }

        Ok(deleted)
    }

    pub async fn average_rating(&self, user_id: &str) -> Result<Option<f64>> {
        let conn = acquire(&self.db_pool).await?;
        let values = conn.rating_values(user_id).await?;
        Ok(mean_rating(&values))
    }
}
