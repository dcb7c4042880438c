//! Popularity scoring for categories.

use crate::constants::{CART_ADD_WEIGHT, ORDER_WEIGHT, VIEW_WEIGHT};

use super::Category;

/// Weighted engagement score: views count once, cart adds three times,
/// orders five times.
pub fn popularity_score(view_count: i64, cart_add_count: i64, order_count: i64) -> i64 {
    view_count
        .saturating_mul(VIEW_WEIGHT)
        .saturating_add(cart_add_count.saturating_mul(CART_ADD_WEIGHT))
        .saturating_add(order_count.saturating_mul(ORDER_WEIGHT))
}

impl Category {
    pub fn popularity_score(&self) -> i64 {
        popularity_score(self.view_count, self.cart_add_count, self.order_count)
    }
}

/// Orders categories by descending score, ties broken by name, and keeps
/// the first `limit`.
pub fn rank_by_popularity(mut categories: Vec<Category>, limit: usize) -> Vec<Category> {
    categories.sort_by(|a, b| {
        b.popularity_score()
            .cmp(&a.popularity_score())
            .then_with(|| a.name.cmp(&b.name))
    });
    categories.truncate(limit);
    categories
}
