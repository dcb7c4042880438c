//! Traits for category repository and service.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::images::ImageUpload;
use crate::Result;

use super::{
    Category, CategoryCounter, CategoryDetails, CategoryListItem, CategoryTreeNode,
    CategoryUpdate, NewCategory, PopularCategory,
};

/// Repository trait for category persistence operations.
///
/// Listing methods return categories ordered by `(sort_order, name)` unless
/// stated otherwise.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn get_category(&self, id: &str) -> Result<Option<Category>>;
    fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    fn get_root_categories(&self) -> Result<Vec<Category>>;
    fn get_subcategories(&self, parent_id: &str) -> Result<Vec<Category>>;
    fn get_all_categories(&self) -> Result<Vec<Category>>;
    fn get_active_categories(&self) -> Result<Vec<Category>>;
    /// Active categories with the popular flag set.
    fn get_popular_flagged(&self) -> Result<Vec<Category>>;
    /// Ids of every category that has at least one subcategory.
    fn get_parent_ids(&self) -> Result<HashSet<String>>;
    /// Case-insensitive match on name or description, ordered by name.
    fn search_categories(&self, query: &str) -> Result<Vec<Category>>;
    fn slug_exists(&self, slug: &str, exclude_id: Option<&str>) -> Result<bool>;
    fn count_categories(&self) -> Result<i64>;

    async fn create_category(&self, category: Category) -> Result<Category>;
    /// Writes the descriptive fields of `category`, validating its parent
    /// against the stored hierarchy in the same transaction. Counters are
    /// left untouched.
    async fn update_category(&self, category: Category) -> Result<Category>;
    /// Deletes a leaf category. Fails with `HasChildren` otherwise.
    async fn delete_category(&self, id: &str) -> Result<usize>;
    async fn increment_counter(&self, id: &str, counter: CategoryCounter) -> Result<()>;
    async fn record_order(
        &self,
        id: &str,
        revenue: Decimal,
        ordered_at: NaiveDateTime,
    ) -> Result<()>;
    async fn set_popular(&self, id: &str, is_popular: bool) -> Result<()>;
}

/// Service trait for category business logic.
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(
        &self,
        new_category: NewCategory,
        image: Option<ImageUpload>,
    ) -> Result<Category>;
    async fn update_category(
        &self,
        id: &str,
        update: CategoryUpdate,
        image: Option<ImageUpload>,
    ) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<()>;

    fn get_category(&self, id: &str) -> Result<CategoryDetails>;
    fn get_category_by_slug(&self, slug: &str) -> Result<CategoryDetails>;
    fn get_root_categories(&self) -> Result<Vec<CategoryListItem>>;
    fn get_subcategories(&self, parent_id: &str) -> Result<Vec<CategoryListItem>>;
    fn get_breadcrumbs(&self, id: &str) -> Result<Vec<CategoryListItem>>;
    fn get_categories_by_level(&self, level: i32) -> Result<Vec<CategoryListItem>>;
    fn get_category_tree(&self) -> Result<Vec<CategoryTreeNode>>;
    fn get_category_short_info(&self, id: &str) -> Result<CategoryListItem>;
    fn search_categories(&self, query: &str) -> Result<Vec<CategoryListItem>>;
    fn get_popular_categories(&self, limit: usize) -> Result<Vec<PopularCategory>>;
    fn get_categories_count(&self) -> Result<i64>;

    async fn increment_view_count(&self, id: &str) -> Result<()>;
    async fn increment_cart_add_count(&self, id: &str) -> Result<()>;
    async fn increment_order_count(&self, id: &str, revenue: Decimal) -> Result<()>;
    async fn update_popular_status(&self, id: &str, is_popular: bool) -> Result<()>;
}
