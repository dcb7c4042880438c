//! Domain models for catalog categories.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A node in the product taxonomy forest.
///
/// The hierarchy is expressed only through `parent_id`; subcategories are
/// always derived by looking up categories that point at this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub image_url: Option<String>,
    pub image_id: Option<String>,
    pub meta_title: Option<String>,
    pub meta_keywords: Option<String>,
    pub sort_order: i32,
    pub active: bool,
    pub is_popular: bool,
    pub view_count: i64,
    pub cart_add_count: i64,
    pub order_count: i64,
    pub last_week_order_count: i64,
    pub last_month_order_count: i64,
    pub total_revenue: Decimal,
    pub last_order_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_active() -> bool {
    true
}

/// Data for creating a new category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Derived from `name` when absent or empty.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
}

/// Replacement values for an existing category.
///
/// `parent_id: None` turns the category into a root. Counters and the
/// popularity flag are never touched by an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
}

/// Counters that move by one on a single external event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCounter {
    View,
    CartAdd,
}

/// Minimal reference to a category (parent / subcategory links).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShort {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryShort {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Category as shown in listings, breadcrumbs and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub slug: String,
    pub is_popular: bool,
    pub sort_order: i32,
    pub active: bool,
    pub has_subcategories: bool,
}

impl CategoryListItem {
    pub fn new(category: &Category, has_subcategories: bool) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
            slug: category.slug.clone(),
            is_popular: category.is_popular,
            sort_order: category.sort_order,
            active: category.active,
            has_subcategories,
        }
    }
}

/// Full category view with its direct neighbours in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    #[serde(flatten)]
    pub category: Category,
    pub parent: Option<CategoryShort>,
    pub subcategories: Vec<CategoryShort>,
}

/// One node of the materialized category forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryTreeNode>,
}

/// Category ranked for the "popular" shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularCategory {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub slug: String,
    pub popularity_score: i64,
}

impl From<&Category> for PopularCategory {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            image_url: category.image_url.clone(),
            slug: category.slug.clone(),
            popularity_score: category.popularity_score(),
        }
    }
}
