use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use catalog_core::categories as core_categories;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
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
    #[schema(value_type = String, example = "129.90")]
    pub total_revenue: Decimal,
    pub last_order_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_categories::Category> for Category {
    fn from(c: core_categories::Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            description: c.description,
            slug: c.slug,
            image_url: c.image_url,
            image_id: c.image_id,
            meta_title: c.meta_title,
            meta_keywords: c.meta_keywords,
            sort_order: c.sort_order,
            active: c.active,
            is_popular: c.is_popular,
            view_count: c.view_count,
            cart_add_count: c.cart_add_count,
            order_count: c.order_count,
            last_week_order_count: c.last_week_order_count,
            last_month_order_count: c.last_month_order_count,
            total_revenue: c.total_revenue,
            last_order_date: c.last_order_date,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShort {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<core_categories::CategoryShort> for CategoryShort {
    fn from(c: core_categories::CategoryShort) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Category with its parent and direct subcategories.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    #[serde(flatten)]
    pub category: Category,
    pub parent: Option<CategoryShort>,
    pub subcategories: Vec<CategoryShort>,
}

impl From<core_categories::CategoryDetails> for CategoryDetails {
    fn from(d: core_categories::CategoryDetails) -> Self {
        Self {
            category: d.category.into(),
            parent: d.parent.map(Into::into),
            subcategories: d.subcategories.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
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

impl From<core_categories::CategoryListItem> for CategoryListItem {
    fn from(c: core_categories::CategoryListItem) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            image_url: c.image_url,
            slug: c.slug,
            is_popular: c.is_popular,
            sort_order: c.sort_order,
            active: c.active,
            has_subcategories: c.has_subcategories,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryTreeNode>,
}

impl From<core_categories::CategoryTreeNode> for CategoryTreeNode {
    fn from(n: core_categories::CategoryTreeNode) -> Self {
        Self {
            id: n.id,
            name: n.name,
            slug: n.slug,
            children: n.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PopularCategory {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub slug: String,
    pub popularity_score: i64,
}

impl From<core_categories::PopularCategory> for PopularCategory {
    fn from(p: core_categories::PopularCategory) -> Self {
        Self {
            id: p.id,
            name: p.name,
            image_url: p.image_url,
            slug: p.slug,
            popularity_score: p.popularity_score,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Body of create and update requests.
///
/// Updates replace every descriptive field; an absent `parentId` moves the
/// category to the root level.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
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

impl From<CategoryInput> for core_categories::NewCategory {
    fn from(i: CategoryInput) -> Self {
        Self {
            name: i.name,
            description: i.description,
            slug: i.slug,
            parent_id: i.parent_id,
            sort_order: i.sort_order,
            active: i.active,
            meta_title: i.meta_title,
            meta_keywords: i.meta_keywords,
        }
    }
}

impl From<CategoryInput> for core_categories::CategoryUpdate {
    fn from(i: CategoryInput) -> Self {
        Self {
            name: i.name,
            description: i.description,
            slug: i.slug,
            parent_id: i.parent_id,
            sort_order: i.sort_order,
            active: i.active,
            meta_title: i.meta_title,
            meta_keywords: i.meta_keywords,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[schema(value_type = String, example = "19.99")]
    pub revenue: Decimal,
}

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct LevelQuery {
    pub level: i32,
}

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct PopularFlagQuery {
    pub popular: bool,
}
