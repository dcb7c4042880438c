//! Database models for categories.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::categories::Category;

/// Parses a decimal stored as TEXT, logging and falling back to zero.
fn text_to_decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|e| {
        error!("Failed to parse stored decimal '{}': {}", s, e);
        Decimal::ZERO
    })
}

/// Database model for categories
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CategoryDB {
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
    pub total_revenue: String, // Schema uses Text
    pub last_order_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Descriptive columns written by an update. Counters and the popular flag
/// have their own statements.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChangesetDB {
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
    pub updated_at: NaiveDateTime,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            total_revenue: text_to_decimal(&db.total_revenue),
            id: db.id,
            parent_id: db.parent_id,
            name: db.name,
            description: db.description,
            slug: db.slug,
            image_url: db.image_url,
            image_id: db.image_id,
            meta_title: db.meta_title,
            meta_keywords: db.meta_keywords,
            sort_order: db.sort_order,
            active: db.active,
            is_popular: db.is_popular,
            view_count: db.view_count,
            cart_add_count: db.cart_add_count,
            order_count: db.order_count,
            last_week_order_count: db.last_week_order_count,
            last_month_order_count: db.last_month_order_count,
            last_order_date: db.last_order_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Category> for CategoryDB {
    fn from(domain: Category) -> Self {
        Self {
            total_revenue: domain.total_revenue.to_string(),
            id: domain.id,
            parent_id: domain.parent_id,
            name: domain.name,
            description: domain.description,
            slug: domain.slug,
            image_url: domain.image_url,
            image_id: domain.image_id,
            meta_title: domain.meta_title,
            meta_keywords: domain.meta_keywords,
            sort_order: domain.sort_order,
            active: domain.active,
            is_popular: domain.is_popular,
            view_count: domain.view_count,
            cart_add_count: domain.cart_add_count,
            order_count: domain.order_count,
            last_week_order_count: domain.last_week_order_count,
            last_month_order_count: domain.last_month_order_count,
            last_order_date: domain.last_order_date,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<Category> for CategoryChangesetDB {
    fn from(domain: Category) -> Self {
        Self {
            parent_id: domain.parent_id,
            name: domain.name,
            description: domain.description,
            slug: domain.slug,
            image_url: domain.image_url,
            image_id: domain.image_id,
            meta_title: domain.meta_title,
            meta_keywords: domain.meta_keywords,
            sort_order: domain.sort_order,
            active: domain.active,
            updated_at: domain.updated_at,
        }
    }
}
