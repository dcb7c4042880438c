//! Categories module - domain models, hierarchy engine, services, and traits.
//!
//! Categories form a forest through an optional parent reference. The
//! [`CategoryForest`] answers hierarchy questions over a snapshot, and the
//! repository re-checks re-parenting inside its write transaction.

mod categories_model;
mod categories_service;
mod categories_traits;
mod category_tree;
mod popularity;
mod slug;

#[cfg(test)]
mod categories_service_tests;

pub use categories_model::{
    Category, CategoryCounter, CategoryDetails, CategoryListItem, CategoryShort,
    CategoryTreeNode, CategoryUpdate, NewCategory, PopularCategory,
};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
pub use category_tree::CategoryForest;
pub use popularity::{popularity_score, rank_by_popularity};
pub use slug::{is_url_safe, slug_for_name, slugify, with_random_suffix, with_suffix};
