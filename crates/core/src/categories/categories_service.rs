//! Category service implementation.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::constants::MAX_SLUG_SUFFIX_ATTEMPTS;
use crate::errors::{CategoryError, ValidationError};
use crate::images::{ImageStoreTrait, ImageUpload, StoredImage};
use crate::Result;

use super::{
    is_url_safe, rank_by_popularity, slug_for_name, with_random_suffix, with_suffix, Category,
    CategoryCounter, CategoryDetails, CategoryForest, CategoryListItem, CategoryRepositoryTrait,
    CategoryServiceTrait, CategoryShort, CategoryTreeNode, CategoryUpdate, NewCategory,
    PopularCategory,
};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
    image_store: Arc<dyn ImageStoreTrait>,
}

impl CategoryService {
    pub fn new(
        repository: Arc<dyn CategoryRepositoryTrait>,
        image_store: Arc<dyn ImageStoreTrait>,
    ) -> Self {
        Self {
            repository,
            image_store,
        }
    }

    fn require_category(&self, id: &str) -> Result<Category> {
        self.repository
            .get_category(id)?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()).into())
    }

    fn snapshot(&self) -> Result<CategoryForest> {
        Ok(CategoryForest::new(self.repository.get_all_categories()?))
    }

    fn validate_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(name.to_string())
    }

    /// Uses the requested slug when present, otherwise derives a free one
    /// from `name`.
    fn resolve_slug(
        &self,
        requested: Option<&str>,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<String> {
        if let Some(slug) = requested.map(str::trim).filter(|s| !s.is_empty()) {
            if !is_url_safe(slug) {
                return Err(ValidationError::InvalidInput(format!(
                    "Slug '{}' may only contain lowercase letters, digits, '-' and '_'",
                    slug
                ))
                .into());
            }
            if self.repository.slug_exists(slug, exclude_id)? {
                return Err(CategoryError::DuplicateSlug(slug.to_string()).into());
            }
            return Ok(slug.to_string());
        }

        let base = slug_for_name(name);
        if !self.repository.slug_exists(&base, exclude_id)? {
            return Ok(base);
        }
        for n in 2..=MAX_SLUG_SUFFIX_ATTEMPTS {
            let candidate = with_suffix(&base, n);
            if !self.repository.slug_exists(&candidate, exclude_id)? {
                debug!("Slug '{}' taken, using '{}'", base, candidate);
                return Ok(candidate);
            }
        }
        let candidate = with_random_suffix(&base);
        if self.repository.slug_exists(&candidate, exclude_id)? {
            return Err(CategoryError::DuplicateSlug(candidate).into());
        }
        debug!("Slug '{}' crowded, using '{}'", base, candidate);
        Ok(candidate)
    }

    fn to_details(&self, category: Category) -> Result<CategoryDetails> {
        let parent = match category.parent_id.as_deref() {
            Some(parent_id) => self
                .repository
                .get_category(parent_id)?
                .map(|p| CategoryShort::from(&p)),
            None => None,
        };
        let subcategories = self
            .repository
            .get_subcategories(&category.id)?
            .iter()
            .map(CategoryShort::from)
            .collect();

        Ok(CategoryDetails {
            category,
            parent,
            subcategories,
        })
    }

    fn to_list_items(&self, categories: &[Category]) -> Result<Vec<CategoryListItem>> {
        let parent_ids = self.repository.get_parent_ids()?;
        Ok(categories
            .iter()
            .map(|c| CategoryListItem::new(c, parent_ids.contains(&c.id)))
            .collect())
    }

    fn forest_list_items(forest: &CategoryForest, categories: &[&Category]) -> Vec<CategoryListItem> {
        categories
            .iter()
            .map(|c| CategoryListItem::new(c, forest.has_children(&c.id)))
            .collect()
    }

    async fn store_image(&self, image: Option<ImageUpload>) -> Result<Option<StoredImage>> {
        match image {
            Some(upload) if !upload.is_empty() => Ok(Some(self.image_store.upload(upload).await?)),
            _ => Ok(None),
        }
    }

    /// Deletes an image that no row points at any more. Failures only leave an
    /// orphaned file behind, so they are logged.
    async fn release_image(&self, image_id: &str, category_id: &str) {
        match self.image_store.delete(image_id).await {
            Ok(true) => debug!("Released image {} of category {}", image_id, category_id),
            Ok(false) => debug!("Image {} of category {} was already gone", image_id, category_id),
            Err(e) => warn!(
                "Failed to delete image {} of category {}: {}",
                image_id, category_id, e
            ),
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(
        &self,
        new_category: NewCategory,
        image: Option<ImageUpload>,
    ) -> Result<Category> {
        let name = Self::validate_name(&new_category.name)?;
        let slug = self.resolve_slug(new_category.slug.as_deref(), &name, None)?;

        if let Some(parent_id) = new_category.parent_id.as_deref() {
            self.require_category(parent_id)?;
        }

        let stored = self.store_image(image).await?;
        let uploaded_id = stored.as_ref().map(|s| s.image_id.clone());
        let now = Utc::now().naive_utc();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            parent_id: new_category.parent_id,
            name,
            description: new_category.description,
            slug,
            image_url: stored.as_ref().map(|s| s.url.clone()),
            image_id: stored.map(|s| s.image_id),
            meta_title: new_category.meta_title,
            meta_keywords: new_category.meta_keywords,
            sort_order: new_category.sort_order,
            active: new_category.active,
            is_popular: false,
            view_count: 0,
            cart_add_count: 0,
            order_count: 0,
            last_week_order_count: 0,
            last_month_order_count: 0,
            total_revenue: Decimal::ZERO,
            last_order_date: None,
            created_at: now,
            updated_at: now,
        };

        let category_id = category.id.clone();
        match self.repository.create_category(category).await {
            Ok(created) => {
                info!("Created category {} ({})", created.id, created.slug);
                Ok(created)
            }
            Err(e) => {
                if let Some(image_id) = uploaded_id.as_deref() {
                    self.release_image(image_id, &category_id).await;
                }
                Err(e)
            }
        }
    }

    async fn update_category(
        &self,
        id: &str,
        update: CategoryUpdate,
        image: Option<ImageUpload>,
    ) -> Result<Category> {
        let existing = self.require_category(id)?;
        let name = Self::validate_name(&update.name)?;
        let slug = self.resolve_slug(update.slug.as_deref(), &name, Some(id))?;

        self.snapshot()?
            .validate_parent(id, update.parent_id.as_deref())?;

        // The new image is stored before the row changes and the old one is
        // released only after the row no longer references it.
        let stored = self.store_image(image).await?;
        let previous_image = existing.image_id.clone();
        let (image_url, image_id) = match &stored {
            Some(s) => (Some(s.url.clone()), Some(s.image_id.clone())),
            None => (existing.image_url.clone(), existing.image_id.clone()),
        };

        let updated = Category {
            parent_id: update.parent_id,
            name,
            description: update.description,
            slug,
            image_url,
            image_id,
            meta_title: update.meta_title,
            meta_keywords: update.meta_keywords,
            sort_order: update.sort_order,
            active: update.active,
            updated_at: Utc::now().naive_utc(),
            ..existing
        };

        match self.repository.update_category(updated).await {
            Ok(saved) => {
                if let (Some(_), Some(old_id)) = (&stored, previous_image.as_deref()) {
                    self.release_image(old_id, id).await;
                }
                Ok(saved)
            }
            Err(e) => {
                if let Some(new_image) = &stored {
                    self.release_image(&new_image.image_id, id).await;
                }
                Err(e)
            }
        }
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        let category = self.require_category(id)?;
        if !self.repository.get_subcategories(id)?.is_empty() {
            return Err(CategoryError::HasChildren(id.to_string()).into());
        }

        self.repository.delete_category(id).await?;
        info!("Deleted category {}", id);

        if let Some(image_id) = category.image_id.as_deref() {
            self.release_image(image_id, id).await;
        }
        Ok(())
    }

    fn get_category(&self, id: &str) -> Result<CategoryDetails> {
        let category = self.require_category(id)?;
        self.to_details(category)
    }

    fn get_category_by_slug(&self, slug: &str) -> Result<CategoryDetails> {
        let category = self
            .repository
            .get_category_by_slug(slug)?
            .ok_or_else(|| CategoryError::NotFound(slug.to_string()))?;
        self.to_details(category)
    }

    fn get_root_categories(&self) -> Result<Vec<CategoryListItem>> {
        let roots = self.repository.get_root_categories()?;
        self.to_list_items(&roots)
    }

    fn get_subcategories(&self, parent_id: &str) -> Result<Vec<CategoryListItem>> {
        let children = self.repository.get_subcategories(parent_id)?;
        self.to_list_items(&children)
    }

    fn get_breadcrumbs(&self, id: &str) -> Result<Vec<CategoryListItem>> {
        let forest = self.snapshot()?;
        let path = forest.breadcrumbs(id)?;
        Ok(Self::forest_list_items(&forest, &path))
    }

    fn get_categories_by_level(&self, level: i32) -> Result<Vec<CategoryListItem>> {
        let forest = self.snapshot()?;
        let categories = forest.at_level(level)?;
        Ok(Self::forest_list_items(&forest, &categories))
    }

    fn get_category_tree(&self) -> Result<Vec<CategoryTreeNode>> {
        Ok(self.snapshot()?.materialize()?)
    }

    fn get_category_short_info(&self, id: &str) -> Result<CategoryListItem> {
        let category = self.require_category(id)?;
        let has_subcategories = !self.repository.get_subcategories(id)?.is_empty();
        Ok(CategoryListItem::new(&category, has_subcategories))
    }

    fn search_categories(&self, query: &str) -> Result<Vec<CategoryListItem>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let matches = self.repository.search_categories(query)?;
        self.to_list_items(&matches)
    }

    fn get_popular_categories(&self, limit: usize) -> Result<Vec<PopularCategory>> {
        let flagged = self.repository.get_popular_flagged()?;
        let candidates = if flagged.is_empty() {
            self.repository.get_active_categories()?
        } else {
            flagged
        };

        Ok(rank_by_popularity(candidates, limit)
            .iter()
            .map(PopularCategory::from)
            .collect())
    }

    fn get_categories_count(&self) -> Result<i64> {
        self.repository.count_categories()
    }

    async fn increment_view_count(&self, id: &str) -> Result<()> {
        self.repository
            .increment_counter(id, CategoryCounter::View)
            .await
    }

    async fn increment_cart_add_count(&self, id: &str) -> Result<()> {
        self.repository
            .increment_counter(id, CategoryCounter::CartAdd)
            .await
    }

    async fn increment_order_count(&self, id: &str, revenue: Decimal) -> Result<()> {
        if revenue < Decimal::ZERO {
            return Err(CategoryError::InvalidArgument(format!(
                "Order revenue must not be negative, got {}",
                revenue
            ))
            .into());
        }
        self.repository
            .record_order(id, revenue, Utc::now().naive_utc())
            .await
    }

    async fn update_popular_status(&self, id: &str, is_popular: bool) -> Result<()> {
        self.repository.set_popular(id, is_popular).await?;
        debug!("Category {} popular flag set to {}", id, is_popular);
        Ok(())
    }
}
