#[cfg(test)]
mod tests {
    use crate::categories::*;
    use crate::errors::{CategoryError, Error, Result, ValidationError};
    use crate::images::{ImageStoreTrait, ImageUpload, StoredImage};
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use crate::errors::ImageError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Mock CategoryRepository ---
    #[derive(Clone, Default)]
    struct MockCategoryRepository {
        categories: Arc<Mutex<Vec<Category>>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MockCategoryRepository {
        fn sorted(mut categories: Vec<Category>) -> Vec<Category> {
            categories.sort_by(|a, b| {
                a.sort_order
                    .cmp(&b.sort_order)
                    .then_with(|| a.name.cmp(&b.name))
            });
            categories
        }

        fn filtered(&self, predicate: impl Fn(&Category) -> bool) -> Vec<Category> {
            let categories = self.categories.lock().unwrap();
            Self::sorted(categories.iter().filter(|c| predicate(*c)).cloned().collect())
        }

        fn modify(&self, id: &str, f: impl FnOnce(&mut Category)) -> Result<()> {
            let mut categories = self.categories.lock().unwrap();
            let category = categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;
            f(category);
            Ok(())
        }

        fn check_writable(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Unexpected("storage offline".to_string()));
            }
            Ok(())
        }

        fn snapshot(&self, id: &str) -> Category {
            self.categories
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl CategoryRepositoryTrait for MockCategoryRepository {
        fn get_category(&self, id: &str) -> Result<Option<Category>> {
            Ok(self.filtered(|c| c.id == id).into_iter().next())
        }

        fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
            Ok(self.filtered(|c| c.slug == slug).into_iter().next())
        }

        fn get_root_categories(&self) -> Result<Vec<Category>> {
            Ok(self.filtered(|c| c.parent_id.is_none()))
        }

        fn get_subcategories(&self, parent_id: &str) -> Result<Vec<Category>> {
            Ok(self.filtered(|c| c.parent_id.as_deref() == Some(parent_id)))
        }

        fn get_all_categories(&self) -> Result<Vec<Category>> {
            Ok(self.filtered(|_| true))
        }

        fn get_active_categories(&self) -> Result<Vec<Category>> {
            Ok(self.filtered(|c| c.active))
        }

        fn get_popular_flagged(&self) -> Result<Vec<Category>> {
            Ok(self.filtered(|c| c.active && c.is_popular))
        }

        fn get_parent_ids(&self) -> Result<HashSet<String>> {
            Ok(self
                .categories
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| c.parent_id.clone())
                .collect())
        }

        fn search_categories(&self, query: &str) -> Result<Vec<Category>> {
            let q = query.to_lowercase();
            let mut found = self.filtered(|c| {
                c.name.to_lowercase().contains(&q)
                    || c.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&q))
            });
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        }

        fn slug_exists(&self, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
            Ok(self
                .categories
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.slug == slug && Some(c.id.as_str()) != exclude_id))
        }

        fn count_categories(&self) -> Result<i64> {
            Ok(self.categories.lock().unwrap().len() as i64)
        }

        async fn create_category(&self, category: Category) -> Result<Category> {
            self.check_writable()?;
            self.categories.lock().unwrap().push(category.clone());
            Ok(category)
        }

        async fn update_category(&self, category: Category) -> Result<Category> {
            self.check_writable()?;
            let forest = CategoryForest::new(self.get_all_categories()?);
            forest.validate_parent(&category.id, category.parent_id.as_deref())?;
            let id = category.id.clone();
            let updated = category.clone();
            self.modify(&id, move |c| *c = category)?;
            Ok(updated)
        }

        async fn delete_category(&self, id: &str) -> Result<usize> {
            if !self.get_subcategories(id)?.is_empty() {
                return Err(CategoryError::HasChildren(id.to_string()).into());
            }
            let mut categories = self.categories.lock().unwrap();
            let before = categories.len();
            categories.retain(|c| c.id != id);
            Ok(before - categories.len())
        }

        async fn increment_counter(&self, id: &str, counter: CategoryCounter) -> Result<()> {
            self.modify(id, |c| match counter {
                CategoryCounter::View => c.view_count += 1,
                CategoryCounter::CartAdd => c.cart_add_count += 1,
            })
        }

        async fn record_order(
            &self,
            id: &str,
            revenue: Decimal,
            ordered_at: NaiveDateTime,
        ) -> Result<()> {
            self.modify(id, |c| {
                c.order_count += 1;
                c.last_week_order_count += 1;
                c.last_month_order_count += 1;
                c.total_revenue += revenue;
                c.last_order_date = Some(ordered_at);
            })
        }

        async fn set_popular(&self, id: &str, is_popular: bool) -> Result<()> {
            self.modify(id, |c| c.is_popular = is_popular)
        }
    }

    // --- Mock ImageStore ---
    #[derive(Clone, Default)]
    struct MockImageStore {
        uploaded: Arc<Mutex<Vec<String>>>,
        deleted: Arc<Mutex<Vec<String>>>,
        fail_delete: bool,
        fail_upload: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ImageStoreTrait for MockImageStore {
        async fn upload(&self, image: ImageUpload) -> Result<StoredImage> {
            if self.fail_upload.load(Ordering::SeqCst) {
                return Err(ImageError::UnsupportedFormat("txt".to_string()).into());
            }
            let mut uploaded = self.uploaded.lock().unwrap();
            let image_id = format!("img-{}.{}", uploaded.len() + 1, image.extension().unwrap_or_default());
            uploaded.push(image_id.clone());
            Ok(StoredImage {
                url: format!("/uploads/images/{}", image_id),
                image_id,
            })
        }

        async fn delete(&self, image_id: &str) -> Result<bool> {
            if self.fail_delete {
                return Err(Error::Unexpected("image store offline".to_string()));
            }
            self.deleted.lock().unwrap().push(image_id.to_string());
            Ok(true)
        }
    }

    fn setup() -> (MockCategoryRepository, MockImageStore, CategoryService) {
        setup_with_store(MockImageStore::default())
    }

    fn setup_with_store(
        store: MockImageStore,
    ) -> (MockCategoryRepository, MockImageStore, CategoryService) {
        let repo = MockCategoryRepository::default();
        let service = CategoryService::new(Arc::new(repo.clone()), Arc::new(store.clone()));
        (repo, store, service)
    }

    fn new_category(name: &str, parent_id: Option<&str>) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            active: true,
            ..Default::default()
        }
    }

    fn update_from(category: &Category) -> CategoryUpdate {
        CategoryUpdate {
            name: category.name.clone(),
            description: category.description.clone(),
            slug: Some(category.slug.clone()),
            parent_id: category.parent_id.clone(),
            sort_order: category.sort_order,
            active: category.active,
            meta_title: category.meta_title.clone(),
            meta_keywords: category.meta_keywords.clone(),
        }
    }

    fn png(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    /// A(root) -> B -> C
    async fn chain(service: &CategoryService) -> (Category, Category, Category) {
        let a = service
            .create_category(new_category("A", None), None)
            .await
            .unwrap();
        let b = service
            .create_category(new_category("B", Some(&a.id)), None)
            .await
            .unwrap();
        let c = service
            .create_category(new_category("C", Some(&b.id)), None)
            .await
            .unwrap();
        (a, b, c)
    }

    #[tokio::test]
    async fn test_create_category_assigns_slug_and_zeroed_counters() {
        let (_repo, _store, service) = setup();

        let created = service
            .create_category(new_category("Home & Garden", None), None)
            .await
            .unwrap();

        assert_eq!(created.slug, "home-garden");
        assert_eq!(created.view_count, 0);
        assert_eq!(created.total_revenue, Decimal::ZERO);
        assert!(!created.is_popular);
        assert_eq!(created.created_at, created.updated_at);
        assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    }

    #[tokio::test]
    async fn test_create_category_rejects_blank_name() {
        let (_repo, _store, service) = setup();

        let result = service
            .create_category(new_category("   ", None), None)
            .await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_category_with_unknown_parent() {
        let (_repo, _store, service) = setup();

        let result = service
            .create_category(new_category("Phones", Some("ghost")), None)
            .await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::NotFound(ref id))) if id == "ghost"
        ));
    }

    #[tokio::test]
    async fn test_derived_slug_gets_numeric_suffix() {
        let (_repo, _store, service) = setup();

        let first = service
            .create_category(new_category("Phones", None), None)
            .await
            .unwrap();
        let second = service
            .create_category(new_category("Phones", None), None)
            .await
            .unwrap();
        let third = service
            .create_category(new_category("phones!", None), None)
            .await
            .unwrap();

        assert_eq!(first.slug, "phones");
        assert_eq!(second.slug, "phones-2");
        assert_eq!(third.slug, "phones-3");
    }

    #[tokio::test]
    async fn test_explicit_duplicate_slug_is_rejected() {
        let (_repo, _store, service) = setup();
        service
            .create_category(new_category("Phones", None), None)
            .await
            .unwrap();

        let result = service
            .create_category(
                NewCategory {
                    slug: Some("phones".to_string()),
                    ..new_category("Mobile", None)
                },
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::DuplicateSlug(_)))
        ));
    }

    #[tokio::test]
    async fn test_explicit_slug_must_be_url_safe() {
        let (_repo, _store, service) = setup();

        let result = service
            .create_category(
                NewCategory {
                    slug: Some("Not Safe/Slug".to_string()),
                    ..new_category("Mobile", None)
                },
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_with_image_stores_url_and_id() {
        let (_repo, store, service) = setup();

        let created = service
            .create_category(new_category("Cameras", None), Some(png("cam.png")))
            .await
            .unwrap();

        assert_eq!(created.image_id.as_deref(), Some("img-1.png"));
        assert_eq!(created.image_url.as_deref(), Some("/uploads/images/img-1.png"));
        assert_eq!(store.uploaded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_breadcrumbs_levels_and_cycle_rejection() {
        let (_repo, _store, service) = setup();
        let (a, b, c) = chain(&service).await;

        let crumbs: Vec<_> = service
            .get_breadcrumbs(&c.id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(crumbs, vec![a.id.clone(), b.id.clone(), c.id.clone()]);

        let level_two = service.get_categories_by_level(2).unwrap();
        assert_eq!(level_two.len(), 1);
        assert_eq!(level_two[0].id, c.id);
        assert!(!level_two[0].has_subcategories);

        let result = service
            .update_category(
                &a.id,
                CategoryUpdate {
                    parent_id: Some(c.id.clone()),
                    ..update_from(&a)
                },
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::CyclicHierarchy { .. }))
        ));
    }

    #[tokio::test]
    async fn test_self_parent_is_invalid_hierarchy() {
        let (_repo, _store, service) = setup();
        let (a, _b, _c) = chain(&service).await;

        let result = service
            .update_category(
                &a.id,
                CategoryUpdate {
                    parent_id: Some(a.id.clone()),
                    ..update_from(&a)
                },
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::InvalidHierarchy(_)))
        ));
    }

    #[tokio::test]
    async fn test_reparent_to_unrelated_node_and_to_root() {
        let (repo, _store, service) = setup();
        let (a, b, c) = chain(&service).await;
        let other = service
            .create_category(new_category("Other", None), None)
            .await
            .unwrap();

        let moved = service
            .update_category(
                &b.id,
                CategoryUpdate {
                    parent_id: Some(other.id.clone()),
                    ..update_from(&b)
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some(other.id.as_str()));
        assert_eq!(repo.snapshot(&b.id).parent_id, Some(other.id.clone()));

        let rooted = service
            .update_category(
                &c.id,
                CategoryUpdate {
                    parent_id: None,
                    ..update_from(&c)
                },
                None,
            )
            .await
            .unwrap();
        assert!(rooted.parent_id.is_none());

        let roots: Vec<_> = service
            .get_root_categories()
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(roots, vec!["A", "C", "Other"]);
        assert!(!service.get_category_short_info(&a.id).unwrap().has_subcategories);
    }

    #[tokio::test]
    async fn test_update_preserves_counters_and_bumps_timestamp() {
        let (repo, _store, service) = setup();
        let created = service
            .create_category(new_category("Audio", None), None)
            .await
            .unwrap();
        service.increment_view_count(&created.id).await.unwrap();

        let updated = service
            .update_category(
                &created.id,
                CategoryUpdate {
                    name: "Audio & Hi-Fi".to_string(),
                    slug: None,
                    ..update_from(&created)
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "audio-hi-fi");
        assert_eq!(updated.view_count, 1);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.snapshot(&created.id).name, "Audio & Hi-Fi");
    }

    #[tokio::test]
    async fn test_update_keeps_own_derived_slug() {
        let (_repo, _store, service) = setup();
        let created = service
            .create_category(new_category("Audio", None), None)
            .await
            .unwrap();

        let updated = service
            .update_category(
                &created.id,
                CategoryUpdate {
                    slug: None,
                    ..update_from(&created)
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "audio");
    }

    #[tokio::test]
    async fn test_update_unknown_category() {
        let (_repo, _store, service) = setup();

        let result = service
            .update_category("missing", CategoryUpdate::default(), None)
            .await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_image() {
        let (_repo, store, service) = setup();
        let created = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await
            .unwrap();

        let updated = service
            .update_category(&created.id, update_from(&created), Some(png("b.jpg")))
            .await
            .unwrap();

        assert_eq!(updated.image_id.as_deref(), Some("img-2.jpg"));
        assert_eq!(*store.deleted.lock().unwrap(), vec!["img-1.png".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_existing_image() {
        let (repo, store, service) = setup();
        let created = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await
            .unwrap();

        store.fail_upload.store(true, Ordering::SeqCst);
        let result = service
            .update_category(&created.id, update_from(&created), Some(png("b.png")))
            .await;

        assert!(matches!(
            result,
            Err(Error::Image(ImageError::UnsupportedFormat(_)))
        ));
        assert_eq!(repo.snapshot(&created.id).image_id.as_deref(), Some("img-1.png"));
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_releases_new_image() {
        let (repo, store, service) = setup();
        let created = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await
            .unwrap();

        repo.fail_writes.store(true, Ordering::SeqCst);
        let result = service
            .update_category(&created.id, update_from(&created), Some(png("b.png")))
            .await;

        assert!(result.is_err());
        assert_eq!(repo.snapshot(&created.id).image_id.as_deref(), Some("img-1.png"));
        assert_eq!(*store.deleted.lock().unwrap(), vec!["img-2.png".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_create_releases_uploaded_image() {
        let (repo, store, service) = setup();
        repo.fail_writes.store(true, Ordering::SeqCst);

        let result = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await;

        assert!(result.is_err());
        assert_eq!(repo.count_categories().unwrap(), 0);
        assert_eq!(*store.deleted.lock().unwrap(), vec!["img-1.png".to_string()]);
    }

    #[tokio::test]
    async fn test_crowded_slug_gets_random_suffix() {
        let (_repo, _store, service) = setup();
        service
            .create_category(new_category("Phones", None), None)
            .await
            .unwrap();
        for _ in 2..=crate::constants::MAX_SLUG_SUFFIX_ATTEMPTS {
            service
                .create_category(new_category("Phones", None), None)
                .await
                .unwrap();
        }

        let crowded = service
            .create_category(new_category("Phones", None), None)
            .await
            .unwrap();
        assert!(crowded.slug.starts_with("phones-"));
        assert_eq!(crowded.slug.len(), "phones-".len() + 8);
    }

    #[tokio::test]
    async fn test_delete_with_children_fails() {
        let (_repo, store, service) = setup();
        let (a, _b, _c) = chain(&service).await;

        let result = service.delete_category(&a.id).await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::HasChildren(_)))
        ));
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_leaf_releases_image() {
        let (repo, store, service) = setup();
        let created = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await
            .unwrap();

        service.delete_category(&created.id).await.unwrap();

        assert_eq!(service.get_categories_count().unwrap(), 0);
        assert!(repo.get_category(&created.id).unwrap().is_none());
        assert_eq!(*store.deleted.lock().unwrap(), vec!["img-1.png".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_survives_image_store_failure() {
        let (_repo, _store, service) = setup_with_store(MockImageStore {
            fail_delete: true,
            ..Default::default()
        });
        let created = service
            .create_category(new_category("Cameras", None), Some(png("a.png")))
            .await
            .unwrap();

        assert!(service.delete_category(&created.id).await.is_ok());
        assert_eq!(service.get_categories_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_category() {
        let (_repo, _store, service) = setup();
        assert!(matches!(
            service.delete_category("missing").await,
            Err(Error::Category(CategoryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_details_include_parent_and_subcategories() {
        let (_repo, _store, service) = setup();
        let (a, b, c) = chain(&service).await;

        let details = service.get_category(&b.id).unwrap();
        assert_eq!(details.parent.map(|p| p.id), Some(a.id.clone()));
        assert_eq!(details.subcategories.len(), 1);
        assert_eq!(details.subcategories[0].id, c.id);

        let by_slug = service.get_category_by_slug("a").unwrap();
        assert_eq!(by_slug.category.id, a.id);
        assert!(by_slug.parent.is_none());

        assert!(matches!(
            service.get_category_by_slug("nope"),
            Err(Error::Category(CategoryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_subcategories_and_tree() {
        let (_repo, _store, service) = setup();
        let (a, b, _c) = chain(&service).await;

        let children = service.get_subcategories(&a.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, b.id);
        assert!(children[0].has_subcategories);

        let tree = service.get_category_tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].children[0].name, "C");
        assert!(tree[0].children[0].children[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_negative_level_is_invalid_argument() {
        let (_repo, _store, service) = setup();
        assert!(matches!(
            service.get_categories_by_level(-1),
            Err(Error::Category(CategoryError::InvalidArgument(_)))
        ));
    }

    #[tokio::test]
    async fn test_search() {
        let (_repo, _store, service) = setup();
        service
            .create_category(
                NewCategory {
                    description: Some("Everything for the garden".to_string()),
                    ..new_category("Outdoor", None)
                },
                None,
            )
            .await
            .unwrap();
        service
            .create_category(new_category("Garden Tools", None), None)
            .await
            .unwrap();
        service
            .create_category(new_category("Books", None), None)
            .await
            .unwrap();

        let names: Vec<_> = service
            .search_categories("GARDEN")
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Garden Tools", "Outdoor"]);
        assert!(service.search_categories("  ").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counters_and_orders() {
        let (repo, _store, service) = setup();
        let created = service
            .create_category(new_category("Toys", None), None)
            .await
            .unwrap();

        service.increment_view_count(&created.id).await.unwrap();
        service.increment_view_count(&created.id).await.unwrap();
        service.increment_cart_add_count(&created.id).await.unwrap();
        service
            .increment_order_count(&created.id, dec!(19.99))
            .await
            .unwrap();
        service
            .increment_order_count(&created.id, dec!(5.01))
            .await
            .unwrap();

        let stored = repo.snapshot(&created.id);
        assert_eq!(stored.view_count, 2);
        assert_eq!(stored.cart_add_count, 1);
        assert_eq!(stored.order_count, 2);
        assert_eq!(stored.last_week_order_count, 2);
        assert_eq!(stored.last_month_order_count, 2);
        assert_eq!(stored.total_revenue, dec!(25.00));
        assert!(stored.last_order_date.unwrap() <= Utc::now().naive_utc());
        assert_eq!(stored.popularity_score(), 2 + 3 + 10);
    }

    #[tokio::test]
    async fn test_negative_revenue_is_rejected() {
        let (_repo, _store, service) = setup();
        let created = service
            .create_category(new_category("Toys", None), None)
            .await
            .unwrap();

        let result = service.increment_order_count(&created.id, dec!(-1)).await;

        assert!(matches!(
            result,
            Err(Error::Category(CategoryError::InvalidArgument(_)))
        ));
    }

    #[tokio::test]
    async fn test_counter_on_unknown_category() {
        let (_repo, _store, service) = setup();
        assert!(service.increment_view_count("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_popular_falls_back_to_score_ranking() {
        let (_repo, _store, service) = setup();
        let low = service
            .create_category(new_category("Low", None), None)
            .await
            .unwrap();
        let high = service
            .create_category(new_category("High", None), None)
            .await
            .unwrap();
        service
            .create_category(
                NewCategory {
                    active: false,
                    ..new_category("Hidden", None)
                },
                None,
            )
            .await
            .unwrap();

        service.increment_view_count(&low.id).await.unwrap();
        service.increment_cart_add_count(&high.id).await.unwrap();

        let popular = service.get_popular_categories(10).unwrap();
        let names: Vec<_> = popular.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);
        assert_eq!(popular[0].popularity_score, 3);

        assert_eq!(service.get_popular_categories(1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_flagged_categories_take_precedence() {
        let (_repo, _store, service) = setup();
        let busy = service
            .create_category(new_category("Busy", None), None)
            .await
            .unwrap();
        let flagged = service
            .create_category(new_category("Flagged", None), None)
            .await
            .unwrap();
        service.increment_cart_add_count(&busy.id).await.unwrap();

        service
            .update_popular_status(&flagged.id, true)
            .await
            .unwrap();

        let popular = service.get_popular_categories(10).unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].id, flagged.id);
    }
}
