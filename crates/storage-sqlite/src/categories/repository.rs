//! Repository implementation for categories.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use catalog_core::categories::{
    Category, CategoryCounter, CategoryForest, CategoryRepositoryTrait,
};
use catalog_core::errors::CategoryError;
use catalog_core::Result;

use super::model::{CategoryChangesetDB, CategoryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn load_ordered(
        &self,
        filter: impl FnOnce(categories::BoxedQuery<'static, diesel::sqlite::Sqlite>)
            -> categories::BoxedQuery<'static, diesel::sqlite::Sqlite>,
    ) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let results = filter(categories::table.into_boxed())
            .order((categories::sort_order.asc(), categories::name.asc()))
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Category::from).collect())
    }
}

fn find_category(conn: &mut SqliteConnection, id: &str) -> Result<Option<CategoryDB>> {
    Ok(categories::table
        .find(id)
        .select(CategoryDB::as_select())
        .first::<CategoryDB>(conn)
        .optional()
        .map_err(StorageError::from)?)
}

fn require_category(conn: &mut SqliteConnection, id: &str) -> Result<CategoryDB> {
    find_category(conn, id)?.ok_or_else(|| CategoryError::NotFound(id.to_string()).into())
}

fn slug_taken(conn: &mut SqliteConnection, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
    let mut query = categories::table
        .filter(categories::slug.eq(slug))
        .into_boxed();
    if let Some(id) = exclude_id {
        query = query.filter(categories::id.ne(id));
    }
    let count: i64 = query
        .select(count_star())
        .get_result(conn)
        .map_err(StorageError::from)?;
    Ok(count > 0)
}

fn count_children(conn: &mut SqliteConnection, id: &str) -> Result<i64> {
    Ok(categories::table
        .filter(categories::parent_id.eq(id))
        .select(count_star())
        .get_result(conn)
        .map_err(StorageError::from)?)
}

/// `%query%` with LIKE wildcards in `query` escaped by `\`.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(find_category(&mut conn, id)?.map(Category::from))
    }

    fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let result = categories::table
            .filter(categories::slug.eq(slug))
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(result.map(Category::from))
    }

    fn get_root_categories(&self) -> Result<Vec<Category>> {
        self.load_ordered(|q| q.filter(categories::parent_id.is_null()))
    }

    fn get_subcategories(&self, parent_id: &str) -> Result<Vec<Category>> {
        let parent_id = parent_id.to_string();
        self.load_ordered(move |q| q.filter(categories::parent_id.eq(parent_id)))
    }

    fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.load_ordered(|q| q)
    }

    fn get_active_categories(&self) -> Result<Vec<Category>> {
        self.load_ordered(|q| q.filter(categories::active.eq(true)))
    }

    fn get_popular_flagged(&self) -> Result<Vec<Category>> {
        self.load_ordered(|q| {
            q.filter(categories::active.eq(true))
                .filter(categories::is_popular.eq(true))
        })
    }

    fn get_parent_ids(&self) -> Result<HashSet<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = categories::table
            .filter(categories::parent_id.is_not_null())
            .select(categories::parent_id)
            .distinct()
            .load::<Option<String>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids.into_iter().flatten().collect())
    }

    fn search_categories(&self, query: &str) -> Result<Vec<Category>> {
        let pattern = like_pattern(query);
        let mut conn = get_connection(&self.pool)?;
        let results = categories::table
            .filter(
                categories::name
                    .like(&pattern)
                    .escape('\\')
                    .or(categories::description.like(&pattern).escape('\\')),
            )
            .order((categories::name.asc(), categories::id.asc()))
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Category::from).collect())
    }

    fn slug_exists(&self, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        slug_taken(&mut conn, slug, exclude_id)
    }

    fn count_categories(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .select(count_star())
            .get_result(&mut conn)
            .map_err(StorageError::from)?)
    }

    async fn create_category(&self, category: Category) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                if let Some(parent_id) = category.parent_id.as_deref() {
                    require_category(conn, parent_id)?;
                }
                if slug_taken(conn, &category.slug, None)? {
                    return Err(CategoryError::DuplicateSlug(category.slug).into());
                }

                let db: CategoryDB = category.into();
                let result = diesel::insert_into(categories::table)
                    .values(&db)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(Category::from(result))
            })
            .await
    }

    async fn update_category(&self, category: Category) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let id = category.id.clone();
                require_category(conn, &id)?;

                // Re-validate against the rows this transaction sees.
                let rows = categories::table
                    .select(CategoryDB::as_select())
                    .load::<CategoryDB>(conn)
                    .map_err(StorageError::from)?;
                let forest = CategoryForest::new(rows.into_iter().map(Category::from).collect());
                forest.validate_parent(&id, category.parent_id.as_deref())?;

                if slug_taken(conn, &category.slug, Some(&id))? {
                    return Err(CategoryError::DuplicateSlug(category.slug).into());
                }

                let changeset: CategoryChangesetDB = category.into();
                let result = diesel::update(categories::table.find(&id))
                    .set(&changeset)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(Category::from(result))
            })
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                require_category(conn, &id)?;
                if count_children(conn, &id)? > 0 {
                    return Err(CategoryError::HasChildren(id).into());
                }
                Ok(diesel::delete(categories::table.find(&id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn increment_counter(&self, id: &str, counter: CategoryCounter) -> Result<()> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let target = categories::table.find(&id);
                let updated = match counter {
                    CategoryCounter::View => diesel::update(target)
                        .set(categories::view_count.eq(categories::view_count + 1))
                        .execute(conn),
                    CategoryCounter::CartAdd => diesel::update(target)
                        .set(categories::cart_add_count.eq(categories::cart_add_count + 1))
                        .execute(conn),
                }
                .map_err(StorageError::from)?;

                if updated == 0 {
                    return Err(CategoryError::NotFound(id).into());
                }
                Ok(())
            })
            .await
    }

    async fn record_order(
        &self,
        id: &str,
        revenue: Decimal,
        ordered_at: NaiveDateTime,
    ) -> Result<()> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let current = require_category(conn, &id)?;
                let total = Decimal::from_str(&current.total_revenue)?
                    .checked_add(revenue)
                    .ok_or_else(|| {
                        CategoryError::InvalidArgument(format!(
                            "Revenue total of category {} would overflow",
                            id
                        ))
                    })?;

                diesel::update(categories::table.find(&id))
                    .set((
                        categories::order_count.eq(categories::order_count + 1),
                        categories::last_week_order_count
                            .eq(categories::last_week_order_count + 1),
                        categories::last_month_order_count
                            .eq(categories::last_month_order_count + 1),
                        categories::total_revenue.eq(total.to_string()),
                        categories::last_order_date.eq(Some(ordered_at)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                debug!("Recorded order on category {} (revenue {})", id, revenue);
                Ok(())
            })
            .await
    }

    async fn set_popular(&self, id: &str, is_popular: bool) -> Result<()> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(categories::table.find(&id))
                    .set(categories::is_popular.eq(is_popular))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(CategoryError::NotFound(id).into());
                }
                Ok(())
            })
            .await
    }
}
