use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Json, Router,
};
use tracing::{debug, warn};

use crate::{
    auth::require_jwt,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{
        Category, CategoryDetails, CategoryInput, CategoryListItem, CategoryTreeNode,
        LevelQuery, OrderRequest, PopularCategory, PopularFlagQuery, PopularQuery, SearchQuery,
    },
};
use catalog_core::constants::DEFAULT_POPULAR_LIMIT;
use catalog_core::images::ImageUpload;

/// Room for the JSON part and multipart framing on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn list<T, U: From<T>>(items: Vec<T>) -> Json<Vec<U>> {
    Json(items.into_iter().map(U::from).collect())
}

/// Splits a multipart body into the `data` JSON part and the optional `image` file.
async fn read_category_form(
    mut multipart: Multipart,
) -> ApiResult<(CategoryInput, Option<ImageUpload>)> {
    let mut data = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                let input = serde_json::from_str::<CategoryInput>(&text)
                    .map_err(|e| ApiError::BadRequest(format!("Invalid category data: {e}")))?;
                data = Some(input);
            }
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("Missing 'data' part".into()))?;
    Ok((data, image))
}

async fn record_view(state: &AppState, id: &str) {
    if let Err(e) = state.category_service.increment_view_count(id).await {
        warn!("Failed to record view of category {}: {}", id, e);
    }
}

#[utoipa::path(get, path = "/api/v1/categories", responses((status = 200, body = [CategoryListItem])))]
pub async fn get_root_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryListItem>>> {
    let roots = state.category_service.get_root_categories()?;
    Ok(list(roots))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryInput,
    responses((status = 201, body = Category))
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let created = state
        .category_service
        .create_category(input.into(), None)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(post, path = "/api/v1/categories/upload", responses((status = 201, body = Category)))]
pub async fn create_category_with_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let (input, image) = read_category_form(multipart).await?;
    let created = state
        .category_service
        .create_category(input.into(), image)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(get, path = "/api/v1/categories/count", responses((status = 200, body = i64)))]
pub async fn get_categories_count(State(state): State<Arc<AppState>>) -> ApiResult<Json<i64>> {
    Ok(Json(state.category_service.get_categories_count()?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/search",
    params(SearchQuery),
    responses((status = 200, body = [CategoryListItem]))
)]
pub async fn search_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<CategoryListItem>>> {
    let found = state.category_service.search_categories(&params.query)?;
    Ok(list(found))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/by-level",
    params(LevelQuery),
    responses((status = 200, body = [CategoryListItem]))
)]
pub async fn get_categories_by_level(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LevelQuery>,
) -> ApiResult<Json<Vec<CategoryListItem>>> {
    let categories = state.category_service.get_categories_by_level(params.level)?;
    Ok(list(categories))
}

#[utoipa::path(get, path = "/api/v1/categories/public/tree", responses((status = 200, body = [CategoryTreeNode])))]
pub async fn get_category_tree(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryTreeNode>>> {
    let tree = state.category_service.get_category_tree()?;
    Ok(list(tree))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/public/popular",
    params(PopularQuery),
    responses((status = 200, body = [PopularCategory]))
)]
pub async fn get_popular_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PopularQuery>,
) -> ApiResult<Json<Vec<PopularCategory>>> {
    let limit = params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    let popular = state.category_service.get_popular_categories(limit)?;
    Ok(list(popular))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/slug/{slug}",
    params(("slug" = String, Path,)),
    responses((status = 200, body = CategoryDetails), (status = 404))
)]
pub async fn get_category_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<CategoryDetails>> {
    let details = state.category_service.get_category_by_slug(&slug)?;
    record_view(&state, &details.category.id).await;
    Ok(Json(details.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/short-info/{id}",
    params(("id" = String, Path,)),
    responses((status = 200, body = CategoryListItem), (status = 404))
)]
pub async fn get_category_short_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CategoryListItem>> {
    let item = state.category_service.get_category_short_info(&id)?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path,)),
    responses((status = 200, body = CategoryDetails), (status = 404))
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CategoryDetails>> {
    let details = state.category_service.get_category(&id)?;
    record_view(&state, &id).await;
    Ok(Json(details.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path,)),
    request_body = CategoryInput,
    responses((status = 200, body = Category), (status = 400), (status = 404))
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<Json<Category>> {
    let updated = state
        .category_service
        .update_category(&id, input.into(), None)
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}/upload",
    params(("id" = String, Path,)),
    responses((status = 200, body = Category), (status = 400), (status = 404))
)]
pub async fn update_category_with_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Category>> {
    let (input, image) = read_category_form(multipart).await?;
    let updated = state
        .category_service
        .update_category(&id, input.into(), image)
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path,)),
    responses((status = 204), (status = 404), (status = 409))
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.category_service.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/subcategories",
    params(("id" = String, Path,)),
    responses((status = 200, body = [CategoryListItem]))
)]
pub async fn get_subcategories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CategoryListItem>>> {
    let children = state.category_service.get_subcategories(&id)?;
    Ok(list(children))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/breadcrumbs",
    params(("id" = String, Path,)),
    responses((status = 200, body = [CategoryListItem]), (status = 404))
)]
pub async fn get_breadcrumbs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CategoryListItem>>> {
    let path = state.category_service.get_breadcrumbs(&id)?;
    Ok(list(path))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/{id}/view",
    params(("id" = String, Path,)),
    responses((status = 204), (status = 404))
)]
pub async fn increment_view_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.category_service.increment_view_count(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/{id}/cart",
    params(("id" = String, Path,)),
    responses((status = 204), (status = 404))
)]
pub async fn increment_cart_add_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.category_service.increment_cart_add_count(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/{id}/order",
    params(("id" = String, Path,)),
    request_body = OrderRequest,
    responses((status = 204), (status = 400), (status = 404))
)]
pub async fn increment_order_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(order): Json<OrderRequest>,
) -> ApiResult<StatusCode> {
    state
        .category_service
        .increment_order_count(&id, order.revenue)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/categories/{id}/popular",
    params(("id" = String, Path,), PopularFlagQuery),
    responses((status = 204), (status = 404))
)]
pub async fn update_popular_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<PopularFlagQuery>,
) -> ApiResult<StatusCode> {
    state
        .category_service
        .update_popular_status(&id, params.popular)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/categories", get(get_root_categories))
        .route("/categories/count", get(get_categories_count))
        .route("/categories/search", get(search_categories))
        .route("/categories/by-level", get(get_categories_by_level))
        .route("/categories/public/tree", get(get_category_tree))
        .route("/categories/public/popular", get(get_popular_categories))
        .route("/categories/slug/{slug}", get(get_category_by_slug))
        .route("/categories/short-info/{id}", get(get_category_short_info))
        .route("/categories/{id}", get(get_category))
        .route("/categories/{id}/subcategories", get(get_subcategories))
        .route("/categories/{id}/breadcrumbs", get(get_breadcrumbs))
        .route("/categories/{id}/view", post(increment_view_count))
        .route("/categories/{id}/cart", post(increment_cart_add_count));

    let protected = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/upload", post(create_category_with_image))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/categories/{id}/upload", put(update_category_with_image))
        .route("/categories/{id}/order", post(increment_order_count))
        .route("/categories/{id}/popular", patch(update_popular_status))
        .layer(DefaultBodyLimit::max(
            state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .route_layer(from_fn_with_state(state, require_jwt));

    public.merge(protected)
}
