use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    main_lib::{AppState, IMAGE_URL_PREFIX},
    models,
};

pub mod categories;

#[derive(OpenApi)]
#[openapi(
    info(title = "Catalog API", description = "Product category hierarchy"),
    paths(
        healthz,
        categories::get_root_categories,
        categories::create_category,
        categories::create_category_with_image,
        categories::get_categories_count,
        categories::search_categories,
        categories::get_categories_by_level,
        categories::get_category_tree,
        categories::get_popular_categories,
        categories::get_category_by_slug,
        categories::get_category_short_info,
        categories::get_category,
        categories::update_category,
        categories::update_category_with_image,
        categories::delete_category,
        categories::get_subcategories,
        categories::get_breadcrumbs,
        categories::increment_view_count,
        categories::increment_cart_add_count,
        categories::increment_order_count,
        categories::update_popular_status,
    ),
    components(schemas(
        models::Category,
        models::CategoryShort,
        models::CategoryDetails,
        models::CategoryListItem,
        models::CategoryTreeNode,
        models::PopularCategory,
        models::CategoryInput,
        models::OrderRequest,
    ))
)]
pub struct ApiDoc;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Service is up")))]
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(categories::router(state.clone()));

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(openapi))
        .nest_service(IMAGE_URL_PREFIX, ServeDir::new(&state.upload_dir))
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(&config.cors_allow))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
