use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{decode_secret_key, AuthManager},
    config::Config,
    images::LocalImageStore,
};
use catalog_core::categories::{CategoryService, CategoryServiceTrait};
use catalog_core::images::ImageStoreTrait;
use catalog_storage_sqlite::{db, CategoryRepository};

/// URL prefix under which stored images are served.
pub const IMAGE_URL_PREFIX: &str = "/uploads/images";

pub struct AppState {
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub auth: Option<Arc<AuthManager>>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("CATALOG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let image_store: Arc<dyn ImageStoreTrait> = Arc::new(LocalImageStore::new(
        config.upload_dir.clone(),
        IMAGE_URL_PREFIX,
        config.max_upload_bytes,
    ));

    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer));
    let category_service: Arc<dyn CategoryServiceTrait> =
        Arc::new(CategoryService::new(category_repository, image_store));
    tracing::info!(
        "Catalog holds {} categories",
        category_service.get_categories_count()?
    );

    let auth = match config.jwt_secret.as_deref() {
        Some(secret) => {
            let key = decode_secret_key(secret)?;
            Some(Arc::new(AuthManager::new(&key)))
        }
        None => {
            tracing::warn!("CATALOG_JWT_SECRET is not set; write routes are unauthenticated");
            None
        }
    };

    Ok(Arc::new(AppState {
        category_service,
        auth,
        upload_dir: config.upload_dir.clone(),
        max_upload_bytes: config.max_upload_bytes,
    }))
}
