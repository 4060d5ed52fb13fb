use crate::services::storage::{LocalStorageService, MediaCategory};
use std::env;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage() -> anyhow::Result<Arc<LocalStorageService>> {
    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

    info!("🖼️  Upload storage: {}/", upload_dir);

    for category in [
        MediaCategory::Images,
        MediaCategory::Videos,
        MediaCategory::Sketches,
    ] {
        let dir = std::path::Path::new(&upload_dir).join(category.dir());
        tokio::fs::create_dir_all(&dir).await?;
    }

    Ok(Arc::new(LocalStorageService::new(upload_dir)))
}
