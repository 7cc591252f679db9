use std::sync::Arc;

use crate::config::Config;
use crate::storage::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where raw uploads land. Default: DiskUploadStore under UPLOAD_DIR.
    pub uploads: Arc<dyn UploadStore>,
}
