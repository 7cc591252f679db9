//! Axum route handlers for the job export upload.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::extract::extract_jobs;
use crate::jobs::models::JobRecord;
use crate::state::AppState;

/// Multipart field the front end puts the export under.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub jobs: Vec<JobRecord>,
}

/// POST /upload
///
/// Stores the uploaded export for the duration of the request and returns
/// its jobs flattened into records. The stored file is removed on every
/// outcome after it was written.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, data) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file part".to_string()))?;

    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let upload_id = Uuid::new_v4();
    let path = state.uploads.save(upload_id, &filename, &data).await?;
    info!(
        %upload_id,
        filename = %filename,
        bytes = data.len(),
        "Stored upload at {}",
        path.display()
    );

    let extracted = decode_and_extract(&data);
    if let Err(e) = state.uploads.remove(&path).await {
        warn!(%upload_id, "Upload left on disk: {e:?}");
    }
    let jobs = extracted?;
    info!(%upload_id, records = jobs.len(), "Extracted jobs");

    Ok(Json(UploadResponse { jobs }))
}

fn decode_and_extract(data: &[u8]) -> Result<Vec<JobRecord>, AppError> {
    let document: Value = serde_json::from_slice(data)
        .map_err(|e| AppError::Validation(format!("Uploaded file is not valid JSON: {e}")))?;
    Ok(extract_jobs(&document)?)
}

/// Returns the first `file` field that carries a file name, as (file name,
/// contents). A plain form value named `file` is not a file part.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}
