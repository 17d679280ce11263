//! Transfer Routes
//!
//! Endpoints:
//! - POST /upload - Upload a multipart `file` field, returns root and tx hash
//! - GET /download/:rootHash - Retrieve a file and stream it back

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::storage::{RootHash, UploadResult};

const NO_FILE_UPLOADED: &str = "No file uploaded";

/// Name of the multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Create the transfer router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/download/:root_hash", get(download))
}

/// POST /upload
///
/// The upload is spooled into a temp file in the upload directory. The
/// temp file is removed when the handler returns, whatever the outcome.
async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload is not a multipart request: {}", e);
        ApiError::BadRequest(NO_FILE_UPLOADED.to_string())
    })?;

    let mut spooled: Option<NamedTempFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        // Only file parts count; a plain text field named `file` is ignored
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        tracing::debug!(
            filename = ?field.file_name(),
            content_type = ?field.content_type(),
            "Receiving upload"
        );

        let temp = spool_file(&state).await?;
        let mut writer = tokio::fs::File::from_std(temp.reopen()?);
        let mut received: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
        {
            writer.write_all(&chunk).await?;
            received += chunk.len() as u64;
        }
        writer.flush().await?;

        tracing::debug!(path = %temp.path().display(), bytes = received, "Upload spooled");
        spooled = Some(temp);
        break;
    }

    let temp = spooled.ok_or_else(|| ApiError::BadRequest(NO_FILE_UPLOADED.to_string()))?;
    let result = state.transfers().upload(temp.path()).await?;

    Ok(Json(result))
}

async fn spool_file(state: &AppState) -> Result<NamedTempFile> {
    let upload_dir = &state.config().server.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;

    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(upload_dir)?;
    Ok(temp)
}

/// GET /download/:rootHash
async fn download(
    State(state): State<AppState>,
    Path(root_hash): Path<String>,
) -> Result<Response> {
    let root: RootHash = root_hash.parse()?;
    let dest = state.config().server.download_dir.join(root.as_str());

    state.transfers().download(&root, &dest).await?;

    let file = tokio::fs::File::open(&dest).await.map_err(ApiError::Stream)?;
    let size = file.metadata().await.map_err(ApiError::Stream)?.len();

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", root),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
