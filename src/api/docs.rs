//! Document Handlers
//!
//! HTTP request handlers for document upload, retrieval, listing and
//! deletion. Each handler resolves the session token and delegates to
//! [`DocsService`](crate::service::DocsService).

use axum::{
    extract::{
        multipart::{Multipart, MultipartError},
        Path, Query, State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::{DeleteResponse, DocumentMeta, DocumentResponse, ListQuery, ListResponse};
use crate::storage::ListFilter;

use super::{extract_token, AppState, TokenQuery};

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::InvalidInput(format!("Malformed multipart body: {}", err))
}

/// Handler for POST /api/docs
///
/// Accepts a multipart upload with three parts:
/// - `meta` (required): JSON [`DocumentMeta`]
/// - `json` (optional): auxiliary JSON payload stored with the document
/// - `file` (optional): binary payload, required when `meta.file` is set
///
/// Unknown parts are ignored. The session token comes from the query
/// string, the Authorization header, or the meta part, in that order.
pub async fn upload_handler(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>> {
    let mut meta: Option<DocumentMeta> = None;
    let mut json_data: Option<serde_json::Value> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // The part name must be taken before the field is consumed
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "meta" => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| ApiError::InvalidInput(format!("Invalid meta part: {}", e)))?;
                meta = Some(parsed);
            }
            "json" => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| ApiError::InvalidInput(format!("Invalid json part: {}", e)))?;
                json_data = Some(parsed);
            }
            "file" => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let meta = meta.ok_or_else(|| ApiError::InvalidInput("Meta part is missing".to_string()))?;

    let mut token = extract_token(query.token.as_deref(), &headers);
    if token.is_empty() {
        token = meta.token.clone();
    }

    let doc = state.docs.create(&token, meta, json_data, file_bytes).await?;
    Ok(Json(DocumentResponse::detail(&doc)))
}

/// Handler for GET /api/docs/:id
///
/// Returns the document as JSON, or the raw payload bytes under the
/// stored MIME type when the document carries a file.
pub async fn get_doc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let token = extract_token(query.token.as_deref(), &headers);
    let doc = state.docs.get(&token, &id).await?;

    if doc.is_file {
        let bytes = state.docs.read_payload(&doc).await?;
        let mime = if doc.mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            doc.mime.clone()
        };
        return Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response());
    }

    Ok(Json(DocumentResponse::detail(&doc)).into_response())
}

/// Handler for GET /api/docs
///
/// Lists documents visible to the session's user, narrowed by the
/// query-string filter.
pub async fn list_docs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Json<ListResponse>> {
    let token = extract_token(query.token.as_deref(), &headers);

    let filter = ListFilter {
        login: query.login,
        key: query.key,
        value: query.value,
        limit: query.limit,
    };

    let docs = state.docs.list(&token, filter).await?;
    Ok(Json(ListResponse::new(&docs)))
}

/// Handler for DELETE /api/docs/:id
///
/// Deletes a document owned by the session's user.
pub async fn delete_doc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>> {
    let token = extract_token(query.token.as_deref(), &headers);
    state.docs.delete(&token, &id).await?;
    Ok(Json(DeleteResponse::new(id)))
}
