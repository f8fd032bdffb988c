//! CSV export route.

use axum::{
    Router,
    extract::{Query, State},
    http::{
        HeaderName, HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::get,
};

use daybook_shared::AppError;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::MonthQuery,
    middleware::AuthUser,
};

/// Set when the requested currency could not be used.
pub const RATE_ADVISORY_HEADER: HeaderName = HeaderName::from_static("x-rate-advisory");

/// Creates the export routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/export", get(export_month))
}

/// GET `/export` - Month of transactions as a CSV attachment.
async fn export_month(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let document = state
        .ledger
        .export(auth.user_id(), query.month_ref()?, query.currency())
        .await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.filename
    ))
    .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;

    let mut response = (
        [
            (CONTENT_TYPE, HeaderValue::from_static(document.content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        document.body,
    )
        .into_response();

    if let Some(advisory) = document.context.advisory()
        && let Ok(value) = HeaderValue::from_str(advisory)
    {
        response.headers_mut().insert(RATE_ADVISORY_HEADER, value);
    }

    Ok(response)
}
