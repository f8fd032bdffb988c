//! Transaction entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use daybook_core::ledger::NewTransaction;
use daybook_shared::types::{Currency, TransactionId};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::MonthQuery,
    middleware::AuthUser,
};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

// ============================================================================
// Request Types
// ============================================================================

/// Amount as sent by clients: a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    /// `"amount": 12.5`
    Number(serde_json::Number),
    /// `"amount": "12.50"`
    Text(String),
}

impl AmountField {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Request body for creating an entry.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Local day, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Amount in `currency`.
    pub amount: Option<AmountField>,
    /// Optional note.
    pub note: Option<String>,
    /// Currency the amount was typed in; defaults to the base currency.
    pub currency: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions?month&year` or `/transactions?date` - List entries in base currency.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let owner = auth.user_id();

    let transactions = match query.day()? {
        Some(day) => state.ledger.list_day(owner, day).await?,
        None => state.ledger.list_month(owner, query.month_ref()?).await?,
    };

    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Record a new entry.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    let entered_in = match body.currency.as_deref() {
        None => Currency::BASE,
        Some(code) => code.parse::<Currency>().map_err(ApiError::validation)?,
    };
    let amount = body.amount.as_ref().map(AmountField::as_text).unwrap_or_default();

    let input = NewTransaction::parse(
        body.date.as_deref().unwrap_or_default(),
        body.kind.as_deref().unwrap_or_default(),
        &amount,
        body.note.as_deref(),
    )?;

    let transaction = state
        .ledger
        .record(auth.user_id(), input, entered_in)
        .await?;

    info!(transaction_id = %transaction.id, currency = %entered_in, "Created transaction");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "transaction": transaction })),
    ))
}

/// DELETE `/transactions/{id}` - Remove one of the caller's entries.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: TransactionId = id
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid transaction id: {id}")))?;

    state.ledger.remove(auth.user_id(), id).await?;

    Ok(Json(json!({ "success": true })))
}
