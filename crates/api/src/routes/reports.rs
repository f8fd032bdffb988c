//! Report routes.
//!
//! Daily totals, the month summary and the calendar grid, all in the
//! requested display currency.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

use daybook_core::ledger::MonthView;

use crate::{AppState, error::ApiResult, extractors::MonthQuery, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily-totals", get(get_daily_totals))
        .route("/summary", get(get_summary))
        .route("/calendar", get(get_calendar))
}

/// Fields every report response carries.
fn view_envelope(view: &MonthView) -> serde_json::Map<String, Value> {
    let context = &view.context;
    let mut body = serde_json::Map::new();
    body.insert("month".into(), json!(view.month.to_string()));
    body.insert("currency".into(), json!(context.display().code()));
    body.insert("rate".into(), json!(context.rate()));
    body.insert("advisory".into(), json!(context.advisory()));
    body
}

/// GET `/daily-totals` - Per-day income, expense and net.
async fn get_daily_totals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let view = state
        .ledger
        .month_report(auth.user_id(), query.month_ref()?, query.currency())
        .await?;

    let mut body = view_envelope(&view);
    body.insert("daily_totals".into(), json!(view.report.daily));
    Ok(Json(Value::Object(body)))
}

/// GET `/summary` - Month totals and profit.
async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let view = state
        .ledger
        .month_report(auth.user_id(), query.month_ref()?, query.currency())
        .await?;

    let mut body = view_envelope(&view);
    body.insert("summary".into(), json!(view.report.summary));
    Ok(Json(Value::Object(body)))
}

/// GET `/calendar` - Sunday-first month grid with each day's rollup.
async fn get_calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let calendar = state
        .ledger
        .calendar(auth.user_id(), query.month_ref()?, query.currency())
        .await?;

    let mut body = view_envelope(&calendar.view);
    body.insert("calendar".into(), json!(calendar.grid));
    body.insert("summary".into(), json!(calendar.view.report.summary));
    Ok(Json(Value::Object(body)))
}
