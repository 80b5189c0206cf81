//! Monthly summary handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use domain_ledger::MonthlySummary;

use crate::dto::reports::MonthQuery;
use crate::{error::ApiError, AppState};

pub async fn monthly_summary(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<MonthlySummary>, ApiError> {
    let Query(MonthQuery { year, month }) = query?;
    let summary = state.service.monthly_summary(year, month).await?;
    Ok(Json(summary))
}
