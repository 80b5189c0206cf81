//! Monthly report handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::dto::reports::{MonthQuery, MonthlyReportResponse};
use crate::{error::ApiError, AppState};

/// Renders the month's report and starts its upload
///
/// Responds once the upload is handed off; `dispatch` says whether it was
/// started at once or queued behind busy slots, never whether it succeeded.
pub async fn monthly_report(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<MonthlyReportResponse>, ApiError> {
    let Query(MonthQuery { year, month }) = query?;
    let report = state.service.generate_monthly_report(year, month).await?;
    Ok(Json(report.into()))
}
