//! Transaction handlers

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use core_kernel::{DateRange, Timezone, TransactionId};
use domain_ledger::{CreateTransaction, LedgerError, TransactionType};

use crate::dto::transactions::*;
use crate::{error::ApiError, AppState};

/// Records a transaction dated now
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let Json(request) = payload?;

    let input = CreateTransaction {
        transaction_type: TransactionType::from_str(&request.transaction_type)?,
        category: request.category,
        amount_cents: request.amount_cents,
        description: request.description,
    };

    let tx = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tx.into())))
}

/// Lists transactions between two calendar days, both inclusive
pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let Query(query) = query?;

    let tz = match query.tz.as_deref() {
        Some(name) => Timezone::from_str(name).map_err(LedgerError::from)?,
        None => Timezone::default(),
    };
    let (from, to) = DateRange::new(query.from, query.to)
        .and_then(|range| range.to_utc_bounds(&tz))
        .map_err(LedgerError::from)?;

    let items = state.service.list_by_period(from, to).await?;
    Ok(Json(items.into_iter().map(TransactionResponse::from).collect()))
}

/// Deletes a transaction by id, with or without the `TXN-` prefix
pub async fn delete_transaction(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(raw) = id?;
    let id = TransactionId::from_str(&raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid transaction id '{}': {}", raw, e)))?;

    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
