//! Ledger orchestration service
//!
//! The service is the only writer of new transactions. It validates input,
//! assigns identity and timestamps, normalizes instants to UTC and delegates
//! to whichever `TransactionStore` it was constructed with. Report generation
//! renders the month synchronously and hands the upload to the
//! `ReportDispatcher` without waiting for it.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, instrument};

use core_kernel::{
    Cents, Clock, Currency, HealthCheckResult, MonthPeriod, SystemClock, TransactionId,
};

use crate::dispatch::{DispatchOutcome, ReportDispatcher};
use crate::error::LedgerError;
use crate::ports::TransactionStore;
use crate::report::render_report;
use crate::summary::MonthlySummary;
use crate::transaction::{CreateTransaction, Transaction};

/// Result of a report request
///
/// `dispatch` tells whether the upload started at once or is waiting for a
/// free slot, never how it ended.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub summary: MonthlySummary,
    pub text: String,
    /// Object key, `report-<YYYY>-<MM>.txt`
    pub key: String,
    /// `<bucket>/<key>`
    pub location: String,
    pub dispatch: DispatchOutcome,
}

/// Application service over a single transaction store
pub struct LedgerService {
    store: Arc<dyn TransactionStore>,
    dispatcher: ReportDispatcher,
    clock: Arc<dyn Clock>,
    currency: Currency,
}

impl LedgerService {
    pub fn new(store: Arc<dyn TransactionStore>, dispatcher: ReportDispatcher) -> Self {
        Self {
            store,
            dispatcher,
            clock: Arc::new(SystemClock),
            currency: Currency::default(),
        }
    }

    /// Replaces the source of "now" used for new transactions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Currency used when rendering reports
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    pub fn dispatcher(&self) -> &ReportDispatcher {
        &self.dispatcher
    }

    /// Validates and records a new transaction
    ///
    /// # Errors
    ///
    /// - `BadRequest` if the category is blank or the amount is not positive;
    ///   the store is not touched
    /// - `Internal` if the store fails
    #[instrument(skip(self, input), fields(transaction_type = %input.transaction_type))]
    pub async fn create(&self, input: CreateTransaction) -> Result<Transaction, LedgerError> {
        let category = input.category.trim();
        if category.is_empty() {
            return Err(LedgerError::bad_request("category must not be empty"));
        }
        let amount_cents = Cents::positive(input.amount_cents)?;

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let now = self.clock.now();
        let transaction = Transaction {
            id: TransactionId::new(),
            transaction_type: input.transaction_type,
            category: category.to_string(),
            amount_cents,
            occurred_at: now,
            description,
            created_at: now,
            updated_at: now,
        };

        self.store.create(&transaction).await?;

        info!(transaction_id = %transaction.id, amount_cents = amount_cents.value(), "transaction recorded");
        Ok(transaction)
    }

    /// Lists transactions with `from <= occurred_at <= to`
    ///
    /// Bounds may be in any time zone; both are converted to UTC first.
    ///
    /// # Errors
    ///
    /// `BadRequest` if `to` is before `from`; the store is not queried
    pub async fn list_by_period<Tz: TimeZone>(
        &self,
        from: DateTime<Tz>,
        to: DateTime<Tz>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let from = from.with_timezone(&Utc);
        let to = to.with_timezone(&Utc);
        if to < from {
            return Err(LedgerError::bad_request(format!(
                "invalid period: 'to' ({}) is before 'from' ({})",
                to, from
            )));
        }

        debug!(%from, %to, "listing transactions");
        Ok(self.store.list_by_period(from, to).await?)
    }

    /// Deletes a transaction
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown
    #[instrument(skip(self), fields(transaction_id = %id))]
    pub async fn delete(&self, id: TransactionId) -> Result<(), LedgerError> {
        self.store.delete(id).await?;
        info!("transaction deleted");
        Ok(())
    }

    /// Aggregates one calendar month
    ///
    /// # Errors
    ///
    /// `BadRequest` if `month` is outside 1..=12
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary, LedgerError> {
        let period = MonthPeriod::new(year, month)?;
        Ok(self.store.monthly_summary(period).await?)
    }

    /// Summarizes, renders and dispatches the report for one month
    ///
    /// Returns as soon as the upload has been handed off; upload success or
    /// failure never affects the result.
    #[instrument(skip(self))]
    pub async fn generate_monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport, LedgerError> {
        let period = MonthPeriod::new(year, month)?;
        let summary = self.store.monthly_summary(period).await?;
        let text = render_report(&summary, self.currency);
        let key = period.report_key();

        let dispatch = self.dispatcher.dispatch(key.clone(), text.clone());
        info!(key = %key, ?dispatch, "monthly report generated");

        Ok(MonthlyReport {
            location: self.dispatcher.location(&key),
            summary,
            text,
            key,
            dispatch,
        })
    }

    /// Health of the underlying store
    pub async fn readiness(&self) -> HealthCheckResult {
        self.store.health_check().await
    }
}
