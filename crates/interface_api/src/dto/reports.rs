//! Summary and report DTOs

use serde::{Deserialize, Serialize};

use domain_ledger::{DispatchOutcome, MonthlyReport, MonthlySummary};

/// `?year=YYYY&month=M`
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// Summary fields flattened alongside the rendered report
#[derive(Debug, Serialize)]
pub struct MonthlyReportResponse {
    #[serde(flatten)]
    pub summary: MonthlySummary,
    pub report_text: String,
    pub report_key: String,
    pub report_location: String,
    pub dispatch: DispatchOutcome,
}

impl From<MonthlyReport> for MonthlyReportResponse {
    fn from(report: MonthlyReport) -> Self {
        Self {
            summary: report.summary,
            report_text: report.text,
            report_key: report.key,
            report_location: report.location,
            dispatch: report.dispatch,
        }
    }
}
