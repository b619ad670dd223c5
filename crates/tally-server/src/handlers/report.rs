//! Detailed reports from the relational store

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tally_core::storage::REPORT_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Sales,
    Salaries,
}

impl std::str::FromStr for ReportKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(ReportKind::Sales),
            "salaries" => Ok(ReportKind::Salaries),
            _ => Err(ApiError::bad_request("Invalid report type.")),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Sales => write!(f, "sales"),
            ReportKind::Salaries => write!(f, "salaries"),
        }
    }
}

pub async fn report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Response, ApiError> {
    let kind: ReportKind = kind.parse()?;
    tracing::info!("Reading detailed '{}' report from the relational store", kind);

    // Each read checks out its own pooled connection and returns it on drop
    let result = match kind {
        ReportKind::Sales => state
            .records
            .recent_sales(REPORT_LIMIT)
            .await
            .map(|rows| (rows.len(), Json(rows).into_response())),
        ReportKind::Salaries => state
            .records
            .recent_salaries(REPORT_LIMIT)
            .await
            .map(|rows| (rows.len(), Json(rows).into_response())),
    };

    match result {
        Ok((count, response)) => {
            tracing::info!("Fetched {} rows for '{}' report", count, kind);
            Ok(response)
        }
        Err(e) => {
            tracing::error!("Failed to read '{}' report: {}", kind, e);
            Err(ApiError::internal("Failed to fetch detailed report."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_parsing() {
        assert_eq!("sales".parse::<ReportKind>().unwrap(), ReportKind::Sales);
        assert_eq!("salaries".parse::<ReportKind>().unwrap(), ReportKind::Salaries);
        assert_eq!(ReportKind::Salaries.to_string(), "salaries");

        let err = "Sales".parse::<ReportKind>().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
