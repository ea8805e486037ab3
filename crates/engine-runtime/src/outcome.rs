use model::records::table::ResultTable;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Queries slower than this are logged at info level.
const SLOW_QUERY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryStatus {
    Ok,
    /// Rejected before execution: the query did not parse or compile.
    Rejected,
    /// The backend failed while running a valid query.
    Failed,
}

impl QueryStatus {
    pub fn code(&self) -> i32 {
        match self {
            QueryStatus::Ok => 0,
            QueryStatus::Rejected => -1,
            QueryStatus::Failed => 1,
        }
    }
}

/// Result of one query: the rows, a status and a message that is empty on
/// success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub table: ResultTable,
    pub status: QueryStatus,
    pub message: String,
}

impl QueryOutcome {
    pub fn ok(table: ResultTable) -> Self {
        Self {
            table,
            status: QueryStatus::Ok,
            message: String::new(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            table: ResultTable::empty(),
            status: QueryStatus::Rejected,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            table: ResultTable::empty(),
            status: QueryStatus::Failed,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == QueryStatus::Ok
    }

    pub fn code(&self) -> i32 {
        self.status.code()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.code(),
            "message": self.message,
            "rows": self.table.to_json_records(),
        })
    }
}

/// Runs `f`, logging how long it took when that exceeds the slow-query
/// threshold.
pub(crate) fn timed<T>(label: &str, input: &str, f: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    if elapsed > SLOW_QUERY {
        info!("{} '{}' took {:.3}s", label, input, elapsed.as_secs_f64());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryOutcome::ok(ResultTable::empty()).code(), 0);
        assert_eq!(QueryOutcome::rejected("No valid query string").code(), -1);

        let failed = QueryOutcome::failed("no such column: x");
        assert_eq!(failed.code(), 1);
        assert_eq!(failed.to_json()["message"], "no such column: x");
    }
}
