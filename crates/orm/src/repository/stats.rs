//! Table row counts

use serde::Serialize;

use super::sql;
use crate::backends::{DatabasePool, DatabaseRowExt};
use crate::error::{OrmError, OrmResult};

/// Row count of one table, or the error that prevented counting it
#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    #[serde(flatten)]
    pub outcome: CountOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountOutcome {
    Rows(i64),
    Error(String),
}

async fn count_table(pool: &dyn DatabasePool, table: &str) -> OrmResult<i64> {
    let row = pool
        .fetch_optional(&sql::count_rows(table), &[])
        .await?
        .ok_or_else(|| OrmError::Query(format!("COUNT(*) on '{}' returned no row", table)))?;

    row.get("row_count")
}

/// Count rows in each demo table.
///
/// A table that cannot be counted is reported and does not stop the others.
pub async fn table_counts(pool: &dyn DatabasePool) -> Vec<TableCount> {
    let mut counts = Vec::with_capacity(sql::COUNTED_TABLES.len());

    for table in sql::COUNTED_TABLES {
        let outcome = match count_table(pool, table).await {
            Ok(rows) => CountOutcome::Rows(rows),
            Err(e) => {
                tracing::warn!(table, error = %e, "failed to count rows");
                CountOutcome::Error(e.to_string())
            }
        };
        counts.push(TableCount { table, outcome });
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MemoryPool, MemoryRow};

    #[tokio::test]
    async fn test_counts_continue_past_failing_table() {
        let pool = MemoryPool::new(|sql, _| {
            if sql.contains("FROM employees") {
                return Err(OrmError::Query("relation \"employees\" does not exist".into()));
            }
            Ok(vec![MemoryRow::new().with("row_count", 12_i64)])
        });

        let counts = table_counts(&pool).await;

        assert_eq!(counts.len(), 4);
        assert_eq!(
            counts.iter().map(|c| c.table).collect::<Vec<_>>(),
            vec!["orders", "order_details", "employees", "departments"]
        );
        assert!(matches!(counts[0].outcome, CountOutcome::Rows(12)));
        assert!(matches!(counts[2].outcome, CountOutcome::Error(ref e) if e.contains("employees")));
        assert!(matches!(counts[3].outcome, CountOutcome::Rows(12)));
    }
}
