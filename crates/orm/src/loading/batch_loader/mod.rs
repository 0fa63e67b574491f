use std::hash::Hash;

use indexmap::IndexSet;

use crate::{
    backends::{DatabasePool, DatabaseValue, SqlDialect},
    error::{OrmError, OrmResult},
    models::FromDatabaseRow,
};

pub mod config;

pub use config::BatchConfig;

/// Rendered `column IN (...)` predicate and the values bound to it
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipClause {
    pub sql: String,
    pub params: Vec<DatabaseValue>,
}

/// Build a membership predicate for `keys`.
///
/// `first_param` is the zero-based index of the first placeholder, for
/// statements that bind other parameters before this clause. An empty key
/// set is rejected: `IN ()` is a syntax error in PostgreSQL and callers must
/// short-circuit before getting here.
pub fn membership_clause<K>(
    column: &str,
    keys: &[K],
    dialect: SqlDialect,
    first_param: usize,
) -> OrmResult<MembershipClause>
where
    K: Clone + Into<DatabaseValue>,
{
    if keys.is_empty() {
        return Err(OrmError::Configuration(format!(
            "membership filter on '{}' needs at least one key",
            column
        )));
    }

    let placeholders: Vec<String> = (0..keys.len())
        .map(|i| dialect.parameter_placeholder(first_param + i))
        .collect();

    Ok(MembershipClause {
        sql: format!("{} IN ({})", column, placeholders.join(", ")),
        params: keys.iter().cloned().map(Into::into).collect(),
    })
}

/// Distinct keys in first-seen order
pub fn distinct_keys<K, I>(keys: I) -> Vec<K>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    keys.into_iter().collect::<IndexSet<K>>().into_iter().collect()
}

/// Shape of a batch query: a base SELECT, the key column to filter on, and
/// an optional ORDER BY list appended after the membership predicate
#[derive(Debug, Clone, Copy)]
pub struct BatchQuery {
    pub select: &'static str,
    pub key_column: &'static str,
    pub order_by: Option<&'static str>,
}

impl BatchQuery {
    /// Render the full statement for one chunk of keys
    pub fn render(&self, keys: &[i64], dialect: SqlDialect) -> OrmResult<(String, Vec<DatabaseValue>)> {
        let clause = membership_clause(self.key_column, keys, dialect, 0)?;
        let mut sql = format!("{} WHERE {}", self.select, clause.sql);
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        Ok((sql, clause.params))
    }
}

/// Batch loader for membership-filtered fetches
#[derive(Debug, Clone, Default)]
pub struct BatchLoader {
    config: BatchConfig,
}

impl BatchLoader {
    /// Create a new batch loader with default configuration
    pub fn new() -> Self {
        Self::with_config(BatchConfig::default())
    }

    /// Create a new batch loader with custom configuration
    pub fn with_config(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Fetch every row whose key column is one of `keys`.
    ///
    /// Keys are bound in chunks of at most `max_batch_size`; with fewer keys
    /// than that this is a single round trip. Chunk results are concatenated
    /// in chunk order, so rows stay sorted by the query's ORDER BY whenever
    /// `keys` is itself ascending. No query is issued for an empty key set.
    pub async fn load<T: FromDatabaseRow>(
        &self,
        pool: &dyn DatabasePool,
        query: &BatchQuery,
        keys: &[i64],
    ) -> OrmResult<Vec<T>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let dialect = pool.sql_dialect();
        let chunk_size = self.config.effective_batch_size(dialect);
        let mut results = Vec::new();

        for chunk in keys.chunks(chunk_size) {
            let (sql, params) = query.render(chunk, dialect)?;

            tracing::debug!(
                column = query.key_column,
                keys = chunk.len(),
                "executing batch query"
            );

            let rows = pool
                .fetch_all(&sql, &params)
                .await
                .map_err(|e| e.context(format!("batch query on '{}' failed", query.key_column)))?;

            results.reserve(rows.len());
            for row in rows {
                let value = T::from_row(row.as_ref())
                    .map_err(|e| e.context(format!("failed to scan batch row for '{}'", query.key_column)))?;
                results.push(value);
            }
        }

        Ok(results)
    }
}
