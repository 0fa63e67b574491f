mod common;

use std::sync::Arc;

use common::{detail, order, Dataset};
use nplus1_orm::repository::sql;
use nplus1_orm::{
    BatchConfig, BatchLoader, DatabaseValue, MemoryPool, MemoryRow, OrderFilter, OrderRepository, OrderWithDetails,
    OrmError,
};

fn detail_ids(aggregates: &[OrderWithDetails]) -> Vec<(i64, Vec<i64>)> {
    aggregates
        .iter()
        .map(|a| (a.order.order_id, a.details.iter().map(|d| d.detail_id).collect()))
        .collect()
}

#[tokio::test]
async fn test_all_strategies_assemble_the_same_orders() {
    let pool = Dataset::orders_scenario().pool();
    let repository = OrderRepository::new(&pool);
    let filter = OrderFilter::default();

    let naive = repository.fetch_naive(&filter).await.unwrap();
    let join = repository.fetch_join(&filter).await.unwrap();
    let batch = repository.fetch_batch(&filter).await.unwrap();

    assert_eq!(
        detail_ids(&naive),
        vec![(1, vec![11, 12]), (2, vec![]), (3, vec![31])]
    );
    assert_eq!(naive, join);
    assert_eq!(naive, batch);
}

#[tokio::test]
async fn test_round_trips_per_strategy() {
    let pool = Dataset::orders_scenario().pool();
    let repository = OrderRepository::new(&pool);
    let filter = OrderFilter::default();

    repository.fetch_naive(&filter).await.unwrap();
    assert_eq!(pool.query_count(), 4);

    pool.clear_log();
    repository.fetch_join(&filter).await.unwrap();
    assert_eq!(pool.query_count(), 1);

    pool.clear_log();
    repository.fetch_batch(&filter).await.unwrap();
    let queries = pool.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].sql, sql::ORDERS_BY_DAYS);
    assert_eq!(queries[0].params, vec![DatabaseValue::Int32(30)]);
    assert_eq!(
        queries[1].params,
        vec![DatabaseValue::Int64(1), DatabaseValue::Int64(2), DatabaseValue::Int64(3)]
    );
}

#[tokio::test]
async fn test_no_matching_orders_needs_a_single_query() {
    let dataset = Dataset {
        orders: vec![order(1, 400)],
        details: vec![detail(11, 1)],
        ..Dataset::default()
    };
    let pool = dataset.pool();
    let repository = OrderRepository::new(&pool);
    let filter = OrderFilter::last_days(30).unwrap();

    for strategy in ["naive", "join", "batch"] {
        pool.clear_log();
        let aggregates = match strategy {
            "naive" => repository.fetch_naive(&filter).await,
            "join" => repository.fetch_join(&filter).await,
            _ => repository.fetch_batch(&filter).await,
        }
        .unwrap();

        assert!(aggregates.is_empty(), "{} returned orders", strategy);
        assert_eq!(pool.query_count(), 1, "{} issued extra queries", strategy);
    }
}

#[tokio::test]
async fn test_filter_window_excludes_older_orders() {
    let dataset = Dataset {
        orders: vec![order(1, 2), order(2, 45), order(3, 10)],
        details: vec![detail(21, 2), detail(31, 3)],
        ..Dataset::default()
    };
    let pool = dataset.pool();
    let repository = OrderRepository::new(&pool);
    let filter = OrderFilter::last_days(30).unwrap();

    let batch = repository.fetch_batch(&filter).await.unwrap();
    assert_eq!(detail_ids(&batch), vec![(1, vec![]), (3, vec![31])]);
    assert_eq!(batch, repository.fetch_join(&filter).await.unwrap());
}

#[tokio::test]
async fn test_batch_chunks_large_key_sets() {
    let pool = Dataset::orders_scenario().pool();
    let loader = BatchLoader::with_config(BatchConfig { max_batch_size: 2 });
    let repository = OrderRepository::with_batch_loader(&pool, loader);
    let filter = OrderFilter::default();

    let batch = repository.fetch_batch(&filter).await.unwrap();

    assert_eq!(pool.query_count(), 3);
    assert_eq!(batch, repository.fetch_naive(&filter).await.unwrap());
}

#[tokio::test]
async fn test_naive_failure_names_the_order() {
    let data = Arc::new(Dataset::orders_scenario());
    let pool = MemoryPool::new(move |statement, params| {
        if statement == sql::DETAILS_BY_ORDER_ID {
            return Err(OrmError::Query("connection reset".into()));
        }
        data.answer(statement, params)
    });
    let repository = OrderRepository::new(&pool);

    let err = repository.fetch_naive(&OrderFilter::default()).await.unwrap_err();

    assert!(err.to_string().contains("failed to get details for order 1"));
    assert!(matches!(err.root(), OrmError::Query(_)));
    // stops at the first failing order
    assert_eq!(pool.query_count(), 2);
}

#[tokio::test]
async fn test_join_row_missing_columns_is_a_scan_error() {
    let pool = MemoryPool::new(|statement, _| {
        if statement == sql::ORDERS_WITH_DETAILS_JOIN {
            return Ok(vec![MemoryRow::new().with("order_id", 1_i64)]);
        }
        Ok(Vec::new())
    });
    let repository = OrderRepository::new(&pool);

    let err = repository.fetch_join(&OrderFilter::default()).await.unwrap_err();

    assert!(err.is_scan());
    assert!(err.to_string().contains("failed to scan join row"));
    assert!(err.to_string().contains("customer_id"));
}
