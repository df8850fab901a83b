mod common;

use chrono::Duration;
use common::{cloudwatch_config, series, utc, StubSource};
use p2k_server::core::{MetricsClient, MetricsError};
use p2k_server::utils::Metric;

#[tokio::test]
async fn test_fetch_cpu_returns_points_in_stub_order() {
    let stub = StubSource::returning(vec![series("q1", 12)]);
    let client = MetricsClient::new(&cloudwatch_config(), stub.clone()).unwrap();

    let data = client.fetch_metric_by_name("CPUUtilization", "q1").await.unwrap();

    let expected = series("q1", 12);
    assert_eq!(data.len(), 12);
    assert_eq!(data.timestamps, expected.timestamps);
    assert_eq!(data.values, expected.values);

    let pairs: Vec<_> = data.points().collect();
    assert_eq!(pairs[0], (expected.timestamps[0], expected.values[0]));
    assert_eq!(pairs[11], (expected.timestamps[11], expected.values[11]));
}

#[tokio::test]
async fn test_query_carries_catalog_constants() {
    let stub = StubSource::returning(vec![series("networkInQuery", 1)]);
    let client = MetricsClient::new(&cloudwatch_config(), stub.clone()).unwrap();

    client.network_in().await.unwrap();

    let queries = stub.recorded();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query.query_id, "networkInQuery");
    assert_eq!(query.metric_name, "NetworkIn");
    assert_eq!(query.namespace, "AWS/EC2");
    assert_eq!(query.dimension_name, "InstanceId");
    assert_eq!(query.dimension_value, "i-0123456789abcdef0");
    assert_eq!(query.statistic, "Average");
    assert_eq!(query.period, 300);
    assert_eq!(query.max_datapoints, 100);
    assert_eq!(query.end - query.start, Duration::hours(24));
}

#[tokio::test]
async fn test_window_is_previous_seoul_day() {
    let stub = StubSource::returning(vec![]);
    let client = MetricsClient::new(&cloudwatch_config(), stub.clone()).unwrap();

    // 2024-05-02 09:30 KST
    client
        .fetch_metric_at(Metric::DiskReadBytes, "d", utc(2024, 5, 2, 0, 30))
        .await
        .unwrap();

    let query = &stub.recorded()[0];
    assert_eq!(query.start, utc(2024, 4, 30, 15, 0));
    assert_eq!(query.end, utc(2024, 5, 1, 15, 0));
}

#[tokio::test]
async fn test_every_catalog_metric_is_fetchable() {
    let stub = StubSource::returning(vec![]);
    let client = MetricsClient::new(&cloudwatch_config(), stub.clone()).unwrap();

    for metric in Metric::all() {
        client.fetch_metric(metric, metric.default_query_id()).await.unwrap();
    }

    let names: Vec<_> = stub.recorded().into_iter().map(|q| q.metric_name).collect();
    assert_eq!(names.len(), 11);
    assert!(names.contains(&"StatusCheckFailed_Instance".to_string()));
    assert!(names.contains(&"NetworkPacketsOut".to_string()));
}

#[tokio::test]
async fn test_remote_failure_is_typed() {
    let client = MetricsClient::new(&cloudwatch_config(), StubSource::failing("Throttling")).unwrap();

    match client.cpu_utilization().await {
        Err(MetricsError::Remote(msg)) => assert_eq!(msg, "Throttling"),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_metric_never_reaches_remote() {
    let stub = StubSource::returning(vec![]);
    let client = MetricsClient::new(&cloudwatch_config(), stub.clone()).unwrap();

    let err = client.fetch_metric_by_name("GPUUtilization", "q1").await.unwrap_err();
    assert!(matches!(err, MetricsError::UnknownMetric(_)));
    assert!(stub.recorded().is_empty());
}
