//! Scenario tests for the orchestrator and pipeline driver

use crate::{ExtractorConfig, ExtractorError, FailureKind, Orchestrator, PipelineDriver};
use docflow_client::MockExtractionClient;
use docflow_domain::{
    Category, CategorySchema, ExtractionError, FieldSpec, FieldType, RawDocument,
    SchemaDescription, SchemaRegistry,
};
use docflow_store::{MemoryPublisher, MemorySource};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn order_payload(order_id: &str) -> Value {
    json!({
        "order_id": order_id,
        "order_date": "2024-01-15",
        "customer_name": "Dana Reyes",
        "customer_email": "dana@example.com",
        "items": [{
            "product_code": "CAT-TOY-3",
            "description": "Feather wand",
            "quantity": 3,
            "unit_price": 4.0,
            "total": 12.0
        }],
        "subtotal": 12.0,
        "tax": 0.96,
        "total": 12.96
    })
}

fn catalog_payload(period: &str) -> Value {
    json!({
        "catalog_period": period,
        "products": [{
            "product_code": "AQ-FILTER-40",
            "name": "Aquarium filter",
            "description": "Filter for tanks up to 40L",
            "price": 29.99
        }]
    })
}

fn orders_source(count: usize) -> MemorySource {
    (1..=count).fold(MemorySource::new(), |source, n| {
        source.with_document(Category::orders(), format!("orders/{}.pdf", n), b"%PDF".to_vec())
    })
}

fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::builtin())
}

fn driver(
    source: MemorySource,
    client: MockExtractionClient,
    publisher: MemoryPublisher,
    config: ExtractorConfig,
) -> PipelineDriver<MemorySource, MockExtractionClient, MemoryPublisher> {
    PipelineDriver::new(source, client, publisher, registry(), config).unwrap()
}

#[tokio::test]
async fn test_failure_isolated_to_failing_document() {
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_response("orders/2.pdf", json!({}));
    client.add_response("orders/3.pdf", order_payload("ORD-3"));

    let orchestrator = Orchestrator::new(client.clone(), registry(), ExtractorConfig::default()).unwrap();
    let docs = (1..=3)
        .map(|n| RawDocument::new(format!("orders/{}.pdf", n), Category::orders(), b"%PDF".to_vec()))
        .collect();

    let batch = orchestrator.extract_category(&Category::orders(), docs).await.unwrap();

    assert_eq!(batch.total(), 3);
    assert_eq!(batch.successes.len(), 2);
    assert_eq!(batch.successes[0].location, "orders/1.pdf");
    assert_eq!(batch.successes[1].location, "orders/3.pdf");
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].location, "orders/2.pdf");
    assert_eq!(batch.failures[0].kind, FailureKind::NoDataInResponse);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_empty_listing_gives_empty_batch() {
    let client = MockExtractionClient::default();
    let orchestrator = Orchestrator::new(client.clone(), registry(), ExtractorConfig::default()).unwrap();

    let batch = orchestrator
        .extract_category(&Category::invoices(), Vec::new())
        .await
        .unwrap();

    assert!(batch.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_orchestrator_rejects_unknown_category() {
    let orchestrator =
        Orchestrator::new(MockExtractionClient::default(), registry(), ExtractorConfig::default()).unwrap();
    let receipts = Category::new("receipts").unwrap();

    let err = orchestrator.extract_category(&receipts, Vec::new()).await.unwrap_err();
    assert!(err.is_unknown_category());
}

#[tokio::test]
async fn test_catalog_published_under_normalized_period() {
    let source = MemorySource::new()
        .with_document(Category::catalogs(), "catalogs/spring.pdf", b"%PDF".to_vec());
    let client = MockExtractionClient::new(catalog_payload("Q1 2024"));
    let publisher = MemoryPublisher::new();

    let report = driver(source, client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::catalogs()])
        .await
        .unwrap();

    let catalogs = report.get(&Category::catalogs()).unwrap();
    assert_eq!(catalogs.successes, 1);
    assert!(catalogs.failures.is_empty());
    assert_eq!(catalogs.published[0].identifier, "Q1_2024");
    assert_eq!(publisher.locations(), vec!["catalogs/Q1_2024"]);

    let body: Value = serde_json::from_str(&publisher.get("catalogs/Q1_2024").unwrap()).unwrap();
    assert_eq!(body["catalog_period"], "Q1 2024");
    assert_eq!(body["products"][0]["specifications"], "");
}

#[tokio::test]
async fn test_transport_failure_on_second_order() {
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_error("orders/2.pdf", ExtractionError::transport("connection reset"));
    let publisher = MemoryPublisher::new();

    let report = driver(orders_source(2), client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.documents, 2);
    assert_eq!(orders.successes, 1);
    assert_eq!(orders.failures.len(), 1);
    assert_eq!(orders.failures[0].location, "orders/2.pdf");
    assert_eq!(orders.failures[0].kind, FailureKind::TransportFailure);
    assert_eq!(publisher.locations(), vec!["orders/ORD-1"]);
}

#[tokio::test]
async fn test_schema_mismatch_is_recorded() {
    let client = MockExtractionClient::new(json!({"order_id": "ORD-1", "total": "a lot"}));

    let report = driver(orders_source(1), client, MemoryPublisher::new(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.failures_of(FailureKind::SchemaMismatch), 1);
    assert_eq!(orders.successes, 0);
}

#[tokio::test]
async fn test_unknown_category_fails_before_listing() {
    let source = orders_source(2);
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    let publisher = MemoryPublisher::new();
    let receipts = Category::new("receipts").unwrap();

    let result = driver(source.clone(), client.clone(), publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders(), receipts])
        .await;

    assert!(matches!(result, Err(ref e) if e.is_unknown_category()));
    assert_eq!(source.list_calls(), 0);
    assert_eq!(client.call_count(), 0);
    assert!(publisher.is_empty());
}

#[tokio::test]
async fn test_listing_failure_does_not_stop_run() {
    let source = orders_source(1)
        .with_document(Category::catalogs(), "catalogs/q1.pdf", b"%PDF".to_vec())
        .with_failing_category(Category::invoices());
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_response("catalogs/q1.pdf", catalog_payload("Q1 2024"));
    let publisher = MemoryPublisher::new();

    let report = driver(source.clone(), client, publisher.clone(), ExtractorConfig::default())
        .run_all()
        .await
        .unwrap();

    let invoices = report.get(&Category::invoices()).unwrap();
    assert!(invoices.has_listing_failure());
    assert_eq!(invoices.failures.len(), 1);

    assert_eq!(report.total_successes(), 2);
    assert_eq!(source.list_calls(), 3);
    assert_eq!(publisher.locations(), vec!["catalogs/Q1_2024", "orders/ORD-1"]);
}

#[tokio::test]
async fn test_run_all_follows_registry_order() {
    let report = driver(
        MemorySource::new(),
        MockExtractionClient::default(),
        MemoryPublisher::new(),
        ExtractorConfig::default(),
    )
    .run_all()
    .await
    .unwrap();

    let order: Vec<_> = report.categories.iter().map(|r| r.category.to_string()).collect();
    assert_eq!(order, vec!["orders", "invoices", "catalogs"]);
    assert!(report.is_clean());
    assert!(report.categories.iter().all(|r| r.documents == 0));
}

#[tokio::test]
async fn test_repeated_category_processed_once() {
    let source = orders_source(1);
    let client = MockExtractionClient::new(order_payload("ORD-1"));

    let report = driver(source.clone(), client.clone(), MemoryPublisher::new(), ExtractorConfig::default())
        .run(&[Category::orders(), Category::orders()])
        .await
        .unwrap();

    assert_eq!(report.categories.len(), 1);
    assert_eq!(source.list_calls(), 1);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_publish_failure_moves_document_to_failures() {
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_response("orders/2.pdf", order_payload("ORD-2"));
    let publisher = MemoryPublisher::new();
    publisher.fail_on("orders/ORD-2");

    let report = driver(orders_source(2), client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 1);
    assert_eq!(orders.successes + orders.failures.len(), orders.documents);
    assert_eq!(orders.failures[0].location, "orders/2.pdf");
    assert_eq!(orders.failures[0].kind, FailureKind::PublishFailure);
    assert_eq!(publisher.publish_calls(), 2);
}

#[tokio::test]
async fn test_duplicate_identifier_gets_ordinal_suffix() {
    let client = MockExtractionClient::new(order_payload("ORD-7"));
    let publisher = MemoryPublisher::new();

    let report = driver(orders_source(3), client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 3);
    assert_eq!(publisher.len(), orders.successes);
    assert_eq!(
        publisher.locations(),
        vec!["orders/ORD-7", "orders/ORD-7_1", "orders/ORD-7_2"]
    );
    assert_eq!(orders.published[0].source, "orders/1.pdf");
    assert_eq!(orders.published[1].identifier, "ORD-7_1");
}

#[tokio::test]
async fn test_fallback_colliding_with_real_identifier() {
    let client = MockExtractionClient::new(order_payload("order_1"));
    client.add_response("orders/2.pdf", order_payload("   "));
    let publisher = MemoryPublisher::new();

    let report = driver(orders_source(2), client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 2);
    assert!(orders.failures.is_empty());
    assert_eq!(publisher.locations(), vec!["orders/order_1", "orders/order_1_1"]);
    assert!(publisher.get("orders/order_1").unwrap().contains("\"order_1\""));
}

#[tokio::test]
async fn test_suffix_skips_identifiers_already_taken() {
    let client = MockExtractionClient::new(order_payload("A"));
    client.add_response("orders/2.pdf", order_payload("A_2"));
    client.add_response("orders/3.pdf", order_payload("A"));
    let publisher = MemoryPublisher::new();

    let report = driver(orders_source(3), client, publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 3);
    assert_eq!(publisher.locations(), vec!["orders/A", "orders/A_2", "orders/A_2_1"]);
}

#[tokio::test]
async fn test_unreadable_document_isolated_from_siblings() {
    let source = MemorySource::new()
        .with_document(Category::orders(), "orders/1.pdf", b"%PDF".to_vec())
        .with_unreadable_document(Category::orders(), "orders/2.pdf")
        .with_document(Category::orders(), "orders/3.pdf", b"%PDF".to_vec());
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_response("orders/3.pdf", order_payload("ORD-3"));
    let publisher = MemoryPublisher::new();

    let report = driver(source, client.clone(), publisher.clone(), ExtractorConfig::default())
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.documents, 3);
    assert_eq!(orders.successes, 2);
    assert_eq!(orders.failures.len(), 1);
    assert_eq!(orders.failures[0].location, "orders/2.pdf");
    assert_eq!(orders.failures[0].kind, FailureKind::ReadFailure);
    assert!(!orders.has_listing_failure());
    assert_eq!(client.calls(), vec!["orders/1.pdf", "orders/3.pdf"]);
    assert_eq!(publisher.locations(), vec!["orders/ORD-1", "orders/ORD-3"]);
}

#[tokio::test]
async fn test_fallback_ordinal_counts_successes() {
    let receipt = SchemaDescription::new("Receipt")
        .with_field(FieldSpec::optional("receipt_no", FieldType::String, "Receipt number", json!("")))
        .with_field(FieldSpec::required("total", FieldType::Decimal, "Total"));
    let receipts = Category::new("receipts").unwrap();
    let registry = SchemaRegistry::builder()
        .register(CategorySchema::new(receipts.clone(), "receipt", receipt, Some("receipt_no")))
        .build()
        .unwrap();

    let source = (1..=3).fold(MemorySource::new(), |source, n| {
        source.with_document(receipts.clone(), format!("receipts/{}.pdf", n), b"%PDF".to_vec())
    });
    let client = MockExtractionClient::new(json!({"total": 5}));
    client.add_error("receipts/1.pdf", ExtractionError::transport("unreachable"));
    let publisher = MemoryPublisher::new();

    let driver = PipelineDriver::new(
        source,
        client,
        publisher.clone(),
        Arc::new(registry),
        ExtractorConfig::default(),
    )
    .unwrap();
    let report = driver.run(&[receipts.clone()]).await.unwrap();

    let published: Vec<_> = report.get(&receipts).unwrap().published.iter()
        .map(|p| p.identifier.as_str())
        .collect();
    assert_eq!(published, vec!["receipt_0", "receipt_1"]);
    assert_eq!(publisher.locations(), vec!["receipts/receipt_0", "receipts/receipt_1"]);
}

#[tokio::test]
async fn test_concurrency_preserves_order_and_limit() {
    let client = MockExtractionClient::new(order_payload("ORD-0"));
    for n in 1..=6 {
        client.add_response(format!("orders/{}.pdf", n), order_payload(&format!("ORD-{}", n)));
        // Earlier documents finish last
        client.add_delay(format!("orders/{}.pdf", n), Duration::from_millis(70 - n as u64 * 10));
    }
    client.add_error("orders/4.pdf", ExtractionError::transport("dropped"));
    let publisher = MemoryPublisher::new();

    let report = driver(orders_source(6), client.clone(), publisher.clone(), ExtractorConfig::concurrent(3))
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 5);
    assert_eq!(orders.failures.len(), 1);
    assert_eq!(orders.failures[0].location, "orders/4.pdf");

    let sources: Vec<_> = orders.published.iter().map(|p| p.source.as_str()).collect();
    assert_eq!(
        sources,
        vec!["orders/1.pdf", "orders/2.pdf", "orders/3.pdf", "orders/5.pdf", "orders/6.pdf"]
    );
    assert!(client.max_in_flight() <= 3);
    assert!(client.max_in_flight() > 1);
    assert_eq!(client.call_count(), 6);
}

#[tokio::test]
async fn test_sequential_runs_one_at_a_time() {
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    for n in 1..=3 {
        client.add_delay(format!("orders/{}.pdf", n), Duration::from_millis(5));
    }

    driver(orders_source(3), client.clone(), MemoryPublisher::new(), ExtractorConfig::sequential())
        .run(&[Category::orders()])
        .await
        .unwrap();

    assert_eq!(client.max_in_flight(), 1);
    assert_eq!(client.calls(), vec!["orders/1.pdf", "orders/2.pdf", "orders/3.pdf"]);
}

#[tokio::test]
async fn test_timeout_becomes_transport_failure() {
    let client = MockExtractionClient::new(order_payload("ORD-1"));
    client.add_delay("orders/2.pdf", Duration::from_secs(30));
    let config = ExtractorConfig {
        extraction_timeout_secs: 1,
        ..ExtractorConfig::default()
    };

    let report = driver(orders_source(2), client.clone(), MemoryPublisher::new(), config)
        .run(&[Category::orders()])
        .await
        .unwrap();

    let orders = report.get(&Category::orders()).unwrap();
    assert_eq!(orders.successes, 1);
    assert_eq!(orders.failures[0].location, "orders/2.pdf");
    assert_eq!(orders.failures[0].kind, FailureKind::TransportFailure);
    assert!(orders.failures[0].message.contains("timed out"));
    assert_eq!(client.in_flight(), 0);
    assert_eq!(client.max_in_flight(), 1);
}

#[test]
fn test_invalid_config_rejected() {
    let result = PipelineDriver::new(
        MemorySource::new(),
        MockExtractionClient::default(),
        MemoryPublisher::new(),
        registry(),
        ExtractorConfig::concurrent(0),
    );
    assert!(matches!(result, Err(ExtractorError::Config(_))));
}
