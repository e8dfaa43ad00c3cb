//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract snapshots of the reply bodies
//! - Invocation -> aggregate -> dispatcher -> sinks, with no network
//! - The HTTP host driven through the router

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use contracts::{ContractError, IdGenerator, OutputKind, OutputSink, SinkOutput};

    /// Id source that always fails
    #[derive(Debug)]
    pub struct FailingIds;

    impl IdGenerator for FailingIds {
        fn next_id(&self) -> Result<String, ContractError> {
            Err(ContractError::id_generation("injected failure"))
        }
    }

    /// Sink that counts write calls and keeps what it saw
    pub struct RecordingSink {
        name: String,
        kind: OutputKind,
        pub writes: Arc<AtomicU64>,
        pub seen: Arc<Mutex<Vec<SinkOutput>>>,
    }

    impl RecordingSink {
        pub fn new(name: &str, kind: OutputKind) -> Self {
            Self {
                name: name.to_string(),
                kind,
                writes: Arc::new(AtomicU64::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl OutputSink for RecordingSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> OutputKind {
            self.kind
        }

        async fn write(&mut self, output: &SinkOutput) -> Result<(), ContractError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(output.clone());
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{ErrorResponse, HttpReply, INTERNAL_ERROR_MESSAGE};

    #[test]
    fn test_internal_error_body_is_exact() {
        let reply = HttpReply::internal_error();
        let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "Internal server error occurred" })
        );
        assert_eq!(body.as_object().unwrap().len(), 1);

        let typed: ErrorResponse = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(typed.error, INTERNAL_ERROR_MESSAGE);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, Utc};
    use contracts::{InvocationRequest, OutputKind, SinkOutput, SinkOutputs, WELCOME_MESSAGE};
    use dispatcher::{Dispatcher, ResultAggregator, SinkHandle};
    use synthesizer::{ManualClock, RecordSynthesizer, SystemClock, UuidGenerator};
    use tokio::sync::mpsc;

    use crate::support::{FailingIds, RecordingSink};

    fn production_aggregator() -> ResultAggregator {
        let synthesizer = RecordSynthesizer::new(Arc::new(UuidGenerator));
        ResultAggregator::new(synthesizer, Arc::new(SystemClock))
    }

    fn failing_aggregator() -> ResultAggregator {
        let synthesizer = RecordSynthesizer::new(Arc::new(FailingIds));
        ResultAggregator::new(synthesizer, Arc::new(SystemClock))
    }

    fn body_json(result: &contracts::AggregateResult) -> serde_json::Value {
        serde_json::from_slice(result.http_response().body()).unwrap()
    }

    /// Normal GET: welcome reply with a UUID id and both payloads present
    #[test]
    fn test_success_reply() {
        let result = production_aggregator().handle(&InvocationRequest::get("inv-1", "/api/fn"));

        assert_eq!(result.http_response().status(), 200);
        let body = body_json(&result);
        assert_eq!(body["message"], WELCOME_MESSAGE);
        assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
        assert!(body["functionMessage"]
            .as_str()
            .unwrap()
            .contains("Function executed at"));

        let record = result.document_payload().unwrap();
        assert_eq!(body["id"], record.id());
        assert_eq!(body["functionMessage"], record.message());
        assert_eq!(record.partition_key(), "1");
        assert!(result.blob_payload().is_some());
    }

    /// Id generation failure: fixed 500 body and zero sink writes
    #[tokio::test]
    async fn test_failure_reaches_no_sink() {
        let docs = RecordingSink::new("docs", OutputKind::Document);
        let blobs = RecordingSink::new("blobs", OutputKind::Blob);
        let doc_writes = Arc::clone(&docs.writes);
        let blob_writes = Arc::clone(&blobs.writes);

        let (tx, rx) = mpsc::channel(16);
        let handle = Dispatcher::with_handles(
            vec![SinkHandle::spawn(docs, 8), SinkHandle::spawn(blobs, 8)],
            rx,
        )
        .spawn();

        let aggregator = failing_aggregator();
        for i in 0..3 {
            let result = aggregator.handle(&InvocationRequest::get(format!("inv-{i}"), "/"));

            assert_eq!(result.http_response().status(), 500);
            assert_eq!(
                body_json(&result),
                serde_json::json!({ "error": "Internal server error occurred" })
            );
            assert!(result.document_payload().is_none());
            assert!(result.blob_payload().is_none());

            let (outputs, _) = result.into_parts();
            tx.send(outputs).await.unwrap();
        }
        drop(tx);

        let summary = handle.await.unwrap();
        assert_eq!(summary.skipped, 3);
        assert_eq!(doc_writes.load(Ordering::SeqCst), 0);
        assert_eq!(blob_writes.load(Ordering::SeqCst), 0);
    }

    /// The blob is indented JSON of the same record the document sink receives
    #[test]
    fn test_blob_parses_back_to_document() {
        let result = production_aggregator().handle(&InvocationRequest::default());

        let blob = result.blob_payload().unwrap();
        assert!(blob.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(blob).unwrap();
        let record = result.document_payload().unwrap();
        assert_eq!(parsed["id"], record.id());
        assert_eq!(parsed["partitionKey"], record.partition_key());
        assert_eq!(parsed["message"], record.message());

        let timestamp: DateTime<Utc> =
            serde_json::from_value(parsed["timestamp"].clone()).unwrap();
        assert_eq!(timestamp, record.timestamp());
    }

    #[test]
    fn test_ids_unique_across_invocations() {
        let aggregator = production_aggregator();
        let ids: HashSet<String> = (0..1000)
            .map(|i| {
                let result = aggregator.handle(&InvocationRequest::get(format!("inv-{i}"), "/"));
                result.document_payload().unwrap().id().to_string()
            })
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_timestamps_follow_clock() {
        let clock = ManualClock::default();
        let synthesizer = RecordSynthesizer::new(Arc::new(UuidGenerator));
        let aggregator = ResultAggregator::new(synthesizer, Arc::new(clock.clone()));

        let mut last = None;
        for _ in 0..20 {
            clock.advance(chrono::Duration::milliseconds(5));
            let result = aggregator.handle(&InvocationRequest::default());
            let ts = result.document_payload().unwrap().timestamp();
            if let Some(prev) = last {
                assert!(ts > prev);
            }
            last = Some(ts);
        }
    }

    /// Success payloads reach each sink bound to their kind, exactly once
    #[tokio::test]
    async fn test_success_payloads_fan_out() {
        let docs = RecordingSink::new("docs", OutputKind::Document);
        let blobs = RecordingSink::new("blobs", OutputKind::Blob);
        let seen_docs = Arc::clone(&docs.seen);
        let seen_blobs = Arc::clone(&blobs.seen);

        let (tx, rx) = mpsc::channel::<SinkOutputs>(16);
        let handle = Dispatcher::with_handles(
            vec![SinkHandle::spawn(docs, 8), SinkHandle::spawn(blobs, 8)],
            rx,
        )
        .spawn();

        let result = production_aggregator().handle(&InvocationRequest::default());
        let expected_id = result.document_payload().unwrap().id().to_string();
        let (outputs, reply) = result.into_parts();
        assert_eq!(reply.status(), 200);
        tx.send(outputs).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let docs = seen_docs.lock().unwrap();
        assert_eq!(docs.len(), 1);
        match &docs[0] {
            SinkOutput::Document(record) => assert_eq!(record.id(), expected_id),
            other => panic!("unexpected payload: {other:?}"),
        }

        let blobs = seen_blobs.lock().unwrap();
        assert_eq!(blobs.len(), 1);
        match &blobs[0] {
            SinkOutput::Blob(text) => {
                let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
                assert_eq!(parsed["id"], expected_id);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    /// Config file -> file sinks on disk, through the real dispatcher
    #[tokio::test]
    async fn test_config_driven_file_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = format!(
            r#"
[function]
name = "ExampleHttpWithBindingTrigger"

[[outputs]]
name = "cosmos"
binding = "document"
sink_type = "file"
[outputs.params]
base_path = "{docs}"
database_name = "ToDoList"
container_name = "Items"
partition_key_path = "/partitionKey"

[[outputs]]
name = "blob"
binding = "blob"
sink_type = "file"
[outputs.params]
base_path = "{blobs}"
path = "dotnet/{{rand-guid}}.json"
"#,
            docs = dir.path().join("docs").display(),
            blobs = dir.path().join("blobs").display(),
        );

        let blueprint =
            config_loader::ConfigLoader::load_from_str(&config, config_loader::ConfigFormat::Toml)
                .unwrap();

        let (tx, rx) = mpsc::channel(16);
        let handle = dispatcher::create_dispatcher(blueprint.outputs.clone(), rx)
            .await
            .unwrap()
            .spawn();

        let aggregator = production_aggregator();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let (outputs, _) = aggregator.handle(&InvocationRequest::default()).into_parts();
            ids.push(outputs.document.as_ref().unwrap().id().to_string());
            tx.send(outputs).await.unwrap();
        }
        drop(tx);

        let summary = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.received, 3);

        for id in &ids {
            let path = dir
                .path()
                .join(format!("docs/ToDoList/Items/1/{id}.json"));
            let stored: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(stored["id"], id.as_str());
        }
        let blob_count = std::fs::read_dir(dir.path().join("blobs/dotnet"))
            .unwrap()
            .count();
        assert_eq!(blob_count, 3);
    }

    /// A key every invocation would reject must fail at load time
    #[test]
    fn test_unusable_partition_key_fails_config_load() {
        for key in ["  ", "../escape"] {
            let config = format!(
                r#"
[function]
name = "fn"
partition_key = "{key}"

[[outputs]]
name = "cosmos"
binding = "document"
sink_type = "file"
[outputs.params]
database_name = "ToDoList"
container_name = "Items"
"#
            );

            let result =
                config_loader::ConfigLoader::load_from_str(&config, config_loader::ConfigFormat::Toml);
            assert!(result.is_err(), "partition key {key:?} was accepted");
        }
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use contracts::SinkOutputs;
    use dispatcher::ResultAggregator;
    use http_trigger::{create_router, AppState, RouterConfig};
    use synthesizer::{RecordSynthesizer, SystemClock, UuidGenerator};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::support::FailingIds;

    const ROUTE: &str = "/api/ExampleHttpWithBindingTrigger";

    fn router_with(ids: Arc<dyn contracts::IdGenerator>) -> (axum::Router, mpsc::Receiver<SinkOutputs>) {
        let aggregator =
            ResultAggregator::new(RecordSynthesizer::new(ids), Arc::new(SystemClock));
        let (tx, rx) = mpsc::channel(16);
        let router = create_router(
            AppState::new(aggregator, tx),
            &RouterConfig::new(ROUTE, Duration::from_secs(5)),
        );
        (router, rx)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_http_failure_reply_and_no_outputs() {
        let (app, mut rx) = router_with(Arc::new(FailingIds));

        let response = app.oneshot(get(ROUTE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "Internal server error occurred" })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_http_success_reply_matches_queued_document() {
        let (app, mut rx) = router_with(Arc::new(UuidGenerator));

        let response = app.oneshot(get(ROUTE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let outputs = rx.try_recv().unwrap();
        assert_eq!(body["id"], outputs.document.unwrap().id());
        assert!(outputs.blob.is_some());
    }
}

#[cfg(test)]
mod property_tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use contracts::InvocationRequest;
    use dispatcher::ResultAggregator;
    use proptest::prelude::*;
    use synthesizer::{ManualClock, RecordSynthesizer, UuidGenerator};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whatever the clock says, the reply and both payloads agree on one record
        #[test]
        fn prop_reply_and_payloads_agree(secs in 0i64..4_102_444_800, millis in 0u32..1000) {
            let now = Utc.timestamp_opt(secs, millis * 1_000_000).unwrap();
            let aggregator = ResultAggregator::new(
                RecordSynthesizer::new(Arc::new(UuidGenerator)),
                Arc::new(ManualClock::starting_at(now)),
            );

            let result = aggregator.handle(&InvocationRequest::default());
            prop_assert_eq!(result.http_response().status(), 200);

            let body: serde_json::Value =
                serde_json::from_slice(result.http_response().body()).unwrap();
            let record = result.document_payload().unwrap();
            let blob: serde_json::Value =
                serde_json::from_str(result.blob_payload().unwrap()).unwrap();

            prop_assert_eq!(record.timestamp(), now);
            prop_assert_eq!(&body["id"], &blob["id"]);
            prop_assert_eq!(body["id"].as_str(), Some(record.id()));
            prop_assert_eq!(body["functionMessage"].as_str(), Some(record.message()));
        }
    }
}
