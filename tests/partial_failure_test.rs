mod common;

use common::*;
use httpmock::prelude::*;
use sudrf_courts::core::reconcile::ABSENT_FLAG;
use sudrf_courts::domain::ports::RecordSink;
use sudrf_courts::domain::ports::Pipeline;
use sudrf_courts::{CourtError, CourtPipeline, CourtRecord, EtlEngine, ReconcileMode};
use tempfile::TempDir;

/// 只收集在記憶體裡的 sink
#[derive(Default)]
struct MemorySink {
    records: Vec<CourtRecord>,
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &CourtRecord) -> sudrf_courts::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> sudrf_courts::Result<String> {
        Ok("memory".to_string())
    }
}

#[tokio::test]
async fn test_failed_region_is_skipped_and_order_is_kept() {
    let server = MockServer::start();

    mock_results(&server, "01", results_page(&[("A1", None, &["a1", "a2"])]));
    server.mock(|when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("act", "go_ms_search")
            .query_param("court_subj", "02");
        then.status(503);
    });
    mock_results(
        &server,
        "03",
        results_page(&[("C1", None, &["c1"]), ("C2", None, &["c2", "c3"])]),
    );
    mock_addresses(&server, String::new());
    mock_regions(
        &server,
        region_page(&[("1", "Region A"), ("2", "Region B"), ("3", "Region C")]),
    );

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("unused.csv");
    let settings = settings(&server, output.to_str().unwrap(), ReconcileMode::AddressOnly);
    let pipeline = CourtPipeline::new(settings).unwrap();

    let regions = pipeline.extract().await.unwrap();
    let sources = pipeline.prepare(&regions).await.unwrap();
    let mut sink = MemorySink::default();
    let summary = pipeline
        .stream_into(&regions, &sources, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.records_written, 5);
    let codes: Vec<(&str, &str)> = sink
        .records
        .iter()
        .map(|r| (r.region.as_str(), r.code.as_deref().unwrap()))
        .collect();
    assert_eq!(
        codes,
        vec![
            ("Region A", "a1"),
            ("Region A", "a2"),
            ("Region C", "c1"),
            ("Region C", "c2"),
            ("Region C", "c3"),
        ]
    );
}

#[tokio::test]
async fn test_secondary_failures_mark_records_absent() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.csv").to_str().unwrap().to_string();
    let server = MockServer::start();

    mock_results(&server, "01", results_page(&[("A", None, &["100"])]));
    mock_addresses(&server, String::new());
    let rejected = server.mock(|when, then| {
        when.method(GET).path("/api/appeal/getCourtsInRegion");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"error": 1, "errorMsg": "Сессия истекла", "data": null}));
    });
    mock_regions(&server, region_page(&[("1", "Region A")]));

    let settings = settings(&server, &output_path, ReconcileMode::PresenceCode);
    let engine = EtlEngine::new(CourtPipeline::new(settings).unwrap());
    let summary = engine.run().await.unwrap();

    rejected.assert();
    assert_eq!(summary.absent, 1);
    let rows = read_csv(&output_path);
    assert_eq!(rows[0].presence_flag.as_deref(), Some(ABSENT_FLAG));
}

#[tokio::test]
async fn test_missing_address_page_is_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.csv").to_str().unwrap().to_string();
    let server = MockServer::start();

    mock_results(&server, "01", results_page(&[("A", None, &["100"])]));
    let coords = server.mock(|when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("act", "ya_coords");
        then.status(404);
    });
    mock_regions(&server, region_page(&[("1", "Region A")]));

    let settings = settings(&server, &output_path, ReconcileMode::AddressOnly);
    let engine = EtlEngine::new(CourtPipeline::new(settings).unwrap());
    let summary = engine.run().await.unwrap();

    coords.assert();
    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.with_address, 0);
}

#[tokio::test]
async fn test_region_directory_failure_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.csv").to_str().unwrap().to_string();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/index.php");
        then.status(200).body("<html><body>Технические работы</body></html>");
    });

    let settings = settings(&server, &output_path, ReconcileMode::AddressOnly);
    let engine = EtlEngine::new(CourtPipeline::new(settings).unwrap());
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, CourtError::ParseError { .. }));
    assert!(!std::path::Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_presence_mode_without_session_fails_before_streaming() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.csv").to_str().unwrap().to_string();
    let server = MockServer::start();

    let results = mock_results(&server, "01", results_page(&[("A", None, &["100"])]));
    mock_addresses(&server, String::new());
    mock_regions(&server, region_page(&[("1", "Region A")]));

    let mut settings = settings(&server, &output_path, ReconcileMode::PresenceCode);
    settings.session_id = None;
    let engine = EtlEngine::new(CourtPipeline::new(settings).unwrap());
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, CourtError::MissingConfigError { .. }));
    results.assert_hits(0);
}
