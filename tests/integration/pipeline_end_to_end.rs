//! Full pipeline runs against CSV fixtures
//!
//! Exercises fetch → build → partition → layout → image/JSON with the
//! offline source and checks the artifacts on disk.

use token_flow_graph::errors::{AppError, FetchError, GraphError};
use token_flow_graph::export::{read_render_model, ImageOptions};
use token_flow_graph::fetch::{CsvSource, TransferSource};
use token_flow_graph::pipeline::{run_pipeline, AnalysisOptions, PipelineOptions};

use crate::common::{transfer, triangle_records, two_cliques_records, TestOutput, CONTRACT};

fn options(output: &TestOutput, with_image: bool) -> PipelineOptions {
    PipelineOptions {
        contract: CONTRACT.to_uppercase().replacen("0X", "0x", 1),
        limit: 1000,
        analysis: AnalysisOptions::default(),
        image: with_image.then(|| ImageOptions {
            path: output.path("out/network.png"),
            width: 400,
            height: 300,
        }),
        json_path: output.path("out/network.json"),
    }
}

#[tokio::test]
async fn triangle_writes_png_and_json() {
    let output = TestOutput::new().unwrap();
    let input = output.write_csv("transfers.csv", &triangle_records()).unwrap();
    let source = CsvSource::new(input);

    let report = run_pipeline(&source, &options(&output, true)).await.unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.statistics.nodes, 3);
    assert_eq!(report.statistics.edges, 3);
    assert_eq!(report.statistics.density, 1.0);
    assert_eq!(report.statistics.mean_degree, 2.0);
    assert_eq!(report.statistics.unparsed_values, 1);

    let png = std::fs::read(output.path("out/network.png")).unwrap();
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

    let model = read_render_model(&output.path("out/network.json")).unwrap();
    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.edges.len(), 3);
    for node in &model.nodes {
        assert!(node.x.is_finite() && node.y.is_finite());
        assert!(node.color.starts_with('#') && node.color.len() == 7);
    }
}

#[tokio::test]
async fn no_image_only_writes_json() {
    let output = TestOutput::new().unwrap();
    let input = output.write_csv("transfers.csv", &two_cliques_records()).unwrap();
    let source = CsvSource::new(input);

    let report = run_pipeline(&source, &options(&output, false)).await.unwrap();
    assert!(report.image_path.is_none());
    assert_eq!(report.community_count, 2);
    assert!(output.path("out/network.json").exists());
    assert!(!output.path("out/network.png").exists());
}

#[tokio::test]
async fn limit_caps_records() {
    let output = TestOutput::new().unwrap();
    let input = output.write_csv("transfers.csv", &two_cliques_records()).unwrap();
    let source = CsvSource::new(input);

    let mut options = options(&output, false);
    options.limit = 4;
    let report = run_pipeline(&source, &options).await.unwrap();
    assert_eq!(report.records, 4);
    assert_eq!(report.statistics.edges, 4);
}

#[tokio::test]
async fn other_contract_yields_empty_input_in_build_stage() {
    let output = TestOutput::new().unwrap();
    let mut records = triangle_records();
    for record in &mut records {
        record.token_address = "0x0000000000000000000000000000000000000001".to_string();
    }
    let input = output.write_csv("transfers.csv", &records).unwrap();
    let source = CsvSource::new(input);

    let err = run_pipeline(&source, &options(&output, true)).await.unwrap_err();
    assert_eq!(err.stage(), Some("build"));
    assert!(err.to_string().contains("No transfer records"));
    match err {
        AppError::Stage { source, .. } => {
            assert!(matches!(*source, AppError::Graph(GraphError::EmptyInput)))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!output.path("out/network.json").exists());
}

#[tokio::test]
async fn invalid_contract_fails_in_fetch_stage() {
    let output = TestOutput::new().unwrap();
    let input = output.write_csv("transfers.csv", &triangle_records()).unwrap();
    let source = CsvSource::new(input);

    let mut options = options(&output, false);
    options.contract = "0x1234".to_string();
    let err = run_pipeline(&source, &options).await.unwrap_err();
    assert_eq!(err.stage(), Some("fetch"));
    match err {
        AppError::Stage { source, .. } => assert!(matches!(
            *source,
            AppError::Fetch(FetchError::InvalidAddress { .. })
        )),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn same_seed_gives_identical_documents() {
    let output = TestOutput::new().unwrap();
    let mut records = two_cliques_records();
    records.push(transfer("0x13", "0x13", "4", 200));
    let input = output.write_csv("transfers.csv", &records).unwrap();
    let source = CsvSource::new(input);

    let mut first = options(&output, false);
    first.json_path = output.path("first.json");
    let mut second = options(&output, false);
    second.json_path = output.path("second.json");

    run_pipeline(&source, &first).await.unwrap();
    run_pipeline(&source, &second).await.unwrap();

    let a = std::fs::read_to_string(output.path("first.json")).unwrap();
    let b = std::fs::read_to_string(output.path("second.json")).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn csv_source_round_trips_fixture_records() {
    let output = TestOutput::new().unwrap();
    let records = triangle_records();
    let input = output.write_csv("transfers.csv", &records).unwrap();

    let fetched = CsvSource::new(input).fetch(CONTRACT, 10).await.unwrap();
    assert_eq!(fetched, records);
    assert!(output.root().join("transfers.csv").exists());
}

#[tokio::test]
async fn zero_value_transfer_keeps_zero_edge_size() {
    let output = TestOutput::new().unwrap();
    let records = vec![
        transfer("0xA", "0xB", "10", 0),
        transfer("0xB", "0xC", "5", 1),
        transfer("0xA", "0xC", "0", 2),
    ];
    let input = output.write_csv("transfers.csv", &records).unwrap();
    let source = CsvSource::new(input);

    let report = run_pipeline(&source, &options(&output, false)).await.unwrap();
    assert_eq!(report.statistics.density, 1.0);
    assert_eq!(report.statistics.unparsed_values, 0);

    let model = read_render_model(&output.path("out/network.json")).unwrap();
    let mut ids: Vec<&str> = model.node_ids().collect();
    ids.sort();
    assert_eq!(ids, vec!["0xa", "0xb", "0xc"]);
    let a_to_c = model
        .edges
        .iter()
        .find(|e| e.source == "0xa" && e.target == "0xc")
        .unwrap();
    assert_eq!(a_to_c.size, 0.0);
    let a = model.nodes.iter().find(|n| n.id == "0xa").unwrap();
    assert_eq!(a.size, 10.0);
}
