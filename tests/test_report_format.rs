mod common;

use common::{orchestrator, MockProvider};
use ronbun::parser::SectionExtractor;
use ronbun::storage;
use std::sync::Arc;

const SAMPLE_PAPER: &str = "Deep Widgets: A Study\nA. Author, B. Author\n\n\
1. Introduction\nWidgets are important.\n\n\
2. Methodology\nWe measured widgets carefully.\n\u{000C}\
3. Results\nWidgets performed well.\n\n\
4. Discussion\nThe implications are broad.\n";

#[tokio::test]
async fn full_pipeline_produces_stable_output_json() {
    let document = SectionExtractor::new().extract(SAMPLE_PAPER).unwrap();
    let report = orchestrator(Arc::new(MockProvider::new()))
        .analyze_document(&document)
        .await
        .unwrap();

    let value = report.to_output_json();

    // Stable top-level keys for the persistence/UI collaborator.
    assert!(value.get("sectionResults").is_some());
    assert!(value.get("synthesis").is_some());
    assert!(value.get("pageSummaries").is_some());
    assert_eq!(value["title"], "Deep Widgets: A Study");

    let section_results = value["sectionResults"].as_object().unwrap();
    assert_eq!(section_results.len(), 4);
    for name in ["introduction", "methodology", "results", "discussion"] {
        assert_eq!(section_results[name]["status"], "success");
        assert_eq!(section_results[name]["attempts"], 1);
    }

    // Two form-feed-separated pages, summarized in page order.
    let pages = value["pageSummaries"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages[0].as_str().unwrap().contains("Methodology")
        || pages[0].as_str().unwrap().contains("measured"));
}

#[tokio::test]
async fn saved_report_round_trips_through_storage() {
    let document = SectionExtractor::new().extract(SAMPLE_PAPER).unwrap();
    let report = orchestrator(Arc::new(MockProvider::new()))
        .analyze_document(&document)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = storage::save_report(dir.path(), &report).unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_analysis.json"));

    let loaded = storage::load_report(dir.path(), &report.paper_info.title).unwrap();
    assert_eq!(loaded, report.to_output_json());
}

#[tokio::test]
async fn failed_sections_are_marked_in_output_json() {
    let document = SectionExtractor::new().extract(SAMPLE_PAPER).unwrap();
    let provider = Arc::new(MockProvider::new().always_fail("Analyze the discussion"));
    let report = orchestrator(provider)
        .analyze_document(&document)
        .await
        .unwrap();

    let value = report.to_output_json();
    assert_eq!(value["sectionResults"]["discussion"]["status"], "failed");
    assert_eq!(value["sectionResults"]["discussion"]["output"], "");
    assert_eq!(value["sectionResults"]["introduction"]["status"], "success");
    assert_eq!(value["diagnostics"]["sectionsFailed"], 1);
}
