use crate::error::RonbunError;
use crate::models::Report;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const MAX_TITLE_LEN: usize = 100;

/// Filesystem-safe file stem derived from the paper title.
pub fn sanitize_title(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.chars().take(MAX_TITLE_LEN).collect()
    }
}

pub fn report_path(output_dir: &Path, title: &str) -> PathBuf {
    output_dir.join(format!("{}_analysis.json", sanitize_title(title)))
}

/// Writes the report's stable-key JSON under the output directory, creating
/// it if needed. Returns the written path.
pub fn save_report(output_dir: &Path, report: &Report) -> Result<PathBuf, RonbunError> {
    fs::create_dir_all(output_dir)?;

    let path = report_path(output_dir, &report.paper_info.title);
    let json = serde_json::to_string_pretty(&report.to_output_json())?;
    fs::write(&path, json)?;

    info!(path = %path.display(), "analysis saved");
    Ok(path)
}

/// Reads back a previously saved analysis as its JSON value.
pub fn load_report(output_dir: &Path, title: &str) -> Result<Value, RonbunError> {
    let path = report_path(output_dir, title);
    let raw = fs::read_to_string(&path)?;
    let value = serde_json::from_str(&raw)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaperInfo, SectionAnalysis};

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Deep Widgets: A Study"), "Deep_Widgets__A_Study");
        assert_eq!(sanitize_title("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_title("???"), "untitled");

        let long = "x".repeat(300);
        assert_eq!(sanitize_title(&long).len(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let report = Report::new(PaperInfo {
            title: "A Study".to_string(),
            page_count: 1,
            section_count: 1,
            size_bytes: 42,
        })
        .with_section_results(vec![SectionAnalysis::success(
            "introduction",
            "intro out".to_string(),
            1,
            10,
        )])
        .with_synthesis("combined".to_string());

        let path = save_report(dir.path(), &report).unwrap();
        assert!(path.ends_with("A_Study_analysis.json"));

        let loaded = load_report(dir.path(), "A Study").unwrap();
        assert_eq!(loaded["synthesis"], "combined");
        assert_eq!(loaded["sectionResults"]["introduction"]["status"], "success");
    }

    #[test]
    fn test_load_missing_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_report(dir.path(), "Nothing Here").is_err());
    }
}
