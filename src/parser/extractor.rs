use crate::error::RonbunError;
use crate::models::{Document, Section, SectionKind};
use crate::parser::pages::split_pages;
use tracing::debug;

/// Headings the extractor recognizes as section boundaries. Canonical kinds
/// get dedicated expert roles; the rest become `SectionKind::Other` and are
/// analyzed under the generic role.
const KNOWN_HEADINGS: &[&str] = &[
    "abstract",
    "introduction",
    "background",
    "related work",
    "methodology",
    "methods",
    "materials and methods",
    "results",
    "experiments",
    "experimental results",
    "evaluation",
    "discussion",
    "conclusion",
    "conclusions",
    "future work",
    "acknowledgments",
    "acknowledgements",
    "references",
];

const UNTITLED: &str = "Untitled Research Paper";

/// Partitions a paper's extracted text into a titled, sectioned `Document`.
///
/// This replaces the original pipeline's LLM-driven section parsing with a
/// deterministic heading scan; the section boundaries are stable for one
/// document.
pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, raw_text: &str) -> Result<Document, RonbunError> {
        if raw_text.trim().is_empty() {
            return Err(RonbunError::NoInput);
        }

        let pages = split_pages(raw_text);
        let title = Self::extract_title(&pages);
        let sections = Self::extract_sections(&pages);

        debug!(
            title = %title,
            pages = pages.len(),
            sections = sections.len(),
            "document extracted"
        );

        Ok(Document::new(title, pages, sections))
    }

    /// The title is assumed to be the first non-empty line of the first page.
    fn extract_title(pages: &[String]) -> String {
        pages
            .first()
            .and_then(|page| page.lines().map(str::trim).find(|line| !line.is_empty()))
            .map(|line| line.to_string())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    fn extract_sections(pages: &[String]) -> Vec<Section> {
        struct Partial {
            kind: SectionKind,
            start_page: usize,
            last_page: usize,
            buffer: String,
        }

        let mut sections = Vec::new();
        let mut current: Option<Partial> = None;

        let flush = |partial: Option<Partial>, sections: &mut Vec<Section>| {
            if let Some(p) = partial {
                if !p.buffer.trim().is_empty() {
                    sections.push(Section::new(
                        p.kind,
                        p.buffer.trim().to_string(),
                        (p.start_page, p.last_page),
                    ));
                }
            }
        };

        for (page_idx, page) in pages.iter().enumerate() {
            for line in page.lines() {
                if let Some(heading) = Self::detect_heading(line) {
                    flush(current.take(), &mut sections);
                    current = Some(Partial {
                        kind: SectionKind::from_heading(&heading),
                        start_page: page_idx,
                        last_page: page_idx,
                        buffer: String::new(),
                    });
                } else if let Some(ref mut partial) = current {
                    partial.buffer.push_str(line);
                    partial.buffer.push('\n');
                    if !line.trim().is_empty() {
                        partial.last_page = page_idx;
                    }
                }
                // Text before the first heading (title block, authors) is
                // not a section.
            }
        }
        flush(current.take(), &mut sections);

        // A paper with text but no recognizable headings still gets one
        // section so analysis can proceed under the generic role.
        if sections.is_empty() {
            let full_text = pages.join("\n");
            if !full_text.trim().is_empty() {
                sections.push(Section::new(
                    SectionKind::Other("document".to_string()),
                    full_text.trim().to_string(),
                    (0, pages.len().saturating_sub(1)),
                ));
            }
        }

        sections
    }

    /// A heading is a short line whose text (after optional numbering like
    /// "3." or "IV.") matches one of the known section names.
    fn detect_heading(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.len() > 64 {
            return None;
        }

        // Bare headings first, so numbering removal cannot eat the leading
        // characters of names like "Introduction".
        let bare = trimmed.trim_end_matches(':').trim();
        if Self::is_known_heading(bare) {
            return Some(bare.to_string());
        }

        let stripped = Self::strip_numbering(bare).trim().trim_end_matches(':').trim();
        if !stripped.is_empty() && Self::is_known_heading(stripped) {
            return Some(stripped.to_string());
        }

        None
    }

    fn is_known_heading(candidate: &str) -> bool {
        let lowered = candidate.to_lowercase();
        KNOWN_HEADINGS.contains(&lowered.as_str())
    }

    fn strip_numbering(line: &str) -> &str {
        line.trim_start_matches(|c: char| {
            c.is_ascii_digit() || matches!(c, '.' | ')' | 'I' | 'V' | 'X')
        })
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
