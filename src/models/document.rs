use serde::{Deserialize, Serialize};

/// Canonical section identities a research paper is partitioned into.
///
/// The four named kinds carry dedicated expert roles; everything else is kept
/// under `Other` with the heading it was extracted from and falls back to the
/// generic analysis role at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Introduction,
    Methodology,
    Results,
    Discussion,
    Other(String),
}

impl SectionKind {
    pub fn from_heading(heading: &str) -> Self {
        let normalized = heading.trim().trim_end_matches(':').to_lowercase();
        match normalized.as_str() {
            "introduction" => SectionKind::Introduction,
            "methodology" | "methods" | "materials and methods" => SectionKind::Methodology,
            "results" | "experiments" | "experimental results" => SectionKind::Results,
            "discussion" => SectionKind::Discussion,
            _ => SectionKind::Other(normalized),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SectionKind::Introduction => "introduction",
            SectionKind::Methodology => "methodology",
            SectionKind::Results => "results",
            SectionKind::Discussion => "discussion",
            SectionKind::Other(name) => name,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, SectionKind::Other(_))
    }
}

/// A named, bounded span of the paper's extracted text.
///
/// Immutable once extracted; `page_range` is the inclusive (first, last) pair
/// of zero-based page indices the section's text came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
    pub page_range: (usize, usize),
}

impl Section {
    pub fn new(kind: SectionKind, text: String, page_range: (usize, usize)) -> Self {
        Self {
            kind,
            text,
            page_range,
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One document's extracted text, already split into pages and sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub pages: Vec<String>,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: String, pages: Vec<String>, sections: Vec<Section>) -> Self {
        Self {
            title,
            pages,
            sections,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.pages.iter().map(|p| p.len()).sum()
    }
}

/// Summary facts about the analyzed paper, carried on the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperInfo {
    pub title: String,
    pub page_count: usize,
    pub section_count: usize,
    pub size_bytes: usize,
}

impl PaperInfo {
    pub fn from_document(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            page_count: document.pages.len(),
            section_count: document.sections.len(),
            size_bytes: document.size_bytes(),
        }
    }
}
