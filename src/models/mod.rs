pub mod analysis;
pub mod document;
pub mod report;

pub use analysis::{
    AnalysisRequest, AnalysisStatus, ExpertRole, PageSummary, SectionAnalysis,
};
pub use document::{Document, PaperInfo, Section, SectionKind};
pub use report::{Report, RunDiagnostics};
