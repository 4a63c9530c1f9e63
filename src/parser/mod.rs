// Parser module - splits extracted paper text into titled sections and pages

pub mod extractor;
pub mod pages;

pub use extractor::SectionExtractor;
pub use pages::{group_pages, split_pages, PageGroup};
