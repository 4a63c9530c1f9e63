/// Page splitting and grouping for the extracted paper text.
///
/// Pages arrive separated by form-feed characters, the convention used by
/// `pdftotext`-style extractors. Text without a single form feed is treated
/// as one page.

/// A consecutive run of pages summarized by one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub first_page: usize,
    pub last_page: usize,
    pub text: String,
}

pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw.split('\u{000C}').map(|p| p.to_string()).collect();

    // A trailing form feed produces one spurious empty page; interior empty
    // pages are real and keep their index.
    while pages.len() > 1 && pages.last().map(|p| p.trim().is_empty()).unwrap_or(false) {
        pages.pop();
    }

    pages
}

pub fn group_pages(pages: &[String], group_size: usize) -> Vec<PageGroup> {
    let group_size = group_size.max(1);

    pages
        .chunks(group_size)
        .enumerate()
        .map(|(i, chunk)| {
            let first_page = i * group_size;
            PageGroup {
                first_page,
                last_page: first_page + chunk.len() - 1,
                text: chunk.join("\n"),
            }
        })
        .collect()
}
