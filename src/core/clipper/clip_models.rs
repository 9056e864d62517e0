/// Label placed in front of the page title on the source line.
pub const SOURCE_LABEL: &str = "Source: ";

/// Line that separates consecutive clips in the document.
pub const SEPARATOR: &str = "---";

/// What the user clipped and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    pub selected_text: String,
    pub source_url: String,
    pub page_title: String,
}

impl ClipRequest {
    /// Falls back to the URL when the page has no title.
    pub fn new(
        selected_text: impl Into<String>,
        source_url: impl Into<String>,
        page_title: impl Into<String>,
    ) -> Self {
        let source_url = source_url.into();
        let mut page_title = page_title.into();
        if page_title.trim().is_empty() {
            page_title = source_url.clone();
        }

        Self {
            selected_text: selected_text.into(),
            source_url,
            page_title,
        }
    }
}

/// The two edits one clip turns into: insert `text` at `index`, then link
/// `link_start..link_end` to `link_url`.
///
/// Offsets count UTF-16 code units, which is how the Docs API indexes text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendPlan {
    pub index: i64,
    pub text: String,
    pub link_url: String,
    pub link_start: i64,
    pub link_end: i64,
}

impl AppendPlan {
    pub fn new(request: &ClipRequest, index: i64) -> Self {
        let prefix = format!(
            "\n{}\n{}{}: ",
            request.selected_text, SOURCE_LABEL, request.page_title
        );
        let suffix = format!("\n{}\n", SEPARATOR);

        let link_start = index + utf16_len(&prefix);
        let link_end = link_start + utf16_len(&request.source_url);

        Self {
            index,
            text: format!("{}{}{}", prefix, request.source_url, suffix),
            link_url: request.source_url.clone(),
            link_start,
            link_end,
        }
    }
}

/// Insertion point for a document whose last body element ends at `end_index`.
/// The final newline of a document cannot be written past, so we insert just before it.
pub fn insertion_index(end_index: i64) -> i64 {
    end_index - 1
}

fn utf16_len(text: &str) -> i64 {
    text.encode_utf16().count() as i64
}
