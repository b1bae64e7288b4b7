//! Citation formatting — pure string templates, one per supported style.
//!
//! Title and author are accepted as-is; no escaping.

/// Returned for any style string outside the supported set.
pub const UNSUPPORTED_STYLE_TEXT: &str = "Format not supported.";

/// Returned when the free-text citation details do not split into exactly
/// three comma-separated fields.
pub const MALFORMED_DETAILS_TEXT: &str =
    "Please enter citation details in the format: Title, Author, Year.";

/// Supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    Apa,
    Mla,
    Chicago,
}

impl CitationStyle {
    /// Parse the UI's style string. Unknown strings map to `None` and are
    /// reported as unsupported rather than erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "APA" => Some(Self::Apa),
            "MLA" => Some(Self::Mla),
            "Chicago" => Some(Self::Chicago),
            _ => None,
        }
    }
}

/// Format one citation. Unknown style strings yield the fixed
/// "not supported" message.
pub fn format_citation(title: &str, author: &str, year: &str, style: &str) -> String {
    match CitationStyle::parse(style) {
        Some(CitationStyle::Apa) => format!("{author} ({year}). {title}."),
        Some(CitationStyle::Mla) => format!("{author}. \"{title}.\" {year}."),
        Some(CitationStyle::Chicago) => format!("{author}. {year}. \"{title}.\""),
        None => UNSUPPORTED_STYLE_TEXT.to_string(),
    }
}

/// Format a citation from the raw "Title, Author, Year" details string the
/// form collects. Anything other than exactly three comma-separated fields
/// yields the fixed inline warning instead of a citation.
pub fn cite_from_details(details: &str, style: &str) -> String {
    let fields: Vec<&str> = details.split(',').map(str::trim).collect();
    match fields.as_slice() {
        [title, author, year] => format_citation(title, author, year, style),
        _ => MALFORMED_DETAILS_TEXT.to_string(),
    }
}
