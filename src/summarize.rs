//! File summarizer — text extraction plus a fixed-budget truncation.
//!
//! Dispatches on file extension: PDF text extraction or a plain UTF-8 read.
//! This is a truncation, not a semantic summary; the first 500 characters
//! are kept and an ellipsis appended when anything was cut.

use thiserror::Error;

/// Character budget for the returned summary.
pub const SUMMARY_CHAR_BUDGET: usize = 500;

/// Error display strings double as the inline messages shown to the user;
/// the composer folds these in with `to_string()`.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Unsupported file format. Please upload a PDF or TXT file.")]
    UnsupportedFormat,
    #[error("Error reading file: {0}")]
    Read(String),
}

/// Summarize an uploaded file from its name and raw bytes.
pub fn summarize(file_name: &str, bytes: &[u8]) -> Result<String, SummaryError> {
    let lower = file_name.to_ascii_lowercase();
    let text = if lower.ends_with(".pdf") {
        extract_pdf_text(bytes)?
    } else if lower.ends_with(".txt") {
        std::str::from_utf8(bytes)
            .map_err(|e| SummaryError::Read(e.to_string()))?
            .to_string()
    } else {
        return Err(SummaryError::UnsupportedFormat);
    };

    Ok(truncate_chars(&text, SUMMARY_CHAR_BUDGET))
}

/// Extract all page text from an in-memory PDF. Non-empty pages are joined
/// by a single space; text inside a page is kept as extracted.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, SummaryError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| SummaryError::Read(e.to_string()))?;
    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `budget` characters plus "..." when truncated; shorter input is
/// returned whole with no ellipsis. Counts characters, not bytes, so
/// multi-byte text never splits mid-codepoint.
pub fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() > budget {
        let head: String = text.chars().take(budget).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_returned_whole() {
        let body = "A short note.";
        let out = summarize("note.txt", body.as_bytes()).unwrap();
        assert_eq!(out, body);
        assert!(!out.ends_with("..."));
    }

    #[test]
    fn exactly_at_budget_no_ellipsis() {
        let body = "x".repeat(SUMMARY_CHAR_BUDGET);
        let out = summarize("note.txt", body.as_bytes()).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn long_text_truncated_with_ellipsis() {
        let body = "y".repeat(SUMMARY_CHAR_BUDGET + 40);
        let out = summarize("note.txt", body.as_bytes()).unwrap();
        assert_eq!(out.chars().count(), SUMMARY_CHAR_BUDGET + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundary() {
        let body = "é".repeat(SUMMARY_CHAR_BUDGET + 1);
        let out = summarize("note.txt", body.as_bytes()).unwrap();
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), SUMMARY_CHAR_BUDGET + 3);
    }

    #[test]
    fn pages_join_with_single_space_keeping_inner_text() {
        let pages = vec![
            "First page,\nline two.".to_string(),
            "   \n".to_string(),
            "Second page.".to_string(),
        ];
        assert_eq!(join_pages(pages), "First page,\nline two. Second page.");
    }

    #[test]
    fn newlines_in_txt_count_against_the_budget_untouched() {
        let body = "line one\nline two";
        assert_eq!(summarize("note.txt", body.as_bytes()).unwrap(), body);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(summarize("NOTE.TXT", b"ok").is_ok());
    }

    #[test]
    fn unsupported_extension() {
        let err = summarize("slides.docx", b"whatever").unwrap_err();
        assert!(matches!(err, SummaryError::UnsupportedFormat));
        assert_eq!(
            err.to_string(),
            "Unsupported file format. Please upload a PDF or TXT file."
        );
    }

    #[test]
    fn invalid_utf8_is_read_error() {
        let err = summarize("note.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().starts_with("Error reading file: "));
    }

    #[test]
    fn garbage_pdf_is_read_error() {
        let err = summarize("paper.pdf", b"not a pdf").unwrap_err();
        assert!(err.to_string().starts_with("Error reading file: "));
    }
}
