//! Text extraction from resume files

use crate::error::{Result, ResumeScreenerError};
use log::warn;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeScreenerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(decode_text(bytes, &path.display().to_string()))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let markdown_content = decode_text(bytes, &path.display().to_string());

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
        let clean_text = tag_regex.replace_all(&text, "");

        clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decode as UTF-8, falling back to Latin-1 (one char per byte) for anything else
pub fn decode_text(bytes: Vec<u8>, source: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding as Latin-1", source);
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_passthrough() {
        let text = decode_text("Résumé – Python".as_bytes().to_vec(), "test");
        assert_eq!(text, "Résumé – Python");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Café SQL" in Latin-1; 0xE9 alone is invalid UTF-8
        let bytes = vec![b'C', b'a', b'f', 0xE9, b' ', b'S', b'Q', b'L'];
        assert_eq!(decode_text(bytes, "test"), "Café SQL");
    }

    #[test]
    fn test_html_to_text_strips_tags() {
        let text = MarkdownExtractor.html_to_text("<h1>Jane</h1>\n<p>Python &amp; SQL</p>");
        assert_eq!(text, "Jane\nPython & SQL");
    }
}
