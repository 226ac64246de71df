//! HTML → Markdown transform for extracted content elements.

use crate::error::TaskError;
use crate::pipeline::postprocess;
use htmd::HtmlToMarkdown;
use tracing::debug;

/// Convert an element's outer HTML to cleaned-up Markdown.
///
/// `<script>` and `<style>` bodies are dropped; everything else is handed to
/// `htmd` and then normalised by [`postprocess::clean_markdown`].
pub fn html_to_markdown(html: &str) -> Result<String, TaskError> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    let raw = converter.convert(html).map_err(|e| TaskError::Conversion {
        detail: format!("HTML to Markdown failed: {e}"),
    })?;
    debug!("Converted {} bytes of HTML → {} bytes of Markdown", html.len(), raw.len());

    Ok(postprocess::clean_markdown(&raw))
}
