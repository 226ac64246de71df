//! Content isolation for print capture.
//!
//! Hides every direct child of `<body>` that does not contain the content
//! element, so `Page.printToPDF` renders only the documentation body and not
//! navigation bars, sidebars or footers. Only `style.display` is touched; the
//! content subtree itself is left as is.

use crate::error::TaskError;
use crate::pipeline::browser::PageSession;
use tracing::debug;

/// Build the hide script for `selector`.
pub fn hide_script(selector: &str) -> String {
    format!(
        "document.querySelectorAll('body > *').forEach(el => {{ if (!el.querySelector('{}')) {{ el.style.display = 'none'; }} }});",
        escape_js_single_quoted(selector)
    )
}

/// Run the hide script in `session`.
pub fn isolate_content(session: &mut dyn PageSession, selector: &str) -> Result<(), TaskError> {
    debug!("Isolating content '{}'", selector);
    session.run_script(&hide_script(selector))
}

fn escape_js_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}
