//! PDF text extraction via pdfium.
//!
//! pdfium calls block and must stay off the Tokio worker threads, so
//! extraction runs on the blocking pool via `tokio::task::spawn_blocking`.
//!
//! Text comes out page by page in document order with no layout
//! reconstruction: no columns, no tables, no images.

use crate::error::{TaskError, Web2DocError};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an existing pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library.
///
/// Resolution order: `PDFIUM_LIB_PATH`, then the platform library name in the
/// current directory, then the system library search path.
pub fn bind_pdfium() -> Result<Pdfium, Web2DocError> {
    if let Ok(path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !path.is_empty() {
            return Pdfium::bind_to_library(&path)
                .map(Pdfium::new)
                .map_err(|e| Web2DocError::PdfiumBindingFailed(format!("{path}: {e:?}")));
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| Web2DocError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Extract the text of every page of `pdf_path`, in page order.
pub async fn extract_page_texts(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<String>, TaskError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_page_texts_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| TaskError::Conversion {
            detail: format!("Text extraction task panicked: {e}"),
        })?
}

/// Blocking implementation of text extraction.
fn extract_page_texts_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<String>, TaskError> {
    check_pdf_magic(pdf_path)?;

    let pdfium = bind_pdfium().map_err(|e| TaskError::Conversion {
        detail: e.to_string(),
    })?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| TaskError::Conversion {
            detail: format!("Failed to open '{}': {e:?}", pdf_path.display()),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut texts = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let text = page.text().map_err(|e| TaskError::Conversion {
            detail: format!("Text extraction failed for page {}: {e:?}", idx + 1),
        })?;
        let all = text.all();
        debug!("Page {} → {} chars", idx + 1, all.len());
        texts.push(all);
    }

    Ok(texts)
}

/// Join per-page texts: each page is followed by one blank line.
pub fn join_pages(pages: &[String]) -> String {
    let mut out = String::with_capacity(pages.iter().map(|p| p.len() + 2).sum());
    for page in pages {
        out.push_str(page);
        out.push_str("\n\n");
    }
    out
}

/// Reject files that do not start with `%PDF` before pdfium sees them.
fn check_pdf_magic(path: &Path) -> Result<(), TaskError> {
    use std::io::Read;

    let mut file = std::fs::File::open(path).map_err(|e| TaskError::io(path, e))?;
    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) if &magic == b"%PDF" => Ok(()),
        Ok(()) => Err(TaskError::Conversion {
            detail: format!(
                "'{}' is not a PDF (first bytes: {:?})",
                path.display(),
                magic
            ),
        }),
        Err(e) => Err(TaskError::Conversion {
            detail: format!("'{}' is too short to be a PDF: {e}", path.display()),
        }),
    }
}

/// Default Markdown path for a PDF: same directory and stem, `.md` extension.
pub fn markdown_path_for(pdf_path: &Path) -> PathBuf {
    pdf_path.with_extension("md")
}
