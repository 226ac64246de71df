//! Building blocks shared by the converters.
//!
//! Each submodule implements exactly one concern, so every stage can be
//! tested on its own and the browser can be replaced by a fake in tests.
//!
//! ## Data Flow
//!
//! ```text
//! browser ──▶ isolate ──▶ print-to-PDF ─────────────▶ .pdf
//!    │
//!    └──────▶ outer HTML ──▶ markdown ──▶ postprocess ▶ .md
//!
//! .pdf ──▶ pdf_text ──────────────────────────────────▶ .md
//! ```
//!
//! 1. [`browser`]     — headless sessions behind the `BrowserDriver` /
//!    `PageSession` traits, with scoped release
//! 2. [`isolate`]     — hide everything on the page but the content element
//! 3. [`pacing`]      — randomised pauses between steps and tasks
//! 4. [`markdown`]    — HTML → Markdown via `htmd`
//! 5. [`postprocess`] — deterministic whitespace cleanup of the Markdown
//! 6. [`pdf_text`]    — per-page text extraction with pdfium; runs in
//!    `spawn_blocking` because pdfium is not async-safe

pub mod browser;
pub mod isolate;
pub mod markdown;
pub mod pacing;
pub mod pdf_text;
pub mod postprocess;
