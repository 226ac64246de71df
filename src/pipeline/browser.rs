//! Headless browser sessions behind a small trait boundary.
//!
//! The converters only need six operations from a browser: open, navigate,
//! wait for an element, read its outer HTML, run a script, print to PDF, and
//! close. [`BrowserDriver`] and [`PageSession`] capture exactly those, so the
//! pipeline can be driven by Chrome in production ([`ChromeDriver`]) and by a
//! scripted fake in tests.
//!
//! ## Session lifetime
//!
//! A session owns an OS process. [`with_session`] is the only way the
//! converters acquire one: it opens the session, runs the caller's closure,
//! and closes the session exactly once whatever the closure returned.
//! `close` consumes the session, so a second close does not type-check.
//! Dropping a [`ChromeSession`] without closing it (a panic inside the
//! closure) still kills the browser process through `Browser`'s own `Drop`.

use crate::error::TaskError;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// User agents rotated across sessions.
pub const DEFAULT_USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0",
];

/// Pick one user agent uniformly at random. `None` for an empty pool.
pub fn pick_user_agent(pool: &[String]) -> Option<String> {
    pool.choose(&mut rand::thread_rng()).cloned()
}

/// How a session should be launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub headless: bool,
    /// Overrides the browser's default user agent when set.
    pub user_agent: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: None,
        }
    }
}

/// Factory for browser sessions.
///
/// Shared between the async pipeline and `spawn_blocking` workers, hence
/// `Send + Sync`.
pub trait BrowserDriver: Send + Sync {
    fn open(&self, options: &SessionOptions) -> Result<Box<dyn PageSession>, TaskError>;
}

/// One live page in one browser process.
///
/// All calls block until the browser answers.
pub trait PageSession {
    fn navigate(&mut self, url: &str) -> Result<(), TaskError>;

    /// Wait until `selector` matches an element, or fail with
    /// [`TaskError::Timeout`].
    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), TaskError>;

    /// Serialized outer HTML of the first element matching `selector`.
    fn outer_html(&mut self, selector: &str) -> Result<String, TaskError>;

    fn run_script(&mut self, script: &str) -> Result<(), TaskError>;

    /// Print the current page through the DevTools `Page.printToPDF` command
    /// and return the decoded PDF bytes.
    fn print_to_pdf(&mut self, print_background: bool) -> Result<Vec<u8>, TaskError>;

    /// Release the session and its browser process.
    fn close(self: Box<Self>) -> Result<(), TaskError>;
}

/// Open a session, run `f`, and close the session on every exit path.
///
/// A close failure is logged and never masks the result of `f`.
pub fn with_session<T>(
    driver: &dyn BrowserDriver,
    options: &SessionOptions,
    f: impl FnOnce(&mut dyn PageSession) -> Result<T, TaskError>,
) -> Result<T, TaskError> {
    let mut session = driver.open(options)?;
    let result = f(session.as_mut());
    if let Err(e) = session.close() {
        warn!("Failed to close browser session: {}", e);
    }
    result
}

// ── Chrome implementation ────────────────────────────────────────────────

/// [`BrowserDriver`] backed by a locally installed Chrome/Chromium, driven
/// over the DevTools protocol by `headless_chrome`.
#[derive(Debug, Clone, Default)]
pub struct ChromeDriver {
    /// Explicit browser binary; `None` lets `headless_chrome` search the
    /// usual install locations.
    pub chrome_path: Option<std::path::PathBuf>,
}

impl ChromeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chrome_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            chrome_path: Some(path.into()),
        }
    }
}

impl BrowserDriver for ChromeDriver {
    fn open(&self, options: &SessionOptions) -> Result<Box<dyn PageSession>, TaskError> {
        let launch = LaunchOptions {
            headless: options.headless,
            path: self.chrome_path.clone(),
            ..Default::default()
        };

        let browser = Browser::new(launch).map_err(|e| TaskError::BrowserLaunch {
            detail: e.to_string(),
        })?;

        let tab = browser.new_tab().map_err(|e| TaskError::BrowserLaunch {
            detail: format!("Failed to create tab: {e}"),
        })?;

        if let Some(ref ua) = options.user_agent {
            tab.set_user_agent(ua, None, None)
                .map_err(|e| TaskError::BrowserLaunch {
                    detail: format!("Failed to set user agent: {e}"),
                })?;
        }

        debug!(
            "Browser session opened (headless={}, custom_ua={})",
            options.headless,
            options.user_agent.is_some()
        );

        Ok(Box::new(ChromeSession { browser, tab }))
    }
}

/// A Chrome process with one tab.
pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl PageSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), TaskError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| TaskError::Navigation {
                url: url.to_string(),
                detail: e.to_string(),
            })
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), TaskError> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| {
                debug!("wait_for_element('{}') failed: {}", selector, e);
                TaskError::Timeout {
                    selector: selector.to_string(),
                    secs: timeout.as_secs(),
                }
            })
    }

    fn outer_html(&mut self, selector: &str) -> Result<String, TaskError> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|e| TaskError::ElementNotFound {
                selector: selector.to_string(),
                detail: e.to_string(),
            })?;

        element.get_content().map_err(|e| TaskError::ElementNotFound {
            selector: selector.to_string(),
            detail: format!("Failed to serialize element: {e}"),
        })
    }

    fn run_script(&mut self, script: &str) -> Result<(), TaskError> {
        self.tab
            .evaluate(script, false)
            .map(|_| ())
            .map_err(|e| TaskError::Script {
                detail: e.to_string(),
            })
    }

    fn print_to_pdf(&mut self, print_background: bool) -> Result<Vec<u8>, TaskError> {
        let options = PrintToPdfOptions {
            print_background: Some(print_background),
            ..Default::default()
        };
        self.tab
            .print_to_pdf(Some(options))
            .map_err(|e| TaskError::Script {
                detail: format!("Page.printToPDF failed: {e}"),
            })
    }

    fn close(self: Box<Self>) -> Result<(), TaskError> {
        let ChromeSession { browser, tab } = *self;
        let closed = tab.close(true).map(|_| ()).map_err(|e| TaskError::Script {
            detail: format!("Failed to close tab: {e}"),
        });
        drop(tab);
        // Dropping the last `Browser` handle terminates the process.
        drop(browser);
        closed
    }
}
