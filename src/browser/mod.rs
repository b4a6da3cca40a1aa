pub mod web;

pub use web::WebSession;

use crate::error::Result;
use std::path::Path;

/// The browser capabilities the catalog and archiver need from a page.
///
/// Calls are issued strictly one after another by a single task.
#[allow(async_fn_in_trait)]
pub trait Page {
    /// Navigate to a URL and wait for the load to finish
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// URL of the currently loaded page
    async fn current_url(&mut self) -> Result<String>;

    /// HTML source of the currently loaded page
    async fn source(&mut self) -> Result<String>;

    /// Hide page chrome (header strip, footer, back-to-top button).
    ///
    /// Elements missing on a page variant are skipped.
    async fn hide_chrome(&mut self) -> Result<()>;

    /// Capture the full page as PNG into `path`, overwriting any existing file
    async fn screenshot(&mut self, path: &Path) -> Result<()>;
}
