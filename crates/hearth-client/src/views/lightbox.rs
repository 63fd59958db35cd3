use hearth_shared::constants::CMD_OPEN_IN_BROWSER;

use crate::error::Result;
use crate::state::ClientContext;

/// An inline image that expands into a full-window backdrop when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightBoxImage {
    src: String,
    open: bool,
}

impl LightBoxImage {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            open: false,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Any click on the backdrop closes it.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Hand the image URL to the system browser. The click also lands on the
    /// backdrop, so the lightbox closes whether or not the call succeeds.
    pub async fn open_in_browser(&mut self, ctx: &ClientContext) -> Result<()> {
        self.close();
        ctx.call(CMD_OPEN_IN_BROWSER, ctx.backend().open_in_browser(&self.src))
            .await
    }
}
