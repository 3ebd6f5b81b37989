//! Copying short link URLs to the clipboard.
//!
//! # Design
//! The platform copy primitive works on a selected text surface, so the
//! helper keeps one hidden staging area, created on first use and reused for
//! every later copy. The platform side sits behind `ClipboardBackend` so the
//! helper can be driven without a desktop session.

use tracing::debug;

use crate::error::ClipboardError;

/// Identifier of the hidden staging surface.
pub const STAGING_AREA_ID: &str = "hidden-clipboard-area";

/// Platform copy command. Returns `true` when the platform reports success.
pub trait ClipboardBackend {
    fn copy_selection(&mut self, text: &str) -> bool;
}

/// Hidden input surface holding the text about to be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    id: &'static str,
    value: String,
    selected: bool,
}

impl StagingArea {
    fn new() -> Self {
        Self {
            id: STAGING_AREA_ID,
            value: String::new(),
            selected: false,
        }
    }

    pub fn id(&self) -> &str {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn stage(&mut self, value: String) {
        self.value = value;
        self.selected = false;
    }

    fn select(&mut self) -> &str {
        self.selected = true;
        &self.value
    }
}

#[derive(Debug)]
pub struct ClipboardHelper<B> {
    origin: String,
    backend: B,
    staging: Option<StagingArea>,
    areas_created: usize,
}

impl<B: ClipboardBackend> ClipboardHelper<B> {
    pub fn new(origin: &str, backend: B) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            backend,
            staging: None,
            areas_created: 0,
        }
    }

    /// Copies `origin/sub_path` and returns the copied URL.
    pub fn copy_short_link(&mut self, sub_path: &str) -> Result<String, ClipboardError> {
        let url = format!("{}/{sub_path}", self.origin);

        if self.staging.is_none() {
            self.areas_created += 1;
            debug!(id = STAGING_AREA_ID, "creating clipboard staging area");
        }
        let area = self.staging.get_or_insert_with(StagingArea::new);
        area.stage(url);
        let text = area.select();

        if self.backend.copy_selection(text) {
            Ok(text.to_string())
        } else {
            Err(ClipboardError)
        }
    }

    pub fn staging_area(&self) -> Option<&StagingArea> {
        self.staging.as_ref()
    }

    /// How many staging areas were ever created. Never exceeds one.
    pub fn areas_created(&self) -> usize {
        self.areas_created
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// OS clipboard backend.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// The platform clipboard is opened lazily; a host without one simply
    /// fails every copy.
    pub fn new() -> Self {
        Self { inner: None }
    }
}

#[cfg(feature = "system-clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn copy_selection(&mut self, text: &str) -> bool {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(e) => {
                    debug!(error = %e, "clipboard unavailable");
                    return false;
                }
            }
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeClipboard {
        accept: bool,
        copied: Vec<String>,
    }

    impl ClipboardBackend for FakeClipboard {
        fn copy_selection(&mut self, text: &str) -> bool {
            if self.accept {
                self.copied.push(text.to_string());
            }
            self.accept
        }
    }

    fn helper(accept: bool) -> ClipboardHelper<FakeClipboard> {
        ClipboardHelper::new(
            "https://example.com",
            FakeClipboard {
                accept,
                copied: Vec::new(),
            },
        )
    }

    #[test]
    fn copies_origin_joined_url() {
        let mut h = helper(true);
        assert_eq!(h.copy_short_link("abc123").unwrap(), "https://example.com/abc123");
        assert_eq!(h.backend().copied, vec!["https://example.com/abc123"]);
        let area = h.staging_area().unwrap();
        assert_eq!(area.id(), "hidden-clipboard-area");
        assert_eq!(area.value(), "https://example.com/abc123");
        assert!(area.is_selected());
    }

    #[test]
    fn staging_area_is_created_once() {
        let mut h = helper(true);
        assert!(h.staging_area().is_none());
        h.copy_short_link("a").unwrap();
        h.copy_short_link("b").unwrap();
        assert_eq!(h.areas_created(), 1);
        assert_eq!(h.staging_area().unwrap().value(), "https://example.com/b");
    }

    #[test]
    fn refused_copy_is_an_error() {
        let mut h = helper(false);
        let err = h.copy_short_link("abc123").unwrap_err();
        assert_eq!(err.to_string(), "Could not copy shortlink to clipboard.");
        assert_eq!(h.staging_area().unwrap().value(), "https://example.com/abc123");
    }

    #[test]
    fn trailing_slash_on_origin_is_not_doubled() {
        let mut h = ClipboardHelper::new(
            "https://example.com/",
            FakeClipboard {
                accept: true,
                copied: Vec::new(),
            },
        );
        assert_eq!(h.copy_short_link("x").unwrap(), "https://example.com/x");
    }
}
