//! Page location and history access.
//!
//! SYSTEM CONTEXT
//! ==============
//! The relay controller reads its initial view from the address bar and
//! writes navigation state back through these traits, so tests can drive it
//! with recorded fakes. [`BrowserPage`] is the `web-sys` implementation;
//! outside `hydrate` builds it reads an empty location and drops writes.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

/// Read access to the current address.
pub trait PageLocation {
    /// Path component, e.g. `/broadcast/tour/round/abcd1234`.
    fn pathname(&self) -> String;
    /// Fragment including the leading `#`, or empty.
    fn hash(&self) -> String;
    /// Full URL.
    fn href(&self) -> String;
}

/// Session history writes.
pub trait PageHistory {
    /// Add a new history entry for `url`.
    fn push_state(&self, url: &str);
    /// Replace the current history entry with `url`.
    fn replace_state(&self, url: &str);
}

/// Number of path segments below the top-level route.
///
/// `/broadcast/slug/id/round-slug/id` has 4.
#[must_use]
pub fn path_segments(pathname: &str) -> usize {
    pathname
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count()
        .saturating_sub(1)
}

/// Fragment text without its leading `#`.
#[must_use]
pub fn fragment(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

/// `window.location` / `window.history` backed page.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPage;

impl PageLocation for BrowserPage {
    fn pathname(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            String::new()
        }
    }

    fn hash(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().hash().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            String::new()
        }
    }

    fn href(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            String::new()
        }
    }
}

impl PageHistory for BrowserPage {
    fn push_state(&self, url: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
        }
    }

    fn replace_state(&self, url: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
        }
    }
}
