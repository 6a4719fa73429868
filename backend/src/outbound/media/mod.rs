//! Media URL resolution.
//!
//! Item images are stored as opaque references. Absolute `http`/`https`
//! references are returned untouched; anything else is joined onto the
//! configured media base.

use url::Url;

use crate::domain::ports::MediaResolver;
use crate::domain::MediaReference;

/// Default base used when no media URL is configured.
pub const DEFAULT_MEDIA_BASE: &str = "/media/";

/// Prefixes relative media references with a fixed base.
///
/// # Examples
/// ```
/// use barter_backend::domain::MediaReference;
/// use barter_backend::domain::ports::MediaResolver;
/// use barter_backend::outbound::media::BaseUrlMediaResolver;
///
/// let resolver = BaseUrlMediaResolver::new("https://cdn.example.com/items");
/// let image = MediaReference::new("lamp.jpg").unwrap();
/// assert_eq!(resolver.resolve(&image), "https://cdn.example.com/items/lamp.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrlMediaResolver {
    base: String,
}

impl BaseUrlMediaResolver {
    /// Build a resolver. A trailing slash is appended when missing.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into().trim().to_owned();
        if base.is_empty() {
            base = DEFAULT_MEDIA_BASE.to_owned();
        }
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// Base every relative reference is joined onto.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for BaseUrlMediaResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_BASE)
    }
}

fn is_absolute_web_url(reference: &str) -> bool {
    Url::parse(reference).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

impl MediaResolver for BaseUrlMediaResolver {
    fn resolve(&self, reference: &MediaReference) -> String {
        let raw = reference.as_ref();
        if is_absolute_web_url(raw) {
            return raw.to_owned();
        }
        format!("{}{}", self.base, raw.trim_start_matches('/'))
    }
}
