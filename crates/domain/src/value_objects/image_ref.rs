//! Normalized image reference
//!
//! Upstream payloads describe images as a bare URL string, as `{ "uri": ... }`,
//! as `{ "url": ... }`, or as the name of an asset bundled with the client.
//! All of them deserialize into [`ImageRef`].

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::DomainError;

const REMOTE_SCHEMES: [&str; 4] = ["http", "https", "file", "data"];

/// A reference to an image, either fetched remotely or bundled with the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImageRef", into = "String")]
pub enum ImageRef {
    /// Image loaded from a URL
    Remote(Url),
    /// Image shipped with the client, addressed by asset name
    Bundled(String),
}

impl ImageRef {
    /// Normalize a free-form reference string
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank reference.
    pub fn parse(reference: &str) -> Result<Self, DomainError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(DomainError::ValidationError(
                "image reference must not be empty".to_string(),
            ));
        }

        match Url::parse(reference) {
            Ok(url) if REMOTE_SCHEMES.contains(&url.scheme()) => Ok(Self::Remote(url)),
            _ => Ok(Self::Bundled(reference.to_string())),
        }
    }

    /// The URL, if this image is remote
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        match self {
            Self::Remote(url) => Some(url),
            Self::Bundled(_) => None,
        }
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        match value {
            ImageRef::Remote(url) => url.into(),
            ImageRef::Bundled(name) => name,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageRef {
    Plain(String),
    Uri { uri: String },
    Url { url: String },
}

impl TryFrom<RawImageRef> for ImageRef {
    type Error = DomainError;

    fn try_from(raw: RawImageRef) -> Result<Self, Self::Error> {
        match raw {
            RawImageRef::Plain(s) | RawImageRef::Uri { uri: s } | RawImageRef::Url { url: s } => {
                Self::parse(&s)
            },
        }
    }
}
