//! Absolute identities for source files.

use std::fmt;
use std::path::{Path, PathBuf};

use fluent_uri::UriRef;
use serde::{Deserialize, Serialize};

use crate::error::{SpanError, SpanResult};

/// The absolute URL of a source file.
///
/// Files loaded from disk use the `file://` scheme. Files without an identity
/// (inline strings handed straight to the compiler) simply have no `SourceUrl`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Parse an absolute URL. Relative references are rejected.
    pub fn parse(url: impl Into<String>) -> SpanResult<Self> {
        let url = url.into();
        let checked = match UriRef::parse(url.as_str()) {
            Ok(uri) if uri.scheme().is_some() => Ok(()),
            Ok(_) => Err("missing scheme".to_owned()),
            Err(e) => Err(e.to_string()),
        };
        match checked {
            Ok(()) => Ok(Self(url)),
            Err(reason) => Err(SpanError::InvalidUrl { url, reason }),
        }
    }

    /// Convert a filesystem path to a `file://` URL.
    pub fn from_path(path: &Path) -> SpanResult<Self> {
        let path_str = path.to_string_lossy();
        let encoded = percent_encode(&path_str);
        let url = if encoded.starts_with('/') {
            format!("file://{encoded}")
        } else {
            format!("file:///{encoded}")
        };
        Self::parse(url)
    }

    /// The path component of a `file:` URL, or `None` for any other scheme.
    pub fn to_path(&self) -> Option<PathBuf> {
        let rest = self.0.strip_prefix("file://")?;
        let path = match rest.find('/') {
            Some(start) => &rest[start..],
            None => return None,
        };
        Some(PathBuf::from(percent_decode(path)))
    }

    pub fn is_file(&self) -> bool {
        self.0.starts_with("file:")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = SpanError;

    fn try_from(url: String) -> SpanResult<Self> {
        Self::parse(url)
    }
}

impl From<SourceUrl> for String {
    fn from(url: SourceUrl) -> Self {
        url.0
    }
}

fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                result.push(byte as char)
            }
            _ => result.push_str(&format!("%{byte:02X}")),
        }
    }
    result
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = s
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = byte {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let url = SourceUrl::parse("file:///styles/main.scss").unwrap();
        assert_eq!(url.as_str(), "file:///styles/main.scss");
        assert!(url.is_file());
    }

    #[test]
    fn test_parse_rejects_relative_reference() {
        let err = SourceUrl::parse("styles/main.scss").unwrap_err();
        assert!(matches!(err, SpanError::InvalidUrl { .. }));
    }

    #[test]
    fn test_non_file_scheme() {
        let url = SourceUrl::parse("https://example.com/theme.scss").unwrap();
        assert!(!url.is_file());
        assert_eq!(url.to_path(), None);
    }

    #[test]
    fn test_from_path_encodes_reserved_bytes() {
        let url = SourceUrl::from_path(Path::new("/my styles/a#b.scss")).unwrap();
        assert_eq!(url.as_str(), "file:///my%20styles/a%23b.scss");
        assert_eq!(
            url.to_path(),
            Some(PathBuf::from("/my styles/a#b.scss"))
        );
    }

    #[test]
    fn test_from_path_non_ascii() {
        let url = SourceUrl::from_path(Path::new("/테마/색.scss")).unwrap();
        assert!(url.as_str().starts_with("file:///%ED"));
        assert_eq!(url.to_path(), Some(PathBuf::from("/테마/색.scss")));
    }

    #[test]
    fn test_serde_validates() {
        let url: SourceUrl = serde_json::from_str("\"file:///a.scss\"").unwrap();
        assert_eq!(url.as_str(), "file:///a.scss");
        assert!(serde_json::from_str::<SourceUrl>("\"a.scss\"").is_err());
    }
}
