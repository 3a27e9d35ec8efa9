//! Document-related types: [`DocumentUri`], [`Document`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Language identifier editors use for Elixir sources.
pub const ELIXIR_LANGUAGE_ID: &str = "elixir";

/// A URI string identifying a document.
///
/// This is typically a `file://` URI for local files. Other schemes
/// (`untitled:`, `git:`) show up for unsaved buffers and diff views.
/// Two URIs are the same document when their strings are equal, which makes
/// this type usable as the identity key for queued work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri(Arc<str>);

impl DocumentUri {
    /// Create a new `DocumentUri` from a string.
    #[must_use]
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` URI from an absolute path.
    ///
    /// Non-ASCII characters and reserved characters are percent-encoded the
    /// way editors encode them, so the result compares equal to the URI the
    /// client sends for the same file. `None` for relative paths.
    #[must_use]
    pub fn from_file_path(path: &Path) -> Option<Self> {
        let url = Url::from_file_path(path).ok()?;
        // `url` leaves brackets alone, but they are not valid in an LSP URI path
        let encoded = url.as_str().replace('[', "%5B").replace(']', "%5D");
        Some(Self::new(encoded))
    }

    /// Get the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scheme part of the URI (`file`, `untitled`, ...), if any.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scheme, _)| scheme)
    }

    /// Returns `true` if this URI uses the `file` scheme.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.scheme() == Some("file")
    }

    /// Convert a `file://` URI to a filesystem path.
    ///
    /// Returns `None` for other schemes and for URIs naming a remote host.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        Url::parse(&self.0).ok()?.to_file_path().ok()
    }
}

impl std::fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

/// An open document as seen by the server: identity, language and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Stable identity of the document
    pub uri: DocumentUri,
    /// Editor language identifier (e.g. `"elixir"`)
    pub language_id: String,
    /// Full text content
    pub text: Arc<str>,
}

impl Document {
    /// Create a new document snapshot.
    #[must_use]
    pub fn new(uri: DocumentUri, language_id: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// Returns `true` if the document is Elixir source.
    #[must_use]
    pub fn is_elixir(&self) -> bool {
        self.language_id == ELIXIR_LANGUAGE_ID
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uri() {
        let uri = DocumentUri::new("file:///path/to/file.ex");
        assert_eq!(uri.as_str(), "file:///path/to/file.ex");
        assert_eq!(uri.to_string(), "file:///path/to/file.ex");
        assert_eq!(uri.scheme(), Some("file"));
        assert!(uri.is_file());
    }

    #[test]
    fn test_untitled_uri_is_not_file() {
        let uri = DocumentUri::new("untitled:Untitled-1");
        assert_eq!(uri.scheme(), Some("untitled"));
        assert!(!uri.is_file());
        assert_eq!(uri.to_file_path(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_path_round_trip() {
        let path = Path::new("/tmp/my app/lib/sample.ex");
        let uri = DocumentUri::from_file_path(path).unwrap();
        assert_eq!(uri.as_str(), "file:///tmp/my%20app/lib/sample.ex");
        assert_eq!(uri.to_file_path(), Some(path.to_path_buf()));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_path_matches_editor_encoding() {
        let path = Path::new("/tmp/caf\u{e9}/lib/a.ex");
        let uri = DocumentUri::from_file_path(path).unwrap();
        assert_eq!(uri, DocumentUri::new("file:///tmp/caf%C3%A9/lib/a.ex"));
        assert_eq!(uri.to_file_path(), Some(path.to_path_buf()));

        let path = Path::new("/tmp/x[1]/a.ex");
        let uri = DocumentUri::from_file_path(path).unwrap();
        assert_eq!(uri.as_str(), "file:///tmp/x%5B1%5D/a.ex");
        assert_eq!(uri.to_file_path(), Some(path.to_path_buf()));
    }

    #[test]
    fn test_relative_path_has_no_uri() {
        assert_eq!(DocumentUri::from_file_path(Path::new("lib/a.ex")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_remote_host_is_not_a_local_path() {
        let uri = DocumentUri::new("file://build-server/srv/app/lib/a.ex");
        assert!(uri.is_file());
        assert_eq!(uri.to_file_path(), None);
    }

    #[test]
    fn test_elixir_document() {
        let doc = Document::new(
            DocumentUri::new("file:///a.ex"),
            ELIXIR_LANGUAGE_ID,
            "defmodule A do\nend\n",
        );
        assert!(doc.is_elixir());
        assert_eq!(&*doc.text, "defmodule A do\nend\n");

        let other = Document::new(DocumentUri::new("file:///a.md"), "markdown", "# A");
        assert!(!other.is_elixir());
    }
}
