//! Resource identifier helpers.
//!
//! Documents are addressed by `lsp_types::Uri`, which accepts relative
//! references. Resource identifiers handed to the command surface must be
//! absolute, so validation and component access go through the `url` crate.

use camino::Utf8PathBuf;
use lsp_types::Uri;
use url::Url;

/// Parses an absolute resource identifier, keeping the caller's spelling.
///
/// `url` only validates here: its serialisation lower-cases the scheme and
/// resolves dot segments, and documents are keyed by the spelling they were
/// opened with. Returns `None` for relative references and malformed input.
pub(crate) fn parse_resource(value: &str) -> Option<Uri> {
    if Url::parse(value).is_err() {
        return None;
    }
    value.parse().ok()
}

/// Returns the scheme of an absolute resource identifier.
pub(crate) fn scheme(uri: &Uri) -> Option<String> {
    Url::parse(uri.as_str())
        .ok()
        .map(|url| url.scheme().to_owned())
}

/// Converts a resource identifier to the path used for glob matching.
///
/// `file` resources are percent-decoded into file system paths; other schemes
/// fall back to the raw path component.
pub(crate) fn match_path(uri: &Uri) -> Utf8PathBuf {
    let raw = uri.as_str();
    let Ok(url) = Url::parse(raw) else {
        return Utf8PathBuf::from(raw);
    };
    url.to_file_path()
        .ok()
        .and_then(|path| Utf8PathBuf::try_from(path).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(url.path()))
}
