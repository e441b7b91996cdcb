//! Helpers shared by the reqwest adapters.

use url::Url;

/// Return `base` with a trailing slash so `Url::join` appends rather than
/// replacing the final path segment.
pub(super) fn as_directory(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Whitespace-collapsed, length-capped preview of a response body for error
/// messages.
pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// `status 503` or `status 503: <preview>`.
pub(super) fn status_message(status: u16, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {preview}")
    }
}
