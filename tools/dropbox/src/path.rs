//! Dropbox path canonicalization.

/// Maps the spellings of the root folder to the empty string Dropbox expects.
///
/// Exactly `""`, `"/"` and `"."` are treated as root. Every other input is
/// returned untouched: no trimming, no separator collapsing, no handling of
/// interior dot segments.
pub fn normalize(path: &str) -> &str {
    match path {
        "" | "/" | "." => "",
        other => other,
    }
}

/// Whether `normalize` would rewrite `path`.
pub(crate) fn substitutes_root(path: &str) -> bool {
    matches!(path, "/" | ".")
}
