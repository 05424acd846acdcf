use url::Url;

/// Canonical form used for deduplication: the parsed URL without its fragment.
///
/// The WHATWG parser already lower-cases the host and elides default ports,
/// so two URLs are the same page iff their canonical serializations match
/// on scheme, host, port, path and query.
pub fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Resolve a (possibly relative) reference against the page it appeared on.
///
/// Returns `None` if the reference cannot be joined onto `base`.
pub fn resolve(base: &Url, reference: &str) -> Option<Url> {
    base.join(reference).ok().map(canonicalize)
}
