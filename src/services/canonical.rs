use url::Url;

/// Query parameters injected by the search engine for click tracking.
const TRACKING_PARAMS: [&str; 2] = ["ved", "usg"];

/// Strips tracking query parameters from a result link.
///
/// Remaining query parameters keep their original relative order. Empty or
/// unparseable input is returned unchanged; this function never fails and
/// is idempotent, which makes the output usable as a deduplication key.
#[must_use]
pub fn canonicalize(link: &str) -> String {
    if link.is_empty() {
        return String::new();
    }

    let Ok(mut url) = Url::parse(link) else {
        return link.to_string();
    };

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    // Second pass: some links carry the markers outside the parsed query
    // (e.g. inside the fragment), so truncate at any literal occurrence.
    let mut canonical = url.to_string();
    for marker in ["&ved=", "&usg="] {
        if let Some(position) = canonical.find(marker) {
            canonical.truncate(position);
        }
    }

    canonical
}
