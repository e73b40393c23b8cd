/// Allow-list of trusted source domains.
///
/// Matching is a case-insensitive substring check against the whole URL,
/// not a host-suffix check. An allowed domain appearing anywhere in the URL
/// (including a query parameter) matches.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    domains: Vec<String>,
}

impl AllowList {
    #[must_use]
    pub fn new(domains: &[String]) -> Self {
        Self {
            domains: domains.iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// An empty domain list means no filtering is applied.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.domains.is_empty()
    }

    /// True iff the URL contains at least one allowed domain. Empty input
    /// never matches.
    #[must_use]
    pub fn allows(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let lower = url.to_lowercase();
        self.domains.iter().any(|domain| lower.contains(domain))
    }
}
