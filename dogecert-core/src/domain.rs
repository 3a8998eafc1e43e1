use std::collections::BTreeSet;

/// Deduplicated set of target CDN domains.
///
/// Iteration is sorted, which has no meaning beyond making logs and tests
/// deterministic; deployments run independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: BTreeSet<String>,
}

impl DomainSet {
    /// Parse a whitespace-separated list, dropping empty entries and duplicates.
    pub fn parse(raw: &str) -> Self {
        raw.split_whitespace().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }
}

impl<S: AsRef<str>> FromIterator<S> for DomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let domains = iter
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }
}
