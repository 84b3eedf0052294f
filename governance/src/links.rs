//! Discussion links embedded in proposal bodies.

use regex::Regex;

use crate::error::GovernanceError;

/// Finds the first forum link and the first GitHub link in a proposal body.
#[derive(Clone, Debug)]
pub struct LinkExtractor {
    community: Regex,
    github: Regex,
}

const URL_TAIL: &str = r"[a-zA-Z0-9\-_.!&%/]+";

impl LinkExtractor {
    /// `community_domain` is a host such as `community.airswap.io`;
    /// `github_org` scopes GitHub links to one organisation.
    pub fn new(community_domain: &str, github_org: &str) -> Result<Self, GovernanceError> {
        let community = Regex::new(&format!(
            r"https://{}{URL_TAIL}",
            regex::escape(community_domain)
        ))?;
        let github = Regex::new(&format!(
            r"https://github\.com/{}{URL_TAIL}",
            regex::escape(github_org)
        ))?;
        Ok(Self { community, github })
    }

    pub fn community_url(&self, body: &str) -> Option<String> {
        self.community.find(body).map(|m| m.as_str().to_string())
    }

    pub fn github_url(&self, body: &str) -> Option<String> {
        self.github.find(body).map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new("community.airswap.io", "airswap").unwrap()
    }

    #[test]
    fn finds_first_links() {
        let body = "Discussion: https://community.airswap.io/t/aip-12-fees/301 and \
                    also https://community.airswap.io/t/other/1.\n\
                    Code: https://github.com/airswap/airswap-protocols/pull/88)";
        let links = extractor();
        assert_eq!(
            links.community_url(body).as_deref(),
            Some("https://community.airswap.io/t/aip-12-fees/301")
        );
        assert_eq!(
            links.github_url(body).as_deref(),
            Some("https://github.com/airswap/airswap-protocols/pull/88")
        );
    }

    #[test]
    fn ignores_other_hosts_and_orgs() {
        let body = "http://community.airswap.io/t/x https://github.com/someoneelse/repo \
                    https://communityXairswap.io/t/y";
        let links = extractor();
        assert_eq!(links.community_url(body), None);
        assert_eq!(links.github_url(body), None);
    }

    #[test]
    fn bare_host_is_not_a_link() {
        assert_eq!(extractor().community_url("https://community.airswap.io"), None);
    }
}
