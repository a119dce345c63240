use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::OtError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An HTTP client that only allows requests to approved domains.
/// Every outbound call from the tool layer goes through here.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30s request timeout.
    pub fn new() -> Result<Self, OtError> {
        Self::with_settings(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
    }

    /// Creates a client with an explicit timeout and optional `User-Agent`.
    pub fn with_settings(timeout: Duration, user_agent: Option<&str>) -> Result<Self, OtError> {
        let mut allowlist = HashSet::new();
        let domains = [
            "api.platform.opentargets.org", // Open Targets Platform GraphQL
            "localhost",
            "127.0.0.1",
        ];
        for d in domains {
            allowlist.insert(d.to_string());
        }

        let mut builder = ClientBuilder::new().timeout(timeout);
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| OtError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of `url`. Fails if the URL has no host.
    pub fn allow_url(&mut self, url: &str) -> Result<(), OtError> {
        let parsed = Url::parse(url)
            .map_err(|e| OtError::Config(format!("Invalid URL {}: {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| OtError::Config(format!("URL has no host: {}", url)))?;
        self.allow_domain(host);
        Ok(())
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else { return false };
        let Some(host) = parsed.host_str() else { return false };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Request builder for a POST to an allowed URL.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, OtError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }

    fn check(&self, url: &str) -> Result<(), OtError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(OtError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_accepts_open_targets() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://api.platform.opentargets.org/api/v4/graphql"));
        assert!(client.is_allowed("http://127.0.0.1:8080/graphql"));
    }

    #[test]
    fn test_rejects_unknown_domain() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://example.com/graphql"));
        assert!(!client.is_allowed("not a url"));
        let err = client.post("https://example.com/graphql").unwrap_err();
        assert!(matches!(err, OtError::Security(_)));
    }

    #[test]
    fn test_subdomain_of_allowed_domain() {
        let mut client = SandboxClient::new().unwrap();
        client.allow_domain("ebi.ac.uk");
        assert!(client.is_allowed("https://www.ebi.ac.uk/api"));
        assert!(!client.is_allowed("https://notebi.ac.uk/api"));
    }

    #[test]
    fn test_allow_url_adds_host() {
        let mut client = SandboxClient::new().unwrap();
        client.allow_url("https://platform-dev.example.org/api/v4/graphql").unwrap();
        assert!(client.is_allowed("https://platform-dev.example.org/other"));
        assert!(client.allow_url("no-scheme").is_err());
    }
}
