use async_trait::async_trait;
use std::sync::Arc;

use super::errors::ProbeError;
use super::models::{Baseline, ProbeOutcome, Target, word_count};
use crate::config::{FilterConfig, HttpConfig};
use crate::resolver::NameResolver;

#[async_trait]
pub trait CandidateProber: Send + Sync {
    /// `Ok(None)` covers both "not a distinct vhost" and tolerated network failures.
    async fn probe(&self, candidate: &str) -> Result<Option<ProbeOutcome>, ProbeError>;
}

/// Differential rule: filtered statuses never count, otherwise any
/// word-count deviation from the baseline does.
pub fn classify(status: u16, words: usize, baseline: &Baseline, ignored_status: &[u16]) -> bool {
    if ignored_status.contains(&status) {
        return false;
    }
    words != baseline.word_count
}

pub struct HttpProber {
    target: Arc<Target>,
    baseline: Baseline,
    resolver: Arc<dyn NameResolver>,
    http: HttpConfig,
    ignored_status: Vec<u16>,
}

impl HttpProber {
    pub fn new(
        target: Arc<Target>,
        baseline: Baseline,
        resolver: Arc<dyn NameResolver>,
        http: HttpConfig,
        filter: &FilterConfig,
    ) -> Self {
        Self {
            target,
            baseline,
            resolver,
            http,
            ignored_status: filter.ignored_status.clone(),
        }
    }

    async fn fetch(&self, candidate: &str) -> Result<Option<ProbeOutcome>, ProbeError> {
        let host = self.target.host_for(candidate);
        let url = self.target.url_for(&host);
        if let Err(e) = reqwest::Url::parse(&url) {
            tracing::debug!("Skipping {}: not a valid URL ({})", candidate, e);
            return Ok(None);
        }

        let binding = self
            .resolver
            .bind(&host, self.target.socket_addr())
            .map_err(|e| ProbeError::Unexpected(format!("cannot bind {}: {:#}", host, e)))?;
        let client = binding.client(&self.http).map_err(ProbeError::classify)?;

        // Anything that goes wrong with this one request is a per-candidate failure.
        let response = client.get(&url).send().await?;
        let status = response.status().as_u16();
        if self.ignored_status.contains(&status) {
            tracing::trace!("{} filtered by status {}", url, status);
            return Ok(None);
        }

        let body = response.text().await?;
        let words = word_count(&body);
        if !classify(status, words, &self.baseline, &self.ignored_status) {
            tracing::trace!("{} matches baseline ({} words)", url, words);
            return Ok(None);
        }

        Ok(Some(ProbeOutcome {
            candidate: candidate.to_string(),
            url,
            status_code: status,
            word_count: words,
        }))
    }
}

#[async_trait]
impl CandidateProber for HttpProber {
    async fn probe(&self, candidate: &str) -> Result<Option<ProbeOutcome>, ProbeError> {
        match self.fetch(candidate).await {
            Err(ProbeError::Transport(e)) => {
                tracing::debug!("Probe for {} failed: {}", candidate, e);
                Ok(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Protocol;
    use crate::resolver::ClientResolver;
    use anyhow::Result;
    use std::net::{Ipv4Addr, SocketAddr};
    use wiremock::matchers::{header_regex, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASELINE: Baseline = Baseline { char_count: 300, word_count: 50 };
    const IGNORED: &[u16] = &[404, 500];

    #[test]
    fn test_classify_same_word_count() {
        assert!(!classify(200, 50, &BASELINE, IGNORED));
    }

    #[test]
    fn test_classify_different_word_count() {
        assert!(classify(200, 51, &BASELINE, IGNORED));
        assert!(classify(301, 0, &BASELINE, IGNORED));
    }

    #[test]
    fn test_classify_filtered_status() {
        assert!(!classify(404, 51, &BASELINE, IGNORED));
        assert!(!classify(500, 10, &BASELINE, IGNORED));
        assert!(classify(403, 10, &BASELINE, IGNORED));
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn prober_for(server: &MockServer, resolver: Arc<dyn NameResolver>) -> HttpProber {
        let target = Target::new(Ipv4Addr::LOCALHOST, "example.com", Protocol::Http)
            .with_port(Some(server.address().port()));
        HttpProber::new(
            Arc::new(target),
            BASELINE,
            resolver,
            HttpConfig::default(),
            &FilterConfig::default(),
        )
    }

    async fn mount(server: &MockServer, host: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(header_regex("host", &format!("^{}", regex::escape(host))))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_probe_discovers_deviation() {
        let server = MockServer::start().await;
        mount(&server, "admin.example.com", 200, words(51)).await;

        let outcome = prober_for(&server, Arc::new(ClientResolver))
            .probe("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.candidate, "admin");
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.word_count, 51);
        assert!(outcome.url.starts_with("http://admin.example.com:"));
    }

    #[tokio::test]
    async fn test_probe_same_shape_is_not_discovered() {
        let server = MockServer::start().await;
        mount(&server, "www.example.com", 200, words(50)).await;

        let outcome = prober_for(&server, Arc::new(ClientResolver)).probe("www").await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_probe_filters_not_found() {
        let server = MockServer::start().await;
        mount(&server, "old.example.com", 404, words(7)).await;

        let outcome = prober_for(&server, Arc::new(ClientResolver)).probe("old").await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_probe_transport_failure_is_soft() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let target = Target::new(Ipv4Addr::LOCALHOST, "example.com", Protocol::Http).with_port(Some(port));
        let prober = HttpProber::new(
            Arc::new(target),
            BASELINE,
            Arc::new(ClientResolver),
            HttpConfig::default(),
            &FilterConfig::default(),
        );

        assert!(prober.probe("admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_probe_skips_candidate_with_invalid_host() {
        let server = MockServer::start().await;
        let prober = prober_for(&server, Arc::new(ClientResolver));

        assert!(prober.probe("foo bar").await.unwrap().is_none());
        assert!(prober.probe("a<b").await.unwrap().is_none());
    }

    struct BrokenResolver;

    impl NameResolver for BrokenResolver {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn bind(&self, _hostname: &str, _addr: SocketAddr) -> Result<crate::resolver::ScopedBinding> {
            anyhow::bail!("resolver unavailable")
        }
    }

    #[tokio::test]
    async fn test_probe_resolver_failure_is_unexpected() {
        let server = MockServer::start().await;
        let err = prober_for(&server, Arc::new(BrokenResolver))
            .probe("admin")
            .await
            .unwrap_err();
        assert!(!err.is_transport());
        assert!(err.to_string().contains("resolver unavailable"));
    }
}
