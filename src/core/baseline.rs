use super::errors::VhostError;
use super::models::{Baseline, Target};
use crate::config::HttpConfig;
use crate::resolver::NameResolver;

/// Fetch the bare domain once and record its response shape.
///
/// There is no retry: without a baseline there is nothing to compare
/// candidates against, so any failure ends the run.
pub async fn establish(
    target: &Target,
    resolver: &dyn NameResolver,
    http: &HttpConfig,
) -> Result<Baseline, VhostError> {
    let url = target.url_for(&target.domain);
    let binding = resolver.bind(&target.domain, target.socket_addr())?;
    let client = binding
        .client(http)
        .map_err(|source| VhostError::Baseline { url: url.clone(), source })?;

    tracing::debug!("Requesting baseline {} via {}", url, resolver.name());
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| VhostError::Baseline { url: url.clone(), source })?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| VhostError::Baseline { url: url.clone(), source })?;

    let baseline = Baseline::from_body(&body);
    tracing::debug!(
        "Baseline {} answered {} with {} words",
        url,
        status.as_u16(),
        baseline.word_count
    );
    Ok(baseline)
}
