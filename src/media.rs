//! Embedded media reference extraction from raw page bodies.

use anyhow::Context as _;
use regex::Regex;
use url::Url;

/// Finds embedded media references by scanning a page body for a fixed
/// absolute-URL prefix followed by an alphanumeric identifier.
///
/// The pattern is compiled from the deployment profile at construction
/// time, so differently-configured extractors can coexist in one
/// process.
#[derive(Debug, Clone)]
pub struct MediaExtractor {
    pattern: Regex,
    host_hint: Option<String>,
}

impl MediaExtractor {
    pub fn new(media_url_prefix: &str) -> anyhow::Result<Self> {
        let pattern = Regex::new(&format!("{}([A-Za-z0-9]+)", regex::escape(media_url_prefix)))
            .with_context(|| format!("compile media pattern for prefix: {media_url_prefix}"))?;

        let host_hint = Url::parse(media_url_prefix)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned));

        Ok(Self { pattern, host_hint })
    }

    /// Media identifiers in order of appearance. Duplicates are kept;
    /// a page may legitimately embed the same media twice.
    #[must_use]
    pub fn media_ids<'h>(&self, page_html: &'h str) -> Vec<&'h str> {
        self.pattern
            .captures_iter(page_html)
            .filter_map(|captures| captures.get(1))
            .map(|id| id.as_str())
            .collect()
    }

    /// Cheap guard before a full scan: does the body mention the media
    /// host at all? Always true when the prefix has no parseable host.
    #[must_use]
    pub fn likely_references_host(&self, page_html: &str) -> bool {
        match &self.host_hint {
            Some(host) => page_html.contains(host.as_str()),
            None => true,
        }
    }
}
