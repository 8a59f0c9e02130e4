use crate::domain::ports::CsvSource;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::parse_http_url;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;

/// Builds the shared HTTP client used for every CSV download.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// A CSV document reachable over HTTP(S).
pub struct UrlSource {
    client: Client,
    url: String,
}

impl UrlSource {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: normalize_sheet_url(url.trim()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CsvSource for UrlSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        let url = parse_http_url("url", &self.url)?;

        tracing::debug!("Making CSV request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("CSV response status: {}", status);

        if !status.is_success() {
            return Err(DashboardError::HttpStatusError {
                url: self.url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

fn sheet_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/spreadsheets/d/([A-Za-z0-9_-]+)/(?:edit|view)").expect("valid regex")
    })
}

/// Rewrites a Google Sheets browser link into its CSV export link.
///
/// `https://docs.google.com/spreadsheets/d/<ID>/edit#gid=<GID>` becomes
/// `https://docs.google.com/spreadsheets/d/<ID>/export?format=csv&gid=<GID>`.
/// Anything else is returned unchanged.
pub fn normalize_sheet_url(raw: &str) -> String {
    let Ok(url) = url::Url::parse(raw) else {
        return raw.to_string();
    };
    if url.host_str() != Some("docs.google.com") {
        return raw.to_string();
    }
    let Some(caps) = sheet_path_regex().captures(url.path()) else {
        return raw.to_string();
    };

    // gid 可能在 fragment (#gid=) 或 query (?gid=)
    let gid = url
        .fragment()
        .and_then(|f| f.strip_prefix("gid="))
        .map(str::to_string)
        .or_else(|| {
            url.query_pairs()
                .find(|(k, _)| k == "gid")
                .map(|(_, v)| v.into_owned())
        })
        .filter(|g| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_else(|| "0".to_string());

    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        &caps[1], gid
    )
}
