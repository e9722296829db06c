//! GitHub release index, used to find development builds.

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::http::HttpClient;

/// Repository NVGT publishes its releases from
pub const NVGT_REPO: &str = "samtupy/nvgt";

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Fetch the most recent page of releases, newest first.
#[tracing::instrument(skip(http_client))]
pub async fn fetch_releases(http_client: &HttpClient, api_url: &str) -> Result<Vec<Release>> {
    let url = format!("{}/repos/{}/releases", api_url, NVGT_REPO);
    debug!("Fetching releases from {}...", url);

    http_client
        .get_json_with_query(&url, &[("per_page", "100")])
        .await
}
