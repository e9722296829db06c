//! Maps a platform and channel to a concrete release artifact.
//!
//! Stable builds are named after the version published at
//! `{site}/downloads/latest_version` and served from the `latest` GitHub
//! release. Development builds are the newest GitHub pre-release that
//! carries an asset for the platform.

pub mod github;

use async_trait::async_trait;
use log::{debug, info};

use crate::error::NvgtError;
use crate::http::HttpClient;
use crate::platform::{Channel, Os, PlatformTarget};

use github::{Release, ReleaseAsset};

pub const DEFAULT_SITE_URL: &str = "https://nvgt.gg";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/samtupy/nvgt/releases/download/latest";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Base URLs queried during resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub site_url: String,
    pub download_url: String,
    pub api_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn with_overrides(
        site_url: Option<String>,
        download_url: Option<String>,
        api_url: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        let pick = |value: Option<String>, default: String| {
            value
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default)
        };
        Self {
            site_url: pick(site_url, defaults.site_url),
            download_url: pick(download_url, defaults.download_url),
            api_url: pick(api_url, defaults.api_url),
        }
    }
}

/// A release artifact chosen for a [`PlatformTarget`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub target: PlatformTarget,
    pub url: String,
    pub file_name: String,
    /// Version string for stable builds, release tag for dev builds
    pub version: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, target: PlatformTarget) -> Result<ResolvedSource, NvgtError>;
}

pub struct NvgtResolver {
    http_client: HttpClient,
    endpoints: Endpoints,
}

impl NvgtResolver {
    pub fn new(http_client: HttpClient, endpoints: Endpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_stable(&self, target: PlatformTarget) -> Result<ResolvedSource, NvgtError> {
        let url = format!("{}/downloads/latest_version", self.endpoints.site_url);
        let body = self.http_client.get_text(&url).await.map_err(|e| {
            NvgtError::resolution(format!("could not fetch latest version from {}: {:#}", url, e))
        })?;

        let version = body.trim();
        if version.is_empty() {
            return Err(NvgtError::resolution(format!(
                "{} did not name a version",
                url
            )));
        }

        let file_name = stable_file_name(target.os, version);
        let source = ResolvedSource {
            target,
            url: format!("{}/{}", self.endpoints.download_url, file_name),
            file_name,
            version: version.to_string(),
        };
        info!("Resolved stable {} build: {}", target.os, source.url);
        Ok(source)
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_dev(&self, target: PlatformTarget) -> Result<ResolvedSource, NvgtError> {
        let releases = github::fetch_releases(&self.http_client, &self.endpoints.api_url)
            .await
            .map_err(|e| {
                NvgtError::resolution(format!("could not fetch the release index: {:#}", e))
            })?;
        debug!("Release index lists {} release(s)", releases.len());

        let (release, asset) = pick_dev_asset(&releases, target.os).ok_or_else(|| {
            NvgtError::resolution(format!(
                "no development build found for {}",
                target.os
            ))
        })?;

        let source = ResolvedSource {
            target,
            url: asset.browser_download_url.clone(),
            file_name: asset.name.clone(),
            version: release.tag_name.clone(),
        };
        info!("Resolved dev {} build: {}", target.os, source.url);
        Ok(source)
    }
}

#[async_trait]
impl Resolver for NvgtResolver {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, target: PlatformTarget) -> Result<ResolvedSource, NvgtError> {
        match target.channel {
            Channel::Stable => self.resolve_stable(target).await,
            Channel::Dev => self.resolve_dev(target).await,
        }
    }
}

/// `nvgt_{version}.{ext}`, the naming used by stable releases
pub fn stable_file_name(os: Os, version: &str) -> String {
    format!("nvgt_{}.{}", version, os.stable_extension())
}

/// Newest published pre-release with an asset for `os`.
/// Within a release, earlier suffixes in [`Os::dev_asset_suffixes`] win.
pub fn pick_dev_asset(releases: &[Release], os: Os) -> Option<(&Release, &ReleaseAsset)> {
    releases
        .iter()
        .filter(|release| release.prerelease && !release.draft)
        .find_map(|release| {
            os.dev_asset_suffixes().iter().find_map(|suffix| {
                release
                    .assets
                    .iter()
                    .find(|asset| asset_matches(os, &asset.name, suffix))
                    .map(|asset| (release, asset))
            })
        })
}

fn asset_matches(os: Os, name: &str, suffix: &str) -> bool {
    let name = name.to_lowercase();
    if !name.ends_with(suffix) {
        return false;
    }
    // A bare .zip could be for any platform
    if suffix == ".zip" {
        return os.name_hints().iter().any(|hint| name.contains(hint));
    }
    true
}
