use anyhow::Result;
use reqwest::Client;

use crate::{
    archive::{ArchiveExtractor, ArchiveExtractorImpl},
    http::HttpClient,
    resolver::{Endpoints, NvgtResolver, Resolver},
    runtime::Runtime,
};

pub const USER_AGENT: &str = "nvgti-cli";

/// Everything a command needs, built once from the CLI flags.
pub struct Config<R: Runtime, V: Resolver, E: ArchiveExtractor> {
    pub runtime: R,
    pub resolver: V,
    pub extractor: E,
    pub http_client: HttpClient,
}

impl<R: Runtime> Config<R, NvgtResolver, ArchiveExtractorImpl> {
    pub fn new(runtime: R, endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let http_client = HttpClient::new(client);
        let resolver = NvgtResolver::new(http_client.clone(), endpoints);

        Ok(Self {
            runtime,
            resolver,
            extractor: ArchiveExtractorImpl::new(),
            http_client,
        })
    }
}
