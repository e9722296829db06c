use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Fetch `url` into `dest`, creating the file through the runtime.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading {}...", url);

    let bytes = http_client
        .download_file(url, || {
            runtime
                .create_file(dest)
                .with_context(|| format!("Failed to create download file at {:?}", dest))
        })
        .await?;

    info!("Downloaded {} bytes to {}", bytes, dest.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use reqwest::Client;

    #[tokio::test]
    async fn test_download_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/nvgt_0.89.tar.gz")
            .with_status(200)
            .with_body("archive bytes")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .with(mockall::predicate::eq(
                Path::new("/tmp/dl/nvgt_0.89.tar.gz").to_path_buf(),
            ))
            .times(1)
            .returning(|_| Ok(Box::new(std::io::sink())));

        let http_client = HttpClient::new(Client::new());
        let bytes = download_file(
            &runtime,
            &format!("{}/nvgt_0.89.tar.gz", url),
            Path::new("/tmp/dl/nvgt_0.89.tar.gz"),
            &http_client,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 13);
    }

    #[tokio::test]
    async fn test_download_file_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/nvgt_0.89.tar.gz")
            .with_status(404)
            .create_async()
            .await;

        // No expectations: the file must not be created
        let runtime = MockRuntime::new();
        let http_client = HttpClient::new(Client::new());

        let result = download_file(
            &runtime,
            &format!("{}/nvgt_0.89.tar.gz", url),
            Path::new("nvgt_0.89.tar.gz"),
            &http_client,
        )
        .await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_download_file_create_fails() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/nvgt_0.89.tar.gz")
            .with_status(200)
            .with_body("archive bytes")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .returning(|_| Err(anyhow::anyhow!("No space left on device")));

        let http_client = HttpClient::new(Client::new());
        let err = download_file(
            &runtime,
            &format!("{}/nvgt_0.89.tar.gz", url),
            Path::new("nvgt_0.89.tar.gz"),
            &http_client,
        )
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("No space left on device"));
    }
}
