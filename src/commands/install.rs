use anyhow::Result;
use log::debug;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::{
    archive::ArchiveExtractor,
    cleanup,
    installer::Installer,
    platform::{Channel, Os, PlatformTarget, resolve_os},
    resolver::{Endpoints, Resolver},
    runtime::Runtime,
};

use super::config::Config;
use super::warn_if_unprivileged;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallOptions {
    /// Install location; the platform default when absent
    pub path: Option<PathBuf>,
    /// Platform name; the host when absent
    pub platform: Option<String>,
    pub dev: bool,
}

#[tracing::instrument(skip(runtime, endpoints))]
pub async fn install<R: Runtime + 'static>(
    runtime: R,
    options: InstallOptions,
    endpoints: Endpoints,
) -> Result<()> {
    // Reject the platform before any client is built or request is made
    let os = resolve_os(options.platform.as_deref())?;
    let config = Config::new(runtime, endpoints)?;
    run(config, os, options).await
}

#[tracing::instrument(skip(config))]
pub async fn run<R: Runtime + 'static, V: Resolver, E: ArchiveExtractor>(
    config: Config<R, V, E>,
    os: Os,
    options: InstallOptions,
) -> Result<()> {
    let target = PlatformTarget::new(os, Channel::from_dev_flag(options.dev));
    let path = options.path.unwrap_or_else(|| os.default_install_path());

    match target.channel {
        Channel::Stable => println!("Getting latest version..."),
        Channel::Dev => println!("Getting latest development version..."),
    }
    let source = config.resolver.resolve(target).await?;
    println!("Found {}", source.version);
    println!("Installing for {}", os);
    debug!("Artifact {} from {}", source.file_name, source.url);

    let cleanup_ctx = cleanup::new_shared();
    let ctrl_c_handler = spawn_interrupt_watcher(
        Arc::clone(&cleanup_ctx),
        tokio::signal::ctrl_c(),
        || {
            std::process::exit(130);
        },
    );

    let installer = Installer::new(
        &config.runtime,
        &config.http_client,
        &config.extractor,
        cleanup_ctx,
    );
    let result = installer.install(&source, &path).await;

    ctrl_c_handler.abort();

    if let Err(e) = &result {
        warn_if_unprivileged(&config.runtime, e);
    }
    result?;

    println!(
        "NVGT {} installed for {} at {}",
        source.version,
        os,
        path.display()
    );
    Ok(())
}

/// Remove registered temporary paths once `signal` fires, then call `on_interrupt`.
///
/// Install steps block their thread, so the watcher needs a worker of its own
/// (a multi-thread runtime) to run while they do.
pub(crate) fn spawn_interrupt_watcher<S, F>(
    cleanup_ctx: cleanup::SharedCleanupContext,
    signal: S,
    on_interrupt: F,
) -> JoinHandle<()>
where
    S: Future<Output = std::io::Result<()>> + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        if signal.await.is_ok() {
            eprintln!("\nInterrupted, cleaning up...");
            if let Ok(ctx) = cleanup_ctx.lock() {
                ctx.cleanup();
            }
            on_interrupt();
        }
    })
}
