use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use crate::{
    compiler::{CompilerOptions, NvgtCompiler},
    installer,
    platform::Os,
    runtime::Runtime,
};

/// The NVGT executable at `nvgt` (an executable or an installation), or in
/// this machine's default installation.
fn find_nvgt<R: Runtime>(runtime: &R, nvgt: Option<PathBuf>) -> Result<PathBuf> {
    let os = Os::detect()?;
    let path = nvgt.unwrap_or_else(|| os.default_install_path());

    match installer::locate(runtime, os, &path) {
        Some(executable) => {
            debug!("Using NVGT at {:?}", executable);
            Ok(executable)
        }
        None => bail!(
            "NVGT is not installed at {} (run `nvgti install` first)",
            path.display()
        ),
    }
}

fn check_status(status: i32) -> Result<()> {
    if status != 0 {
        bail!("NVGT exited with status {}", status);
    }
    Ok(())
}

/// Run, debug or compile `script` with an installed NVGT.
#[tracing::instrument(skip(runtime, options))]
pub fn compile<R: Runtime>(
    runtime: R,
    nvgt: Option<PathBuf>,
    script: &Path,
    options: CompilerOptions,
) -> Result<()> {
    let binary = find_nvgt(&runtime, nvgt)?;
    let compiler = NvgtCompiler::new(&runtime, binary);
    check_status(compiler.execute(script, &options)?)
}

/// Print the version, or the usage text, of an installed NVGT.
#[tracing::instrument(skip(runtime))]
pub fn info<R: Runtime>(runtime: R, nvgt: Option<PathBuf>, usage: bool) -> Result<()> {
    let binary = find_nvgt(&runtime, nvgt)?;
    let compiler = NvgtCompiler::new(&runtime, binary);
    let status = if usage {
        compiler.help()?
    } else {
        compiler.version()?
    };
    check_status(status)
}
