//! Drives an installed NVGT executable: running, debugging and compiling scripts.
//!
//! [`build_args`] maps [`CompilerOptions`] onto NVGT's own command line;
//! [`NvgtCompiler`] runs it through the [`Runtime`] attached to the terminal.

use anyhow::{Result, anyhow, bail};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::NvgtError;
use crate::runtime::Runtime;

/// What NVGT does with the script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Run the script directly
    #[default]
    Run,
    /// Compile a release executable (`-c`)
    Release,
    /// Compile with debug information (`-C`)
    Debug,
    /// Run under the AngelScript debugger (`-d`)
    Debugger,
}

impl Mode {
    fn flag(&self) -> Option<&'static str> {
        match self {
            Mode::Run => None,
            Mode::Release => Some("-c"),
            Mode::Debug => Some("-C"),
            Mode::Debugger => Some("-d"),
        }
    }
}

/// Platform NVGT compiles for. Named the way NVGT's `-p` flag expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    Auto,
    Windows,
    Linux,
    Mac,
    Android,
}

impl TargetPlatform {
    pub const ALL: [TargetPlatform; 5] = [
        TargetPlatform::Auto,
        TargetPlatform::Windows,
        TargetPlatform::Linux,
        TargetPlatform::Mac,
        TargetPlatform::Android,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Auto => "auto",
            TargetPlatform::Windows => "windows",
            TargetPlatform::Linux => "linux",
            TargetPlatform::Mac => "mac",
            TargetPlatform::Android => "android",
        }
    }
}

impl FromStr for TargetPlatform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        TargetPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown compile target '{}'. Expected one of: auto, windows, linux, mac, android",
                    s.trim()
                )
            })
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How NVGT treats script warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningLevel {
    #[default]
    Ignore,
    Print,
    Error,
}

impl WarningLevel {
    fn level(&self) -> u8 {
        match self {
            WarningLevel::Ignore => 0,
            WarningLevel::Print => 1,
            WarningLevel::Error => 2,
        }
    }
}

impl FromStr for WarningLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" | "ignore" => Ok(WarningLevel::Ignore),
            "1" | "print" => Ok(WarningLevel::Print),
            "2" | "error" => Ok(WarningLevel::Error),
            other => bail!(
                "Unknown warning level '{}'. Expected 0 (ignore), 1 (print) or 2 (error)",
                other
            ),
        }
    }
}

/// Console output of NVGT itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    /// `-q`: only errors
    Quiet,
    /// `-Q`: nothing, not even errors
    SuperQuiet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    pub mode: Mode,
    pub platform: Option<TargetPlatform>,
    pub verbosity: Verbosity,
    pub warnings: WarningLevel,
    /// Files bundled with the compiled program (`-a`)
    pub assets: Vec<String>,
    /// Documents bundled with the compiled program (`-A`)
    pub document_assets: Vec<String>,
    /// Scripts included before the main script (`-i`)
    pub includes: Vec<String>,
    /// Extra include search directories (`-I`)
    pub include_dirs: Vec<String>,
    /// Configuration properties, in command line order (`-sname=value`)
    pub properties: Vec<(String, String)>,
    /// Settings file (`-S`)
    pub settings_file: Option<String>,
    /// Arguments handed to the script after `--`
    pub script_args: Vec<String>,
}

/// Parse a `name=value` configuration property.
pub fn parse_property(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => bail!("Invalid property '{}', expected name=value", s),
    }
}

/// The NVGT argument vector for `script`, without the executable itself.
pub fn build_args(script: &Path, options: &CompilerOptions) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(flag) = options.mode.flag() {
        args.push(flag.to_string());
    }
    if let Some(platform) = options.platform {
        args.push(format!("-p{}", platform));
    }
    match options.verbosity {
        Verbosity::Normal => {}
        Verbosity::Quiet => args.push("-q".to_string()),
        Verbosity::SuperQuiet => args.push("-Q".to_string()),
    }
    if options.warnings != WarningLevel::Ignore {
        args.push(format!("-w{}", options.warnings.level()));
    }

    args.extend(options.assets.iter().map(|a| format!("-a{}", a)));
    args.extend(options.document_assets.iter().map(|a| format!("-A{}", a)));
    args.extend(options.includes.iter().map(|i| format!("-i{}", i)));
    args.extend(options.include_dirs.iter().map(|d| format!("-I{}", d)));
    args.extend(
        options
            .properties
            .iter()
            .map(|(name, value)| format!("-s{}={}", name, value)),
    );
    if let Some(settings) = &options.settings_file {
        args.push(format!("-S{}", settings));
    }

    args.push(script.display().to_string());

    if !options.script_args.is_empty() {
        args.push("--".to_string());
        args.extend(options.script_args.iter().cloned());
    }

    args
}

/// An NVGT executable and the runtime used to start it
pub struct NvgtCompiler<'a, R: Runtime> {
    runtime: &'a R,
    binary: PathBuf,
}

impl<'a, R: Runtime> NvgtCompiler<'a, R> {
    pub fn new(runtime: &'a R, binary: PathBuf) -> Self {
        Self { runtime, binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run NVGT on `script` and return its exit code.
    #[tracing::instrument(skip(self, options))]
    pub fn execute(&self, script: &Path, options: &CompilerOptions) -> Result<i32> {
        if !self.runtime.exists(script) {
            return Err(NvgtError::filesystem(script, "script file not found").into());
        }

        let args = build_args(script, options);
        debug!("{} {}", self.binary.display(), args.join(" "));
        self.runtime.run_interactive(&self.binary, &args)
    }

    pub fn compile_release(&self, script: &Path, options: CompilerOptions) -> Result<i32> {
        self.execute(script, &with_mode(options, Mode::Release))
    }

    pub fn compile_debug(&self, script: &Path, options: CompilerOptions) -> Result<i32> {
        self.execute(script, &with_mode(options, Mode::Debug))
    }

    pub fn run_script(&self, script: &Path, options: CompilerOptions) -> Result<i32> {
        self.execute(script, &with_mode(options, Mode::Run))
    }

    pub fn debug_script(&self, script: &Path, options: CompilerOptions) -> Result<i32> {
        self.execute(script, &with_mode(options, Mode::Debugger))
    }

    /// `nvgt -V`
    pub fn version(&self) -> Result<i32> {
        self.runtime
            .run_interactive(&self.binary, &["-V".to_string()])
    }

    /// `nvgt -h`
    pub fn help(&self) -> Result<i32> {
        self.runtime
            .run_interactive(&self.binary, &["-h".to_string()])
    }
}

fn with_mode(options: CompilerOptions, mode: Mode) -> CompilerOptions {
    CompilerOptions { mode, ..options }
}
