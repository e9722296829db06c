use anyhow::Result;
use clap::Parser;
use nvgti::commands::{self, InstallOptions};
use nvgti::compiler::{
    CompilerOptions, Mode, TargetPlatform, Verbosity, WarningLevel, parse_property,
};
use nvgti::resolver::Endpoints;
use std::path::PathBuf;

/// nvgti - NVGT Installer
///
/// Download and install the Non-Visual Gaming Toolkit for Windows, Linux or
/// macOS, from the stable or the development release channel.
///
/// Examples:
///   nvgti install                       # Latest stable build for this machine
///   nvgti install --dev -p ~/nvgt       # Latest development build into ~/nvgt
///   nvgti uninstall --platform linux    # Remove /opt/nvgt
///   nvgti compile game.nvgt -a sounds   # Build game.nvgt with the installed NVGT
#[derive(Parser, Debug)]
#[command(author, version = env!("NVGTI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site publishing the latest stable version (defaults to https://nvgt.gg)
    #[arg(long = "site-url", value_name = "URL", global = true, hide = true)]
    pub site_url: Option<String>,

    /// Base URL of stable release downloads
    #[arg(long = "download-url", value_name = "URL", global = true, hide = true)]
    pub download_url: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true, hide = true)]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install NVGT, replacing any existing installation at the path
    Install(InstallArgs),

    /// Remove an NVGT installation
    Uninstall(UninstallArgs),

    /// Print the path of the installed NVGT executable
    Which(WhichArgs),

    /// Compile a script into an executable with the installed NVGT
    Compile(CompileArgs),

    /// Run a script with the installed NVGT
    Run(RunArgs),

    /// Print the version of the installed NVGT
    Info(InfoArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Installation path (defaults to C:\nvgt, /opt/nvgt or /Applications/NVGT.app)
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Target platform: windows, linux or darwin (defaults to this machine)
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Install the latest development build instead of the stable release
    #[arg(long, short = 'd')]
    pub dev: bool,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Installation path (defaults to the platform's install location)
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Platform whose default location to use: windows, linux or darwin
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct WhichArgs {
    /// Installation path (defaults to the platform's install location)
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Platform layout to look for: windows, linux or darwin
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ScriptArgs {
    /// Script to run or compile
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// NVGT executable or installation (defaults to this machine's install location)
    #[arg(long, value_name = "PATH")]
    pub nvgt: Option<PathBuf>,

    /// Platform to compile for: auto, windows, linux, mac or android
    #[arg(long, value_name = "PLATFORM")]
    pub target: Option<TargetPlatform>,

    /// Only print errors
    #[arg(short = 'q', long, conflicts_with = "super_quiet")]
    pub quiet: bool,

    /// Print nothing, not even errors
    #[arg(short = 'Q', long)]
    pub super_quiet: bool,

    /// Warning level: 0 (ignore), 1 (print) or 2 (treat as errors)
    #[arg(short = 'w', long, value_name = "LEVEL", default_value = "0")]
    pub warnings: WarningLevel,

    /// Bundle an asset with the compiled program
    #[arg(short = 'a', long = "asset", value_name = "PATH")]
    pub assets: Vec<String>,

    /// Bundle a document asset with the compiled program
    #[arg(short = 'A', long = "document", value_name = "PATH")]
    pub documents: Vec<String>,

    /// Include a script before the main one
    #[arg(short = 'i', long = "include", value_name = "SCRIPT")]
    pub includes: Vec<String>,

    /// Add an include search directory
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<String>,

    /// Set a configuration property
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Load settings from a file
    #[arg(short = 'S', long = "settings", value_name = "FILE")]
    pub settings: Option<String>,

    /// Arguments passed to the script
    #[arg(last = true, value_name = "ARGS")]
    pub script_args: Vec<String>,
}

impl ScriptArgs {
    fn into_options(self, mode: Mode) -> (Option<PathBuf>, PathBuf, CompilerOptions) {
        let verbosity = if self.super_quiet {
            Verbosity::SuperQuiet
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };
        let options = CompilerOptions {
            mode,
            platform: self.target,
            verbosity,
            warnings: self.warnings,
            assets: self.assets,
            document_assets: self.documents,
            includes: self.includes,
            include_dirs: self.include_dirs,
            properties: self.properties,
            settings_file: self.settings,
            script_args: self.script_args,
        };
        (self.nvgt, self.script, options)
    }
}

#[derive(clap::Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Compile with debug information
    #[arg(long, short = 'd')]
    pub debug: bool,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Run under the debugger
    #[arg(long)]
    pub debugger: bool,
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// NVGT executable or installation (defaults to this machine's install location)
    #[arg(long, value_name = "PATH")]
    pub nvgt: Option<PathBuf>,

    /// Print NVGT's usage text instead of its version
    #[arg(long)]
    pub usage: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = nvgti::runtime::RealRuntime;

    match cli.command {
        Commands::Install(args) => {
            let endpoints = Endpoints::with_overrides(cli.site_url, cli.download_url, cli.api_url);
            let options = InstallOptions {
                path: args.path,
                platform: args.platform,
                dev: args.dev,
            };
            commands::install(runtime, options, endpoints).await?
        }
        Commands::Uninstall(args) => {
            commands::uninstall(runtime, args.path, args.platform.as_deref())?
        }
        Commands::Which(args) => commands::which(runtime, args.path, args.platform.as_deref())?,
        Commands::Compile(args) => {
            let mode = if args.debug { Mode::Debug } else { Mode::Release };
            let (nvgt, script, options) = args.script.into_options(mode);
            commands::compile(runtime, nvgt, &script, options)?
        }
        Commands::Run(args) => {
            let mode = if args.debugger { Mode::Debugger } else { Mode::Run };
            let (nvgt, script, options) = args.script.into_options(mode);
            commands::compile(runtime, nvgt, &script, options)?
        }
        Commands::Info(args) => commands::info(runtime, args.nvgt, args.usage)?,
    }
    Ok(())
}
