mod commands;
mod logging;

use clap::{Parser, ValueEnum};
use monoprune_core::OutputLayout;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "monoprune",
    about = "Prune an Nx workspace into a minimal Docker build context"
)]
#[command(version)]
struct Cli {
    /// Name of the service the Dockerfile belongs to
    #[arg(long, visible_alias = "name")]
    scope: Option<String>,
    /// Workspace root
    #[arg(long, default_value = ".")]
    workspace: PathBuf,
    /// Output directory, relative to the workspace root (default: out)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output layout (default: flat)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Keep an existing output directory instead of clearing it
    #[arg(long)]
    reuse_output: bool,
    /// Library always copied with the declared dependencies (default: nx-python)
    #[arg(long)]
    sentinel: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Code and workspace manifests side by side in the output directory
    Flat,
    /// Code under full/, workspace manifests under nx/
    Split,
}

impl From<LayoutArg> for OutputLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => OutputLayout::Flat,
            LayoutArg::Split => OutputLayout::Split,
        }
    }
}

fn main() -> ExitCode {
    logging::LogSettings::from_env().init();

    let cli = Cli::parse();
    let args = commands::PruneArgs {
        scope: cli.scope,
        workspace: cli.workspace,
        out: cli.out,
        layout: cli.layout.map(OutputLayout::from),
        reuse_output: cli.reuse_output,
        sentinel: cli.sentinel,
    };

    match commands::prune(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
