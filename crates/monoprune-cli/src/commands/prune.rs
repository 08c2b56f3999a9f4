use monoprune_build::{AssembleOptions, ContextAssembler};
use monoprune_core::{MonopruneConfig, OutputLayout, OutputPolicy};
use std::path::PathBuf;

/// Command-line overrides on top of `monoprune.toml`.
#[derive(Debug, Clone, Default)]
pub struct PruneArgs {
    pub scope: Option<String>,
    pub workspace: PathBuf,
    pub out: Option<PathBuf>,
    pub layout: Option<OutputLayout>,
    pub reuse_output: bool,
    pub sentinel: Option<String>,
}

/// Prune the workspace into a build context for `args.scope`.
pub fn prune(args: PruneArgs) -> anyhow::Result<()> {
    tracing::info!("checking for `--scope` argument");
    let scope = match args.scope.as_deref() {
        Some(scope) if !scope.is_empty() => scope,
        _ => return Err(monoprune_core::Error::MissingArgument.into()),
    };

    let config = MonopruneConfig::load(&args.workspace)?;
    let options = apply_overrides(AssembleOptions::from(&config), &args);

    let assembler = ContextAssembler::new(&args.workspace, options);
    let report = assembler.assemble(scope)?;

    println!(
        "Pruned build context for {scope} into {}",
        report.output_root.display()
    );
    println!("  dependencies: {}", report.dependencies.join(", "));
    println!("  files copied: {}", report.stats.files);
    Ok(())
}

fn apply_overrides(mut options: AssembleOptions, args: &PruneArgs) -> AssembleOptions {
    if let Some(out) = &args.out {
        options.output_dir = out.clone();
    }
    if let Some(layout) = args.layout {
        options.layout = layout;
    }
    if args.reuse_output {
        options.policy = OutputPolicy::Reuse;
    }
    if let Some(sentinel) = &args.sentinel {
        options.sentinel = sentinel.clone();
    }
    options
}
