//! resbake - Embed a resource directory into generated C++ sources
//!
//! Run from the project root. Every file under `./resources` becomes a
//! `std::array<uint8_t, N>` constant in `src/constant_data/resources.{h,cpp}`,
//! nested in namespaces that mirror the directory structure.

use anyhow::{Context, Result};
use clap::Parser;
use resbake_core::{Generator, GeneratorConfig, NoPreProcess, PreProcess, RunSummary, SortOrder};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Embed a resource directory into generated C++ sources
#[derive(Parser, Debug)]
#[command(name = "resbake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory whose files get embedded
    #[arg(long, default_value = "./resources")]
    root: PathBuf,

    /// Generated header file
    #[arg(long, default_value = "./src/constant_data/resources.h")]
    header: PathBuf,

    /// Generated implementation file
    #[arg(long, default_value = "./src/constant_data/resources.cpp")]
    source: PathBuf,

    /// Top-level namespace wrapping all resources
    #[arg(long, default_value = "bricksim::resources")]
    namespace: String,

    /// Sort files and directories together instead of directories first
    #[arg(long)]
    interleave: bool,

    /// Command run before the walk, e.g. an icon rasterizer (consumes the
    /// remaining arguments, so give it last)
    #[arg(long, num_args = 1.., value_name = "CMD", allow_hyphen_values = true)]
    pre_process: Option<Vec<String>>,

    /// Dry run - walk the tree and report, don't write files
    #[arg(long)]
    dry_run: bool,

    /// Print a summary with content hashes of the generated files
    #[arg(long)]
    stats: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn generator_config(&self) -> GeneratorConfig {
        let order = if self.interleave {
            SortOrder::Interleaved
        } else {
            SortOrder::DirectoriesFirst
        };

        GeneratorConfig::new()
            .resource_root(&self.root)
            .interface_path(&self.header)
            .implementation_path(&self.source)
            .namespace(self.namespace.clone())
            .sort_order(order)
    }
}

/// Runs an external program before the walk
#[derive(Debug)]
struct CommandHook {
    program: String,
    args: Vec<String>,
}

impl CommandHook {
    fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl PreProcess for CommandHook {
    fn run(&mut self, resource_root: &Path) -> resbake_core::Result<()> {
        info!("Running {} {}", self.program, self.args.join(" "));
        let status = Command::new(&self.program)
            .args(&self.args)
            .env("RESBAKE_RESOURCE_ROOT", resource_root)
            .status()
            .map_err(|e| {
                resbake_core::Error::pre_process_io(format!("failed to start '{}'", self.program), e)
            })?;

        if !status.success() {
            return Err(resbake_core::Error::pre_process(format!(
                "'{}' exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let generator = Generator::with_config(cli.generator_config());

    if cli.dry_run {
        let summary = generator
            .dry_run()
            .with_context(|| format!("Failed to scan {}", cli.root.display()))?;
        println!("Would embed {}", describe(&summary));
        return Ok(());
    }

    let command = cli.pre_process.as_deref().and_then(CommandHook::from_argv);
    let mut hook: Box<dyn PreProcess> = match command {
        Some(hook) => Box::new(hook),
        None => Box::new(NoPreProcess),
    };

    let summary = generator
        .run(&mut *hook)
        .with_context(|| format!("Failed to compile resources from {}", cli.root.display()))?;

    if cli.stats {
        println!("Embedded {}", describe(&summary));
        for path in [&cli.header, &cli.source] {
            println!("{}  {}", content_hash(path)?, path.display());
        }
    }

    debug!("Done");
    Ok(())
}

fn describe(summary: &RunSummary) -> String {
    format!(
        "{} files ({} bytes) in {} scopes",
        summary.files, summary.bytes, summary.scopes
    )
}

/// Compute a short hash of a generated file (first 16 chars of blake3)
fn content_hash(path: &Path) -> Result<String> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(blake3::hash(&data).to_hex()[..16].to_string())
}
