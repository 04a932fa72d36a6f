//! Run coordination.
//!
//! A [`Generator`] performs one complete, from-scratch run:
//!
//! 1. Check preconditions: the resource root exists and is a directory,
//!    the chunk size is non-zero. Nothing is written if this fails.
//! 2. Run the [`PreProcess`] hook, which may add files to the tree.
//! 3. Load the [`ResourceTree`] and check it for identifier collisions.
//! 4. Create (truncate) both output files and emit them in one walk.
//!
//! A failure in step 4 leaves partially written output behind; such output
//! must not be used.

use crate::blacklist::Blacklist;
use crate::chunk::CHUNK_SIZE;
use crate::emit::{CodeEmitter, EmitterConfig, Stream};
use crate::error::{Error, Result};
use crate::tree::{LoadOptions, ResourceTree, SortOrder};
use crate::walker::{self, StatsVisitor, Tee};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Step run after the precondition check and before the tree is loaded.
///
/// Used for work that produces files the walk must pick up, such as
/// rasterizing vector icons into fixed-size bitmaps.
pub trait PreProcess {
    /// Runs to completion before the walk begins
    fn run(&mut self, resource_root: &Path) -> Result<()>;
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreProcess;

impl PreProcess for NoPreProcess {
    fn run(&mut self, _resource_root: &Path) -> Result<()> {
        Ok(())
    }
}

impl<F> PreProcess for F
where
    F: FnMut(&Path) -> Result<()>,
{
    fn run(&mut self, resource_root: &Path) -> Result<()> {
        self(resource_root)
    }
}

/// Configuration for a generator run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory whose contents get embedded
    pub resource_root: PathBuf,
    /// Generated header path
    pub interface_path: PathBuf,
    /// Generated implementation path
    pub implementation_path: PathBuf,
    /// Top-level namespace
    pub namespace: String,
    /// Indentation per nesting level
    pub indent_str: String,
    /// Maximum bytes per initializer line
    pub chunk_size: usize,
    /// Sibling ordering
    pub sort_order: SortOrder,
    /// Entries to leave out
    pub blacklist: Blacklist,
    /// Tool name shown in the warning comment
    pub generator_name: String,
    /// Follow symbolic links inside the resource root
    pub follow_links: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("./resources"),
            interface_path: PathBuf::from("./src/constant_data/resources.h"),
            implementation_path: PathBuf::from("./src/constant_data/resources.cpp"),
            namespace: "bricksim::resources".to_string(),
            indent_str: "    ".to_string(),
            chunk_size: CHUNK_SIZE,
            sort_order: SortOrder::default(),
            blacklist: Blacklist::default(),
            generator_name: "resbake".to_string(),
            follow_links: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource root
    pub fn resource_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_root = path.into();
        self
    }

    /// Sets the generated header path
    pub fn interface_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.interface_path = path.into();
        self
    }

    /// Sets the generated implementation path
    pub fn implementation_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.implementation_path = path.into();
        self
    }

    /// Sets the top-level namespace
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the maximum bytes per initializer line
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the sibling ordering
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Sets the blacklist
    pub fn blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Sets the tool name shown in the warning comment
    pub fn generator_name(mut self, name: impl Into<String>) -> Self {
        self.generator_name = name.into();
        self
    }

    /// Sets whether symbolic links are followed
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .blacklist(self.blacklist.clone())
            .sort_order(self.sort_order)
            .follow_links(self.follow_links)
    }

    fn emitter_config(&self) -> EmitterConfig {
        let include_name = include_path(&self.interface_path, &self.implementation_path);

        EmitterConfig::new()
            .namespace(self.namespace.clone())
            .indent_str(self.indent_str.clone())
            .chunk_size(self.chunk_size)
            .generator_name(self.generator_name.clone())
            .include_name(include_name)
    }
}

/// Path of `header` as the `#include` line of `source` must spell it.
///
/// Relative to the directory holding `source`, with `/` separators. Falls
/// back to the bare file name when no relative path can be computed.
fn include_path(header: &Path, source: &Path) -> String {
    let header = without_cur_dir(header);
    let base = without_cur_dir(source.parent().unwrap_or_else(|| Path::new("")));
    let relative = pathdiff::diff_paths(&header, &base)
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| header.file_name().map(PathBuf::from));

    match relative {
        Some(path) if path.is_absolute() => path.to_string_lossy().into_owned(),
        Some(path) => path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => "resources.h".to_string(),
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// What a run embedded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Namespaces emitted below the top-level one
    pub scopes: usize,
    /// Constants emitted
    pub files: usize,
    /// Bytes embedded
    pub bytes: u64,
}

impl From<StatsVisitor> for RunSummary {
    fn from(stats: StatsVisitor) -> Self {
        Self {
            scopes: stats.scope_count,
            files: stats.file_count,
            bytes: stats.byte_count,
        }
    }
}

/// Drives one resource compilation run
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fails if the run cannot start; touches nothing on disk
    pub fn check_preconditions(&self) -> Result<()> {
        let root = &self.config.resource_root;
        if !root.exists() {
            return Err(Error::ResourceRootMissing { path: root.clone() });
        }
        if !root.is_dir() {
            return Err(Error::NotADirectory { path: root.clone() });
        }
        if self.config.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(0));
        }
        Ok(())
    }

    /// Loads and validates the resource tree
    pub fn load_tree(&self) -> Result<ResourceTree> {
        debug!(
            "Blacklist: {}",
            self.config.blacklist.patterns().collect::<Vec<_>>().join(", ")
        );
        let tree = ResourceTree::load(&self.config.resource_root, &self.config.load_options())?;
        walker::validate(&tree)?;
        debug!(
            "Loaded {} files from {}",
            tree.file_count(),
            self.config.resource_root.display()
        );
        Ok(tree)
    }

    /// Performs a full run, writing both output files
    pub fn run(&self, hook: &mut dyn PreProcess) -> Result<RunSummary> {
        self.check_preconditions()?;

        info!("Pre-processing {}", self.config.resource_root.display());
        hook.run(&self.config.resource_root)?;

        let tree = self.load_tree()?;

        let header = create_output(&self.config.interface_path)?;
        let source = create_output(&self.config.implementation_path)?;
        let (summary, _, _) = self.emit(&tree, header, source)?;

        info!(
            "Wrote {} and {}: {} files, {} bytes in {} scopes",
            self.config.interface_path.display(),
            self.config.implementation_path.display(),
            summary.files,
            summary.bytes,
            summary.scopes
        );

        Ok(summary)
    }

    /// Walks the tree and reports what a run would embed, writing nothing.
    ///
    /// The pre-processing hook is not run, so files it would create are
    /// not counted.
    pub fn dry_run(&self) -> Result<RunSummary> {
        self.check_preconditions()?;
        let tree = self.load_tree()?;

        let mut stats = StatsVisitor::default();
        walker::walk(&tree, &mut stats)?;
        Ok(stats.into())
    }

    /// Emits `tree` into the given writers and hands them back, flushed
    pub fn emit<H: Write, S: Write>(
        &self,
        tree: &ResourceTree,
        header: H,
        source: S,
    ) -> Result<(RunSummary, H, S)> {
        let mut emitter = CodeEmitter::begin(
            Stream::new(&self.config.interface_path, header),
            Stream::new(&self.config.implementation_path, source),
            self.config.emitter_config(),
        )?;

        let mut stats = StatsVisitor::default();
        walker::walk(tree, &mut Tee(&mut emitter, &mut stats))?;

        let (header, source) = emitter.finish()?;
        Ok((stats.into(), header, source))
    }
}

/// Create (or truncate) an output file, creating missing parent directories
fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::file_write(path, e))?;
    Ok(BufWriter::new(file))
}
