//! # resbake-core
//!
//! A library for compiling a directory of binary resources into generated
//! C++ source code, one constant per file.
//!
//! Each run reads the resource tree from disk, leaves out blacklisted
//! entries, and writes a header with `extern` declarations plus an
//! implementation file with the byte contents, both nested in namespaces
//! that mirror the directory structure.
//!
//! ## Architecture
//!
//! - [`ident`]: file names to identifiers
//! - [`blacklist`]: entry exclusion rules
//! - [`chunk`]: splitting byte initializers into bounded lines
//! - [`tree`]: the filtered, sorted resource tree
//! - [`walker`]: depth-first traversal driving a [`ResourceVisitor`]
//! - [`emit`]: the C++ header/implementation emitter
//! - [`generate`]: end-to-end run coordination
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```no_run
//! use resbake_core::{Generator, GeneratorConfig, NoPreProcess};
//!
//! let config = GeneratorConfig::new()
//!     .resource_root("./resources")
//!     .namespace("app::resources");
//!
//! let summary = Generator::with_config(config).run(&mut NoPreProcess)?;
//! println!("embedded {} files", summary.files);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`ResourceVisitor`]: consume a traversal in a custom way
//! - [`PreProcess`]: produce resource files right before the walk

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod blacklist;
pub mod chunk;
pub mod emit;
pub mod error;
pub mod generate;
pub mod ident;
pub mod tree;
pub mod walker;

// Re-export primary types for convenience
pub use blacklist::{Blacklist, DEFAULT_BLACKLIST};
pub use chunk::{ByteChunks, CHUNK_SIZE};
pub use emit::{CodeEmitter, EmitterConfig, Stream};
pub use error::{Error, Result};
pub use generate::{Generator, GeneratorConfig, NoPreProcess, PreProcess, RunSummary};
pub use ident::to_identifier;
pub use tree::{DirectoryNode, FileNode, LoadOptions, Node, ResourceTree, SortOrder};
pub use walker::{walk, NullVisitor, ResourceVisitor, StatsVisitor, Tee};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
