//! In-memory model of the resource directory.
//!
//! A [`ResourceTree`] is loaded fresh from disk at the start of every run.
//! Blacklisted entries are pruned while loading (an excluded directory is
//! never descended into), and children come out already sorted, so
//! everything downstream can iterate a node's children as-is.
//!
//! File contents are not held in the tree. [`FileNode::read`] loads them
//! when the walker reaches the file, so peak memory stays at one file.

use crate::blacklist::Blacklist;
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Sibling ordering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// All subdirectories (by name), then all files (by name)
    #[default]
    DirectoriesFirst,
    /// Files and directories sorted together by name
    Interleaved,
}

impl SortOrder {
    fn compare(self, a: &DirEntry, b: &DirEntry) -> Ordering {
        let by_name = || a.file_name().cmp(b.file_name());
        match self {
            SortOrder::DirectoriesFirst => b
                .file_type()
                .is_dir()
                .cmp(&a.file_type().is_dir())
                .then_with(by_name),
            SortOrder::Interleaved => by_name(),
        }
    }
}

/// Options controlling how a tree is read from disk
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Entries to prune
    pub blacklist: Blacklist,
    /// Sibling ordering
    pub sort_order: SortOrder,
    /// Follow symbolic links instead of skipping them
    pub follow_links: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            blacklist: Blacklist::default(),
            sort_order: SortOrder::default(),
            follow_links: true,
        }
    }
}

impl LoadOptions {
    /// Creates load options with the built-in blacklist, following links
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the blacklist
    pub fn blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Sets the sibling ordering
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Sets whether symbolic links are followed
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// A regular file in the resource tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    name: String,
    path: PathBuf,
}

impl FileNode {
    /// Creates a file node
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// File name including extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full file content
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| Error::file_read(&self.path, e))
    }
}

/// A directory in the resource tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    name: String,
    path: PathBuf,
    children: Vec<Node>,
}

impl DirectoryNode {
    /// Creates an empty directory node
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Directory name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retained children in emission order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Appends a child, keeping the caller's order
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Retained subdirectories in emission order
    pub fn directories(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.children.iter().filter_map(|c| match c {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        })
    }

    /// Retained files in emission order
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.children.iter().filter_map(|c| match c {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        })
    }

    /// Number of files in this directory and below
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Node::File(_) => 1,
                Node::Directory(d) => d.file_count(),
            })
            .sum()
    }
}

/// A child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Subdirectory
    Directory(DirectoryNode),
    /// Regular file
    File(FileNode),
}

impl Node {
    /// Entry name
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(d) => d.name(),
            Node::File(f) => f.name(),
        }
    }
}

/// The filtered, sorted resource directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTree {
    root: DirectoryNode,
}

impl ResourceTree {
    /// Wraps an already built root node
    pub fn from_root(root: DirectoryNode) -> Self {
        Self { root }
    }

    /// Reads the directory at `root` from disk.
    ///
    /// Entries whose name matches the blacklist are pruned together with
    /// everything beneath them. Entries that are neither regular files nor
    /// directories (sockets, dangling links, unfollowed links) are skipped
    /// with a warning. A followed link that loops back to an ancestor fails
    /// the load with [`Error::DirectoryRead`].
    pub fn load(root: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let root_path = root.as_ref();
        let root_name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let order = options.sort_order;
        let blacklist = &options.blacklist;
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .follow_links(options.follow_links)
            .sort_by(move |a, b| order.compare(a, b))
            .into_iter()
            .filter_entry(|e| {
                // the root itself is never subject to the blacklist
                e.depth() == 0 || !blacklist.is_excluded(&e.file_name().to_string_lossy())
            });

        let mut top = DirectoryNode::new(root_name, root_path);
        // open[i] is the directory currently being filled at depth i + 1
        let mut open: Vec<DirectoryNode> = Vec::new();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root_path).to_path_buf();
                Error::directory_read(path, e)
            })?;

            while open.len() >= entry.depth() {
                close_last(&mut top, &mut open);
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                trace!("Entering {}", entry.path().display());
                open.push(DirectoryNode::new(name, entry.path()));
            } else if file_type.is_file() {
                let parent = open.last_mut().unwrap_or(&mut top);
                parent.push(Node::File(FileNode::new(name, entry.path())));
            } else {
                warn!("Skipping non-regular entry: {}", entry.path().display());
            }
        }

        while !open.is_empty() {
            close_last(&mut top, &mut open);
        }

        Ok(Self { root: top })
    }

    /// The root directory node; its own name is never emitted
    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    /// Total number of retained files
    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }
}

fn close_last(top: &mut DirectoryNode, open: &mut Vec<DirectoryNode>) {
    if let Some(done) = open.pop() {
        let parent = open.last_mut().unwrap_or(top);
        parent.push(Node::Directory(done));
    }
}
