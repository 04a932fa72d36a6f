//! Extensible traversal callbacks.
//!
//! This module provides the [`ResourceVisitor`] trait that the walker drives.
//! The code emitter is one implementation; [`StatsVisitor`] and
//! [`NullVisitor`] are others.

use crate::error::Result;

/// Callbacks invoked by [`walk`](super::walk) in traversal order.
///
/// `depth` is the nesting depth of the scope or file being visited, where
/// the children of the resource root sit at depth 0. Every `enter_scope` is
/// matched by exactly one `leave_scope` with the same identifier and depth.
///
/// # Example
///
/// ```
/// use resbake_core::{ResourceVisitor, Result};
///
/// struct Listing(Vec<String>);
///
/// impl ResourceVisitor for Listing {
///     fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
///         self.0.push(format!("{}{} ({} bytes)", "  ".repeat(depth), ident, data.len()));
///         Ok(())
///     }
/// }
/// ```
pub trait ResourceVisitor {
    /// A directory scope opens
    fn enter_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        let _ = (ident, depth);
        Ok(())
    }

    /// The most recently opened scope closes
    fn leave_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        let _ = (ident, depth);
        Ok(())
    }

    /// A retained file, with its full content
    fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
        let _ = (ident, data, depth);
        Ok(())
    }
}

impl<V: ResourceVisitor + ?Sized> ResourceVisitor for &mut V {
    fn enter_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        (**self).enter_scope(ident, depth)
    }

    fn leave_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        (**self).leave_scope(ident, depth)
    }

    fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
        (**self).visit_file(ident, data, depth)
    }
}

/// A no-op visitor that discards everything
pub struct NullVisitor;

impl ResourceVisitor for NullVisitor {}

/// A visitor that collects statistics about the tree
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsVisitor {
    /// Number of scopes opened
    pub scope_count: usize,
    /// Number of files embedded
    pub file_count: usize,
    /// Total embedded bytes
    pub byte_count: u64,
    /// Deepest scope nesting seen (1 for a single level of directories)
    pub max_depth: usize,
}

impl ResourceVisitor for StatsVisitor {
    fn enter_scope(&mut self, _ident: &str, depth: usize) -> Result<()> {
        self.scope_count += 1;
        self.max_depth = self.max_depth.max(depth + 1);
        Ok(())
    }

    fn visit_file(&mut self, _ident: &str, data: &[u8], _depth: usize) -> Result<()> {
        self.file_count += 1;
        self.byte_count += data.len() as u64;
        Ok(())
    }
}

/// Forwards every callback to two visitors in turn
pub struct Tee<A, B>(pub A, pub B);

impl<A: ResourceVisitor, B: ResourceVisitor> ResourceVisitor for Tee<A, B> {
    fn enter_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        self.0.enter_scope(ident, depth)?;
        self.1.enter_scope(ident, depth)
    }

    fn leave_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        self.0.leave_scope(ident, depth)?;
        self.1.leave_scope(ident, depth)
    }

    fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
        self.0.visit_file(ident, data, depth)?;
        self.1.visit_file(ident, data, depth)
    }
}
