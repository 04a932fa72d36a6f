//! Depth-first traversal of a [`ResourceTree`].
//!
//! The walker visits the children of each directory in the order the tree
//! holds them, which is the sorted, blacklist-filtered order produced by
//! [`ResourceTree::load`]. Subdirectories are bracketed by
//! [`enter_scope`](ResourceVisitor::enter_scope) and
//! [`leave_scope`](ResourceVisitor::leave_scope); each file is read once and
//! handed to [`visit_file`](ResourceVisitor::visit_file).
//!
//! Nesting depth is passed down the recursion explicitly, so the walker
//! keeps no state of its own between calls.
//!
//! Before any child of a directory is visited, the identifiers of all its
//! children are computed and checked for collisions. Two names that
//! sanitize to the same identifier in one scope would shadow each other in
//! the generated code, so that fails the run with
//! [`Error::IdentifierCollision`]. [`validate`] runs the same check over the
//! whole tree up front without reading any file.

mod visitor;

use crate::error::{Error, Result};
use crate::ident::to_identifier;
use crate::tree::{DirectoryNode, Node, ResourceTree};
use std::collections::HashMap;
use tracing::{debug, trace};

pub use visitor::{NullVisitor, ResourceVisitor, StatsVisitor, Tee};

/// Walk the whole tree, driving `visitor`
pub fn walk<V: ResourceVisitor + ?Sized>(tree: &ResourceTree, visitor: &mut V) -> Result<()> {
    let mut scope = Vec::new();
    walk_directory(tree.root(), visitor, 0, &mut scope)
}

fn walk_directory<'t, V: ResourceVisitor + ?Sized>(
    dir: &'t DirectoryNode,
    visitor: &mut V,
    depth: usize,
    scope: &mut Vec<&'t str>,
) -> Result<()> {
    let idents = scope_identifiers(dir, scope.as_slice())?;

    for (child, ident) in dir.children().iter().zip(&idents) {
        match child {
            Node::Directory(sub) => {
                debug!("Scope {} ({} entries)", ident, sub.children().len());
                visitor.enter_scope(ident, depth)?;
                scope.push(sub.name());
                walk_directory(sub, visitor, depth + 1, scope)?;
                scope.pop();
                visitor.leave_scope(ident, depth)?;
            }
            Node::File(file) => {
                let data = file.read()?;
                trace!("Embedding {} as {} ({} bytes)", file.path().display(), ident, data.len());
                visitor.visit_file(ident, &data, depth)?;
            }
        }
    }

    Ok(())
}

/// Check the whole tree for identifier collisions without reading any file
pub fn validate(tree: &ResourceTree) -> Result<()> {
    let mut scope = Vec::new();
    validate_directory(tree.root(), &mut scope)
}

fn validate_directory<'t>(dir: &'t DirectoryNode, scope: &mut Vec<&'t str>) -> Result<()> {
    scope_identifiers(dir, scope.as_slice())?;
    for sub in dir.directories() {
        scope.push(sub.name());
        validate_directory(sub, scope)?;
        scope.pop();
    }
    Ok(())
}

/// Identifiers for every child of `dir`, in child order
fn scope_identifiers(dir: &DirectoryNode, scope: &[&str]) -> Result<Vec<String>> {
    let mut claimed: HashMap<String, &str> = HashMap::with_capacity(dir.children().len());
    let mut idents = Vec::with_capacity(dir.children().len());

    for child in dir.children() {
        let ident = to_identifier(child.name());
        if let Some(first) = claimed.insert(ident.clone(), child.name()) {
            return Err(Error::IdentifierCollision {
                scope: scope.join("/"),
                identifier: ident,
                first: first.to_string(),
                second: child.name().to_string(),
            });
        }
        idents.push(ident);
    }

    Ok(idents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileNode;
    use std::fs;
    use tempfile::TempDir;

    /// Records callbacks as strings
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl ResourceVisitor for Recorder {
        fn enter_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
            self.0.push(format!("{depth} {{ {ident}"));
            Ok(())
        }

        fn leave_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
            self.0.push(format!("{depth} }} {ident}"));
            Ok(())
        }

        fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
            self.0.push(format!("{depth} {ident}={data:?}"));
            Ok(())
        }
    }

    #[test]
    fn test_nested_scopes_are_balanced() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
        fs::write(temp.path().join("a/b/c/icon.png"), [1u8, 2]).unwrap();
        fs::write(temp.path().join("top.txt"), [9u8]).unwrap();

        let tree = ResourceTree::load(temp.path(), &Default::default()).unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, &mut recorder).unwrap();

        assert_eq!(
            recorder.0,
            vec![
                "0 { a",
                "1 { b",
                "2 { c",
                "3 icon_png=[1, 2]",
                "2 } c",
                "1 } b",
                "0 } a",
                "0 top_txt=[9]",
            ]
        );
    }

    #[test]
    fn test_collision_is_detected() {
        let mut root = DirectoryNode::new("resources", "/unused");
        root.push(Node::File(FileNode::new("a b.dat", "/unused/a b.dat")));
        root.push(Node::File(FileNode::new("a-b.dat", "/unused/a-b.dat")));
        let mut icons = DirectoryNode::new("icons", "/unused/icons");
        icons.push(Node::Directory(root.clone()));

        let err = walk(&ResourceTree::from_root(root), &mut NullVisitor).unwrap_err();
        match err {
            Error::IdentifierCollision {
                scope,
                identifier,
                first,
                second,
            } => {
                assert_eq!(scope, "");
                assert_eq!(identifier, "a_b_dat");
                assert_eq!(first, "a b.dat");
                assert_eq!(second, "a-b.dat");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut top = DirectoryNode::new("resources", "/unused");
        top.push(Node::Directory(icons));
        let tree = ResourceTree::from_root(top);
        let err = walk(&tree, &mut NullVisitor).unwrap_err();
        assert!(matches!(err, Error::IdentifierCollision { ref scope, .. } if scope == "icons/resources"));
        let err = validate(&tree).unwrap_err();
        assert!(matches!(err, Error::IdentifierCollision { ref scope, .. } if scope == "icons/resources"));
    }

    #[test]
    fn test_same_identifier_in_different_scopes_is_fine() {
        let temp = TempDir::new().unwrap();
        for dir in ["16x16", "36x36"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
            fs::write(temp.path().join(dir).join("open.png"), b"png").unwrap();
        }

        let tree = ResourceTree::load(temp.path(), &Default::default()).unwrap();
        let mut stats = StatsVisitor::default();
        walk(&tree, &mut stats).unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.scope_count, 2);
    }

    #[test]
    fn test_directory_file_collision() {
        let mut root = DirectoryNode::new("resources", "/unused");
        root.push(Node::Directory(DirectoryNode::new("icons", "/unused/icons")));
        root.push(Node::File(FileNode::new("icons", "/unused/icons")));

        let err = walk(&ResourceTree::from_root(root), &mut NullVisitor).unwrap_err();
        assert!(matches!(err, Error::IdentifierCollision { .. }));
    }

    #[test]
    fn test_vanished_file_aborts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("gone.bin"), b"x").unwrap();
        let tree = ResourceTree::load(temp.path(), &Default::default()).unwrap();
        fs::remove_file(temp.path().join("gone.bin")).unwrap();

        // validation never touches file contents
        assert!(validate(&tree).is_ok());
        let err = walk(&tree, &mut NullVisitor).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
