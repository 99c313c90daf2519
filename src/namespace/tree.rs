use hashlink::LinkedHashMap;
use snafu::{Snafu, ensure};

use super::{Node, NodeId, NodeKind};

/// Arena owning every node of one namespace tree.
///
/// Parent links are non-owning ids used only for upward traversal; dropping
/// the arena drops the whole tree at once. The tree is wired once at startup
/// and is read-only afterwards, so every query is a pure function of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    nodes: Vec<Node>,
}

impl Namespace {
    /// Creates a tree holding only the root directory. The root has an empty
    /// name and no parent.
    pub fn new() -> Self {
        Namespace {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Directory {
                    children: LinkedHashMap::new(),
                },
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Appends an empty directory under `parent`.
    pub fn add_directory(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, AttachError> {
        self.attach(
            parent,
            name.into(),
            NodeKind::Directory {
                children: LinkedHashMap::new(),
            },
        )
    }

    /// Appends a file with the given content under `parent`.
    pub fn add_file(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<NodeId, AttachError> {
        self.attach(
            parent,
            name.into(),
            NodeKind::File {
                content: content.into(),
            },
        )
    }

    /// Sibling names must be unique; a duplicate is rejected here rather than
    /// silently shadowed during lookup.
    fn attach(
        &mut self,
        parent: NodeId,
        name: String,
        kind: NodeKind,
    ) -> Result<NodeId, AttachError> {
        ensure!(
            !name.is_empty() && !name.contains('/'),
            InvalidNameSnafu { name: name.as_str() }
        );

        let id = NodeId(self.nodes.len());
        let target = &mut self.nodes[parent.0];
        let children = match &mut target.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => {
                return ParentNotADirectorySnafu {
                    name: target.name.as_str(),
                }
                .fail();
            }
        };
        ensure!(
            !children.contains_key(&name),
            DuplicateEntrySnafu { name: name.as_str() }
        );
        children.insert(name.clone(), id);

        self.nodes.push(Node {
            name,
            parent: Some(parent),
            kind,
        });
        Ok(id)
    }

    /// The `/`-separated absolute path from the root to `id`, inclusive.
    ///
    /// Walks the parent chain collecting segments. The root's empty name
    /// contributes no segment, so the root maps to `/` and a direct child of
    /// the root to `/name`, never `//name`.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if !node.name.is_empty() {
                segments.push(node.name.as_str());
            }
            cursor = node.parent;
        }

        if segments.is_empty() {
            return String::from("/");
        }
        segments.iter().rev().fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
    }

    /// Maps a path expression to a node, starting from `base`.
    ///
    /// A leading `/` restarts resolution from the root. That rule applies at
    /// every level, so an embedded `//` also restarts from the root, and `/`
    /// alone fails with an empty remainder. `.` and `..` are not
    /// special-cased; they are looked up like any other name.
    pub fn resolve(&self, base: NodeId, path_expr: &str) -> Result<NodeId, ResolveError> {
        let mut current = base;
        let mut rest = path_expr;
        loop {
            if let Some(stripped) = rest.strip_prefix('/') {
                current = self.root();
                rest = stripped;
                continue;
            }
            ensure!(!rest.is_empty(), EmptyPathSnafu);

            let (head, tail) = rest.split_once('/').unwrap_or((rest, ""));
            let children = match &self.node(current).kind {
                NodeKind::Directory { children } => children,
                NodeKind::File { .. } => {
                    return NotADirectorySnafu {
                        segment: self.node(current).name.as_str(),
                    }
                    .fail();
                }
            };
            let child = match children.get(head) {
                Some(&child) => child,
                None => return NotFoundSnafu { segment: head }.fail(),
            };

            if tail.is_empty() {
                return Ok(child);
            }
            match &self.node(child).kind {
                NodeKind::Directory { .. } => {
                    current = child;
                    rest = tail;
                }
                NodeKind::File { .. } => {
                    return NotADirectorySnafu { segment: head }.fail();
                }
            }
        }
    }

    /// Child names of `id` in insertion order. Yields nothing for a file.
    pub fn child_names(&self, id: NodeId) -> impl Iterator<Item = &str> {
        let children = match &self.node(id).kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        };
        children
            .into_iter()
            .flat_map(|children| children.keys().map(String::as_str))
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Snafu)]
pub enum AttachError {
    #[snafu(display("Node name '{}' must be non-empty and free of '/'", name))]
    InvalidName { name: String },
    #[snafu(display("'{}' is not a directory", name))]
    ParentNotADirectory { name: String },
    #[snafu(display("'{}' already exists in this directory", name))]
    DuplicateEntry { name: String },
}

#[derive(Debug, Snafu)]
pub enum ResolveError {
    #[snafu(display("Empty path expression"))]
    EmptyPath,
    #[snafu(display("No entry named '{}'", segment))]
    NotFound { segment: String },
    #[snafu(display("'{}' is not a directory", segment))]
    NotADirectory { segment: String },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    struct Seeded {
        namespace: Namespace,
        home: NodeId,
        user: NodeId,
    }

    /// root -> home -> user -> text1.txt, text2.txt, text3.txt
    fn seeded() -> Seeded {
        let mut namespace = Namespace::new();
        let home = namespace.add_directory(namespace.root(), "home").unwrap();
        let user = namespace.add_directory(home, "user").unwrap();
        for index in 1..=3 {
            namespace
                .add_file(
                    user,
                    format!("text{index}.txt"),
                    format!("Содержимое файла text{index}.txt"),
                )
                .unwrap();
        }
        Seeded {
            namespace,
            home,
            user,
        }
    }

    #[test]
    fn root_full_path_is_slash() {
        let namespace = Namespace::new();
        assert_eq!(namespace.full_path(namespace.root()), "/");
    }

    #[test]
    fn direct_child_of_root_has_single_separator() {
        let seeded = seeded();
        assert_eq!(seeded.namespace.full_path(seeded.home), "/home");
    }

    #[test]
    fn full_path_of_nested_directory() {
        let seeded = seeded();
        assert_eq!(seeded.namespace.full_path(seeded.user), "/home/user");
    }

    #[test]
    fn full_paths_never_contain_doubled_separators() {
        let seeded = seeded();
        let namespace = &seeded.namespace;
        let mut ids = vec![namespace.root(), seeded.home, seeded.user];
        for index in 1..=3 {
            ids.push(
                namespace
                    .resolve(seeded.user, &format!("text{index}.txt"))
                    .unwrap(),
            );
        }
        for id in ids {
            let path = namespace.full_path(id);
            assert!(path.starts_with('/'), "{path}");
            assert!(!path.contains("//"), "{path}");
        }
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("//")]
    fn resolve_fails_on_empty_remainder(#[case] path: &str) {
        let seeded = seeded();
        let from_user = seeded.namespace.resolve(seeded.user, path);
        let from_root = seeded.namespace.resolve(seeded.namespace.root(), path);
        assert!(matches!(from_user, Err(ResolveError::EmptyPath)));
        assert!(matches!(from_root, Err(ResolveError::EmptyPath)));
    }

    #[test]
    fn resolve_finds_file_with_its_content() {
        let seeded = seeded();
        let id = seeded.namespace.resolve(seeded.user, "text2.txt").unwrap();
        match seeded.namespace.node(id).kind() {
            NodeKind::File { content } => {
                assert_eq!(content, "Содержимое файла text2.txt");
            }
            NodeKind::Directory { .. } => panic!("expected a file"),
        }
    }

    #[test]
    fn absolute_path_is_equivalent_to_relative_from_root() {
        let seeded = seeded();
        let namespace = &seeded.namespace;
        let absolute = namespace.resolve(seeded.user, "/home/user/text1.txt").unwrap();
        let relative = namespace.resolve(seeded.user, "text1.txt").unwrap();
        let from_root = namespace
            .resolve(namespace.root(), "home/user/text1.txt")
            .unwrap();
        assert_eq!(absolute, relative);
        assert_eq!(absolute, from_root);
    }

    #[test]
    fn absolute_path_ignores_the_starting_directory() {
        let seeded = seeded();
        let from_home = seeded.namespace.resolve(seeded.home, "/home/user").unwrap();
        let from_user = seeded.namespace.resolve(seeded.user, "/home/user").unwrap();
        assert_eq!(from_home, seeded.user);
        assert_eq!(from_user, seeded.user);
    }

    #[test]
    fn resolve_is_idempotent_over_the_read_only_tree() {
        let seeded = seeded();
        let first = seeded.namespace.resolve(seeded.user, "text3.txt");
        let second = seeded.namespace.resolve(seeded.user, "text3.txt");
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn missing_entry_reports_the_failing_segment() {
        let seeded = seeded();
        let result = seeded.namespace.resolve(seeded.user, "nope.txt");
        match result {
            Err(ResolveError::NotFound { segment }) => assert_eq!(segment, "nope.txt"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn child_names_preserve_insertion_order() {
        let seeded = seeded();
        let names: Vec<&str> = seeded.namespace.child_names(seeded.user).collect();
        assert_eq!(names, ["text1.txt", "text2.txt", "text3.txt"]);
    }

    #[test]
    fn child_names_of_a_file_are_empty() {
        let seeded = seeded();
        let file = seeded.namespace.resolve(seeded.user, "text1.txt").unwrap();
        assert_eq!(seeded.namespace.child_names(file).count(), 0);
    }

    #[test]
    fn descending_through_a_file_fails() {
        let seeded = seeded();
        let result = seeded.namespace.resolve(seeded.home, "user/text1.txt/deeper");
        assert!(matches!(
            result,
            Err(ResolveError::NotADirectory { segment }) if segment == "text1.txt"
        ));
    }

    #[test]
    fn resolving_from_a_file_base_fails() {
        let seeded = seeded();
        let file = seeded.namespace.resolve(seeded.user, "text1.txt").unwrap();
        let result = seeded.namespace.resolve(file, "anything");
        assert!(matches!(result, Err(ResolveError::NotADirectory { .. })));
    }

    #[test]
    fn trailing_separator_still_resolves_the_entry() {
        let seeded = seeded();
        let id = seeded.namespace.resolve(seeded.namespace.root(), "home/").unwrap();
        assert_eq!(id, seeded.home);
    }

    #[test]
    fn embedded_separator_restarts_from_the_root() {
        let seeded = seeded();
        let id = seeded.namespace.resolve(seeded.user, "/home//home/user").unwrap();
        assert_eq!(id, seeded.user);
    }

    #[rstest]
    #[case(".")]
    #[case("..")]
    fn dot_segments_are_looked_up_literally(#[case] path: &str) {
        let seeded = seeded();
        let result = seeded.namespace.resolve(seeded.user, path);
        assert!(matches!(result, Err(ResolveError::NotFound { .. })));
    }

    #[test]
    fn a_child_literally_named_dot_dot_is_a_plain_name() {
        let mut namespace = Namespace::new();
        let odd = namespace.add_directory(namespace.root(), "..").unwrap();
        let resolved = namespace.resolve(namespace.root(), "..").unwrap();
        assert_eq!(resolved, odd);
    }

    #[test]
    fn duplicate_sibling_names_are_rejected() {
        let mut namespace = Namespace::new();
        namespace.add_directory(namespace.root(), "home").unwrap();
        let result = namespace.add_file(namespace.root(), "home", "");
        assert!(matches!(
            result,
            Err(AttachError::DuplicateEntry { name }) if name == "home"
        ));
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("/")]
    fn invalid_names_are_rejected(#[case] name: &str) {
        let mut namespace = Namespace::new();
        let result = namespace.add_directory(namespace.root(), name);
        assert!(matches!(result, Err(AttachError::InvalidName { .. })));
    }

    #[test]
    fn attaching_under_a_file_is_rejected() {
        let mut namespace = Namespace::new();
        let file = namespace.add_file(namespace.root(), "readme", "hello").unwrap();
        let result = namespace.add_file(file, "nested", "");
        assert!(matches!(result, Err(AttachError::ParentNotADirectory { .. })));
    }

    #[test]
    fn resolving_a_directory_returns_the_directory_node() {
        let seeded = seeded();
        let id = seeded.namespace.resolve(seeded.user, "/home").unwrap();
        assert_eq!(id, seeded.home);
        assert!(matches!(
            seeded.namespace.node(id).kind(),
            NodeKind::Directory { .. }
        ));
    }

    #[test]
    fn parent_links_point_back_to_the_enclosing_directory() {
        let seeded = seeded();
        assert_eq!(seeded.namespace.node(seeded.user).parent(), Some(seeded.home));
        assert_eq!(
            seeded.namespace.node(seeded.home).parent(),
            Some(seeded.namespace.root())
        );
        assert_eq!(seeded.namespace.node(seeded.namespace.root()).parent(), None);
    }
}
