//! Nested, insertion-ordered feedback messages and their markdown rendering.
//!
//! A [`MessageTree`] maps titles to [`MessageNode`]s. Leaves carry paragraph
//! text; branches carry another tree. Branches without any non-empty leaf
//! below them are invisible: they neither count towards
//! [`MessageTree::is_empty`] nor render.

/// One entry of a [`MessageTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageNode {
    /// Paragraph text shown beneath the entry's heading.
    Leaf(String),
    /// Nested entries, rendered one heading level deeper.
    Branch(MessageTree),
}

impl MessageNode {
    fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(text) => text.trim().is_empty(),
            Self::Branch(tree) => tree.is_empty(),
        }
    }
}

/// Ordered mapping of heading titles to [`MessageNode`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTree {
    entries: Vec<(String, MessageNode)>,
}

impl MessageTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    ///
    /// Replacing keeps the entry's original position.
    pub fn insert(&mut self, title: impl Into<String>, node: MessageNode) {
        let title = title.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == title) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((title, node)),
        }
    }

    /// Inserts a leaf entry.
    pub fn insert_leaf(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.insert(title, MessageNode::Leaf(text.into()));
    }

    /// Inserts a branch entry.
    pub fn insert_branch(&mut self, title: impl Into<String>, tree: MessageTree) {
        self.insert(title, MessageNode::Branch(tree));
    }

    /// Looks up an entry by title.
    pub fn get(&self, title: &str) -> Option<&MessageNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == title)
            .map(|(_, node)| node)
    }

    /// Iterates over titles in insertion order, empty branches included.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(title, _)| title.as_str())
    }

    /// Returns `true` if no entry would render.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, node)| node.is_empty())
    }

    /// Flattens the tree into markdown blocks, depth first.
    ///
    /// Each title becomes a heading of `depth` hashes (one more per nesting
    /// level); each leaf becomes a paragraph under its heading.
    pub fn to_markdown_blocks(&self, depth: usize) -> Vec<String> {
        let mut blocks = Vec::new();
        for (title, node) in &self.entries {
            if node.is_empty() {
                continue;
            }
            blocks.push(format!("{} {}", "#".repeat(depth), title.trim()));
            match node {
                MessageNode::Leaf(text) => blocks.push(text.trim_end().to_string()),
                MessageNode::Branch(tree) => blocks.extend(tree.to_markdown_blocks(depth + 1)),
            }
        }
        blocks
    }
}

/// Banner heading opening every rendered report.
pub const REPORT_BANNER: &str = "# Automated check";

/// Heading level of the report's top-level entries.
pub const REPORT_BASE_DEPTH: usize = 2;

/// Renders a complete feedback comment addressed to `author`.
///
/// The banner and greeting come first; the tree follows with its top-level
/// titles as second-level headings. Blocks are separated by blank lines.
pub fn render_report(author: &str, tree: &MessageTree) -> String {
    let mut blocks = vec![
        REPORT_BANNER.to_string(),
        format!("@{author} thanks for your submission! We found a few problems though."),
    ];
    blocks.extend(tree.to_markdown_blocks(REPORT_BASE_DEPTH));
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> MessageTree {
        let mut file = MessageTree::new();
        file.insert_leaf("Filename problems", "Use a date prefix.\n\n");
        file.insert_leaf("Content problems", "Missing front matter.");

        let mut tree = MessageTree::new();
        tree.insert_leaf("Reminder", "Add yourself to the registry.");
        tree.insert_branch("File `content/post/a.md`", file);
        tree
    }

    #[test]
    fn renders_nested_headings_in_insertion_order() {
        let blocks = sample_tree().to_markdown_blocks(2);
        assert_eq!(
            blocks,
            vec![
                "## Reminder",
                "Add yourself to the registry.",
                "## File `content/post/a.md`",
                "### Filename problems",
                "Use a date prefix.",
                "### Content problems",
                "Missing front matter.",
            ]
        );
    }

    #[test]
    fn empty_branches_are_pruned() {
        let mut tree = MessageTree::new();
        tree.insert_branch("File `clean.md`", MessageTree::new());
        let mut nested = MessageTree::new();
        nested.insert_branch("Deeper", MessageTree::new());
        nested.insert_leaf("Blank", "   ");
        tree.insert_branch("File `also-clean.md`", nested);

        assert!(tree.is_empty());
        assert!(tree.to_markdown_blocks(2).is_empty());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut tree = MessageTree::new();
        tree.insert_leaf("a", "first");
        tree.insert_leaf("b", "second");
        tree.insert_leaf("a", "replaced");

        assert_eq!(tree.titles().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(tree.get("a"), Some(&MessageNode::Leaf("replaced".into())));
    }

    #[test]
    fn report_starts_with_banner_and_greeting() {
        let report = render_report("alice", &sample_tree());
        assert!(report.starts_with(
            "# Automated check\n\n@alice thanks for your submission! We found a few problems though.\n\n## Reminder"
        ));
        assert!(report.ends_with("### Content problems\n\nMissing front matter."));
    }
}
