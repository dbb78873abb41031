use std::fmt;
use std::str::FromStr;

/// Deepest level that is still written as an ATX header.
pub const MAX_HEADER_LEVEL: u32 = 6;

/// Level of an unindented list item. Indented items add one per indent step.
pub const LIST_BASE_LEVEL: u32 = MAX_HEADER_LEVEL + 1;

/// Stable identifier of a node within one [`Tree`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic root every tree starts with.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node came from (or serialises to) a header or a list bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `#` .. `######`
    Header,
    /// `- item`, optionally tab-indented
    ListItem,
}

/// Fixed color palette a node can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Red,
    Blue,
    Green,
    Orange,
    Purple,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Default,
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Orange,
        Color::Purple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color {0:?} (expected one of: default, red, blue, green, orange, purple)")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Canvas coordinates assigned by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single outline entry.
///
/// Children are owned by id through `children`; `parent` is a back-reference
/// only and is kept in sync by every structural operation on [`Tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Display text, wikilink spans included verbatim.
    pub text: String,
    pub kind: NodeKind,
    /// Headers use 1..=6, list items `LIST_BASE_LEVEL + indent`.
    pub level: u32,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub position: Option<Position>,
    /// Zero-based line in the parsed text. `None` for nodes created by edits.
    pub source_line: Option<usize>,
    /// The original line, kept for diagnostics.
    pub raw_text: String,
    /// Wikilink targets found in `text`, deduplicated, in order of appearance.
    pub links: Vec<String>,
    pub color: Color,
    pub collapsed: bool,
}

impl Node {
    fn new(id: NodeId, text: String, kind: NodeKind, level: u32) -> Self {
        Self {
            id,
            text,
            kind,
            level,
            children: Vec::new(),
            parent: None,
            position: None,
            source_line: None,
            raw_text: String::new(),
            links: Vec::new(),
            color: Color::Default,
            collapsed: false,
        }
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An outline tree stored as an arena indexed by [`NodeId`].
///
/// Slot 0 is the synthetic root. Removed nodes leave an empty slot behind so
/// ids are never handed out twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    slots: Vec<Option<Node>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let root = Node::new(NodeId::ROOT, String::new(), NodeKind::Header, 0);
        Self {
            slots: vec![Some(root)],
        }
    }

    pub(crate) fn from_slots(slots: Vec<Option<Node>>) -> Self {
        Self { slots }
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The designated center: the first child of the root.
    pub fn center(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT).first().copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Children of `id` in display order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Number of nodes excluding the root.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.children(NodeId::ROOT).is_empty()
    }

    /// Every node except the root, depth-first pre-order.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(NodeId::ROOT, false, &mut out);
        out
    }

    /// Like [`Tree::all_nodes`] but without descendants of collapsed nodes.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(NodeId::ROOT, true, &mut out);
        out
    }

    fn walk(&self, id: NodeId, skip_collapsed: bool, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if id != NodeId::ROOT {
            out.push(id);
            if skip_collapsed && node.collapsed {
                return;
            }
        }
        for &child in &node.children {
            self.walk(child, skip_collapsed, out);
        }
    }

    /// Number of edges between the root and `id` (root children have depth 1).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// True when `ancestor` lies on the parent chain of `id` (or is `id`).
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// True when some collapsed ancestor hides `id`.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.ancestors(id)
            .any(|a| self.get(a).map(|n| n.collapsed).unwrap_or(false))
    }

    /// Create a detached node and return its id.
    pub(crate) fn alloc(&mut self, text: String, kind: NodeKind, level: u32) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(id, text, kind, level)));
        id
    }

    /// Append `child` to `parent`'s children and point its back-reference at
    /// `parent`. Returns `false` when either node is missing.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(child) {
            return false;
        }
        let Some(p) = self.get_mut(parent) else {
            return false;
        };
        p.children.push(child);
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink `id` from its parent. The node and its subtree stay allocated.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
        Some(parent)
    }

    /// Detach `id` and free it together with all of its descendants.
    /// Returns the number of nodes freed.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> usize {
        self.detach(id);
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots.get_mut(next.0).and_then(Option::take) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Kind and level a node gets when appended under `parent`.
    ///
    /// Children of the root and of headers above the header-depth limit are
    /// headers one level deeper; list items would re-parse under a preceding
    /// header sibling. Everything else nests as a list item.
    pub fn child_shape(&self, parent: NodeId) -> (NodeKind, u32) {
        let Some(p) = self.get(parent) else {
            return (NodeKind::ListItem, LIST_BASE_LEVEL);
        };
        let parent_is_header = parent == NodeId::ROOT || p.kind == NodeKind::Header;
        if !parent_is_header {
            (NodeKind::ListItem, p.level + 1)
        } else if p.level < MAX_HEADER_LEVEL {
            (NodeKind::Header, p.level + 1)
        } else {
            (NodeKind::ListItem, LIST_BASE_LEVEL)
        }
    }

    /// Recompute kind and level of `id` and its whole subtree from its
    /// current parent, top-down.
    pub(crate) fn rederive_levels(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(parent) = self.parent(next) else {
                continue;
            };
            let (kind, level) = self.child_shape(parent);
            if let Some(node) = self.get_mut(next) {
                node.kind = kind;
                node.level = level;
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    /// Resolve a `/`-separated path of node texts, starting below the root.
    ///
    /// The first child whose trimmed text matches wins at every step.
    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        let mut matched_any = false;
        for segment in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&c| self.get(c).map(|n| n.text.trim() == segment).unwrap_or(false))?;
            matched_any = true;
        }
        matched_any.then_some(current)
    }

    /// Iterate over all live nodes, root included, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }
}
