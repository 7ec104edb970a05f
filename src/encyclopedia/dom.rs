//! A small arena tree over a parsed HTML fragment
//!
//! Nodes are stored in document (pre-)order. Each node records its parent
//! and the exclusive end of its subtree, so a subtree is the contiguous
//! slice `id..end`. Every navigation step returns an `Option` instead of
//! assuming the markup has the expected shape.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Node as HtmlNode, Selector};

/// Index of a node in a `Document`
pub type NodeId = usize;

/// What a node holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { name: String, classes: Vec<String> },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    end: NodeId,
}

impl Node {
    /// Whether this is an element with the given tag name
    pub fn is_element(&self, tag: &str) -> bool {
        matches!(&self.kind, NodeKind::Element { name, .. } if name == tag)
    }
}

/// A flattened element subtree
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Flatten `root` and everything beneath it
    pub fn from_element(root: ElementRef<'_>) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index_of = HashMap::new();

        for handle in root.descendants() {
            let kind = match handle.value() {
                HtmlNode::Element(element) => NodeKind::Element {
                    name: element.name().to_string(),
                    classes: element.classes().map(str::to_string).collect(),
                },
                HtmlNode::Text(text) => NodeKind::Text(String::from(&*text.text)),
                _ => continue,
            };
            let parent = handle
                .parent()
                .and_then(|parent| index_of.get(&parent.id()).copied());

            let id = nodes.len();
            index_of.insert(handle.id(), id);
            nodes.push(Node {
                kind,
                parent,
                end: id + 1,
            });
        }

        for id in (1..nodes.len()).rev() {
            if let Some(parent) = nodes[id].parent {
                nodes[parent].end = nodes[parent].end.max(nodes[id].end);
            }
        }

        Self { nodes }
    }

    /// The first `table` with class `infobox` in a full HTML page
    pub fn infobox(html: &str) -> Option<Self> {
        let page = Html::parse_document(html);
        let selector = Selector::parse("table.infobox").ok()?;
        page.select(&selector).next().map(Self::from_element)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All elements with the given tag name, in document order
    pub fn elements<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.is_element(tag))
            .map(|(id, _)| id)
    }

    /// Concatenated text of a node and its descendants
    pub fn text(&self, id: NodeId) -> Option<String> {
        let node = self.nodes.get(id)?;
        let text = self.nodes[id..node.end]
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect();
        Some(text)
    }

    /// Contents of a text node; `None` for elements
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// The node immediately after this one under the same parent
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let candidate = self.nodes.get(node.end)?;
        (node.parent.is_some() && candidate.parent == node.parent).then_some(node.end)
    }

    /// First element with this tag after `id` in document order
    pub fn find_next(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        (id + 1..self.nodes.len()).find(|&next| self.nodes[next].is_element(tag))
    }

    /// The `n`th (0-based) element with this tag before `id`, nearest first
    pub fn find_previous_nth(&self, id: NodeId, tag: &str, n: usize) -> Option<NodeId> {
        (0..id.min(self.nodes.len()))
            .rev()
            .filter(|&prev| self.nodes[prev].is_element(tag))
            .nth(n)
    }

    /// Nearest element with this tag before `id`
    pub fn find_previous(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.find_previous_nth(id, tag, 0)
    }
}
