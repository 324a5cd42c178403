use crate::{domain::BoundingBox, domain::DndConfig, host::BoardDom};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
};

/// Handle to an element of a [`MemoryBoard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Children sit side by side, sharing the parent's top edge
    Row,
    /// Children stack vertically
    Stack,
}

#[derive(Debug, Clone)]
struct Node {
    id: Option<String>,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
    flow: Flow,
    height: f64,
    pinned: Option<BoundingBox>,
}

impl Node {
    fn new(flow: Flow, height: f64) -> Self {
        Self {
            id: None,
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            parent: None,
            children: Vec::new(),
            flow,
            height,
            pinned: None,
        }
    }
}

/// Measured layout, filled lazily and dropped along the ancestor chain of
/// every structural change.
#[derive(Debug, Clone, Default)]
struct Layout {
    heights: HashMap<NodeRef, f64>,
    /// Child offsets from the parent's top edge, keyed by parent
    offsets: HashMap<NodeRef, HashMap<NodeRef, f64>>,
}

/// In-memory board used by native hosts and tests.
///
/// Columns are laid out side by side under a single root and their children
/// stack top to bottom. Geometry is always derived from the current tree, so
/// moving a card immediately shifts the boxes of its new siblings. Measuring
/// a column is linear in its children once per change; id lookups and box
/// reads after that only walk the (shallow) ancestor chain.
#[derive(Debug, Clone)]
pub struct MemoryBoard {
    nodes: Vec<Node>,
    root: NodeRef,
    config: DndConfig,
    ids: HashMap<String, NodeRef>,
    layout: RefCell<Layout>,
}

impl MemoryBoard {
    pub const CARD_HEIGHT: f64 = 40.0;

    /// Creates an empty board following the given naming conventions
    pub fn new(config: DndConfig) -> Self {
        Self {
            nodes: vec![Node::new(Flow::Row, 0.0)],
            root: NodeRef(0),
            config,
            ids: HashMap::new(),
            layout: RefCell::new(Layout::default()),
        }
    }

    /// Renders a board from `(column, tickets)` pairs
    pub fn from_columns(config: DndConfig, columns: &[(&str, &[&str])]) -> Self {
        let mut board = Self::new(config);
        for (column, tickets) in columns {
            let zone = board.add_column(column);
            for ticket in tickets.iter() {
                board.add_card(zone, ticket);
            }
        }
        board
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Appends a dropzone column to the board
    pub fn add_column(&mut self, column: &str) -> NodeRef {
        let zone = self.push(self.root, Node::new(Flow::Stack, 0.0));
        let dropzone_attr = self.config.dropzone_attr.clone();
        let column_attr = self.config.column_attr.clone();
        self.set_attribute(zone, &dropzone_attr, "");
        self.set_attribute(zone, &column_attr, column);
        zone
    }

    /// Appends a ticket card to the given column
    pub fn add_card(&mut self, zone: NodeRef, ticket: &str) -> NodeRef {
        let card = self.push(zone, Node::new(Flow::Stack, Self::CARD_HEIGHT));
        let column = self
            .attribute(&zone, &self.config.column_attr)
            .unwrap_or_default();
        let ticket_attr = self.config.ticket_attr.clone();
        let column_attr = self.config.column_attr.clone();
        let dom_id = format!("{}{}", self.config.card_id_prefix, ticket);

        self.set_id(card, Some(&dom_id));
        self.set_attribute(card, &ticket_attr, ticket);
        self.set_attribute(card, &column_attr, &column);
        card
    }

    /// Appends a plain element (a header, or a card's inner content)
    pub fn add_element(&mut self, parent: NodeRef, height: f64) -> NodeRef {
        self.push(parent, Node::new(Flow::Stack, height))
    }

    pub fn set_attribute(&mut self, el: NodeRef, name: &str, value: &str) {
        self.nodes[el.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, el: NodeRef, name: &str) {
        self.nodes[el.0].attrs.remove(name);
    }

    pub fn set_id(&mut self, el: NodeRef, id: Option<&str>) {
        if let Some(old) = self.nodes[el.0].id.take() {
            if self.ids.get(&old) == Some(&el) {
                self.ids.remove(&old);
            }
        }
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            self.ids.insert(id.to_string(), el);
        }
        self.nodes[el.0].id = id.map(str::to_string);
    }

    /// Removes an element from the board, as an external re-render would
    pub fn detach(&mut self, el: NodeRef) {
        if let Some(parent) = self.nodes[el.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != el);
            self.invalidate(parent);
        }
    }

    /// Freezes the measured box of an element regardless of later moves
    pub fn pin_box(&mut self, el: NodeRef, bbox: BoundingBox) {
        self.nodes[el.0].pinned = Some(bbox);
    }

    /// Finds the dropzone for a column id
    pub fn column(&self, column: &str) -> Option<NodeRef> {
        self.dropzones(&self.config.dropzone_attr)
            .into_iter()
            .find(|zone| self.attribute(zone, &self.config.column_attr).as_deref() == Some(column))
    }

    fn push(&mut self, parent: NodeRef, mut node: Node) -> NodeRef {
        let el = NodeRef(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(el);
        self.invalidate(parent);
        el
    }

    /// Drops cached measurements of `el` and everything above it
    fn invalidate(&self, el: NodeRef) {
        let mut layout = self.layout.borrow_mut();
        let mut current = Some(el);
        while let Some(node) = current {
            layout.heights.remove(&node);
            layout.offsets.remove(&node);
            current = self.nodes[node.0].parent;
        }
    }

    fn is_attached(&self, el: NodeRef) -> bool {
        self.is_ancestor(self.root, el)
    }

    fn is_ancestor(&self, ancestor: NodeRef, el: NodeRef) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    fn collect_descendants(&self, el: NodeRef, out: &mut Vec<NodeRef>) {
        for child in &self.nodes[el.0].children {
            out.push(*child);
            self.collect_descendants(*child, out);
        }
    }

    fn layout_height(&self, el: NodeRef) -> f64 {
        if let Some(height) = self.layout.borrow().heights.get(&el) {
            return *height;
        }

        let node = &self.nodes[el.0];
        let children = node.children.iter().map(|c| self.layout_height(*c));
        let content = match node.flow {
            Flow::Row => children.fold(0.0, f64::max),
            Flow::Stack => children.sum(),
        };
        let height = node.height.max(content);
        self.layout.borrow_mut().heights.insert(el, height);
        height
    }

    fn child_offset(&self, parent: NodeRef, el: NodeRef) -> f64 {
        if let Some(offset) = self
            .layout
            .borrow()
            .offsets
            .get(&parent)
            .and_then(|offsets| offsets.get(&el))
        {
            return *offset;
        }

        let node = &self.nodes[parent.0];
        let mut offsets = HashMap::with_capacity(node.children.len());
        let mut running = 0.0;
        for child in &node.children {
            offsets.insert(*child, running);
            if node.flow == Flow::Stack {
                running += self.layout_height(*child);
            }
        }
        let offset = offsets.get(&el).copied().unwrap_or(0.0);
        self.layout.borrow_mut().offsets.insert(parent, offsets);
        offset
    }

    fn layout_top(&self, el: NodeRef) -> f64 {
        match self.nodes[el.0].parent {
            Some(parent) => self.layout_top(parent) + self.child_offset(parent, el),
            None => 0.0,
        }
    }
}

impl BoardDom for MemoryBoard {
    type Element = NodeRef;

    fn closest_with_attr(&self, el: &NodeRef, attr: &str) -> Option<NodeRef> {
        let mut current = Some(*el);
        while let Some(node) = current {
            if self.nodes[node.0].attrs.contains_key(attr) {
                return Some(node);
            }
            current = self.nodes[node.0].parent;
        }
        None
    }

    fn attribute(&self, el: &NodeRef, name: &str) -> Option<String> {
        self.nodes[el.0].attrs.get(name).cloned()
    }

    fn element_id(&self, el: &NodeRef) -> Option<String> {
        self.nodes[el.0].id.clone().filter(|id| !id.is_empty())
    }

    fn parent(&self, el: &NodeRef) -> Option<NodeRef> {
        self.nodes[el.0].parent
    }

    fn children(&self, el: &NodeRef) -> Vec<NodeRef> {
        self.nodes[el.0].children.clone()
    }

    fn descendants(&self, el: &NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        self.collect_descendants(*el, &mut out);
        out
    }

    fn bounding_box(&self, el: &NodeRef) -> BoundingBox {
        if let Some(pinned) = self.nodes[el.0].pinned {
            return pinned;
        }
        BoundingBox::new(self.layout_top(*el), self.layout_height(*el))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.ids
            .get(id)
            .copied()
            .filter(|el| self.is_attached(*el))
    }

    fn dropzones(&self, dropzone_attr: &str) -> Vec<NodeRef> {
        self.descendants(&self.root)
            .into_iter()
            .filter(|el| self.nodes[el.0].attrs.contains_key(dropzone_attr))
            .collect()
    }

    fn add_class(&mut self, el: &NodeRef, class: &str) {
        self.nodes[el.0].classes.insert(class.to_string());
    }

    fn remove_class(&mut self, el: &NodeRef, class: &str) {
        self.nodes[el.0].classes.remove(class);
    }

    fn has_class(&self, el: &NodeRef, class: &str) -> bool {
        self.nodes[el.0].classes.contains(class)
    }

    fn insert_before(&mut self, parent: &NodeRef, child: &NodeRef, reference: Option<&NodeRef>) {
        // A node cannot be moved into its own subtree
        if self.is_ancestor(*child, *parent) || !self.is_attached(*parent) {
            tracing::warn!(?parent, ?child, "rejected insert into invalid parent");
            return;
        }
        if let Some(reference) = reference {
            if reference == child || self.nodes[reference.0].parent != Some(*parent) {
                tracing::warn!(?parent, ?reference, "insert reference is not a child of parent");
                return;
            }
        }

        self.detach(*child);
        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, *child);
        self.nodes[child.0].parent = Some(*parent);
        self.invalidate(*parent);
    }
}
