use std::fmt;

use log::debug;

use super::nodes::NodeKind;

/// Stable index of a node inside its [`Ast`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Empty for anonymous nodes such as operators.
    pub name: String,
    pub line: u32,
    /// Indentation of the line the node was created on.
    pub column: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena owning every node of one file.
///
/// Nodes are never removed. A node that is detached and never re-attached is
/// unreachable from the root and therefore not part of the tree.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    /// Creates an arena holding only the root class `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut ast = Ast {
            nodes: vec![],
            root: NodeId(0),
        };
        ast.root = ast.alloc(NodeKind::Class { super_class: None }, name, 0, 0);
        ast
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a detached node.
    pub fn alloc(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        line: u32,
        column: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            name: name.into(),
            line,
            column,
            parent: None,
            children: vec![],
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Appends a detached `child` to `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Inserts a detached `child` into `parent` at `index`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        assert!(
            self.kind(parent).is_parent_capable(),
            "{:?} cannot own children",
            self.kind(parent)
        );
        assert!(
            self.node(child).parent.is_none(),
            "{:?} already has an owner",
            child
        );
        assert!(
            parent != child && !self.is_ancestor(child, parent),
            "attaching {:?} under {:?} would create a cycle",
            child,
            parent
        );

        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Removes `child` from its owner, returning the owner and the old position.
    pub fn detach(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node_mut(child).parent.take()?;
        let siblings = &mut self.node_mut(parent).children;
        let index = siblings
            .iter()
            .position(|sibling| *sibling == child)
            .unwrap_or_else(|| unreachable!("{:?} missing from its owner's children", child));
        siblings.remove(index);
        Some((parent, index))
    }

    /// Moves `child` under `new_parent` (detach, then attach).
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        self.detach(child);
        self.attach(new_parent, child);
        debug!("re-parented {:?} under {:?}", child, new_parent);
    }

    /// True if `ancestor` appears on the owning-parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Owning parents of `node`, innermost first.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.parent(node),
        }
    }

    /// `node` and everything it owns, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = vec![];
        let mut stack = vec![node];

        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.children(id).iter().rev());
        }

        result
    }

    /// Children that form the statement body of a block-like node.
    pub fn body(&self, id: NodeId) -> &[NodeId] {
        let children = self.children(id);
        let header = self.kind(id).header_len().min(children.len());
        &children[header..]
    }

    pub fn params(&self, function: NodeId) -> &[NodeId] {
        match self.kind(function) {
            NodeKind::FunctionDeclaration { params, .. } => &self.children(function)[..*params],
            _ => &[],
        }
    }

    /// The function a variable names, if it is a function variable.
    pub fn function_of(&self, variable: NodeId) -> Option<NodeId> {
        if !matches!(self.kind(variable), NodeKind::VariableDeclaration { .. }) {
            return None;
        }

        self.children(variable)
            .first()
            .copied()
            .filter(|child| matches!(self.kind(*child), NodeKind::FunctionDeclaration { .. }))
    }

    pub fn is_function_variable(&self, id: NodeId) -> bool {
        self.function_of(id).is_some()
    }

    /// The innermost enclosing class of `node`.
    pub fn containing_class(&self, node: NodeId) -> Option<NodeId> {
        if matches!(self.kind(node), NodeKind::Class { .. }) {
            return Some(node);
        }

        self.ancestors(node)
            .find(|id| matches!(self.kind(*id), NodeKind::Class { .. }))
    }

    pub fn super_class(&self, class: NodeId) -> Option<NodeId> {
        match self.kind(class) {
            NodeKind::Class { super_class } => *super_class,
            _ => None,
        }
    }

    /// The pending `extends` clause of `class`, if it has one.
    pub fn extends_clause(&self, class: NodeId) -> Option<NodeId> {
        self.children(class)
            .iter()
            .copied()
            .find(|child| matches!(self.kind(*child), NodeKind::SubclassExpression))
    }

    /// The file type declared in the root class, if any.
    pub fn file_type(&self) -> Option<&str> {
        self.children(self.root)
            .iter()
            .find(|child| matches!(self.kind(**child), NodeKind::FileTypeDeclaration))
            .map(|child| self.name(*child))
    }

    /// A direct child of `scope` declaring `name`.
    pub fn declared_in(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.children(scope)
            .iter()
            .copied()
            .find(|child| self.kind(*child).is_declaration() && self.name(*child) == name)
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.ast.parent(current);
        Some(current)
    }
}
