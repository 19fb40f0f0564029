use crate::arena::NodeId;

/// A struct representing an internal node of an avl tree.
///
/// `parent` is a back-link used only to walk toward the root; children are owned through the
/// arena by the node that links to them.
pub struct Node<T> {
    pub value: T,
    pub height: usize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T, parent: Option<NodeId>) -> Self {
        Node {
            value,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
