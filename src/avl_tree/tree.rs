use crate::arena::{NodeId, TypedArena};
use crate::avl_tree::node::Node;
use crate::avl_tree::{Compare, Error, Result};
use log::{debug, trace};
use std::cmp::{self, Ordering};
use std::mem;

fn compare<T, C>(cmp: &C, a: &T, b: &T) -> Result<Ordering>
where
    C: Compare<T>,
{
    cmp.compare(a, b).ok_or_else(|| {
        debug!("rejecting a value the ordering function cannot compare");
        Error::InvalidArgument
    })
}

/// Checks that `value` is orderable at all before it is used to search or mutate the tree.
pub fn validate<T, C>(cmp: &C, value: &T) -> Result<()>
where
    C: Compare<T>,
{
    compare(cmp, value, value).map(|_| ())
}

/// An avl tree whose nodes are stored in an arena and linked by `NodeId`.
///
/// Heights are cached on every node. An absent subtree has height 0 and a leaf has height 1.
pub struct Tree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<NodeId>,
}

impl<T> Tree<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: TypedArena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn height_of(&self, tree: Option<NodeId>) -> usize {
        match tree {
            None => 0,
            Some(id) => self.arena[id].height,
        }
    }

    fn update(&mut self, id: NodeId) {
        let height = {
            let node = &self.arena[id];
            cmp::max(self.height_of(node.left), self.height_of(node.right)) + 1
        };
        self.arena[id].height = height;
    }

    // right height minus left height
    fn balance_factor(&self, id: NodeId) -> isize {
        let node = &self.arena[id];
        self.height_of(node.right) as isize - self.height_of(node.left) as isize
    }

    // Points the slot in `parent` that held `old` at `new`, or the root slot if there is no
    // parent.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        trace!("rotating left at {:?}", id);
        let child = self.arena[id]
            .right
            .expect("Expected right child node to be `Some`.");
        let parent = self.arena[id].parent;
        let inner = self.arena[child].left;

        self.arena[id].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }
        self.arena[child].left = Some(id);
        self.arena[id].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, id, Some(child));

        self.update(id);
        self.update(child);
        child
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        trace!("rotating right at {:?}", id);
        let child = self.arena[id]
            .left
            .expect("Expected left child node to be `Some`.");
        let parent = self.arena[id].parent;
        let inner = self.arena[child].right;

        self.arena[id].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }
        self.arena[child].right = Some(id);
        self.arena[id].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, id, Some(child));

        self.update(id);
        self.update(child);
        child
    }

    // Restores the height invariant on every node from `start` up to the root.
    fn rebalance(&mut self, start: Option<NodeId>) {
        let mut curr = start;
        while let Some(id) = curr {
            self.update(id);
            let balance = self.balance_factor(id);

            let subtree = if balance < -1 {
                let child = self.arena[id]
                    .left
                    .expect("Expected left child node to be `Some`.");
                if self.balance_factor(child) > 0 {
                    self.rotate_left(child);
                }
                self.rotate_right(id)
            } else if balance > 1 {
                let child = self.arena[id]
                    .right
                    .expect("Expected right child node to be `Some`.");
                if self.balance_factor(child) < 0 {
                    self.rotate_right(child);
                }
                self.rotate_left(id)
            } else {
                id
            };

            curr = self.arena[subtree].parent;
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.arena[id].right {
            id = right;
        }
        id
    }

    // precondition: the node has at most one child
    fn unlink(&mut self, id: NodeId) -> Node<T> {
        let (child, parent) = {
            let node = &self.arena[id];
            (node.left.or(node.right), node.parent)
        };
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, id, child);
        let node = self.arena.free(id);
        self.rebalance(parent);
        node
    }

    pub fn find<C>(&self, value: &T, cmp: &C) -> Result<Option<NodeId>>
    where
        C: Compare<T>,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match compare(cmp, value, &node.value)? {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok(Some(id)),
            };
        }
        Ok(None)
    }

    /// Inserts `value` unless an equal value is already stored. Returns whether it was inserted.
    pub fn insert<C>(&mut self, value: T, cmp: &C) -> Result<bool>
    where
        C: Compare<T>,
    {
        validate(cmp, &value)?;

        let mut parent = None;
        let mut go_left = false;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            parent = curr;
            curr = match compare(cmp, &value, &node.value)? {
                Ordering::Less => {
                    go_left = true;
                    node.left
                },
                Ordering::Greater => {
                    go_left = false;
                    node.right
                },
                Ordering::Equal => return Ok(false),
            };
        }

        let id = self.arena.allocate(Node::new(value, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) if go_left => self.arena[parent].left = Some(id),
            Some(parent) => self.arena[parent].right = Some(id),
        }
        self.rebalance(parent);
        Ok(true)
    }

    /// Removes the value equal to `value` and returns it, or `None` if there is no such value.
    pub fn remove<C>(&mut self, value: &T, cmp: &C) -> Result<Option<T>>
    where
        C: Compare<T>,
    {
        validate(cmp, value)?;

        let target = match self.find(value, cmp)? {
            Some(id) => id,
            None => return Ok(None),
        };

        let (left, right) = {
            let node = &self.arena[target];
            (node.left, node.right)
        };
        let removed = match (left, right) {
            (Some(_), Some(right)) => {
                // The successor has no left child, so unlinking it is the single-child case.
                let successor = self.leftmost(right);
                let successor_node = self.unlink(successor);
                mem::replace(&mut self.arena[target].value, successor_node.value)
            },
            _ => self.unlink(target).value,
        };
        Ok(Some(removed))
    }

    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.leftmost(root)].value)
    }

    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.rightmost(root)].value)
    }

    pub fn floor<C>(&self, value: &T, cmp: &C) -> Result<Option<&T>>
    where
        C: Compare<T>,
    {
        validate(cmp, value)?;

        let mut best = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match compare(cmp, value, &node.value)? {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    best = Some(&node.value);
                    node.right
                },
                Ordering::Equal => return Ok(Some(&node.value)),
            };
        }
        Ok(best)
    }

    pub fn ceil<C>(&self, value: &T, cmp: &C) -> Result<Option<&T>>
    where
        C: Compare<T>,
    {
        validate(cmp, value)?;

        let mut best = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match compare(cmp, value, &node.value)? {
                Ordering::Greater => node.right,
                Ordering::Less => {
                    best = Some(&node.value);
                    node.left
                },
                Ordering::Equal => return Ok(Some(&node.value)),
            };
        }
        Ok(best)
    }

    /// Consumes the tree and returns its values in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut curr = self.root.take();
        loop {
            while let Some(id) = curr {
                stack.push(id);
                curr = self.arena[id].left;
            }
            match stack.pop() {
                Some(id) => {
                    let node = self.arena.free(id);
                    curr = node.right;
                    values.push(node.value);
                },
                None => break,
            }
        }
        values
    }
}

#[cfg(test)]
impl<T> Tree<T> {
    /// Asserts BST order, balance, cached heights, parent links and the element count.
    pub fn assert_valid<C>(&self, cmp: &C)
    where
        C: Compare<T>,
    {
        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None);
        }
        assert_eq!(self.assert_subtree(self.root, None, None, cmp), self.len());
    }

    fn assert_subtree<C>(
        &self,
        tree: Option<NodeId>,
        lower: Option<&T>,
        upper: Option<&T>,
        cmp: &C,
    ) -> usize
    where
        C: Compare<T>,
    {
        let id = match tree {
            Some(id) => id,
            None => return 0,
        };
        let node = &self.arena[id];

        if let Some(lower) = lower {
            assert_eq!(cmp.compare(lower, &node.value), Some(Ordering::Less));
        }
        if let Some(upper) = upper {
            assert_eq!(cmp.compare(&node.value, upper), Some(Ordering::Less));
        }
        for child in [node.left, node.right].iter().flatten() {
            assert_eq!(self.arena[*child].parent, Some(id));
        }
        if node.is_leaf() {
            assert_eq!(node.height, 1);
        }
        assert_eq!(
            node.height,
            cmp::max(self.height_of(node.left), self.height_of(node.right)) + 1,
        );
        assert!(self.balance_factor(id).abs() <= 1);

        self.assert_subtree(node.left, lower, Some(&node.value), cmp)
            + 1
            + self.assert_subtree(node.right, Some(&node.value), upper, cmp)
    }
}
