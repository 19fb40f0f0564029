use crate::arena::NodeId;
use crate::avl_tree::tree::{self, Tree};
use crate::avl_tree::{Compare, Error, Natural, PartialOrder, Result, TotalOrder};
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::vec;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes live in an arena and
/// keep an index to their parent, so insertion and removal rebalance by walking from the
/// modified node back up to the root. Every operation except iteration is `O(log n)`.
///
/// Elements are arranged by an ordering function `C`. By default it is the element type's
/// `PartialOrd` implementation. A value the ordering function cannot compare (for example
/// `NaN`) is rejected with `Error::InvalidArgument` and the set is left unchanged. Two values
/// that compare `Equal` are the same element.
///
/// The set is not synchronized. Mutation requires `&mut self`, so sharing it across threads
/// needs external locking.
///
/// # Examples
/// ```
/// use balanced_ordered_set::avl_tree::AvlSet;
///
/// # fn main() -> balanced_ordered_set::avl_tree::Result<()> {
/// let mut set = AvlSet::new();
/// set.add(10)?;
/// set.add(5)?;
/// set.add(15)?;
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.inorder_traverse(), vec![&5, &10, &15]);
///
/// assert_eq!(set.remove(&10)?, true);
/// assert_eq!(set.contains(&10)?, false);
/// assert_eq!(set.first()?, &5);
/// assert_eq!(set.last()?, &15);
/// # Ok(())
/// # }
/// ```
pub struct AvlSet<T, C = Natural> {
    tree: Tree<T>,
    comparator: C,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>` ordered by `PartialOrd`.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self
    where
        T: PartialOrd,
    {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `AvlSet<T>` with room for `capacity` elements before the node
    /// arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self
    where
        T: PartialOrd,
    {
        AvlSet {
            tree: Tree::with_capacity(capacity),
            comparator: Natural,
        }
    }

    /// Constructs a new, empty set ordered by a total order function.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// set.add(1).unwrap();
    /// set.add(3).unwrap();
    /// assert_eq!(set.first(), Ok(&3));
    /// ```
    pub fn with_comparator<F>(comparator: F) -> AvlSet<T, TotalOrder<F>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        AvlSet {
            tree: Tree::with_capacity(0),
            comparator: TotalOrder(comparator),
        }
    }

    /// Constructs a new, empty set ordered by a function that may refuse to order some values.
    /// Values it refuses are rejected with `Error::InvalidArgument`.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::{AvlSet, Error};
    ///
    /// let mut set = AvlSet::with_partial_comparator(|a: &Option<u32>, b: &Option<u32>| {
    ///     match (a, b) {
    ///         (Some(a), Some(b)) => Some(a.cmp(b)),
    ///         _ => None,
    ///     }
    /// });
    /// assert_eq!(set.add(Some(1)), Ok(true));
    /// assert_eq!(set.add(None), Err(Error::InvalidArgument));
    /// ```
    pub fn with_partial_comparator<F>(comparator: F) -> AvlSet<T, PartialOrder<F>>
    where
        F: Fn(&T, &T) -> Option<Ordering>,
    {
        AvlSet {
            tree: Tree::with_capacity(0),
            comparator: PartialOrder(comparator),
        }
    }
}

impl<T, C> AvlSet<T, C>
where
    C: Compare<T>,
{
    /// Adds a value to the set. Returns `true` if the value was added and `false` if an equal
    /// value was already present, in which case the set is not modified.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the value cannot be ordered.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.add(1), Ok(true));
    /// assert_eq!(set.add(1), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> Result<bool> {
        self.tree.insert(value, &self.comparator)
    }

    /// Removes a value from the set. Returns `true` if the value was present.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the value cannot be ordered.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1).unwrap();
    /// assert_eq!(set.remove(&1), Ok(true));
    /// assert_eq!(set.remove(&1), Ok(false));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        self.take(value).map(|removed| removed.is_some())
    }

    /// Removes a value from the set and returns the stored element equal to it, if any.
    pub fn take(&mut self, value: &T) -> Result<Option<T>> {
        self.tree.remove(value, &self.comparator)
    }

    /// Checks if a value exists in the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the value cannot be ordered.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::{AvlSet, Error};
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1.0).unwrap();
    /// assert_eq!(set.contains(&1.0), Ok(true));
    /// assert_eq!(set.contains(&0.0), Ok(false));
    /// assert_eq!(set.contains(&std::f64::NAN), Err(Error::InvalidArgument));
    /// ```
    pub fn contains(&self, value: &T) -> Result<bool> {
        tree::validate(&self.comparator, value)?;
        self.tree
            .find(value, &self.comparator)
            .map(|id| id.is_some())
    }

    /// Returns the greatest element less than or equal to `value`.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1).unwrap();
    /// assert_eq!(set.floor(&0), Ok(None));
    /// assert_eq!(set.floor(&2), Ok(Some(&1)));
    /// ```
    pub fn floor(&self, value: &T) -> Result<Option<&T>> {
        self.tree.floor(value, &self.comparator)
    }

    /// Returns the least element greater than or equal to `value`.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1).unwrap();
    /// assert_eq!(set.ceil(&0), Ok(Some(&1)));
    /// assert_eq!(set.ceil(&2), Ok(None));
    /// ```
    pub fn ceil(&self, value: &T) -> Result<Option<&T>> {
        self.tree.ceil(value, &self.comparator)
    }
}

impl<T, C> AvlSet<T, C> {
    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.root().is_none()
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1).unwrap();
    /// set.add(2).unwrap();
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the height of the underlying tree. An empty set has height 0.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the minimum element of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyCollection` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::{AvlSet, Error};
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.first(), Err(Error::EmptyCollection));
    /// set.add(3).unwrap();
    /// set.add(1).unwrap();
    /// assert_eq!(set.first(), Ok(&1));
    /// ```
    pub fn first(&self) -> Result<&T> {
        self.tree.min().ok_or(Error::EmptyCollection)
    }

    /// Returns the maximum element of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyCollection` if the set is empty.
    pub fn last(&self) -> Result<&T> {
        self.tree.max().ok_or(Error::EmptyCollection)
    }

    /// Returns a freshly collected list of the elements in ascending order.
    pub fn inorder_traverse(&self) -> Vec<&T> {
        let mut values = Vec::with_capacity(self.len());
        values.extend(self.iter());
        values
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(3).unwrap();
    /// set.add(1).unwrap();
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            tree: &self.tree,
            current: self.tree.root(),
            stack: Vec::new(),
        }
    }

    /// Renders the shape of the tree, e.g. `N{d=10, l=N{d=5}, r=N{d=15}}`. An empty set renders
    /// as `{}`.
    ///
    /// # Examples
    /// ```
    /// use balanced_ordered_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.tree_string(), "{}");
    /// for value in &[10, 5, 15] {
    ///     set.add(*value).unwrap();
    /// }
    /// assert_eq!(set.tree_string(), "N{d=10, l=N{d=5}, r=N{d=15}}");
    /// ```
    pub fn tree_string(&self) -> String
    where
        T: fmt::Debug,
    {
        let mut ret = String::new();
        match self.tree.root() {
            None => ret.push_str("{}"),
            Some(root) => self.write_node(root, &mut ret),
        }
        ret
    }

    fn write_node(&self, id: NodeId, out: &mut String)
    where
        T: fmt::Debug,
    {
        let node = self.tree.node(id);
        // Writing into a `String` cannot fail.
        let _ = write!(out, "N{{d={:?}", node.value);
        if node.is_leaf() {
            out.push('}');
            return;
        }
        if let Some(left) = node.left {
            out.push_str(", l=");
            self.write_node(left, out);
        }
        if let Some(right) = node.right {
            out.push_str(", r=");
            self.write_node(right, out);
        }
        out.push('}');
    }
}

impl<T, C> fmt::Debug for AvlSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> IntoIterator for AvlSet<T, C> {
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        AvlSetIntoIter {
            values: self.tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a AvlSet<T, C>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T, C>`.
///
/// This iterator yields the elements of the set in ascending order.
pub struct AvlSetIntoIter<T> {
    values: vec::IntoIter<T>,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// An iterator for `AvlSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.current {
            self.current = tree.node(id).left;
            self.stack.push(id);
        }
        let node = tree.node(self.stack.pop()?);
        self.current = node.right;
        Some(&node.value)
    }
}

impl<T> Default for AvlSet<T>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::AvlSet;
    use crate::avl_tree::Error;

    #[test]
    fn test_len_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: AvlSet<u32> = AvlSet::default();
        assert!(set.is_empty());
    }

    #[test]
    fn test_first_last_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.first(), Err(Error::EmptyCollection));
        assert_eq!(set.last(), Err(Error::EmptyCollection));
    }

    #[test]
    fn test_add() {
        let mut set = AvlSet::new();
        assert_eq!(set.add(1), Ok(true));
        assert_eq!(set.contains(&1), Ok(true));
    }

    #[test]
    fn test_add_duplicate() {
        let mut set = AvlSet::new();
        assert_eq!(set.add(20), Ok(true));
        for _ in 0..10 {
            assert_eq!(set.add(20), Ok(false));
        }
        assert_eq!(set.len(), 1);

        assert_eq!(set.remove(&20), Ok(true));
        for _ in 0..10 {
            assert_eq!(set.remove(&20), Ok(false));
        }
        assert_eq!(set.len(), 0);
        set.tree.assert_valid(&set.comparator);
    }

    #[test]
    fn test_remove() {
        let mut set = AvlSet::new();
        set.add(10).unwrap();
        set.add(5).unwrap();
        set.add(15).unwrap();
        assert_eq!(set.inorder_traverse(), vec![&5, &10, &15]);
        assert_eq!(set.len(), 3);

        assert_eq!(set.remove(&10), Ok(true));
        assert_eq!(set.contains(&10), Ok(false));
        assert_eq!(set.len(), 2);
        assert_eq!(set.inorder_traverse(), vec![&5, &15]);
        set.tree.assert_valid(&set.comparator);
    }

    #[test]
    fn test_remove_empty() {
        let mut set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.remove(&1), Ok(false));
        assert_eq!(set.take(&1), Ok(None));
    }

    #[test]
    fn test_take() {
        let mut set = AvlSet::with_comparator(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0));
        set.add((1, 'a')).unwrap();
        assert_eq!(set.add((1, 'b')), Ok(false));
        assert_eq!(set.take(&(1, 'z')), Ok(Some((1, 'a'))));
    }

    #[test]
    fn test_remove_descending_keeps_minimum() {
        let mut set = AvlSet::new();
        for value in 0..100 {
            set.add(value).unwrap();
        }
        for value in (60..100).rev() {
            assert_eq!(set.remove(&value), Ok(true));
            assert_eq!(set.first(), Ok(&0));
            assert_eq!(set.last(), Ok(&(value - 1)));
            set.tree.assert_valid(&set.comparator);
        }
        assert_eq!(set.len(), 60);
    }

    #[test]
    fn test_height_bound() {
        let mut set = AvlSet::new();
        for n in 1..=4096u32 {
            set.add(n).unwrap();
            let bound = 1.44 * f64::from(n + 2).log2();
            assert!(set.height() as f64 <= bound);
        }
    }

    #[test]
    fn test_invalid_argument() {
        let mut set = AvlSet::new();
        set.add(1.0).unwrap();
        assert_eq!(set.add(std::f64::NAN), Err(Error::InvalidArgument));
        assert_eq!(set.remove(&std::f64::NAN), Err(Error::InvalidArgument));
        assert_eq!(set.contains(&std::f64::NAN), Err(Error::InvalidArgument));
        assert_eq!(set.floor(&std::f64::NAN), Err(Error::InvalidArgument));
        assert_eq!(set.ceil(&std::f64::NAN), Err(Error::InvalidArgument));
        assert_eq!(set.len(), 1);
        assert_eq!(set.inorder_traverse(), vec![&1.0]);
    }

    #[test]
    fn test_partial_comparator_rejects_during_descent() {
        // odd values can only be compared with themselves
        let mut set = AvlSet::with_partial_comparator(|a: &u32, b: &u32| {
            if a == b || (a % 2 == 0 && b % 2 == 0) {
                a.partial_cmp(b)
            } else {
                None
            }
        });
        set.add(2).unwrap();
        set.add(4).unwrap();
        assert_eq!(set.add(3), Err(Error::InvalidArgument));
        assert_eq!(set.len(), 2);
        set.tree.assert_valid(&set.comparator);
    }

    #[test]
    fn test_first_last() {
        let mut set = AvlSet::new();
        set.add(1).unwrap();
        set.add(3).unwrap();
        set.add(5).unwrap();

        assert_eq!(set.first(), Ok(&1));
        assert_eq!(set.last(), Ok(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = AvlSet::new();
        set.add(1).unwrap();
        set.add(3).unwrap();
        set.add(5).unwrap();

        assert_eq!(set.floor(&0), Ok(None));
        assert_eq!(set.floor(&2), Ok(Some(&1)));
        assert_eq!(set.floor(&4), Ok(Some(&3)));
        assert_eq!(set.floor(&6), Ok(Some(&5)));

        assert_eq!(set.ceil(&0), Ok(Some(&1)));
        assert_eq!(set.ceil(&2), Ok(Some(&3)));
        assert_eq!(set.ceil(&4), Ok(Some(&5)));
        assert_eq!(set.ceil(&6), Ok(None));
    }

    #[test]
    fn test_reverse_comparator() {
        let mut set = AvlSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
        for value in &[1, 5, 3] {
            set.add(*value).unwrap();
        }
        assert_eq!(set.inorder_traverse(), vec![&5, &3, &1]);
        assert_eq!(set.first(), Ok(&5));
        set.tree.assert_valid(&set.comparator);
    }

    #[test]
    fn test_clear() {
        let mut set = AvlSet::new();
        set.add(1).unwrap();
        set.add(2).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.add(1), Ok(true));
    }

    #[test]
    fn test_into_iter() {
        let mut set = AvlSet::new();
        set.add(1).unwrap();
        set.add(5).unwrap();
        set.add(3).unwrap();

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = AvlSet::new();
        set.add(1).unwrap();
        set.add(5).unwrap();
        set.add(3).unwrap();

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
        assert_eq!((&set).into_iter().count(), 3);
    }

    #[test]
    fn test_inorder_traverse_is_a_snapshot() {
        let mut set = AvlSet::new();
        set.add(2).unwrap();
        let before = set.inorder_traverse().into_iter().cloned().collect::<Vec<u32>>();
        set.add(1).unwrap();
        assert_eq!(before, vec![2]);
        assert_eq!(set.inorder_traverse(), vec![&1, &2]);
    }

    #[test]
    fn test_debug() {
        let mut set = AvlSet::new();
        set.add(2).unwrap();
        set.add(1).unwrap();
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_tree_string() {
        let mut set = AvlSet::new();
        for value in &[1, 2, 3, 4] {
            set.add(*value).unwrap();
        }
        assert_eq!(set.tree_string(), "N{d=2, l=N{d=1}, r=N{d=3, r=N{d=4}}}");
    }
}
