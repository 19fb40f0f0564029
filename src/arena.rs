//! Index-addressed storage for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeId(usize);

enum Block<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// An allocator for a single type of object backed by a `Vec`.
///
/// Freed blocks are threaded into a free list and reused by later allocations, so handles stay
/// small and stable for the lifetime of the object they point to. Objects are dropped when the
/// arena is dropped.
pub struct TypedArena<T> {
    head: Option<NodeId>,
    blocks: Vec<Block<T>>,
    size: usize,
}

impl<T> TypedArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            size: 0,
        }
    }

    /// Allocates an object and returns its handle, reusing a freed block if one exists.
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.size += 1;

        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                NodeId(self.blocks.len() - 1)
            },
            Some(id) => {
                let vacant_block = mem::replace(&mut self.blocks[id.0], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next) => {
                        self.head = next;
                        id
                    },
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the handle corresponds to an invalid or vacant block.
    pub fn free(&mut self, id: NodeId) -> T {
        if id.0 >= self.blocks.len() {
            panic!("Error: attempting to free invalid block.");
        }
        if let Block::Vacant(_) = self.blocks[id.0] {
            panic!("Error: attempting to free vacant block.");
        }
        let old_block = mem::replace(&mut self.blocks[id.0], Block::Vacant(self.head.take()));
        self.head = Some(id);
        self.size -= 1;
        match old_block {
            Block::Occupied(value) => value,
            Block::Vacant(_) => unreachable!(),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.blocks.get(id.0) {
            Some(Block::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.blocks.get_mut(id.0) {
            Some(Block::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Drops every object and forgets all handles.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.size = 0;
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for TypedArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for TypedArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: handle out of bounds.")
    }
}
