//! An in-memory ordered set backed by a height-balanced binary search tree.

mod arena;
pub mod avl_tree;
