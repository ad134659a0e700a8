//! Whole-subtree algorithms: merge, stable sort, structural equality,
//! ancestry and paths, range copies.
//!
//! None of them recurse on the call stack; deep trees are walked with
//! explicit work lists.

mod equal;
mod merge;
mod path;
mod sort;
