// src/analysis/mod.rs
//! The analysis core: class dependency graph, method call graph,
//! reachability, and essential-dependency completion.

pub mod call_graph;
pub mod class_graph;
pub mod essential;
pub mod reach;

pub use call_graph::{CallGraph, CallGraphBuilder};
pub use class_graph::{ClassGraph, ClassGraphBuilder};
pub use reach::ReachableSet;
