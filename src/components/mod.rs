//! UI components.

pub mod tree_diagram;
