pub mod editor;
pub mod graph;
pub mod search;
pub mod suggest;
