//! Note editor and its `[[...]]` link span machinery.

mod component;
pub mod linkspan;

pub use component::Editor;
