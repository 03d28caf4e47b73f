//! Force-directed graph view: payload adaptation, simulation, interaction
//! state, and canvas rendering.

mod adapter;
mod component;
mod render;
mod sim;
mod state;
pub mod types;

pub use adapter::adapt;
pub use component::GraphCanvas;
