//! Per-session interaction state for the graph view: view transform, drag,
//! pan, hover highlighting and auto-fit.
//!
//! Owns the snapshot and the simulation for exactly one open graph view;
//! created on open, dropped on close. No drawing-surface types here, so
//! the whole interaction model tests headlessly.

use std::collections::HashSet;
use std::f64::consts::PI;

use super::sim::ForceLayout;
use super::types::GraphSnapshot;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
/// Fraction of the canvas the auto-fit transform lets the content occupy.
const FIT_FILL: f64 = 0.8;
/// Extra slack around the visual radius when hit-testing pointer events.
const HIT_PADDING: f64 = 4.0;
/// Pointer travel below this many screen pixels counts as a click.
const CLICK_SLOP: f64 = 4.0;

/// Pan/zoom transform from graph space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	start_x: f64,
	start_y: f64,
	travel: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	origin_x: f64,
	origin_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	/// Last pointer position in screen space, for tooltip placement.
	pub pointer: (f64, f64),
}

/// Everything one open graph view mutates between open and close.
pub struct GraphState {
	pub snapshot: GraphSnapshot,
	pub layout: ForceLayout,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl GraphState {
	pub fn new(mut snapshot: GraphSnapshot, width: f64, height: f64) -> Self {
		// Seed positions on a circle around the canvas center so the
		// first ticks have somewhere sensible to start from.
		let count = snapshot.nodes.len().max(1) as f64;
		for (i, node) in snapshot.nodes.iter_mut().enumerate() {
			let angle = i as f64 * 2.0 * PI / count;
			node.x = width / 2.0 + 100.0 * angle.cos();
			node.y = height / 2.0 + 100.0 * angle.sin();
		}
		Self {
			snapshot,
			layout: ForceLayout::new(width, height),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	pub fn tick(&mut self) -> bool {
		self.layout.tick(&mut self.snapshot)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout.set_center(width, height);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the screen-space pointer, if any. Later nodes
	/// draw on top, so the scan runs back to front.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		for (idx, node) in self.snapshot.nodes.iter().enumerate().rev() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			let hit = node.radius() + HIT_PADDING;
			if dx * dx + dy * dy <= hit * hit {
				return Some(idx);
			}
		}
		None
	}

	/// Pointer press: starts a node drag (pinning the node and reheating
	/// the simulation) or a background pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at(sx, sy) {
			let node = &mut self.snapshot.nodes[idx];
			let (px, py) = (node.x, node.y);
			node.pin(px, py);
			self.drag = DragState {
				node: Some(idx),
				start_x: sx,
				start_y: sy,
				travel: 0.0,
			};
			self.layout.reheat();
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				origin_x: self.transform.x,
				origin_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.hover.pointer = (sx, sy);
		if let Some(idx) = self.drag.node {
			self.drag.travel += (sx - self.drag.start_x).abs() + (sy - self.drag.start_y).abs();
			self.drag.start_x = sx;
			self.drag.start_y = sy;
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.snapshot.nodes[idx].pin(gx, gy);
		} else if self.pan.active {
			self.transform.x = self.pan.origin_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.origin_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at(sx, sy);
			self.set_hover(hovered);
		}
	}

	/// Pointer release: unpins the dragged node (it is free again under
	/// the simulation) and ends panning. Returns the node index when the
	/// gesture was a click rather than a drag.
	pub fn pointer_up(&mut self) -> Option<usize> {
		self.pan.active = false;
		let idx = self.drag.node.take()?;
		self.snapshot.nodes[idx].unpin();
		self.layout.cool();
		(self.drag.travel <= CLICK_SLOP).then_some(idx)
	}

	pub fn pointer_leave(&mut self) {
		if let Some(idx) = self.drag.node.take() {
			self.snapshot.nodes[idx].unpin();
			self.layout.cool();
		}
		self.pan.active = false;
		self.set_hover(None);
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors = match node {
			Some(idx) => self.snapshot.neighbors(idx),
			None => HashSet::new(),
		};
	}

	/// Rendering-only dimming while a hover highlight is active. Never
	/// touches the snapshot.
	pub fn is_dimmed(&self, idx: usize) -> bool {
		match self.hover.node {
			Some(hovered) => idx != hovered && !self.hover.neighbors.contains(&idx),
			None => false,
		}
	}

	pub fn has_hover(&self) -> bool {
		self.hover.node.is_some()
	}

	/// Multiplies the scale by `factor` about the screen point `(sx, sy)`,
	/// clamping to the allowed zoom range.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Centers and scales the content to occupy roughly [`FIT_FILL`] of
	/// the canvas, clamped within the zoom range. Runs shortly after the
	/// view opens, once the simulation has partially settled.
	pub fn fit_to_view(&mut self) {
		let Some((min_x, min_y, max_x, max_y)) = self.snapshot.bounds() else {
			return;
		};
		let (w, h) = (max_x - min_x, max_y - min_y);
		let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		let k = if w > 0.0 || h > 0.0 {
			(FIT_FILL / (w / self.width).max(h / self.height)).clamp(MIN_ZOOM, MAX_ZOOM)
		} else {
			1.0
		};
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * mid_x,
			y: self.height / 2.0 - k * mid_y,
			k,
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::{SimEdge, SimNode};

	fn node(id: i64) -> SimNode {
		SimNode {
			id,
			title: format!("note {id}"),
			connections: 0,
			created: None,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	fn three_node_state() -> GraphState {
		let snapshot = GraphSnapshot {
			nodes: vec![node(1), node(2), node(3)],
			edges: vec![
				SimEdge { source: 0, target: 1, strength: 1.0 },
				SimEdge { source: 1, target: 2, strength: 1.0 },
			],
		};
		GraphState::new(snapshot, 800.0, 600.0)
	}

	#[test]
	fn zoom_is_clamped_regardless_of_delta_magnitude() {
		let mut state = three_node_state();
		state.zoom_at(1e9, 400.0, 300.0);
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.zoom_at(1e-9, 400.0, 300.0);
		assert_eq!(state.transform.k, MIN_ZOOM);
		for _ in 0..100 {
			state.zoom_at(0.9, 10.0, 10.0);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn zoom_preserves_the_point_under_the_pointer() {
		let mut state = three_node_state();
		let before = state.screen_to_graph(200.0, 150.0);
		state.zoom_at(1.5, 200.0, 150.0);
		let after = state.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn drag_pins_then_release_unpins() {
		let mut state = three_node_state();
		let (nx, ny) = (state.snapshot.nodes[0].x, state.snapshot.nodes[0].y);
		state.pointer_down(nx, ny);
		assert_eq!(state.drag.node, Some(0));
		assert!(state.snapshot.nodes[0].pinned());

		state.pointer_move(nx + 50.0, ny + 20.0);
		assert_eq!(state.snapshot.nodes[0].fx, Some(nx + 50.0));
		assert_eq!(state.snapshot.nodes[0].fy, Some(ny + 20.0));

		// Plenty of travel: this was a drag, not a click.
		assert_eq!(state.pointer_up(), None);
		assert!(!state.snapshot.nodes[0].pinned());
	}

	#[test]
	fn still_press_on_a_node_is_a_click() {
		let mut state = three_node_state();
		let (nx, ny) = (state.snapshot.nodes[2].x, state.snapshot.nodes[2].y);
		state.pointer_down(nx, ny);
		assert_eq!(state.pointer_up(), Some(2));
	}

	#[test]
	fn background_press_pans_the_view() {
		let mut state = three_node_state();
		state.pointer_down(5.0, 5.0);
		assert_eq!(state.drag.node, None);
		state.pointer_move(25.0, 15.0);
		assert_eq!(state.transform.x, 20.0);
		assert_eq!(state.transform.y, 10.0);
		state.pointer_up();
		state.pointer_move(100.0, 100.0);
		assert_eq!(state.transform.x, 20.0);
	}

	#[test]
	fn hover_dims_non_neighbors_only() {
		let mut state = three_node_state();
		state.set_hover(Some(0));
		assert!(!state.is_dimmed(0));
		assert!(!state.is_dimmed(1));
		assert!(state.is_dimmed(2));

		state.set_hover(None);
		assert!(!state.is_dimmed(2));
	}

	#[test]
	fn fit_centers_content_and_fills_most_of_the_canvas() {
		let mut state = three_node_state();
		state.snapshot.nodes[0].x = 100.0;
		state.snapshot.nodes[0].y = 100.0;
		state.snapshot.nodes[1].x = 300.0;
		state.snapshot.nodes[1].y = 200.0;
		state.snapshot.nodes[2].x = 200.0;
		state.snapshot.nodes[2].y = 150.0;
		state.fit_to_view();

		// Content is 200 wide on an 800 canvas; height is the binding
		// dimension at 100 on 600. Width wins the max ratio.
		assert!((state.transform.k - 0.8 / (200.0 / 800.0)).abs() < 1e-9);
		// The bounding-box center lands on the canvas center.
		let (gx, gy) = state.screen_to_graph(400.0, 300.0);
		assert!((gx - 200.0).abs() < 1e-9);
		assert!((gy - 150.0).abs() < 1e-9);
	}

	#[test]
	fn fit_clamps_to_zoom_range_for_tiny_content() {
		let mut state = three_node_state();
		for (i, node) in state.snapshot.nodes.iter_mut().enumerate() {
			node.x = 400.0 + i as f64 * 0.001;
			node.y = 300.0;
		}
		state.fit_to_view();
		assert!(state.transform.k <= MAX_ZOOM);
		assert!(state.transform.k >= MIN_ZOOM);
	}
}
