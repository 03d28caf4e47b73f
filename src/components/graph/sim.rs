//! Iterative velocity-based force simulation driving the graph layout.
//!
//! Each tick sums four force contributions (link attraction, pairwise
//! charge repulsion, centroid centering, circle collision) into node
//! velocities, then integrates with damping. Only geometry is mutated;
//! topology belongs to the adapter. The simulation cools toward rest and
//! reports itself inactive once the energy drops below a floor, until a
//! drag reheats it.

use super::types::GraphSnapshot;

/// Target separation for an edge of strength 1. The actual target scales
/// with sqrt(strength): heavier edges hold their endpoints further apart.
const LINK_DISTANCE: f64 = 80.0;
const LINK_STRENGTH: f64 = 0.1;
/// Charge-style repulsion between every node pair.
const CHARGE: f64 = 300.0;
/// Per-node circle radius for the minimum-separation constraint.
const COLLIDE_RADIUS: f64 = 30.0;
/// Cap on any single force contribution, so near-coincident nodes do not
/// explode off screen.
const FORCE_MAX: f64 = 100.0;
const ALPHA_MIN: f64 = 0.001;
const ALPHA_DECAY: f64 = 0.0228;
const VELOCITY_DAMPING: f64 = 0.6;
/// Energy level held while a drag is active.
const REHEAT_TARGET: f64 = 0.3;

/// The simulation's scalar state; node geometry lives in the snapshot it
/// is handed each tick.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	alpha: f64,
	alpha_target: f64,
	center_x: f64,
	center_y: f64,
}

impl ForceLayout {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			center_x: width / 2.0,
			center_y: height / 2.0,
		}
	}

	pub fn set_center(&mut self, width: f64, height: f64) {
		self.center_x = width / 2.0;
		self.center_y = height / 2.0;
	}

	/// Raises the energy floor so positions keep adjusting smoothly around
	/// a dragged node.
	pub fn reheat(&mut self) {
		self.alpha_target = REHEAT_TARGET;
		if self.alpha < REHEAT_TARGET {
			self.alpha = REHEAT_TARGET;
		}
	}

	/// Lets the energy decay back to rest after a drag ends.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	pub fn active(&self) -> bool {
		self.alpha >= ALPHA_MIN
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Advances the simulation one step. Returns false, touching nothing,
	/// once the layout has settled or when there is nothing to lay out.
	pub fn tick(&mut self, snap: &mut GraphSnapshot) -> bool {
		if snap.nodes.is_empty() || !self.active() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

		self.apply_links(snap);
		self.apply_charge(snap);
		self.apply_center(snap);
		self.apply_collision(snap);
		self.integrate(snap);
		true
	}

	fn apply_links(&self, snap: &mut GraphSnapshot) {
		let GraphSnapshot { nodes, edges } = snap;
		for edge in edges.iter() {
			if edge.source == edge.target {
				continue;
			}
			let (dx, dy) = {
				let s = &nodes[edge.source];
				let t = &nodes[edge.target];
				(t.x + t.vx - s.x - s.vx, t.y + t.vy - s.y - s.vy)
			};
			let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
			let target = LINK_DISTANCE * edge.strength.sqrt();
			let pull = (dist - target) / dist * self.alpha * LINK_STRENGTH;
			let (fx, fy) = (dx * pull * 0.5, dy * pull * 0.5);
			{
				let t = &mut nodes[edge.target];
				t.vx -= fx;
				t.vy -= fy;
			}
			{
				let s = &mut nodes[edge.source];
				s.vx += fx;
				s.vy += fy;
			}
		}
	}

	fn apply_charge(&self, snap: &mut GraphSnapshot) {
		let nodes = &mut snap.nodes;
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				if dx == 0.0 && dy == 0.0 {
					// Coincident nodes have no direction; nudge apart.
					dx = 1e-3;
					dy = 1e-3;
				}
				let d2 = (dx * dx + dy * dy).max(1.0);
				let force = (CHARGE * self.alpha / d2).min(FORCE_MAX);
				let dist = d2.sqrt();
				let (ux, uy) = (dx / dist, dy / dist);
				{
					let a = &mut nodes[i];
					a.vx -= ux * force;
					a.vy -= uy * force;
				}
				{
					let b = &mut nodes[j];
					b.vx += ux * force;
					b.vy += uy * force;
				}
			}
		}
	}

	fn apply_center(&self, snap: &mut GraphSnapshot) {
		let nodes = &mut snap.nodes;
		let count = nodes.len() as f64;
		let (mut cx, mut cy) = (0.0, 0.0);
		for node in nodes.iter() {
			cx += node.x;
			cy += node.y;
		}
		let (shift_x, shift_y) = (cx / count - self.center_x, cy / count - self.center_y);
		for node in nodes.iter_mut() {
			if !node.pinned() {
				node.x -= shift_x;
				node.y -= shift_y;
			}
		}
	}

	fn apply_collision(&self, snap: &mut GraphSnapshot) {
		let nodes = &mut snap.nodes;
		let min_sep = COLLIDE_RADIUS * 2.0;
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let (dx, dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_sep || dist <= 0.0 {
					continue;
				}
				let overlap = (min_sep - dist) / dist;
				let both_free = !nodes[i].pinned() && !nodes[j].pinned();
				// A pinned node holds its ground; the other absorbs the
				// full correction.
				let (wi, wj) = if both_free {
					(0.5, 0.5)
				} else if nodes[i].pinned() && nodes[j].pinned() {
					continue;
				} else if nodes[i].pinned() {
					(0.0, 1.0)
				} else {
					(1.0, 0.0)
				};
				{
					let a = &mut nodes[i];
					a.x -= dx * overlap * wi;
					a.y -= dy * overlap * wi;
				}
				{
					let b = &mut nodes[j];
					b.x += dx * overlap * wj;
					b.y += dy * overlap * wj;
				}
			}
		}
	}

	fn integrate(&self, snap: &mut GraphSnapshot) {
		for node in &mut snap.nodes {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				// Pins override everything; velocity never accumulates.
				node.x = fx;
				node.y = fy;
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx *= VELOCITY_DAMPING;
			node.vy *= VELOCITY_DAMPING;
			node.x += node.vx;
			node.y += node.vy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::{SimEdge, SimNode};

	fn node_at(id: i64, x: f64, y: f64) -> SimNode {
		SimNode {
			id,
			title: format!("note {id}"),
			connections: 0,
			created: None,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	fn pair(strength: f64) -> GraphSnapshot {
		GraphSnapshot {
			nodes: vec![node_at(1, 350.0, 300.0), node_at(2, 450.0, 300.0)],
			edges: vec![SimEdge { source: 0, target: 1, strength }],
		}
	}

	fn settle(layout: &mut ForceLayout, snap: &mut GraphSnapshot) -> usize {
		let mut ticks = 0;
		while layout.tick(snap) {
			ticks += 1;
			assert!(ticks < 10_000, "simulation failed to settle");
		}
		ticks
	}

	#[test]
	fn empty_graph_performs_no_ticks() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = GraphSnapshot::default();
		assert!(!layout.tick(&mut snap));
		assert_eq!(layout.alpha(), 1.0);
	}

	#[test]
	fn pinned_node_is_invariant_under_ticks() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = pair(1.0);
		snap.nodes[0].pin(350.0, 300.0);

		for _ in 0..10 {
			assert!(layout.tick(&mut snap));
			assert_eq!((snap.nodes[0].x, snap.nodes[0].y), (350.0, 300.0));
			assert_eq!((snap.nodes[0].vx, snap.nodes[0].vy), (0.0, 0.0));
		}

		snap.nodes[0].unpin();
		layout.tick(&mut snap);
		assert_ne!((snap.nodes[0].x, snap.nodes[0].y), (350.0, 300.0));
	}

	#[test]
	fn simulation_settles_and_stops() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = pair(1.0);
		settle(&mut layout, &mut snap);
		assert!(!layout.active());
		// Once settled, further ticks do not move anything.
		let frozen = (snap.nodes[0].x, snap.nodes[0].y);
		assert!(!layout.tick(&mut snap));
		assert_eq!((snap.nodes[0].x, snap.nodes[0].y), frozen);
	}

	#[test]
	fn reheat_reactivates_a_settled_simulation() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = pair(1.0);
		settle(&mut layout, &mut snap);
		assert!(!layout.tick(&mut snap));

		layout.reheat();
		assert!(layout.tick(&mut snap));

		// Cooling lets it run back down to rest.
		layout.cool();
		settle(&mut layout, &mut snap);
		assert!(!layout.active());
	}

	#[test]
	fn stronger_edges_rest_further_apart() {
		let dist = |strength: f64| {
			let mut layout = ForceLayout::new(800.0, 600.0);
			let mut snap = pair(strength);
			settle(&mut layout, &mut snap);
			let (dx, dy) = (
				snap.nodes[1].x - snap.nodes[0].x,
				snap.nodes[1].y - snap.nodes[0].y,
			);
			(dx * dx + dy * dy).sqrt()
		};
		// sqrt scaling: strength 4 targets twice the separation of 1.
		assert!(dist(4.0) > dist(1.0));
	}

	#[test]
	fn collision_keeps_free_nodes_apart() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = GraphSnapshot {
			nodes: vec![node_at(1, 395.0, 300.0), node_at(2, 405.0, 300.0)],
			edges: Vec::new(),
		};
		settle(&mut layout, &mut snap);
		let (dx, dy) = (
			snap.nodes[1].x - snap.nodes[0].x,
			snap.nodes[1].y - snap.nodes[0].y,
		);
		assert!((dx * dx + dy * dy).sqrt() >= COLLIDE_RADIUS * 2.0 - 1.0);
	}

	#[test]
	fn centering_pulls_the_centroid_to_canvas_center() {
		let mut layout = ForceLayout::new(800.0, 600.0);
		let mut snap = GraphSnapshot {
			nodes: vec![node_at(1, 0.0, 0.0), node_at(2, 100.0, 0.0)],
			edges: vec![SimEdge { source: 0, target: 1, strength: 1.0 }],
		};
		settle(&mut layout, &mut snap);
		let cx = (snap.nodes[0].x + snap.nodes[1].x) / 2.0;
		let cy = (snap.nodes[0].y + snap.nodes[1].y) / 2.0;
		assert!((cx - 400.0).abs() < 1.0, "centroid x drifted: {cx}");
		assert!((cy - 300.0).abs() < 1.0, "centroid y drifted: {cy}");
	}
}
