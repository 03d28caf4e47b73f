//! Simulation-ready graph data for one graph-view session.

use std::collections::HashSet;

/// Visual tiers derived from a node's connection count. Total: every
/// non-negative count maps to exactly one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegreeBucket {
	Orphan,
	Light,
	Connected,
	Hub,
}

impl DegreeBucket {
	pub fn from_connections(count: u32) -> Self {
		match count {
			0 => DegreeBucket::Orphan,
			1..=2 => DegreeBucket::Light,
			3..=5 => DegreeBucket::Connected,
			_ => DegreeBucket::Hub,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			DegreeBucket::Orphan => "#dc3545",
			DegreeBucket::Light => "#28a745",
			DegreeBucket::Connected => "#007bff",
			DegreeBucket::Hub => "#6f42c1",
		}
	}

	pub fn legend_label(self) -> &'static str {
		match self {
			DegreeBucket::Orphan => "Orphan notes",
			DegreeBucket::Light => "Few connections",
			DegreeBucket::Connected => "Well connected",
			DegreeBucket::Hub => "Hub notes",
		}
	}
}

/// One note in the graph view.
///
/// Identity, `connections` and `created` are fixed at adapt time; the
/// simulation only ever mutates the geometry fields. `fx`/`fy` pin the node
/// at an exact coordinate while a pointer drag holds it.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub id: i64,
	pub title: String,
	pub connections: u32,
	pub created: Option<String>,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn bucket(&self) -> DegreeBucket {
		DegreeBucket::from_connections(self.connections)
	}

	/// Visual radius: 8 for orphans, 3 per connection, capped at 20.
	pub fn radius(&self) -> f64 {
		(self.connections as f64 * 3.0).clamp(8.0, 20.0)
	}

	pub fn pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}

	pub fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}

	pub fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}

	/// Display label. Long titles are truncated to keep node text inside
	/// the circle.
	pub fn label(&self) -> String {
		if self.title.chars().count() > 15 {
			let head: String = self.title.chars().take(12).collect();
			format!("{head}...")
		} else {
			self.title.clone()
		}
	}
}

/// An undirected-for-display link, by index into `GraphSnapshot::nodes`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimEdge {
	pub source: usize,
	pub target: usize,
	pub strength: f64,
}

impl SimEdge {
	/// Stroke width grows with sqrt(strength), the same scaling the link
	/// force uses for its target distance.
	pub fn stroke_width(&self) -> f64 {
		self.strength.sqrt() * 2.0
	}

	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Everything one graph-view session works on. Rebuilt from scratch each
/// time the graph is opened, dropped when it closes. Ticks mutate node
/// positions and velocities in place; topology never changes after adapt.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	pub nodes: Vec<SimNode>,
	pub edges: Vec<SimEdge>,
}

impl GraphSnapshot {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Indices of nodes sharing an edge with `idx`.
	pub fn neighbors(&self, idx: usize) -> HashSet<usize> {
		let mut out = HashSet::new();
		for edge in &self.edges {
			if edge.source == idx {
				out.insert(edge.target);
			} else if edge.target == idx {
				out.insert(edge.source);
			}
		}
		out
	}

	/// Axis-aligned bounding box of node positions as
	/// `(min_x, min_y, max_x, max_y)`. None for an empty snapshot.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let first = self.nodes.first()?;
		let mut bounds = (first.x, first.y, first.x, first.y);
		for node in &self.nodes[1..] {
			bounds.0 = bounds.0.min(node.x);
			bounds.1 = bounds.1.min(node.y);
			bounds.2 = bounds.2.max(node.x);
			bounds.3 = bounds.3.max(node.y);
		}
		Some(bounds)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bucket_mapping_is_total_and_deterministic() {
		assert_eq!(DegreeBucket::from_connections(0), DegreeBucket::Orphan);
		assert_eq!(DegreeBucket::from_connections(1), DegreeBucket::Light);
		assert_eq!(DegreeBucket::from_connections(2), DegreeBucket::Light);
		assert_eq!(DegreeBucket::from_connections(3), DegreeBucket::Connected);
		assert_eq!(DegreeBucket::from_connections(5), DegreeBucket::Connected);
		assert_eq!(DegreeBucket::from_connections(6), DegreeBucket::Hub);
		assert_eq!(DegreeBucket::from_connections(100), DegreeBucket::Hub);
	}

	#[test]
	fn radius_is_clamped_to_visual_range() {
		let mut node = test_node(0);
		assert_eq!(node.radius(), 8.0);
		node.connections = 4;
		assert_eq!(node.radius(), 12.0);
		node.connections = 50;
		assert_eq!(node.radius(), 20.0);
	}

	#[test]
	fn long_titles_are_truncated_for_display() {
		let mut node = test_node(0);
		node.title = "A note with a very long title".into();
		assert_eq!(node.label(), "A note with ...");
		node.title = "Short".into();
		assert_eq!(node.label(), "Short");
	}

	#[test]
	fn neighbors_come_from_shared_edges() {
		let snapshot = GraphSnapshot {
			nodes: vec![test_node(1), test_node(2), test_node(3)],
			edges: vec![
				SimEdge { source: 0, target: 1, strength: 1.0 },
				SimEdge { source: 2, target: 0, strength: 1.0 },
			],
		};
		let n = snapshot.neighbors(0);
		assert!(n.contains(&1) && n.contains(&2));
		assert!(!n.contains(&0));
		assert_eq!(snapshot.neighbors(1).len(), 1);
	}

	pub(super) fn test_node(id: i64) -> SimNode {
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
}
