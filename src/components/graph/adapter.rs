//! Conversion of the raw service payload into a simulation-ready snapshot.

use std::collections::HashMap;

use log::warn;

use super::types::{GraphSnapshot, SimEdge, SimNode};
use crate::api::RawGraph;

/// Builds a [`GraphSnapshot`] from the wire payload.
///
/// Connection counts are recomputed from the link set rather than trusted
/// from the payload. Each link increments both endpoint counts once; a
/// self-loop increments its single endpoint once, not twice. A link whose
/// endpoint id is unknown is dropped with a warning and the rest of the
/// graph adapts normally.
pub fn adapt(raw: &RawGraph) -> GraphSnapshot {
	let mut id_to_idx = HashMap::new();
	let mut nodes = Vec::with_capacity(raw.nodes.len());
	for raw_node in &raw.nodes {
		if id_to_idx.contains_key(&raw_node.id) {
			warn!(
				"duplicate node id {} in graph payload, keeping the first",
				raw_node.id
			);
			continue;
		}
		id_to_idx.insert(raw_node.id, nodes.len());
		nodes.push(SimNode {
			id: raw_node.id,
			title: raw_node.title.clone(),
			connections: 0,
			created: raw_node.created.clone(),
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		});
	}

	let mut edges = Vec::with_capacity(raw.links.len());
	for link in &raw.links {
		let (Some(&source), Some(&target)) =
			(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
		else {
			warn!(
				"dropping link {} -> {}: unknown endpoint",
				link.source, link.target
			);
			continue;
		};
		nodes[source].connections += 1;
		if target != source {
			nodes[target].connections += 1;
		}
		edges.push(SimEdge {
			source,
			target,
			strength: if link.strength > 0.0 { link.strength } else { 1.0 },
		});
	}

	GraphSnapshot { nodes, edges }
}
