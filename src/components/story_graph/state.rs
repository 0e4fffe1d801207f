use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::GraphData;

pub const NODE_RADIUS: f64 = 25.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

pub const START_FILL: &str = "#00cec9";
pub const NODE_FILL: &str = "#6c5ce7";
pub const MISSING_FILL: &str = "#636e72";

const LINK_DISTANCE: f32 = 150.0;
const LINK_STRENGTH: f32 = 0.5;
const COLLIDE_RADIUS: f32 = 50.0;
const COLLIDE_STRENGTH: f32 = 0.7;
const RING_RADIUS: f64 = 100.0;

// Same cooling schedule as d3-force: ~300 ticks from 1 down to ALPHA_MIN.
const ALPHA_MIN: f64 = 0.001;
const ALPHA_DECAY: f64 = 0.0228;

/// Pointer travel (screen px) after which a press becomes a pan.
const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub preview: String,
	pub fill: &'static str,
	pub is_missing: bool,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

const FOCUS_DELAY: f64 = 0.08;
const FOCUS_IN_RATE: f64 = 1.8;
const FOCUS_OUT_RATE: f64 = 1.26;

/// The passage under the pointer and every passage one choice away from it,
/// in either direction. `strength` eases towards 1 while a passage is in
/// focus and back to 0 after the pointer leaves it.
#[derive(Clone, Debug, Default)]
pub struct Focus {
	pub node: Option<DefaultNodeIdx>,
	pub related: HashSet<DefaultNodeIdx>,
	pub strength: f64,
	/// Focus the pointer just left, drawn until `strength` reaches 0.
	fading: Option<(DefaultNodeIdx, HashSet<DefaultNodeIdx>)>,
	waited: f64,
}

impl Focus {
	fn centre(&self) -> Option<DefaultNodeIdx> {
		self.node.or(self.fading.as_ref().map(|(idx, _)| *idx))
	}

	pub fn is_active(&self) -> bool {
		self.centre().is_some()
	}

	pub fn is_centre(&self, idx: DefaultNodeIdx) -> bool {
		self.centre() == Some(idx)
	}

	pub fn includes(&self, idx: DefaultNodeIdx) -> bool {
		self.is_centre(idx)
			|| self.related.contains(&idx)
			|| self
				.fading
				.as_ref()
				.is_some_and(|(_, related)| related.contains(&idx))
	}

	fn advance(&mut self, dt: f64) {
		if self.node.is_some() {
			self.waited = (self.waited + dt).min(FOCUS_DELAY);
			if self.waited >= FOCUS_DELAY {
				self.strength += (1.0 - self.strength) * FOCUS_IN_RATE * dt;
			}
			return;
		}
		self.strength -= self.strength * FOCUS_OUT_RATE * dt;
		if self.strength < 0.01 {
			self.strength = 0.0;
			self.fading = None;
		}
	}
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<LinkInfo>,
	pub transform: ViewTransform,
	pub press: PressState,
	pub pan: PanState,
	pub focus: Focus,
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	/// Simulation heat; ticks stop moving nodes once it cools below `ALPHA_MIN`.
	pub alpha: f64,
}

fn build_graph(
	data: &GraphData,
	width: f64,
	height: f64,
	previous: &HashMap<String, (f32, f32)>,
) -> (ForceGraph<NodeInfo, ()>, Vec<LinkInfo>) {
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: 400.0,
		force_spring: 0.02,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let mut id_to_idx = HashMap::new();

	for (i, node) in data.nodes.iter().enumerate() {
		let (x, y) = previous.get(&node.id).copied().unwrap_or_else(|| {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			(
				(width / 2.0 + RING_RADIUS * angle.cos()) as f32,
				(height / 2.0 + RING_RADIUS * angle.sin()) as f32,
			)
		});
		let fill = if node.is_missing {
			MISSING_FILL
		} else if node.is_start {
			START_FILL
		} else {
			NODE_FILL
		};

		let idx = graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: NodeInfo {
				id: node.id.clone(),
				preview: node.preview.clone(),
				fill,
				is_missing: node.is_missing,
			},
		});
		id_to_idx.insert(node.id.as_str(), idx);
	}

	let mut links = Vec::with_capacity(data.links.len());
	for link in &data.links {
		let (Some(&src), Some(&tgt)) = (
			id_to_idx.get(link.source.as_str()),
			id_to_idx.get(link.target.as_str()),
		) else {
			debug!("skipping link {} -> {}", link.source, link.target);
			continue;
		};
		// self-loops are drawn but exert no spring force
		if src != tgt {
			graph.add_edge(src, tgt, EdgeData::default());
		}
		links.push(LinkInfo {
			source: src,
			target: tgt,
			label: link.label.clone(),
		});
	}

	(graph, links)
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let (graph, links) = build_graph(data, width, height, &HashMap::new());
		Self {
			graph,
			links,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			press: PressState::default(),
			pan: PanState::default(),
			focus: Focus::default(),
			selected: None,
			width,
			height,
			alpha: 1.0,
		}
	}

	/// Replaces the drawn graph with `data`. Nodes that survive keep their
	/// position; the layout is reheated.
	pub fn rebuild(&mut self, data: &GraphData) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		let (graph, links) = build_graph(data, self.width, self.height, &previous);
		self.graph = graph;
		self.links = links;
		self.press = PressState::default();
		self.pan = PanState::default();
		self.focus = Focus::default();
		self.alpha = 1.0;
		debug!(
			"graph rebuilt: {} nodes, {} links",
			self.node_count(),
			self.links.len()
		);
	}

	/// Moves the centring target to the new viewport centre. Positions and
	/// the node/link set are untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.alpha = 1.0;
	}

	pub fn set_selected(&mut self, id: Option<String>) {
		self.selected = id;
	}

	pub fn is_selected(&self, info: &NodeInfo) -> bool {
		self.selected.as_deref() == Some(info.id.as_str())
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < NODE_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	fn story_node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx && !node.data.user_data.is_missing {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = PressState {
			node_idx: self.node_at_position(x, y),
			start_x: x,
			start_y: y,
			moved: false,
		};
		self.pan = PanState {
			active: true,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			let under = self.node_at_position(x, y);
			self.focus_on(under);
			return;
		}
		let (dx, dy) = (x - self.press.start_x, y - self.press.start_y);
		if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			self.press.moved = true;
		}
		if self.press.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Ends a press. Returns the story node id when the press was a click on
	/// a node: released over the node it started on, without panning.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<String> {
		let was_pressed = std::mem::take(&mut self.pan).active;
		let press = std::mem::take(&mut self.press);
		if !was_pressed || press.moved {
			return None;
		}
		let idx = press.node_idx?;
		if self.node_at_position(x, y) != Some(idx) {
			return None;
		}
		self.story_node_id(idx)
	}

	pub fn pointer_leave(&mut self) {
		self.press = PressState::default();
		self.pan = PanState::default();
		self.focus_on(None);
	}

	/// Zooms by `factor` around the screen point `(x, y)`, keeping the scale
	/// within `MIN_ZOOM..=MAX_ZOOM`.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Moves the focus to `node` and collects the passages linked to it.
	/// Leaving a passage for empty canvas keeps it around while it fades.
	pub fn focus_on(&mut self, node: Option<DefaultNodeIdx>) {
		if self.focus.node == node {
			return;
		}
		let previous = self.focus.node.take();
		let related = std::mem::take(&mut self.focus.related);
		self.focus.fading = match (previous, node) {
			(Some(idx), None) => Some((idx, related)),
			_ => None,
		};
		if let Some(idx) = node {
			if previous.is_none() {
				self.focus.waited = 0.0;
			}
			self.focus.related = self
				.links
				.iter()
				.filter_map(|link| {
					if link.source == idx {
						Some(link.target)
					} else if link.target == idx {
						Some(link.source)
					} else {
						None
					}
				})
				.collect();
		}
		self.focus.node = node;
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	pub fn tick(&mut self, dt: f32) {
		if !self.is_settled() {
			self.graph.update(dt);
			self.apply_constraints();
			self.alpha -= self.alpha * ALPHA_DECAY;
		}

		self.focus.advance(dt as f64);
	}

	/// Link rest length, collision and centring, applied as position
	/// corrections after the charge/spring step.
	fn apply_constraints(&mut self) {
		let mut points: Vec<(DefaultNodeIdx, f32, f32)> = Vec::new();
		self.graph
			.visit_nodes(|node| points.push((node.index(), node.x(), node.y())));
		if points.is_empty() {
			return;
		}
		let slot: HashMap<DefaultNodeIdx, usize> = points
			.iter()
			.enumerate()
			.map(|(i, p)| (p.0, i))
			.collect();
		let alpha = self.alpha as f32;

		for link in &self.links {
			let (Some(&a), Some(&b)) = (slot.get(&link.source), slot.get(&link.target)) else {
				continue;
			};
			if a == b {
				continue;
			}
			let (dx, dy) = (points[b].1 - points[a].1, points[b].2 - points[a].2);
			let dist = (dx * dx + dy * dy).sqrt().max(0.01);
			let shift = (dist - LINK_DISTANCE) / dist * LINK_STRENGTH * alpha * 0.5;
			points[a].1 += dx * shift;
			points[a].2 += dy * shift;
			points[b].1 -= dx * shift;
			points[b].2 -= dy * shift;
		}

		let min_dist = COLLIDE_RADIUS * 2.0;
		for i in 0..points.len() {
			for j in (i + 1)..points.len() {
				let (mut dx, mut dy) = (points[j].1 - points[i].1, points[j].2 - points[i].2);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				if dist < 0.01 {
					// coincident nodes: separate along a pair-dependent direction
					let angle = (i * 31 + j * 17) as f32;
					(dx, dy) = (angle.cos(), angle.sin());
					dist = 1.0;
				}
				let push = (min_dist - dist) / dist * 0.5 * COLLIDE_STRENGTH;
				points[i].1 -= dx * push;
				points[i].2 -= dy * push;
				points[j].1 += dx * push;
				points[j].2 += dy * push;
			}
		}

		let n = points.len() as f32;
		let (sum_x, sum_y) = points
			.iter()
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.1, sy + p.2));
		let (shift_x, shift_y) = (
			sum_x / n - (self.width / 2.0) as f32,
			sum_y / n - (self.height / 2.0) as f32,
		);

		self.graph.visit_nodes_mut(|node| {
			if let Some(&i) = slot.get(&node.index()) {
				node.data.x = points[i].1 - shift_x;
				node.data.y = points[i].2 - shift_y;
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::story_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, is_start: bool) -> GraphNode {
		GraphNode {
			id: id.into(),
			preview: String::new(),
			is_start,
			is_missing: false,
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			label: format!("{source}->{target}"),
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![node("start", true), node("north", false), node("south", false)],
			links: vec![link("start", "north"), link("start", "south"), link("north", "north")],
		}
	}

	fn screen_pos(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let mut pos = None;
		state.graph.visit_nodes(|n| {
			if n.data.user_data.id == id {
				pos = Some((n.x() as f64, n.y() as f64));
			}
		});
		let (x, y) = pos.unwrap();
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn builds_one_element_per_node_and_link() {
		let state = ForceGraphState::new(&sample(), 800.0, 600.0);
		assert_eq!(state.node_count(), 3);
		assert_eq!(state.links.len(), 3);

		let mut fills = HashMap::new();
		state.graph.visit_nodes(|n| {
			fills.insert(n.data.user_data.id.clone(), n.data.user_data.fill);
		});
		assert_eq!(fills["start"], START_FILL);
		assert_eq!(fills["north"], NODE_FILL);
	}

	#[test]
	fn empty_graph_ticks_without_nodes() {
		let mut state = ForceGraphState::new(&GraphData::default(), 800.0, 600.0);
		for _ in 0..10 {
			state.tick(0.016);
		}
		assert_eq!(state.node_count(), 0);
	}

	#[test]
	fn zoom_stays_in_bounds() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		state.zoom_at(400.0, 300.0, 1e12);
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.zoom_at(10.0, 10.0, 1e-12);
		assert_eq!(state.transform.k, MIN_ZOOM);
		state.zoom_at(10.0, 10.0, f64::NAN);
		assert_eq!(state.transform.k, MIN_ZOOM);
		for _ in 0..100 {
			state.zoom_at(50.0, 80.0, 1.3);
		}
		assert!(state.transform.k <= MAX_ZOOM);
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let before = state.screen_to_graph(200.0, 150.0);
		state.zoom_at(200.0, 150.0, 2.0);
		let after = state.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn resize_keeps_layout() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		for _ in 0..20 {
			state.tick(0.016);
		}
		let before = state.positions();
		state.resize(1200.0, 900.0);
		assert_eq!(state.positions(), before);
		assert_eq!(state.node_count(), 3);
		assert_eq!(state.links.len(), 3);
		assert_eq!(state.alpha, 1.0);
	}

	#[test]
	fn rebuild_keeps_positions_of_surviving_nodes() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		for _ in 0..20 {
			state.tick(0.016);
		}
		let north = screen_pos(&state, "north");
		let mut data = sample();
		data.nodes.push(node("east", false));
		data.links.push(link("north", "east"));
		state.rebuild(&data);
		assert_eq!(state.node_count(), 4);
		assert_eq!(state.links.len(), 4);
		assert_eq!(screen_pos(&state, "north"), north);
	}

	#[test]
	fn simulation_cools_down() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		for _ in 0..400 {
			state.tick(0.016);
		}
		assert!(state.is_settled());
	}

	#[test]
	fn click_on_node_reports_its_id() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let (x, y) = screen_pos(&state, "north");
		state.pointer_down(x, y);
		state.pointer_move(x + 1.0, y);
		assert_eq!(state.pointer_up(x + 1.0, y).as_deref(), Some("north"));
	}

	#[test]
	fn dragging_pans_instead_of_clicking() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let (x, y) = screen_pos(&state, "north");
		state.pointer_down(x, y);
		state.pointer_move(x + 40.0, y + 30.0);
		assert_eq!(state.pointer_up(x + 40.0, y + 30.0), None);
		assert_eq!((state.transform.x, state.transform.y), (40.0, 30.0));
	}

	#[test]
	fn missing_nodes_are_not_clickable() {
		let mut data = sample();
		data.nodes.push(GraphNode {
			id: "pit".into(),
			preview: "(missing)".into(),
			is_start: false,
			is_missing: true,
		});
		data.links.push(link("south", "pit"));
		let mut state = ForceGraphState::new(&data, 800.0, 600.0);
		let (x, y) = screen_pos(&state, "pit");
		state.pointer_down(x, y);
		assert_eq!(state.pointer_up(x, y), None);
	}

	fn index_of(state: &ForceGraphState, id: &str) -> DefaultNodeIdx {
		let mut found = None;
		state.graph.visit_nodes(|n| {
			if n.data.user_data.id == id {
				found = Some(n.index());
			}
		});
		found.unwrap()
	}

	#[test]
	fn pointing_at_a_passage_focuses_its_choices() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let (start, north, south) = (
			index_of(&state, "start"),
			index_of(&state, "north"),
			index_of(&state, "south"),
		);
		let (x, y) = screen_pos(&state, "north");
		state.pointer_move(x, y);
		assert_eq!(state.focus.node, Some(north));
		assert!(state.focus.includes(start));
		assert!(!state.focus.includes(south));

		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!(state.focus.strength > 0.3);

		state.pointer_leave();
		assert!(state.focus.is_centre(north));
		assert!(state.focus.includes(start));
		for _ in 0..600 {
			state.tick(0.016);
		}
		assert_eq!(state.focus.strength, 0.0);
		assert!(!state.focus.is_active());
	}
}
