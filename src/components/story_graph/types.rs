use std::collections::BTreeSet;

use crate::story::Story;

const PREVIEW_CHARS: usize = 30;
const LABEL_CHARS: usize = 20;

/// A node as drawn on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	/// Start of the node's content.
	pub preview: String,
	pub is_start: bool,
	/// Stand-in for a choice target that is not part of the story.
	pub is_missing: bool,
}

/// A choice as drawn on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// One visual node per story node, one link per choice. Each distinct
	/// dangling target gets a single placeholder node appended after the
	/// story's own nodes.
	pub fn from_story(story: &Story) -> Self {
		let mut nodes: Vec<GraphNode> = story
			.nodes
			.values()
			.map(|node| GraphNode {
				id: node.id.clone(),
				preview: truncate(&node.content, PREVIEW_CHARS, "..."),
				is_start: story.is_start(&node.id),
				is_missing: false,
			})
			.collect();

		let mut links = Vec::with_capacity(story.choice_count());
		let mut missing = BTreeSet::new();
		for node in story.nodes.values() {
			for choice in &node.choices {
				if !story.nodes.contains_key(&choice.target) {
					missing.insert(choice.target.clone());
				}
				links.push(GraphLink {
					source: node.id.clone(),
					target: choice.target.clone(),
					label: truncate(&choice.text, LABEL_CHARS, ""),
				});
			}
		}

		nodes.extend(missing.into_iter().map(|id| GraphNode {
			id,
			preview: "(missing)".into(),
			is_start: false,
			is_missing: true,
		}));

		Self { nodes, links }
	}
}

fn truncate(text: &str, max_chars: usize, ellipsis: &str) -> String {
	match text.char_indices().nth(max_chars) {
		Some((end, _)) => format!("{}{ellipsis}", &text[..end]),
		None => text.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::{Choice, Node};

	fn choice(id: &str, text: &str, target: &str) -> Choice {
		Choice {
			id: id.into(),
			text: text.into(),
			target: target.into(),
		}
	}

	fn cave() -> Story {
		let mut start = Node::new("start", "Begin");
		start.choices.push(choice("c1", "Go north", "north"));
		let mut story = Story {
			starting_node: Some("start".into()),
			..Default::default()
		};
		story.nodes.insert("start".into(), start);
		story.nodes.insert("north".into(), Node::new("north", "Arrived"));
		story
	}

	#[test]
	fn one_visual_element_per_node_and_choice() {
		let data = GraphData::from_story(&cave());
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(
			data.links,
			vec![GraphLink {
				source: "start".into(),
				target: "north".into(),
				label: "Go north".into(),
			}]
		);
		let start = data.nodes.iter().find(|n| n.id == "start").unwrap();
		assert!(start.is_start);
		assert!(data.nodes.iter().filter(|n| n.is_start).count() == 1);
	}

	#[test]
	fn counts_match_for_larger_stories() {
		let mut story = Story::default();
		for i in 0..12 {
			let mut node = Node::new(format!("n{i}"), "text");
			for j in 0..(i % 4) {
				node.choices.push(choice(&format!("c{i}-{j}"), "next", &format!("n{}", (i + j) % 12)));
			}
			story.nodes.insert(node.id.clone(), node);
		}
		let data = GraphData::from_story(&story);
		assert_eq!(data.nodes.len(), 12);
		assert_eq!(data.links.len(), story.choice_count());
	}

	#[test]
	fn dangling_targets_get_one_placeholder() {
		let mut story = cave();
		let start = story.nodes.get_mut("start").unwrap();
		start.choices.push(choice("c2", "Fall", "pit"));
		start.choices.push(choice("c3", "Jump", "pit"));
		let data = GraphData::from_story(&story);
		assert_eq!(data.links.len(), 3);
		let missing: Vec<_> = data.nodes.iter().filter(|n| n.is_missing).collect();
		assert_eq!(missing.len(), 1);
		assert_eq!(missing[0].id, "pit");
	}

	#[test]
	fn empty_story_is_empty_graph() {
		assert_eq!(GraphData::from_story(&Story::default()), GraphData::default());
	}

	#[test]
	fn previews_and_labels_are_shortened() {
		let mut story = Story::default();
		let mut node = Node::new("a", "é".repeat(40));
		node.choices.push(choice("c", "a very long choice label indeed", "a"));
		story.nodes.insert("a".into(), node);
		let data = GraphData::from_story(&story);
		assert_eq!(data.nodes[0].preview, format!("{}...", "é".repeat(30)));
		assert_eq!(data.links[0].label, "a very long choice l");
	}
}
