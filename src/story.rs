//! Story documents as served by the backend.
//!
//! A [`Story`] is a titled set of [`Node`]s keyed by id, each carrying free
//! text and an ordered list of [`Choice`]s pointing at other nodes. Fields the
//! client does not know about are kept in `extra` so that a full-replace save
//! writes them back untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Node id used when a story does not name its starting node.
pub const FALLBACK_START: &str = "start";

const MONTHS: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A branching story document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
	/// Backend-assigned story id.
	#[serde(default)]
	pub id: String,
	/// Display title.
	#[serde(default)]
	pub title: String,
	/// Creation timestamp, ISO-8601 as written by the backend.
	#[serde(default)]
	pub created: String,
	/// Id of the node a reader starts at.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub starting_node: Option<String>,
	/// All nodes of the story keyed by id.
	#[serde(default, deserialize_with = "nodes_by_key")]
	pub nodes: BTreeMap<String, Node>,
	/// Unrecognised fields, written back verbatim on save.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// A unit of narrative content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Node id, unique within its story. Taken from the map key when absent.
	#[serde(default)]
	pub id: String,
	/// Narrative text, possibly empty.
	#[serde(default)]
	pub content: String,
	/// Outgoing choices in display order.
	#[serde(default)]
	pub choices: Vec<Choice>,
	/// Unrecognised fields, written back verbatim on save.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// A labelled edge from the owning node to `target`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
	/// Choice id, unique within its story.
	#[serde(default)]
	pub id: String,
	/// Label shown to the reader.
	#[serde(default)]
	pub text: String,
	/// Id of the node this choice leads to. Not guaranteed to exist.
	#[serde(default)]
	pub target: String,
}

impl Story {
	/// The starting node id, or [`FALLBACK_START`] when none (or an empty
	/// one) is recorded.
	pub fn start_id(&self) -> &str {
		self.starting_node
			.as_deref()
			.filter(|id| !id.is_empty())
			.unwrap_or(FALLBACK_START)
	}

	/// Whether `id` is the story's starting node.
	pub fn is_start(&self, id: &str) -> bool {
		self.start_id() == id
	}

	/// Total number of choices across all nodes.
	pub fn choice_count(&self) -> usize {
		self.nodes.values().map(|n| n.choices.len()).sum()
	}

	/// Node ids in display order.
	pub fn node_ids(&self) -> Vec<String> {
		self.nodes.keys().cloned().collect()
	}

	/// Creation date rendered as `Mon D, YYYY`.
	pub fn created_label(&self) -> String {
		format_created(&self.created)
	}
}

impl Node {
	/// A fresh node with no choices.
	pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			content: content.into(),
			..Default::default()
		}
	}
}

/// Formats an ISO-8601 timestamp (`YYYY-MM-DD...`) as `Mon D, YYYY`.
///
/// Anything that does not start with a valid calendar date is returned as is.
pub fn format_created(created: &str) -> String {
	let parse = || -> Option<String> {
		let date = created.get(..10)?;
		let mut parts = date.split('-');
		let year: u32 = parts.next()?.parse().ok()?;
		let month: usize = parts.next()?.parse().ok()?;
		let day: u32 = parts.next()?.parse().ok()?;
		if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
			return None;
		}
		Some(format!("{} {}, {}", MONTHS[month - 1], day, year))
	};
	parse().unwrap_or_else(|| created.to_owned())
}

fn nodes_by_key<'de, D>(deserializer: D) -> Result<BTreeMap<String, Node>, D::Error>
where
	D: Deserializer<'de>,
{
	let mut nodes = BTreeMap::<String, Node>::deserialize(deserializer)?;
	for (key, node) in nodes.iter_mut() {
		if node.id.is_empty() {
			node.id.clone_from(key);
		}
	}
	Ok(nodes)
}
