//! Editing session state: the story being edited, the selected node and the
//! node form's unsaved text.
//!
//! Text typed into the form lives in [`NodeForm::draft`] and only reaches the
//! story when the form is committed, which happens on save and when another
//! node is opened.

use log::debug;

use crate::api::{NewChoice, NewNode};
use crate::error::EditError;
use crate::story::{Choice, Node, Story};

/// Content given to nodes created from the editor.
pub const NEW_NODE_CONTENT: &str = "New story node...";

/// Default answer of the story title prompt.
pub const DEFAULT_STORY_TITLE: &str = "My Adventure";

/// The node form currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeForm {
	/// Node being edited.
	pub node_id: String,
	/// Text area contents.
	pub draft: String,
}

/// A choice taken out of the story, kept so it can be put back.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedChoice {
	node_id: String,
	position: usize,
	choice: Choice,
}

/// One editing session over one story.
#[derive(Clone, Debug)]
pub struct EditorState {
	story_id: String,
	story: Story,
	selected: Option<String>,
	form: Option<NodeForm>,
}

impl EditorState {
	/// Opens `story` with its starting node selected.
	pub fn new(story_id: impl Into<String>, story: Story) -> Self {
		let mut state = Self {
			story_id: story_id.into(),
			story,
			selected: None,
			form: None,
		};
		let start = state.story.start_id().to_owned();
		state.select(&start);
		state
	}

	pub fn story_id(&self) -> &str {
		&self.story_id
	}

	pub fn story(&self) -> &Story {
		&self.story
	}

	pub fn selected_node_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn form(&self) -> Option<&NodeForm> {
		self.form.as_ref()
	}

	/// Choices of the node open in the form.
	pub fn form_choices(&self) -> Vec<Choice> {
		self.form
			.as_ref()
			.and_then(|f| self.story.nodes.get(&f.node_id))
			.map(|n| n.choices.clone())
			.unwrap_or_default()
	}

	/// Selects `node_id`. Unknown ids are recorded as the selection but leave
	/// the form as it was; returns whether the form now shows `node_id`.
	///
	/// Re-selecting the open node keeps its draft.
	pub fn select(&mut self, node_id: &str) -> bool {
		self.selected = Some(node_id.to_owned());
		if self.form.as_ref().is_some_and(|f| f.node_id == node_id) {
			return true;
		}
		if !self.story.nodes.contains_key(node_id) {
			debug!("selected unknown node {node_id}");
			return false;
		}
		self.commit_form();
		let content = self
			.story
			.nodes
			.get(node_id)
			.map(|n| n.content.clone())
			.unwrap_or_default();
		self.form = Some(NodeForm {
			node_id: node_id.to_owned(),
			draft: content,
		});
		debug!("editing node {node_id}");
		true
	}

	pub fn set_draft(&mut self, text: String) {
		if let Some(form) = self.form.as_mut() {
			form.draft = text;
		}
	}

	/// Writes the form's draft into its node.
	pub fn commit_form(&mut self) {
		let Some(form) = self.form.as_ref() else {
			return;
		};
		if let Some(node) = self.story.nodes.get_mut(&form.node_id) {
			node.content.clone_from(&form.draft);
		}
	}

	/// Commits the form and returns the document to persist.
	pub fn prepare_save(&mut self) -> Story {
		self.commit_form();
		self.story.clone()
	}

	/// Validates a node id typed into the add-node prompt.
	///
	/// An empty answer is `Ok(None)`: nothing to do.
	pub fn new_node(&self, answer: &str) -> Result<Option<NewNode>, EditError> {
		let id = answer.trim();
		if id.is_empty() {
			return Ok(None);
		}
		if id.chars().any(char::is_whitespace) {
			return Err(EditError::InvalidNodeId(id.to_owned()));
		}
		if self.story.nodes.contains_key(id) {
			return Err(EditError::DuplicateNode(id.to_owned()));
		}
		Ok(Some(NewNode {
			node_id: id.to_owned(),
			content: NEW_NODE_CONTENT.to_owned(),
		}))
	}

	/// Adds a node the backend has accepted and opens it.
	pub fn insert_node(&mut self, node: &NewNode) {
		self.story
			.nodes
			.insert(node.node_id.clone(), Node::new(&node.node_id, &node.content));
		self.select(&node.node_id);
	}

	/// Validates the add-choice form for the node open in the form.
	pub fn new_choice(&self, text: &str, target: &str) -> Result<NewChoice, EditError> {
		let (text, target) = (text.trim(), target.trim());
		if text.is_empty() || target.is_empty() {
			return Err(EditError::MissingChoiceFields);
		}
		let Some(form) = self.form.as_ref() else {
			return Err(EditError::MissingChoiceFields);
		};
		if !self.story.nodes.contains_key(target) {
			return Err(EditError::UnknownNode(target.to_owned()));
		}
		Ok(NewChoice {
			from_node: form.node_id.clone(),
			to_node: target.to_owned(),
			choice_text: text.to_owned(),
		})
	}

	/// Takes the choice `choice_id` out of the form's node.
	pub fn remove_choice(&mut self, choice_id: &str) -> Option<RemovedChoice> {
		let node_id = self.form.as_ref()?.node_id.clone();
		let node = self.story.nodes.get_mut(&node_id)?;
		let position = node.choices.iter().position(|c| c.id == choice_id)?;
		let choice = node.choices.remove(position);
		Some(RemovedChoice {
			node_id,
			position,
			choice,
		})
	}

	/// Undoes [`EditorState::remove_choice`].
	pub fn restore_choice(&mut self, removed: RemovedChoice) {
		if let Some(node) = self.story.nodes.get_mut(&removed.node_id) {
			let position = removed.position.min(node.choices.len());
			node.choices.insert(position, removed.choice);
		}
	}

	/// Replaces the story with a fresh copy from the backend.
	///
	/// The remote copy decides which nodes and choices exist; node contents
	/// edited here but not yet saved are kept.
	pub fn merge_remote(&mut self, mut remote: Story) {
		self.commit_form();
		for (id, node) in remote.nodes.iter_mut() {
			if let Some(local) = self.story.nodes.get(id) {
				node.content.clone_from(&local.content);
			}
		}
		self.story = remote;
		let still_open = self
			.form
			.as_ref()
			.is_some_and(|f| self.story.nodes.contains_key(&f.node_id));
		if !still_open {
			debug!("open node was removed remotely, closing the form");
			self.form = None;
			if self
				.selected
				.as_ref()
				.is_some_and(|id| !self.story.nodes.contains_key(id))
			{
				self.selected = None;
			}
		}
	}
}

/// Title typed into the new-story prompt, if there is one.
pub fn story_title(answer: Option<String>) -> Option<String> {
	answer
		.map(|t| t.trim().to_owned())
		.filter(|t| !t.is_empty())
}

/// Suggested id for a new node.
pub fn default_node_id(now_millis: u64) -> String {
	format!("node_{now_millis}")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Story {
		let mut start = Node::new("start", "Begin");
		start.choices.push(Choice {
			id: "c1".into(),
			text: "Go north".into(),
			target: "north".into(),
		});
		let mut story = Story {
			id: "s1".into(),
			title: "The Cave".into(),
			starting_node: Some("start".into()),
			..Default::default()
		};
		story.nodes.insert("start".into(), start);
		story.nodes.insert("north".into(), Node::new("north", "Arrived"));
		story
	}

	#[test]
	fn opens_on_the_starting_node() {
		let state = EditorState::new("s1", sample());
		assert_eq!(state.selected_node_id(), Some("start"));
		assert_eq!(state.form().unwrap().draft, "Begin");
		let choices = state.form_choices();
		assert_eq!(choices.len(), 1);
		assert_eq!(
			format!("{} → {}", choices[0].text, choices[0].target),
			"Go north → north"
		);
	}

	#[test]
	fn selecting_an_unknown_node_leaves_the_form() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("Begin again".into());
		assert!(!state.select("nowhere"));
		assert_eq!(state.selected_node_id(), Some("nowhere"));
		let form = state.form().unwrap();
		assert_eq!(form.node_id, "start");
		assert_eq!(form.draft, "Begin again");
	}

	#[test]
	fn save_commits_only_the_edited_node() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("The cave mouth yawns.".into());
		state.set_draft("The cave mouth yawns wide.".into());
		let saved = state.prepare_save();
		assert_eq!(saved.nodes["start"].content, "The cave mouth yawns wide.");
		assert_eq!(saved.nodes["north"].content, "Arrived");
	}

	#[test]
	fn reselecting_the_open_node_keeps_the_draft() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("Edited text".into());
		assert!(state.select("start"));
		assert_eq!(state.form().unwrap().draft, "Edited text");
		let saved = state.prepare_save();
		assert_eq!(saved.nodes["start"].content, "Edited text");
	}

	#[test]
	fn switching_nodes_then_saving_keeps_both_edits() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("A dark mouth".into());
		assert!(state.select("north"));
		assert_eq!(state.form().unwrap().draft, "Arrived");
		state.set_draft("Cold wind".into());
		let saved = state.prepare_save();
		assert_eq!(saved.nodes["start"].content, "A dark mouth");
		assert_eq!(saved.nodes["north"].content, "Cold wind");

		assert!(state.select("start"));
		assert_eq!(state.form().unwrap().draft, "A dark mouth");
	}

	#[test]
	fn drafts_are_not_written_before_commit() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("changed".into());
		assert_eq!(state.story().nodes["start"].content, "Begin");
	}

	#[test]
	fn empty_choice_fields_are_rejected() {
		let state = EditorState::new("s1", sample());
		assert_eq!(
			state.new_choice("", "north"),
			Err(EditError::MissingChoiceFields)
		);
		assert_eq!(
			state.new_choice("Go back", "  "),
			Err(EditError::MissingChoiceFields)
		);
		assert_eq!(
			state.new_choice("Jump", "void"),
			Err(EditError::UnknownNode("void".into()))
		);
		let choice = state.new_choice(" Go back ", "start").unwrap();
		assert_eq!(choice.from_node, "start");
		assert_eq!(choice.choice_text, "Go back");
	}

	#[test]
	fn node_ids_are_validated() {
		let state = EditorState::new("s1", sample());
		assert_eq!(state.new_node("  "), Ok(None));
		assert_eq!(
			state.new_node("dark cave"),
			Err(EditError::InvalidNodeId("dark cave".into()))
		);
		assert_eq!(
			state.new_node("north"),
			Err(EditError::DuplicateNode("north".into()))
		);
		let node = state.new_node("cave").unwrap().unwrap();
		assert_eq!(node.content, NEW_NODE_CONTENT);
	}

	#[test]
	fn inserted_nodes_are_opened() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("edited".into());
		let node = state.new_node("cave").unwrap().unwrap();
		state.insert_node(&node);
		assert_eq!(state.selected_node_id(), Some("cave"));
		assert_eq!(state.story().nodes["start"].content, "edited");
		assert_eq!(state.story().nodes.len(), 3);
	}

	#[test]
	fn removed_choices_can_be_restored() {
		let mut state = EditorState::new("s1", sample());
		let removed = state.remove_choice("c1").unwrap();
		assert!(state.form_choices().is_empty());
		assert!(state.remove_choice("c1").is_none());
		state.restore_choice(removed);
		assert_eq!(state.form_choices()[0].id, "c1");
	}

	#[test]
	fn merge_keeps_unsaved_content() {
		let mut state = EditorState::new("s1", sample());
		state.set_draft("unsaved".into());
		let mut remote = sample();
		remote.nodes.get_mut("start").unwrap().choices.push(Choice {
			id: "c2".into(),
			text: "Stay".into(),
			target: "start".into(),
		});
		state.merge_remote(remote);
		assert_eq!(state.story().nodes["start"].content, "unsaved");
		assert_eq!(state.form_choices().len(), 2);
		assert_eq!(state.form().unwrap().node_id, "start");
	}

	#[test]
	fn merge_closes_a_node_deleted_remotely() {
		let mut state = EditorState::new("s1", sample());
		state.select("north");
		state.set_draft("gone soon".into());
		let mut remote = sample();
		remote.nodes.remove("north");
		state.merge_remote(remote);
		assert!(state.form().is_none());
		assert_eq!(state.selected_node_id(), None);
		assert!(state.form_choices().is_empty());
		assert!(!state.story().nodes.contains_key("north"));
		assert_eq!(state.story().nodes["start"].content, "Begin");
	}

	#[test]
	fn blank_titles_create_nothing() {
		assert_eq!(story_title(Some(String::new())), None);
		assert_eq!(story_title(Some("   ".into())), None);
		assert_eq!(story_title(None), None);
		assert_eq!(story_title(Some(" Tale ".into())).as_deref(), Some("Tale"));
		assert_eq!(default_node_id(1700000000000), "node_1700000000000");
	}
}
