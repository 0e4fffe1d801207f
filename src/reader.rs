use crate::story::{Choice, Node, Story};

/// A reader's path through a story.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playthrough {
	trail: Vec<String>,
}

impl Playthrough {
	/// Starts at the story's starting node.
	pub fn start(story: &Story) -> Self {
		Self {
			trail: vec![story.start_id().to_owned()],
		}
	}

	pub fn current_id(&self) -> &str {
		self.trail.last().map(String::as_str).unwrap_or_default()
	}

	pub fn current<'a>(&self, story: &'a Story) -> Option<&'a Node> {
		story.nodes.get(self.current_id())
	}

	/// Number of choices taken so far.
	pub fn steps(&self) -> usize {
		self.trail.len() - 1
	}

	/// Follows `choice_id` out of the current node. Choices whose target is
	/// missing from the story cannot be followed.
	pub fn choose(&mut self, story: &Story, choice_id: &str) -> bool {
		let Some(target) = self
			.current(story)
			.and_then(|n| n.choices.iter().find(|c| c.id == choice_id))
			.filter(|c| is_followable(story, c))
			.map(|c| c.target.clone())
		else {
			return false;
		};
		self.trail.push(target);
		true
	}

	pub fn back(&mut self) -> bool {
		if self.trail.len() > 1 {
			self.trail.pop();
			true
		} else {
			false
		}
	}

	pub fn restart(&mut self) {
		self.trail.truncate(1);
	}
}

/// Whether the choice's target node exists.
pub fn is_followable(story: &Story, choice: &Choice) -> bool {
	story.nodes.contains_key(&choice.target)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn story() -> Story {
		let mut story = Story::default();
		let mut start = Node::new("start", "Begin");
		start.choices = vec![
			Choice {
				id: "c1".into(),
				text: "Go north".into(),
				target: "north".into(),
			},
			Choice {
				id: "c2".into(),
				text: "Fall".into(),
				target: "pit".into(),
			},
		];
		story.nodes.insert("start".into(), start);
		story.nodes.insert("north".into(), Node::new("north", "Arrived"));
		story
	}

	#[test]
	fn follows_choices_and_walks_back() {
		let story = story();
		let mut play = Playthrough::start(&story);
		assert!(play.choose(&story, "c1"));
		assert_eq!(play.current(&story).unwrap().content, "Arrived");
		assert_eq!(play.steps(), 1);
		assert!(play.back());
		assert!(!play.back());
		assert_eq!(play.current_id(), "start");
	}

	#[test]
	fn dangling_choices_are_not_followed() {
		let story = story();
		let mut play = Playthrough::start(&story);
		assert!(!play.choose(&story, "c2"));
		assert!(!play.choose(&story, "missing"));
		assert_eq!(play.current_id(), "start");
	}

	#[test]
	fn restart_returns_to_the_beginning() {
		let story = story();
		let mut play = Playthrough::start(&story);
		play.choose(&story, "c1");
		play.restart();
		assert_eq!(play, Playthrough::start(&story));
	}
}
