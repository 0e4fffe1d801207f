//! Client for the story backend's JSON api.

use std::collections::BTreeMap;

use gloo_net::http::{Request, Response};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::story::Story;

/// Body of `POST /api/stories/{id}/node`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewNode {
	/// Id of the node to create.
	pub node_id: String,
	/// Initial content.
	pub content: String,
}

/// Body of `POST /api/stories/{id}/choice`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewChoice {
	/// Node the choice is appended to.
	pub from_node: String,
	/// Node the choice leads to.
	pub to_node: String,
	/// Choice label.
	pub choice_text: String,
}

#[derive(Serialize)]
struct NewStory<'a> {
	title: &'a str,
}

#[derive(Debug, Deserialize)]
struct Ack {
	#[serde(default)]
	success: bool,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	story_id: Option<String>,
}

impl Ack {
	fn into_result(self) -> Result<Self, ApiError> {
		if self.success {
			Ok(self)
		} else {
			Err(ApiError::Rejected(
				self.error
					.clone()
					.unwrap_or_else(|| "the request was not accepted".into()),
			))
		}
	}
}

/// Thin wrapper over `fetch` for the `/api/stories` routes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiClient {
	base: String,
}

impl ApiClient {
	/// Client rooted at `base`; an empty base targets the page's origin.
	pub fn new(base: impl Into<String>) -> Self {
		Self { base: base.into() }
	}

	fn url(&self, path: &str) -> String {
		format!("{}/api/stories{}", self.base, path)
	}

	/// `GET /api/stories`: every story keyed by id.
	pub async fn list_stories(&self) -> Result<BTreeMap<String, Story>, ApiError> {
		let url = self.url("");
		let response = checked(Request::get(&url).send().await?, &url)?;
		Ok(response.json().await?)
	}

	/// A single story, picked out of the full listing.
	pub async fn fetch_story(&self, story_id: &str) -> Result<Story, ApiError> {
		let mut stories = self.list_stories().await?;
		stories
			.remove(story_id)
			.ok_or_else(|| ApiError::StoryNotFound(story_id.to_owned()))
	}

	/// `POST /api/stories`: returns the new story's id.
	pub async fn create_story(&self, title: &str) -> Result<String, ApiError> {
		let url = self.url("");
		info!("creating story {title:?}");
		let request = Request::post(&url).json(&NewStory { title })?;
		let ack = acknowledge(request.send().await?, &url).await?;
		ack.story_id
			.ok_or_else(|| ApiError::Rejected("no story id in response".into()))
	}

	/// `PUT /api/stories/{id}`: replaces the stored document.
	pub async fn update_story(&self, story_id: &str, story: &Story) -> Result<(), ApiError> {
		let url = self.url(&format!("/{story_id}"));
		info!("saving story {story_id} ({} nodes)", story.nodes.len());
		let request = Request::put(&url).json(story)?;
		acknowledge(request.send().await?, &url).await.map(drop)
	}

	/// `DELETE /api/stories/{id}`.
	pub async fn delete_story(&self, story_id: &str) -> Result<(), ApiError> {
		let url = self.url(&format!("/{story_id}"));
		info!("deleting story {story_id}");
		checked(Request::delete(&url).send().await?, &url).map(drop)
	}

	/// `POST /api/stories/{id}/node`.
	pub async fn add_node(&self, story_id: &str, node: &NewNode) -> Result<(), ApiError> {
		let url = self.url(&format!("/{story_id}/node"));
		info!("adding node {} to {story_id}", node.node_id);
		let request = Request::post(&url).json(node)?;
		acknowledge(request.send().await?, &url).await.map(drop)
	}

	/// `POST /api/stories/{id}/choice`.
	pub async fn add_choice(&self, story_id: &str, choice: &NewChoice) -> Result<(), ApiError> {
		let url = self.url(&format!("/{story_id}/choice"));
		info!(
			"adding choice {} -> {} to {story_id}",
			choice.from_node, choice.to_node
		);
		let request = Request::post(&url).json(choice)?;
		acknowledge(request.send().await?, &url).await.map(drop)
	}

	/// Document url of `GET /api/stories/{id}/export/{format}`.
	pub fn export_url(&self, story_id: &str, format: &str) -> String {
		self.url(&format!("/{story_id}/export/{format}"))
	}
}

fn checked(response: Response, url: &str) -> Result<Response, ApiError> {
	debug!("{} {url}", response.status());
	if response.ok() {
		Ok(response)
	} else {
		Err(ApiError::Status {
			status: response.status(),
			url: url.to_owned(),
		})
	}
}

async fn acknowledge(response: Response, url: &str) -> Result<Ack, ApiError> {
	let response = checked(response, url)?;
	let ack: Ack = response.json().await?;
	ack.into_result()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn urls_follow_the_backend_routes() {
		let api = ApiClient::new("");
		assert_eq!(api.url(""), "/api/stories");
		assert_eq!(api.url("/s1/choice"), "/api/stories/s1/choice");
		assert_eq!(
			ApiClient::new("https://stories.example").export_url("s1", "markdown"),
			"https://stories.example/api/stories/s1/export/markdown"
		);
	}

	#[test]
	fn request_bodies_match_the_backend_shape() {
		let choice = NewChoice {
			from_node: "start".into(),
			to_node: "north".into(),
			choice_text: "Go north".into(),
		};
		assert_eq!(
			serde_json::to_value(&choice).unwrap(),
			serde_json::json!({"from_node": "start", "to_node": "north", "choice_text": "Go north"})
		);
		let node = NewNode {
			node_id: "cave".into(),
			content: "New story node...".into(),
		};
		assert_eq!(
			serde_json::to_value(&node).unwrap(),
			serde_json::json!({"node_id": "cave", "content": "New story node..."})
		);
	}

	#[test]
	fn unsuccessful_acks_are_errors() {
		let ack: Ack = serde_json::from_str(r#"{"success": false, "error": "no such node"}"#).unwrap();
		assert!(matches!(ack.into_result(), Err(ApiError::Rejected(msg)) if msg == "no such node"));

		let ack: Ack = serde_json::from_str(r#"{"success": true, "story_id": "s9"}"#).unwrap();
		assert_eq!(ack.into_result().unwrap().story_id.as_deref(), Some("s9"));
	}
}
