use thiserror::Error;

/// Failures talking to the story backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced a response, or its body could not be (de)serialized.
	#[error("request failed: {0}")]
	Transport(#[from] gloo_net::Error),
	/// The server answered with a non-success status code.
	#[error("server returned {status} for {url}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Requested url.
		url: String,
	},
	/// The server answered `success: false`.
	#[error("server rejected the request: {0}")]
	Rejected(String),
	/// The story listing does not contain the requested id.
	#[error("story `{0}` does not exist")]
	StoryNotFound(String),
}

/// Edits refused before anything is sent to the backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditError {
	/// Add-choice form submitted with an empty label or target.
	#[error("Please fill in both fields")]
	MissingChoiceFields,
	/// Node ids may not contain whitespace.
	#[error("node id `{0}` must not contain spaces")]
	InvalidNodeId(String),
	/// A node with this id is already part of the story.
	#[error("a node named `{0}` already exists")]
	DuplicateNode(String),
	/// The referenced node is not part of the story.
	#[error("node `{0}` does not exist")]
	UnknownNode(String),
}
