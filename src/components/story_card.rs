use leptos::prelude::*;

use crate::story::Story;

#[component]
pub fn StoryCard(story_id: String, story: Story, on_delete: Callback<String>) -> impl IntoView {
	let delete_id = story_id.clone();
	view! {
		<div class="story-card">
			<h3>{story.title.clone()}</h3>
			<div class="story-meta">
				"Created: " {story.created_label()} <br /> "Nodes: " {story.nodes.len()}
			</div>
			<div class="story-actions">
				<a href=format!("/editor/{story_id}") class="btn btn-small">
					"Edit"
				</a>
				<a href=format!("/view/{story_id}") class="btn btn-small" target="_blank">
					"Read"
				</a>
				<button
					class="btn btn-small btn-danger"
					on:click=move |_| on_delete.run(delete_id.clone())
				>
					"Delete"
				</button>
			</div>
		</div>
	}
}
