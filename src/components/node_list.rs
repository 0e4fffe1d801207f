use leptos::prelude::*;

use crate::editor::EditorState;

/// Sidebar listing every node id; the starting node is starred.
#[component]
pub fn NodeList(state: RwSignal<EditorState>, on_select: Callback<String>) -> impl IntoView {
	let entries = Memo::new(move |_| {
		state.with(|s| {
			let story = s.story();
			story
				.node_ids()
				.into_iter()
				.map(|id| {
					let is_start = story.is_start(&id);
					(id, is_start)
				})
				.collect::<Vec<_>>()
		})
	});
	let selected = Memo::new(move |_| state.with(|s| s.selected_node_id().map(str::to_owned)));

	view! {
		<div id="nodesList" class="nodes-list">
			<h3>"Story Nodes"</h3>
			<For
				each=move || entries.get()
				key=|entry: &(String, bool)| entry.clone()
				children=move |(id, is_start)| {
					let (item_id, click_id) = (id.clone(), id.clone());
					view! {
						<div
							class="node-item"
							class:selected=move || selected.get().as_deref() == Some(item_id.as_str())
							on:click=move |_| on_select.run(click_id.clone())
						>
							<span class="node-id">{id}</span>
							{is_start.then_some(" 🌟")}
						</div>
					}
				}
			/>
		</div>
	}
}
