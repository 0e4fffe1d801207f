use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::Title;

use super::use_route_story;
use crate::api::{ApiClient, NewChoice};
use crate::components::node_editor::NodeEditor;
use crate::components::node_list::NodeList;
use crate::components::story_graph::{GraphData, StoryGraph};
use crate::config::Config;
use crate::dialogs;
use crate::editor::{EditorState, default_node_id};
use crate::story::Story;

/// Editor page for `/editor/:id`
#[component]
pub fn EditorPage() -> impl IntoView {
	let loaded = use_route_story();

	move || match loaded.get() {
		None => view! { <p class="loading">"Loading story..."</p> }.into_any(),
		Some(Err(err)) => view! {
			<div class="error">
				<p>"Could not load the story: " {err}</p>
				<a href="/" class="btn">"Back to stories"</a>
			</div>
		}
		.into_any(),
		Some(Ok((story_id, story))) => view! { <EditorWorkspace story_id story /> }.into_any(),
	}
}

#[component]
fn EditorWorkspace(story_id: String, story: Story) -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let config = expect_context::<Config>();
	let state = RwSignal::new(EditorState::new(story_id, story));

	let title = Memo::new(move |_| state.with(|s| s.story().title.clone()));
	let read_href = state.with_untracked(|s| format!("/view/{}", s.story_id()));
	let graph_data = Memo::new(move |_| state.with(|s| GraphData::from_story(s.story())));
	let selected = Memo::new(move |_| state.with(|s| s.selected_node_id().map(str::to_owned)));
	let select = Callback::new(move |id: String| {
		state.update(|s| {
			s.select(&id);
		})
	});

	let save = {
		let api = api.clone();
		move |_| {
			let Some((story_id, story)) =
				state.try_update(|s| (s.story_id().to_owned(), s.prepare_save()))
			else {
				return;
			};
			let api = api.clone();
			spawn_local(async move {
				match api.update_story(&story_id, &story).await {
					Ok(()) => dialogs::alert("Story saved successfully!"),
					Err(err) => dialogs::report("Saving the story failed", err),
				}
			});
		}
	};

	let add_node = {
		let api = api.clone();
		move |_| {
			let suggestion = default_node_id(dialogs::now_millis());
			let Some(answer) = dialogs::prompt("Enter node ID (no spaces):", &suggestion) else {
				return;
			};
			let node = match state.with_untracked(|s| s.new_node(&answer)) {
				Ok(Some(node)) => node,
				Ok(None) => return,
				Err(err) => {
					dialogs::alert(&err.to_string());
					return;
				}
			};
			let story_id = state.with_untracked(|s| s.story_id().to_owned());
			let api = api.clone();
			spawn_local(async move {
				match api.add_node(&story_id, &node).await {
					Ok(()) => state.update(|s| s.insert_node(&node)),
					Err(err) => dialogs::report("Adding the node failed", err),
				}
			});
		}
	};

	let add_choice = Callback::new({
		let api = api.clone();
		move |choice: NewChoice| {
			let story_id = state.with_untracked(|s| s.story_id().to_owned());
			let api = api.clone();
			spawn_local(async move {
				let refreshed = async {
					api.add_choice(&story_id, &choice).await?;
					api.fetch_story(&story_id).await
				}
				.await;
				match refreshed {
					Ok(remote) => state.update(|s| s.merge_remote(remote)),
					Err(err) => dialogs::report("Adding the choice failed", err),
				}
			});
		}
	});

	let remove_choice = Callback::new({
		let api = api.clone();
		move |choice_id: String| {
			let removal = state
				.try_update(|s| {
					let removed = s.remove_choice(&choice_id)?;
					Some((s.story_id().to_owned(), s.prepare_save(), removed))
				})
				.flatten();
			let Some((story_id, story, removed)) = removal else {
				return;
			};
			let api = api.clone();
			spawn_local(async move {
				if let Err(err) = api.update_story(&story_id, &story).await {
					state.update(|s| s.restore_choice(removed));
					dialogs::report("Removing the choice failed", err);
				}
			});
		}
	});

	let export_links = config
		.export_formats
		.iter()
		.map(|format| {
			let url = state.with_untracked(|s| api.export_url(s.story_id(), format));
			let label = format.to_uppercase();
			view! {
				<a
					href="#"
					data-format=format.clone()
					on:click=move |ev: MouseEvent| {
						ev.prevent_default();
						dialogs::open_in_new_tab(&url);
					}
				>
					{label}
				</a>
			}
		})
		.collect_view();

	view! {
		<Title text=move || format!("{} · Story Editor", title.get()) />
		<div class="editor">
			<header class="editor-header">
				<a href="/" class="btn btn-small">"← Stories"</a>
				<h2>{move || title.get()}</h2>
				<div class="editor-actions">
					<button id="addNodeBtn" class="btn" on:click=add_node>
						"Add Node"
					</button>
					<button id="saveStoryBtn" class="btn btn-primary" on:click=save>
						"Save"
					</button>
					<a href=read_href class="btn" target="_blank">
						"Read"
					</a>
					<div class="dropdown">
						<button class="btn">"Export"</button>
						<div class="dropdown-content">{export_links}</div>
					</div>
				</div>
			</header>
			<div class="editor-body">
				<aside class="sidebar">
					<NodeList state on_select=select />
				</aside>
				<main id="storyGraph" class="graph-container">
					<StoryGraph data=graph_data selected on_node_click=select />
				</main>
				<section id="nodeEditor" class="node-editor">
					<NodeEditor state on_add_choice=add_choice on_remove_choice=remove_choice />
				</section>
			</div>
		</div>
	}
}
