use leptos::prelude::*;

use crate::api::NewChoice;
use crate::dialogs;
use crate::editor::EditorState;
use crate::story::Choice;

/// Edit form for the node open in `state`.
///
/// The form is rebuilt only when a different node is opened, so typing and
/// background refreshes keep focus and caret position.
#[component]
pub fn NodeEditor(
	state: RwSignal<EditorState>,
	on_add_choice: Callback<NewChoice>,
	on_remove_choice: Callback<String>,
) -> impl IntoView {
	let form_node = Memo::new(move |_| state.with(|s| s.form().map(|f| f.node_id.clone())));

	move || match form_node.get() {
		None => view! { <p class="no-selection">"Select a node to edit it."</p> }.into_any(),
		Some(node_id) => view! {
			<NodeFields state node_id on_add_choice on_remove_choice />
		}
		.into_any(),
	}
}

#[component]
fn NodeFields(
	state: RwSignal<EditorState>,
	node_id: String,
	on_add_choice: Callback<NewChoice>,
	on_remove_choice: Callback<String>,
) -> impl IntoView {
	let initial = state.with_untracked(|s| s.form().map(|f| f.draft.clone()).unwrap_or_default());
	let is_start = state.with_untracked(|s| s.story().is_start(&node_id));
	let choices = Memo::new(move |_| {
		state.with(|s| {
			s.form_choices()
				.into_iter()
				.map(|c| {
					let exists = s.story().nodes.contains_key(&c.target);
					(c, exists)
				})
				.collect::<Vec<_>>()
		})
	});
	let node_ids = Memo::new(move |_| state.with(|s| s.story().node_ids()));
	let choice_text = RwSignal::new(String::new());
	let choice_target = RwSignal::new(String::new());

	let add_choice = move |_| {
		let result = state.with_untracked(|s| {
			s.new_choice(&choice_text.get_untracked(), &choice_target.get_untracked())
		});
		match result {
			Ok(choice) => {
				on_add_choice.run(choice);
				choice_text.set(String::new());
				choice_target.set(String::new());
			}
			Err(err) => dialogs::alert(&err.to_string()),
		}
	};

	view! {
		<h3>"Editing Node: " {node_id}</h3>
		{is_start.then(|| view! { <span class="start-badge">"Starting Node 🌟"</span> })}

		<textarea
			id="nodeContent"
			class="node-content"
			placeholder="Write your story content here..."
			prop:value=initial
			on:input=move |ev| state.update(|s| s.set_draft(event_target_value(&ev)))
		/>

		<div class="choices-section">
			<h4>"Choices"</h4>
			<div id="choicesList" class="choices-list">
				{move || {
					let choices = choices.get();
					if choices.is_empty() {
						view! { <p class="no-choices">"No choices yet. Add one below!"</p> }.into_any()
					} else {
						choices
							.into_iter()
							.map(|(choice, exists)| choice_row(choice, exists, on_remove_choice))
							.collect_view()
							.into_any()
					}
				}}
			</div>

			<div class="add-choice">
				<h4>"Add Choice"</h4>
				<input
					type="text"
					class="choice-input"
					placeholder="Choice text"
					prop:value=move || choice_text.get()
					on:input=move |ev| choice_text.set(event_target_value(&ev))
				/>
				<select
					class="choice-select"
					prop:value=move || choice_target.get()
					on:change=move |ev| choice_target.set(event_target_value(&ev))
				>
					<option value="">"Select target node..."</option>
					{move || {
						node_ids
							.get()
							.into_iter()
							.map(|id| {
								let label = id.clone();
								view! { <option value=id>{label}</option> }
							})
							.collect_view()
					}}
				</select>
				<button class="btn btn-small" on:click=add_choice>
					"Add Choice"
				</button>
			</div>
		</div>
	}
}

fn choice_row(choice: Choice, exists: bool, on_remove: Callback<String>) -> impl IntoView {
	let Choice { id, text, target } = choice;
	view! {
		<div class="choice-item">
			<div>
				<strong>{text}</strong>
				<br />
				<small class:missing=!exists>"→ " {target} {(!exists).then_some(" (missing)")}</small>
			</div>
			<button class="btn-small btn-danger" on:click=move |_| on_remove.run(id.clone())>
				"✕"
			</button>
		</div>
	}
}
