use leptos::prelude::*;
use leptos_meta::Title;

use super::use_route_story;
use crate::reader::{Playthrough, is_followable};
use crate::story::Story;

/// Reading page for `/view/:id`
#[component]
pub fn ReaderPage() -> impl IntoView {
	let loaded = use_route_story();

	move || match loaded.get() {
		None => view! { <p class="loading">"Loading story..."</p> }.into_any(),
		Some(Err(err)) => view! { <p class="error">"Could not load the story: " {err}</p> }.into_any(),
		Some(Ok((_, story))) => view! { <StoryReader story /> }.into_any(),
	}
}

#[component]
fn StoryReader(story: Story) -> impl IntoView {
	let title = story.title.clone();
	let play = RwSignal::new(Playthrough::start(&story));
	let story = StoredValue::new(story);

	let passage = move || {
		let current = play.get();
		story.with_value(|s| match current.current(s) {
			None => view! {
				<p class="error">"This passage does not exist: " {current.current_id().to_owned()}</p>
			}
			.into_any(),
			Some(node) if node.choices.is_empty() => view! {
				<p class="passage">{node.content.clone()}</p>
				<p class="ending">"The End"</p>
			}
			.into_any(),
			Some(node) => {
				let choices = node
					.choices
					.iter()
					.map(|choice| {
						let id = choice.id.clone();
						let followable = is_followable(s, choice);
						view! {
							<button
								class="btn choice"
								disabled=!followable
								on:click=move |_| {
									story.with_value(|s| {
										play.update(|p| {
											p.choose(s, &id);
										})
									})
								}
							>
								{choice.text.clone()}
							</button>
						}
					})
					.collect_view();
				view! {
					<p class="passage">{node.content.clone()}</p>
					<div class="choices">{choices}</div>
				}
				.into_any()
			}
		})
	};

	view! {
		<Title text=title.clone() />
		<div class="reader">
			<h1>{title}</h1>
			{passage}
			<div class="reader-controls">
				<button
					class="btn btn-small"
					disabled=move || play.with(|p| p.steps() == 0)
					on:click=move |_| {
						play.update(|p| {
							p.back();
						})
					}
				>
					"Back"
				</button>
				<button class="btn btn-small" on:click=move |_| play.update(Playthrough::restart)>
					"Restart"
				</button>
			</div>
		</div>
	}
}
