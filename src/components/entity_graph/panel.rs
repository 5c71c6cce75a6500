use leptos::prelude::*;
use leptos::task::spawn_local;

use super::query::{GraphView, QueryTicket};
use crate::api::{ApiError, AskResponse, KnowledgeApi};
use crate::components::force_graph::ForceGraphCanvas;
use crate::config::PhysicsConfig;

/// Look `entity` up in the knowledge base and show the outcome in `query`.
pub fn ask_about(entity: String, query: RwSignal<GraphView>, api: KnowledgeApi) {
	let Some(ticket) = query.try_update(|v| v.begin(&entity)) else {
		return;
	};
	spawn_local(async move {
		let result = api.ask(ticket.entity()).await;
		if let Err(err) = &result {
			log::warn!("graph query for {} failed: {err}", ticket.entity());
		}
		apply_result(query, ticket, result);
	});
}

/// Resolve `ticket` in `query`. Subscribers are only notified when the result
/// was applied, so a stale reply leaves the mounted graph alone.
fn apply_result(
	query: RwSignal<GraphView>,
	ticket: QueryTicket,
	result: Result<AskResponse, ApiError>,
) -> bool {
	query
		.try_maybe_update(|v| {
			let applied = v.resolve(ticket, result);
			(applied, applied)
		})
		.unwrap_or(false)
}

/// Answer text for the selected entity with its knowledge graph below.
///
/// `notice` replaces the answer text, e.g. when the page could not start.
#[component]
pub fn EntityGraphPanel(
	query: RwSignal<GraphView>,
	physics: PhysicsConfig,
	#[prop(optional, into)] notice: MaybeProp<String>,
) -> impl IntoView {
	let message = move || notice.get().or_else(|| query.with(|v| v.state().message()));
	let failed = move || notice.get().is_some() || query.with(|v| v.state().is_failed());

	// A new query unmounts the canvas, dropping its renderer with it.
	let graph = move || {
		let physics = physics.clone();
		query.with(|v| v.state().graph().cloned()).map(|data| {
			view! {
				<div class="graph-area">
					<ForceGraphCanvas data=data physics=physics />
				</div>
			}
		})
	};

	view! {
		<aside class="entity-panel">
			{move || {
				message()
					.map(|text| {
						view! {
							<div class="answer" class:error=failed>
								{text}
							</div>
						}
					})
			}}
			{graph}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use leptos::reactive::owner::Owner;

	use super::*;

	fn answer(text: &str) -> AskResponse {
		AskResponse {
			answer: Some(text.into()),
			graph: None,
		}
	}

	#[test]
	fn stale_reply_does_not_notify_the_view() {
		let owner = Owner::new();
		owner.set();

		let query = RwSignal::new(GraphView::default());
		let renders = Arc::new(AtomicUsize::new(0));
		let shown = Memo::new({
			let renders = renders.clone();
			move |_| {
				renders.fetch_add(1, Ordering::SeqCst);
				query.with(|v| v.state().message())
			}
		});

		let first = query.try_update(|v| v.begin("Alien")).unwrap();
		let second = query.try_update(|v| v.begin("Ripley")).unwrap();
		assert!(apply_result(query, second, Ok(answer("about Ripley"))));
		assert_eq!(shown.get_untracked().as_deref(), Some("about Ripley"));
		let before = renders.load(Ordering::SeqCst);

		assert!(!apply_result(query, first, Ok(answer("about Alien"))));
		assert_eq!(shown.get_untracked().as_deref(), Some("about Ripley"));
		assert_eq!(renders.load(Ordering::SeqCst), before);
	}

	#[test]
	fn current_reply_notifies_the_view() {
		let owner = Owner::new();
		owner.set();

		let query = RwSignal::new(GraphView::default());
		let shown = Memo::new(move |_| query.with(|v| v.state().message()));

		let ticket = query.try_update(|v| v.begin("Alien")).unwrap();
		assert_eq!(shown.get_untracked().as_deref(), Some("Looking up Alien..."));
		assert!(apply_result(query, ticket, Ok(answer("a film"))));
		assert_eq!(shown.get_untracked().as_deref(), Some("a film"));
	}
}
