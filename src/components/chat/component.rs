use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{IntervalHandle, set_interval_with_handle};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::KeyboardEvent;

use super::model::{ChatLog, MessageId, RevealStep};
use crate::api::KnowledgeApi;
use crate::config::AppConfig;

/// Tick `id` forward every `interval` until its text is complete.
fn start_reveal(chat_log: RwSignal<ChatLog>, id: MessageId, interval: Duration) {
	let handle: Rc<Cell<Option<IntervalHandle>>> = Rc::new(Cell::new(None));
	let handle_tick = handle.clone();
	let tick = move || {
		let step = chat_log.try_update(|l| l.advance(id)).unwrap_or(RevealStep::Missing);
		if step != RevealStep::Advanced {
			if let Some(h) = handle_tick.take() {
				h.clear();
			}
		}
	};

	match set_interval_with_handle(tick, interval) {
		Ok(h) => handle.set(Some(h)),
		Err(err) => {
			log::error!("reveal timer unavailable, showing answer at once: {:?}", err);
			while chat_log.try_update(|l| l.advance(id)) == Some(RevealStep::Advanced) {}
		}
	}
}

/// Chat window: message log, input box and send button.
#[component]
pub fn ChatPanel() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let api = KnowledgeApi::new(config.chat_url.clone());
	let reveal = config.reveal.clone();

	let chat_log = RwSignal::new(ChatLog::default());
	let input = RwSignal::new(String::new());
	let chat_box = NodeRef::<leptos::html::Div>::new();

	Effect::new(move |_| {
		chat_log.track();
		if let Some(el) = chat_box.get() {
			el.set_scroll_top(el.scroll_height());
		}
	});

	let submit = move || {
		let text = input.get_untracked();
		let Some(exchange) = chat_log.try_update(|l| l.submit(&text)).flatten() else {
			return;
		};
		input.set(String::new());

		let (api, reveal) = (api.clone(), reveal.clone());
		spawn_local(async move {
			match api.ask(&exchange.question).await {
				Ok(response) => {
					let started =
						chat_log.try_update(|l| l.answer(&exchange, response.answer_text(), &reveal));
					if let Some((id, interval)) = started {
						start_reveal(chat_log, id, interval);
					}
				}
				Err(err) => {
					log::warn!("chat request failed: {err}");
					chat_log.update(|l| {
						l.fail(&exchange);
					});
				}
			}
		});
	};

	let submit_key = submit.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			ev.prevent_default();
			submit_key();
		}
	};

	view! {
		<div class="chat">
			<div class="chat-box" node_ref=chat_box>
				{move || {
					chat_log.with(|l| {
						l.messages()
							.iter()
							.map(|m| {
								let bubble_class = if m.is_typing() { "bubble typing" } else { "bubble" };
								view! {
									<div class=format!("message {}", m.sender.css_class())>
										<span class="avatar">{m.sender.avatar()}</span>
										<div class=bubble_class>{m.text()}</div>
									</div>
								}
							})
							.collect_view()
					})
				}}
			</div>
			<div class="chat-input">
				<input
					type="text"
					placeholder="Ask a question..."
					prop:value=move || input.get()
					on:input=move |ev| input.set(event_target_value(&ev))
					on:keydown=on_keydown
				/>
				<button on:click=move |_| submit()>"Send"</button>
			</div>
		</div>
	}
}
