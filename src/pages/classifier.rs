use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Serialize;

use crate::api::{ApiError, HttpTransport, TextClassifierApi};
use crate::config::AppConfig;

const MODEL_NOT_LOADED: &str = "Model is not loaded yet, please retry later.";
const NOTHING_TO_CLASSIFY: &str = "Enter some text to classify.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Health,
	Categories,
	Classify,
	ClassifyBatch,
}

impl Action {
	fn label(self) -> &'static str {
		match self {
			Action::Health => "Health",
			Action::Categories => "Categories",
			Action::Classify => "Classify",
			Action::ClassifyBatch => "Classify batch",
		}
	}
}

/// One text per non-empty line.
fn batch_lines(input: &str) -> Vec<String> {
	input
		.lines()
		.map(str::trim)
		.filter(|l| !l.is_empty())
		.map(str::to_string)
		.collect()
}

fn pretty<V: Serialize>(value: &V) -> Result<String, String> {
	serde_json::to_string_pretty(value).map_err(|e| ApiError::from(e).to_string())
}

async fn ensure_model_loaded<T: HttpTransport>(api: &TextClassifierApi<T>) -> Result<(), String> {
	let health = api.health().await.map_err(|e| e.to_string())?;
	if health.model_loaded {
		Ok(())
	} else {
		Err(MODEL_NOT_LOADED.to_string())
	}
}

/// Perform `action` and render its outcome as pretty JSON, or an error line.
async fn run_action<T: HttpTransport>(
	api: &TextClassifierApi<T>,
	action: Action,
	input: &str,
) -> Result<String, String> {
	match action {
		Action::Health => pretty(&api.health().await.map_err(|e| e.to_string())?),
		Action::Categories => pretty(&api.categories().await.map_err(|e| e.to_string())?),
		Action::Classify => {
			let text = input.trim();
			if text.is_empty() {
				return Err(NOTHING_TO_CLASSIFY.to_string());
			}
			ensure_model_loaded(api).await?;
			pretty(&api.predict(text).await.map_err(|e| e.to_string())?)
		}
		Action::ClassifyBatch => {
			let texts = batch_lines(input);
			if texts.is_empty() {
				return Err(NOTHING_TO_CLASSIFY.to_string());
			}
			ensure_model_loaded(api).await?;
			pretty(&api.predict_batch(&texts).await.map_err(|e| e.to_string())?)
		}
	}
}

/// Manual console for the text classifier backend.
#[component]
pub fn Classifier() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let api = TextClassifierApi::new(config.classifier_url.clone());
	let input = RwSignal::new(String::new());
	let output = RwSignal::new(None::<Result<String, String>>);
	let busy = RwSignal::new(false);

	let run = move |action: Action| {
		let api = api.clone();
		let text = input.get_untracked();
		busy.set(true);
		spawn_local(async move {
			let result = run_action(&api, action, &text).await;
			if let Err(err) = &result {
				log::warn!("{} failed: {err}", action.label());
			}
			output.try_set(Some(result));
			busy.try_set(false);
		});
	};

	let button = move |action: Action| {
		let run = run.clone();
		view! {
			<button disabled=move || busy.get() on:click=move |_| run(action)>
				{action.label()}
			</button>
		}
	};

	view! {
		<div class="classifier">
			<h1>"Text classifier"</h1>
			<textarea
				rows="6"
				placeholder="Text to classify; one text per line for a batch"
				prop:value=move || input.get()
				on:input=move |ev| input.set(event_target_value(&ev))
			/>
			<div class="actions">
				{[Action::Health, Action::Categories, Action::Classify, Action::ClassifyBatch]
					.into_iter()
					.map(button)
					.collect_view()}
			</div>
			{move || {
				output
					.get()
					.map(|result| match result {
						Ok(json) => view! { <pre class="result">{json}</pre> }.into_any(),
						Err(err) => view! { <p class="error">{err}</p> }.into_any(),
					})
			}}
		</div>
	}
}
