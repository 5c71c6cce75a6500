use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::KnowledgeApi;
use crate::components::entity_graph::{EntityGraphPanel, GraphView, ask_about};
use crate::components::word_cloud::{CloudLabel, FontHandle, WordCloudCanvas, build_labels, load_font};
use crate::config::AppConfig;

#[derive(Clone, Debug, PartialEq)]
enum CloudInit {
	Loading,
	Ready { font: FontHandle, labels: Vec<CloudLabel> },
	Failed(String),
}

/// Font first, then entity names, then labels. A font failure stops here.
async fn prepare_cloud(config: &AppConfig, api: &KnowledgeApi) -> CloudInit {
	let font = match load_font(&config.font.family, &config.font.url).await {
		Ok(font) => font,
		Err(err) => {
			log::error!("font loading failed: {err}");
			return CloudInit::Failed(format!("Font loading failed: {err}"));
		}
	};
	let names = api.load_entities().await;
	let cloud = &config.cloud;
	let labels = build_labels(
		&names,
		cloud.radius,
		cloud.saturation,
		cloud.lightness,
		&mut rand::thread_rng(),
	);
	CloudInit::Ready { font, labels }
}

/// Entity cloud with the knowledge-graph panel beside it.
#[component]
pub fn Home() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let api = KnowledgeApi::new(config.knowledge_url.clone());
	let query = RwSignal::new(GraphView::default());
	let init = RwSignal::new(CloudInit::Loading);

	{
		let (config, api) = (config.clone(), api.clone());
		spawn_local(async move {
			let ready = prepare_cloud(&config, &api).await;
			init.try_set(ready);
		});
	}

	let on_select = Callback::new(move |entity: String| ask_about(entity, query, api.clone()));
	let notice = Signal::derive(move || match init.get() {
		CloudInit::Failed(message) => Some(message),
		_ => None,
	});

	let cloud_config = config.cloud.clone();
	let cloud = move || match init.get() {
		CloudInit::Ready { font, labels } => view! {
			<WordCloudCanvas labels=labels font=font config=cloud_config.clone() on_select=on_select />
		}
		.into_any(),
		CloudInit::Loading => view! { <p class="cloud-status">"Loading entities..."</p> }.into_any(),
		CloudInit::Failed(_) => ().into_any(),
	};

	view! {
		<div class="home">
			<div class="cloud-area">{cloud}</div>
			<EntityGraphPanel query=query physics=config.physics.clone() notice=notice />
		</div>
	}
}
