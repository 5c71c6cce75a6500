use leptos::prelude::*;

use crate::components::chat::ChatPanel;

/// Chat assistant page
#[component]
pub fn Chat() -> impl IntoView {
	view! {
		<div class="chat-page">
			<h1>"Assistant"</h1>
			<ChatPanel />
		</div>
	}
}
