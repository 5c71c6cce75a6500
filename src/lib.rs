//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Only needed for its `js` feature, which lets `rand` seed itself in the browser.
#[cfg(target_arch = "wasm32")]
use getrandom as _;

// Modules
pub mod api;
pub mod config;
mod components;
mod pages;

// Top-Level pages
use crate::config::AppConfig;
use crate::pages::chat::Chat;
use crate::pages::classifier::Classifier;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router with the entity cloud, the chat assistant and the classifier console
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(AppConfig::from_build_env());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Entity Cloud" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<nav class="top-nav">
				<A href="/">"Entities"</A>
				<A href="/chat">"Chat"</A>
				<A href="/classify">"Classifier"</A>
			</nav>
			<ErrorBoundary fallback=|errors| {
				view! {
					<h1>"Uh oh! Something went wrong!"</h1>

					<p>"Errors: "</p>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				}
			}>
				<main>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Home />
						<Route path=path!("/chat") view=Chat />
						<Route path=path!("/classify") view=Classifier />
					</Routes>
				</main>
			</ErrorBoundary>
		</Router>
	}
}
