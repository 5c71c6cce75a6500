//! Application settings.
//!
//! Defaults match the backends' stock ports. Base URLs and the label font can be
//! overridden at build time, e.g. `ENTITY_CLOUD_CHAT_URL=http://10.0.0.2:8001 trunk build`.

use std::time::Duration;

use crate::api::DEFAULT_CLASSIFIER_URL;

const DEFAULT_CHAT_URL: &str = "http://localhost:8001";
// Same origin; the dev server proxies `/ask` and `/api/*`.
const DEFAULT_KNOWLEDGE_URL: &str = "";
const DEFAULT_FONT_URL: &str =
	"https://fonts.gstatic.com/s/notosanssc/v20/5hjMip6lL1f3pYVv5KQ6OcJG9KoK4n3qjW21p2H4.woff2";

/// Everything the pages need to talk to their backends and lay out their views.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Text classifier service.
	pub classifier_url: String,
	/// Chat assistant service.
	pub chat_url: String,
	/// Knowledge-graph service (entities and `/ask`).
	pub knowledge_url: String,
	/// Label font.
	pub font: FontConfig,
	/// 3D entity cloud.
	pub cloud: CloudConfig,
	/// Knowledge-graph layout.
	pub physics: PhysicsConfig,
	/// Chat typewriter timing.
	pub reveal: RevealConfig,
}

/// Web font used for cloud labels.
#[derive(Clone, Debug, PartialEq)]
pub struct FontConfig {
	/// CSS family name the face is registered under.
	pub family: String,
	/// Font file URL.
	pub url: String,
}

/// Scene constants for the entity cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudConfig {
	/// Sphere radius in world units.
	pub radius: f64,
	/// Label height in world units.
	pub font_size: f64,
	/// Vertical field of view, degrees.
	pub fov_degrees: f64,
	/// Camera distance from the origin.
	pub camera_distance: f64,
	/// Points closer to the camera than this are not drawn.
	pub near: f64,
	/// Scene spin about Y, radians per frame.
	pub auto_rotate: f64,
	/// Fraction of pending orbit motion applied per frame.
	pub damping: f64,
	/// Orbit sensitivity.
	pub rotate_speed: f64,
	/// Label saturation (HSL).
	pub saturation: f64,
	/// Label lightness (HSL).
	pub lightness: f64,
}

impl Default for CloudConfig {
	fn default() -> Self {
		Self {
			radius: 14.0,
			font_size: 1.6,
			fov_degrees: 75.0,
			camera_distance: 25.0,
			near: 0.1,
			auto_rotate: 0.001,
			damping: 0.05,
			rotate_speed: 0.5,
			saturation: 0.8,
			lightness: 0.7,
		}
	}
}

/// Fixed physics of the knowledge-graph layout.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
	/// Preferred edge length.
	pub node_distance: f64,
	/// Node repulsion.
	pub repulsion_strength: f64,
	/// Simulation steps run before the first frame.
	pub stabilization_iterations: u32,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			node_distance: 140.0,
			repulsion_strength: 1000.0,
			stabilization_iterations: 180,
		}
	}
}

/// Typewriter timing for chat answers.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
	/// Per-character delay for short answers.
	pub short_interval: Duration,
	/// Per-character delay for long answers.
	pub long_interval: Duration,
	/// Answers longer than this many characters count as long.
	pub long_threshold: usize,
}

impl Default for RevealConfig {
	fn default() -> Self {
		Self {
			short_interval: Duration::from_millis(20),
			long_interval: Duration::from_millis(35),
			long_threshold: 120,
		}
	}
}

impl RevealConfig {
	/// Delay between characters for an answer of `len` characters.
	pub fn interval_for(&self, len: usize) -> Duration {
		if len > self.long_threshold {
			self.long_interval
		} else {
			self.short_interval
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			classifier_url: DEFAULT_CLASSIFIER_URL.into(),
			chat_url: DEFAULT_CHAT_URL.into(),
			knowledge_url: DEFAULT_KNOWLEDGE_URL.into(),
			font: FontConfig {
				family: "NotoSansSC".into(),
				url: DEFAULT_FONT_URL.into(),
			},
			cloud: CloudConfig::default(),
			physics: PhysicsConfig::default(),
			reveal: RevealConfig::default(),
		}
	}
}

impl AppConfig {
	/// Defaults with build-time overrides applied.
	pub fn from_build_env() -> Self {
		Self::with_overrides(
			option_env!("ENTITY_CLOUD_CLASSIFIER_URL"),
			option_env!("ENTITY_CLOUD_CHAT_URL"),
			option_env!("ENTITY_CLOUD_KNOWLEDGE_URL"),
			option_env!("ENTITY_CLOUD_FONT_URL"),
		)
	}

	fn with_overrides(
		classifier_url: Option<&str>,
		chat_url: Option<&str>,
		knowledge_url: Option<&str>,
		font_url: Option<&str>,
	) -> Self {
		let mut config = Self::default();
		if let Some(url) = classifier_url {
			config.classifier_url = trim_base(url);
		}
		if let Some(url) = chat_url {
			config.chat_url = trim_base(url);
		}
		if let Some(url) = knowledge_url {
			config.knowledge_url = trim_base(url);
		}
		if let Some(url) = font_url {
			config.font.url = url.to_string();
		}
		config
	}
}

// Endpoints start with '/', so a trailing slash on the base would double it.
fn trim_base(url: &str) -> String {
	url.trim().trim_end_matches('/').to_string()
}
