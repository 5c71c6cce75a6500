use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FontError {
	#[error("no browser document")]
	NoDocument,
	#[error("invalid font source: {0}")]
	Source(String),
	#[error("{0}")]
	Load(String),
}

/// Proof that a font face is registered with the document. Label layout
/// depends on text metrics, so the scene can only be built with one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontHandle {
	family: String,
}

impl FontHandle {
	pub fn family(&self) -> &str {
		&self.family
	}

	/// CSS `font` shorthand at `px` pixels, with a generic fallback.
	pub fn css(&self, px: f64) -> String {
		format!("{:.1}px '{}', sans-serif", px, self.family)
	}

	#[cfg(test)]
	pub fn preloaded(family: &str) -> Self {
		Self {
			family: family.into(),
		}
	}
}

/// Download `url`, register it as `family` and wait until it is usable.
pub async fn load_font(family: &str, url: &str) -> Result<FontHandle, FontError> {
	use wasm_bindgen_futures::JsFuture;
	use web_sys::FontFace;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(FontError::NoDocument)?;
	let face = FontFace::new_with_str(family, &format!("url({url})"))
		.map_err(|e| FontError::Source(format!("{:?}", e)))?;
	let loading = face.load().map_err(|e| FontError::Load(format!("{:?}", e)))?;
	JsFuture::from(loading)
		.await
		.map_err(|e| FontError::Load(format!("{:?}", e)))?;
	let _ = document.fonts().add(&face);
	log::info!("font {family} loaded");

	Ok(FontHandle {
		family: family.into(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_shorthand_names_family_with_fallback() {
		let font = FontHandle::preloaded("NotoSansSC");
		assert_eq!(font.css(12.0), "12.0px 'NotoSansSC', sans-serif");
		assert_eq!(font.family(), "NotoSansSC");
	}
}
