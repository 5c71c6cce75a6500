use web_sys::CanvasRenderingContext2d;

use super::font::FontHandle;
use super::state::WordCloudState;

pub fn render(state: &WordCloudState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for p in state.projected() {
		let label = &state.labels[p.index];
		let px = state.font_px(&p);
		if px < 1.0 {
			continue;
		}
		ctx.set_global_alpha(state.depth_alpha(&p));
		ctx.set_font(&state.font.css(px));
		ctx.set_fill_style_str(&label.color);
		let _ = ctx.fill_text(&label.text, p.x, p.y);

		if state.hover == Some(p.index) {
			if let Some(b) = state.hit_boxes.iter().find(|b| b.index == p.index) {
				ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
				ctx.set_line_width(1.0);
				ctx.stroke_rect(b.left - 4.0, b.top - 2.0, b.right - b.left + 8.0, b.bottom - b.top + 4.0);
			}
		}
	}
	ctx.set_global_alpha(1.0);
}

/// Text width in pixels as the canvas will draw it.
pub fn measure(ctx: &CanvasRenderingContext2d, font: &FontHandle, text: &str, px: f64) -> f64 {
	ctx.set_font(&font.css(px));
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(px * text.chars().count() as f64)
}
