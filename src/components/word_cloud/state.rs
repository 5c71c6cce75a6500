use std::f64::consts::PI;

use super::font::FontHandle;
use super::placement::{CloudLabel, Point3};
use crate::config::CloudConfig;

// Keep the orbit off the poles so "up" stays defined.
const MAX_PITCH: f64 = PI / 2.0 - 0.01;
const MIN_DISTANCE: f64 = 5.0;
const MAX_DISTANCE: f64 = 80.0;
/// Pointer travel, in pixels, below which a press/release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Orbit controls around the origin with damped motion.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
	pub distance: f64,
	pub yaw: f64,
	pub pitch: f64,
	pending_yaw: f64,
	pending_pitch: f64,
	damping: f64,
	rotate_speed: f64,
	fov: f64,
	near: f64,
}

impl OrbitCamera {
	pub fn new(config: &CloudConfig) -> Self {
		Self {
			distance: config.camera_distance,
			yaw: 0.0,
			pitch: 0.0,
			pending_yaw: 0.0,
			pending_pitch: 0.0,
			damping: config.damping,
			rotate_speed: config.rotate_speed,
			fov: config.fov_degrees.to_radians(),
			near: config.near,
		}
	}

	/// Queue an orbit for a pointer drag of `(dx, dy)` pixels; a drag across
	/// the full viewport height turns `2π · rotate_speed`.
	pub fn drag(&mut self, dx: f64, dy: f64, viewport_height: f64) {
		let per_px = 2.0 * PI * self.rotate_speed / viewport_height.max(1.0);
		self.pending_yaw -= dx * per_px;
		self.pending_pitch += dy * per_px;
	}

	pub fn zoom(&mut self, factor: f64) {
		self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	}

	/// Apply a damped share of the queued motion.
	pub fn update(&mut self) {
		self.yaw += self.pending_yaw * self.damping;
		self.pitch = (self.pitch + self.pending_pitch * self.damping).clamp(-MAX_PITCH, MAX_PITCH);
		self.pending_yaw *= 1.0 - self.damping;
		self.pending_pitch *= 1.0 - self.damping;
	}

	/// World to camera space; the camera looks down -z from `(0, 0, distance)`.
	fn to_view(&self, p: Point3) -> Point3 {
		let (sy, cy) = self.yaw.sin_cos();
		let (x1, z1) = (p.x * cy - p.z * sy, p.x * sy + p.z * cy);
		let (sp, cp) = self.pitch.sin_cos();
		Point3 {
			x: x1,
			y: p.y * cp - z1 * sp,
			z: p.y * sp + z1 * cp,
		}
	}

	/// Pixels per world unit at unit depth for a viewport `height` tall.
	fn focal(&self, height: f64) -> f64 {
		(height / 2.0) / (self.fov / 2.0).tan()
	}
}

/// A label as it lands on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitBox {
	pub index: usize,
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub depth: f64,
}

impl HitBox {
	fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
	}
}

#[derive(Clone, Debug, Default)]
pub struct PointerDrag {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

impl PointerDrag {
	pub fn is_click(&self, x: f64, y: f64) -> bool {
		(x - self.start_x).hypot(y - self.start_y) < CLICK_SLOP
	}
}

/// The entity cloud scene: labels, camera and pointer state.
pub struct WordCloudState {
	pub labels: Vec<CloudLabel>,
	pub font: FontHandle,
	pub camera: OrbitCamera,
	/// Scene spin about Y.
	pub rotation: f64,
	pub hover: Option<usize>,
	pub hit_boxes: Vec<HitBox>,
	pub drag: PointerDrag,
	pub width: f64,
	pub height: f64,
	auto_rotate: f64,
	font_size: f64,
	radius: f64,
}

impl WordCloudState {
	/// Labels are only accepted together with a loaded font.
	pub fn new(
		labels: Vec<CloudLabel>,
		font: FontHandle,
		config: &CloudConfig,
		width: f64,
		height: f64,
	) -> Self {
		Self {
			labels,
			font,
			camera: OrbitCamera::new(config),
			rotation: 0.0,
			hover: None,
			hit_boxes: Vec::new(),
			drag: PointerDrag::default(),
			width,
			height,
			auto_rotate: config.auto_rotate,
			font_size: config.font_size,
			radius: config.radius,
		}
	}

	pub fn tick(&mut self) {
		self.rotation += self.auto_rotate;
		self.camera.update();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn project(&self, index: usize, p: Point3) -> Option<Projected> {
		let (s, c) = self.rotation.sin_cos();
		let spun = Point3 {
			x: p.x * c + p.z * s,
			y: p.y,
			z: -p.x * s + p.z * c,
		};
		let v = self.camera.to_view(spun);
		let depth = self.camera.distance - v.z;
		if depth < self.camera.near {
			return None;
		}
		let scale = self.camera.focal(self.height) / depth;
		Some(Projected {
			index,
			x: self.width / 2.0 + v.x * scale,
			y: self.height / 2.0 - v.y * scale,
			depth,
			scale,
		})
	}

	/// Visible labels, farthest first.
	pub fn projected(&self) -> Vec<Projected> {
		let mut out: Vec<Projected> = self
			.labels
			.iter()
			.enumerate()
			.filter_map(|(i, l)| self.project(i, l.position))
			.collect();
		out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
		out
	}

	/// On-screen text height of a label.
	pub fn font_px(&self, p: &Projected) -> f64 {
		self.font_size * p.scale
	}

	/// Opacity by depth: labels on the near side of the sphere are opaque,
	/// the far side fades to 0.35.
	pub fn depth_alpha(&self, p: &Projected) -> f64 {
		let near = self.camera.distance - self.radius;
		let span = (2.0 * self.radius).max(f64::EPSILON);
		1.0 - 0.65 * ((p.depth - near) / span).clamp(0.0, 1.0)
	}

	/// Recompute click targets; `measure` gives the text width in pixels at a
	/// given font size.
	pub fn layout_hit_boxes(&mut self, mut measure: impl FnMut(&str, f64) -> f64) {
		let boxes = self
			.projected()
			.into_iter()
			.map(|p| {
				let px = self.font_px(&p);
				let half_w = measure(&self.labels[p.index].text, px) / 2.0;
				HitBox {
					index: p.index,
					left: p.x - half_w,
					right: p.x + half_w,
					top: p.y - px / 2.0,
					bottom: p.y + px / 2.0,
					depth: p.depth,
				}
			})
			.collect();
		self.hit_boxes = boxes;
	}

	/// Nearest label under a screen point.
	pub fn label_at(&self, x: f64, y: f64) -> Option<usize> {
		self.hit_boxes
			.iter()
			.filter(|b| b.contains(x, y))
			.min_by(|a, b| a.depth.total_cmp(&b.depth))
			.map(|b| b.index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::word_cloud::placement::sphere_point;

	fn label(text: &str, position: Point3) -> CloudLabel {
		CloudLabel {
			text: text.into(),
			position,
			color: "#ffffff".into(),
		}
	}

	fn scene(labels: Vec<CloudLabel>) -> WordCloudState {
		WordCloudState::new(
			labels,
			FontHandle::preloaded("NotoSansSC"),
			&CloudConfig::default(),
			800.0,
			600.0,
		)
	}

	fn approx_width(text: &str, px: f64) -> f64 {
		text.chars().count() as f64 * px * 0.6
	}

	#[test]
	fn origin_projects_to_viewport_center() {
		let s = scene(vec![label("o", Point3::default())]);
		let p = s.projected()[0];
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 25.0).abs() < 1e-9);
	}

	#[test]
	fn projection_sorts_far_to_near() {
		let s = scene(vec![
			label("front", Point3 { x: 0.0, y: 0.0, z: 14.0 }),
			label("back", Point3 { x: 0.0, y: 0.0, z: -14.0 }),
		]);
		let order: Vec<usize> = s.projected().iter().map(|p| p.index).collect();
		assert_eq!(order, vec![1, 0]);
	}

	#[test]
	fn near_side_is_opaque_far_side_fades() {
		let s = scene(vec![
			label("front", Point3 { x: 0.0, y: 0.0, z: 14.0 }),
			label("back", Point3 { x: 0.0, y: 0.0, z: -14.0 }),
		]);
		let projected = s.projected();
		let (back, front) = (projected[0], projected[1]);
		assert!((s.depth_alpha(&front) - 1.0).abs() < 1e-9);
		assert!((s.depth_alpha(&back) - 0.35).abs() < 1e-9);
		assert!(s.font_px(&front) > s.font_px(&back));
	}

	#[test]
	fn points_behind_the_camera_are_culled() {
		let s = scene(vec![label("behind", Point3 { x: 0.0, y: 0.0, z: 30.0 })]);
		assert!(s.projected().is_empty());
	}

	#[test]
	fn click_hits_nearest_overlapping_label() {
		let mut s = scene(vec![
			label("far", Point3 { x: 0.0, y: 0.0, z: -14.0 }),
			label("near", Point3 { x: 0.0, y: 0.0, z: 14.0 }),
		]);
		s.layout_hit_boxes(approx_width);

		assert_eq!(s.label_at(400.0, 300.0), Some(1));
		assert_eq!(s.label_at(5.0, 5.0), None);
	}

	#[test]
	fn auto_rotation_moves_labels() {
		let mut s = scene(vec![label("a", sphere_point(0, 4, 14.0)), label("b", sphere_point(2, 4, 14.0))]);
		let before = s.projected();
		for _ in 0..100 {
			s.tick();
		}
		assert!((s.rotation - 0.1).abs() < 1e-9);
		assert_ne!(before, s.projected());
	}

	#[test]
	fn orbit_motion_is_damped_and_pitch_clamped() {
		let mut camera = OrbitCamera::new(&CloudConfig::default());
		camera.drag(100.0, 0.0, 600.0);
		camera.update();
		let first = camera.yaw;
		camera.update();
		let second = camera.yaw - first;
		assert!(first < 0.0);
		assert!(second.abs() < first.abs());

		camera.drag(0.0, 1.0e6, 600.0);
		for _ in 0..200 {
			camera.update();
		}
		assert!(camera.pitch <= MAX_PITCH);
	}

	#[test]
	fn zoom_is_bounded() {
		let mut camera = OrbitCamera::new(&CloudConfig::default());
		camera.zoom(100.0);
		assert_eq!(camera.distance, MAX_DISTANCE);
		camera.zoom(0.0001);
		assert_eq!(camera.distance, MIN_DISTANCE);
	}

	#[test]
	fn small_pointer_travel_is_a_click() {
		let drag = PointerDrag {
			active: true,
			start_x: 10.0,
			start_y: 10.0,
			..Default::default()
		};
		assert!(drag.is_click(12.0, 11.0));
		assert!(!drag.is_click(30.0, 10.0));
	}
}
