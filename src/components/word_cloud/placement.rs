//! Spiral placement of labels on a sphere.
//!
//! Index `i` of `n` sits at polar angle `acos(-1 + 2i/n)` and azimuth
//! `sqrt(n·π)·phi`, which spreads the labels at roughly equal area.

use rand::Rng;

/// A point in scene space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Point3 {
	pub fn length(&self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}
}

/// One entity name placed in the cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudLabel {
	pub text: String,
	pub position: Point3,
	/// CSS `#rrggbb`.
	pub color: String,
}

/// Position of label `i` out of `n` on a sphere of `radius`.
///
/// `i` must be below `n`; `n == 1` yields the pole at `-z`.
pub fn sphere_point(i: usize, n: usize, radius: f64) -> Point3 {
	debug_assert!(i < n, "label index {i} out of range for {n} labels");
	let n = n as f64;
	let phi = (-1.0 + 2.0 * i as f64 / n).clamp(-1.0, 1.0).acos();
	let theta = (n * std::f64::consts::PI).sqrt() * phi;
	Point3 {
		x: radius * theta.cos() * phi.sin(),
		y: radius * theta.sin() * phi.sin(),
		z: radius * phi.cos(),
	}
}

/// Place every name in order and give each a random hue.
pub fn build_labels<R: Rng + ?Sized>(
	names: &[String],
	radius: f64,
	saturation: f64,
	lightness: f64,
	rng: &mut R,
) -> Vec<CloudLabel> {
	names
		.iter()
		.enumerate()
		.map(|(i, name)| CloudLabel {
			text: name.clone(),
			position: sphere_point(i, names.len(), radius),
			color: hsl_to_hex(rng.gen_range(0.0..1.0), saturation, lightness),
		})
		.collect()
}

/// HSL (all components in `0..=1`) to `#rrggbb`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
	let (r, g, b) = hsl_to_rgb(h, s, l);
	let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
	format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
	if s <= 0.0 {
		return (l, l, l);
	}
	let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
	let p = 2.0 * l - q;
	(
		hue_to_rgb(p, q, h + 1.0 / 3.0),
		hue_to_rgb(p, q, h),
		hue_to_rgb(p, q, h - 1.0 / 3.0),
	)
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
	let t = t.rem_euclid(1.0);
	if t < 1.0 / 6.0 {
		p + (q - p) * 6.0 * t
	} else if t < 0.5 {
		q
	} else if t < 2.0 / 3.0 {
		p + (q - p) * 6.0 * (2.0 / 3.0 - t)
	} else {
		p
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	const EPS: f64 = 1e-9;

	fn names(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("entity {i}")).collect()
	}

	#[test]
	fn every_point_is_on_the_sphere() {
		for n in [1, 2, 3, 10, 97, 500] {
			for i in 0..n {
				let p = sphere_point(i, n, 14.0);
				assert!((p.length() - 14.0).abs() < EPS, "n={n} i={i} |p|={}", p.length());
			}
		}
	}

	#[test]
	fn points_are_distinct() {
		for n in [2, 5, 64, 300] {
			let points: Vec<Point3> = (0..n).map(|i| sphere_point(i, n, 14.0)).collect();
			for a in 0..n {
				for b in (a + 1)..n {
					let (p, q) = (points[a], points[b]);
					let d = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2) + (p.z - q.z).powi(2)).sqrt();
					assert!(d > 1e-6, "n={n}: {a} and {b} coincide");
				}
			}
		}
	}

	#[test]
	fn single_label_is_finite_and_at_the_pole() {
		let p = sphere_point(0, 1, 14.0);
		assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
		assert!((p.z + 14.0).abs() < EPS);
		assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
	}

	#[test]
	fn placement_is_deterministic() {
		assert_eq!(sphere_point(3, 10, 5.0), sphere_point(3, 10, 5.0));
	}

	#[test]
	fn no_names_no_labels() {
		let mut rng = StdRng::seed_from_u64(1);
		assert!(build_labels(&[], 14.0, 0.8, 0.7, &mut rng).is_empty());
	}

	#[test]
	fn labels_keep_order_and_seeded_colors_repeat() {
		let names = names(12);
		let a = build_labels(&names, 14.0, 0.8, 0.7, &mut StdRng::seed_from_u64(7));
		let b = build_labels(&names, 14.0, 0.8, 0.7, &mut StdRng::seed_from_u64(7));

		assert_eq!(a, b);
		for (i, label) in a.iter().enumerate() {
			assert_eq!(label.text, names[i]);
			assert_eq!(label.position, sphere_point(i, 12, 14.0));
			assert_eq!(label.color.len(), 7);
			assert!(label.color.starts_with('#'));
		}
	}

	#[test]
	fn hsl_matches_known_colors() {
		assert_eq!(hsl_to_hex(0.0, 1.0, 0.5), "#ff0000");
		assert_eq!(hsl_to_hex(1.0 / 3.0, 1.0, 0.5), "#00ff00");
		assert_eq!(hsl_to_hex(0.5, 0.0, 0.5), "#808080");
		// s = 0.8, l = 0.7: brightest channel 0.94, dimmest 0.46
		assert_eq!(hsl_to_hex(0.0, 0.8, 0.7), "#f07575");
	}
}
