//! Raw user gestures and the filter that decides what each one may do.
//!
//! Filtering is a single table lookup on `(kind, modifier, origin in bounds)`
//! evaluated once per event; see [`classify`].

use super::layout::Point;

/// Unit of a wheel delta, mirroring `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
	/// Deltas in pixels.
	#[default]
	Pixel,
	/// Deltas in lines.
	Line,
	/// Deltas in pages.
	Page,
}

impl DeltaMode {
	/// Map a DOM `deltaMode` value; unknown values read as pixels.
	pub fn from_dom(mode: u32) -> Self {
		match mode {
			1 => DeltaMode::Line,
			2 => DeltaMode::Page,
			_ => DeltaMode::Pixel,
		}
	}
}

/// Modifier keys held during a gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Control key.
	pub ctrl: bool,
	/// Command key on macOS.
	pub meta: bool,
}

impl Modifiers {
	/// No modifier held.
	pub const NONE: Self = Self {
		ctrl: false,
		meta: false,
	};
	/// Only ctrl held.
	pub const CTRL: Self = Self {
		ctrl: true,
		meta: false,
	};

	/// Whether a zoom modifier (ctrl or cmd) is held.
	pub fn zoom(self) -> bool {
		self.ctrl || self.meta
	}
}

/// What physically happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureKind {
	/// Scroll wheel or trackpad scroll. Browsers report trackpad pinches as a
	/// wheel with `ctrl` held.
	Wheel {
		/// Horizontal delta; positive scrolls right.
		delta_x: f64,
		/// Vertical delta; positive scrolls down.
		delta_y: f64,
		/// Unit of both deltas.
		mode: DeltaMode,
	},
	/// Two-finger pinch.
	Pinch {
		/// Finger distance ratio since the previous pinch event.
		scale: f64,
	},
	/// Pointer pressed.
	DragStart,
	/// Pointer moved while pressed.
	DragMove,
	/// Pointer released or left the surface.
	DragEnd,
}

/// A single user input event in surface (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
	/// What happened.
	pub kind: GestureKind,
	/// Where it happened, in surface pixels.
	pub origin: Point,
	/// Keys held at the time.
	pub modifiers: Modifiers,
}

impl GestureEvent {
	/// Vertical pixel-mode wheel event.
	pub fn wheel(origin: Point, delta_y: f64, modifiers: Modifiers) -> Self {
		Self {
			kind: GestureKind::Wheel {
				delta_x: 0.0,
				delta_y,
				mode: DeltaMode::Pixel,
			},
			origin,
			modifiers,
		}
	}

	/// Pinch around `origin` by `scale`.
	pub fn pinch(origin: Point, scale: f64) -> Self {
		Self {
			kind: GestureKind::Pinch { scale },
			origin,
			modifiers: Modifiers::NONE,
		}
	}

	/// Drag event of `kind` at `origin`.
	pub fn drag(kind: GestureKind, origin: Point) -> Self {
		Self {
			kind,
			origin,
			modifiers: Modifiers::NONE,
		}
	}
}

/// What the viewport should do with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureAction {
	/// Change scale around the event origin.
	Zoom,
	/// Scroll the diagram vertically; scale is never touched.
	ScrollPan,
	/// Start or continue a drag pan.
	DragPan,
	/// Finish the current drag.
	End,
	/// Ignore the event.
	Reject,
}

/// Rectangular bounds of the drawing surface, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBounds {
	/// Surface width.
	pub width: f64,
	/// Surface height.
	pub height: f64,
}

impl SurfaceBounds {
	/// Whether `point` lies on the surface, edges included.
	pub fn contains(&self, point: Point) -> bool {
		(0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
	}

	/// Middle of the surface.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum KindClass {
	Wheel,
	Pinch,
	DragStart,
	DragMove,
	DragEnd,
}

impl KindClass {
	fn of(kind: &GestureKind) -> Self {
		match kind {
			GestureKind::Wheel { .. } => KindClass::Wheel,
			GestureKind::Pinch { .. } => KindClass::Pinch,
			GestureKind::DragStart => KindClass::DragStart,
			GestureKind::DragMove => KindClass::DragMove,
			GestureKind::DragEnd => KindClass::DragEnd,
		}
	}
}

/// `None` in a column matches either value.
struct Rule {
	kind: KindClass,
	zoom_modifier: Option<bool>,
	in_bounds: Option<bool>,
	action: GestureAction,
}

/// First matching rule wins; anything unmatched is rejected.
const RULES: &[Rule] = &[
	Rule {
		kind: KindClass::DragEnd,
		zoom_modifier: None,
		in_bounds: None,
		action: GestureAction::End,
	},
	Rule {
		kind: KindClass::Wheel,
		zoom_modifier: Some(true),
		in_bounds: Some(true),
		action: GestureAction::Zoom,
	},
	Rule {
		kind: KindClass::Wheel,
		zoom_modifier: Some(false),
		in_bounds: Some(true),
		action: GestureAction::ScrollPan,
	},
	Rule {
		kind: KindClass::Pinch,
		zoom_modifier: None,
		in_bounds: Some(true),
		action: GestureAction::Zoom,
	},
	Rule {
		kind: KindClass::DragStart,
		zoom_modifier: None,
		in_bounds: Some(true),
		action: GestureAction::DragPan,
	},
	Rule {
		kind: KindClass::DragMove,
		zoom_modifier: None,
		in_bounds: Some(true),
		action: GestureAction::DragPan,
	},
];

/// Decide how the viewport treats `event` on a surface of `bounds`.
pub fn classify(event: &GestureEvent, bounds: SurfaceBounds) -> GestureAction {
	let kind = KindClass::of(&event.kind);
	let zoom_modifier = event.modifiers.zoom();
	let in_bounds = bounds.contains(event.origin);

	RULES
		.iter()
		.find(|rule| {
			rule.kind == kind
				&& rule.zoom_modifier.is_none_or(|m| m == zoom_modifier)
				&& rule.in_bounds.is_none_or(|b| b == in_bounds)
		})
		.map_or(GestureAction::Reject, |rule| rule.action)
}

/// Zoom exponent for a wheel delta: the new scale is `k * 2^exponent`.
///
/// A held ctrl key (trackpad pinch) makes the wheel ten times more sensitive.
pub fn wheel_zoom_exponent(delta_y: f64, mode: DeltaMode, modifiers: Modifiers) -> f64 {
	let unit = match mode {
		DeltaMode::Pixel => 0.002,
		DeltaMode::Line => 0.05,
		DeltaMode::Page => 1.0,
	};
	let boost = if modifiers.ctrl { 10.0 } else { 1.0 };
	-delta_y * unit * boost
}

/// Wheel delta converted to screen pixels.
pub fn wheel_pixels(delta: f64, mode: DeltaMode, page_height: f64) -> f64 {
	match mode {
		DeltaMode::Pixel => delta,
		DeltaMode::Line => delta * 16.0,
		DeltaMode::Page => delta * page_height,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	const BOUNDS: SurfaceBounds = SurfaceBounds {
		width: 1600.0,
		height: 800.0,
	};
	const INSIDE: Point = Point::new(100.0, 100.0);
	const OUTSIDE: Point = Point::new(-5.0, 100.0);

	#[rstest]
	#[case(GestureEvent::wheel(INSIDE, 120.0, Modifiers::CTRL), GestureAction::Zoom)]
	#[case(
		GestureEvent::wheel(INSIDE, 120.0, Modifiers { ctrl: false, meta: true }),
		GestureAction::Zoom
	)]
	#[case(GestureEvent::wheel(INSIDE, 120.0, Modifiers::NONE), GestureAction::ScrollPan)]
	#[case(GestureEvent::wheel(OUTSIDE, 120.0, Modifiers::CTRL), GestureAction::Reject)]
	#[case(GestureEvent::wheel(OUTSIDE, 120.0, Modifiers::NONE), GestureAction::Reject)]
	#[case(GestureEvent::pinch(INSIDE, 1.1), GestureAction::Zoom)]
	#[case(GestureEvent::pinch(OUTSIDE, 1.1), GestureAction::Reject)]
	#[case(GestureEvent::drag(GestureKind::DragStart, INSIDE), GestureAction::DragPan)]
	#[case(GestureEvent::drag(GestureKind::DragStart, OUTSIDE), GestureAction::Reject)]
	#[case(GestureEvent::drag(GestureKind::DragMove, INSIDE), GestureAction::DragPan)]
	#[case(GestureEvent::drag(GestureKind::DragEnd, OUTSIDE), GestureAction::End)]
	fn classifies_events(#[case] event: GestureEvent, #[case] expected: GestureAction) {
		assert_eq!(classify(&event, BOUNDS), expected);
	}

	#[test]
	fn bounds_include_edges() {
		assert!(BOUNDS.contains(Point::new(0.0, 0.0)));
		assert!(BOUNDS.contains(Point::new(1600.0, 800.0)));
		assert!(!BOUNDS.contains(Point::new(1600.5, 10.0)));
	}

	#[rstest]
	#[case(DeltaMode::Pixel, Modifiers::NONE, -0.2)]
	#[case(DeltaMode::Pixel, Modifiers::CTRL, -2.0)]
	#[case(DeltaMode::Line, Modifiers::NONE, -5.0)]
	fn wheel_exponent_follows_delta_mode(
		#[case] mode: DeltaMode,
		#[case] modifiers: Modifiers,
		#[case] expected: f64,
	) {
		let exponent = wheel_zoom_exponent(100.0, mode, modifiers);
		assert!((exponent - expected).abs() < 1e-12, "got {exponent}");
	}

	#[test]
	fn delta_mode_from_dom_defaults_to_pixels() {
		assert_eq!(DeltaMode::from_dom(0), DeltaMode::Pixel);
		assert_eq!(DeltaMode::from_dom(1), DeltaMode::Line);
		assert_eq!(DeltaMode::from_dom(2), DeltaMode::Page);
		assert_eq!(DeltaMode::from_dom(7), DeltaMode::Pixel);
	}
}
