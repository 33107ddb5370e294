//! Camera state for the diagram: the pan/zoom transform and how it changes.
//!
//! The viewport is a small state machine. User gestures move it into
//! [`ViewportMode::Gesturing`]; programmatic focus, reset and zoom requests
//! start a timed [`Transition`] that is advanced by [`Viewport::tick`]. A new
//! programmatic request replaces the active transition's target, starting
//! from wherever the camera currently is, so the most recent request always
//! wins. Any user gesture interrupts a running transition.

use log::debug;

use super::gesture::{
	GestureAction, GestureEvent, GestureKind, SurfaceBounds, classify, wheel_pixels,
	wheel_zoom_exponent,
};
use super::layout::Point;

/// Pan and zoom transform applied to the whole drawing.
///
/// A world point `p` is drawn at `p * k + (x, y)` on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in pixels.
	pub x: f64,
	/// Vertical translation in pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl ViewTransform {
	/// No pan, scale 1.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Surface position of a world point.
	pub fn apply(&self, world: Point) -> Point {
		Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
	}

	/// World position of a surface point.
	pub fn invert(&self, screen: Point) -> Point {
		Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	fn lerp(from: Self, to: Self, t: f64) -> Self {
		Self {
			x: from.x + (to.x - from.x) * t,
			y: from.y + (to.y - from.y) * t,
			k: from.k + (to.k - from.k) * t,
		}
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// Viewport size, scale limits and animation timings.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportConfig {
	/// Surface width in pixels.
	pub width: f64,
	/// Surface height in pixels.
	pub height: f64,
	/// Inclusive `(min, max)` range for `k`.
	pub scale_extent: (f64, f64),
	/// Duration of a focus animation.
	pub focus_duration_ms: f64,
	/// Duration of a reset animation.
	pub reset_duration_ms: f64,
	/// Duration of a button zoom.
	pub zoom_duration_ms: f64,
	/// Quiet time after the last wheel event before the gesture ends.
	pub wheel_idle_ms: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			width: 1600.0,
			height: 800.0,
			scale_extent: (0.5, 3.0),
			focus_duration_ms: 750.0,
			reset_duration_ms: 750.0,
			zoom_duration_ms: 250.0,
			wheel_idle_ms: 150.0,
		}
	}
}

/// A programmatic, timed move from one transform to another.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	/// Transform at the start.
	pub from: ViewTransform,
	/// Transform at the end.
	pub to: ViewTransform,
	/// Time spent so far.
	pub elapsed_ms: f64,
	/// Total time.
	pub duration_ms: f64,
}

impl Transition {
	fn progress(&self) -> f64 {
		(self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
	}
}

/// An in-progress user gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureSession {
	/// Pointer drag.
	Drag {
		/// Previous pointer position.
		last: Point,
	},
	/// Wheel and pinch events have no explicit end; the session closes after
	/// `remaining_ms` without further input.
	Wheel {
		/// Quiet time left before the session ends.
		remaining_ms: f64,
	},
}

/// What is currently driving the transform.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportMode {
	/// Nothing; the transform is at rest.
	Idle,
	/// A user gesture is in progress.
	Gesturing(GestureSession),
	/// A programmatic animation is running.
	Transition(Transition),
}

/// Owner of the current [`ViewTransform`].
#[derive(Clone, Debug)]
pub struct Viewport {
	config: ViewportConfig,
	transform: ViewTransform,
	home: Point,
	mode: ViewportMode,
}

impl Viewport {
	/// Create a viewport showing `home` centered at scale 1.
	pub fn new(config: ViewportConfig, home: Point) -> Self {
		let mut viewport = Self {
			config,
			transform: ViewTransform::IDENTITY,
			home,
			mode: ViewportMode::Idle,
		};
		viewport.transform = viewport.home_transform();
		viewport
	}

	/// Current transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Current mode.
	pub fn mode(&self) -> &ViewportMode {
		&self.mode
	}

	/// Surface rectangle gestures must start in.
	pub fn bounds(&self) -> SurfaceBounds {
		SurfaceBounds {
			width: self.config.width,
			height: self.config.height,
		}
	}

	/// Whether a programmatic transition is running.
	pub fn is_animating(&self) -> bool {
		matches!(self.mode, ViewportMode::Transition(_))
	}

	/// Move the home point, e.g. after a re-layout shifted the home node.
	pub fn set_home(&mut self, home: Point) {
		self.home = home;
	}

	/// Transform that centers the home point at scale 1.
	pub fn home_transform(&self) -> ViewTransform {
		self.centered_on(self.home)
	}

	/// Track a new surface size. The transform is left as is.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.config.width = width;
		self.config.height = height;
	}

	/// Transform at scale 1 that draws `point` at the surface center.
	pub fn centered_on(&self, point: Point) -> ViewTransform {
		let center = self.bounds().center();
		ViewTransform {
			x: center.x - point.x,
			y: center.y - point.y,
			k: 1.0,
		}
	}

	/// Animate so that `point` ends up centered at scale 1.
	pub fn focus_on(&mut self, point: Point, duration_ms: f64) {
		let target = self.centered_on(point);
		self.transition_to(target, duration_ms);
	}

	/// Animate back to the home transform.
	pub fn reset(&mut self) {
		let target = self.home_transform();
		self.transition_to(target, self.config.reset_duration_ms);
	}

	/// Scale by `factor` around the surface center, clamped and animated.
	///
	/// Consecutive calls compound: the base is the target of a running
	/// transition, not the half-way transform.
	pub fn zoom_by(&mut self, factor: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			debug!("ignoring zoom factor {factor}");
			return;
		}
		let base = match &self.mode {
			ViewportMode::Transition(transition) => transition.to,
			_ => self.transform,
		};
		let target = self.zoomed_around(base, self.bounds().center(), base.k * factor);
		self.transition_to(target, self.config.zoom_duration_ms);
	}

	/// Start (or supersede) a transition from the current transform.
	pub fn transition_to(&mut self, target: ViewTransform, duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.transform = target;
			self.mode = ViewportMode::Idle;
			return;
		}
		self.mode = ViewportMode::Transition(Transition {
			from: self.transform,
			to: target,
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Run `event` through the gesture filter and apply it.
	pub fn apply_gesture(&mut self, event: &GestureEvent) -> GestureAction {
		let action = classify(event, self.bounds());
		match action {
			GestureAction::Reject => {
				debug!("rejected gesture {:?} at {:?}", event.kind, event.origin);
			}
			GestureAction::Zoom => {
				let factor = match event.kind {
					GestureKind::Wheel { delta_y, mode, .. } => {
						2f64.powf(wheel_zoom_exponent(delta_y, mode, event.modifiers))
					}
					GestureKind::Pinch { scale } => scale,
					_ => 1.0,
				};
				// Overflow to infinity or zero is fine, the scale clamp absorbs it.
				if factor.is_nan() || factor < 0.0 {
					return GestureAction::Reject;
				}
				self.transform =
					self.zoomed_around(self.transform, event.origin, self.transform.k * factor);
				self.enter_wheel_session();
			}
			GestureAction::ScrollPan => {
				if let GestureKind::Wheel { delta_y, mode, .. } = event.kind {
					self.transform.y -= wheel_pixels(delta_y, mode, self.config.height);
				}
				self.enter_wheel_session();
			}
			GestureAction::DragPan => match event.kind {
				GestureKind::DragStart => {
					self.mode = ViewportMode::Gesturing(GestureSession::Drag { last: event.origin });
				}
				GestureKind::DragMove => {
					let ViewportMode::Gesturing(GestureSession::Drag { last }) = &mut self.mode else {
						return GestureAction::Reject;
					};
					self.transform.x += event.origin.x - last.x;
					self.transform.y += event.origin.y - last.y;
					*last = event.origin;
				}
				_ => return GestureAction::Reject,
			},
			GestureAction::End => {
				if matches!(self.mode, ViewportMode::Gesturing(GestureSession::Drag { .. })) {
					self.mode = ViewportMode::Idle;
				}
			}
		}
		action
	}

	/// Advance time by `dt_ms`. Returns whether the transform moved.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		match &mut self.mode {
			ViewportMode::Idle | ViewportMode::Gesturing(GestureSession::Drag { .. }) => false,
			ViewportMode::Gesturing(GestureSession::Wheel { remaining_ms }) => {
				*remaining_ms -= dt_ms;
				if *remaining_ms <= 0.0 {
					self.mode = ViewportMode::Idle;
				}
				false
			}
			ViewportMode::Transition(transition) => {
				transition.elapsed_ms += dt_ms;
				let t = transition.progress();
				if t >= 1.0 {
					self.transform = transition.to;
					self.mode = ViewportMode::Idle;
				} else {
					self.transform = ViewTransform::lerp(transition.from, transition.to, ease_cubic_in_out(t));
				}
				true
			}
		}
	}

	/// Drive any running transition to completion.
	pub fn finish(&mut self) {
		if let ViewportMode::Transition(transition) = &self.mode {
			self.transform = transition.to;
			self.mode = ViewportMode::Idle;
		}
	}

	fn clamp_scale(&self, k: f64) -> f64 {
		let (min, max) = self.config.scale_extent;
		k.clamp(min, max)
	}

	/// `base` rescaled to `k` (clamped) keeping `anchor` fixed on screen.
	fn zoomed_around(&self, base: ViewTransform, anchor: Point, k: f64) -> ViewTransform {
		let k = self.clamp_scale(k);
		let world = base.invert(anchor);
		ViewTransform {
			x: anchor.x - world.x * k,
			y: anchor.y - world.y * k,
			k,
		}
	}

	fn enter_wheel_session(&mut self) {
		if matches!(self.mode, ViewportMode::Gesturing(GestureSession::Drag { .. })) {
			return;
		}
		self.mode = ViewportMode::Gesturing(GestureSession::Wheel {
			remaining_ms: self.config.wheel_idle_ms,
		});
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::super::gesture::{DeltaMode, Modifiers};
	use super::*;

	fn viewport() -> Viewport {
		Viewport::new(ViewportConfig::default(), Point::new(0.0, 0.0))
	}

	fn run(viewport: &mut Viewport) {
		for _ in 0..200 {
			viewport.tick(16.0);
		}
	}

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
	}

	#[test]
	fn starts_centered_on_home() {
		let viewport = viewport();
		assert_eq!(viewport.transform(), ViewTransform { x: 800.0, y: 400.0, k: 1.0 });
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn immediate_focus_centers_point() {
		let mut viewport = viewport();
		let target = Point::new(400.0, -50.0);

		viewport.focus_on(target, 0.0);

		assert_eq!(viewport.transform().apply(target), Point::new(800.0, 400.0));
		assert!(!viewport.is_animating());
	}

	#[test]
	fn animated_focus_moves_gradually() {
		let mut viewport = viewport();
		let start = viewport.transform();
		let target = Point::new(200.0, 50.0);

		viewport.focus_on(target, 750.0);
		assert_eq!(viewport.transform(), start);
		assert!(viewport.tick(300.0));
		let midway = viewport.transform();
		assert!(midway.x < start.x && midway.x > start.x - 200.0);

		run(&mut viewport);
		assert_eq!(viewport.transform().apply(target), Point::new(800.0, 400.0));
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn new_focus_supersedes_running_transition() {
		let mut viewport = viewport();
		viewport.focus_on(Point::new(1000.0, 0.0), 750.0);
		viewport.tick(375.0);
		let halfway = viewport.transform();

		viewport.focus_on(Point::new(0.0, 500.0), 750.0);

		match viewport.mode() {
			ViewportMode::Transition(transition) => assert_eq!(transition.from, halfway),
			other => panic!("expected transition, got {other:?}"),
		}
		run(&mut viewport);
		assert_eq!(viewport.transform(), viewport.centered_on(Point::new(0.0, 500.0)));
	}

	#[test]
	fn reset_twice_equals_reset_once() {
		let mut once = viewport();
		once.focus_on(Point::new(600.0, 150.0), 0.0);
		once.zoom_by(2.0);
		once.finish();
		let mut twice = once.clone();

		once.reset();
		run(&mut once);
		twice.reset();
		twice.tick(100.0);
		twice.reset();
		run(&mut twice);

		assert_eq!(once.transform(), twice.transform());
		assert_eq!(once.transform(), once.home_transform());
	}

	#[rstest]
	#[case(10.0, 3.0)]
	#[case(0.01, 0.5)]
	#[case(1.2, 1.2f64.powi(5))]
	fn zoom_by_clamps_scale(#[case] factor: f64, #[case] expected: f64) {
		let mut viewport = viewport();
		for _ in 0..5 {
			viewport.zoom_by(factor);
			run(&mut viewport);
			let k = viewport.transform().k;
			assert!((0.5..=3.0).contains(&k), "k escaped range: {k}");
		}
		assert!((viewport.transform().k - expected).abs() < 1e-9);
	}

	#[test]
	fn zoom_by_keeps_center_fixed() {
		let mut viewport = viewport();
		viewport.focus_on(Point::new(300.0, 120.0), 0.0);
		let center = viewport.bounds().center();
		let before = viewport.transform().invert(center);

		viewport.zoom_by(1.2);
		viewport.finish();

		assert!(close(viewport.transform().invert(center), before));
	}

	#[test]
	fn rapid_zoom_compounds_on_pending_target() {
		let mut viewport = viewport();
		viewport.zoom_by(1.2);
		viewport.tick(50.0);
		viewport.zoom_by(1.2);
		viewport.finish();

		assert!((viewport.transform().k - 1.44).abs() < 1e-12);
	}

	#[rstest]
	#[case(0.0)]
	#[case(-2.0)]
	#[case(f64::NAN)]
	#[case(f64::INFINITY)]
	fn zoom_by_ignores_invalid_factor(#[case] factor: f64) {
		let mut viewport = viewport();
		viewport.zoom_by(factor);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
		assert_eq!(viewport.transform().k, 1.0);
	}

	#[test]
	fn plain_scroll_never_changes_scale() {
		let mut viewport = viewport();
		viewport.zoom_by(1.7);
		viewport.finish();
		let k = viewport.transform().k;
		let y = viewport.transform().y;

		for delta in [5.0, -300.0, 1e9, -1e12, 0.25] {
			let action = viewport.apply_gesture(&GestureEvent::wheel(
				Point::new(10.0, 10.0),
				delta,
				Modifiers::NONE,
			));
			assert_eq!(action, GestureAction::ScrollPan);
		}

		assert_eq!(viewport.transform().k.to_bits(), k.to_bits());
		assert_ne!(viewport.transform().y, y);
	}

	#[test]
	fn scroll_pans_vertically_only() {
		let mut viewport = viewport();
		let before = viewport.transform();

		viewport.apply_gesture(&GestureEvent::wheel(Point::new(10.0, 10.0), 40.0, Modifiers::NONE));

		assert_eq!(viewport.transform().x, before.x);
		assert_eq!(viewport.transform().y, before.y - 40.0);
	}

	#[rstest]
	#[case(DeltaMode::Pixel, 30.0, 30.0)]
	#[case(DeltaMode::Line, 3.0, 48.0)]
	#[case(DeltaMode::Page, 1.0, 800.0)]
	#[case(DeltaMode::Page, -0.5, -400.0)]
	fn scroll_converts_delta_mode_to_pixels(
		#[case] mode: DeltaMode,
		#[case] delta_y: f64,
		#[case] expected_pixels: f64,
	) {
		let mut viewport = viewport();
		viewport.zoom_by(1.3);
		viewport.finish();
		let before = viewport.transform();
		let event = GestureEvent {
			kind: GestureKind::Wheel {
				delta_x: 7.0,
				delta_y,
				mode,
			},
			origin: Point::new(10.0, 10.0),
			modifiers: Modifiers::NONE,
		};

		assert_eq!(viewport.apply_gesture(&event), GestureAction::ScrollPan);

		let after = viewport.transform();
		assert_eq!(after.y, before.y - expected_pixels);
		assert_eq!(after.x.to_bits(), before.x.to_bits());
		assert_eq!(after.k.to_bits(), before.k.to_bits());
	}

	#[rstest]
	#[case(f64::NAN)]
	#[case(-1.5)]
	fn pinch_with_invalid_scale_is_rejected(#[case] scale: f64) {
		let mut viewport = viewport();
		let before = viewport.transform();

		let action = viewport.apply_gesture(&GestureEvent::pinch(Point::new(50.0, 50.0), scale));

		assert_eq!(action, GestureAction::Reject);
		assert_eq!(viewport.transform(), before);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn modified_wheel_zooms_around_cursor() {
		let mut viewport = viewport();
		let cursor = Point::new(1200.0, 300.0);
		let under_cursor = viewport.transform().invert(cursor);

		viewport.apply_gesture(&GestureEvent::wheel(cursor, -50.0, Modifiers::CTRL));

		assert!(viewport.transform().k > 1.0);
		assert!(close(viewport.transform().invert(cursor), under_cursor));
	}

	#[test]
	fn gesture_zoom_is_clamped() {
		let mut viewport = viewport();
		let cursor = Point::new(100.0, 100.0);
		for _ in 0..50 {
			viewport.apply_gesture(&GestureEvent::wheel(cursor, -1e6, Modifiers::CTRL));
		}
		assert_eq!(viewport.transform().k, 3.0);

		for _ in 0..50 {
			viewport.apply_gesture(&GestureEvent::pinch(cursor, 0.01));
		}
		assert_eq!(viewport.transform().k, 0.5);
	}

	#[test]
	fn out_of_bounds_gesture_is_ignored() {
		let mut viewport = viewport();
		let before = viewport.transform();

		let action =
			viewport.apply_gesture(&GestureEvent::wheel(Point::new(1700.0, 10.0), 100.0, Modifiers::CTRL));

		assert_eq!(action, GestureAction::Reject);
		assert_eq!(viewport.transform(), before);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn gesture_interrupts_transition() {
		let mut viewport = viewport();
		viewport.focus_on(Point::new(500.0, 500.0), 750.0);
		viewport.tick(100.0);

		viewport.apply_gesture(&GestureEvent::wheel(Point::new(10.0, 10.0), 10.0, Modifiers::NONE));

		assert!(!viewport.is_animating());
		let after = viewport.transform();
		run(&mut viewport);
		assert_eq!(viewport.transform(), after);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn drag_pans_both_axes() {
		let mut viewport = viewport();
		let before = viewport.transform();

		viewport.apply_gesture(&GestureEvent::drag(GestureKind::DragStart, Point::new(100.0, 100.0)));
		viewport.apply_gesture(&GestureEvent::drag(GestureKind::DragMove, Point::new(130.0, 90.0)));
		viewport.apply_gesture(&GestureEvent::drag(GestureKind::DragMove, Point::new(140.0, 80.0)));
		viewport.apply_gesture(&GestureEvent::drag(GestureKind::DragEnd, Point::new(140.0, 80.0)));

		assert_eq!(viewport.transform().x, before.x + 40.0);
		assert_eq!(viewport.transform().y, before.y - 20.0);
		assert_eq!(viewport.transform().k, before.k);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn drag_move_without_start_is_rejected() {
		let mut viewport = viewport();
		let action =
			viewport.apply_gesture(&GestureEvent::drag(GestureKind::DragMove, Point::new(10.0, 10.0)));
		assert_eq!(action, GestureAction::Reject);
	}

	#[test]
	fn wheel_session_ends_after_idle_time() {
		let mut viewport = viewport();
		viewport.apply_gesture(&GestureEvent::wheel(Point::new(10.0, 10.0), 10.0, Modifiers::NONE));
		assert!(matches!(viewport.mode(), ViewportMode::Gesturing(GestureSession::Wheel { .. })));

		viewport.tick(100.0);
		assert!(matches!(viewport.mode(), ViewportMode::Gesturing(_)));
		viewport.tick(60.0);
		assert_eq!(viewport.mode(), &ViewportMode::Idle);
	}

	#[test]
	fn easing_hits_endpoints() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(0.5), 0.5);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
	}
}
