//! Leptos component wrapping the tree diagram canvas.
//!
//! The component creates an HTML canvas plus zoom/reset buttons and wires DOM
//! events into [`TreeDiagramState`]. An animation loop runs via
//! `requestAnimationFrame`, advancing viewport transitions and repainting each
//! frame. All handlers borrow the shared state for the whole event, so a
//! toggle and its re-layout land together.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::gesture::{DeltaMode, GestureEvent, GestureKind, Modifiers};
use super::layout::Point;
use super::render;
use super::scale::ScaleConfig;
use super::state::{DiagramConfig, TreeDiagramState};
use super::theme::Theme;
use super::types::Inventory;

/// Pointer travel (px) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 3.0;
/// Longest frame step fed to the viewport, so a backgrounded tab does not
/// skip a whole transition in one frame.
const MAX_FRAME_MS: f64 = 100.0;

/// Press/drag bookkeeping for mouse and single-finger touch.
#[derive(Clone, Debug, Default)]
struct PointerState {
	down_at: Option<Point>,
	moved: bool,
}

/// Bundles diagram state with visual configuration and input bookkeeping.
struct DiagramContext {
	state: TreeDiagramState,
	scale: ScaleConfig,
	theme: Theme,
	pointer: PointerState,
	/// Finger distance at the previous pinch event.
	pinch_distance: Option<f64>,
	last_frame: Option<f64>,
}

type SharedContext = Rc<RefCell<Option<DiagramContext>>>;

fn with_context(context: &SharedContext, f: impl FnOnce(&mut DiagramContext)) {
	if let Some(ref mut c) = *context.borrow_mut() {
		f(c);
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Client coordinates to canvas pixel coordinates.
fn surface_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Point {
	let rect = canvas.get_bounding_client_rect();
	let sx = if rect.width() > 0.0 {
		canvas.width() as f64 / rect.width()
	} else {
		1.0
	};
	let sy = if rect.height() > 0.0 {
		canvas.height() as f64 / rect.height()
	} else {
		1.0
	};
	Point::new(
		(client_x as f64 - rect.left()) * sx,
		(client_y as f64 - rect.top()) * sy,
	)
}

/// Canvas points of the first two touches, if at least two are down.
fn two_touches(canvas: &HtmlCanvasElement, ev: &TouchEvent) -> Option<(Point, Point)> {
	let touches = ev.touches();
	let a = touches.get(0)?;
	let b = touches.get(1)?;
	Some((
		surface_point(canvas, a.client_x(), a.client_y()),
		surface_point(canvas, b.client_x(), b.client_y()),
	))
}

fn single_touch(canvas: &HtmlCanvasElement, ev: &TouchEvent) -> Option<Point> {
	let touch = ev.touches().get(0)?;
	Some(surface_point(canvas, touch.client_x(), touch.client_y()))
}

impl DiagramContext {
	fn press(&mut self, at: Point) {
		self.pointer = PointerState {
			down_at: Some(at),
			moved: false,
		};
		self.state
			.apply_gesture(&GestureEvent::drag(GestureKind::DragStart, at));
	}

	fn drag_to(&mut self, at: Point) {
		let Some(down_at) = self.pointer.down_at else {
			return;
		};
		let (dx, dy) = (at.x - down_at.x, at.y - down_at.y);
		if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			self.pointer.moved = true;
		}
		if self.pointer.moved {
			self.state
				.apply_gesture(&GestureEvent::drag(GestureKind::DragMove, at));
		}
	}

	/// Finish a press; a release without movement is a node click.
	fn release(&mut self, at: Point) {
		let pointer = std::mem::take(&mut self.pointer);
		self.state
			.apply_gesture(&GestureEvent::drag(GestureKind::DragEnd, at));
		if pointer.down_at.is_some() && !pointer.moved {
			if let Some(node) = self.state.node_at_position(at, &self.scale) {
				self.state.click(node);
			}
		}
	}

	fn cancel(&mut self, at: Point) {
		self.pointer = PointerState::default();
		self.pinch_distance = None;
		self.state
			.apply_gesture(&GestureEvent::drag(GestureKind::DragEnd, at));
	}
}

/// Renders an interactive inventory tree on a canvas element.
///
/// Pass the inventory via the reactive `data` signal. The canvas sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and follow window resizes. Explicit `width`/`height` override
/// automatic sizing.
#[component]
pub fn TreeDiagramCanvas(
	#[prop(into)] data: Signal<Inventory>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let defaults = DiagramConfig::default();
		let parent_size = |measure: fn(&web_sys::Element) -> i32, fallback: f64| {
			canvas
				.parent_element()
				.map(|p| measure(&p) as f64)
				.filter(|size| *size > 0.0)
				.unwrap_or(fallback)
		};
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((defaults.viewport.width, defaults.viewport.height))
		} else {
			(
				width.unwrap_or_else(|| {
					parent_size(web_sys::Element::client_width, defaults.viewport.width)
				}),
				height.unwrap_or_else(|| {
					parent_size(web_sys::Element::client_height, defaults.viewport.height)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("inventory-tree: canvas has no 2d context");
			return;
		};

		let mut config = defaults;
		config.viewport.width = w;
		config.viewport.height = h;
		let inventory = data.get_untracked();
		let state = TreeDiagramState::new(&inventory, config);
		info!(
			"inventory-tree: mounted {}x{} diagram, {} nodes ({} visible)",
			w,
			h,
			state.model().len(),
			state.visible().len()
		);

		*context_init.borrow_mut() = Some(DiagramContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			pointer: PointerState::default(),
			pinch_distance: None,
			last_frame: None,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_context(&context_resize, |c| c.state.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				if let Err(e) =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				{
					warn!("inventory-tree: resize listener not registered: {e:?}");
				}
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			with_context(&context_anim, |c| {
				let dt = c
					.last_frame
					.map_or(0.0, |last| (timestamp - last).clamp(0.0, MAX_FRAME_MS));
				c.last_frame = Some(timestamp);
				c.state.tick(dt);

				let bounds = c.state.viewport().bounds();
				render::render(
					&c.state.frame(),
					&ctx,
					bounds.width,
					bounds.height,
					&c.scale,
					&c.theme,
				);
			});
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				warn!("inventory-tree: animation loop not started: {e:?}");
			}
		}
	});

	let canvas_point = move |client_x: i32, client_y: i32| {
		canvas_ref.get().map(|canvas| {
			let canvas: HtmlCanvasElement = canvas.into();
			surface_point(&canvas, client_x, client_y)
		})
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = canvas_point(ev.client_x(), ev.client_y()) else {
			return;
		};
		with_context(&context_md, |c| c.press(at));
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = canvas_point(ev.client_x(), ev.client_y()) else {
			return;
		};
		with_context(&context_mm, |c| c.drag_to(at));
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(at) = canvas_point(ev.client_x(), ev.client_y()) else {
			return;
		};
		with_context(&context_mu, |c| c.release(at));
	};

	let context_ml = context.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let at = canvas_point(ev.client_x(), ev.client_y()).unwrap_or_default();
		with_context(&context_ml, |c| c.cancel(at));
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = canvas_point(ev.client_x(), ev.client_y()) else {
			return;
		};
		let event = GestureEvent {
			kind: GestureKind::Wheel {
				delta_x: ev.delta_x(),
				delta_y: ev.delta_y(),
				mode: DeltaMode::from_dom(ev.delta_mode()),
			},
			origin: at,
			modifiers: Modifiers {
				ctrl: ev.ctrl_key(),
				meta: ev.meta_key(),
			},
		};
		with_context(&context_wh, |c| {
			c.state.apply_gesture(&event);
		});
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		with_context(&context_ts, |c| {
			if let Some((a, b)) = two_touches(&canvas, &ev) {
				// A second finger turns the press into a pinch.
				c.cancel(a);
				c.pinch_distance = Some(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt());
			} else if let Some(at) = single_touch(&canvas, &ev) {
				c.press(at);
			}
		});
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		with_context(&context_tm, |c| {
			if let Some((a, b)) = two_touches(&canvas, &ev) {
				let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
				if let Some(previous) = c.pinch_distance.filter(|d| *d > 0.0) {
					let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
					c.state
						.apply_gesture(&GestureEvent::pinch(mid, distance / previous));
				}
				c.pinch_distance = Some(distance);
			} else if let Some(at) = single_touch(&canvas, &ev) {
				c.drag_to(at);
			}
		});
	};

	let context_te = context.clone();
	let on_touchend = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let released = ev.changed_touches().get(0);
		with_context(&context_te, |c| {
			if c.pinch_distance.take().is_some() {
				c.cancel(Point::default());
				return;
			}
			let at = released
				.map(|t| surface_point(&canvas, t.client_x(), t.client_y()))
				.or(c.pointer.down_at)
				.unwrap_or_default();
			c.release(at);
		});
	};

	let context_zi = context.clone();
	let on_zoom_in = move |_: MouseEvent| with_context(&context_zi, |c| c.state.zoom_in());
	let context_zo = context.clone();
	let on_zoom_out = move |_: MouseEvent| with_context(&context_zo, |c| c.state.zoom_out());
	let context_rs = context.clone();
	let on_reset = move |_: MouseEvent| with_context(&context_rs, |c| c.state.reset_view());

	view! {
		<div class="tree-diagram">
			<canvas
				node_ref=canvas_ref
				class="tree-diagram-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<div class="tree-diagram-controls">
				<button on:click=on_zoom_in>"Zoom in"</button>
				<button on:click=on_zoom_out>"Zoom out"</button>
				<button on:click=on_reset>"Reset"</button>
			</div>
		</div>
	}
}
