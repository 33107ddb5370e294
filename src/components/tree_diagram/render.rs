//! Canvas rendering for the tree diagram.
//!
//! Draws a [`RenderFrame`] in two passes so nodes sit on top of links:
//! 1. Background (screen space)
//! 2. Links, then node circles and labels (world space, under the frame's
//!    transform)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::frame::{RenderEdge, RenderFrame, RenderNode};
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;

/// Paints `frame` onto a `width` x `height` canvas.
pub fn render(
	frame: &RenderFrame,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, frame.transform.k);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);

	ctx.set_stroke_style_str(&theme.edge.to_css());
	ctx.set_line_width(scale.edge_line_width);
	for edge in &frame.edges {
		draw_edge(ctx, edge);
	}

	ctx.set_font(&scale.label_font);
	for node in &frame.nodes {
		draw_node(ctx, node, &scale, theme);
	}

	ctx.restore();
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &RenderEdge) {
	let (c1, c2) = edge.control;
	ctx.begin_path();
	ctx.move_to(edge.source.x, edge.source.y);
	ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, edge.target.x, edge.target.y);
	ctx.stroke();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &RenderNode,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let (x, y) = (node.position.x, node.position.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, scale.node_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&theme.node.fill(node.state).to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.node.stroke.to_css());
	ctx.set_line_width(scale.node_stroke_width);
	ctx.stroke();

	let (dx, dy) = scale.label_offset;
	ctx.set_fill_style_str(&theme.node.label.to_css());
	let _ = ctx.fill_text(&node.label, x + dx, y + dy);
}
