//! inventory-tree: Interactive collapsible tree view of an inventory.
//!
//! This crate provides a WASM-based tree diagram component that renders an
//! inventory's applications, instances and capabilities as a tidy tree with
//! click-to-expand categories, animated focus, pan and zoom.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::tree_diagram::{
	DiagramConfig, Inventory, InventoryEntry, LoadError, Theme, TreeDiagramCanvas,
	TreeDiagramState,
};

/// Id of the script element carrying the inventory JSON.
pub const INVENTORY_ELEMENT_ID: &str = "inventory-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("inventory-tree: logging initialized");
}

/// Load the inventory from `<script id="inventory-data" type="application/json">`.
///
/// Expected format: `{ "name": ..., "applications": [{ "name": ... }],
/// "instances": [...], "capabilities": [...] }`.
pub fn load_inventory() -> Result<Inventory, LoadError> {
	let missing = || LoadError::MissingElement(INVENTORY_ELEMENT_ID.to_owned());
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(missing)?;
	let script: HtmlScriptElement = document
		.get_element_by_id(INVENTORY_ELEMENT_ID)
		.and_then(|el| el.dyn_into().ok())
		.ok_or_else(missing)?;
	let json_text = script.text().map_err(|_| missing())?;

	let inventory = Inventory::from_json(&json_text)?;
	info!(
		"inventory-tree: loaded {} applications, {} instances, {} capabilities",
		inventory.applications.len(),
		inventory.instances.len(),
		inventory.capabilities.len()
	);
	Ok(inventory)
}

/// Main application component.
/// Loads the inventory from the DOM and renders the tree, or a single error
/// message when the data is missing or malformed.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let body = match load_inventory() {
		Ok(inventory) => {
			let inventory_signal = Signal::derive(move || inventory.clone());
			view! { <TreeDiagramCanvas data=inventory_signal fullscreen=true /> }.into_any()
		}
		Err(e) => {
			warn!("inventory-tree: {}", e);
			view! { <p class="invalid-data">"Invalid inventory data"</p> }.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Inventory Tree" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-diagram">
			{body}
			<div class="diagram-overlay">
				<h1>"Inventory"</h1>
				<p class="subtitle">"Click a category to expand it. Scroll to pan, Ctrl+scroll or pinch to zoom."</p>
			</div>
		</div>
	}
}
