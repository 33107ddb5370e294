//! Inventory input records and load errors.

use serde::Deserialize;
use thiserror::Error;

/// A single named entry in one of the inventory lists.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InventoryEntry {
	/// Display name.
	pub name: String,
}

/// Inventory document as provided by the host page.
///
/// All three lists are required. A document missing any of them is rejected
/// at load time rather than rendered partially.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Inventory {
	/// Display name of the root node.
	pub name: String,
	/// Entries shown under "Applications".
	pub applications: Vec<InventoryEntry>,
	/// Entries shown under "Instances".
	pub instances: Vec<InventoryEntry>,
	/// Entries shown under "Capabilities".
	pub capabilities: Vec<InventoryEntry>,
}

/// Why an inventory document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The host page has no element with the expected id.
	#[error("no inventory data element with id `{0}`")]
	MissingElement(String),

	/// The element text is not a valid inventory document.
	#[error("invalid inventory data: {0}")]
	Parse(#[from] serde_json::Error),
}

impl Inventory {
	/// Parse an inventory document from JSON text.
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		Ok(serde_json::from_str(text)?)
	}
}
