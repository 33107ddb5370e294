//! Collapsible inventory tree visualization component.
//!
//! Renders an inventory (applications, instances, capabilities) as a
//! left-to-right tidy tree on an HTML canvas with:
//! - Click-to-toggle categories, keeping one open branch per level
//! - Animated re-centering on the clicked node
//! - Pan and zoom via mouse, wheel, pinch and on-screen buttons
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use inventory_tree::{Inventory, InventoryEntry, TreeDiagramCanvas};
//!
//! let data = Inventory {
//!     name: "Production".into(),
//!     applications: vec![InventoryEntry { name: "billing".into() }],
//!     instances: vec![],
//!     capabilities: vec![],
//! };
//!
//! view! { <TreeDiagramCanvas data=data fullscreen=true /> }
//! ```

mod component;
pub mod frame;
pub mod gesture;
pub mod hierarchy;
pub mod layout;
mod render;
pub mod scale;
pub mod state;
pub mod theme;
mod types;
pub mod viewport;
pub mod visibility;

pub use component::TreeDiagramCanvas;
pub use state::{DiagramConfig, TreeDiagramState};
pub use theme::Theme;
pub use types::{Inventory, InventoryEntry, LoadError};
