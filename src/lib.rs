//! Sample-drawer maps.
//!
//! Reads an inventory of frozen samples, each stored at a `(drawer, position)`
//! address, normalizes its free-text organism, disease and tissue fields
//! against an ordered taxonomy, and draws one page per drawer showing which
//! slots are empty, occupied or claimed twice.
//!
//! The pipeline is [`render_inventory`]; its pieces are public for callers that
//! only need part of it.

pub mod config;
pub mod errors;
pub mod inventory;
pub mod layout;
pub mod log;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod slot;
pub mod taxonomy;
pub mod types;

pub use config::Config;
pub use errors::ConfigError;
pub use inventory::{DrawerPlan, Inventory, SlotConflict, plan_drawer};
pub use normalize::normalize;
pub use pipeline::{RenderOptions, RenderedPage, Rendering, render_inventory};
pub use render::{Page, PageHeader, build_page, to_svg};
pub use slot::{RowLetters, SlotAddress, resolve_slot};
pub use taxonomy::Taxonomy;
pub use types::{NormalizedRecord, Record, SampleDate};
