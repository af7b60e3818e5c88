//! Fixed catalog of colour palettes and the theme types built from them.

pub mod catalog;
pub mod types;

pub use catalog::{DEFAULT_PALETTE, PALETTE_NAMES, resolve_palette};
pub use types::{Palette, ResolvedTheme};
