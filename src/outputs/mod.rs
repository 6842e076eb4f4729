//! Output generation for the panel.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders the panel (heading, tagged articles, placeholder)
//! - [`json`]: Writes a snapshot of each completed fetch for other tools

pub mod json;
pub mod markdown;
