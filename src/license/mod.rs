//! License trees and everything computed from them.
//!
//! - [`definition`] — the [`LicenseNode`](definition::LicenseNode) tree and its JSON mapping.
//! - [`render`] — display expressions (`(MIT OR Apache-2.0)`, `UNKNOWN`) and the
//!   shared reduction that prunes unresolved licenses.
//! - [`classifier`] — risk level of a tree, folded with the same reduction.
//! - [`spdx`] — SPDX identifier risk table and knowledge-base name normalization.

pub mod classifier;
pub mod definition;
pub mod render;
pub mod spdx;
