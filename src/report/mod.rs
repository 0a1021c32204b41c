//! Report renderers for evaluated components.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//!
//! JSON output is the serialized [`ComponentLicense`](crate::models::ComponentLicense) rows.

pub mod terminal;
