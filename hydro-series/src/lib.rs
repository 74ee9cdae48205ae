//! Series types and text adapters for hourly hydrograph disaggregation.
//!
//! The daily and peaks readers follow the DSS text convention: a fixed
//! 7-line header carrying pathname parts, units and type, followed by one
//! whitespace-separated record per line.

pub mod daily;
pub mod diagnostics;
pub mod error;
pub mod header;
pub mod hydrograph;
pub mod output;
pub mod peak;
