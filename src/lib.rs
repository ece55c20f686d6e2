//! Compiler from the speed-limit cell notation of the OSM default speed
//! limits tables to OpenStreetMap tags.
//!
//! ```
//! use speedtags::parse_speeds;
//!
//! let tags = parse_speeds("100, min: 60").unwrap();
//! assert_eq!(tags["maxspeed"], "100");
//! assert_eq!(tags["minspeed"], "60");
//! ```
//!
//! A cell is split into top-level clauses, every clause is parsed into a
//! [`clause::Clause`] tree, every tree is rendered into a tag fragment, and the
//! fragments are merged into one [`Tags`] map. See `src/engine.rs` for the
//! pipeline and [`table`] for ingesting whole tables.

#[macro_use]
mod macros;
mod api;
pub mod clause;
mod engine;
mod error;
mod rules;
pub mod table;

pub use api::{
    ClauseSummary, Options, ParseDetails, Tags, parse_speeds, parse_speeds_verbose_with, parse_speeds_with,
    productions,
};
pub use engine::TagKey;
pub use error::{Result, SpeedError};
