//! Cell compilation engine.
//!
//! This module is the internal entry point for turning one table cell into
//! tags. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! restriction productions ──┐
//! (rules/restrictions.rs)   │  Grammar::new                (grammar.rs)
//!                           └──────────┬──────────────
//!                                      │
//! cell ── split_clauses ───────────────┼─ one slice per top-level clause
//!         (parser.rs)                  │  (parenthesis depth tracked)
//!                                      v
//!                           Parser::parse (parser.rs)
//!                             - recursive descent per clause
//!                             - ordered productions, backtracking
//!                                      │  Clause
//!                                      v
//!                           fragment (tags.rs)
//!                             - exhaustive match on the clause tree
//!                                      │  Fragment
//!                                      v
//!                           TagAccumulator (combine.rs)
//!                             - ordered multimap, "; " join at the end
//!                                      │
//!                                      v
//!                                    Tags
//! ```
//!
//! ## Responsibilities by module
//!
//! - `grammar.rs`: the compiled, read-only grammar table (`Grammar`,
//!   `Production`). Built once per process by `api.rs`.
//! - `parser.rs`: top-level clause splitting and the per-clause parser.
//! - `tags.rs`: the closed tag key set (`TagKey`) and the tag generator.
//! - `combine.rs`: accumulation of fragments into the final tag set.
//!
//! ## Adding new restriction forms
//!
//! - Add a constructor to `clause::Restriction`.
//! - Add a `production!` to `rules/restrictions.rs`.
//! - The compiler then points at `tags::render_restriction`, whose match must
//!   cover the new constructor.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=speedtags=trace` to see production attempts and the
//! fragment of every clause.

#[path = "engine/combine.rs"]
mod combine;
#[path = "engine/grammar.rs"]
mod grammar;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/tags.rs"]
mod tags;

pub(crate) use combine::TagAccumulator;
pub(crate) use grammar::{Grammar, Production};
pub(crate) use parser::{ParsedClause, group, parse_cell};
pub use tags::TagKey;
pub(crate) use tags::{Fragment, fragment};
