//! The compiled grammar table.
//!
//! Clause structure (speeds, lanes, restriction groups, schedules) is encoded
//! directly in `parser.rs`. The restriction leaves are data: an ordered list of
//! `Production`s, each an anchored pattern plus a builder for the clause tree
//! node it stands for.
//!
//! ## Invariants
//!
//! - Every pattern is anchored with `^` and is matched against the remaining
//!   clause text, never searched.
//! - Productions are tried in declaration order. A match only counts when it
//!   is followed by the end of the restriction (`,` or `)`), so an earlier,
//!   shorter production cannot shadow a longer one (`2t` vs `2t trailer`).
//! - The table is immutable once built; all patterns are compiled lazily and
//!   shared process-wide.

use crate::clause::Restriction;
use regex::{Captures, Regex};

/// Builds the clause tree node from the captures of a matched production.
pub(crate) type Build = fn(&Captures<'_>) -> Restriction;

/// A restriction production: a name, an anchored pattern and a builder.
pub(crate) struct Production {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub build: Build,
}

impl std::fmt::Debug for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Production")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("build", &"<function>")
            .finish()
    }
}

#[derive(Debug)]
pub(crate) struct Grammar {
    pub restrictions: Vec<Production>,
}

impl Grammar {
    pub fn new(restrictions: Vec<Production>) -> Self {
        Grammar { restrictions }
    }

    /// Names of all restriction productions in the order they are tried.
    pub fn production_names(&self) -> Vec<&'static str> {
        self.restrictions.iter().map(|p| p.name).collect()
    }
}
