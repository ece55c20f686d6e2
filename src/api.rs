use crate::engine::{self, Fragment, Grammar, ParsedClause, TagAccumulator};
use crate::error::Result;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| Grammar::new(crate::rules::restrictions::get()));

/// Tags produced for one cell, keyed by tag key.
pub type Tags = BTreeMap<String, String>;

/// Options that bound the work done for a single cell.
///
/// Well-formed cells stay far below the defaults; the limits exist so that a
/// hostile or corrupted cell is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Longest accepted cell, in bytes.
    pub max_input_len: usize,
    /// Deepest accepted parenthesis nesting.
    pub max_nesting: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_input_len: 512, max_nesting: 4 }
    }
}

/// A compact summary of one compiled clause, used in verbose traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSummary {
    /// Source text of the clause.
    pub text: String,
    /// Name of the production that matched the clause.
    pub production: String,
    /// Tags contributed by this clause alone, in production order.
    pub fragment: Vec<(String, String)>,
}

/// Result of [`parse_speeds_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// The compiled cell text.
    pub text: String,
    /// One entry per top-level clause, in order.
    pub clauses: Vec<ClauseSummary>,
    /// The combined tags (same as [`parse_speeds_with`] returns).
    pub tags: Tags,
    /// Total elapsed time spent parsing + generating.
    pub elapsed: Duration,
}

/// Compile one cell into tags using the default [`Options`].
///
/// # Example
/// ```
/// use speedtags::parse_speeds;
///
/// let tags = parse_speeds("60mph, 40 mph (2t)").unwrap();
/// assert_eq!(tags["maxspeed"], "60 mph");
/// assert_eq!(tags["maxspeed:conditional"], "40 mph @ (weightrating>2)");
/// ```
pub fn parse_speeds(text: &str) -> Result<Tags> {
    parse_speeds_with(text, &Options::default())
}

/// Compile one cell into tags.
///
/// Either every clause compiles and the full tag set is returned, or the
/// first error is returned and nothing else.
pub fn parse_speeds_with(text: &str, options: &Options) -> Result<Tags> {
    let mut tags = TagAccumulator::default();
    for (_, fragment) in compile(text, options)? {
        tags.extend(fragment);
    }
    Ok(tags.into_tags())
}

/// Compile one cell and return per-clause details alongside the tags.
///
/// This is meant for debugging cells. The default [`parse_speeds_with`] path
/// does not allocate these summaries.
pub fn parse_speeds_verbose_with(text: &str, options: &Options) -> Result<ParseDetails> {
    let started = Instant::now();
    let compiled = compile(text, options)?;

    let mut tags = TagAccumulator::default();
    let mut clauses = Vec::with_capacity(compiled.len());
    for (parsed, fragment) in compiled {
        clauses.push(ClauseSummary {
            text: parsed.text.to_string(),
            production: parsed.clause.production().to_string(),
            fragment: fragment.iter().map(|(k, v)| (k.as_str().to_string(), v.clone())).collect(),
        });
        tags.extend(fragment);
    }

    Ok(ParseDetails { text: text.to_string(), clauses, tags: tags.into_tags(), elapsed: started.elapsed() })
}

/// Names of the restriction productions, in the order they are tried.
pub fn productions() -> Vec<&'static str> {
    let mut names = vec!["date_time"];
    names.extend(GRAMMAR.production_names());
    names
}

fn compile<'a>(text: &'a str, options: &Options) -> Result<Vec<(ParsedClause<'a>, Fragment)>> {
    engine::parse_cell(&GRAMMAR, text, options)?
        .into_iter()
        .map(|parsed| -> Result<(ParsedClause<'a>, Fragment)> {
            let fragment = engine::fragment(&parsed.clause)?;
            debug!(clause = parsed.text, production = parsed.clause.production(), ?fragment, "compiled clause");
            Ok((parsed, fragment))
        })
        .collect()
}
