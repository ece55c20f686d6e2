//! Clause splitting and per-clause parsing.
//!
//! A cell is parsed in two steps:
//!
//! ```text
//! "60mph, 40 mph (2t, articulated)"
//!   │ split_clauses: commas at parenthesis depth 0
//!   v
//! ["60mph", "40 mph (2t, articulated)"]
//!   │ Parser::parse, one per clause
//!   v
//! [Speed(Mph 60), Speed(Mph 40, [WeightRating 2 t, Condition articulated])]
//! ```
//!
//! The clause parser is a small recursive descent parser over the clause text.
//! Structural steps return `Result` and report the offending substring. The
//! schedule sub-grammar is a backtracking parser built from `Option`-returning
//! steps: every step either consumes input and returns `Some`, or restores the
//! cursor and returns `None`.

use super::grammar::Grammar;
use crate::clause::{
    Clause, ClockTime, DateTime, Holiday, MonthSpan, Offset, Restriction, Sign, SolarEvent, Speed, SpeedTag,
    TimePoint, TimeSpan, WeekdayItem, month_from_abbrev, weekday_from_abbrev,
};
use crate::error::{Result, SpeedError};
use crate::Options;
use regex::{Captures, Regex};
use tracing::trace;

/// A clause tree together with the text it was parsed from.
#[derive(Debug, Clone)]
pub(crate) struct ParsedClause<'a> {
    pub text: &'a str,
    pub clause: Clause,
}

/// Parse a whole cell into its clause trees, in order.
pub(crate) fn parse_cell<'a>(grammar: &Grammar, input: &'a str, options: &Options) -> Result<Vec<ParsedClause<'a>>> {
    split_clauses(input, options)?
        .into_iter()
        .map(|text| Parser::new(grammar, text).parse().map(|clause| ParsedClause { text, clause }))
        .collect()
}

/// Split `input` at top-level commas, checking parenthesis balance and depth.
pub(crate) fn split_clauses<'a>(input: &'a str, options: &Options) -> Result<Vec<&'a str>> {
    if input.len() > options.max_input_len {
        let head: String = input.chars().take(32).collect();
        return Err(SpeedError::syntax(head, format!("input is longer than {} bytes", options.max_input_len)));
    }

    let mut clauses = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '(' => {
                open.push(idx);
                if open.len() > options.max_nesting {
                    return Err(SpeedError::syntax(
                        &input[idx..],
                        format!("parentheses nested deeper than {}", options.max_nesting),
                    ));
                }
            }
            ')' => {
                if open.pop().is_none() {
                    return Err(SpeedError::syntax(&input[idx..], "unbalanced ')'"));
                }
            }
            ',' if open.is_empty() => {
                clauses.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if let Some(&idx) = open.first() {
        return Err(SpeedError::syntax(&input[idx..], "unclosed '('"));
    }
    clauses.push(&input[start..]);

    clauses
        .into_iter()
        .map(|clause| {
            let clause = clause.trim();
            if clause.is_empty() { Err(SpeedError::syntax(input, "empty speed definition")) } else { Ok(clause) }
        })
        .collect()
}

/// Recursive descent parser for a single clause.
pub(crate) struct Parser<'a> {
    grammar: &'a Grammar,
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(grammar: &'a Grammar, text: &'a str) -> Self {
        Parser { grammar, text, pos: 0 }
    }

    /// Parse the whole clause; trailing text is an error.
    pub fn parse(mut self) -> Result<Clause> {
        if regex!(r"^X$").is_match(self.text) {
            return Ok(Clause::NoAccess);
        }

        let clause = if self.eat(regex!(r"^min:\s*")) {
            Clause::Minimum(self.speed()?)
        } else if self.eat(regex!(r"^advisory:\s*")) {
            self.speed_definition(SpeedTag::Advisory)?
        } else {
            self.speed_definition(SpeedTag::Normal)?
        };

        self.skip_ws();
        if self.pos < self.text.len() {
            return Err(SpeedError::syntax(self.rest(), "unexpected trailing text"));
        }
        Ok(clause)
    }

    fn speed_definition(&mut self, tag: SpeedTag) -> Result<Clause> {
        let speed = self.speed()?;

        if self.peek(regex!(r"^\s*\|")) {
            let mut lanes = vec![speed];
            while self.eat(regex!(r"^\s*\|\s*")) {
                lanes.push(self.speed()?);
            }
            return Ok(Clause::Multilane { tag, lanes });
        }

        let restrictions = if self.eat(regex!(r"^\s*\(")) { self.restrictions()? } else { Vec::new() };
        Ok(Clause::Speed { tag, speed, restrictions })
    }

    fn speed(&mut self) -> Result<Speed> {
        if let Some(caps) = self.capture(regex!(r"^(\d+(?:\.\d+)?)\s*mph\b")) {
            return Ok(Speed::Mph(group(&caps, 1)));
        }
        if let Some(caps) = self.capture(regex!(r"^(\d+(?:\.\d+)?)\b")) {
            return Ok(Speed::Kph(group(&caps, 1)));
        }
        if self.eat(regex!(r"^walk\b")) {
            return Ok(Speed::Walk);
        }
        Err(SpeedError::syntax(self.rest(), "expected a speed"))
    }

    /// Restrictions after the opening `(`, up to and including the closing `)`.
    fn restrictions(&mut self) -> Result<Vec<Restriction>> {
        let mut restrictions = Vec::new();
        loop {
            self.skip_ws();
            restrictions.push(self.restriction()?);
            self.skip_ws();
            if self.eat_char(',') {
                continue;
            }
            if self.eat_char(')') {
                return Ok(restrictions);
            }
            return Err(SpeedError::syntax(self.text, "unclosed restriction group"));
        }
    }

    fn restriction(&mut self) -> Result<Restriction> {
        let start = self.pos;

        if let Some(rules) = self.schedule() {
            if self.at_restriction_end() {
                trace!(production = "date_time", text = &self.text[start..self.pos], "matched restriction");
                return Ok(Restriction::Schedule(rules));
            }
            self.pos = start;
        }

        let grammar = self.grammar;
        for production in &grammar.restrictions {
            if let Some(caps) = self.capture(production.pattern) {
                if self.at_restriction_end() {
                    trace!(production = production.name, text = &self.text[start..self.pos], "matched restriction");
                    return Ok((production.build)(&caps));
                }
                self.pos = start;
            }
        }

        Err(SpeedError::syntax(self.rest(), "expected a restriction"))
    }

    fn at_restriction_end(&self) -> bool {
        self.peek(regex!(r"^\s*[,)]"))
    }

    // --- Schedules ----------------------------------------------------------

    fn schedule(&mut self) -> Option<Vec<DateTime>> {
        let mut rules = vec![self.date_time()?];
        loop {
            let checkpoint = self.pos;
            if self.eat(regex!(r"^\s*;\s*")) {
                if let Some(rule) = self.date_time() {
                    rules.push(rule);
                    continue;
                }
            }
            self.pos = checkpoint;
            return Some(rules);
        }
    }

    fn date_time(&mut self) -> Option<DateTime> {
        let months = self.month_span();
        let weekdays = self.selector(months.is_some(), Self::weekdays);
        let time = self.selector(months.is_some() || weekdays.is_some(), Self::time_span);
        if months.is_none() && weekdays.is_none() && time.is_none() {
            return None;
        }
        let off = self.eat(regex!(r"^\s+off\b"));
        Some(DateTime { months, weekdays, time, off })
    }

    /// Run `step`, requiring a separating space when a selector came before.
    fn selector<T>(&mut self, after_selector: bool, step: fn(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.pos;
        if after_selector && !self.eat(regex!(r"^\s+")) {
            return None;
        }
        let found = step(self);
        if found.is_none() {
            self.pos = checkpoint;
        }
        found
    }

    fn month_span(&mut self) -> Option<MonthSpan> {
        let re = regex!(r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)-(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b");
        let caps = re.captures(self.rest())?;
        let span = MonthSpan { from: month_from_abbrev(&caps[1])?, to: month_from_abbrev(&caps[2])? };
        self.advance(&caps);
        Some(span)
    }

    fn weekdays(&mut self) -> Option<Vec<WeekdayItem>> {
        let mut items = vec![self.weekday_item()?];
        loop {
            let checkpoint = self.pos;
            if self.eat_char(',') {
                if let Some(item) = self.weekday_item() {
                    items.push(item);
                    continue;
                }
            }
            self.pos = checkpoint;
            return Some(items);
        }
    }

    fn weekday_item(&mut self) -> Option<WeekdayItem> {
        let rest = self.rest();
        if let Some(caps) = regex!(r"^(PH|SH)\b").captures(rest) {
            let holiday = if &caps[1] == "PH" { Holiday::Public } else { Holiday::School };
            self.advance(&caps);
            return Some(WeekdayItem::Holiday(holiday));
        }

        let caps = regex!(r"^(Mo|Tu|We|Th|Fr|Sa|Su)(?:-(Mo|Tu|We|Th|Fr|Sa|Su))?\b").captures(rest)?;
        let from = weekday_from_abbrev(&caps[1])?;
        let item = match caps.get(2) {
            Some(to) => WeekdayItem::Span(from, weekday_from_abbrev(to.as_str())?),
            None => WeekdayItem::Day(from),
        };
        self.advance(&caps);
        Some(item)
    }

    fn time_span(&mut self) -> Option<TimeSpan> {
        let start = self.pos;

        if self.eat_char('(') {
            let span = self.shifted_span();
            if span.is_none() {
                self.pos = start;
            }
            return span;
        }

        if let Some(offset) = self.offset() {
            if offset.sign == Sign::Plus {
                return Some(TimeSpan::After(offset));
            }
            // `sunset-01:00` reads as a plain interval.
            self.pos = start;
        }

        let from = self.time_point()?;
        if self.eat_char('-') {
            if let Some(to) = self.time_point() {
                return Some(TimeSpan::Between { from, to });
            }
        }
        self.pos = start;
        None
    }

    /// `(offset)-(offset)`, after the first `(` has been consumed.
    fn shifted_span(&mut self) -> Option<TimeSpan> {
        let from = self.offset()?;
        if !self.eat(regex!(r"^\)-\(")) {
            return None;
        }
        let to = self.offset()?;
        self.eat_char(')').then_some(TimeSpan::Shifted { from, to })
    }

    fn offset(&mut self) -> Option<Offset> {
        let start = self.pos;
        let event = self.solar_event()?;
        let sign = if self.eat_char('+') {
            Sign::Plus
        } else if self.eat_char('-') {
            Sign::Minus
        } else {
            self.pos = start;
            return None;
        };
        match self.clock() {
            Some(by) => Some(Offset { event, sign, by }),
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn time_point(&mut self) -> Option<TimePoint> {
        if let Some(clock) = self.clock() {
            return Some(TimePoint::Clock(clock));
        }
        self.solar_event().map(TimePoint::Event)
    }

    fn clock(&mut self) -> Option<ClockTime> {
        let caps = regex!(r"^(\d{2}):(\d{2})\b").captures(self.rest())?;
        let clock = ClockTime::new(caps[1].parse().ok()?, caps[2].parse().ok()?)?;
        self.advance(&caps);
        Some(clock)
    }

    fn solar_event(&mut self) -> Option<SolarEvent> {
        let caps = regex!(r"^(sunrise|sunset|dawn|dusk)\b").captures(self.rest())?;
        let event = SolarEvent::from_name(&caps[1])?;
        self.advance(&caps);
        Some(event)
    }

    // --- Cursor -------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self, re: &Regex) -> bool {
        re.is_match(self.rest())
    }

    fn eat(&mut self, re: &Regex) -> bool {
        self.capture(re).is_some()
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Match `re` at the cursor and advance past the match.
    fn capture(&mut self, re: &Regex) -> Option<Captures<'a>> {
        let caps = re.captures(self.rest())?;
        self.advance(&caps);
        Some(caps)
    }

    fn advance(&mut self, caps: &Captures<'_>) {
        self.pos += caps.get(0).map_or(0, |m| m.end());
    }
}

/// Text of capture group `idx`, empty when the group did not participate.
pub(crate) fn group(caps: &Captures<'_>, idx: usize) -> String {
    caps.get(idx).map(|m| m.as_str().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    fn grammar() -> Grammar {
        Grammar::new(rules::restrictions::get())
    }

    fn parse_one(text: &str) -> Result<Clause> {
        Parser::new(&grammar(), text).parse()
    }

    #[test]
    fn split_respects_parentheses() {
        let cases: Vec<(&str, Option<Vec<&str>>)> = vec![
            ("40", Some(vec!["40"])),
            ("40, 50", Some(vec!["40", "50"])),
            ("40 mph", Some(vec!["40 mph"])),
            ("40 mph, 50 mph", Some(vec!["40 mph", "50 mph"])),
            ("40 mph (2t)", Some(vec!["40 mph (2t)"])),
            (
                "40 mph (2t, articulated), 30 mph (2t, articulated)",
                Some(vec!["40 mph (2t, articulated)", "30 mph (2t, articulated)"]),
            ),
            ("40 mph ((2t)", None),
            ("40 mph (2t))", None),
            ("40,", None),
            ("", None),
        ];

        for (input, expected) in cases {
            let got = split_clauses(input, &Options::default()).ok();
            assert_eq!(got, expected, "split of '{}'", input);
        }
    }

    #[test]
    fn split_errors_name_the_offending_text() {
        let err = split_clauses("40 mph (2t))", &Options::default()).unwrap_err();
        assert_eq!(err, SpeedError::syntax(")", "unbalanced ')'"));

        let err = split_clauses("40 mph ((2t)", &Options::default()).unwrap_err();
        assert_eq!(err, SpeedError::syntax("((2t)", "unclosed '('"));
    }

    #[test]
    fn split_enforces_limits() {
        let options = Options { max_input_len: 8, max_nesting: 1 };
        assert!(split_clauses("40 mph (2t)", &options).unwrap_err().is_syntax());

        let options = Options { max_input_len: 64, max_nesting: 1 };
        assert!(split_clauses("40 ((sunset+01:30)-(sunrise-01:30))", &options).is_err());
        assert!(split_clauses("40 (2t)", &options).is_ok());
    }

    #[test]
    fn parses_speed_forms() {
        assert_eq!(
            parse_one("60mph").unwrap(),
            Clause::Speed { tag: SpeedTag::Normal, speed: Speed::Mph("60".into()), restrictions: vec![] }
        );
        assert_eq!(
            parse_one("advisory: 130").unwrap(),
            Clause::Speed { tag: SpeedTag::Advisory, speed: Speed::Kph("130".into()), restrictions: vec![] }
        );
        assert_eq!(parse_one("min: 50").unwrap(), Clause::Minimum(Speed::Kph("50".into())));
        assert_eq!(parse_one("X").unwrap(), Clause::NoAccess);
        assert_eq!(
            parse_one("walk").unwrap(),
            Clause::Speed { tag: SpeedTag::Normal, speed: Speed::Walk, restrictions: vec![] }
        );
        assert_eq!(
            parse_one("80|60 | 40").unwrap(),
            Clause::Multilane {
                tag: SpeedTag::Normal,
                lanes: vec![Speed::Kph("80".into()), Speed::Kph("60".into()), Speed::Kph("40".into())],
            }
        );
    }

    #[test]
    fn parses_qualified_weights_in_both_positions() {
        let pre = parse_one("40 (current 2t)").unwrap();
        let post = parse_one("40 (2t current)").unwrap();
        match (pre, post) {
            (
                Clause::Speed { restrictions: pre, .. },
                Clause::Speed { restrictions: post, .. },
            ) => {
                assert_eq!(
                    pre,
                    vec![Restriction::QualifiedWeightPre {
                        qualifier: "current".into(),
                        amount: "2".into(),
                        unit: "t".into()
                    }]
                );
                assert_eq!(
                    post,
                    vec![Restriction::QualifiedWeightPost {
                        amount: "2".into(),
                        unit: "t".into(),
                        qualifier: "current".into()
                    }]
                );
            }
            other => panic!("unexpected clauses {:?}", other),
        }
    }

    #[test]
    fn trailer_words_resolve_to_distinct_productions() {
        let cases: Vec<(&str, Restriction)> = vec![
            ("40 (trailer)", Restriction::Condition("trailer".into())),
            ("40 (2 trailers)", Restriction::Trailers("2".into())),
            (
                "40 (2t trailer)",
                Restriction::QualifiedWeightPost { amount: "2".into(), unit: "t".into(), qualifier: "trailer".into() },
            ),
            ("40 (2t)", Restriction::WeightRating { amount: "2".into(), unit: "t".into() }),
        ];

        for (input, expected) in cases {
            match parse_one(input).unwrap() {
                Clause::Speed { restrictions, .. } => assert_eq!(restrictions, vec![expected], "input '{}'", input),
                other => panic!("unexpected clause {:?} for '{}'", other, input),
            }
        }
    }

    #[test]
    fn parses_schedule_with_off_rule() {
        let clause = parse_one("30 (Mo-Fr 08:00-17:00; PH,SH off)").unwrap();
        let Clause::Speed { restrictions, .. } = clause else { panic!("expected a speed clause") };
        let [Restriction::Schedule(rules)] = restrictions.as_slice() else { panic!("expected one schedule") };

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].weekdays, Some(vec![WeekdayItem::Span(chrono::Weekday::Mon, chrono::Weekday::Fri)]));
        assert!(!rules[0].off);
        assert_eq!(
            rules[1].weekdays,
            Some(vec![WeekdayItem::Holiday(Holiday::Public), WeekdayItem::Holiday(Holiday::School)])
        );
        assert!(rules[1].off);
    }

    #[test]
    fn weekday_list_does_not_swallow_restriction_comma() {
        let clause = parse_one("40 (Sa,Su, wet)").unwrap();
        let Clause::Speed { restrictions, .. } = clause else { panic!("expected a speed clause") };
        assert_eq!(restrictions.len(), 2);
        assert_eq!(restrictions[1], Restriction::Condition("wet".into()));
    }

    #[test]
    fn rejects_unknown_text() {
        let cases = vec!["junk", "40 (2u)", "40 mph mph", "40 (Sep)", "40 (25:00-26:00)", "80|60 (wet)", "min: 50 (wet)"];
        for input in cases {
            let err = parse_one(input).unwrap_err();
            assert!(err.is_syntax(), "'{}' should be a syntax error, got {:?}", input, err);
        }
    }

    #[test]
    fn syntax_error_points_at_unparsed_text() {
        assert_eq!(parse_one("junk").unwrap_err(), SpeedError::syntax("junk", "expected a speed"));
        assert_eq!(parse_one("40 (2u)").unwrap_err(), SpeedError::syntax("2u)", "expected a restriction"));
    }
}
