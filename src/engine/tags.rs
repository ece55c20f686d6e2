//! Tag generation.
//!
//! Turns one clause tree into its tag fragment. This is pure structural
//! recursion: no I/O, no state, and every `match` is exhaustive over the clause
//! tree, so a production added to the grammar without a rendering rule does
//! not compile.
//!
//! ```text
//! Clause ──┬─ Speed      -> maxspeed[:advisory][:conditional]
//!          ├─ Multilane  -> maxspeed:lanes + maxspeed[:advisory]
//!          ├─ Minimum    -> minspeed
//!          └─ NoAccess   -> access=no
//! ```
//!
//! Default units are elided (`t` for weights, `m` for lengths); any other unit
//! is rendered after a space (`weightrating>2 st`).

use crate::clause::{
    Clause, DateTime, Offset, Restriction, Sign, Speed, SpeedTag, TimePoint, TimeSpan, WeekdayItem, month_abbrev,
    weekday_abbrev,
};
use crate::error::{Result, SpeedError};
use std::fmt;

/// The closed set of tag keys a cell can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    Maxspeed,
    MaxspeedConditional,
    MaxspeedAdvisory,
    MaxspeedAdvisoryConditional,
    MaxspeedLanes,
    Minspeed,
    Access,
}

impl TagKey {
    pub const ALL: [TagKey; 7] = [
        TagKey::Maxspeed,
        TagKey::MaxspeedConditional,
        TagKey::MaxspeedAdvisory,
        TagKey::MaxspeedAdvisoryConditional,
        TagKey::MaxspeedLanes,
        TagKey::Minspeed,
        TagKey::Access,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagKey::Maxspeed => "maxspeed",
            TagKey::MaxspeedConditional => "maxspeed:conditional",
            TagKey::MaxspeedAdvisory => "maxspeed:advisory",
            TagKey::MaxspeedAdvisoryConditional => "maxspeed:advisory:conditional",
            TagKey::MaxspeedLanes => "maxspeed:lanes",
            TagKey::Minspeed => "minspeed",
            TagKey::Access => "access",
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags contributed by a single clause, in production order.
pub(crate) type Fragment = Vec<(TagKey, String)>;

fn base_key(tag: SpeedTag) -> TagKey {
    match tag {
        SpeedTag::Normal => TagKey::Maxspeed,
        SpeedTag::Advisory => TagKey::MaxspeedAdvisory,
    }
}

fn conditional_key(tag: SpeedTag) -> TagKey {
    match tag {
        SpeedTag::Normal => TagKey::MaxspeedConditional,
        SpeedTag::Advisory => TagKey::MaxspeedAdvisoryConditional,
    }
}

/// Generate the tag fragment of one clause.
pub(crate) fn fragment(clause: &Clause) -> Result<Fragment> {
    match clause {
        Clause::Speed { tag, speed, restrictions } => {
            let speed = render_speed(speed);
            if restrictions.is_empty() {
                return Ok(vec![(base_key(*tag), speed)]);
            }
            let conditions = restrictions.iter().map(render_restriction).collect::<Result<Vec<_>>>()?;
            Ok(vec![(conditional_key(*tag), format!("{} @ ({})", speed, conditions.join(" AND ")))])
        }
        Clause::Multilane { tag, lanes } => {
            let first = lanes.first().ok_or_else(|| SpeedError::semantic("multilane speed without lanes"))?;
            let all = lanes.iter().map(render_speed).collect::<Vec<_>>().join("|");
            Ok(vec![(TagKey::MaxspeedLanes, all), (base_key(*tag), render_speed(first))])
        }
        Clause::Minimum(speed) => Ok(vec![(TagKey::Minspeed, render_speed(speed))]),
        Clause::NoAccess => Ok(vec![(TagKey::Access, "no".to_string())]),
    }
}

fn render_speed(speed: &Speed) -> String {
    match speed {
        Speed::Kph(n) => n.clone(),
        Speed::Mph(n) => format!("{} mph", n),
        Speed::Walk => "walk".to_string(),
    }
}

fn render_restriction(restriction: &Restriction) -> Result<String> {
    let rendered = match restriction {
        Restriction::WeightRating { amount, unit } => format!("weightrating>{}{}", amount, weight_unit(unit)),
        Restriction::QualifiedWeightPre { qualifier, amount, unit }
        | Restriction::QualifiedWeightPost { amount, unit, qualifier } => {
            format!("{}>{}{}", weight_qualifier(qualifier)?, amount, weight_unit(unit))
        }
        Restriction::Length { amount, unit } => format!("length>{}{}", amount, length_unit(unit)),
        Restriction::Seats(n) => format!("seats>={}", n),
        Restriction::Axles(n) => format!("axles>={}", n),
        Restriction::Trailers(n) => format!("trailers>={}", n),
        Restriction::Condition(literal) => literal.clone(),
        Restriction::Schedule(rules) => rules.iter().map(render_date_time).collect::<Vec<_>>().join("; "),
    };
    Ok(rendered)
}

fn weight_unit(unit: &str) -> String {
    if unit == "t" { String::new() } else { format!(" {}", unit) }
}

fn length_unit(unit: &str) -> String {
    if unit == "m" { String::new() } else { format!(" {}", unit) }
}

fn weight_qualifier(qualifier: &str) -> Result<&'static str> {
    match qualifier {
        "current" => Ok("weight"),
        "empty" => Ok("emptyweight"),
        "capacity" => Ok("weightcapacity"),
        "trailer" => Ok("trailerweight"),
        other => Err(SpeedError::semantic(format!("unexpected weight qualifier \"{}\"", other))),
    }
}

/// Space-joined month span, weekdays and time span, in that order.
fn render_date_time(date_time: &DateTime) -> String {
    let mut parts = Vec::new();
    if let Some(months) = &date_time.months {
        parts.push(format!("{}-{}", month_abbrev(months.from), month_abbrev(months.to)));
    }
    if let Some(weekdays) = &date_time.weekdays {
        parts.push(weekdays.iter().map(render_weekday).collect::<Vec<_>>().join(","));
    }
    if let Some(time) = &date_time.time {
        parts.push(render_time_span(time));
    }
    if date_time.off {
        parts.push("off".to_string());
    }
    parts.join(" ")
}

fn render_weekday(item: &WeekdayItem) -> String {
    match item {
        WeekdayItem::Span(from, to) => format!("{}-{}", weekday_abbrev(*from), weekday_abbrev(*to)),
        WeekdayItem::Day(day) => weekday_abbrev(*day).to_string(),
        WeekdayItem::Holiday(holiday) => holiday.abbrev().to_string(),
    }
}

fn render_time_span(span: &TimeSpan) -> String {
    match span {
        TimeSpan::Between { from, to } => format!("{}-{}", render_time_point(from), render_time_point(to)),
        TimeSpan::After(offset) => render_offset(offset),
        TimeSpan::Shifted { from, to } => format!("({})-({})", render_offset(from), render_offset(to)),
    }
}

fn render_offset(offset: &Offset) -> String {
    let sign = match offset.sign {
        Sign::Plus => '+',
        Sign::Minus => '-',
    };
    format!("{}{}{:02}:{:02}", offset.event.name(), sign, offset.by.hour, offset.by.minute)
}

fn render_time_point(point: &TimePoint) -> String {
    match point {
        TimePoint::Clock(clock) => format!("{:02}:{:02}", clock.hour, clock.minute),
        TimePoint::Event(event) => event.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{ClockTime, Holiday, MonthSpan, SolarEvent};
    use chrono::{Month, Weekday};

    fn speed(tag: SpeedTag, speed: Speed, restrictions: Vec<Restriction>) -> Clause {
        Clause::Speed { tag, speed, restrictions }
    }

    #[test]
    fn speed_without_restrictions_uses_base_key() {
        let got = fragment(&speed(SpeedTag::Normal, Speed::Mph("60".into()), vec![])).unwrap();
        assert_eq!(got, vec![(TagKey::Maxspeed, "60 mph".to_string())]);

        let got = fragment(&speed(SpeedTag::Advisory, Speed::Kph("130".into()), vec![])).unwrap();
        assert_eq!(got, vec![(TagKey::MaxspeedAdvisory, "130".to_string())]);
    }

    #[test]
    fn restrictions_are_and_joined_under_conditional_key() {
        let clause = speed(
            SpeedTag::Normal,
            Speed::Mph("40".into()),
            vec![
                Restriction::WeightRating { amount: "2".into(), unit: "t".into() },
                Restriction::Condition("articulated".into()),
            ],
        );
        assert_eq!(
            fragment(&clause).unwrap(),
            vec![(TagKey::MaxspeedConditional, "40 mph @ (weightrating>2 AND articulated)".to_string())]
        );
    }

    #[test]
    fn multilane_emits_lanes_and_first_lane() {
        let clause = Clause::Multilane {
            tag: SpeedTag::Advisory,
            lanes: vec![Speed::Kph("80".into()), Speed::Mph("50".into())],
        };
        assert_eq!(
            fragment(&clause).unwrap(),
            vec![(TagKey::MaxspeedLanes, "80|50 mph".to_string()), (TagKey::MaxspeedAdvisory, "80".to_string())]
        );
    }

    #[test]
    fn units_other_than_the_default_are_spelled_out() {
        let cases: Vec<(Restriction, &str)> = vec![
            (Restriction::WeightRating { amount: "2".into(), unit: "t".into() }, "weightrating>2"),
            (Restriction::WeightRating { amount: "2000".into(), unit: "lb".into() }, "weightrating>2000 lb"),
            (Restriction::Length { amount: "10".into(), unit: "m".into() }, "length>10"),
            (Restriction::Length { amount: "10".into(), unit: "ft".into() }, "length>10 ft"),
            (
                Restriction::QualifiedWeightPost { amount: "2.5".into(), unit: "st".into(), qualifier: "empty".into() },
                "emptyweight>2.5 st",
            ),
            (Restriction::Seats("12".into()), "seats>=12"),
            (Restriction::Axles("6".into()), "axles>=6"),
            (Restriction::Trailers("2".into()), "trailers>=2"),
        ];

        for (restriction, expected) in cases {
            assert_eq!(render_restriction(&restriction).unwrap(), expected, "rendering {:?}", restriction);
        }
    }

    #[test]
    fn unknown_qualifier_is_a_semantic_error() {
        let restriction =
            Restriction::QualifiedWeightPre { qualifier: "gross".into(), amount: "2".into(), unit: "t".into() };
        let err = render_restriction(&restriction).unwrap_err();
        assert!(matches!(err, SpeedError::Semantic { .. }), "got {:?}", err);

        let clause = speed(SpeedTag::Normal, Speed::Kph("40".into()), vec![restriction]);
        assert!(fragment(&clause).is_err());
    }

    #[test]
    fn empty_multilane_is_a_semantic_error() {
        let clause = Clause::Multilane { tag: SpeedTag::Normal, lanes: vec![] };
        assert!(matches!(fragment(&clause), Err(SpeedError::Semantic { .. })));
    }

    #[test]
    fn schedule_parts_render_in_fixed_order() {
        let rule = DateTime {
            months: Some(MonthSpan { from: Month::September, to: Month::June }),
            weekdays: Some(vec![WeekdayItem::Span(Weekday::Mon, Weekday::Fri)]),
            time: Some(TimeSpan::Between {
                from: TimePoint::Clock(ClockTime { hour: 8, minute: 0 }),
                to: TimePoint::Clock(ClockTime { hour: 16, minute: 0 }),
            }),
            off: false,
        };
        let holidays = DateTime {
            weekdays: Some(vec![WeekdayItem::Holiday(Holiday::Public), WeekdayItem::Day(Weekday::Sun)]),
            off: true,
            ..DateTime::default()
        };
        assert_eq!(
            render_restriction(&Restriction::Schedule(vec![rule, holidays])).unwrap(),
            "Sep-Jun Mo-Fr 08:00-16:00; PH,Su off"
        );
    }

    #[test]
    fn solar_offsets() {
        let shifted = TimeSpan::Shifted {
            from: Offset { event: SolarEvent::Sunset, sign: Sign::Plus, by: ClockTime { hour: 1, minute: 30 } },
            to: Offset { event: SolarEvent::Sunrise, sign: Sign::Minus, by: ClockTime { hour: 1, minute: 30 } },
        };
        assert_eq!(render_time_span(&shifted), "(sunset+01:30)-(sunrise-01:30)");

        let after = TimeSpan::After(Offset {
            event: SolarEvent::Sunset,
            sign: Sign::Plus,
            by: ClockTime { hour: 1, minute: 0 },
        });
        assert_eq!(render_time_span(&after), "sunset+01:00");
    }
}
