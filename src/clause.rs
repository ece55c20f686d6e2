//! Clause trees.
//!
//! One `Clause` is produced for every top-level, comma separated speed
//! definition of a cell. The tree is closed: every grammar production has
//! exactly one constructor here, so the tag generator can match exhaustively.
//!
//! Numbers and units are kept as the literal text the grammar matched
//! (`"0.75"`, `"st"`), because tags must echo them verbatim. Calendar and clock
//! tokens are typed, and spelled back through [`month_abbrev`] and
//! [`weekday_abbrev`].

use chrono::{Month, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTag {
    Normal,
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `normal_speed` / `advisory_speed`: a speed with optional restrictions.
    Speed { tag: SpeedTag, speed: Speed, restrictions: Vec<Restriction> },
    /// `multilane_speed`: one speed per lane, `80|60|40`.
    Multilane { tag: SpeedTag, lanes: Vec<Speed> },
    /// `min: 50`
    Minimum(Speed),
    /// `X`
    NoAccess,
}

impl Clause {
    /// Name of the production that built this clause (used in traces).
    pub fn production(&self) -> &'static str {
        match self {
            Clause::Speed { tag: SpeedTag::Normal, .. } => "normal_speed",
            Clause::Speed { tag: SpeedTag::Advisory, .. } => "advisory_speed",
            Clause::Multilane { .. } => "multilane_speed",
            Clause::Minimum(_) => "min_speed",
            Clause::NoAccess => "no_access",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speed {
    Kph(String),
    Mph(String),
    Walk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    WeightRating { amount: String, unit: String },
    /// `current 2t`
    QualifiedWeightPre { qualifier: String, amount: String, unit: String },
    /// `2t current`
    QualifiedWeightPost { amount: String, unit: String, qualifier: String },
    Length { amount: String, unit: String },
    Seats(String),
    Axles(String),
    Trailers(String),
    /// Pass-through condition such as `articulated` or `wet`.
    Condition(String),
    /// One or more `;` separated date/time rules.
    Schedule(Vec<DateTime>),
}

/// `Sep-Jun Mo-Fr 08:00-16:00`, every part optional but at least one present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateTime {
    pub months: Option<MonthSpan>,
    pub weekdays: Option<Vec<WeekdayItem>>,
    pub time: Option<TimeSpan>,
    /// Trailing `off` modifier.
    pub off: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    pub from: Month,
    pub to: Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayItem {
    Span(Weekday, Weekday),
    Day(Weekday),
    Holiday(Holiday),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holiday {
    Public,
    School,
}

impl Holiday {
    pub fn abbrev(self) -> &'static str {
        match self {
            Holiday::Public => "PH",
            Holiday::School => "SH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpan {
    /// `neg_interval`: `08:00-16:00`, `sunset-sunrise`
    Between { from: TimePoint, to: TimePoint },
    /// `pos_interval`: `sunset+01:00`
    After(Offset),
    /// `complex_time_span`: `(sunset+01:30)-(sunrise-01:30)`
    Shifted { from: Offset, to: Offset },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePoint {
    Clock(ClockTime),
    Event(SolarEvent),
}

/// A solar event shifted by a clock duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub event: SolarEvent,
    pub sign: Sign,
    pub by: ClockTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// `hh:mm`, with `24:00` allowed as end of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        let valid = minute < 60 && (hour < 24 || (hour == 24 && minute == 0));
        valid.then_some(Self { hour, minute })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarEvent {
    Sunrise,
    Sunset,
    Dawn,
    Dusk,
}

impl SolarEvent {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sunrise" => Some(SolarEvent::Sunrise),
            "sunset" => Some(SolarEvent::Sunset),
            "dawn" => Some(SolarEvent::Dawn),
            "dusk" => Some(SolarEvent::Dusk),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolarEvent::Sunrise => "sunrise",
            SolarEvent::Sunset => "sunset",
            SolarEvent::Dawn => "dawn",
            SolarEvent::Dusk => "dusk",
        }
    }
}

const MONTHS: [(Month, &str); 12] = [
    (Month::January, "Jan"),
    (Month::February, "Feb"),
    (Month::March, "Mar"),
    (Month::April, "Apr"),
    (Month::May, "May"),
    (Month::June, "Jun"),
    (Month::July, "Jul"),
    (Month::August, "Aug"),
    (Month::September, "Sep"),
    (Month::October, "Oct"),
    (Month::November, "Nov"),
    (Month::December, "Dec"),
];

const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Mo"),
    (Weekday::Tue, "Tu"),
    (Weekday::Wed, "We"),
    (Weekday::Thu, "Th"),
    (Weekday::Fri, "Fr"),
    (Weekday::Sat, "Sa"),
    (Weekday::Sun, "Su"),
];

pub fn month_from_abbrev(text: &str) -> Option<Month> {
    MONTHS.iter().find(|(_, abbrev)| *abbrev == text).map(|(month, _)| *month)
}

pub fn month_abbrev(month: Month) -> &'static str {
    MONTHS.iter().find(|(m, _)| *m == month).map(|(_, abbrev)| *abbrev).unwrap_or("")
}

pub fn weekday_from_abbrev(text: &str) -> Option<Weekday> {
    WEEKDAYS.iter().find(|(_, abbrev)| *abbrev == text).map(|(day, _)| *day)
}

pub fn weekday_abbrev(day: Weekday) -> &'static str {
    WEEKDAYS.iter().find(|(d, _)| *d == day).map(|(_, abbrev)| *abbrev).unwrap_or("")
}
