//! Restriction productions (the leaves inside `( ... )`).
//!
//! Order matters only for readability: a production is accepted only when the
//! restriction ends right after its match, so `2t trailer` can never be read as
//! `2t` followed by junk.

use crate::clause::Restriction;
use crate::engine::{Production, group};

/// "current 2t", "empty 2st", "capacity 2000lb"
pub fn rule_qualified_weight_pre() -> Production {
    production! {
        name: "qualified_weight_pre",
        pattern: r"^(current|empty|capacity|trailer)\s+(\d+(?:\.\d+)?)\s*(t|st|lb)\b",
        build: |caps| Restriction::QualifiedWeightPre {
            qualifier: group(caps, 1),
            amount: group(caps, 2),
            unit: group(caps, 3),
        },
    }
}

/// "2t current", "0.75t trailer"
pub fn rule_qualified_weight_post() -> Production {
    production! {
        name: "qualified_weight_post",
        pattern: r"^(\d+(?:\.\d+)?)\s*(t|st|lb)\s+(current|empty|capacity|trailer)\b",
        build: |caps| Restriction::QualifiedWeightPost {
            amount: group(caps, 1),
            unit: group(caps, 2),
            qualifier: group(caps, 3),
        },
    }
}

/// "2t", "2.5st", "2000lb"
pub fn rule_weight_rating() -> Production {
    production! {
        name: "weight_rating",
        pattern: r"^(\d+(?:\.\d+)?)\s*(t|st|lb)\b",
        build: |caps| Restriction::WeightRating { amount: group(caps, 1), unit: group(caps, 2) },
    }
}

/// "10m", "10ft"
pub fn rule_length() -> Production {
    production! {
        name: "length_restriction",
        pattern: r"^(\d+(?:\.\d+)?)\s*(m|ft)\b",
        build: |caps| Restriction::Length { amount: group(caps, 1), unit: group(caps, 2) },
    }
}

pub fn rule_seats() -> Production {
    production! {
        name: "seat_restriction",
        pattern: r"^(\d+)\s*seats\b",
        build: |caps| Restriction::Seats(group(caps, 1)),
    }
}

pub fn rule_axles() -> Production {
    production! {
        name: "axle_restriction",
        pattern: r"^(\d+)\s*axles\b",
        build: |caps| Restriction::Axles(group(caps, 1)),
    }
}

pub fn rule_trailers() -> Production {
    production! {
        name: "trailers_restriction",
        pattern: r"^(\d+)\s*trailers\b",
        build: |caps| Restriction::Trailers(group(caps, 1)),
    }
}

/// Conditions that are passed through verbatim.
pub fn rule_condition() -> Production {
    production! {
        name: "restriction_conditional",
        pattern: r"^(articulated|trailer|caravan|wet|empty)\b",
        build: |caps| Restriction::Condition(group(caps, 1)),
    }
}

pub fn get() -> Vec<Production> {
    vec![
        rule_qualified_weight_pre(),
        rule_qualified_weight_post(),
        rule_weight_rating(),
        rule_length(),
        rule_seats(),
        rule_axles(),
        rule_trailers(),
        rule_condition(),
    ]
}
