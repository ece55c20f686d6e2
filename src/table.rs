//! Ingestion of decoded speed-limit table rows.
//!
//! A table row is `country code, road type, cell...`, where every cell belongs
//! to a vehicle-type column. Each non-empty cell is compiled with
//! [`parse_speeds_with`]; the resulting keys are rewritten for the column's
//! vehicle type and merged into the row's [`RoadClass`]. A cell that does not
//! compile is not fatal: it becomes a warning and the row keeps the tags of its
//! other cells.

use crate::api::{Options, Tags, parse_speeds_with};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Column name of the vehicle type whose tags are left as they are.
pub const DEFAULT_VEHICLE_TYPE: &str = "(default)";

/// Normalize a raw cell: no-break spaces become spaces, surrounding whitespace
/// is dropped.
pub fn normalize_cell(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}

/// Rewrite a generated tag key for a vehicle-type column.
///
/// ```
/// use speedtags::table::vehicle_tag_key;
///
/// assert_eq!(vehicle_tag_key("maxspeed:conditional", "hgv"), "maxspeed:hgv:conditional");
/// assert_eq!(vehicle_tag_key("maxspeed", "(default)"), "maxspeed");
/// ```
pub fn vehicle_tag_key(key: &str, vehicle_type: &str) -> String {
    if vehicle_type == DEFAULT_VEHICLE_TYPE {
        return key.to_string();
    }
    match key.strip_prefix("maxspeed") {
        Some("") => format!("maxspeed:{}", vehicle_type),
        Some(suffix) if suffix.starts_with(':') => format!("maxspeed:{}{}", vehicle_type, suffix),
        _ => key.to_string(),
    }
}

/// Where a cell came from; used to word warnings.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub country_code: &'a str,
    pub road_type: &'a str,
    pub vehicle_type: &'a str,
}

impl CellContext<'_> {
    pub fn warning(&self) -> String {
        format!("{}: Unable to parse '{}' for '{}'", self.country_code, self.vehicle_type, self.road_type)
    }
}

/// One decoded row of a speed-limit table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub country_code: String,
    pub road_type: String,
    /// Cells in vehicle-type column order.
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(country_code: &str, road_type: &str, cells: &[&str]) -> Self {
        TableRow {
            country_code: country_code.to_string(),
            road_type: road_type.to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Tags of one road class of a country. `name` is `None` for the country's
/// default class (empty road type).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadClass {
    pub name: Option<String>,
    pub tags: Tags,
}

/// The result of ingesting a whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedTable {
    /// Road classes per country code, in row order.
    pub speed_limits: BTreeMap<String, Vec<RoadClass>>,
    /// One message per cell that failed to compile.
    pub warnings: Vec<String>,
}

impl SpeedTable {
    /// Compile every cell of `rows`. `vehicle_types[i]` names the column of
    /// `cells[i]`; cells without a column are ignored.
    pub fn ingest(vehicle_types: &[String], rows: &[TableRow], options: &Options) -> SpeedTable {
        let mut table = SpeedTable::default();

        for row in rows {
            let country_code = normalize_cell(&row.country_code);
            let road_type = normalize_cell(&row.road_type);
            let mut tags = Tags::new();

            for (vehicle_type, raw) in vehicle_types.iter().zip(&row.cells) {
                let cell = normalize_cell(raw);
                if cell.is_empty() {
                    continue;
                }

                let context = CellContext { country_code: &country_code, road_type: &road_type, vehicle_type };
                match parse_speeds_with(&cell, options) {
                    Ok(parsed) => {
                        for (key, value) in parsed {
                            tags.insert(vehicle_tag_key(&key, vehicle_type), value);
                        }
                    }
                    Err(err) => {
                        warn!(
                            country = context.country_code,
                            road_type = context.road_type,
                            vehicle = context.vehicle_type,
                            cell = %cell,
                            error = %err,
                            "unable to parse cell"
                        );
                        table.warnings.push(context.warning());
                    }
                }
            }

            debug!(country = %country_code, road_type = %road_type, tags = tags.len(), "ingested row");
            let name = if road_type.is_empty() { None } else { Some(road_type) };
            table.speed_limits.entry(country_code).or_default().push(RoadClass { name, tags });
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn normalizes_cells() {
        let cases = vec![
            ("  40 mph ", "40 mph"),
            ("40\u{a0}mph", "40 mph"),
            ("\u{a0}X\u{a0}", "X"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_cell(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn vehicle_infix_applies_to_maxspeed_keys_only() {
        let cases = vec![
            ("maxspeed", "hgv", "maxspeed:hgv"),
            ("maxspeed:conditional", "hgv", "maxspeed:hgv:conditional"),
            ("maxspeed:advisory", "bus", "maxspeed:bus:advisory"),
            ("maxspeed:lanes", "hgv", "maxspeed:hgv:lanes"),
            ("minspeed", "hgv", "minspeed"),
            ("access", "hgv", "access"),
            ("maxspeedx", "hgv", "maxspeedx"),
            ("maxspeed:conditional", "(default)", "maxspeed:conditional"),
        ];
        for (key, vehicle, expected) in cases {
            assert_eq!(vehicle_tag_key(key, vehicle), expected, "key '{}' for '{}'", key, vehicle);
        }
    }

    #[test]
    fn ingests_rows_grouped_by_country() {
        let vehicles = columns(&["(default)", "hgv"]);
        let rows = vec![
            TableRow::new("DE", "", &["50", "50"]),
            TableRow::new("DE", "motorway", &["", "80 (wet)"]),
            TableRow::new("GB", "", &["30 mph", ""]),
        ];

        let table = SpeedTable::ingest(&vehicles, &rows, &Options::default());

        assert!(table.warnings.is_empty());
        let de = &table.speed_limits["DE"];
        assert_eq!(de.len(), 2);
        assert_eq!(de[0].name, None);
        assert_eq!(de[0].tags["maxspeed"], "50");
        assert_eq!(de[0].tags["maxspeed:hgv"], "50");
        assert_eq!(de[1].name.as_deref(), Some("motorway"));
        assert_eq!(de[1].tags.len(), 1);
        assert_eq!(de[1].tags["maxspeed:hgv:conditional"], "80 @ (wet)");
        assert_eq!(table.speed_limits["GB"][0].tags["maxspeed"], "30 mph");
    }

    #[test]
    fn failed_cells_become_warnings() {
        let vehicles = columns(&["(default)", "hgv"]);
        let rows = vec![TableRow::new("AT", "rural", &["100", "junk"])];

        let table = SpeedTable::ingest(&vehicles, &rows, &Options::default());

        assert_eq!(table.warnings, vec!["AT: Unable to parse 'hgv' for 'rural'".to_string()]);
        let rural = &table.speed_limits["AT"][0];
        assert_eq!(rural.tags.len(), 1);
        assert_eq!(rural.tags["maxspeed"], "100");
    }
}
