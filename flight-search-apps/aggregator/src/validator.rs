//!  Flight Search Aggregator
//!
//!  Copyright (C) 2026  Flight Search Aggregator Contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Request validator (C8) plus the normalization step C7 runs before it.
//!
//! The inbound shapes here (`RawSearchRequest` etc.) model what a host's
//! request layer hands the core after JSON binding — still loosely typed
//! (optional fields, raw strings) because binding and status-code mapping
//! are out of scope (spec.md §1). Everything downstream of `validate` deals
//! only in the strongly-typed [`SearchCriteria`]/[`FilterOptions`].

use chrono::NaiveDate;

use crate::criteria::{DurationRange, FilterOptions, SearchCriteria, SortOption, TimeRange};
use crate::error::FieldError;

#[derive(Debug, Clone, Default)]
pub struct RawTimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default)]
pub struct RawFilterOptions {
    pub max_price: Option<f64>,
    pub max_stops: Option<u32>,
    pub airlines: Option<Vec<String>>,
    pub departure_time_range: Option<RawTimeRange>,
    pub arrival_time_range: Option<RawTimeRange>,
    pub duration_range: Option<DurationRange>,
}

#[derive(Debug, Clone, Default)]
pub struct RawSearchRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub passengers: Option<u8>,
    pub class: Option<String>,
    pub sort_by: Option<String>,
    pub filters: Option<RawFilterOptions>,
}

/// Criteria after normalization but before semantic validation: codes
/// uppercased, class lowercased, `passengers` defaulted — still a raw date
/// string since parsing it is itself a validation concern (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub passengers: u8,
    pub class: String,
}

/// Uppercases IATA codes, lowercases the cabin class, and applies the
/// "absent/zero passengers becomes 1" default (§4.6). Pure and idempotent:
/// re-applying it to its own output changes nothing, since every
/// transformation here (`to_ascii_uppercase`, defaulting zero) is already a
/// fixed point on normalized input.
pub fn normalize_criteria(raw: &RawSearchRequest) -> NormalizedCriteria {
    let class = match raw.class.as_deref().map(str::trim) {
        None => "economy".to_string(),
        Some("") => "economy".to_string(),
        Some(c) => c.to_ascii_lowercase(),
    };
    NormalizedCriteria {
        origin: raw.origin.trim().to_ascii_uppercase(),
        destination: raw.destination.trim().to_ascii_uppercase(),
        departure_date: raw.departure_date.trim().to_string(),
        passengers: match raw.passengers {
            None | Some(0) => 1,
            Some(p) => p,
        },
        class,
    }
}

fn is_iata_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_uppercase())
}

fn parse_hhmm(raw: &str) -> Option<u16> {
    let (h, m) = raw.split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Runs every check in §4.6, collecting all field errors rather than
/// short-circuiting on the first. On success, returns the strongly-typed
/// criteria, optional filters, and resolved sort key ready for C4–C6.
pub fn validate(
    normalized: &NormalizedCriteria,
    raw_filters: Option<&RawFilterOptions>,
    sort_by: Option<&str>,
) -> Result<(SearchCriteria, Option<FilterOptions>, SortOption), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !is_iata_code(&normalized.origin) {
        errors.push(FieldError::new("origin", "must be a 3-letter IATA code"));
    }
    if !is_iata_code(&normalized.destination) {
        errors.push(FieldError::new(
            "destination",
            "must be a 3-letter IATA code",
        ));
    }
    if is_iata_code(&normalized.origin)
        && is_iata_code(&normalized.destination)
        && normalized.origin == normalized.destination
    {
        errors.push(FieldError::new(
            "destination",
            "must differ from origin",
        ));
    }

    let date_re_ok = normalized.departure_date.is_ascii()
        && normalized.departure_date.len() == 10
        && normalized.departure_date.as_bytes()[4] == b'-'
        && normalized.departure_date.as_bytes()[7] == b'-'
        && normalized.departure_date[0..4].bytes().all(|b| b.is_ascii_digit())
        && normalized.departure_date[5..7].bytes().all(|b| b.is_ascii_digit())
        && normalized.departure_date[8..10].bytes().all(|b| b.is_ascii_digit());
    let parsed_date = if date_re_ok {
        NaiveDate::parse_from_str(&normalized.departure_date, "%Y-%m-%d").ok()
    } else {
        None
    };
    if parsed_date.is_none() {
        errors.push(FieldError::new(
            "departureDate",
            "must be a real calendar date in YYYY-MM-DD form",
        ));
    }

    if !(1..=9).contains(&normalized.passengers) {
        errors.push(FieldError::new("passengers", "must be between 1 and 9"));
    }

    if !matches!(normalized.class.as_str(), "economy" | "business" | "first") {
        errors.push(FieldError::new(
            "class",
            "must be one of economy, business, first",
        ));
    }

    let sort_option = match sort_by.map(str::trim) {
        None | Some("") => SortOption::BestValue,
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "best" | "bestvalue" | "best_value" => SortOption::BestValue,
            "price" => SortOption::Price,
            "duration" => SortOption::Duration,
            "departure" => SortOption::Departure,
            _ => {
                errors.push(FieldError::new(
                    "sortBy",
                    "must be one of best, price, duration, departure",
                ));
                SortOption::BestValue
            }
        },
    };

    let filter_options = match raw_filters {
        None => None,
        Some(rf) => {
            if let Some(max_price) = rf.max_price {
                if max_price < 0.0 {
                    errors.push(FieldError::new("filters.maxPrice", "must be non-negative"));
                }
            }
            if let Some(max_stops) = rf.max_stops {
                if max_stops > i32::MAX as u32 {
                    errors.push(FieldError::new("filters.maxStops", "must be non-negative"));
                }
            }
            let airlines = rf.airlines.as_ref().map(|list| {
                for (i, code) in list.iter().enumerate() {
                    if !(2..=3).contains(&code.len()) {
                        errors.push(FieldError::new(
                            format!("filters.airlines[{i}]"),
                            "must be 2 or 3 characters",
                        ));
                    }
                }
                list.iter().map(|c| c.to_ascii_uppercase()).collect()
            });

            let mut parse_range = |label: &str, r: &RawTimeRange| -> Option<TimeRange> {
                let start = parse_hhmm(&r.start);
                let end = parse_hhmm(&r.end);
                if start.is_none() {
                    errors.push(FieldError::new(
                        format!("filters.{label}.start"),
                        "must be HH:MM with hours 0-23 and minutes 0-59",
                    ));
                }
                if end.is_none() {
                    errors.push(FieldError::new(
                        format!("filters.{label}.end"),
                        "must be HH:MM with hours 0-23 and minutes 0-59",
                    ));
                }
                match (start, end) {
                    (Some(start), Some(end)) => Some(TimeRange { start, end }),
                    _ => None,
                }
            };
            let departure_time_range = rf
                .departure_time_range
                .as_ref()
                .and_then(|r| parse_range("departureTimeRange", r));
            let arrival_time_range = rf
                .arrival_time_range
                .as_ref()
                .and_then(|r| parse_range("arrivalTimeRange", r));

            if let Some(dr) = rf.duration_range {
                if let (Some(min), Some(max)) = (dr.min_minutes, dr.max_minutes) {
                    if min > max {
                        errors.push(FieldError::new(
                            "filters.durationRange",
                            "minMinutes must be <= maxMinutes",
                        ));
                    }
                }
            }

            Some(FilterOptions {
                max_price: rf.max_price,
                max_stops: rf.max_stops,
                airlines,
                departure_time_range,
                arrival_time_range,
                duration_range: rf.duration_range,
            })
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let criteria = SearchCriteria {
        origin: normalized.origin.clone(),
        destination: normalized.destination.clone(),
        departure_date: parsed_date.expect("checked above"),
        passengers: normalized.passengers,
        class: normalized.class.clone(),
    };

    Ok((criteria, filter_options, sort_option))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(origin: &str, destination: &str, date: &str) -> RawSearchRequest {
        RawSearchRequest {
            origin: origin.into(),
            destination: destination.into(),
            departure_date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let r = raw("cgk", "dps", " 2025-12-15 ");
        let once = normalize_criteria(&r);
        let as_raw_again = RawSearchRequest {
            origin: once.origin.clone(),
            destination: once.destination.clone(),
            departure_date: once.departure_date.clone(),
            passengers: Some(once.passengers),
            class: Some(once.class.clone()),
            sort_by: None,
            filters: None,
        };
        let twice = normalize_criteria(&as_raw_again);
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_short_origin_with_field_map() {
        let normalized = normalize_criteria(&raw("CG", "DPS", "2025-12-15"));
        let result = validate(&normalized, None, None);
        let errors = result.unwrap_err();
        assert!(errors.iter().any(|e| e.field == "origin"));
    }

    #[test]
    fn rejects_same_origin_and_destination() {
        let normalized = normalize_criteria(&raw("CGK", "cgk", "2025-12-15"));
        let errors = validate(&normalized, None, None).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "destination"));
    }

    #[test]
    fn accepts_valid_request_with_defaults() {
        let normalized = normalize_criteria(&raw("CGK", "DPS", "2025-12-15"));
        let (criteria, filters, sort) = validate(&normalized, None, None).unwrap();
        assert_eq!(criteria.passengers, 1);
        assert_eq!(criteria.class, "economy");
        assert!(filters.is_none());
        assert_eq!(sort, SortOption::BestValue);
    }

    #[test]
    fn past_dates_are_allowed() {
        let normalized = normalize_criteria(&raw("CGK", "DPS", "2000-01-01"));
        assert!(validate(&normalized, None, None).is_ok());
    }

    #[test]
    fn invalid_sort_by_coerces_to_best_value_but_records_no_error_when_absent() {
        let normalized = normalize_criteria(&raw("CGK", "DPS", "2025-12-15"));
        let (_, _, sort) = validate(&normalized, None, Some("")).unwrap();
        assert_eq!(sort, SortOption::BestValue);
    }
}
