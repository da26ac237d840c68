//! Per-row transformation rules for both schema generations.
//!
//! Every function here is pure: it borrows the raw record and returns a new
//! enriched record, leaving the input untouched.

use crate::constants::FULL_NAME_KEY;
use crate::error::{EtlError, Result};
use crate::record::{EnrichedRecord, FieldValue, RawRecord};
use chrono::NaiveDate;

// Generation 1 input keys
pub const V1_FIRST_NAME: &str = "first_name";
pub const V1_LAST_NAME: &str = "last_name";

// Generation 2 input keys
pub const V2_FIRST_NAME: &str = "Firstname";
pub const V2_LAST_NAME: &str = "Lastname";
pub const V2_JOIN_DATE: &str = "Join Date";
pub const V2_DATE_OF_BIRTH: &str = "Date of Birth";

pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

/// Strict `YYYY-MM-DD` → calendar date.
///
/// Anything else (other separators, missing zero padding, surrounding
/// whitespace, impossible dates such as `2021-02-30`) is rejected.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let invalid = || EtlError::DateParse {
        field: field.to_string(),
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return Err(invalid());
    }

    let year: i32 = value[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = value[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = value[8..10].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Generation 1: `full_name = first_name + " " + last_name`.
pub fn transform_v1(raw: &RawRecord) -> Result<EnrichedRecord> {
    let name = full_name(raw.require(V1_FIRST_NAME)?, raw.require(V1_LAST_NAME)?);

    let mut enriched = EnrichedRecord::from_raw(raw);
    enriched.set(FULL_NAME_KEY, FieldValue::Text(name));
    Ok(enriched)
}

/// Generation 2: full name from `Firstname`/`Lastname`, plus parsed
/// `Join Date` and `Date of Birth`.
pub fn transform_v2(raw: &RawRecord) -> Result<EnrichedRecord> {
    let name = full_name(raw.require(V2_FIRST_NAME)?, raw.require(V2_LAST_NAME)?);
    let join_date = parse_date(V2_JOIN_DATE, raw.require(V2_JOIN_DATE)?)?;
    let date_of_birth = parse_date(V2_DATE_OF_BIRTH, raw.require(V2_DATE_OF_BIRTH)?)?;

    let mut enriched = EnrichedRecord::from_raw(raw);
    enriched.set(FULL_NAME_KEY, FieldValue::Text(name));
    enriched.set(V2_JOIN_DATE, FieldValue::Date(join_date));
    enriched.set(V2_DATE_OF_BIRTH, FieldValue::Date(date_of_birth));
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v2_row(join_date: &str) -> RawRecord {
        RawRecord::from_pairs([
            ("Employee ID", "E-100"),
            ("Firstname", "Grace"),
            ("Lastname", "Hopper"),
            ("Employee Manager Name", "Howard Aiken"),
            ("Join Date", join_date),
            ("Date of Birth", "1906-12-09"),
            ("Employee Age", "85"),
            ("Employee Salary", "120000"),
            ("Employee Department Name", "Navy"),
        ])
    }

    #[test]
    fn v1_concatenates_full_name() {
        let raw = RawRecord::from_pairs([
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "ada@example.com"),
            ("department", "Analytical Engines"),
        ]);
        let enriched = transform_v1(&raw).unwrap();
        assert_eq!(
            enriched.get("full_name"),
            Some(&FieldValue::Text("Ada Lovelace".into()))
        );
        assert_eq!(
            enriched.get("email"),
            Some(&FieldValue::Text("ada@example.com".into()))
        );
    }

    #[test]
    fn v1_is_pure_and_leaves_input_untouched() {
        let raw = RawRecord::from_pairs([("first_name", "Ada"), ("last_name", "Lovelace")]);
        let before = raw.clone();

        let first = transform_v1(&raw).unwrap();
        let second = transform_v1(&raw).unwrap();

        assert_eq!(first, second);
        assert_eq!(raw, before);
        assert!(raw.get("full_name").is_none());
    }

    #[test]
    fn v1_fails_on_missing_name() {
        let raw = RawRecord::from_pairs([("first_name", "Ada")]);
        assert!(matches!(
            transform_v1(&raw),
            Err(EtlError::MissingField(key)) if key == "last_name"
        ));
    }

    #[test]
    fn v2_parses_dates_and_passes_other_fields_through() {
        let enriched = transform_v2(&v2_row("1944-07-01")).unwrap();

        assert_eq!(
            enriched.get("full_name").and_then(FieldValue::as_text),
            Some("Grace Hopper")
        );
        assert_eq!(
            enriched.get("Join Date").and_then(FieldValue::as_date),
            NaiveDate::from_ymd_opt(1944, 7, 1)
        );
        assert_eq!(
            enriched.get("Date of Birth").and_then(FieldValue::as_date),
            NaiveDate::from_ymd_opt(1906, 12, 9)
        );
        assert_eq!(
            enriched.get("Employee Salary").and_then(FieldValue::as_text),
            Some("120000")
        );
    }

    #[test]
    fn v2_rejects_unparsable_join_date() {
        match transform_v2(&v2_row("not-a-date")) {
            Err(EtlError::DateParse { field, value }) => {
                assert_eq!(field, "Join Date");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected DateParse, got {other:?}"),
        }
    }

    #[test]
    fn v2_fails_on_missing_date_column() {
        let raw = RawRecord::from_pairs([("Firstname", "Grace"), ("Lastname", "Hopper")]);
        assert!(matches!(
            transform_v2(&raw),
            Err(EtlError::MissingField(key)) if key == "Join Date"
        ));
    }

    #[test]
    fn parse_date_is_strict() {
        assert_eq!(
            parse_date("d", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        for bad in [
            "2023-02-29",
            "2021-02-30",
            "2021-13-01",
            "2021/01/01",
            "2021-1-01",
            " 2021-01-01",
            "01-01-2021",
            "",
            "2021-0a-01",
        ] {
            assert!(parse_date("d", bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
