//! Plain-text wire format.
//!
//! Clients look for the `error:` prefix in the body, so every request outcome
//! is sent with status 200 and one of the fixed strings below. Only storage
//! faults use a non-200 status.

use std::fmt::Display;

use axum::http::StatusCode;
use chrono::{DateTime, Local, TimeZone};
use lvl_catalog::{CatalogEntry, CatalogError};
use lvl_types::IdError;

pub const OK: &str = "ok";
pub const INVALID_ID: &str = "error:invalid id";
pub const MISSING_AUTHOR: &str = "error:missing author information";
pub const NAME_TOO_LONG: &str = "error:too long name";
pub const AUTHOR_TOO_LONG: &str = "error:too long author name";
pub const LEVEL_NOT_FOUND: &str = "error:level doesn't exist";
pub const MISSING_DATA: &str = "error:missing data!";
pub const NAME_TAKEN: &str = "error:level name taken!";
pub const INTERNAL: &str = "error:internal server error";

/// Request header carrying the level content on upload.
pub const DATA_HEADER: &str = "data";

pub fn id_error_body(e: &IdError) -> &'static str {
    match e {
        IdError::InvalidCharacter { .. } => INVALID_ID,
        IdError::MissingAuthor => MISSING_AUTHOR,
        IdError::NameTooLong { .. } => NAME_TOO_LONG,
        IdError::AuthorTooLong { .. } => AUTHOR_TOO_LONG,
    }
}

/// Status and body for a failed catalog call.
pub fn error_response(e: &CatalogError) -> (StatusCode, &'static str) {
    match e {
        CatalogError::InvalidId(id) => (StatusCode::OK, id_error_body(id)),
        CatalogError::NotFound(_) => (StatusCode::OK, LEVEL_NOT_FOUND),
        CatalogError::AlreadyExists(_) => (StatusCode::OK, NAME_TAKEN),
        CatalogError::MissingContent => (StatusCode::OK, MISSING_DATA),
        CatalogError::Store(_) | CatalogError::Ledger(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
        }
    }
}

/// `{id}_{views}-{DD/MM}` with the date in the server's local time zone.
pub fn listing_item(entry: &CatalogEntry) -> String {
    listing_item_in(entry, &Local)
}

pub fn listing_item_in<Tz>(entry: &CatalogEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}_{}-{}",
        entry.id,
        entry.view_count,
        day_month(entry.created_at, tz)
    )
}

/// Comma-joined listing; empty catalog gives an empty string.
pub fn listing(entries: &[CatalogEntry]) -> String {
    entries
        .iter()
        .map(listing_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn day_month<Tz>(epoch_secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(utc) => utc.with_timezone(tz).format("%d/%m").to_string(),
        None => "--/--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use lvl_types::LevelId;

    fn entry(raw: &str, view_count: u64, created_at: i64) -> CatalogEntry {
        CatalogEntry {
            id: LevelId::parse(raw).unwrap(),
            view_count,
            created_at,
        }
    }

    #[test]
    fn id_errors_map_to_fixed_strings() {
        assert_eq!(id_error_body(&IdError::InvalidCharacter { ch: '!' }), "error:invalid id");
        assert_eq!(id_error_body(&IdError::MissingAuthor), "error:missing author information");
        assert_eq!(
            id_error_body(&IdError::NameTooLong { len: 21, max: 20 }),
            "error:too long name"
        );
        assert_eq!(
            id_error_body(&IdError::AuthorTooLong { len: 26, max: 25 }),
            "error:too long author name"
        );
    }

    #[test]
    fn request_outcomes_are_200() {
        let id = LevelId::parse("Castle-Bob").unwrap();
        assert_eq!(
            error_response(&CatalogError::NotFound(id.clone())),
            (StatusCode::OK, "error:level doesn't exist")
        );
        assert_eq!(
            error_response(&CatalogError::AlreadyExists(id)),
            (StatusCode::OK, "error:level name taken!")
        );
        assert_eq!(
            error_response(&CatalogError::MissingContent),
            (StatusCode::OK, "error:missing data!")
        );
    }

    #[test]
    fn storage_faults_are_500() {
        let err = CatalogError::Store(lvl_store::StoreError::Io(std::io::Error::other("disk")));
        assert_eq!(
            error_response(&err),
            (StatusCode::INTERNAL_SERVER_ERROR, "error:internal server error")
        );
    }

    #[test]
    fn listing_item_format() {
        // 2023-11-14T22:13:20Z
        let e = entry("Castle-Bob", 3, 1_700_000_000);
        assert_eq!(listing_item_in(&e, &Utc), "Castle-Bob_3-14/11");
    }

    #[test]
    fn listing_item_uses_given_zone() {
        let e = entry("Castle-Bob", 0, 1_700_000_000);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(listing_item_in(&e, &plus_two), "Castle-Bob_0-15/11");
    }

    #[test]
    fn listing_keeps_hyphens_in_author() {
        let e = entry("Castle-Bob-the-Builder", 12, 0);
        assert_eq!(listing_item_in(&e, &Utc), "Castle-Bob-the-Builder_12-01/01");
    }

    #[test]
    fn out_of_range_timestamp() {
        let e = entry("Castle-Bob", 0, i64::MAX);
        assert_eq!(listing_item_in(&e, &Utc), "Castle-Bob_0---/--");
    }

    #[test]
    fn empty_listing_is_empty_string() {
        assert_eq!(listing(&[]), "");
    }

    #[test]
    fn listing_joins_with_commas() {
        let body = listing(&[entry("A-x", 1, 0), entry("B-y", 2, 0)]);
        let items: Vec<&str> = body.split(',').collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].starts_with("A-x_1-"));
        assert!(items[1].starts_with("B-y_2-"));
    }
}
