use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current time as unix seconds, the unit every quiz timestamp is stored in.
pub(crate) fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

pub(crate) fn format_unix(value: i64) -> String {
    match OffsetDateTime::from_unix_timestamp(value) {
        Ok(moment) => moment.format(&Rfc3339).unwrap_or_else(|_| moment.to_string()),
        Err(_) => value.to_string(),
    }
}
