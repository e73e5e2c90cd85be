use time::{
    format_description::FormatItem, macros::format_description, OffsetDateTime, PrimitiveDateTime,
};

/// Canonical timestamp layout used everywhere a timestamp is rendered or
/// parsed: the `usage` table, the power log, and the API log.
///
/// Lexicographic order over strings in this layout is chronological order,
/// which is what `ORDER BY timestamp DESC` relies on.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Local wall-clock time, falling back to UTC when the local offset cannot
/// be determined (e.g. in a stripped-down container).
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    PrimitiveDateTime::new(ts.date(), ts.time())
        .format(&TIMESTAMP_FORMAT)
        .expect("formatting a valid datetime with the canonical layout cannot fail")
}

pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(s, &TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_with_zero_padding() {
        let ts = datetime!(2024-01-05 04:03:02 UTC);
        assert_eq!(format_timestamp(ts), "2024-01-05 04:03:02");
    }

    #[test]
    fn parse_roundtrips_formatted_timestamp() {
        let ts = datetime!(2024-12-31 23:59:59 UTC);
        let s = format_timestamp(ts);
        let parsed = parse_timestamp(&s).expect("canonical timestamp must parse");
        assert_eq!(parsed, datetime!(2024-12-31 23:59:59));
    }

    #[test]
    fn parse_rejects_other_layouts() {
        assert!(parse_timestamp("2024-01-05T04:03:02").is_err());
        assert!(parse_timestamp("not a timestamp").is_err());
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let earlier = format_timestamp(datetime!(2024-01-05 09:00:00 UTC));
        let later = format_timestamp(datetime!(2024-01-05 10:00:00 UTC));
        assert!(earlier < later);
    }
}
