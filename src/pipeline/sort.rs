use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::Surgery;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Sort most-recent-first by parsed date.
///
/// Records without a parsable date rank after dated ones; ties (including
/// two unparsable dates) keep their original relative order because the
/// sort is stable.
pub fn sort_by_date_desc(surgeries: &mut [Surgery]) {
    if surgeries.len() <= 1 {
        return;
    }
    surgeries.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
