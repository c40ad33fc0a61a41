use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};

/// Base file name for a photo: the like count with a `.jpg` extension.
pub fn base_file_name(likes: u64) -> String {
    format!("{}.jpg", likes)
}

/// Date-qualified file name used when the base name is already taken.
///
/// Day, month and year are written without zero padding, so a photo with 42
/// likes taken on 2021-07-04 becomes `"42_4.7.2021.jpg"`.
pub fn dated_file_name(likes: u64, taken: &DateTime<Utc>) -> String {
    // likes + "_" + "dd.mm.yyyy" + ".jpg"
    let mut result = String::with_capacity(20 + 1 + 10 + 4);
    let _ = write!(
        result,
        "{}_{}.{}.{}.jpg",
        likes,
        taken.day(),
        taken.month(),
        taken.year()
    );
    result
}

/// Convert Unix epoch seconds to a UTC timestamp.
///
/// Returns `None` for values outside chrono's representable range.
pub fn utc_from_epoch(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_file_name() {
        assert_eq!(base_file_name(0), "0.jpg");
        assert_eq!(base_file_name(42), "42.jpg");
    }

    #[test]
    fn test_dated_file_name_no_zero_padding() {
        // 2021-07-04T12:00:00Z
        let taken = utc_from_epoch(1_625_400_000).unwrap();
        assert_eq!(dated_file_name(42, &taken), "42_4.7.2021.jpg");
    }

    #[test]
    fn test_dated_file_name_two_digit_day_and_month() {
        // 2019-12-25T00:00:00Z
        let taken = utc_from_epoch(1_577_232_000).unwrap();
        assert_eq!(dated_file_name(7, &taken), "7_25.12.2019.jpg");
    }

    #[test]
    fn test_utc_from_epoch_uses_utc_date() {
        // 2021-07-04T23:59:59Z is still the 4th in UTC regardless of local zone
        let taken = utc_from_epoch(1_625_443_199).unwrap();
        assert_eq!(taken.day(), 4);
        assert_eq!(taken.month(), 7);
    }

    #[test]
    fn test_utc_from_epoch_out_of_range() {
        assert!(utc_from_epoch(i64::MAX).is_none());
    }
}
