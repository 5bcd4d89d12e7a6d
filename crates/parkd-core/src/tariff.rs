//! Time-banded parking tariff
//!
//! An interval is priced hour slice by hour slice. Each slice ends at the
//! earlier of the interval end and the next top of the hour, and is charged
//! at the rate of the hour it starts in.

use chrono::{DateTime, Duration, TimeZone, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hourly rate inside the day band
pub const DAY_RATE: Decimal = dec!(14);

/// Hourly rate outside the day band
pub const NIGHT_RATE: Decimal = dec!(6);

/// First hour of the day band (inclusive)
pub const DAY_BAND_START_HOUR: u32 = 8;

/// End of the day band (exclusive)
pub const DAY_BAND_END_HOUR: u32 = 18;

const MICROS_PER_HOUR: Decimal = dec!(3600000000);

/// Hourly rate for a slice starting in `hour` (0-23, local to the interval)
pub fn hourly_rate(hour: u32) -> Decimal {
    if (DAY_BAND_START_HOUR..DAY_BAND_END_HOUR).contains(&hour) {
        DAY_RATE
    } else {
        NIGHT_RATE
    }
}

/// Cost of parking over `[start, end)`.
///
/// Exact; round with `parkd_util::round_cents` for display. An empty or
/// inverted interval costs nothing.
pub fn parking_cost<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Decimal {
    let mut total = Decimal::ZERO;
    let mut cursor = start.clone();

    while cursor < *end {
        let boundary = next_top_of_hour(&cursor);
        let slice_end = if boundary < *end {
            boundary
        } else {
            end.clone()
        };

        total += hourly_rate(cursor.hour()) * duration_hours(&cursor, &slice_end);
        cursor = slice_end;
    }

    total
}

/// Signed length of `[start, end)` in hours
pub fn duration_hours<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Decimal {
    let delta = end.clone().signed_duration_since(start.clone());
    let micros = match delta.num_microseconds() {
        Some(us) => Decimal::from(us),
        // Only spans of several hundred thousand years overflow microseconds
        None => Decimal::from(delta.num_milliseconds()) * dec!(1000),
    };
    micros / MICROS_PER_HOUR
}

fn next_top_of_hour<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    // Leap seconds report nanoseconds past 1e9
    let nanos = i64::from(at.nanosecond() % 1_000_000_000);
    let into_hour = Duration::seconds(i64::from(at.minute() * 60 + at.second()))
        + Duration::nanoseconds(nanos);
    at.clone() + (Duration::hours(1) - into_hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parkd_util::round_cents;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, h, m, 0).unwrap()
    }

    #[test]
    fn rate_bands() {
        assert_eq!(hourly_rate(7), NIGHT_RATE);
        assert_eq!(hourly_rate(8), DAY_RATE);
        assert_eq!(hourly_rate(17), DAY_RATE);
        assert_eq!(hourly_rate(18), NIGHT_RATE);
        assert_eq!(hourly_rate(0), NIGHT_RATE);
    }

    #[test]
    fn one_day_hour() {
        assert_eq!(parking_cost(&at(8, 0), &at(9, 0)), dec!(14));
    }

    #[test]
    fn one_night_hour() {
        assert_eq!(parking_cost(&at(18, 0), &at(19, 0)), dec!(6));
    }

    #[test]
    fn slice_is_clipped_at_band_change() {
        // 20 minutes at 14/h plus 20 minutes at 6/h
        let cost = parking_cost(&at(17, 40), &at(18, 20));
        assert_eq!(round_cents(cost), dec!(6.67));
        assert!(cost > dec!(6.666) && cost < dec!(6.667));
    }

    #[test]
    fn two_hours_inside_day_band() {
        assert_eq!(parking_cost(&at(10, 0), &at(12, 0)), dec!(28));
        assert_eq!(parking_cost(&at(9, 30), &at(11, 30)), dec!(28));
    }

    #[test]
    fn overnight_session() {
        let start = at(22, 0);
        let end = Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap();
        // 22..08 is ten night hours, 08..09 one day hour
        assert_eq!(parking_cost(&start, &end), dec!(74));
    }

    #[test]
    fn partial_first_and_last_hours() {
        // 7:30-8:00 night, 8:00-8:15 day
        let cost = parking_cost(&at(7, 30), &at(8, 15));
        assert_eq!(cost, dec!(3) + dec!(3.5));
    }

    #[test]
    fn empty_interval_is_free() {
        assert_eq!(parking_cost(&at(12, 0), &at(12, 0)), Decimal::ZERO);
    }

    #[test]
    fn inverted_interval_is_free() {
        assert_eq!(parking_cost(&at(12, 0), &at(10, 0)), Decimal::ZERO);
        assert_eq!(duration_hours(&at(12, 0), &at(10, 0)), dec!(-2));
    }

    #[test]
    fn sub_second_precision() {
        let start = at(8, 0);
        let end = start + Duration::milliseconds(1800);
        // 0.0005 hours at 14/h
        assert_eq!(parking_cost(&start, &end), dec!(0.007));
    }

    #[test]
    fn cost_is_monotonic_in_end_time() {
        let start = at(6, 17);
        let mut previous = Decimal::ZERO;
        for minutes in (0..=24 * 60).step_by(7) {
            let cost = parking_cost(&start, &(start + Duration::minutes(minutes)));
            assert!(cost >= previous, "cost decreased at +{minutes}m");
            previous = cost;
        }
    }

    #[test]
    fn full_day_cost() {
        let start = at(0, 0);
        let end = start + Duration::hours(24);
        // 10 day hours and 14 night hours
        assert_eq!(parking_cost(&start, &end), dec!(140) + dec!(84));
    }

    #[test]
    fn banding_follows_the_interval_time_zone() {
        use chrono::FixedOffset;

        // 07:00-08:00 UTC is 09:00-10:00 at +02:00
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = at(7, 0).with_timezone(&tz);
        let end = at(8, 0).with_timezone(&tz);
        assert_eq!(parking_cost(&start, &end), DAY_RATE);
        assert_eq!(parking_cost(&at(7, 0), &at(8, 0)), NIGHT_RATE);
    }

    #[test]
    fn half_hour_offset_slices_on_local_hours() {
        use chrono::FixedOffset;

        // +05:30: 07:50 local is night, 08:00 local starts the day band
        let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let start = tz.with_ymd_and_hms(2024, 3, 11, 7, 50, 0).unwrap();
        let end = tz.with_ymd_and_hms(2024, 3, 11, 8, 20, 0).unwrap();
        let expected = NIGHT_RATE * dec!(10) / dec!(60) + DAY_RATE * dec!(20) / dec!(60);
        assert_eq!(round_cents(parking_cost(&start, &end)), round_cents(expected));
    }

    #[test]
    fn duration_in_hours() {
        assert_eq!(duration_hours(&at(8, 0), &at(10, 30)), dec!(2.5));
    }
}
