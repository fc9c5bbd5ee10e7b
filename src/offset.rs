use chrono::{Duration, NaiveDateTime};

/// Unit markers in match priority order. Only the first marker found in the
/// offset text is used.
const UNITS: [(&str, fn(i64) -> Duration); 4] = [
    (" minute", Duration::minutes),
    (" hour", Duration::hours),
    (" day", Duration::days),
    (" week", Duration::weeks),
];

/// Turns a human relative offset like `30 minutes before` into the absolute
/// notification instant for a reminder starting at `scheduled_at`.
///
/// Anything unrecognized (no unit marker, count that is not a plain
/// non-negative integer, arithmetic out of range) degrades to the start time
/// itself. This function never fails.
pub fn resolve(scheduled_at: NaiveDateTime, offset_text: &str) -> NaiveDateTime {
    for (marker, to_duration) in UNITS {
        let Some(marker_index) = offset_text.find(marker) else {
            continue;
        };

        let count = match offset_text[..marker_index].trim().parse::<u32>() {
            Ok(count) => count,
            Err(_) => return scheduled_at,
        };

        return scheduled_at
            .checked_sub_signed(to_duration(i64::from(count)))
            .unwrap_or(scheduled_at);
    }

    scheduled_at
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    use super::*;

    fn at(date: (i32, u32, u32), time: (u32, u32)) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        )
    }

    #[test]
    fn minutes_are_subtracted_from_the_start_time() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        let resolved = resolve(scheduled_at, "30 minutes before");

        assert_eq!(resolved, at((2025, 6, 1), (13, 30)));
    }

    #[test]
    fn hours_are_subtracted_from_the_start_time() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        let resolved = resolve(scheduled_at, "2 hours before");

        assert_eq!(resolved, at((2025, 6, 1), (12, 0)));
    }

    #[test]
    fn days_cross_the_date_boundary() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        let resolved = resolve(scheduled_at, "1 day before");

        assert_eq!(resolved, at((2025, 5, 31), (14, 0)));
    }

    #[test]
    fn weeks_are_subtracted_from_the_start_time() {
        let scheduled_at = at((2025, 6, 15), (9, 30));

        let resolved = resolve(scheduled_at, "2 weeks before");

        assert_eq!(resolved, at((2025, 6, 1), (9, 30)));
    }

    #[test]
    fn singular_unit_text_still_matches() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        let resolved = resolve(scheduled_at, "1 minute before");

        assert_eq!(resolved, at((2025, 6, 1), (13, 59)));
    }

    #[test]
    fn garbage_text_falls_back_to_the_start_time() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        assert_eq!(resolve(scheduled_at, "garbage text"), scheduled_at);
    }

    #[test]
    fn minute_wins_over_hour_when_both_units_appear() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        let resolved = resolve(scheduled_at, "30 minutes or an hour before");

        assert_eq!(resolved, at((2025, 6, 1), (13, 30)));
    }

    #[test]
    fn unparseable_count_before_a_matched_unit_falls_back() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        assert_eq!(resolve(scheduled_at, "half an hour before"), scheduled_at);
    }

    #[test]
    fn negative_count_falls_back_instead_of_notifying_after_start() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        assert_eq!(resolve(scheduled_at, "-5 minutes before"), scheduled_at);
    }

    #[test]
    fn empty_text_falls_back() {
        let scheduled_at = at((2025, 6, 1), (14, 0));

        assert_eq!(resolve(scheduled_at, ""), scheduled_at);
    }

    fn unit_strategy() -> impl Strategy<Value = (&'static str, fn(i64) -> Duration)> {
        prop::sample::select(UNITS.to_vec())
    }

    proptest! {
        #[test]
        fn recognized_offsets_subtract_exactly(
            scheduled_at in arb::<NaiveDateTime>(),
            count in 0u32..10_000,
            (marker, to_duration) in unit_strategy(),
        ) {
            let offset_text = format!("{count}{marker}s before");

            let resolved = resolve(scheduled_at, &offset_text);

            match scheduled_at.checked_sub_signed(to_duration(i64::from(count))) {
                Some(expected) => prop_assert_eq!(resolved, expected),
                None => prop_assert_eq!(resolved, scheduled_at),
            }
            prop_assert!(
                resolved <= scheduled_at,
                "A reminder must notify at or before its own start. resolved = {}, scheduled_at = {}",
                resolved,
                scheduled_at
            );
        }

        #[test]
        fn text_without_unit_markers_is_identity(
            scheduled_at in arb::<NaiveDateTime>(),
            offset_text in "[a-z ]{0,30}".prop_filter(
                "must not contain a unit marker",
                |s| UNITS.iter().all(|(marker, _)| !s.contains(marker)),
            ),
        ) {
            prop_assert_eq!(resolve(scheduled_at, &offset_text), scheduled_at);
        }
    }
}
