use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::warn;

/// Resolve an IANA timezone name, falling back to UTC if the lookup fails
/// so a bad identifier never takes the polling cycle down.
pub fn zone_or_utc(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unknown timezone '{}', falling back to UTC", name);
            Tz::UTC
        }
    }
}

/// Normalize a DTSTART value into an absolute instant.
///
/// Date-only values become midnight in the default zone; floating values
/// get the default zone attached; zoned values are converted as declared.
/// All window arithmetic downstream happens in UTC.
pub fn normalize(start: &DatePerhapsTime, default_tz: Tz) -> DateTime<Utc> {
    match start {
        DatePerhapsTime::Date(date) => {
            // All-day events start at midnight local
            let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
            local_to_utc(midnight, default_tz)
        }
        DatePerhapsTime::DateTime(dt) => match dt {
            CalendarDateTime::Utc(utc) => *utc,
            CalendarDateTime::Floating(naive) => local_to_utc(*naive, default_tz),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz = match tzid.parse::<Tz>() {
                    Ok(tz) => tz,
                    Err(_) => {
                        warn!("Unknown TZID '{}' in feed, using default zone", tzid);
                        default_tz
                    }
                };
                local_to_utc(*date_time, tz)
            }
        },
    }
}

/// Interpret a naive local time in the given zone and convert to UTC.
///
/// Ambiguous local times (DST fold) resolve to the earliest instant;
/// nonexistent local times (DST gap) are read as UTC as a last resort.
fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_zone_or_utc_fallback() {
        assert_eq!(zone_or_utc("Asia/Almaty"), chrono_tz::Asia::Almaty);
        assert_eq!(zone_or_utc("Not/AZone"), Tz::UTC);
        assert_eq!(zone_or_utc(""), Tz::UTC);
    }

    #[test]
    fn test_date_only_is_midnight_local() {
        // Almaty is UTC+5 (no DST)
        let tz = zone_or_utc("Asia/Almaty");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let instant = normalize(&DatePerhapsTime::Date(date), tz);

        // Formatting back into the reference zone must give midnight local,
        // regardless of the zone's offset
        let local = instant.with_timezone(&tz);
        assert_eq!(local.format("%H:%M").to_string(), "00:00");
        assert_eq!(local.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[test]
    fn test_floating_gets_default_zone() {
        let tz = zone_or_utc("Asia/Almaty");
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let instant = normalize(
            &DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)),
            tz,
        );

        // 09:00 in UTC+5 is 04:00 UTC
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_utc_passes_through() {
        let tz = zone_or_utc("Asia/Almaty");
        let utc = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let instant = normalize(&DatePerhapsTime::DateTime(CalendarDateTime::Utc(utc)), tz);
        assert_eq!(instant, utc);
    }

    #[test]
    fn test_zoned_value_uses_declared_zone() {
        let default_tz = Tz::UTC;
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let instant = normalize(
            &DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
                date_time: naive,
                tzid: "Asia/Almaty".to_string(),
            }),
            default_tz,
        );
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_tzid_uses_default_zone() {
        let default_tz = zone_or_utc("Asia/Almaty");
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let instant = normalize(
            &DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
                date_time: naive,
                tzid: "Mars/Olympus".to_string(),
            }),
            default_tz,
        );
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 1, 4, 0, 0).unwrap());
    }
}
