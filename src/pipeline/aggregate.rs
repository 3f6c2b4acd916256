//! Monthly and intra-week aggregation of hourly load records.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::{HourWeekdayAggregate, HourlyLoadRecord, MonthKey, MonthlyAggregate};

/// Group hourly records by (year, month) and average their consumption.
///
/// Output carries exactly one row per distinct (year, month) and is sorted
/// ascending by key. Records from different years never collide because the
/// year is part of the key.
pub fn aggregate_monthly(records: &[HourlyLoadRecord]) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<MonthKey, (f64, u64)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(MonthKey::from_date(record.date))
            .or_insert((0.0, 0));
        entry.0 += record.consumption_mwh;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| MonthlyAggregate {
            key,
            mean_consumption_mwh: sum / count as f64,
        })
        .collect()
}

/// Group hourly records by (hour-of-day, weekday) and average their
/// consumption, profiling the territory's intra-week load shape over all
/// source years at once.
///
/// Output is sorted by hour ascending, then Monday through Sunday within
/// each hour.
pub fn aggregate_hour_weekday(records: &[HourlyLoadRecord]) -> Vec<HourWeekdayAggregate> {
    let mut groups: BTreeMap<(u32, u32), (f64, u64)> = BTreeMap::new();

    for record in records {
        let weekday = record.date.weekday().num_days_from_monday();
        let entry = groups.entry((record.hour, weekday)).or_insert((0.0, 0));
        entry.0 += record.consumption_mwh;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((hour, weekday), (sum, count))| HourWeekdayAggregate {
            hour,
            weekday: weekday_name(weekday).to_string(),
            mean_consumption_mwh: sum / count as f64,
        })
        .collect()
}

fn weekday_name(days_from_monday: u32) -> &'static str {
    match days_from_monday {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        _ => "Sunday",
    }
}
