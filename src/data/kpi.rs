//! Summary figures shown next to the charts
//!
//! - running_since: first observation
//! - devices_seen_per_day: mean of daily totals
//! - busyness: the busiest hour of day (by mean hourly count) and the busiest
//!   weekday (by mean daily total), with their margin over the average

use super::error::Result;
use super::records::ObservationSet;
use chrono::{DateTime, Datelike, Utc};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub running_since: DateTime<Utc>,
    pub devices_seen_per_day: Option<f64>,
    pub busyness: Busyness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Busyness {
    pub by_hour: Option<BusiestHour>,
    pub by_day: Option<BusiestDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestHour {
    pub hour_of_day: u32,
    pub num_devices: f64,
    pub num_devices_mean: f64,
    pub percentage_margin_to_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestDay {
    pub weekday: String,
    pub num_devices: f64,
    pub num_devices_mean: f64,
    pub percentage_margin_to_mean: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group means sorted by key: (key, mean)
fn group_means(df: &DataFrame, key: &str, value: &str) -> Result<Vec<(u32, f64)>> {
    let grouped = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([col(value).mean().alias("mean")])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(key)?.u32()?;
    let means = grouped.column("mean")?.f64()?;
    Ok(keys
        .into_iter()
        .zip(means)
        .filter_map(|(k, m)| Some((k?, m?)))
        .collect())
}

/// Top group, mean of group means and the top group's margin over it
///
/// Needs at least two groups; ties go to the lowest key. The mean and the
/// margin are rounded to 2 dp, the top value is left to the caller.
fn busiest(means: &[(u32, f64)]) -> Option<(u32, f64, f64, f64)> {
    if means.len() < 2 {
        return None;
    }
    let mean_of_means = means.iter().map(|(_, m)| m).sum::<f64>() / means.len() as f64;
    let (key, top) = means.iter().copied().fold(means[0], |best, current| {
        if current.1 > best.1 {
            current
        } else {
            best
        }
    });
    let margin = if mean_of_means == 0.0 {
        0.0
    } else {
        (top - mean_of_means) / mean_of_means * 100.0
    };
    Some((key, top, round2(mean_of_means), round2(margin)))
}

pub fn compute_kpis(set: &ObservationSet) -> Result<Kpis> {
    let records = set.records();

    let hours: Vec<u32> = records.iter().map(|r| r.hour).collect();
    let devices: Vec<f64> = records.iter().map(|r| r.devices as f64).collect();
    let days: Vec<i32> = records.iter().map(|r| r.date.num_days_from_ce()).collect();
    let weekdays: Vec<u32> = records.iter().map(|r| r.day_of_week).collect();

    let hourly = DataFrame::new(vec![
        Column::new("hour".into(), hours),
        Column::new("devices".into(), devices),
        Column::new("day".into(), days),
        Column::new("weekday".into(), weekdays),
    ])?;

    // Daily totals, one row per observed day
    let daily = hourly
        .clone()
        .lazy()
        .group_by([col("day")])
        .agg([
            col("devices").sum().alias("total"),
            col("weekday").first().alias("weekday"),
        ])
        .collect()?;
    debug!("KPIs over {} records, {} days", hourly.height(), daily.height());

    let devices_seen_per_day = daily.column("total")?.f64()?.mean().map(round2);

    let by_hour = busiest(&group_means(&hourly, "hour", "devices")?).map(
        |(hour_of_day, num_devices, num_devices_mean, percentage_margin_to_mean)| BusiestHour {
            hour_of_day,
            num_devices: round2(num_devices),
            num_devices_mean,
            percentage_margin_to_mean,
        },
    );

    let by_day = busiest(&group_means(&daily, "weekday", "total")?).map(
        |(weekday, num_devices, num_devices_mean, percentage_margin_to_mean)| BusiestDay {
            weekday: WEEKDAY_NAMES[weekday as usize % 7].to_string(),
            num_devices,
            num_devices_mean,
            percentage_margin_to_mean,
        },
    );

    Ok(Kpis {
        running_since: set.first().time,
        devices_seen_per_day,
        busyness: Busyness { by_hour, by_day },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::tests::{hourly, ts};
    use chrono::NaiveDate;

    #[test]
    fn test_busiest_needs_two_groups() {
        assert_eq!(busiest(&[(3, 10.0)]), None);
        assert_eq!(
            busiest(&[(0, 10.0), (1, 30.0)]),
            Some((1, 30.0, 20.0, 50.0))
        );
        let (_, top, mean, _) = busiest(&[(0, 1.0), (1, 10.0 / 3.0)]).unwrap();
        assert_eq!(top, 10.0 / 3.0);
        assert_eq!(mean, 2.17);
    }

    #[test]
    fn test_compute_kpis() {
        // 2019-03-04 is a Monday; two weeks of data
        let start = NaiveDate::from_ymd_opt(2019, 3, 4).unwrap();
        let set = hourly(start, 14, |day, hour| {
            let base = if hour == 12 { 20 } else { 2 };
            // Mondays double
            if day % 7 == 0 {
                base * 2
            } else {
                base
            }
        });
        let kpis = compute_kpis(&set).unwrap();

        assert_eq!(kpis.running_since, ts(2019, 3, 4, 0));

        // Daily totals: 23 * 2 + 20 = 66, Mondays 132
        // mean = (2 * 132 + 12 * 66) / 14 = 75.43
        assert_eq!(kpis.devices_seen_per_day, Some(75.43));

        let by_hour = kpis.busyness.by_hour.unwrap();
        assert_eq!(by_hour.hour_of_day, 12);
        // hour 12 mean = (2 * 40 + 12 * 20) / 14 = 22.857
        assert_eq!(by_hour.num_devices, 22.86);

        let by_day = kpis.busyness.by_day.unwrap();
        assert_eq!(by_day.weekday, "Monday");
        assert_eq!(by_day.num_devices, 132.0);
        // mean of weekday means = (132 + 6 * 66) / 7 = 75.43, margin 75%
        assert_eq!(by_day.num_devices_mean, 75.43);
        assert_eq!(by_day.percentage_margin_to_mean, 75.0);
    }

    #[test]
    fn test_busiest_day_total_is_not_rounded() {
        // Three weeks from Monday 2019-03-04; Monday totals 96, 96, 97
        let start = NaiveDate::from_ymd_opt(2019, 3, 4).unwrap();
        let set = hourly(start, 21, |day, hour| match (day, hour) {
            (14, 0) => 3,
            (d, 12) if d % 7 == 0 => 50,
            _ => 2,
        });
        let by_day = compute_kpis(&set).unwrap().busyness.by_day.unwrap();
        assert_eq!(by_day.weekday, "Monday");
        assert!((by_day.num_devices - 289.0 / 3.0).abs() < 1e-9);
        assert_ne!(by_day.num_devices, 96.33);
    }

    #[test]
    fn test_kpis_single_day() {
        let start = NaiveDate::from_ymd_opt(2019, 3, 4).unwrap();
        let set = hourly(start, 1, |_, hour| u64::from(hour));
        let kpis = compute_kpis(&set).unwrap();
        assert_eq!(kpis.devices_seen_per_day, Some(276.0));
        assert_eq!(kpis.busyness.by_hour.unwrap().hour_of_day, 23);
        assert!(kpis.busyness.by_day.is_none());
    }
}
