//! Observation records and the date bucketing the charts are built on
//!
//! Records arrive as `{ time, devices }` JSON objects (unix seconds, hourly
//! counts) and are enriched once at load time with the fields every chart
//! keys on: hour of day, day of month, day of week and calendar date.
//!
//! The record array is assumed to be sorted by time ascending. Slicing
//! helpers rely on that (first match / first overshoot), exactly like the
//! dashboard always has; nothing re-sorts or verifies the order.

use super::error::{ChartError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Numeric JSON field that may also be sent as a string ("115", "1541980800")
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64<E: serde::de::Error>(&self) -> std::result::Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(*n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| E::custom(format!("invalid number '{}': {}", s, e))),
        }
    }
}

fn deserialize_time<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = NumberOrString::deserialize(deserializer)?.as_f64()?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("time is not finite"));
    }
    Ok(value)
}

fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = NumberOrString::deserialize(deserializer)?.as_f64()?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("device count is not finite"));
    }
    Ok(value.max(0.0).round() as u64)
}

/// One observation as served by the data endpoints
///
/// The box and calibration endpoints name the count `seen_count`, the main
/// dashboard endpoint names it `devices`; both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    /// Hour start in unix seconds
    #[serde(deserialize_with = "deserialize_time")]
    pub time: f64,

    /// Number of devices seen during the hour
    #[serde(alias = "seen_count", deserialize_with = "deserialize_count")]
    pub devices: u64,
}

/// An observation enriched with the fields the charts bucket on
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub devices: u64,
    /// Hour of day, 0..=23
    pub hour: u32,
    /// Day of month, 1..=31
    pub day: u32,
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    /// Calendar day the observation belongs to
    pub date: NaiveDate,
}

impl Observation {
    /// Derive all bucketing fields from a timestamp
    pub fn at(time: DateTime<Utc>, devices: u64) -> Self {
        Observation {
            time,
            devices,
            hour: time.hour(),
            day: time.day(),
            day_of_week: time.weekday().num_days_from_sunday(),
            date: time.date_naive(),
        }
    }

    pub fn from_raw(raw: &RawObservation) -> Result<Self> {
        let secs = raw.time.floor();
        let nanos = ((raw.time - secs) * 1e9).round().min(999_999_999.0) as u32;
        let time = Utc
            .timestamp_opt(secs as i64, nanos)
            .single()
            .ok_or_else(|| ChartError::InvalidDate(format!("timestamp {}", raw.time)))?;
        Ok(Self::at(time, raw.devices))
    }

    /// Last millisecond of the observation's hour (`13:00` -> `13:59`)
    pub fn hour_end(&self) -> DateTime<Utc> {
        let hour_start = self.time - Duration::seconds(i64::from(self.time.minute() * 60 + self.time.second()))
            - Duration::nanoseconds(i64::from(self.time.nanosecond()));
        hour_start + Duration::milliseconds(3_599_999)
    }
}

/// A calendar month, as chosen in the heatmap month picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ChartError::InvalidDate(format!("{}-{:02}", year, month)));
        }
        Ok(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM` (a trailing `-DD` is tolerated and ignored)
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.trim().split('-');
        let year = parts.next().and_then(|y| y.parse::<i32>().ok());
        let month = parts.next().and_then(|m| m.parse::<u32>().ok());
        match (year, month) {
            (Some(year), Some(month)) => Self::new(year, month),
            _ => Err(ChartError::InvalidDate(value.to_string())),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }

    /// Picker input label, e.g. `2019-Mar`
    pub fn label(&self) -> String {
        self.first_day().format("%Y-%b").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Weekday restriction for the averaged radial series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    AllDays,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Weekday,
    Weekend,
}

impl DayFilter {
    pub const ALL: [DayFilter; 10] = [
        DayFilter::AllDays,
        DayFilter::Monday,
        DayFilter::Tuesday,
        DayFilter::Wednesday,
        DayFilter::Thursday,
        DayFilter::Friday,
        DayFilter::Saturday,
        DayFilter::Sunday,
        DayFilter::Weekday,
        DayFilter::Weekend,
    ];

    /// Parse a dropdown label ("All days", "Monday", ..., "Weekend")
    pub fn parse(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ChartError::Config(format!("unknown day filter '{}'", value)))
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayFilter::AllDays => "All days",
            DayFilter::Monday => "Monday",
            DayFilter::Tuesday => "Tuesday",
            DayFilter::Wednesday => "Wednesday",
            DayFilter::Thursday => "Thursday",
            DayFilter::Friday => "Friday",
            DayFilter::Saturday => "Saturday",
            DayFilter::Sunday => "Sunday",
            DayFilter::Weekday => "Weekday",
            DayFilter::Weekend => "Weekend",
        }
    }

    /// Days of week (0 = Sunday) kept by the filter, `None` keeps everything
    pub fn days_of_week(&self) -> Option<&'static [u32]> {
        match self {
            DayFilter::AllDays => None,
            DayFilter::Monday => Some(&[1]),
            DayFilter::Tuesday => Some(&[2]),
            DayFilter::Wednesday => Some(&[3]),
            DayFilter::Thursday => Some(&[4]),
            DayFilter::Friday => Some(&[5]),
            DayFilter::Saturday => Some(&[6]),
            DayFilter::Sunday => Some(&[0]),
            DayFilter::Weekday => Some(&[1, 2, 3, 4, 5]),
            DayFilter::Weekend => Some(&[6, 0]),
        }
    }

    pub fn matches(&self, day_of_week: u32) -> bool {
        self.days_of_week()
            .map(|days| days.contains(&day_of_week))
            .unwrap_or(true)
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-box daily average, the record behind the home page bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxAverage {
    pub box_name: String,
    pub mean_devices_each_day: Option<f64>,
}

impl BoxAverage {
    /// Boxes without an average yet plot as an empty bar
    pub fn value(&self) -> f64 {
        self.mean_devices_each_day
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Every day from `start` through `end`; always contains `start`
pub fn enumerate_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = vec![start];
    let mut current = start;
    while let Some(next) = current.succ_opt() {
        if next > end {
            break;
        }
        dates.push(next);
        current = next;
    }
    dates
}

/// Parse a picker date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ChartError::InvalidDate(format!("'{}': {}", value, e)))
}

/// Non-empty, time-ordered observations
#[derive(Debug, Clone)]
pub struct ObservationSet {
    records: Vec<Observation>,
}

impl ObservationSet {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: Vec<RawObservation> = serde_json::from_slice(bytes)?;
        Self::from_raw(&raw)
    }

    pub fn from_raw(raw: &[RawObservation]) -> Result<Self> {
        let records = raw
            .iter()
            .map(Observation::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Self::from_observations(records)
    }

    pub fn from_observations(records: Vec<Observation>) -> Result<Self> {
        if records.is_empty() {
            return Err(ChartError::EmptyData);
        }
        Ok(ObservationSet { records })
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> &Observation {
        &self.records[0]
    }

    pub fn last(&self) -> &Observation {
        &self.records[self.records.len() - 1]
    }

    pub fn min_date(&self) -> NaiveDate {
        self.first().date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.last().date
    }

    pub fn max_devices(&self) -> u64 {
        self.records.iter().map(|r| r.devices).max().unwrap_or(0)
    }

    pub fn all_dates(&self) -> Vec<NaiveDate> {
        enumerate_days(self.min_date(), self.max_date())
    }

    /// Contiguous run from the first record at/after `start` up to the first
    /// record after `end`
    pub fn slice_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[Observation] {
        let Some(start_idx) = self.records.iter().position(|r| r.time >= start) else {
            return &[];
        };
        let end_idx = self
            .records
            .iter()
            .position(|r| r.time > end)
            .unwrap_or(self.records.len());
        if end_idx <= start_idx {
            return &[];
        }
        &self.records[start_idx..end_idx]
    }

    pub fn month_slice(&self, month: YearMonth) -> &[Observation] {
        self.slice_between(start_of_day(month.first_day()), end_of_day(month.last_day()))
    }

    pub fn day_slice(&self, date: NaiveDate) -> &[Observation] {
        self.slice_between(start_of_day(date), end_of_day(date))
    }

    /// Records from the start of `start` through the end of `end`
    pub fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Observation> {
        let from = start_of_day(start);
        let to = end_of_day(end);
        self.records
            .iter()
            .filter(|r| r.time >= from && r.time <= to)
            .collect()
    }
}
