//! Synthetic observation generator
//!
//! Writes an hourly `[{time, devices, seen_also_in_preceding_hour}]` JSON
//! array with a weekly rhythm, quiet nights and one daily peak, for trying
//! the charts without a live backend.
//!
//! Usage:
//!   cargo run --bin sample_data -- --days 60 --output data/sample.json
//!   cargo run --bin sample_data -- --start 2019-03-01 --peak-time morning --seed 7

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Busyness multiplier per weekday, Monday first
const WEEKDAY_MULTIPLIERS: [f64; 7] = [1.0, 1.1, 1.45, 1.31, 1.0, 1.0, 1.13];

/// Ratios between devices seen and devices also seen the hour before
const REPEAT_DIVISORS: [f64; 3] = [1.5, 2.5, 4.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PeakTime {
    /// 10:00 - 13:00, strongest at 11:00
    Morning,
    /// 16:00 - 19:00, strongest at 17:00
    Afternoon,
}

#[derive(Parser)]
#[command(name = "sample_data")]
#[command(about = "Generate synthetic hourly device observations")]
struct Args {
    /// First day (YYYY-MM-DD); defaults to `days` before today
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Number of days to generate
    #[arg(short, long, default_value_t = 7)]
    days: u32,

    /// Devices seen during a non-peak hour
    #[arg(long, default_value_t = 80.0)]
    base_busyness: f64,

    #[arg(long, value_enum, default_value_t = PeakTime::Afternoon)]
    peak_time: PeakTime,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SampleObservation {
    time: i64,
    devices: u64,
    seen_also_in_preceding_hour: u64,
}

/// Standard normal sample scaled to `mean` and `std_dev` (Box-Muller)
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

/// Busyness for an hour before noise
fn expected_devices(time: DateTime<Utc>, base: f64, peak: PeakTime) -> f64 {
    let hour = time.hour();
    let mut x = base;
    if hour >= 23 || hour <= 8 {
        x *= 2.0 / 3.0;
    }
    match peak {
        PeakTime::Morning if (10..=13).contains(&hour) => {
            x *= 1.5;
            if hour == 11 {
                x *= 1.17;
            }
        }
        PeakTime::Afternoon if (16..=19).contains(&hour) => {
            x *= 1.5;
            if hour == 17 {
                x *= 1.15;
            }
        }
        _ => {}
    }
    x * WEEKDAY_MULTIPLIERS[time.weekday().num_days_from_monday() as usize]
}

fn generate(
    rng: &mut impl Rng,
    start: NaiveDate,
    days: u32,
    base: f64,
    peak: PeakTime,
) -> Vec<SampleObservation> {
    let first = Utc.from_utc_datetime(&start.and_time(chrono::NaiveTime::MIN));
    (0..i64::from(days) * 24)
        .map(|i| {
            let time = first + Duration::hours(i);
            let x = (expected_devices(time, base, peak) * gauss(rng, 1.0, 0.05)).max(0.0);
            let divisor = REPEAT_DIVISORS.choose(rng).copied().unwrap_or(2.5);
            SampleObservation {
                time: time.timestamp(),
                devices: x as u64,
                seen_also_in_preceding_hour: (x / divisor) as u64,
            }
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.days == 0 {
        bail!("--days must be at least 1");
    }
    if args.base_busyness <= 0.0 {
        bail!("--base-busyness must be positive");
    }

    let start = args
        .start
        .unwrap_or_else(|| Utc::now().date_naive() - Duration::days(i64::from(args.days)));
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "Generating {} days from {} (base {}, {:?} peak)",
        args.days, start, args.base_busyness, args.peak_time
    );
    let records = generate(&mut rng, start, args.days, args.base_busyness, args.peak_time);
    let json = serde_json::to_string(&records)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
            info!("Wrote {} observations to {}", records.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        // 2019-03-18 is a Monday
        Utc.with_ymd_and_hms(2019, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_expected_devices() {
        // Monday noon, no peak
        assert_eq!(expected_devices(at(18, 12), 80.0, PeakTime::Afternoon), 80.0);
        // Night
        let night = expected_devices(at(18, 3), 90.0, PeakTime::Afternoon);
        assert!((night - 60.0).abs() < 1e-9);
        // Afternoon peak hour on a Wednesday
        let peak = expected_devices(at(20, 17), 100.0, PeakTime::Afternoon);
        assert!((peak - 100.0 * 1.5 * 1.15 * 1.45).abs() < 1e-9);
        // Morning peak only applies to morning
        assert_eq!(expected_devices(at(18, 11), 100.0, PeakTime::Afternoon), 100.0);
        let morning = expected_devices(at(18, 11), 100.0, PeakTime::Morning);
        assert!((morning - 100.0 * 1.5 * 1.17).abs() < 1e-9);
    }

    #[test]
    fn test_generate_is_hourly_and_seeded() {
        let start = NaiveDate::from_ymd_opt(2019, 3, 18).unwrap();
        let a = generate(&mut StdRng::seed_from_u64(1), start, 2, 80.0, PeakTime::Morning);
        let b = generate(&mut StdRng::seed_from_u64(1), start, 2, 80.0, PeakTime::Morning);
        assert_eq!(a.len(), 48);
        assert_eq!(a[1].time - a[0].time, 3600);
        assert_eq!(a[0].time, at(18, 0).timestamp());
        assert!(a.iter().zip(&b).all(|(x, y)| x.devices == y.devices));
        assert!(a.iter().all(|r| r.seen_also_in_preceding_hour <= r.devices));
    }

    #[test]
    fn test_gauss_stays_near_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 10_000;
        let mean = (0..n).map(|_| gauss(&mut rng, 1.0, 0.05)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.01);
    }
}
