//! Shared chart generation pipeline
//!
//! The pipeline:
//! 1. Loads observations (and optional box averages) from their sources
//! 2. Computes KPIs and builds the dashboard charts
//! 3. Replays a scripted list of interactions
//! 4. Renders every chart and returns the results for output handling

use crate::charts::{BarChart, CellRef};
use crate::config::ChartConfig;
use crate::dashboard::{Dashboard, HeatmapTarget};
use crate::data::error::{ChartError, Result};
use crate::data::kpi::{compute_kpis, Kpis};
use crate::data::records::{DayFilter, YearMonth};
use crate::data::source::{load_box_averages, DataSource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One rendered output file
#[derive(Debug, Clone)]
pub struct ChartResult {
    pub name: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl ChartResult {
    fn new(name: &str, extension: &'static str, bytes: impl Into<Vec<u8>>) -> Self {
        ChartResult {
            name: name.to_string(),
            extension,
            bytes: bytes.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub charts: Vec<ChartResult>,
    pub kpis: Kpis,
}

/// A scripted user action, replayed in order
///
/// Scripts are JSON lists tagged by `action`, e.g.
/// `{"action": "click_cell", "date": "2019-03-18", "hour": 9}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    HoverCell {
        date: NaiveDate,
        hour: u32,
        #[serde(default)]
        chart: HeatmapTarget,
        /// Pressed pointer buttons; the primary button means panning
        #[serde(default)]
        buttons: u16,
    },
    LeaveCell {
        date: NaiveDate,
        hour: u32,
        #[serde(default)]
        chart: HeatmapTarget,
    },
    ClickCell {
        date: NaiveDate,
        hour: u32,
        #[serde(default)]
        chart: HeatmapTarget,
    },
    /// Drag the scrolling heatmap by `dx` pixels
    Pan { dx: f64 },
    /// Month picker value, `YYYY-MM`
    SelectMonth { month: String },
    SetRange { start: NaiveDate, end: NaiveDate },
    /// Day filter dropdown label
    SetFilter { filter: String },
    HoverHour { hour: u32 },
    LeaveHour,
    HoverBar { index: usize },
    LeaveBar,
    Resize { width: f64, height: f64 },
}

pub async fn load_interactions(path: &Path) -> Result<Vec<Interaction>> {
    let bytes = tokio::fs::read(path).await?;
    let script: Vec<Interaction> = serde_json::from_slice(&bytes)?;
    info!("Loaded {} interactions from {}", script.len(), path.display());
    Ok(script)
}

/// Replay one interaction against the charts
pub fn apply_interaction(
    dashboard: &mut Dashboard,
    bar: Option<&mut BarChart>,
    interaction: &Interaction,
) -> Result<()> {
    match interaction {
        Interaction::HoverCell {
            date,
            hour,
            chart,
            buttons,
        } => {
            dashboard.hover_cell(*chart, CellRef::new(*date, *hour), *buttons);
        }
        Interaction::LeaveCell { date, hour, chart } => {
            dashboard.leave_cell(*chart, CellRef::new(*date, *hour));
        }
        Interaction::ClickCell { date, hour, chart } => {
            dashboard.click_cell(*chart, CellRef::new(*date, *hour));
        }
        Interaction::Pan { dx } => {
            dashboard.pan_by(*dx);
        }
        Interaction::SelectMonth { month } => {
            dashboard.select_month(YearMonth::parse(month)?)?;
        }
        Interaction::SetRange { start, end } => {
            dashboard.set_date_range(*start, *end)?;
        }
        Interaction::SetFilter { filter } => {
            dashboard.set_day_filter(DayFilter::parse(filter)?);
        }
        Interaction::HoverHour { hour } => dashboard.hover_hour(*hour),
        Interaction::LeaveHour => dashboard.leave_hour(),
        Interaction::HoverBar { index } => match bar {
            Some(bar) => bar.hover_bar(*index),
            None => return Err(ChartError::Config("no bar chart to hover".to_string())),
        },
        Interaction::LeaveBar => {
            if let Some(bar) = bar {
                bar.leave_bar();
            }
        }
        Interaction::Resize { width, height } => {
            dashboard.resize(*width, *height);
            if let Some(bar) = bar {
                bar.resize(*width, *height);
            }
        }
    }
    Ok(())
}

/// Load, build, interact, render
///
/// A failing interaction is logged and skipped; the rest of the script still runs.
pub async fn generate_charts(
    source: &dyn DataSource,
    boxes: Option<&dyn DataSource>,
    config: &ChartConfig,
    interactions: &[Interaction],
) -> Result<PipelineOutput> {
    let t0 = Instant::now();

    info!("[1/4] Loading data...");
    let observations = source.load_observations().await?;
    let box_averages = match boxes {
        Some(boxes) => Some(load_box_averages(boxes).await?),
        None => None,
    };

    info!("[2/4] Building charts...");
    let kpis = compute_kpis(&observations)?;
    debug!("KPIs: {:?}", kpis);
    let mut dashboard = Dashboard::new(observations, config);
    let mut bar = match box_averages {
        Some(averages) => Some(BarChart::new(config.bar_options(), averages)?),
        None => None,
    };

    info!("[3/4] Applying {} interaction(s)...", interactions.len());
    for (i, interaction) in interactions.iter().enumerate() {
        if let Err(e) = apply_interaction(&mut dashboard, bar.as_mut(), interaction) {
            warn!("Interaction {} ({:?}) skipped: {}", i + 1, interaction, e);
        }
    }
    debug!("{} date change(s) delivered", dashboard.delivered());

    info!("[4/4] Rendering...");
    let mut charts = vec![
        ChartResult::new("heatmap", "svg", dashboard.heatmap().render()),
        ChartResult::new("monthly_heatmap", "svg", dashboard.monthly().render()),
        ChartResult::new("radial_bar", "svg", dashboard.radial().render()),
    ];
    let mut extra = Vec::new();
    if let Some(bar) = &bar {
        let svg = bar.render();
        extra.push(("barChartContainer", svg.clone()));
        charts.push(ChartResult::new("bar_chart", "svg", svg));
    }
    charts.push(ChartResult::new("dashboard", "html", dashboard.to_html(&extra)));
    charts.push(ChartResult::new("kpis", "json", serde_json::to_vec_pretty(&kpis)?));

    info!(
        "Generated {} outputs in {:.2?}",
        charts.len(),
        t0.elapsed()
    );
    Ok(PipelineOutput { charts, kpis })
}

/// Write every result into `dir`, creating it if needed
pub async fn write_results(results: &[ChartResult], dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;
    let mut paths = Vec::with_capacity(results.len());
    for result in results {
        let path = dir.join(result.file_name());
        tokio::fs::write(&path, &result.bytes).await?;
        info!("  {} ({} bytes)", path.display(), result.bytes.len());
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::start_of_day;
    use crate::data::source::FileSource;
    use chrono::Duration;
    use std::io::Write;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, m, d).unwrap()
    }

    /// Hourly JSON for Feb 1 .. Mar 31, 2019
    fn observations_file() -> tempfile::NamedTempFile {
        let start = start_of_day(date(2, 1));
        let records: Vec<serde_json::Value> = (0..59 * 24)
            .map(|i| {
                let time = start + Duration::hours(i);
                serde_json::json!({ "time": time.timestamp(), "devices": 5 + i % 24 })
            })
            .collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&records).unwrap().as_bytes())
            .unwrap();
        file
    }

    fn boxes_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"box_name": "lobby", "mean_devices_each_day": 310.5},
                 {"box_name": "canteen", "mean_devices_each_day": null}]"#,
        )
        .unwrap();
        file
    }

    fn names(output: &PipelineOutput) -> Vec<String> {
        output.charts.iter().map(ChartResult::file_name).collect()
    }

    #[test]
    fn test_interaction_script_json() {
        let script: Vec<Interaction> = serde_json::from_str(
            r#"[
                {"action": "hover_cell", "date": "2019-03-18", "hour": 9},
                {"action": "click_cell", "date": "2019-03-02", "hour": 0, "chart": "monthly"},
                {"action": "pan", "dx": -120.5},
                {"action": "select_month", "month": "2019-02"},
                {"action": "set_filter", "filter": "Weekend"},
                {"action": "leave_hour"}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.len(), 6);
        assert_eq!(
            script[0],
            Interaction::HoverCell {
                date: date(3, 18),
                hour: 9,
                chart: HeatmapTarget::Scrolling,
                buttons: 0
            }
        );
        assert!(matches!(
            script[1],
            Interaction::ClickCell {
                chart: HeatmapTarget::Monthly,
                ..
            }
        ));
        assert_eq!(script[5], Interaction::LeaveHour);
    }

    #[tokio::test]
    async fn test_generate_without_boxes() {
        let file = observations_file();
        let source = FileSource::new(file.path());
        let output = generate_charts(&source, None, &ChartConfig::default(), &[])
            .await
            .unwrap();
        assert_eq!(
            names(&output),
            vec![
                "heatmap.svg",
                "monthly_heatmap.svg",
                "radial_bar.svg",
                "dashboard.html",
                "kpis.json"
            ]
        );
        // Every hour has the same count on every day
        let by_hour = output.kpis.busyness.by_hour.as_ref().unwrap();
        assert_eq!(by_hour.hour_of_day, 23);
        let kpis: serde_json::Value =
            serde_json::from_slice(&output.charts[4].bytes).unwrap();
        assert_eq!(kpis["busyness"]["by_hour"]["hour_of_day"], 23);
    }

    #[tokio::test]
    async fn test_generate_with_boxes_and_script() {
        let observations = observations_file();
        let boxes = boxes_file();
        let source = FileSource::new(observations.path());
        let box_source = FileSource::new(boxes.path());
        let script = vec![
            Interaction::ClickCell {
                date: date(3, 18),
                hour: 9,
                chart: HeatmapTarget::Scrolling,
            },
            // Outside the data: skipped with a warning
            Interaction::SelectMonth {
                month: "2020-01".to_string(),
            },
            Interaction::HoverBar { index: 0 },
        ];
        let output = generate_charts(
            &source,
            Some(&box_source),
            &ChartConfig::default(),
            &script,
        )
        .await
        .unwrap();

        assert_eq!(output.charts.len(), 6);
        let radial = String::from_utf8(output.charts[2].bytes.clone()).unwrap();
        assert!(radial.contains("2019-03-18"));
        let bar = output
            .charts
            .iter()
            .find(|c| c.name == "bar_chart")
            .unwrap();
        let bar = String::from_utf8(bar.bytes.clone()).unwrap();
        assert!(bar.contains("lobby"));
        assert!(bar.contains("class=\"tooltip\""));
        let html = output
            .charts
            .iter()
            .find(|c| c.extension == "html")
            .unwrap();
        assert!(String::from_utf8_lossy(&html.bytes).contains("data-chart=\"barChartContainer\""));
    }

    #[tokio::test]
    async fn test_missing_source_fails() {
        let source = FileSource::new("/no/such/observations.json");
        let result = generate_charts(&source, None, &ChartConfig::default(), &[]).await;
        assert!(matches!(result, Err(ChartError::Io(_))));
    }

    #[tokio::test]
    async fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let results = vec![
            ChartResult::new("a", "svg", "<svg/>"),
            ChartResult::new("b", "json", "{}"),
        ];
        let paths = write_results(&results, &out).await.unwrap();
        assert_eq!(paths, vec![out.join("a.svg"), out.join("b.json")]);
        assert_eq!(std::fs::read_to_string(out.join("a.svg")).unwrap(), "<svg/>");
    }

    #[tokio::test]
    async fn test_load_interactions_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"action": "resize", "width": 800, "height": 600}]"#)
            .unwrap();
        let script = load_interactions(file.path()).await.unwrap();
        assert_eq!(
            script,
            vec![Interaction::Resize {
                width: 800.0,
                height: 600.0
            }]
        );
    }
}
