//! Runs every chart in turn. A missing or malformed input only costs the
//! series or chart that needs it; the rest of the run goes on.

use crate::chart::{self, Bar, BarLayout, Series};
use crate::errors::*;
use crate::policy::{self, Policy};
use crate::record::{self, PolicyValue, SpeedSample, UtilizationSample};
use crate::setting::Setting;
use error_chain::ChainedError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Output of the speed chart.
pub const SPEED_CHART: &str = "speed_comparison.png";
/// Output of the utilization chart.
pub const UTILIZATION_CHART: &str = "utilization_comparison.png";
/// Output of the average utilization bar chart.
pub const AVERAGE_UTILIZATION_CHART: &str = "average_utilization_bar.png";
/// Output of the overhead bar chart.
pub const OVERHEAD_CHART: &str = "overhead_bar.png";

/// Input of the average utilization bar chart.
pub const AVERAGE_UTILIZATION_FILE: &str = "average_utilization.csv";
/// Input of the overhead bar chart.
pub const OVERHEAD_FILE: &str = "overhead.csv";

#[derive(Debug, Default)]
/// What a run produced.
pub struct Summary {
    /// Charts written, in the order they were drawn.
    pub written: Vec<PathBuf>,

    /// Inputs that were missing or unreadable and therefore left out.
    pub skipped: Vec<PathBuf>,

    /// Charts that could not be produced, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl Summary {
    fn record(&mut self, out: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => {
                info!("wrote {}", out.display());
                self.written.push(out);
            }
            Err(e) => {
                warn!("skipping {}: {}", out.display(), e.display_chain());
                self.failed.push((out, e.to_string()));
            }
        }
    }
}

/// Draws all four charts described by `setting`.
///
/// Only a missing output directory fails the run. Everything else degrades
/// to fewer series or fewer charts, as reported in the returned `Summary`.
pub fn render_all(setting: &Setting) -> Result<Summary> {
    if !setting.output_dir.is_dir() {
        bail!("output directory {} does not exist", setting.output_dir.display());
    }

    let mut summary = Summary::default();

    let out = setting.output_dir.join(SPEED_CHART);
    let speed: Vec<Series<SpeedSample>> =
        load_series(setting, &mut summary, |p, dir| p.derive_speed_file(dir));
    let result = chart::speed_comparison(&out, &speed);
    summary.record(out, result);

    let out = setting.output_dir.join(UTILIZATION_CHART);
    let utilization: Vec<Series<UtilizationSample>> =
        load_series(setting, &mut summary, |p, dir| p.derive_utilization_file(dir));
    let utilization = utilization
        .into_iter()
        .map(|s| Series {
            label: s.label,
            color: s.color,
            samples: s.samples.iter().map(|u| (u.time, u.utilization)).collect(),
        })
        .collect::<Vec<_>>();
    let result = chart::utilization_comparison(&out, &utilization);
    summary.record(out, result);

    let layout = BarLayout {
        title: "Average Memory Utilization by Policy",
        y_desc: "Average Memory Utilization (%)",
        y_max: Some(100.0),
    };
    render_bars(
        setting,
        &mut summary,
        AVERAGE_UTILIZATION_FILE,
        AVERAGE_UTILIZATION_CHART,
        &layout,
        |path| record::read_average_utilization(path),
    );

    let layout = BarLayout {
        title: "Data Structure Overhead by Policy",
        y_desc: "Data Structure Overhead (Bytes)",
        y_max: None,
    };
    render_bars(
        setting,
        &mut summary,
        OVERHEAD_FILE,
        OVERHEAD_CHART,
        &layout,
        |path| record::read_overhead(path),
    );

    Ok(summary)
}

/// Loads one series per policy. Policies without a readable file are left
/// out of the chart.
fn load_series<T, F>(setting: &Setting, summary: &mut Summary, file_of: F) -> Vec<Series<T>>
where
    T: DeserializeOwned,
    F: Fn(&Policy, &Path) -> PathBuf,
{
    let mut vec = Vec::new();
    for policy in &setting.policies {
        let path = file_of(policy, setting.input_dir.as_path());
        if !path.exists() {
            warn!("{} not found, {} left out", path.display(), policy);
            summary.skipped.push(path);
            continue;
        }

        match record::read_samples(&path) {
            Ok(samples) => {
                debug!("{}: {} samples for {}", path.display(), samples.len(), policy);
                vec.push(Series {
                    label: policy.display_name(),
                    color: policy.color,
                    samples: samples,
                });
            }
            Err(e) => {
                warn!("{} is unreadable, {} left out: {}", path.display(), policy, e);
                summary.skipped.push(path);
            }
        }
    }
    vec
}

fn render_bars<F>(
    setting: &Setting,
    summary: &mut Summary,
    input: &str,
    output: &str,
    layout: &BarLayout,
    read: F,
) where
    F: Fn(&Path) -> Result<Vec<PolicyValue>>,
{
    let path = setting.input_dir.join(input);
    if !path.exists() {
        debug!("{} not found, no {}", path.display(), output);
        summary.skipped.push(path);
        return;
    }

    let out = setting.output_dir.join(output);
    let result = read(path.as_path())
        .chain_err(|| format!("failed to read {}", path.display()))
        .and_then(|values| {
            if values.is_empty() {
                bail!("{} has no rows", path.display());
            }
            let bars = to_bars(&setting.policies, values);
            chart::bar_chart(&out, layout, &bars)
        });
    summary.record(out, result);
}

fn to_bars(policies: &[Policy], values: Vec<PolicyValue>) -> Vec<Bar> {
    values
        .into_iter()
        .map(|v| Bar {
            label: policy::display_name(&v.policy),
            value: v.value,
            color: policy::color_for(policies, &v.policy),
        })
        .collect()
}
