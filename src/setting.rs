//! Where to read the measurements, where to put the charts, and which
//! policies to plot. Loaded from an optional TOML file.

use crate::errors::*;
use crate::policy::{self, Policy};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The run setting.
#[derive(Debug, Clone)]
pub struct Setting {
    /// Directory holding the benchmark CSV files.
    pub input_dir: PathBuf,

    /// Directory receiving the PNG charts.
    pub output_dir: PathBuf,

    /// Policies to plot, in legend order.
    pub policies: Vec<Policy>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSetting {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    #[serde(default)]
    policy: Vec<RawPolicy>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    name: String,
    color: Option<String>,
}

impl Default for Setting {
    fn default() -> Self {
        Setting::in_dir(".")
    }
}

impl Setting {
    /// Reads and writes in `dir`, plotting the default policies.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Setting {
        Setting {
            input_dir: dir.as_ref().to_path_buf(),
            output_dir: dir.as_ref().to_path_buf(),
            policies: policy::default_policies(),
        }
    }

    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let mut file = File::open(path.as_ref()).chain_err(|| ErrorKind::Setting)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .chain_err(|| ErrorKind::Setting)?;
        Setting::from_toml(&contents)
    }

    /// Parses a TOML setting. Missing directories default to the working
    /// directory; the output directory defaults to the input directory.
    pub fn from_toml(contents: &str) -> Result<Setting> {
        let raw: RawSetting = toml::from_str(contents).chain_err(|| ErrorKind::Setting)?;

        let input_dir = raw.input_dir.unwrap_or_else(|| PathBuf::from("."));
        let output_dir = raw.output_dir.unwrap_or_else(|| input_dir.clone());
        let policies = if raw.policy.is_empty() {
            policy::default_policies()
        } else {
            raw.policy
                .into_iter()
                .map(|p| {
                    let color = match p.color {
                        Some(ref c) => policy::parse_color(c).chain_err(|| ErrorKind::Setting)?,
                        None => policy::UNKNOWN_COLOR,
                    };
                    Ok(Policy::new(p.name, color))
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Setting {
            input_dir: input_dir,
            output_dir: output_dir,
            policies: policies,
        })
    }
}
