//! Rows of the benchmark CSV files.

use crate::clean::{self, de_percent};
use crate::errors::*;
use serde::de::DeserializeOwned;
use std::path::Path;

/// One row of `speed_<Policy>.csv`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SpeedSample {
    /// allocation size in bytes
    #[serde(rename = "Size(Bytes)")]
    pub size: f64,

    /// time spent in `tmalloc()`
    #[serde(rename = "MallocTime(ns)")]
    pub malloc_time: f64,

    /// time spent in `tfree()`
    #[serde(rename = "FreeTime(ns)")]
    pub free_time: f64,
}

/// One row of `utilization_<Policy>.csv`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct UtilizationSample {
    /// time since the start of the run
    #[serde(rename = "Time(ns)")]
    pub time: f64,

    /// percentage of memory in use
    #[serde(rename = "Utilization(%)", deserialize_with = "de_percent")]
    pub utilization: f64,
}

/// A policy and its single measured value, as found in
/// `average_utilization.csv` and `overhead.csv`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyValue {
    /// policy label, whitespace trimmed
    pub policy: String,

    /// cleaned value
    pub value: f64,
}

/// Reads a CSV file with a header row into a list of records. A header that
/// doesn't match the record fails the whole file.
pub fn read_samples<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let mut vec = Vec::new();
    for record in rdr.deserialize() {
        vec.push(record?);
    }
    trace!("read {} rows from {:?}", vec.len(), path.as_ref());
    Ok(vec)
}

/// Reads a headerless `policy,value` file, cleaning each value with `clean`.
/// Rows with an empty value are left out.
pub fn read_policy_values<P, F>(path: P, clean: F) -> Result<Vec<PolicyValue>>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Result<f64>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    let mut vec = Vec::new();
    for record in rdr.deserialize() {
        let (policy, value): (String, String) = record?;
        if value.trim().is_empty() {
            debug!("{:?}: no value for {}", path.as_ref(), policy.trim());
            continue;
        }
        vec.push(PolicyValue {
            policy: policy.trim().to_string(),
            value: clean(&value)?,
        });
    }
    Ok(vec)
}

/// Reads `average_utilization.csv` (`First_Fit,85.5%`).
pub fn read_average_utilization<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyValue>> {
    read_policy_values(path, clean::parse_percent)
}

/// Reads `overhead.csv` (`First_Fit,1024 bytes`).
pub fn read_overhead<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyValue>> {
    read_policy_values(path, clean::parse_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> ::std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn speed_samples() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "speed_First_Fit.csv",
            "Size(Bytes),MallocTime(ns),FreeTime(ns)\n1,120.5,80\n2,130,81.25\n",
        );
        let samples: Vec<SpeedSample> = read_samples(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[1],
            SpeedSample {
                size: 2.0,
                malloc_time: 130.0,
                free_time: 81.25,
            }
        );
    }

    #[test]
    fn utilization_accepts_percent_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "utilization_Best_Fit.csv",
            "Time(ns),Utilization(%)\n0,0\n100,42.5%\n",
        );
        let samples: Vec<UtilizationSample> = read_samples(&path).unwrap();
        let util = samples.iter().map(|s| s.utilization).collect::<Vec<_>>();
        assert_eq!(vec![0.0, 42.5], util);
    }

    #[test]
    fn padded_cells_are_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "speed_First_Fit.csv",
            "Size(Bytes),MallocTime(ns),FreeTime(ns)\n           1,           120, 80\n2, 130, 81\n",
        );
        let samples: Vec<SpeedSample> = read_samples(&path).unwrap();
        assert_eq!(
            samples[0],
            SpeedSample {
                size: 1.0,
                malloc_time: 120.0,
                free_time: 80.0,
            }
        );
        assert_eq!(samples[1].free_time, 81.0);

        let path = write(
            &dir,
            "utilization_First_Fit.csv",
            "Time(ns), Utilization(%)\n            0, 0.00%\n          250, 12.50%\n",
        );
        let samples: Vec<UtilizationSample> = read_samples(&path).unwrap();
        assert_eq!(samples[1].time, 250.0);
        assert_eq!(samples[1].utilization, 12.5);
    }

    #[test]
    fn empty_value_leaves_out_the_row() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "average_utilization.csv", "First_Fit,\nBest_Fit,90%\n");
        let values = read_average_utilization(&path).unwrap();
        assert_eq!(
            values,
            vec![PolicyValue {
                policy: "Best_Fit".to_string(),
                value: 90.0,
            }]
        );
    }

    #[test]
    fn header_mismatch_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "speed_Worst_Fit.csv", "Size,Malloc,Free\n1,2,3\n");
        assert!(read_samples::<SpeedSample, _>(&path).is_err());
    }

    #[test]
    fn policy_values_are_cleaned() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "average_utilization.csv",
            "First_Fit, 85.5%\n Best_Fit ,90%\nWorst_Fit,70\n",
        );
        let values = read_average_utilization(&path).unwrap();
        assert_eq!(values[0].policy, "First_Fit");
        assert_eq!(values[0].value, 85.5);
        assert_eq!(values[1].policy, "Best_Fit");
        assert_eq!(values[2].value, 70.0);

        let path = write(&dir, "overhead.csv", "First_Fit,1024 bytes\nBest_Fit,64 BYTES\n");
        let values = read_overhead(&path).unwrap();
        let bytes = values.iter().map(|v| v.value).collect::<Vec<_>>();
        assert_eq!(vec![1024.0, 64.0], bytes);
    }

    #[test]
    fn malformed_policy_values_fail() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "overhead.csv", "First_Fit,lots of bytes\n");
        assert!(read_overhead(&path).is_err());

        let path = write(&dir, "average_utilization.csv", "First_Fit\n");
        assert!(read_average_utilization(&path).is_err());
    }
}
