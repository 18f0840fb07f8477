//! Allocation policies and the files derived from them.

use crate::errors::*;
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};

/// Color for a policy that isn't in the configured set.
pub const UNKNOWN_COLOR: RGBColor = RGBColor(128, 128, 128);

#[derive(Debug, Clone, PartialEq)]
/// An allocation policy, identified by the label the benchmark harness uses
/// in its file names (e.g. `First_Fit`).
pub struct Policy {
    /// label as it appears in file names and data
    pub name: String,

    /// color of every series that belongs to this policy
    pub color: RGBColor,
}

impl Policy {
    /// Creates a new `Policy`
    pub fn new<S: Into<String>>(name: S, color: RGBColor) -> Self {
        Policy {
            name: name.into(),
            color: color,
        }
    }

    /// Name used in legends and bar labels.
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// Gets the filename of the speed measurement.
    pub fn derive_speed_file<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref().join(format!("speed_{}.csv", self.name))
    }

    /// Gets the filename of the utilization trace.
    pub fn derive_utilization_file<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref().join(format!("utilization_{}.csv", self.name))
    }
}

impl ::std::fmt::Display for Policy {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Replaces underscores with spaces: `First_Fit` becomes `First Fit`.
pub fn display_name(name: &str) -> String {
    name.replace('_', " ")
}

/// Returns the default policies: first fit, best fit and worst fit.
pub fn default_policies() -> Vec<Policy> {
    vec![
        Policy::new("First_Fit", RGBColor(0, 0, 255)),
        Policy::new("Best_Fit", RGBColor(0, 128, 0)),
        Policy::new("Worst_Fit", RGBColor(255, 0, 0)),
    ]
}

/// Looks up the color of `name`, falling back to gray.
pub fn color_for(policies: &[Policy], name: &str) -> RGBColor {
    policies
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.color)
        .unwrap_or(UNKNOWN_COLOR)
}

/// Parses a color given either by name (`blue`) or as `#rrggbb`.
pub fn parse_color(s: &str) -> Result<RGBColor> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 && s.is_ascii() {
        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .chain_err(|| ErrorKind::MalformedValue(s.to_string()))
        };
        return Ok(RGBColor(channel(1)?, channel(3)?, channel(5)?));
    }

    let color = match s.to_lowercase().as_str() {
        "blue" => RGBColor(0, 0, 255),
        "green" => RGBColor(0, 128, 0),
        "red" => RGBColor(255, 0, 0),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "brown" => RGBColor(165, 42, 42),
        "black" => RGBColor(0, 0, 0),
        "gray" | "grey" => UNKNOWN_COLOR,
        _ => bail!(ErrorKind::MalformedValue(s.to_string())),
    };
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_files() {
        let policies = default_policies();
        let names = policies.iter().map(|p| p.display_name()).collect::<Vec<_>>();
        assert_eq!(vec!["First Fit", "Best Fit", "Worst Fit"], names);

        let p = &policies[1];
        assert_eq!(p.derive_speed_file("data"), Path::new("data/speed_Best_Fit.csv"));
        assert_eq!(
            p.derive_utilization_file("."),
            Path::new("./utilization_Best_Fit.csv")
        );
    }

    #[test]
    fn unknown_policy_is_gray() {
        let policies = default_policies();
        assert_eq!(color_for(&policies, "Worst_Fit"), RGBColor(255, 0, 0));
        assert_eq!(color_for(&policies, "Next_Fit"), UNKNOWN_COLOR);
    }

    #[test]
    fn colors_by_name_or_hex() {
        assert_eq!(parse_color("Green").unwrap(), RGBColor(0, 128, 0));
        assert_eq!(parse_color("#10ff0a").unwrap(), RGBColor(16, 255, 10));
        assert!(parse_color("#zz0000").is_err());
        assert!(parse_color("chartreuse-ish").is_err());
    }
}
