//! CSV-based profile table loader
//!
//! Columns: `profile,annual_rate,assets`, with assets separated by `|` in recommendation order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::{ProfileSpec, ProfileTable, RiskProfile};
use crate::error::{PlannerError, Result};

/// Default path to the profile table
pub const DEFAULT_PROFILES_PATH: &str = "data/profiles.csv";

const ASSET_SEPARATOR: char = '|';

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    profile: String,
    annual_rate: f64,
    assets: String,
}

impl CsvRow {
    fn into_spec(self) -> Result<(RiskProfile, ProfileSpec)> {
        let profile = RiskProfile::parse(&self.profile)
            .ok_or_else(|| PlannerError::ProfileTable(format!("unknown profile: {}", self.profile)))?;

        if !self.annual_rate.is_finite() || self.annual_rate <= -1.0 {
            return Err(PlannerError::ProfileTable(format!(
                "annual rate {} for {} is out of range",
                self.annual_rate, profile
            )));
        }

        let assets = self
            .assets
            .split(ASSET_SEPARATOR)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        Ok((
            profile,
            ProfileSpec {
                annual_rate: self.annual_rate,
                assets,
            },
        ))
    }
}

/// Load the profile table from a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<ProfileTable> {
    let file = std::fs::File::open(path.as_ref())?;
    load_profiles_from_reader(file)
}

/// Load the profile table from any reader
pub fn load_profiles_from_reader<R: Read>(reader: R) -> Result<ProfileTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut specs = HashMap::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let (profile, spec) = row.into_spec()?;
        if specs.insert(profile, spec).is_some() {
            return Err(PlannerError::ProfileTable(format!("duplicate row for {profile}")));
        }
    }

    log::debug!("loaded {} risk profiles", specs.len());
    Ok(ProfileTable::from_specs(specs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_matches_builtin() {
        let loaded = ProfileTable::from_csv();
        assert!(loaded.is_ok(), "Failed to load profiles: {:?}", loaded.err());
        assert_eq!(loaded.unwrap(), ProfileTable::builtin());
    }

    #[test]
    fn test_load_from_reader() {
        let data = "profile,annual_rate,assets\nAgressivo,0.15,IVVB11.SA | BDR\n";
        let table = load_profiles_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.annual_rate_for("Aggressive"), 0.15);
        assert_eq!(table.assets_for("Aggressive"), ["IVVB11.SA", "BDR"]);
        assert!(table.assets_for("Conservative").is_empty());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let data = "profile,annual_rate,assets\nYolo,0.5,DOGE\n";
        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PlannerError::ProfileTable(_)));
    }

    #[test]
    fn test_duplicate_profile_rejected() {
        let data = "profile,annual_rate,assets\nBalanced,0.08,CDB\nEquilibrado,0.09,CDB\n";
        assert!(load_profiles_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_rate_rejected() {
        let data = "profile,annual_rate,assets\nBalanced,abc,CDB\n";
        assert!(matches!(load_profiles_from_reader(data.as_bytes()), Err(PlannerError::Csv(_))));

        let data = "profile,annual_rate,assets\nBalanced,-1.5,CDB\n";
        assert!(matches!(load_profiles_from_reader(data.as_bytes()), Err(PlannerError::ProfileTable(_))));
    }
}
