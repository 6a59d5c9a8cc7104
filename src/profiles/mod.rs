//! Risk profiles and the fixed profile → growth rate / asset list table

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Suffix marking an identifier as a listed ticker with live prices
pub const MARKET_SUFFIX: &str = ".SA";

/// Growth rate assumed when the profile name is not recognised
pub const DEFAULT_ANNUAL_RATE: f64 = 0.05;

/// Investor risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [RiskProfile::Conservative, RiskProfile::Balanced, RiskProfile::Aggressive];

    /// Parse a profile name
    ///
    /// Accepts the English names and the Portuguese form labels
    /// ("Conservador", "Equilibrado", "Agressivo"), ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "conservative" | "conservador" => Some(RiskProfile::Conservative),
            "balanced" | "equilibrado" => Some(RiskProfile::Balanced),
            "aggressive" | "agressivo" => Some(RiskProfile::Aggressive),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Balanced => "Balanced",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when `asset` needs a live price lookup
pub fn is_market_asset(asset: &str) -> bool {
    asset.ends_with(MARKET_SUFFIX)
}

/// Growth assumption and recommended assets for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub annual_rate: f64,
    /// Asset identifiers in recommendation order
    pub assets: Vec<String>,
}

impl ProfileSpec {
    pub fn new(annual_rate: f64, assets: &[&str]) -> Self {
        Self {
            annual_rate,
            assets: assets.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Immutable profile lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    specs: HashMap<RiskProfile, ProfileSpec>,
}

impl ProfileTable {
    /// The built-in table
    pub fn builtin() -> Self {
        let specs = HashMap::from([
            (RiskProfile::Conservative, ProfileSpec::new(0.05, &["IMAB11.SA", "TESOURO SELIC"])),
            (RiskProfile::Balanced, ProfileSpec::new(0.08, &["BOVA11.SA", "IMAB11.SA", "CDB"])),
            (RiskProfile::Aggressive, ProfileSpec::new(0.12, &["IVVB11.SA", "BOVA11.SA", "BDR"])),
        ]);
        Self { specs }
    }

    pub(crate) fn from_specs(specs: HashMap<RiskProfile, ProfileSpec>) -> Self {
        Self { specs }
    }

    /// Load the table from CSV in the default location (data/profiles.csv)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_PROFILES_PATH))
    }

    /// Load the table from a specific CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        loader::load_profiles(path)
    }

    pub fn get(&self, profile: RiskProfile) -> Option<&ProfileSpec> {
        self.specs.get(&profile)
    }

    /// Resolve a free-form profile name
    pub fn lookup(&self, name: &str) -> Option<(RiskProfile, &ProfileSpec)> {
        let profile = RiskProfile::parse(name)?;
        self.specs.get(&profile).map(|spec| (profile, spec))
    }

    /// Annual growth rate for `name`, falling back to [`DEFAULT_ANNUAL_RATE`]
    pub fn annual_rate_for(&self, name: &str) -> f64 {
        self.lookup(name)
            .map(|(_, spec)| spec.annual_rate)
            .unwrap_or(DEFAULT_ANNUAL_RATE)
    }

    /// Recommended assets for `name`; empty when the profile is unknown
    pub fn assets_for(&self, name: &str) -> &[String] {
        self.lookup(name)
            .map(|(_, spec)| spec.assets.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}
