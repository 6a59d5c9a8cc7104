//! Delimited-text export of ledgers and recommendation tables

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::projection::Ledger;
use crate::recommend::AssetRecommendation;

#[derive(Serialize)]
struct RecommendationRow<'a> {
    asset: &'a str,
    trailing_return: String,
    last_price: String,
}

/// Write `ledger` as CSV: period,balance,total_invested,cumulative_growth
pub fn write_ledger_csv<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if ledger.is_empty() {
        // serde only emits headers alongside the first record
        csv_writer.write_record(["period", "balance", "total_invested", "cumulative_growth"])?;
    }
    for entry in ledger {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write recommendations as CSV with display strings ("12.34%", "R$ 10.00", "N/A")
pub fn write_recommendations_csv<W: Write>(recommendations: &[AssetRecommendation], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if recommendations.is_empty() {
        csv_writer.write_record(["asset", "trailing_return", "last_price"])?;
    }
    for rec in recommendations {
        csv_writer.serialize(RecommendationRow {
            asset: &rec.asset,
            trailing_return: rec.return_display(),
            last_price: rec.price_display(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_ledger_csv_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    write_ledger_csv(ledger, File::create(path)?)
}

pub fn write_recommendations_csv_to_path(recommendations: &[AssetRecommendation], path: &Path) -> Result<()> {
    write_recommendations_csv(recommendations, File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, ProjectionParameters};

    #[test]
    fn test_ledger_csv_has_header_and_one_row_per_month() {
        let ledger = project(&ProjectionParameters::new(1000.0, 100.0, 3, 0.0)).unwrap();
        let mut buf = Vec::new();
        write_ledger_csv(&ledger, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "period,balance,total_invested,cumulative_growth");
        assert_eq!(lines[3], "3,1300.0,1300.0,0.0");
    }

    #[test]
    fn test_empty_ledger_still_has_header() {
        let mut buf = Vec::new();
        write_ledger_csv(&Ledger::new(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "period,balance,total_invested,cumulative_growth\n");
    }

    #[test]
    fn test_recommendations_csv() {
        let recs = vec![
            AssetRecommendation::live("BOVA11.SA", 0.1, 120.0),
            AssetRecommendation::not_applicable("CDB"),
        ];
        let mut buf = Vec::new();
        write_recommendations_csv(&recs, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "asset,trailing_return,last_price\nBOVA11.SA,10.00%,R$ 120.00\nCDB,N/A,N/A\n"
        );
    }
}
