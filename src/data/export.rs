use std::fs;

use crate::data::types::{BeneficiaryWill, MilestoneRelease};

/// Export the claimable wills of the connected beneficiary to CSV.
///
/// Columns: kind, owner, will_index, release_index, amount
pub fn export_claimables_csv(
    wills: &[BeneficiaryWill],
    releases: &[MilestoneRelease],
    path: &str,
) -> Result<String, String> {
    let file = fs::File::create(path).map_err(|e| format!("Failed to create file: {e}"))?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["kind", "owner", "will_index", "release_index", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {e}"))?;

    for will in wills {
        wtr.write_record(&[
            "normal".to_string(),
            format!("{:#x}", will.owner),
            String::new(),
            String::new(),
            will.amount.clone(),
        ])
        .map_err(|e| format!("Failed to write CSV row: {e}"))?;
    }

    for release in releases {
        wtr.write_record(&[
            "milestone".to_string(),
            format!("{:#x}", release.owner),
            release.will_index.to_string(),
            release.release_index.to_string(),
            release.amount.clone(),
        ])
        .map_err(|e| format!("Failed to write CSV row: {e}"))?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {e}"))?;

    Ok(format!(
        "Exported {} claimables to {path}",
        wills.len() + releases.len()
    ))
}
