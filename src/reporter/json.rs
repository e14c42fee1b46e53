use super::WarningGroups;
use crate::rules::Warning;
use anyhow::Result;

pub fn report(warnings: &[Warning]) -> Result<()> {
    println!("{}", format(warnings)?);
    Ok(())
}

/// Format warnings as a JSON array, in grouped order, without printing.
pub fn format(warnings: &[Warning]) -> Result<String> {
    let grouped: Vec<&Warning> = WarningGroups::new(warnings).iter().collect();
    Ok(serde_json::to_string_pretty(&grouped)?)
}
