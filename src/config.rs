//! Loading of pricing configuration.

use crate::domain::pricing::PricingTable;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a JSON pricing table. Tier lists may appear in any order; tables
/// failing [`PricingTable::validate`] are rejected.
pub fn read_pricing_table<R: Read>(source: R) -> Result<PricingTable> {
    let table: PricingTable = serde_json::from_reader(source)?;
    let table = table.normalized();
    table.validate()?;
    Ok(table)
}

/// Loads the pricing table at `path`, or the standard table when no path is
/// given.
pub fn load_pricing_table(path: Option<&Path>) -> Result<PricingTable> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            let table = read_pricing_table(BufReader::new(file))?;
            tracing::debug!(path = %path.display(), "Loaded pricing table");
            Ok(table)
        }
        None => Ok(PricingTable::standard()),
    }
}
