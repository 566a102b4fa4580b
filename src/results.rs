use crate::error::ScoutError;
use crate::evidence::{MatchaAssessment, PlaceDetails};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One evaluated business, as written to the results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub place_id: String,
    pub website: Option<String>,

    /// Set only by the website crawl
    pub has_matcha: bool,

    /// Human-readable evidence, never empty
    pub matcha_evidence: Vec<String>,

    /// Raw place details payload
    pub details: Value,
}

impl BusinessRecord {
    pub fn new(
        place_id: String,
        details: &PlaceDetails,
        assessment: &MatchaAssessment,
        raw: Value,
    ) -> Self {
        Self {
            name: details.name.clone(),
            address: details.formatted_address.clone(),
            place_id,
            website: details.website().map(str::to_string),
            has_matcha: assessment.has_matcha,
            matcha_evidence: assessment.evidence_strings(),
            details: raw,
        }
    }
}

/// Write records as a pretty-printed JSON array, in the order given
pub fn write_records(path: impl AsRef<Path>, records: &[BusinessRecord]) -> Result<(), ScoutError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    ::log::info!("Saved {} businesses to {}", records.len(), path.display());
    Ok(())
}
