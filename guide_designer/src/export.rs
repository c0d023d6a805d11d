use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::models::GuideCandidate;

pub const CSV_FILE_NAME: &str = "gRNA_candidates.csv";
const CSV_HEADER: [&str; 4] = ["gRNA", "PAM", "position", "score"];

/// Writes the header even when there are no guides.
pub fn write_guides_csv<W: Write>(writer: W, guides: &[GuideCandidate]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for guide in guides {
        wtr.serialize(guide)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn guides_to_csv(guides: &[GuideCandidate]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_guides_csv(&mut buffer, guides)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn write_guides_csv_file(path: impl AsRef<Path>, guides: &[GuideCandidate]) -> Result<(), csv::Error> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_guides_csv(file, guides)?;
    info!("Wrote {} guides to {}", guides.len(), path.display());
    Ok(())
}
