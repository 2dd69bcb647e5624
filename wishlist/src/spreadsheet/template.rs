use std::io::Write;
use std::path::Path;

use crate::error::ExportResult;

const TEMPLATE_HEADERS: [&str; 7] = [
    "Set",
    "Number",
    "Pokemon",
    "Rarity",
    "Rarity Code",
    "Image Name",
    "Packs",
];

const TEMPLATE_ROWS: [[&str; 7]; 4] = [
    ["A1", "1", "Bulbasaur", "Common", "C", "bulbasaur", "Mewtwo,Pikachu"],
    ["A1", "4", "Charmander", "Common", "C", "charmander", "Charizard"],
    ["A1", "7", "Squirtle", "Common", "C", "squirtle", "Mewtwo,Charizard"],
    ["A1", "25", "Pikachu", "Common", "C", "pikachu", "Pikachu"],
];

/// Write a sample wishlist sheet users can fill in
pub fn write_template<W: Write>(writer: W) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TEMPLATE_HEADERS)?;
    for row in TEMPLATE_ROWS {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_template_file(path: &Path) -> ExportResult<()> {
    let file = std::fs::File::create(path)?;
    write_template(file)?;
    log::info!("Wrote wishlist template to {}", path.display());
    Ok(())
}
