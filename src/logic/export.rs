//! CSV export of a standings table.

use crate::logic::standings::StandingRecord;
use std::io;

/// Write `records` (already ranked) as CSV with a 1-based rank column.
pub fn write_standings_csv<W: io::Write>(
    records: &[StandingRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["rank", "team", "wins", "ties", "losses", "gf", "ga", "gd", "pins"])?;
    for (i, r) in records.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            r.name.clone(),
            r.wins.to_string(),
            r.ties.to_string(),
            r.losses.to_string(),
            r.gf.to_string(),
            r.ga.to_string(),
            r.goal_difference().to_string(),
            r.pins.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Same as [`write_standings_csv`] into a string.
pub fn standings_csv(records: &[StandingRecord]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_standings_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
