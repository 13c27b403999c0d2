use crate::columns::Column;
use crate::error::ScResult;
use crate::ledger::ScoreLedger;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the card as CSV: a `player` column followed by the 23 card labels.
/// Totals are recomputed on a copy first, the ledger itself is not touched.
pub fn write_csv<W: Write>(ledger: &ScoreLedger, writer: W) -> ScResult<()> {
    let mut card = ledger.clone();
    card.recompute_all();

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["player".to_string()];
    header.extend(Column::all().iter().map(|c| c.to_string()));
    wtr.write_record(&header)?;

    for player in 1..=card.players() {
        let mut record = vec![format!("P{}", player)];
        record.extend(card.row(player).into_iter().map(str::to_string));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports to a file. The file is written in full or the error is returned;
/// retrying is safe.
pub fn export_csv_file<P: AsRef<Path>>(ledger: &ScoreLedger, path: P) -> ScResult<()> {
    let mut buf = Vec::new();
    write_csv(ledger, &mut buf)?;
    File::create(path.as_ref())?.write_all(&buf)?;
    info!("card exported to {:?}", path.as_ref());
    Ok(())
}
