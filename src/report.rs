// Text reporters for a completed ranking
use crate::ranking::Ranking;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the complete ranking as `count genome` lines, counts right-aligned
/// to the widest (first, since ordering is descending) count.
pub fn write_text(ranking: &Ranking, path: &Path) -> Result<()> {
    let entries = ranking.all();
    let width = entries
        .first()
        .map_or(1, |(_, count)| count.to_string().len());

    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (genome, count) in entries {
        writeln!(writer, "{count:>width$} {genome}")
            .with_context(|| format!("failed to write report file {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write report file {}", path.display()))?;
    Ok(())
}

/// Print the top `k` entries to stdout.
pub fn print_top(ranking: &Ranking, k: usize) {
    for (genome, count) in ranking.top(k) {
        println!("{count} {genome}");
    }
}
