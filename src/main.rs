mod accession;
mod catalog;
mod chart;
mod hits;
mod ranking;
mod report;

use accession::AccessionPattern;
use anyhow::{Context, Result};
use catalog::GenomeCatalog;
use clap::Parser;
use hits::{GenomeHits, HitFilter};
use log::info;
use ranking::Ranking;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Rank reference genomes by alignment hits in blast8 tabular output
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Tabular alignment files (blast8 / outfmt 6), one ranking per file
    #[arg(value_name = "BLAST8_FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Reference sequence directory (<genome>/<accession>.<version>.fna)
    #[arg(
        short = 'r',
        long,
        value_name = "DIR",
        default_value = "/data/proteotyping/reference_genomes"
    )]
    reference_dir: PathBuf,

    /// Minimum percent identity; records must exceed this to count
    #[arg(short = 'i', long, value_name = "PCT", default_value_t = 90.0)]
    min_identity: f64,

    /// Minimum alignment length; records must exceed this to count
    #[arg(short = 'l', long, value_name = "BP", default_value_t = 6)]
    min_length: u64,

    /// Also require mismatches < floor(RATIO * length)
    #[arg(long, value_name = "RATIO")]
    max_mismatch_ratio: Option<f64>,

    /// Number of genomes shown in charts and console output
    #[arg(short = 'k', long, value_name = "N", default_value_t = 20)]
    top: usize,

    /// Also print the top genomes to the console
    #[arg(short, long)]
    print: bool,
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args = Args::parse();

    let catalog = GenomeCatalog::from_dir(&args.reference_dir).with_context(|| {
        format!(
            "cannot build reference catalog from {}",
            args.reference_dir.display()
        )
    })?;
    info!(
        "reference catalog: {} accessions under {}",
        catalog.len(),
        args.reference_dir.display()
    );

    let pattern = AccessionPattern::refseq()?;
    let filter = HitFilter {
        min_identity: args.min_identity,
        min_length: args.min_length,
        max_mismatch_ratio: args.max_mismatch_ratio,
    };

    for input in &args.inputs {
        rank_file(input, &catalog, &pattern, filter, &args)?;
    }
    Ok(())
}

/// Run the full pipeline for one input file: stream, filter, resolve,
/// aggregate, then hand the ranking to each reporter.
fn rank_file(
    input: &Path,
    catalog: &GenomeCatalog,
    pattern: &AccessionPattern,
    filter: HitFilter,
    args: &Args,
) -> Result<()> {
    let hits = GenomeHits::open(input, catalog, pattern, filter)?;
    let ranking = Ranking::tally(hits)?;
    info!(
        "{}: {} passing hits across {} genomes",
        input.display(),
        ranking.total(),
        ranking.len()
    );

    let title = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("rankings");

    let txt = output_path(input, "txt");
    report::write_text(&ranking, &txt)
        .with_context(|| format!("cannot write ranking for {}", input.display()))?;
    info!("wrote report {}", txt.display());

    let png = output_path(input, "png");
    let jpg = output_path(input, "jpg");
    chart::write(&ranking, title, args.top, &[&png, &jpg])?;

    if args.print {
        println!("{}", input.display());
        report::print_top(&ranking, args.top);
    }
    Ok(())
}

/// `<input>_rankings.<ext>`, alongside the input file.
fn output_path(input: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(format!("_rankings.{ext}"));
    PathBuf::from(name)
}
