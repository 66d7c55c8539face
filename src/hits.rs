// Streaming blast8 parsing, quality filtering, and hit-to-genome resolution
use crate::accession::AccessionPattern;
use crate::catalog::GenomeCatalog;
use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One line of blast8 (outfmt 6) tabular output. Only the first five
/// fields matter here; gap openings, coordinates, e-value and bit score
/// are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub query: String,
    pub target: String,
    pub identity: f64,
    pub length: u64,
    pub mismatches: u64,
}

impl HitRecord {
    /// Parse a whitespace-delimited record line. The format is assumed
    /// well-formed; a line that does not fit the shape is an error, not a
    /// skip.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            bail!(
                "expected at least 5 whitespace-separated fields, found {}",
                fields.len()
            );
        }
        let identity: f64 = fields[2]
            .parse()
            .with_context(|| format!("unparseable percent identity {:?}", fields[2]))?;
        let length: u64 = fields[3]
            .parse()
            .with_context(|| format!("unparseable alignment length {:?}", fields[3]))?;
        let mismatches: u64 = fields[4]
            .parse()
            .with_context(|| format!("unparseable mismatch count {:?}", fields[4]))?;
        Ok(Self {
            query: fields[0].to_string(),
            target: fields[1].to_string(),
            identity,
            length,
            mismatches,
        })
    }
}

/// Quality thresholds applied to each record. Both threshold comparisons
/// are strict: a record exactly at a threshold does not pass.
#[derive(Debug, Clone, Copy)]
pub struct HitFilter {
    pub min_identity: f64,
    pub min_length: u64,
    /// When set, additionally require `mismatches < floor(ratio * length)`.
    pub max_mismatch_ratio: Option<f64>,
}

impl HitFilter {
    pub fn accepts(&self, rec: &HitRecord) -> bool {
        if !(rec.identity > self.min_identity && rec.length > self.min_length) {
            return false;
        }
        match self.max_mismatch_ratio {
            Some(ratio) => (rec.mismatches as f64) < (ratio * rec.length as f64).floor(),
            None => true,
        }
    }
}

/// Lazy stream of genome names, one per alignment record that passes the
/// filter, in input line order. Holds the open file handle, so it is
/// single-pass and non-restartable; re-invoke `open` to read again.
///
/// Unresolvable records are fatal: an extraction failure or an accession
/// missing from the catalog means the alignment file and the reference
/// catalog are out of sync, and a ranking built by skipping such records
/// would be silently wrong. After yielding an error the stream is fused.
pub struct GenomeHits<'a> {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: u64,
    catalog: &'a GenomeCatalog,
    pattern: &'a AccessionPattern,
    filter: HitFilter,
    failed: bool,
}

impl<'a> GenomeHits<'a> {
    pub fn open(
        path: &Path,
        catalog: &'a GenomeCatalog,
        pattern: &'a AccessionPattern,
        filter: HitFilter,
    ) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open alignment file {}", path.display()))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path: path.to_path_buf(),
            line_no: 0,
            catalog,
            pattern,
            filter,
            failed: false,
        })
    }

    fn fail(&mut self, err: anyhow::Error) -> Option<Result<String>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for GenomeHits<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    let path = self.path.display().to_string();
                    return self.fail(
                        anyhow!(err).context(format!("read error in {path}")),
                    );
                }
            };
            self.line_no += 1;

            let rec = match HitRecord::parse(&line) {
                Ok(rec) => rec,
                Err(err) => {
                    let at = format!("{}:{}", self.path.display(), self.line_no);
                    return self.fail(err.context(format!("malformed record at {at}")));
                }
            };

            if !self.filter.accepts(&rec) {
                continue;
            }

            let accession = match self.pattern.extract(&rec.target) {
                Some(accession) => accession,
                None => {
                    return self.fail(anyhow!(
                        "{}:{}: no accession recognized in target id {:?}",
                        self.path.display(),
                        self.line_no,
                        rec.target
                    ));
                }
            };

            match self.catalog.lookup(accession) {
                Some(genome) => return Some(Ok(genome.to_string())),
                None => {
                    return self.fail(anyhow!(
                        "{}:{}: accession {:?} not in the reference catalog",
                        self.path.display(),
                        self.line_no,
                        accession
                    ));
                }
            }
        }
    }
}
