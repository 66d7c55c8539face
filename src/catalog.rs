// Accession -> genome lookup built from a reference sequence directory tree
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Extension marking nucleotide FASTA reference files.
const NUCLEOTIDE_EXT: &str = "fna";

/// Read-only mapping from accession (base file name up to the first '.')
/// to genome name (the file's immediate parent directory). Built once per
/// run, before any alignment file is opened.
#[derive(Debug, Default, Clone)]
pub struct GenomeCatalog {
    entries: HashMap<String, String>,
}

impl GenomeCatalog {
    /// Scan a reference directory tree recursively, following symlinks.
    ///
    /// Expects the layout `<root>/.../<genome>/<accession>.<version>.fna`.
    /// Duplicate accessions are not detected; the last file scanned wins.
    /// An empty catalog is a valid outcome, a missing root is not.
    pub fn from_dir<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            bail!(
                "reference catalog root not found or not a directory: {}",
                root.display()
            );
        }

        let mut entries = HashMap::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let listing = fs::read_dir(&dir)
                .with_context(|| format!("failed to read directory {}", dir.display()))?;
            for entry in listing {
                let entry = entry
                    .with_context(|| format!("failed to read entry in {}", dir.display()))?;
                let path = entry.path();
                // Path::is_dir resolves symlinks, matching a follow-links walk.
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == NUCLEOTIDE_EXT) {
                    if let Some((accession, genome)) = catalog_entry(&path) {
                        entries.insert(accession, genome);
                    }
                }
            }
        }

        if entries.is_empty() {
            log::warn!(
                "no *.{} files found under {}; catalog is empty",
                NUCLEOTIDE_EXT,
                root.display()
            );
        }

        Ok(Self { entries })
    }

    /// Resolve an accession to its genome name.
    pub fn lookup(&self, accession: &str) -> Option<&str> {
        self.entries.get(accession).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive (accession, genome) from a reference file path. Returns None for
/// paths without a usable file name or parent directory name.
fn catalog_entry(path: &Path) -> Option<(String, String)> {
    let file_name = path.file_name()?.to_str()?;
    let accession = file_name.split('.').next()?;
    if accession.is_empty() {
        return None;
    }
    let genome = path.parent()?.file_name()?.to_str()?;
    Some((accession.to_string(), genome.to_string()))
}
