// Genome hit frequency table with deterministic ordering
use anyhow::Result;
use std::collections::HashMap;

/// Frequency table of genome names. Presentation order is descending by
/// count; equal counts keep first-seen order, so the ranking is fully
/// deterministic for a given input stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ranking {
    counts: HashMap<String, u64>,
    first_seen: Vec<String>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a stream of genome names in a single pass, propagating the
    /// first error. This is the only way a lazy resolver stream gets
    /// drained; a failed stream produces no partial ranking.
    pub fn tally<I>(hits: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut ranking = Self::new();
        for genome in hits {
            ranking.add(genome?);
        }
        Ok(ranking)
    }

    pub fn add(&mut self, genome: String) {
        match self.counts.get_mut(&genome) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(genome.clone(), 1);
                self.first_seen.push(genome);
            }
        }
    }

    /// Complete ranking, descending by count, ties in first-seen order.
    pub fn all(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .first_seen
            .iter()
            .map(|genome| (genome.as_str(), self.counts[genome]))
            .collect();
        // stable sort over first-seen order gives the tie-break for free
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// The `k` most frequent entries.
    pub fn top(&self, k: usize) -> Vec<(&str, u64)> {
        let mut entries = self.all();
        entries.truncate(k);
        entries
    }

    pub fn count(&self, genome: &str) -> u64 {
        self.counts.get(genome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn ranking_of(genomes: &[&str]) -> Ranking {
        let mut ranking = Ranking::new();
        for genome in genomes {
            ranking.add(genome.to_string());
        }
        ranking
    }

    #[test]
    fn test_counts_occurrences() {
        let ranking = ranking_of(&["A", "B", "A", "A", "B"]);
        assert_eq!(ranking.count("A"), 3);
        assert_eq!(ranking.count("B"), 2);
        assert_eq!(ranking.count("C"), 0);
        assert_eq!(ranking.total(), 5);
        assert_eq!(ranking.len(), 2);
    }

    #[test]
    fn test_all_is_descending_by_count() {
        let ranking = ranking_of(&["A", "B", "B", "C", "C", "C"]);
        assert_eq!(ranking.all(), vec![("C", 3), ("B", 2), ("A", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranking = ranking_of(&["Z", "M", "A", "Z", "M", "A"]);
        assert_eq!(ranking.all(), vec![("Z", 2), ("M", 2), ("A", 2)]);
    }

    #[test]
    fn test_top_truncates() {
        let ranking = ranking_of(&["A", "B", "B", "C", "C", "C"]);
        assert_eq!(ranking.top(2), vec![("C", 3), ("B", 2)]);
        assert_eq!(ranking.top(10).len(), 3);
        assert!(ranking.top(0).is_empty());
    }

    #[test]
    fn test_tally_propagates_stream_errors() {
        let hits = vec![
            Ok("A".to_string()),
            Err(anyhow!("stream broke")),
            Ok("B".to_string()),
        ];
        assert!(Ranking::tally(hits).is_err());
    }

    #[test]
    fn test_tally_twice_is_identical() {
        let stream = || {
            ["A", "B", "A"]
                .iter()
                .map(|g| Ok(g.to_string()))
                .collect::<Vec<_>>()
        };
        let first = Ranking::tally(stream()).unwrap();
        let second = Ranking::tally(stream()).unwrap();
        assert_eq!(first, second);
    }
}
