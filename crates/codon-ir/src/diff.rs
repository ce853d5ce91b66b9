//! Codon-level comparison of two genomes.

use crate::lexer::normalize;
use serde::{Deserialize, Serialize};

/// A codon that differs between two genomes at the same index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodonDifference {
    pub position: usize,
    pub original: String,
    pub mutated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeDiff {
    pub differences: Vec<CodonDifference>,
    pub original_codon_count: usize,
    pub mutated_codon_count: usize,
}

impl GenomeDiff {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty() && self.original_codon_count == self.mutated_codon_count
    }

    pub fn length_changed(&self) -> bool {
        self.original_codon_count != self.mutated_codon_count
    }
}

/// Split normalized text into three-character chunks. Chunks are opaque:
/// invalid characters and a trailing partial chunk are kept as-is.
fn chunk(text: &str) -> Vec<String> {
    let chars: Vec<char> = normalize(text).chars().collect();
    chars.chunks(3).map(|c| c.iter().collect()).collect()
}

/// Compare two genomes codon by codon.
///
/// Both texts are re-chunked independently, so this never fails on frame
/// or alphabet errors. Differences are reported for every index present in
/// both genomes; the codon counts expose length changes.
pub fn compare_genomes(original: &str, mutated: &str) -> GenomeDiff {
    let before = chunk(original);
    let after = chunk(mutated);

    let differences = before
        .iter()
        .zip(after.iter())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(position, (a, b))| CodonDifference {
            position,
            original: a.clone(),
            mutated: b.clone(),
        })
        .collect();

    GenomeDiff {
        differences,
        original_codon_count: before.len(),
        mutated_codon_count: after.len(),
    }
}
