//! Mutation operators for genome text.
//!
//! Every operator is a pure function of its inputs and an injected random
//! source: the input text is never modified and a fresh string is returned.
//! Codon-level operators (silent, missense, nonsense) take a codon index;
//! base-level operators (point, insertion, deletion, frameshift) take a base
//! offset. When no position is given one is drawn uniformly from the
//! eligible positions.

use crate::codon::{Base, Codon};
use crate::genome::GenomeText;
use crate::instruction::Opcode;
use crate::table::{alternatives_of, decode, is_start, is_stop, stop_codons};
use codon_core::{Error, MutationConfig, Result};
use rand::distributions::WeightedIndex;
use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    Silent,
    Missense,
    Nonsense,
    Point,
    Insertion,
    Deletion,
    Frameshift,
}

impl MutationKind {
    pub const ALL: [MutationKind; 7] = [
        MutationKind::Silent,
        MutationKind::Missense,
        MutationKind::Nonsense,
        MutationKind::Point,
        MutationKind::Insertion,
        MutationKind::Deletion,
        MutationKind::Frameshift,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Silent => "silent",
            MutationKind::Missense => "missense",
            MutationKind::Nonsense => "nonsense",
            MutationKind::Point => "point",
            MutationKind::Insertion => "insertion",
            MutationKind::Deletion => "deletion",
            MutationKind::Frameshift => "frameshift",
        }
    }

    /// Whether `position` for this kind is a codon index rather than a base offset
    pub fn is_codon_level(&self) -> bool {
        matches!(
            self,
            MutationKind::Silent | MutationKind::Missense | MutationKind::Nonsense
        )
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MutationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MutationKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Other(format!("unknown mutation kind '{}'", s)))
    }
}

/// Outcome of a single mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult {
    pub kind: MutationKind,
    pub mutated: String,
    /// Codon index or base offset, depending on `kind`
    pub position: usize,
    pub description: String,
}

/// Resolve an explicit or random position among `eligible`.
/// `rule` completes the sentence "codon N ..." for the error message.
fn pick_position<R: Rng>(
    kind: MutationKind,
    position: Option<usize>,
    eligible: &[usize],
    limit: usize,
    unit: &str,
    rule: &str,
    rng: &mut R,
) -> Result<usize> {
    match position {
        Some(p) if p >= limit => Err(Error::PositionOutOfRange { position: p, limit }),
        Some(p) if !eligible.contains(&p) => {
            Err(Error::no_eligible(kind.name(), format!("{} {} {}", unit, p, rule)))
        }
        Some(p) => Ok(p),
        None => eligible
            .choose(rng)
            .copied()
            .ok_or_else(|| Error::no_eligible(kind.name(), format!("every {} {}", unit, rule))),
    }
}

/// Replace a codon with a different synonym. The decoded opcode is unchanged.
pub fn silent_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    rng: &mut R,
) -> Result<MutationResult> {
    let g = GenomeText::new(genome);
    let eligible: Vec<usize> = (0..g.codon_count())
        .filter(|&i| {
            g.codon_at(i)
                .map(|c| !is_start(c) && !alternatives_of(c).is_empty())
                .unwrap_or(false)
        })
        .collect();

    let pos = pick_position(
        MutationKind::Silent,
        position,
        &eligible,
        g.codon_count(),
        "codon",
        "is START, unreadable, or has no synonymous codon",
        rng,
    )?;

    let original = g
        .codon_at(pos)
        .ok_or_else(|| Error::Other(format!("codon {} unreadable", pos)))?;
    let alternatives = alternatives_of(original);
    let replacement = *alternatives
        .choose(rng)
        .ok_or_else(|| Error::no_eligible("silent", format!("{} has no synonym", original)))?;

    Ok(MutationResult {
        kind: MutationKind::Silent,
        mutated: g.replace_codon(pos, replacement),
        position: pos,
        description: format!(
            "Silent mutation at codon {}: {} -> {} (both {})",
            pos,
            original,
            replacement,
            decode(original)
        ),
    })
}

/// Replace a codon with one decoding to a different, non-STOP opcode.
/// The final codon is never eligible.
pub fn missense_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    rng: &mut R,
) -> Result<MutationResult> {
    let g = GenomeText::new(genome);
    let count = g.codon_count();
    let eligible: Vec<usize> = (0..count.saturating_sub(1))
        .filter(|&i| g.codon_at(i).map(|c| !is_start(c)).unwrap_or(false))
        .collect();

    let pos = pick_position(
        MutationKind::Missense,
        position,
        &eligible,
        count,
        "codon",
        "is START, unreadable, or the final codon",
        rng,
    )?;

    let original = g
        .codon_at(pos)
        .ok_or_else(|| Error::Other(format!("codon {} unreadable", pos)))?;
    let from = decode(original);
    let candidates: Vec<_> = Codon::all()
        .filter(|c| {
            let op = decode(*c);
            op != from && op != Opcode::Stop
        })
        .collect();
    let replacement = *candidates
        .choose(rng)
        .ok_or_else(|| Error::no_eligible("missense", "no replacement codon"))?;

    Ok(MutationResult {
        kind: MutationKind::Missense,
        mutated: g.replace_codon(pos, replacement),
        position: pos,
        description: format!(
            "Missense mutation at codon {}: {} ({}) -> {} ({})",
            pos,
            original,
            from,
            replacement,
            decode(replacement)
        ),
    })
}

/// Replace a codon with a STOP codon, truncating the program there.
pub fn nonsense_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    rng: &mut R,
) -> Result<MutationResult> {
    let g = GenomeText::new(genome);
    let eligible: Vec<usize> = (0..g.codon_count())
        .filter(|&i| {
            g.codon_at(i)
                .map(|c| !is_start(c) && !is_stop(c))
                .unwrap_or(false)
        })
        .collect();

    let pos = pick_position(
        MutationKind::Nonsense,
        position,
        &eligible,
        g.codon_count(),
        "codon",
        "is START, unreadable, or already STOP",
        rng,
    )?;

    let original = g
        .codon_at(pos)
        .ok_or_else(|| Error::Other(format!("codon {} unreadable", pos)))?;
    let stops = stop_codons();
    let replacement = *stops
        .choose(rng)
        .ok_or_else(|| Error::Other("codon table has no STOP codon".to_string()))?;

    Ok(MutationResult {
        kind: MutationKind::Nonsense,
        mutated: g.replace_codon(pos, replacement),
        position: pos,
        description: format!(
            "Nonsense mutation at codon {}: {} ({}) -> {} (STOP)",
            pos,
            original,
            decode(original),
            replacement
        ),
    })
}

/// Change a single base to one of the other three.
pub fn point_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    rng: &mut R,
) -> Result<MutationResult> {
    let g = GenomeText::new(genome);
    let eligible: Vec<usize> = (0..g.base_count())
        .filter(|&i| g.base_at(i).is_some())
        .collect();

    let pos = pick_position(
        MutationKind::Point,
        position,
        &eligible,
        g.base_count(),
        "base",
        "is not a valid symbol",
        rng,
    )?;

    let original = g
        .base_at(pos)
        .ok_or_else(|| Error::Other(format!("base {} unreadable", pos)))?;
    let others: Vec<Base> = Base::ALL.into_iter().filter(|b| *b != original).collect();
    let replacement = *others
        .choose(rng)
        .ok_or_else(|| Error::Other("alphabet exhausted".to_string()))?;

    Ok(MutationResult {
        kind: MutationKind::Point,
        mutated: g.replace_bases(&[(pos, replacement)]),
        position: pos,
        description: format!(
            "Point mutation at base {} (codon {}): {} -> {}",
            pos,
            pos / 3,
            original,
            replacement
        ),
    })
}

/// Insert `count` random bases before base `position` (`0..=len`).
pub fn insertion_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    count: usize,
    rng: &mut R,
) -> Result<MutationResult> {
    if count == 0 {
        return Err(Error::InvalidCount("insertion length must be at least 1".to_string()));
    }
    let g = GenomeText::new(genome);
    let len = g.base_count();
    let pos = match position {
        Some(p) if p > len => {
            return Err(Error::PositionOutOfRange {
                position: p,
                limit: len + 1,
            })
        }
        Some(p) => p,
        None => rng.gen_range(0..=len),
    };

    let inserted: Vec<Base> = (0..count)
        .map(|_| Base::ALL[rng.gen_range(0..Base::ALL.len())])
        .collect();
    let run: String = inserted.iter().map(|b| b.to_char()).collect();

    Ok(MutationResult {
        kind: MutationKind::Insertion,
        mutated: g.insert(pos, &inserted),
        position: pos,
        description: format!(
            "Insertion of {} base{} ({}) at base {}{}",
            count,
            if count == 1 { "" } else { "s" },
            run,
            pos,
            frame_note(count)
        ),
    })
}

/// Remove `count` bases starting at base `position`.
pub fn deletion_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    count: usize,
    rng: &mut R,
) -> Result<MutationResult> {
    if count == 0 {
        return Err(Error::InvalidCount("deletion length must be at least 1".to_string()));
    }
    let g = GenomeText::new(genome);
    let len = g.base_count();
    if count > len {
        return Err(Error::InvalidCount(format!(
            "cannot delete {} bases from a genome of {}",
            count, len
        )));
    }

    let pos = match position {
        Some(p) if p >= len => return Err(Error::PositionOutOfRange { position: p, limit: len }),
        Some(p) if count > len - p => {
            return Err(Error::InvalidCount(format!(
                "cannot delete {} bases at base {}: only {} remain",
                count,
                p,
                len - p
            )))
        }
        Some(p) => p,
        None => rng.gen_range(0..=len - count),
    };

    Ok(MutationResult {
        kind: MutationKind::Deletion,
        mutated: g.delete(pos, count),
        position: pos,
        description: format!(
            "Deletion of {} base{} at base {}{}",
            count,
            if count == 1 { "" } else { "s" },
            pos,
            frame_note(count)
        ),
    })
}

/// Insert or delete one or two bases, shifting every downstream codon.
/// Falls back to insertion when a deletion would not fit.
pub fn frameshift_mutation<R: Rng>(
    genome: &str,
    position: Option<usize>,
    rng: &mut R,
) -> Result<MutationResult> {
    let count = rng.gen_range(1..=2);
    let delete = rng.gen_bool(0.5);
    let len = GenomeText::new(genome).base_count();
    let fits = match position {
        Some(p) => p < len && count <= len - p,
        None => count <= len,
    };

    let inner = if delete && fits {
        deletion_mutation(genome, position, count, rng)?
    } else {
        insertion_mutation(genome, position, count, rng)?
    };

    Ok(MutationResult {
        kind: MutationKind::Frameshift,
        mutated: inner.mutated,
        position: inner.position,
        description: format!("Frameshift: {}", inner.description),
    })
}

fn frame_note(count: usize) -> &'static str {
    if count % 3 == 0 {
        " (in frame)"
    } else {
        " (frameshift)"
    }
}

/// Apply a mutation of the given kind. `count` is used by insertion and
/// deletion only.
pub fn apply<R: Rng>(
    kind: MutationKind,
    genome: &str,
    position: Option<usize>,
    count: usize,
    rng: &mut R,
) -> Result<MutationResult> {
    match kind {
        MutationKind::Silent => silent_mutation(genome, position, rng),
        MutationKind::Missense => missense_mutation(genome, position, rng),
        MutationKind::Nonsense => nonsense_mutation(genome, position, rng),
        MutationKind::Point => point_mutation(genome, position, rng),
        MutationKind::Insertion => insertion_mutation(genome, position, count, rng),
        MutationKind::Deletion => deletion_mutation(genome, position, count, rng),
        MutationKind::Frameshift => frameshift_mutation(genome, position, rng),
    }
}

/// Draws random mutations according to [`MutationConfig`] weights.
pub struct Mutator {
    config: MutationConfig,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    fn weights(&self) -> [f32; 7] {
        let c = &self.config;
        [
            c.silent_weight,
            c.missense_weight,
            c.nonsense_weight,
            c.point_weight,
            c.insertion_weight,
            c.deletion_weight,
            c.frameshift_weight,
        ]
    }

    /// Pick a mutation kind according to the configured weights
    pub fn choose_kind<R: Rng>(&self, rng: &mut R) -> Result<MutationKind> {
        let dist = WeightedIndex::new(self.weights())
            .map_err(|e| Error::Validation(format!("invalid mutation weights: {}", e)))?;
        Ok(MutationKind::ALL[dist.sample(rng)])
    }

    /// Apply one random mutation at a random position.
    ///
    /// When the drawn kind has no eligible position, falls back to a point
    /// mutation and then to an insertion, which always succeeds.
    pub fn mutate<R: Rng>(&self, genome: &str, rng: &mut R) -> Result<MutationResult> {
        let chosen = self.choose_kind(rng)?;
        let count = rng.gen_range(1..=self.config.max_indel_length.max(1));

        let mut last_err = None;
        for kind in [chosen, MutationKind::Point, MutationKind::Insertion] {
            match apply(kind, genome, None, count, rng) {
                Ok(result) => return Ok(result),
                Err(err @ (Error::NoEligiblePosition { .. } | Error::InvalidCount(_))) => {
                    tracing::debug!(%kind, error = %err, "mutation kind not applicable, falling back");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Other("no mutation applied".to_string())))
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(MutationConfig::default())
    }
}
