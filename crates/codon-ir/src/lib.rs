//! Genome representation: codons, the redundant codon table, the lexer and
//! validators, decoded programs, and the mutation engine.
//!
//! Genomes are plain text. The pipeline is
//! text -> [`tokenize`] -> [`Program`] -> interpreter (in `codon-runtime`),
//! while [`mutation`] rewrites text that re-enters the same pipeline.

pub mod codon;
pub mod table;
pub mod instruction;
pub mod lexer;
pub mod validation;
pub mod program;
pub mod mutation;
pub mod diff;
mod genome;

pub use codon::{Base, Codon};
pub use instruction::{Instruction, Opcode};
pub use table::{decode, is_start, is_stop, synonyms_of};
pub use lexer::{format_genome, normalize, tokenize, Token};
pub use validation::{analyze, validate_frame, validate_structure, Analysis, Diagnostic};
pub use program::Program;
pub use mutation::{
    deletion_mutation, frameshift_mutation, insertion_mutation, missense_mutation,
    nonsense_mutation, point_mutation, silent_mutation, MutationKind, MutationResult, Mutator,
};
pub use diff::{compare_genomes, CodonDifference, GenomeDiff};
