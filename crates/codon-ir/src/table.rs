//! The redundant codon table.
//!
//! Every one of the 64 codons decodes to exactly one opcode. Most opcodes
//! own several synonymous codons, usually differing only in the third base,
//! which is what makes silent mutations possible.

use crate::codon::Codon;
use crate::instruction::Opcode;

use Opcode::*;

/// Opcode for each codon, indexed by `Codon::index()` (A=0, C=1, G=2, T=3, first base most significant).
static TABLE: [Opcode; 64] = [
    // AAx          ACx           AGx           ATx
    Line, Line, Line, Line,
    Translate, Translate, Translate, Translate,
    Rotate, Rotate, Rotate, Rotate,
    Dup, Dup, Start, Pop,
    // CAx: ADD SUB MUL DIV
    Add, Sub, Mul, Div,
    Rect, Rect, Rect, Rect,
    Scale, Scale, Scale, Scale,
    // CTx: EQ LT NOISE NOISE
    Eq, Lt, Noise, Noise,
    // GAx
    Push, Push, Push, Push,
    Triangle, Triangle, Triangle, Triangle,
    Circle, Circle, Circle, Circle,
    Ellipse, Ellipse, Ellipse, Ellipse,
    // TAx: TAA TAC TAG TAT
    Stop, Pop, Stop, Pop,
    SaveState, SaveState, RestoreState, RestoreState,
    // TGx: TGA TGC TGG TGT
    Stop, Loop, Swap, Swap,
    Color, Color, Color, Color,
];

/// Decode a codon. Total and O(1).
pub fn decode(codon: Codon) -> Opcode {
    TABLE[codon.index()]
}

pub fn is_start(codon: Codon) -> bool {
    decode(codon) == Start
}

pub fn is_stop(codon: Codon) -> bool {
    decode(codon) == Stop
}

/// All codons decoding to `opcode`, in index order
pub fn codons_for(opcode: Opcode) -> Vec<Codon> {
    Codon::all().filter(|c| decode(*c) == opcode).collect()
}

/// All codons sharing `codon`'s opcode, including `codon` itself
pub fn synonyms_of(codon: Codon) -> Vec<Codon> {
    codons_for(decode(codon))
}

/// Synonyms of `codon` excluding itself
pub fn alternatives_of(codon: Codon) -> Vec<Codon> {
    synonyms_of(codon).into_iter().filter(|c| *c != codon).collect()
}

pub fn start_codon() -> Codon {
    codons_for(Start)[0]
}

pub fn stop_codons() -> Vec<Codon> {
    codons_for(Stop)
}
