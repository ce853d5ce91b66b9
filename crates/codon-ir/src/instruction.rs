//! Instruction set decoded from codons.

use crate::codon::Codon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // Framing
    Start,
    Stop,

    // Literals
    Push,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Lt,

    // Stack
    Dup,
    Swap,
    Pop,

    // Control flow
    Loop,

    // State checkpoints
    SaveState,
    RestoreState,

    // Transforms
    Translate,
    Rotate,
    Scale,
    Color,

    // Drawing primitives
    Circle,
    Rect,
    Line,
    Triangle,
    Ellipse,
    Noise,
}

impl Opcode {
    pub const ALL: [Opcode; 25] = [
        Opcode::Start,
        Opcode::Stop,
        Opcode::Push,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Eq,
        Opcode::Lt,
        Opcode::Dup,
        Opcode::Swap,
        Opcode::Pop,
        Opcode::Loop,
        Opcode::SaveState,
        Opcode::RestoreState,
        Opcode::Translate,
        Opcode::Rotate,
        Opcode::Scale,
        Opcode::Color,
        Opcode::Circle,
        Opcode::Rect,
        Opcode::Line,
        Opcode::Triangle,
        Opcode::Ellipse,
        Opcode::Noise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Start => "START",
            Opcode::Stop => "STOP",
            Opcode::Push => "PUSH",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Eq => "EQ",
            Opcode::Lt => "LT",
            Opcode::Dup => "DUP",
            Opcode::Swap => "SWAP",
            Opcode::Pop => "POP",
            Opcode::Loop => "LOOP",
            Opcode::SaveState => "SAVE_STATE",
            Opcode::RestoreState => "RESTORE_STATE",
            Opcode::Translate => "TRANSLATE",
            Opcode::Rotate => "ROTATE",
            Opcode::Scale => "SCALE",
            Opcode::Color => "COLOR",
            Opcode::Circle => "CIRCLE",
            Opcode::Rect => "RECT",
            Opcode::Line => "LINE",
            Opcode::Triangle => "TRIANGLE",
            Opcode::Ellipse => "ELLIPSE",
            Opcode::Noise => "NOISE",
        }
    }

    /// Returns the number of values this opcode pops from the value stack
    pub fn num_operands(&self) -> usize {
        match self {
            Opcode::Start | Opcode::Stop | Opcode::Push => 0,
            Opcode::SaveState | Opcode::RestoreState => 0,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => 2,
            Opcode::Eq | Opcode::Lt => 2,
            Opcode::Dup | Opcode::Pop => 1,
            Opcode::Swap => 2,
            Opcode::Loop => 2,                  // instruction count, repeat count
            Opcode::Translate => 2,             // dx, dy
            Opcode::Rotate => 1,                // degrees
            Opcode::Scale => 1,                 // factor * 10
            Opcode::Color => 3,                 // hue, saturation, lightness
            Opcode::Circle => 1,                // radius
            Opcode::Rect => 2,                  // width, height
            Opcode::Line => 1,                  // length
            Opcode::Triangle => 1,              // size
            Opcode::Ellipse => 2,               // rx, ry
            Opcode::Noise => 2,                 // seed, sample count
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single decoded instruction. PUSH carries the codon that follows it as its literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub codon: Codon,
    /// Index of the instruction's first token
    pub token_index: usize,
    /// Byte offset of the instruction's first base in the source text
    pub offset: usize,
    pub literal: Option<Codon>,
}

impl Instruction {
    pub fn new(opcode: Opcode, codon: Codon, token_index: usize, offset: usize) -> Self {
        Self {
            opcode,
            codon,
            token_index,
            offset,
            literal: None,
        }
    }

    pub fn with_literal(mut self, literal: Codon) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Value pushed by a PUSH instruction; a PUSH missing its literal pushes 0
    pub fn literal_value(&self) -> u8 {
        self.literal.map(|c| c.numeric_value()).unwrap_or(0)
    }

    /// Number of tokens this instruction spans
    pub fn width(&self) -> usize {
        if self.literal.is_some() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.opcode, self.literal) {
            (Opcode::Push, Some(literal)) => {
                write!(f, "{} {}  PUSH {}", self.codon, literal, literal.numeric_value())
            }
            (Opcode::Push, None) => write!(f, "{}      PUSH <missing>", self.codon),
            (opcode, _) => write!(f, "{}      {}", self.codon, opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        Codon::parse(s).unwrap()
    }

    #[test]
    fn test_opcode_arity() {
        assert_eq!(Opcode::Add.num_operands(), 2);
        assert_eq!(Opcode::Color.num_operands(), 3);
        assert_eq!(Opcode::Circle.num_operands(), 1);
        assert_eq!(Opcode::Stop.num_operands(), 0);
    }

    #[test]
    fn test_opcode_names_unique() {
        let mut names: Vec<&str> = Opcode::ALL.iter().map(|op| op.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Opcode::ALL.len());
    }

    #[test]
    fn test_push_literal() {
        let inst = Instruction::new(Opcode::Push, codon("GAA"), 1, 4).with_literal(codon("GCT"));
        assert_eq!(inst.literal_value(), 39);
        assert_eq!(inst.width(), 2);
        assert_eq!(inst.to_string(), "GAA GCT  PUSH 39");

        let bare = Instruction::new(Opcode::Push, codon("GAA"), 1, 4);
        assert_eq!(bare.literal_value(), 0);
        assert_eq!(bare.width(), 1);
    }
}
