//! Decoded programs: a token stream grouped into instructions.

use crate::instruction::{Instruction, Opcode};
use crate::lexer::{tokenize, Token};
use crate::table::decode;
use codon_core::Result;
use serde::{Deserialize, Serialize};

/// A genome decoded into executable instructions.
///
/// PUSH is the one two-token instruction: the codon after it is stored as
/// its literal rather than decoded. The token stream is kept so execution
/// can re-decode from any token index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub tokens: Vec<Token>,
}

impl Program {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut program = Self {
            instructions: Vec::with_capacity(tokens.len()),
            tokens: tokens.to_vec(),
        };
        let mut i = 0;
        while let Some(inst) = program.decode_at(i) {
            i += inst.width();
            program.instructions.push(inst);
        }
        program
    }

    /// Decode the instruction that starts at `token_index`, whether or not
    /// that token is the literal half of a PUSH in the straight-line listing.
    pub fn decode_at(&self, token_index: usize) -> Option<Instruction> {
        let token = self.tokens.get(token_index)?;
        let opcode = decode(token.codon);
        let inst = Instruction::new(opcode, token.codon, token_index, token.offset);
        match self.tokens.get(token_index + 1) {
            Some(literal) if opcode == Opcode::Push => Some(inst.with_literal(literal.codon)),
            _ => Some(inst),
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Tokenize and decode genome text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::from_tokens(&tokenize(text)?))
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Count instructions with the given opcode
    pub fn count(&self, opcode: Opcode) -> usize {
        self.instructions.iter().filter(|i| i.opcode == opcode).count()
    }

    /// One line per instruction, e.g. `GAA GCT  PUSH 39`
    pub fn disassemble(&self) -> String {
        self.instructions
            .iter()
            .map(|inst| format!("{:>4}: {}", inst.token_index, inst))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pairs_with_literal() {
        let program = Program::parse("ATG GAA AGG GGA TAA").unwrap();
        assert_eq!(program.token_count(), 5);
        assert_eq!(program.len(), 4);

        let push = program.get(1).unwrap();
        assert_eq!(push.opcode, Opcode::Push);
        assert_eq!(push.literal_value(), 10);
        assert_eq!(push.token_index, 1);

        let circle = program.get(2).unwrap();
        assert_eq!(circle.opcode, Opcode::Circle);
        assert_eq!(circle.token_index, 3);
    }

    #[test]
    fn test_trailing_push_without_literal() {
        let program = Program::parse("ATG GAA").unwrap();
        assert_eq!(program.len(), 2);
        assert!(program.get(1).unwrap().literal.is_none());
    }

    #[test]
    fn test_literal_can_be_any_codon() {
        // ATG and TAA after PUSH are data
        let program = Program::parse("ATG GAA TAA GAC ATG").unwrap();
        assert_eq!(program.count(Opcode::Push), 2);
        assert_eq!(program.count(Opcode::Stop), 0);
        assert_eq!(program.count(Opcode::Start), 1);
    }

    #[test]
    fn test_decode_at_literal_token() {
        // token 2 is PUSH's literal in the listing but decodes as CIRCLE on its own
        let program = Program::parse("ATG GAA GGA TAA").unwrap();
        assert_eq!(program.len(), 3);
        let inst = program.decode_at(2).unwrap();
        assert_eq!(inst.opcode, Opcode::Circle);
        assert_eq!(inst.token_index, 2);
        assert!(program.decode_at(4).is_none());
    }

    #[test]
    fn test_disassemble() {
        let program = Program::parse("ATG GAA GCT TAA").unwrap();
        let listing = program.disassemble();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("PUSH 39"));
        assert!(lines[2].contains("STOP"));
    }

    #[test]
    fn test_program_serialization() {
        let program = Program::parse("ATG GAA GCT TAA").unwrap();
        let json = serde_json::to_string(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back.instructions, program.instructions);
    }
}
