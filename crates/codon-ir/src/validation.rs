//! Frame and structure validation for genomes.
//!
//! Findings are data, not control flow: both passes return a list of
//! diagnostics and never fail. Hard lexical errors come from
//! [`tokenize`](crate::lexer::tokenize) instead.

use crate::instruction::Opcode;
use crate::lexer::{tokenize, Token};
use crate::table::{decode, is_stop};
use codon_core::{Result, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Byte offset in the source text
    pub position: usize,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            position,
        }
    }

    pub fn warning(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            position,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.position, self.message)
    }
}

/// Flag whitespace (or a comment) that splits a codon across a gap.
/// Runs on the original, unstripped text.
pub fn validate_frame(text: &str) -> Vec<Diagnostic> {
    let mut findings = Vec::new();
    let mut bases = 0usize;
    let mut gap: Option<usize> = None;
    let mut in_comment = false;

    for (offset, c) in text.char_indices() {
        if in_comment {
            in_comment = c != '\n';
            continue;
        }
        if c == ';' || c.is_whitespace() {
            in_comment = c == ';';
            if bases % 3 != 0 && gap.is_none() {
                gap = Some(offset);
            }
            continue;
        }

        if let Some(at) = gap.take() {
            if bases % 3 != 0 {
                findings.push(Diagnostic::warning(
                    format!(
                        "Mid-triplet break: codon {} is split after base {}",
                        bases / 3,
                        bases % 3
                    ),
                    at,
                ));
            }
        }
        bases += 1;
    }

    findings
}

/// Check START/STOP placement on a token sequence.
///
/// Codons consumed as PUSH literals are data and take no part in the
/// START/STOP checks, so a genome whose only STOP codon is a literal still
/// gets a "Missing STOP" warning that names the literal.
pub fn validate_structure(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    match tokens.first() {
        None => {
            findings.push(Diagnostic::error("Genome is empty; expected a START codon", 0));
            return findings;
        }
        Some(first) if decode(first.codon) != Opcode::Start => {
            findings.push(Diagnostic::error(
                format!(
                    "Genome must begin with a START codon, found {} ({})",
                    first.codon,
                    decode(first.codon)
                ),
                first.offset,
            ));
        }
        Some(_) => {}
    }

    let mut first_stop: Option<usize> = None;
    let mut literal_stop: Option<usize> = None;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        match decode(token.codon) {
            Opcode::Push => {
                let literal = i + 1;
                if literal_stop.is_none() && tokens.get(literal).is_some_and(|t| is_stop(t.codon)) {
                    literal_stop = Some(literal);
                }
                i += 2;
                continue;
            }
            Opcode::Stop if first_stop.is_none() => first_stop = Some(i),
            Opcode::Start if first_stop.is_some() => {
                findings.push(Diagnostic::warning(
                    format!("Unreachable START after STOP (codon {})", i),
                    token.offset,
                ));
            }
            _ => {}
        }
        i += 1;
    }

    if first_stop.is_none() {
        let end = tokens.last().map(|t| t.offset).unwrap_or(0);
        let message = match literal_stop {
            Some(index) => format!(
                "Missing STOP codon (codon {} is a STOP codon read as a PUSH literal)",
                index
            ),
            None => "Missing STOP codon".to_string(),
        };
        findings.push(Diagnostic::warning(message, end));
    }

    findings
}

/// Result of running every lexer and validation pass over a genome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub frame: Vec<Diagnostic>,
    pub structure: Vec<Diagnostic>,
}

impl Analysis {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.frame.iter().chain(self.structure.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(Diagnostic::is_error)
    }
}

/// Tokenize and validate. Hard lexical errors are returned as `Err`;
/// everything else is reported in the [`Analysis`].
pub fn analyze(text: &str) -> Result<Analysis> {
    let tokens = tokenize(text)?;
    let frame = validate_frame(text);
    let structure = validate_structure(&tokens);
    Ok(Analysis {
        tokens,
        frame,
        structure,
    })
}
