//! Lexer for genome text.
//!
//! Genome text is a stream of `A`/`C`/`G`/`T` symbols (`U` accepted as an
//! alias for `T`), in any case, separated by arbitrary whitespace. A `;`
//! starts a comment that runs to the end of the line.

use crate::codon::{Base, Codon};
use codon_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A codon read from source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub codon: Codon,
    /// Byte offset of the codon's first base in the original text
    pub offset: usize,
}

impl Token {
    pub fn new(codon: Codon, offset: usize) -> Self {
        Self { codon, offset }
    }
}

/// Iterate over the significant characters of `text` with their byte
/// offsets, skipping whitespace and `;` comments.
pub(crate) fn significant_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_comment = false;
    text.char_indices().filter(move |&(_, c)| {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            return false;
        }
        if c == ';' {
            in_comment = true;
            return false;
        }
        !c.is_whitespace()
    })
}

/// Strip whitespace and comments, uppercase, and map the `U` alias to `T`.
/// Characters outside the alphabet are kept so they can be reported.
pub fn normalize(text: &str) -> String {
    significant_chars(text)
        .map(|(_, c)| match c.to_ascii_uppercase() {
            'U' => 'T',
            other => other,
        })
        .collect()
}

/// Split genome text into codon tokens.
///
/// Fails without a partial result when the cleaned length is not a multiple
/// of three or when a character falls outside the alphabet.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let chars: Vec<(usize, char)> = significant_chars(text).collect();

    if chars.len() % 3 != 0 {
        return Err(Error::FrameLength { length: chars.len() });
    }

    let mut bases = Vec::with_capacity(chars.len());
    for &(offset, c) in &chars {
        let base = Base::from_char(c).ok_or(Error::InvalidCharacter { character: c, offset })?;
        bases.push((offset, base));
    }

    let tokens: Vec<Token> = bases
        .chunks_exact(3)
        .map(|chunk| Token::new(Codon::new(chunk[0].1, chunk[1].1, chunk[2].1), chunk[0].0))
        .collect();

    tracing::trace!(tokens = tokens.len(), "tokenized genome");
    Ok(tokens)
}

/// Re-flow genome text into aligned codons, `codons_per_line` per line.
/// Comments are dropped. Fails on the same inputs as [`tokenize`].
pub fn format_genome(text: &str, codons_per_line: usize) -> Result<String> {
    let tokens = tokenize(text)?;
    let per_line = codons_per_line.max(1);
    let lines: Vec<String> = tokens
        .chunks(per_line)
        .map(|line| {
            line.iter()
                .map(|t| t.codon.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Ok(lines.join("\n"))
}
