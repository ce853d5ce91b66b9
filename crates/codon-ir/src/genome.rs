//! Base-level view over raw genome text.
//!
//! Mutations edit the original text in place so that whitespace, comments
//! and letter case survive; this view maps base indices to byte offsets.

use crate::codon::{Base, Codon};
use crate::lexer::significant_chars;

pub(crate) struct GenomeText<'a> {
    text: &'a str,
    /// (byte offset, character) of every significant character
    bases: Vec<(usize, char)>,
    rna: bool,
}

impl<'a> GenomeText<'a> {
    pub fn new(text: &'a str) -> Self {
        let bases: Vec<(usize, char)> = significant_chars(text).collect();
        let rna = bases.iter().any(|&(_, c)| c.eq_ignore_ascii_case(&'u'));
        Self { text, bases, rna }
    }

    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    /// Number of complete codons
    pub fn codon_count(&self) -> usize {
        self.bases.len() / 3
    }

    pub fn base_at(&self, index: usize) -> Option<Base> {
        self.bases.get(index).and_then(|&(_, c)| Base::from_char(c))
    }

    pub fn codon_at(&self, index: usize) -> Option<Codon> {
        let start = index * 3;
        Some(Codon::new(
            self.base_at(start)?,
            self.base_at(start + 1)?,
            self.base_at(start + 2)?,
        ))
    }

    /// Render a base in the genome's notation, matching the case of `like`
    fn symbol(&self, base: Base, like: Option<char>) -> char {
        let c = match base {
            Base::T if self.rna => 'U',
            other => other.to_char(),
        };
        match like {
            Some(l) if l.is_ascii_lowercase() => c.to_ascii_lowercase(),
            _ => c,
        }
    }

    /// Replace bases at the given base indices
    pub fn replace_bases(&self, edits: &[(usize, Base)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        for (offset, c) in self.text.char_indices() {
            let edit = edits
                .iter()
                .find(|(index, _)| self.bases.get(*index).map(|&(o, _)| o) == Some(offset));
            match edit {
                Some(&(_, base)) => out.push(self.symbol(base, Some(c))),
                None => out.push(c),
            }
        }
        out
    }

    pub fn replace_codon(&self, index: usize, codon: Codon) -> String {
        let start = index * 3;
        let edits: Vec<(usize, Base)> = codon
            .bases()
            .iter()
            .enumerate()
            .map(|(i, b)| (start + i, *b))
            .collect();
        self.replace_bases(&edits)
    }

    /// Insert bases before the base at `index` (or after the last base when
    /// `index == base_count()`)
    pub fn insert(&self, index: usize, inserted: &[Base]) -> String {
        let at = match self.bases.get(index) {
            Some(&(offset, _)) => offset,
            None => self
                .bases
                .last()
                .map(|&(offset, c)| offset + c.len_utf8())
                .unwrap_or(0),
        };
        let like = self.bases.get(index).or(self.bases.last()).map(|&(_, c)| c);
        let run: String = inserted.iter().map(|b| self.symbol(*b, like)).collect();

        let mut out = String::with_capacity(self.text.len() + run.len());
        out.push_str(&self.text[..at]);
        out.push_str(&run);
        out.push_str(&self.text[at..]);
        out
    }

    /// Remove `count` bases starting at base `index`
    pub fn delete(&self, index: usize, count: usize) -> String {
        let removed: Vec<usize> = self.bases[index..index + count]
            .iter()
            .map(|&(offset, _)| offset)
            .collect();
        self.text
            .char_indices()
            .filter(|(offset, _)| !removed.contains(offset))
            .map(|(_, c)| c)
            .collect()
    }
}
