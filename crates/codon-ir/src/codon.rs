//! Bases and codons, the atoms of genome text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four nucleotide symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Parse a single symbol. Case-insensitive; `U` is accepted as an alias for `T`.
    pub fn from_char(c: char) -> Option<Base> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' | 'U' => Some(Base::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Radix-4 digit used by numeric literals
    pub fn digit(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Three bases read as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Codon(pub [Base; 3]);

impl Codon {
    pub fn new(first: Base, second: Base, third: Base) -> Self {
        Self([first, second, third])
    }

    /// Dense index in `0..64`, first base most significant
    pub fn index(&self) -> usize {
        self.numeric_value() as usize
    }

    pub fn from_index(index: usize) -> Option<Codon> {
        if index >= 64 {
            return None;
        }
        let digit = |shift: usize| Base::ALL[(index >> shift) & 0b11];
        Some(Codon::new(digit(4), digit(2), digit(0)))
    }

    /// Value of this codon when it follows PUSH: `16·b0 + 4·b1 + b2`
    /// with `A=0, C=1, G=2, T=3`.
    pub fn numeric_value(&self) -> u8 {
        let [a, b, c] = self.0;
        a.digit() * 16 + b.digit() * 4 + c.digit()
    }

    /// All 64 codons in index order
    pub fn all() -> impl Iterator<Item = Codon> {
        (0..64).filter_map(Codon::from_index)
    }

    pub fn bases(&self) -> [Base; 3] {
        self.0
    }

    /// Copy of this codon with the base at `slot` replaced
    pub fn with_base(&self, slot: usize, base: Base) -> Codon {
        let mut bases = self.0;
        bases[slot] = base;
        Codon(bases)
    }

    /// Parse three symbols. Returns `None` unless `text` holds exactly three valid symbols.
    pub fn parse(text: &str) -> Option<Codon> {
        let mut chars = text.chars();
        let first = Base::from_char(chars.next()?)?;
        let second = Base::from_char(chars.next()?)?;
        let third = Base::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Codon::new(first, second, third))
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{}{}{}", a, b, c)
    }
}

impl FromStr for Codon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codon::parse(s).ok_or_else(|| format!("'{}' is not a codon", s))
    }
}

impl TryFrom<String> for Codon {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Codon> for String {
    fn from(codon: Codon) -> Self {
        codon.to_string()
    }
}
