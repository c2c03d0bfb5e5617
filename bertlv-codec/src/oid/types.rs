//! OBJECT IDENTIFIER value type and the first-arc rule table

use std::fmt;
use std::str::FromStr;

use bertlv_core::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};

/// One row of the X.690 §8.19.4 first-subidentifier table
///
/// The first two arcs `(a, b)` are packed into one subidentifier
/// `40 * a + b`. Row `a` owns the subidentifier range `[lower, upper)`;
/// the last row is open-ended, which is what lets `2.x` carry any `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstArcRule {
    pub first_arc: u64,
    pub lower: u64,
    pub upper: Option<u64>,
}

pub const FIRST_ARC_RULES: [FirstArcRule; 3] = [
    FirstArcRule {
        first_arc: 0,
        lower: 0,
        upper: Some(40),
    },
    FirstArcRule {
        first_arc: 1,
        lower: 40,
        upper: Some(80),
    },
    FirstArcRule {
        first_arc: 2,
        lower: 80,
        upper: None,
    },
];

impl FirstArcRule {
    /// Pack the first two arcs into the first subidentifier
    ///
    /// # Error Handling
    /// Returns `CodecError::InvalidComponent` if `first` is not 0, 1 or 2,
    /// if `second` is 40 or more under a first arc of 0 or 1, or if the sum
    /// does not fit in 64 bits.
    pub fn combine(first: u64, second: u64) -> CodecResult<u64> {
        let rule = FIRST_ARC_RULES
            .iter()
            .find(|r| r.first_arc == first)
            .ok_or_else(|| {
                CodecError::InvalidComponent(format!("First arc must be 0, 1 or 2, got {}", first))
            })?;

        if let Some(upper) = rule.upper {
            if second >= upper - rule.lower {
                return Err(CodecError::InvalidComponent(format!(
                    "Second arc must be below {} when the first arc is {}, got {}",
                    upper - rule.lower,
                    first,
                    second
                )));
            }
        }

        rule.lower.checked_add(second).ok_or_else(|| {
            CodecError::InvalidComponent(format!("Second arc {} is too large", second))
        })
    }

    /// Unpack the first subidentifier into the first two arcs
    pub fn split(combined: u64) -> (u64, u64) {
        let last = &FIRST_ARC_RULES[FIRST_ARC_RULES.len() - 1];
        let rule = FIRST_ARC_RULES
            .iter()
            .find(|r| r.upper.is_none_or(|upper| combined < upper))
            .unwrap_or(last);
        (rule.first_arc, combined - rule.lower)
    }
}

/// Object Identifier
///
/// An ordered sequence of at least two arcs whose first two arcs satisfy
/// the [`FIRST_ARC_RULES`]. The only ways to build one are the checked
/// constructors [`Oid::new`], [`str::parse`] and [`Oid::from_ber`].
///
/// Serialized as its dot-notation string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid {
    arcs: Vec<u64>,
    /// First subidentifier, `40 * arcs[0] + arcs[1]`
    combined: u64,
}

impl Oid {
    /// Create an OID from arc values
    ///
    /// # Error Handling
    /// Returns `CodecError::InvalidComponent` if fewer than two arcs are
    /// given or the first two arcs break the first-arc rules.
    pub fn new(arcs: impl Into<Vec<u64>>) -> CodecResult<Self> {
        let arcs = arcs.into();
        if arcs.len() < 2 {
            return Err(CodecError::InvalidComponent(format!(
                "Object identifier must have at least 2 components, got {}",
                arcs.len()
            )));
        }
        let combined = FirstArcRule::combine(arcs[0], arcs[1])?;
        Ok(Self { arcs, combined })
    }

    /// Build from already-decoded subidentifiers
    ///
    /// The first subidentifier is split with the first-arc rules, so the
    /// result is valid by construction.
    pub(crate) fn from_subidentifiers(combined: u64, rest: &[u64]) -> Self {
        let (first, second) = FirstArcRule::split(combined);
        let mut arcs = Vec::with_capacity(rest.len() + 2);
        arcs.push(first);
        arcs.push(second);
        arcs.extend_from_slice(rest);
        Self { arcs, combined }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// First subidentifier as it appears on the wire
    pub fn combined(&self) -> u64 {
        self.combined
    }
}

impl FromStr for Oid {
    type Err = CodecError;

    /// Parse dot notation, e.g. `1.2.840.113549`
    ///
    /// Whitespace around a component is ignored; empty, signed or
    /// non-decimal components are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .enumerate()
            .map(|(i, part)| {
                let part = part.trim();
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CodecError::InvalidComponent(format!(
                        "Component {} is not a non-negative decimal: '{}'",
                        i, part
                    )));
                }
                part.parse::<u64>().map_err(|_| {
                    CodecError::InvalidComponent(format!(
                        "Component {} exceeds 64 bits: {}",
                        i, part
                    ))
                })
            })
            .collect::<CodecResult<Vec<u64>>>()?;

        Oid::new(arcs)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Oid {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.to_string()
    }
}
