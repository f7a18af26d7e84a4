//! Generalized-ufunc signatures.
//!
//! A signature names the core dimensions of every operand:
//!
//! ```text
//! (d,m),(d,n)->(),()
//! ```
//!
//! Operands are parenthesised, comma separated lists of dimension names;
//! `->` separates inputs from outputs. A name used by several operands
//! must bind to the same size in all of them. Whitespace is ignored.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed signature: core dimension names per operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    inputs: Vec<Vec<String>>,
    outputs: Vec<Vec<String>>,
}

impl Signature {
    /// Parse `text`, e.g. `"(m,n),(n,p)->(m,p)"`.
    pub fn parse(text: &str) -> Result<Self> {
        let fail = |reason| Error::Signature {
            signature: text.to_string(),
            reason,
        };
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let (lhs, rhs) = compact.split_once("->").ok_or_else(|| fail("missing `->`"))?;
        let inputs = parse_operands(lhs).map_err(fail)?;
        let outputs = parse_operands(rhs).map_err(fail)?;
        if inputs.is_empty() {
            return Err(fail("no input operands"));
        }
        if outputs.is_empty() {
            return Err(fail("no output operands"));
        }
        Ok(Self { inputs, outputs })
    }

    /// Build from name lists that are already known to be well formed.
    pub(crate) fn from_names(inputs: &[&[&str]], outputs: &[&[&str]]) -> Self {
        let owned = |side: &[&[&str]]| -> Vec<Vec<String>> {
            side.iter()
                .map(|dims| dims.iter().map(|d| (*d).to_string()).collect())
                .collect()
        };
        Self {
            inputs: owned(inputs),
            outputs: owned(outputs),
        }
    }

    /// Core dimension names of each input.
    #[must_use]
    pub fn inputs(&self) -> &[Vec<String>] {
        &self.inputs
    }

    /// Core dimension names of each output.
    #[must_use]
    pub fn outputs(&self) -> &[Vec<String>] {
        &self.outputs
    }

    /// Number of inputs.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs.
    #[must_use]
    pub fn nout(&self) -> usize {
        self.outputs.len()
    }

    /// Core names of every operand, inputs first.
    pub fn operands(&self) -> impl Iterator<Item = &[String]> {
        self.inputs.iter().chain(&self.outputs).map(Vec::as_slice)
    }

    /// Distinct dimension names in order of first appearance.
    #[must_use]
    pub fn dim_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.operands().flatten() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

fn parse_operands(text: &str) -> std::result::Result<Vec<Vec<String>>, &'static str> {
    let mut operands = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let body = rest.strip_prefix('(').ok_or("expected `(`")?;
        let close = body.find(')').ok_or("unclosed `(`")?;
        let (inner, tail) = body.split_at(close);
        operands.push(parse_dims(inner)?);
        rest = &tail[1..];
        if !rest.is_empty() {
            rest = rest.strip_prefix(',').ok_or("expected `,` between operands")?;
            if rest.is_empty() {
                return Err("trailing `,`");
            }
        }
    }
    Ok(operands)
}

fn parse_dims(inner: &str) -> std::result::Result<Vec<String>, &'static str> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|name| {
            let mut chars = name.chars();
            match chars.next() {
                None => Err("empty dimension name"),
                Some(c) if !(c.is_ascii_alphabetic() || c == '_') => Err("dimension names start with a letter"),
                _ if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => Err("invalid dimension name"),
                _ => Ok(name.to_string()),
            }
        })
        .collect()
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(f: &mut fmt::Formatter<'_>, operands: &[Vec<String>]) -> fmt::Result {
            for (i, dims) in operands.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "({})", dims.join(","))?;
            }
            Ok(())
        }
        side(f, &self.inputs)?;
        f.write_str("->")?;
        side(f, &self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cdist_ratio() {
        let sig = Signature::parse("(d1,m),(d2,m),(d1,n),(d2,n)->(),()").unwrap();
        assert_eq!(sig.nin(), 4);
        assert_eq!(sig.nout(), 2);
        assert_eq!(sig.dim_names(), vec!["d1", "m", "d2", "n"]);
        assert!(sig.outputs().iter().all(Vec::is_empty));
    }

    #[test]
    fn display_round_trips_and_drops_whitespace() {
        let sig: Signature = " (m, n), (n,p) -> (m,p) ".parse().unwrap();
        assert_eq!(sig.to_string(), "(m,n),(n,p)->(m,p)");
        assert_eq!(sig.dim_names(), vec!["m", "n", "p"]);
    }

    #[test]
    fn scalar_core() {
        let sig = Signature::parse("(n)->()").unwrap();
        assert_eq!(sig.inputs(), &[vec!["n".to_string()]]);
        assert_eq!(sig.outputs(), &[Vec::<String>::new()]);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["(n)", "(n)->", "->()", "(n,)->()", "(n)(m)->()", "(1n)->()", "(n->()", "(n),->()"] {
            assert!(
                matches!(Signature::parse(bad), Err(Error::Signature { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
