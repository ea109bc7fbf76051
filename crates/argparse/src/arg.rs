//! Argument descriptors and name validation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::value::Shape;

/// Lower bound of an unbounded arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Minimum {
    /// `*`
    Zero,
    /// `+`
    One,
}

/// How many tokens an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` tokens. `Fixed(0)` is a switch.
    Fixed(usize),
    /// A run of tokens up to the next recognized flag or end of input.
    Unbounded(Minimum),
}

impl Arity {
    pub const SWITCH: Arity = Arity::Fixed(0);
    pub const ONE: Arity = Arity::Fixed(1);
    pub const ZERO_OR_MORE: Arity = Arity::Unbounded(Minimum::Zero);
    pub const ONE_OR_MORE: Arity = Arity::Unbounded(Minimum::One);

    /// Shape of the value a slot with this arity holds once bound.
    pub fn shape(self) -> Shape {
        match self {
            Self::Fixed(n) if n <= 1 => Shape::Single,
            _ => Shape::Multiple,
        }
    }

    /// Smallest number of tokens that satisfies this arity.
    pub fn min_values(self) -> usize {
        match self {
            Self::Fixed(n) => n,
            Self::Unbounded(Minimum::Zero) => 0,
            Self::Unbounded(Minimum::One) => 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Unbounded(Minimum::Zero) => f.write_str("*"),
            Self::Unbounded(Minimum::One) => f.write_str("+"),
        }
    }
}

/// Parse `nargs` notation: a count, `+` or `*`.
impl FromStr for Arity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Self::ONE_OR_MORE),
            "*" => Ok(Self::ZERO_OR_MORE),
            other => other
                .parse::<usize>()
                .map(Self::Fixed)
                .map_err(|_| format!("invalid nargs '{other}': expected a count, '+' or '*'")),
        }
    }
}

/// One declared argument. Immutable once inserted into a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    short: Option<String>,
    long: Option<String>,
    optional: bool,
    arity: Arity,
}

impl Arg {
    /// Build a descriptor from dashed names (`-n`, `--name`).
    pub(crate) fn new(
        short: Option<&str>,
        long: Option<&str>,
        arity: Arity,
        optional: bool,
    ) -> Result<Self> {
        let short = short.filter(|s| !s.is_empty());
        let long = long.filter(|s| !s.is_empty());
        if short.is_none() && long.is_none() {
            return Err(Error::InvalidNameFormat {
                name: String::new(),
                reason: "an argument needs a short or a long name".to_string(),
            });
        }

        let short = short.map(sanitize_short).transpose()?;
        let long = long.map(sanitize_long).transpose()?;
        Ok(Self {
            short,
            long,
            optional,
            arity,
        })
    }

    /// Build a descriptor from a single dashed name; its length decides
    /// whether it is the short or the long form.
    pub(crate) fn from_name(name: &str, arity: Arity, optional: bool) -> Result<Self> {
        match name.chars().count() {
            2 => Self::new(Some(name), None, arity, optional),
            n if n > 2 => Self::new(None, Some(name), arity, optional),
            _ => Err(Error::InvalidNameFormat {
                name: name.to_string(),
                reason: "argument specifier has the wrong format".to_string(),
            }),
        }
    }

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn shape(&self) -> Shape {
        self.arity.shape()
    }

    /// Bare name used in messages and placeholders: the long name if
    /// present, else the short one.
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }

    /// The name as it appears on the command line (`--name` or `-n`).
    pub fn flag(&self) -> String {
        match (&self.long, &self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => String::new(),
        }
    }

    /// Both bare names, short first.
    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }
}

fn sanitize_short(name: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidNameFormat {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('-'), Some(c), None) if c.is_ascii_alphanumeric() => Ok(c.to_string()),
        (Some('-'), Some(_), None) => Err(invalid("short names must be '-' followed by a letter or digit")),
        (Some(_), Some(_), None) => Err(invalid("short names must begin with '-'")),
        _ => Err(invalid("short names must be exactly two characters")),
    }
}

fn sanitize_long(name: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidNameFormat {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.chars().count() <= 2 {
        return Err(invalid("long names must be longer than two characters"));
    }
    let Some(bare) = name.strip_prefix("--") else {
        return Err(invalid("multi-character names must begin with '--'"));
    };
    if bare.starts_with('-') {
        return Err(invalid("long names take exactly two leading dashes"));
    }
    if bare.chars().any(|c| c.is_whitespace() || c == '=') {
        return Err(invalid("long names cannot contain whitespace or '='"));
    }
    Ok(bare.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stripped() {
        let arg = Arg::new(Some("-n"), Some("--name"), Arity::ONE, false).unwrap();
        assert_eq!(arg.short(), Some("n"));
        assert_eq!(arg.long(), Some("name"));
        assert_eq!(arg.name(), "name");
        assert_eq!(arg.flag(), "--name");
        assert_eq!(arg.names().collect::<Vec<_>>(), vec!["n", "name"]);
    }

    #[test]
    fn single_name_form_picks_by_length() {
        let short = Arg::from_name("-v", Arity::SWITCH, true).unwrap();
        assert_eq!(short.short(), Some("v"));
        assert_eq!(short.long(), None);
        assert_eq!(short.flag(), "-v");

        let long = Arg::from_name("--inputs", Arity::ONE_OR_MORE, true).unwrap();
        assert_eq!(long.short(), None);
        assert_eq!(long.long(), Some("inputs"));

        assert!(matches!(
            Arg::from_name("x", Arity::ONE, true),
            Err(Error::InvalidNameFormat { .. })
        ));
    }

    #[test]
    fn malformed_names_are_rejected() {
        for (short, long) in [
            (Some("n"), None),
            (Some("ab"), None),
            (Some("-%"), None),
            (Some("-ab"), None),
            (None, Some("name")),
            (None, Some("-name")),
            (None, Some("---name")),
            (None, Some("--a=b")),
            (None, None),
            (Some(""), Some("")),
        ] {
            let res = Arg::new(short, long, Arity::ONE, true);
            assert!(
                matches!(res, Err(Error::InvalidNameFormat { .. })),
                "expected InvalidNameFormat for {short:?}/{long:?}, got {res:?}"
            );
        }
    }

    #[test]
    fn arity_parses_nargs_notation() {
        assert_eq!("+".parse::<Arity>().unwrap(), Arity::ONE_OR_MORE);
        assert_eq!("*".parse::<Arity>().unwrap(), Arity::ZERO_OR_MORE);
        assert_eq!("3".parse::<Arity>().unwrap(), Arity::Fixed(3));
        assert!("?".parse::<Arity>().is_err());
        assert_eq!(Arity::Fixed(2).to_string(), "2");
        assert_eq!(Arity::ONE_OR_MORE.to_string(), "+");
    }

    #[test]
    fn arity_decides_shape() {
        assert_eq!(Arity::SWITCH.shape(), Shape::Single);
        assert_eq!(Arity::ONE.shape(), Shape::Single);
        assert_eq!(Arity::Fixed(2).shape(), Shape::Multiple);
        assert_eq!(Arity::ZERO_OR_MORE.shape(), Shape::Multiple);
        assert_eq!(Arity::ONE_OR_MORE.min_values(), 1);
    }
}
