//! The argument registry: declaration, token binding and typed retrieval.

use std::collections::HashMap;

use crate::arg::{Arg, Arity, Minimum};
use crate::error::{Error, Result};
use crate::usage::Usage;
use crate::value::{FromValue, Value};

const SEPARATOR: &str = "--";

/// Declared arguments and the values bound to them.
///
/// Descriptors and value slots are index-aligned; `index` maps every bare
/// short and long name to its slot.
///
/// ```
/// use argparse::{ArgumentParser, Arity};
///
/// let mut parser = ArgumentParser::new();
/// parser.declare(Some("-n"), Some("--name"), Arity::ONE, false)?;
/// parser.add_argument("--inputs", Arity::ONE_OR_MORE, true)?;
///
/// parser.bind(["prog", "--name", "demo", "--inputs", "a.txt", "b.txt"])?;
///
/// let name: String = parser.retrieve("n")?;
/// let inputs: Vec<String> = parser.retrieve("inputs")?;
/// assert_eq!(name, "demo");
/// assert_eq!(inputs, ["a.txt", "b.txt"]);
/// # Ok::<(), argparse::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    index: HashMap<String, usize>,
    ignore_first: bool,
    app_name: Option<String>,
    program: Option<String>,
    final_slot: Option<usize>,
    arguments: Vec<Arg>,
    values: Vec<Value>,
}

impl Default for ArgumentParser {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            ignore_first: true,
            app_name: None,
            program: None,
            final_slot: None,
            arguments: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl ArgumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program name shown in the usage string.
    ///
    /// An explicit name takes precedence over the one recorded from the
    /// first bound token.
    pub fn app_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.app_name = Some(name.into());
        self
    }

    /// Whether the first bound token is the program name (default `true`).
    pub fn ignore_first_argument(&mut self, ignore_first: bool) -> &mut Self {
        self.ignore_first = ignore_first;
        self
    }

    /// Declare an argument by its dashed short and/or long name.
    pub fn declare(
        &mut self,
        short: Option<&str>,
        long: Option<&str>,
        arity: Arity,
        optional: bool,
    ) -> Result<()> {
        let arg = Arg::new(short, long, arity, optional)?;
        self.insert(arg, false)
    }

    /// Declare an argument from one dashed name: `-x` is a short name,
    /// anything longer must be `--name`.
    pub fn add_argument(&mut self, name: &str, arity: Arity, optional: bool) -> Result<()> {
        let arg = Arg::from_name(name, arity, optional)?;
        self.insert(arg, false)
    }

    /// Declare the trailing positional argument.
    ///
    /// Tokens that no other argument consumes are bound to it. It can still
    /// be given by name as well.
    pub fn declare_final(&mut self, name: &str, arity: Arity, optional: bool) -> Result<()> {
        let arg = Arg::from_name(name, arity, optional)?;
        self.insert(arg, true)
    }

    fn insert(&mut self, arg: Arg, is_final: bool) -> Result<()> {
        if is_final {
            if let Some(existing) = self.final_slot {
                return Err(Error::MultipleFinalArguments {
                    existing: self.arguments[existing].flag(),
                    attempted: arg.flag(),
                });
            }
        }
        if let Some(taken) = arg.names().find(|n| self.index.contains_key(*n)) {
            return Err(Error::DuplicateArgument(taken.to_string()));
        }

        tracing::debug!(
            name = arg.name(),
            arity = %arg.arity(),
            optional = arg.optional(),
            is_final,
            "declared argument"
        );

        let slot = self.arguments.len();
        for name in arg.names() {
            self.index.insert(name.to_string(), slot);
        }
        if is_final {
            self.final_slot = Some(slot);
        }
        self.arguments.push(arg);
        self.values.push(Value::new());
        Ok(())
    }

    /// Bind the process arguments.
    pub fn bind_env(&mut self) -> Result<()> {
        self.bind(std::env::args())
    }

    /// Bind `tokens` to the declared arguments.
    ///
    /// Every slot is reset first, so binding again replaces the previous
    /// result. When an error is returned the slots bound before the failing
    /// token keep their values; bind again to recover.
    pub fn bind<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.values.iter_mut().for_each(Value::clear);

        let mut rest = tokens.as_slice();
        if self.ignore_first {
            if let Some((first, tail)) = rest.split_first() {
                self.program = Some(first.clone());
                rest = tail;
            }
        }

        let mut positionals: Vec<String> = Vec::new();
        let mut after_separator = false;
        let mut i = 0usize;
        while i < rest.len() {
            let token = rest[i].as_str();
            i += 1;

            if !after_separator && token == SEPARATOR {
                after_separator = true;
                continue;
            }

            let slot = if after_separator {
                None
            } else {
                self.lookup_flag(token)
            };
            let Some(slot) = slot else {
                let Some(final_slot) = self.final_slot else {
                    return Err(Error::UnknownArgument(token.to_string()));
                };
                // Unbounded finals take positional tokens as they come, so
                // flagged and positional values keep their input order.
                if let Arity::Unbounded(_) = self.arguments[final_slot].arity() {
                    tracing::trace!(token, "bound to final argument");
                    self.assign(final_slot, vec![token.to_string()]);
                } else {
                    tracing::trace!(token, "collected for final argument");
                    positionals.push(token.to_string());
                }
                continue;
            };

            let available = rest[i..]
                .iter()
                .take_while(|t| t.as_str() != SEPARATOR && self.lookup_flag(t).is_none())
                .count();
            let arg = &self.arguments[slot];
            let take = match arg.arity() {
                Arity::Fixed(n) => n,
                Arity::Unbounded(_) => available,
            };
            if available < arg.arity().min_values() || available < take {
                return Err(missing_value(arg, available));
            }

            let values = rest[i..i + take].to_vec();
            tracing::trace!(flag = token, ?values, "bound flag");
            self.assign(slot, values);
            i += take;
        }

        self.bind_final(positionals)?;
        self.check_required()
    }

    /// Finish the final argument once the scan is over.
    ///
    /// Unbounded finals are already bound. A fixed final takes exactly its
    /// count from positional tokens, unless its flag already filled it.
    fn bind_final(&mut self, positionals: Vec<String>) -> Result<()> {
        let Some(slot) = self.final_slot else {
            return Ok(());
        };
        let arg = &self.arguments[slot];

        let n = match arg.arity() {
            Arity::Unbounded(Minimum::Zero) => {
                if self.values[slot].is_empty() {
                    self.values[slot].store(Vec::new());
                }
                return Ok(());
            }
            Arity::Unbounded(Minimum::One) => return Ok(()),
            Arity::Fixed(n) => n,
        };
        if positionals.is_empty() {
            return Ok(());
        }
        if !self.values[slot].is_empty() {
            return Err(Error::UnknownArgument(positionals[0].clone()));
        }
        if positionals.len() < n {
            return Err(missing_value(arg, positionals.len()));
        }
        if let Some(surplus) = positionals.get(n) {
            return Err(Error::UnknownArgument(surplus.clone()));
        }

        tracing::trace!(name = arg.name(), values = ?positionals, "bound final argument");
        self.assign(slot, positionals);
        Ok(())
    }

    fn check_required(&self) -> Result<()> {
        match self
            .arguments
            .iter()
            .zip(&self.values)
            .find(|(arg, value)| !arg.optional() && value.is_empty())
        {
            Some((arg, _)) => Err(Error::MissingRequiredArgument(arg.flag())),
            None => Ok(()),
        }
    }

    fn assign(&mut self, slot: usize, values: Vec<String>) {
        let value = &mut self.values[slot];
        match self.arguments[slot].arity() {
            Arity::Fixed(n) if n <= 1 => value.store(values.into_iter().next().unwrap_or_default()),
            Arity::Fixed(_) => value.store(values),
            Arity::Unbounded(_) => value.extend(values),
        }
    }

    /// Slot of a dash-prefixed token naming a declared argument.
    fn lookup_flag(&self, token: &str) -> Option<usize> {
        let bare = token
            .strip_prefix("--")
            .or_else(|| token.strip_prefix('-'))?;
        if bare.is_empty() {
            return None;
        }
        self.index.get(bare).copied()
    }

    fn slot(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownArgument(name.to_string()))
    }

    /// Retrieve the value bound to the bare `name` as `T`.
    ///
    /// Use `String` for fixed arguments taking at most one value and
    /// `Vec<String>` for everything else.
    pub fn retrieve<T: FromValue>(&self, name: &str) -> Result<T> {
        let slot = self.slot(name)?;
        self.values[slot]
            .extract()
            .map_err(|err| Error::from_extract(name, err))
    }

    /// Borrow the raw slot bound to `name`.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.slot(name).map(|slot| &self.values[slot])
    }

    /// Whether `name` is declared.
    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of values bound to `name`; 0 for unknown or unbound names.
    pub fn count(&self, name: &str) -> usize {
        self.index
            .get(name)
            .map_or(0, |&slot| self.values[slot].len())
    }

    /// Whether the last bind populated `name`.
    pub fn is_present(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|&slot| !self.values[slot].is_empty())
    }

    /// Drop every declaration and bound value.
    pub fn clear(&mut self) {
        self.index.clear();
        self.arguments.clear();
        self.values.clear();
        self.final_slot = None;
        self.program = None;
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of declared arguments.
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Declared arguments in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &Arg> {
        self.arguments.iter()
    }

    pub fn final_argument(&self) -> Option<&Arg> {
        self.final_slot.map(|slot| &self.arguments[slot])
    }

    pub(crate) fn is_final(&self, arg: &Arg) -> bool {
        self.final_argument().is_some_and(|f| std::ptr::eq(f, arg))
    }

    /// The explicit application name, else the first token of the last bind.
    pub fn program_name(&self) -> &str {
        self.app_name
            .as_deref()
            .or(self.program.as_deref())
            .unwrap_or_default()
    }

    /// Render the usage string.
    pub fn usage(&self) -> String {
        Usage::new(self).to_string()
    }
}

fn missing_value(arg: &Arg, found: usize) -> Error {
    let expected = match arg.arity() {
        Arity::Fixed(1) => "1 value".to_string(),
        Arity::Fixed(n) => format!("{n} values"),
        Arity::Unbounded(Minimum::One) => "at least 1 value".to_string(),
        Arity::Unbounded(Minimum::Zero) => "any number of values".to_string(),
    };
    Error::MissingValue {
        name: arg.flag(),
        expected,
        found,
    }
}
