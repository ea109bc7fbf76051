//! Small argument parser in the style of Python's `argparse`.
//!
//! Arguments are declared with short and/or long names, an [`Arity`] and an
//! optional flag. Binding a token list fills one value slot per argument,
//! and [`ArgumentParser::retrieve`] hands each slot back as `String` or
//! `Vec<String>` depending on its shape:
//!
//! - `Arity::Fixed(0)` / `Arity::Fixed(1)` bind a single string
//! - `Arity::Fixed(n)` for `n > 1`, `+` and `*` bind a value list
//!
//! One argument may be declared *final*: tokens that no flag consumes are
//! bound to it by position.
//!
//! The crate does not convert values, apply defaults or handle subcommands.

pub mod arg;
pub mod error;
pub mod parser;
pub mod usage;
pub mod value;

pub use arg::{Arg, Arity, Minimum};
pub use error::{Error, Result};
pub use parser::ArgumentParser;
pub use usage::Usage;
pub use value::{ExtractError, FromValue, Shape, Value};
