//! Usage-line rendering.

use std::fmt;

use crate::arg::{Arg, Arity, Minimum};
use crate::parser::ArgumentParser;

pub const DEFAULT_WIDTH: usize = 80;

/// Usage line for a parser: required arguments, then optional ones, then the
/// final positional argument, wrapped at `width` columns.
#[derive(Debug, Clone, Copy)]
pub struct Usage<'a> {
    parser: &'a ArgumentParser,
    width: usize,
}

impl<'a> Usage<'a> {
    pub fn new(parser: &'a ArgumentParser) -> Self {
        Self {
            parser,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Rendered pieces in display order.
    fn pieces(&self) -> Vec<String> {
        let p = self.parser;
        let required = p
            .arguments()
            .filter(|a| !a.optional() && !p.is_final(a));
        let optional = p.arguments().filter(|a| a.optional() && !p.is_final(a));

        let mut pieces: Vec<String> = required.chain(optional).map(render_arg).collect();
        if let Some(last) = p.final_argument() {
            pieces.push(render_final(last));
        }
        pieces
    }
}

impl fmt::Display for Usage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = format!("Usage: {} ", self.parser.program_name());
        let indent = prefix.chars().count();

        let mut out = prefix;
        // Running length of the current line in characters, not counting the
        // prefix or separators.
        let mut line = 0usize;
        for piece in self.pieces() {
            let columns = piece.chars().count();
            if line > 0 && line + columns > self.width {
                out.push('\n');
                out.push_str(&" ".repeat(indent));
                line = 0;
            } else if line > 0 {
                out.push(' ');
            }
            line += columns;
            out.push_str(&piece);
        }

        f.write_str(out.trim_end())
    }
}

/// `--name NAME`, `-n [N [N...]]`, bracketed when optional.
pub fn render_arg(arg: &Arg) -> String {
    let mut out = arg.flag();
    if let Some(values) = placeholders(arg) {
        out.push(' ');
        out.push_str(&values);
    }
    bracket_if_optional(arg, out)
}

/// The final argument is matched by position, so only its placeholders are
/// shown.
fn render_final(arg: &Arg) -> String {
    let body = placeholders(arg).unwrap_or_else(|| arg.name().to_ascii_uppercase());
    bracket_if_optional(arg, body)
}

fn placeholders(arg: &Arg) -> Option<String> {
    let name = arg.name().to_ascii_uppercase();
    match arg.arity() {
        Arity::Fixed(0) => None,
        Arity::Fixed(n) => {
            let mut out = vec![name.as_str(); n.min(3)].join(" ");
            if n > 3 {
                out.push_str(" ...");
            }
            Some(out)
        }
        Arity::Unbounded(Minimum::Zero) => Some(format!("[{name} [{name}...]]")),
        Arity::Unbounded(Minimum::One) => Some(format!("{name} [{name}...]")),
    }
}

fn bracket_if_optional(arg: &Arg, s: String) -> String {
    if arg.optional() { format!("[{s}]") } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(name: &str, arity: Arity, optional: bool) -> Arg {
        Arg::from_name(name, arity, optional).unwrap()
    }

    #[test]
    fn renders_arities() {
        assert_eq!(render_arg(&arg("-v", Arity::SWITCH, false)), "-v");
        assert_eq!(render_arg(&arg("--name", Arity::ONE, false)), "--name NAME");
        assert_eq!(render_arg(&arg("--name", Arity::ONE, true)), "[--name NAME]");
        assert_eq!(
            render_arg(&arg("--size", Arity::Fixed(3), false)),
            "--size SIZE SIZE SIZE"
        );
        assert_eq!(
            render_arg(&arg("--size", Arity::Fixed(5), false)),
            "--size SIZE SIZE SIZE ..."
        );
        assert_eq!(
            render_arg(&arg("--in", Arity::ZERO_OR_MORE, false)),
            "--in [IN [IN...]]"
        );
        assert_eq!(
            render_arg(&arg("-i", Arity::ONE_OR_MORE, true)),
            "[-i I [I...]]"
        );
    }

    #[test]
    fn orders_required_optional_then_final() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        p.declare_final("--files", Arity::ONE_OR_MORE, false)
            .unwrap();
        p.add_argument("-v", Arity::SWITCH, true).unwrap();
        p.add_argument("--name", Arity::ONE, false).unwrap();

        assert_eq!(p.usage(), "Usage: prog --name NAME [-v] FILES [FILES...]");
    }

    #[test]
    fn optional_final_is_bracketed() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        p.declare_final("--out", Arity::ONE, true).unwrap();
        assert_eq!(p.usage(), "Usage: prog [OUT]");

        let mut q = ArgumentParser::new();
        q.app_name("prog");
        q.declare_final("--go", Arity::SWITCH, false).unwrap();
        assert_eq!(q.usage(), "Usage: prog GO");
    }

    #[test]
    fn empty_parser_has_bare_usage() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        assert_eq!(p.usage(), "Usage: prog");
    }

    #[test]
    fn wraps_before_the_piece_that_overflows() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        // rendered lengths 30 + 30 + 25 = 85
        let a = format!("--{}", "a".repeat(28));
        let b = format!("--{}", "b".repeat(28));
        let c = format!("--{}", "c".repeat(23));
        for name in [&a, &b, &c] {
            p.add_argument(name, Arity::SWITCH, false).unwrap();
        }

        let usage = p.usage();
        assert_eq!(usage.matches('\n').count(), 1, "{usage}");
        let (first, second) = usage.split_once('\n').unwrap();
        assert_eq!(first, format!("Usage: prog {a} {b}"));
        assert_eq!(second, format!("{}{c}", " ".repeat("Usage: prog ".len())));
    }

    #[test]
    fn non_ascii_names_wrap_by_character() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        // 30 characters each, but twice as many bytes
        let a = format!("--{}", "é".repeat(28));
        let b = format!("--{}", "ü".repeat(28));
        p.add_argument(&a, Arity::SWITCH, false).unwrap();
        p.add_argument(&b, Arity::SWITCH, false).unwrap();
        assert_eq!(p.usage(), format!("Usage: prog {a} {b}"));

        assert_eq!(
            render_arg(&arg("--émoji", Arity::ONE, false)),
            "--émoji éMOJI"
        );
    }

    #[test]
    fn width_is_configurable() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        p.add_argument("--alpha", Arity::SWITCH, false).unwrap();
        p.add_argument("--beta", Arity::SWITCH, false).unwrap();

        let narrow = Usage::new(&p).with_width(10).to_string();
        assert_eq!(narrow, "Usage: prog --alpha\n            --beta");
        assert_eq!(Usage::new(&p).to_string(), "Usage: prog --alpha --beta");
    }

    #[test]
    fn long_piece_stays_on_first_line() {
        let mut p = ArgumentParser::new();
        p.app_name("prog");
        let long = format!("--{}", "x".repeat(90));
        p.add_argument(&long, Arity::SWITCH, false).unwrap();
        assert_eq!(p.usage(), format!("Usage: prog {long}"));
    }
}
