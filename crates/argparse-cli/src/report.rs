use argparse::{ArgumentParser, Shape};
use indexmap::IndexMap;
use serde::Serialize;

/// A bound value as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Single(String),
    Multiple(Vec<String>),
}

/// Every declared argument and what the last bind stored for it, in
/// declaration order. Unbound arguments map to `None` (`null` in JSON).
#[derive(Debug, Clone, Serialize)]
pub struct BindReport {
    pub program: String,
    pub arguments: IndexMap<String, Option<Bound>>,
}

impl BindReport {
    pub fn from_parser(parser: &ArgumentParser) -> argparse::Result<Self> {
        let mut arguments = IndexMap::new();
        for arg in parser.arguments() {
            let name = arg.name();
            let bound = match parser.value(name)?.shape() {
                Some(Shape::Single) => Some(Bound::Single(parser.retrieve(name)?)),
                Some(Shape::Multiple) => Some(Bound::Multiple(parser.retrieve(name)?)),
                None => None,
            };
            arguments.insert(name.to_string(), bound);
        }
        Ok(Self {
            program: parser.program_name().to_string(),
            arguments,
        })
    }

    /// One `name  value` row per argument, names padded to a common width.
    pub fn render_text(&self) -> String {
        let width = self.arguments.keys().map(|k| k.len()).max().unwrap_or(0);
        let mut out = String::new();
        for (name, bound) in &self.arguments {
            let value = match bound {
                Some(Bound::Single(s)) => s.clone(),
                Some(Bound::Multiple(list)) => format!("[{}]", list.join(", ")),
                None => "(not set)".to_string(),
            };
            out.push_str(&format!("  {:width$}  {}\n", name, value, width = width));
        }
        out
    }
}
