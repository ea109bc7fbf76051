use anyhow::{Context, Result, bail};
use argparse::{ArgumentParser, Arity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEC_NAME: &str = "argparse.json";

/// Argument declarations read from `argparse.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgEntry>,

    /// The trailing positional argument.
    #[serde(default, rename = "final", skip_serializing_if = "Option::is_none")]
    pub final_arg: Option<FinalEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgEntry {
    /// Dashed short name, e.g. `-n`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Dashed long name, e.g. `--name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Defaults to `0`: a switch.
    #[serde(default)]
    pub nargs: Nargs,
    #[serde(default = "default_optional")]
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEntry {
    pub name: String,
    #[serde(default = "default_final_nargs")]
    pub nargs: Nargs,
    #[serde(default)]
    pub optional: bool,
}

/// `nargs` as written in JSON: a count, `"+"` or `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nargs {
    Count(usize),
    Pattern(String),
}

impl Default for Nargs {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl Nargs {
    pub fn arity(&self) -> Result<Arity> {
        match self {
            Self::Count(n) => Ok(Arity::Fixed(*n)),
            Self::Pattern(s) => s.parse::<Arity>().map_err(anyhow::Error::msg),
        }
    }
}

fn default_optional() -> bool {
    true
}

fn default_final_nargs() -> Nargs {
    Nargs::Count(1)
}

impl ArgSpec {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("argument spec not found: {}", path.display());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read argument spec: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse argument spec JSON: {}", path.display()))
    }

    /// Build a parser that binds tokens without a leading program name.
    pub fn build_parser(&self) -> Result<ArgumentParser> {
        let mut parser = ArgumentParser::new();
        parser.ignore_first_argument(false);
        if let Some(program) = &self.program {
            parser.app_name(program.as_str());
        }

        for (idx, entry) in self.arguments.iter().enumerate() {
            let arity = entry
                .nargs
                .arity()
                .with_context(|| format!("arguments[{idx}]: bad nargs"))?;
            parser
                .declare(entry.short.as_deref(), entry.long.as_deref(), arity, entry.optional)
                .with_context(|| format!("arguments[{idx}]: invalid declaration"))?;
        }

        if let Some(last) = &self.final_arg {
            let arity = last.nargs.arity().context("final: bad nargs")?;
            parser
                .declare_final(&last.name, arity, last.optional)
                .context("final: invalid declaration")?;
        }

        tracing::debug!(arguments = parser.len(), "built parser from spec");
        Ok(parser)
    }
}

/// `--spec` if given, else `argparse.json` in the current directory.
pub fn resolve_spec_path(spec: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(match spec {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd.join(DEFAULT_SPEC_NAME),
    })
}

pub fn write_default_spec(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_SPEC_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists in {}", DEFAULT_SPEC_NAME, project_dir.display());
    }

    let program = guess_program_name(project_dir).unwrap_or_else(|| "my-cli".to_string());
    let spec = ArgSpec {
        program: Some(program),
        arguments: vec![
            ArgEntry {
                short: Some("-n".to_string()),
                long: Some("--name".to_string()),
                nargs: Nargs::Count(1),
                optional: false,
            },
            ArgEntry {
                short: Some("-v".to_string()),
                long: Some("--verbose".to_string()),
                nargs: Nargs::Count(0),
                optional: true,
            },
            ArgEntry {
                short: None,
                long: Some("--inputs".to_string()),
                nargs: Nargs::Pattern("+".to_string()),
                optional: true,
            },
        ],
        final_arg: Some(FinalEntry {
            name: "--output".to_string(),
            nargs: Nargs::Count(1),
            optional: false,
        }),
    };

    let bytes = serde_json::to_vec_pretty(&spec).context("failed to serialize argument spec")?;
    let mut out = String::from_utf8(bytes).context("argument spec is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn guess_program_name(project_dir: &Path) -> Option<String> {
    // For `.` and similar, fall back to the current directory name.
    let file_name = project_dir.file_name().and_then(|s| s.to_str());
    let direct = file_name.filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("argparse-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let json = r#"{
  "program": "demo",
  "arguments": [
    { "short": "-n", "long": "--name", "nargs": 1, "optional": false },
    { "long": "--inputs", "nargs": "+" },
    { "short": "-s", "nargs": 2 },
    { "short": "-v" }
  ],
  "final": { "name": "--files", "nargs": "*" }
}"#;
        let spec: ArgSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.program.as_deref(), Some("demo"));
        assert_eq!(spec.arguments.len(), 4);
        assert_eq!(spec.arguments[0].nargs, Nargs::Count(1));
        assert!(!spec.arguments[0].optional);
        assert!(spec.arguments[1].optional);
        assert_eq!(spec.arguments[1].nargs.arity().unwrap(), Arity::ONE_OR_MORE);
        assert_eq!(spec.arguments[2].nargs.arity().unwrap(), Arity::Fixed(2));
        assert_eq!(spec.arguments[3].nargs.arity().unwrap(), Arity::SWITCH);

        let last = spec.final_arg.as_ref().unwrap();
        assert_eq!(last.name, "--files");
        assert!(!last.optional);
        assert_eq!(last.nargs.arity().unwrap(), Arity::ZERO_OR_MORE);
    }

    #[test]
    fn build_parser_declares_everything() {
        let json = r#"{
  "program": "demo",
  "arguments": [
    { "short": "-n", "long": "--name", "nargs": 1, "optional": false },
    { "short": "-v" }
  ],
  "final": { "name": "--files" }
}"#;
        let spec: ArgSpec = serde_json::from_str(json).unwrap();
        let mut parser = spec.build_parser().unwrap();
        assert_eq!(parser.len(), 3);
        assert_eq!(parser.usage(), "Usage: demo --name NAME [-v] FILES");

        parser.bind(["-n", "x", "-v", "a"]).unwrap();
        assert_eq!(parser.retrieve::<String>("name").unwrap(), "x");
        assert!(parser.is_present("v"));
        assert_eq!(parser.retrieve::<String>("files").unwrap(), "a");
    }

    #[test]
    fn build_parser_reports_bad_entries() {
        let spec: ArgSpec =
            serde_json::from_str(r#"{ "arguments": [{ "long": "name" }] }"#).unwrap();
        let err = spec.build_parser().unwrap_err();
        assert!(format!("{err:#}").contains("arguments[0]"), "{err:#}");

        let spec: ArgSpec =
            serde_json::from_str(r#"{ "arguments": [{ "long": "--name", "nargs": "?" }] }"#)
                .unwrap();
        let err = spec.build_parser().unwrap_err();
        assert!(format!("{err:#}").contains("invalid nargs"), "{err:#}");
    }

    #[test]
    fn write_default_spec_round_trips_into_a_parser() {
        let dir = make_temp_dir("spec-defaults");
        let dest = write_default_spec(&dir, false).unwrap();
        let spec = ArgSpec::from_file(&dest).unwrap();

        let program = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(spec.program, Some(program));
        assert_eq!(spec.arguments.len(), 3);
        assert!(spec.build_parser().is_ok());

        assert!(write_default_spec(&dir, false).is_err());
        assert!(write_default_spec(&dir, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }
}
