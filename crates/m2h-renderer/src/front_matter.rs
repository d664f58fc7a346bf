//! YAML front matter.

use serde::Deserialize;
use serde_yaml::Value;

/// Document metadata declared in the front matter block.
///
/// Only `title` and `load` are recognised. Other keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Page title.
    pub title: Option<String>,
    /// Extra stylesheets, relative to the source file's directory.
    pub load: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<Value>,
    load: Option<Value>,
}

impl FrontMatter {
    /// Parse a front matter block.
    ///
    /// A scalar `title` of any type is accepted and stringified. `load` may be
    /// a single string or a sequence; non-string entries are skipped.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: Option<RawFrontMatter> = serde_yaml::from_str(yaml)?;
        let raw = raw.unwrap_or_default();

        let title = raw.title.as_ref().and_then(scalar_to_string);
        let load = match raw.load {
            Some(Value::String(path)) => vec![path],
            Some(Value::Sequence(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(path) => Some(path),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self { title, load })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
