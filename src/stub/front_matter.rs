//! The `===`-delimited options block at the top of a rendered stub.
//!
//! ```text
//! ===
//! path = "src/models/Post.php"
//! ===
//! <?php ...
//! ```
//!
//! The block is decoded as TOML, falling back to YAML. `path` and `append`
//! are read into typed directives; every other key is kept as-is in
//! [`RenderResult::options`].

use std::fmt;

use serde::Deserialize;

use super::append::{AppendDirective, AppendPosition};
use super::error::StubError;

/// Decoded option values keyed by option name.
pub type Options = serde_json::Map<String, serde_json::Value>;

const DELIMITER: &str = "===";

/// Output of a render: the body plus whatever the options block said.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderResult {
    body: String,
    options: Options,
    save_path: String,
    append: Option<AppendDirective>,
}

#[derive(Debug, Default, Deserialize)]
struct Directives {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    append: Option<AppendOption>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AppendOption {
    File(String),
    Table {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        after: Option<String>,
        #[serde(default)]
        before: Option<String>,
        #[serde(default)]
        line: Option<i64>,
    },
}

impl RenderResult {
    /// Split `text` into front matter and body and decode the options.
    pub fn parse(text: &str) -> Result<Self, StubError> {
        let Some((block, body)) = split_front_matter(text) else {
            return Ok(Self {
                body: text.to_string(),
                ..Self::default()
            });
        };

        let options = decode_options(block)?;
        let directives: Directives =
            serde_json::from_value(serde_json::Value::Object(options.clone()))
                .map_err(|e| StubError::InvalidFrontMatter(e.to_string()))?;

        let save_path = directives.path.unwrap_or_default();
        let append = directives.append.map(|option| match option {
            AppendOption::File(file) => AppendDirective {
                file: Some(file),
                position: AppendPosition::End,
            },
            AppendOption::Table {
                file,
                after,
                before,
                line,
            } => {
                let position = match (before, after, line) {
                    (Some(keyword), _, _) => AppendPosition::Before(keyword),
                    (None, Some(keyword), _) => AppendPosition::After(keyword),
                    (None, None, Some(line)) => AppendPosition::Line(line),
                    (None, None, None) => AppendPosition::End,
                };
                let file = file.or_else(|| Some(save_path.clone()).filter(|p| !p.is_empty()));
                AppendDirective { file, position }
            }
        });

        Ok(Self {
            body: body.to_string(),
            options,
            save_path,
            append,
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }

    /// The `path` option, or the empty string.
    pub fn save_path(&self) -> &str {
        &self.save_path
    }

    pub fn append_directive(&self) -> Option<&AppendDirective> {
        self.append.as_ref()
    }

    /// The body with its options written back as a YAML `===` block.
    pub fn raw(&self) -> Result<String, StubError> {
        if self.options.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.options)
            .map_err(|e| StubError::InvalidFrontMatter(e.to_string()))?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

/// Split off the options block. Returns `None` when the first line is not
/// `===` or the block is never closed.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if !is_delimiter(first) {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\n').trim_end_matches('\r') == DELIMITER
}

/// Decode an options block, trying TOML first and YAML second.
pub fn decode_options(block: &str) -> Result<Options, StubError> {
    let toml_err = match toml::from_str::<serde_json::Value>(block) {
        Ok(serde_json::Value::Object(options)) => return Ok(options),
        Ok(other) => format!("expected a table, found {other}"),
        Err(e) => e.to_string(),
    };

    let yaml_err = match serde_yaml::from_str::<serde_json::Value>(block) {
        Ok(serde_json::Value::Object(options)) => return Ok(options),
        Ok(serde_json::Value::Null) => return Ok(Options::new()),
        Ok(other) => format!("expected a mapping, found {other}"),
        Err(e) => e.to_string(),
    };

    Err(StubError::MalformedFrontMatter {
        toml: toml_err.trim().to_string(),
        yaml: yaml_err,
    })
}
