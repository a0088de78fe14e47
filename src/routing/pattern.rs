//! Path template compilation.
//!
//! # Responsibilities
//! - Turn a path template (`/atom/:year/:month/:day/:slug`) into an anchored regex
//! - Record capture names in group order (`splat` for `*`)
//! - Accept pre-built matchers as an extension point
//!
//! # Design Decisions
//! - Compilation happens once, at route registration
//! - Date placeholders are typed: `year` is 4 digits, `month`/`day` are 2 digits
//! - Everything else captures up to the next `/`, `?`, `&` or `#`

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::routing::RoutingError;

/// Finds placeholders, wildcards and the literal metacharacters we escape.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+)|[*.+()]").expect("valid template token regex"));

/// Capture name recorded for `*` wildcards.
pub const SPLAT: &str = "splat";

/// Where a route's matcher comes from.
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// A path template such as `/tag/:tag` or `/files/*.*`.
    Template(String),
    /// A pre-built regex together with its capture names.
    Compiled { regex: Regex, names: Vec<String> },
    /// A pre-built regex without named parameters.
    Matcher(Regex),
}

impl From<&str> for PatternSource {
    fn from(template: &str) -> Self {
        PatternSource::Template(template.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(template: String) -> Self {
        PatternSource::Template(template)
    }
}

impl From<Regex> for PatternSource {
    fn from(regex: Regex) -> Self {
        PatternSource::Matcher(regex)
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    capture_names: Vec<String>,
}

impl PathPattern {
    /// Compile a pattern source.
    ///
    /// Fails with [`RoutingError::InvalidPatternType`] when the resulting
    /// matcher is unusable or its capture names do not line up with its groups.
    pub fn compile(source: impl Into<PatternSource>) -> Result<Self, RoutingError> {
        match source.into() {
            PatternSource::Template(template) => Self::from_template(&template),
            PatternSource::Compiled { regex, names } => {
                let groups = regex.captures_len() - 1;
                if groups != names.len() {
                    return Err(RoutingError::InvalidPatternType(format!(
                        "{} has {} capture groups but {} names",
                        regex.as_str(),
                        groups,
                        names.len()
                    )));
                }
                Ok(Self {
                    regex,
                    capture_names: names,
                })
            }
            PatternSource::Matcher(regex) => Ok(Self {
                regex,
                capture_names: Vec::new(),
            }),
        }
    }

    fn from_template(template: &str) -> Result<Self, RoutingError> {
        let mut capture_names = Vec::new();

        let body = TOKEN_RE.replace_all(template, |caps: &Captures<'_>| {
            if let Some(name) = caps.get(1) {
                let name = name.as_str();
                capture_names.push(name.to_string());
                format!("({})", placeholder_pattern(name))
            } else {
                match &caps[0] {
                    "*" => {
                        capture_names.push(SPLAT.to_string());
                        "(.*?)".to_string()
                    }
                    literal => regex::escape(literal),
                }
            }
        });

        let regex = Regex::new(&format!("^{}$", body))
            .map_err(|e| RoutingError::InvalidPatternType(format!("{}: {}", template, e)))?;

        Ok(Self {
            regex,
            capture_names,
        })
    }

    /// Match a full (decoded) path, returning captures bound positionally to names.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        let bound = self
            .capture_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();
        Some(bound)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }
}

fn placeholder_pattern(name: &str) -> &'static str {
    match name {
        "year" => "[0-9]{4}",
        "month" | "day" => "[0-9]{2}",
        _ => "[^/?&#]+",
    }
}
