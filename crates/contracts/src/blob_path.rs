//! BlobPathTemplate - blob naming rules
//!
//! Blob names are assigned by the blob sink, not the core. A template such as
//! `dotnet/{rand-guid}.json` is parsed once and rendered for every write.

use std::fmt;

use crate::ContractError;

/// Default blob path template
pub const DEFAULT_BLOB_PATH: &str = "dotnet/{rand-guid}.json";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    RandGuid,
}

/// Parsed blob path template
///
/// Supported placeholders: `{rand-guid}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl BlobPathTemplate {
    /// Parse a template
    ///
    /// # Errors
    /// Empty or absolute templates, `..` components, unbalanced braces and unknown
    /// placeholders are rejected.
    pub fn parse(raw: &str) -> Result<Self, ContractError> {
        let invalid = |message: String| ContractError::config_validation("blob path", message);

        if raw.trim().is_empty() {
            return Err(invalid("template cannot be empty".to_string()));
        }
        if raw.starts_with('/') || raw.starts_with('\\') {
            return Err(invalid(format!("template '{raw}' must be relative")));
        }
        if raw.split(['/', '\\']).any(|part| part == "..") {
            return Err(invalid(format!("template '{raw}' cannot contain '..'")));
        }

        let mut segments = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(invalid(format!("unbalanced '}}' in '{raw}'")));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid(format!("unclosed '{{' in '{raw}'")))?;
            match &after[..close] {
                "rand-guid" => segments.push(Segment::RandGuid),
                other => return Err(invalid(format!("unknown placeholder '{{{other}}}'"))),
            }
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Render a blob name, calling `guid` once per `{rand-guid}`
    pub fn render(&self, mut guid: impl FnMut() -> String) -> String {
        let mut out = String::with_capacity(self.raw.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::RandGuid => out.push_str(&guid()),
            }
        }
        out
    }

    /// True if every rendered name is unique per write
    pub fn is_randomized(&self) -> bool {
        self.segments.contains(&Segment::RandGuid)
    }

    /// Original template text
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for BlobPathTemplate {
    fn default() -> Self {
        Self {
            raw: DEFAULT_BLOB_PATH.to_string(),
            segments: vec![
                Segment::Literal("dotnet/".to_string()),
                Segment::RandGuid,
                Segment::Literal(".json".to_string()),
            ],
        }
    }
}

impl fmt::Display for BlobPathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
