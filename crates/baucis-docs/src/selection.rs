//! Field selection expressions.
//!
//! A controller may restrict which paths it exposes with an expression such
//! as `"-password -secret"` (exclusive) or `"name +color"` (inclusive). The
//! mode is inferred from the presence of any `-` token; expressions mixing
//! both kinds are treated as exclusive and their bare tokens ignored.

use std::collections::HashSet;
use std::fmt;

use crate::model::ID_KEY;

/// How a selection expression filters fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No expression: every field is visible.
    #[default]
    All,
    /// Only the listed fields (plus `_id`) are visible.
    Inclusive(HashSet<String>),
    /// Every field except the listed ones is visible.
    Exclusive(HashSet<String>),
}

impl Selection {
    /// Parses a whitespace-separated selection expression.
    ///
    /// Blank input yields [`Selection::All`].
    pub fn parse(expression: &str) -> Self {
        let tokens: Vec<&str> = expression.split_whitespace().collect();
        if tokens.is_empty() {
            return Self::All;
        }

        if tokens.iter().any(|t| t.starts_with('-')) {
            let excluded = tokens
                .iter()
                .filter_map(|t| t.strip_prefix('-'))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            Self::Exclusive(excluded)
        } else {
            let included = tokens
                .iter()
                .map(|t| t.strip_prefix('+').unwrap_or(t))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            Self::Inclusive(included)
        }
    }

    /// Parses an optional expression.
    pub fn from_optional(expression: Option<&str>) -> Self {
        expression.map_or(Self::All, Self::parse)
    }

    /// Returns `true` if the field name survives this selection.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Inclusive(included) => name == ID_KEY || included.contains(name),
            Self::Exclusive(excluded) => !excluded.contains(name),
        }
    }

    /// Returns `true` for exclusive expressions.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Exclusive(_))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, names) = match self {
            Self::All => return Ok(()),
            Self::Inclusive(names) => ("", names),
            Self::Exclusive(names) => ("-", names),
        };
        let mut sorted: Vec<&String> = names.iter().collect();
        sorted.sort();
        for (i, name) in sorted.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{prefix}{name}")?;
        }
        Ok(())
    }
}

impl From<&str> for Selection {
    fn from(expression: &str) -> Self {
        Self::parse(expression)
    }
}
