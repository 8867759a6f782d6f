//! Formatting styles carried on candidate nodes
//!
//! Candidate nodes keep a closed [`Style`] enum. The parser's style is an open
//! bit set, so anything other than one of the six recognized single styles
//! collapses to [`Style::Default`].

use crate::yaml;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatting hint on a candidate node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Default,
    Tagged,
    DoubleQuoted,
    SingleQuoted,
    Literal,
    Folded,
    Flow,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Tagged => write!(f, "tagged"),
            Self::DoubleQuoted => write!(f, "double"),
            Self::SingleQuoted => write!(f, "single"),
            Self::Literal => write!(f, "literal"),
            Self::Folded => write!(f, "folded"),
            Self::Flow => write!(f, "flow"),
        }
    }
}

/// Map a parser style to a candidate style
pub fn map_yaml_style(original: yaml::Style) -> Style {
    match original {
        yaml::Style::TAGGED => Style::Tagged,
        yaml::Style::DOUBLE_QUOTED => Style::DoubleQuoted,
        yaml::Style::SINGLE_QUOTED => Style::SingleQuoted,
        yaml::Style::LITERAL => Style::Literal,
        yaml::Style::FOLDED => Style::Folded,
        yaml::Style::FLOW => Style::Flow,
        _ => Style::Default,
    }
}

/// Map a candidate style back to a parser style
pub fn map_to_yaml_style(original: Style) -> yaml::Style {
    match original {
        Style::Tagged => yaml::Style::TAGGED,
        Style::DoubleQuoted => yaml::Style::DOUBLE_QUOTED,
        Style::SingleQuoted => yaml::Style::SINGLE_QUOTED,
        Style::Literal => yaml::Style::LITERAL,
        Style::Folded => yaml::Style::FOLDED,
        Style::Flow => yaml::Style::FLOW,
        Style::Default => yaml::Style::NONE,
    }
}

impl From<yaml::Style> for Style {
    fn from(style: yaml::Style) -> Self {
        map_yaml_style(style)
    }
}

impl From<Style> for yaml::Style {
    fn from(style: Style) -> Self {
        map_to_yaml_style(style)
    }
}
