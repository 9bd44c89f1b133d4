//! Output formats produced by a generation run.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Output format of a generation pass.
///
/// Every format-specific branch in the bindings matches on this enum
/// exhaustively, so adding a format is a compile-time change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Latex,
    Rtf,
    Man,
    Docbook,
}

impl OutputFormat {
    /// All supported formats.
    pub const ALL: [Self; 5] = [Self::Html, Self::Latex, Self::Rtf, Self::Man, Self::Docbook];

    /// Lowercase name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Rtf => "rtf",
            Self::Man => "man",
            Self::Docbook => "docbook",
        }
    }

    /// Extension of generated files, including the dot.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Html => ".html",
            Self::Latex => ".tex",
            Self::Rtf => ".rtf",
            Self::Man => ".3",
            Self::Docbook => ".xml",
        }
    }

    /// Subdirectory of the output directory this format writes into.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, thiserror::Error)]
#[error("unknown output format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LaTeX".parse::<OutputFormat>().unwrap(), OutputFormat::Latex);
    }

    #[test]
    fn test_parse_unknown_format() {
        let err = "pdf".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unknown output format: pdf");
    }
}
