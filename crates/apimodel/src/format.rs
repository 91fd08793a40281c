use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Prefix of the first line of every versioned signature file.
pub const SIGNATURE_FORMAT_PREFIX: &str = "// Signature format: ";

/// Signature file format versions, in definition order.
///
/// The derived ordering is the version ordering; compare formats with it
/// rather than with their version strings.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    V1,
    #[default]
    V2,
    V3,
    V4,
}

impl FileFormat {
    pub const LATEST: FileFormat = FileFormat::V4;

    pub fn all() -> [FileFormat; 4] {
        [FileFormat::V1, FileFormat::V2, FileFormat::V3, FileFormat::V4]
    }

    pub fn description(self) -> &'static str {
        match self {
            FileFormat::V1 => "Doclava signature files",
            FileFormat::V2 | FileFormat::V3 | FileFormat::V4 => "Metalava signature files",
        }
    }

    /// Version written into the header; `V1` files carry no header.
    pub fn version(self) -> Option<&'static str> {
        match self {
            FileFormat::V1 => None,
            FileFormat::V2 => Some("2.0"),
            FileFormat::V3 => Some("3.0"),
            FileFormat::V4 => Some("4.0"),
        }
    }

    pub fn concise_default_values(self) -> bool {
        matches!(self, FileFormat::V4)
    }

    pub fn use_kotlin_style_nulls(self) -> bool {
        self >= FileFormat::V3
    }

    pub fn header(self) -> Option<String> {
        self.version()
            .map(|version| format!("{SIGNATURE_FORMAT_PREFIX}{version}\n"))
    }

    /// Lowercase name accepted wherever a format is configured.
    pub fn option_value(self) -> &'static str {
        match self {
            FileFormat::V1 => "v1",
            FileFormat::V2 => "v2",
            FileFormat::V3 => "v3",
            FileFormat::V4 => "v4",
        }
    }

    /// Detects the format of a signature file from its first line.
    ///
    /// A first line without the header prefix is a `V1` file; a header with an
    /// unrecognised version is an error.
    pub fn from_header(first_line: &str) -> Result<FileFormat, ModelError> {
        let line = first_line.trim_end_matches(|c| c == '\r' || c == '\n');
        let Some(version) = line.strip_prefix(SIGNATURE_FORMAT_PREFIX) else {
            return Ok(FileFormat::V1);
        };
        let version = version.trim();
        Self::all()
            .into_iter()
            .find(|format| format.version() == Some(version))
            .ok_or_else(|| ModelError::UnknownFileFormat(format!("header version '{version}'")))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_value())
    }
}

impl FromStr for FileFormat {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|format| format.option_value() == lowered)
            .ok_or_else(|| ModelError::UnknownFileFormat(value.to_string()))
    }
}
