//! Generator configuration handed to the normalization core.
//!
//! Every selector is validated up front: an unknown profile, dialect or naming
//! convention rejects the whole configuration instead of falling back to a
//! default.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while building a [`GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid target profile '{value}'. Must be one of {expected}.")]
    InvalidProfile { value: String, expected: String },

    #[error("Invalid path dialect '{value}'. Must be one of {expected}.")]
    InvalidPathDialect { value: String, expected: String },

    #[error("Invalid naming convention '{value}'. Must be one of {expected}.")]
    InvalidNaming { value: String, expected: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How polymorphic hierarchies are represented in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetProfile {
    /// Subtypes structurally extend their base type.
    #[default]
    Classical,
    /// Subtypes embed every base member and carry a literal discriminant.
    TaggedUnion,
}

impl TargetProfile {
    pub const ALL: [Self; 2] = [Self::Classical, Self::TaggedUnion];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetProfile::Classical => "classical",
            TargetProfile::TaggedUnion => "tagged-union",
        }
    }

    pub fn is_tagged_union(&self) -> bool {
        matches!(self, TargetProfile::TaggedUnion)
    }
}

/// Interpolation syntax produced by the path template expander.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathDialect {
    /// `${encodeParam({name: "id", value: id, ...})}` inside a template literal
    #[default]
    TypeScript,
    /// `${id}` inside a template literal
    TypeScriptPlain,
    /// `{Uri.EscapeDataString(id.ToString())}` inside an interpolated string
    CSharp,
}

impl PathDialect {
    pub const ALL: [Self; 3] = [Self::TypeScript, Self::TypeScriptPlain, Self::CSharp];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathDialect::TypeScript => "typescript",
            PathDialect::TypeScriptPlain => "typescript-plain",
            PathDialect::CSharp => "csharp",
        }
    }
}

/// File naming convention used for model import paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingConvention {
    #[default]
    CamelCase,
    KebabCase,
}

impl NamingConvention {
    pub const ALL: [Self; 2] = [Self::CamelCase, Self::KebabCase];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::CamelCase => "camelCase",
            NamingConvention::KebabCase => "kebab-case",
        }
    }
}

/// Render the accepted values as `'a', 'b'` for error messages.
fn expected_values(values: impl IntoIterator<Item = &'static str>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for TargetProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidProfile {
                value: s.to_string(),
                expected: expected_values(Self::ALL.iter().map(|p| p.as_str())),
            })
    }
}

impl FromStr for PathDialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidPathDialect {
                value: s.to_string(),
                expected: expected_values(Self::ALL.iter().map(|d| d.as_str())),
            })
    }
}

impl FromStr for NamingConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidNaming {
                value: s.to_string(),
                expected: expected_values(Self::ALL.iter().map(|n| n.as_str())),
            })
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PathDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub profile: TargetProfile,
    pub path_dialect: PathDialect,
    pub naming: NamingConvention,
    /// Strip the `Null` sentinel from composed alternatives and mark the node nullable.
    pub strip_nullable_variants: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            profile: TargetProfile::default(),
            path_dialect: PathDialect::default(),
            naming: NamingConvention::default(),
            strip_nullable_variants: true,
        }
    }
}

/// On-disk shape of the configuration; selectors stay strings until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    profile: Option<String>,
    path_dialect: Option<String>,
    naming: Option<String>,
    strip_nullable_variants: Option<bool>,
}

impl TryFrom<RawConfig> for GeneratorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let defaults = GeneratorConfig::default();
        Ok(Self {
            profile: match raw.profile {
                Some(p) => p.parse()?,
                None => defaults.profile,
            },
            path_dialect: match raw.path_dialect {
                Some(d) => d.parse()?,
                None => defaults.path_dialect,
            },
            naming: match raw.naming {
                Some(n) => n.parse()?,
                None => defaults.naming,
            },
            strip_nullable_variants: raw
                .strip_nullable_variants
                .unwrap_or(defaults.strip_nullable_variants),
        })
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;
        raw.try_into()
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_parse() {
        assert_eq!(
            "tagged-union".parse::<TargetProfile>().unwrap(),
            TargetProfile::TaggedUnion
        );
        assert_eq!(
            "csharp".parse::<PathDialect>().unwrap(),
            PathDialect::CSharp
        );
        assert_eq!(
            "kebab-case".parse::<NamingConvention>().unwrap(),
            NamingConvention::KebabCase
        );
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let err = "inheritance".parse::<TargetProfile>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid target profile 'inheritance'. Must be one of 'classical', 'tagged-union'."
        );
    }

    #[test]
    fn test_invalid_naming_is_rejected() {
        let err = "snake_case".parse::<NamingConvention>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNaming { .. }));
        assert!(err.to_string().contains("'camelCase', 'kebab-case'"));
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(config.strip_nullable_variants);
    }

    #[test]
    fn test_from_toml_full() {
        let config = GeneratorConfig::from_toml_str(
            r#"
profile = "tagged-union"
path-dialect = "typescript-plain"
naming = "kebab-case"
strip-nullable-variants = false
"#,
        )
        .unwrap();
        assert_eq!(config.profile, TargetProfile::TaggedUnion);
        assert_eq!(config.path_dialect, PathDialect::TypeScriptPlain);
        assert_eq!(config.naming, NamingConvention::KebabCase);
        assert!(!config.strip_nullable_variants);
    }

    #[test]
    fn test_from_toml_rejects_bad_selector() {
        let err = GeneratorConfig::from_toml_str(r#"path-dialect = "go""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPathDialect { .. }));
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let err = GeneratorConfig::from_toml_str(r#"supports-retry = true"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelir.toml");
        fs::write(&path, "profile = \"tagged-union\"\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert!(config.profile.is_tagged_union());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
