//! Naming Module
//!
//! Strategies that derive a global identifier from `(file, symbol)`, and
//! the identifier grammar every generated name has to satisfy.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref CLASS_NAME_RE: Regex = Regex::new(r"^-?[_a-zA-Z]+[_a-zA-Z0-9-]*$").unwrap();
    static ref PATH_UNSAFE_RE: Regex = Regex::new(r"[^_a-zA-Z0-9-]").unwrap();
    static ref CAMEL_RUN_RE: Regex = Regex::new(r"[^a-zA-Z0-9]+(.)").unwrap();
}

/// Derives the generated name of `symbol` declared in `file`.
///
/// `file` is always an absolute path. Implementations must be pure: the
/// same inputs always give the same name.
pub trait NamingStrategy: Send + Sync {
    fn generate(&self, file: &str, symbol: &str) -> String;
}

/// `sanitize(file) + "-" + symbol`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultNaming;

impl NamingStrategy for DefaultNaming {
    fn generate(&self, file: &str, symbol: &str) -> String {
        format!("{}-{}", sanitize_path(file), symbol)
    }
}

/// `_` + leading hex digits of the file's SHA-256 + `_` + symbol.
///
/// Keeps generated names short regardless of how deep the file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedNaming {
    pub length: usize,
}

impl Default for HashedNaming {
    fn default() -> Self {
        HashedNaming { length: 8 }
    }
}

impl NamingStrategy for HashedNaming {
    fn generate(&self, file: &str, symbol: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(file.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        let length = self.length.clamp(1, digest.len());
        format!("_{}_{}", &digest[..length], symbol)
    }
}

/// Serializable choice of strategy, used by [`crate::LocalizeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum NamingMode {
    #[default]
    Default,
    Hashed {
        #[serde(default = "default_hash_length")]
        length: usize,
    },
}

fn default_hash_length() -> usize {
    HashedNaming::default().length
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_path(file: &str) -> String {
    PATH_UNSAFE_RE.replace_all(file, "_").into_owned()
}

pub fn is_valid_identifier(name: &str) -> bool {
    CLASS_NAME_RE.is_match(name)
}

/// `class-dash` -> `classDash`, `a__b` -> `aB`.
///
/// Each run of non-alphanumeric characters is dropped and the character
/// after it is upper-cased. A trailing run has no following character and
/// is kept as is.
pub fn camelize(name: &str) -> String {
    CAMEL_RUN_RE
        .replace_all(name, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming_sanitizes_path() {
        assert_eq!(DefaultNaming.generate("/style.css", "a"), "_style_css-a");
        assert_eq!(
            DefaultNaming.generate("/styles/the style.css", "a"),
            "_styles_the_style_css-a"
        );
    }

    #[test]
    fn test_hashed_naming_is_stable() {
        let naming = HashedNaming { length: 6 };
        let first = naming.generate("/a/style.css", "button");
        assert_eq!(first, naming.generate("/a/style.css", "button"));
        assert_ne!(first, naming.generate("/b/style.css", "button"));
        assert!(first.starts_with('_'));
        assert!(first.ends_with("_button"));
        assert_eq!(first.len(), 1 + 6 + 1 + "button".len());
        assert!(is_valid_identifier(&first));
    }

    #[test]
    fn test_identifier_grammar() {
        assert!(is_valid_identifier("_style_css-a"));
        assert!(is_valid_identifier("-foo"));
        assert!(is_valid_identifier("a1-b_c"));
        assert!(!is_valid_identifier("--class"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("class-dash"), "classDash");
        assert_eq!(camelize("classCamel"), "classCamel");
        assert_eq!(camelize("a--b_c"), "aBC");
        assert_eq!(camelize("trailing-"), "trailing-");
        assert_eq!(camelize("x-1"), "x1");
    }

    #[test]
    fn test_naming_mode_config() {
        let mode: NamingMode = serde_json::from_str(r#""default""#).unwrap();
        assert_eq!(mode, NamingMode::Default);
        let mode: NamingMode = serde_json::from_str(r#"{"hashed": {"length": 4}}"#).unwrap();
        assert_eq!(mode, NamingMode::Hashed { length: 4 });
        let mode: NamingMode = serde_json::from_str(r#"{"hashed": {}}"#).unwrap();
        assert_eq!(mode, NamingMode::Hashed { length: 8 });
    }
}
