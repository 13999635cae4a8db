//! Error taxonomy for the localization pass.
//!
//! Every error aborts the whole stylesheet pass. Each variant carries a
//! stable code so host tooling can match on it without parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_RELATIVE_PATH: &str = "CSSM-ERR-PATH-001";
pub const ERR_INVALID_NAME: &str = "CSSM-ERR-NAME-001";
pub const ERR_NAME_COLLISION: &str = "CSSM-ERR-NAME-002";
pub const ERR_MALFORMED_COMPOSES: &str = "CSSM-ERR-COMPOSES-001";
pub const ERR_CSS_SYNTAX: &str = "CSSM-ERR-SYNTAX-001";
pub const ERR_SELECTOR_SYNTAX: &str = "CSSM-ERR-SYNTAX-002";

/// Which namespace a generated name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Class,
    Keyframe,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Class => f.write_str("class"),
            SymbolKind::Keyframe => f.write_str("keyframe"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The naming strategy produced something that is not a CSS identifier.
    #[error(
        "Wrong generated name for {kind} \"{symbol}\" in {file}\nGot: \"{candidate}\"\nLook at https://stackoverflow.com/a/449000/5576420"
    )]
    InvalidIdentifier {
        symbol: String,
        kind: SymbolKind,
        file: String,
        candidate: String,
    },

    /// Two distinct symbols of one stylesheet map to the same generated name.
    #[error(
        "Generated name \"{candidate}\" for {kind} \"{symbol}\" in {file} is already used by \"{existing}\""
    )]
    Collision {
        symbol: String,
        kind: SymbolKind,
        file: String,
        candidate: String,
        existing: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPOSES ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposesError {
    #[error("has no parent rule!")]
    NoParentRule,

    #[error("rule selector should be a single class, but got: {selector}")]
    InvalidTarget { selector: String },

    #[error("rule selector is not a local class: {selector}")]
    UnknownTarget { selector: String },

    #[error("declaration should not contain commas: {value}")]
    ContainsCommas { value: String },

    #[error("unexpected token `{token}` in: {value}")]
    UnexpectedToken { token: String, value: String },

    #[error("invalid `from` clause in: {value}")]
    InvalidFrom { value: String },

    #[error("nothing to compose in: {value}")]
    Empty { value: String },

    #[error("class composes itself: {class}")]
    SelfComposition { class: String },

    #[error("has no such local class to compose from: {class}")]
    UnknownLocalClass { class: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTAX ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct CssSyntaxError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} in selector `{input}`")]
pub struct SelectorSyntaxError {
    pub message: String,
    pub input: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOP-LEVEL ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalizeError {
    #[error("File name should be absolute! Got: {path}")]
    Path { path: String },

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("Malformed composes: {0}")]
    MalformedComposes(#[from] ComposesError),

    #[error("CSS syntax error: {0}")]
    CssSyntax(#[from] CssSyntaxError),

    #[error("Selector syntax error: {0}")]
    SelectorSyntax(#[from] SelectorSyntaxError),
}

impl LocalizeError {
    pub fn code(&self) -> &'static str {
        match self {
            LocalizeError::Path { .. } => ERR_RELATIVE_PATH,
            LocalizeError::Naming(NamingError::InvalidIdentifier { .. }) => ERR_INVALID_NAME,
            LocalizeError::Naming(NamingError::Collision { .. }) => ERR_NAME_COLLISION,
            LocalizeError::MalformedComposes(_) => ERR_MALFORMED_COMPOSES,
            LocalizeError::CssSyntax(_) => ERR_CSS_SYNTAX,
            LocalizeError::SelectorSyntax(_) => ERR_SELECTOR_SYNTAX,
        }
    }

    pub fn report(&self, file: &str) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            file: file.to_string(),
        }
    }
}

/// Serializable form handed across the bridge to the host bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi_derive::napi(object))]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_message() {
        let err = LocalizeError::from(NamingError::InvalidIdentifier {
            symbol: "class".to_string(),
            kind: SymbolKind::Class,
            file: "/style.css".to_string(),
            candidate: "--class".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Wrong generated name for class \"class\" in /style.css\nGot: \"--class\"\nLook at https://stackoverflow.com/a/449000/5576420"
        );
        assert_eq!(err.code(), ERR_INVALID_NAME);
    }

    #[test]
    fn test_composes_message_prefix() {
        let err = LocalizeError::from(ComposesError::SelfComposition {
            class: "class1".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Malformed composes: class composes itself: class1"
        );

        let report = err.report("/style.css");
        assert_eq!(report.code, ERR_MALFORMED_COMPOSES);
        assert_eq!(report.file, "/style.css");
    }
}
