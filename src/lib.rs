//! # CSS Modules Localization
//!
//! Renames every class and keyframe of a stylesheet to a globally unique
//! identifier so stylesheets written with short names can be merged into
//! one application without collisions.
//!
//! ## Invariants
//!
//! 1. **Source Identity**: the stylesheet path must be absolute. It salts
//!    every generated name and is the base for `composes ... from "<path>"`.
//!
//! 2. **Idempotent Names**: a symbol keeps the name it was first given for
//!    the whole pass, and every generated name matches
//!    `^-?[_a-zA-Z]+[_a-zA-Z0-9-]*$`.
//!
//! 3. **Global Scope**: a class nested anywhere inside `:global(...)` is
//!    left byte-for-byte untouched; no `:global` marker survives.
//!
//! 4. **Two Passes**: all rules and at-rules are rewritten before any
//!    declaration, so `animation` may reference a later `@keyframes`.
//!
//! 5. **Fail Fast**: the first error aborts the pass; the tree is then in
//!    an unspecified state and must be discarded.
//!
//! ```
//! use css_modules_native::{localize_css, LocalizeOptions};
//!
//! let out = localize_css(".a { }", "/style.css", &LocalizeOptions::default()).unwrap();
//! assert_eq!(out.css, "._style_css-a { }");
//! assert_eq!(out.exports.get("a"), Some("_style_css-a"));
//! ```

mod composes;
mod error;
mod exports;
mod keyframes;
mod naming;
mod scope;
mod selector;
mod stylesheet;
mod symbols;
mod tokens;
mod transform;

#[cfg(test)]
mod selector_tests;
#[cfg(test)]
mod stylesheet_tests;

#[cfg(feature = "napi")]
pub use transform::{localize_batch_native, localize_css_native};

pub use composes::resolve_path;
pub use error::{
    ComposesError, CssSyntaxError, ErrorReport, LocalizeError, NamingError, SelectorSyntaxError,
    SymbolKind,
};
pub use error::{
    ERR_CSS_SYNTAX, ERR_INVALID_NAME, ERR_MALFORMED_COMPOSES, ERR_NAME_COLLISION,
    ERR_RELATIVE_PATH, ERR_SELECTOR_SYNTAX,
};
pub use exports::ExportTable;
pub use naming::{camelize, is_valid_identifier, sanitize_path, DefaultNaming, HashedNaming, NamingMode, NamingStrategy};
pub use scope::{localize_selector, strip_global};
pub use selector::{Pseudo, Selector, SelectorList, SelectorNode};
pub use stylesheet::{AtRule, Comment, Declaration, Node, Parent, Rule, Stylesheet};
pub use symbols::SymbolTable;
pub use transform::{
    localize, localize_batch, localize_css, localize_css_with, LocalizeConfig, LocalizeOptions,
    Localized, StylesheetInput,
};
