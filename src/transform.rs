//! Transform Module
//!
//! Drives one stylesheet through localization:
//!
//! 1. the source path must be absolute,
//! 2. rules and at-rules: selectors and `@keyframes` names are rewritten,
//! 3. declarations: animation references are rewritten, `composes` is
//!    resolved and removed,
//! 4. camelCase aliases are added to the export table.
//!
//! All keyframes are known before any declaration is looked at, so an
//! `animation` may reference a `@keyframes` block declared later.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::composes::resolve_composes;
use crate::error::LocalizeError;
use crate::exports::ExportTable;
use crate::keyframes::{is_keyframes_rule, localize_keyframes, rewrite_animation, AnimationProperty};
use crate::naming::{DefaultNaming, HashedNaming, NamingMode, NamingStrategy};
use crate::scope::localize_selector;
use crate::stylesheet::{Node, Stylesheet};
use crate::symbols::SymbolTable;

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct LocalizeOptions {
    pub naming: Arc<dyn NamingStrategy>,
}

impl LocalizeOptions {
    pub fn with_naming(naming: impl NamingStrategy + 'static) -> Self {
        LocalizeOptions {
            naming: Arc::new(naming),
        }
    }
}

impl Default for LocalizeOptions {
    fn default() -> Self {
        LocalizeOptions::with_naming(DefaultNaming)
    }
}

impl fmt::Debug for LocalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizeOptions").finish_non_exhaustive()
    }
}

/// Serializable configuration, as passed in by the host bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizeConfig {
    #[serde(default)]
    pub naming: NamingMode,
}

impl From<LocalizeConfig> for LocalizeOptions {
    fn from(config: LocalizeConfig) -> Self {
        match config.naming {
            NamingMode::Default => LocalizeOptions::with_naming(DefaultNaming),
            NamingMode::Hashed { length } => LocalizeOptions::with_naming(HashedNaming { length }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Localized {
    pub css: String,
    pub exports: ExportTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesheetInput {
    pub source: String,
    pub from: String,
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || Path::new(path).is_absolute()
}

/// Localizes `sheet` in place, recording its names in `exports`.
#[tracing::instrument(skip_all, fields(file = sheet.source.as_deref().unwrap_or("")))]
pub fn localize(
    sheet: &mut Stylesheet,
    exports: &mut ExportTable,
    options: &LocalizeOptions,
) -> Result<(), LocalizeError> {
    let file = sheet.source.clone().unwrap_or_default();
    if !is_absolute(&file) {
        return Err(LocalizeError::Path { path: file });
    }

    {
        let mut symbols = SymbolTable::new(&file, options.naming.as_ref(), exports);

        sheet.walk_mut(&mut |node| -> Result<(), LocalizeError> {
            match node {
                Node::Rule(rule) => {
                    rule.selector = localize_selector(&rule.selector, &mut symbols)?;
                }
                Node::AtRule(at_rule) if is_keyframes_rule(&at_rule.name) => {
                    localize_keyframes(at_rule, &mut symbols)?;
                }
                _ => {}
            }
            Ok(())
        })?;
        tracing::debug!("rules localized");

        sheet.retain_declarations(&mut |parent, decl| -> Result<bool, LocalizeError> {
            if let Some(property) = AnimationProperty::from_prop(&decl.prop) {
                if let Some(value) = rewrite_animation(property, &decl.value, &symbols) {
                    decl.value = value;
                }
                return Ok(true);
            }
            if decl.prop.eq_ignore_ascii_case("composes") {
                resolve_composes(parent, &decl.value, &mut symbols)?;
                return Ok(false);
            }
            Ok(true)
        })?;
        tracing::debug!("declarations localized");
    }

    exports.finalize_aliases();
    Ok(())
}

/// Parses, localizes and serializes one stylesheet into `exports`.
///
/// When one table is shared across stylesheets, a key another stylesheet
/// already recorded is taken over: it now maps to this stylesheet's name,
/// and the earlier stylesheet's value for that key is gone from the table.
/// Values appended through `composes` keep whatever names they resolved
/// at the time. Pre-seeded keys are never replaced. Callers that need every
/// file's mapping should use one table per file.
pub fn localize_css_with(
    source: &str,
    from: &str,
    exports: &mut ExportTable,
    options: &LocalizeOptions,
) -> Result<String, LocalizeError> {
    let mut sheet = Stylesheet::parse(source, Some(from))?;
    localize(&mut sheet, exports, options)?;
    Ok(sheet.to_css())
}

/// Same as [`localize_css_with`] with a fresh export table.
pub fn localize_css(
    source: &str,
    from: &str,
    options: &LocalizeOptions,
) -> Result<Localized, LocalizeError> {
    let mut exports = ExportTable::new();
    let css = localize_css_with(source, from, &mut exports, options)?;
    Ok(Localized { css, exports })
}

/// Localizes independent stylesheets in parallel, each with its own table.
pub fn localize_batch(
    inputs: &[StylesheetInput],
    options: &LocalizeOptions,
) -> Vec<Result<Localized, LocalizeError>> {
    inputs
        .par_iter()
        .map(|input| localize_css(&input.source, &input.from, options))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NATIVE BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn bridge_error(error: &LocalizeError, file: &str) -> napi::Error {
    let report = error.report(file);
    napi::Error::from_reason(serde_json::to_string(&report).unwrap_or(report.message))
}

/// Returns `{"css": ..., "exports": {...}}` as JSON.
#[cfg(feature = "napi")]
#[napi]
pub fn localize_css_native(
    source: String,
    from: String,
    exports_json: Option<String>,
    config_json: Option<String>,
) -> napi::Result<String> {
    let mut exports: ExportTable = match exports_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| napi::Error::from_reason(format!("Exports parse error: {}", e)))?,
        None => ExportTable::new(),
    };
    let config: LocalizeConfig = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| napi::Error::from_reason(format!("Config parse error: {}", e)))?,
        None => LocalizeConfig::default(),
    };
    let options = LocalizeOptions::from(config);

    let css = localize_css_with(&source, &from, &mut exports, &options)
        .map_err(|e| bridge_error(&e, &from))?;
    serde_json::to_string(&Localized { css, exports })
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}

/// Takes `[{"source", "from"}]`, returns one `{css, exports}` or
/// `{error}` object per input, in order.
#[cfg(feature = "napi")]
#[napi]
pub fn localize_batch_native(inputs_json: String, config_json: Option<String>) -> napi::Result<String> {
    let inputs: Vec<StylesheetInput> = serde_json::from_str(&inputs_json)
        .map_err(|e| napi::Error::from_reason(format!("Inputs parse error: {}", e)))?;
    let config: LocalizeConfig = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| napi::Error::from_reason(format!("Config parse error: {}", e)))?,
        None => LocalizeConfig::default(),
    };
    let options = LocalizeOptions::from(config);

    let results: Vec<serde_json::Value> = localize_batch(&inputs, &options)
        .into_iter()
        .zip(&inputs)
        .map(|(result, input)| match result {
            Ok(localized) => serde_json::json!(localized),
            Err(e) => serde_json::json!({ "error": e.report(&input.from) }),
        })
        .collect();
    serde_json::to_string(&results)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}
