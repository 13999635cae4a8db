//! Symbol Table
//!
//! Per-stylesheet view over the caller's [`ExportTable`]: generates names
//! on first use, remembers which generated name belongs to which original
//! class, and which names are keyframes.

use std::collections::{HashMap, HashSet};

use crate::error::{NamingError, SymbolKind};
use crate::exports::ExportTable;
use crate::naming::{is_valid_identifier, NamingStrategy};

pub struct SymbolTable<'a> {
    file: &'a str,
    naming: &'a dyn NamingStrategy,
    exports: &'a mut ExportTable,
    /// generated name -> original symbol, for this stylesheet only
    reversed: HashMap<String, String>,
    /// keyframe name -> generated name
    keyframes: HashMap<String, String>,
    classes: HashSet<String>,
}

impl<'a> SymbolTable<'a> {
    pub fn new(file: &'a str, naming: &'a dyn NamingStrategy, exports: &'a mut ExportTable) -> Self {
        SymbolTable {
            file,
            naming,
            exports,
            reversed: HashMap::new(),
            keyframes: HashMap::new(),
            classes: HashSet::new(),
        }
    }

    pub fn file(&self) -> &str {
        self.file
    }

    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming
    }

    /// Returns the generated name for `symbol`, creating it on first use.
    pub fn generate(&mut self, symbol: &str, kind: SymbolKind) -> Result<String, NamingError> {
        let name = match self.exports.reusable(symbol, self.file) {
            Some(existing) => {
                let existing = existing.to_string();
                self.reversed
                    .entry(existing.clone())
                    .or_insert_with(|| symbol.to_string());
                existing
            }
            None => {
                let candidate = self.naming.generate(self.file, symbol);
                if !is_valid_identifier(&candidate) {
                    return Err(NamingError::InvalidIdentifier {
                        symbol: symbol.to_string(),
                        kind,
                        file: self.file.to_string(),
                        candidate,
                    });
                }
                if let Some(existing) = self.reversed.get(&candidate) {
                    if existing != symbol {
                        return Err(NamingError::Collision {
                            symbol: symbol.to_string(),
                            kind,
                            file: self.file.to_string(),
                            candidate,
                            existing: existing.clone(),
                        });
                    }
                }
                tracing::trace!(symbol, %kind, name = %candidate, "generated name");
                self.exports.record(symbol, &candidate, self.file);
                self.reversed.insert(candidate.clone(), symbol.to_string());
                candidate
            }
        };

        match kind {
            SymbolKind::Keyframe => {
                self.keyframes.insert(symbol.to_string(), name.clone());
            }
            SymbolKind::Class => {
                self.classes.insert(symbol.to_string());
            }
        }
        Ok(name)
    }

    pub fn keyframe(&self, name: &str) -> Option<&str> {
        self.keyframes.get(name).map(String::as_str)
    }

    /// Maps a generated name back to the symbol it was generated for.
    pub fn original(&self, generated: &str) -> Option<&str> {
        self.reversed.get(generated).map(String::as_str)
    }

    pub fn is_local_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn export(&self, name: &str) -> Option<&str> {
        self.exports.get(name)
    }

    pub fn append_composition(&mut self, class: &str, aliases: &str) {
        self.exports.append(class, aliases);
    }
}
