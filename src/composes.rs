//! `composes` resolution.
//!
//! ```css
//! .button { composes: base rounded; }
//! .button { composes: reset from global; }
//! .button { composes: primary from "./theme.css"; }
//! ```
//!
//! Each resolved name is appended to the owning class's export entry and
//! the declaration itself is dropped from the output.

use std::path::{Component, Path, PathBuf};

use crate::error::{ComposesError, LocalizeError, NamingError, SymbolKind};
use crate::naming::is_valid_identifier;
use crate::selector::{strip_quotes, SelectorList, SelectorNode};
use crate::stylesheet::Parent;
use crate::symbols::SymbolTable;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Local,
    Global,
    File(String),
}

/// Resolves one `composes` declaration found under `parent`.
pub fn resolve_composes(
    parent: Parent<'_>,
    value: &str,
    symbols: &mut SymbolTable,
) -> Result<(), LocalizeError> {
    let selector = match parent {
        Parent::Rule { selector } => selector,
        Parent::Root | Parent::AtRule { .. } => return Err(ComposesError::NoParentRule.into()),
    };
    let owner = owner_class(selector, symbols)?;
    let (names, source) = parse_value(value)?;

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let alias = match &source {
            Source::Global => name,
            Source::File(path) => {
                let file = resolve_path(symbols.file(), path);
                let candidate = symbols.naming().generate(&file, &name);
                if !is_valid_identifier(&candidate) {
                    return Err(NamingError::InvalidIdentifier {
                        symbol: name,
                        kind: SymbolKind::Class,
                        file,
                        candidate,
                    }
                    .into());
                }
                candidate
            }
            Source::Local => {
                if name == owner {
                    return Err(ComposesError::SelfComposition { class: name }.into());
                }
                match symbols.export(&name) {
                    Some(generated) if symbols.is_local_class(&name) => generated.to_string(),
                    _ => return Err(ComposesError::UnknownLocalClass { class: name }.into()),
                }
            }
        };
        resolved.push(alias);
    }

    tracing::trace!(class = %owner, composes = ?resolved, "resolved composes");
    symbols.append_composition(&owner, &resolved.join(" "));
    Ok(())
}

/// The original name of the single local class a rule selector targets.
fn owner_class(selector: &str, symbols: &SymbolTable) -> Result<String, LocalizeError> {
    let invalid = || ComposesError::InvalidTarget {
        selector: selector.to_string(),
    };

    let list = SelectorList::parse(selector)?;
    let [branch] = list.selectors.as_slice() else {
        return Err(invalid().into());
    };
    let mut nodes = branch.significant_nodes();
    let generated = match (nodes.next(), nodes.next()) {
        (Some(SelectorNode::Class(generated)), None) => generated,
        _ => return Err(invalid().into()),
    };

    symbols
        .original(generated)
        .filter(|original| symbols.is_local_class(original))
        .map(str::to_string)
        .ok_or_else(|| {
            ComposesError::UnknownTarget {
                selector: selector.to_string(),
            }
            .into()
        })
}

/// `ident+ [from global | from "<path>"]`
fn parse_value(value: &str) -> Result<(Vec<String>, Source), LocalizeError> {
    let list = SelectorList::parse(value)?;
    if list.selectors.len() > 1 {
        return Err(ComposesError::ContainsCommas {
            value: value.to_string(),
        }
        .into());
    }

    let tokens: Vec<&SelectorNode> = list
        .selectors
        .iter()
        .flat_map(|selector| selector.significant_nodes())
        .collect();

    let unexpected = |token: &SelectorNode| ComposesError::UnexpectedToken {
        token: token.to_string(),
        value: value.to_string(),
    };
    let invalid_from = || ComposesError::InvalidFrom {
        value: value.to_string(),
    };

    let (names, source) = match tokens.as_slice() {
        [names @ .., SelectorNode::Tag(from), last] if from == "from" => {
            let source = match last {
                SelectorNode::Tag(global) if global == "global" => Source::Global,
                SelectorNode::Str(path) => Source::File(strip_quotes(path).to_string()),
                _ => return Err(invalid_from().into()),
            };
            (names, source)
        }
        names => (names, Source::Local),
    };

    if names.is_empty() {
        return Err(ComposesError::Empty {
            value: value.to_string(),
        }
        .into());
    }

    let mut idents = Vec::with_capacity(names.len());
    for token in names {
        match token {
            SelectorNode::Tag(name) if name == "from" => return Err(invalid_from().into()),
            SelectorNode::Tag(name) => idents.push(name.clone()),
            other => return Err(unexpected(*other).into()),
        }
    }
    Ok((idents, source))
}

/// Resolves `target` against the directory of `file`, lexically.
pub fn resolve_path(file: &str, target: &str) -> String {
    let base = Path::new(file).parent().unwrap_or_else(|| Path::new("/"));
    let mut resolved = PathBuf::new();
    for component in base.join(target).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("/css/style.css", "the file.css"), "/css/the file.css");
        assert_eq!(resolve_path("/css/style.css", "./a.css"), "/css/a.css");
        assert_eq!(resolve_path("/css/deep/style.css", "../a.css"), "/css/a.css");
        assert_eq!(resolve_path("/style.css", "/other.css"), "/other.css");
        assert_eq!(resolve_path("/style.css", "../../a.css"), "/a.css");
    }

    #[test]
    fn test_parse_value_sources() {
        let (names, source) = parse_value("a b").unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(source, Source::Local);

        let (names, source) = parse_value("a from global").unwrap();
        assert_eq!(names, vec!["a"]);
        assert_eq!(source, Source::Global);

        let (names, source) = parse_value(r#"a b from "./x.css""#).unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(source, Source::File("./x.css".to_string()));
    }

    #[test]
    fn test_parse_value_errors() {
        assert!(matches!(
            parse_value("a, b"),
            Err(LocalizeError::MalformedComposes(ComposesError::ContainsCommas { .. }))
        ));
        assert!(matches!(
            parse_value("a from elsewhere"),
            Err(LocalizeError::MalformedComposes(ComposesError::InvalidFrom { .. }))
        ));
        assert!(matches!(
            parse_value("from global"),
            Err(LocalizeError::MalformedComposes(ComposesError::Empty { .. }))
        ));
        assert!(matches!(
            parse_value("a from"),
            Err(LocalizeError::MalformedComposes(ComposesError::InvalidFrom { .. }))
        ));
        assert!(matches!(
            parse_value(".a"),
            Err(LocalizeError::MalformedComposes(ComposesError::UnexpectedToken { .. }))
        ));
        assert!(matches!(
            parse_value(r#""a.css" from global"#),
            Err(LocalizeError::MalformedComposes(ComposesError::UnexpectedToken { .. }))
        ));
    }
}
