//! Selector scoping.
//!
//! Class names are local unless some enclosing pseudo-class is `:global`.
//! Local classes are renamed through the [`SymbolTable`]; afterwards every
//! `:global` marker is erased and whatever it wrapped is spliced in its
//! place.

use crate::error::{LocalizeError, NamingError, SymbolKind};
use crate::selector::{Pseudo, Selector, SelectorList, SelectorNode};
use crate::symbols::SymbolTable;

/// Rewrites one rule selector.
pub fn localize_selector(selector: &str, symbols: &mut SymbolTable) -> Result<String, LocalizeError> {
    let mut list = SelectorList::parse(selector)?;
    localize_classes(&mut list, false, symbols)?;
    strip_global(&mut list);
    Ok(list.to_string())
}

fn localize_classes(
    list: &mut SelectorList,
    inside_global: bool,
    symbols: &mut SymbolTable,
) -> Result<(), NamingError> {
    for selector in &mut list.selectors {
        for node in &mut selector.nodes {
            match node {
                SelectorNode::Class(name) if !inside_global => {
                    *name = symbols.generate(name, SymbolKind::Class)?;
                }
                SelectorNode::Pseudo(pseudo) => {
                    let inside = inside_global || pseudo.is_global();
                    if let Some(arguments) = &mut pseudo.arguments {
                        localize_classes(arguments, inside, symbols)?;
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Removes every `:global` / `:global(...)` marker.
///
/// A marker with several arguments sits inside one branch, so that branch
/// is split into one branch per argument, each keeping the surrounding
/// compounds.
pub fn strip_global(list: &mut SelectorList) {
    let selectors = std::mem::take(&mut list.selectors);
    list.selectors = selectors.into_iter().flat_map(expand_branch).collect();
}

fn expand_branch(mut selector: Selector) -> Vec<Selector> {
    for node in &mut selector.nodes {
        if let SelectorNode::Pseudo(Pseudo {
            arguments: Some(arguments),
            ..
        }) = node
        {
            strip_global(arguments);
        }
    }

    let index = match selector
        .nodes
        .iter()
        .position(|node| matches!(node, SelectorNode::Pseudo(pseudo) if pseudo.is_global()))
    {
        Some(index) => index,
        None => return vec![selector],
    };

    let mut prefix = std::mem::take(&mut selector.nodes);
    let suffix = prefix.split_off(index + 1);
    let arguments = match prefix.pop() {
        Some(SelectorNode::Pseudo(pseudo)) => pseudo.arguments,
        _ => None,
    };

    let Some(arguments) = arguments else {
        prefix.extend(suffix);
        selector.nodes = prefix;
        return expand_branch(selector);
    };

    let count = arguments.selectors.len();
    let mut branches = Vec::with_capacity(count);
    for (i, argument) in arguments.selectors.into_iter().enumerate() {
        let mut nodes = prefix.clone();
        let before = if prefix.is_empty() {
            if i == 0 {
                format!("{}{}", selector.before, argument.before)
            } else {
                argument.before
            }
        } else {
            // Whitespace after a comma belongs to the list, not the branch.
            if i == 0 && !argument.before.is_empty() {
                nodes.push(SelectorNode::Combinator(argument.before));
            }
            selector.before.clone()
        };
        nodes.extend(argument.nodes);
        let mut after = String::new();
        if suffix.is_empty() {
            after.push_str(&argument.after);
        } else {
            if !argument.after.is_empty() {
                nodes.push(SelectorNode::Combinator(argument.after));
            }
            nodes.extend(suffix.iter().cloned());
        }
        if i + 1 == count {
            after.push_str(&selector.after);
        }
        branches.push(Selector { before, nodes, after });
    }

    branches.into_iter().flat_map(expand_branch).collect()
}
