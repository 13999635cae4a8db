//! Keyframe names and the animation properties that reference them.

use crate::error::{LocalizeError, SymbolKind};
use crate::scope::strip_global;
use crate::selector::{strip_quotes, SelectorList};
use crate::stylesheet::AtRule;
use crate::symbols::SymbolTable;

const VENDOR_PREFIXES: [&str; 4] = ["-webkit-", "-moz-", "-ms-", "-o-"];

fn unprefixed(name: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// `keyframes`, including vendor-prefixed forms.
pub fn is_keyframes_rule(name: &str) -> bool {
    unprefixed(name).eq_ignore_ascii_case("keyframes")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationProperty {
    Animation,
    AnimationName,
}

impl AnimationProperty {
    pub fn from_prop(prop: &str) -> Option<AnimationProperty> {
        let prop = unprefixed(prop);
        if prop.eq_ignore_ascii_case("animation") {
            Some(AnimationProperty::Animation)
        } else if prop.eq_ignore_ascii_case("animation-name") {
            Some(AnimationProperty::AnimationName)
        } else {
            None
        }
    }
}

/// Renames a local `@keyframes` block, or unwraps a `:global` one.
pub fn localize_keyframes(at_rule: &mut AtRule, symbols: &mut SymbolTable) -> Result<(), LocalizeError> {
    if at_rule.params.starts_with(":global") {
        let mut list = SelectorList::parse(&at_rule.params)?;
        strip_global(&mut list);
        at_rule.params = list.to_string();
    } else if !at_rule.params.is_empty() {
        at_rule.params = symbols.generate(&at_rule.params, SymbolKind::Keyframe)?;
    }
    Ok(())
}

/// Returns the rewritten value, or `None` when nothing references a
/// local keyframe.
pub fn rewrite_animation(
    property: AnimationProperty,
    value: &str,
    symbols: &SymbolTable,
) -> Option<String> {
    match property {
        AnimationProperty::AnimationName => symbols
            .keyframe(strip_quotes(value))
            .map(str::to_string),
        AnimationProperty::Animation => {
            let mut changed = false;
            let parts: Vec<String> = value
                .split_whitespace()
                .map(|part| {
                    // `a 1s, b 2s` leaves the comma attached to the last token of a layer.
                    let name = part.trim_end_matches(',');
                    match symbols.keyframe(strip_quotes(name)) {
                        Some(generated) => {
                            changed = true;
                            format!("{}{}", generated, &part[name.len()..])
                        }
                        None => part.to_string(),
                    }
                })
                .collect();
            changed.then(|| parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exports::ExportTable;
    use crate::naming::DefaultNaming;

    #[test]
    fn test_keyframes_rule_names() {
        assert!(is_keyframes_rule("keyframes"));
        assert!(is_keyframes_rule("-webkit-keyframes"));
        assert!(is_keyframes_rule("KEYFRAMES"));
        assert!(!is_keyframes_rule("media"));
        assert!(!is_keyframes_rule("-x-keyframes"));
    }

    #[test]
    fn test_animation_properties() {
        assert_eq!(AnimationProperty::from_prop("animation"), Some(AnimationProperty::Animation));
        assert_eq!(
            AnimationProperty::from_prop("-moz-animation-name"),
            Some(AnimationProperty::AnimationName)
        );
        assert_eq!(AnimationProperty::from_prop("animation-duration"), None);
    }

    #[test]
    fn test_rewrite_only_registered_keyframes() {
        let mut exports = ExportTable::new();
        let mut symbols = SymbolTable::new("/s.css", &DefaultNaming, &mut exports);
        symbols.generate("spin", SymbolKind::Keyframe).unwrap();
        symbols.generate("fade", SymbolKind::Class).unwrap();

        assert_eq!(
            rewrite_animation(AnimationProperty::Animation, "1s  spin\tinfinite", &symbols),
            Some("1s _s_css-spin infinite".to_string())
        );
        assert_eq!(
            rewrite_animation(AnimationProperty::Animation, "fade 1s", &symbols),
            None
        );
        assert_eq!(
            rewrite_animation(AnimationProperty::AnimationName, "'spin'", &symbols),
            Some("_s_css-spin".to_string())
        );
    }

    #[test]
    fn test_global_keyframes_are_not_registered() {
        let mut exports = ExportTable::new();
        {
            let mut symbols = SymbolTable::new("/s.css", &DefaultNaming, &mut exports);
            let mut at_rule = AtRule {
                name: "keyframes".to_string(),
                params: ":global(spin)".to_string(),
                ..AtRule::default()
            };
            localize_keyframes(&mut at_rule, &mut symbols).unwrap();
            assert_eq!(at_rule.params, "spin");
            assert_eq!(symbols.keyframe("spin"), None);
        }
        assert!(exports.is_empty());
    }
}
