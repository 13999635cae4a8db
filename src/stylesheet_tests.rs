#[cfg(test)]
mod tests {
    use crate::stylesheet::{Node, Parent, Stylesheet};

    fn parse(source: &str) -> Stylesheet {
        Stylesheet::parse(source, Some("/style.css")).unwrap()
    }

    #[test]
    fn test_untouched_tree_is_lossless() {
        let source = r#"@charset "utf-8";
/* header */
.a , .b{ color : red ;background:url("x;y.png") }

@media (max-width: 10px) {
  .c { margin: 0 !important; }
}
@import url(a.css)
"#;
        assert_eq!(parse(source).to_css(), source);
    }

    #[test]
    fn test_node_structure() {
        let sheet = parse("@keyframes a { } .b { color: red; top: 0 }");
        assert_eq!(sheet.nodes.len(), 2);

        match &sheet.nodes[0] {
            Node::AtRule(at) => {
                assert_eq!(at.name, "keyframes");
                assert_eq!(at.params, "a");
                assert_eq!(at.nodes.as_ref().map(Vec::len), Some(0));
            }
            other => panic!("expected at-rule, got {:?}", other),
        }
        match &sheet.nodes[1] {
            Node::Rule(rule) => {
                assert_eq!(rule.selector, ".b");
                assert_eq!(rule.before, " ");
                assert_eq!(rule.nodes.len(), 2);
                match &rule.nodes[1] {
                    Node::Declaration(decl) => {
                        assert_eq!(decl.prop, "top");
                        assert_eq!(decl.value, "0");
                        assert!(!decl.semicolon);
                    }
                    other => panic!("expected declaration, got {:?}", other),
                }
            }
            other => panic!("expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_at_rule() {
        let sheet = parse("@import \"a.css\";");
        match &sheet.nodes[0] {
            Node::AtRule(at) => {
                assert_eq!(at.params, "\"a.css\"");
                assert!(at.nodes.is_none());
                assert!(at.semicolon);
            }
            other => panic!("expected at-rule, got {:?}", other),
        }
    }

    #[test]
    fn test_retain_declarations_sees_parents() {
        let mut sheet = parse(".a { x: 1; y: 2 } @font-face { z: 3 }");
        let mut seen = Vec::new();
        sheet
            .retain_declarations(&mut |parent, decl| -> Result<bool, ()> {
                let owner = match parent {
                    Parent::Rule { selector } => selector.to_string(),
                    Parent::AtRule { name } => format!("@{}", name),
                    Parent::Root => "root".to_string(),
                };
                seen.push(format!("{}:{}", owner, decl.prop));
                Ok(decl.prop != "x")
            })
            .unwrap();

        assert_eq!(seen, vec![".a:x", ".a:y", "@font-face:z"]);
        assert_eq!(sheet.to_css(), ".a { y: 2 } @font-face { z: 3 }");
    }

    #[test]
    fn test_walk_visits_nested_nodes_in_order() {
        let mut sheet = parse("@media print { .a { } } .b { }");
        let mut seen = Vec::new();
        sheet
            .walk_mut(&mut |node| -> Result<(), ()> {
                match node {
                    Node::Rule(rule) => seen.push(rule.selector.clone()),
                    Node::AtRule(at) => seen.push(format!("@{}", at.name)),
                    _ => {}
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec!["@media", ".a", ".b"]);
    }

    #[test]
    fn test_declarations_lists_all() {
        let sheet = parse(".a { x: 1 } @media print { .b { y: 2 } }");
        let props: Vec<&str> = sheet.declarations().into_iter().map(|d| d.prop.as_str()).collect();
        assert_eq!(props, vec!["x", "y"]);
    }

    #[test]
    fn test_syntax_error_positions() {
        let err = Stylesheet::parse("a { color: red", None).unwrap_err();
        assert_eq!((err.message.as_str(), err.line, err.column), ("Unclosed block", 1, 3));

        let err = Stylesheet::parse("}", None).unwrap_err();
        assert_eq!((err.message.as_str(), err.line, err.column), ("Unexpected }", 1, 1));

        let err = Stylesheet::parse("a { color }", None).unwrap_err();
        assert_eq!((err.message.as_str(), err.line, err.column), ("Unknown word", 1, 5));

        let err = Stylesheet::parse("a {}\n\nb { c: \"x }", None).unwrap_err();
        assert_eq!((err.message.as_str(), err.line, err.column), ("Unclosed string", 3, 8));

        let err = Stylesheet::parse("/* never closed", None).unwrap_err();
        assert_eq!(err.message, "Unclosed comment");
    }
}
