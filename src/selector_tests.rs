#[cfg(test)]
mod tests {
    use crate::selector::{strip_quotes, Pseudo, SelectorList, SelectorNode};

    fn parse(input: &str) -> SelectorList {
        SelectorList::parse(input).unwrap()
    }

    #[test]
    fn test_compound_and_combinators() {
        let list = parse(".a > .b.c  d");
        assert_eq!(list.selectors.len(), 1);
        assert_eq!(
            list.selectors[0].nodes,
            vec![
                SelectorNode::Class("a".to_string()),
                SelectorNode::Combinator(" > ".to_string()),
                SelectorNode::Class("b".to_string()),
                SelectorNode::Class("c".to_string()),
                SelectorNode::Combinator("  ".to_string()),
                SelectorNode::Tag("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_branch_whitespace_is_kept_on_edges() {
        let list = parse("html , .a");
        assert_eq!(list.selectors.len(), 2);
        assert_eq!(list.selectors[0].after, " ");
        assert_eq!(list.selectors[1].before, " ");
        assert_eq!(list.to_string(), "html , .a");
    }

    #[test]
    fn test_pseudo_arguments() {
        let list = parse(":global(.a, .b)::before");
        let nodes = &list.selectors[0].nodes;
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            SelectorNode::Pseudo(pseudo) => {
                assert!(pseudo.is_global());
                assert_eq!(pseudo.arguments.as_ref().unwrap().selectors.len(), 2);
            }
            other => panic!("expected pseudo, got {:?}", other),
        }
        assert_eq!(
            nodes[1],
            SelectorNode::Pseudo(Pseudo {
                value: "::before".to_string(),
                arguments: None,
            })
        );
    }

    #[test]
    fn test_global_prefix_is_not_global() {
        let list = parse(":global-1");
        match &list.selectors[0].nodes[0] {
            SelectorNode::Pseudo(pseudo) => assert!(!pseudo.is_global()),
            other => panic!("expected pseudo, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_with_bracket_in_string() {
        let list = parse(r#"a[href="x]"].b"#);
        assert_eq!(
            list.selectors[0].nodes[1],
            SelectorNode::Attribute(r#"href="x]""#.to_string())
        );
        assert_eq!(list.selectors[0].nodes[2], SelectorNode::Class("b".to_string()));
    }

    #[test]
    fn test_escaped_class_name() {
        let list = parse(r".sm\:flex");
        assert_eq!(
            list.selectors[0].nodes,
            vec![SelectorNode::Class(r"sm\:flex".to_string())]
        );
    }

    #[test]
    fn test_lenient_serialization() {
        for input in [
            "li:nth-child(2n+1)",
            "50%",
            "*|* + &.a ~ #id",
            r#"class1 class2 from "/css/the file.css""#,
            "a /* note */ b",
            ":is(.a, :global(.b)) > c",
        ] {
            assert_eq!(parse(input).to_string(), input);
        }
    }

    #[test]
    fn test_keyframe_steps_are_single_tags() {
        let list = parse("0%, 12.5%,to");
        let nodes: Vec<&SelectorNode> = list
            .selectors
            .iter()
            .flat_map(|selector| selector.nodes.iter())
            .collect();
        assert_eq!(
            nodes,
            vec![
                &SelectorNode::Tag("0%".to_string()),
                &SelectorNode::Tag("12.5%".to_string()),
                &SelectorNode::Tag("to".to_string()),
            ]
        );
        assert_eq!(list.selectors[1].before, " ");
        assert_eq!(list.to_string(), "0%, 12.5%,to");
    }

    #[test]
    fn test_strings_in_values() {
        let list = parse(r#"a from "./b.css""#);
        assert_eq!(
            list.selectors[0].nodes.last(),
            Some(&SelectorNode::Str(r#""./b.css""#.to_string()))
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(SelectorList::parse(".").is_err());
        assert!(SelectorList::parse(":global(.a").is_err());
        assert!(SelectorList::parse("a)").is_err());
        assert!(SelectorList::parse("[x").is_err());
        assert!(SelectorList::parse(r#""abc"#).is_err());
        assert!(SelectorList::parse("a /* open").is_err());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""a""#), "a");
        assert_eq!(strip_quotes("'a'"), "a");
        assert_eq!(strip_quotes(r#""a'"#), r#""a'"#);
        assert_eq!(strip_quotes("a"), "a");
        assert_eq!(strip_quotes(r#"""#), r#"""#);
    }
}
