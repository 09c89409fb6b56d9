use indoc::indoc;
use jsonc_edit::{
    parse, parse_strict, parse_with_options, CstNode, NewlineKind, ParseOptions, SyntaxNode,
};

const FIXTURES: &[&str] = &[
    "",
    "null",
    "  true  ",
    "-12.5e3",
    "+42",
    "0x1F",
    "'single'",
    r#""with \"escapes\" and é""#,
    "[]",
    "[1,2,3]",
    "[ 1 , 2 , 3 ]",
    "[1, 2,]",
    "[1 2]",
    "{}",
    r#"{"a":1}"#,
    "{a: 1, $b_2: true}",
    "{\"a\": 1,\n \"b\": [null, false], // tail\n}",
    "// leading\n{\n\t\"tab\": 1\n}\n/* trailing */\n",
    "{\r\n  \"crlf\": 1\r\n}",
    "{\"emoji\":\"👍\"}",
];

/// Walk the whole tree checking `n.parent().children[n.child_index()] == n`.
fn assert_parent_coherence(node: &SyntaxNode) {
    for child in node.children() {
        assert_eq!(child.parent().as_ref(), Some(node));
        assert_eq!(node.child_at_index(child.child_index()).as_ref(), Some(&child));
        assert_parent_coherence(&child);
    }
}

#[test]
fn serializes_back_to_input() {
    for fixture in FIXTURES {
        let root = parse(fixture).unwrap_or_else(|err| panic!("{fixture:?}: {err}"));
        assert_eq!(root.to_string(), *fixture, "round trip of {fixture:?}");
        assert_parent_coherence(root.syntax());
    }
}

#[test]
fn strict_mode_rejects_extensions() {
    // A comment is rejected under strict defaults and accepted once the
    // single flag is merged back in.
    let source = "{ // c\n}";
    assert!(parse_strict(source).is_err());
    let options = ParseOptions {
        allow_comments: true,
        ..ParseOptions::strict()
    };
    assert!(parse_with_options(source, &options).is_ok());

    for rejected in ["[1,]", "[1 2]", "'s'", "0xFF", "+1", "{a: 1}"] {
        assert!(
            parse_strict(rejected).is_err(),
            "strict mode must reject {rejected:?}"
        );
    }
    assert!(parse_strict(r#"{"a": [1, 2], "b": null}"#).is_ok());
}

#[test]
fn option_monotonicity() {
    // Anything that parses under strict options parses under permissive
    // options into an equivalent document.
    let sources = ["{}", r#"{"a": [1, 2.5, true], "b": {"c": null}}"#, "[\n  1,\n  2\n]"];
    for source in sources {
        let strict = parse_strict(source).expect("strict parse");
        let permissive = parse(source).expect("permissive parse");
        assert_eq!(strict.to_string(), permissive.to_string());
    }
}

#[test]
fn unicode_fidelity() {
    let source = r#"{"emoji":"👍"}"#;
    let root = parse(source).unwrap();
    let object = root.as_object_or_throw().unwrap();
    let value = object.get("emoji").unwrap().value().unwrap();
    assert_eq!(value.as_string().as_deref(), Some("👍"));
    assert_eq!(root.to_string(), source);
}

#[test]
fn newline_kind_detection() {
    assert_eq!(parse("{\n}").unwrap().newline_kind(), NewlineKind::LineFeed);
    assert_eq!(parse("{\n}").unwrap().newline_kind().as_str(), "\n");
    assert_eq!(
        parse("{\r\n}").unwrap().newline_kind(),
        NewlineKind::CarriageReturnLineFeed
    );
    assert_eq!(parse("{\r\n}").unwrap().newline_kind().as_str(), "\r\n");
    // Any CRLF in the document wins.
    assert_eq!(
        parse("{\n  \"a\": 1\r\n}").unwrap().newline_kind().as_str(),
        "\r\n"
    );
}

#[test]
fn single_indent_detection() {
    let two = parse("{\n  \"a\": 1\n}").unwrap();
    assert_eq!(two.single_indent_text().as_deref(), Some("  "));

    let four = parse("{\n    \"a\": 1\n}").unwrap();
    assert_eq!(four.single_indent_text().as_deref(), Some("    "));

    let tab = parse("{\n\t\"a\": 1\n}").unwrap();
    assert_eq!(tab.single_indent_text().as_deref(), Some("\t"));

    let flat = parse("{\"a\": 1}").unwrap();
    assert_eq!(flat.single_indent_text(), None);
}

#[test]
fn trivia_stays_with_its_container() {
    let source = indoc! {r#"
        {
          // leading comment
          "a": 1 // trailing comment
        }
    "#};
    let root = parse(source).unwrap();
    let object = root.as_object_or_throw().unwrap();
    let prop = object.get("a").unwrap();

    // Comments around the property belong to the object, not the property.
    assert_eq!(prop.to_string(), "\"a\": 1");
    let object_comments: Vec<_> = object
        .children()
        .into_iter()
        .filter(|child| child.is_comment())
        .collect();
    assert_eq!(object_comments.len(), 2);
    assert_eq!(root.to_string(), source);
}

#[test]
fn sibling_navigation_skips_nothing() {
    let root = parse("[1, 2, 3]").unwrap();
    let array = root.as_array_or_throw().unwrap();
    let elements = array.elements();
    assert_eq!(elements.len(), 3);

    // Raw sibling navigation sees commas and whitespace.
    let first = &elements[0];
    let next = first.next_sibling().unwrap();
    assert!(next.is_comma());
    assert_eq!(first.next_siblings().len(), 7);
    assert_eq!(elements[2].previous_siblings().len(), 7);

    let root_again = elements[1].root_node().unwrap();
    assert_eq!(root_again.syntax(), root.syntax());
}
