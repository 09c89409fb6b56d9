use jsonc_edit::{
    parse, CstInputValue, CstNode, ParseOptions, StateError, TrailingCommaMode,
};
use serde_json::json;

#[test]
fn preserve_and_add() {
    // End-to-end scenario: replace a value, then append, keeping every
    // comment and the surrounding layout intact.
    let source = "{\n  // 1\n  \"data\" /* 2 */: 123 // 3\n} // 4";
    let root = parse(source).unwrap();
    let object = root.as_object_or_throw().unwrap();

    object
        .get_or_throw("data")
        .unwrap()
        .set_value(json!({ "nested": true }))
        .unwrap();
    object.append("new_key", json!([456, 789, false])).unwrap();

    assert_eq!(
        root.to_string(),
        "{\n  // 1\n  \"data\" /* 2 */: {\n    \"nested\": true\n  }, // 3\n  \"new_key\": [456, 789, false]\n} // 4"
    );
}

#[test]
fn force_type_on_root() {
    let root = parse("null").unwrap();
    root.as_object_or_force();
    assert_eq!(root.to_string(), "{}");

    let root = parse("null").unwrap();
    root.as_array_or_force();
    assert_eq!(root.to_string(), "[]");

    // Forcing an empty document creates the container too.
    let root = parse("").unwrap();
    root.as_object_or_force();
    assert_eq!(root.to_string(), "{}");
}

#[test]
fn force_detaches_the_replaced_handle() {
    let root = parse("[1, 2, 3]").unwrap();
    let array = root.as_array_or_throw().unwrap();
    let second = array.elements().into_iter().nth(1).unwrap();
    let second_index = second.child_index();

    let forced = second.as_object_or_force().unwrap();
    assert_eq!(root.to_string(), "[1, {}, 3]");
    assert_eq!(forced.child_index(), second_index);

    // The old handle is detached; further mutation fails.
    assert!(second.parent().is_none());
    assert_eq!(second.replace_with(1), Err(StateError::Detached));

    // Forcing a node that already has the kind returns it unchanged.
    let same = forced.syntax().as_object_or_force().unwrap();
    assert_eq!(same.syntax(), forced.syntax());
    assert_eq!(root.to_string(), "[1, {}, 3]");
}

#[test]
fn trailing_comma_toggle() {
    let source = "[\n  1,\n  2\n]";
    let root = parse(source).unwrap();
    let array = root.as_array_or_throw().unwrap();

    array.set_trailing_commas(TrailingCommaMode::IfMultiline).unwrap();
    assert_eq!(root.to_string(), "[\n  1,\n  2,\n]");

    array.set_trailing_commas(TrailingCommaMode::Never).unwrap();
    assert_eq!(root.to_string(), source);
}

#[test]
fn trailing_commas_never_touch_single_line_containers() {
    let root = parse("[1, 2]").unwrap();
    let array = root.as_array_or_throw().unwrap();
    array.set_trailing_commas(TrailingCommaMode::IfMultiline).unwrap();
    assert_eq!(root.to_string(), "[1, 2]");
    assert!(!array.uses_trailing_commas());
}

#[test]
fn root_trailing_commas_apply_recursively() {
    let source = "{\n  \"a\": [\n    1\n  ]\n}";
    let root = parse(source).unwrap();
    root.set_trailing_commas(TrailingCommaMode::IfMultiline);
    assert_eq!(root.to_string(), "{\n  \"a\": [\n    1,\n  ],\n}");
    root.set_trailing_commas(TrailingCommaMode::Never);
    assert_eq!(root.to_string(), source);
}

#[test]
fn appends_preserve_trailing_comma_style() {
    let root = parse("[\n  1,\n  2,\n]").unwrap();
    let array = root.as_array_or_throw().unwrap();
    array.append(3).unwrap();
    assert_eq!(root.to_string(), "[\n  1,\n  2,\n  3,\n]");
}

#[test]
fn indent_inference_from_siblings() {
    // Four-space indented sibling wins over the two-space default.
    let root = parse("{\n    \"a\": 1\n}").unwrap();
    let object = root.as_object_or_throw().unwrap();
    object.append("b", 2).unwrap();
    assert_eq!(root.to_string(), "{\n    \"a\": 1,\n    \"b\": 2\n}");
}

#[test]
fn indent_inference_with_tabs_and_crlf() {
    let root = parse("{\r\n\t\"a\": 1\r\n}").unwrap();
    let object = root.as_object_or_throw().unwrap();
    object.append("b", 2).unwrap();
    assert_eq!(root.to_string(), "{\r\n\t\"a\": 1,\r\n\t\"b\": 2\r\n}");
}

#[test]
fn append_to_single_line_containers() {
    let root = parse("[1, 2]").unwrap();
    root.as_array_or_throw().unwrap().append(3).unwrap();
    assert_eq!(root.to_string(), "[1, 2, 3]");

    let root = parse("[]").unwrap();
    root.as_array_or_throw().unwrap().append(1).unwrap();
    assert_eq!(root.to_string(), "[1]");

    let root = parse("{}").unwrap();
    root.as_object_or_throw().unwrap().append("a", 1).unwrap();
    assert_eq!(root.to_string(), "{ \"a\": 1 }");

    let root = parse("{ \"a\": 1 }").unwrap();
    root.as_object_or_throw().unwrap().append("b", 2).unwrap();
    assert_eq!(root.to_string(), "{ \"a\": 1, \"b\": 2 }");
}

#[test]
fn append_to_empty_multiline_containers() {
    let root = parse("{\n}").unwrap();
    root.as_object_or_throw().unwrap().append("a", 1).unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": 1\n}");

    let root = parse("{\n  // note\n}").unwrap();
    root.as_object_or_throw().unwrap().append("a", 1).unwrap();
    assert_eq!(root.to_string(), "{\n  // note\n  \"a\": 1\n}");
}

#[test]
fn insert_at_position() {
    let root = parse("[1, 2]").unwrap();
    root.as_array_or_throw().unwrap().insert(0, 0).unwrap();
    assert_eq!(root.to_string(), "[0, 1, 2]");

    let root = parse("{\n  \"a\": 1,\n  \"b\": 2\n}").unwrap();
    root.as_object_or_throw().unwrap().insert(1, "z", 9).unwrap();
    assert_eq!(
        root.to_string(),
        "{\n  \"a\": 1,\n  \"z\": 9,\n  \"b\": 2\n}"
    );
}

#[test]
fn remove_applies_comma_discipline() {
    // Middle element: the following comma and spacing go with it.
    let root = parse("[1, 2, 3]").unwrap();
    root.as_array_or_throw().unwrap().elements()[1].remove().unwrap();
    assert_eq!(root.to_string(), "[1, 3]");

    // Last element: the preceding comma goes instead.
    let root = parse("[1, 2, 3]").unwrap();
    root.as_array_or_throw().unwrap().elements()[2].remove().unwrap();
    assert_eq!(root.to_string(), "[1, 2]");

    // First element.
    let root = parse("[1, 2, 3]").unwrap();
    root.as_array_or_throw().unwrap().elements()[0].remove().unwrap();
    assert_eq!(root.to_string(), "[2, 3]");

    // Sole element.
    let root = parse("[1]").unwrap();
    root.as_array_or_throw().unwrap().elements()[0].remove().unwrap();
    assert_eq!(root.to_string(), "[]");
}

#[test]
fn remove_takes_the_whole_line_in_multiline_containers() {
    let root = parse("[\n  1,\n  2,\n  3\n]").unwrap();
    root.as_array_or_throw().unwrap().elements()[1].remove().unwrap();
    assert_eq!(root.to_string(), "[\n  1,\n  3\n]");

    let root = parse("[\n  1,\n  2\n]").unwrap();
    root.as_array_or_throw().unwrap().elements()[1].remove().unwrap();
    assert_eq!(root.to_string(), "[\n  1\n]");

    // A trailing-comma container keeps its style.
    let root = parse("[\n  1,\n  2,\n]").unwrap();
    root.as_array_or_throw().unwrap().elements()[1].remove().unwrap();
    assert_eq!(root.to_string(), "[\n  1,\n]");
}

#[test]
fn remove_keeps_comments_of_other_lines() {
    let source = "{\n  \"a\": 1, // gone\n  // stays\n  \"b\": 2\n}";
    let root = parse(source).unwrap();
    let object = root.as_object_or_throw().unwrap();
    object.get("a").unwrap().remove().unwrap();
    assert_eq!(root.to_string(), "{\n  // stays\n  \"b\": 2\n}");
}

#[test]
fn replace_keeps_surrounding_trivia() {
    let root = parse("[1, /* keep */ 2, 3]").unwrap();
    let second = root.as_array_or_throw().unwrap().elements()[1].clone();
    let second_index = second.child_index();
    let replacement = second.replace_with("two").unwrap();
    assert_eq!(root.to_string(), "[1, /* keep */ \"two\", 3]");
    assert_eq!(replacement.child_index(), second_index);
    assert!(second.parent().is_none());
}

#[test]
fn prop_replace_with_changes_name_and_value() {
    let root = parse("{\n  \"a\": 1\n}").unwrap();
    let prop = root.as_object_or_throw().unwrap().get("a").unwrap();
    prop.replace_with("b", json!([1])).unwrap();
    assert_eq!(root.to_string(), "{\n  \"b\": [1]\n}");
}

#[test]
fn set_value_on_root() {
    let root = parse("// header\n").unwrap();
    root.set_value(json!({"a": 1}));
    assert_eq!(root.to_string(), "// header\n{\n  \"a\": 1\n}");

    let root = parse("[1]").unwrap();
    root.set_value(42);
    assert_eq!(root.to_string(), "42");
}

#[test]
fn clear_children_empties_the_document() {
    let root = parse("// c\n{\"a\": 1}\n").unwrap();
    root.clear_children();
    assert_eq!(root.to_string(), "");
    assert!(root.value().is_none());
}

#[test]
fn ensure_multiline_conversion() {
    let root = parse("{ \"a\": 1, \"b\": 2 }").unwrap();
    let object = root.as_object_or_throw().unwrap();
    object.ensure_multiline().unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": 1,\n  \"b\": 2\n}");

    // Already-multiline containers are untouched.
    let before = root.to_string();
    object.ensure_multiline().unwrap();
    assert_eq!(root.to_string(), before);

    // Nested containers indent one level deeper than their line.
    let root = parse("{\n  \"a\": { \"x\": 1 }\n}").unwrap();
    let inner = root
        .as_object_or_throw()
        .unwrap()
        .get_if_object("a")
        .unwrap();
    inner.ensure_multiline().unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": {\n    \"x\": 1\n  }\n}");
}

#[test]
fn missing_comma_gaps_are_not_normalized() {
    // New siblings get commas; pre-existing gaps stay as authored.
    let root = parse("[1 2]").unwrap();
    root.as_array_or_throw().unwrap().append(3).unwrap();
    assert_eq!(root.to_string(), "[1 2, 3]");
}

#[test]
fn identity_is_stable_across_unrelated_mutations() {
    let root = parse("{\n  \"a\": [1],\n  \"b\": 2\n}").unwrap();
    let object = root.as_object_or_throw().unwrap();
    let b = object.get("b").unwrap();
    let b_index = b.child_index();

    // Mutate the unrelated "a" subtree.
    object.get_if_array("a").unwrap().append(2).unwrap();

    assert_eq!(b.child_index(), b_index);
    assert_eq!(object.get("b").unwrap().syntax(), b.syntax());
    assert_eq!(root.to_string(), "{\n  \"a\": [1, 2],\n  \"b\": 2\n}");
}

#[test]
fn operations_on_detached_nodes_fail() {
    let root = parse(r#"{"a": {"b": 1}, "c": 2}"#).unwrap();
    let object = root.as_object_or_throw().unwrap();
    let inner = object.get_if_object("a").unwrap();

    object.get("a").unwrap().remove().unwrap();
    assert_eq!(root.to_string(), r#"{"c": 2}"#);

    // The whole removed subtree is detached.
    assert_eq!(inner.append("x", 1).unwrap_err(), StateError::Detached);
    assert_eq!(
        inner.set_trailing_commas(TrailingCommaMode::Never).unwrap_err(),
        StateError::Detached
    );
    assert_eq!(
        inner.syntax().as_object_or_force().unwrap_err(),
        StateError::Detached
    );
    assert_eq!(inner.syntax().remove().unwrap_err(), StateError::Detached);
}

#[test]
fn or_create_variants_only_fill_gaps() {
    let root = parse(r#"{"a": 1}"#).unwrap();
    let object = root.as_object_or_throw().unwrap();

    // Existing wrong-kind value: no replacement.
    assert!(object.get_if_object_or_create("a").unwrap().is_none());
    assert_eq!(root.to_string(), r#"{"a": 1}"#);

    // Missing property: created empty.
    assert!(object.get_if_object_or_create("b").unwrap().is_some());
    assert_eq!(root.to_string(), r#"{"a": 1, "b": {}}"#);
}

#[test]
fn or_force_variants_replace_wrong_kinds() {
    let root = parse(r#"{"a": 1}"#).unwrap();
    let object = root.as_object_or_throw().unwrap();
    let forced = object.get_if_object_or_force("a").unwrap();
    assert_eq!(root.to_string(), r#"{"a": {}}"#);
    forced.append("x", true).unwrap();
    assert_eq!(root.to_string(), r#"{"a": { "x": true }}"#);
}

#[test]
fn raw_text_input_is_inserted_verbatim() {
    let raw = CstInputValue::raw("{ \"kept\": 1 /* comment */ }").unwrap();
    let root = parse("{\n  \"a\": 1\n}").unwrap();
    root.as_object_or_throw()
        .unwrap()
        .get_or_throw("a")
        .unwrap()
        .set_value(raw)
        .unwrap();
    assert_eq!(
        root.to_string(),
        "{\n  \"a\": { \"kept\": 1 /* comment */ }\n}"
    );

    assert!(CstInputValue::raw("{ not valid").is_err());
}

#[test]
fn number_and_string_literal_editing() {
    let root = parse(r#"{"n": 1.50, "s": "x"}"#).unwrap();
    let object = root.as_object_or_throw().unwrap();

    let n = object.get("n").unwrap().value().unwrap();
    let number = n.as_number_lit_or_throw().unwrap();
    assert_eq!(number.value(), "1.50");
    number.set_raw_value("2.25e1").unwrap();

    let s = object.get("s").unwrap().value().unwrap();
    let string = s.as_string_lit_or_throw().unwrap();
    string.set_raw_value("\"y\"").unwrap();

    assert_eq!(root.to_string(), r#"{"n": 2.25e1, "s": "y"}"#);
}

#[test]
fn boolean_set_value() {
    let root = parse("[true]").unwrap();
    let value = root.as_array_or_throw().unwrap().elements()[0].clone();
    let boolean = value.as_boolean_lit_or_throw().unwrap();
    assert!(boolean.value());
    boolean.set_value(false).unwrap();
    assert_eq!(root.to_string(), "[false]");
}

#[test]
fn set_value_accepts_host_shapes() {
    let root = parse("{\n  \"a\": 1\n}").unwrap();
    let object = root.as_object_or_throw().unwrap();
    let prop = object.get("a").unwrap();

    prop.set_value(CstInputValue::Null).unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": null\n}");

    prop.set_value("text").unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": \"text\"\n}");

    prop.set_value(2.5).unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": 2.5\n}");

    prop.set_value(vec![CstInputValue::from(1), CstInputValue::from(2)])
        .unwrap();
    assert_eq!(root.to_string(), "{\n  \"a\": [1, 2]\n}");
}

#[test]
fn parse_options_partial_merge_applies_to_editing_entry() {
    // A document parsed with missing commas allowed keeps its gaps but new
    // entries still get separators (see missing_comma_gaps test); a strict
    // reparse of the edited text fails only because of the original gap.
    let options = ParseOptions {
        allow_missing_commas: true,
        ..ParseOptions::strict()
    };
    let root = jsonc_edit::parse_with_options("[1 2]", &options).unwrap();
    root.as_array_or_throw().unwrap().append(3).unwrap();
    assert_eq!(root.to_string(), "[1 2, 3]");
}
