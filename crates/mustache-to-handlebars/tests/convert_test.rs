use mustache_to_handlebars::{ClassificationSets, WhitespacePolicy, convert};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const TEMPLATE: &[&str] = &[
    "{{#a}}{{#b}}",
    "{{#someList}}",
    "  {{#otherList}}",
    "{{#c}}{{#c}}{{/c}}{{/c}}",
    "{{#-first}}",
    "{{/-first}}",
    "{{#-last}}",
    "{{/-last}}",
    "{{^-first}}",
    "{{/-first}}",
    "{{^-last}}",
    "{{/-last}}",
    "  {{/otherList}}",
    "{{/someList}}",
    "{{/b}}{{/a}}",
];

fn trim_after() -> WhitespacePolicy {
    WhitespacePolicy {
        after_open: true,
        after_close: true,
        ..Default::default()
    }
}

fn full_sets() -> ClassificationSets {
    ClassificationSets::new(["a", "b"], ["someList", "otherList"], ["c"])
}

#[test]
fn test_convert_with_ambiguous_tags() {
    let result = convert(&TEMPLATE.join("\n"), &ClassificationSets::default(), trim_after()).unwrap();

    let expected = [
        "{{#ifOrEachOrWith a}}{{#ifOrEachOrWith b}}",
        "{{#ifOrEachOrWith someList~}}",
        "  {{#ifOrEachOrWith otherList~}}",
        "{{#ifOrEachOrWith c}}{{#ifOrEachOrWith c}}{{/ifOrEachOrWith}}{{/ifOrEachOrWith}}",
        "{{#if @first~}}",
        "{{/if~}}",
        "{{#if @last~}}",
        "{{/if~}}",
        "{{#unless @first~}}",
        "{{/unless~}}",
        "{{#unless @last~}}",
        "{{/unless~}}",
        "  {{/ifOrEachOrWith~}}",
        "{{/ifOrEachOrWith~}}",
        "{{/ifOrEachOrWith}}{{/ifOrEachOrWith}}",
    ];
    assert_eq!(result.text, expected.join("\n"));

    let expected_ambiguous: BTreeSet<String> = ["a", "b", "c", "otherList", "someList"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(result.ambiguous, expected_ambiguous);
}

#[test]
fn test_convert_without_ambiguous_tags() {
    let result = convert(&TEMPLATE.join("\n"), &full_sets(), trim_after()).unwrap();

    let expected = [
        "{{#if a}}{{#if b}}",
        "{{#each someList~}}",
        "  {{#each otherList~}}",
        "{{#with c}}{{#with c}}{{/with}}{{/with}}",
        "{{#if @first~}}",
        "{{/if~}}",
        "{{#if @last~}}",
        "{{/if~}}",
        "{{#unless @first~}}",
        "{{/unless~}}",
        "{{#unless @last~}}",
        "{{/unless~}}",
        "  {{/each~}}",
        "{{/each~}}",
        "{{/if}}{{/if}}",
    ];
    assert_eq!(result.text, expected.join("\n"));
    assert!(result.ambiguous.is_empty());
}

#[test]
fn test_second_conversion_is_a_no_op() {
    let policy = WhitespacePolicy {
        before_open: true,
        after_open: true,
        before_close: true,
        after_close: true,
    };
    let first = convert(&TEMPLATE.join("\n"), &full_sets(), policy).unwrap();
    let second = convert(&first.text, &full_sets(), policy).unwrap();

    assert_eq!(second.text, first.text);
    assert!(second.ambiguous.is_empty());
}

#[test]
fn test_markers_never_land_on_mixed_lines() {
    let policy = WhitespacePolicy {
        before_open: true,
        after_open: true,
        before_close: true,
        after_close: true,
    };
    let template = [
        "<ul>{{#items}}",
        "  <li>{{name}}</li>",
        "  {{#isLast}}{{/isLast}}",
        "{{/items}} </ul>",
        "{{#isLast}} {{title}}",
        "{{/isLast}}",
    ]
    .join("\n");
    let sets = ClassificationSets::new(["isLast"], ["items"], Vec::<String>::new());
    let result = convert(&template, &sets, policy).unwrap();

    let expected = [
        "<ul>{{#each items}}",
        "  <li>{{name}}</li>",
        "  {{#if isLast}}{{/if}}",
        "{{/each}} </ul>",
        "{{#if isLast}} {{title}}",
        "{{~/if~}}",
    ];
    assert_eq!(result.text, expected.join("\n"));
}

#[test]
fn test_variables_and_blocks_together() {
    let template = "{{#rows}}{{cells.0}} {{{cells.1.html}}}{{#-last}}.{{/-last}}{{/rows}}";
    let sets = ClassificationSets::new(Vec::<String>::new(), ["rows"], Vec::<String>::new());
    let result = convert(template, &sets, WhitespacePolicy::default()).unwrap();
    assert_eq!(
        result.text,
        "{{#each rows}}{{cells.[0]}} {{{cells.[1].html}}}{{#if @last}}.{{/if}}{{/each}}"
    );
}

#[test]
fn test_unbalanced_closer_reports_position() {
    let err = convert("{{#a}}\n{{/a}}\n{{/a}}", &full_sets(), WhitespacePolicy::default())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unbalanced closing tag {{/a}} at line 3, column 1: no open block to close"
    );
}
