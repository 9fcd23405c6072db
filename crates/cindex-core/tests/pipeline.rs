// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests driving the whole pipeline: file buffer, tokenizer,
//! name tables, parser, hold, and finder together.

use std::io::Cursor;

use cindex_core::{DiagnosticSink, FunctionFinder, FunctionRecord};

fn index_named(file_name: &str, source: &str) -> (Vec<FunctionRecord>, Vec<String>) {
    let sink = DiagnosticSink::new();
    let mut finder =
        FunctionFinder::from_reader(file_name, Cursor::new(source.to_string()), sink.clone());
    let mut records = Vec::new();
    while let Some(record) = finder.next_function().expect("no fatal error expected") {
        records.push(record);
    }
    assert!(finder.eof());
    let warnings = sink.drain().iter().map(ToString::to_string).collect();
    (records, warnings)
}

fn index(source: &str) -> (Vec<FunctionRecord>, Vec<String>) {
    index_named("test.c", source)
}

#[test]
fn prototype_definition_and_call() {
    let source = "\
int f(void);
int f(void) { return 0; }
int g(void) { return f(); }
";
    let (mut records, warnings) = index(source);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(records.len(), 3);

    records.sort();
    // f's declaration, then the call to f from g, then g's declaration.
    assert_eq!(records[0].name(), "f");
    assert!(records[0].is_declaration());
    assert!(!records[0].is_file_scope());
    assert_eq!(records[0].location().line(), 2);

    assert_eq!(records[1].name(), "f");
    assert!(!records[1].is_declaration());
    assert_eq!(records[1].caller(), "g");
    assert!(!records[1].is_file_scope());

    assert_eq!(records[2].name(), "g");
    assert!(records[2].is_declaration());
}

#[test]
fn static_prototype_without_definition() {
    let source = "\
static int h(void);
int main(void) { return h(); }
";
    let (records, warnings) = index(source);

    // The call cannot resolve against the static prototype; it flushes
    // at end of file with global scope.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name(), "main");
    assert!(records[0].is_declaration());
    assert_eq!(records[1].name(), "h");
    assert!(!records[1].is_declaration());
    assert_eq!(records[1].caller(), "main");
    assert!(!records[1].is_file_scope());

    let static_warnings: Vec<_> = warnings
        .iter()
        .filter(|message| message.contains("Static prototype of h"))
        .collect();
    assert_eq!(static_warnings.len(), 1);
    assert!(static_warnings[0].contains("has no matching declaration"));
}

#[test]
fn static_definition_releases_call_with_file_scope() {
    let source = "\
void f(void) { helper(); }
static void helper(void) { }
";
    let (records, warnings) = index(source);
    // At the point of the call no prototype was in sight yet.
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Function call helper"));
    assert!(warnings[0].contains("has no prototype"));

    let call = records
        .iter()
        .find(|record| record.name() == "helper" && !record.is_declaration())
        .expect("released call");
    assert!(call.is_file_scope());
    assert_eq!(call.caller(), "f");
}

#[test]
fn variable_reusing_function_name() {
    let (records, warnings) = index("int x;\nint x(void);\n");
    assert!(records.is_empty());
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Variable x"));
    assert!(warnings[0].contains("uses name previously used as a function"));
}

#[test]
fn call_of_local_variable_is_still_reported_as_call() {
    let (records, warnings) = index("void f(void) { int g; g(); }\n");

    let call = records
        .iter()
        .find(|record| record.name() == "g" && !record.is_declaration())
        .expect("the call is reported despite the local variable");
    assert_eq!(call.caller(), "f");
    assert!(!call.is_file_scope());

    assert!(warnings
        .iter()
        .any(|message| message.contains("Function g")
            && message.contains("uses name previously used as a local variable")));
    assert!(warnings
        .iter()
        .any(|message| message.contains("Function call g") && message.contains("has no prototype")));
}

#[test]
fn function_declared_over_compound_tag() {
    let source = "\
struct s { int a; };
int s(void) { return 0; }
";
    let (records, warnings) = index(source);
    assert!(warnings
        .iter()
        .any(|message| message.contains("Type declaration s")
            && message.contains("uses name previously used as a function")));
    // The rejected declaration produces no record.
    assert!(records.is_empty());
}

#[test]
fn call_through_function_typedef_variable() {
    let source = "\
typedef int (*fp)(void);
fp q;
void f(void) { q(); }
";
    let (records, warnings) = index(source);

    let call = records
        .iter()
        .find(|record| record.name() == "q" && !record.is_declaration())
        .expect("call through the typedef variable");
    assert_eq!(call.caller(), "f");
    assert!(!call.is_file_scope());

    assert!(warnings
        .iter()
        .any(|message| message.contains("Function call q") && message.contains("has no prototype")));
}

#[test]
fn unterminated_comment_to_eof_is_harmless() {
    let source = "int f(void) { return 0; }\n/* runs to the end\nnever closed\n";
    let (records, warnings) = index(source);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "f");
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn escaped_newline_inside_declaration() {
    let source = "int fo\\\no(void) { return 0; }\n";
    let (records, warnings) = index(source);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "foo");
    assert!(records[0].is_declaration());
}

#[test]
fn line_directives_pin_source_coordinates() {
    let source = "\
# 1 \"original.c\"
int f(void) { return 0; }
# 40 \"header.h\"
int g(void) { return f(); }
";
    let (records, warnings) = index_named("preprocessed.i", source);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let f = records
        .iter()
        .find(|record| record.name() == "f" && record.is_declaration())
        .expect("f declared");
    assert_eq!(f.location().file(), "original.c");
    assert_eq!(f.location().line(), 1);

    let g = records
        .iter()
        .find(|record| record.name() == "g" && record.is_declaration())
        .expect("g declared");
    assert_eq!(g.location().file(), "header.h");
    assert_eq!(g.location().line(), 40);
}

#[test]
fn reference_taking_is_recorded() {
    let source = "\
int cb(void) { return 0; }
void wire(void) { attach(&cb()); }
";
    let (records, _warnings) = index(source);
    let reference = records
        .iter()
        .find(|record| record.name() == "cb" && !record.is_declaration())
        .expect("reference record");
    assert!(reference.is_reference());
    assert_eq!(reference.caller(), "wire");
}

#[test]
fn string_and_char_literals_hide_code_shapes() {
    // Nothing inside the literals may be taken for calls or braces.
    let source = "\
void log_it(void) { emit(\"f(); { } /* not code */\"); }
void tick(void) { push(';'); }
";
    let (records, warnings) = index(source);
    let mut call_names: Vec<_> = records
        .iter()
        .filter(|record| !record.is_declaration())
        .map(FunctionRecord::name)
        .collect();
    call_names.sort_unstable();
    assert_eq!(call_names, ["emit", "push"]);
    // Only the two missing-prototype warnings, nothing about braces.
    assert_eq!(warnings.len(), 2);
}

#[test]
fn duplicate_declaration_keeps_both_records() {
    let source = "\
int f(void) { return 0; }
int f(void) { return 1; }
";
    let (records, warnings) = index(source);
    assert_eq!(records.len(), 2);
    assert!(warnings
        .iter()
        .any(|message| message.contains("Duplicate declaration of f")));
}

#[test]
fn record_ordering_for_the_report() {
    let source = "\
static int local_helper(void) { return 0; }
int shared(void) { return local_helper(); }
int also(void) { return shared(); }
";
    let (mut records, _warnings) = index(source);
    records.sort();

    let summary: Vec<_> = records
        .iter()
        .map(|record| {
            (
                record.name().to_string(),
                record.is_file_scope(),
                record.is_declaration(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            ("also".to_string(), false, true),
            ("local_helper".to_string(), true, true),
            ("local_helper".to_string(), true, false),
            ("shared".to_string(), false, true),
            ("shared".to_string(), false, false),
        ]
    );
}

#[test]
fn reprocessing_is_stable() {
    let source = "\
int f(void);
int f(void) { return 0; }
int g(void) { return f(); }
static int h(void) { return g(); }
";
    let (mut first, first_warnings) = index(source);
    let (mut second, second_warnings) = index(source);
    first.sort();
    second.sort();
    assert_eq!(first, second);
    assert_eq!(first_warnings, second_warnings);
}
