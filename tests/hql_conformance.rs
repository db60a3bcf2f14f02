//! Grammar and evaluation conformance of the Histogram Query Language.
//!
//! The expression corpus exercises every production of the grammar; the two
//! histograms satisfy and falsify every valid expression respectively.

use hiscore::histogram::{FrequencyModels, Histogram};
use hiscore::query::{ParseError, QueryNode, QuerySet, SyntaxError, compile_expression, matches};
use hiscore::utils::Tokenizer;

const VALID: &[&str] = &[
    "w1",
    "w2 w3 w4 w5",
    "\"s1 s2\"",
    "'s3 s4'",
    "> w6 10",
    "&& w7 w8",
    "|| w9 w10",
    "&& w11 w12 w13 w14",
    "&& w15 \"sa sb\" (> w16 5) (|| w17 w18 w19)",
    "|| (&& \"s5 s6\" w20) \"s7 s8\"",
    "&& (&& w21 w22) w23 (|| w24 w25)",
    "&& w26 (|| w27 (> w28 10))",
    "(> w29 w30 w31 30)",
    "> w29 w30 w31 30",
    "(|| xxx yyy zzz)",
    "!!(|| xxx yyy zzz)",
    "(&& !xxx !yyy zzz)",
    "!vvv",
    "!(&& vvv vvv)",
];

const INVALID: &[&str] = &["", "> w1 w2", "&&", "|| w3 && w4", "! || w1 w2"];

fn satisfying() -> Histogram {
    [
        ("w1", 1),
        ("w2", 1),
        ("w3", 1),
        ("w4", 1),
        ("w5", 1),
        ("w6", 11),
        ("w7", 1),
        ("w8", 1),
        ("w10", 1),
        ("w11", 1),
        ("w12", 1),
        ("w13", 1),
        ("w14", 1),
        ("w15", 1),
        ("w16", 6),
        ("w18", 1),
        ("w20", 1),
        ("w21", 1),
        ("w22", 1),
        ("w23", 1),
        ("w25", 1),
        ("w26", 1),
        ("w28", 11),
        ("s1 s2", 1),
        ("s3 s4", 1),
        ("sa sb", 1),
        ("s5 s6", 1),
        ("w29", 11),
        ("w30", 11),
        ("w31", 11),
        ("zzz", 1),
    ]
    .into_iter()
    .collect()
}

fn falsifying() -> Histogram {
    [
        ("w3", 1),
        ("w5", 1),
        ("w6", 3),
        ("w8", 1),
        ("w12", 1),
        ("w13", 1),
        ("w14", 1),
        ("w15", 1),
        ("sa sb", 1),
        ("w16", 3),
        ("s5 s6", 1),
        ("w21", 1),
        ("w22", 1),
        ("w23", 1),
        ("w26", 1),
        ("w28", 9),
        ("w29", 1),
        ("w30", 1),
        ("w31", 1),
        ("vvv", 1),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_valid_expressions_parse() {
    for expr in VALID {
        assert!(compile_expression(expr).is_ok(), "valid expression rejected: {:?}", expr);
    }
}

#[test]
fn test_invalid_expressions_rejected() {
    for expr in INVALID {
        assert!(compile_expression(expr).is_err(), "invalid expression accepted: {:?}", expr);
    }
}

#[test]
fn test_satisfied_expressions() {
    let histogram = satisfying();
    let models = FrequencyModels::single(&histogram);
    for expr in VALID {
        let node = compile_expression(expr).unwrap();
        assert!(matches(&node, models), "expected to hold: {:?}", expr);
    }
}

#[test]
fn test_unsatisfied_expressions() {
    let histogram = falsifying();
    let models = FrequencyModels::single(&histogram);
    for expr in VALID {
        let node = compile_expression(expr).unwrap();
        assert!(!matches(&node, models), "expected to fail: {:?}", expr);
    }
}

#[test]
fn test_parenthesized_and_bare_threshold_agree() {
    assert_eq!(
        compile_expression("(> w29 w30 w31 30)").unwrap(),
        compile_expression("> w29 w30 w31 30").unwrap()
    );
    assert!(matches!(
        compile_expression("> w29 w30 w31 30").unwrap(),
        QueryNode::GreaterThan { threshold: 30, .. }
    ));
}

#[test]
fn test_compile_is_case_insensitive() {
    assert_eq!(
        compile_expression("  && Neural 'Deep LEARNING' ").unwrap(),
        compile_expression("&& neural 'deep learning'").unwrap()
    );
}

#[test]
fn test_query_file_against_document() {
    let source = "\
# weighted topic query
[weight=3] && 'neural network' (|| training inference)
[weight=2] > gradient descent 2

# continuation across lines
[weight=1] && dataset \\
    (> benchmark evaluation 1)
[weight=-2] spam
[weight=oops] classifier
";
    let set: QuerySet = source.parse().unwrap();
    assert_eq!(set.len(), 5);
    assert_eq!(set.weights().collect::<Vec<_>>(), vec![3.0, 2.0, 1.0, -2.0, 1.0]);
    assert_eq!(set.min_score(), -2.0);
    assert_eq!(set.max_score(), 7.0);

    let text = "The neural network training used gradient descent. \
                A benchmark evaluation on the dataset followed.";
    let tokens = Tokenizer::default().tokenize(text);
    let record = set.evaluate(tokens.histograms.models());

    // gradient + descent = 2 is not greater than 2
    assert_eq!(record.scores(), &[3.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(record.total_score(), 4.0);
    assert!((record.normalized().unwrap() - 2.0 / 9.0).abs() < 1e-12);
    assert!((record.cut_normalized().unwrap() - 4.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_invalid_line_reports_position() {
    let err = "w1\n# ok\n&& w2\n> w3 w4\n".parse::<QuerySet>().unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(err.expression, "> w3 w4");
}

#[test]
fn test_deeply_nested_line_is_compile_error() {
    let source = format!("w1\n{}w2\n", "!".repeat(20_000));
    let err = source.parse::<QuerySet>().unwrap_err();
    assert_eq!(err.line, 2);
    assert!(matches!(
        err.source,
        ParseError::Syntax(SyntaxError::TooDeep { .. })
    ));
}

#[test]
fn test_dangling_continuation_is_dropped() {
    let set: QuerySet = "w1\n&& \\".parse().unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.expressions().collect::<Vec<_>>(), vec!["w1"]);
}
