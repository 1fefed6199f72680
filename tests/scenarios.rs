use test_log::test;

use kripke_rs::config::CheckOptions;
use kripke_rs::formula::Formula;
use kripke_rs::loader::ModelDescription;
use kripke_rs::logic::SabotageScope;
use kripke_rs::model::Model;
use kripke_rs::Error;

fn model(yaml: &str) -> Model {
    model_with(yaml, CheckOptions::default())
}

fn model_with(yaml: &str, options: CheckOptions) -> Model {
    let description = ModelDescription::from_yaml_str(yaml).unwrap();
    Model::new(description, options).unwrap()
}

const MODAL: &str = "
logic: modal
P: [p, q]
V: {w1: [p], w2: [q]}
R: {w1: [w2]}
";

const SABOTAGE: &str = "
logic: sabotage
P: [p, q, r]
V: {w1: [p], w2: [q], w3: [r]}
R: {w1: [w2, w3]}
";

const TRAVEL: &str = "
logic: lhs
P_A: []
P_E: [p]
V: {w1: [p], w2: []}
R: {w1: [w2], w2: [w1]}
agents: 1
";

/// A small model with a dead end, a loop and a fork.
const MIXED: &str = "
logic: sabotage
P: [p, q]
V: {w1: [p], w2: [q], w3: [p, q], w4: []}
R:
  w1: [w2, w3]
  w2: [w2]
  w3: [w4, w1]
  w4: ~
";

#[test]
fn test_modal_diamond_and_box() {
    let m = model(MODAL);
    assert!(m.check("<>(q)", &["w1"]).unwrap());
    assert!(!m.check("<>(p)", &["w1"]).unwrap());
    assert!(m.check("[](q)", &["w1"]).unwrap());
}

#[test]
fn test_sabotage_removes_edge_before_box() {
    let m = model(SABOTAGE);
    assert!(m.check("<.>([](r))", &["w1"]).unwrap());
    assert!(!m.check("[](r)", &["w1"]).unwrap());
}

#[test]
fn test_sabotage_base_scope() {
    let options = CheckOptions {
        sabotage_scope: SabotageScope::Base,
        ..CheckOptions::default()
    };
    let m = model_with(SABOTAGE, options);
    assert!(!m.check("<.>([](r))", &["w1"]).unwrap());
}

#[test]
fn test_travel_here() {
    let m = model(TRAVEL);
    assert_eq!(m.travelers(), 1);
    assert!(m.check("I", &["w1", "w1"]).unwrap());
    assert!(!m.check("I", &["w1", "w2"]).unwrap());
    assert!(m.check("<S1>(I)", &["w1", "w2"]).unwrap());
    assert!(m.check("<H>(I)", &["w1", "w2"]).unwrap());
}

#[test]
fn test_duality() {
    let m = model(MIXED);
    let operands = ["p", "q", "~(p)", "(p)/\\(q)", "<>(q)", "[](p)"];
    for world in ["w1", "w2", "w3", "w4"] {
        for phi in operands {
            let boxed = m.check(&format!("[]({})", phi), &[world]).unwrap();
            let diamond = m.check(&format!("<>(~({}))", phi), &[world]).unwrap();
            assert_eq!(boxed, !diamond, "[]/<> at {} for {}", world, phi);

            let every = m.check(&format!("[.]({})", phi), &[world]).unwrap();
            let some = m.check(&format!("<.>(~({}))", phi), &[world]).unwrap();
            assert_eq!(every, !some, "[.]/<.> at {} for {}", world, phi);
        }
    }
}

#[test]
fn test_vacuous_truth() {
    let m = model(MIXED);
    for phi in ["p", "~(p)", "(p)/\\(~(p))", "<>(q)"] {
        assert!(m.check(&format!("[]({})", phi), &["w4"]).unwrap());
        assert!(!m.check(&format!("<>({})", phi), &["w4"]).unwrap());
    }
}

#[test]
fn test_idempotence() {
    let m = model(MIXED);
    let relation = m.kripke().relation();
    for formula in ["<.>([](q))", "[.](<>(p))", "<.>(<.>(~(<>(q))))"] {
        let first = m.check(formula, &["w1"]).unwrap();
        let second = m.check(formula, &["w1"]).unwrap();
        assert_eq!(first, second);
    }
    assert_eq!(m.kripke().relation(), relation);
    assert_eq!(m.kripke().edges().len(), 5);
}

#[test]
fn test_disambiguation() {
    let m = model(
        "
logic: modal
P: [p]
V: {w1: [p], w2: [p], w3: [p], w4: []}
R: {w1: [w2, w3], w4: [w1]}
",
    );
    let kripke = m.kripke();
    let valuations: Vec<_> = kripke.worlds().map(|w| kripke.valuation(w).clone()).collect();
    for (i, a) in valuations.iter().enumerate() {
        for b in &valuations[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(m.successors("w1").unwrap(), ["w2", "w3"]);
    assert_eq!(m.successors("w4").unwrap(), ["w1"]);
    assert!(m.check("[](p)", &["w1"]).unwrap());
    assert!(m.check("<>(<>(p))", &["w4"]).unwrap());
}

#[test]
fn test_parser_round_trip() {
    for text in [
        "<>(q)",
        "( p ) /\\ ( ~ ( q ) )",
        "<.>([](r))",
        "((p)\\/(q))/\\(<S1>([H](I)))",
    ] {
        let parsed = Formula::parse(text).unwrap();
        assert_eq!(Formula::parse(&parsed.to_string()).unwrap(), parsed);
    }
}

#[test]
fn test_errors() {
    let m = model(MODAL);
    assert!(matches!(m.check("<>(q", &["w1"]), Err(Error::MalformedFormula { .. })));
    assert!(matches!(m.check("<.>(q)", &["w1"]), Err(Error::UnknownOperator(_))));
    assert!(matches!(m.check("q", &["w7"]), Err(Error::WorldNotFound(_))));

    let t = model(TRAVEL);
    assert!(matches!(
        t.check("<S2>(I)", &["w1", "w2"]),
        Err(Error::IndexOutOfRange { index: 2, len: 1 })
    ));
}
