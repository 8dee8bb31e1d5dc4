// Table-driven evaluation tests. Each file under tests/eval/ is a JSON array
// of cases; to add one, append an object with the expression and the value
// (and optionally the satisfiability) expected in every shipped domain.

use std::fmt::Display;

use absint::{
    nonrelational::{eval, satisfies},
    Identifier, NonRelationalValueDomain, Parity, ProgramPoint, Satisfiability, Sign, SignParity,
    SymbolicExpression,
};

// ------------------------------------------------------------------
// Helpers

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PerDomain<T> {
    sign: T,
    parity: T,
    sign_parity: T,
}

#[derive(Debug, serde::Deserialize)]
struct Case {
    expr: SymbolicExpression,
    value: PerDomain<String>,
    #[serde(default)]
    satisfies: Option<PerDomain<Satisfiability>>,
}

fn cases(file: &str) -> Vec<Case> {
    let path = format!("tests/eval/{}", file);
    let json = std::fs::read_to_string(&path).expect("Couldn't read test cases");
    serde_json::from_str(&json).expect("Couldn't deserialize test cases")
}

fn unbound<D>(_: &Identifier) -> Option<D> {
    None
}

fn check_one<D: NonRelationalValueDomain + Display>(
    case: &Case,
    value: &str,
    sat: Option<Satisfiability>,
) {
    let pp = ProgramPoint::new(format!("{}", case.expr));
    let v: D = eval(&case.expr, &unbound, &pp).unwrap();
    assert_eq!(value, v.to_string(), "value of {}", case.expr);
    if let Some(expected) = sat {
        let actual = satisfies::<D, _>(&case.expr, &unbound, &pp).unwrap();
        assert_eq!(expected, actual, "satisfiability of {}", case.expr);
    }
}

fn check(file: &str) {
    for case in cases(file) {
        let sat = case.satisfies.as_ref();
        check_one::<Sign>(&case, &case.value.sign, sat.map(|s| s.sign));
        check_one::<Parity>(&case, &case.value.parity, sat.map(|s| s.parity));
        check_one::<SignParity>(&case, &case.value.sign_parity, sat.map(|s| s.sign_parity));
    }
}

// ------------------------------------------------------------------

#[test]
fn arith() {
    check("arith.json");
}

#[test]
fn conditions() {
    check("conditions.json");
}
