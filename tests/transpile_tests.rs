//! End-to-end lowering tests over builder-constructed programs.

mod common;

use common::{lower, lower_err, targets};
use yovec::ast::builder::*;
use yovec::ast::Node;
use yovec::ast::output::listing;
use yovec::transpile::transpile;
use yovec::{ErrorKind, Options};

fn v123() -> Node {
    vector(vec![number("1"), number("2"), number("3")])
}

#[test]
fn register_indices_increase_by_one_per_let() {
    let p = program(vec![
        let_("a", number("1")),
        comment("ignored"),
        let_("v", v123()),
        import("X"),
        let_("b", binary(variable("a"), "+", variable("X"))),
    ]);
    let out = lower(&p);
    assert_eq!(out.len(), 3);
    assert_eq!(targets(&out[0]), vec!["v0e"]);
    assert_eq!(targets(&out[1]), vec!["v1e0", "v1e1", "v1e2"]);
    assert_eq!(targets(&out[2]), vec!["v2e"]);
    assert_eq!(out[2], "v2e=v0e+X");
}

#[test]
fn vecbinary_emits_one_statement_per_element() {
    let p = program(vec![
        let_("u", v123()),
        let_("w", vecbinary(variable("u"), "+", v123())),
    ]);
    assert_eq!(
        lower(&p)[1],
        "v1e0=v0e0+1 v1e1=v0e1+2 v1e2=v0e2+3"
    );
}

#[test]
fn vecbinary_length_mismatch_is_shape_error() {
    let p = program(vec![let_(
        "w",
        vecbinary(v123(), "*", vector(vec![number("1")])),
    )]);
    assert_eq!(lower_err(&p), ErrorKind::ShapeMismatch);
}

#[test]
fn concat_keeps_left_operand_as_prefix() {
    let p = program(vec![
        let_("u", vector(vec![number("1"), number("2")])),
        let_("w", concat(vec![variable("u"), vector(vec![number("3")])])),
    ]);
    assert_eq!(lower(&p)[1], "v1e0=v0e0 v1e1=v0e1 v1e2=3");
}

#[test]
fn dot_product_is_a_single_statement() {
    let p = program(vec![let_(
        "s",
        dot(v123(), vector(vec![number("4"), number("5"), number("6")])),
    )]);
    assert_eq!(lower(&p), vec!["v0e=((1*4)+(2*5))+(3*6)"]);
}

#[test]
fn reduce_folds_from_the_left() {
    let p = program(vec![let_("s", reduce("+", v123()))]);
    assert_eq!(lower(&p), vec!["v0e=(1+2)+3"]);
}

#[test]
fn reduce_over_empty_vector_fails() {
    let p = program(vec![let_("s", reduce("+", vector(vec![])))]);
    assert_eq!(lower_err(&p), ErrorKind::EmptyReduce);
}

#[test]
fn len_is_a_literal() {
    let p = program(vec![let_("n", len(v123()))]);
    assert_eq!(lower(&p), vec!["v0e=3"]);
}

#[test]
fn map_and_premap_apply_per_element() {
    let p = program(vec![
        let_("u", vector(vec![number("1"), number("2")])),
        let_("m", map("-", variable("u"))),
        let_("p", premap("*", number("2"), variable("u"))),
        let_("q", postmap(number("10"), "-", variable("u"))),
    ]);
    let out = lower(&p);
    assert_eq!(out[1], "v1e0=-v0e0 v1e1=-v0e1");
    assert_eq!(out[2], "v2e0=2*v0e0 v2e1=2*v0e1");
    assert_eq!(out[3], "v3e0=v0e0-10 v3e1=v0e1-10");
}

#[test]
fn vector_unary_chain_applies_innermost_first() {
    let p = program(vec![
        vec_let("u", vector(vec![number("4"), number("9")])),
        let_("w", vec_unary(&["-", "sqrt"], variable("u"))),
        let_("r", vec_unary(&["sqrt", "-"], variable("u"))),
        let_("a", vecunary("abs", variable("w"))),
    ]);
    assert_eq!(
        lower(&p),
        vec![
            "v0e0=4 v0e1=9",
            "v1e0=-(sqrt v0e0) v1e1=-(sqrt v0e1)",
            "v2e0=sqrt (-v0e0) v2e1=sqrt (-v0e1)",
            "v3e0=abs v1e0 v3e1=abs v1e1",
        ]
    );
}

#[test]
fn cross_product_of_unit_vectors() {
    let x = vector(vec![number("1"), number("0"), number("0")]);
    let y = vector(vec![number("0"), number("1"), number("0")]);
    let p = program(vec![let_("z", cross(x, y))]);
    assert_eq!(
        lower(&p),
        vec!["v0e0=(0*0)-(0*1) v0e1=(0*0)-(1*0) v0e2=(1*1)-(0*0)"]
    );
}

#[test]
fn matrix_registers_are_row_major() {
    let m = matrix(vec![
        vector(vec![number("1"), number("2")]),
        vector(vec![number("3"), number("4")]),
    ]);
    let p = program(vec![let_("m", m), let_("t", transpose(variable("m")))]);
    assert_eq!(
        lower(&p),
        vec![
            "v0e0=1 v0e1=2 v0e2=3 v0e3=4",
            "v1e0=v0e0 v1e1=v0e2 v1e2=v0e1 v1e3=v0e3",
        ]
    );
}

#[test]
fn matmul_rows_by_columns() {
    let a = matrix(vec![
        vector(vec![number("1"), number("2")]),
        vector(vec![number("3"), number("4")]),
    ]);
    let b = matrix(vec![vector(vec![number("5")]), vector(vec![number("6")])]);
    let p = program(vec![let_("c", matmul(a, b))]);
    assert_eq!(lower(&p), vec!["v0e0=(1*5)+(2*6) v0e1=(3*5)+(4*6)"]);
}

fn m1234() -> Node {
    matrix(vec![
        vector(vec![number("1"), number("2")]),
        vector(vec![number("3"), number("4")]),
    ])
}

#[test]
fn matrix_element_wise_combinators() {
    let p = program(vec![
        let_("m", m1234()),
        let_("n", mat_map("-", variable("m"))),
        let_("a", mat_unary(&["abs", "-"], variable("m"))),
        let_("p", mat_premap("*", number("2"), variable("m"))),
        let_("q", mat_postmap(number("10"), "-", variable("m"))),
        let_("s", mat_binary(variable("m"), "+", variable("p"))),
    ]);
    let out = lower(&p);
    assert_eq!(out[1], "v1e0=-v0e0 v1e1=-v0e1 v1e2=-v0e2 v1e3=-v0e3");
    assert_eq!(
        out[2],
        "v2e0=abs (-v0e0) v2e1=abs (-v0e1) v2e2=abs (-v0e2) v2e3=abs (-v0e3)"
    );
    assert_eq!(out[3], "v3e0=2*v0e0 v3e1=2*v0e1 v3e2=2*v0e2 v3e3=2*v0e3");
    assert_eq!(out[4], "v4e0=v0e0-10 v4e1=v0e1-10 v4e2=v0e2-10 v4e3=v0e3-10");
    assert_eq!(out[5], "v5e0=v0e0+v3e0 v5e1=v0e1+v3e1 v5e2=v0e2+v3e2 v5e3=v0e3+v3e3");
}

#[test]
fn mat_binary_folds_left_and_checks_dimensions() {
    let chain = program(vec![
        let_("m", m1234()),
        let_("d", mat_binary(variable("m"), "-", variable("m"))),
    ]);
    assert_eq!(
        lower(&chain)[1],
        "v1e0=v0e0-v0e0 v1e1=v0e1-v0e1 v1e2=v0e2-v0e2 v1e3=v0e3-v0e3"
    );

    let column = matrix(vec![vector(vec![number("5")]), vector(vec![number("6")])]);
    let mismatched = program(vec![let_("d", mat_binary(m1234(), "*", column))]);
    assert_eq!(lower_err(&mismatched), ErrorKind::ShapeMismatch);
}

#[test]
fn ragged_matrix_is_rejected() {
    let m = matrix(vec![
        vector(vec![number("1"), number("2")]),
        vector(vec![number("3")]),
    ]);
    assert_eq!(
        lower_err(&program(vec![let_("m", m)])),
        ErrorKind::ShapeMismatch
    );
}

#[test]
fn redefinition_and_undefined_variable() {
    let twice = program(vec![let_("x", number("1")), let_("x", number("2"))]);
    assert_eq!(lower_err(&twice), ErrorKind::Redefinition);

    let missing = program(vec![let_("x", variable("y"))]);
    assert_eq!(lower_err(&missing), ErrorKind::UndefinedVariable);
}

#[test]
fn using_a_vector_as_a_number_is_a_type_error() {
    let p = program(vec![
        let_("v", v123()),
        let_("x", binary(variable("v"), "+", number("1"))),
    ]);
    assert_eq!(lower_err(&p), ErrorKind::TypeMismatch);
}

#[test]
fn export_errors() {
    let undefined = program(vec![export("nope", "OUT")]);
    assert_eq!(lower_err(&undefined), ErrorKind::ExportOfUndefinedVariable);

    let conflicting = program(vec![
        let_("a", number("1")),
        let_("b", number("2")),
        export("a", "OUT"),
        export("b", "OUT"),
    ]);
    assert_eq!(lower_err(&conflicting), ErrorKind::ConflictingAliasTarget);

    let twice = program(vec![
        let_("a", number("1")),
        export("a", "OUT"),
        export("a", "OTHER"),
    ]);
    assert_eq!(lower_err(&twice), ErrorKind::Redefinition);
}

#[test]
fn export_onto_an_import_is_rejected() {
    let p = program(vec![
        import("A"),
        let_("s", binary(variable("A"), "+", number("1"))),
        let_("t", binary(variable("A"), "*", number("2"))),
        export("s", "A"),
    ]);
    assert_eq!(lower_err(&p), ErrorKind::ConflictingAliasTarget);

    let imported_later = program(vec![
        let_("s", number("1")),
        export("s", "A"),
        import("A"),
    ]);
    assert_eq!(lower_err(&imported_later), ErrorKind::ConflictingAliasTarget);
}

#[test]
fn exports_with_overlapping_element_names_are_rejected() {
    let p = program(vec![
        let_("s", number("1")),
        let_("v", vector(vec![number("2"), number("3")])),
        export("s", "POS0"),
        export("v", "POS"),
    ]);
    assert_eq!(lower_err(&p), ErrorKind::ConflictingAliasTarget);

    let reversed = program(vec![
        let_("s", number("1")),
        let_("v", vector(vec![number("2"), number("3")])),
        export("v", "POS"),
        export("s", "POS1"),
    ]);
    assert_eq!(lower_err(&reversed), ErrorKind::ConflictingAliasTarget);
}

#[test]
fn export_into_register_namespace_is_rejected() {
    let p = program(vec![
        let_("a", number("1")),
        let_("b", number("2")),
        export("b", "v0e"),
    ]);
    assert_eq!(lower_err(&p), ErrorKind::ConflictingAliasTarget);
}

#[test]
fn register_shaped_import_is_rejected() {
    let p = program(vec![
        import("v0e1"),
        let_("v", vector(vec![variable("v0e1"), number("2")])),
        export("v", "OUT"),
    ]);
    assert_eq!(lower_err(&p), ErrorKind::Redefinition);
}

#[test]
fn exported_vector_keeps_element_suffixes() {
    let p = program(vec![
        let_("pos", vector(vec![external(":x"), external(":y")])),
        export("pos", "POS"),
    ]);
    let out = transpile(&p, &Options::default()).unwrap();
    assert_eq!(listing(&out.program), vec!["POS0=:x POS1=:y"]);
    assert_eq!(out.exported, vec!["POS0", "POS1"]);
}

#[test]
fn failed_compile_produces_no_output() {
    let p = program(vec![
        let_("a", number("1")),
        let_("b", variable("missing")),
    ]);
    assert!(transpile(&p, &Options::default()).is_err());
}

#[test]
fn end_to_end_without_mangling() {
    let p = program(vec![
        import("A"),
        let_("v", vector(vec![variable("A"), number("2"), number("3")])),
        let_("s", dot(variable("v"), variable("v"))),
        export("s", "OUT"),
    ]);
    assert_eq!(
        lower(&p),
        vec![
            "v0e0=A v0e1=2 v0e2=3",
            "OUT=((v0e0*v0e0)+(v0e1*v0e1))+(v0e2*v0e2)",
        ]
    );
}
