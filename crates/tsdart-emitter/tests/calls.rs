//! Calls and constructors: named arguments, new/const, initializer lists.

mod common;

use common::{assert_dart, Builder};
use tsdart_ast::{
    BinaryOp, ClassData, FunctionData, Modifiers, NodeData, NodeId, PropertyKey,
};

fn ctor(b: &mut Builder, body: NodeId) -> NodeId {
    b.ast.add(NodeData::Constructor(FunctionData {
        name: None,
        type_params: vec![],
        params: vec![],
        return_type: None,
        body: Some(body),
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }))
}

fn class_with(b: &mut Builder, name: &str, members: Vec<NodeId>, const_marked: bool) -> NodeId {
    let decorators = if const_marked {
        let marker = b.ident("CONST");
        vec![b.ast.add(NodeData::Decorator { expr: marker })]
    } else {
        vec![]
    };
    b.ast.add(NodeData::Class(ClassData {
        name: name.to_string(),
        type_params: vec![],
        heritage: vec![],
        members,
        modifiers: Modifiers::empty(),
        decorators,
    }))
}

fn this_assign(b: &mut Builder, field: &str, value: NodeId) -> NodeId {
    let this = b.ast.add(NodeData::This);
    let access = b.prop(this, field);
    let assign = b.ast.add(NodeData::Binary {
        op: BinaryOp::Assign,
        left: access,
        right: value,
    });
    b.expr_stmt(assign)
}

fn object_literal(b: &mut Builder, entries: &[(PropertyKey, NodeId)]) -> NodeId {
    let properties = entries
        .iter()
        .map(|(key, value)| {
            b.ast.add(NodeData::PropertyAssignment {
                key: key.clone(),
                value: *value,
            })
        })
        .collect();
    b.ast.add(NodeData::ObjectLiteral { properties })
}

#[test]
fn scenario_c_trailing_identifier_keyed_literal_becomes_named_args() {
    // f({a: 12, b: 4}) → f(a: 12, b: 4)
    let mut b = Builder::new();
    let twelve = b.num("12");
    let four = b.num("4");
    let literal = object_literal(
        &mut b,
        &[
            (PropertyKey::Identifier("a".to_string()), twelve),
            (PropertyKey::Identifier("b".to_string()), four),
        ],
    );
    let f = b.ident("f");
    let call = b.call(f, vec![literal]);
    let stmt = b.expr_stmt(call);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "f(a: 12, b: 4);");
}

#[test]
fn scenario_c_string_keyed_literal_passes_through() {
    let mut b = Builder::new();
    let twelve = b.num("12");
    let literal = object_literal(&mut b, &[(PropertyKey::StringKey("a".to_string()), twelve)]);
    let f = b.ident("f");
    let call = b.call(f, vec![literal]);
    let stmt = b.expr_stmt(call);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "f({'a': 12});");
}

#[test]
fn empty_literal_never_triggers_named_args() {
    let mut b = Builder::new();
    let literal = b.ast.add(NodeData::ObjectLiteral { properties: vec![] });
    let f = b.ident("f");
    let call = b.call(f, vec![literal]);
    let stmt = b.expr_stmt(call);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "f({});");
}

#[test]
fn named_args_keep_leading_positional_arguments() {
    let mut b = Builder::new();
    let one = b.num("1");
    let two = b.num("2");
    let literal = object_literal(&mut b, &[(PropertyKey::Identifier("x".to_string()), two)]);
    let f = b.ident("f");
    let call = b.call(f, vec![one, literal]);
    let stmt = b.expr_stmt(call);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "f(1, x: 2);");
}

#[test]
fn plain_new_keeps_the_keyword() {
    let mut b = Builder::new();
    let foo = b.ident("Foo");
    let new = b.new_expr(foo, vec![]);
    let stmt = b.expr_stmt(new);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "new Foo();");
}

#[test]
fn catalogued_collection_factories_elide_new() {
    let mut b = Builder::new();
    let map_sym = b.lib_symbol("Map");
    let map = b.ident_sym("Map", map_sym);
    let new = b.new_expr(map, vec![]);
    let stmt = b.expr_stmt(new);
    let module = b.module(vec![stmt]);
    assert_dart(&module, "Map();");
}

#[test]
fn const_context_replaces_new_with_const() {
    let mut b = Builder::new();
    let foo = b.ident("Foo");
    let new = b.new_expr(foo, vec![]);
    let stmt = b.var_stmt(tsdart_ast::VarKeyword::Var, "x", None, Some(new));
    b.ast.add_leading_comment(stmt, 0, "/* @const */");
    let module = b.module(vec![stmt]);
    assert_dart(&module, "const x = const Foo();");
}

#[test]
fn scenario_b_super_call_moves_to_initializer_leaving_marker() {
    // class X { constructor() { super(1); } }
    let mut b = Builder::new();
    let sup = b.ast.add(NodeData::Super);
    let one = b.num("1");
    let call = b.call(sup, vec![one]);
    let stmt = b.expr_stmt(call);
    let body = b.block(vec![stmt]);
    let c = ctor(&mut b, body);
    let class = class_with(&mut b, "X", vec![c], false);
    let module = b.module(vec![class]);
    assert_dart(
        &module,
        "class X { X() : super(1) { /* super call moved to initializer */; } }",
    );
}

#[test]
fn const_constructor_reduces_to_initializer_list() {
    // @CONST class X { constructor() { this.a = 1; this.b = 2; super(3); } }
    let mut b = Builder::new();
    let one = b.num("1");
    let a = this_assign(&mut b, "a", one);
    let two = b.num("2");
    let bb = this_assign(&mut b, "b", two);
    let sup = b.ast.add(NodeData::Super);
    let three = b.num("3");
    let sup_call = b.call(sup, vec![three]);
    let sup_stmt = b.expr_stmt(sup_call);
    let body = b.block(vec![a, bb, sup_stmt]);
    let c = ctor(&mut b, body);
    let class = class_with(&mut b, "X", vec![c], true);
    let module = b.module(vec![class]);
    // Assignments keep source order; the superclass call comes last; the
    // body is suppressed entirely.
    assert_dart(&module, "class X { const X() : a = 1, b = 2, super(3); }");
}

#[test]
fn const_constructor_rejects_arbitrary_statements() {
    let mut b = Builder::new();
    let f = b.ident("log");
    let call = b.call(f, vec![]);
    let stmt = b.expr_stmt(call);
    let body = b.block(vec![stmt]);
    let c = ctor(&mut b, body);
    let class = class_with(&mut b, "X", vec![c], true);
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert!(
        diags[0].message.contains("may only assign fields"),
        "{diags:?}"
    );
}

#[test]
fn two_super_calls_are_an_error() {
    let mut b = Builder::new();
    let s1 = b.ast.add(NodeData::Super);
    let c1 = b.call(s1, vec![]);
    let st1 = b.expr_stmt(c1);
    let s2 = b.ast.add(NodeData::Super);
    let c2 = b.call(s2, vec![]);
    let st2 = b.expr_stmt(c2);
    let body = b.block(vec![st1, st2]);
    let c = ctor(&mut b, body);
    let class = class_with(&mut b, "X", vec![c], false);
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert!(
        diags[0].message.contains("only one direct superclass call"),
        "{diags:?}"
    );
}

#[test]
fn nested_super_call_is_an_error() {
    // constructor() { if (cond) { super(); } }
    let mut b = Builder::new();
    let sup = b.ast.add(NodeData::Super);
    let call = b.call(sup, vec![]);
    let stmt = b.expr_stmt(call);
    let inner = b.block(vec![stmt]);
    let cond = b.ident("cond");
    let if_stmt = b.ast.add(NodeData::IfStmt {
        cond,
        then: inner,
        else_: None,
    });
    let body = b.block(vec![if_stmt]);
    let c = ctor(&mut b, body);
    let class = class_with(&mut b, "X", vec![c], false);
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert!(
        diags[0]
            .message
            .contains("direct statement of the constructor"),
        "{diags:?}"
    );
}
