//! Declarations: variable lists, parameters, classes, enums, conventions.

mod common;

use common::{assert_dart, Builder};
use tsdart_ast::{
    ClassData, FunctionData, HeritageKind, Modifiers, NodeData, NodeId, ParamData, PropertyKey,
    TypeKeyword, VarKeyword, Visibility,
};
use tsdart_common::ReportMode;
use tsdart_emitter::TranspileOptions;

fn fd(name: Option<&str>, params: Vec<NodeId>, body: Option<NodeId>) -> FunctionData {
    FunctionData {
        name: name.map(str::to_string),
        type_params: vec![],
        params,
        return_type: None,
        body,
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }
}

#[test]
fn scenario_a_whole_parameter_list_bracketed_from_first_default() {
    // function x(a = 42, b = 1) { return 42; }
    let mut b = Builder::new();
    let d1 = b.num("42");
    let d2 = b.num("1");
    let a = b.param("a", None, Some(d1));
    let p2 = b.param("b", None, Some(d2));
    let forty_two = b.num("42");
    let ret = b.ret(Some(forty_two));
    let body = b.block(vec![ret]);
    let f = b.function("x", vec![a, p2], body);
    let module = b.module(vec![f]);
    assert_dart(&module, "x([a = 42, b = 1]) { return 42; }");
}

#[test]
fn optional_group_swallows_every_later_parameter() {
    // function f(a, b = 1, c) {}  — c is not optional but lands inside.
    let mut b = Builder::new();
    let a = b.param("a", None, None);
    let one = b.num("1");
    let p2 = b.param("b", None, Some(one));
    let c = b.param("c", None, None);
    let body = b.block(vec![]);
    let f = b.function("f", vec![a, p2, c], body);
    let module = b.module(vec![f]);
    assert_dart(&module, "f(a, [b = 1, c]) { }");
}

#[test]
fn single_typed_declaration_replaces_var() {
    let mut b = Builder::new();
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let three = b.num("3");
    let stmt = b.var_stmt(VarKeyword::Var, "x", Some(num_ty), Some(three));
    let module = b.module(vec![stmt]);
    assert_dart(&module, "num x = 3;");
}

#[test]
fn untyped_declaration_keeps_var_and_const_becomes_final() {
    let mut b = Builder::new();
    let three = b.num("3");
    let var_stmt = b.var_stmt(VarKeyword::Let, "x", None, Some(three));
    let four = b.num("4");
    let final_stmt = b.var_stmt(VarKeyword::Const, "y", None, Some(four));
    let module = b.module(vec![var_stmt, final_stmt]);
    assert_dart(&module, "var x = 3; final y = 4;");
}

#[test]
fn multi_variable_list_with_type_is_an_error() {
    let mut b = Builder::new();
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let one = b.num("1");
    let d1 = b.ast.add(NodeData::VarDecl {
        name: "x".to_string(),
        ty: Some(num_ty),
        initializer: Some(one),
    });
    let d2 = b.ast.add(NodeData::VarDecl {
        name: "y".to_string(),
        ty: None,
        initializer: None,
    });
    let list = b.ast.add(NodeData::VarList {
        keyword: VarKeyword::Var,
        declarations: vec![d1, d2],
    });
    let stmt = b.ast.add(NodeData::VariableStatement {
        list,
        modifiers: Modifiers::empty(),
    });
    let module = b.module(vec![stmt]);
    let diags = common::translate_err(&module);
    assert!(diags[0].message.contains("cannot be typed"), "{diags:?}");
}

#[test]
fn const_marker_comment_makes_declaration_const() {
    let mut b = Builder::new();
    let three = b.num("3");
    let stmt = b.var_stmt(VarKeyword::Var, "x", None, Some(three));
    b.ast.add_leading_comment(stmt, 0, "/* @const */");
    let module = b.module(vec![stmt]);
    // The marker itself is a directive, not a comment to keep.
    assert_dart(&module, "const x = 3;");
}

#[test]
fn enums_emit_plain_member_lists() {
    let mut b = Builder::new();
    let red = b.ast.add(NodeData::EnumMember {
        name: "Red".to_string(),
        initializer: None,
    });
    let green = b.ast.add(NodeData::EnumMember {
        name: "Green".to_string(),
        initializer: None,
    });
    let e = b.ast.add(NodeData::Enum {
        name: "Color".to_string(),
        members: vec![red, green],
        is_const: false,
        modifiers: Modifiers::empty(),
    });
    let module = b.module(vec![e]);
    assert_dart(&module, "enum Color { Red, Green }");
}

#[test]
fn degenerate_enums_are_errors_not_degraded_output() {
    let mut b = Builder::new();
    let empty = b.ast.add(NodeData::Enum {
        name: "Nothing".to_string(),
        members: vec![],
        is_const: false,
        modifiers: Modifiers::empty(),
    });
    let one = b.num("1");
    let with_init = b.ast.add(NodeData::EnumMember {
        name: "A".to_string(),
        initializer: Some(one),
    });
    let initialized = b.ast.add(NodeData::Enum {
        name: "Weird".to_string(),
        members: vec![with_init],
        is_const: false,
        modifiers: Modifiers::empty(),
    });
    let b_member = b.ast.add(NodeData::EnumMember {
        name: "B".to_string(),
        initializer: None,
    });
    let const_enum = b.ast.add(NodeData::Enum {
        name: "Fast".to_string(),
        members: vec![b_member],
        is_const: true,
        modifiers: Modifiers::empty(),
    });
    let module = b.module(vec![empty, initialized, const_enum]);
    let diags = common::translate_err(&module);
    let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("empty enums")));
    assert!(messages.iter().any(|m| m.contains("initializers")));
    assert!(messages.iter().any(|m| m.contains("const enums")));
}

#[test]
fn interface_becomes_abstract_class_with_implements() {
    let mut b = Builder::new();
    let a = b.ast.add(NodeData::TypeRef {
        name: "Printable".to_string(),
        type_args: vec![],
    });
    let clause = b.ast.add(NodeData::HeritageClause {
        keyword: HeritageKind::Extends,
        types: vec![a],
    });
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let area = b.ast.add(NodeData::PropertySignature {
        name: "area".to_string(),
        ty: Some(num_ty),
        optional: false,
    });
    let iface = b.ast.add(NodeData::Interface(ClassData {
        name: "Shape".to_string(),
        type_params: vec![],
        heritage: vec![clause],
        members: vec![area],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![iface]);
    assert_dart(
        &module,
        "abstract class Shape implements Printable { num area; }",
    );
}

#[test]
fn parameter_properties_synthesize_fields_and_this_shorthand() {
    // class X { constructor(public x: number) {} }
    let mut b = Builder::new();
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let name = b.ident("x");
    let param = b.ast.add(NodeData::Param(ParamData {
        name,
        ty: Some(num_ty),
        initializer: None,
        optional: false,
        rest: false,
        visibility: Some(Visibility::Public),
    }));
    let body = b.block(vec![]);
    let ctor = b
        .ast
        .add(NodeData::Constructor(fd(None, vec![param], Some(body))));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "X".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![ctor],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    assert_dart(&module, "class X { num x; X(this.x) { } }");
}

#[test]
fn protected_parameter_property_is_rejected() {
    let mut b = Builder::new();
    let name = b.ident("x");
    let param = b.ast.add(NodeData::Param(ParamData {
        name,
        ty: None,
        initializer: None,
        optional: false,
        rest: false,
        visibility: Some(Visibility::Protected),
    }));
    let body = b.block(vec![]);
    let ctor = b
        .ast
        .add(NodeData::Constructor(fd(None, vec![param], Some(body))));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "X".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![ctor],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert!(diags[0].message.contains("protected"), "{diags:?}");
}

#[test]
fn protected_members_are_rejected() {
    let mut b = Builder::new();
    let body = b.block(vec![]);
    let mut method = fd(Some("refresh"), vec![], Some(body));
    method.modifiers = Modifiers::PROTECTED;
    let m = b.ast.add(NodeData::Method(method));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "C".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![m],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert!(
        diags[0].message.contains("protected members"),
        "{diags:?}"
    );
}

#[test]
fn naming_convention_flags_both_directions() {
    let mut b = Builder::new();
    let body1 = b.block(vec![]);
    let mut private_method = fd(Some("bad"), vec![], Some(body1));
    private_method.modifiers = Modifiers::PRIVATE;
    let m1 = b.ast.add(NodeData::Method(private_method));
    let body2 = b.block(vec![]);
    let public_method = fd(Some("_worse"), vec![], Some(body2));
    let m2 = b.ast.add(NodeData::Method(public_method));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "C".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![m1, m2],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    let diags = common::translate_err(&module);
    assert_eq!(diags.len(), 2, "{diags:?}");
    assert!(diags[0].message.contains("must be named with a leading underscore"));
    assert!(diags[1].message.contains("must not be named"));
}

#[test]
fn naming_convention_can_be_disabled() {
    let mut b = Builder::new();
    let body = b.block(vec![]);
    let mut private_method = fd(Some("bad"), vec![], Some(body));
    private_method.modifiers = Modifiers::PRIVATE;
    let m = b.ast.add(NodeData::Method(private_method));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "C".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![m],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    let options = TranspileOptions {
        enforce_underscores: false,
        report_mode: ReportMode::Aggregate,
        ..TranspileOptions::default()
    };
    assert!(common::translate_with(&module, options).is_ok());
}

fn destructured_param(
    b: &mut Builder,
    fields: &[(&str, Option<NodeId>, Option<NodeId>)],
    outer: Option<NodeId>,
) -> NodeId {
    let mut elements = Vec::new();
    let mut signatures = Vec::new();
    for (field, ty, inner) in fields {
        elements.push(b.ast.add(NodeData::BindingElement {
            name: (*field).to_string(),
            initializer: *inner,
        }));
        if let Some(ty) = ty {
            signatures.push(b.ast.add(NodeData::PropertySignature {
                name: (*field).to_string(),
                ty: Some(*ty),
                optional: true,
            }));
        }
    }
    let pattern = b.ast.add(NodeData::ObjectBindingPattern { elements });
    let ty = (!signatures.is_empty())
        .then(|| b.ast.add(NodeData::TypeLiteral { members: signatures }));
    b.ast.add(NodeData::Param(ParamData {
        name: pattern,
        ty,
        initializer: outer,
        optional: false,
        rest: false,
        visibility: None,
    }))
}

#[test]
fn destructured_parameter_becomes_named_group() {
    // function f({a = 1, b}: {a?: number, b?: string}) {}
    let mut b = Builder::new();
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let str_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::String,
    });
    let one = b.num("1");
    let param = destructured_param(
        &mut b,
        &[("a", Some(num_ty), Some(one)), ("b", Some(str_ty), None)],
        None,
    );
    let body = b.block(vec![]);
    let f = b.function("f", vec![param], body);
    let module = b.module(vec![f]);
    assert_dart(&module, "f({num a = 1, String b}) { }");
}

#[test]
fn named_parameter_default_from_outer_object() {
    // function f({a}: {a?: number} = {a: 7}) {}
    let mut b = Builder::new();
    let num_ty = b.ast.add(NodeData::KeywordType {
        keyword: TypeKeyword::Number,
    });
    let seven = b.num("7");
    let assignment = b.ast.add(NodeData::PropertyAssignment {
        key: PropertyKey::Identifier("a".to_string()),
        value: seven,
    });
    let outer = b.ast.add(NodeData::ObjectLiteral {
        properties: vec![assignment],
    });
    let param = destructured_param(&mut b, &[("a", Some(num_ty), None)], Some(outer));
    let body = b.block(vec![]);
    let f = b.function("f", vec![param], body);
    let module = b.module(vec![f]);
    assert_dart(&module, "f({num a = 7}) { }");
}

#[test]
fn conflicting_inner_and_outer_defaults_are_an_error() {
    let mut b = Builder::new();
    let one = b.num("1");
    let two = b.num("2");
    let assignment = b.ast.add(NodeData::PropertyAssignment {
        key: PropertyKey::Identifier("a".to_string()),
        value: two,
    });
    let outer = b.ast.add(NodeData::ObjectLiteral {
        properties: vec![assignment],
    });
    let param = destructured_param(&mut b, &[("a", None, Some(one))], Some(outer));
    let body = b.block(vec![]);
    let f = b.function("f", vec![param], body);
    let module = b.module(vec![f]);
    let diags = common::translate_err(&module);
    assert!(
        diags[0].message.contains("both an inner and an outer default"),
        "{diags:?}"
    );
}

#[test]
fn const_class_without_constructor_synthesizes_one() {
    let mut b = Builder::new();
    let marker = b.ident("CONST");
    let dec = b.ast.add(NodeData::Decorator { expr: marker });
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "Point".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![],
        modifiers: Modifiers::empty(),
        decorators: vec![dec],
    }));
    let module = b.module(vec![class]);
    // The CONST marker annotation itself is not emitted.
    assert_dart(&module, "class Point { const Point(); }");
}

#[test]
fn generic_method_type_parameters_use_the_comment_hack() {
    let mut b = Builder::new();
    let tp = b.ast.add(NodeData::TypeParam {
        name: "T".to_string(),
        constraint: None,
    });
    let t_param_ty = b.ast.add(NodeData::TypeRef {
        name: "T".to_string(),
        type_args: vec![],
    });
    let t_ret_ty = b.ast.add(NodeData::TypeRef {
        name: "T".to_string(),
        type_args: vec![],
    });
    let a = b.param("a", Some(t_param_ty), None);
    let a_ref = b.ident("a");
    let ret = b.ret(Some(a_ref));
    let body = b.block(vec![ret]);
    let mut method = fd(Some("first"), vec![a], Some(body));
    method.type_params = vec![tp];
    method.return_type = Some(t_ret_ty);
    let m = b.ast.add(NodeData::Method(method));
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "C".to_string(),
        type_params: vec![],
        heritage: vec![],
        members: vec![m],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    assert_dart(
        &module,
        "class C { dynamic/*=T*/ first/*<T>*/(dynamic/*=T*/ a) { return a; } }",
    );
}

#[test]
fn class_type_parameters_stay_first_class() {
    let mut b = Builder::new();
    let tp = b.ast.add(NodeData::TypeParam {
        name: "T".to_string(),
        constraint: None,
    });
    let t_ty = b.ast.add(NodeData::TypeRef {
        name: "T".to_string(),
        type_args: vec![],
    });
    let field = b.ast.add(NodeData::PropertyDecl {
        name: "value".to_string(),
        ty: Some(t_ty),
        initializer: None,
        modifiers: Modifiers::empty(),
        decorators: vec![],
    });
    let class = b.ast.add(NodeData::Class(ClassData {
        name: "Box".to_string(),
        type_params: vec![tp],
        heritage: vec![],
        members: vec![field],
        modifiers: Modifiers::empty(),
        decorators: vec![],
    }));
    let module = b.module(vec![class]);
    assert_dart(&module, "class Box<T> { T value; }");
}
