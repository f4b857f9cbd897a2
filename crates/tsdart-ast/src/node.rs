//! Node payloads.
//!
//! One `NodeData` variant per syntactic category. Child references are
//! `NodeId`s into the owning arena; `child_ids` enumerates them in source
//! order, which the arena uses to fill parent links and the engine uses for
//! whole-file scans.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::arena::NodeId;
use crate::kind::{
    BinaryOp, HeritageKind, PostfixOp, SyntaxKind, TypeKeyword, UnaryOp, VarKeyword,
};

bitflags! {
    /// Declaration modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Modifiers: u16 {
        const EXPORT = 1 << 0;
        const STATIC = 1 << 1;
        const ABSTRACT = 1 << 2;
        const PUBLIC = 1 << 3;
        const PRIVATE = 1 << 4;
        const PROTECTED = 1 << 5;
    }
}

/// Parameter visibility marker (constructor-parameter property shorthand).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

/// A leading comment attached to a node by the front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Byte offset of the comment start in the original source.
    pub pos: u32,
    /// Full comment text including delimiters.
    pub text: String,
}

/// Object-literal property key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    StringKey(String),
    NumericKey(String),
    Computed(NodeId),
}

/// Shared payload of every function-like declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: Option<String>,
    pub type_params: Vec<NodeId>,
    pub params: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub body: Option<NodeId>,
    pub modifiers: Modifiers,
    pub decorators: Vec<NodeId>,
}

/// Shared payload of classes and interfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassData {
    pub name: String,
    pub type_params: Vec<NodeId>,
    pub heritage: Vec<NodeId>,
    pub members: Vec<NodeId>,
    pub modifiers: Modifiers,
    pub decorators: Vec<NodeId>,
}

/// Parameter payload. `name` is an `Identifier` or an `ObjectBindingPattern`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamData {
    pub name: NodeId,
    pub ty: Option<NodeId>,
    pub initializer: Option<NodeId>,
    pub optional: bool,
    pub rest: bool,
    pub visibility: Option<Visibility>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeData {
    // ==================== Module structure ====================
    SourceFile {
        statements: Vec<NodeId>,
    },
    ImportDecl {
        /// Module specifier as written (`./foo`, `pkg/mod`).
        module: String,
        /// `import * as ns` binding, if any.
        namespace: Option<String>,
        named: Vec<NodeId>,
    },
    ImportSpecifier {
        name: String,
        alias: Option<String>,
    },
    ExportDecl {
        module: Option<String>,
        /// `export * from ...`.
        wildcard: bool,
        named: Vec<NodeId>,
    },
    ExportSpecifier {
        name: String,
        alias: Option<String>,
    },

    // ==================== Declarations ====================
    VariableStatement {
        list: NodeId,
        modifiers: Modifiers,
    },
    VarList {
        keyword: VarKeyword,
        declarations: Vec<NodeId>,
    },
    VarDecl {
        name: String,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    FunctionDecl(FunctionData),
    FunctionExpr(FunctionData),
    ArrowFunction(FunctionData),
    Class(ClassData),
    Interface(ClassData),
    Enum {
        name: String,
        members: Vec<NodeId>,
        is_const: bool,
        modifiers: Modifiers,
    },
    EnumMember {
        name: String,
        initializer: Option<NodeId>,
    },
    Constructor(FunctionData),
    Method(FunctionData),
    GetAccessor(FunctionData),
    SetAccessor(FunctionData),
    PropertyDecl {
        name: String,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
        modifiers: Modifiers,
        decorators: Vec<NodeId>,
    },
    Param(ParamData),
    TypeParam {
        name: String,
        constraint: Option<NodeId>,
    },
    Decorator {
        expr: NodeId,
    },
    HeritageClause {
        keyword: HeritageKind,
        types: Vec<NodeId>,
    },
    ObjectBindingPattern {
        elements: Vec<NodeId>,
    },
    BindingElement {
        name: String,
        initializer: Option<NodeId>,
    },

    // ==================== Statements ====================
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStmt {
        expr: NodeId,
    },
    IfStmt {
        cond: NodeId,
        then: NodeId,
        else_: Option<NodeId>,
    },
    ForStmt {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForInStmt {
        initializer: NodeId,
        expr: NodeId,
        body: NodeId,
    },
    ForOfStmt {
        initializer: NodeId,
        expr: NodeId,
        body: NodeId,
    },
    WhileStmt {
        cond: NodeId,
        body: NodeId,
    },
    DoStmt {
        body: NodeId,
        cond: NodeId,
    },
    ReturnStmt {
        expr: Option<NodeId>,
    },
    BreakStmt {
        label: Option<String>,
    },
    ContinueStmt {
        label: Option<String>,
    },
    ThrowStmt {
        expr: NodeId,
    },
    TryStmt {
        block: NodeId,
        catch: Option<NodeId>,
        finally: Option<NodeId>,
    },
    CatchClause {
        binding: Option<String>,
        block: NodeId,
    },
    SwitchStmt {
        expr: NodeId,
        cases: Vec<NodeId>,
    },
    CaseClause {
        /// `None` for the `default` clause.
        expr: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    LabeledStmt {
        label: String,
        stmt: NodeId,
    },
    EmptyStmt,

    // ==================== Expressions ====================
    Identifier {
        text: String,
    },
    PropertyAccess {
        object: NodeId,
        name: String,
    },
    ElementAccess {
        object: NodeId,
        index: NodeId,
    },
    Call {
        callee: NodeId,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    New {
        callee: NodeId,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    PrefixUnary {
        op: UnaryOp,
        operand: NodeId,
    },
    PostfixUnary {
        op: PostfixOp,
        operand: NodeId,
    },
    Conditional {
        cond: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    Paren {
        expr: NodeId,
    },
    ObjectLiteral {
        properties: Vec<NodeId>,
    },
    PropertyAssignment {
        key: PropertyKey,
        value: NodeId,
    },
    ShorthandProperty {
        name: String,
    },
    ArrayLiteral {
        elements: Vec<NodeId>,
    },
    SpreadElement {
        expr: NodeId,
    },
    TypeAssertion {
        ty: NodeId,
        expr: NodeId,
    },
    This,
    Super,

    // ==================== Literals ====================
    StringLiteral {
        value: String,
    },
    TemplateLiteral {
        value: String,
    },
    TemplateExpression {
        head: String,
        spans: Vec<NodeId>,
    },
    TemplateSpan {
        expr: NodeId,
        literal: String,
    },
    NumericLiteral {
        text: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    RegexLiteral {
        pattern: String,
        flags: String,
    },

    // ==================== Types ====================
    KeywordType {
        keyword: TypeKeyword,
    },
    TypeRef {
        name: String,
        type_args: Vec<NodeId>,
    },
    ArrayType {
        element: NodeId,
    },
    TypeLiteral {
        members: Vec<NodeId>,
    },
    IndexSignature {
        param_name: String,
        key_type: NodeId,
        value_type: NodeId,
    },
    PropertySignature {
        name: String,
        ty: Option<NodeId>,
        optional: bool,
    },
    MethodSignature {
        name: String,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
    },
    UnionType {
        types: Vec<NodeId>,
    },
    FunctionType {
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
    },
}

impl NodeData {
    /// The dispatch tag of this payload.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeData::SourceFile { .. } => SyntaxKind::SourceFile,
            NodeData::ImportDecl { .. } => SyntaxKind::ImportDecl,
            NodeData::ImportSpecifier { .. } => SyntaxKind::ImportSpecifier,
            NodeData::ExportDecl { .. } => SyntaxKind::ExportDecl,
            NodeData::ExportSpecifier { .. } => SyntaxKind::ExportSpecifier,
            NodeData::VariableStatement { .. } => SyntaxKind::VariableStatement,
            NodeData::VarList { .. } => SyntaxKind::VarList,
            NodeData::VarDecl { .. } => SyntaxKind::VarDecl,
            NodeData::FunctionDecl(_) => SyntaxKind::FunctionDecl,
            NodeData::FunctionExpr(_) => SyntaxKind::FunctionExpr,
            NodeData::ArrowFunction(_) => SyntaxKind::ArrowFunction,
            NodeData::Class(_) => SyntaxKind::Class,
            NodeData::Interface(_) => SyntaxKind::Interface,
            NodeData::Enum { .. } => SyntaxKind::Enum,
            NodeData::EnumMember { .. } => SyntaxKind::EnumMember,
            NodeData::Constructor(_) => SyntaxKind::Constructor,
            NodeData::Method(_) => SyntaxKind::Method,
            NodeData::GetAccessor(_) => SyntaxKind::GetAccessor,
            NodeData::SetAccessor(_) => SyntaxKind::SetAccessor,
            NodeData::PropertyDecl { .. } => SyntaxKind::PropertyDecl,
            NodeData::Param(_) => SyntaxKind::Param,
            NodeData::TypeParam { .. } => SyntaxKind::TypeParam,
            NodeData::Decorator { .. } => SyntaxKind::Decorator,
            NodeData::HeritageClause { .. } => SyntaxKind::HeritageClause,
            NodeData::ObjectBindingPattern { .. } => SyntaxKind::ObjectBindingPattern,
            NodeData::BindingElement { .. } => SyntaxKind::BindingElement,
            NodeData::Block { .. } => SyntaxKind::Block,
            NodeData::ExpressionStmt { .. } => SyntaxKind::ExpressionStmt,
            NodeData::IfStmt { .. } => SyntaxKind::IfStmt,
            NodeData::ForStmt { .. } => SyntaxKind::ForStmt,
            NodeData::ForInStmt { .. } => SyntaxKind::ForInStmt,
            NodeData::ForOfStmt { .. } => SyntaxKind::ForOfStmt,
            NodeData::WhileStmt { .. } => SyntaxKind::WhileStmt,
            NodeData::DoStmt { .. } => SyntaxKind::DoStmt,
            NodeData::ReturnStmt { .. } => SyntaxKind::ReturnStmt,
            NodeData::BreakStmt { .. } => SyntaxKind::BreakStmt,
            NodeData::ContinueStmt { .. } => SyntaxKind::ContinueStmt,
            NodeData::ThrowStmt { .. } => SyntaxKind::ThrowStmt,
            NodeData::TryStmt { .. } => SyntaxKind::TryStmt,
            NodeData::CatchClause { .. } => SyntaxKind::CatchClause,
            NodeData::SwitchStmt { .. } => SyntaxKind::SwitchStmt,
            NodeData::CaseClause { .. } => SyntaxKind::CaseClause,
            NodeData::LabeledStmt { .. } => SyntaxKind::LabeledStmt,
            NodeData::EmptyStmt => SyntaxKind::EmptyStmt,
            NodeData::Identifier { .. } => SyntaxKind::Identifier,
            NodeData::PropertyAccess { .. } => SyntaxKind::PropertyAccess,
            NodeData::ElementAccess { .. } => SyntaxKind::ElementAccess,
            NodeData::Call { .. } => SyntaxKind::Call,
            NodeData::New { .. } => SyntaxKind::New,
            NodeData::Binary { .. } => SyntaxKind::Binary,
            NodeData::PrefixUnary { .. } => SyntaxKind::PrefixUnary,
            NodeData::PostfixUnary { .. } => SyntaxKind::PostfixUnary,
            NodeData::Conditional { .. } => SyntaxKind::Conditional,
            NodeData::Paren { .. } => SyntaxKind::Paren,
            NodeData::ObjectLiteral { .. } => SyntaxKind::ObjectLiteral,
            NodeData::PropertyAssignment { .. } => SyntaxKind::PropertyAssignment,
            NodeData::ShorthandProperty { .. } => SyntaxKind::ShorthandProperty,
            NodeData::ArrayLiteral { .. } => SyntaxKind::ArrayLiteral,
            NodeData::SpreadElement { .. } => SyntaxKind::SpreadElement,
            NodeData::TypeAssertion { .. } => SyntaxKind::TypeAssertion,
            NodeData::This => SyntaxKind::This,
            NodeData::Super => SyntaxKind::Super,
            NodeData::StringLiteral { .. } => SyntaxKind::StringLiteral,
            NodeData::TemplateLiteral { .. } => SyntaxKind::TemplateLiteral,
            NodeData::TemplateExpression { .. } => SyntaxKind::TemplateExpression,
            NodeData::TemplateSpan { .. } => SyntaxKind::TemplateSpan,
            NodeData::NumericLiteral { .. } => SyntaxKind::NumericLiteral,
            NodeData::BooleanLiteral { .. } => SyntaxKind::BooleanLiteral,
            NodeData::NullLiteral => SyntaxKind::NullLiteral,
            NodeData::RegexLiteral { .. } => SyntaxKind::RegexLiteral,
            NodeData::KeywordType { .. } => SyntaxKind::KeywordType,
            NodeData::TypeRef { .. } => SyntaxKind::TypeRef,
            NodeData::ArrayType { .. } => SyntaxKind::ArrayType,
            NodeData::TypeLiteral { .. } => SyntaxKind::TypeLiteral,
            NodeData::IndexSignature { .. } => SyntaxKind::IndexSignature,
            NodeData::PropertySignature { .. } => SyntaxKind::PropertySignature,
            NodeData::MethodSignature { .. } => SyntaxKind::MethodSignature,
            NodeData::UnionType { .. } => SyntaxKind::UnionType,
            NodeData::FunctionType { .. } => SyntaxKind::FunctionType,
        }
    }

    /// Child node ids in source order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<NodeId> {
        fn fun(data: &FunctionData) -> Vec<NodeId> {
            let mut out = data.decorators.clone();
            out.extend(&data.type_params);
            out.extend(&data.params);
            out.extend(data.return_type);
            out.extend(data.body);
            out
        }
        fn class(data: &ClassData) -> Vec<NodeId> {
            let mut out = data.decorators.clone();
            out.extend(&data.type_params);
            out.extend(&data.heritage);
            out.extend(&data.members);
            out
        }

        match self {
            NodeData::SourceFile { statements }
            | NodeData::Block { statements }
            | NodeData::CaseClause {
                statements,
                expr: None,
            } => statements.clone(),
            NodeData::CaseClause {
                expr: Some(e),
                statements,
            } => {
                let mut out = vec![*e];
                out.extend(statements);
                out
            }
            NodeData::ImportDecl { named, .. } | NodeData::ExportDecl { named, .. } => {
                named.clone()
            }
            NodeData::ImportSpecifier { .. }
            | NodeData::ExportSpecifier { .. }
            | NodeData::ShorthandProperty { .. }
            | NodeData::Identifier { .. }
            | NodeData::This
            | NodeData::Super
            | NodeData::StringLiteral { .. }
            | NodeData::TemplateLiteral { .. }
            | NodeData::NumericLiteral { .. }
            | NodeData::BooleanLiteral { .. }
            | NodeData::NullLiteral
            | NodeData::RegexLiteral { .. }
            | NodeData::KeywordType { .. }
            | NodeData::EmptyStmt
            | NodeData::BreakStmt { .. }
            | NodeData::ContinueStmt { .. } => Vec::new(),
            NodeData::VariableStatement { list, .. } => vec![*list],
            NodeData::VarList { declarations, .. } => declarations.clone(),
            NodeData::VarDecl {
                ty, initializer, ..
            } => ty.iter().chain(initializer.iter()).copied().collect(),
            NodeData::FunctionDecl(f)
            | NodeData::FunctionExpr(f)
            | NodeData::ArrowFunction(f)
            | NodeData::Constructor(f)
            | NodeData::Method(f)
            | NodeData::GetAccessor(f)
            | NodeData::SetAccessor(f) => fun(f),
            NodeData::Class(c) | NodeData::Interface(c) => class(c),
            NodeData::Enum { members, .. } => members.clone(),
            NodeData::EnumMember { initializer, .. } => initializer.iter().copied().collect(),
            NodeData::PropertyDecl {
                ty,
                initializer,
                decorators,
                ..
            } => {
                let mut out = decorators.clone();
                out.extend(ty);
                out.extend(initializer);
                out
            }
            NodeData::Param(p) => {
                let mut out = vec![p.name];
                out.extend(p.ty);
                out.extend(p.initializer);
                out
            }
            NodeData::TypeParam { constraint, .. } => constraint.iter().copied().collect(),
            NodeData::Decorator { expr }
            | NodeData::ExpressionStmt { expr }
            | NodeData::ThrowStmt { expr }
            | NodeData::SpreadElement { expr }
            | NodeData::Paren { expr } => vec![*expr],
            NodeData::HeritageClause { types, .. } | NodeData::UnionType { types } => types.clone(),
            NodeData::ObjectBindingPattern { elements } => elements.clone(),
            NodeData::BindingElement { initializer, .. } => initializer.iter().copied().collect(),
            NodeData::IfStmt { cond, then, else_ } => {
                let mut out = vec![*cond, *then];
                out.extend(else_);
                out
            }
            NodeData::ForStmt {
                init,
                cond,
                update,
                body,
            } => {
                let mut out = Vec::new();
                out.extend(init);
                out.extend(cond);
                out.extend(update);
                out.push(*body);
                out
            }
            NodeData::ForInStmt {
                initializer,
                expr,
                body,
            }
            | NodeData::ForOfStmt {
                initializer,
                expr,
                body,
            } => vec![*initializer, *expr, *body],
            NodeData::WhileStmt { cond, body } => vec![*cond, *body],
            NodeData::DoStmt { body, cond } => vec![*body, *cond],
            NodeData::ReturnStmt { expr } => expr.iter().copied().collect(),
            NodeData::TryStmt {
                block,
                catch,
                finally,
            } => {
                let mut out = vec![*block];
                out.extend(catch);
                out.extend(finally);
                out
            }
            NodeData::CatchClause { block, .. } => vec![*block],
            NodeData::SwitchStmt { expr, cases } => {
                let mut out = vec![*expr];
                out.extend(cases);
                out
            }
            NodeData::LabeledStmt { stmt, .. } => vec![*stmt],
            NodeData::PropertyAccess { object, .. } => vec![*object],
            NodeData::ElementAccess { object, index } => vec![*object, *index],
            NodeData::Call {
                callee,
                type_args,
                args,
            }
            | NodeData::New {
                callee,
                type_args,
                args,
            } => {
                let mut out = vec![*callee];
                out.extend(type_args);
                out.extend(args);
                out
            }
            NodeData::Binary { left, right, .. } => vec![*left, *right],
            NodeData::PrefixUnary { operand, .. } | NodeData::PostfixUnary { operand, .. } => {
                vec![*operand]
            }
            NodeData::Conditional {
                cond,
                when_true,
                when_false,
            } => vec![*cond, *when_true, *when_false],
            NodeData::ObjectLiteral { properties } => properties.clone(),
            NodeData::PropertyAssignment { key, value } => match key {
                PropertyKey::Computed(k) => vec![*k, *value],
                _ => vec![*value],
            },
            NodeData::ArrayLiteral { elements } => elements.clone(),
            NodeData::TypeAssertion { ty, expr } => vec![*ty, *expr],
            NodeData::TemplateExpression { spans, .. } => spans.clone(),
            NodeData::TemplateSpan { expr, .. } => vec![*expr],
            NodeData::TypeRef { type_args, .. } => type_args.clone(),
            NodeData::ArrayType { element } => vec![*element],
            NodeData::TypeLiteral { members } => members.clone(),
            NodeData::IndexSignature {
                key_type,
                value_type,
                ..
            } => vec![*key_type, *value_type],
            NodeData::PropertySignature { ty, .. } => ty.iter().copied().collect(),
            NodeData::MethodSignature {
                params,
                return_type,
                ..
            }
            | NodeData::FunctionType {
                params,
                return_type,
            } => {
                let mut out = params.clone();
                out.extend(return_type);
                out
            }
        }
    }
}
