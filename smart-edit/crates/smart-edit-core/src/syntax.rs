//! Immutable syntax arena lowered from a tree-sitter CST.
//!
//! The resolvers and synthesizers never look at tree-sitter nodes directly.
//! They walk this arena, whose shape is normalized so that the questions
//! they ask ("is this node the call's argument?", "is this the `if`
//! condition?") are answered by a node's [`Role`] instead of by grammar
//! specific wrapper nodes.
//!
//! Lowering rules:
//! - comments are trivia: they are skipped and become part of the next
//!   node's leading trivia (`full_start..start`);
//! - `arguments`, `formal_parameters` and `else_clause` wrappers are hoisted,
//!   their named children become direct children of the call, function or
//!   `if` with roles `Argument`, `Parameter`, `Else`;
//! - the parenthesized condition of `if`/`while`/`do` is unwrapped;
//! - the operator token of a binary expression is kept as an `Operator` node;
//! - string and regex literals are leaves.

use serde::Serialize;
use std::fmt;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node categories the edit engines dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    SourceFile,
    Block,
    SwitchCase,
    ExpressionStatement,
    /// `let`/`const`/`var` statement holding one or more declarations.
    VariableStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    /// Both `for (.. in ..)` and `for (.. of ..)`.
    ForInStatement,
    ReturnStatement,
    FunctionDeclaration,
    /// `export` in front of a declaration, or `export default <expr>`.
    ExportStatement,
    OtherStatement,
    ArrowFunction,
    FunctionExpression,
    /// Methods, constructors and accessors.
    Method,
    /// TypeScript parameter wrapper (`x: number = 1`).
    Parameter,
    CallExpression,
    NewExpression,
    PropertyAccess,
    ElementAccess,
    BinaryExpression,
    ArrayLiteral,
    ObjectLiteral,
    PropertyAssignment,
    Identifier,
    /// Numeric, string, template and regex literals.
    Literal,
    OtherExpression,
    /// Operator token of a binary expression.
    Operator,
    Other,
}

impl NodeKind {
    /// Map a tree-sitter node kind (TypeScript, TSX, JavaScript or JSON grammar).
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "program" | "document" => Self::SourceFile,
            "statement_block" => Self::Block,
            "switch_case" | "switch_default" => Self::SwitchCase,
            "expression_statement" => Self::ExpressionStatement,
            "lexical_declaration" | "variable_declaration" => Self::VariableStatement,
            "variable_declarator" => Self::VariableDeclaration,
            "if_statement" => Self::IfStatement,
            "while_statement" => Self::WhileStatement,
            "do_statement" => Self::DoStatement,
            "for_statement" => Self::ForStatement,
            "for_in_statement" => Self::ForInStatement,
            "return_statement" => Self::ReturnStatement,
            "export_statement" => Self::ExportStatement,
            "function_declaration" | "generator_function_declaration" => {
                Self::FunctionDeclaration
            }
            "arrow_function" => Self::ArrowFunction,
            "function_expression" | "function" | "generator_function" => {
                Self::FunctionExpression
            }
            "method_definition" => Self::Method,
            "required_parameter" | "optional_parameter" => Self::Parameter,
            "call_expression" => Self::CallExpression,
            "new_expression" => Self::NewExpression,
            "member_expression" => Self::PropertyAccess,
            "subscript_expression" => Self::ElementAccess,
            "binary_expression" => Self::BinaryExpression,
            "array" => Self::ArrayLiteral,
            "object" => Self::ObjectLiteral,
            "pair" => Self::PropertyAssignment,
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "private_property_identifier"
            | "this"
            | "super" => Self::Identifier,
            "number" | "string" | "template_string" | "regex" => Self::Literal,
            "assignment_expression"
            | "augmented_assignment_expression"
            | "unary_expression"
            | "update_expression"
            | "ternary_expression"
            | "parenthesized_expression"
            | "sequence_expression"
            | "await_expression"
            | "yield_expression"
            | "as_expression"
            | "satisfies_expression"
            | "non_null_expression"
            | "type_assertion"
            | "spread_element"
            | "class"
            | "jsx_element"
            | "jsx_self_closing_element"
            | "true"
            | "false"
            | "null"
            | "undefined" => Self::OtherExpression,
            "empty_statement" | "class_declaration" | "abstract_class_declaration"
            | "interface_declaration" | "type_alias_declaration" | "enum_declaration"
            | "module" | "internal_module" | "ambient_declaration" => Self::OtherStatement,
            other if other.ends_with("_statement") => Self::OtherStatement,
            _ => Self::Other,
        }
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::ExpressionStatement
                | Self::VariableStatement
                | Self::IfStatement
                | Self::WhileStatement
                | Self::DoStatement
                | Self::ForStatement
                | Self::ForInStatement
                | Self::ReturnStatement
                | Self::FunctionDeclaration
                | Self::ExportStatement
                | Self::OtherStatement
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::ArrowFunction
                | Self::FunctionExpression
                | Self::CallExpression
                | Self::NewExpression
                | Self::PropertyAccess
                | Self::ElementAccess
                | Self::BinaryExpression
                | Self::ArrayLiteral
                | Self::ObjectLiteral
                | Self::Identifier
                | Self::Literal
                | Self::OtherExpression
        )
    }

    /// Nodes owning a delimited sequence of statements.
    pub fn is_block_like(self) -> bool {
        matches!(self, Self::SourceFile | Self::Block | Self::SwitchCase)
    }

    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration | Self::FunctionExpression | Self::ArrowFunction | Self::Method
        )
    }
}

/// What a node is to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Root,
    Statement,
    Parameter,
    Argument,
    Element,
    Declarator,
    /// The declaration carried by an `export` statement.
    Declaration,
    /// The initializer clause of a `for (;;)` header.
    Initializer,
    /// The increment clause of a `for (;;)` header.
    Increment,
    Callee,
    Object,
    Property,
    Index,
    Left,
    Operator,
    Right,
    Condition,
    Then,
    Else,
    Body,
    Key,
    Value,
    Name,
    Operand,
    Other,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    raw_kind: &'static str,
    role: Role,
    start: usize,
    end: usize,
    full_start: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable, arena-allocated syntax tree over one source text.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Lower a tree-sitter tree parsed from `source`.
    pub fn from_tree_sitter(source: impl Into<String>, tree: &tree_sitter::Tree) -> Self {
        let source = source.into();
        let root = tree.root_node();
        let mut lowering = Lowering { nodes: Vec::new() };
        let root_id = lowering.push(Node {
            kind: NodeKind::SourceFile,
            raw_kind: root.kind(),
            role: Role::Root,
            start: root.start_byte().min(source.len()),
            end: source.len(),
            full_start: 0,
            parent: None,
            children: Vec::new(),
        });
        lowering.lower_children(root, root_id, 0, None);

        tracing::trace!(nodes = lowering.nodes.len(), "lowered syntax tree");

        Self {
            source,
            nodes: lowering.nodes,
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Comments and token internals that never become arena nodes.
fn is_trivia(raw: &str) -> bool {
    matches!(
        raw,
        "comment"
            | "html_comment"
            | "hash_bang_line"
            | "string_fragment"
            | "string_content"
            | "escape_sequence"
            | "regex_pattern"
            | "regex_flags"
    )
}

fn is_leaf(raw: &str) -> bool {
    matches!(raw, "string" | "regex" | "number")
}

struct Lowering {
    nodes: Vec<Node>,
}

impl Lowering {
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(parent) = node.parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Lower the children of `ts_parent` into arena node `parent`.
    ///
    /// `base_full_start` is the full start of the first child; `role_override`
    /// is set when `ts_parent` is a hoisted wrapper.
    fn lower_children(
        &mut self,
        ts_parent: tree_sitter::Node<'_>,
        parent: NodeId,
        base_full_start: usize,
        role_override: Option<Role>,
    ) {
        let parent_kind = self.nodes[parent.index()].kind;
        let mut prev_end: Option<usize> = None;
        let mut cursor = ts_parent.walk();
        if !cursor.goto_first_child() {
            return;
        }

        loop {
            let child = cursor.node();
            let field = cursor.field_name();
            let full_start = prev_end.unwrap_or(base_full_start);

            if child.is_extra() {
                // comments stay in the leading trivia of the next sibling
            } else if child.is_named() {
                if !is_trivia(child.kind()) {
                    let role = role_override
                        .unwrap_or_else(|| role_for(parent_kind, ts_parent.kind(), field, &child));
                    match hoisted_role(ts_parent.kind(), field, &child) {
                        Some(hoisted) => {
                            self.lower_children(child, parent, full_start, Some(hoisted));
                        }
                        None => self.lower_node(child, parent, role, full_start),
                    }
                }
                prev_end = Some(child.end_byte());
            } else {
                if field == Some("operator") && parent_kind == NodeKind::BinaryExpression {
                    self.push(Node {
                        kind: NodeKind::Operator,
                        raw_kind: child.kind(),
                        role: Role::Operator,
                        start: child.start_byte(),
                        end: child.end_byte(),
                        full_start,
                        parent: Some(parent),
                        children: Vec::new(),
                    });
                }
                prev_end = Some(child.end_byte());
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn lower_node(
        &mut self,
        ts_node: tree_sitter::Node<'_>,
        parent: NodeId,
        role: Role,
        full_start: usize,
    ) {
        let raw_kind = ts_node.kind();
        let id = self.push(Node {
            kind: NodeKind::from_raw(raw_kind),
            raw_kind,
            role,
            start: ts_node.start_byte(),
            end: ts_node.end_byte(),
            full_start: full_start.min(ts_node.start_byte()),
            parent: Some(parent),
            children: Vec::new(),
        });
        if !is_leaf(raw_kind) {
            self.lower_children(ts_node, id, full_start, None);
        }
    }
}

/// Role the children of a hoisted wrapper take, or `None` if `child` is kept.
fn hoisted_role(parent_raw: &str, field: Option<&str>, child: &tree_sitter::Node<'_>) -> Option<Role> {
    match child.kind() {
        "arguments" => Some(Role::Argument),
        "formal_parameters" => Some(Role::Parameter),
        "else_clause" => Some(Role::Else),
        "parenthesized_expression"
            if field == Some("condition")
                && matches!(parent_raw, "if_statement" | "while_statement" | "do_statement") =>
        {
            Some(Role::Condition)
        }
        _ => None,
    }
}

fn role_for(
    parent_kind: NodeKind,
    parent_raw: &str,
    field: Option<&str>,
    child: &tree_sitter::Node<'_>,
) -> Role {
    match field {
        Some("body") if parent_kind == NodeKind::SwitchCase => Role::Statement,
        Some("body") => Role::Body,
        Some("parameter") => Role::Parameter,
        Some("declaration") if parent_raw == "export_statement" => Role::Declaration,
        Some("initializer") if parent_kind == NodeKind::ForStatement => Role::Initializer,
        Some("increment") => Role::Increment,
        Some("function") | Some("constructor") => Role::Callee,
        Some("object") => Role::Object,
        Some("property") => Role::Property,
        Some("index") => Role::Index,
        Some("left") => Role::Left,
        Some("right") => Role::Right,
        Some("condition") => Role::Condition,
        Some("consequence") => Role::Then,
        Some("key") => Role::Key,
        Some("value") if parent_raw != "switch_case" => Role::Value,
        Some("name") | Some("pattern") => Role::Name,
        Some(_) => Role::Other,
        None => match parent_kind {
            NodeKind::SourceFile | NodeKind::Block => Role::Statement,
            NodeKind::ArrayLiteral => Role::Element,
            NodeKind::VariableStatement if child.kind() == "variable_declarator" => {
                Role::Declarator
            }
            NodeKind::ReturnStatement => Role::Operand,
            _ => Role::Other,
        },
    }
}

/// A cheap, copyable view of one node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    fn data(&self) -> &'t Node {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &'t str {
        &self.tree.source
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// The tree-sitter kind this node was lowered from.
    pub fn raw_kind(&self) -> &'static str {
        self.data().raw_kind
    }

    pub fn role(&self) -> Role {
        self.data().role
    }

    /// Offset of the first significant character.
    pub fn start(&self) -> usize {
        self.data().start
    }

    pub fn end(&self) -> usize {
        self.data().end
    }

    /// Offset including leading whitespace and comments.
    pub fn full_start(&self) -> usize {
        self.data().full_start
    }

    pub fn text(&self) -> &'t str {
        &self.tree.source[self.start()..self.end()]
    }

    pub fn full_text(&self) -> &'t str {
        &self.tree.source[self.full_start()..self.end()]
    }

    /// Spaces and tabs immediately before the node's significant text.
    pub fn leading_whitespace(&self) -> &'t str {
        let trivia = &self.tree.source[self.full_start()..self.start()];
        let kept = trivia.trim_end_matches([' ', '\t']).len();
        &trivia[kept..]
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    /// First child playing `role`.
    pub fn child(&self, role: Role) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.role() == role)
    }

    pub fn children_with(&self, role: Role) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children().filter(move |c| c.role() == role)
    }

    pub fn is_statement(&self) -> bool {
        self.kind().is_statement()
    }

    pub fn is_expression(&self) -> bool {
        self.kind().is_expression()
    }

    /// A parameter declaration, or a bare pattern in a parameter list.
    pub fn is_parameter(&self) -> bool {
        self.kind() == NodeKind::Parameter || self.role() == Role::Parameter
    }

    pub fn is_block_like(&self) -> bool {
        self.kind().is_block_like()
    }

    /// A statement standing on its own: an item of a statement list or the
    /// body of a compound statement. Declarations under `export` and the
    /// clauses of a `for (;;)` header are statements only to the grammar.
    pub fn in_statement_position(&self) -> bool {
        matches!(self.role(), Role::Statement | Role::Then | Role::Else | Role::Body)
            || self.parent().is_some_and(|parent| parent.is_block_like())
    }

    pub fn is_function_like(&self) -> bool {
        self.kind().is_function_like()
    }

    /// Closed-interval containment of a single offset.
    pub fn contains(&self, offset: usize) -> bool {
        self.start() <= offset && offset <= self.end()
    }

    /// True if `[start, end]` lies within this node.
    pub fn covers(&self, start: usize, end: usize) -> bool {
        self.start() <= start && end <= self.end()
    }

    /// True if this node lies within `[start, end]`.
    pub fn within(&self, start: usize, end: usize) -> bool {
        start <= self.start() && self.end() <= end
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({}) [{}..{}) {:?}",
            self.kind(),
            self.raw_kind(),
            self.start(),
            self.end(),
            self.text()
        )
    }
}
