//! Java declaration extractor.
//!
//! Extracts: class_declaration, interface_declaration, enum_declaration and
//! their method_declaration, constructor_declaration, field_declaration and
//! constant_declaration members. Local classes inside member bodies are
//! included; anonymous class bodies are not entered.

use std::path::Path;

use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser, Tree};

use super::{node_text, Declaration, DeclarationKind, LineRange, Member, MemberKind, ParsedFile};
use crate::config::RangeStrategy;
use crate::error::{Result, SearchError};
use crate::indexer::skeleton::render_skeleton;
use crate::indexer::source::read_source;

/// Heuristic spans, counted from a member's name line.
const METHOD_WITH_BODY_SPAN: usize = 20;
const CONSTRUCTOR_SPAN: usize = 10;
const BODILESS_METHOD_SPAN: usize = 10;
const INTERFACE_METHOD_SPAN: usize = 5;

/// The node categories the extractor and skeleton renderer act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JavaNode {
    Package,
    Import,
    Type(DeclarationKind),
    /// Annotation types bound their parent's range but are not indexed
    OtherType,
    Method,
    Constructor,
    /// Field declarations, and constant declarations inside interfaces
    Field,
    EnumConstant,
    EnumBodyDeclarations,
    /// Instance and static initializer blocks
    Initializer,
    /// A class body reached outside a declaration, i.e. an anonymous class
    ClassBody,
    Modifiers,
    Parameter,
    SpreadParameter,
    Throws,
    Other,
}

/// Grammar ids of the node kinds classified by [`JavaNode`], resolved once.
#[derive(Debug, Clone)]
pub struct NodeKinds {
    package: u16,
    import: u16,
    class: u16,
    interface: u16,
    enumeration: u16,
    record: u16,
    annotation_type: u16,
    method: u16,
    constructor: u16,
    compact_constructor: u16,
    field: u16,
    constant: u16,
    enum_constant: u16,
    enum_body_declarations: u16,
    block: u16,
    static_initializer: u16,
    class_body: u16,
    modifiers: u16,
    formal_parameter: u16,
    spread_parameter: u16,
    throws: u16,
}

impl NodeKinds {
    pub fn new(language: &Language) -> Self {
        let id = |kind: &str| language.id_for_node_kind(kind, true);
        Self {
            package: id("package_declaration"),
            import: id("import_declaration"),
            class: id("class_declaration"),
            interface: id("interface_declaration"),
            enumeration: id("enum_declaration"),
            record: id("record_declaration"),
            annotation_type: id("annotation_type_declaration"),
            method: id("method_declaration"),
            constructor: id("constructor_declaration"),
            compact_constructor: id("compact_constructor_declaration"),
            field: id("field_declaration"),
            constant: id("constant_declaration"),
            enum_constant: id("enum_constant"),
            enum_body_declarations: id("enum_body_declarations"),
            block: id("block"),
            static_initializer: id("static_initializer"),
            class_body: id("class_body"),
            modifiers: id("modifiers"),
            formal_parameter: id("formal_parameter"),
            spread_parameter: id("spread_parameter"),
            throws: id("throws"),
        }
    }

    pub fn classify(&self, node: &Node) -> JavaNode {
        let id = node.kind_id();
        if id == self.package {
            JavaNode::Package
        } else if id == self.import {
            JavaNode::Import
        } else if id == self.class {
            JavaNode::Type(DeclarationKind::Class)
        } else if id == self.interface {
            JavaNode::Type(DeclarationKind::Interface)
        } else if id == self.enumeration {
            JavaNode::Type(DeclarationKind::Enum)
        } else if id == self.record {
            // Records index as classes; their compact constructors as constructors
            JavaNode::Type(DeclarationKind::Class)
        } else if id == self.annotation_type {
            JavaNode::OtherType
        } else if id == self.method {
            JavaNode::Method
        } else if id == self.constructor || id == self.compact_constructor {
            JavaNode::Constructor
        } else if id == self.field || id == self.constant {
            JavaNode::Field
        } else if id == self.enum_constant {
            JavaNode::EnumConstant
        } else if id == self.enum_body_declarations {
            JavaNode::EnumBodyDeclarations
        } else if id == self.block || id == self.static_initializer {
            JavaNode::Initializer
        } else if id == self.class_body {
            JavaNode::ClassBody
        } else if id == self.modifiers {
            JavaNode::Modifiers
        } else if id == self.formal_parameter {
            JavaNode::Parameter
        } else if id == self.spread_parameter {
            JavaNode::SpreadParameter
        } else if id == self.throws {
            JavaNode::Throws
        } else {
            JavaNode::Other
        }
    }
}

/// A clean parse together with the exact text it was produced from.
pub struct SyntaxTree {
    pub tree: Tree,
    pub source: String,
    /// Package and import lines were blanked to get a clean parse
    pub recovered: bool,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Number of lines in the source, at least 1.
    pub fn line_count(&self) -> usize {
        self.source.lines().count().max(1)
    }
}

/// Java language declaration extractor.
///
/// Owns a parser, so each worker thread needs its own instance.
pub struct JavaExtractor {
    parser: Parser,
    kinds: NodeKinds,
    strategy: RangeStrategy,
}

impl JavaExtractor {
    pub fn new(strategy: RangeStrategy) -> Result<Self> {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;

        Ok(Self {
            parser,
            kinds: NodeKinds::new(&language),
            strategy,
        })
    }

    pub fn kinds(&self) -> &NodeKinds {
        &self.kinds
    }

    /// Parse source text, retrying once with package and import lines blanked.
    ///
    /// Returns `None` when neither attempt produces an error-free tree.
    pub fn parse_source(&mut self, source: String) -> Option<SyntaxTree> {
        if let Some(tree) = self.parse_clean(&source) {
            return Some(SyntaxTree {
                tree,
                source,
                recovered: false,
            });
        }

        let stripped = blank_header_lines(&source);
        self.parse_clean(&stripped).map(|tree| SyntaxTree {
            tree,
            source: stripped,
            recovered: true,
        })
    }

    fn parse_clean(&mut self, source: &str) -> Option<Tree> {
        let tree = self.parser.parse(source, None)?;
        if tree.root_node().has_error() {
            None
        } else {
            Some(tree)
        }
    }

    /// Read and parse a file into a syntax tree.
    pub fn parse_file(&mut self, path: &Path) -> Result<SyntaxTree> {
        let source = read_source(path)?;
        let syntax = self
            .parse_source(source)
            .ok_or_else(|| SearchError::Parse(path.to_path_buf()))?;

        if syntax.recovered {
            debug!("Parsed {} after blanking package/import lines", path.display());
        }

        Ok(syntax)
    }

    /// Read, parse and extract declarations from a file.
    pub fn extract_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let syntax = self.parse_file(path)?;
        Ok(self.extract(path, &syntax))
    }

    /// Like [`extract_file`](Self::extract_file), logging and discarding the error.
    pub fn parse(&mut self, path: &Path) -> Option<ParsedFile> {
        match self.extract_file(path) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Read, parse and render the signature-only view of a file.
    pub fn skeleton(&mut self, path: &Path) -> Result<String> {
        let syntax = self.parse_file(path)?;
        Ok(render_skeleton(&syntax, &self.kinds))
    }

    /// Extract declarations from an already parsed tree.
    pub fn extract(&self, path: &Path, syntax: &SyntaxTree) -> ParsedFile {
        let mut visitor = DeclarationVisitor {
            kinds: &self.kinds,
            strategy: self.strategy,
            source: syntax.bytes(),
            last_line: syntax.line_count(),
            parsed: ParsedFile::new(path.to_path_buf()),
        };
        visitor.visit_scope(syntax.root());
        visitor.parsed
    }
}

/// Replace every `package`/`import` line with an empty one, keeping line numbers.
fn blank_header_lines(source: &str) -> String {
    source
        .split_inclusive('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("package ") || trimmed.starts_with("import ") {
                if line.ends_with("\r\n") {
                    "\r\n"
                } else if line.ends_with('\n') {
                    "\n"
                } else {
                    ""
                }
            } else {
                line
            }
        })
        .collect()
}

fn start_line(node: &Node) -> usize {
    node.start_position().row + 1
}

fn node_range(node: &Node) -> LineRange {
    LineRange::new(start_line(node), node.end_position().row + 1)
}

/// Line of the node's `name` token, falling back to the node's own start.
fn name_line(node: &Node) -> usize {
    node.child_by_field_name("name")
        .map(|name| start_line(&name))
        .unwrap_or_else(|| start_line(node))
}

struct DeclarationVisitor<'a> {
    kinds: &'a NodeKinds,
    strategy: RangeStrategy,
    source: &'a [u8],
    last_line: usize,
    parsed: ParsedFile,
}

impl DeclarationVisitor<'_> {
    fn name_of(&self, node: &Node) -> Option<String> {
        node.child_by_field_name("name")
            .map(|n| node_text(&n, self.source).to_string())
    }

    /// Find type declarations below `node` without entering anonymous class bodies.
    fn visit_scope(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match self.kinds.classify(&child) {
                JavaNode::Type(kind) => self.visit_declaration(child, kind),
                JavaNode::ClassBody => {}
                JavaNode::Package
                | JavaNode::Import
                | JavaNode::OtherType
                | JavaNode::Method
                | JavaNode::Constructor
                | JavaNode::Field
                | JavaNode::EnumConstant
                | JavaNode::EnumBodyDeclarations
                | JavaNode::Initializer
                | JavaNode::Parameter
                | JavaNode::SpreadParameter
                | JavaNode::Other => self.visit_scope(child),
                JavaNode::Modifiers | JavaNode::Throws => {}
            }
        }
    }

    fn visit_declaration(&mut self, node: Node, kind: DeclarationKind) {
        let Some(name) = self.name_of(&node) else {
            return;
        };
        let start = name_line(&node);

        // Reserve the slot so nested declarations follow their parent
        let index = self.parsed.declarations.len();
        self.parsed.declarations.push(Declaration {
            name: name.clone(),
            kind,
            range: LineRange::new(start, start),
        });
        self.parsed.members.entry(name.clone()).or_default();

        let last_member = node
            .child_by_field_name("body")
            .and_then(|body| self.visit_body(body, &name, kind));

        let range = match self.strategy {
            RangeStrategy::Heuristic => LineRange::new(start, last_member.unwrap_or(self.last_line)),
            RangeStrategy::Exact => node_range(&node),
        };
        self.parsed.declarations[index].range = range;
    }

    /// Visit the direct members of a type body, returning the greatest member start line.
    fn visit_body(&mut self, body: Node, owner: &str, container: DeclarationKind) -> Option<usize> {
        let mut last = None;
        let mut cursor = body.walk();

        for child in body.named_children(&mut cursor) {
            let line = match self.kinds.classify(&child) {
                JavaNode::Method => {
                    Some(self.visit_callable(child, owner, MemberKind::Method, container))
                }
                JavaNode::Constructor => {
                    Some(self.visit_callable(child, owner, MemberKind::Constructor, container))
                }
                JavaNode::Field => Some(self.visit_field(child, owner)),
                JavaNode::Type(kind) => {
                    self.visit_declaration(child, kind);
                    Some(name_line(&child))
                }
                JavaNode::OtherType | JavaNode::EnumConstant => Some(name_line(&child)),
                JavaNode::Initializer => {
                    self.visit_scope(child);
                    Some(start_line(&child))
                }
                JavaNode::EnumBodyDeclarations => self.visit_body(child, owner, container),
                JavaNode::Package
                | JavaNode::Import
                | JavaNode::ClassBody
                | JavaNode::Modifiers
                | JavaNode::Parameter
                | JavaNode::SpreadParameter
                | JavaNode::Throws
                | JavaNode::Other => None,
            };
            last = last.max(line);
        }

        last
    }

    fn visit_callable(
        &mut self,
        node: Node,
        owner: &str,
        kind: MemberKind,
        container: DeclarationKind,
    ) -> usize {
        let start = name_line(&node);
        let body = node.child_by_field_name("body");

        let range = match self.strategy {
            RangeStrategy::Heuristic => {
                let span = match kind {
                    MemberKind::Constructor => CONSTRUCTOR_SPAN,
                    _ if body.is_some() => METHOD_WITH_BODY_SPAN,
                    _ if container == DeclarationKind::Interface => INTERFACE_METHOD_SPAN,
                    _ => BODILESS_METHOD_SPAN,
                };
                LineRange::new(start, start + span)
            }
            RangeStrategy::Exact => node_range(&node),
        };

        if let Some(name) = self.name_of(&node) {
            self.push_member(owner, Member { name, kind, range });
        }

        if let Some(body) = body {
            self.visit_scope(body);
        }

        start
    }

    /// Record one member per declarator; returns the first declarator's line.
    fn visit_field(&mut self, node: Node, owner: &str) -> usize {
        let mut first = None;
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node.children_by_field_name("declarator", &mut cursor).collect();

        for declarator in declarators {
            let line = name_line(&declarator);
            first.get_or_insert(line);

            let range = match self.strategy {
                RangeStrategy::Heuristic => LineRange::new(line, line),
                RangeStrategy::Exact => node_range(&node),
            };
            if let Some(name) = self.name_of(&declarator) {
                self.push_member(
                    owner,
                    Member {
                        name,
                        kind: MemberKind::Field,
                        range,
                    },
                );
            }
        }

        first.unwrap_or_else(|| start_line(&node))
    }

    fn push_member(&mut self, owner: &str, member: Member) {
        self.parsed
            .members
            .entry(owner.to_string())
            .or_default()
            .push(member);
    }
}
