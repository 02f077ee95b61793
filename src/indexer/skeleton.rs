//! Signature-only rendering of a Java file.
//!
//! Keeps the package line, imports, type headers and one line per member
//! signature. Bodies, initializers and annotations are dropped.

use tree_sitter::Node;

use crate::indexer::extractor::java::{JavaNode, NodeKinds, SyntaxTree};
use crate::indexer::extractor::{node_text, DeclarationKind};

const INDENT: &str = "    ";

/// Render the skeleton of every type declaration in `syntax`, in preorder.
pub fn render_skeleton(syntax: &SyntaxTree, kinds: &NodeKinds) -> String {
    let mut renderer = SkeletonRenderer {
        kinds,
        source: syntax.bytes(),
        lines: Vec::new(),
    };
    renderer.render_header(syntax.root());
    renderer.render_scope(syntax.root());
    renderer.lines.join("\n")
}

/// Collapse runs of whitespace, including newlines, to single spaces.
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct SkeletonRenderer<'a> {
    kinds: &'a NodeKinds,
    source: &'a [u8],
    lines: Vec<String>,
}

impl SkeletonRenderer<'_> {
    fn text(&self, node: &Node) -> String {
        squash(node_text(node, self.source))
    }

    fn field_text(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| self.text(&n))
    }

    fn render_header(&mut self, root: Node) {
        let mut package = None;
        let mut imports = Vec::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match self.kinds.classify(&child) {
                JavaNode::Package => {
                    let mut inner = child.walk();
                    package = child
                        .named_children(&mut inner)
                        .last()
                        .map(|name| format!("package {};", self.text(&name)));
                }
                JavaNode::Import => imports.push(self.text(&child)),
                _ => {}
            }
        }

        if let Some(package) = package {
            self.lines.push(package);
            self.lines.push(String::new());
        }
        if !imports.is_empty() {
            self.lines.extend(imports);
            self.lines.push(String::new());
        }
    }

    /// Render type declarations below `node`, skipping anonymous class bodies.
    fn render_scope(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match self.kinds.classify(&child) {
                JavaNode::Type(kind) => {
                    self.render_declaration(child, kind);
                    if let Some(body) = child.child_by_field_name("body") {
                        self.render_scope(body);
                    }
                }
                JavaNode::ClassBody
                | JavaNode::OtherType
                | JavaNode::Package
                | JavaNode::Import
                | JavaNode::Modifiers
                | JavaNode::Throws => {}
                JavaNode::Method
                | JavaNode::Constructor
                | JavaNode::Field
                | JavaNode::EnumConstant
                | JavaNode::EnumBodyDeclarations
                | JavaNode::Initializer
                | JavaNode::Parameter
                | JavaNode::SpreadParameter
                | JavaNode::Other => self.render_scope(child),
            }
        }
    }

    /// Modifier keywords of a declaration, without annotations.
    fn modifiers(&self, node: &Node) -> Option<String> {
        let mut cursor = node.walk();
        let modifiers = node
            .children(&mut cursor)
            .find(|child| self.kinds.classify(child) == JavaNode::Modifiers)?;

        let mut inner = modifiers.walk();
        let words: Vec<&str> = modifiers
            .children(&mut inner)
            .filter(|word| !word.is_named())
            .map(|word| node_text(&word, self.source))
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }

    fn render_declaration(&mut self, node: Node, kind: DeclarationKind) {
        // Everything between the modifiers and the body, e.g. `class Box<T> extends Base`
        let mut header: Vec<String> = self.modifiers(&node).into_iter().collect();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() || node.child_by_field_name("body") == Some(child) {
                continue;
            }
            if self.kinds.classify(&child) == JavaNode::Modifiers {
                continue;
            }
            let text = self.text(&child);
            // Type parameters and record components attach to the name
            match header.last_mut() {
                Some(last) if text.starts_with('<') || text.starts_with('(') => last.push_str(&text),
                _ => header.push(text),
            }
        }
        self.lines.push(format!("{} {{", header.join(" ")));

        if let Some(body) = node.child_by_field_name("body") {
            match kind {
                DeclarationKind::Enum => self.render_enum_constants(body),
                DeclarationKind::Class | DeclarationKind::Interface => self.render_members(body),
            }
        }

        self.lines.push("}".to_string());
        self.lines.push(String::new());
    }

    fn render_enum_constants(&mut self, body: Node) {
        let mut cursor = body.walk();
        let constants: Vec<String> = body
            .named_children(&mut cursor)
            .filter(|child| self.kinds.classify(child) == JavaNode::EnumConstant)
            .filter_map(|constant| self.field_text(&constant, "name"))
            .collect();

        if !constants.is_empty() {
            self.lines.push(format!("{}{};", INDENT, constants.join(", ")));
        }
    }

    fn render_members(&mut self, body: Node) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match self.kinds.classify(&member) {
                JavaNode::Method => {
                    let line = self.method_signature(&member);
                    self.lines.push(line);
                }
                JavaNode::Constructor => {
                    let line = self.constructor_signature(&member);
                    self.lines.push(line);
                }
                JavaNode::Field => {
                    let fields = self.field_lines(&member);
                    self.lines.extend(fields);
                }
                _ => {}
            }
        }
    }

    fn method_signature(&self, node: &Node) -> String {
        let mut parts: Vec<String> = self.modifiers(node).into_iter().collect();
        parts.extend(self.field_text(node, "type_parameters"));
        parts.extend(self.field_text(node, "type"));
        parts.push(format!(
            "{}({})",
            self.field_text(node, "name").unwrap_or_default(),
            self.parameters(node)
        ));
        parts.extend(self.throws(node));
        format!("{}{};", INDENT, parts.join(" "))
    }

    fn constructor_signature(&self, node: &Node) -> String {
        let mut parts: Vec<String> = self.modifiers(node).into_iter().collect();
        parts.extend(self.field_text(node, "type_parameters"));
        parts.push(format!(
            "{}({})",
            self.field_text(node, "name").unwrap_or_default(),
            self.parameters(node)
        ));
        parts.extend(self.throws(node));
        format!("{}{};", INDENT, parts.join(" "))
    }

    fn field_lines(&self, node: &Node) -> Vec<String> {
        let prefix: Vec<String> = self
            .modifiers(node)
            .into_iter()
            .chain(self.field_text(node, "type"))
            .collect();
        let prefix = prefix.join(" ");

        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| self.field_text(&declarator, "name"))
            .map(|name| format!("{}{} {};", INDENT, prefix, name))
            .collect()
    }

    /// `Type name` pairs, comma separated; receiver parameters are dropped.
    fn parameters(&self, node: &Node) -> String {
        let Some(params) = node.child_by_field_name("parameters") else {
            return String::new();
        };

        let mut cursor = params.walk();
        let rendered: Vec<String> = params
            .named_children(&mut cursor)
            .filter_map(|param| match self.kinds.classify(&param) {
                JavaNode::Parameter => {
                    let ty = self.field_text(&param, "type")?;
                    let name = self.field_text(&param, "name")?;
                    let dims = self.field_text(&param, "dimensions").unwrap_or_default();
                    Some(format!("{} {}{}", ty, name, dims))
                }
                JavaNode::SpreadParameter => self.spread_parameter(&param),
                _ => None,
            })
            .collect();

        rendered.join(", ")
    }

    /// `Type... name`, from the type node and trailing variable declarator.
    fn spread_parameter(&self, param: &Node) -> Option<String> {
        let mut cursor = param.walk();
        let parts: Vec<Node> = param
            .named_children(&mut cursor)
            .filter(|child| self.kinds.classify(child) != JavaNode::Modifiers)
            .collect();

        let ty = parts.first()?;
        let declarator = parts.last()?;
        let name = self
            .field_text(declarator, "name")
            .unwrap_or_else(|| self.text(declarator));
        Some(format!("{}... {}", self.text(ty), name))
    }

    fn throws(&self, node: &Node) -> Option<String> {
        let mut cursor = node.walk();
        let clause = node
            .children(&mut cursor)
            .find(|child| self.kinds.classify(child) == JavaNode::Throws)?;
        Some(self.text(&clause))
    }
}
