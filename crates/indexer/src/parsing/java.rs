use crate::parsing::syntax::{
    FieldNode, ImportNode, MethodNode, ParameterNode, ParseError, SyntaxNode, SyntaxParser,
    SyntaxTree, TypeNode, TypeNodeKind,
};
use tree_sitter::{Node, Parser};

/// Java front end over tree-sitter. Not `Sync`; create one per worker.
pub struct JavaSyntaxParser {
    parser: Parser,
}

impl JavaSyntaxParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(Self { parser })
    }
}

impl SyntaxParser for JavaSyntaxParser {
    fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let position = first_error(root)
                .map(|node| node.start_position())
                .unwrap_or_else(|| root.start_position());
            return Err(ParseError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        let nodes = named_children(root)
            .into_iter()
            .map(|child| lower(child, source))
            .collect();
        Ok(SyntaxTree { nodes })
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| text(child, source).to_string())
}

/// Type name as used for resolution: generic arguments dropped, qualifier kept.
fn type_name(node: Node<'_>, source: &str) -> String {
    let raw = text(node, source);
    raw.split('<').next().unwrap_or(raw).trim().to_string()
}

fn lower(node: Node<'_>, source: &str) -> SyntaxNode {
    match node.kind() {
        "package_declaration" => named_children(node)
            .into_iter()
            .find(|child| matches!(child.kind(), "identifier" | "scoped_identifier"))
            .map(|name| SyntaxNode::Package(text(name, source).to_string()))
            .unwrap_or_else(|| SyntaxNode::Unsupported(node.kind().to_string())),
        "import_declaration" => lower_import(node, source),
        "class_declaration" => lower_type(node, TypeNodeKind::Class, source),
        "interface_declaration" => lower_type(node, TypeNodeKind::Interface, source),
        "enum_declaration" => lower_type(node, TypeNodeKind::Enum, source),
        "record_declaration" => lower_type(node, TypeNodeKind::Record, source),
        "annotation_type_declaration" => lower_type(node, TypeNodeKind::Annotation, source),
        "field_declaration" | "constant_declaration" => SyntaxNode::Field(lower_field(node, source)),
        "method_declaration" | "annotation_type_element_declaration" => {
            SyntaxNode::Method(lower_method(node, source))
        }
        other => SyntaxNode::Unsupported(other.to_string()),
    }
}

fn lower_import(node: Node<'_>, source: &str) -> SyntaxNode {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

    let Some(name) = children
        .iter()
        .find(|child| matches!(child.kind(), "identifier" | "scoped_identifier"))
    else {
        return SyntaxNode::Unsupported(node.kind().to_string());
    };

    SyntaxNode::Import(ImportNode {
        path: text(*name, source).to_string(),
        is_static: children.iter().any(|child| child.kind() == "static"),
        wildcard: children.iter().any(|child| child.kind() == "asterisk"),
    })
}

fn lower_type(node: Node<'_>, kind: TypeNodeKind, source: &str) -> SyntaxNode {
    let name = field_text(node, "name", source).unwrap_or_default();

    let superclass = node
        .child_by_field_name("superclass")
        .and_then(|superclass| named_children(superclass).into_iter().next())
        .map(|target| type_name(target, source));

    let super_interfaces = match kind {
        TypeNodeKind::Interface => named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "extends_interfaces")
            .flat_map(|clause| type_list(clause, source))
            .collect(),
        _ => node
            .child_by_field_name("interfaces")
            .map(|clause| type_list(clause, source))
            .unwrap_or_default(),
    };

    let mut members = Vec::new();
    if kind == TypeNodeKind::Record
        && let Some(components) = node.child_by_field_name("parameters")
    {
        members.extend(
            lower_parameters(components, source)
                .into_iter()
                .map(|component| {
                    SyntaxNode::Field(FieldNode {
                        type_text: component.type_text,
                        names: vec![component.name],
                    })
                }),
        );
    }
    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            if member.kind() == "enum_body_declarations" {
                members.extend(
                    named_children(member)
                        .into_iter()
                        .map(|inner| lower(inner, source)),
                );
            } else {
                members.push(lower(member, source));
            }
        }
    }

    SyntaxNode::Type(TypeNode {
        kind,
        name,
        superclass,
        super_interfaces,
        members,
    })
}

/// Targets of a `super_interfaces` or `extends_interfaces` clause.
fn type_list(clause: Node<'_>, source: &str) -> Vec<String> {
    named_children(clause)
        .into_iter()
        .filter(|child| child.kind() == "type_list")
        .flat_map(named_children)
        .map(|target| type_name(target, source))
        .collect()
}

fn lower_field(node: Node<'_>, source: &str) -> FieldNode {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("declarator", &mut cursor)
        .filter_map(|declarator| field_text(declarator, "name", source))
        .collect();

    FieldNode {
        type_text: field_text(node, "type", source).unwrap_or_default(),
        names,
    }
}

fn lower_method(node: Node<'_>, source: &str) -> MethodNode {
    MethodNode {
        name: field_text(node, "name", source).unwrap_or_default(),
        return_type: field_text(node, "type", source),
        parameters: node
            .child_by_field_name("parameters")
            .map(|parameters| lower_parameters(parameters, source))
            .unwrap_or_default(),
        documentation: javadoc(node, source),
        body: node
            .child_by_field_name("body")
            .map(|body| block_contents(text(body, source))),
    }
}

fn lower_parameters(parameters: Node<'_>, source: &str) -> Vec<ParameterNode> {
    named_children(parameters)
        .into_iter()
        .filter_map(|parameter| match parameter.kind() {
            "formal_parameter" => Some(ParameterNode {
                name: field_text(parameter, "name", source)?,
                type_text: field_text(parameter, "type", source).unwrap_or_default(),
            }),
            "spread_parameter" => {
                let children = named_children(parameter);
                let declarator = children
                    .iter()
                    .find(|child| child.kind() == "variable_declarator")?;
                let type_text = children
                    .iter()
                    .find(|child| !matches!(child.kind(), "modifiers" | "variable_declarator"))
                    .map(|child| text(*child, source))
                    .unwrap_or_default();
                Some(ParameterNode {
                    name: field_text(*declarator, "name", source)?,
                    type_text: format!("{type_text}..."),
                })
            }
            _ => None,
        })
        .collect()
}

/// The `/** ... */` comment directly preceding a declaration, markers stripped.
fn javadoc(node: Node<'_>, source: &str) -> Option<String> {
    let comment = node.prev_named_sibling()?;
    if !matches!(comment.kind(), "block_comment" | "comment") {
        return None;
    }
    let raw = text(comment, source);
    let inner = raw.strip_prefix("/**")?.strip_suffix("*/")?;

    let doc = inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .collect::<Vec<_>>()
        .join("\n");
    Some(doc.trim().to_string())
}

fn block_contents(block: &str) -> String {
    block
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(block)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        JavaSyntaxParser::new().unwrap().parse(source).unwrap()
    }

    fn only_type(tree: &SyntaxTree) -> &TypeNode {
        tree.nodes
            .iter()
            .find_map(|node| match node {
                SyntaxNode::Type(ty) => Some(ty),
                _ => None,
            })
            .expect("a type declaration")
    }

    #[test]
    fn test_package_and_imports() {
        let tree = parse(
            "package com.acme.shop;\nimport java.util.List;\nimport static java.lang.Math.max;\nimport com.acme.util.*;\nclass A {}\n",
        );

        assert_eq!(tree.nodes[0], SyntaxNode::Package("com.acme.shop".to_string()));
        let imports: Vec<&ImportNode> = tree
            .nodes
            .iter()
            .filter_map(|node| match node {
                SyntaxNode::Import(import) => Some(import),
                _ => None,
            })
            .collect();
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].raw_path(), "java.util.List");
        assert!(imports[1].is_static);
        assert_eq!(imports[1].path, "java.lang.Math.max");
        assert!(imports[2].wildcard);
        assert_eq!(imports[2].raw_path(), "com.acme.util.*");
    }

    #[test]
    fn test_class_header() {
        let tree = parse("class Cart extends Base<Item> implements Serializable, Comparable<Cart> {}");
        let ty = only_type(&tree);

        assert_eq!(ty.kind, TypeNodeKind::Class);
        assert_eq!(ty.name, "Cart");
        assert_eq!(ty.superclass.as_deref(), Some("Base"));
        assert_eq!(ty.super_interfaces, vec!["Serializable", "Comparable"]);
    }

    #[test]
    fn test_interface_extends() {
        let tree = parse("interface Repo<T> extends Reader<T>, java.io.Closeable { T find(long id); }");
        let ty = only_type(&tree);

        assert_eq!(ty.kind, TypeNodeKind::Interface);
        assert_eq!(ty.super_interfaces, vec!["Reader", "java.io.Closeable"]);
        let SyntaxNode::Method(method) = &ty.members[0] else {
            panic!("expected a method");
        };
        assert_eq!(method.name, "find");
        assert_eq!(method.return_type.as_deref(), Some("T"));
        assert_eq!(method.body, None);
    }

    #[test]
    fn test_members() {
        let tree = parse(
            r#"
class Cart {
    private final List<Item> items = new ArrayList<>(), saved;

    /**
     * Adds an item.
     * @param item the item
     */
    public void add(Item item, int... counts) {
        items.add(item);
    }

    Cart() {}
}
"#,
        );
        let ty = only_type(&tree);

        let SyntaxNode::Field(field) = &ty.members[0] else {
            panic!("expected a field");
        };
        assert_eq!(field.type_text, "List<Item>");
        assert_eq!(field.names, vec!["items", "saved"]);

        let method = ty
            .members
            .iter()
            .find_map(|member| match member {
                SyntaxNode::Method(method) => Some(method),
                _ => None,
            })
            .unwrap();
        assert_eq!(method.name, "add");
        assert_eq!(method.return_type.as_deref(), Some("void"));
        assert_eq!(
            method.parameters,
            vec![
                ParameterNode {
                    name: "item".to_string(),
                    type_text: "Item".to_string()
                },
                ParameterNode {
                    name: "counts".to_string(),
                    type_text: "int...".to_string()
                },
            ]
        );
        assert_eq!(
            method.documentation.as_deref(),
            Some("Adds an item.\n@param item the item")
        );
        assert_eq!(method.body.as_deref(), Some("items.add(item);"));

        assert!(
            ty.members
                .iter()
                .any(|member| matches!(member, SyntaxNode::Unsupported(kind) if kind == "constructor_declaration"))
        );
    }

    #[test]
    fn test_enum_and_record_members() {
        let tree = parse(
            "enum Color implements Named { RED, GREEN; String label() { return name(); } }\nrecord Point(int x, int y) {}",
        );
        let types: Vec<&TypeNode> = tree
            .nodes
            .iter()
            .filter_map(|node| match node {
                SyntaxNode::Type(ty) => Some(ty),
                _ => None,
            })
            .collect();

        assert_eq!(types[0].kind, TypeNodeKind::Enum);
        assert_eq!(types[0].super_interfaces, vec!["Named"]);
        assert!(types[0]
            .members
            .iter()
            .any(|member| matches!(member, SyntaxNode::Method(method) if method.name == "label")));

        assert_eq!(types[1].kind, TypeNodeKind::Record);
        assert_eq!(
            types[1].members,
            vec![
                SyntaxNode::Field(FieldNode {
                    type_text: "int".to_string(),
                    names: vec!["x".to_string()]
                }),
                SyntaxNode::Field(FieldNode {
                    type_text: "int".to_string(),
                    names: vec!["y".to_string()]
                }),
            ]
        );
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let error = JavaSyntaxParser::new()
            .unwrap()
            .parse("class A {\n  void f( {\n}\n")
            .unwrap_err();
        assert!(matches!(error, ParseError::Syntax { .. }));
    }
}
