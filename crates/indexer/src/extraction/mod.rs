//! Turns a lowered syntax tree into the per-file declaration record.

pub mod summary;

use crate::analysis::references::ReferenceScanner;
use crate::analysis::types::{
    ClassDecl, FieldDecl, FileDeclarations, InterfaceDecl, MethodDecl, ParameterDecl, TypeKind,
    VOID_RETURN_TYPE, qualify,
};
use crate::parsing::syntax::{MethodNode, SyntaxNode, SyntaxTree, TypeNode, TypeNodeKind};
use summary::{MethodSummarizer, SummaryRequest, describe};

pub struct DeclarationExtractor<'a> {
    summarizer: &'a dyn MethodSummarizer,
    scanner: Option<&'a dyn ReferenceScanner>,
}

impl<'a> DeclarationExtractor<'a> {
    pub fn new(summarizer: &'a dyn MethodSummarizer) -> Self {
        Self {
            summarizer,
            scanner: None,
        }
    }

    pub fn with_reference_scanner(mut self, scanner: &'a dyn ReferenceScanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Dependencies and object references are left empty; they are filled
    /// in once every file of the project has been indexed.
    pub fn extract(&self, tree: &SyntaxTree) -> FileDeclarations {
        let package = tree.nodes.iter().find_map(|node| match node {
            SyntaxNode::Package(name) => Some(name.clone()),
            _ => None,
        });

        let mut declarations = FileDeclarations {
            package: package.clone(),
            ..Default::default()
        };

        for node in &tree.nodes {
            match node {
                SyntaxNode::Import(import) => declarations.imports.push(import.raw_path()),
                SyntaxNode::Type(ty) => {
                    self.extract_type(ty, package.as_deref(), None, &mut declarations)
                }
                SyntaxNode::Package(_)
                | SyntaxNode::Field(_)
                | SyntaxNode::Method(_)
                | SyntaxNode::Unsupported(_) => {}
            }
        }

        declarations
    }

    // Nested types are emitted after their owner, named `Outer.Inner`.
    fn extract_type(
        &self,
        ty: &TypeNode,
        package: Option<&str>,
        outer: Option<&str>,
        out: &mut FileDeclarations,
    ) {
        let nested_name = match outer {
            Some(outer) => format!("{outer}.{}", ty.name),
            None => ty.name.clone(),
        };
        let full_name = qualify(package, &nested_name);

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut nested = Vec::new();
        for member in &ty.members {
            match member {
                SyntaxNode::Field(field) => {
                    fields.extend(field.names.iter().map(|name| FieldDecl {
                        name: name.clone(),
                        type_name: field.type_text.clone(),
                    }))
                }
                SyntaxNode::Method(method) => {
                    methods.push(self.extract_method(method, &ty.name, &full_name))
                }
                SyntaxNode::Type(inner) => nested.push(inner),
                SyntaxNode::Package(_) | SyntaxNode::Import(_) | SyntaxNode::Unsupported(_) => {}
            }
        }

        let kind = match ty.kind {
            TypeNodeKind::Interface => None,
            TypeNodeKind::Class => Some(TypeKind::Class),
            TypeNodeKind::Enum => Some(TypeKind::Enum),
            TypeNodeKind::Record => Some(TypeKind::Record),
            TypeNodeKind::Annotation => Some(TypeKind::Annotation),
        };

        match kind {
            Some(kind) => out.classes.push(ClassDecl {
                name: ty.name.clone(),
                full_name: Some(full_name),
                kind,
                extends: ty.superclass.clone(),
                implements: ty.super_interfaces.clone(),
                fields,
                methods,
            }),
            None => out.interfaces.push(InterfaceDecl {
                name: ty.name.clone(),
                full_name: Some(full_name),
                extends: ty.super_interfaces.clone(),
                constants: fields,
                methods,
            }),
        }

        for inner in nested {
            self.extract_type(inner, package, Some(&nested_name), out);
        }
    }

    fn extract_method(&self, method: &MethodNode, owner_name: &str, owner_full: &str) -> MethodDecl {
        let documentation = method.documentation.clone().unwrap_or_default();
        let body = method.body.clone().unwrap_or_default();
        let return_type = method
            .return_type
            .clone()
            .filter(|ty| !ty.is_empty())
            .unwrap_or_else(|| VOID_RETURN_TYPE.to_string());

        let description = describe(
            self.summarizer,
            &SummaryRequest {
                owner: owner_full,
                method_name: &method.name,
                documentation: &documentation,
                body: &body,
            },
        );

        let referenced_objects = match self.scanner {
            Some(scanner) if !body.is_empty() => scanner.candidates(&body, owner_name),
            _ => Vec::new(),
        };

        MethodDecl {
            name: method.name.clone(),
            return_type,
            parameters: method
                .parameters
                .iter()
                .map(|parameter| ParameterDecl {
                    name: parameter.name.clone(),
                    type_name: parameter.type_text.clone(),
                })
                .collect(),
            documentation,
            description,
            body,
            referenced_objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::references::LexicalReferenceScanner;
    use crate::parsing::java::JavaSyntaxParser;
    use crate::parsing::syntax::SyntaxParser;
    use summary::DisabledSummarizer;

    fn extract(source: &str) -> FileDeclarations {
        let tree = JavaSyntaxParser::new().unwrap().parse(source).unwrap();
        DeclarationExtractor::new(&DisabledSummarizer).extract(&tree)
    }

    struct EchoSummarizer;

    impl MethodSummarizer for EchoSummarizer {
        fn summarize(&self, request: &SummaryRequest<'_>) -> anyhow::Result<String> {
            Ok(format!(" Runs {}.{} ", request.owner, request.method_name))
        }
    }

    #[test]
    fn test_scenario_class_implementing_interface() {
        let declarations = extract(
            "package p;\nimport q.I;\npublic class A implements I {\n  int x;\n  void run(String s) { x = 1; }\n}",
        );

        assert_eq!(declarations.package(), Some("p"));
        assert_eq!(declarations.imports, vec!["q.I"]);
        let class = &declarations.classes[0];
        assert_eq!(class.name, "A");
        assert_eq!(class.full_name.as_deref(), Some("p.A"));
        assert_eq!(class.extends, None);
        assert_eq!(class.implements, vec!["I"]);
        assert_eq!(
            class.fields,
            vec![FieldDecl {
                name: "x".to_string(),
                type_name: "int".to_string()
            }]
        );
        let method = &class.methods[0];
        assert_eq!(method.name, "run");
        assert_eq!(method.return_type, "void");
        assert_eq!(method.parameters[0].name, "s");
        assert_eq!(method.parameters[0].type_name, "String");
        assert_eq!(method.documentation, "");
        assert_eq!(method.body, "x = 1;");
        assert!(declarations.dependencies.is_empty());
    }

    #[test]
    fn test_default_package_and_no_members() {
        let declarations = extract("class Empty {}");
        assert_eq!(declarations.package, None);
        assert_eq!(declarations.classes[0].full_name.as_deref(), Some("Empty"));
        assert!(declarations.classes[0].methods.is_empty());
        assert!(declarations.interfaces.is_empty());
    }

    #[test]
    fn test_constructors_and_abstract_methods() {
        let declarations = extract(
            "package p;\nabstract class Shape {\n  Shape() {}\n  abstract double area();\n}",
        );
        let methods = &declarations.classes[0].methods;
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "area");
        assert_eq!(methods[0].return_type, "double");
        assert_eq!(methods[0].body, "");
    }

    #[test]
    fn test_nested_types_are_qualified_by_owner() {
        let declarations = extract(
            "package p;\nclass Outer {\n  interface Listener { void fire(); }\n  static class Inner extends Outer {}\n}",
        );
        let classes = declarations
            .classes
            .iter()
            .map(|class| class.full_name.as_deref().unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(classes, vec!["p.Outer", "p.Outer.Inner"]);
        assert_eq!(
            declarations.interfaces[0].full_name.as_deref(),
            Some("p.Outer.Listener")
        );
        assert_eq!(declarations.classes[1].extends.as_deref(), Some("Outer"));
    }

    #[test]
    fn test_interface_constants_and_extends() {
        let declarations = extract(
            "package p;\ninterface Repo extends Base, Closeable {\n  int LIMIT = 10;\n  Item find(long id);\n}",
        );
        let interface = &declarations.interfaces[0];
        assert_eq!(interface.extends, vec!["Base", "Closeable"]);
        assert_eq!(interface.constants[0].name, "LIMIT");
        assert_eq!(interface.methods[0].return_type, "Item");
        assert_eq!(interface.methods[0].body, "");
    }

    #[test]
    fn test_enum_kind_is_recorded() {
        let declarations = extract("package p;\nenum Color { RED; int rank() { return 0; } }");
        assert_eq!(declarations.classes[0].kind, TypeKind::Enum);
        assert_eq!(declarations.classes[0].methods[0].name, "rank");
    }

    #[test]
    fn test_summarizer_output_is_trimmed() {
        let tree = JavaSyntaxParser::new()
            .unwrap()
            .parse("package p; class A { void run() {} }")
            .unwrap();
        let declarations = DeclarationExtractor::new(&EchoSummarizer).extract(&tree);
        assert_eq!(declarations.classes[0].methods[0].description, "Runs p.A.run");
    }

    #[test]
    fn test_reference_candidates_exclude_enclosing_type() {
        let tree = JavaSyntaxParser::new()
            .unwrap()
            .parse("package p; class Cart { void add() { Item i = new Item(); Cart c = new Cart(); } }")
            .unwrap();
        let scanner = LexicalReferenceScanner::new().unwrap();
        let declarations = DeclarationExtractor::new(&DisabledSummarizer)
            .with_reference_scanner(&scanner)
            .extract(&tree);
        assert_eq!(
            declarations.classes[0].methods[0].referenced_objects,
            vec!["Item"]
        );
    }
}
