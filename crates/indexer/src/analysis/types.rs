use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const VOID_RETURN_TYPE: &str = "void";

/// Joins a package and a (possibly nested) type name.
pub fn qualify(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) if !package.is_empty() => format!("{package}.{name}"),
        _ => name.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn void_return_type() -> String {
    VOID_RETURN_TYPE.to_string()
}

fn return_type_or_void<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|value| !value.is_empty())
        .unwrap_or_else(void_return_type))
}

/// The extraction artifact for a whole project, keyed by relative file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub project_path: String,
    pub files: BTreeMap<String, FileEntry>,
}

impl ProjectStructure {
    pub fn new(project_path: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            files: BTreeMap::new(),
        }
    }

    /// Last path component of the project root.
    pub fn project_name(&self) -> String {
        Path::new(&self.project_path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.project_path.clone())
    }

    pub fn parsed_files(&self) -> impl Iterator<Item = (&String, &FileDeclarations)> {
        self.files.iter().filter_map(|(path, entry)| match entry {
            FileEntry::Parsed(declarations) => Some((path, declarations)),
            FileEntry::Error(_) => None,
        })
    }

    pub fn errored_files(&self) -> impl Iterator<Item = (&String, &FileError)> {
        self.files.iter().filter_map(|(path, entry)| match entry {
            FileEntry::Error(error) => Some((path, error)),
            FileEntry::Parsed(_) => None,
        })
    }
}

/// Either a declaration record or the reason the file could not be read.
/// The error shape is tried first so `{ "error": ... }` never parses as an
/// empty declaration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    Error(FileError),
    Parsed(FileDeclarations),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDeclarations {
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imports: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classes: Vec<ClassDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interfaces: Vec<InterfaceDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_references: Vec<ObjectReference>,
}

impl FileDeclarations {
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref().filter(|package| !package.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    /// Set for every extracted type; artifacts written by older tools may
    /// omit it, in which case it is derived from the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_plain_class")]
    pub kind: TypeKind,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub implements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodDecl>,
}

fn is_plain_class(kind: &TypeKind) -> bool {
    *kind == TypeKind::Class
}

impl ClassDecl {
    pub fn full_name(&self, package: Option<&str>) -> String {
        self.full_name
            .clone()
            .unwrap_or_else(|| qualify(package, &self.name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extends: Vec<String>,
    /// Interface constants. Kept in the artifact only; the graph has no
    /// Interface-to-Field relationship.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<FieldDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodDecl>,
}

impl InterfaceDecl {
    pub fn full_name(&self, package: Option<&str>) -> String {
        self.full_name
            .clone()
            .unwrap_or_else(|| qualify(package, &self.name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "void_return_type", deserialize_with = "return_type_or_void")]
    pub return_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documentation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referenced_objects: Vec<String>,
}

impl Default for MethodDecl {
    fn default() -> Self {
        Self {
            name: String::new(),
            return_type: void_return_type(),
            parameters: Vec::new(),
            documentation: String::new(),
            description: String::new(),
            body: String::new(),
            referenced_objects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Import,
    Extends,
    Implements,
    Reference,
}

/// A dependency signal of one file. `file` is set only when the target
/// resolved to a file of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// A method body mentioning a type declared in the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    pub from_class: String,
    pub from_method: String,
    pub to_class: String,
    pub to_file: String,
}
