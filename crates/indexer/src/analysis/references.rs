use regex::Regex;
use rustc_hash::FxHashSet;

/// Type names that can never be project types.
const EXCLUDED_NAMES: &[&str] = &[
    "String", "int", "long", "double", "float", "boolean", "char", "byte", "short", "void",
];

/// Finds names in a method body that look like type references. Candidates
/// are only kept later if they resolve to a project type.
pub trait ReferenceScanner: Send + Sync {
    fn candidates(&self, body: &str, enclosing_type: &str) -> Vec<String>;
}

/// Matches constructor calls (`new Foo(`), static-looking calls
/// (`Foo.bar(`) and local declarations (`Foo item =` / `Foo item;`).
pub struct LexicalReferenceScanner {
    patterns: Vec<Regex>,
}

impl LexicalReferenceScanner {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = [
            r"new\s+([A-Za-z][A-Za-z0-9_]*)\s*\(",
            r"([A-Za-z][A-Za-z0-9_]*)\s*\.\s*[A-Za-z][A-Za-z0-9_]*\s*\(",
            r"([A-Za-z][A-Za-z0-9_]*)\s+[a-z][A-Za-z0-9_]*\s*[=;]",
        ]
        .into_iter()
        .map(Regex::new)
        .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl ReferenceScanner for LexicalReferenceScanner {
    fn candidates(&self, body: &str, enclosing_type: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();

        for pattern in &self.patterns {
            for capture in pattern.captures_iter(body) {
                let Some(name) = capture.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                if name == enclosing_type || EXCLUDED_NAMES.contains(&name) {
                    continue;
                }
                if seen.insert(name) {
                    found.push(name.to_string());
                }
            }
        }

        found
    }
}
