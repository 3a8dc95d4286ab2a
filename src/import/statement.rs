//! Structured representation of one import declaration
//!
//! An `ImportStatement` is the parsed form of a single import, covering the
//! two syntactic families the engine understands:
//! - ES-style: `import foo, { bar } from 'foo';`
//! - Call-style: `const { bar } = require('foo');`
//!
//! Statements are created by parsing existing source or synthesized from a
//! resolved module, mutated in place, and re-rendered in canonical form.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Syntactic family used when a statement is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKeyword {
    Import,
    Const,
    Var,
    Let,
}

impl DeclarationKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Const => "const",
            Self::Var => "var",
            Self::Let => "let",
        }
    }

    /// True for the ES `import ... from ...` family
    pub fn is_es_style(&self) -> bool {
        matches!(self, Self::Import)
    }
}

impl fmt::Display for DeclarationKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static ES_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^\s*import\s+(?P<assignment>.+?)\s+from\s+(?:'(?P<path_single>[^']+)'|"(?P<path_double>[^"]+)")\s*;\s*$"#,
    )
    .expect("Invalid ES import regex")
});

static CALL_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^\s*(?P<keyword>const|var|let)\s+(?P<assignment>.+?)\s*=\s*(?P<function>[$\w]+)\(\s*(?:'(?P<path_single>[^']+)'|"(?P<path_double>[^"]+)")\s*\)\s*;\s*$"#,
    )
    .expect("Invalid call import regex")
});

static DEFAULT_AND_NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<default>[$\w]+)\s*,\s*\{\s*(?P<named>.*?)\s*,?\s*\}$")
        .expect("Invalid assignment regex")
});

static NAMED_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\{\s*(?P<named>.*?)\s*,?\s*\}$").expect("Invalid assignment regex")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$\w]+$").expect("Invalid identifier regex"));

/// One import declaration in structured form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Module specifier (what appears inside the quotes)
    pub path: String,
    /// Identifier bound to the module's default export, if any
    pub default_import: Option<String>,
    /// Identifiers destructured from the module, kept sorted after mutation
    pub named_imports: Option<Vec<String>>,
    /// Chosen syntactic family
    pub declaration_keyword: DeclarationKeyword,
    /// Call target used when the keyword is not `import`
    pub import_function: String,
    /// Exact text this statement was parsed from, cleared on mutation
    pub original_source: Option<String>,
}

impl ImportStatement {
    /// Synthesize a statement with no original source
    pub fn new(
        path: impl Into<String>,
        declaration_keyword: DeclarationKeyword,
        import_function: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            default_import: None,
            named_imports: None,
            declaration_keyword,
            import_function: import_function.into(),
            original_source: None,
        }
    }

    /// Parse the literal text of one candidate statement.
    ///
    /// Returns None when the text is not an import declaration in either
    /// family. The exact input is preserved in `original_source`.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = ES_STATEMENT.captures(text) {
            let (default_import, named_imports) =
                parse_assignment(caps.name("assignment")?.as_str(), true)?;
            return Some(Self {
                path: capture_path(&caps)?,
                default_import,
                named_imports,
                declaration_keyword: DeclarationKeyword::Import,
                import_function: "import".to_string(),
                original_source: Some(text.to_string()),
            });
        }

        if let Some(caps) = CALL_STATEMENT.captures(text) {
            let keyword = match caps.name("keyword")?.as_str() {
                "const" => DeclarationKeyword::Const,
                "var" => DeclarationKeyword::Var,
                "let" => DeclarationKeyword::Let,
                _ => return None,
            };
            let (default_import, named_imports) =
                parse_assignment(caps.name("assignment")?.as_str(), false)?;
            return Some(Self {
                path: capture_path(&caps)?,
                default_import,
                named_imports,
                declaration_keyword: keyword,
                import_function: caps.name("function")?.as_str().to_string(),
                original_source: Some(text.to_string()),
            });
        }

        None
    }

    /// True iff the statement would render no binding
    pub fn is_empty(&self) -> bool {
        self.default_import.is_none() && !self.has_named_imports()
    }

    /// True iff there is at least one named import
    pub fn has_named_imports(&self) -> bool {
        self.named_imports
            .as_ref()
            .is_some_and(|named| !named.is_empty())
    }

    /// Insert a named import, keeping the set sorted. No-op if present.
    pub fn inject_named_import(&mut self, name: &str) {
        let named = self.named_imports.get_or_insert_with(Vec::new);
        if named.iter().any(|n| n == name) {
            return;
        }
        named.push(name.to_string());
        named.sort();
        self.original_source = None;
    }

    /// Replace the default import. No-op if equal.
    pub fn set_default_import(&mut self, name: &str) {
        if self.default_import.as_deref() == Some(name) {
            return;
        }
        self.default_import = Some(name.to_string());
        self.original_source = None;
    }

    /// Switch the syntactic family. No-op if equal.
    pub fn set_declaration_keyword(&mut self, keyword: DeclarationKeyword) {
        if self.declaration_keyword == keyword {
            return;
        }
        self.declaration_keyword = keyword;
        self.original_source = None;
    }

    /// Switch the call target. No-op if equal.
    pub fn set_import_function(&mut self, function: &str) {
        if self.import_function == function {
            return;
        }
        self.import_function = function.to_string();
        self.original_source = None;
    }

    /// Remove a variable binding, from the default slot or the named set
    pub fn delete_variable(&mut self, name: &str) {
        if self.default_import.as_deref() == Some(name) {
            self.default_import = None;
            self.original_source = None;
        } else if let Some(named) = &mut self.named_imports {
            let before = named.len();
            named.retain(|n| n != name);
            if named.len() != before {
                self.original_source = None;
            }
        }
    }

    /// Fold another statement for the same path into this one.
    ///
    /// The other statement's default import wins when present; named imports
    /// are unioned and re-sorted.
    pub fn merge(&mut self, other: &ImportStatement) {
        if other.default_import.is_some() {
            self.default_import = other.default_import.clone();
        }
        if let Some(other_named) = &other.named_imports {
            let named = self.named_imports.get_or_insert_with(Vec::new);
            for name in other_named {
                if !named.contains(name) {
                    named.push(name.clone());
                }
            }
            named.sort();
        }
        self.original_source = None;
    }

    /// Normalized identity used to deduplicate statements after injection
    pub fn to_normalized(&self) -> (String, Option<String>, Vec<String>, DeclarationKeyword, String) {
        let mut named = self.named_imports.clone().unwrap_or_default();
        named.sort();
        (
            self.path.clone(),
            self.default_import.clone(),
            named,
            self.declaration_keyword,
            self.import_function.clone(),
        )
    }

    /// Render this statement as canonical text.
    ///
    /// Returns one string for the ES family, and one or two for the call
    /// family (default and named bindings become separate statements).
    /// Strings may contain embedded newlines when wrapping kicks in.
    pub fn to_import_strings(&self, max_line_length: usize, tab: &str) -> Vec<String> {
        if let Some(original) = &self.original_source {
            return vec![original.clone()];
        }

        if self.declaration_keyword.is_es_style() {
            return vec![self.render_es(max_line_length, tab)];
        }

        match (&self.default_import, self.has_named_imports()) {
            (Some(_), true) => {
                let mut default_only = self.clone();
                default_only.named_imports = None;
                let mut named_only = self.clone();
                named_only.default_import = None;
                vec![
                    default_only.render_call(max_line_length, tab),
                    named_only.render_call(max_line_length, tab),
                ]
            }
            _ => vec![self.render_call(max_line_length, tab)],
        }
    }

    fn render_es(&self, max_line_length: usize, tab: &str) -> String {
        let assignment = match (&self.default_import, self.named_list()) {
            (Some(default), Some(named)) => format!("{default}, {{ {} }}", named.join(", ")),
            (Some(default), None) => default.clone(),
            (None, Some(named)) => format!("{{ {} }}", named.join(", ")),
            (None, None) => String::new(),
        };
        let one_line = format!("import {assignment} from '{}';", self.path);
        if one_line.len() <= max_line_length {
            return one_line;
        }

        if let Some(named) = self.named_list() {
            let prefix = match &self.default_import {
                Some(default) => format!("import {default}, {{"),
                None => "import {".to_string(),
            };
            let mut lines = vec![prefix];
            for name in named {
                lines.push(format!("{tab}{name},"));
            }
            lines.push(format!("}} from '{}';", self.path));
            lines.join("\n")
        } else {
            // Default only: break after `from`
            format!(
                "import {} from\n{tab}'{}';",
                self.default_import.as_deref().unwrap_or_default(),
                self.path
            )
        }
    }

    fn render_call(&self, max_line_length: usize, tab: &str) -> String {
        let keyword = self.declaration_keyword.as_str();
        let call = format!("{}('{}');", self.import_function, self.path);
        let assignment = match (&self.default_import, self.named_list()) {
            (Some(default), _) => default.clone(),
            (None, Some(named)) => format!("{{ {} }}", named.join(", ")),
            (None, None) => String::new(),
        };
        let one_line = format!("{keyword} {assignment} = {call}");
        if one_line.len() <= max_line_length {
            return one_line;
        }

        match (&self.default_import, self.named_list()) {
            // Default: break after `=`
            (Some(default), _) => format!("{keyword} {default} =\n{tab}{call}"),
            (None, Some(named)) => {
                let mut lines = vec![format!("{keyword} {{")];
                for name in named {
                    lines.push(format!("{tab}{name},"));
                }
                lines.push(format!("}} = {call}"));
                lines.join("\n")
            }
            (None, None) => one_line,
        }
    }

    fn named_list(&self) -> Option<&Vec<String>> {
        self.named_imports.as_ref().filter(|named| !named.is_empty())
    }
}

fn capture_path(caps: &regex::Captures<'_>) -> Option<String> {
    caps.name("path_single")
        .or_else(|| caps.name("path_double"))
        .map(|m| m.as_str().to_string())
}

/// Split an assignment into default and named parts.
///
/// ES-style allows `X`, `{ A, B }`, and `X, { A, B }`; call-style only the
/// first two. Returns None when the text is not one of those shapes.
fn parse_assignment(
    assignment: &str,
    allow_default_and_named: bool,
) -> Option<(Option<String>, Option<Vec<String>>)> {
    if IDENTIFIER.is_match(assignment) {
        return Some((Some(assignment.to_string()), None));
    }
    if let Some(caps) = NAMED_ONLY.captures(assignment) {
        let named = parse_named_list(caps.name("named")?.as_str())?;
        return Some((None, Some(named)));
    }
    if allow_default_and_named {
        if let Some(caps) = DEFAULT_AND_NAMED.captures(assignment) {
            let default = caps.name("default")?.as_str().to_string();
            let named = parse_named_list(caps.name("named")?.as_str())?;
            return Some((Some(default), Some(named)));
        }
    }
    None
}

fn parse_named_list(inner: &str) -> Option<Vec<String>> {
    let mut named = Vec::new();
    for part in inner.split(',') {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        if !IDENTIFIER.is_match(name) {
            return None;
        }
        named.push(name.to_string());
    }
    Some(named)
}
