use serde::Serialize;
use serde_json::{Map, Value};

/// One result row keyed by upper-case column name.
pub type JsonRow = Map<String, Value>;

/// What a single executed statement produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<JsonRow>>,
}

/// How a script unit was closed in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A line ending with `;`.
    Semicolon,
    /// A line holding only `/`.
    Slash,
    /// The script ended without a terminator.
    EndOfInput,
}

/// One executable fragment of a script: a statement or a whole PL/SQL block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUnit {
    /// 1-based position in the script.
    pub index: usize,
    pub text: String,
    pub terminator: Terminator,
}

/// A `-- SECCIÓN` delimited part of a script file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSection {
    pub title: String,
    pub content: String,
}
