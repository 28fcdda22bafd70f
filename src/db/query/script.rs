use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::{ScriptSection, ScriptUnit, Terminator};

/// Object kinds whose `CREATE` statement is compiled as PL/SQL and therefore
/// only ends at a `/` line.
static PLSQL_OBJECT_KINDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["PROCEDURE", "FUNCTION", "PACKAGE", "TRIGGER", "TYPE", "LIBRARY"]
        .into_iter()
        .collect()
});

/// Words that may sit between `CREATE` and the object kind.
static CREATE_MODIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["OR", "REPLACE", "EDITIONABLE", "NONEDITIONABLE"]
        .into_iter()
        .collect()
});

const DEFAULT_SECTION_TITLE: &str = "Inicio";
const SECTION_MARKER: &str = "SECCIÓN";

#[derive(Default)]
struct UnitSplitter<'a> {
    current: Vec<&'a str>,
    units: Vec<ScriptUnit>,
    /// Whether the open unit is PL/SQL, once its leading words settle it.
    plsql: Option<bool>,
}

impl<'a> UnitSplitter<'a> {
    fn push_line(&mut self, line: &'a str) {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("--") {
            // Comments and blanks between units are dropped; inside a unit they are kept.
            if !self.current.is_empty() {
                self.current.push(line);
            }
            return;
        }

        self.current.push(line);

        if trimmed == "/" {
            self.flush(Terminator::Slash);
        } else if trimmed.ends_with(';') && !self.in_plsql_block() {
            self.flush(Terminator::Semicolon);
        }
    }

    /// A unit that opened as PL/SQL ignores `;` line endings until its `/`.
    fn in_plsql_block(&mut self) -> bool {
        if let Some(plsql) = self.plsql {
            return plsql;
        }
        // Only the first few lines can still be undecided.
        let status = plsql_status(&self.current.join("\n"));
        self.plsql = status;
        status.unwrap_or(false)
    }

    fn flush(&mut self, terminator: Terminator) {
        let joined = self.current.join("\n");
        self.current.clear();
        self.plsql = None;

        let block = joined.trim();
        if block.is_empty() || block.starts_with("--") || block == "/" {
            return;
        }

        self.units.push(ScriptUnit {
            index: self.units.len() + 1,
            text: block.to_string(),
            terminator,
        });
    }

    fn finish(mut self) -> Vec<ScriptUnit> {
        if !self.current.is_empty() {
            self.flush(Terminator::EndOfInput);
        }
        self.units
    }
}

/// Split a script into executable units.
///
/// A line holding only `/` closes the current unit, as does a line ending in
/// `;` unless the unit is a PL/SQL block. Blank and `--` lines between units
/// are dropped. Never fails: malformed input just yields odd boundaries.
pub fn split_script_units(script: &str) -> Vec<ScriptUnit> {
    let mut splitter = UnitSplitter::default();
    for line in script.split('\n') {
        splitter.push_line(line.strip_suffix('\r').unwrap_or(line));
    }
    splitter.finish()
}

const LEADING_WORDS: usize = 8;

/// True for anonymous blocks and `CREATE` statements of stored PL/SQL objects.
pub fn is_plsql_unit(text: &str) -> bool {
    plsql_status(text).unwrap_or(false)
}

/// PL/SQL status from the leading words of `text`, or `None` while a
/// `CREATE` prefix has not reached its object kind yet.
fn plsql_status(text: &str) -> Option<bool> {
    let words: Vec<String> = text
        .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .filter(|word| !word.is_empty())
        .take(LEADING_WORDS)
        .map(|word| word.to_uppercase())
        .collect();

    match words.first().map(String::as_str) {
        None => None,
        Some("BEGIN") | Some("DECLARE") => Some(true),
        Some("CREATE") => match words[1..]
            .iter()
            .find(|word| !CREATE_MODIFIERS.contains(word.as_str()))
        {
            Some(kind) => Some(PLSQL_OBJECT_KINDS.contains(kind.as_str())),
            None if words.len() >= LEADING_WORDS => Some(false),
            None => None,
        },
        Some(_) => Some(false),
    }
}

impl ScriptUnit {
    /// First `max_chars` characters with line breaks collapsed to spaces.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .take(max_chars)
            .collect()
    }

    /// Text handed to the driver: the `/` line is dropped, and the trailing
    /// `;` is dropped for plain SQL. PL/SQL keeps its final `END;`.
    pub fn executable_sql(&self) -> String {
        let mut sql = self.text.as_str();

        if self.terminator == Terminator::Slash {
            if let Some(body) = sql.strip_suffix('/') {
                sql = body.trim_end();
            }
        }

        if is_plsql_unit(sql) {
            sql.to_string()
        } else {
            sql.trim_end_matches(';').trim_end().to_string()
        }
    }
}

/// Split a script into sections headed by `-- SECCIÓN ...` comments.
///
/// Lines before the first heading belong to a section titled `Inicio`.
/// Sections with no lines at all are left out.
pub fn split_sections(script: &str) -> Vec<ScriptSection> {
    let mut sections = Vec::new();
    let mut title = DEFAULT_SECTION_TITLE.to_string();
    let mut content: Vec<&str> = Vec::new();

    for line in script.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match section_title(line) {
            Some(next_title) => {
                if !content.is_empty() {
                    sections.push(ScriptSection {
                        title: std::mem::replace(&mut title, next_title),
                        content: content.join("\n"),
                    });
                    content.clear();
                } else {
                    title = next_title;
                }
            }
            None => content.push(line),
        }
    }

    if !content.is_empty() {
        sections.push(ScriptSection {
            title,
            content: content.join("\n"),
        });
    }

    sections
}

/// Title of a section heading line, or `None` for any other line.
///
/// Accepts `-- SECCIÓN 3: Title`, `-- SECCIÓN: Title` and `-- SECCIÓN Title`,
/// case-insensitively. An empty title falls back to the whole trimmed line.
fn section_title(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix("--")?.trim_start();

    let marker: String = rest.chars().take(SECTION_MARKER.chars().count()).collect();
    if marker.to_uppercase() != SECTION_MARKER {
        return None;
    }
    let rest = rest[marker.len()..].trim_start();

    let numbered = {
        let digits_end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(pos, _)| pos);
        if digits_end > 0 {
            rest[digits_end..].trim_start().strip_prefix(':')
        } else {
            None
        }
    };

    let captured = numbered
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest)
        .trim();

    if captured.is_empty() {
        Some(line.trim().to_string())
    } else {
        Some(captured.to_string())
    }
}
