//! Source files carrying `#metacode` blocks
//!
//! A block declares tables and macros inside line comments and lists macro
//! invocations; the text between the following `#metagen` and `#metaend`
//! markers is regenerated from those invocations:
//!
//! ```text
//! // #metacode
//! // #macro ENUM(name,t)
//! //   typedef enum {
//! //     {{~#for r of t~}}
//! //     {{name}}_{{r.k}},
//! //     {{~/for~}}
//! //   } {{name}};
//! // #table T_COLORS
//! //   k     |
//! //   Red   |
//! //   Green |
//! // ENUM(Color, T_COLORS)
//! // #metagen
//! ...generated text, replaced on every run...
//! // #metaend
//! ```
//!
//! Everything outside generated regions is preserved byte for byte, so
//! expanding an already expanded file is a no-op.

mod lines;

use crate::config::SyntaxConfig;
use crate::error::{MetacodeError, Result};
use crate::table::{parse_table, Table};
use crate::template::{engine::is_ident, Binding, Macro, TemplateEngine};
use lines::{split_lines, Classifier, Line, LineKind, Marker};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

/// A macro call listed in a `#metacode` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    #[serde(rename = "macro")]
    pub name: String,
    pub args: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone)]
struct MacroDef {
    mac: Macro,
    /// Line of the `#macro` marker; body line `n` is file line `line + n`
    line: usize,
}

#[derive(Debug, Clone)]
struct Region {
    invocations: Vec<Invocation>,
    /// Byte range of the generated text (between the marker lines)
    body: Range<usize>,
    line: usize,
}

#[derive(Debug, Clone)]
enum Entry {
    Table { table: Table, line: usize },
    Macro(MacroDef),
    Region(Region),
}

enum State {
    Outside,
    Header {
        invocations: Vec<Invocation>,
    },
    Generated {
        invocations: Vec<Invocation>,
        start: usize,
        line: usize,
    },
}

/// A parsed source file
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    entries: Vec<Entry>,
    has_metacode: bool,
    classifier: Classifier,
}

/// Inspection view of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub tables: Vec<TableSummary>,
    pub macros: Vec<MacroSummary>,
    pub invocations: Vec<Invocation>,
    pub regions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub line: usize,
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroSummary {
    pub name: String,
    pub line: usize,
    pub params: Vec<String>,
}

/// State of a file relative to its `#metacode` blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// No `#metacode` marker; the file is not touched
    NoMetacode,
    /// Generated regions already match their expansions
    UpToDate,
    /// At least one generated region differs from its expansion
    Stale,
}

impl Document {
    /// Parse a source file's `#metacode` blocks
    ///
    /// # Errors
    ///
    /// `MalformedDirective` for misplaced markers or bad macro/invocation
    /// syntax; template and table errors from macro and table bodies, with
    /// lines relative to the whole file.
    pub fn parse(source: impl Into<String>, syntax: &SyntaxConfig) -> Result<Self> {
        let source = source.into();
        let classifier = Classifier::new(syntax);
        let body_column_offset = classifier.body_column_offset();
        let lines = split_lines(&source);

        let mut entries = Vec::new();
        let mut has_metacode = false;
        let mut state = State::Outside;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            i += 1;

            state = match (state, classifier.classify(line.content)) {
                // Previously generated text: skipped until #metaend
                (
                    State::Generated {
                        invocations,
                        start,
                        line: gen_line,
                    },
                    LineKind::Marker(Marker::Metaend),
                ) => {
                    entries.push(Entry::Region(Region {
                        invocations,
                        body: start..line.start,
                        line: gen_line,
                    }));
                    State::Outside
                }
                (State::Generated { line: gen_line, .. }, LineKind::Marker(Marker::Metacode))
                | (State::Generated { line: gen_line, .. }, LineKind::Marker(Marker::Metagen)) => {
                    return Err(MetacodeError::malformed(
                        line.number,
                        format!("#metagen at line {} must be followed by #metaend", gen_line),
                    ));
                }
                (state @ State::Generated { .. }, _) => state,

                (State::Outside, LineKind::Marker(Marker::Metacode)) => {
                    has_metacode = true;
                    State::Header {
                        invocations: Vec::new(),
                    }
                }
                (State::Outside, LineKind::Marker(Marker::Metagen)) => {
                    return Err(MetacodeError::malformed(
                        line.number,
                        "#metagen must be preceded by #metacode",
                    ));
                }
                (State::Outside, LineKind::Marker(Marker::Metaend)) => {
                    return Err(MetacodeError::malformed(
                        line.number,
                        "#metaend must be preceded by #metagen",
                    ));
                }
                (State::Outside, _) => State::Outside,

                (State::Header { invocations }, LineKind::Marker(marker)) => match marker {
                    // A repeated #metacode continues the current header
                    Marker::Metacode => State::Header { invocations },
                    Marker::Macro(signature) => {
                        let (body, consumed) = collect_body(&lines[i..], &classifier);
                        i += consumed;
                        let def = parse_macro(signature, &body, line.number, body_column_offset)?;
                        log::debug!("defined macro '{}' at line {}", def.mac.name(), def.line);
                        entries.push(Entry::Macro(def));
                        State::Header { invocations }
                    }
                    Marker::Table(name) => {
                        let (body, consumed) = collect_body(&lines[i..], &classifier);
                        i += consumed;
                        if !is_ident(name) {
                            return Err(MetacodeError::malformed(
                                line.number,
                                format!("invalid table name '{}'", name),
                            ));
                        }
                        let table = parse_table(name, &body)
                            .map_err(|e| e.relocate(line.number))?;
                        entries.push(Entry::Table {
                            table,
                            line: line.number,
                        });
                        State::Header { invocations }
                    }
                    Marker::Metagen => State::Generated {
                        invocations,
                        start: line.end,
                        line: line.number,
                    },
                    Marker::Metaend => {
                        return Err(MetacodeError::malformed(
                            line.number,
                            "#metaend must be preceded by #metagen",
                        ));
                    }
                },
                (state @ State::Header { .. }, LineKind::Blank) => state,
                (State::Header { mut invocations }, LineKind::Text(text))
                | (State::Header { mut invocations }, LineKind::Body(text)) => {
                    invocations.push(parse_invocation(text, line.number)?);
                    State::Header { invocations }
                }
                (State::Header { invocations }, LineKind::Code) => {
                    warn_unplaced(&invocations);
                    State::Outside
                }
            };
        }

        match state {
            State::Generated { line, .. } => {
                return Err(MetacodeError::malformed(
                    line,
                    "#metagen is never closed by #metaend",
                ));
            }
            State::Header { invocations } => warn_unplaced(&invocations),
            State::Outside => {}
        }

        Ok(Self {
            source,
            entries,
            has_metacode,
            classifier,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the file contains at least one `#metacode` marker
    pub fn has_metacode(&self) -> bool {
        self.has_metacode
    }

    /// Produce the file text with every generated region re-expanded
    ///
    /// Each region sees the tables and macros declared before it; a later
    /// declaration with the same name replaces an earlier one.
    pub fn expand(&self) -> Result<String> {
        let engine = TemplateEngine::new();
        let mut tables: BTreeMap<&str, &Table> = BTreeMap::new();
        let mut macros: BTreeMap<&str, &MacroDef> = BTreeMap::new();
        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;

        for entry in &self.entries {
            match entry {
                Entry::Table { table, .. } => {
                    tables.insert(table.name(), table);
                }
                Entry::Macro(def) => {
                    macros.insert(def.mac.name(), def);
                }
                Entry::Region(region) => {
                    output.push_str(&self.source[cursor..region.body.start]);
                    for invocation in &region.invocations {
                        let text = self.expand_invocation(&engine, invocation, &tables, &macros)?;
                        self.reject_markers(invocation, &text)?;
                        output.push_str(&text);
                        if !text.is_empty() && !text.ends_with('\n') {
                            output.push('\n');
                        }
                    }
                    log::debug!(
                        "expanded region at line {} ({} invocation(s))",
                        region.line,
                        region.invocations.len()
                    );
                    cursor = region.body.end;
                }
            }
        }

        output.push_str(&self.source[cursor..]);
        Ok(output)
    }

    fn expand_invocation(
        &self,
        engine: &TemplateEngine,
        invocation: &Invocation,
        tables: &BTreeMap<&str, &Table>,
        macros: &BTreeMap<&str, &MacroDef>,
    ) -> Result<String> {
        let def = macros
            .get(invocation.name.as_str())
            .ok_or_else(|| MetacodeError::UnknownMacro {
                name: invocation.name.clone(),
                line: invocation.line,
            })?;

        // Arguments naming a declared table bind to it; the rest are literal
        let args = invocation
            .args
            .iter()
            .map(|arg| match tables.get(arg.as_str()) {
                Some(table) => Binding::Table(*table),
                None => Binding::Text(arg.clone()),
            })
            .collect();

        let failed = |source: crate::template::TemplateError| MetacodeError::Expansion {
            name: invocation.name.clone(),
            line: invocation.line,
            source: source.relocate(def.line, self.classifier.body_column_offset()),
        };

        let env = def.mac.bind(args).map_err(failed)?;
        engine.expand(&def.mac, &env).map_err(failed)
    }

    /// Fail if generated text contains a line read as a marker
    ///
    /// Such a line would end or reopen the region on the next run, leaving
    /// a file that no longer parses.
    fn reject_markers(&self, invocation: &Invocation, text: &str) -> Result<()> {
        let marker = split_lines(text)
            .into_iter()
            .find(|line| matches!(self.classifier.classify(line.content), LineKind::Marker(_)));
        match marker {
            Some(line) => Err(MetacodeError::malformed(
                invocation.line,
                format!(
                    "expansion of '{}' emits marker line '{}' (output line {})",
                    invocation.name,
                    line.content.trim_end(),
                    line.number
                ),
            )),
            None => Ok(()),
        }
    }

    /// Compare generated regions against a fresh expansion
    pub fn status(&self) -> Result<FileStatus> {
        if !self.has_metacode {
            return Ok(FileStatus::NoMetacode);
        }
        if self.expand()? == self.source {
            Ok(FileStatus::UpToDate)
        } else {
            Ok(FileStatus::Stale)
        }
    }

    /// Tables, macros and invocations declared in the file
    pub fn summary(&self) -> DocumentSummary {
        let mut summary = DocumentSummary {
            tables: Vec::new(),
            macros: Vec::new(),
            invocations: Vec::new(),
            regions: 0,
        };
        for entry in &self.entries {
            match entry {
                Entry::Table { table, line } => summary.tables.push(TableSummary {
                    name: table.name().to_string(),
                    line: *line,
                    columns: table.columns().to_vec(),
                    rows: table.len(),
                }),
                Entry::Macro(def) => summary.macros.push(MacroSummary {
                    name: def.mac.name().to_string(),
                    line: def.line,
                    params: def.mac.params().to_vec(),
                }),
                Entry::Region(region) => {
                    summary.regions += 1;
                    summary.invocations.extend(region.invocations.iter().cloned());
                }
            }
        }
        summary
    }
}

fn warn_unplaced(invocations: &[Invocation]) {
    for invocation in invocations {
        log::warn!(
            "invocation of '{}' at line {} has no #metagen region and is ignored",
            invocation.name,
            invocation.line
        );
    }
}

/// Collect body lines after a `#macro`/`#table` marker
///
/// Returns the body text (indentation stripped, trailing blank lines
/// dropped) and the number of lines consumed.
fn collect_body(lines: &[Line<'_>], classifier: &Classifier) -> (String, usize) {
    let mut body = String::new();
    let mut pending_blank = String::new();
    let mut consumed = 0;

    for line in lines {
        let ending = if line.ending.is_empty() { "\n" } else { line.ending };
        match classifier.classify(line.content) {
            LineKind::Body(text) => {
                body.push_str(&pending_blank);
                pending_blank.clear();
                body.push_str(text);
                body.push_str(ending);
            }
            LineKind::Blank => pending_blank.push_str(ending),
            _ => break,
        }
        consumed += 1;
    }

    (body, consumed)
}

/// Split `NAME(a, b)` into name and trimmed arguments
fn parse_call(text: &str) -> Option<(&str, Vec<&str>)> {
    let text = text.trim().trim_end_matches(';').trim_end();
    let open = text.find('(')?;
    let inner = text[open + 1..].strip_suffix(')')?;
    let name = text[..open].trim();
    if !is_ident(name) || inner.contains(['(', ')']) {
        return None;
    }
    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };
    Some((name, args))
}

fn parse_macro(
    signature: &str,
    body: &str,
    line: usize,
    column_offset: usize,
) -> Result<MacroDef> {
    let (name, params) = parse_call(signature).ok_or_else(|| {
        MetacodeError::malformed(
            line,
            format!("invalid macro signature '{}': expected NAME(param, ...)", signature),
        )
    })?;

    let mut seen: Vec<&str> = Vec::with_capacity(params.len());
    for param in &params {
        if !is_ident(param) {
            return Err(MetacodeError::malformed(
                line,
                format!("invalid parameter name '{}' in macro '{}'", param, name),
            ));
        }
        if seen.contains(param) {
            return Err(MetacodeError::malformed(
                line,
                format!("duplicate parameter '{}' in macro '{}'", param, name),
            ));
        }
        seen.push(param);
    }

    let params = params.into_iter().map(str::to_string).collect();
    let mac = Macro::parse(name, params, body).map_err(|e| e.relocate(line, column_offset))?;
    Ok(MacroDef { mac, line })
}

fn parse_invocation(text: &str, line: usize) -> Result<Invocation> {
    let (name, args) = parse_call(text).ok_or_else(|| {
        MetacodeError::malformed(
            line,
            format!("expected a macro invocation NAME(arg, ...), found '{}'", text.trim()),
        )
    })?;
    if args.iter().any(|arg| arg.is_empty()) {
        return Err(MetacodeError::malformed(
            line,
            format!("empty argument in invocation of '{}'", name),
        ));
    }
    Ok(Invocation {
        name: name.to_string(),
        args: args.into_iter().map(str::to_string).collect(),
        line,
    })
}

/// Expand source text in memory
pub fn expand_source(source: &str, syntax: &SyntaxConfig) -> Result<String> {
    Document::parse(source, syntax)?.expand()
}

/// Report whether a file's generated regions are current, without writing
pub fn check_file(path: impl AsRef<Path>, syntax: &SyntaxConfig) -> Result<FileStatus> {
    let source = fs::read_to_string(path.as_ref())?;
    Document::parse(source, syntax)?.status()
}

/// Re-expand a file in place
///
/// Returns the status found before writing: only a `Stale` file is
/// rewritten, so an up-to-date file keeps its modification time.
pub fn expand_file(path: impl AsRef<Path>, syntax: &SyntaxConfig) -> Result<FileStatus> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let document = Document::parse(source, syntax)?;
    if !document.has_metacode() {
        return Ok(FileStatus::NoMetacode);
    }

    let expanded = document.expand()?;
    if expanded == document.source() {
        return Ok(FileStatus::UpToDate);
    }

    write_atomic(path, &expanded)?;
    log::info!("rewrote {}", path.display());
    Ok(FileStatus::Stale)
}

/// Write through a temp file in the same directory, then rename over `path`
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|e| MetacodeError::IoError(e.error))?;
    Ok(())
}
