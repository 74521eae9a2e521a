//! Definition index: AST-based code structure extraction using tree-sitter.
//!
//! Built in memory for every invocation; nothing is written to disk.

mod types;
mod parser_java;
mod parser_kotlin;
mod symbols;

// Re-export all public types and functions
pub use types::*;

use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::{info, warn};

use grpcnav::{clean_path, read_file_lossy, CallSite};

use crate::error::NavError;

/// Extensions that have a grammar wired up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["java", "kt", "kts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Java,
    Kotlin,
}

impl SourceLanguage {
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "java" => Some(Self::Java),
            "kt" | "kts" => Some(Self::Kotlin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "Java",
            Self::Kotlin => "Kotlin",
        }
    }

    pub(crate) fn parser(self) -> Result<tree_sitter::Parser, NavError> {
        let language: tree_sitter::Language = match self {
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::Kotlin => tree_sitter_kotlin::LANGUAGE.into(),
        };
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&language)
            .map_err(|source| NavError::Grammar { language: self.as_str(), source })?;
        Ok(parser)
    }
}

/// A parser for `language` if any of `extensions` maps to it.
fn parser_for(extensions: &[String], language: SourceLanguage) -> Result<Option<tree_sitter::Parser>, NavError> {
    if extensions.iter().any(|e| SourceLanguage::from_ext(e) == Some(language)) {
        language.parser().map(Some)
    } else {
        Ok(None)
    }
}

// ─── Index Build ─────────────────────────────────────────────────────

pub fn build_definition_index(args: &DefIndexArgs) -> Result<DefinitionIndex, NavError> {
    if !Path::new(&args.dir).is_dir() {
        return Err(NavError::DirNotFound(args.dir.clone()));
    }
    let dir = std::fs::canonicalize(&args.dir)?;
    let dir_str = clean_path(&dir.to_string_lossy());

    let extensions: Vec<String> = args.ext.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    for ext in &extensions {
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            warn!(ext = %ext, "No grammar for extension, files will be skipped");
        }
    }

    let start = Instant::now();

    // Collect all files in a stable order
    let mut walker = WalkBuilder::new(&dir);
    walker.hidden(false)
        .git_ignore(!args.no_ignore)
        .git_global(!args.no_ignore)
        .git_exclude(!args.no_ignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files: Vec<String> = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let ext_match = path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
        if ext_match {
            files.push(clean_path(&path.to_string_lossy()));
        }
    }
    info!(files = files.len(), dir = %dir_str, "Found files to parse");

    let mut java = parser_for(&extensions, SourceLanguage::Java)?;
    let mut kotlin = parser_for(&extensions, SourceLanguage::Kotlin)?;

    let mut index = DefinitionIndex {
        root: dir_str,
        extensions,
        ..DefinitionIndex::default()
    };

    for (i, file_path) in files.iter().enumerate() {
        let file_id = i as u32;

        let (content, was_lossy) = match read_file_lossy(Path::new(file_path)) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %file_path, error = %e, "Failed to read file");
                index.parse_errors += 1;
                continue;
            }
        };
        if was_lossy {
            warn!(path = %file_path, "File contains non-UTF8 bytes (lossy conversion applied)");
            index.lossy_file_count += 1;
        }

        let language = Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceLanguage::from_ext);
        let file_defs = match (language, java.as_mut(), kotlin.as_mut()) {
            (Some(SourceLanguage::Java), Some(parser), _) => {
                parser_java::parse_java_definitions(parser, &content, file_id)
            }
            (Some(SourceLanguage::Kotlin), _, Some(parser)) => {
                parser_kotlin::parse_kotlin_definitions(parser, &content, file_id)
            }
            _ => Vec::new(),
        };

        if file_defs.is_empty() {
            index.empty_file_ids.push((file_id, content.len() as u64));
        } else {
            index.add_file_definitions(file_id, file_defs);
        }
    }
    index.files = files;

    info!(
        elapsed_ms = format_args!("{:.1}", start.elapsed().as_secs_f64() * 1000.0),
        files = index.files.len(),
        definitions = index.definitions.len(),
        empty = index.empty_file_ids.len(),
        read_errors = index.parse_errors,
        lossy = index.lossy_file_count,
        "Definition index built"
    );

    Ok(index)
}

// ─── Call site lookup ────────────────────────────────────────────────

/// Parse `file` and return the qualified call enclosing the 1-based cursor.
/// The grammar is chosen by extension; unknown extensions are read as Java.
pub fn find_call_site(file: &Path, line: u32, column: u32) -> Result<Option<CallSite>, NavError> {
    if !file.is_file() {
        return Err(NavError::FileNotFound(file.display().to_string()));
    }
    let (content, _) = read_file_lossy(file)?;
    let language = file.extension()
        .and_then(|e| e.to_str())
        .and_then(SourceLanguage::from_ext)
        .unwrap_or(SourceLanguage::Java);
    let mut parser = language.parser()?;
    let call = match language {
        SourceLanguage::Java => parser_java::extract_call_site(&mut parser, &content, line, column),
        SourceLanguage::Kotlin => parser_kotlin::extract_call_site(&mut parser, &content, line, column),
    };
    Ok(call)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "definitions_tests.rs"]
mod tests;
