//! Core data types for the definition index.

use std::collections::HashMap;

// ─── Definition Kind ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    /// Kotlin `object`
    Object,
    Method,
    Constructor,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Annotation => "annotation",
            Self::Object => "object",
            Self::Method => "method",
            Self::Constructor => "constructor",
        }
    }

    /// Kinds that show up as classes to the resolver.
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Enum | Self::Record | Self::Annotation | Self::Object)
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Definition Entry ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DefinitionEntry {
    pub file_id: u32,
    pub name: String,
    pub kind: DefinitionKind,
    /// 1-based line and column of the declared name
    pub line: u32,
    pub column: u32,
    /// Package of the declaring file
    pub package: Option<String>,
    /// Qualified name of the enclosing type
    pub parent: Option<String>,
    /// `package.Outer.Inner` for types, `package.Outer.method` for members
    pub qualified_name: String,
    pub signature: Option<String>,
    /// Supertypes as written: `extends` first, then `implements`
    /// (Kotlin: delegation specifiers in order)
    pub base_types: Vec<String>,
}

// ─── Definition Index ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DefinitionIndex {
    pub root: String,
    pub extensions: Vec<String>,
    /// file_id -> file path
    pub files: Vec<String>,
    /// All definitions
    pub definitions: Vec<DefinitionEntry>,
    /// name (lowercased) -> Vec<index into definitions>
    pub name_index: HashMap<String, Vec<u32>>,
    /// kind -> Vec<index into definitions>
    pub kind_index: HashMap<DefinitionKind, Vec<u32>>,
    /// file_id -> Vec<index into definitions>
    pub file_index: HashMap<u32, Vec<u32>>,
    /// (file_id, type qualified name) -> Vec<index of member definitions>
    pub members: HashMap<(u32, String), Vec<u32>>,
    /// Number of files that could not be read (IO errors) during index build.
    pub parse_errors: usize,
    /// Number of files that contained non-UTF8 bytes and were read with lossy conversion.
    pub lossy_file_count: usize,
    /// Files that were read and parsed but produced 0 definitions.
    /// Each entry is (file_id, byte_size).
    pub empty_file_ids: Vec<(u32, u64)>,
}

impl DefinitionIndex {
    /// Append one file's definitions and update every lookup table.
    pub fn add_file_definitions(&mut self, file_id: u32, defs: Vec<DefinitionEntry>) {
        for def in defs {
            let def_idx = self.definitions.len() as u32;

            self.name_index.entry(def.name.to_lowercase())
                .or_default()
                .push(def_idx);

            self.kind_index.entry(def.kind)
                .or_default()
                .push(def_idx);

            self.file_index.entry(file_id)
                .or_default()
                .push(def_idx);

            if let Some(ref parent) = def.parent {
                self.members.entry((file_id, parent.clone()))
                    .or_default()
                    .push(def_idx);
            }

            self.definitions.push(def);
        }
    }

    pub fn file_path(&self, file_id: u32) -> Option<&str> {
        self.files.get(file_id as usize).map(|s| s.as_str())
    }

    /// Number of definitions of each kind.
    pub fn kind_counts(&self) -> Vec<(DefinitionKind, usize)> {
        let mut counts: Vec<_> = self.kind_index.iter().map(|(k, ids)| (*k, ids.len())).collect();
        counts.sort();
        counts
    }

    /// Type definitions, in definition order.
    pub fn type_definitions(&self) -> impl Iterator<Item = (u32, &DefinitionEntry)> {
        self.definitions.iter()
            .enumerate()
            .filter(|(_, d)| d.kind.is_type())
            .map(|(i, d)| (i as u32, d))
    }
}

// ─── CLI Args ────────────────────────────────────────────────────────

use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct DefIndexArgs {
    /// Directory to recursively scan for source files to parse
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extensions to parse, comma-separated.
    /// .java and .kt/.kts have grammars; other extensions are skipped.
    #[arg(short, long, default_value = "java,kt")]
    pub ext: String,

    /// Also index files ignored by .gitignore (e.g. generated gRPC sources under build/)
    #[arg(long)]
    pub no_ignore: bool,
}
