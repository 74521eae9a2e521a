//! Core data types for the implementation resolver.

use serde::Serialize;

// ─── Naming conventions ──────────────────────────────────────────────

/// Suffix that generated gRPC client handles conventionally carry.
pub const STUB_SUFFIX: &str = "Stub";
/// Hand-written server implementations (priority 1).
pub const GRPC_SERVICE_SUFFIX: &str = "GrpcService";
/// Generated abstract server bases (priority 2).
pub const IMPL_BASE_SUFFIX: &str = "ImplBase";
/// Kotlin coroutine flavour of the generated server base (priority 2).
pub const COROUTINE_IMPL_BASE_SUFFIX: &str = "CoroutineImplBase";

// ─── Declarations ────────────────────────────────────────────────────

/// Where a declaration lives. Line and column are 1-based.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A class (or interface, enum, record) declaration handle returned by a [`SymbolIndex`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDecl {
    /// Simple name, e.g. `UserServiceImplBase`
    pub name: String,
    /// Fully qualified name, e.g. `com.acme.UserServiceGrpc.UserServiceImplBase`
    pub qualified_name: String,
    pub location: Option<SourceLocation>,
}

/// A method declaration handle returned by a [`SymbolIndex`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    pub name: String,
    /// Qualified name of the type that declares the method. For inherited
    /// methods this is the supertype, not the class that was queried.
    pub declaring_class: String,
    pub signature: Option<String>,
    pub location: Option<SourceLocation>,
}

// ─── Symbol index capability ─────────────────────────────────────────

/// Restricts which class declarations a name lookup may return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchScope {
    /// Every declaration the index knows about.
    #[default]
    All,
    /// Only declarations whose file path starts with one of these prefixes.
    Paths(Vec<String>),
}

impl SearchScope {
    /// Build a scope from path prefixes; an empty list means [`SearchScope::All`].
    pub fn from_paths(paths: Vec<String>) -> Self {
        if paths.is_empty() { Self::All } else { Self::Paths(paths) }
    }

    /// Whether a declaration located in `file` is visible. Declarations
    /// without a known file are only visible in [`SearchScope::All`].
    pub fn contains(&self, file: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Paths(prefixes) => match file {
                Some(f) => {
                    let f = f.replace('\\', "/");
                    prefixes.iter().any(|p| f.starts_with(&p.replace('\\', "/")))
                }
                None => false,
            },
        }
    }
}

/// Read-only, queryable collection of declared classes and their methods.
///
/// The resolver never mutates the index. Enumeration order of
/// [`all_class_names`](SymbolIndex::all_class_names) and
/// [`classes_by_name`](SymbolIndex::classes_by_name) is whatever the
/// implementation produces; callers that need reproducible tie-breaking
/// should use [`CandidateOrder::Lexicographic`].
pub trait SymbolIndex {
    /// All known simple class names.
    fn all_class_names(&self) -> Vec<String>;

    /// Class declarations with exactly this simple name, visible in `scope`.
    fn classes_by_name(&self, name: &str, scope: &SearchScope) -> Vec<ClassDecl>;

    /// Methods named exactly `name` declared on `class`; with
    /// `include_inherited`, methods declared on its supertypes as well.
    fn find_methods_by_name(
        &self,
        class: &ClassDecl,
        name: &str,
        include_inherited: bool,
    ) -> Vec<MethodDecl>;
}

// ─── Configuration ───────────────────────────────────────────────────

/// What to do with a receiver that does not end in `Stub`.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuffixPolicy {
    /// Refuse to resolve receivers without the `Stub` suffix.
    #[default]
    RequireStub,
    /// Strip `Stub` when present and resolve unconditionally.
    StripIfPresent,
}

impl SuffixPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequireStub => "require-stub",
            Self::StripIfPresent => "strip-if-present",
        }
    }
}

impl std::fmt::Display for SuffixPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SuffixPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "require-stub" | "require" => Ok(Self::RequireStub),
            "strip-if-present" | "strip" => Ok(Self::StripIfPresent),
            other => Err(format!("Unknown suffix policy: '{}' (expected require-stub or strip-if-present)", other)),
        }
    }
}

/// Order in which candidates are tried within a priority tier.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidateOrder {
    /// Whatever order the index enumerates. Unspecified; do not rely on it.
    #[default]
    Index,
    /// Sorted by qualified name, then by location.
    Lexicographic,
}

impl CandidateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Lexicographic => "lexicographic",
        }
    }
}

impl std::fmt::Display for CandidateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CandidateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "lexicographic" | "lex" | "sorted" => Ok(Self::Lexicographic),
            other => Err(format!("Unknown candidate order: '{}' (expected index or lexicographic)", other)),
        }
    }
}

/// Resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub suffix_policy: SuffixPolicy,
    pub order: CandidateOrder,
    pub scope: SearchScope,
}

// ─── Call sites and results ──────────────────────────────────────────

/// A `receiver.method(...)` pair taken from a client call expression.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub receiver: String,
    pub method: String,
}

impl CallSite {
    pub fn new(receiver: impl AsRef<str>, method: impl AsRef<str>) -> Self {
        Self {
            receiver: receiver.as_ref().trim().to_string(),
            method: method.as_ref().trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.receiver.is_empty() || self.method.is_empty()
    }
}

impl std::fmt::Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.receiver, self.method)
    }
}

/// Priority tier a matched class belongs to.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// `*GrpcService`
    GrpcService,
    /// `*ImplBase` / `*CoroutineImplBase`
    ImplBase,
}

impl Tier {
    /// Tiers in the order they are tried.
    pub const PRIORITY: [Tier; 2] = [Tier::GrpcService, Tier::ImplBase];

    /// Classify a simple class name. Suffixes are matched literally.
    pub fn of(simple_name: &str) -> Option<Tier> {
        if simple_name.ends_with(GRPC_SERVICE_SUFFIX) {
            Some(Tier::GrpcService)
        } else if simple_name.ends_with(IMPL_BASE_SUFFIX)
            || simple_name.ends_with(COROUTINE_IMPL_BASE_SUFFIX)
        {
            Some(Tier::ImplBase)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrpcService => "GrpcService",
            Self::ImplBase => "ImplBase",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The chosen implementation: a class and one of its (possibly inherited) methods.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub class: ClassDecl,
    pub method: MethodDecl,
    pub tier: Tier,
}

/// Why resolution produced no match. None of these are errors.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotFound {
    /// Receiver or method was empty after trimming.
    BlankInput,
    /// [`SuffixPolicy::RequireStub`] is active and the receiver lacks `Stub`.
    MissingStubSuffix { receiver: String, method: String },
    /// No candidate class, or no candidate in any priority tier.
    NoImplementation { receiver: String, method: String, candidates: usize },
    /// A tier-qualifying class exists but none declares the method.
    MethodNotFound { method: String, class_name: String },
}

impl NotFound {
    /// User-facing notice text.
    ///
    /// The receiver appears as written at the call site (`userServiceStub`),
    /// not as the lowercased, `Stub`-stripped base name used for matching.
    pub fn message(&self) -> String {
        match self {
            Self::BlankInput => "Could not extract receiver/method from call site".to_string(),
            Self::MissingStubSuffix { receiver, method }
            | Self::NoImplementation { receiver, method, .. } => {
                format!("No implementation found for {}.{}", receiver, method)
            }
            Self::MethodNotFound { method, class_name } => {
                format!("Method {} not found in implementation {}", method, class_name)
            }
        }
    }
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of one resolution request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Found(Match),
    NotFound(NotFound),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_match(self) -> Option<Match> {
        match self {
            Self::Found(m) => Some(m),
            Self::NotFound(_) => None,
        }
    }
}
