//! CLI argument structs for all subcommands.

use clap::{Args, Parser};

use grpcnav::{CandidateOrder, ResolverConfig, SearchScope, SuffixPolicy};

use crate::definitions::DefIndexArgs;

/// Source tree and resolver settings shared by every lookup command.
#[derive(Args, Debug, Clone)]
pub struct ResolveOpts {
    /// Root directory of the project to index
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extensions to index, comma-separated (java, kt, kts)
    #[arg(short, long, default_value = "java,kt")]
    pub ext: String,

    /// Also index .gitignore'd files (generated gRPC sources often live under build/)
    #[arg(long)]
    pub no_ignore: bool,

    /// What to do with receivers that do not end in "Stub":
    /// require-stub refuses them, strip-if-present resolves them as-is
    #[arg(long, default_value = "require-stub")]
    pub suffix_policy: SuffixPolicy,

    /// Candidate order within a priority tier: index (walk order) or lexicographic (by qualified name)
    #[arg(long, default_value = "lexicographic")]
    pub order: CandidateOrder,

    /// Only consider implementations under this path (repeatable)
    #[arg(long = "scope")]
    pub scope: Vec<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ResolveOpts {
    pub fn def_index_args(&self) -> DefIndexArgs {
        DefIndexArgs {
            dir: self.dir.clone(),
            ext: self.ext.clone(),
            no_ignore: self.no_ignore,
        }
    }

    /// Scope prefixes are canonicalized so they compare against indexed paths.
    pub fn resolver_config(&self) -> ResolverConfig {
        let scope = self.scope.iter()
            .map(|p| {
                std::fs::canonicalize(p)
                    .map(|c| grpcnav::clean_path(&c.to_string_lossy()))
                    .unwrap_or_else(|_| p.clone())
            })
            .collect();
        ResolverConfig {
            suffix_policy: self.suffix_policy,
            order: self.order,
            scope: SearchScope::from_paths(scope),
        }
    }
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Indexes the project, finds the qualified call under the cursor
  (e.g. userServiceStub.getUser(request)), and prints the location of the
  server-side implementation of that method.

  Implementations are searched among classes whose name contains the
  receiver name without its "Stub" suffix:
    1. *GrpcService classes declaring the method (hand-written servers)
    2. *ImplBase / *CoroutineImplBase classes declaring it (generated bases)

EXAMPLES:
  Jump from a call:   grpcnav goto --dir . --file src/main/java/App.java --line 42 --col 31
  Generated sources:  grpcnav goto --file App.java --line 42 --col 31 --no-ignore
  JSON for editors:   grpcnav goto --file App.java --line 42 --col 31 --json

EXIT STATUS:
  0 implementation found, 1 nothing found, 2 error
"#)]
pub struct GotoArgs {
    /// Source file containing the client call
    #[arg(short, long)]
    pub file: String,

    /// 1-based cursor line
    #[arg(short, long)]
    pub line: u32,

    /// 1-based cursor column (characters)
    #[arg(short, long)]
    pub col: u32,

    #[command(flatten)]
    pub opts: ResolveOpts,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Resolves an explicit receiver.method pair without parsing a call site.

EXAMPLES:
  grpcnav resolve --receiver userServiceStub --method getUser
  grpcnav resolve --receiver orderClient --method place --suffix-policy strip-if-present
"#)]
pub struct ResolveArgs {
    /// Receiver identifier, e.g. userServiceStub
    #[arg(short, long)]
    pub receiver: String,

    /// Method name, e.g. getUser
    #[arg(short, long)]
    pub method: String,

    #[command(flatten)]
    pub opts: ResolveOpts,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Lists every class considered for a receiver, in the order they are tried,
  with the priority tier each one belongs to. With --method, also shows
  whether each candidate declares (or inherits) that method.

EXAMPLES:
  grpcnav candidates --receiver userServiceStub
  grpcnav candidates --receiver userServiceStub --method getUser --order index
"#)]
pub struct CandidatesArgs {
    /// Receiver identifier, e.g. userServiceStub
    #[arg(short, long)]
    pub receiver: String,

    /// Method to check on each candidate
    #[arg(short, long)]
    pub method: Option<String>,

    #[command(flatten)]
    pub opts: ResolveOpts,
}
