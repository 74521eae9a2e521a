//! Implementation resolver: from a client call site to the server-side method.
//!
//! The receiver name is mapped to a base name by stripping the `Stub` suffix.
//! Every class whose simple name contains that base name (case-insensitive)
//! is a candidate. Candidates are tried in two tiers:
//!
//! 1. `*GrpcService` classes that declare the method;
//! 2. generated `*ImplBase` / `*CoroutineImplBase` classes that declare it.
//!
//! The first hit wins. Nothing is cached: every call queries the index afresh.

mod types;
mod memory;

pub use types::*;
pub use memory::MemoryIndex;

use tracing::{debug, info};

// ─── Base name derivation ────────────────────────────────────────────

/// Lowercased receiver name with the `Stub` suffix removed.
///
/// The suffix is detected ASCII case-insensitively. Returns `None` when the
/// receiver is blank, or when `policy` is [`SuffixPolicy::RequireStub`] and
/// the suffix is absent.
///
/// ```
/// use grpcnav::{derive_base_name, SuffixPolicy};
///
/// assert_eq!(derive_base_name("UserServiceStub", SuffixPolicy::RequireStub).as_deref(), Some("userservice"));
/// assert_eq!(derive_base_name("userService", SuffixPolicy::RequireStub), None);
/// assert_eq!(derive_base_name("userService", SuffixPolicy::StripIfPresent).as_deref(), Some("userservice"));
/// ```
#[must_use]
pub fn derive_base_name(receiver: &str, policy: SuffixPolicy) -> Option<String> {
    let receiver = receiver.trim();
    if receiver.is_empty() {
        return None;
    }
    match strip_stub_suffix(receiver) {
        Some(stripped) => Some(stripped.to_lowercase()),
        None => match policy {
            SuffixPolicy::RequireStub => None,
            SuffixPolicy::StripIfPresent => Some(receiver.to_lowercase()),
        },
    }
}

fn strip_stub_suffix(receiver: &str) -> Option<&str> {
    let split = receiver.len().checked_sub(STUB_SUFFIX.len())?;
    let (head, tail) = (receiver.get(..split)?, receiver.get(split..)?);
    tail.eq_ignore_ascii_case(STUB_SUFFIX).then_some(head)
}

// ─── Candidates ──────────────────────────────────────────────────────

/// All class declarations whose simple name contains `base_name`
/// (case-insensitive), in the order configured by `config.order`.
pub fn candidates<I: SymbolIndex + ?Sized>(
    index: &I,
    base_name: &str,
    config: &ResolverConfig,
) -> Vec<ClassDecl> {
    let needle = base_name.to_lowercase();
    let mut names = index.all_class_names();
    let total_names = names.len();
    let mut seen = std::collections::HashSet::new();
    names.retain(|n| n.to_lowercase().contains(&needle) && seen.insert(n.clone()));

    let mut classes: Vec<ClassDecl> = names
        .iter()
        .flat_map(|n| index.classes_by_name(n, &config.scope))
        .collect();

    if config.order == CandidateOrder::Lexicographic {
        classes.sort_by(|a, b| {
            a.qualified_name
                .cmp(&b.qualified_name)
                .then_with(|| location_key(a).cmp(&location_key(b)))
        });
    }

    debug!(
        base_name = %needle,
        total_names,
        matched_names = names.len(),
        candidates = classes.len(),
        "Collected candidate classes"
    );
    classes
}

fn location_key(c: &ClassDecl) -> (&str, u32, u32) {
    c.location
        .as_ref()
        .map(|l| (l.file.as_str(), l.line, l.column))
        .unwrap_or(("", 0, 0))
}

// ─── Resolution ──────────────────────────────────────────────────────

/// Resolver bound to an index and a configuration.
pub struct Resolver<'a, I: SymbolIndex + ?Sized> {
    index: &'a I,
    config: ResolverConfig,
}

impl<'a, I: SymbolIndex + ?Sized> Resolver<'a, I> {
    pub fn new(index: &'a I, config: ResolverConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a call site to the best implementation by tier priority.
    pub fn resolve(&self, call: &CallSite) -> Resolution {
        let call = CallSite::new(&call.receiver, &call.method);
        if call.is_blank() {
            debug!("Blank receiver or method, skipping resolution");
            return Resolution::NotFound(NotFound::BlankInput);
        }

        let Some(base_name) = derive_base_name(&call.receiver, self.config.suffix_policy) else {
            debug!(receiver = %call.receiver, policy = %self.config.suffix_policy, "Receiver is not a stub");
            return Resolution::NotFound(NotFound::MissingStubSuffix {
                receiver: call.receiver,
                method: call.method,
            });
        };
        if base_name.is_empty() {
            return Resolution::NotFound(NotFound::NoImplementation {
                receiver: call.receiver,
                method: call.method,
                candidates: 0,
            });
        }

        let candidates = candidates(self.index, &base_name, &self.config);
        let mut lacking_method: Option<&ClassDecl> = None;

        for tier in Tier::PRIORITY {
            for class in candidates.iter().filter(|c| Tier::of(&c.name) == Some(tier)) {
                let methods = self.index.find_methods_by_name(class, &call.method, true);
                debug!(
                    class = %class.qualified_name,
                    tier = %tier,
                    has_method = !methods.is_empty(),
                    "Checked candidate"
                );
                match methods.into_iter().next() {
                    Some(method) => {
                        info!(
                            call = %call,
                            class = %class.qualified_name,
                            tier = %tier,
                            "Matched implementation"
                        );
                        return Resolution::Found(Match { class: class.clone(), method, tier });
                    }
                    None => {
                        lacking_method.get_or_insert(class);
                    }
                }
            }
        }

        let outcome = match lacking_method {
            Some(class) => NotFound::MethodNotFound {
                method: call.method,
                class_name: class.name.clone(),
            },
            None => NotFound::NoImplementation {
                receiver: call.receiver,
                method: call.method,
                candidates: candidates.len(),
            },
        };
        debug!(outcome = %outcome, "No implementation matched");
        Resolution::NotFound(outcome)
    }
}

/// Resolve `receiver.method` with the default configuration
/// ([`SuffixPolicy::RequireStub`], index order, all scopes).
pub fn resolve<I: SymbolIndex + ?Sized>(index: &I, receiver: &str, method: &str) -> Option<Match> {
    Resolver::new(index, ResolverConfig::default())
        .resolve(&CallSite::new(receiver, method))
        .into_match()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
