//! `SymbolIndex` view over a `DefinitionIndex`.

use std::collections::{HashSet, VecDeque};

use grpcnav::{ClassDecl, MethodDecl, SearchScope, SourceLocation, SymbolIndex};

use super::types::*;

/// `Outer.Inner<T>` -> `Outer.Inner`
fn base_type_path(base: &str) -> &str {
    base.split('<').next().unwrap_or(base).trim()
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Qualified-name prefixes a supertype written inside `from` is relative to,
/// innermost first: the type itself, each enclosing type, then the package
/// (`""` for the default package).
fn lexical_scopes(from: &DefinitionEntry) -> Vec<&str> {
    let package = from.package.as_deref().unwrap_or("");
    let mut scope = from.qualified_name.as_str();
    let mut scopes = vec![scope];
    while scope.len() > package.len() {
        scope = scope.rfind('.').map_or("", |i| &scope[..i]);
        if scope.len() < package.len() {
            break;
        }
        scopes.push(scope);
    }
    scopes
}

impl DefinitionIndex {
    fn location_of(&self, def: &DefinitionEntry) -> Option<SourceLocation> {
        self.file_path(def.file_id).map(|file| SourceLocation {
            file: file.to_string(),
            line: def.line,
            column: def.column,
        })
    }

    fn class_decl(&self, def: &DefinitionEntry) -> ClassDecl {
        ClassDecl {
            name: def.name.clone(),
            qualified_name: def.qualified_name.clone(),
            location: self.location_of(def),
        }
    }

    /// Type definitions with exactly this simple name.
    fn types_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a DefinitionEntry> + 'a {
        let name = name.to_string();
        self.name_index.get(&name.to_lowercase())
            .into_iter()
            .flatten()
            .map(|&i| &self.definitions[i as usize])
            .filter(move |d| d.kind.is_type() && d.name == name)
    }

    /// Type definitions a supertype reference written in `from` points at.
    ///
    /// A dotted reference must match a qualified-name suffix. Among several
    /// candidates, nested types of the enclosing scopes win, then the package,
    /// then an exact fully qualified match; otherwise every candidate is kept.
    fn resolve_base_type(&self, from: &DefinitionEntry, base: &str) -> Vec<&DefinitionEntry> {
        let written = base_type_path(base);
        let simple = last_segment(written);
        let suffix = format!(".{}", written);
        let matching: Vec<&DefinitionEntry> = self.types_named(simple)
            .filter(|d| written == simple || d.qualified_name == written || d.qualified_name.ends_with(&suffix))
            .collect();
        if matching.len() <= 1 {
            return matching;
        }

        for scope in lexical_scopes(from) {
            let wanted = if scope.is_empty() { written.to_string() } else { format!("{}.{}", scope, written) };
            let in_scope: Vec<_> = matching.iter().copied().filter(|d| d.qualified_name == wanted).collect();
            if !in_scope.is_empty() {
                return in_scope;
            }
        }

        let exact: Vec<_> = matching.iter().copied().filter(|d| d.qualified_name == written).collect();
        if exact.is_empty() { matching } else { exact }
    }

    /// The type definition a `ClassDecl` handle refers to.
    fn type_for(&self, class: &ClassDecl) -> Option<&DefinitionEntry> {
        let file = class.location.as_ref().map(|l| l.file.as_str());
        self.types_named(&class.name)
            .filter(|d| d.qualified_name == class.qualified_name)
            .find(|d| file.is_none() || self.file_path(d.file_id) == file)
    }
}

impl SymbolIndex for DefinitionIndex {
    fn all_class_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.type_definitions()
            .filter(|(_, d)| seen.insert(d.name.as_str()))
            .map(|(_, d)| d.name.clone())
            .collect()
    }

    fn classes_by_name(&self, name: &str, scope: &SearchScope) -> Vec<ClassDecl> {
        self.types_named(name)
            .filter(|d| scope.contains(self.file_path(d.file_id)))
            .map(|d| self.class_decl(d))
            .collect()
    }

    fn find_methods_by_name(
        &self,
        class: &ClassDecl,
        name: &str,
        include_inherited: bool,
    ) -> Vec<MethodDecl> {
        let Some(start) = self.type_for(class) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut visited: HashSet<(u32, &str)> = HashSet::new();
        let mut queue: VecDeque<&DefinitionEntry> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert((current.file_id, current.qualified_name.as_str())) {
                continue;
            }
            if let Some(member_ids) = self.members.get(&(current.file_id, current.qualified_name.clone())) {
                found.extend(
                    member_ids.iter()
                        .map(|&i| &self.definitions[i as usize])
                        .filter(|d| d.kind == DefinitionKind::Method && d.name == name)
                        .map(|d| MethodDecl {
                            name: d.name.clone(),
                            declaring_class: current.qualified_name.clone(),
                            signature: d.signature.clone(),
                            location: self.location_of(d),
                        }),
                );
            }
            if !include_inherited {
                break;
            }
            for base in &current.base_types {
                queue.extend(self.resolve_base_type(current, base));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_entry(qualified_name: &str, package: Option<&str>) -> DefinitionEntry {
        DefinitionEntry {
            file_id: 0,
            name: last_segment(qualified_name).to_string(),
            kind: DefinitionKind::Class,
            line: 1,
            column: 1,
            package: package.map(|p| p.to_string()),
            parent: None,
            qualified_name: qualified_name.to_string(),
            signature: None,
            base_types: Vec::new(),
        }
    }

    #[test]
    fn test_base_type_path_and_last_segment() {
        assert_eq!(base_type_path("AbstractStub<UserStub>"), "AbstractStub");
        assert_eq!(base_type_path(" UserServiceGrpc.UserServiceImplBase "), "UserServiceGrpc.UserServiceImplBase");
        assert_eq!(last_segment("io.grpc.BindableService"), "BindableService");
        assert_eq!(last_segment("Plain"), "Plain");
    }

    #[test]
    fn test_lexical_scopes_innermost_first() {
        let nested = type_entry("com.acme.UserServiceGrpc.UserServiceImplBase", Some("com.acme"));
        assert_eq!(
            lexical_scopes(&nested),
            vec!["com.acme.UserServiceGrpc.UserServiceImplBase", "com.acme.UserServiceGrpc", "com.acme"]
        );

        let default_package = type_entry("Outer.Inner", None);
        assert_eq!(lexical_scopes(&default_package), vec!["Outer.Inner", "Outer", ""]);
    }
}
