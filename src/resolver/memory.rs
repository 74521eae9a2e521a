//! In-memory [`SymbolIndex`] for tests, benchmarks and embedders that already
//! hold their declarations in memory.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::*;

#[derive(Debug, Clone)]
struct MemoryClass {
    decl: ClassDecl,
    methods: Vec<MethodDecl>,
    supertypes: Vec<String>,
}

/// Registration-ordered class table.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    classes: Vec<MemoryClass>,
    /// simple name -> indices into `classes`
    by_name: HashMap<String, Vec<usize>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class by qualified name with the methods it declares.
    pub fn with_class(self, qualified_name: &str, methods: &[&str]) -> Self {
        self.with_subclass(qualified_name, &[], methods)
    }

    /// Register a class that extends/implements `supertypes` (simple or dotted names).
    pub fn with_subclass(mut self, qualified_name: &str, supertypes: &[&str], methods: &[&str]) -> Self {
        self.add_class(qualified_name, None, supertypes, methods);
        self
    }

    /// Register a class; returns its position in enumeration order.
    pub fn add_class(
        &mut self,
        qualified_name: &str,
        location: Option<SourceLocation>,
        supertypes: &[&str],
        methods: &[&str],
    ) -> usize {
        let name = simple_name(qualified_name).to_string();
        let idx = self.classes.len();
        self.classes.push(MemoryClass {
            decl: ClassDecl {
                name: name.clone(),
                qualified_name: qualified_name.to_string(),
                location,
            },
            methods: methods
                .iter()
                .map(|m| MethodDecl {
                    name: m.to_string(),
                    declaring_class: qualified_name.to_string(),
                    signature: None,
                    location: None,
                })
                .collect(),
            supertypes: supertypes.iter().map(|s| s.to_string()).collect(),
        });
        self.by_name.entry(name).or_default().push(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn lookup(&self, class: &ClassDecl) -> Option<&MemoryClass> {
        self.by_name
            .get(&class.name)?
            .iter()
            .map(|&i| &self.classes[i])
            .find(|c| c.decl.qualified_name == class.qualified_name)
    }
}

fn simple_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name).trim();
    base.rsplit('.').next().unwrap_or(base)
}

impl SymbolIndex for MemoryIndex {
    fn all_class_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.classes
            .iter()
            .filter(|c| seen.insert(c.decl.name.as_str()))
            .map(|c| c.decl.name.clone())
            .collect()
    }

    fn classes_by_name(&self, name: &str, scope: &SearchScope) -> Vec<ClassDecl> {
        self.by_name
            .get(name)
            .map(|ids| {
                ids.iter()
                    .map(|&i| &self.classes[i].decl)
                    .filter(|d| scope.contains(d.location.as_ref().map(|l| l.file.as_str())))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_methods_by_name(
        &self,
        class: &ClassDecl,
        name: &str,
        include_inherited: bool,
    ) -> Vec<MethodDecl> {
        let Some(start) = self.lookup(class) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&MemoryClass> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.decl.qualified_name.as_str()) {
                continue;
            }
            found.extend(current.methods.iter().filter(|m| m.name == name).cloned());
            if !include_inherited {
                break;
            }
            for st in &current.supertypes {
                if let Some(ids) = self.by_name.get(simple_name(st)) {
                    queue.extend(ids.iter().map(|&i| &self.classes[i]));
                }
            }
        }
        found
    }
}
