//! # grpcnav: gRPC client-to-implementation navigation
//!
//! Given a client call such as `userServiceStub.getUser(request)`, find the
//! server-side class that implements `getUser`. The core is a naming-convention
//! resolver ([`resolver`]) that queries an injected [`resolver::SymbolIndex`].
//!
//! ## Library usage
//!
//! This crate is primarily a CLI tool, but the resolver and its in-memory
//! index are exposed as a library for embedding and benchmarking.

pub mod resolver;

pub use resolver::{
    candidates, derive_base_name, resolve, CallSite, CandidateOrder, ClassDecl, Match,
    MemoryIndex, MethodDecl, NotFound, Resolution, Resolver, ResolverConfig, SearchScope,
    SourceLocation, SuffixPolicy, SymbolIndex, Tier,
};

/// Strip the `\\?\` extended-length path prefix that Windows canonicalize adds.
#[must_use]
pub fn clean_path(p: &str) -> String {
    p.strip_prefix(r"\\?\").unwrap_or(p).to_string()
}

/// Read a file as a String, using lossy UTF-8 conversion for non-UTF8 files.
/// Returns `(content, was_lossy)` where `was_lossy` is true if replacement characters
/// were inserted.
pub fn read_file_lossy(path: &std::path::Path) -> std::io::Result<(String, bool)> {
    let raw = std::fs::read(path)?;
    match String::from_utf8(raw) {
        Ok(s) => Ok((s, false)),
        Err(e) => Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), true)),
    }
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_clean_path_strips_prefix() {
        assert_eq!(clean_path(r"\\?\C:\Users\test"), r"C:\Users\test");
    }

    #[test]
    fn test_clean_path_no_prefix() {
        assert_eq!(clean_path("/home/dev/project"), "/home/dev/project");
    }

    #[test]
    fn test_read_file_lossy_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Ok.java");
        std::fs::write(&path, "class Ok {}").unwrap();
        let (content, lossy) = read_file_lossy(&path).unwrap();
        assert_eq!(content, "class Ok {}");
        assert!(!lossy);
    }

    #[test]
    fn test_read_file_lossy_windows_1252() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Quote.java");
        // 0x93/0x94 are smart quotes in Windows-1252, invalid as UTF-8
        std::fs::write(&path, b"// \x93hello\x94\nclass Quote {}").unwrap();
        let (content, lossy) = read_file_lossy(&path).unwrap();
        assert!(lossy);
        assert!(content.contains("class Quote {}"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_file_lossy_missing_file() {
        let result = read_file_lossy(std::path::Path::new("/nonexistent/Missing.java"));
        assert!(result.is_err());
    }
}
