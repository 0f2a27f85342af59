//! Specifier classifier (C2, §4.2). Pure functions over `&str`: no AST access, no I/O.

/// Classification of a raw import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind {
    /// In the fixed runtime-builtin set, with or without a `runtime:` prefix.
    RuntimeBuiltin,
    /// Starts with `./`, `../`, `/`, or a filesystem-URL scheme.
    Path,
    /// Anything else. Carries the canonical package name.
    Package(String),
}

/// Runtime builtins for the Node.js-shaped target runtime. Kept as a fixed set
/// rather than a crate dependency: this list changes only with new runtime
/// releases, not with project configuration.
const RUNTIME_BUILTINS: &[&str] = &[
    "assert", "buffer", "child_process", "cluster", "crypto", "dgram", "dns", "events", "fs",
    "http", "http2", "https", "net", "os", "path", "perf_hooks", "process", "punycode", "querystring",
    "readline", "repl", "stream", "string_decoder", "timers", "tls", "tty", "url", "util", "v8",
    "vm", "worker_threads", "zlib",
];

fn strip_node_prefix(specifier: &str) -> &str {
    specifier.strip_prefix("node:").unwrap_or(specifier)
}

/// Classify a raw specifier (§4.2).
pub fn classify(specifier: &str) -> SpecifierKind {
    let bare = strip_node_prefix(specifier);
    if RUNTIME_BUILTINS.contains(&bare) {
        return SpecifierKind::RuntimeBuiltin;
    }
    if is_path_specifier(specifier) {
        return SpecifierKind::Path;
    }
    SpecifierKind::Package(package_name(specifier))
}

/// True for relative, absolute, or filesystem-URL specifiers.
pub fn is_path_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier.starts_with("file://")
}

/// Extract the canonical package name: the first path segment, or the first two
/// for a scoped package (`@scope/name[/...]`).
pub fn package_name(specifier: &str) -> String {
    let bare = strip_node_prefix(specifier);
    let mut segments = bare.split('/');
    match segments.next() {
        Some(first) if first.starts_with('@') => {
            let second = segments.next().unwrap_or("");
            format!("{}/{}", first, second)
        }
        Some(first) => first.to_string(),
        None => String::new(),
    }
}

/// A basename ending in `.test.*` or `.spec.*` (§4.8 "Classification of a
/// using file"), checked on the file name alone so callers can combine it
/// with their own path-segment checks.
pub fn is_test_basename(path: &std::path::Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return false };
    let lower = name.to_ascii_lowercase();
    lower.contains(".test.") || lower.contains(".spec.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_builtins_with_and_without_prefix() {
        assert_eq!(classify("fs"), SpecifierKind::RuntimeBuiltin);
        assert_eq!(classify("node:fs"), SpecifierKind::RuntimeBuiltin);
    }

    #[test]
    fn classifies_relative_and_absolute_paths() {
        assert_eq!(classify("./util"), SpecifierKind::Path);
        assert_eq!(classify("../lib/util"), SpecifierKind::Path);
        assert_eq!(classify("/abs/util"), SpecifierKind::Path);
    }

    #[test]
    fn classifies_packages_including_scoped() {
        assert_eq!(classify("react"), SpecifierKind::Package("react".to_string()));
        assert_eq!(
            classify("@scope/pkg/subpath"),
            SpecifierKind::Package("@scope/pkg".to_string())
        );
    }

    #[test]
    fn package_name_extracts_first_segment() {
        assert_eq!(package_name("lodash/debounce"), "lodash");
        assert_eq!(package_name("@scope/pkg"), "@scope/pkg");
    }
}
