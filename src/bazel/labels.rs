//! Mapping from the short names developers type to Bazel labels

use crate::error::DevError;

/// Binaries `dev build` knows by name
const BUILD_TARGETS: &[(&str, &str)] = &[
    ("cockroach", "//pkg/cmd/cockroach"),
    ("cockroach-short", "//pkg/cmd/cockroach-short"),
    ("execgen", "//pkg/sql/colexec/execgen/cmd/execgen"),
    ("optgen", "//pkg/sql/opt/optgen/cmd/optgen"),
];

/// Default `dev build` target
pub const DEFAULT_BUILD_TARGET: &str = "cockroach";

/// Every test target in the repository
pub const ALL_TESTS: &str = "//pkg/...:all";

/// A buildable binary: its Bazel label and the name it is linked under in `bin/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTarget {
    pub label: String,
    pub name: String,
}

/// Resolve a `dev build` argument to a binary target
///
/// Short names come from a fixed table; anything starting with `//` is taken
/// as a label verbatim. Labels must name a single target, so package roots
/// and wildcards (`//pkg/...`, `:all`, `:*`) are rejected.
pub fn binary_target(arg: &str) -> Result<BinaryTarget, DevError> {
    if arg.starts_with("//") {
        let name = label_name(arg);
        if is_wildcard(name) {
            return Err(DevError::UnrecognizedTarget(arg.to_string()));
        }
        return Ok(BinaryTarget {
            label: arg.to_string(),
            name: name.to_string(),
        });
    }

    BUILD_TARGETS
        .iter()
        .find(|(name, _)| *name == arg)
        .map(|(name, label)| BinaryTarget {
            label: label.to_string(),
            name: name.to_string(),
        })
        .ok_or_else(|| DevError::UnrecognizedTarget(arg.to_string()))
}

/// Target name of a label: `//pkg/cmd/foo:bar` → `bar`, `//pkg/cmd/foo` → `foo`
pub fn label_name(label: &str) -> &str {
    match label.rsplit_once(':') {
        Some((_, name)) => name,
        None => label.trim_end_matches('/').rsplit('/').next().unwrap_or(label),
    }
}

fn is_wildcard(name: &str) -> bool {
    matches!(name, "" | "..." | "all" | "*" | "all-targets")
}

/// Resolve a package path to its test target
///
/// `pkg/util/log` → `//pkg/util/log:log_test`; a `...` package expands to
/// every target beneath it; explicit labels pass through.
pub fn test_target(pkg: &str) -> String {
    let pkg = pkg
        .trim_start_matches("./")
        .trim_start_matches("//")
        .trim_end_matches('/');

    if pkg.is_empty() {
        return ALL_TESTS.to_string();
    }
    if pkg.contains(':') {
        return format!("//{}", pkg);
    }
    if pkg == "..." || pkg.ends_with("/...") {
        return format!("//{}:all", pkg);
    }

    let base = pkg.rsplit('/').next().unwrap_or(pkg);
    format!("//{}:{}_test", pkg, base)
}

/// Test targets for a list of packages, defaulting to every test
pub fn test_targets(pkgs: &[String]) -> Vec<String> {
    if pkgs.is_empty() {
        return vec![ALL_TESTS.to_string()];
    }
    pkgs.iter().map(|p| test_target(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_binary_names() {
        let target = binary_target("optgen").unwrap();
        assert_eq!(target.label, "//pkg/sql/opt/optgen/cmd/optgen");
        assert_eq!(target.name, "optgen");
    }

    #[test]
    fn test_label_passthrough() {
        let target = binary_target("//pkg/cmd/roachtest").unwrap();
        assert_eq!(target.label, "//pkg/cmd/roachtest");
        assert_eq!(target.name, "roachtest");

        let target = binary_target("//pkg/cmd/workload:workload_bin").unwrap();
        assert_eq!(target.name, "workload_bin");
    }

    #[test]
    fn test_unknown_binary() {
        let err = binary_target("roachprod-stress").unwrap_err();
        assert_eq!(err.to_string(), "unrecognized target: roachprod-stress");
    }

    #[test]
    fn test_label_must_name_one_binary() {
        for label in ["//", "//pkg/cmd/...", "//pkg/cmd:all", "//pkg/cmd:*"] {
            let err = binary_target(label).unwrap_err();
            assert_eq!(err.to_string(), format!("unrecognized target: {}", label));
        }
    }

    #[test]
    fn test_test_target_forms() {
        assert_eq!(test_target("pkg/util/log"), "//pkg/util/log:log_test");
        assert_eq!(test_target("./pkg/util/log/"), "//pkg/util/log:log_test");
        assert_eq!(test_target("//pkg/sql"), "//pkg/sql:sql_test");
        assert_eq!(test_target("pkg/kv/..."), "//pkg/kv/...:all");
        assert_eq!(test_target("pkg/sql:sql_test"), "//pkg/sql:sql_test");
        assert_eq!(test_target(""), ALL_TESTS);
    }

    #[test]
    fn test_test_targets_default_to_everything() {
        assert_eq!(test_targets(&[]), vec![ALL_TESTS.to_string()]);
        assert_eq!(
            test_targets(&["pkg/a".to_string(), "pkg/b/c".to_string()]),
            vec!["//pkg/a:a_test".to_string(), "//pkg/b/c:c_test".to_string()]
        );
    }
}
