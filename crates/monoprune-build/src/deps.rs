use monoprune_core::ProjectConfiguration;

/// Expands a project's implicit dependencies into the list of libraries to
/// copy into the build context.
///
/// The declared names keep their order and `sentinel` is appended last. The
/// list is not de-duplicated: a library declared twice (or equal to the
/// sentinel) is copied twice, which overwrites the same files.
///
/// # Examples
///
/// ```
/// use monoprune_build::deps::resolve_dependencies;
/// use monoprune_core::ProjectConfiguration;
///
/// let config = ProjectConfiguration {
///     name: "svc".to_owned(),
///     implicit_dependencies: vec!["lib-a".to_owned()],
/// };
/// assert_eq!(resolve_dependencies(&config, "nx-python"), ["lib-a", "nx-python"]);
/// ```
pub fn resolve_dependencies(config: &ProjectConfiguration, sentinel: &str) -> Vec<String> {
    let mut dependencies = Vec::with_capacity(config.implicit_dependencies.len() + 1);
    dependencies.extend(config.implicit_dependencies.iter().cloned());
    dependencies.push(sentinel.to_owned());
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(deps: &[&str]) -> ProjectConfiguration {
        ProjectConfiguration {
            name: "svc".to_owned(),
            implicit_dependencies: deps.iter().map(|d| (*d).to_owned()).collect(),
        }
    }

    #[test]
    fn no_declared_dependencies_yields_sentinel_only() {
        assert_eq!(resolve_dependencies(&config(&[]), "nx-python"), ["nx-python"]);
    }

    #[test]
    fn sentinel_already_declared_is_kept_twice() {
        let deps = resolve_dependencies(&config(&["nx-python", "lib-a"]), "nx-python");
        assert_eq!(deps, ["nx-python", "lib-a", "nx-python"]);
    }

    #[test]
    fn duplicates_are_not_removed() {
        let deps = resolve_dependencies(&config(&["lib-a", "lib-a"]), "nx-python");
        assert_eq!(deps, ["lib-a", "lib-a", "nx-python"]);
    }

    // ── Property-based tests ──

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Strategy: library name (lowercase ascii + hyphens, 1-16 chars)
        fn lib_name() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9-]{0,15}"
        }

        proptest! {
            #[test]
            fn sentinel_appears_once_more_than_declared(
                declared in proptest::collection::vec(lib_name(), 0..8),
                sentinel in lib_name(),
            ) {
                let cfg = ProjectConfiguration {
                    name: "svc".to_owned(),
                    implicit_dependencies: declared.clone(),
                };
                let deps = resolve_dependencies(&cfg, &sentinel);

                let before = declared.iter().filter(|d| **d == sentinel).count();
                let after = deps.iter().filter(|d| **d == sentinel).count();
                prop_assert_eq!(after, before + 1);
            }

            #[test]
            fn declared_order_preserved_with_sentinel_last(
                declared in proptest::collection::vec(lib_name(), 0..8),
                sentinel in lib_name(),
            ) {
                let cfg = ProjectConfiguration {
                    name: "svc".to_owned(),
                    implicit_dependencies: declared.clone(),
                };
                let deps = resolve_dependencies(&cfg, &sentinel);

                prop_assert_eq!(deps.len(), declared.len() + 1);
                prop_assert_eq!(&deps[..declared.len()], &declared[..]);
                prop_assert_eq!(deps.last(), Some(&sentinel));
            }
        }
    }
}
