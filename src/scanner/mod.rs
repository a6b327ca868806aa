//! Declaration discovery over analyzed packages.
//!
//! The scanner answers three questions about a set of [`SourcePackage`]s:
//!
//! 1. Which interface is the container? ([`find_annotated`]) Exactly one type
//!    declaration across every scanned file may carry the annotation marker in its
//!    leading comment.
//! 2. Which functions build its components? ([`match_constructors`]) For a container
//!    method `X`, the constructor is a top-level `NewX` whose first result is `X` and
//!    whose optional second result is `error`.
//! 3. Which interfaces need mocks? ([`find_dependency_interfaces`]) Every interface
//!    whose name is one of the container's component names.
//!
//! Packages are searched in the order given and files in path order, so the first
//! matching declaration always wins.

use crate::core::DiconError;
use crate::model::{FuncType, InterfaceType, Package, TypeExpr};
use crate::syntax::{SourceFile, SourcePackage, TypeDecl, TypeSpecKind};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Result of matching constructors against the container methods.
#[derive(Debug, Default)]
pub struct MatchReport {
    /// Matched constructors, in container method order
    pub constructors: Vec<FuncType>,
    /// Container methods without a usable constructor
    pub unresolved: Vec<String>,
    /// Candidates skipped because of their result shape
    pub rejected: Vec<DiconError>,
}

impl MatchReport {
    /// Whether every container method found its constructor.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

fn is_annotated(decl: &TypeDecl, marker: &str) -> bool {
    decl.doc.iter().any(|line| line.starts_with(marker))
}

fn interfaces_of<'a>(
    file: &'a SourceFile,
    decl: &'a TypeDecl,
) -> impl Iterator<Item = InterfaceType> + 'a {
    decl.specs.iter().filter_map(move |spec| match &spec.kind {
        TypeSpecKind::Interface(methods) => Some(InterfaceType {
            package: file.package.clone(),
            name: spec.name.clone(),
            comments: decl.doc.clone(),
            methods: methods.iter().map(|m| FuncType::from_method(&file.package, m)).collect(),
            imports: file.imports.iter().map(Package::from).collect(),
            file: file.path.clone(),
        }),
        TypeSpecKind::Other => None,
    })
}

/// Find the single interface annotated with `marker`.
///
/// # Errors
///
/// - [`DiconError::AnnotationNotFound`] when no interface is annotated
/// - [`DiconError::MultipleAnnotations`] when more than one is, in one file or across files
pub fn find_annotated(packages: &[SourcePackage], marker: &str) -> Result<InterfaceType, DiconError> {
    let mut found: Vec<(String, InterfaceType)> = Vec::new();

    for file in packages.iter().flat_map(|p| &p.files) {
        for decl in file.type_decls.iter().filter(|d| is_annotated(d, marker)) {
            let before = found.len();
            for interface in interfaces_of(file, decl) {
                found.push((format!("{}:{}", file.path.display(), interface.name), interface));
            }
            if found.len() == before {
                debug!("{} annotates a non-interface type in {}, skipping", marker, file.path.display());
            }
        }
    }

    match found.len() {
        0 => Err(DiconError::AnnotationNotFound {
            marker: marker.to_string(),
        }),
        1 => {
            let (location, interface) = found.remove(0);
            debug!("container interface {} found at {}", interface.name, location);
            Ok(interface)
        }
        count => Err(DiconError::MultipleAnnotations {
            marker: marker.to_string(),
            count,
            locations: found.iter().map(|(loc, _)| loc.as_str()).collect::<Vec<_>>().join(", "),
        }),
    }
}

/// Match a `New<Name>` constructor to every method of the container interface.
///
/// Candidates whose second result is not `error` are reported in
/// [`MatchReport::rejected`] and skipped. When several candidates match one
/// component, the first one found is kept.
#[must_use]
pub fn match_constructors(packages: &[SourcePackage], container: &InterfaceType) -> MatchReport {
    let mut report = MatchReport::default();

    for method in container.method_names() {
        let wanted = format!("New{method}");
        let mut chosen: Option<FuncType> = None;

        for file in packages.iter().flat_map(|p| &p.files) {
            for func in file.func_decls.iter().filter(|f| f.name == wanted) {
                let returns = TypeExpr::flatten(&file.package, &func.results);
                if returns.is_empty() || returns.len() > 2 {
                    debug!("{} in {} returns {} values, skipping", wanted, file.path.display(), returns.len());
                    continue;
                }
                if returns[0].simple_name() != Some(method) {
                    debug!(
                        "{} in {} returns {} instead of {}, skipping",
                        wanted,
                        file.path.display(),
                        returns[0],
                        method
                    );
                    continue;
                }
                if returns.len() == 2 && !returns[1].is_error() {
                    let err = DiconError::InvalidConstructorShape {
                        constructor: wanted.clone(),
                        package: file.package.clone(),
                        found: returns[1].to_string(),
                    };
                    warn!("{}", err);
                    report.rejected.push(err);
                    continue;
                }

                if chosen.is_some() {
                    warn!(
                        "duplicate constructor {}.{} in {} ignored",
                        file.package,
                        wanted,
                        file.path.display()
                    );
                    continue;
                }

                chosen = Some(FuncType {
                    name: wanted.clone(),
                    package: file.package.clone(),
                    argument_types: TypeExpr::flatten(&file.package, &func.params),
                    return_types: returns,
                });
            }
        }

        match chosen {
            Some(constructor) => {
                debug!("component {} built by {}.{}", method, constructor.package, constructor.name);
                report.constructors.push(constructor);
            }
            None => report.unresolved.push(method.to_string()),
        }
    }

    report
}

/// Collect the interfaces named by `targets`, in package and file order.
///
/// An interface name that appears in more than one package is mocked once, from the
/// first package that declares it.
#[must_use]
pub fn find_dependency_interfaces(packages: &[SourcePackage], targets: &[&str]) -> Vec<InterfaceType> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for file in packages.iter().flat_map(|p| &p.files) {
        for decl in &file.type_decls {
            for interface in interfaces_of(file, decl) {
                if !targets.contains(&interface.name.as_str()) {
                    continue;
                }
                if !seen.insert(interface.name.clone()) {
                    warn!(
                        "interface {} declared again in {}, keeping the first declaration",
                        interface.name,
                        file.path.display()
                    );
                    continue;
                }
                result.push(interface);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{GoAnalyzer, SourceAnalyzer};
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};

    fn package(dir: &str, files: &[(&str, &str)]) -> SourcePackage {
        crate::test_utils::init_test_logging(None);
        let analyzer = GoAnalyzer::new();
        SourcePackage {
            dir: PathBuf::from(dir),
            files: files
                .iter()
                .map(|(name, src)| analyzer.analyze(&Path::new(dir).join(name), src).unwrap())
                .collect(),
        }
    }

    const CONTAINER: &str = r#"package sample

import "github.com/akito0107/dicon/sample2"

// +DICON
type DIContainer interface {
	SampleComponent() (SampleComponent, error)
	OtherComponent() (OtherComponent, error)
	Sample2Component() (sample2.Sample2Component, error)
}
"#;

    const COMPONENTS: &str = r#"package sample

type SampleComponent interface {
	Exec() error
}

type OtherComponent interface {
	Exec() error
}

func NewSampleComponent() (SampleComponent, error) { return nil, nil }

func NewOtherComponent(s SampleComponent) (OtherComponent, error) { return nil, nil }
"#;

    const SAMPLE2: &str = r#"package sample2

type Sample2Component interface {
	Exec() error
	StrExec(string) string
}

func NewSample2Component() (Sample2Component, error) { return nil, nil }
"#;

    fn fixture() -> Vec<SourcePackage> {
        vec![
            package("sample", &[("container.go", CONTAINER), ("components.go", COMPONENTS)]),
            package("sample2", &[("sample2.go", SAMPLE2)]),
        ]
    }

    #[test]
    fn test_find_annotated() {
        let container = find_annotated(&fixture(), "+DICON").unwrap();
        assert_eq!(container.name, "DIContainer");
        assert_eq!(container.package, "sample");
        assert_eq!(
            container.method_names(),
            vec!["SampleComponent", "OtherComponent", "Sample2Component"]
        );
        assert_eq!(container.imports.len(), 1);
        assert_eq!(container.comments, vec!["+DICON".to_string()]);
    }

    #[test]
    fn test_find_annotated_missing() {
        let packages = vec![package("sample2", &[("sample2.go", SAMPLE2)])];
        let err = find_annotated(&packages, "+DICON").unwrap_err();
        assert_eq!(err.to_string(), "+DICON not found");
    }

    #[test]
    fn test_find_annotated_rejects_duplicates_across_files() {
        let packages = vec![
            package("sample", &[("container.go", CONTAINER)]),
            package(
                "other",
                &[("other.go", "package other\n\n// +DICON\ntype Another interface {\n\tX() (X, error)\n}\n")],
            ),
        ];
        let err = find_annotated(&packages, "+DICON").unwrap_err();
        assert!(matches!(err, DiconError::MultipleAnnotations { count: 2, .. }));
    }

    #[test]
    fn test_find_annotated_rejects_duplicates_in_one_file() {
        let src = "package p\n\n// +DICON\ntype A interface{}\n\n// +DICON\ntype B interface{}\n";
        let packages = vec![package("p", &[("p.go", src)])];
        let err = find_annotated(&packages, "+DICON").unwrap_err();
        assert!(err.to_string().contains("must be single"));
    }

    #[test]
    fn test_custom_marker() {
        let src = "package p\n\n// +WIRE\ntype C interface {\n\tA() (A, error)\n}\n";
        let packages = vec![package("p", &[("p.go", src)])];
        assert!(find_annotated(&packages, "+DICON").is_err());
        assert_eq!(find_annotated(&packages, "+WIRE").unwrap().name, "C");
    }

    #[test]
    fn test_match_constructors_in_method_order() {
        let packages = fixture();
        let container = find_annotated(&packages, "+DICON").unwrap();
        let report = match_constructors(&packages, &container);

        assert!(report.is_complete());
        assert!(report.rejected.is_empty());
        let names: Vec<_> = report.constructors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["NewSampleComponent", "NewOtherComponent", "NewSample2Component"]);
        assert_eq!(report.constructors[2].package, "sample2");
        assert_eq!(report.constructors[1].argument_types.len(), 1);
    }

    #[test]
    fn test_match_constructors_rejects_non_error_second_result() {
        let src = r#"package p

// +DICON
type C interface {
	A() (A, error)
}

func NewA() (A, string) { return nil, "" }
"#;
        let packages = vec![package("p", &[("p.go", src)])];
        let container = find_annotated(&packages, "+DICON").unwrap();
        let report = match_constructors(&packages, &container);

        assert!(report.constructors.is_empty());
        assert_eq!(report.unresolved, vec!["A".to_string()]);
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(report.rejected[0], DiconError::InvalidConstructorShape { .. }));
    }

    #[test]
    fn test_match_constructors_accepts_single_result_and_skips_mismatches() {
        let src = r#"package p

// +DICON
type C interface {
	A() (A, error)
}

func NewA(x, y B) *A { return nil }

func NewA2() (A, error) { return nil, nil }
"#;
        let other = "package p\n\nfunc NewA(b B) A { return nil }\n";
        let packages = vec![package("p", &[("a.go", src), ("b.go", other)])];
        let container = find_annotated(&packages, "+DICON").unwrap();
        let report = match_constructors(&packages, &container);

        assert_eq!(report.constructors.len(), 1);
        assert_eq!(report.constructors[0].return_types.len(), 1);
        assert!(!report.constructors[0].returns_error());
    }

    #[test]
    fn test_find_dependency_interfaces() {
        let packages = fixture();
        let interfaces = find_dependency_interfaces(&packages, &["SampleComponent", "Sample2Component"]);
        let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["SampleComponent", "Sample2Component"]);
        assert_eq!(interfaces[1].package, "sample2");
        assert_eq!(interfaces[1].methods.len(), 2);
    }
}
