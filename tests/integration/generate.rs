use dicon::test_utils::GoPackageFixture;
use predicates::str::contains;

use crate::common::TestProject;

#[test]
fn test_container_resolves_dependency_before_constructing() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "sample", "--dry-run", "--no-format"]).unwrap();
    output.assert_success();

    let source = &output.stdout;
    assert!(source.starts_with("// Code generated by dicon; DO NOT EDIT.\n\npackage sample\n"));
    assert!(source.contains("func NewDIContainer() DIContainer {"));

    let accessor = source.find("func (d *dicontainer) A() (A, error) {").unwrap();
    let resolve = source.find("dep0, err := d.B()").unwrap();
    let construct = source.find("instance, err := NewA(dep0)").unwrap();
    let cache = source.find("d.store[\"A\"] = instance").unwrap();
    assert!(accessor < resolve && resolve < construct && construct < cache);

    // Dry runs leave the tree untouched
    assert!(!project.project_path().join("sample/dicon_gen.go").exists());
}

#[test]
fn test_container_is_written_next_to_interface() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    let output = project.run_dicon(&["g", "-p", "sample", "--no-format"]).unwrap();
    output.assert_success().assert_stdout_contains("dicon_gen.go");

    let written = project.read_file("sample/dicon_gen.go").unwrap();
    assert!(written.contains("func (d *dicontainer) B() (B, error) {"));

    // The second run skips the file it generated and reproduces it
    project.run_dicon(&["g", "-p", "sample", "--no-format"]).unwrap().assert_success();
    assert_eq!(project.read_file("sample/dicon_gen.go").unwrap(), written);
}

#[test]
fn test_custom_output_name() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    project
        .run_dicon(&["generate", "-p", "sample", "-o", "wire", "-q", "--no-format"])
        .unwrap()
        .assert_success();
    assert!(project.project_path().join("sample/wire.go").exists());

    let output = project.run_dicon(&["generate", "-p", "sample", "-o", "wire.go", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("must not include the .go extension");
}

#[test]
fn test_constructors_from_other_package_are_qualified() {
    let project = TestProject::with_packages(&[GoPackageFixture::APP, GoPackageFixture::INFRA]).unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "app,infra", "--dry-run", "--no-format"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains(
            "import (\n\t\"fmt\"\n\n\t\"example.com/project/infra\"\n\t\"github.com/pkg/errors\"\n)\n",
        )
        .assert_stdout_contains("func (d *dicontainer) Store() (infra.Store, error) {")
        .assert_stdout_contains("instance, err := infra.NewStore()");
}

#[test]
fn test_cycle_is_reported() {
    let project = TestProject::with_packages(&[GoPackageFixture::CYCLIC]).unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "cyclic", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("detect cyclic dependency 'A' -> 'B' -> 'C' -> 'A'");
    assert!(!project.project_path().join("cyclic/dicon_gen.go").exists());
}

#[test]
fn test_missing_annotation() {
    let project = TestProject::with_packages(&[GoPackageFixture::UNANNOTATED]).unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "plain", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("+DICON not found");
}

#[test]
fn test_multiple_annotations_across_files() {
    let project = TestProject::with_packages(&[GoPackageFixture::DOUBLE_ANNOTATED]).unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "double", "--no-format"]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("+DICON interface must be single, but found 2")
        .assert_stderr_contains("one.go:One")
        .assert_stderr_contains("two.go:Two");
}

#[test]
fn test_missing_package_directory() {
    let project = TestProject::new().unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "nowhere", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("Failed to read package directory");
}

#[test]
fn test_syntax_error_names_file() {
    let project = TestProject::new().unwrap();
    project.write_file("broken/broken.go", "package broken\n\ntype A interface {\n").unwrap();

    let output = project.run_dicon(&["generate", "--pkg", "broken", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("broken.go");
}

#[test]
fn test_help_lists_subcommands() {
    assert_cmd::Command::cargo_bin("dicon")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("generate-mock"));
}
