use dicon::test_utils::GoPackageFixture;

use crate::common::TestProject;

#[test]
fn test_project_config_overrides_defaults() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();
    project
        .write_file("dicon.toml", "container_out = \"wiring\"\nmock_package = \"fakes\"\nformatter = []\n")
        .unwrap();

    project.run_dicon(&["generate", "-p", "sample", "-q"]).unwrap().assert_success();
    assert!(project.project_path().join("sample/wiring.go").exists());

    project.run_dicon(&["generate-mock", "-p", "sample", "-q"]).unwrap().assert_success();
    let mocks = project.read_file("fakes/dicon_mock.go").unwrap();
    assert!(mocks.contains("package fakes\n"));
}

#[test]
fn test_custom_annotation() {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "wire/wire.go",
            "package wire\n\n// +WIRE\ntype Container interface {\n\tA() (A, error)\n}\n\ntype A interface{}\n\nfunc NewA() (A, error) { return nil, nil }\n",
        )
        .unwrap();
    project.write_file("custom.toml", "annotation = \"+WIRE\"\n").unwrap();

    let output = project
        .run_dicon(&["--config", "custom.toml", "generate", "-p", "wire", "--dry-run", "--no-format"])
        .unwrap();
    output.assert_success().assert_stdout_contains("func NewDIContainer() Container {");
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();
    project.write_file("dicon.toml", "annotaton = \"+DICON\"\n").unwrap();

    let output = project.run_dicon(&["generate", "-p", "sample", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("annotaton");
}

#[test]
fn test_missing_formatter_leaves_output_unformatted() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();
    project.write_file("dicon.toml", "formatter = [\"no-such-go-formatter\"]\n").unwrap();

    let output = project.run_dicon(&["generate", "-p", "sample", "--dry-run"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("func (d *dicontainer) A() (A, error) {")
        .assert_stderr_contains("left unformatted");
}
