use dicon::test_utils::GoPackageFixture;

use crate::common::TestProject;

#[test]
fn test_mock_for_each_component() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    let output =
        project.run_dicon(&["generate-mock", "--pkg", "sample", "--dry-run", "--no-format"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("package mock\n")
        .assert_stdout_contains("type BMock struct {\n\tExecMock func() error\n}\n")
        .assert_stdout_contains("func NewBMock() *BMock {\n\treturn &BMock{}\n}\n")
        .assert_stdout_contains("func (mk *BMock) Exec() error {\n\treturn mk.ExecMock()\n}\n")
        .assert_stdout_contains("type AMock struct {\n\tRunMock func() error\n}\n");

    // The container interface itself is not mocked
    assert!(!output.stdout.contains("DIContainerMock"));
    // components.go imports fmt for a function body only
    assert!(!output.stdout.contains("import"));
}

#[test]
fn test_variadic_arguments_are_spread() {
    let project = TestProject::with_packages(&[GoPackageFixture::VARIADIC]).unwrap();

    let output = project.run_dicon(&["m", "-p", "logging", "--dry-run", "--no-format"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("\tLogfMock func(a0 string, a1 ...interface{})\n")
        .assert_stdout_contains("\tmk.LogfMock(a0, a1...)\n")
        .assert_stdout_contains("func (mk *LoggerMock) Level() int {\n\treturn mk.LevelMock()\n}\n");
}

#[test]
fn test_foreign_types_keep_their_qualifier() {
    let project = TestProject::with_packages(&[GoPackageFixture::APP, GoPackageFixture::INFRA]).unwrap();

    let output = project.run_dicon(&["m", "-p", "app,infra", "--dry-run", "--no-format"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("import (\n\t\"context\"\n)\n")
        .assert_stdout_contains("\tGetMock func(a0 context.Context, a1 string) ([]byte, error)\n")
        .assert_stdout_contains("func (mk *StoreMock) Put(a0 context.Context, a1 string, a2 []byte) error {");
}

#[test]
fn test_mock_written_into_dist() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    project
        .run_dicon(&["generate-mock", "-p", "sample", "-d", "internal/fakes", "-o", "fakes_gen", "--no-format"])
        .unwrap()
        .assert_success();

    let written = project.read_file("internal/fakes/fakes_gen.go").unwrap();
    assert!(written.contains("package fakes\n"));
}

#[test]
fn test_invalid_dist_package_name() {
    let project = TestProject::with_packages(&[GoPackageFixture::SIMPLE]).unwrap();

    let output = project.run_dicon(&["m", "-p", "sample", "-d", "my-mocks", "--no-format"]).unwrap();
    output.assert_failure().assert_stderr_contains("valid Go package name");
}
