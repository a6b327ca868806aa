//! Go package fixtures.
//!
//! Each fixture is a package directory name plus its files. [`write_package`] puts a
//! fixture below a project root so the CLI can be pointed at it with `--pkg`.

use std::io;
use std::path::{Path, PathBuf};

/// A Go package directory and its files.
#[derive(Debug, Clone, Copy)]
pub struct GoPackageFixture {
    /// Directory name, also used as `--pkg`
    pub dir: &'static str,
    /// `(file name, source)` pairs
    pub files: &'static [(&'static str, &'static str)],
}

impl GoPackageFixture {
    /// Two components, `A` depending on `B`.
    pub const SIMPLE: Self = Self {
        dir: "sample",
        files: &[("container.go", SIMPLE_CONTAINER), ("components.go", SIMPLE_COMPONENTS)],
    };

    /// `A -> B -> C -> A`.
    pub const CYCLIC: Self = Self {
        dir: "cyclic",
        files: &[("container.go", CYCLIC_CONTAINER)],
    };

    /// A component whose method takes a variadic parameter.
    pub const VARIADIC: Self = Self {
        dir: "logging",
        files: &[("container.go", VARIADIC_CONTAINER)],
    };

    /// A container interface without the annotation.
    pub const UNANNOTATED: Self = Self {
        dir: "plain",
        files: &[("container.go", UNANNOTATED_CONTAINER)],
    };

    /// Two annotated interfaces in separate files.
    pub const DOUBLE_ANNOTATED: Self = Self {
        dir: "double",
        files: &[("one.go", DOUBLE_ONE), ("two.go", DOUBLE_TWO)],
    };

    /// Container in `app`, component and constructor in `infra`.
    pub const APP: Self = Self {
        dir: "app",
        files: &[("container.go", APP_CONTAINER)],
    };

    /// Package providing the component used by [`GoPackageFixture::APP`].
    pub const INFRA: Self = Self {
        dir: "infra",
        files: &[("store.go", INFRA_STORE)],
    };
}

/// Write `fixture` below `root` and return the package directory.
///
/// # Errors
/// Returns an I/O error if a directory or file cannot be created.
pub fn write_package(root: &Path, fixture: GoPackageFixture) -> io::Result<PathBuf> {
    let dir = root.join(fixture.dir);
    std::fs::create_dir_all(&dir)?;
    for (name, source) in fixture.files {
        std::fs::write(dir.join(name), source)?;
    }
    Ok(dir)
}

const SIMPLE_CONTAINER: &str = r#"package sample

// DIContainer wires the sample components.
// +DICON
type DIContainer interface {
	A() (A, error)
	B() (B, error)
}
"#;

const SIMPLE_COMPONENTS: &str = r#"package sample

import "fmt"

type A interface {
	Run() error
}

type B interface {
	Exec() error
}

type a struct {
	b B
}

func (x *a) Run() error { return x.b.Exec() }

type b struct{}

func (*b) Exec() error {
	fmt.Println("exec")
	return nil
}

func NewA(dep B) (A, error) {
	return &a{b: dep}, nil
}

func NewB() (B, error) {
	return &b{}, nil
}
"#;

const CYCLIC_CONTAINER: &str = r#"package cyclic

// +DICON
type DIContainer interface {
	A() (A, error)
	B() (B, error)
	C() (C, error)
}

type A interface{}
type B interface{}
type C interface{}

func NewA(b B) (A, error) { return nil, nil }
func NewB(c C) (B, error) { return nil, nil }
func NewC(a A) (C, error) { return nil, nil }
"#;

const VARIADIC_CONTAINER: &str = r#"package logging

// +DICON
type DIContainer interface {
	Logger() (Logger, error)
}

type Logger interface {
	Logf(format string, args ...interface{})
	Level() int
}

func NewLogger() (Logger, error) { return nil, nil }
"#;

const UNANNOTATED_CONTAINER: &str = r#"package plain

type DIContainer interface {
	A() (A, error)
}

type A interface{}

func NewA() (A, error) { return nil, nil }
"#;

const DOUBLE_ONE: &str = r#"package double

// +DICON
type One interface {
	A() (A, error)
}

type A interface{}
"#;

const DOUBLE_TWO: &str = r#"package double

// +DICON
type Two interface {
	A() (A, error)
}
"#;

const APP_CONTAINER: &str = r#"package app

import (
	"example.com/project/infra"
)

// +DICON
type DIContainer interface {
	Store() (infra.Store, error)
}
"#;

const INFRA_STORE: &str = r#"package infra

import "context"

type Store interface {
	Get(ctx context.Context, key string) ([]byte, error)
	Put(ctx context.Context, key string, value []byte) error
}

func NewStore() (Store, error) { return nil, nil }
"#;
