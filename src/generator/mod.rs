//! Go source emitters.
//!
//! Both emitters write gofmt-shaped text (tab indentation, one statement per line,
//! standard library imports grouped before the rest and each group sorted) into a
//! [`SourceBuffer`]. Only the imports whose qualifier the output uses are written.
//!
//! - [`container`] - the lazy, memoizing DI container
//! - [`mock`] - function-field test doubles for component interfaces
//! - [`output`] - the formatting pass applied to finished text

pub mod container;
pub mod mock;
pub mod output;

pub use container::ContainerGenerator;
pub use mock::MockGenerator;
pub use output::GoFormatter;

use crate::model::Package;
use std::collections::{BTreeSet, HashSet};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by dicon; DO NOT EDIT.";

/// Line-oriented text buffer that tracks block indentation.
#[derive(Debug, Default)]
pub struct SourceBuffer {
    buf: String,
    indent: usize,
}

impl SourceBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append a line that opens a block and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedent and append the line that closes a block.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Write the generated-file banner and package clause.
    pub fn header(&mut self, package: &str) {
        self.line(GENERATED_HEADER);
        self.blank();
        self.line(format!("package {package}"));
        self.blank();
    }

    /// Write an `import ( ... )` block, one blank-line separated group per slice.
    ///
    /// Import paths already written by an earlier group are skipped, and empty groups
    /// are dropped. Nothing is written when every group is empty.
    pub fn imports(&mut self, groups: &[Vec<Package>]) {
        let mut seen: HashSet<&str> = HashSet::new();
        let groups: Vec<Vec<&Package>> = groups
            .iter()
            .map(|group| group.iter().filter(|p| seen.insert(p.path.as_str())).collect::<Vec<_>>())
            .filter(|group| !group.is_empty())
            .collect();

        if groups.is_empty() {
            return;
        }

        self.open("import (");
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            for package in group {
                self.line(package.import_line());
            }
        }
        self.close(")");
        self.blank();
    }

    /// Consume the buffer.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Shorthand for an unaliased import.
#[must_use]
pub fn import(path: &str) -> Package {
    Package {
        name: None,
        path: path.to_string(),
    }
}

/// The imports among `candidates` whose selector is one of `qualifiers`.
///
/// Blank and dot imports never match. The first import of a path wins.
pub fn used_imports<'a>(
    candidates: impl IntoIterator<Item = &'a Package>,
    qualifiers: &BTreeSet<&str>,
) -> Vec<Package> {
    let mut seen: HashSet<&str> = HashSet::new();
    candidates
        .into_iter()
        .filter(|p| qualifiers.contains(p.selector()))
        .filter(|p| seen.insert(p.path.as_str()))
        .cloned()
        .collect()
}

/// Split `imports` into a standard library group and a third-party group, each
/// sorted by path, the layout gofmt leaves untouched.
#[must_use]
pub fn import_groups(imports: impl IntoIterator<Item = Package>) -> Vec<Vec<Package>> {
    let (mut standard, mut external): (Vec<Package>, Vec<Package>) =
        imports.into_iter().partition(Package::is_standard);
    standard.sort_by(|a, b| a.path.cmp(&b.path));
    external.sort_by(|a, b| a.path.cmp(&b.path));
    vec![standard, external]
}
