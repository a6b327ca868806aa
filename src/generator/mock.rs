//! Mock emitter.
//!
//! For an interface `I` with method `M`, emits `IMock` holding a `MMock` function
//! field, a `NewIMock` constructor returning the zero value, and a method `M` that
//! forwards its arguments to the field.

use super::{SourceBuffer, import_groups, used_imports};
use crate::core::DiconError;
use crate::model::{FuncType, InterfaceType};
use std::collections::BTreeSet;

/// Rendered pieces of one method signature.
struct Signature {
    /// `a0 T0, a1 ...T1`
    params: String,
    /// `a0, a1...`
    call_args: String,
    /// Empty, ` T` or ` (T, U)`
    results: String,
    has_results: bool,
}

/// Emits mock implementations into a destination package.
#[derive(Debug)]
pub struct MockGenerator {
    package: String,
    buf: SourceBuffer,
}

impl MockGenerator {
    /// Create a generator writing into package `package`.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            buf: SourceBuffer::new(),
        }
    }

    /// Generate mocks for every interface in `targets`.
    ///
    /// The import block holds the imports of the target files whose names qualify a
    /// type in some mocked signature, one per path.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::UnsupportedTypeExpression`] if a method signature uses a
    /// type the renderer cannot express.
    pub fn generate(mut self, targets: &[InterfaceType]) -> Result<String, DiconError> {
        self.buf.header(&self.package);

        let mut qualifiers = BTreeSet::new();
        for method in targets.iter().flat_map(|t| &t.methods) {
            for ty in method.argument_types.iter().chain(&method.return_types) {
                ty.qualifiers(&self.package, &mut qualifiers);
            }
        }
        let imports = used_imports(targets.iter().flat_map(|t| &t.imports), &qualifiers);
        self.buf.imports(&import_groups(imports));

        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.buf.blank();
            }
            self.mock_struct(target)?;
        }

        tracing::debug!("generated {} mocks into package {}", targets.len(), self.package);
        Ok(self.buf.into_string())
    }

    fn signature(&self, method: &FuncType) -> Result<Signature, DiconError> {
        let mut params = Vec::with_capacity(method.argument_types.len());
        let mut call_args = Vec::with_capacity(method.argument_types.len());
        for (i, argument) in method.argument_types.iter().enumerate() {
            params.push(format!("a{i} {}", argument.render(&self.package)?));
            if argument.is_variadic() {
                call_args.push(format!("a{i}..."));
            } else {
                call_args.push(format!("a{i}"));
            }
        }

        let rendered = method
            .return_types
            .iter()
            .map(|r| r.render(&self.package))
            .collect::<Result<Vec<_>, _>>()?;
        let results = match rendered.len() {
            0 => String::new(),
            1 => format!(" {}", rendered[0]),
            _ => format!(" ({})", rendered.join(", ")),
        };

        Ok(Signature {
            params: params.join(", "),
            call_args: call_args.join(", "),
            results,
            has_results: !rendered.is_empty(),
        })
    }

    fn mock_struct(&mut self, target: &InterfaceType) -> Result<(), DiconError> {
        let name = &target.name;
        let signatures =
            target.methods.iter().map(|m| self.signature(m)).collect::<Result<Vec<_>, _>>()?;

        let buf = &mut self.buf;
        buf.open(format!("type {name}Mock struct {{"));
        for (method, sig) in target.methods.iter().zip(&signatures) {
            buf.line(format!("{}Mock func({}){}", method.name, sig.params, sig.results));
        }
        buf.close("}");
        buf.blank();

        buf.open(format!("func New{name}Mock() *{name}Mock {{"));
        buf.line(format!("return &{name}Mock{{}}"));
        buf.close("}");

        for (method, sig) in target.methods.iter().zip(&signatures) {
            buf.blank();
            buf.open(format!("func (mk *{name}Mock) {}({}){} {{", method.name, sig.params, sig.results));
            let call = format!("mk.{}Mock({})", method.name, sig.call_args);
            if sig.has_results {
                buf.line(format!("return {call}"));
            } else {
                buf.line(call);
            }
            buf.close("}");
        }

        Ok(())
    }
}
