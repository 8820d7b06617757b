// context.rs
//
// The seam between the parser and the debugger runtime. The parser borrows an
// `EvalContext` for the duration of a parse; the context owns nothing of the
// parser and the parser stores only the opaque handles the context mints.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use spyglass_identity::{BasicType, TargetLayout};

/// Opaque handle to a type known to the debug target.
///
/// The payload belongs to whoever implements [`EvalContext`]; the parser only
/// clones the handle into cast nodes and prints the name in diagnostics.
#[derive(Clone)]
pub struct TypeHandle {
    name: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl TypeHandle {
    pub fn new(name: impl Into<Arc<str>>, payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Display name of the type, e.g. `unsigned long` or `ns::Foo<int> *`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Downcast the resolver-owned payload.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.name)
    }
}

/// Opaque handle to a value in the debug target, reference-counted into the
/// debugger runtime.
#[derive(Clone)]
pub struct ValueHandle {
    payload: Arc<dyn Any + Send + Sync>,
}

impl ValueHandle {
    pub fn new(payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self { payload }
    }

    /// Downcast the resolver-owned payload.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for ValueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueHandle")
    }
}

/// Symbol resolution and value construction against the current evaluation
/// frame. Implemented by the debugger runtime; the repo ships test doubles
/// only.
pub trait EvalContext {
    /// Resolve a canonical base type name (`"unsigned long"`,
    /// `"ns::Foo<int>"`) in the current frame.
    fn resolve_type(&self, name: &str) -> Option<TypeHandle>;

    /// Pointer type to `ty`. `None` means the combination is semantically
    /// invalid (a pointer to a reference type).
    fn pointer_to(&self, ty: &TypeHandle) -> Option<TypeHandle>;

    /// Reference type to `ty`. `None` means the combination is semantically
    /// invalid (a reference to a reference type).
    fn reference_to(&self, ty: &TypeHandle) -> Option<TypeHandle>;

    /// Look up a (possibly qualified) identifier in the current frame.
    fn lookup_identifier(&self, name: &str) -> Option<ValueHandle>;

    /// Handle for a fundamental type of the target.
    fn basic_type(&self, kind: BasicType) -> TypeHandle;

    fn value_from_int(&self, magnitude: u64, is_signed: bool, ty: &TypeHandle) -> ValueHandle;
    fn value_from_float(&self, value: f64, ty: &TypeHandle) -> ValueHandle;
    fn value_from_bool(&self, value: bool) -> ValueHandle;
    fn value_nullptr(&self) -> ValueHandle;
}

/// Parser configuration, injected at construction. No global state.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Name used in the `file:line:col` prefix of diagnostics.
    pub file_name: String,
    /// Integer widths of the debug target, consumed by literal typing.
    pub layout: TargetLayout,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            file_name: "<expr>".to_string(),
            layout: TargetLayout::default(),
        }
    }
}
