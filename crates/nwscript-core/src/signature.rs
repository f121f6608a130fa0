//! Function signatures and trailing default arguments.
//!
//! A [`Signature`] lists the return type followed by the parameter types of a
//! callable. [`Defaults`] supplies values for a contiguous suffix of those
//! parameters, so callers may omit trailing arguments:
//!
//! ```
//! use nwscript_core::{Defaults, Signature, Variable, VariableType};
//!
//! // float GetSomething(int a, int b, int c, int d = 4, int e = 5)
//! let sig = Signature::new(VariableType::Float, &[VariableType::Int; 5]);
//! let defaults = Defaults::new([Variable::Int(4), Variable::Int(5)]);
//!
//! assert_eq!(sig.param_min(&defaults), 3);
//! assert_eq!(sig.param_max(), 5);
//! ```

use std::fmt;

use crate::{Variable, VariableType};

/// Actual argument list of one invocation.
pub type Parameters = Vec<Variable>;

/// Stable numeric id of an engine function.
///
/// This is the bytecode's call-by-id wire contract: an id's meaning and
/// arity never change once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return type plus ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    return_type: VariableType,
    params: Vec<VariableType>,
}

impl Signature {
    pub fn new(return_type: VariableType, params: &[VariableType]) -> Self {
        Self {
            return_type,
            params: params.to_vec(),
        }
    }

    pub fn return_type(&self) -> VariableType {
        self.return_type
    }

    pub fn params(&self) -> &[VariableType] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Fewest arguments a caller may supply.
    pub fn param_min(&self, defaults: &Defaults) -> usize {
        self.params.len().saturating_sub(defaults.len())
    }

    /// Most arguments a caller may supply.
    pub fn param_max(&self) -> usize {
        self.params.len()
    }

    /// Type of parameter `index`, if declared.
    pub fn param(&self, index: usize) -> Option<VariableType> {
        self.params.get(index).copied()
    }
}

/// Default values for a contiguous suffix of a signature's parameters.
///
/// `Defaults` for a five-parameter signature holding two values cover
/// parameters 3 and 4; there are no gaps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Defaults(Vec<Variable>);

impl Defaults {
    pub fn new(values: impl Into<Vec<Variable>>) -> Self {
        Self(values.into())
    }

    /// No defaults: every parameter is required.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Variable] {
        &self.0
    }

    /// The default for parameter `index` of a `param_count`-parameter signature.
    pub fn for_param(&self, index: usize, param_count: usize) -> Option<&Variable> {
        let first = param_count.checked_sub(self.0.len())?;
        index.checked_sub(first).and_then(|i| self.0.get(i))
    }
}
