//! Engine function table entries.
//!
//! A [`FunctionDef`] keeps the id, name, signature, defaults and callback of
//! one engine function in a single record, so a callback can never be paired
//! with another function's signature or defaults.

use std::fmt;

use nwscript_core::{Defaults, FunctionId, NativeError, RegistrationError, Signature, VariableType};

use crate::{FunctionContext, NativeFn};

/// One row of the engine function table.
pub struct FunctionDef<H> {
    pub id: FunctionId,
    pub name: String,
    pub signature: Signature,
    pub defaults: Defaults,
    /// `None` for functions declared by the table but not implemented.
    pub native: Option<NativeFn<H>>,
}

impl<H> FunctionDef<H> {
    /// Declare a function without an implementation.
    pub fn new(id: u32, name: impl Into<String>, signature: Signature, defaults: Defaults) -> Self {
        Self {
            id: FunctionId(id),
            name: name.into(),
            signature,
            defaults,
            native: None,
        }
    }

    /// Bind the native implementation.
    pub fn with_native<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut H, &mut FunctionContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        self.native = Some(NativeFn::new(f));
        self
    }

    /// Check if a native implementation is bound.
    pub fn is_implemented(&self) -> bool {
        self.native.is_some()
    }

    pub fn param_min(&self) -> usize {
        self.signature.param_min(&self.defaults)
    }

    pub fn param_max(&self) -> usize {
        self.signature.param_max()
    }

    /// Check the entry is well formed.
    ///
    /// Parameters may not be void, and the defaults must match the types of
    /// the trailing parameters they cover.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let params = self.signature.params();

        if let Some(index) = params.iter().position(|p| *p == VariableType::Void) {
            return Err(RegistrationError::VoidParameter {
                name: self.name.clone(),
                index,
            });
        }

        if self.defaults.len() > params.len() {
            return Err(RegistrationError::TooManyDefaults {
                name: self.name.clone(),
                params: params.len(),
                defaults: self.defaults.len(),
            });
        }

        let first = params.len() - self.defaults.len();
        for (offset, value) in self.defaults.values().iter().enumerate() {
            let index = first + offset;
            let expected = params[index];
            if value.variable_type() != expected {
                return Err(RegistrationError::DefaultTypeMismatch {
                    name: self.name.clone(),
                    index,
                    expected,
                    actual: value.variable_type(),
                });
            }
        }

        Ok(())
    }
}

impl<H> Clone for FunctionDef<H> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            signature: self.signature.clone(),
            defaults: self.defaults.clone(),
            native: self.native.clone(),
        }
    }
}

impl<H> fmt::Debug for FunctionDef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("defaults", &self.defaults)
            .field("implemented", &self.is_implemented())
            .finish()
    }
}
