//! Tagged dynamic values.
//!
//! A [`Variable`] is the runtime representation of every NWScript value that
//! crosses the boundary between the interpreter and native engine functions:
//! arguments, return values, local variables and captured script state.
//!
//! ## Type-exact access
//!
//! Accessors never coerce. Reading an `Int` as a `Float` (or any other tag
//! mismatch) is a [`ConversionError::TypeMismatch`]:
//!
//! ```
//! use nwscript_core::Variable;
//!
//! let v = Variable::Int(5);
//! assert_eq!(v.as_int().unwrap(), 5);
//! assert!(v.as_float().is_err());
//! ```

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::{ObjectId, ScriptState};

// ============================================================================
// Types
// ============================================================================

/// Kind of an engine-defined opaque structure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum EngineTypeKind {
    Effect = 0,
    Event = 1,
    Location = 2,
    Talent = 3,
    ItemProperty = 4,
}

impl EngineTypeKind {
    /// Script-visible name of this engine type.
    pub fn name(self) -> &'static str {
        match self {
            EngineTypeKind::Effect => "effect",
            EngineTypeKind::Event => "event",
            EngineTypeKind::Location => "location",
            EngineTypeKind::Talent => "talent",
            EngineTypeKind::ItemProperty => "itemproperty",
        }
    }
}

/// Declared type of a value, as used by function signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    Void,
    Int,
    Float,
    String,
    Object,
    Vector,
    Engine(EngineTypeKind),
    /// A captured script closure (`action` in NWScript).
    ScriptState,
}

impl VariableType {
    /// Script-visible name of this type.
    pub fn name(self) -> &'static str {
        match self {
            VariableType::Void => "void",
            VariableType::Int => "int",
            VariableType::Float => "float",
            VariableType::String => "string",
            VariableType::Object => "object",
            VariableType::Vector => "vector",
            VariableType::Engine(kind) => kind.name(),
            VariableType::ScriptState => "action",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Vector
// ============================================================================

/// A 3-float vector (positions, orientations).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Sum of absolute coordinate deltas.
    pub fn manhattan_distance(&self, other: &Vector) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Vector) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ============================================================================
// Engine types
// ============================================================================

/// An engine-defined structure (effect, location, ...).
///
/// The payload is opaque to the core: only the engine functions that create
/// and consume a given kind interpret it. Keeping it as a list of plain
/// variables makes every engine value serializable without a per-kind codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineType {
    pub kind: EngineTypeKind,
    pub payload: Vec<Variable>,
}

impl EngineType {
    pub fn new(kind: EngineTypeKind, payload: Vec<Variable>) -> Self {
        Self { kind, payload }
    }

    /// An empty value of the given kind (the zero value for that type).
    pub fn empty(kind: EngineTypeKind) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }
}

// ============================================================================
// Variable
// ============================================================================

/// A tagged dynamic value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Variable {
    #[default]
    Void,
    Int(i32),
    Float(f32),
    String(String),
    Object(ObjectId),
    Vector(Vector),
    Engine(EngineType),
    ScriptState(Box<ScriptState>),
}

impl Variable {
    /// The zero/empty value for a declared type.
    pub fn default_for(ty: VariableType) -> Self {
        match ty {
            VariableType::Void => Variable::Void,
            VariableType::Int => Variable::Int(0),
            VariableType::Float => Variable::Float(0.0),
            VariableType::String => Variable::String(String::new()),
            VariableType::Object => Variable::Object(ObjectId::INVALID),
            VariableType::Vector => Variable::Vector(Vector::ZERO),
            VariableType::Engine(kind) => Variable::Engine(EngineType::empty(kind)),
            VariableType::ScriptState => Variable::ScriptState(Box::default()),
        }
    }

    /// The tag of this value.
    pub fn variable_type(&self) -> VariableType {
        match self {
            Variable::Void => VariableType::Void,
            Variable::Int(_) => VariableType::Int,
            Variable::Float(_) => VariableType::Float,
            Variable::String(_) => VariableType::String,
            Variable::Object(_) => VariableType::Object,
            Variable::Vector(_) => VariableType::Vector,
            Variable::Engine(e) => VariableType::Engine(e.kind),
            Variable::ScriptState(_) => VariableType::ScriptState,
        }
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        self.variable_type().name()
    }

    /// Check if this value is void.
    pub fn is_void(&self) -> bool {
        matches!(self, Variable::Void)
    }

    fn mismatch(&self, expected: VariableType) -> ConversionError {
        ConversionError::TypeMismatch {
            expected: expected.name(),
            actual: self.type_name(),
        }
    }

    pub fn as_int(&self) -> Result<i32, ConversionError> {
        match self {
            Variable::Int(v) => Ok(*v),
            other => Err(other.mismatch(VariableType::Int)),
        }
    }

    pub fn as_float(&self) -> Result<f32, ConversionError> {
        match self {
            Variable::Float(v) => Ok(*v),
            other => Err(other.mismatch(VariableType::Float)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ConversionError> {
        match self {
            Variable::String(s) => Ok(s),
            other => Err(other.mismatch(VariableType::String)),
        }
    }

    pub fn as_object(&self) -> Result<ObjectId, ConversionError> {
        match self {
            Variable::Object(id) => Ok(*id),
            other => Err(other.mismatch(VariableType::Object)),
        }
    }

    pub fn as_vector(&self) -> Result<Vector, ConversionError> {
        match self {
            Variable::Vector(v) => Ok(*v),
            other => Err(other.mismatch(VariableType::Vector)),
        }
    }

    /// Access an engine value, checking its kind as well as the tag.
    pub fn as_engine(&self, kind: EngineTypeKind) -> Result<&EngineType, ConversionError> {
        match self {
            Variable::Engine(e) if e.kind == kind => Ok(e),
            other => Err(other.mismatch(VariableType::Engine(kind))),
        }
    }

    pub fn as_script_state(&self) -> Result<&ScriptState, ConversionError> {
        match self {
            Variable::ScriptState(state) => Ok(state),
            other => Err(other.mismatch(VariableType::ScriptState)),
        }
    }
}

/// Diagnostic formatting: strings are quoted, objects print their id.
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Void => f.write_str("void"),
            Variable::Int(v) => write!(f, "{v}"),
            Variable::Float(v) => write!(f, "{v:?}"),
            Variable::String(s) => write!(f, "{s:?}"),
            Variable::Object(id) => write!(f, "{id}"),
            Variable::Vector(v) => write!(f, "{v}"),
            Variable::Engine(e) => write!(f, "<{}>", e.kind.name()),
            Variable::ScriptState(_) => f.write_str("<action>"),
        }
    }
}
