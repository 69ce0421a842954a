//! Stored routines: functions and procedures.

use std::fmt;

use crate::error::ConfigError;

use super::schema::SchemaId;
use super::types::ColumnType;

/// What kind of routine this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoutineKind {
    /// A function: returns a value.
    Function,
    /// A procedure: invoked for its effects.
    Procedure,
}

impl RoutineKind {
    /// Parse a routine type string, case-insensitively.
    ///
    /// "FUNCtion" parses as a function; anything that is not a spelling of
    /// function or procedure is rejected.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "procedure" => Ok(Self::Procedure),
            _ => Err(ConfigError::UnknownRoutineType(value.to_string())),
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::Procedure => "procedure",
        };
        write!(f, "{name}")
    }
}

/// Direction of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterMode {
    /// Input parameter.
    In,
    /// Output parameter.
    Out,
    /// Both directions.
    InOut,
    /// Function result column.
    Result,
    /// The backend did not say.
    #[default]
    Unknown,
}

impl ParameterMode {
    /// Parse a backend-reported mode string; unrecognized values come back
    /// unknown rather than failing, since modes are descriptive only.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "in" => Self::In,
            "out" => Self::Out,
            "inout" | "in/out" => Self::InOut,
            "result" | "return" | "returnvalue" => Self::Result,
            _ => Self::Unknown,
        }
    }
}

/// One routine parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineParameter {
    /// Parameter name; empty for unnamed positional parameters.
    pub name: String,
    /// 1-based position.
    pub ordinal: u32,
    /// Declared type.
    pub column_type: ColumnType,
    /// Direction.
    pub mode: ParameterMode,
}

/// A stored function or procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    /// Schema this routine belongs to.
    pub schema: SchemaId,
    /// Routine name.
    pub name: String,
    /// Backend disambiguator for overloads; equals the name when the
    /// backend has no overloading.
    pub specific_name: String,
    /// Function or procedure.
    pub kind: RoutineKind,
    /// Return type, for functions that report one.
    pub return_type: Option<ColumnType>,
    /// Backend-supplied remarks.
    pub remarks: Option<String>,
    /// Parameters in ordinal order.
    pub parameters: Vec<RoutineParameter>,
}

impl Routine {
    /// Create a routine shell.
    pub fn new(
        schema: SchemaId,
        name: impl Into<String>,
        specific_name: impl Into<String>,
        kind: RoutineKind,
    ) -> Self {
        Self {
            schema,
            name: name.into(),
            specific_name: specific_name.into(),
            kind,
            return_type: None,
            remarks: None,
            parameters: Vec::new(),
        }
    }

    /// Value reference to this routine.
    pub fn routine_ref(&self) -> RoutineRef {
        RoutineRef {
            schema: self.schema.clone(),
            name: self.name.clone(),
            specific_name: self.specific_name.clone(),
        }
    }

    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }
}

/// Value reference to a routine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutineRef {
    /// Schema of the routine.
    pub schema: SchemaId,
    /// Routine name.
    pub name: String,
    /// Backend disambiguator for overloads.
    pub specific_name: String,
}

impl RoutineRef {
    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }
}

impl fmt::Display for RoutineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
