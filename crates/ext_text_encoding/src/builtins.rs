//! Built-in function registration for the scripting host
//!
//! The host dispatcher owns arity and type checking; built-ins only see
//! argument lists that already match their declaration. [`BuiltinTable`]
//! is a minimal dispatcher implementing those checks for hosts that do not
//! bring their own [`FunctionRegistry`].

use crate::adapter::EncodingAdapter;
use crate::config::supported_encodings;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Host Values
// ============================================================================

/// Error values a built-in can return to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Argument of the wrong type
    Type,
    /// Argument of the right type but an unusable value
    InvalidArgument,
    /// Wrong number of arguments
    Args,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Type => "E_TYPE",
            ErrorCode::InvalidArgument => "E_INVARG",
            ErrorCode::Args => "E_ARGS",
        };
        f.write_str(name)
    }
}

/// A script-visible value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Var {
    Int(i64),
    /// Byte string; not required to be UTF-8
    Str(Vec<u8>),
    List(Vec<Var>),
    Err(ErrorCode),
}

impl Var {
    pub fn str(value: impl Into<Vec<u8>>) -> Self {
        Var::Str(value.into())
    }

    pub fn var_type(&self) -> VarType {
        match self {
            Var::Int(_) => VarType::Int,
            Var::Str(_) => VarType::Str,
            Var::List(_) => VarType::List,
            Var::Err(_) => VarType::Err,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Var::Str(bytes) => bytes,
            _ => &[],
        }
    }
}

/// Declared argument type of a built-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Str,
    List,
    Err,
    Any,
}

impl VarType {
    fn accepts(self, value: &Var) -> bool {
        self == VarType::Any || self == value.var_type()
    }
}

// ============================================================================
// Registry
// ============================================================================

pub type BuiltinFn = Arc<dyn Fn(&[Var]) -> Var + Send + Sync>;

/// Declaration of a named built-in
#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub arg_types: Vec<VarType>,
    pub func: BuiltinFn,
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("arg_types", &self.arg_types)
            .finish()
    }
}

/// Errors raised by a registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Built-in '{name}' is already registered")]
    Duplicate { name: String },

    #[error("Unknown built-in '{name}'")]
    UnknownFunction { name: String },
}

/// A place built-ins can be registered into
pub trait FunctionRegistry {
    fn register_function(&mut self, function: BuiltinFunction) -> Result<(), RegistryError>;
}

/// Dispatcher that checks arity and argument types before calling
#[derive(Debug, Default)]
pub struct BuiltinTable {
    functions: HashMap<&'static str, BuiltinFunction>,
}

impl BuiltinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinFunction> {
        self.functions.get(name)
    }

    /// Call a built-in by name.
    ///
    /// Arity and type mismatches are script-level errors and come back as
    /// `Var::Err`; only an unknown name is a dispatch error.
    pub fn call(&self, name: &str, args: Vec<Var>) -> Result<Var, RegistryError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownFunction {
                name: name.to_string(),
            })?;

        if args.len() < function.min_args || args.len() > function.max_args {
            return Ok(Var::Err(ErrorCode::Args));
        }
        let types_match = function
            .arg_types
            .iter()
            .zip(args.iter())
            .all(|(ty, arg)| ty.accepts(arg));
        if !types_match {
            return Ok(Var::Err(ErrorCode::Type));
        }

        Ok((function.func)(args.as_slice()))
    }
}

impl FunctionRegistry for BuiltinTable {
    fn register_function(&mut self, function: BuiltinFunction) -> Result<(), RegistryError> {
        if self.functions.contains_key(function.name) {
            return Err(RegistryError::Duplicate {
                name: function.name.to_string(),
            });
        }
        self.functions.insert(function.name, function);
        Ok(())
    }
}

// ============================================================================
// Text Encoding Built-ins
// ============================================================================

/// `text_encoding_is_valid(encoding, text)` -> 1 or 0
fn bf_text_encoding_is_valid(adapter: &EncodingAdapter, args: &[Var]) -> Var {
    let encoding = String::from_utf8_lossy(args[0].as_bytes());
    Var::Int(adapter.is_valid(&encoding, args[1].as_bytes()) as i64)
}

/// `encode_text(text, from, to)` -> converted string or E_INVARG
fn bf_encode_text(adapter: &EncodingAdapter, args: &[Var]) -> Var {
    let from = String::from_utf8_lossy(args[1].as_bytes());
    let to = String::from_utf8_lossy(args[2].as_bytes());
    match adapter.convert(&from, &to, args[0].as_bytes()) {
        Ok(bytes) => Var::Str(bytes),
        Err(e) => {
            debug!(from = %from, to = %to, error = %e, "text_encoding.encode_text failed");
            Var::Err(ErrorCode::InvalidArgument)
        }
    }
}

/// `text_encodings()` -> list of advertised encoding names
fn bf_text_encodings(_args: &[Var]) -> Var {
    Var::List(
        supported_encodings()
            .iter()
            .map(|name| Var::str(name.as_bytes()))
            .collect(),
    )
}

/// Register the text encoding built-ins with `registry`
pub fn register_text_encoding(
    registry: &mut dyn FunctionRegistry,
    adapter: Arc<EncodingAdapter>,
) -> Result<(), RegistryError> {
    let is_valid_adapter = adapter.clone();
    registry.register_function(BuiltinFunction {
        name: "text_encoding_is_valid",
        min_args: 2,
        max_args: 2,
        arg_types: vec![VarType::Str, VarType::Str],
        func: Arc::new(move |args: &[Var]| bf_text_encoding_is_valid(&is_valid_adapter, args)),
    })?;

    registry.register_function(BuiltinFunction {
        name: "encode_text",
        min_args: 3,
        max_args: 3,
        arg_types: vec![VarType::Str, VarType::Str, VarType::Str],
        func: Arc::new(move |args: &[Var]| bf_encode_text(&adapter, args)),
    })?;

    registry.register_function(BuiltinFunction {
        name: "text_encodings",
        min_args: 0,
        max_args: 0,
        arg_types: Vec::new(),
        func: Arc::new(bf_text_encodings),
    })?;

    debug!("text_encoding built-ins registered");
    Ok(())
}
