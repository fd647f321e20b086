//! Dynamic value representation
//!
//! Handlers registered on a fake exchange loosely typed values, shaped after
//! JavaScript's so that production code written against promises can be
//! exercised without committing to one Rust type per chain.

use crate::prelude::*;

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// This trait makes it explicit when a clone is cheap (just incrementing a reference count)
/// vs when it might be expensive (copying data). Types implementing this trait should have
/// O(1) clone operations, typically because they use `Rc` or similar reference counting.
///
/// Regular `.clone()` should still work but requires a comment explaining why the clone
/// is necessary when the type doesn't implement `CheapClone`.
pub trait CheapClone: Clone {
    /// Create a cheap (reference-counted) clone of this value.
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Rc<T> {}

/// Result of invoking a [`Function`]. `Err` carries a thrown value.
pub type Completion = Result<Value, Value>;

/// A dynamic value passed through a promise chain
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<IndexMap<String, Value>>),
    Error(Rc<ErrorValue>),
    Function(Function),
}

// Every variant is either Copy data or an Rc
impl CheapClone for Value {}

impl Value {
    /// Create an `Error` value with the given message
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorValue::new("Error", message)))
    }

    /// Create an error value with a custom name (e.g. `TypeError`)
    pub fn error_named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorValue::new(name, message)))
    }

    /// Wrap a closure as a callable value
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Completion + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// Build an array value
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(items.into_iter().collect()))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Check if this value is callable (a function)
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Get the typeof result for this value
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // Historical quirk
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) | Value::Error(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Look up a property of an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(props) => props.get(key),
            _ => None,
        }
    }

    /// Strict equality (===), except arrays and objects compare structurally
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            // NaN !== NaN
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y))
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.iter().all(|(k, v)| b.get(k).is_some_and(|other| v == other)))
            }
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b) || a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Convert to JSON the way `JSON.stringify` would.
    ///
    /// Returns `None` for values with no JSON form at the top level
    /// (`undefined` and functions). Errors serialize as `{name, message}`.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        match self {
            Value::Undefined | Value::Function(_) => None,
            Value::Null => Some(Json::Null),
            Value::Boolean(b) => Some(Json::Bool(*b)),
            Value::Number(n) => Some(
                serde_json::Number::from_f64(*n)
                    .map(|num| match integral(*n) {
                        Some(i) => Json::from(i),
                        None => Json::Number(num),
                    })
                    .unwrap_or(Json::Null),
            ),
            Value::String(s) => Some(Json::String(s.to_string())),
            Value::Array(items) => Some(Json::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(Json::Null))
                    .collect(),
            )),
            Value::Object(props) => {
                let mut map = serde_json::Map::new();
                for (key, value) in props.iter() {
                    if let Some(json) = value.to_json() {
                        map.insert(key.clone(), json);
                    }
                }
                Some(Json::Object(map))
            }
            Value::Error(err) => {
                let mut map = serde_json::Map::new();
                map.insert("name".to_string(), Json::String(err.name.clone()));
                map.insert("message".to_string(), Json::String(err.message.clone()));
                Some(Json::Object(map))
            }
        }
    }
}

/// `Some(i)` when `n` is an integer small enough to print without an exponent
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && math::trunc(n) == n && math::abs(n) < 1e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(props) => f.debug_map().entries(props.iter()).finish(),
            Value::Error(err) => write!(f, "[{}]", err),
            Value::Function(func) => write!(f, "{:?}", func),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    write!(f, "{}", if *n > 0.0 { "Infinity" } else { "-Infinity" })
                } else if let Some(i) = integral(*n) {
                    write!(f, "{}", i)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !item.is_null_or_undefined() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Error(err) => write!(f, "{}", err),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Conversions from Rust types

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(Rc::new(err))
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::array(items.into_iter().map(Value::from)),
            Json::Object(map) => {
                let mut props = index_map_new();
                for (key, value) in map {
                    props.insert(key, Value::from(value));
                }
                Value::Object(Rc::new(props))
            }
        }
    }
}

/// The payload of an `Error` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// A callable handler.
///
/// Receives its arguments as a slice and either returns a value or throws one.
#[derive(Clone)]
pub struct Function {
    name: Option<Rc<str>>,
    call: Rc<dyn Fn(&[Value]) -> Completion>,
}

// Function wraps two Rcs, so clone is cheap
impl CheapClone for Function {}

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Completion + 'static,
    {
        Self {
            name: None,
            call: Rc::new(f),
        }
    }

    /// Create a named function; the name shows up in debug output
    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Completion + 'static,
    {
        let name: String = name.into();
        Self {
            name: Some(Rc::from(name)),
            call: Rc::new(f),
        }
    }

    /// A function that ignores its arguments and returns `undefined`
    pub fn noop() -> Self {
        Self::named("noop", |_| Ok(Value::Undefined))
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    pub fn call(&self, args: &[Value]) -> Completion {
        (self.call)(args)
    }

    /// Whether both handles refer to the same underlying closure
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name())
    }
}
