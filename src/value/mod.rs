//! The in-memory JSON value model.
//!
//! A [`Value`] is one of six variants. Containers ([`Array`], [`Object`])
//! own their children outright: attaching a value moves it into the
//! container, and dropping the container drops every child exactly once.
//! There is no shared ownership, so a tree can never contain a cycle.
//!
//! - [`string`] - owned byte strings
//! - [`number`] - integer-or-float numbers
//! - [`array`] - sentinel-bounded linked list
//! - [`object`] - fixed-bucket hash table

pub mod array;
pub mod number;
pub mod object;
pub mod string;

pub use array::{Array, ArrayIter};
pub use number::Number;
pub use object::{Object, ObjectIter};
pub use string::JsonString;

/// Discriminant of a [`Value`]. The numeric tags are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// String variant
    String = 0,
    /// Number variant
    Number = 1,
    /// Boolean variant
    Boolean = 2,
    /// Null variant
    Null = 3,
    /// Array variant
    Array = 4,
    /// Object variant
    Object = 5,
}

/// A JSON value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON string (arbitrary bytes)
    String(JsonString),
    /// JSON number (integer or float)
    Number(Number),
    /// JSON boolean
    Boolean(bool),
    /// JSON null
    #[default]
    Null,
    /// JSON array
    Array(Array),
    /// JSON object
    Object(Object),
}

impl Value {
    /// New string value copied from `bytes`.
    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        Value::String(JsonString::new(bytes))
    }

    /// New integer number.
    pub fn integer(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }

    /// New float number.
    pub fn float(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }

    /// New boolean.
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    /// New null.
    pub fn null() -> Self {
        Value::Null
    }

    /// New empty array.
    pub fn array() -> Self {
        Value::Array(Array::new())
    }

    /// New empty object with `bucket_count` buckets (0 for the default).
    pub fn object(bucket_count: usize) -> Self {
        Value::Object(Object::with_buckets(bucket_count))
    }

    /// The variant's discriminant.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer payload of an integer Number.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Returns the float payload of a float Number.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    /// Returns the string payload if this is a String, None otherwise.
    pub fn as_json_string(&self) -> Option<&JsonString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string as `&str` if this is a UTF-8 String.
    pub fn as_str(&self) -> Option<&str> {
        self.as_json_string().and_then(JsonString::as_str)
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable array access.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutable object access.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value from an object by key.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(JsonString::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(JsonString::from(s))
    }
}

impl From<JsonString> for Value {
    fn from(s: JsonString) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// Drop detached containers one at a time.
///
/// Each container hands its own nested containers to `pending` before it is
/// dropped, so teardown depth stays constant however deep the tree is.
fn release(mut pending: Vec<Value>) {
    while let Some(mut value) = pending.pop() {
        match &mut value {
            Value::Array(array) => array.detach_nested(&mut pending),
            Value::Object(object) => object.detach_nested(&mut pending),
            _ => {}
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_tags() {
        assert_eq!(Value::string("x").kind() as u8, 0);
        assert_eq!(Value::integer(1).kind() as u8, 1);
        assert_eq!(Value::boolean(true).kind() as u8, 2);
        assert_eq!(Value::null().kind() as u8, 3);
        assert_eq!(Value::array().kind() as u8, 4);
        assert_eq!(Value::object(0).kind() as u8, 5);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(4.5).as_f64(), Some(4.5));
        assert_eq!(Value::from(4.5).as_i64(), None);
        assert_eq!(Value::from("test").as_str(), Some("test"));
        assert!(Value::null().as_array().is_none());
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Boolean(false).type_name(), "boolean");
        assert_eq!(Value::integer(0).type_name(), "number");
        assert_eq!(Value::string("").type_name(), "string");
        assert_eq!(Value::array().type_name(), "array");
        assert_eq!(Value::object(0).type_name(), "object");
    }

    #[test]
    fn integer_and_float_are_distinct() {
        assert_ne!(Value::integer(1), Value::float(1.0));
    }

    #[test]
    fn nested_lookup() {
        let mut info = Array::new();
        info.push(Value::from(170));
        info.push(Value::from(65.5));
        let mut person = Object::new();
        person.add("info", Value::from(info)).unwrap();
        let person = Value::from(person);

        let info = person.get("info").unwrap();
        assert_eq!(info.get_index(0).and_then(Value::as_i64), Some(170));
        assert_eq!(info.get_index(1).and_then(Value::as_f64), Some(65.5));
        assert!(person.get("missing").is_none());
    }

    #[test]
    fn mutate_through_container() {
        let mut root = Value::object(8);
        root.as_object_mut()
            .unwrap()
            .add("list", Value::array())
            .unwrap();
        root.as_object_mut()
            .and_then(|o| o.get_mut("list"))
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(Value::null());
        assert_eq!(root.get("list").and_then(Value::as_array).map(Array::len), Some(1));
    }
}
