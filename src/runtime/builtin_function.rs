use std::fmt;

use crate::runtime::{callable::Function, error::RuntimeError, value::Value};

pub type BuiltinFn = fn(Vec<Value>) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl BuiltinFunction {
    pub fn call(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.func)(args)
    }

    /// The builtin as a function value, so it can be passed as a callback.
    pub fn to_value(&self) -> Value {
        let func = self.func;
        Value::Function(Function::new(self.name, move |args| func(args.to_vec())))
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFunction({})", self.name)
    }
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
