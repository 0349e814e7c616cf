use std::{fmt, rc::Rc};

use crate::runtime::{
    class::ClassRef, error::RuntimeError, instance::Instance, value::Value,
};

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, RuntimeError>;
pub type MethodFn = dyn Fn(&Rc<Instance>, &[Value]) -> Result<Value, RuntimeError>;
pub type OperationFn = dyn Fn(&ClassRef, &[Value]) -> Result<Value, RuntimeError>;

/// Free-standing function value. Equality is identity.
#[derive(Clone)]
pub struct Function {
    pub name: Rc<str>,
    func: Rc<NativeFn>,
}

impl Function {
    pub fn new(
        name: &str,
        func: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.func) as *const () as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Instance-level member; runs with `this` bound to the receiving instance.
#[derive(Clone)]
pub struct Method {
    pub name: Rc<str>,
    func: Rc<MethodFn>,
}

impl Method {
    pub fn new(
        name: &str,
        func: impl Fn(&Rc<Instance>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn call(&self, this: &Rc<Instance>, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.func)(this, args)
    }

    pub fn ptr_eq(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.name)
    }
}

/// Class-level member; runs with `this` bound to the class descriptor.
#[derive(Clone)]
pub struct Operation {
    pub name: Rc<str>,
    func: Rc<OperationFn>,
}

impl Operation {
    pub fn new(
        name: &str,
        func: impl Fn(&ClassRef, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn call(&self, class: &ClassRef, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.func)(class, args)
    }

    pub fn ptr_eq(&self, other: &Operation) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operation({})", self.name)
    }
}
