use std::rc::Rc;

use crate::runtime::{
    callable::{Method, Operation},
    class::ClassRef,
    error::RuntimeError,
    instance::Instance,
    value::Value,
};

/// Everything needed to declare a class.
///
/// Built with chained calls and consumed by
/// [`declare_class`](crate::runtime::class::declare_class) or
/// [`Registry::declare`](crate::runtime::class::Registry::declare).
#[derive(Debug, Default, Clone)]
pub struct ClassDeclaration {
    pub(crate) name: Option<Rc<str>>,
    pub(crate) parent: Option<ClassRef>,
    pub(crate) initialize: Option<Method>,
    pub(crate) properties: Vec<(Rc<str>, Value)>,
    pub(crate) shared: Vec<(Rc<str>, Value)>,
    pub(crate) methods: Vec<Method>,
    pub(crate) operations: Vec<Operation>,
}

impl ClassDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn extends(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn initialize(
        mut self,
        func: impl Fn(&Rc<Instance>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.initialize = Some(Method::new("initialize", func));
        self
    }

    /// Instance attribute with its default value.
    pub fn property(mut self, name: &str, default: impl Into<Value>) -> Self {
        self.properties.push((name.into(), default.into()));
        self
    }

    /// Class attribute with its initial value.
    pub fn shared(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.shared.push((name.into(), value.into()));
        self
    }

    pub fn method(
        mut self,
        name: &str,
        func: impl Fn(&Rc<Instance>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.methods.push(Method::new(name, func));
        self
    }

    pub fn operation(
        mut self,
        name: &str,
        func: impl Fn(&ClassRef, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.operations.push(Operation::new(name, func));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
