//! Instance runtime.
//!
//! An instance owns its property store and two lazily filled caches: bound
//! methods by name and super proxies by ancestor class id. Everything the
//! caches hand out refers back to the instance through a `Weak`, so an
//! instance is freed as soon as the last outside `Rc` goes away, caches
//! included.

use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use crate::runtime::{
    callable::Function,
    class::{ClassDescriptor, ClassId, ClassRef},
    classify::{AT_MEMBER, LENGTH_MEMBER, LengthIndexed},
    error::RuntimeError,
    value::{MapStore, Value},
};

/// Cache key suffix for callbacks, which take the receiver as an extra
/// trailing argument.
const CALLBACK_SUFFIX: &str = "_k";

pub struct Instance {
    class: ClassRef,
    properties: RefCell<MapStore>,
    method_cache: RefCell<HashMap<Rc<str>, Rc<BoundMethod>>>,
    super_cache: RefCell<HashMap<ClassId, Rc<SuperProxy>>>,
    self_ref: Weak<Instance>,
}

impl Instance {
    pub(crate) fn new(class: ClassRef) -> Rc<Self> {
        let properties = class.default_properties();
        Rc::new_cyclic(|self_ref| Self {
            class,
            properties: RefCell::new(properties),
            method_cache: RefCell::new(HashMap::new()),
            super_cache: RefCell::new(HashMap::new()),
            self_ref: self_ref.clone(),
        })
    }

    pub fn get_class(&self) -> &ClassRef {
        &self.class
    }

    pub fn is_class(&self) -> bool {
        false
    }

    pub fn is_instance(&self, class: &ClassDescriptor) -> bool {
        self.class.is_subclass_of(class)
    }

    /// Property value, `Undefined` when unset.
    pub fn get(&self, name: &str) -> Value {
        self.properties
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.properties.borrow_mut().insert(name.into(), value.into());
    }

    /// Borrow of the property store. Must be released before any `set`.
    pub fn properties(&self) -> Ref<'_, MapStore> {
        self.properties.borrow()
    }

    pub fn property_names(&self) -> Vec<Rc<str>> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Bound callable for the method (or operation) `name`.
    ///
    /// The same `Rc` is returned for every request of the same name. The
    /// member itself is resolved when the callable runs.
    pub fn get_method(&self, name: &str) -> Result<Rc<BoundMethod>, RuntimeError> {
        self.bind(name, false)
    }

    /// Like [`get_method`](Self::get_method), but the receiver is appended
    /// to the arguments of every call.
    pub fn get_callback(&self, name: &str) -> Result<Rc<BoundMethod>, RuntimeError> {
        self.bind(name, true)
    }

    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.get_method(name)?.call(args)
    }

    /// Proxy dispatching through `ancestor`'s member table with this
    /// instance as receiver. Cached per ancestor id.
    pub fn get_super(&self, ancestor: &ClassRef) -> Result<Rc<SuperProxy>, RuntimeError> {
        if !self.class.is_subclass_of(ancestor) {
            return Err(RuntimeError::NotAnAncestor {
                class: self.class.display_name(),
                ancestor: ancestor.display_name(),
            });
        }
        if let Some(proxy) = self.super_cache.borrow().get(&ancestor.id()) {
            return Ok(proxy.clone());
        }
        let proxy = Rc::new(SuperProxy {
            instance: self.self_ref.clone(),
            class: ancestor.clone(),
        });
        self.super_cache
            .borrow_mut()
            .insert(ancestor.id(), proxy.clone());
        Ok(proxy)
    }

    fn bind(&self, name: &str, append_receiver: bool) -> Result<Rc<BoundMethod>, RuntimeError> {
        let key: Rc<str> = if append_receiver {
            format!("{}{}", name, CALLBACK_SUFFIX).into()
        } else {
            name.into()
        };
        if let Some(bound) = self.method_cache.borrow().get(&key) {
            return Ok(bound.clone());
        }
        if !self.class.responds_to(name) {
            return Err(self.class.unknown_member(name));
        }
        let bound = Rc::new(BoundMethod::new(
            self.self_ref.clone(),
            name.into(),
            append_receiver,
        ));
        self.method_cache.borrow_mut().insert(key, bound.clone());
        Ok(bound)
    }
}

/// Instances whose class answers `length` and `at` are generic iterables.
impl LengthIndexed for Instance {
    fn length(&self) -> Result<usize, RuntimeError> {
        match self.invoke(LENGTH_MEMBER, &[])? {
            Value::Integer(n) if n >= 0 => Ok(n as usize),
            other => Err(RuntimeError::Type(format!(
                "{}.length expected to return a non-negative Int, got {}",
                self.class.display_name(),
                other.type_name()
            ))),
        }
    }

    fn at(&self, index: usize) -> Result<Value, RuntimeError> {
        self.invoke(AT_MEMBER, &[Value::from(index)])
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Instance");
        out.field("class", &self.class.display_name());
        match self.properties.try_borrow() {
            Ok(properties) => out.field("properties", &*properties),
            Err(_) => out.field("properties", &"<borrowed>"),
        };
        out.finish()
    }
}

/// Method bound to an instance.
pub struct BoundMethod {
    name: Rc<str>,
    function: Function,
}

impl BoundMethod {
    fn new(receiver: Weak<Instance>, name: Rc<str>, append_receiver: bool) -> Self {
        let member = name.clone();
        let function = Function::new(&name, move |args| {
            let this = receiver
                .upgrade()
                .ok_or_else(|| RuntimeError::DetachedReceiver {
                    member: member.to_string(),
                })?;
            let class = this.get_class().clone();
            let resolved = class
                .member(&member)
                .ok_or_else(|| class.unknown_member(&member))?;
            if append_receiver {
                let mut with_receiver = args.to_vec();
                with_receiver.push(Value::Instance(this.clone()));
                resolved.invoke(&this, &class, &with_receiver)
            } else {
                resolved.invoke(&this, &class, args)
            }
        });
        Self { name, function }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        self.function.call(args)
    }

    /// The bound callable as a function value. Identity is stable for the
    /// lifetime of this binding.
    pub fn as_function(&self) -> &Function {
        &self.function
    }

    pub fn to_value(&self) -> Value {
        Value::Function(self.function.clone())
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundMethod({})", self.name)
    }
}

/// View of an instance through one of its ancestors.
///
/// Dispatch goes through the ancestor's member table, state reads and
/// writes go to the real instance.
pub struct SuperProxy {
    instance: Weak<Instance>,
    class: ClassRef,
}

impl SuperProxy {
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn instance(&self) -> Result<Rc<Instance>, RuntimeError> {
        self.instance
            .upgrade()
            .ok_or_else(|| RuntimeError::DetachedReceiver {
                member: format!("super({})", self.class.display_name()),
            })
    }

    /// Runs the ancestor's version of `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let member = self
            .class
            .member(name)
            .ok_or_else(|| self.class.unknown_member(name))?;
        let this = self.instance()?;
        member.invoke(&this, &self.class, args)
    }

    /// Runs the ancestor's initializer on the wrapped instance. Returns
    /// `Undefined` when the ancestor has none.
    pub fn initialize(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        let this = self.instance()?;
        match self.class.initializer() {
            Some(initializer) => initializer.call(&this, args),
            None => Ok(Value::Undefined),
        }
    }

    /// Proxy for the parent of this proxy's class, from the same instance
    /// cache.
    pub fn get_super(&self) -> Result<Rc<SuperProxy>, RuntimeError> {
        let parent = self
            .class
            .get_parent()
            .ok_or_else(|| RuntimeError::NoParent {
                class: self.class.display_name(),
            })?;
        self.instance()?.get_super(parent)
    }
}

impl fmt::Debug for SuperProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuperProxy({})", self.class.display_name())
    }
}

#[cfg(test)]
#[path = "instance_test.rs"]
mod instance_test;
