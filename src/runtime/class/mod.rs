//! Class model.
//!
//! A class is declared once from a [`ClassDeclaration`]. Declaration copies
//! the parent's resolved member tables into the new class's inherited
//! partition, so a subclass keeps the view of its parent it had when it was
//! declared: members added to the parent later are not seen through the
//! subclass. Method lookup never walks the parent chain.
//!
//! Classes reference their parent strongly and nothing else; instances
//! reference their class strongly. Bound operations cached on a class hold
//! a weak handle back to it.

mod declaration;
mod member_table;
mod registry;

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

use indexmap::IndexMap;

pub use declaration::ClassDeclaration;
pub use member_table::MemberTable;
pub use registry::{Registry, get_class_of, is_instance};

use crate::runtime::{
    callable::{Method, Operation},
    diagnostics,
    error::RuntimeError,
    instance::Instance,
    value::{MapStore, Value},
};

pub type ClassRef = Rc<ClassDescriptor>;
pub type ClassId = u64;

/// Ids are unique across every registry: super-proxy caches and the
/// ordering of instances key on them.
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Name under which the initializer is also registered as a fullname.
pub const INITIALIZE: &str = "initialize";

pub struct ClassDescriptor {
    id: ClassId,
    name: Option<Rc<str>>,
    parent: Option<ClassRef>,
    initializer: Option<Method>,
    properties: MemberTable<Value>,
    shared: RefCell<MemberTable<Value>>,
    methods: RefCell<MemberTable<Method>>,
    operations: RefCell<MemberTable<Operation>>,
    operation_cache: RefCell<HashMap<Rc<str>, Rc<BoundOperation>>>,
}

/// Instance-level or class-level member resolved by name.
#[derive(Debug, Clone)]
pub enum Member {
    Method(Method),
    Operation(Operation),
}

impl Member {
    /// Runs the member with `this` as receiver. Operations receive `class`.
    pub fn invoke(
        &self,
        this: &Rc<Instance>,
        class: &ClassRef,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        match self {
            Member::Method(method) => method.call(this, args),
            Member::Operation(operation) => operation.call(class, args),
        }
    }
}

/// Declares a class without registering it anywhere.
pub fn declare_class(decl: ClassDeclaration) -> ClassRef {
    let ClassDeclaration {
        name,
        parent,
        initialize,
        properties: declared_properties,
        shared: declared_shared,
        methods: declared_methods,
        operations: declared_operations,
    } = decl;

    let id = NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed);

    let (mut properties, mut shared, mut methods, mut operations) = match &parent {
        Some(parent) => (
            MemberTable::inherit(&parent.properties),
            MemberTable::inherit(&parent.shared.borrow()),
            MemberTable::inherit(&parent.methods.borrow()),
            MemberTable::inherit(&parent.operations.borrow()),
        ),
        None => Default::default(),
    };

    for (key, default) in declared_properties {
        properties.declare(key, default);
    }
    for (key, value) in declared_shared {
        shared.declare(key, value);
    }
    for method in declared_methods {
        if let Some(class_name) = &name {
            methods.register_fullname(class_name, &method.name, method.clone());
        }
        methods.declare(method.name.clone(), method);
    }
    for operation in declared_operations {
        if let Some(class_name) = &name {
            operations.register_fullname(class_name, &operation.name, operation.clone());
        }
        operations.declare(operation.name.clone(), operation);
    }
    if let (Some(class_name), Some(init)) = (&name, &initialize) {
        methods.register_fullname(class_name, INITIALIZE, init.clone());
    }
    let initializer = initialize.or_else(|| parent.as_ref().and_then(|p| p.initializer.clone()));

    let class = Rc::new(ClassDescriptor {
        id,
        name,
        parent,
        initializer,
        properties,
        shared: RefCell::new(shared),
        methods: RefCell::new(methods),
        operations: RefCell::new(operations),
        operation_cache: RefCell::new(HashMap::new()),
    });
    diagnostics::debug(format!(
        "declared class {} (#{}){}",
        class.display_name(),
        class.id,
        class
            .parent
            .as_ref()
            .map(|p| format!(" extending {}", p.display_name()))
            .unwrap_or_default()
    ));
    class
}

impl ClassDescriptor {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name, or `anonymous#<id>` for unnamed classes.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.to_string(),
            None => format!("anonymous#{}", self.id),
        }
    }

    pub fn get_parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    pub fn is_class(&self) -> bool {
        true
    }

    /// Whether `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &ClassDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.id == other.id {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    pub fn has_instance(&self, value: &Value) -> bool {
        value
            .as_instance()
            .is_some_and(|instance| instance.get_class().is_subclass_of(self))
    }

    pub fn initializer(&self) -> Option<&Method> {
        self.initializer.as_ref()
    }

    /// Whether instances of this class have a method or operation `name`.
    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.borrow().contains(name) || self.operations.borrow().contains(name)
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.borrow().get(name).cloned()
    }

    pub fn operation(&self, name: &str) -> Option<Operation> {
        self.operations.borrow().get(name).cloned()
    }

    /// Method named `name`, else operation named `name`.
    pub fn member(&self, name: &str) -> Option<Member> {
        self.method(name)
            .map(Member::Method)
            .or_else(|| self.operation(name).map(Member::Operation))
    }

    pub fn method_by_fullname(&self, key: &str) -> Option<Method> {
        self.methods.borrow().get_fullname(key).cloned()
    }

    pub fn operation_by_fullname(&self, key: &str) -> Option<Operation> {
        self.operations.borrow().get_fullname(key).cloned()
    }

    pub fn list_methods(&self, own: bool, inherited: bool) -> IndexMap<Rc<str>, Method> {
        self.methods.borrow().list(own, inherited)
    }

    pub fn list_operations(&self, own: bool, inherited: bool) -> IndexMap<Rc<str>, Operation> {
        self.operations.borrow().list(own, inherited)
    }

    pub fn list_shared(&self, own: bool, inherited: bool) -> MapStore {
        self.shared.borrow().list(own, inherited)
    }

    pub fn list_properties(&self, own: bool, inherited: bool) -> MapStore {
        self.properties.list(own, inherited)
    }

    /// Class attribute, `Undefined` when there is none.
    pub fn shared(&self, name: &str) -> Value {
        self.shared
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    /// Sets a class attribute on this class only.
    pub fn set_shared(&self, name: &str, value: impl Into<Value>) {
        self.shared.borrow_mut().declare(name.into(), value.into());
    }

    /// Adds a method after declaration. Subclasses already declared keep
    /// their snapshot.
    pub fn add_method(
        &self,
        name: &str,
        func: impl Fn(&Rc<Instance>, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) {
        let method = Method::new(name, func);
        let mut methods = self.methods.borrow_mut();
        if let Some(class_name) = &self.name {
            methods.register_fullname(class_name, name, method.clone());
        }
        methods.declare(method.name.clone(), method);
    }

    pub fn add_operation(
        &self,
        name: &str,
        func: impl Fn(&ClassRef, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) {
        let operation = Operation::new(name, func);
        {
            let mut operations = self.operations.borrow_mut();
            if let Some(class_name) = &self.name {
                operations.register_fullname(class_name, name, operation.clone());
            }
            operations.declare(operation.name.clone(), operation);
        }
        self.operation_cache.borrow_mut().remove(name);
    }

    pub fn add_shared(&self, name: &str, value: impl Into<Value>) {
        self.set_shared(name, value);
    }

    /// Bound operation for `name`. Repeated calls return the same handle.
    pub fn get_operation(self: &Rc<Self>, name: &str) -> Result<Rc<BoundOperation>, RuntimeError> {
        if let Some(bound) = self.operation_cache.borrow().get(name) {
            return Ok(bound.clone());
        }
        let operation = self
            .operation(name)
            .ok_or_else(|| self.unknown_member(name))?;
        let bound = Rc::new(BoundOperation {
            class: Rc::downgrade(self),
            operation,
        });
        self.operation_cache
            .borrow_mut()
            .insert(name.into(), bound.clone());
        Ok(bound)
    }

    pub fn call_operation(
        self: &Rc<Self>,
        name: &str,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let operation = self
            .operation(name)
            .ok_or_else(|| self.unknown_member(name))?;
        operation.call(self, args)
    }

    /// New instance seeded with the property defaults, then initialized
    /// with `args`. An initializer error is returned as is and the
    /// half-built instance is dropped.
    pub fn construct(self: &Rc<Self>, args: &[Value]) -> Result<Rc<Instance>, RuntimeError> {
        let instance = Instance::new(self.clone());
        if let Some(initializer) = &self.initializer {
            initializer.call(&instance, args)?;
        }
        Ok(instance)
    }

    /// New instance seeded with the property defaults. No initializer runs.
    pub fn construct_bare(self: &Rc<Self>) -> Rc<Instance> {
        Instance::new(self.clone())
    }

    pub(crate) fn default_properties(&self) -> MapStore {
        self.properties.all()
    }

    pub(crate) fn unknown_member(&self, member: &str) -> RuntimeError {
        RuntimeError::UnknownMember {
            class: self.display_name(),
            member: member.to_string(),
        }
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("id", &self.id)
            .field("name", &self.display_name())
            .field("parent", &self.parent.as_ref().map(|p| p.display_name()))
            .finish()
    }
}

/// Operation bound to the class it was requested from.
#[derive(Debug)]
pub struct BoundOperation {
    class: Weak<ClassDescriptor>,
    operation: Operation,
}

impl BoundOperation {
    pub fn name(&self) -> &str {
        &self.operation.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        let class = self
            .class
            .upgrade()
            .ok_or_else(|| RuntimeError::DetachedReceiver {
                member: self.operation.name.to_string(),
            })?;
        self.operation.call(&class, args)
    }
}
