use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    config::RuntimeConfig,
    runtime::{
        class::{ClassDeclaration, ClassDescriptor, ClassRef, declare_class},
        diagnostics,
        value::Value,
    },
};

/// Name to class lookup for declared classes.
///
/// Anonymous classes are declared but not registered. Registering a name a
/// second time replaces the earlier class; classes already holding the old
/// one as parent keep it.
#[derive(Debug, Default)]
pub struct Registry {
    config: RuntimeConfig,
    classes: IndexMap<Rc<str>, ClassRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            classes: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn declare(&mut self, decl: ClassDeclaration) -> ClassRef {
        let class = declare_class(decl);
        self.register(&class);
        class
    }

    /// Registers an already declared class under its name.
    pub fn register(&mut self, class: &ClassRef) {
        let Some(name) = class.get_name() else {
            return;
        };
        let previous = self.classes.insert(name.into(), class.clone());
        if let Some(previous) = previous {
            if self.config.warn_on_redeclare && !Rc::ptr_eq(&previous, class) {
                diagnostics::warn(format!(
                    "class {} redeclared: #{} replaces #{}",
                    name,
                    class.id(),
                    previous.id()
                ));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.classes.get(name).cloned()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassRef> {
        self.classes.values()
    }

    /// Every registered class other than `class` that descends from it.
    pub fn children_of(&self, class: &ClassDescriptor) -> Vec<ClassRef> {
        self.classes
            .values()
            .filter(|candidate| candidate.id() != class.id() && candidate.is_subclass_of(class))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Whether `value` is an instance, and of `class` (or a subclass) when one
/// is given.
pub fn is_instance(value: &Value, class: Option<&ClassDescriptor>) -> bool {
    match (value.as_instance(), class) {
        (Some(instance), Some(class)) => instance.get_class().is_subclass_of(class),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Class of an instance, or the class itself for a class value.
pub fn get_class_of(value: &Value) -> Option<ClassRef> {
    match value {
        Value::Instance(instance) => Some(instance.get_class().clone()),
        Value::Class(class) => Some(class.clone()),
        _ => None,
    }
}
