//! Object and container runtime.
//!
//! Two halves share the [`value::Value`] model: a single-inheritance class
//! model ([`class`], [`instance`]) and a generic algorithm engine
//! ([`iterate`], [`ordering`], [`builtins`]) that treats sequences,
//! associative containers and length-indexed objects uniformly.
//!
//! # No-Cycle Invariant
//! Heap-backed `Value` variants use `Rc` for cheap sharing, so a cycle of
//! strong references would leak.
//!
//! The invariant is:
//! - A class holds its parent strongly and nothing else; an instance holds
//!   its class strongly.
//! - Every handle that points back at a receiver (bound methods, bound
//!   callbacks, super proxies, bound operations) is a `Weak`.
//! - Containers are copy-on-write and never point at themselves.
//!
//! Property values may still reference other instances. Storing an instance
//! inside its own properties is a caller error and leaks.

pub mod builtin_function;
pub mod builtins;
pub mod callable;
pub mod class;
pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod flow;
pub mod instance;
pub mod iterate;
pub mod key;
pub mod ordering;
pub mod typed_array;
pub mod value;

pub use builtin_function::BuiltinFn;
pub use error::RuntimeError;
pub use value::Value;
