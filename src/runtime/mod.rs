//! Runtime support
//!
//! This module contains the object model of the runtime:
//! - Object representation and the property table
//! - String and symbol handling
//! - Coercions, equality and the abstract operations built on them
//! - Internal method dispatch for ordinary, Array, String and Proxy objects
//! - Function call mechanics

pub mod array;
pub mod conversion;
mod dispatch;
pub mod equality;
pub mod function;
pub mod object;
pub mod operations;
pub mod ordinary;
pub mod property;
mod proxy;
pub mod string;
pub mod symbol;

pub use array::MAX_ARRAY_LENGTH;
pub use conversion::PreferredType;
pub use function::{Callable, ConstructorKind, FunctionData, HostClosure, NativeCtor, NativeFn};
pub use object::{JsObject, ObjectKind, ProxyData};
pub use operations::IntegrityLevel;
pub use property::{Property, PropertyDescriptor, PropertyKey, PropertyTable, Slot};
pub use string::JsString;
pub use symbol::SymbolRegistry;
