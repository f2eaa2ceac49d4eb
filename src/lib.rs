//! jscore - the value, coercion and property-model core of an ECMAScript engine
//!
//! The crate implements what every interpreter instruction eventually calls
//! into: the seven language types, the coercion operations, ordinary object
//! internal methods, the Array, String and Proxy exotic objects, and a
//! built-in library (`Object`, `Array`, `String`, `Symbol`, `Proxy`,
//! `Reflect`, `JSON`, ...) layered on top of them.
//!
//! # Features
//! - Arena-allocated objects addressed by [`ObjectId`]
//! - UTF-16 strings that may hold lone surrogates
//! - Insertion-ordered property tables with canonical key ordering
//! - Proxy traps with invariant checks
//! - Call-depth and prototype-chain limits via [`ContextConfig`]
//!
//! # Example
//! ```
//! use jscore::{Context, Value};
//!
//! let mut ctx = Context::new();
//! let array = ctx.global("Array").unwrap();
//! let arr = ctx.call(&array, &Value::undefined(), &[Value::from(3)]).unwrap();
//! let json = ctx.global("JSON").unwrap();
//! let text = ctx.invoke(&json, "stringify", &[arr]).unwrap();
//! assert_eq!(text, Value::from("[null,null,null]"));
//! ```

// Core modules
pub mod context;
pub mod error;
pub mod heap;
pub mod value;

// Built-in objects
pub mod builtins;

// Runtime support
pub mod runtime;

// Utilities
pub mod util;

// Re-export main types
pub use context::{Context, ContextConfig};
pub use error::{ErrorKind, JsError, JsResult};
pub use runtime::{
    IntegrityLevel, JsString, PreferredType, Property, PropertyDescriptor, PropertyKey,
};
pub use value::{ObjectId, Symbol, Value};
