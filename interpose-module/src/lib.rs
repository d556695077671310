//! Common types for the interpose engine and its extension modules.
//!
//! These types are shared between the engine in `interpose-runtime` and the
//! extension modules it dispatches into: the raw function-pointer currency of
//! the override stores, the pristine native-method descriptors captured at
//! host bootstrap, the callback API version tag, and the mutable argument
//! blocks threaded through the process-specialization hooks.

#![deny(bare_trait_objects)]

mod args;
mod functions;
mod version;

pub use crate::args::{
    AppSpecializeArgs, MountMode, Rlimit, RuntimeFlags, ServerSpecializeArgs,
};
pub use crate::functions::{FunctionPointer, NativeMethod, NativeMethodKey};
pub use crate::version::ApiVersion;
