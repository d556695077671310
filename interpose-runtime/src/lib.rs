//! `interpose-runtime` is the module override chain and hook-dispatch engine
//! for a process-spawning host. It records the host's pristine native-method
//! bindings, holds the ordered registry of extension modules, resolves
//! "what came before me" override queries on their behalf, and broadcasts
//! the process-specialization lifecycle hooks through every module in load
//! order.
//!
//! The engine is built in two phases: an [`EngineBuilder`](struct.EngineBuilder.html)
//! accepts native-method recordings and module registrations during host
//! bootstrap, and [`build`](struct.EngineBuilder.html#method.build) freezes
//! them into an [`Engine`](struct.Engine.html) whose registry can no longer
//! grow. Only the per-module override stores stay writable after that point,
//! and only through the publishing module's own
//! [`ModuleApi`](struct.ModuleApi.html) handle.

#![deny(bare_trait_objects)]

pub mod api;
pub mod dispatch;
pub mod error;
pub mod module;
pub mod native;
pub mod registry;

pub use crate::api::ModuleApi;
pub use crate::error::Error;
pub use crate::module::{
    AppPostHook, AppPreHook, CallbacksV1, ModuleCallbacks, ModuleLoadedHook, ModuleRecord,
    ModuleToken, ServerPostHook, ServerPreHook, SkipUidHook, SpecializePostHook,
};
pub use crate::native::NativeMethodRegistry;
pub use crate::registry::{Engine, EngineBuilder};
