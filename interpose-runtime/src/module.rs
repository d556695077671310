use crate::api::ModuleApi;
use interpose_module::{
    ApiVersion, AppSpecializeArgs, FunctionPointer, NativeMethodKey, ServerSpecializeArgs,
};
use libc::{c_int, uid_t};
use std::collections::HashMap;
use std::fmt;

/// Stable, process-lifetime-unique identity of a registered module.
///
/// Tokens are assigned by the registry as monotonically increasing integers
/// at registration time; they are never derived from the address of any
/// module structure, so they stay meaningful across reloads of the same
/// module image at a different base address.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModuleToken(u32);

impl ModuleToken {
    pub(crate) fn new(raw: u32) -> ModuleToken {
        ModuleToken(raw)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleToken {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "module:{}", self.0)
    }
}

pub type ModuleLoadedHook = fn(&mut ModuleApi<'_>);
pub type SkipUidHook = fn(uid_t) -> bool;
pub type AppPreHook = fn(&mut ModuleApi<'_>, &mut AppSpecializeArgs);
pub type AppPostHook = fn(&mut ModuleApi<'_>, c_int);
pub type ServerPreHook = fn(&mut ModuleApi<'_>, &mut ServerSpecializeArgs);
pub type ServerPostHook = fn(&mut ModuleApi<'_>, c_int);
pub type SpecializePostHook = fn(&mut ModuleApi<'_>);

/// The version-1 callback table. Any slot may be `None`; the dispatcher
/// skips absent slots without comment.
#[derive(Copy, Clone, Debug, Default)]
pub struct CallbacksV1 {
    pub on_module_loaded: Option<ModuleLoadedHook>,
    pub should_skip_uid: Option<SkipUidHook>,
    pub fork_app_pre: Option<AppPreHook>,
    pub fork_app_post: Option<AppPostHook>,
    pub fork_server_pre: Option<ServerPreHook>,
    pub fork_server_post: Option<ServerPostHook>,
    pub specialize_app_pre: Option<AppPreHook>,
    pub specialize_app_post: Option<SpecializePostHook>,
}

/// A module's callbacks, tagged by the API version the module was built
/// against.
///
/// The loader maps a module's raw version integer through
/// [`ApiVersion::try_from_u32`] and constructs the matching variant; a
/// version with no mapping becomes `Unsupported`, which registers (and keeps
/// its position in the override chain) but never has a hook invoked.
/// Dispatch is a pattern match on this enum rather than a cast through an
/// untyped pointer, so adding a future `V2` table is a new variant plus new
/// match arms.
#[derive(Copy, Clone, Debug)]
pub enum ModuleCallbacks {
    V1(CallbacksV1),
    Unsupported { api_version: u32 },
}

impl ModuleCallbacks {
    pub fn api_version(&self) -> u32 {
        match self {
            ModuleCallbacks::V1(_) => ApiVersion::V1.as_u32(),
            ModuleCallbacks::Unsupported { api_version } => *api_version,
        }
    }

    pub(crate) fn v1(&self) -> Option<&CallbacksV1> {
        match self {
            ModuleCallbacks::V1(cbs) => Some(cbs),
            ModuleCallbacks::Unsupported { .. } => None,
        }
    }
}

/// One registered extension module: its identity, its frozen callback table,
/// and the override stores it alone may publish into.
pub struct ModuleRecord {
    token: ModuleToken,
    name: String,
    callbacks: ModuleCallbacks,
    pub(crate) overrides: HashMap<String, FunctionPointer>,
    pub(crate) native_overrides: HashMap<NativeMethodKey, FunctionPointer>,
}

impl ModuleRecord {
    pub(crate) fn new(token: ModuleToken, name: String, callbacks: ModuleCallbacks) -> Self {
        ModuleRecord {
            token,
            name,
            callbacks,
            overrides: HashMap::new(),
            native_overrides: HashMap::new(),
        }
    }

    pub fn token(&self) -> ModuleToken {
        self.token
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> u32 {
        self.callbacks.api_version()
    }

    /// The typed callback table, or `None` when this module was built
    /// against a version this engine cannot dispatch.
    pub(crate) fn callbacks_v1(&self) -> Option<&CallbacksV1> {
        self.callbacks.v1()
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("ModuleRecord")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("api_version", &self.api_version())
            .field("overrides", &self.overrides.len())
            .field("native_overrides", &self.native_overrides.len())
            .finish()
    }
}
