use bitflags::bitflags;
use libc::{c_int, gid_t, uid_t};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::os::unix::io::RawFd;

bitflags! {
    /// Debug and runtime behavior flags requested for the child process.
    #[derive(Default)]
    pub struct RuntimeFlags: u32 {
        const DEBUG_ENABLE_JDWP            = 1;
        const DEBUG_ENABLE_CHECKJNI        = 1 << 1;
        const DEBUG_ENABLE_ASSERT          = 1 << 2;
        const DEBUG_ENABLE_SAFEMODE        = 1 << 3;
        const DEBUG_ALWAYS_JIT             = 1 << 4;
        const DEBUG_NATIVE_DEBUGGABLE      = 1 << 5;
        const DEBUG_JAVA_DEBUGGABLE        = 1 << 6;
        const DISABLE_VERIFIER             = 1 << 9;
        const PROFILE_SYSTEM_SERVER        = 1 << 14;
        const PROFILE_FROM_SHELL           = 1 << 15;
    }
}

/// How external storage is mounted into the child's mount namespace.
#[repr(i32)]
#[derive(Copy, Clone, Debug, FromPrimitive, PartialEq, Eq)]
pub enum MountMode {
    None = 0,
    Default = 1,
    Read = 2,
    Write = 3,
}

impl MountMode {
    pub fn try_from_i32(v: i32) -> Option<MountMode> {
        Self::from_i32(v)
    }
}

impl Default for MountMode {
    fn default() -> Self {
        MountMode::None
    }
}

/// One resource limit to apply to the child before it drops privileges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rlimit {
    pub resource: c_int,
    pub cur: u64,
    pub max: u64,
}

/// The mutable argument block for application-process specialization.
///
/// The same block is passed by reference through every module's Pre hook in
/// load order, so each module observes the mutations applied by the modules
/// loaded before it. After the last hook returns, the host performs the
/// actual fork/specialize step with whatever the block then contains.
#[derive(Clone, Debug, Default)]
pub struct AppSpecializeArgs {
    pub uid: uid_t,
    pub gid: gid_t,
    pub gids: Vec<gid_t>,
    pub runtime_flags: RuntimeFlags,
    pub rlimits: Vec<Rlimit>,
    pub mount_external: MountMode,
    /// SELinux context string for the child, when the host supplies one.
    pub se_info: Option<String>,
    pub nice_name: String,
    pub fds_to_close: Vec<RawFd>,
    pub fds_to_ignore: Vec<RawFd>,
    pub is_child_zygote: bool,
    pub instruction_set: Option<String>,
    pub app_data_dir: Option<String>,
    pub is_top_app: bool,
}

/// The mutable argument block for system-server specialization.
#[derive(Clone, Debug, Default)]
pub struct ServerSpecializeArgs {
    pub uid: uid_t,
    pub gid: gid_t,
    pub gids: Vec<gid_t>,
    pub runtime_flags: RuntimeFlags,
    pub rlimits: Vec<Rlimit>,
    pub permitted_capabilities: u64,
    pub effective_capabilities: u64,
}
