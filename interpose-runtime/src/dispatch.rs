//! Lifecycle hook dispatch.
//!
//! Every dispatch is a plain sequential broadcast in registry load order,
//! for Pre and Post phases alike. The Pre phases thread one mutable
//! argument block through every hook, so each module observes the mutations
//! of the modules loaded before it. Hook bodies are module code; the engine
//! applies no catch, retry, or timeout around them, and a faulting hook
//! takes the host process down with it.

use crate::api::ModuleApi;
use crate::module::{CallbacksV1, ModuleToken};
use crate::registry::Engine;
use interpose_module::{AppSpecializeArgs, ServerSpecializeArgs};
use libc::{c_int, uid_t};

impl Engine {
    /// The typed callback table and token of the module at `idx`, or `None`
    /// for a module built against a version this engine cannot dispatch.
    fn callbacks_at(&self, idx: usize) -> Option<(CallbacksV1, ModuleToken)> {
        let module = &self.modules[idx];
        match module.callbacks_v1() {
            Some(cbs) => Some((*cbs, module.token())),
            None => {
                tracing::trace!(
                    "skipping module {} with unsupported api version {}",
                    module.name(),
                    module.api_version()
                );
                None
            }
        }
    }

    /// Broadcast "all modules are loaded" to every module, in load order.
    /// This is where modules typically publish their overrides and resolve
    /// what the modules before them published.
    pub fn dispatch_module_loaded(&mut self) {
        tracing::debug!("dispatching module-loaded to {} modules", self.modules.len());
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.on_module_loaded {
                    hook(&mut ModuleApi::new(self, token));
                }
            }
        }
    }

    /// Whether any module wants specialization bypassed entirely for `uid`.
    /// Logical OR across modules, short-circuiting on the first `true`;
    /// modules without the slot (or with an unsupported version) answer
    /// `false`.
    pub fn should_skip_uid(&self, uid: uid_t) -> bool {
        for idx in 0..self.modules.len() {
            let hook = match self.callbacks_at(idx) {
                Some((cbs, _)) => cbs.should_skip_uid,
                None => continue,
            };
            if let Some(hook) = hook {
                if hook(uid) {
                    tracing::debug!(
                        "module {} skips specialization for uid {}",
                        self.modules[idx].name(),
                        uid
                    );
                    return true;
                }
            }
        }
        false
    }

    /// Pre phase of the fork-and-specialize path for application processes.
    /// Runs before the host performs the actual fork.
    pub fn fork_app_pre(&mut self, args: &mut AppSpecializeArgs) {
        tracing::debug!("fork_app_pre for {}", args.nice_name);
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.fork_app_pre {
                    hook(&mut ModuleApi::new(self, token), args);
                }
            }
        }
    }

    /// Post phase of the fork-and-specialize path, after the fork has
    /// happened outside this engine. `res` is the host's outcome code.
    pub fn fork_app_post(&mut self, res: c_int) {
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.fork_app_post {
                    hook(&mut ModuleApi::new(self, token), res);
                }
            }
        }
    }

    /// Pre phase of the system-server spawn path.
    pub fn fork_server_pre(&mut self, args: &mut ServerSpecializeArgs) {
        tracing::debug!("fork_server_pre for uid {}", args.uid);
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.fork_server_pre {
                    hook(&mut ModuleApi::new(self, token), args);
                }
            }
        }
    }

    /// Post phase of the system-server spawn path.
    pub fn fork_server_post(&mut self, res: c_int) {
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.fork_server_post {
                    hook(&mut ModuleApi::new(self, token), res);
                }
            }
        }
    }

    /// Pre phase of in-place application specialization (no fork).
    pub fn specialize_app_pre(&mut self, args: &mut AppSpecializeArgs) {
        tracing::debug!("specialize_app_pre for {}", args.nice_name);
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.specialize_app_pre {
                    hook(&mut ModuleApi::new(self, token), args);
                }
            }
        }
    }

    /// Post phase of in-place application specialization.
    pub fn specialize_app_post(&mut self) {
        for idx in 0..self.modules.len() {
            if let Some((cbs, token)) = self.callbacks_at(idx) {
                if let Some(hook) = cbs.specialize_app_post {
                    hook(&mut ModuleApi::new(self, token));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::ModuleApi;
    use crate::module::{AppPostHook, AppPreHook, CallbacksV1, ModuleCallbacks};
    use crate::registry::EngineBuilder;
    use interpose_module::{AppSpecializeArgs, RuntimeFlags};
    use lazy_static::lazy_static;
    use libc::c_int;
    use std::sync::Mutex;

    // Each pre hook appends its own gid and asserts it saw everything the
    // modules before it appended, so a passing run proves both the order
    // and that all hooks share one argument block.
    fn pre_a(_api: &mut ModuleApi<'_>, args: &mut AppSpecializeArgs) {
        assert!(args.gids.is_empty());
        args.gids.push(1001);
        args.runtime_flags |= RuntimeFlags::DEBUG_ENABLE_JDWP;
    }

    fn pre_b(_api: &mut ModuleApi<'_>, args: &mut AppSpecializeArgs) {
        assert_eq!(args.gids, vec![1001]);
        assert!(args.runtime_flags.contains(RuntimeFlags::DEBUG_ENABLE_JDWP));
        args.gids.push(1002);
    }

    fn pre_c(_api: &mut ModuleApi<'_>, args: &mut AppSpecializeArgs) {
        assert_eq!(args.gids, vec![1001, 1002]);
        args.gids.push(1003);
        args.nice_name = "com.example.renamed".to_owned();
    }

    #[test]
    fn pre_hooks_run_in_load_order_over_one_argument_block() {
        let mut builder = EngineBuilder::new();
        let hooks: &[(&str, AppPreHook)] = &[("a", pre_a), ("b", pre_b), ("c", pre_c)];
        for (name, hook) in hooks {
            builder
                .register(
                    name,
                    ModuleCallbacks::V1(CallbacksV1 {
                        fork_app_pre: Some(*hook),
                        ..Default::default()
                    }),
                )
                .unwrap();
        }
        let mut engine = builder.build();

        let mut args = AppSpecializeArgs {
            uid: 10001,
            nice_name: "com.example.app".to_owned(),
            ..Default::default()
        };
        engine.fork_app_pre(&mut args);

        assert_eq!(args.gids, vec![1001, 1002, 1003]);
        assert_eq!(args.nice_name, "com.example.renamed");
    }

    lazy_static! {
        static ref POST_LOG: Mutex<Vec<(&'static str, c_int)>> = Mutex::new(Vec::new());
    }

    fn post_first(_api: &mut ModuleApi<'_>, res: c_int) {
        POST_LOG.lock().unwrap().push(("first", res));
    }

    fn post_second(_api: &mut ModuleApi<'_>, res: c_int) {
        POST_LOG.lock().unwrap().push(("second", res));
    }

    #[test]
    fn post_hooks_run_in_load_order_with_the_outcome() {
        let mut builder = EngineBuilder::new();
        let hooks: &[(&str, AppPostHook)] = &[("first", post_first), ("second", post_second)];
        for (name, hook) in hooks {
            builder
                .register(
                    name,
                    ModuleCallbacks::V1(CallbacksV1 {
                        fork_app_post: Some(*hook),
                        ..Default::default()
                    }),
                )
                .unwrap();
        }
        let mut engine = builder.build();

        engine.fork_app_post(12345);
        let log = POST_LOG.lock().unwrap();
        assert_eq!(*log, vec![("first", 12345), ("second", 12345)]);
    }

    fn skip_10000(uid: libc::uid_t) -> bool {
        uid == 10000
    }

    fn skip_none(_uid: libc::uid_t) -> bool {
        false
    }

    fn skip_panics(_uid: libc::uid_t) -> bool {
        panic!("short-circuit must stop before this module");
    }

    #[test]
    fn skip_uid_is_a_short_circuit_or() {
        let mut builder = EngineBuilder::new();
        builder
            .register(
                "quiet",
                ModuleCallbacks::V1(CallbacksV1 {
                    should_skip_uid: Some(skip_none),
                    ..Default::default()
                }),
            )
            .unwrap();
        builder
            .register(
                "picky",
                ModuleCallbacks::V1(CallbacksV1 {
                    should_skip_uid: Some(skip_10000),
                    ..Default::default()
                }),
            )
            .unwrap();
        builder
            .register(
                "late",
                ModuleCallbacks::V1(CallbacksV1 {
                    should_skip_uid: Some(skip_panics),
                    ..Default::default()
                }),
            )
            .unwrap();
        // a module with no slot at all answers false
        builder
            .register("silent", ModuleCallbacks::V1(Default::default()))
            .unwrap();
        let engine = builder.build();

        assert!(engine.should_skip_uid(10000));
    }

    #[test]
    fn no_module_skipping_means_false() {
        let mut builder = EngineBuilder::new();
        builder
            .register(
                "quiet",
                ModuleCallbacks::V1(CallbacksV1 {
                    should_skip_uid: Some(skip_none),
                    ..Default::default()
                }),
            )
            .unwrap();
        builder
            .register("silent", ModuleCallbacks::V1(Default::default()))
            .unwrap();
        let engine = builder.build();

        assert!(!engine.should_skip_uid(10000));
        assert!(!engine.should_skip_uid(0));
    }

    fn pre_counts(_api: &mut ModuleApi<'_>, args: &mut AppSpecializeArgs) {
        args.gids.push(42);
    }

    #[test]
    fn unsupported_api_version_is_skipped_without_error() {
        let mut builder = EngineBuilder::new();
        builder
            .register("future", ModuleCallbacks::Unsupported { api_version: 26 })
            .unwrap();
        builder
            .register(
                "present",
                ModuleCallbacks::V1(CallbacksV1 {
                    fork_app_pre: Some(pre_counts),
                    ..Default::default()
                }),
            )
            .unwrap();
        let mut engine = builder.build();

        // the unsupported module still occupies ordinal 0
        assert_eq!(engine.module_at(0).unwrap().api_version(), 26);

        let mut args = AppSpecializeArgs::default();
        engine.fork_app_pre(&mut args);
        engine.fork_app_post(0);
        assert!(!engine.should_skip_uid(10000));
        assert_eq!(args.gids, vec![42]);
    }
}
