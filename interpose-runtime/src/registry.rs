use crate::error::Error;
use crate::module::{ModuleCallbacks, ModuleRecord, ModuleToken};
use crate::native::NativeMethodRegistry;
use interpose_module::{FunctionPointer, NativeMethod, NativeMethodKey};

/// Bootstrap-phase accumulator for the engine.
///
/// The host's native-method registration path and the module loader both
/// feed this builder; calling [`build`](#method.build) consumes it into an
/// [`Engine`] whose module sequence and callback tables can no longer
/// change. Dispatch is only reachable from `Engine`, which makes
/// "registration finishes before the first hook fires" a property of the
/// types rather than a calling convention.
#[derive(Default)]
pub struct EngineBuilder {
    natives: NativeMethodRegistry,
    modules: Vec<ModuleRecord>,
    next_token: u32,
}

impl EngineBuilder {
    pub fn new() -> Self {
        EngineBuilder {
            natives: NativeMethodRegistry::new(),
            modules: Vec::new(),
            next_token: 0,
        }
    }

    /// Record the pristine native-method group for a class. Recording the
    /// same class again replaces the previous group (last write wins).
    pub fn record_native_methods(&mut self, class_name: &str, methods: Vec<NativeMethod>) {
        tracing::trace!(
            "recording {} native methods for class {}",
            methods.len(),
            class_name
        );
        self.natives.record(class_name, methods);
    }

    /// Append a module to the registry and return its token. Load order is
    /// override-priority order: the returned ordinal positions are what the
    /// resolver later scans.
    pub fn register(
        &mut self,
        name: &str,
        callbacks: ModuleCallbacks,
    ) -> Result<ModuleToken, Error> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("module name must not be empty"));
        }
        if self.modules.iter().any(|m| m.name() == name) {
            return Err(Error::DuplicateModule(name.to_owned()));
        }

        let token = ModuleToken::new(self.next_token);
        self.next_token += 1;
        tracing::debug!(
            "registered module {} ({}) at ordinal {} with api version {}",
            name,
            token,
            self.modules.len(),
            callbacks.api_version()
        );
        self.modules
            .push(ModuleRecord::new(token, name.to_owned(), callbacks));
        Ok(token)
    }

    /// Freeze the registry. After this, only the per-module override stores
    /// remain mutable.
    pub fn build(self) -> Engine {
        Engine {
            natives: self.natives,
            modules: self.modules,
        }
    }
}

/// The frozen engine: ordered module registry, pristine native-method table,
/// override resolution, and lifecycle dispatch (see the `dispatch` module).
pub struct Engine {
    natives: NativeMethodRegistry,
    pub(crate) modules: Vec<ModuleRecord>,
}

impl Engine {
    /// A module's 0-based position in load order. Linear scan; registries
    /// hold tens of modules at most.
    pub fn ordinal_of(&self, token: ModuleToken) -> Option<usize> {
        self.modules.iter().position(|m| m.token() == token)
    }

    pub fn module_at(&self, ordinal: usize) -> Option<&ModuleRecord> {
        self.modules.get(ordinal)
    }

    /// All modules in load order. Restartable: each call yields a fresh
    /// iterator over the same frozen sequence.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter()
    }

    /// The pristine native-method group recorded for a class.
    pub fn original_native_methods(&self, class_name: &str) -> Option<&[NativeMethod]> {
        self.natives.methods(class_name)
    }

    /// One pristine descriptor, filtered by optional name and signature.
    pub fn find_original_native_method(
        &self,
        class_name: &str,
        name: Option<&str>,
        signature: Option<&str>,
    ) -> Option<&NativeMethod> {
        self.natives.find(class_name, name, signature)
    }

    /// Install (or replace) `key -> fn_ptr` in the calling module's own
    /// override store. An unknown token is silently ignored, matching the
    /// host's tolerance for misbehaving modules.
    pub fn publish(&mut self, token: ModuleToken, key: &str, fn_ptr: FunctionPointer) {
        match self.ordinal_of(token) {
            Some(ordinal) => {
                self.modules[ordinal].overrides.insert(key.to_owned(), fn_ptr);
            }
            None => tracing::warn!("publish from unknown {} for key {} ignored", token, key),
        }
    }

    /// Native-method flavor of [`publish`](#method.publish), keyed by the
    /// full `(class, name, signature)` triple.
    pub fn publish_native_method(
        &mut self,
        token: ModuleToken,
        class_name: &str,
        name: &str,
        signature: &str,
        fn_ptr: FunctionPointer,
    ) {
        let key = NativeMethodKey::new(class_name, name, signature);
        match self.ordinal_of(token) {
            Some(ordinal) => {
                self.modules[ordinal].native_overrides.insert(key, fn_ptr);
            }
            None => tracing::warn!("native publish from unknown {} for {} ignored", token, key),
        }
    }

    /// The nearest override for `key` published by a module loaded before
    /// the caller. A module never sees its own overrides, nor those of
    /// modules loaded after it; the generic case has no fallback.
    pub fn resolve(&self, token: ModuleToken, key: &str) -> Option<FunctionPointer> {
        let ordinal = self.ordinal_of(token)?;
        scan_preceding(&self.modules, ordinal, |m| m.overrides.get(key).copied())
    }

    /// Like [`resolve`](#method.resolve) for a native method, but falling
    /// back to the pristine table: unless some preceding module deliberately
    /// replaced this method, the original implementation is always
    /// reachable.
    pub fn resolve_native_method(
        &self,
        token: ModuleToken,
        class_name: &str,
        name: &str,
        signature: &str,
    ) -> Option<FunctionPointer> {
        let ordinal = self.ordinal_of(token)?;
        let key = NativeMethodKey::new(class_name, name, signature);
        scan_preceding(&self.modules, ordinal, |m| {
            m.native_overrides.get(&key).copied()
        })
        .or_else(|| {
            self.natives
                .find(class_name, Some(name), Some(signature))
                .map(|m| m.fn_ptr)
        })
    }
}

/// Nearest-preceding-module scan: ordinals `n-1, n-2, .., 0`, first hit
/// wins. The requesting module's own ordinal is excluded by construction,
/// which rules out forward references and self-references.
fn scan_preceding<T>(
    modules: &[ModuleRecord],
    ordinal: usize,
    mut get: impl FnMut(&ModuleRecord) -> Option<T>,
) -> Option<T> {
    modules[..ordinal].iter().rev().find_map(|m| get(m))
}
