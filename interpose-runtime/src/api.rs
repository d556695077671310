use crate::module::ModuleToken;
use crate::registry::Engine;
use interpose_module::{FunctionPointer, NativeMethod};

/// The engine surface handed to a module's hooks while they run.
///
/// The handle borrows the engine and carries the invoked module's own token,
/// so every publish lands in that module's store and every resolve scans
/// from that module's ordinal. A module cannot forge a handle for another
/// module's position, which is what keeps the override chain well-ordered.
pub struct ModuleApi<'a> {
    engine: &'a mut Engine,
    token: ModuleToken,
}

impl<'a> ModuleApi<'a> {
    pub(crate) fn new(engine: &'a mut Engine, token: ModuleToken) -> Self {
        ModuleApi { engine, token }
    }

    pub fn token(&self) -> ModuleToken {
        self.token
    }

    /// Install (or replace) an implementation under `key`, discoverable by
    /// modules loaded after this one.
    pub fn publish(&mut self, key: &str, fn_ptr: FunctionPointer) {
        self.engine.publish(self.token, key, fn_ptr);
    }

    /// Install a replacement for a native method, keyed by the full
    /// `(class, name, signature)` triple.
    pub fn publish_native_method(
        &mut self,
        class_name: &str,
        name: &str,
        signature: &str,
        fn_ptr: FunctionPointer,
    ) {
        self.engine
            .publish_native_method(self.token, class_name, name, signature, fn_ptr);
    }

    /// What came before me: the nearest preceding module's override for
    /// `key`, or `None` when this module is the first (or only)
    /// implementation.
    pub fn resolve(&self, key: &str) -> Option<FunctionPointer> {
        self.engine.resolve(self.token, key)
    }

    /// What came before me for a native method, falling back to the
    /// pristine pre-interception binding.
    pub fn resolve_native_method(
        &self,
        class_name: &str,
        name: &str,
        signature: &str,
    ) -> Option<FunctionPointer> {
        self.engine
            .resolve_native_method(self.token, class_name, name, signature)
    }

    /// The complete pristine descriptor group for a class, for modules that
    /// re-publish the original set before installing replacements.
    pub fn original_native_methods(&self, class_name: &str) -> Option<&[NativeMethod]> {
        self.engine.original_native_methods(class_name)
    }
}
