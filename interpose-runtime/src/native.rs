use interpose_module::NativeMethod;
use std::collections::HashMap;

/// The pristine native-method table.
///
/// Populated once per class during host bootstrap, at the moment the host
/// registers its native functions and before any module installs a
/// replacement. The override mechanism never writes here, so a lookup always
/// answers "what did this method point to before interception."
///
/// Recording the same class twice replaces the previous group wholesale;
/// hosts may re-register a class on retry, and the latest registration is
/// the one that reflects reality.
#[derive(Debug, Default)]
pub struct NativeMethodRegistry {
    classes: HashMap<String, Vec<NativeMethod>>,
}

impl NativeMethodRegistry {
    pub fn new() -> Self {
        NativeMethodRegistry {
            classes: HashMap::new(),
        }
    }

    pub(crate) fn record(&mut self, class_name: &str, methods: Vec<NativeMethod>) {
        if self.classes.insert(class_name.to_owned(), methods).is_some() {
            tracing::debug!("replaced native method group for class {}", class_name);
        }
    }

    /// The entire pristine descriptor group for a class, in registration
    /// order. Used by the module-loading path to re-publish the complete
    /// original set before installing replacements.
    pub fn methods(&self, class_name: &str) -> Option<&[NativeMethod]> {
        self.classes.get(class_name).map(|v| v.as_slice())
    }

    /// The first descriptor in a class's group whose non-absent filters all
    /// match. An absent filter matches any value.
    pub fn find(
        &self,
        class_name: &str,
        name: Option<&str>,
        signature: Option<&str>,
    ) -> Option<&NativeMethod> {
        self.classes
            .get(class_name)?
            .iter()
            .find(|m| m.matches(name, signature))
    }
}
