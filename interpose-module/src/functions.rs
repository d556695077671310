use std::fmt;

/// FunctionPointer serves entirely as a wrapper around a `usize`, but
/// wrapping the pointer declares the intent of this value: it is the address
/// of some callable implementation, installed by a module or captured from
/// the host, and the engine hands it around without ever calling through it
/// itself.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FunctionPointer(usize);

impl FunctionPointer {
    pub fn from_usize(ptr: usize) -> FunctionPointer {
        FunctionPointer(ptr)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for FunctionPointer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{:#x}", self.0)
    }
}

/// The pristine binding of one native method: its name, its type signature
/// string, and the implementation the host registered before any module
/// installed an override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeMethod {
    pub name: String,
    pub signature: String,
    pub fn_ptr: FunctionPointer,
}

impl NativeMethod {
    pub fn new(name: &str, signature: &str, fn_ptr: FunctionPointer) -> Self {
        NativeMethod {
            name: name.to_owned(),
            signature: signature.to_owned(),
            fn_ptr,
        }
    }

    /// Whether this descriptor matches a pair of optional filters. An absent
    /// filter matches any value.
    pub fn matches(&self, name: Option<&str>, signature: Option<&str>) -> bool {
        name.map_or(true, |n| self.name == n) && signature.map_or(true, |s| self.signature == s)
    }
}

/// Composite key for native-method overrides.
///
/// Generic overrides are keyed by an arbitrary string chosen by the
/// publishing module; native-method overrides are keyed by the full
/// `(class, name, signature)` triple so that two methods of the same name
/// but different signatures never shadow one another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NativeMethodKey {
    pub class_name: String,
    pub name: String,
    pub signature: String,
}

impl NativeMethodKey {
    pub fn new(class_name: &str, name: &str, signature: &str) -> Self {
        NativeMethodKey {
            class_name: class_name.to_owned(),
            name: name.to_owned(),
            signature: signature.to_owned(),
        }
    }
}

impl fmt::Display for NativeMethodKey {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}::{}{}", self.class_name, self.name, self.signature)
    }
}
