use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// The callback-signature sets this engine knows how to dispatch.
///
/// A module declares the version it was built against; the loader maps that
/// raw integer through `try_from_u32` to decide which typed callback table
/// to construct. Versions with no mapping are still registered, but none of
/// their hooks are ever invoked.
#[repr(u32)]
#[derive(Copy, Clone, Debug, FromPrimitive, PartialEq, Eq)]
pub enum ApiVersion {
    V1 = 1,
}

impl ApiVersion {
    pub fn try_from_u32(v: u32) -> Option<ApiVersion> {
        Self::from_u32(v)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}
