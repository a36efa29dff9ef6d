//! Opaque resource handles.
//!
//! A handle is a `u32` id issued by a backend. `0` is reserved as the null
//! handle; `is_valid()` is false only for null.

macro_rules! gfx_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const NULL: $name = $name(0);

            #[inline]
            pub const fn from_raw(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gfx_handle!(
    /// Compiled shader program.
    ProgramHandle
);
gfx_handle!(
    /// Uploaded vertex + index buffers.
    MeshHandle
);
gfx_handle!(
    /// Uploaded texture with its sampler binding.
    TextureHandle
);
