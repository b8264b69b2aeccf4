//! # Macros
//!
//! ## intrusive_adapter!
//!
//! Declares a zero-sized adapter type implementing
//! [`Adapter`](crate::Adapter) for one `RbNode` field of a payload
//! type.
//!
//! ### Usage
//!
//! ```
//! use rblink::{intrusive_adapter, RbNode};
//!
//! pub struct Timer {
//!     deadline: u64,
//!     link: RbNode,
//! }
//!
//! intrusive_adapter!(pub TimerAdapter = Timer { link });
//! ```
//!
//! The expansion is a unit struct plus an `unsafe impl` whose
//! `LINK_OFFSET` comes from `core::mem::offset_of!`, so the macro
//! itself contains no unsafe arithmetic.

/// Declares an adapter type for one embedded [`RbNode`](crate::RbNode)
/// field.
#[macro_export]
macro_rules! intrusive_adapter {
    ($vis:vis $name:ident = $container:ty { $field:ident }) => {
        $vis struct $name;

        unsafe impl $crate::Adapter for $name {
            type Container = $container;
            const LINK_OFFSET: usize = ::core::mem::offset_of!($container, $field);
        }
    };
}
