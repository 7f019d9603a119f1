//! Node identity keys.
//!
//! The queue never holds nodes directly. It holds [`Key`]s that resolve to
//! nodes through a [`NodeStore`](crate::NodeStore). Unused heap slots are
//! blanked with the key's `NONE` sentinel.

/// A copyable node identity with a sentinel "no node" value.
///
/// Implemented for the unsigned integer types with `NONE = MAX`. Custom key
/// types (e.g. strongly-typed entity ids) implement it the same way.
///
/// # Example
///
/// ```
/// use slotheap::Key;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// struct EntityId(u32);
///
/// impl Key for EntityId {
///     const NONE: Self = EntityId(u32::MAX);
/// }
///
/// assert!(EntityId::NONE.is_none());
/// assert!(EntityId(7).is_some());
/// ```
pub trait Key: Copy + Eq {
    /// Sentinel value representing "no node".
    ///
    /// Stores must never hand out this value as a real key.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);
