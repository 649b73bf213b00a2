//! Element footprint and small-heap length arithmetic.
//!
//! Containers size their backing arrays so that a single array stays below
//! the small-object boundary. The footprint of an element is resolved at
//! compile time per instantiation, so repeated and concurrent lookups are
//! trivially stable.

use std::mem;

/// Byte boundary below which arrays avoid specialized large-allocation
/// handling.
pub const SMALL_OBJECT_BOUNDARY: usize = 80_000;

/// Largest array length the bucketed pool will retain.
pub const MAX_POOLED_ARRAY_LEN: usize = 1 << 20;

/// Returns the in-memory footprint of one element of `T` in bytes.
///
/// Handle types (`Box<T>`, `Arc<T>`, references) are sized as the handle,
/// not the referent. Zero-sized types are counted as one byte so the
/// derived length bound stays finite.
#[inline]
#[must_use]
pub fn element_size<T>() -> usize {
    mem::size_of::<T>().max(1)
}

/// Maximum array length for `T` that keeps the array below
/// [`SMALL_OBJECT_BOUNDARY`] bytes.
///
/// Never returns 0, even for elements larger than the boundary itself.
#[inline]
#[must_use]
pub fn small_heap_len<T>() -> usize {
    (SMALL_OBJECT_BOUNDARY / element_size::<T>()).max(1)
}

/// Variant of [`small_heap_len`] rounded down to the nearest power of two.
///
/// Available for callers that want power-of-two chunk sizes; no default
/// policy uses it.
#[inline]
#[must_use]
pub fn small_heap_len_pow2<T>() -> usize {
    prev_power_of_two(small_heap_len::<T>())
}

/// Rounds a caller-supplied array length bound to the nearest power of two
/// and clamps it into `[16, MAX_POOLED_ARRAY_LEN]`.
#[must_use]
pub fn clamp_array_len(requested: usize) -> usize {
    let req = requested.clamp(1, MAX_POOLED_ARRAY_LEN);
    let floor = prev_power_of_two(req);
    // Round up when `req` sits past the geometric midpoint of the bracket.
    let rounded = if (req as u128) * (req as u128) >= 2 * (floor as u128) * (floor as u128) {
        floor * 2
    } else {
        floor
    };
    rounded.clamp(16, MAX_POOLED_ARRAY_LEN)
}

pub(crate) fn prev_power_of_two(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}
