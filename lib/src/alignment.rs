/// Align `value` down to the nearest multiple of `alignment`.
/// If `alignment` is zero, the input is returned unchanged.
#[inline(always)]
pub const fn align_down_usize(value: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return value;
    }
    value & !(alignment - 1)
}

/// Align `value` up to the nearest multiple of `alignment`, or `None` if the
/// result would not fit in a `usize`. A zero alignment returns the input.
#[inline(always)]
pub const fn align_up_usize(value: usize, alignment: usize) -> Option<usize> {
    if alignment == 0 {
        return Some(value);
    }
    match value.checked_add(alignment - 1) {
        Some(adjusted) => Some(adjusted & !(alignment - 1)),
        None => None,
    }
}
