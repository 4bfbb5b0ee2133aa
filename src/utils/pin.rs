use core::pin::Pin;

/// Pinned access to one element of a pinned slice.
pub(crate) fn get_pin_mut<T>(slice: Pin<&mut [T]>, index: usize) -> Option<Pin<&mut T>> {
    // SAFETY: the element is never moved out of the slice, and it stays
    // pinned for as long as the slice does.
    unsafe {
        slice
            .get_unchecked_mut()
            .get_mut(index)
            .map(|elem| Pin::new_unchecked(elem))
    }
}

/// Iterate over pinned references to every element of a pinned slice.
pub(crate) fn iter_pin_mut<T>(slice: Pin<&mut [T]>) -> impl Iterator<Item = Pin<&mut T>> {
    // SAFETY: same projection as `get_pin_mut`, applied to each element.
    unsafe { slice.get_unchecked_mut() }
        .iter_mut()
        .map(|elem| unsafe { Pin::new_unchecked(elem) })
}
