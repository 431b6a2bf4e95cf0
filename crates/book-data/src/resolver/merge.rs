//! Gap-fill merging.

/// Move `candidate` into `slot` when the slot is empty.
///
/// A present value is never replaced, even by a different candidate. Returns
/// whether the slot was filled.
pub fn fill_if_absent<T>(slot: &mut Option<T>, candidate: Option<T>) -> bool {
    if slot.is_some() {
        return false;
    }
    match candidate {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}
