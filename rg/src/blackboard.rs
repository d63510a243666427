//! Type-keyed scratch storage passes use to hand small bits of data to later
//! passes without threading them through a named resource: a type-erased map,
//! the same shape as a `std::type_index`-keyed blackboard holding arbitrary
//! POD payloads.

use std::any::{Any, TypeId};
use std::collections::HashMap;

#[derive(Default)]
pub struct Blackboard {
    entries: HashMap<TypeId, Box<dyn Any>>,
}

impl Blackboard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing any previous value of the same type.
    pub fn add<T: 'static>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Panics if `T` was never added. Use `try_get` when absence is a valid
    /// outcome rather than a setup bug.
    pub fn get<T: 'static>(&self) -> &T {
        self.try_get()
            .unwrap_or_else(|| panic!("blackboard has no entry of type {}", std::any::type_name::<T>()))
    }

    pub fn try_get<T: 'static>(&self) -> Option<&T> {
        self.entries.get(&TypeId::of::<T>()).and_then(|b| b.downcast_ref::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct CameraMatrices {
        view_proj: [f32; 16],
    }

    struct NullDescriptor(u32);

    #[test]
    fn try_get_is_none_before_anything_is_added() {
        let blackboard = Blackboard::new();
        assert!(blackboard.try_get::<CameraMatrices>().is_none());
    }

    #[test]
    fn add_then_get_round_trips_by_type() {
        let mut blackboard = Blackboard::new();
        blackboard.add(CameraMatrices { view_proj: [1.0; 16] });
        blackboard.add(NullDescriptor(7));

        assert_eq!(blackboard.get::<CameraMatrices>().view_proj, [1.0; 16]);
        assert_eq!(blackboard.get::<NullDescriptor>().0, 7);
    }

    #[test]
    fn adding_again_replaces_the_previous_value_of_that_type() {
        let mut blackboard = Blackboard::new();
        blackboard.add(NullDescriptor(1));
        blackboard.add(NullDescriptor(2));
        assert_eq!(blackboard.get::<NullDescriptor>().0, 2);
    }

    #[test]
    #[should_panic(expected = "blackboard has no entry")]
    fn get_panics_when_the_type_was_never_added() {
        let blackboard = Blackboard::new();
        blackboard.get::<CameraMatrices>();
    }
}
