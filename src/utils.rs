pub mod scopeguard {
    use std::mem::ManuallyDrop;

    /// Runs the closure on drop, whatever the exit path. Used to restore
    /// the terminal even when the frame loop bails with an error.
    pub struct Guard<T, F: FnOnce(T)> {
        value: ManuallyDrop<T>,
        on_drop: ManuallyDrop<F>,
    }

    pub fn guard<T, F: FnOnce(T)>(value: T, on_drop: F) -> Guard<T, F> {
        Guard {
            value: ManuallyDrop::new(value),
            on_drop: ManuallyDrop::new(on_drop),
        }
    }

    impl<T, F: FnOnce(T)> Drop for Guard<T, F> {
        fn drop(&mut self) {
            // each field is taken exactly once, here
            let value = unsafe { ManuallyDrop::take(&mut self.value) };
            let on_drop = unsafe { ManuallyDrop::take(&mut self.on_drop) };
            on_drop(value);
        }
    }
}
