//! Scoped views over managed strings and arrays
//!
//! A managed runtime hands out native views of its strings and primitive
//! arrays with a get/release pair. [`Pinned`] holds exactly one such view:
//! it is acquired when the guard is built and released exactly once when the
//! guard is dropped, whichever way the enclosing scope is left.
//!
//! ```ignore
//! let xs = Pinned::acquire(IntArraySource::new(&mut env, &x_array), ReleaseMode::CopyBack)?;
//! let ys = Pinned::acquire(IntArraySource::new(&mut env, &y_array), ReleaseMode::CopyBack)?;
//! surface.touch_down(&TouchBatch::from_slices(count, &xs, &ys, &ids));
//! // both views released here, in reverse order
//! ```

use std::ops::{Deref, DerefMut};

/// What happens to a view's contents when it is released
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// Copy native modifications back to the managed array, then free the view
    #[default]
    CopyBack,
    /// Free the view and discard native modifications
    Abort,
}

/// A source of native views over one managed object
///
/// Implemented once per managed type (string, int array, long array, ...).
pub trait ViewSource {
    /// Native view handed out by `acquire`
    type View;
    /// Error raised when the runtime refuses to hand out a view
    type Error;

    /// Acquire a native view of the managed object
    fn acquire(&mut self) -> Result<Self::View, Self::Error>;

    /// Release a view previously returned by `acquire`
    fn release(&mut self, view: Self::View, mode: ReleaseMode);
}

/// Scoped guard holding exactly one acquired view
pub struct Pinned<S: ViewSource> {
    source: S,
    view: Option<S::View>,
    mode: ReleaseMode,
}

impl<S: ViewSource> Pinned<S> {
    /// Acquire a view from `source`
    ///
    /// If the acquire fails nothing is held and nothing will be released.
    pub fn acquire(mut source: S, mode: ReleaseMode) -> Result<Self, S::Error> {
        let view = source.acquire()?;
        Ok(Self {
            source,
            view: Some(view),
            mode,
        })
    }

    /// Change how the view is released
    pub fn set_release_mode(&mut self, mode: ReleaseMode) {
        self.mode = mode;
    }
}

impl<S: ViewSource> Deref for Pinned<S> {
    type Target = S::View;

    fn deref(&self) -> &S::View {
        // Only `drop` takes the view out
        match &self.view {
            Some(view) => view,
            None => unreachable!("view released before guard was dropped"),
        }
    }
}

impl<S: ViewSource> DerefMut for Pinned<S> {
    fn deref_mut(&mut self) -> &mut S::View {
        match &mut self.view {
            Some(view) => view,
            None => unreachable!("view released before guard was dropped"),
        }
    }
}

impl<S: ViewSource> Drop for Pinned<S> {
    fn drop(&mut self) {
        if let Some(view) = self.view.take() {
            self.source.release(view, self.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        acquired: usize,
        released: Vec<ReleaseMode>,
        committed: Vec<i32>,
    }

    struct FakeArray {
        data: Option<Vec<i32>>,
        counts: Rc<RefCell<Counts>>,
    }

    impl ViewSource for FakeArray {
        type View = Vec<i32>;
        type Error = &'static str;

        fn acquire(&mut self) -> Result<Vec<i32>, &'static str> {
            let data = self.data.clone().ok_or("null array")?;
            self.counts.borrow_mut().acquired += 1;
            Ok(data)
        }

        fn release(&mut self, view: Vec<i32>, mode: ReleaseMode) {
            let mut counts = self.counts.borrow_mut();
            counts.released.push(mode);
            if mode == ReleaseMode::CopyBack {
                counts.committed = view;
            }
        }
    }

    fn fake(data: Option<Vec<i32>>) -> (FakeArray, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        (
            FakeArray {
                data,
                counts: counts.clone(),
            },
            counts,
        )
    }

    fn sum_or_bail(source: FakeArray, bail_early: bool) -> Option<i32> {
        let view = Pinned::acquire(source, ReleaseMode::CopyBack).ok()?;
        if bail_early {
            return None;
        }
        Some(view.iter().sum())
    }

    #[test]
    fn test_release_once_on_normal_exit() {
        let (source, counts) = fake(Some(vec![1, 2, 3]));
        assert_eq!(sum_or_bail(source, false), Some(6));
        let counts = counts.borrow();
        assert_eq!(counts.acquired, 1);
        assert_eq!(counts.released, vec![ReleaseMode::CopyBack]);
    }

    #[test]
    fn test_release_once_on_early_return() {
        let (source, counts) = fake(Some(vec![1, 2, 3]));
        assert_eq!(sum_or_bail(source, true), None);
        let counts = counts.borrow();
        assert_eq!(counts.acquired, 1);
        assert_eq!(counts.released.len(), 1);
    }

    #[test]
    fn test_failed_acquire_releases_nothing() {
        let (source, counts) = fake(None);
        assert_eq!(sum_or_bail(source, false), None);
        let counts = counts.borrow();
        assert_eq!(counts.acquired, 0);
        assert!(counts.released.is_empty());
    }

    #[test]
    fn test_empty_array_still_paired() {
        let (source, counts) = fake(Some(Vec::new()));
        assert_eq!(sum_or_bail(source, false), Some(0));
        let counts = counts.borrow();
        assert_eq!(counts.acquired, 1);
        assert_eq!(counts.released.len(), 1);
    }

    #[test]
    fn test_copy_back_commits_mutation() {
        let (source, counts) = fake(Some(vec![0, 0]));
        {
            let mut view = Pinned::acquire(source, ReleaseMode::CopyBack).unwrap();
            view[1] = 9;
        }
        assert_eq!(counts.borrow().committed, vec![0, 9]);
    }

    #[test]
    fn test_abort_discards_mutation() {
        let (source, counts) = fake(Some(vec![5]));
        {
            let mut view = Pinned::acquire(source, ReleaseMode::CopyBack).unwrap();
            view[0] = 7;
            view.set_release_mode(ReleaseMode::Abort);
        }
        let counts = counts.borrow();
        assert_eq!(counts.released, vec![ReleaseMode::Abort]);
        assert!(counts.committed.is_empty());
    }
}
