//! Feature-gated parallel iteration over coordinate columns.
//!
//! With the `parallel` feature the Rayon traits are re-exported as-is. Without it, `par_iter()`
//! resolves to the ordinary borrowing iterator so call sites compile unchanged in both builds.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

#[cfg(not(feature = "parallel"))]
pub use self::serial::*;

#[cfg(not(feature = "parallel"))]
mod serial {
    pub use std::iter::Iterator as ParallelIterator;

    /// Serial stand-in for Rayon's `par_iter()` on borrowed collections.
    pub trait IntoParallelRefIterator<'data> {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, C: 'data + ?Sized> IntoParallelRefIterator<'data> for C
    where
        &'data C: IntoIterator,
    {
        type Item = <&'data C as IntoIterator>::Item;
        type Iter = <&'data C as IntoIterator>::IntoIter;
        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}
