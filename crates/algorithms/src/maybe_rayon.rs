//! Row iteration that is parallel with the `parallel` feature and
//! sequential without it (WASM hosts build without rayon).
//!
//! Either way callers write `(0..rows).into_par_iter()`.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Stand-in for rayon's `IntoParallelIterator` that yields a plain
    /// iterator, so the adapter chain resolves to `Iterator` methods.
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
