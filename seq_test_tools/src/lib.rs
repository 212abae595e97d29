//! Shared tooling for testing integer-sequence sorters: input patterns and
//! a reusable test suite instantiated via [`instantiate_sort_tests`].

pub trait Sort {
    fn name() -> String;

    fn sort(arr: &mut [i32]);
}

pub mod patterns;
