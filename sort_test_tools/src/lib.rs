//! Shared tooling for testing sort implementations: a `Sort` abstraction,
//! deterministic input pattern generators and a generic property-test suite
//! instantiated per implementation via `instantiate_sort_tests!`.

pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

pub mod patterns;
pub mod types;
