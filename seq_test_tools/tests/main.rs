use seq_test_tools::instantiate_sort_tests;
use seq_test_tools::Sort;

struct SortImpl {}

impl Sort for SortImpl {
    fn name() -> String {
        "rust_std_unstable".into()
    }

    fn sort(arr: &mut [i32]) {
        arr.sort_unstable();
    }
}

instantiate_sort_tests!(SortImpl);
