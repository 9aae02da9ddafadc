mod grouped_tests;
mod isolation_tests;
mod merge_tests;
