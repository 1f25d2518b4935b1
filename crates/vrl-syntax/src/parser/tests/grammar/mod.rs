mod assignments_tests;
mod compatibility_tests;
mod containers_tests;
mod expressions_tests;
mod queries_tests;
