// Main integration test file that includes all test modules

mod integration {
    pub mod class_tests;
    pub mod code_tests;
    pub mod method_tests;
    pub mod structure_tests;
}

mod helpers;
