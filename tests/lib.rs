//! Main test module that includes all sub-modules
//!
//! Run specific tests with `cargo test <module>::<submodule>`,
//! for example `cargo test integration::parallel_test`.

// Utility modules
pub mod utils;

// Integration tests
pub mod integration {
    pub mod parallel_test;
    pub mod sequential_test;
}
