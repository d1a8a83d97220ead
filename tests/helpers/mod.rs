// Test Helper Modules
//
// Scripted collaborators and a fault-injecting report store shared by the
// integration and contract tests. Each test binary pulls this in with
// `#[path = "../helpers/mod.rs"] mod helpers;` and uses only part of it.
#![allow(dead_code)]


pub use fakes::*;
pub use test_data::*;
