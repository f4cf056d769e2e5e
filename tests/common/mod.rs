// Common test utilities

#![allow(dead_code)]

pub mod resolver;
pub mod tracing;
