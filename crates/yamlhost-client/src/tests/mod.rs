//! Crate-level tests exercising the client against a scripted server
//! process.

mod support;
