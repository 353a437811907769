//! Post-lowering passes over the output tree.

pub mod mangle;
