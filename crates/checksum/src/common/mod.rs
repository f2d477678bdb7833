//! Shared CRC infrastructure: the bitwise reference oracle and compile-time
//! lookup-table generation.

pub mod reference;
pub mod tables;
