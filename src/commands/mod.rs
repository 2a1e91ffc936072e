pub mod common;
pub mod vasp;
pub mod qe;
