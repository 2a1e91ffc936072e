pub mod types;
pub mod cli;
pub mod config;
pub mod kpath;
pub mod banddat;
pub mod vasp_parsers;
pub mod qe_parsers;
pub mod commands;

pub use types::Result;
pub use cli::OptProcess;

pub use config::BandConfig;
pub use kpath::{
    calc_kdists,
    tick_positions,
};
pub use banddat::BandData;
pub use vasp_parsers::{
    outcar::KPath,
    eigenval::Eigenval,
};
