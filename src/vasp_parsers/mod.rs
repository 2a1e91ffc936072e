pub mod outcar;
pub mod eigenval;
