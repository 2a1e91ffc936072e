pub mod bandsx;
