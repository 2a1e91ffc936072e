use std::{
    fs,
    path::Path,
};

use anyhow::{
    bail,
    Context,
};

use crate::types::Result;


/// Positions of the high-symmetry points reported in the `bands.x` log.
///
/// ```text
///      high-symmetry point:  0.0000 0.0000 0.0000   x coordinate   0.0000
///      high-symmetry point:  0.5000 0.5000 0.5000   x coordinate   0.8660
/// ```
pub fn read_hsym_positions(path: &(impl AsRef<Path> + ?Sized)) -> Result<Vec<f64>> {
    let context = fs::read_to_string(path)?;
    parse_hsym_positions(&context)
}


pub fn parse_hsym_positions(context: &str) -> Result<Vec<f64>> {
    let ret = context.lines()
        .filter_map(|l| {
            let v = l.split_whitespace().collect::<Vec<&str>>();
            match v.as_slice() {
                ["high-symmetry", "point:", .., last] => Some(*last),
                _ => None,
            }
        })
        .map(|x| x.parse::<f64>()
             .with_context(|| format!("[BANDSX]: Invalid high-symmetry point coordinate: {:?}", x)))
        .collect::<Result<Vec<f64>>>()?;

    if ret.is_empty() {
        bail!("[BANDSX]: No high-symmetry points found, is this the output of bands.x?");
    }

    Ok(ret)
}
