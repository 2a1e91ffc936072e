use std::{
    fs,
    path::Path,
};

use anyhow::{
    bail,
    Context,
};
use log::debug;

use crate::types::{
    Result,
    Matrix,
};


/// Band energies from EIGENVAL.
///
/// Only the first spin channel is read for spin-polarized calculations.
#[derive(Clone, Debug)]
pub struct Eigenval {
    pub nkpts  : usize,
    pub nbands : usize,
    pub eigs   : Matrix<f64>,   // [iband, ikpoint]
}


fn next_line<'a>(it: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str> {
    it.next()
        .with_context(|| format!("[EIGENVAL]: Unexpected end of file while reading {}.", what))
}


impl Eigenval {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let context = fs::read_to_string(path)?;
        Self::from_str(&context)
    }

    pub fn from_str(context: &str) -> Result<Self> {
        let mut it = context.lines();

        for _ in 0 .. 5 {
            next_line(&mut it, "header")?;
        }

        // "   nelect   nkpts   nbands"
        let (nkpts, nbands) = {
            let line = next_line(&mut it, "dimensions")?;
            let v = line.split_whitespace().collect::<Vec<&str>>();
            if v.len() < 3 {
                bail!("[EIGENVAL]: Invalid dimension line: {:?}", line.trim());
            }
            let nkpts = v[1].parse::<usize>()
                .with_context(|| format!("[EIGENVAL]: Invalid NKPTS: {:?}", v[1]))?;
            let nbands = v[v.len() - 1].parse::<usize>()
                .with_context(|| format!("[EIGENVAL]: Invalid NBANDS: {:?}", v[v.len() - 1]))?;
            (nkpts, nbands)
        };
        debug!("[EIGENVAL]: NKPTS = {}, NBANDS = {}", nkpts, nbands);

        let mut eigs = Matrix::<f64>::zeros((nbands, nkpts));
        for ik in 0 .. nkpts {
            next_line(&mut it, "blank line before k-point")?;
            next_line(&mut it, "k-point header")?;

            for ib in 0 .. nbands {
                let what = format!("band {} of k-point {}", ib + 1, ik + 1);
                let line = next_line(&mut it, &what)?;
                eigs[[ib, ik]] = line.split_whitespace()
                    .nth(1)
                    .with_context(|| format!("[EIGENVAL]: Missing energy of {}.", what))?
                    .parse::<f64>()
                    .with_context(|| format!("[EIGENVAL]: Invalid energy of {}: {:?}", what, line.trim()))?;
            }
        }

        Ok(Self {
            nkpts,
            nbands,
            eigs,
        })
    }
}
