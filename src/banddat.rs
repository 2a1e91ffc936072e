//! Two-column `k E` band files, as written by `bands.x` (`*.dat.gnu`) and
//! Wannier90 (`*_band.dat`).
//!
//! Each band is a block of rows sharing the same k axis, so the energy column
//! reshapes into a `[nbands, nkpts]` grid once the distinct k values are known.
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
    Vector,
    Matrix,
};


#[derive(Clone, Debug)]
pub struct BandData {
    pub klist : Vector<f64>,    // sorted distinct abscissae
    pub bands : Matrix<f64>,    // [iband, ikpoint]
}


impl BandData {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let context = fs::read_to_string(path)?;
        Self::from_str(&context)
    }

    pub fn from_str(context: &str) -> Result<Self> {
        let (ks, es) = Self::parse_columns(context)?;

        let mut klist = ks;
        klist.sort_by(|a, b| a.total_cmp(b));
        klist.dedup();
        let nkpts = klist.len();

        if es.len() % nkpts != 0 {
            bail!("[BANDDAT]: {} energies cannot be reshaped into bands of {} k-points.", es.len(), nkpts);
        }
        let nbands = es.len() / nkpts;
        debug!("[BANDDAT]: {} bands with {} k-points each", nbands, nkpts);

        let bands = Matrix::from_shape_vec((nbands, nkpts), es)?;

        Ok(Self {
            klist: Vector::from(klist),
            bands,
        })
    }

    pub fn nbands(&self) -> usize {
        self.bands.nrows()
    }

    pub fn nkpts(&self) -> usize {
        self.klist.len()
    }

    fn parse_columns(context: &str) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut ks = vec![];
        let mut es = vec![];

        for (i, line) in context.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let v = line.split_whitespace()
                .map(|x| x.parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .with_context(|| format!("[BANDDAT]: Line {}: Invalid number in {:?}", i + 1, line))?;
            if v.len() < 2 {
                bail!("[BANDDAT]: Line {}: At least two columns are needed, got {:?}", i + 1, line);
            }

            ks.push(v[0]);
            es.push(v[1]);
        }

        if ks.is_empty() {
            bail!("[BANDDAT]: No band data found.");
        }

        Ok((ks, es))
    }
}
