use std::{
    fs,
    path::Path,
};

use anyhow::{
    bail,
    Context,
};
use log::debug;
use regex::Regex;

use crate::types::{
    Result,
    MatX3,
};


/// Line-mode k-path recorded in OUTCAR.
#[derive(Clone, Debug, PartialEq)]
pub struct KPath {
    pub kp_per_path : usize,        // k-points in each line segment
    pub nkpts       : usize,
    pub kpoints     : MatX3<f64>,   // cartesian coordinates, in 2pi/SCALE
}


impl KPath {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let context = fs::read_to_string(path)?;
        Self::from_str(&context)
    }

    pub fn from_str(context: &str) -> Result<Self> {
        let lines = context.lines().collect::<Vec<&str>>();

        let (kp_per_path, nkpts) = Self::parse_generated(context)?;
        let kpoints = Self::parse_cartesian_kpoints(&lines, nkpts)?;
        debug!("[OUTCAR]: {} k-points along the path, {} per segment", nkpts, kp_per_path);

        Ok(Self {
            kp_per_path,
            nkpts,
            kpoints,
        })
    }

    /// Number of high-symmetry points, counting both ends of the path.
    pub fn nhsym(&self) -> usize {
        self.nkpts / self.kp_per_path + 1
    }

    // " Generated   10 k-points along each of the   3 lines, in total    30 k-points"
    //       0        1                                                    11
    fn parse_generated(context: &str) -> Result<(usize, usize)> {
        let line = Regex::new(r"(?m)^[ \t]*Generated[ \t].*$")
            .unwrap()
            .find_iter(context)
            .last()
            .context("[OUTCAR]: No line-mode k-path information found, is this a band structure calculation?")?
            .as_str();

        let v = line.split_whitespace().collect::<Vec<&str>>();
        if v.len() < 12 {
            bail!("[OUTCAR]: Unexpected k-path line: {:?}", line.trim());
        }

        let kp_per_path = v[1].parse::<usize>()
            .with_context(|| format!("[OUTCAR]: Invalid k-points per segment: {:?}", v[1]))?;
        let nkpts = v[11].parse::<usize>()
            .with_context(|| format!("[OUTCAR]: Invalid total number of k-points: {:?}", v[11]))?;

        if kp_per_path == 0 {
            bail!("[OUTCAR]: Zero k-points per segment.");
        }

        Ok((kp_per_path, nkpts))
    }

    fn parse_cartesian_kpoints(lines: &[&str], nkpts: usize) -> Result<MatX3<f64>> {
        let pos = lines.iter()
            .rposition(|l| l.trim() == "Following cartesian coordinates:")
            .context("[OUTCAR]: Cartesian coordinates of k-points not found.")?;

        let block = lines.iter()
            .skip(pos + 2)      // and the "Coordinates  Weight" header
            .take(nkpts)
            .map(|l| -> Result<[f64; 3]> {
                let v = l.split_whitespace()
                    .take(3)
                    .map(|x| x.parse::<f64>())
                    .collect::<std::result::Result<Vec<f64>, _>>()
                    .with_context(|| format!("[OUTCAR]: Invalid k-point line: {:?}", l.trim()))?;
                if v.len() < 3 {
                    bail!("[OUTCAR]: Invalid k-point line: {:?}", l.trim());
                }
                Ok([v[0], v[1], v[2]])
            })
            .collect::<Result<MatX3<f64>>>()?;

        if block.len() != nkpts {
            bail!("[OUTCAR]: Expected {} k-points, but only {} found.", nkpts, block.len());
        }

        Ok(block)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"
 KPOINTS: Generated by line mode

 Generated    3 k-points along each of the   2 lines, in total     6 k-points
 Found      6 irreducible k-points:

 Following reciprocal coordinates:
            Coordinates               Weight
  0.000000  0.000000  0.000000      1.000000
  0.250000  0.000000  0.250000      1.000000
  0.500000  0.000000  0.500000      1.000000
  0.500000  0.000000  0.500000      1.000000
  0.500000  0.125000  0.625000      1.000000
  0.500000  0.250000  0.750000      1.000000

 Following cartesian coordinates:
            Coordinates               Weight
  0.000000  0.000000  0.000000      1.000000
  0.000000  0.500000  0.000000      1.000000
  0.000000  1.000000  0.000000      1.000000
  0.000000  1.000000  0.000000      1.000000
  0.250000  1.000000  0.000000      1.000000
  0.500000  1.000000  0.000000      1.000000

"#;

    #[test]
    fn test_from_str() {
        let kpath = KPath::from_str(SAMPLE).unwrap();
        assert_eq!(kpath.kp_per_path, 3);
        assert_eq!(kpath.nkpts, 6);
        assert_eq!(kpath.nhsym(), 3);
        assert_eq!(kpath.kpoints.len(), 6);
        assert_eq!(kpath.kpoints[1], [0.0, 0.5, 0.0]);
        assert_eq!(kpath.kpoints[5], [0.5, 1.0, 0.0]);
    }

    #[test]
    fn test_parse_generated() {
        let input = " Generated   20 k-points along each of the   4 lines, in total    80 k-points";
        assert_eq!(KPath::parse_generated(input).unwrap(), (20, 80));

        let input = " Generated  0 k-points along each of the  4 lines, in total  80 k-points";
        assert!(KPath::parse_generated(input).is_err());

        let input = " Generated 20 k-points";
        assert!(KPath::parse_generated(input).is_err());

        let input = " Found   20 irreducible k-points\n KPOINTS: Generated by hand";
        assert!(KPath::parse_generated(input).is_err());
    }

    #[test]
    fn test_truncated_kpoints() {
        let lines = SAMPLE.lines().take(20).collect::<Vec<_>>();
        assert!(KPath::parse_cartesian_kpoints(&lines, 6).is_err());
        assert!(KPath::parse_cartesian_kpoints(&lines[..10], 6).is_err());
    }
}
