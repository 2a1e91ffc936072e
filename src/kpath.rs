//! Arc-length parametrization of a sampled k-point path.
//!
//! The x axis of a band structure plot is the cumulative distance travelled
//! along the k-path, and the high-symmetry points sit at the boundaries of
//! the line segments.
use anyhow::bail;
use log::warn;

use crate::types::{
    Result,
    Vector,
};


/// Cumulative Euclidean distance of each k-point measured from the first one.
///
/// The result has the same length as `kpoints` and starts at zero.
pub fn calc_kdists(kpoints: &[[f64; 3]]) -> Result<Vector<f64>> {
    if kpoints.is_empty() {
        bail!("[KPATH]: Cannot compute distances along an empty k-path.");
    }

    let mut acc = 0.0;
    let kdists = std::iter::once(0.0)
        .chain(kpoints.windows(2)
               .map(|w| {
                   let dk = [w[1][0] - w[0][0], w[1][1] - w[0][1], w[1][2] - w[0][2]];
                   acc += (dk[0] * dk[0] + dk[1] * dk[1] + dk[2] * dk[2]).sqrt();
                   acc
               }))
        .collect::<Vector<f64>>();

    Ok(kdists)
}


/// Positions of the high-symmetry points along the k-path.
///
/// Every `kp_per_path`-th distance is taken, and the distance of the path end
/// is appended unless the stride already landed on it.
pub fn tick_positions(kdists: &Vector<f64>, kp_per_path: usize) -> Result<Vec<f64>> {
    if kp_per_path == 0 {
        bail!("[KPATH]: Number of k-points per segment must be positive.");
    }

    let nkpts = kdists.len();
    if nkpts == 0 {
        bail!("[KPATH]: Cannot place ticks on an empty k-path.");
    }

    if (nkpts - 1) % kp_per_path != 0 && nkpts % kp_per_path != 0 {
        warn!("[KPATH]: {} k-points cannot be split into segments of {} points, \
the tick positions may not match the high-symmetry points.", nkpts, kp_per_path);
    }

    let mut ticks = kdists.iter()
        .step_by(kp_per_path)
        .copied()
        .collect::<Vec<f64>>();

    if (nkpts - 1) % kp_per_path != 0 {
        ticks.push(kdists[nkpts - 1]);
    }

    Ok(ticks)
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calc_kdists_identical_points() {
        let kpoints = vec![[0.3, -0.2, 0.5]; 6];
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(kdists.len(), 6);
        assert!(kdists.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_calc_kdists_colinear() {
        let kpoints = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(kdists.to_vec(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_calc_kdists_monotonic() {
        let kpoints = vec![
            [ 0.0,  0.0,  0.0],
            [ 0.1,  0.0,  0.0],
            [ 0.1,  0.0,  0.0],
            [ 0.1, -0.3,  0.2],
            [-0.4,  0.5,  0.1],
            [ 0.0,  0.0,  0.0],
        ];
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(kdists[0], 0.0);
        assert!(kdists.iter().zip(kdists.iter().skip(1)).all(|(a, b)| b >= a));
        assert_relative_eq!(kdists[3] - kdists[2], (0.09f64 + 0.04).sqrt(), epsilon = 1E-12);
    }

    #[test]
    fn test_calc_kdists_single_point() {
        let kdists = calc_kdists(&[[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(kdists.to_vec(), vec![0.0]);
    }

    #[test]
    fn test_calc_kdists_empty() {
        assert!(calc_kdists(&[]).is_err());
    }

    #[test]
    fn test_tick_positions_shared_boundaries() {
        let kpoints = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 2.0], [1.0, 0.0, 2.0]];
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(kdists.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(tick_positions(&kdists, 2).unwrap(), vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tick_positions_stride_hits_end() {
        let kpoints = (0 .. 7).map(|i| [i as f64, 0.0, 0.0]).collect::<Vec<_>>();
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(tick_positions(&kdists, 3).unwrap(), vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_tick_positions_duplicated_boundaries() {
        // Two segments of 3 points each, the boundary point appears twice.
        let kpoints = vec![
            [0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0], [1.0, 0.5, 0.0], [1.0, 1.0, 0.0],
        ];
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(tick_positions(&kdists, 3).unwrap(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_tick_positions_irregular_segments() {
        // Neither 8 nor 7 is a multiple of 3, the strided ticks are kept as is.
        let kpoints = (0 .. 8).map(|i| [0.0, i as f64 * 0.5, 0.0]).collect::<Vec<_>>();
        let kdists = calc_kdists(&kpoints).unwrap();
        assert_eq!(tick_positions(&kdists, 3).unwrap(), vec![kdists[0], kdists[3], kdists[6], kdists[7]]);
        assert_eq!(tick_positions(&kdists, 3).unwrap(), vec![0.0, 1.5, 3.0, 3.5]);
    }

    #[test]
    fn test_tick_positions_invalid() {
        let kdists = Vector::from(vec![0.0, 1.0]);
        assert!(tick_positions(&kdists, 0).is_err());
        assert!(tick_positions(&Vector::from(vec![]), 2).is_err());
        assert_eq!(tick_positions(&Vector::from(vec![0.0]), 4).unwrap(), vec![0.0]);
    }
}
