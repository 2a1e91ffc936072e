use std::path::PathBuf;

use bandcmp::{
    Result,
    BandConfig,
    config::DEFAULT_COLOUR,
};
use tempdir::TempDir;


macro_rules! get_fpath_in_current_dir {
    ($fname:expr) => {{
        let mut path = PathBuf::from(file!());
        path.pop();
        path.push($fname);
        path
    }}
}


#[test]
fn test_read_toml_config() -> Result<()> {
    let cfg = BandConfig::from_file(&get_fpath_in_current_dir!("band.toml"))?;

    assert_eq!(cfg.fermi_level, 5.6431);
    assert_eq!(cfg.yrange, [-6.0, 4.0]);
    assert_eq!(cfg.figsize(), [5.0, 4.0]);
    assert_eq!(cfg.klabels, vec!["G", "X", "W"]);
    assert_eq!(cfg.wann_band, Some(PathBuf::from("wannier90_band.dat")));
    assert_eq!(cfg.wann_colour(), "#ff6978");
    assert_eq!(cfg.seedname, None);
    Ok(())
}


#[test]
fn test_toml_missing_required() -> Result<()> {
    let tmpdir = TempDir::new("bandcmp_test")?;
    let fname = tmpdir.path().join("band.toml");
    std::fs::write(&fname, "yrange = [-1.0, 1.0]\n")?;

    assert!(BandConfig::from_file(&fname).is_err());
    Ok(())
}


#[test]
fn test_read_key_value_config() -> Result<()> {
    let tmpdir = TempDir::new("bandcmp_test")?;
    let fname = tmpdir.path().join("band.in");
    std::fs::write(&fname, "\
fermi_level 6.2
yrange -6 4
seedname silicon
filband bands.dat.gnu
ppfile bands.out
klabels L G X
")?;

    let cfg = BandConfig::from_file(&fname)?;
    assert_eq!(cfg.seedname.as_deref(), Some("silicon"));
    assert_eq!(cfg.filband, Some(PathBuf::from("bands.dat.gnu")));
    assert_eq!(cfg.ppfile, Some(PathBuf::from("bands.out")));
    assert_eq!(cfg.colour(), DEFAULT_COLOUR);
    assert!(cfg.wann_band.is_none());
    Ok(())
}


#[test]
fn test_read_missing_config() {
    assert!(BandConfig::from_file(&get_fpath_in_current_dir!("band.missing")).is_err());
}
