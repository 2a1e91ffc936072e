use std::{
    fs,
    io::BufRead,
    path::{
        Path,
        PathBuf,
    },
};

use serde::Deserialize;
use anyhow::{
    bail,
    Context,
};
use figment::{
    Figment,
    providers::{
        Format,
        Toml,
    },
};
use log::{
    info,
    warn,
};

use crate::types::Result;


pub const DEFAULT_COLOUR: &str      = "#6463fa";
pub const DEFAULT_WANN_COLOUR: &str = "#ff6978";
pub const DEFAULT_FIGSIZE: [f64; 2] = [6.0, 4.0];


pub const TEMPLATE: &str = "\
# Template of the band plot configuration, one `key value...` pair per line.
# Lines starting with '#' are ignored.

# Reference energy subtracted from all the bands, in eV. Required.
fermi_level  0.0

# Energy window of the plot, E - E_F in eV. Required.
yrange       -3.0  3.0

# Figure width and height in inches.
figsize      6.0   4.0

# Colour of the bands, CSS named colour or hex code.
colour       #6463fa

# Labels of the high-symmetry points, 'G' is rendered as Gamma.
klabels      G  X  M  G

# Quantum ESPRESSO only: output prefix, band file from bands.x and the bands.x log.
# seedname     silicon
# filband      bands.dat.gnu
# ppfile       bands.out

# VASP only: overlay the Wannier90 interpolated bands.
# wann_band    wannier90_band.dat
# wann_colour  #ff6978
";


/// Everything the band plotting commands need besides the data files.
///
/// Optional inputs stay `None` until the command decides a default.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub fermi_level : f64,
    pub yrange      : [f64; 2],
    pub seedname    : Option<String>,
    pub figsize     : Option<[f64; 2]>,
    pub colour      : Option<String>,
    pub filband     : Option<PathBuf>,
    pub ppfile      : Option<PathBuf>,
    pub klabels     : Vec<String>,
    pub wann_band   : Option<PathBuf>,
    pub wann_colour : Option<String>,
}


fn parse_floats<const N: usize>(key: &str, values: &[&str], iline: usize) -> Result<[f64; N]> {
    if values.len() < N {
        bail!("[CONFIG]: Line {}: `{}` expects {} value(s), but got {}.", iline, key, N, values.len());
    }

    let mut ret = [0.0; N];
    for (r, v) in ret.iter_mut().zip(values.iter()) {
        *r = v.parse::<f64>()
            .with_context(|| format!("[CONFIG]: Line {}: Invalid number `{}` for `{}`.", iline, v, key))?;
    }
    Ok(ret)
}


fn parse_word<'a>(key: &str, values: &[&'a str], iline: usize) -> Result<&'a str> {
    values.first()
        .copied()
        .with_context(|| format!("[CONFIG]: Line {}: `{}` expects a value.", iline, key))
}


impl BandConfig {
    /// Reads `key value...` lines until the end of the stream.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut fermi_level = None;
        let mut yrange      = None;
        let mut ret         = Self::default();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let iline = i + 1;
            let tokens = line.split_whitespace().collect::<Vec<&str>>();

            let (key, values) = match tokens.split_first() {
                Some((k, _)) if k.starts_with('#') => continue,
                Some((k, v)) => (*k, v),
                None => continue,
            };

            match key {
                "fermi_level" => fermi_level     = Some(parse_floats::<1>(key, values, iline)?[0]),
                "yrange"      => yrange          = Some(parse_floats::<2>(key, values, iline)?),
                "figsize"     => ret.figsize     = Some(parse_floats::<2>(key, values, iline)?),
                "seedname"    => ret.seedname    = Some(parse_word(key, values, iline)?.to_string()),
                "colour"      => ret.colour      = Some(parse_word(key, values, iline)?.to_string()),
                "filband"     => ret.filband     = Some(PathBuf::from(parse_word(key, values, iline)?)),
                "ppfile"      => ret.ppfile      = Some(PathBuf::from(parse_word(key, values, iline)?)),
                "wann_band"   => ret.wann_band   = Some(PathBuf::from(parse_word(key, values, iline)?)),
                "wann_colour" => ret.wann_colour = Some(parse_word(key, values, iline)?.to_string()),
                "klabels"     => ret.klabels     = values.iter().map(|s| s.to_string()).collect(),
                _ => warn!("[CONFIG]: Line {}: Unknown key `{}` ignored.", iline, key),
            }
        }

        ret.fermi_level = fermi_level.context("[CONFIG]: Missing required key `fermi_level`.")?;
        ret.yrange      = yrange.context("[CONFIG]: Missing required key `yrange`.")?;
        Ok(ret)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes())
    }

    /// Reads the configuration file, `*.toml` files are parsed as TOML with the same keys.
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading configuration from {:?}", path);

        if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("toml")) {
            let figment = Figment::new().merge(Toml::file(path));
            for key in ["fermi_level", "yrange"] {
                if !figment.contains(key) {
                    bail!("[CONFIG]: Missing required key `{}` in {:?}.", key, path);
                }
            }
            return figment.extract::<Self>()
                .with_context(|| format!("[CONFIG]: Parse {:?} failed.", path));
        }

        let file = fs::File::open(path)
            .with_context(|| format!("[CONFIG]: Cannot open {:?}.", path))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn figsize(&self) -> [f64; 2] {
        self.figsize.unwrap_or(DEFAULT_FIGSIZE)
    }

    pub fn colour(&self) -> &str {
        self.colour.as_deref().unwrap_or(DEFAULT_COLOUR)
    }

    pub fn wann_colour(&self) -> &str {
        self.wann_colour.as_deref().unwrap_or(DEFAULT_WANN_COLOUR)
    }

    /// `yrange` sorted as `[min, max]`.
    pub fn ylim(&self) -> [f64; 2] {
        let [a, b] = self.yrange;
        [a.min(b), a.max(b)]
    }
}
