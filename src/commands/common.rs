use std::{
    io::{
        self,
        Write,
    },
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::{
    info,
    warn,
};
use anyhow::{
    bail,
    Result,
    Context,
};
use colored::Colorize;
use itertools::Itertools;
use ndarray::ArrayView1;
use plotly::{
    ImageFormat,
    Plot,
    Scatter,
    Layout,
    common::{
        DashType,
        Line,
        Marker,
        Mode,
        Title,
    },
    layout::Axis,
};

use crate::{
    config::BandConfig,
    types::{
        Vector,
        Matrix,
    },
};


const NAMED_COLORS: &[&str] = &[
        "aliceblue",            "antiquewhite",     "aqua",             "aquamarine",       "azure",
        "beige",                "bisque",           "black",            "blanchedalmond",   "blue",
        "blueviolet",           "brown",            "burlywood",        "cadetblue",        "chartreuse",
        "chocolate",            "coral",            "cornflowerblue",   "cornsilk",         "crimson",
        "cyan",                 "darkblue",         "darkcyan",         "darkgoldenrod",    "darkgray",
        "darkgrey",             "darkgreen",        "darkkhaki",        "darkmagenta",      "darkolivegreen",
        "darkorange",           "darkorchid",       "darkred",          "darksalmon",       "darkseagreen",
        "darkslateblue",        "darkslategray",    "darkslategrey",    "darkturquoise",    "darkviolet",
        "deeppink",             "deepskyblue",      "dimgray",          "dimgrey",          "dodgerblue",
        "firebrick",            "floralwhite",      "forestgreen",      "fuchsia",          "gainsboro",
        "ghostwhite",           "gold",             "goldenrod",        "gray",             "grey",
        "green",                "greenyellow",      "honeydew",         "hotpink",          "indianred",
        "indigo",               "ivory",            "khaki",            "lavender",         "lavenderblush",
        "lawngreen",            "lemonchiffon",     "lightblue",        "lightcoral",       "lightcyan",
        "lightgoldenrodyellow", "lightgray",        "lightgrey",        "lightgreen",       "lightpink",
        "lightsalmon",          "lightseagreen",    "lightskyblue",     "lightslategray",   "lightslategrey",
        "lightsteelblue",       "lightyellow",      "lime",             "limegreen",        "linen",
        "magenta",              "maroon",           "mediumaquamarine", "mediumblue",       "mediumorchid",
        "mediumpurple",         "mediumseagreen",   "mediumslateblue",  "mediumspringgreen","mediumturquoise",
        "mediumvioletred",      "midnightblue",     "mintcream",        "mistyrose",        "moccasin",
        "navajowhite",          "navy",             "oldlace",          "olive",            "olivedrab",
        "orange",               "orangered",        "orchid",           "palegoldenrod",    "palegreen",
        "paleturquoise",        "palevioletred",    "papayawhip",       "peachpuff",        "peru",
        "pink",                 "plum",             "powderblue",       "purple",           "red",
        "rosybrown",            "royalblue",        "saddlebrown",      "salmon",           "sandybrown",
        "seagreen",             "seashell",         "sienna",           "silver",           "skyblue",
        "slateblue",            "slategray",        "slategrey",        "snow",             "springgreen",
        "steelblue",            "tan",              "teal",             "thistle",          "tomato",
        "turquoise",            "violet",           "wheat",            "white",            "whitesmoke",
        "yellow",               "yellowgreen",      "transparent",
    ];


const GREEK_LABELS: &[(&str, &str)] = &[
    ("gamma",  "Γ"),
    ("g",      "Γ"),
    ("delta",  "Δ"),
    ("sigma",  "Σ"),
    ("lambda", "Λ"),
];


const PIXELS_PER_INCH: f64 = 100.0;


/// Parse the color of the curves, a CSS named color or a hex code like `#6463fa` or `#f0c`.
pub fn parse_color(input: &str) -> Result<String> {
    let lower = input.to_ascii_lowercase();
    if NAMED_COLORS.contains(&lower.as_ref()) {
        return Ok(lower);
    }

    let is_hex = lower.strip_prefix('#')
        .map_or(false, |h| (h.len() == 3 || h.len() == 6) && h.chars().all(|c| c.is_ascii_hexdigit()));
    if is_hex {
        Ok(lower)
    } else {
        bail!("The input color {:?} is neither a named color nor a valid hex code.
See \"https://developer.mozilla.org/en-US/docs/Web/CSS/color_value for availed named colors.\"", input)
    }
}


/// Render the common spellings of Greek high-symmetry points, e.g. `G`, `\Gamma` or `$\Gamma$`.
pub fn prettify_label(input: &str) -> String {
    let bare = input.trim_matches('$').trim_start_matches('\\');
    GREEK_LABELS.iter()
        .find(|(k, _)| bare.eq_ignore_ascii_case(k))
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| bare.to_string())
}


/// Make the labels as many as the ticks, missing labels are left blank.
pub fn align_labels(labels: &[String], nticks: usize) -> Vec<String> {
    if labels.len() != nticks {
        warn!("{} k-labels provided for {} high-symmetry points.", labels.len(), nticks);
    }

    labels.iter()
        .map(|l| prettify_label(l))
        .pad_using(nticks, |_| String::new())
        .take(nticks)
        .collect()
}


pub fn read_config(path: Option<&Path>) -> Result<BandConfig> {
    if let Some(path) = path {
        BandConfig::from_file(path)
    } else {
        info!("Reading configuration from stdin ...");
        BandConfig::from_reader(io::stdin().lock())
    }
}


pub fn write_array_to_txt(file_name: &(impl AsRef<Path> + ?Sized), ys: &[ArrayView1<f64>], comment: &str) -> Result<()> {
    let ncol = ys.len();

    let x = ys.get(0).context("At lease one data set is needed")?;
    let nrow = x.len();

    if nrow == 0 || !ys.iter().all(|y| y.len() == nrow) {
        bail!("[WRT_ARRAY]: input data with zero length or they don't have consistent lengths");
    }

    let mut f = io::BufWriter::new(fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(file_name)?);

    writeln!(f, "# {}", comment.trim())?;

    for irow in 0 .. nrow {
        let mut s = String::with_capacity(17 * ncol + 1);
        for y in ys.iter() {
            s.push_str(&format!("  {:15.6}", y[irow]));
        }
        s.push('\n');

        f.write_all(s.as_bytes())?;
    }

    Ok(())
}


/// Write the k axis followed by one column per band.
pub fn write_bands_to_txt(file_name: &(impl AsRef<Path> + ?Sized), kaxis: &Vector<f64>, bands: &Matrix<f64>) -> Result<()> {
    let path: &Path = file_name.as_ref();
    info!("Writing raw plot data to {:?}", path);
    let ys = std::iter::once(kaxis.view())
        .chain(bands.rows())
        .collect::<Vec<_>>();
    write_array_to_txt(path, &ys, "k-distance  E-Ef(eV) of each band")
}


/// Table of the high-symmetry points along the k-path.
pub fn hsym_summary(ticks: &[f64], labels: &[String]) -> String {
    let mut output = String::with_capacity(60);
    output.push_str("----------------------------------------\n");
    output.push_str(&format!(" {:>5}  {:^10}  {:>12}\n", "#", "Label", "k-distance"));
    for (i, (t, l)) in ticks.iter().zip(labels.iter()).enumerate() {
        output.push_str(&format!(" {:>5}  {:^10}  {}\n",
                                 i + 1, l.bright_yellow(), format!("{:12.6}", t).bright_cyan()));
    }
    output.push_str("----------------------------------------");
    output
}


/// Print the summary to stderr, stdout is kept for `--to-inline-html` and `--gen-template`.
pub fn print_hsym_summary(ticks: &[f64], labels: &[String]) {
    eprintln!("{}", hsym_summary(ticks, labels));
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandStyle {
    Lines,
    Markers,
}


/// Axes, ticks and guide lines shared by all band plots.
#[derive(Debug, Clone)]
pub struct BandFrame {
    pub xlim    : [f64; 2],
    pub ylim    : [f64; 2],
    pub ticks   : Vec<f64>,
    pub labels  : Vec<String>,
    pub figsize : [f64; 2],
}


impl BandFrame {
    pub fn new(kaxis: &Vector<f64>, ticks: Vec<f64>, labels: Vec<String>, config: &BandConfig) -> Self {
        let xmin = kaxis.iter().copied().fold(f64::INFINITY, f64::min);
        let xmax = kaxis.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            xlim: [xmin, xmax],
            ylim: config.ylim(),
            ticks,
            labels,
            figsize: config.figsize(),
        }
    }

    /// A plot with the axes set up, the vertical lines at the high-symmetry
    /// points and the dashed Fermi level.
    pub fn new_plot(&self, show_legend: bool) -> Plot {
        let mut plot = Plot::new();
        plot.use_local_plotly();

        for &t in self.ticks.iter() {
            let trace = Scatter::new(vec![t, t], vec![self.ylim[0], self.ylim[1]])
                .mode(Mode::Lines)
                .line(Line::new().color("#000000").width(0.5))
                .show_legend(false);
            plot.add_trace(trace);
        }

        let efermi = Scatter::new(vec![self.xlim[0], self.xlim[1]], vec![0.0, 0.0])
            .mode(Mode::Lines)
            .line(Line::new().color("#000000").width(0.5).dash(DashType::Dash))
            .show_legend(false);
        plot.add_trace(efermi);

        let layout = Layout::new()
            .width((self.figsize[0] * PIXELS_PER_INCH).round() as usize)
            .height((self.figsize[1] * PIXELS_PER_INCH).round() as usize)
            .show_legend(show_legend)
            .x_axis(Axis::new()
                    .range(vec![self.xlim[0], self.xlim[1]])
                    .tick_values(self.ticks.clone())
                    .tick_text(self.labels.clone())
                    .show_grid(false)
                    .zero_line(false)
                    .show_line(true)
                    .mirror(true))
            .y_axis(Axis::new()
                    .title(Title::with_text("E - E<sub>F</sub> (eV)"))
                    .range(vec![self.ylim[0], self.ylim[1]])
                    .show_grid(false)
                    .zero_line(false)
                    .show_line(true)
                    .mirror(true));
        plot.set_layout(layout);

        plot
    }
}


/// Add one trace per band. Only the first band of the group appears in the legend.
pub fn add_band_traces(plot: &mut Plot, kaxis: &Vector<f64>, bands: &Matrix<f64>,
                       color: &str, style: BandStyle, name: &str) {
    let x = kaxis.to_vec();
    for (iband, band) in bands.rows().into_iter().enumerate() {
        let trace = Scatter::new(x.clone(), band.to_vec())
            .name(name)
            .legend_group(name)
            .show_legend(iband == 0);

        let trace = match style {
            BandStyle::Lines   => trace.mode(Mode::Lines)
                .line(Line::new().color(color.to_string()).width(1.0)),
            BandStyle::Markers => trace.mode(Mode::Markers)
                .marker(Marker::new().color(color.to_string()).size(4)),
        };
        plot.add_trace(trace);
    }
}


pub fn save_plot(plot: &Plot, htmlout: &Path, show: bool, to_inline_html: bool) -> Result<()> {
    info!("Writing band structure plot to {:?}", htmlout);
    fs::write(htmlout, plot.to_html())
        .with_context(|| format!("[PLOT]: Cannot write plot to {:?}", htmlout))?;

    if show {
        plot.show();
    }

    if to_inline_html {
        info!("Printing inline html to stdout ...");
        println!("{}", plot.to_inline_html(None));
    }

    Ok(())
}


/// Vector image format picked from the file extension.
pub fn image_format(imgout: &Path) -> Result<ImageFormat> {
    let ext = imgout.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let format = match ext.as_str() {
        "pdf" => ImageFormat::PDF,
        "svg" => ImageFormat::SVG,
        "eps" => ImageFormat::EPS,
        _ => bail!("[PLOT]: Cannot tell the image format of {:?}, use '.pdf', '.svg' or '.eps'.", imgout),
    };

    if !cfg!(feature = "kaleido") {
        bail!("[PLOT]: Writing {:?} needs bandcmp built with the `kaleido` feature.", imgout);
    }

    Ok(format)
}


/// Default vector image next to the html, only when the image backend is built in.
pub fn default_imgout(htmlout: &Path) -> Option<PathBuf> {
    if cfg!(feature = "kaleido") {
        Some(htmlout.with_extension("pdf"))
    } else {
        None
    }
}


#[cfg(feature = "kaleido")]
pub fn save_image(plot: &Plot, imgout: &Path, format: ImageFormat, figsize: [f64; 2]) -> Result<()> {
    use std::panic::{
        catch_unwind,
        AssertUnwindSafe,
    };

    info!("Writing band structure image to {:?}", imgout);
    let width  = (figsize[0] * PIXELS_PER_INCH).round() as usize;
    let height = (figsize[1] * PIXELS_PER_INCH).round() as usize;

    // kaleido panics instead of returning an error
    catch_unwind(AssertUnwindSafe(|| plot.write_image(imgout, format, width, height, 1.0)))
        .map_err(|_| anyhow::anyhow!("[PLOT]: Cannot render image {:?} with kaleido.", imgout))
}


#[cfg(not(feature = "kaleido"))]
pub fn save_image(_plot: &Plot, imgout: &Path, _format: ImageFormat, _figsize: [f64; 2]) -> Result<()> {
    bail!("[PLOT]: Writing {:?} needs bandcmp built with the `kaleido` feature.", imgout)
}
