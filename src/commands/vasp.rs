use std::path::{
    Path,
    PathBuf,
};

use clap::Args;
use anyhow::{
    bail,
    Context,
};
use log::{
    info,
    debug,
    warn,
};

use crate::{
    types::Result,
    OptProcess,
    config::TEMPLATE,
    kpath::{
        calc_kdists,
        tick_positions,
    },
    vasp_parsers::{
        outcar::KPath,
        eigenval::Eigenval,
    },
    banddat::BandData,
    commands::common::{
        read_config,
        parse_color,
        align_labels,
        print_hsym_summary,
        write_bands_to_txt,
        add_band_traces,
        save_plot,
        save_image,
        image_format,
        default_imgout,
        BandFrame,
        BandStyle,
    },
};


#[derive(Debug, Args)]
/// Plot band structure from VASP output, optionally compared with the bands
/// interpolated by Wannier90.
///
/// The k-path is read from OUTCAR and the band energies from EIGENVAL. Plot
/// settings are read as `key value` lines from stdin or from the file given by
/// '--config'. Set `wann_band` in the configuration to overlay a Wannier90
/// `*_band.dat` file.
pub struct Vasp {
    #[arg(long, default_value = "./OUTCAR")]
    /// OUTCAR file of the band structure calculation, providing the k-path.
    outcar: PathBuf,

    #[arg(long, default_value = "./EIGENVAL")]
    /// EIGENVAL file providing the band energies.
    eigenval: PathBuf,

    #[arg(short, long)]
    /// Configuration file, read from stdin if not specified. Files ending with '.toml' are parsed as TOML.
    config: Option<PathBuf>,

    #[arg(long)]
    /// Print a configuration template to stdout and exit.
    gen_template: bool,

    #[arg(short = 'o', long)]
    /// Write the plot to html. Defaults to 'EIGENVAL.html', or 'COMPARE.html' with Wannier90 bands.
    htmlout: Option<PathBuf>,

    #[arg(long)]
    /// Also write the plot as vector image, the format follows the extension ('pdf', 'svg' or 'eps').
    /// Defaults to the html name with '.pdf' extension if bandcmp is built with the `kaleido` feature.
    imgout: Option<PathBuf>,

    #[arg(long, default_value = "band.txt")]
    /// Write the raw plot data as txt file in order to replot it with more advanced tools.
    txtout: PathBuf,

    #[arg(long, default_value = "wannier_band.txt")]
    /// Write the rescaled Wannier90 bands as txt file.
    wann_txtout: PathBuf,

    #[arg(long)]
    /// Open default browser to see the plot immediately.
    show: bool,

    #[arg(long)]
    /// Render the plot and print the rendered code to stdout.
    to_inline_html: bool,
}


impl OptProcess for Vasp {
    fn process(&self) -> Result<()> {
        if self.gen_template {
            print!("{}", TEMPLATE);
            return Ok(());
        }

        let config = read_config(self.config.as_deref())?;
        let colour = parse_color(config.colour())?;
        let wann_colour = parse_color(config.wann_colour())?;

        info!("Reading k-path from {:?}", &self.outcar);
        let kpath = KPath::from_file(&self.outcar)
            .with_context(|| format!("Parse file {:?} failed.", self.outcar))?;

        info!("Reading band energies from {:?}", &self.eigenval);
        let eigenval = Eigenval::from_file(&self.eigenval)
            .with_context(|| format!("Parse file {:?} failed.", self.eigenval))?;

        if eigenval.nkpts != kpath.nkpts {
            bail!("[VASP]: {:?} contains {} k-points but {:?} contains {}.",
                  self.outcar, kpath.nkpts, self.eigenval, eigenval.nkpts);
        }

        let kdists = calc_kdists(&kpath.kpoints)?;
        let ticks = tick_positions(&kdists, kpath.kp_per_path)?;
        if ticks.len() != kpath.nhsym() {
            warn!("[VASP]: {} high-symmetry points expected from OUTCAR, but {} ticks placed.",
                  kpath.nhsym(), ticks.len());
        }
        debug!("[VASP]: Tick positions: {:?}", &ticks);

        let labels = align_labels(&config.klabels, ticks.len());
        let frame = BandFrame::new(&kdists, ticks, labels, &config);

        let wann = config.wann_band.as_ref()
            .map(|wann_band| read_wannier_bands(wann_band, frame.xlim[1]))
            .transpose()?;

        let stem = if wann.is_some() { "COMPARE" } else { "EIGENVAL" };
        let htmlout = self.htmlout.clone().unwrap_or_else(|| PathBuf::from(format!("{}.html", stem)));
        let imgout = self.imgout.clone().or_else(|| default_imgout(&htmlout));
        let imgformat = imgout.as_deref().map(image_format).transpose()?;

        // Everything is read and checked, start writing.
        print_hsym_summary(&frame.ticks, &frame.labels);

        let efermi = config.fermi_level;
        let bands = &eigenval.eigs - efermi;
        let mut plot = frame.new_plot(wann.is_some());

        if let Some(wann) = wann {
            let bwann = &wann.bands - efermi;
            write_bands_to_txt(&self.txtout, &kdists, &bands)?;
            write_bands_to_txt(&self.wann_txtout, &wann.klist, &bwann)?;

            add_band_traces(&mut plot, &kdists, &bands, &colour, BandStyle::Markers, "VASP");
            add_band_traces(&mut plot, &wann.klist, &bwann, &wann_colour, BandStyle::Lines, "Wannier90");
        } else {
            write_bands_to_txt(&self.txtout, &kdists, &bands)?;
            add_band_traces(&mut plot, &kdists, &bands, &colour, BandStyle::Lines, "VASP");
        }

        save_plot(&plot, &htmlout, self.show, self.to_inline_html)?;
        if let (Some(imgout), Some(format)) = (imgout, imgformat) {
            save_image(&plot, &imgout, format, frame.figsize)?;
        }

        Ok(())
    }
}


/// Wannier90 bands with the k axis stretched to end at `kmax`.
fn read_wannier_bands(fname: &Path, kmax: f64) -> Result<BandData> {
    info!("Reading Wannier90 bands from {:?}", fname);
    let mut wann = BandData::from_file(fname)
        .with_context(|| format!("Parse file {:?} failed.", fname))?;

    let kmax_wann = wann.klist[wann.nkpts() - 1];
    if kmax_wann <= 0.0 {
        bail!("[VASP]: The k axis of {:?} should end at a positive distance.", fname);
    }

    let scale = kmax / kmax_wann;
    debug!("[VASP]: Wannier90 k axis scaled by {}", scale);
    wann.klist *= scale;

    Ok(wann)
}
