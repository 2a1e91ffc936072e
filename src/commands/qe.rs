use std::path::PathBuf;

use clap::Args;
use anyhow::Context;
use log::info;

use crate::{
    types::Result,
    OptProcess,
    config::TEMPLATE,
    qe_parsers::bandsx::read_hsym_positions,
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
/// Plot band structure from Quantum ESPRESSO `bands.x` output.
///
/// Plot settings are read as `key value` lines from stdin or from the file
/// given by '--config'. `seedname`, `filband` (the `*.dat.gnu` band file) and
/// `ppfile` (the log of bands.x, holding the high-symmetry points) are required.
pub struct Qe {
    #[arg(short, long)]
    /// Configuration file, read from stdin if not specified. Files ending with '.toml' are parsed as TOML.
    config: Option<PathBuf>,

    #[arg(long)]
    /// Print a configuration template to stdout and exit.
    gen_template: bool,

    #[arg(short = 'o', long)]
    /// Write the plot to html. Defaults to '<seedname>_EIGENVAL.html'.
    htmlout: Option<PathBuf>,

    #[arg(long)]
    /// Also write the plot as vector image, the format follows the extension ('pdf', 'svg' or 'eps').
    /// Defaults to the html name with '.pdf' extension if bandcmp is built with the `kaleido` feature.
    imgout: Option<PathBuf>,

    #[arg(long, default_value = "band.txt")]
    /// Write the raw plot data as txt file in order to replot it with more advanced tools.
    txtout: PathBuf,

    #[arg(long)]
    /// Open default browser to see the plot immediately.
    show: bool,

    #[arg(long)]
    /// Render the plot and print the rendered code to stdout.
    to_inline_html: bool,
}


impl OptProcess for Qe {
    fn process(&self) -> Result<()> {
        if self.gen_template {
            print!("{}", TEMPLATE);
            return Ok(());
        }

        let config = read_config(self.config.as_deref())?;
        let colour = parse_color(config.colour())?;

        let seedname = config.seedname.as_deref()
            .context("[QE]: `seedname` is required in the configuration.")?;
        let filband = config.filband.as_ref()
            .context("[QE]: `filband` is required in the configuration.")?;
        let ppfile = config.ppfile.as_ref()
            .context("[QE]: `ppfile` is required in the configuration.")?;

        info!("Reading high-symmetry points from {:?}", ppfile);
        let ticks = read_hsym_positions(ppfile)
            .with_context(|| format!("Parse file {:?} failed.", ppfile))?;

        info!("Reading band energies from {:?}", filband);
        let data = BandData::from_file(filband)
            .with_context(|| format!("Parse file {:?} failed.", filband))?;

        let htmlout = self.htmlout.clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_EIGENVAL.html", seedname)));
        let imgout = self.imgout.clone().or_else(|| default_imgout(&htmlout));
        let imgformat = imgout.as_deref().map(image_format).transpose()?;

        let labels = align_labels(&config.klabels, ticks.len());
        print_hsym_summary(&ticks, &labels);

        let bands = &data.bands - config.fermi_level;
        write_bands_to_txt(&self.txtout, &data.klist, &bands)?;

        let frame = BandFrame::new(&data.klist, ticks, labels, &config);
        let mut plot = frame.new_plot(false);
        add_band_traces(&mut plot, &data.klist, &bands, &colour, BandStyle::Lines, seedname);

        save_plot(&plot, &htmlout, self.show, self.to_inline_html)?;
        if let (Some(imgout), Some(format)) = (imgout, imgformat) {
            save_image(&plot, &imgout, format, frame.figsize)?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn fixture(fname: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join(fname)
    }

    #[test]
    fn test_process() {
        let tmpdir = TempDir::new("bandcmp_test").unwrap();
        let config = tmpdir.path().join("qe.in");
        fs::write(&config, format!("\
fermi_level 6.2
yrange -6 4
seedname silicon
figsize 5 4
colour  black
filband {}
ppfile  {}
klabels L G X
", fixture("silicon.bands.dat.gnu").display(), fixture("silicon.bands.out").display())).unwrap();

        let cmd = Qe {
            config: Some(config),
            gen_template: false,
            htmlout: Some(tmpdir.path().join("silicon.html")),
            imgout: None,
            txtout: tmpdir.path().join("band.txt"),
            show: false,
            to_inline_html: false,
        };
        cmd.process().unwrap();

        assert!(tmpdir.path().join("silicon.html").is_file());
        let txt = fs::read_to_string(tmpdir.path().join("band.txt")).unwrap();
        assert_eq!(txt.lines().count(), 1 + 5);
        assert_eq!(txt.lines().nth(1).unwrap().split_whitespace().count(), 1 + 4);
    }

    #[test]
    fn test_missing_files_in_config() {
        let tmpdir = TempDir::new("bandcmp_test").unwrap();
        let config = tmpdir.path().join("qe.in");
        fs::write(&config, "fermi_level 6.2\nyrange -6 4\nseedname silicon\n").unwrap();

        let cmd = Qe {
            config: Some(config),
            gen_template: false,
            htmlout: Some(tmpdir.path().join("silicon.html")),
            imgout: None,
            txtout: tmpdir.path().join("band.txt"),
            show: false,
            to_inline_html: false,
        };
        assert!(cmd.process().is_err());
        assert!(!tmpdir.path().join("silicon.html").exists());
    }

    #[test]
    fn test_unknown_image_format_writes_nothing() {
        let tmpdir = TempDir::new("bandcmp_test").unwrap();
        let config = tmpdir.path().join("qe.in");
        fs::write(&config, format!("fermi_level 6.2\nyrange -6 4\nseedname silicon\nfilband {}\nppfile {}\n",
                                   fixture("silicon.bands.dat.gnu").display(),
                                   fixture("silicon.bands.out").display())).unwrap();

        let cmd = Qe {
            config: Some(config),
            gen_template: false,
            htmlout: Some(tmpdir.path().join("silicon.html")),
            imgout: Some(tmpdir.path().join("silicon.jpg")),
            txtout: tmpdir.path().join("band.txt"),
            show: false,
            to_inline_html: false,
        };
        assert!(cmd.process().is_err());
        assert!(!tmpdir.path().join("band.txt").exists());
        assert!(!tmpdir.path().join("silicon.html").exists());
    }
}
