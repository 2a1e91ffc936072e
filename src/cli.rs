use std::sync::OnceLock;
use clap::{
    Parser,
    builder::styling::{
        AnsiColor,
        Effects,
        Styles,
    },
};
use enum_dispatch::enum_dispatch;

use crate::{
    types::Result,
    commands::{
        vasp::Vasp,
        qe::Qe,
    },
};


pub fn get_style() -> Styles {
    static INSTANCE: OnceLock<Styles> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Styles::styled()
            .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
            .usage(AnsiColor::Green.on_default()   | Effects::BOLD)
            .literal(AnsiColor::Green.on_default() | Effects::BOLD)
            .placeholder(AnsiColor::BrightBlue.on_default())
            .error(AnsiColor::BrightRed.on_default())
            .valid(AnsiColor::BrightYellow.on_default())
    }).to_owned()
}


#[enum_dispatch]
pub trait OptProcess {
    fn process(&self) -> Result<()>;
}


#[enum_dispatch(OptProcess)]
#[derive(Debug, Parser)]
#[command(name = "bandcmp",
            about = r"Plot and compare band structures from VASP, Quantum ESPRESSO and Wannier90 outputs.",
            version,
            styles = get_style()
            )]
enum Opt {
    Vasp,

    Qe,
}


pub fn run() -> Result<()> {
    Opt::parse().process()
}


#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        Opt::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let opt = Opt::try_parse_from(["bandcmp", "vasp", "--outcar", "OUTCAR.band", "-c", "band.in"]).unwrap();
        assert!(matches!(opt, Opt::Vasp(_)));

        let opt = Opt::try_parse_from(["bandcmp", "qe", "--gen-template"]).unwrap();
        assert!(matches!(opt, Opt::Qe(_)));

        assert!(Opt::try_parse_from(["bandcmp", "dos"]).is_err());
    }
}
