//! The fixed set of prompts the define program emits, one group per
//! menu.
//!
//! The sources mirror the program's terminal output verbatim, carriage
//! returns included, since patterns run against the raw byte stream.
//! Capture groups are positional and documented on each field.

use crate::Result;
use predefine::Pattern;

/// Compiled prompt patterns for a whole define session.
///
/// Built once when a session opens so that a malformed pattern is
/// reported before any interaction happens.
#[derive(Debug)]
pub struct Prompts {
    /// Control-file import and title questions.
    pub setup: SetupPrompts,
    /// Molecular geometry menu.
    pub geometry: GeometryPrompts,
    /// Atomic attribute menu.
    pub basis: BasisPrompts,
    /// Occupation number and molecular orbital menu.
    pub occupation: OccupationPrompts,
    /// General menu.
    pub general: GeneralPrompts,
    /// DFT sub-menu of the general menu.
    pub dft: DftPrompts,
    /// RI sub-menus of the general menu.
    pub ri: RiPrompts,
}

/// Prompts shown before the first menu.
#[derive(Debug)]
pub struct SetupPrompts {
    /// Offer to import settings from an existing control file.
    pub import: Pattern,
    /// Prompt for the input file title.
    pub title: Pattern,
}

/// Prompts of the geometry menu.
#[derive(Debug)]
pub struct GeometryPrompts {
    /// Menu headline; captures the atom count (1) and the symmetry
    /// group (2).
    pub headline: Pattern,
    /// Tail of the command list, the menu accepts input.
    pub command: Pattern,
    /// Confirmation asked when leaving without internal coordinates.
    pub internal_coords: Pattern,
}

/// Prompts of the atomic attribute menu.
#[derive(Debug)]
pub struct BasisPrompts {
    /// Menu headline; captures the atom count (1), the basis set
    /// count (2) and the core potential count (3).
    pub headline: Pattern,
    /// Tail of the command list, the menu accepts input.
    pub goback: Pattern,
    /// A nickname was not found; captures the catalogue file (1) and
    /// the nickname (2).
    pub not_catalogued: Pattern,
}

/// Prompts of the occupation menu and the question loop that follows
/// an extended Hückel guess.
#[derive(Debug)]
pub struct OccupationPrompts {
    /// Menu headline.
    pub headline: Pattern,
    /// Tail of the command list, the menu accepts input.
    pub help: Pattern,
    /// Offer to use default parameters.
    pub defaults: Pattern,
    /// Prompt for the molecular charge.
    pub charge: Pattern,
    /// Offer to accept the computed occupation.
    pub accept: Pattern,
    /// Offer to write natural orbitals.
    pub natural_orbitals: Pattern,
}

/// Prompts of the general menu.
#[derive(Debug)]
pub struct GeneralPrompts {
    /// Menu headline.
    pub headline: Pattern,
    /// Footer of the topic list, the menu accepts input.
    pub footer: Pattern,
}

/// Prompts of the DFT sub-menu.
#[derive(Debug)]
pub struct DftPrompts {
    /// Status block printed on entry and after every command; captures
    /// the inactivity marker (1), the functional (2) and the grid (3).
    pub status: Pattern,
    /// A functional was rejected; captures its name (1).
    pub unsupported_functional: Pattern,
    /// A grid was rejected; captures its name (1).
    pub unsupported_grid: Pattern,
}

/// Prompts of the RI sub-menus.
#[derive(Debug)]
pub struct RiPrompts {
    /// Status line printed on entry and after every command; captures
    /// the inactivity marker (1).
    pub status: Pattern,
    /// Headline of the multipole acceleration sub-menu.
    pub marij: Pattern,
}

impl Prompts {
    /// Compile the full pattern library.
    pub fn new() -> Result<Self> {
        Ok(Self {
            setup: SetupPrompts {
                import: Pattern::new(
                    r"THEN ENTER ITS LOCATION/NAME OR OTHERWISE HIT >return<\.\r\n\r\n",
                )?,
                title: Pattern::new(
                    "TO REPEAT DEFINITION OF DEFAULT INPUT FILE",
                )?,
            },
            geometry: GeometryPrompts {
                headline: Pattern::new(
                    r"SPECIFICATION OF MOLECULAR GEOMETRY \(\s*#ATOMS=(\d+)\s*SYMMETRY=([a-zA-Z_0-9]+)\s+\)",
                )?,
                command: Pattern::new("OF THAT COMMAND MAY BE GIVEN")?,
                internal_coords: Pattern::new(
                    r"IF YOU DO NOT WANT TO USE INTERNAL COORDINATES ENTER\s+no",
                )?,
            },
            basis: BasisPrompts {
                headline: Pattern::new(
                    r"ATOMIC ATTRIBUTE DEFINITION MENU\s*\(\s*#atoms=(\d+)\s*#bas=(\d+)\s*#ecp=(\d+)\s*\)",
                )?,
                goback: Pattern::new(r"GOBACK=& \(TO GEOMETRY MENU !\)\r\n")?,
                not_catalogued: Pattern::new(
                    r"THERE ARE NO DATA SETS CATALOGUED IN FILE\s*\r\n(.+)\r\n\s*CORRESPONDING TO NICKNAME\s*([^\n]+)\r\n",
                )?,
            },
            occupation: OccupationPrompts {
                headline: Pattern::new(
                    "OCCUPATION NUMBER & MOLECULAR ORBITAL DEFINITION MENU",
                )?,
                help: Pattern::new(
                    r"FOR EXPLANATIONS APPEND A QUESTION MARK \(\?\) TO ANY COMMAND",
                )?,
                defaults: Pattern::new(
                    r"DO YOU WANT THE DEFAULT.+\r\n|DO YOU WANT THESE\s*?.+\r\n",
                )?,
                charge: Pattern::new(r"ENTER THE MOLECULAR CHARGE.+\r\n")?,
                accept: Pattern::new(r"DO YOU ACCEPT THIS OCCUPATION\s*\?")?,
                natural_orbitals: Pattern::new(
                    r"DO YOU REALLY WANT TO WRITE OUT NATURAL ORBITALS\s\?.+\r\n",
                )?,
            },
            general: GeneralPrompts {
                headline: Pattern::new("GENERAL MENU : SELECT YOUR TOPIC")?,
                footer: Pattern::new(r"\* or q\s*: END OF DEFINE SESSION")?,
            },
            dft: DftPrompts {
                status: Pattern::new(
                    r"DFT is (NOT )?used\s*\r\n\s*functional\s+(\S+)\s*\r\n\s*gridsize\s+(\S+)",
                )?,
                unsupported_functional: Pattern::new(
                    r"SPECIFIED FUNCTIONAL\s+(\S+)\s+IS NOT SUPPORTED",
                )?,
                unsupported_grid: Pattern::new(
                    r"SPECIFIED GRID\s+(\S+)\s+IS NOT SUPPORTED",
                )?,
            },
            ri: RiPrompts {
                status: Pattern::new(r"RI(?:JK)?\s+IS\s+(NOT\s+)?USED")?,
                marij: Pattern::new(
                    r"MULTIPOLE ACCELERATED RI-J \(MARI-J\)",
                )?,
            },
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        Prompts::new().unwrap();
    }

    #[test]
    fn geometry_headline_captures() {
        let prompts = Prompts::new().unwrap();
        let caps = prompts
            .geometry
            .headline
            .captures(
                "SPECIFICATION OF MOLECULAR GEOMETRY ( #ATOMS=17 SYMMETRY=c2v )\r\n",
            )
            .unwrap();
        assert_eq!(caps[1].as_deref(), Some("17"));
        assert_eq!(caps[2].as_deref(), Some("c2v"));
    }

    #[test]
    fn basis_headline_captures() {
        let prompts = Prompts::new().unwrap();
        let caps = prompts
            .basis
            .headline
            .captures(
                "ATOMIC ATTRIBUTE DEFINITION MENU  ( #atoms=5 #bas=3 #ecp=0 )\r\n",
            )
            .unwrap();
        assert_eq!(caps[1].as_deref(), Some("5"));
        assert_eq!(caps[2].as_deref(), Some("3"));
        assert_eq!(caps[3].as_deref(), Some("0"));
    }

    #[test]
    fn missing_nickname_captures() {
        let prompts = Prompts::new().unwrap();
        let text = "THERE ARE NO DATA SETS CATALOGUED IN FILE\r\n\
                    /opt/turbomole/basen/c\r\n\
                    CORRESPONDING TO NICKNAME def2-XXX\r\n";
        let caps = prompts.basis.not_catalogued.captures(text).unwrap();
        assert_eq!(caps[1].as_deref(), Some("/opt/turbomole/basen/c"));
        assert_eq!(caps[2].as_deref(), Some("def2-XXX"));
    }

    #[test]
    fn occupation_prompt_variants() {
        let prompts = Prompts::new().unwrap();
        assert!(prompts.occupation.defaults.is_match(
            "DO YOU WANT THE DEFAULT PARAMETERS? DEFAULT=y\r\n"
        ));
        assert!(prompts
            .occupation
            .defaults
            .is_match("DO YOU WANT THESE ORBITALS? DEFAULT=y\r\n"));
        assert!(prompts
            .occupation
            .charge
            .is_match("ENTER THE MOLECULAR CHARGE DEFAULT=0\r\n"));
        assert!(prompts
            .occupation
            .accept
            .is_match("DO YOU ACCEPT THIS OCCUPATION ?"));
        assert!(prompts.occupation.natural_orbitals.is_match(
            "DO YOU REALLY WANT TO WRITE OUT NATURAL ORBITALS ? DEFAULT=n\r\n"
        ));
    }

    #[test]
    fn dft_status_captures() {
        let prompts = Prompts::new().unwrap();
        let off = "DFT is NOT used\r\n functional   b-p\r\n gridsize     m3\r\n";
        let caps = prompts.dft.status.captures(off).unwrap();
        assert_eq!(caps[1].as_deref(), Some("NOT "));
        assert_eq!(caps[2].as_deref(), Some("b-p"));
        assert_eq!(caps[3].as_deref(), Some("m3"));

        let on = "DFT is used\r\n functional   b3-lyp\r\n gridsize     m4\r\n";
        let caps = prompts.dft.status.captures(on).unwrap();
        assert_eq!(caps[1], None);
        assert_eq!(caps[2].as_deref(), Some("b3-lyp"));
    }

    #[test]
    fn ri_status_captures() {
        let prompts = Prompts::new().unwrap();
        let caps = prompts.ri.status.captures("RI IS NOT USED\r\n").unwrap();
        assert!(caps[1].is_some());
        let caps = prompts.ri.status.captures("RIJK IS USED\r\n").unwrap();
        assert_eq!(caps[1], None);
    }

    #[test]
    fn general_menu_footer() {
        let prompts = Prompts::new().unwrap();
        assert!(prompts
            .general
            .footer
            .is_match("* or q : END OF DEFINE SESSION\r\n"));
    }
}
