use thiserror::Error;

/// Errors generated by the runner.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter has the wrong shape.
    #[error("parameter '{path}' should be {expected}, got {actual}")]
    Schema {
        /// Dotted path of the offending key.
        path: String,
        /// Shape declared for the key.
        expected: String,
        /// Shape that was found.
        actual: String,
    },
    /// A parameter key is not declared anywhere.
    #[error("unknown parameter '{0}'")]
    UnknownKey(String),
    /// A mandatory parameter is absent.
    #[error("missing required parameter '{0}'")]
    MissingKey(String),
    /// A parameter group carries no settings.
    #[error("parameter group '{0}' must not be empty")]
    EmptyGroup(String),
    /// The geometry file has a format no converter is known for.
    #[error("no converter known for geometry file '{0}'")]
    UnsupportedGeometry(String),
    /// The geometry converter failed.
    #[error("failed to convert geometry '{path}': {detail}")]
    GeometryConversion {
        /// Geometry file that was to be converted.
        path: String,
        /// What went wrong.
        detail: String,
    },
    /// The loaded geometry contains no atoms.
    #[error("geometry '{0}' loaded with zero atoms")]
    NoAtoms(String),
    /// A basis set nickname is not in the program's catalogue.
    #[error("basis set '{nickname}' is not catalogued in '{catalog}'")]
    InvalidBasis {
        /// Nickname that was rejected.
        nickname: String,
        /// Catalogue file the program searched.
        catalog: String,
    },
    /// Some atoms are left without a basis set.
    #[error("only {assigned} of {atoms} atoms have a basis set assigned")]
    IncompleteBasis {
        /// Atoms in the molecule.
        atoms: usize,
        /// Atoms with an assignment.
        assigned: usize,
    },
    /// Core potentials survived the removal command.
    #[error("{0} effective core potentials are still assigned after removal")]
    EcpRemoval(usize),
    /// The DFT menu did not confirm activation.
    #[error("the program did not confirm DFT activation")]
    DftActivation,
    /// A density functional is not in the program's list.
    #[error("functional '{0}' is not supported by the program")]
    UnsupportedFunctional(String),
    /// The DFT menu echoed a different functional than requested.
    #[error("requested functional '{requested}' but the program reports '{reported}'")]
    FunctionalMismatch {
        /// Functional that was asked for.
        requested: String,
        /// Functional the program settled on.
        reported: String,
    },
    /// A grid size is not in the program's list.
    #[error("grid '{0}' is not supported by the program")]
    UnsupportedGrid(String),
    /// The DFT menu echoed a different grid than requested.
    #[error("requested grid '{requested}' but the program reports '{reported}'")]
    GridMismatch {
        /// Grid that was asked for.
        requested: String,
        /// Grid the program settled on.
        reported: String,
    },
    /// The RI menu did not confirm activation.
    #[error("the program did not confirm RI activation")]
    RiActivation,
    /// An RI type keyword is not recognized.
    #[error("unknown ri type '{0}', expected one of ri, rij, j, coulomb, rijk, jk, coulomb+exchange")]
    UnknownRiType(String),
    /// A command line could not be split into program and arguments.
    #[error("could not parse command line '{0}'")]
    BadArguments(String),
    /// The program produced output the protocol cannot account for.
    #[error("unexpected output from the program: {0}")]
    UnexpectedOutput(String),
    /// Error from the terminal session.
    #[error(transparent)]
    Session(#[from] predefine::Error),
    /// Error in IO operation.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
