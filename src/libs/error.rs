use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TadError {
    /// An input path does not exist
    MissingInputFile(String),
    /// A genomic header does not look like `name|assembly|chr:start-end`
    InvalidHeaderFormat(String),
    /// Boundary chromosomes are interleaved instead of block-contiguous
    UnsortedInput {
        /// The chromosome that reappeared
        chr: String,
        /// The line number (1-based)
        line: usize,
    },
    /// Both ends of a TAD must sit on one chromosome
    CrossChromosomeTad { left: String, right: String },
    /// A required column is absent from a table header row
    MissingColumn(String),
    /// A data line could not be parsed
    MalformedLine {
        /// The line number (1-based)
        line: usize,
        /// A human-readable message explaining the error
        message: String,
    },
    /// A referenced bin is absent from the insulation profile
    MissingBin(String),
    /// A bin header occurs twice in the insulation profile
    DuplicateBin(String),
    /// Bins carry different assemblies
    InconsistentAssembly { expected: String, found: String },
}

impl fmt::Display for TadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TadError::MissingInputFile(path) => {
                write!(f, "invalid input file! (non-existent) [{}]", path)
            }
            TadError::InvalidHeaderFormat(header) => {
                write!(f, "incorrect header format [{}]", header)
            }
            TadError::UnsortedInput { chr, line } => write!(
                f,
                "improperly sorted boundary file! chromosome [{}] reappears at line {}",
                chr, line
            ),
            TadError::CrossChromosomeTad { left, right } => {
                write!(f, "inter-chromosomal TAD detected [{}] - [{}]", left, right)
            }
            TadError::MissingColumn(name) => write!(f, "missing column [{}]", name),
            TadError::MalformedLine { line, message } => {
                write!(f, "malformed line {}: {}", line, message)
            }
            TadError::MissingBin(header) => {
                write!(f, "bin [{}] not found in insulation profile", header)
            }
            TadError::DuplicateBin(header) => {
                write!(f, "duplicated bin [{}] in insulation profile", header)
            }
            TadError::InconsistentAssembly { expected, found } => write!(
                f,
                "assembly is not constant! expected [{}], found [{}]",
                expected, found
            ),
        }
    }
}

impl std::error::Error for TadError {}
