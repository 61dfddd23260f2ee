use core::fmt;

/// Result alias for `terse`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by matrix construction, scoring, and reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input label set or matrix was empty.
    EmptyInput,

    /// Matrix dimension mismatch (not square, or rows != labels).
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A matrix entry differs from its transpose beyond tolerance.
    Asymmetric {
        /// Row label of the offending entry.
        row: String,
        /// Column label of the offending entry.
        col: String,
        /// Absolute difference between the entry and its transpose.
        delta: f64,
    },

    /// A similarity value was non-finite or outside [0, 1].
    InvalidSimilarity {
        /// Row label of the offending entry.
        row: String,
        /// Column label of the offending entry.
        col: String,
        /// The offending value.
        value: f64,
    },

    /// The same label appeared more than once.
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// A label was requested that the matrix does not contain.
    UnknownLabel {
        /// The unknown label.
        label: String,
    },

    /// Cut threshold outside (0, 1].
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },

    /// Provided scores do not cover every matrix label.
    MissingScores {
        /// Labels without a score, sorted.
        labels: Vec<String>,
    },

    /// A provided score was non-finite.
    InvalidScore {
        /// Label carrying the bad score.
        label: String,
        /// The offending value.
        value: f64,
    },

    /// An external collaborator could not resolve a label.
    Lookup {
        /// The label that failed to resolve.
        label: String,
        /// Collaborator-supplied detail.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::Asymmetric { row, col, delta } => {
                write!(f, "matrix not symmetric at ({row}, {col}): |a - a'| = {delta:e}")
            }
            Error::InvalidSimilarity { row, col, value } => {
                write!(f, "invalid similarity {value} at ({row}, {col})")
            }
            Error::DuplicateLabel { label } => write!(f, "duplicate label '{label}'"),
            Error::UnknownLabel { label } => write!(f, "label '{label}' not present in matrix"),
            Error::InvalidThreshold { value } => {
                write!(f, "threshold {value} not in (0, 1]")
            }
            Error::MissingScores { labels } => {
                write!(
                    f,
                    "scores missing for {} label(s): {}",
                    labels.len(),
                    labels.join(", ")
                )
            }
            Error::InvalidScore { label, value } => {
                write!(f, "score for '{label}' is {value}, not a finite number")
            }
            Error::Lookup { label, message } => {
                write!(f, "lookup failed for '{label}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
