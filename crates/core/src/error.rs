//! Error types for the cdma-sim system.
//!
//! All operations return structured errors rather than panicking.
//! Errors raised inside one station's pipeline stay attached to that
//! station; only the channel length check is fatal to a whole run.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Encode: message text that cannot be represented in 8-bit characters
/// - Code: malformed spreading codes or code tables
/// - Channel: chip sequences or signals with incompatible lengths
/// - Decode: symbol streams that do not pack into whole characters
/// - Station: inconsistent station tables
#[derive(Debug, Error)]
pub enum Error {
    /// Message encoding failed
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Spreading code construction or validation failed
    #[error("spreading code error: {0}")]
    Code(#[from] CodeError),

    /// Combine or despread received sequences of the wrong length
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Symbol decoding failed
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Station table is inconsistent
    #[error("station error: {0}")]
    Station(#[from] StationError),
}

/// Bit encoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Character code point does not fit into 8 bits
    #[error("character {character:?} (U+{code_point:04X}) at position {position} does not fit in 8 bits")]
    CharacterOutOfRange {
        character: char,
        code_point: u32,
        position: usize,
    },
}

/// Spreading code errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// A spreading code must contain at least one chip
    #[error("spreading code is empty")]
    Empty,

    /// Chips must be exactly -1 or +1
    #[error("invalid chip value {value} at index {index}: chips must be -1 or +1")]
    InvalidChip { index: usize, value: i32 },

    /// All codes sharing one channel must have the same chip length
    #[error("chip length mismatch for station {station}: expected {expected}, got {actual}")]
    ChipLengthMismatch {
        station: String,
        expected: usize,
        actual: usize,
    },

    /// Two codes correlate beyond the accepted tolerance
    #[error("codes for {first} and {second} are not orthogonal (cross-correlation {correlation})")]
    NotOrthogonal {
        first: String,
        second: String,
        correlation: i64,
    },

    /// Walsh-Hadamard order must be a non-zero power of two
    #[error("invalid Walsh-Hadamard order {0}: must be a non-zero power of two")]
    InvalidWalshOrder(usize),

    /// Requested Walsh-Hadamard row does not exist at this order
    #[error("Walsh-Hadamard row {row} does not exist at order {order}")]
    WalshRowOutOfRange { row: usize, order: usize },
}

/// Channel errors (the LengthMismatch family).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Sequences summed onto one channel must have equal length
    #[error("chip sequence {index} has length {actual}, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Signal length is not a whole number of code blocks
    #[error("signal length {signal_len} is not a multiple of chip length {chip_length}")]
    PartialBlock { signal_len: usize, chip_length: usize },
}

/// Symbol decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The final bit group is shorter than a full character
    #[error("truncated bit group: {trailing_bits} trailing bits do not form a character")]
    TruncatedBitGroup { trailing_bits: usize },
}

/// Station table errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StationError {
    /// Station identifier registered twice
    #[error("duplicate station {0}")]
    Duplicate(String),

    /// Station has a message but no spreading code
    #[error("station {0} has no spreading code")]
    MissingCode(String),

    /// Station identifier must not be blank
    #[error("station identifier must not be empty")]
    EmptyId,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
