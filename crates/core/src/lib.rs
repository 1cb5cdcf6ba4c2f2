//! cdma-sim-core: Direct-sequence CDMA channel simulation
//!
//! This library provides the core components for a learning-focused system that:
//! - Encodes text messages into bipolar bit sequences
//! - Spreads every bit over a station-specific chip code
//! - Sums all stations' transmissions onto one shared channel
//! - Recovers each station's message by correlating against its own code
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: MSB-first bit reading/writing
//! - `code`: Spreading codes, Walsh-Hadamard families, orthogonality checks
//! - `encoder`: Text to bipolar bits
//! - `spreading`: Spreading and correlation despreading
//! - `channel`: Superposition of all transmissions
//! - `decoder`: Symbols to text with a configurable trailing-bit policy
//! - `station`: Station identifiers and code/message tables
//! - `simulation`: The encode-all / combine / decode-all pipeline
//! - `metrics`: Observable run statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **No globals**: Station tables are values passed into a simulation
//! - **Deterministic**: Every stage is a pure function of its inputs
//! - **Observable**: Metrics and debug logging for every stage

pub mod bitio;
pub mod channel;
pub mod code;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod simulation;
pub mod spreading;
pub mod station;

// Re-export commonly used types
pub use error::{Error, Result};
