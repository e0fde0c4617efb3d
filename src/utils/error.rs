// src/utils/error.rs
use crate::types::{Digest, Profile};
use std::io;
use thiserror::Error;

/// Failure reported by an algorithm backend while computing a digest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    /// The backend cannot process this input (e.g. an empty password for NeoScrypt)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backend itself failed (bad parameters, library error, failed self-test)
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Failure to resolve a profile to a usable algorithm
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Nothing was registered for the profile
    #[error("unknown profile {0}")]
    UnknownProfile(Profile),

    /// Registered, but the backend failed its availability probe
    #[error("algorithm for profile {profile} is unavailable: {reason}")]
    Unavailable {
        /// Profile that was requested
        profile: Profile,
        /// Probe failure recorded at registry initialization
        reason: String,
    },
}

/// Errors returned by [`crate::pow::HashEngine::hash`]
///
/// None of these are retryable within the process lifetime. A caller must
/// never treat any of them as a digest, in particular not as a zero digest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The profile has no registered algorithm
    #[error("unknown profile {0}")]
    UnknownProfile(Profile),

    /// The profile's backend failed its initialization probe
    #[error("algorithm for profile {profile} is unavailable: {reason}")]
    AlgorithmUnavailable {
        /// Profile that was requested
        profile: Profile,
        /// Probe failure recorded at registry initialization
        reason: String,
    },

    /// The backend was available but rejected or failed on this input
    #[error("profile {profile}: {source}")]
    Compute {
        /// Profile that was requested
        profile: Profile,
        /// Underlying backend error
        #[source]
        source: AlgorithmError,
    },
}

impl From<LookupError> for HashError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::UnknownProfile(profile) => HashError::UnknownProfile(profile),
            LookupError::Unavailable { profile, reason } => {
                HashError::AlgorithmUnavailable { profile, reason }
            }
        }
    }
}

/// Registry configuration errors, fatal at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two algorithms were registered for the same profile
    #[error("profile {profile} already registered to {existing}, refusing {rejected}")]
    Conflict {
        /// Contested profile
        profile: Profile,
        /// Name of the algorithm registered first
        existing: &'static str,
        /// Name of the algorithm that was refused
        rejected: &'static str,
    },

    /// A backend could not be constructed for the profile
    #[error("cannot build algorithm for profile {profile}: {source}")]
    Construction {
        /// Profile being registered
        profile: Profile,
        /// Underlying backend error
        #[source]
        source: AlgorithmError,
    },
}

/// Invalid difficulty target encodings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Compact encoding has the sign bit set on a non-zero mantissa
    #[error("compact target {0:#010x} is negative")]
    Negative(u32),

    /// Compact encoding does not fit in 256 bits
    #[error("compact target {0:#010x} overflows 256 bits")]
    Overflow(u32),

    /// Hex form is malformed or not 32 bytes
    #[error("invalid target hex: {0}")]
    Hex(String),
}

/// Outcome of validating a received header against its target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The digest could not be computed, so the header cannot be accepted
    #[error("header is unverifiable: {0}")]
    Unverifiable(#[from] HashError),

    /// The digest is above the target
    #[error("digest {digest} does not meet target {target}")]
    InsufficientWork {
        /// Computed digest
        digest: Digest,
        /// Target rendered as big-endian hex
        target: String,
    },
}

/// Main error type for the node application
///
/// Wraps the domain errors above together with I/O, parsing and
/// configuration failures from the command-line front end.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Hash engine errors
    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    /// Registry initialization errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Header validation errors
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Target decoding errors
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Worker thread setup or join errors
    #[error("Thread error: {0}")]
    ThreadError(String),
}

/// Converts hex decoding errors into NodeError
///
/// Used when headers or digests supplied on the command line are not valid hex.
impl From<hex::FromHexError> for NodeError {
    fn from(e: hex::FromHexError) -> Self {
        NodeError::InputError(format!("Hex conversion failed: {}", e))
    }
}

/// Converts rayon pool construction errors into NodeError
impl From<rayon::ThreadPoolBuildError> for NodeError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        NodeError::ThreadError(format!("Thread pool setup failed: {}", e))
    }
}
