// src/pow/engine.rs
//! Hash engine facade
//!
//! The single entry point for miners and validators: resolve the profile in
//! the registry, run the backend once, return its digest or a typed error.

use crate::pow::registry::Registry;
use crate::types::{Digest, Profile};
use crate::utils::error::{HashError, RegistryError};
use std::sync::Arc;

/// Stateless dispatcher over a published [`Registry`]
///
/// Cloning is cheap and every clone shares the same registry, so one engine
/// can be handed to any number of mining or validation threads.
#[derive(Clone)]
pub struct HashEngine {
    registry: Arc<Registry>,
}

impl HashEngine {
    /// Creates an engine over an already probed registry
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Creates an engine over [`Registry::with_defaults`]
    pub fn with_defaults() -> Result<Self, RegistryError> {
        Ok(Self::new(Arc::new(Registry::with_defaults()?)))
    }

    /// Computes the proof-of-work digest of `input` under `profile`
    ///
    /// # Arguments
    /// * `input` - Serialized header, passed through to the backend unchanged
    /// * `profile` - Algorithm selector
    ///
    /// # Returns
    /// - `Ok(Digest)` - the 32-byte digest
    /// - `Err(HashError::UnknownProfile)` - nothing registered for `profile`
    /// - `Err(HashError::AlgorithmUnavailable)` - the backend failed its probe
    /// - `Err(HashError::Compute)` - the backend rejected the input
    pub fn hash(&self, input: &[u8], profile: Profile) -> Result<Digest, HashError> {
        let algorithm = self.registry.lookup(profile)?;
        algorithm
            .compute(input)
            .map_err(|source| HashError::Compute { profile, source })
    }

    /// The registry this engine dispatches over
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::algorithm::Algorithm;
    use crate::utils::error::AlgorithmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations so the one-call-per-request rule can be checked
    struct Counting {
        calls: AtomicUsize,
    }

    impl Algorithm for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn compute(&self, input: &[u8]) -> Result<Digest, AlgorithmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut out = [0xAAu8; 32];
            out[0] = input.len() as u8;
            Ok(Digest::from_bytes(out))
        }

        fn self_test(&self) -> Result<(), AlgorithmError> {
            Ok(())
        }
    }

    struct Rejecting;

    impl Algorithm for Rejecting {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn compute(&self, _input: &[u8]) -> Result<Digest, AlgorithmError> {
            Err(AlgorithmError::InvalidInput("too short".into()))
        }

        fn self_test(&self) -> Result<(), AlgorithmError> {
            Ok(())
        }
    }

    #[test]
    fn backend_runs_exactly_once_per_request() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let mut builder = Registry::builder();
        builder.register(Profile::new(7), counting.clone()).unwrap();
        let engine = HashEngine::new(Arc::new(builder.probe_availability()));

        let digest = engine.hash(&[1, 2, 3, 4, 5], Profile::new(7)).unwrap();
        assert_eq!(digest.as_bytes()[0], 5);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backend_errors_carry_the_profile() {
        let mut builder = Registry::builder();
        builder.register(Profile::new(8), Arc::new(Rejecting)).unwrap();
        let engine = HashEngine::new(Arc::new(builder.probe_availability()));

        assert_eq!(
            engine.hash(b"x", Profile::new(8)),
            Err(HashError::Compute {
                profile: Profile::new(8),
                source: AlgorithmError::InvalidInput("too short".into()),
            })
        );
    }

    #[test]
    fn empty_neoscrypt_input_is_an_error_not_a_digest() {
        let engine = HashEngine::with_defaults().unwrap();
        assert!(matches!(
            engine.hash(&[], Profile::NEOSCRYPT_FTC),
            Err(HashError::Compute { .. })
        ));
    }

    #[test]
    fn equivalent_neoscrypt_profiles_agree() {
        let engine = HashEngine::with_defaults().unwrap();
        let header = [0x42u8; 80];
        assert_eq!(
            engine.hash(&header, Profile::NEOSCRYPT).unwrap(),
            engine.hash(&header, Profile::NEOSCRYPT_FTC).unwrap()
        );
        assert_ne!(
            engine.hash(&header, Profile::SCRYPT).unwrap(),
            engine.hash(&header, Profile::NEOSCRYPT_FTC).unwrap()
        );
    }

    #[test]
    fn clones_share_the_registry() {
        let engine = HashEngine::with_defaults().unwrap();
        let clone = engine.clone();
        assert!(Arc::ptr_eq(engine.registry(), clone.registry()));
    }
}
