// src/pow/registry.rs
//! Profile-to-algorithm registry
//!
//! Built once at startup with [`RegistryBuilder`], probed exactly once, and
//! then published as an immutable [`Registry`]. Lookups take `&self` and need
//! no locking; share the registry behind an `Arc`.

use crate::pow::algorithm::Algorithm;
use crate::pow::algorithm::neoscrypt::NeoScrypt;
use crate::pow::algorithm::scrypt::ScryptAlgo;
use crate::types::Profile;
use crate::utils::error::{AlgorithmError, LookupError, RegistryError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Result of the one-time capability probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Availability {
    /// The backend passed its self-test
    Available,
    /// The backend failed its self-test; the reason is kept for diagnostics
    Unavailable(String),
}

impl Availability {
    /// `true` if the backend passed its probe
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// One registered algorithm together with its probe result
#[derive(Clone)]
pub struct Descriptor {
    profile: Profile,
    algorithm: Arc<dyn Algorithm>,
    availability: Availability,
}

impl Descriptor {
    /// Profile the algorithm is registered under
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Name of the registered algorithm
    pub fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Probe outcome recorded at initialization
    pub fn availability(&self) -> &Availability {
        &self.availability
    }
}

/// Collects registrations before the registry is probed and published
#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<Profile, Arc<dyn Algorithm>>,
}

impl RegistryBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `algorithm` under `profile`
    ///
    /// # Errors
    /// `RegistryError::Conflict` if the profile is already taken. The first
    /// registration is kept; the caller should treat the error as fatal.
    pub fn register(
        &mut self,
        profile: Profile,
        algorithm: Arc<dyn Algorithm>,
    ) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.entries.get(&profile) {
            return Err(RegistryError::Conflict {
                profile,
                existing: existing.name(),
                rejected: algorithm.name(),
            });
        }
        self.entries.insert(profile, algorithm);
        Ok(self)
    }

    /// Number of registrations so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every backend's self-test once and publishes the registry
    ///
    /// A failing or panicking probe marks only that profile unavailable.
    pub fn probe_availability(self) -> Registry {
        let descriptors = self
            .entries
            .into_iter()
            .map(|(profile, algorithm)| {
                let availability = match probe(algorithm.as_ref()) {
                    Ok(()) => {
                        log::info!("Profile {} ({}) available", profile, algorithm.name());
                        Availability::Available
                    }
                    Err(e) => {
                        log::warn!(
                            "Profile {} ({}) unavailable: {}",
                            profile,
                            algorithm.name(),
                            e
                        );
                        Availability::Unavailable(e.to_string())
                    }
                };
                (
                    profile,
                    Descriptor {
                        profile,
                        algorithm,
                        availability,
                    },
                )
            })
            .collect();

        Registry { descriptors }
    }
}

fn probe(algorithm: &dyn Algorithm) -> Result<(), AlgorithmError> {
    panic::catch_unwind(AssertUnwindSafe(|| algorithm.self_test())).unwrap_or_else(|_| {
        Err(AlgorithmError::Backend(format!(
            "{} panicked during self-test",
            algorithm.name()
        )))
    })
}

/// Immutable profile-to-algorithm mapping with availability flags
pub struct Registry {
    descriptors: BTreeMap<Profile, Descriptor>,
}

impl Registry {
    /// Starts a new registration
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry with every built-in algorithm, already probed
    ///
    /// | Profile      | Algorithm                  |
    /// |--------------|----------------------------|
    /// | `0x00000003` | Scrypt, N=1024 r=1 p=1     |
    /// | `0x00000000` | NeoScrypt, N=128 r=2       |
    /// | `0x80000620` | NeoScrypt, N=128 r=2 (FTC) |
    ///
    /// The two NeoScrypt profiles decode to the same parameters and are
    /// registered as separate, equivalent entries.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let scrypt = ScryptAlgo::litecoin().map_err(|source| RegistryError::Construction {
            profile: Profile::SCRYPT,
            source,
        })?;

        let mut builder = RegistryBuilder::new();
        builder.register(Profile::SCRYPT, Arc::new(scrypt))?;
        for profile in [Profile::NEOSCRYPT, Profile::NEOSCRYPT_FTC] {
            let neoscrypt = NeoScrypt::from_profile(profile)
                .map_err(|source| RegistryError::Construction { profile, source })?;
            builder.register(profile, Arc::new(neoscrypt))?;
        }
        Ok(builder.probe_availability())
    }

    /// Resolves a profile to its algorithm
    ///
    /// # Errors
    /// * `LookupError::UnknownProfile` - nothing registered for `profile`
    /// * `LookupError::Unavailable` - registered but the probe failed
    pub fn lookup(&self, profile: Profile) -> Result<&dyn Algorithm, LookupError> {
        let descriptor = self
            .descriptors
            .get(&profile)
            .ok_or(LookupError::UnknownProfile(profile))?;

        match &descriptor.availability {
            Availability::Available => Ok(descriptor.algorithm.as_ref()),
            Availability::Unavailable(reason) => Err(LookupError::Unavailable {
                profile,
                reason: reason.clone(),
            }),
        }
    }

    /// Probe outcome for `profile`, or `None` if unregistered
    pub fn availability(&self, profile: Profile) -> Option<&Availability> {
        self.descriptors.get(&profile).map(|d| &d.availability)
    }

    /// `true` if `profile` is registered and passed its probe
    pub fn is_available(&self, profile: Profile) -> bool {
        self.availability(profile)
            .is_some_and(Availability::is_available)
    }

    /// All descriptors, ordered by profile
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// `true` if no profile is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Digest;

    struct Fixed(&'static str, u8);

    impl Algorithm for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn compute(&self, _input: &[u8]) -> Result<Digest, AlgorithmError> {
            Ok(Digest::from_bytes([self.1; 32]))
        }
    }

    struct MissingBackend;

    impl Algorithm for MissingBackend {
        fn name(&self) -> &'static str {
            "missing"
        }

        fn compute(&self, _input: &[u8]) -> Result<Digest, AlgorithmError> {
            Err(AlgorithmError::Backend("library not loaded".into()))
        }

        fn self_test(&self) -> Result<(), AlgorithmError> {
            Err(AlgorithmError::Backend("library not loaded".into()))
        }
    }

    struct Panicking;

    impl Algorithm for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn compute(&self, _input: &[u8]) -> Result<Digest, AlgorithmError> {
            panic!("backend exploded")
        }
    }

    #[test]
    fn duplicate_registration_is_a_conflict() {
        let mut builder = Registry::builder();
        builder
            .register(Profile::new(1), Arc::new(Fixed("first", 1)))
            .unwrap();
        let err = builder
            .register(Profile::new(1), Arc::new(Fixed("second", 2)))
            .err()
            .unwrap();

        assert_eq!(
            err,
            RegistryError::Conflict {
                profile: Profile::new(1),
                existing: "first",
                rejected: "second",
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn registering_one_profile_leaves_others_untouched() {
        let mut builder = Registry::builder();
        builder
            .register(Profile::new(0xA), Arc::new(Fixed("a", 0xA)))
            .unwrap();
        let registry = builder.probe_availability();

        assert!(registry.lookup(Profile::new(0xA)).is_ok());
        assert_eq!(
            registry.lookup(Profile::new(0xB)).err(),
            Some(LookupError::UnknownProfile(Profile::new(0xB)))
        );
        assert!(registry.availability(Profile::new(0xB)).is_none());
    }

    #[test]
    fn failed_probe_marks_only_that_profile_unavailable() {
        let mut builder = Registry::builder();
        builder
            .register(Profile::new(1), Arc::new(Fixed("ok", 1)))
            .unwrap()
            .register(Profile::new(2), Arc::new(MissingBackend))
            .unwrap()
            .register(Profile::new(3), Arc::new(Panicking))
            .unwrap();
        let registry = builder.probe_availability();

        assert!(registry.is_available(Profile::new(1)));
        assert!(!registry.is_available(Profile::new(2)));
        assert!(!registry.is_available(Profile::new(3)));

        match registry.lookup(Profile::new(2)) {
            Err(LookupError::Unavailable { profile, reason }) => {
                assert_eq!(profile, Profile::new(2));
                assert!(reason.contains("library not loaded"));
            }
            _ => panic!("expected Unavailable"),
        }
        assert!(matches!(
            registry.availability(Profile::new(3)),
            Some(Availability::Unavailable(reason)) if reason.contains("panicked")
        ));
    }

    #[test]
    fn descriptors_are_ordered_by_profile() {
        let mut builder = Registry::builder();
        for raw in [9u32, 2, 5] {
            builder
                .register(Profile::new(raw), Arc::new(Fixed("f", raw as u8)))
                .unwrap();
        }
        let registry = builder.probe_availability();
        let order: Vec<u32> = registry.descriptors().map(|d| d.profile().value()).collect();
        assert_eq!(order, vec![2, 5, 9]);
    }

    #[test]
    fn defaults_register_and_pass_probes() {
        let registry = Registry::with_defaults().unwrap();
        assert_eq!(registry.len(), 3);
        for profile in [Profile::SCRYPT, Profile::NEOSCRYPT, Profile::NEOSCRYPT_FTC] {
            assert!(registry.is_available(profile), "{} should be available", profile);
        }
        assert_eq!(registry.lookup(Profile::SCRYPT).unwrap().name(), "scrypt");
        assert_eq!(
            registry.lookup(Profile::NEOSCRYPT_FTC).unwrap().name(),
            "neoscrypt"
        );
    }

    #[test]
    fn availability_serializes_with_reason() {
        let json = serde_json::to_string(&Availability::Unavailable("gone".into())).unwrap();
        assert_eq!(json, r#"{"status":"unavailable","reason":"gone"}"#);
        let json = serde_json::to_string(&Availability::Available).unwrap();
        assert_eq!(json, r#"{"status":"available"}"#);
    }
}
