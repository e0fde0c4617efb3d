// src/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of every proof-of-work digest
pub const DIGEST_LEN: usize = 32;

/// Opaque identifier selecting a proof-of-work algorithm and its tuning
///
/// Dispatch treats the value as a plain key. The bit layout only matters when
/// a NeoScrypt-family backend is constructed from it
/// (see [`crate::pow::algorithm::neoscrypt::NeoScryptParams::from_profile`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "String")]
pub struct Profile(u32);

impl Profile {
    /// Scrypt with N=1024, r=1, p=1 and the input as its own salt
    pub const SCRYPT: Profile = Profile(0x0000_0003);

    /// NeoScrypt with its default parameters (N=128, r=2)
    pub const NEOSCRYPT: Profile = Profile(0x0000_0000);

    /// NeoScrypt as selected by Feathercoin, with explicit N=128, r=2
    pub const NEOSCRYPT_FTC: Profile = Profile(0x8000_0620);

    /// Wraps a raw profile value
    pub const fn new(raw: u32) -> Self {
        Profile(raw)
    }

    /// Returns the raw profile value
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Profile {
    fn from(raw: u32) -> Self {
        Profile(raw)
    }
}

impl From<Profile> for String {
    fn from(profile: Profile) -> Self {
        profile.to_string()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "scrypt" => return Ok(Profile::SCRYPT),
            "neoscrypt" => return Ok(Profile::NEOSCRYPT_FTC),
            _ => {}
        }

        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse::<u32>(),
        };
        parsed
            .map(Profile)
            .map_err(|_| format!("Unknown profile: {}", s))
    }
}

/// Profile as written in a configuration file: either a number or a name/hex string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProfile {
    Number(u32),
    Text(String),
}

impl TryFrom<RawProfile> for Profile {
    type Error = String;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        match raw {
            RawProfile::Number(n) => Ok(Profile(n)),
            RawProfile::Text(s) => s.parse(),
        }
    }
}

/// Fixed-size proof-of-work digest
///
/// There is deliberately no `Default`: a digest either comes out of an
/// algorithm or is parsed from its hex form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wraps raw digest bytes
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// Returns the digest bytes
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Consumes the digest, returning its bytes
    pub const fn into_bytes(self) -> [u8; DIGEST_LEN] {
        self.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Digest(bytes))
    }
}

/// Networks the node can join
///
/// The network decides the default peer port and the bootstrap seed list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    #[clap(name = "mainnet")]
    Mainnet,

    /// Public test network
    #[clap(name = "testnet")]
    Testnet,
}

impl Network {
    /// Default P2P port for the network
    pub const fn port(self) -> u16 {
        match self {
            Network::Mainnet => 9336,
            Network::Testnet => 19336,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Mainnet),
            "test" | "testnet" => Ok(Network::Testnet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_hex_decimal_and_names() {
        assert_eq!("0x3".parse::<Profile>().unwrap(), Profile::SCRYPT);
        assert_eq!("3".parse::<Profile>().unwrap(), Profile::SCRYPT);
        assert_eq!("0x80000620".parse::<Profile>().unwrap(), Profile::NEOSCRYPT_FTC);
        assert_eq!("NeoScrypt".parse::<Profile>().unwrap(), Profile::NEOSCRYPT_FTC);
        assert_eq!("scrypt".parse::<Profile>().unwrap(), Profile::SCRYPT);
        assert!("x11".parse::<Profile>().is_err());
        assert!("0x1_0000_0000".parse::<Profile>().is_err());
    }

    #[test]
    fn profile_displays_as_padded_hex() {
        assert_eq!(Profile::SCRYPT.to_string(), "0x00000003");
        assert_eq!(Profile::NEOSCRYPT_FTC.to_string(), "0x80000620");
    }

    #[test]
    fn profile_deserializes_from_number_or_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            profile: Profile,
        }

        let w: Wrapper = toml::from_str("profile = 3").unwrap();
        assert_eq!(w.profile, Profile::SCRYPT);
        let w: Wrapper = toml::from_str("profile = \"0x80000620\"").unwrap();
        assert_eq!(w.profile, Profile::NEOSCRYPT_FTC);
        assert!(toml::from_str::<Wrapper>("profile = \"bogus\"").is_err());
    }

    #[test]
    fn digest_hex_roundtrip_and_length_check() {
        let text = "b34ab7cd1ce0c308146ab970fa75517bcf20f95c7ed7a34efc0d5f096469b2e1";
        let digest: Digest = text.parse().unwrap();
        assert_eq!(digest.to_string(), text);
        assert_eq!(digest.as_bytes()[0], 0xb3);
        assert!("abcd".parse::<Digest>().is_err());
    }

    #[test]
    fn network_ports() {
        assert_eq!(Network::Mainnet.port(), 9336);
        assert_eq!(Network::Testnet.port(), 19336);
        assert_eq!("test".parse::<Network>().unwrap(), Network::Testnet);
    }
}
