use {
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
  thiserror::Error,
};

#[derive(Debug, Error, PartialEq)]
pub enum HashError {
  #[error("invalid hex encoding: {0}")]
  Hex(#[from] hex::FromHexError),

  #[error("invalid hash length {0}, expected {1}")]
  Length(usize, usize),
}

/// A payment or stake credential hash.
///
/// This is the only identity the core ever sees for a wallet. Turning it
/// into a bech32 address is delegated to the address-derivation collaborator,
/// so the hash stays an opaque fixed-length byte string here.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct KeyHash([u8; 20]);

/// Hash of a transaction, used to reference its outputs.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TxHash([u8; 32]);

macro_rules! impl_hash_type {
  ($name:ident, $len:literal) => {
    impl $name {
      pub const LEN: usize = $len;

      pub const fn new(bytes: [u8; $len]) -> Self {
        Self(bytes)
      }
    }

    impl AsRef<[u8]> for $name {
      fn as_ref(&self) -> &[u8] {
        &self.0
      }
    }

    impl Deref for $name {
      type Target = [u8];

      fn deref(&self) -> &Self::Target {
        &self.0
      }
    }

    impl Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
      }
    }

    impl Debug for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, concat!(stringify!($name), "({})"), hex::encode(self.0))
      }
    }

    impl From<[u8; $len]> for $name {
      fn from(bytes: [u8; $len]) -> Self {
        Self(bytes)
      }
    }

    impl From<$name> for String {
      fn from(h: $name) -> Self {
        hex::encode(h.0)
      }
    }

    impl FromStr for $name {
      type Err = HashError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let bytes: [u8; $len] = bytes
          .try_into()
          .map_err(|v: Vec<u8>| HashError::Length(v.len(), $len))?;
        Ok(Self(bytes))
      }
    }

    impl TryFrom<&str> for $name {
      type Error = HashError;

      fn try_from(value: &str) -> Result<Self, Self::Error> {
        FromStr::from_str(value)
      }
    }

    impl TryFrom<&[u8]> for $name {
      type Error = HashError;

      fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; $len] = value
          .try_into()
          .map_err(|_| HashError::Length(value.len(), $len))?;
        Ok(Self(bytes))
      }
    }
  };
}

impl_hash_type!(KeyHash, 20);
impl_hash_type!(TxHash, 32);

pub trait ToHexString {
  fn to_hex(&self) -> String;
}

impl<const N: usize> ToHexString for [u8; N] {
  fn to_hex(&self) -> String {
    hex::encode(self)
  }
}

impl ToHexString for &[u8] {
  fn to_hex(&self) -> String {
    hex::encode(self)
  }
}

impl ToHexString for Vec<u8> {
  fn to_hex(&self) -> String {
    hex::encode(self)
  }
}
