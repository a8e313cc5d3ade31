use {
  crate::hash::TxHash,
  serde::{Deserialize, Serialize},
  std::{
    collections::BTreeMap,
    fmt::{Debug, Display},
  },
};

/// Integer amount of the ledger's native currency, in its smallest unit.
/// One ADA is 1_000_000 lovelace. All arithmetic on amounts is exact; the
/// decimal ADA form exists only for display.
pub type Lovelace = i128;

/// Reference to a single transaction output.
///
/// Also serves as the campaign nonce: the output reference consumed at
/// launch seeds validator and policy derivation, so repeated launches by
/// the same creator/platform pair produce distinct scripts.
#[derive(
  Debug,
  Copy,
  Clone,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub struct OutputRef {
  pub tx_hash: TxHash,
  pub output_index: u64,
}

impl OutputRef {
  pub const fn new(tx_hash: TxHash, output_index: u64) -> Self {
    Self {
      tx_hash,
      output_index,
    }
  }
}

impl Display for OutputRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}#{}", self.tx_hash, self.output_index)
  }
}

/// Hash of the minting policy that controls an asset class. Opaque here;
/// derived from validator scripts by an external collaborator.
#[derive(
  Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PolicyId(Vec<u8>);

impl PolicyId {
  pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
    Self(bytes.into())
  }
}

impl AsRef<[u8]> for PolicyId {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Display for PolicyId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", hex::encode(&self.0))
  }
}

impl Debug for PolicyId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "policy({})", hex::encode(&self.0))
  }
}

/// A native asset class: minting policy plus asset name.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AssetId {
  pub policy: PolicyId,
  pub name: Vec<u8>,
}

impl AssetId {
  pub fn new(policy: PolicyId, name: impl Into<Vec<u8>>) -> Self {
    Self {
      policy,
      name: name.into(),
    }
  }

  /// The flat `{policy}{name}` hex form used by ledger query providers.
  pub fn unit(&self) -> String {
    format!("{}{}", self.policy, hex::encode(&self.name))
  }
}

/// A bundle of lovelace and native assets carried by an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
  pub lovelace: Lovelace,
  pub assets: BTreeMap<AssetId, i128>,
}

impl Value {
  pub fn lovelace(amount: Lovelace) -> Self {
    Self {
      lovelace: amount,
      assets: BTreeMap::new(),
    }
  }

  pub fn with_asset(mut self, asset: AssetId, amount: i128) -> Self {
    self.assets.insert(asset, amount);
    self
  }

  pub fn asset(&self, asset: &AssetId) -> i128 {
    self.assets.get(asset).copied().unwrap_or(0)
  }

  pub fn has_asset(&self, asset: &AssetId) -> bool {
    self.asset(asset) > 0
  }
}

/// An address as produced by the address-derivation collaborator. The core
/// never inspects its contents, it only routes values to it.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address(String);

impl Address {
  pub fn new(addr: impl Into<String>) -> Self {
    Self(addr.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// An unspent transaction output as reported by the ledger-query
/// collaborator: a value at an address, optionally carrying an inline
/// datum in the constructor format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
  pub output_ref: OutputRef,
  pub address: Address,
  pub value: Value,
  pub datum: Option<Vec<u8>>,
}

/// An output a transaction intent wants created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
  pub address: Address,
  pub value: Value,
  pub datum: Option<Vec<u8>>,
}

impl TxOut {
  pub fn new(address: Address, value: Value) -> Self {
    Self {
      address,
      value,
      datum: None,
    }
  }

  pub fn with_datum(mut self, datum: Vec<u8>) -> Self {
    self.datum = Some(datum);
    self
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{AssetId, OutputRef, PolicyId, Value},
    crate::hash::TxHash,
  };

  #[test]
  fn output_ref_display() {
    let oref = OutputRef::new(TxHash::new([0xaa; 32]), 3);
    assert_eq!(oref.to_string(), format!("{}#3", "aa".repeat(32)));
  }

  #[test]
  fn asset_unit_concatenates_policy_and_name() {
    let asset = AssetId::new(PolicyId::new([0x01, 0x02]), b"state_token");
    assert_eq!(
      asset.unit(),
      format!("0102{}", hex::encode(b"state_token"))
    );
  }

  #[test]
  fn value_asset_lookup() {
    let asset = AssetId::new(PolicyId::new([7; 4]), b"support_token");
    let value = Value::lovelace(2_000_000).with_asset(asset.clone(), 1);
    assert_eq!(value.asset(&asset), 1);
    assert!(value.has_asset(&asset));
    assert!(!Value::lovelace(5).has_asset(&asset));
  }
}
