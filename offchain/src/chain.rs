use {
  crate::intent::TxIntent,
  cinefund_primitives::{Address, AssetId, KeyHash, OutputRef, TxHash, Utxo},
  serde::{Deserialize, Serialize},
  std::fmt::Display,
  thiserror::Error,
};

/// Hash of a submitted transaction.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TxId(pub TxHash);

impl Display for TxId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Error)]
pub enum ChainError {
  #[error("ledger query failed: {0}")]
  Query(String),
}

/// Submission failures. `StaleInput` is the first-class concurrency
/// failure: some input of the intent was consumed by another actor between
/// query and submission. It is never retried here; the caller must
/// re-query the ledger and rebuild the intent, since resubmitting against
/// a stale view could express a double-spend.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error("input {0} was already consumed; re-query and rebuild the intent")]
  StaleInput(OutputRef),

  #[error("transaction rejected: {0}")]
  Rejected(String),
}

/// Ledger-query collaborator. Implementations perform the actual I/O;
/// the core only ever sees resolved UTXO sets.
pub trait LedgerQuery {
  fn utxos_at(&self, address: &Address) -> Result<Vec<Utxo>, ChainError>;

  fn utxos_at_with_asset(
    &self,
    address: &Address,
    asset: &AssetId,
  ) -> Result<Vec<Utxo>, ChainError>;
}

/// Chain-time oracle collaborator, used by deadline guards. Returns
/// ledger time in milliseconds.
pub trait ChainClock {
  fn now(&self) -> u64;
}

/// Address-derivation collaborator: turns payment/stake credential hashes
/// into a network address. Key-hash to bech32 mechanics live outside the
/// core.
pub trait AddressResolver {
  fn credential_to_address(
    &self,
    pkh: &KeyHash,
    skh: Option<&KeyHash>,
  ) -> Address;
}

/// Opaque signing material handed through to the submission collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningContext {
  pub signer: KeyHash,
}

/// Signing and submission collaborator. The core builds intents; turning
/// one into a balanced, signed transaction is entirely this trait's
/// concern.
pub trait Submitter {
  fn submit(
    &self,
    intent: &TxIntent,
    ctx: &SigningContext,
  ) -> Result<TxId, SubmitError>;
}
