use {
  cinefund_offchain::{
    AddressResolver,
    ChainClock,
    ChainError,
    LedgerQuery,
    SigningContext,
    SubmitError,
    Submitter,
    TxIntent,
    TxId,
  },
  cinefund_primitives::{
    Address,
    AssetId,
    KeyHash,
    OutputRef,
    TxHash,
    Utxo,
    Value,
  },
  std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
  },
};

/// In-memory stand-in for all four external collaborators: ledger query,
/// chain clock, address derivation and signing+submission. Submission
/// actually applies the intent to the UTXO map, so consumed inputs
/// disappear exactly like on a real ledger and a second submission of the
/// same intent fails with a stale input.
#[derive(Default)]
pub struct MockChain {
  utxos: RefCell<BTreeMap<OutputRef, Utxo>>,
  now: Cell<u64>,
  next_tx: Cell<u8>,
}

impl MockChain {
  pub fn new() -> Self {
    Self {
      next_tx: Cell::new(100),
      ..Self::default()
    }
  }

  pub fn set_time(&self, now: u64) {
    self.now.set(now);
  }

  pub fn add_utxo(&self, utxo: Utxo) {
    self.utxos.borrow_mut().insert(utxo.output_ref, utxo);
  }

  /// Seeds a plain wallet UTXO, e.g. the launch nonce.
  pub fn seed(&self, address: &Address, lovelace: i128) -> Utxo {
    let utxo = Utxo {
      output_ref: OutputRef::new(TxHash::new([self.next_tx.get(); 32]), 0),
      address: address.clone(),
      value: Value::lovelace(lovelace),
      datum: None,
    };
    self.next_tx.set(self.next_tx.get() + 1);
    self.add_utxo(utxo.clone());
    utxo
  }

}

impl LedgerQuery for MockChain {
  fn utxos_at(&self, address: &Address) -> Result<Vec<Utxo>, ChainError> {
    Ok(
      self
        .utxos
        .borrow()
        .values()
        .filter(|u| &u.address == address)
        .cloned()
        .collect(),
    )
  }

  fn utxos_at_with_asset(
    &self,
    address: &Address,
    asset: &AssetId,
  ) -> Result<Vec<Utxo>, ChainError> {
    Ok(
      self
        .utxos
        .borrow()
        .values()
        .filter(|u| &u.address == address && u.value.has_asset(asset))
        .cloned()
        .collect(),
    )
  }
}

impl ChainClock for MockChain {
  fn now(&self) -> u64 {
    self.now.get()
  }
}

impl AddressResolver for MockChain {
  fn credential_to_address(
    &self,
    pkh: &KeyHash,
    _skh: Option<&KeyHash>,
  ) -> Address {
    Address::new(format!("addr_test_{pkh}"))
  }
}

impl Submitter for MockChain {
  fn submit(
    &self,
    intent: &TxIntent,
    _ctx: &SigningContext,
  ) -> Result<TxId, SubmitError> {
    let mut utxos = self.utxos.borrow_mut();
    for input in intent.inputs.iter().chain(&intent.reference_inputs) {
      if !utxos.contains_key(input) {
        return Err(SubmitError::StaleInput(*input));
      }
    }
    for input in &intent.inputs {
      utxos.remove(input);
    }
    let tx_hash = TxHash::new([self.next_tx.get(); 32]);
    self.next_tx.set(self.next_tx.get() + 1);
    for (index, output) in intent.outputs.iter().enumerate() {
      utxos.insert(OutputRef::new(tx_hash, index as u64), Utxo {
        output_ref: OutputRef::new(tx_hash, index as u64),
        address: output.address.clone(),
        value: output.value.clone(),
        datum: output.datum.clone(),
      });
    }
    Ok(TxId(tx_hash))
  }
}
