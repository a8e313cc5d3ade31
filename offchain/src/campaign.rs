use {
  crate::{
    aggregate::{aggregate, partition_utxos, CampaignView},
    chain::{
      AddressResolver,
      ChainClock,
      LedgerQuery,
      SigningContext,
      SubmitError,
      Submitter,
      TxId,
    },
    config::CampaignConfig,
    error::Error,
    intent::{
      build_advance,
      build_cancel,
      build_conclude,
      build_contribute,
      build_distribute,
      build_refund,
      TxIntent,
    },
    machine::GuardInput,
  },
  cinefund_primitives::{BackerDatum, CampaignDatum, KeyHash, Lovelace, Utxo},
  tracing::{info, warn},
};

/// One consistent read of the campaign: the state-token UTXO, its decoded
/// datum, and the aggregate backer view, all from a single ledger query.
///
/// A snapshot is already stale the moment it is taken; it is never cached
/// or reused across operations.
#[derive(Debug, Clone)]
pub struct CampaignSnapshot {
  pub state_utxo: Utxo,
  pub datum: CampaignDatum,
  pub view: CampaignView,
  pub unrecognized: Vec<Utxo>,
}

/// Read and intent-building surface of one launched campaign, wired to
/// the external collaborators that do the actual I/O.
///
/// Every operation re-queries the live UTXO set before deciding anything:
/// the ledger, not this type, is the source of truth. When a submission
/// fails with [`SubmitError::StaleInput`] the caller re-queries and
/// rebuilds; nothing retries automatically.
pub struct Campaign<'a> {
  config: CampaignConfig,
  ledger: &'a dyn LedgerQuery,
  clock: &'a dyn ChainClock,
  resolver: &'a dyn AddressResolver,
}

impl<'a> Campaign<'a> {
  pub fn new(
    config: CampaignConfig,
    ledger: &'a dyn LedgerQuery,
    clock: &'a dyn ChainClock,
    resolver: &'a dyn AddressResolver,
  ) -> Self {
    Self {
      config,
      ledger,
      clock,
      resolver,
    }
  }

  pub fn config(&self) -> &CampaignConfig {
    &self.config
  }

  /// Fetches the live UTXO set and reconstructs the campaign state.
  pub fn snapshot(&self) -> Result<CampaignSnapshot, Error> {
    let utxos = self.ledger.utxos_at(&self.config.campaign_address)?;
    let partition = partition_utxos(utxos, &self.config.state_asset());
    let state_utxo = partition.state_token.ok_or(Error::MissingStateToken)?;
    let datum = CampaignDatum::decode(
      state_utxo.datum.as_deref().ok_or(Error::MissingStateDatum)?,
    )?;
    let view = aggregate(&partition.backers, self.resolver);
    info!(
      "campaign {:?} [{:?}]: {} backers, {} ADA raised, {} unrecognized \
       UTXOs",
      datum.title,
      datum.state,
      view.backers.len(),
      view.total_ada(),
      partition.unrecognized.len(),
    );
    Ok(CampaignSnapshot {
      state_utxo,
      datum,
      view,
      unrecognized: partition.unrecognized,
    })
  }

  pub fn contribute(
    &self,
    backer: &BackerDatum,
    amount: Lovelace,
  ) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_contribute(&self.config, &snapshot.datum, backer, amount)
  }

  pub fn advance(&self) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_advance(
      &self.config,
      &snapshot.state_utxo,
      self.guard_input(&snapshot, None),
    )
  }

  pub fn cancel(&self, caller: Option<&KeyHash>) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_cancel(
      &self.config,
      &snapshot.state_utxo,
      self.guard_input(&snapshot, caller),
    )
  }

  pub fn conclude(&self) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_conclude(
      &self.config,
      &snapshot.state_utxo,
      self.guard_input(&snapshot, None),
    )
  }

  pub fn distribute(&self) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_distribute(
      &self.config,
      &snapshot.state_utxo,
      self.guard_input(&snapshot, None),
    )
  }

  /// Builds a refund intent for every backer UTXO currently on the
  /// ledger.
  pub fn refund_all(&self) -> Result<TxIntent, Error> {
    let snapshot = self.snapshot()?;
    build_refund(
      &snapshot.state_utxo,
      &snapshot.view.backers,
      self.guard_input(&snapshot, None),
    )
  }

  /// Hands an intent to the submission collaborator. Pass-through apart
  /// from logging; stale inputs are the caller's signal to re-query.
  pub fn submit(
    &self,
    submitter: &dyn Submitter,
    intent: &TxIntent,
    ctx: &SigningContext,
  ) -> Result<TxId, SubmitError> {
    match submitter.submit(intent, ctx) {
      Ok(txid) => {
        info!("submitted transaction {txid}");
        Ok(txid)
      }
      Err(err) => {
        warn!("submission failed: {err}");
        Err(err)
      }
    }
  }

  fn guard_input<'s>(
    &self,
    snapshot: &'s CampaignSnapshot,
    caller: Option<&'s KeyHash>,
  ) -> GuardInput<'s> {
    GuardInput {
      datum: &snapshot.datum,
      view: &snapshot.view,
      now: self.clock.now(),
      caller,
    }
  }
}
