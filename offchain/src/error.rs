use {
  crate::{chain::ChainError, machine::Action},
  cinefund_primitives::{CampaignState, DatumError, Lovelace},
  thiserror::Error,
};

/// Failures surfaced by the state machine and the intent builders.
///
/// Decode-level failures are only wrapped here when they concern the
/// campaign datum itself; malformed backer datums encountered while
/// scanning a UTXO set are tolerated and routed to the unrecognized bucket
/// instead (see [`crate::partition_utxos`]).
#[derive(Debug, Error)]
pub enum Error {
  #[error("action {action:?} is not legal from state {from:?}")]
  IllegalTransition {
    from: CampaignState,
    action: Action,
  },

  #[error(
    "phase {phase} goal not met: raised {raised} of {goal} lovelace"
  )]
  GoalNotMet {
    phase: u64,
    raised: Lovelace,
    goal: Lovelace,
  },

  #[error("insufficient funds: {0}")]
  InsufficientFunds(String),

  #[error("no UTXO carrying the campaign state token was found")]
  MissingStateToken,

  #[error("state token UTXO carries no datum")]
  MissingStateDatum,

  #[error("contribution targets phase {index} but campaign has {phases}")]
  NoSuchPhase { index: u64, phases: usize },

  #[error(transparent)]
  Datum(#[from] DatumError),

  #[error(transparent)]
  Chain(#[from] ChainError),
}
