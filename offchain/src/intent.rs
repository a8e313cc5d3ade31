use {
  crate::{
    aggregate::{BackerRecord, CampaignView},
    config::CampaignConfig,
    error::Error,
    machine::{apply, Action, GuardInput},
  },
  cinefund_primitives::{
    AssetId,
    BackerDatum,
    CampaignDatum,
    Lovelace,
    MintRedeemer,
    OutputRef,
    SpendRedeemer,
    TxOut,
    Utxo,
    Value,
  },
  serde::{Deserialize, Serialize},
};

/// An abstract description of the ledger effects one action requires:
/// which UTXOs are consumed or referenced, what is minted or burned, what
/// outputs appear, and the redeemer invoking the validator branch.
///
/// Building an intent is a pure data transformation. Balancing, fees,
/// signing and submission are the submission collaborator's concern; a
/// `TxIntent` never touches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIntent {
  /// UTXOs consumed by the transaction.
  pub inputs: Vec<OutputRef>,
  /// UTXOs read but not consumed (e.g. the state token during refunds).
  pub reference_inputs: Vec<OutputRef>,
  /// Minted (positive) or burned (negative) asset deltas.
  pub mint: Vec<(AssetId, i128)>,
  /// Outputs the transaction must create.
  pub outputs: Vec<TxOut>,
  /// Encoded redeemer for the validator branch being invoked.
  pub redeemer: Vec<u8>,
}

impl TxIntent {
  fn new(redeemer: Vec<u8>) -> Self {
    Self {
      inputs: vec![],
      reference_inputs: vec![],
      mint: vec![],
      outputs: vec![],
      redeemer,
    }
  }
}

/// Launch a campaign: consume the nonce UTXO, mint the state token and
/// lock it at the campaign address together with the launch datum.
pub fn build_launch(
  config: &CampaignConfig,
  nonce_utxo: &Utxo,
  datum: &CampaignDatum,
) -> Result<TxIntent, Error> {
  datum.validate()?;
  let view = CampaignView::default();
  let input = GuardInput {
    datum,
    view: &view,
    now: 0,
    caller: None,
  };
  let datum = apply(Action::Launch, input)?;

  let mut intent =
    TxIntent::new(MintRedeemer::Launch(datum.clone()).encode());
  intent.inputs.push(nonce_utxo.output_ref);
  intent.mint.push((config.state_asset(), 1));
  intent.outputs.push(
    TxOut::new(
      config.campaign_address.clone(),
      Value::default().with_asset(config.state_asset(), 1),
    )
    .with_datum(datum.encode()),
  );
  Ok(intent)
}

/// Contribute to a phase: mint a support token and lock it with the
/// contributed lovelace and the backer datum at the campaign address.
pub fn build_contribute(
  config: &CampaignConfig,
  campaign: &CampaignDatum,
  backer: &BackerDatum,
  amount: Lovelace,
) -> Result<TxIntent, Error> {
  if campaign.state.is_terminal() {
    return Err(Error::IllegalTransition {
      from: campaign.state,
      action: Action::Contribute,
    });
  }
  if amount <= 0 {
    return Err(Error::InsufficientFunds(format!(
      "contribution of {amount} lovelace"
    )));
  }
  if backer.phase_index as usize >= campaign.phases.len() {
    return Err(Error::NoSuchPhase {
      index: backer.phase_index,
      phases: campaign.phases.len(),
    });
  }

  let mut intent = TxIntent::new(MintRedeemer::Contribute(*backer).encode());
  intent.mint.push((config.support_asset(), 1));
  intent.outputs.push(
    TxOut::new(
      config.campaign_address.clone(),
      Value::lovelace(amount).with_asset(config.support_asset(), 1),
    )
    .with_datum(backer.encode()),
  );
  Ok(intent)
}

/// Advance to the next phase or pipeline stage: consume the state-token
/// UTXO and produce its successor with the advanced datum.
pub fn build_advance(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  input: GuardInput<'_>,
) -> Result<TxIntent, Error> {
  let next = apply(Action::AdvancePhase, input)?;
  Ok(replace_state_utxo(
    config,
    state_utxo,
    &next,
    SpendRedeemer::AdvancePhase,
  ))
}

/// Cancel the campaign. Terminal transition: the successor either carries
/// the dormant state token with the Cancelled datum, or the token is
/// burned, depending on configuration.
pub fn build_cancel(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  input: GuardInput<'_>,
) -> Result<TxIntent, Error> {
  let next = apply(Action::Cancel, input)?;
  Ok(terminal_intent(config, state_utxo, &next, SpendRedeemer::Cancel))
}

/// Conclude a fully funded campaign. Terminal transition, same
/// burn-or-dormant handling as cancel.
pub fn build_conclude(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  input: GuardInput<'_>,
) -> Result<TxIntent, Error> {
  let next = apply(Action::Conclude, input)?;
  Ok(terminal_intent(
    config,
    state_utxo,
    &next,
    SpendRedeemer::Conclude,
  ))
}

/// Distribute rewards while in the Distribution stage. The state token
/// moves to a successor carrying the unchanged datum.
pub fn build_distribute(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  input: GuardInput<'_>,
) -> Result<TxIntent, Error> {
  let next = apply(Action::Distribute, input)?;
  Ok(replace_state_utxo(
    config,
    state_utxo,
    &next,
    SpendRedeemer::Distribute,
  ))
}

/// Refund backers after cancellation: reference (not consume) the state
/// token UTXO, consume the given backer UTXOs, and pay each backer
/// exactly the lovelace they contributed.
pub fn build_refund(
  state_utxo: &Utxo,
  backers: &[BackerRecord],
  input: GuardInput<'_>,
) -> Result<TxIntent, Error> {
  apply(Action::RefundBacker, input)?;
  if backers.iter().map(|b| b.contributed).sum::<Lovelace>() == 0 {
    return Err(Error::InsufficientFunds("nothing to refund".into()));
  }

  let mut intent = TxIntent::new(SpendRedeemer::RefundBacker.encode());
  intent.reference_inputs.push(state_utxo.output_ref);
  for backer in backers {
    intent.inputs.push(backer.utxo_ref);
    intent.outputs.push(TxOut::new(
      backer.address.clone(),
      Value::lovelace(backer.contributed),
    ));
  }
  Ok(intent)
}

/// Swap a backer's support token for a reward token once their phase has
/// finished: burn the support token, mint the reward token and lock it
/// with the backer datum.
pub fn build_finish_phase(
  config: &CampaignConfig,
  backer: &BackerDatum,
  support_utxos: &[OutputRef],
) -> Result<TxIntent, Error> {
  if support_utxos.is_empty() {
    return Err(Error::InsufficientFunds(
      "no support-token UTXOs to finish".into(),
    ));
  }

  let mut intent =
    TxIntent::new(MintRedeemer::FinishPhase(*backer).encode());
  intent.inputs.extend_from_slice(support_utxos);
  intent.mint.push((config.support_asset(), -1));
  intent.mint.push((config.reward_asset(), 1));
  intent.outputs.push(
    TxOut::new(
      config.campaign_address.clone(),
      Value::default().with_asset(config.reward_asset(), 1),
    )
    .with_datum(backer.encode()),
  );
  Ok(intent)
}

/// Non-terminal successor: consume the state UTXO, carry its value (the
/// token moves with it) to a new output with the updated datum.
fn replace_state_utxo(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  next: &CampaignDatum,
  redeemer: SpendRedeemer,
) -> TxIntent {
  let mut intent = TxIntent::new(redeemer.encode());
  intent.inputs.push(state_utxo.output_ref);
  intent.outputs.push(
    TxOut::new(config.campaign_address.clone(), state_utxo.value.clone())
      .with_datum(next.encode()),
  );
  intent
}

/// Terminal successor: either burn the token and strand no successor, or
/// leave the token dormant on a final UTXO with the terminal datum.
fn terminal_intent(
  config: &CampaignConfig,
  state_utxo: &Utxo,
  next: &CampaignDatum,
  redeemer: SpendRedeemer,
) -> TxIntent {
  if !config.burn_on_terminal {
    return replace_state_utxo(config, state_utxo, next, redeemer);
  }
  let mut intent = TxIntent::new(redeemer.encode());
  intent.inputs.push(state_utxo.output_ref);
  intent.mint.push((config.state_asset(), -1));
  intent
}
