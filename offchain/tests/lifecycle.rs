mod common;

use {
  cinefund_offchain::{
    build_launch,
    Campaign,
    CampaignConfig,
    Error,
    LedgerQuery,
    SigningContext,
    SubmitError,
    Submitter,
  },
  cinefund_primitives::{
    Address,
    BackerDatum,
    CampaignDatum,
    CampaignState,
    Creator,
    KeyHash,
    OutputRef,
    Phase,
    PolicyId,
    TxHash,
    Utxo,
    Value,
  },
  common::MockChain,
};

const DEADLINE: u64 = 1_000_000;

fn creator() -> Creator {
  Creator {
    pkh: KeyHash::new([1; 20]),
    skh: Some(KeyHash::new([2; 20])),
  }
}

fn backer(seed: u8, phase_index: u64) -> BackerDatum {
  BackerDatum {
    pkh: KeyHash::new([seed; 20]),
    skh: None,
    phase_index,
  }
}

fn signing() -> SigningContext {
  SigningContext {
    signer: creator().pkh,
  }
}

fn launch_campaign(
  chain: &MockChain,
  goal: i128,
  burn_on_terminal: bool,
) -> anyhow::Result<CampaignConfig> {
  let creator_address = Address::new("addr_test_creator");
  let nonce_utxo = chain.seed(&creator_address, 20_000_000);
  let config = CampaignConfig::new(
    PolicyId::new([0xcf; 8]),
    Address::new("addr_test_campaign"),
    KeyHash::new([0xaa; 20]),
    nonce_utxo.output_ref,
  )
  .with_burn_on_terminal(burn_on_terminal);

  let datum = CampaignDatum::new(
    "Night Train",
    "R. Deckard",
    vec![Phase {
      name: "principal".into(),
      goal,
      deadline: DEADLINE,
    }],
    creator(),
  )?;
  let intent = build_launch(&config, &nonce_utxo, &datum)?;
  chain.submit(&intent, &signing())?;
  Ok(config)
}

#[test]
fn launch_contribute_advance_conclude() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 5_000_000, false)?;
  let campaign = Campaign::new(config, &chain, &chain, &chain);

  let snapshot = campaign.snapshot()?;
  assert_eq!(snapshot.datum.state, CampaignState::PreProduction);
  assert_eq!(snapshot.view.total_lovelace, 0);

  for (seed, amount) in [(3u8, 2_000_000), (4u8, 3_500_000)] {
    let intent = campaign.contribute(&backer(seed, 0), amount)?;
    campaign.submit(&chain, &intent, &signing())?;
  }

  let snapshot = campaign.snapshot()?;
  assert_eq!(snapshot.view.total_lovelace, 5_500_000);
  assert_eq!(snapshot.view.total_ada().to_string(), "5.5");
  assert_eq!(snapshot.view.backers.len(), 2);

  // goal met before the deadline, so advancing is legal
  let intent = campaign.advance()?;
  campaign.submit(&chain, &intent, &signing())?;
  let snapshot = campaign.snapshot()?;
  assert_eq!(snapshot.datum.state, CampaignState::Production);

  let intent = campaign.conclude()?;
  campaign.submit(&chain, &intent, &signing())?;
  let snapshot = campaign.snapshot()?;
  assert_eq!(snapshot.datum.state, CampaignState::Completed);

  // terminal: no further transitions
  assert!(matches!(
    campaign.advance(),
    Err(Error::IllegalTransition { .. })
  ));
  assert!(matches!(
    campaign.contribute(&backer(9, 0), 1_000_000),
    Err(Error::IllegalTransition {
      from: CampaignState::Completed,
      ..
    })
  ));
  Ok(())
}

#[test]
fn underfunded_advance_is_rejected_before_the_deadline() -> anyhow::Result<()>
{
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 1_000_000, false)?;
  let campaign = Campaign::new(config, &chain, &chain, &chain);

  let intent = campaign.contribute(&backer(3, 0), 500_000)?;
  campaign.submit(&chain, &intent, &signing())?;

  chain.set_time(DEADLINE - 1);
  assert!(matches!(
    campaign.advance(),
    Err(Error::IllegalTransition {
      from: CampaignState::PreProduction,
      ..
    })
  ));

  // once the deadline passes the same request becomes legal
  chain.set_time(DEADLINE);
  let intent = campaign.advance()?;
  campaign.submit(&chain, &intent, &signing())?;
  assert_eq!(campaign.snapshot()?.datum.state, CampaignState::Production);
  Ok(())
}

#[test]
fn cancel_then_refund_repays_every_backer() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 10_000_000, false)?;
  let campaign = Campaign::new(config, &chain, &chain, &chain);

  for (seed, amount) in [(3u8, 2_000_000), (4u8, 3_500_000)] {
    let intent = campaign.contribute(&backer(seed, 0), amount)?;
    campaign.submit(&chain, &intent, &signing())?;
  }

  // goal unmet, anyone may cancel
  let intent = campaign.cancel(None)?;
  campaign.submit(&chain, &intent, &signing())?;
  assert_eq!(campaign.snapshot()?.datum.state, CampaignState::Cancelled);

  let refund = campaign.refund_all()?;
  assert_eq!(refund.inputs.len(), 2);
  campaign.submit(&chain, &refund, &signing())?;

  for (seed, amount) in [(3u8, 2_000_000i128), (4u8, 3_500_000)] {
    let addr =
      Address::new(format!("addr_test_{}", KeyHash::new([seed; 20])));
    let utxos = chain.utxos_at(&addr)?;
    assert_eq!(utxos.len(), 1, "backer {seed} must hold one refund UTXO");
    assert_eq!(utxos[0].value.lovelace, amount);
  }

  // every backer UTXO is gone, nothing left to refund
  assert!(matches!(
    campaign.refund_all(),
    Err(Error::InsufficientFunds(_))
  ));
  Ok(())
}

#[test]
fn refunds_require_cancellation() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 10_000_000, false)?;
  let campaign = Campaign::new(config, &chain, &chain, &chain);

  let intent = campaign.contribute(&backer(3, 0), 2_000_000)?;
  campaign.submit(&chain, &intent, &signing())?;

  assert!(matches!(
    campaign.refund_all(),
    Err(Error::IllegalTransition {
      from: CampaignState::PreProduction,
      ..
    })
  ));
  Ok(())
}

#[test]
fn stale_inputs_surface_at_submission_not_before() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 1_000_000, false)?;
  let campaign = Campaign::new(config, &chain, &chain, &chain);

  let intent = campaign.contribute(&backer(3, 0), 1_000_000)?;
  campaign.submit(&chain, &intent, &signing())?;

  // two identical advance intents race; the second one's input is gone
  let first = campaign.advance()?;
  let second = first.clone();
  campaign.submit(&chain, &first, &signing())?;
  let err = campaign
    .submit(&chain, &second, &signing())
    .expect_err("consumed input must be stale");
  assert!(matches!(err, SubmitError::StaleInput(_)));

  // the documented recovery: re-query and rebuild
  let rebuilt = campaign.conclude()?;
  campaign.submit(&chain, &rebuilt, &signing())?;
  assert_eq!(campaign.snapshot()?.datum.state, CampaignState::Completed);
  Ok(())
}

#[test]
fn terminal_token_handling_follows_configuration() -> anyhow::Result<()> {
  // dormant: the token stays on a final UTXO with the terminal datum
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 10_000_000, false)?;
  let campaign = Campaign::new(config.clone(), &chain, &chain, &chain);
  let intent = campaign.cancel(None)?;
  campaign.submit(&chain, &intent, &signing())?;
  let dormant = chain
    .utxos_at_with_asset(&config.campaign_address, &config.state_asset())?;
  assert_eq!(dormant.len(), 1);
  assert_eq!(campaign.snapshot()?.datum.state, CampaignState::Cancelled);

  // burn: no successor output, the token disappears with its UTXO
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 10_000_000, true)?;
  let campaign = Campaign::new(config.clone(), &chain, &chain, &chain);
  let intent = campaign.cancel(None)?;
  assert!(intent.outputs.is_empty());
  assert_eq!(intent.mint, vec![(config.state_asset(), -1)]);
  campaign.submit(&chain, &intent, &signing())?;
  let burned = chain
    .utxos_at_with_asset(&config.campaign_address, &config.state_asset())?;
  assert!(burned.is_empty());
  assert!(matches!(
    campaign.snapshot(),
    Err(Error::MissingStateToken)
  ));
  Ok(())
}

#[test]
fn malformed_backer_datum_never_blocks_the_scan() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 10_000_000, false)?;
  let campaign = Campaign::new(config.clone(), &chain, &chain, &chain);

  let intent = campaign.contribute(&backer(3, 0), 2_000_000)?;
  campaign.submit(&chain, &intent, &signing())?;

  // a stray UTXO with an undecodable datum lands at the campaign address
  chain.add_utxo(Utxo {
    output_ref: OutputRef::new(TxHash::new([0xbb; 32]), 0),
    address: config.campaign_address.clone(),
    value: Value::lovelace(7_000_000),
    datum: Some(vec![0xff, 0x00, 0xff]),
  });

  let snapshot = campaign.snapshot()?;
  assert_eq!(snapshot.view.total_lovelace, 2_000_000);
  assert_eq!(snapshot.unrecognized.len(), 1);
  Ok(())
}

#[test]
fn ledger_query_with_asset_finds_the_state_token() -> anyhow::Result<()> {
  let chain = MockChain::new();
  let config = launch_campaign(&chain, 1_000_000, false)?;
  let found = chain
    .utxos_at_with_asset(&config.campaign_address, &config.state_asset())?;
  assert_eq!(found.len(), 1);
  let datum = CampaignDatum::decode(found[0].datum.as_deref().unwrap())?;
  assert_eq!(datum.state, CampaignState::PreProduction);
  assert_eq!(datum.total_budget, 1_000_000);
  Ok(())
}
