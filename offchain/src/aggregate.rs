use {
  crate::chain::AddressResolver,
  cinefund_primitives::{
    Address,
    AssetId,
    BackerDatum,
    KeyHash,
    Lovelace,
    OutputRef,
    Utxo,
  },
  serde::{Deserialize, Serialize},
  std::{collections::BTreeMap, fmt::Display},
  tracing::debug,
};

/// Exact decimal ADA view of a lovelace amount. Display-only; all
/// arithmetic stays in integer lovelace.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Ada(pub Lovelace);

impl Display for Ada {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let whole = (self.0 / 1_000_000).unsigned_abs();
    let frac = (self.0 % 1_000_000).unsigned_abs();
    if frac == 0 {
      return write!(f, "{sign}{whole}");
    }
    let frac = format!("{frac:06}");
    write!(f, "{sign}{whole}.{}", frac.trim_end_matches('0'))
  }
}

/// One backer's reconstructed contribution: the datum identifies the
/// backer and target phase, the carrying UTXO's value is the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackerRecord {
  pub utxo_ref: OutputRef,
  pub pkh: KeyHash,
  pub skh: Option<KeyHash>,
  pub address: Address,
  pub contributed: Lovelace,
  pub phase_index: u64,
}

impl BackerRecord {
  pub fn contributed_ada(&self) -> Ada {
    Ada(self.contributed)
  }
}

/// Result of sorting the UTXO set at the campaign address into the three
/// buckets the core cares about.
#[derive(Debug, Clone, Default)]
pub struct Partition {
  pub state_token: Option<Utxo>,
  pub backers: Vec<(Utxo, BackerDatum)>,
  pub unrecognized: Vec<Utxo>,
}

/// Partitions the UTXO set at the campaign address.
///
/// The state-token UTXO is recognized by carrying the configured asset. A
/// UTXO is a backer UTXO iff its inline datum decodes as a
/// [`BackerDatum`]; anything else (no datum, or a datum that fails to
/// decode) lands in `unrecognized`. One malformed UTXO never aborts the
/// scan.
pub fn partition_utxos(utxos: Vec<Utxo>, state_asset: &AssetId) -> Partition {
  let mut partition = Partition::default();
  for utxo in utxos {
    if utxo.value.has_asset(state_asset) {
      // a second token-bearing UTXO cannot exist for a correctly minted
      // campaign; treat any duplicate as unrecognized
      if partition.state_token.is_none() {
        partition.state_token = Some(utxo);
      } else {
        partition.unrecognized.push(utxo);
      }
      continue;
    }
    match &utxo.datum {
      Some(bytes) => match BackerDatum::decode(bytes) {
        Ok(datum) => partition.backers.push((utxo, datum)),
        Err(err) => {
          debug!("skipping UTXO {} with undecodable datum: {err}", utxo.output_ref);
          partition.unrecognized.push(utxo);
        }
      },
      None => partition.unrecognized.push(utxo),
    }
  }
  partition
}

/// Aggregate view of all backer contributions, recomputed from the live
/// UTXO set on every query. Never cached across queries: any backer UTXO
/// can be consumed concurrently by another actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignView {
  pub total_lovelace: Lovelace,
  pub backers: Vec<BackerRecord>,
  per_phase: BTreeMap<u64, Lovelace>,
}

impl CampaignView {
  pub fn total_ada(&self) -> Ada {
    Ada(self.total_lovelace)
  }

  /// Exact sum of contributions targeting one phase.
  pub fn raised_for_phase(&self, index: u64) -> Lovelace {
    self.per_phase.get(&index).copied().unwrap_or(0)
  }
}

/// Folds backer UTXOs into the aggregate view. The totals are a monoid
/// sum in exact integer arithmetic, so the result is independent of UTXO
/// ordering.
pub fn aggregate(
  backers: &[(Utxo, BackerDatum)],
  resolver: &dyn AddressResolver,
) -> CampaignView {
  let mut view = CampaignView::default();
  for (utxo, datum) in backers {
    let contributed = utxo.value.lovelace;
    view.total_lovelace += contributed;
    *view.per_phase.entry(datum.phase_index).or_insert(0) += contributed;
    view.backers.push(BackerRecord {
      utxo_ref: utxo.output_ref,
      pkh: datum.pkh,
      skh: datum.skh,
      address: resolver
        .credential_to_address(&datum.pkh, datum.skh.as_ref()),
      contributed,
      phase_index: datum.phase_index,
    });
  }
  view
}
