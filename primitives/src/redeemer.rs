use {
  crate::{
    data::Data,
    datum::{BackerDatum, CampaignDatum},
  },
  serde::{Deserialize, Serialize},
};

/// Redeemers for the campaign minting policy.
///
/// The constructor mapping is 1:1 with the validator branches and fixed
/// forever: 0 = Launch, 1 = Contribute, 2 = FinishPhase. Launch carries
/// the full launch datum so the policy can check the minted token is bound
/// to it; the other two carry the backer datum of the affected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintRedeemer {
  Launch(CampaignDatum),
  Contribute(BackerDatum),
  FinishPhase(BackerDatum),
}

impl MintRedeemer {
  pub fn to_data(&self) -> Data {
    match self {
      MintRedeemer::Launch(datum) => Data::constr(0, vec![datum.to_data()]),
      MintRedeemer::Contribute(datum) => {
        Data::constr(1, vec![datum.to_data()])
      }
      MintRedeemer::FinishPhase(datum) => {
        Data::constr(2, vec![datum.to_data()])
      }
    }
  }

  pub fn encode(&self) -> Vec<u8> {
    self.to_data().encode()
  }
}

/// Redeemers for the campaign spending validator.
///
/// Nullary constructors, 1:1 with validator branches: 0 = Cancel,
/// 1 = AdvancePhase, 2 = RefundBacker, 3 = Conclude, 4 = Distribute.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum SpendRedeemer {
  Cancel,
  AdvancePhase,
  RefundBacker,
  Conclude,
  Distribute,
}

impl SpendRedeemer {
  pub const fn index(&self) -> u64 {
    match self {
      SpendRedeemer::Cancel => 0,
      SpendRedeemer::AdvancePhase => 1,
      SpendRedeemer::RefundBacker => 2,
      SpendRedeemer::Conclude => 3,
      SpendRedeemer::Distribute => 4,
    }
  }

  pub fn to_data(&self) -> Data {
    Data::constr(self.index(), vec![])
  }

  pub fn encode(&self) -> Vec<u8> {
    self.to_data().encode()
  }
}
