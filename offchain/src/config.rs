use {
  cinefund_primitives::{Address, AssetId, KeyHash, OutputRef, PolicyId},
  serde::{Deserialize, Serialize},
};

/// Everything that identifies one launched campaign on the ledger.
///
/// Injected at construction wherever it is needed; there are no
/// process-wide policy or script singletons. The policy, address and
/// nonce are produced by the external script-derivation collaborator at
/// launch time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
  /// Minting policy derived from (platform, creator, nonce).
  pub policy: PolicyId,

  /// Script address all campaign UTXOs live at.
  pub campaign_address: Address,

  /// Platform operator credential, a parameter of the derived scripts.
  pub platform_pkh: KeyHash,

  /// The output reference consumed at launch. Seeds script derivation so
  /// repeated launches produce distinct policies.
  pub nonce: OutputRef,

  /// Whether terminal transitions burn the state token or leave it
  /// dormant on a final UTXO. Both are valid designs; the choice is part
  /// of the deployed validator and must match it.
  pub burn_on_terminal: bool,

  state_token_name: Vec<u8>,
  support_token_name: Vec<u8>,
  reward_token_name: Vec<u8>,
}

impl CampaignConfig {
  pub fn new(
    policy: PolicyId,
    campaign_address: Address,
    platform_pkh: KeyHash,
    nonce: OutputRef,
  ) -> Self {
    Self {
      policy,
      campaign_address,
      platform_pkh,
      nonce,
      burn_on_terminal: false,
      state_token_name: b"state_token".to_vec(),
      support_token_name: b"support_token".to_vec(),
      reward_token_name: b"reward_token".to_vec(),
    }
  }

  pub fn with_burn_on_terminal(mut self, burn: bool) -> Self {
    self.burn_on_terminal = burn;
    self
  }

  /// The uniquely minted asset that marks "the" campaign state UTXO.
  pub fn state_asset(&self) -> AssetId {
    AssetId::new(self.policy.clone(), self.state_token_name.clone())
  }

  /// Minted to each backer output at contribution time.
  pub fn support_asset(&self) -> AssetId {
    AssetId::new(self.policy.clone(), self.support_token_name.clone())
  }

  /// Minted in exchange for a support token when a phase finishes.
  pub fn reward_asset(&self) -> AssetId {
    AssetId::new(self.policy.clone(), self.reward_token_name.clone())
  }
}
