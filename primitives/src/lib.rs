mod data;
mod datum;
mod hash;
mod redeemer;
mod utxo;

pub use {
  data::{Data, DataError},
  datum::{
    BackerDatum,
    CampaignDatum,
    CampaignState,
    Creator,
    DatumError,
    Phase,
    MAX_TEXT_BYTES,
  },
  hash::{HashError, KeyHash, ToHexString, TxHash},
  redeemer::{MintRedeemer, SpendRedeemer},
  utxo::{Address, AssetId, Lovelace, OutputRef, PolicyId, TxOut, Utxo, Value},
};
