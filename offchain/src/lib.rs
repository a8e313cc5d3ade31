mod aggregate;
mod campaign;
mod chain;
mod config;
mod error;
mod intent;
mod machine;

pub use {
  aggregate::{aggregate, partition_utxos, Ada, BackerRecord, CampaignView, Partition},
  campaign::{Campaign, CampaignSnapshot},
  chain::{
    AddressResolver,
    ChainClock,
    ChainError,
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
    build_finish_phase,
    build_launch,
    build_refund,
    TxIntent,
  },
  machine::{apply, evaluate_guard, Action, GuardInput},
};
