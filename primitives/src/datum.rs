use {
  crate::{
    data::{Data, DataError},
    hash::{HashError, KeyHash},
  },
  serde::{Deserialize, Serialize},
  thiserror::Error,
};

/// Upper bound on the UTF-8 byte length of free-form text fields.
pub const MAX_TEXT_BYTES: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum DatumError {
  #[error("malformed datum: {0}")]
  Malformed(#[from] DataError),

  #[error("malformed datum: expected {expected} while decoding {what}")]
  Shape {
    what: &'static str,
    expected: &'static str,
  },

  #[error(
    "malformed datum: constructor tag {found} is not valid for {what}"
  )]
  UnexpectedTag { what: &'static str, found: u64 },

  #[error("malformed datum: {what} has {found} fields, expected {expected}")]
  FieldCount {
    what: &'static str,
    found: usize,
    expected: usize,
  },

  #[error("unknown campaign state constructor {0}")]
  UnknownState(u64),

  #[error("malformed datum: {0}")]
  Hash(#[from] HashError),

  #[error("text field is not valid UTF-8")]
  InvalidText,

  #[error("text field of {0} bytes exceeds the {MAX_TEXT_BYTES} byte bound")]
  TextTooLong(usize),

  #[error("phase goal {0} is negative")]
  NegativeGoal(i128),

  #[error("total budget {total} does not equal the sum of phase goals {sum}")]
  BudgetMismatch { total: i128, sum: i128 },

  #[error("phase index {index} out of range for {phases} phases")]
  PhaseOutOfRange { index: u64, phases: usize },

  #[error("{what} value {found} does not fit an unsigned 64-bit field")]
  FieldOutOfRange { what: &'static str, found: i128 },
}

/// Production pipeline state of a campaign.
///
/// Constructor indices are part of the on-ledger format and are fixed
/// forever: PreProduction=0 through Cancelled=5. Decoding any other index
/// fails with [`DatumError::UnknownState`], it never falls back to a
/// default state.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum CampaignState {
  PreProduction,
  Production,
  PostProduction,
  Distribution,
  Completed,
  Cancelled,
}

impl CampaignState {
  pub const fn index(&self) -> u64 {
    match self {
      CampaignState::PreProduction => 0,
      CampaignState::Production => 1,
      CampaignState::PostProduction => 2,
      CampaignState::Distribution => 3,
      CampaignState::Completed => 4,
      CampaignState::Cancelled => 5,
    }
  }

  pub fn from_index(index: u64) -> Result<Self, DatumError> {
    Ok(match index {
      0 => CampaignState::PreProduction,
      1 => CampaignState::Production,
      2 => CampaignState::PostProduction,
      3 => CampaignState::Distribution,
      4 => CampaignState::Completed,
      5 => CampaignState::Cancelled,
      other => return Err(DatumError::UnknownState(other)),
    })
  }

  /// Terminal states have no outgoing transitions.
  pub const fn is_terminal(&self) -> bool {
    matches!(self, CampaignState::Completed | CampaignState::Cancelled)
  }

  fn to_data(self) -> Data {
    Data::constr(self.index(), vec![])
  }

  fn from_data(data: &Data) -> Result<Self, DatumError> {
    let (tag, fields) = expect_constr(data, "CampaignState")?;
    if !fields.is_empty() {
      return Err(DatumError::FieldCount {
        what: "CampaignState",
        found: fields.len(),
        expected: 0,
      });
    }
    Self::from_index(tag)
  }
}

/// A funding phase of the campaign: named goal with a deadline in ledger
/// time (milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
  pub name: String,
  pub goal: i128,
  pub deadline: u64,
}

impl Phase {
  fn to_data(&self) -> Data {
    Data::constr(0, vec![
      Data::text(&self.name),
      Data::Int(self.goal),
      Data::Int(self.deadline as i128),
    ])
  }

  fn from_data(data: &Data) -> Result<Self, DatumError> {
    let fields = expect_constr_tag(data, "Phase", 0, 3)?;
    Ok(Phase {
      name: expect_text(&fields[0], "Phase.name")?,
      goal: expect_int(&fields[1], "Phase.goal")?,
      deadline: expect_u64(&fields[2], "Phase.deadline")?,
    })
  }
}

/// Payment and optional stake credential of the campaign creator.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Creator {
  pub pkh: KeyHash,
  pub skh: Option<KeyHash>,
}

impl Creator {
  fn to_data(&self) -> Data {
    Data::constr(0, vec![
      Data::Bytes(self.pkh.as_ref().to_vec()),
      Data::option(self.skh.map(|h| Data::Bytes(h.as_ref().to_vec()))),
    ])
  }

  fn from_data(data: &Data) -> Result<Self, DatumError> {
    let fields = expect_constr_tag(data, "Creator", 0, 2)?;
    Ok(Creator {
      pkh: expect_key_hash(&fields[0], "Creator.pkh")?,
      skh: expect_option(&fields[1], "Creator.skh")?
        .map(|d| expect_key_hash(d, "Creator.skh"))
        .transpose()?,
    })
  }
}

/// The campaign state attached to the state-token UTXO.
///
/// There is exactly one live instance of this datum per campaign: the UTXO
/// carrying the uniquely minted state token. Mutation never happens in
/// place; every transition consumes that UTXO and produces a successor
/// carrying the re-encoded datum and the same token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDatum {
  pub title: String,
  pub director: String,
  pub phases: Vec<Phase>,
  pub current_phase_index: u64,
  pub creator: Creator,
  /// Always equals the sum of phase goals. The invariant is enforced both
  /// at construction and at decode, so a datum read off the ledger can be
  /// trusted without re-checking.
  pub total_budget: i128,
  pub state: CampaignState,
}

impl CampaignDatum {
  /// Builds the launch datum: state `PreProduction`, first phase current,
  /// budget derived from the phase goals.
  pub fn new(
    title: impl Into<String>,
    director: impl Into<String>,
    phases: Vec<Phase>,
    creator: Creator,
  ) -> Result<Self, DatumError> {
    let total_budget = phases.iter().map(|p| p.goal).sum();
    let datum = CampaignDatum {
      title: title.into(),
      director: director.into(),
      phases,
      current_phase_index: 0,
      creator,
      total_budget,
      state: CampaignState::PreProduction,
    };
    datum.validate()?;
    Ok(datum)
  }

  /// The phase contributions are currently collected for. `None` only in
  /// terminal states.
  pub fn current_phase(&self) -> Option<&Phase> {
    self.phases.get(self.current_phase_index as usize)
  }

  pub fn is_last_phase(&self) -> bool {
    self.current_phase_index as usize + 1 == self.phases.len()
  }

  pub fn validate(&self) -> Result<(), DatumError> {
    check_text(&self.title)?;
    check_text(&self.director)?;
    for phase in &self.phases {
      check_text(&phase.name)?;
      if phase.goal < 0 {
        return Err(DatumError::NegativeGoal(phase.goal));
      }
    }
    let sum: i128 = self.phases.iter().map(|p| p.goal).sum();
    if self.total_budget != sum {
      return Err(DatumError::BudgetMismatch {
        total: self.total_budget,
        sum,
      });
    }
    if !self.state.is_terminal()
      && self.current_phase_index as usize >= self.phases.len()
    {
      return Err(DatumError::PhaseOutOfRange {
        index: self.current_phase_index,
        phases: self.phases.len(),
      });
    }
    Ok(())
  }

  pub fn to_data(&self) -> Data {
    Data::constr(0, vec![
      Data::text(&self.title),
      Data::text(&self.director),
      Data::List(self.phases.iter().map(Phase::to_data).collect()),
      Data::Int(self.current_phase_index as i128),
      self.creator.to_data(),
      Data::Int(self.total_budget),
      self.state.to_data(),
    ])
  }

  pub fn from_data(data: &Data) -> Result<Self, DatumError> {
    let fields = expect_constr_tag(data, "CampaignDatum", 0, 7)?;
    let phases = fields[2]
      .as_list()
      .ok_or(DatumError::Shape {
        what: "CampaignDatum.phases",
        expected: "list",
      })?
      .iter()
      .map(Phase::from_data)
      .collect::<Result<Vec<_>, _>>()?;
    let datum = CampaignDatum {
      title: expect_text(&fields[0], "CampaignDatum.title")?,
      director: expect_text(&fields[1], "CampaignDatum.director")?,
      phases,
      current_phase_index: expect_u64(&fields[3], "CampaignDatum.index")?,
      creator: Creator::from_data(&fields[4])?,
      total_budget: expect_int(&fields[5], "CampaignDatum.total_budget")?,
      state: CampaignState::from_data(&fields[6])?,
    };
    datum.validate()?;
    Ok(datum)
  }

  pub fn encode(&self) -> Vec<u8> {
    self.to_data().encode()
  }

  pub fn decode(bytes: &[u8]) -> Result<Self, DatumError> {
    Self::from_data(&Data::decode(bytes)?)
  }
}

/// The datum attached to every contribution UTXO.
///
/// Note that the contributed amount is deliberately absent: it is the
/// lovelace value of the UTXO carrying this datum. The datum only records
/// who to refund and which phase the contribution targets.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct BackerDatum {
  pub pkh: KeyHash,
  pub skh: Option<KeyHash>,
  pub phase_index: u64,
}

impl BackerDatum {
  pub fn to_data(&self) -> Data {
    Data::constr(0, vec![
      Data::Bytes(self.pkh.as_ref().to_vec()),
      Data::option(self.skh.map(|h| Data::Bytes(h.as_ref().to_vec()))),
      Data::Int(self.phase_index as i128),
    ])
  }

  pub fn from_data(data: &Data) -> Result<Self, DatumError> {
    let fields = expect_constr_tag(data, "BackerDatum", 0, 3)?;
    Ok(BackerDatum {
      pkh: expect_key_hash(&fields[0], "BackerDatum.pkh")?,
      skh: expect_option(&fields[1], "BackerDatum.skh")?
        .map(|d| expect_key_hash(d, "BackerDatum.skh"))
        .transpose()?,
      phase_index: expect_u64(&fields[2], "BackerDatum.phase_index")?,
    })
  }

  pub fn encode(&self) -> Vec<u8> {
    self.to_data().encode()
  }

  pub fn decode(bytes: &[u8]) -> Result<Self, DatumError> {
    Self::from_data(&Data::decode(bytes)?)
  }
}

fn check_text(s: &str) -> Result<(), DatumError> {
  if s.len() > MAX_TEXT_BYTES {
    return Err(DatumError::TextTooLong(s.len()));
  }
  Ok(())
}

fn expect_constr<'a>(
  data: &'a Data,
  what: &'static str,
) -> Result<(u64, &'a [Data]), DatumError> {
  data.as_constr().ok_or(DatumError::Shape {
    what,
    expected: "constructor",
  })
}

fn expect_constr_tag<'a>(
  data: &'a Data,
  what: &'static str,
  tag: u64,
  fields: usize,
) -> Result<&'a [Data], DatumError> {
  let (found_tag, found_fields) = expect_constr(data, what)?;
  if found_tag != tag {
    return Err(DatumError::UnexpectedTag {
      what,
      found: found_tag,
    });
  }
  if found_fields.len() != fields {
    return Err(DatumError::FieldCount {
      what,
      found: found_fields.len(),
      expected: fields,
    });
  }
  Ok(found_fields)
}

fn expect_int(data: &Data, what: &'static str) -> Result<i128, DatumError> {
  data.as_int().ok_or(DatumError::Shape {
    what,
    expected: "integer",
  })
}

fn expect_u64(data: &Data, what: &'static str) -> Result<u64, DatumError> {
  let value = expect_int(data, what)?;
  u64::try_from(value)
    .map_err(|_| DatumError::FieldOutOfRange { what, found: value })
}

fn expect_text(data: &Data, what: &'static str) -> Result<String, DatumError> {
  let bytes = data.as_bytes().ok_or(DatumError::Shape {
    what,
    expected: "byte string",
  })?;
  let text = std::str::from_utf8(bytes).map_err(|_| DatumError::InvalidText)?;
  check_text(text)?;
  Ok(text.to_owned())
}

fn expect_key_hash(
  data: &Data,
  what: &'static str,
) -> Result<KeyHash, DatumError> {
  let bytes = data.as_bytes().ok_or(DatumError::Shape {
    what,
    expected: "byte string",
  })?;
  Ok(KeyHash::try_from(bytes)?)
}

fn expect_option<'a>(
  data: &'a Data,
  what: &'static str,
) -> Result<Option<&'a Data>, DatumError> {
  let (tag, fields) = expect_constr(data, what)?;
  match (tag, fields) {
    (0, []) => Ok(None),
    (1, [value]) => Ok(Some(value)),
    (0 | 1, fields) => Err(DatumError::FieldCount {
      what,
      found: fields.len(),
      expected: tag as usize,
    }),
    (other, _) => Err(DatumError::UnexpectedTag { what, found: other }),
  }
}
