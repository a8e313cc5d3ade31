use {
  crate::{aggregate::CampaignView, error::Error},
  cinefund_primitives::{CampaignDatum, CampaignState, KeyHash},
  serde::{Deserialize, Serialize},
};

/// Every operation a campaign supports. Each maps 1:1 to a redeemer
/// constructor of the deployed validator (see
/// `cinefund_primitives::MintRedeemer` / `SpendRedeemer`).
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Action {
  Launch,
  Contribute,
  AdvancePhase,
  Cancel,
  Conclude,
  RefundBacker,
  Distribute,
}

/// Everything a guard is allowed to look at. Guards are pure functions of
/// this input; evaluating the same input twice always yields the same
/// answer, and nothing here touches the ledger.
#[derive(Debug, Clone, Copy)]
pub struct GuardInput<'a> {
  pub datum: &'a CampaignDatum,
  pub view: &'a CampaignView,
  /// Ledger time in milliseconds, from the chain-time oracle.
  pub now: u64,
  /// Credential of whoever is requesting the action, when known. Only the
  /// cancel guard distinguishes the creator from everyone else.
  pub caller: Option<&'a KeyHash>,
}

impl<'a> GuardInput<'a> {
  fn current_goal_met(&self) -> bool {
    match self.datum.current_phase() {
      Some(phase) => {
        self.view.raised_for_phase(self.datum.current_phase_index)
          >= phase.goal
      }
      None => false,
    }
  }

  fn current_deadline_passed(&self) -> bool {
    match self.datum.current_phase() {
      Some(phase) => self.now >= phase.deadline,
      None => false,
    }
  }

  fn all_goals_met(&self) -> bool {
    self
      .datum
      .phases
      .iter()
      .enumerate()
      .all(|(i, phase)| self.view.raised_for_phase(i as u64) >= phase.goal)
  }

  fn caller_is_creator(&self) -> bool {
    self.caller == Some(&self.datum.creator.pkh)
  }
}

/// Decides whether `action` is legal given the current datum, aggregate
/// backer view, chain time and caller.
pub fn evaluate_guard(action: Action, input: GuardInput<'_>) -> bool {
  let state = input.datum.state;
  if state.is_terminal() && action != Action::RefundBacker {
    return false;
  }
  match action {
    // launching is only meaningful for a fresh datum
    Action::Launch => {
      state == CampaignState::PreProduction
        && input.datum.current_phase_index == 0
        && input.view.backers.is_empty()
    }
    Action::Contribute => !state.is_terminal(),
    // once the last phase has reached Distribution there is nothing left
    // to advance towards, only Conclude exits the stage
    Action::AdvancePhase => {
      !(state == CampaignState::Distribution && input.datum.is_last_phase())
        && (input.current_goal_met() || input.current_deadline_passed())
    }
    // anyone may cancel while the current goal is unmet; once it is met,
    // only the creator can
    Action::Cancel => !input.current_goal_met() || input.caller_is_creator(),
    Action::Conclude => input.datum.is_last_phase() && input.all_goals_met(),
    Action::Distribute => {
      state == CampaignState::Distribution && input.all_goals_met()
    }
    Action::RefundBacker => state == CampaignState::Cancelled,
  }
}

/// Validates `action` against the current state and produces the
/// successor datum.
///
/// This is the single place transition effects are defined. The returned
/// datum is what the successor state-token UTXO must carry; actions that
/// leave the campaign datum untouched (contribute, refund) return it
/// unchanged. A failed guard is rejected here, before any ledger
/// operation is built.
pub fn apply(
  action: Action,
  input: GuardInput<'_>,
) -> Result<CampaignDatum, Error> {
  if !evaluate_guard(action, input) {
    return Err(reject(action, input));
  }
  let mut datum = input.datum.clone();
  match action {
    Action::Launch | Action::Contribute | Action::RefundBacker => {}
    Action::AdvancePhase => {
      // move within the phases array while sub-phases remain, and step
      // the pipeline state at most one stage forward
      if !datum.is_last_phase() {
        datum.current_phase_index += 1;
      }
      datum.state = next_stage(datum.state);
    }
    Action::Cancel => datum.state = CampaignState::Cancelled,
    Action::Conclude => datum.state = CampaignState::Completed,
    // payout-only: the datum keeps state Distribution
    Action::Distribute => {}
  }
  Ok(datum)
}

/// Working states advance one stage per phase transition and saturate at
/// Distribution; only `Conclude` reaches `Completed`.
fn next_stage(state: CampaignState) -> CampaignState {
  match state {
    CampaignState::PreProduction => CampaignState::Production,
    CampaignState::Production => CampaignState::PostProduction,
    CampaignState::PostProduction | CampaignState::Distribution => {
      CampaignState::Distribution
    }
    terminal => terminal,
  }
}

fn reject(action: Action, input: GuardInput<'_>) -> Error {
  // distinguish business-rule failures from plain state mismatches where
  // the caller can tell them apart
  if matches!(action, Action::Conclude | Action::Distribute)
    && !input.datum.state.is_terminal()
  {
    let unmet = input.datum.phases.iter().enumerate().find(|(i, phase)| {
      input.view.raised_for_phase(*i as u64) < phase.goal
    });
    if let Some((i, phase)) = unmet {
      return Error::GoalNotMet {
        phase: i as u64,
        raised: input.view.raised_for_phase(i as u64),
        goal: phase.goal,
      };
    }
  }
  Error::IllegalTransition {
    from: input.datum.state,
    action,
  }
}
