//! Change review: propose, preview, then apply or cancel.
//!
//! Every mutating operation goes through [`ChangeReview`]:
//!
//! ```text
//! Idle ──propose──▶ Proposed ──apply──▶ Idle (candidate handed back)
//!   ▲                   │
//!   └──────cancel───────┘
//! ```
//!
//! A proposal whose candidate equals the original never leaves `Idle`; the
//! caller is told there is nothing to review. The machine does not touch
//! the document or the disk itself: [`ChangeReview::apply`] returns the
//! candidate and the caller decides where it goes.

use std::fmt;

use crate::diff::DiffScript;
use crate::error::HostsError;
use crate::operator::Operator;

/// Operations that can be proposed for review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    Clean,
    Deduplicate,
    WhitelistFilter,
    RemoveKeyword(String),
    /// Whitelist filter followed by Clean, run before writing to disk
    Save,
    Restore,
}

impl Transformation {
    /// Title shown above the preview
    pub fn title(&self) -> String {
        match self {
            Self::Clean => "Preview: Clean".to_string(),
            Self::Deduplicate => "Preview: Deduplicate".to_string(),
            Self::WhitelistFilter => "Preview: Whitelist filter".to_string(),
            Self::RemoveKeyword(keyword) => format!("Preview: Remove entries matching '{}'", keyword),
            Self::Save => "Preview: Save".to_string(),
            Self::Restore => "Preview: Revert to backup".to_string(),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("clean"),
            Self::Deduplicate => f.write_str("deduplicate"),
            Self::WhitelistFilter => f.write_str("whitelist filter"),
            Self::RemoveKeyword(_) => f.write_str("keyword removal"),
            Self::Save => f.write_str("save"),
            Self::Restore => f.write_str("restore"),
        }
    }
}

/// Operator's verdict on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Apply,
    Cancel,
}

/// Result of running a transformation through review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Candidate equals the original; nothing was shown
    NoChanges,
    Applied(Vec<String>),
    Cancelled,
}

/// A candidate awaiting the operator's decision
#[derive(Debug, Clone)]
pub struct Proposal {
    pub transformation: Transformation,
    pub candidate: Vec<String>,
    pub script: DiffScript,
}

#[derive(Debug, Default)]
enum ReviewState {
    #[default]
    Idle,
    Proposed(Proposal),
}

impl ReviewState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Proposed(_) => "a proposal is pending",
        }
    }
}

/// Synchronous review state machine
#[derive(Debug, Default)]
pub struct ChangeReview {
    state: ReviewState,
}

impl ChangeReview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ReviewState::Idle)
    }

    /// Proposal currently awaiting a decision
    pub fn pending(&self) -> Option<&Proposal> {
        match &self.state {
            ReviewState::Proposed(proposal) => Some(proposal),
            ReviewState::Idle => None,
        }
    }

    /// Propose `candidate` as the replacement for `original`.
    ///
    /// Returns `Ok(None)` and stays idle when nothing would change.
    pub fn propose(
        &mut self,
        transformation: Transformation,
        original: &[String],
        candidate: Vec<String>,
    ) -> Result<Option<&Proposal>, HostsError> {
        if !self.is_idle() {
            return Err(HostsError::InvalidTransition {
                action: "propose",
                state: self.state.name(),
            });
        }
        if original == candidate.as_slice() {
            return Ok(None);
        }

        let script = DiffScript::compute(original, &candidate);
        self.state = ReviewState::Proposed(Proposal {
            transformation,
            candidate,
            script,
        });
        Ok(self.pending())
    }

    /// Accept the pending proposal and hand back its candidate
    pub fn apply(&mut self) -> Result<Proposal, HostsError> {
        match std::mem::take(&mut self.state) {
            ReviewState::Proposed(proposal) => Ok(proposal),
            ReviewState::Idle => Err(HostsError::InvalidTransition {
                action: "apply",
                state: ReviewState::Idle.name(),
            }),
        }
    }

    /// Reject the pending proposal
    pub fn cancel(&mut self) -> Result<(), HostsError> {
        match std::mem::take(&mut self.state) {
            ReviewState::Proposed(_) => Ok(()),
            ReviewState::Idle => Err(HostsError::InvalidTransition {
                action: "cancel",
                state: ReviewState::Idle.name(),
            }),
        }
    }
}

/// Drive one full review: propose, show the diff, act on the decision
pub fn review<O: Operator + ?Sized>(
    operator: &O,
    transformation: Transformation,
    original: &[String],
    candidate: Vec<String>,
) -> Result<ReviewOutcome, HostsError> {
    let mut machine = ChangeReview::new();
    let decision = match machine.propose(transformation, original, candidate)? {
        None => return Ok(ReviewOutcome::NoChanges),
        Some(proposal) => operator.review(&proposal.transformation.title(), &proposal.script),
    };

    match decision {
        Decision::Apply => Ok(ReviewOutcome::Applied(machine.apply()?.candidate)),
        Decision::Cancel => {
            machine.cancel()?;
            Ok(ReviewOutcome::Cancelled)
        }
    }
}
