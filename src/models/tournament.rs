//! Tournament, its lifecycle status, and the enrollment roster.

use crate::error::TournamentError;
use crate::models::game::MatchId;
use crate::models::participant::{ParticipantRef, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting enrollments; no bracket yet.
    #[default]
    Registration,
    /// Bracket built, matches being played.
    InProgress,
    /// Final resolved or end date passed.
    Completed,
    /// Called off by the host or by expiry before it started.
    Cancelled,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentStatus::Registration => write!(f, "registration"),
            TournamentStatus::InProgress => write!(f, "in_progress"),
            TournamentStatus::Completed => write!(f, "completed"),
            TournamentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Who competes: individual users or squads.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentKind {
    #[default]
    Solo,
    Squad,
}

impl TournamentKind {
    pub fn accepts(self, participant: &ParticipantRef) -> bool {
        match self {
            TournamentKind::Solo => participant.is_user(),
            TournamentKind::Squad => participant.is_squad(),
        }
    }
}

impl fmt::Display for TournamentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentKind::Solo => write!(f, "solo"),
            TournamentKind::Squad => write!(f, "squad"),
        }
    }
}

/// Enrollment form submitted by a participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentForm {
    pub participant: ParticipantRef,
    pub in_game_name: String,
    pub in_game_uid: String,
    pub contact_number: String,
}

/// A roster entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub participant: ParticipantRef,
    pub in_game_name: String,
    pub in_game_uid: String,
    pub contact_number: String,
    pub enrolled_at: DateTime<Utc>,
}

/// Host request for a new tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub title: String,
    pub game: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Option<String>,
    pub host: UserId,
    #[serde(default)]
    pub kind: TournamentKind,
    pub max_participants: usize,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// A hosted tournament.
///
/// `matches` is non-empty exactly when `status` is `InProgress` or `Completed`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    pub game: String,
    pub description: String,
    pub rules: Option<String>,
    pub host: UserId,
    pub kind: TournamentKind,
    pub max_participants: usize,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: TournamentStatus,
    /// Enrollment order.
    pub enrolled: Vec<Enrollment>,
    /// Bracket matches by ascending round.
    pub matches: Vec<MatchId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Validate a host request and open registration.
    pub fn new(request: NewTournament, now: DateTime<Utc>) -> Result<Self, TournamentError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(TournamentError::InvalidInput("title must not be empty"));
        }
        let game = request.game.trim();
        if game.is_empty() {
            return Err(TournamentError::InvalidInput("game must not be empty"));
        }
        if request.max_participants < 2 {
            return Err(TournamentError::InvalidInput(
                "max_participants must be at least 2",
            ));
        }
        if matches!(request.end_date, Some(end) if end < request.start_date) {
            return Err(TournamentError::InvalidInput(
                "end_date must not be before start_date",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            game: game.to_string(),
            description: request.description,
            rules: request.rules,
            host: request.host,
            kind: request.kind,
            max_participants: request.max_participants,
            start_date: request.start_date,
            end_date: request.end_date,
            status: TournamentStatus::Registration,
            enrolled: Vec::new(),
            matches: Vec::new(),
            created_at: now,
        })
    }

    pub fn is_full(&self) -> bool {
        self.enrolled.len() >= self.max_participants
    }

    pub fn is_enrolled(&self, participant: ParticipantRef) -> bool {
        self.enrolled.iter().any(|e| e.participant == participant)
    }

    /// Reject host-only commands from anyone but the host.
    pub fn ensure_host(&self, caller: UserId) -> Result<(), TournamentError> {
        if self.host != caller {
            return Err(TournamentError::NotHost);
        }
        Ok(())
    }

    /// Add a participant to the roster (registration only).
    pub fn enroll(
        &mut self,
        form: EnrollmentForm,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidState("registration is closed"));
        }
        if !self.kind.accepts(&form.participant) {
            return Err(TournamentError::ParticipantKindMismatch { expected: self.kind });
        }
        if self.is_full() {
            return Err(TournamentError::TournamentFull {
                max: self.max_participants,
            });
        }
        if self.is_enrolled(form.participant) {
            return Err(TournamentError::AlreadyEnrolled);
        }
        let in_game_name = form.in_game_name.trim();
        let in_game_uid = form.in_game_uid.trim();
        let contact_number = form.contact_number.trim();
        if in_game_name.is_empty() || in_game_uid.is_empty() || contact_number.is_empty() {
            return Err(TournamentError::InvalidInput(
                "in_game_name, in_game_uid and contact_number are required",
            ));
        }
        self.enrolled.push(Enrollment {
            participant: form.participant,
            in_game_name: in_game_name.to_string(),
            in_game_uid: in_game_uid.to_string(),
            contact_number: contact_number.to_string(),
            enrolled_at: now,
        });
        Ok(())
    }

    /// Record the bracket and move to `InProgress`. Both fields change together.
    pub fn begin(&mut self, matches: Vec<MatchId>) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidState(
                "tournament has already started or ended",
            ));
        }
        if matches.is_empty() {
            log::error!(
                "Tournament {} started with an empty bracket ({} enrolled)",
                self.id,
                self.enrolled.len()
            );
            return Err(TournamentError::InvariantViolation(format!(
                "tournament {} started with an empty bracket",
                self.id
            )));
        }
        self.matches = matches;
        self.status = TournamentStatus::InProgress;
        Ok(())
    }

    /// Final resolved: `InProgress -> Completed`.
    pub fn complete(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::InProgress {
            return Err(TournamentError::InvalidState("tournament is not in progress"));
        }
        self.status = TournamentStatus::Completed;
        Ok(())
    }

    /// `Registration | InProgress -> Cancelled`. Drops the bracket.
    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if !matches!(
            self.status,
            TournamentStatus::Registration | TournamentStatus::InProgress
        ) {
            return Err(TournamentError::InvalidState("tournament has already ended"));
        }
        self.matches.clear();
        self.status = TournamentStatus::Cancelled;
        Ok(())
    }

    /// End date has passed.
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        matches!(self.end_date, Some(end) if end < now)
    }

    /// End date is older than the retention window.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        matches!(self.end_date, Some(end) if end + retention < now)
    }
}
