//! In-memory tournament store.
//!
//! Each tournament and its matches sit behind their own mutex, so work on different
//! tournaments runs in parallel while construction and advancement within one tournament
//! are serialized. A bracket is committed by replacing the match list and the tournament
//! status under that lock, so readers see either no bracket or the whole bracket.

use crate::error::TournamentError;
use crate::logic::{begin_match, report_result, start_tournament, Advancement};
use crate::models::{
    EnrollmentForm, GameMatch, MatchId, NewTournament, ParticipantRef, Tournament, TournamentId,
    TournamentStatus, UserId,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// A tournament together with its bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentRecord {
    pub tournament: Tournament,
    /// Ascending round, then position within the round.
    pub matches: Vec<GameMatch>,
}

impl TournamentRecord {
    pub fn get_match(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }
}

/// What one expiry sweep did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SweepReport {
    pub completed: usize,
    pub cancelled: usize,
    pub deleted: usize,
    /// Locked by an in-flight operation; retried next sweep.
    pub skipped: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.completed == 0 && self.cancelled == 0 && self.deleted == 0
    }
}

type Entry = Arc<Mutex<TournamentRecord>>;

#[derive(Default)]
pub struct TournamentStore {
    records: RwLock<HashMap<TournamentId, Entry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: TournamentId) -> Result<Entry, TournamentError> {
        let g = self
            .records
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Run `f` with exclusive access to one tournament and its matches.
    pub fn with_record<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut TournamentRecord) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let entry = self.entry(id)?;
        self.with_entry(id, &entry, f)
    }

    /// Lock `entry` and run `f`, unless the tournament was deleted while waiting for the lock.
    ///
    /// Lock order is entry, then map. Nothing blocks on an entry while holding the map.
    fn with_entry<T>(
        &self,
        id: TournamentId,
        entry: &Entry,
        f: impl FnOnce(&mut TournamentRecord) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut record = entry
            .lock()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        if !self.is_current(id, entry)? {
            return Err(TournamentError::TournamentNotFound(id));
        }
        f(&mut record)
    }

    fn is_current(&self, id: TournamentId, entry: &Entry) -> Result<bool, TournamentError> {
        let g = self
            .records
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        Ok(g.get(&id).is_some_and(|current| Arc::ptr_eq(current, entry)))
    }

    /// Host a new tournament in registration.
    pub fn create(
        &self,
        request: NewTournament,
        now: DateTime<Utc>,
    ) -> Result<Tournament, TournamentError> {
        let tournament = Tournament::new(request, now)?;
        let record = TournamentRecord {
            tournament: tournament.clone(),
            matches: Vec::new(),
        };
        self.records
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?
            .insert(tournament.id, Arc::new(Mutex::new(record)));
        log::info!(
            "Tournament {} ({}) created by host {}",
            tournament.id,
            tournament.title,
            tournament.host.0
        );
        Ok(tournament)
    }

    pub fn get(&self, id: TournamentId) -> Result<TournamentRecord, TournamentError> {
        self.with_record(id, |record| Ok(record.clone()))
    }

    /// All tournaments, newest first.
    pub fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let entries: Vec<Entry> = self
            .records
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?
            .values()
            .cloned()
            .collect();
        let mut tournaments = entries
            .iter()
            .map(|entry| {
                entry
                    .lock()
                    .map(|record| record.tournament.clone())
                    .map_err(|_| TournamentError::StoreUnavailable)
            })
            .collect::<Result<Vec<_>, _>>()?;
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tournaments)
    }

    pub fn enroll(
        &self,
        id: TournamentId,
        form: EnrollmentForm,
        now: DateTime<Utc>,
    ) -> Result<Tournament, TournamentError> {
        self.with_record(id, |record| {
            record.tournament.enroll(form, now)?;
            Ok(record.tournament.clone())
        })
    }

    /// Host starts the tournament: build the bracket and commit it with the status change.
    pub fn start<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        caller: UserId,
        rng: &mut R,
    ) -> Result<TournamentRecord, TournamentError> {
        self.with_record(id, |record| {
            record.tournament.ensure_host(caller)?;
            let bracket = start_tournament(&mut record.tournament, rng)?;
            record.matches = bracket.into_matches();
            Ok(record.clone())
        })
    }

    /// `Ready -> InProgress` for one match.
    pub fn begin_match(
        &self,
        id: TournamentId,
        match_id: MatchId,
    ) -> Result<GameMatch, TournamentError> {
        self.with_record(id, |record| {
            if record.tournament.status != TournamentStatus::InProgress {
                return Err(TournamentError::InvalidState("tournament is not in progress"));
            }
            begin_match(&mut record.matches, match_id)?;
            record
                .get_match(match_id)
                .cloned()
                .ok_or(TournamentError::MatchNotFound(match_id))
        })
    }

    /// Record a winner and advance it. Deciding the final completes the tournament.
    pub fn report_result(
        &self,
        id: TournamentId,
        match_id: MatchId,
        winner: ParticipantRef,
    ) -> Result<(Advancement, TournamentRecord), TournamentError> {
        self.with_record(id, |record| {
            if record.tournament.status != TournamentStatus::InProgress {
                return Err(TournamentError::InvalidState("tournament is not in progress"));
            }
            let advancement = match report_result(&mut record.matches, match_id, winner) {
                Ok(a) => a,
                Err(e @ TournamentError::AlreadyAdvanced(_)) => {
                    log::warn!(
                        "Duplicate result for match {} in tournament {}: {}",
                        match_id,
                        id,
                        e
                    );
                    return Err(e);
                }
                Err(e) => return Err(e),
            };
            if let Advancement::Champion(champion) = advancement {
                record.tournament.complete()?;
                log::info!("Tournament {} completed, won by {}", id, champion);
            }
            Ok((advancement, record.clone()))
        })
    }

    /// Host cancels; any bracket is discarded.
    pub fn cancel(&self, id: TournamentId, caller: UserId) -> Result<Tournament, TournamentError> {
        self.with_record(id, |record| {
            record.tournament.ensure_host(caller)?;
            record.tournament.cancel()?;
            record.matches.clear();
            log::info!("Tournament {} cancelled by host", id);
            Ok(record.tournament.clone())
        })
    }

    /// Host deletes the tournament and its matches.
    ///
    /// The entry leaves the map while its lock is still held, so work queued on the same
    /// tournament sees `TournamentNotFound` instead of committing to a deleted record.
    pub fn delete(&self, id: TournamentId, caller: UserId) -> Result<(), TournamentError> {
        self.with_record(id, |record| {
            record.tournament.ensure_host(caller)?;
            self.records
                .write()
                .map_err(|_| TournamentError::StoreUnavailable)?
                .remove(&id);
            Ok(())
        })?;
        log::info!("Tournament {} deleted by host", id);
        Ok(())
    }

    /// Close tournaments past their end date and delete those past the retention window.
    ///
    /// Tournaments whose lock is held are skipped, so a sweep never interleaves with a
    /// bracket construction or advancement on the same tournament.
    pub fn sweep_expired(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Result<SweepReport, TournamentError> {
        let mut report = SweepReport::default();
        let mut g = self
            .records
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.retain(|id, entry| {
            let Ok(mut record) = entry.try_lock() else {
                report.skipped += 1;
                return true;
            };
            if record.tournament.is_expired(now, retention) {
                log::info!(
                    "Deleting expired tournament {} with {} matches",
                    id,
                    record.matches.len()
                );
                report.deleted += 1;
                return false;
            }
            if record.tournament.has_ended(now) {
                match record.tournament.status {
                    TournamentStatus::InProgress => {
                        record.tournament.status = TournamentStatus::Completed;
                        report.completed += 1;
                    }
                    TournamentStatus::Registration => {
                        record.tournament.status = TournamentStatus::Cancelled;
                        report.cancelled += 1;
                    }
                    TournamentStatus::Completed | TournamentStatus::Cancelled => {}
                }
            }
            true
        });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TournamentKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hosted(store: &TournamentStore, host: UserId) -> TournamentId {
        let now = Utc::now();
        let t = store
            .create(
                NewTournament {
                    title: "Night Cup".to_string(),
                    game: "Valorant".to_string(),
                    description: String::new(),
                    rules: None,
                    host,
                    kind: TournamentKind::Solo,
                    max_participants: 8,
                    start_date: now,
                    end_date: None,
                },
                now,
            )
            .unwrap();
        for i in 0..4 {
            store
                .enroll(
                    t.id,
                    EnrollmentForm {
                        participant: ParticipantRef::user(UserId::new()),
                        in_game_name: format!("agent{i}"),
                        in_game_uid: format!("{i:04}"),
                        contact_number: "555-0101".to_string(),
                    },
                    now,
                )
                .unwrap();
        }
        t.id
    }

    #[test]
    fn work_queued_before_delete_finds_nothing() {
        let store = TournamentStore::new();
        let host = UserId::new();
        let id = hosted(&store, host);

        // Taken before the delete, as a concurrent `start` would.
        let stale = store.entry(id).unwrap();
        store.delete(id, host).unwrap();

        let result = store.with_entry(id, &stale, |record| {
            record.tournament.ensure_host(host)?;
            let bracket = start_tournament(&mut record.tournament, &mut StdRng::seed_from_u64(3))?;
            record.matches = bracket.into_matches();
            Ok(())
        });
        assert_eq!(result, Err(TournamentError::TournamentNotFound(id)));
        assert_eq!(
            stale.lock().unwrap().tournament.status,
            TournamentStatus::Registration
        );
        assert!(matches!(
            store.get(id),
            Err(TournamentError::TournamentNotFound(_))
        ));
    }

    #[test]
    fn recreated_id_is_not_confused_with_a_deleted_entry() {
        let store = TournamentStore::new();
        let host = UserId::new();
        let id = hosted(&store, host);
        let stale = store.entry(id).unwrap();
        assert!(store.is_current(id, &stale).unwrap());

        store.records.write().unwrap().remove(&id);
        let replacement = stale.lock().unwrap().clone();
        store
            .records
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(replacement)));
        assert!(!store.is_current(id, &stale).unwrap());
        assert!(store.get(id).is_ok());
    }
}
