//! Integration tests for the tournament store: commits, results, cancellation and expiry.

use chrono::{DateTime, Duration, Utc};
use playcore_tournaments::{
    Advancement, EnrollmentForm, MatchStatus, NewTournament, ParticipantRef, SweepReport,
    TournamentError, TournamentId, TournamentStatus, TournamentStore, UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn host_tournament(
    store: &TournamentStore,
    host: UserId,
    players: usize,
    end_date: Option<DateTime<Utc>>,
) -> TournamentId {
    let start = Utc::now() - Duration::days(10);
    let t = store
        .create(
            NewTournament {
                title: "Ranked Open".to_string(),
                game: "Rocket League".to_string(),
                description: String::new(),
                rules: Some("Best of three".to_string()),
                host,
                kind: Default::default(),
                max_participants: 32,
                start_date: start,
                end_date,
            },
            Utc::now(),
        )
        .unwrap();
    for i in 0..players {
        store
            .enroll(
                t.id,
                EnrollmentForm {
                    participant: ParticipantRef::user(UserId::new()),
                    in_game_name: format!("player{i}"),
                    in_game_uid: format!("{i:04}"),
                    contact_number: "555-0100".to_string(),
                },
                Utc::now(),
            )
            .unwrap();
    }
    t.id
}

#[test]
fn start_commits_bracket_with_status() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let id = host_tournament(&store, host, 5, None);

    let record = store
        .start(id, host, &mut StdRng::seed_from_u64(11))
        .unwrap();
    assert_eq!(record.tournament.status, TournamentStatus::InProgress);
    assert_eq!(record.matches.len(), 7);
    assert_eq!(
        record.tournament.matches,
        record.matches.iter().map(|m| m.id).collect::<Vec<_>>()
    );
    assert_eq!(store.get(id).unwrap(), record);
}

#[test]
fn rejected_start_leaves_nothing_behind() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let id = host_tournament(&store, host, 1, None);
    let before = store.get(id).unwrap();

    assert!(matches!(
        store.start(id, host, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::InsufficientParticipants { .. })
    ));
    assert_eq!(
        store.start(id, UserId::new(), &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::NotHost)
    );
    assert_eq!(store.get(id).unwrap(), before);
}

#[test]
fn unknown_tournament_is_not_found() {
    let store = TournamentStore::new();
    let id = uuid::Uuid::new_v4();
    assert_eq!(store.get(id), Err(TournamentError::TournamentNotFound(id)));
}

#[test]
fn results_before_start_are_rejected() {
    let store = TournamentStore::new();
    let id = host_tournament(&store, UserId::new(), 2, None);
    assert!(matches!(
        store.report_result(id, uuid::Uuid::new_v4(), ParticipantRef::user(UserId::new())),
        Err(TournamentError::InvalidState(_))
    ));
}

#[test]
fn deciding_the_final_completes_the_tournament() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let id = host_tournament(&store, host, 3, None);
    let record = store.start(id, host, &mut StdRng::seed_from_u64(2)).unwrap();

    let opener = record.matches[0].clone();
    assert_eq!(opener.status, MatchStatus::Ready);
    store.begin_match(id, opener.id).unwrap();
    let winner = opener.slots[1].unwrap();
    let (advancement, record) = store.report_result(id, opener.id, winner).unwrap();
    let final_id = record.matches[2].id;
    assert_eq!(
        advancement,
        Advancement::Advanced {
            next_match: final_id,
            slot: 1,
            next_ready: true
        }
    );
    assert_eq!(
        store.report_result(id, opener.id, winner).unwrap_err(),
        TournamentError::AlreadyAdvanced(opener.id)
    );

    let (advancement, record) = store.report_result(id, final_id, winner).unwrap();
    assert_eq!(advancement, Advancement::Champion(winner));
    assert_eq!(record.tournament.status, TournamentStatus::Completed);
}

#[test]
fn cancel_discards_the_bracket() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let id = host_tournament(&store, host, 4, None);
    store.start(id, host, &mut StdRng::seed_from_u64(2)).unwrap();

    assert_eq!(store.cancel(id, UserId::new()), Err(TournamentError::NotHost));
    let t = store.cancel(id, host).unwrap();
    assert_eq!(t.status, TournamentStatus::Cancelled);
    let record = store.get(id).unwrap();
    assert!(record.matches.is_empty());
    assert!(record.tournament.matches.is_empty());
}

#[test]
fn delete_requires_the_host() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let id = host_tournament(&store, host, 0, None);
    assert_eq!(store.delete(id, UserId::new()), Err(TournamentError::NotHost));
    store.delete(id, host).unwrap();
    assert_eq!(store.get(id), Err(TournamentError::TournamentNotFound(id)));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn sweep_closes_ended_and_deletes_expired() {
    let store = TournamentStore::new();
    let host = UserId::new();
    let now = Utc::now();
    let retention = Duration::hours(24);

    let running = host_tournament(&store, host, 4, Some(now - Duration::hours(1)));
    store.start(running, host, &mut StdRng::seed_from_u64(4)).unwrap();
    let never_started = host_tournament(&store, host, 1, Some(now - Duration::hours(1)));
    let expired = host_tournament(&store, host, 2, Some(now - Duration::hours(48)));
    let upcoming = host_tournament(&store, host, 2, Some(now + Duration::days(3)));

    let report = store.sweep_expired(now, retention).unwrap();
    assert_eq!(
        report,
        SweepReport {
            completed: 1,
            cancelled: 1,
            deleted: 1,
            skipped: 0
        }
    );
    assert_eq!(
        store.get(running).unwrap().tournament.status,
        TournamentStatus::Completed
    );
    assert_eq!(
        store.get(never_started).unwrap().tournament.status,
        TournamentStatus::Cancelled
    );
    assert_eq!(
        store.get(expired),
        Err(TournamentError::TournamentNotFound(expired))
    );
    assert_eq!(
        store.get(upcoming).unwrap().tournament.status,
        TournamentStatus::Registration
    );
    assert_eq!(store.list().unwrap().len(), 3);
}

#[test]
fn sweep_skips_tournaments_locked_by_other_work() {
    let store = TournamentStore::new();
    let now = Utc::now();
    let id = host_tournament(&store, UserId::new(), 2, Some(now - Duration::hours(48)));

    let report = store
        .with_record(id, |_| store.sweep_expired(now, Duration::hours(24)))
        .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.deleted, 0);
    assert!(store.get(id).is_ok());

    let report = store.sweep_expired(now, Duration::hours(24)).unwrap();
    assert_eq!(report.deleted, 1);
}

#[test]
fn sibling_results_from_two_threads_both_reach_the_final() {
    for seed in 0..50 {
        let store = Arc::new(TournamentStore::new());
        let host = UserId::new();
        let id = host_tournament(&store, host, 4, None);
        let record = store
            .start(id, host, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        let openers: Vec<_> = record.matches.iter().filter(|m| m.round == 1).cloned().collect();
        assert_eq!(openers.len(), 2);

        let handles: Vec<_> = openers
            .iter()
            .map(|m| {
                let store = Arc::clone(&store);
                let match_id = m.id;
                let winner = m.slots[0].unwrap();
                thread::spawn(move || store.report_result(id, match_id, winner))
            })
            .collect();
        for handle in handles {
            let (advancement, _) = handle.join().unwrap().unwrap();
            assert!(matches!(advancement, Advancement::Advanced { .. }));
        }

        let record = store.get(id).unwrap();
        let final_match = record.matches.last().unwrap();
        assert!(final_match.slots.iter().all(Option::is_some));
        assert_eq!(final_match.status, MatchStatus::Ready);
        for m in &openers {
            assert!(final_match.contains(m.slots[0].unwrap()));
        }
    }
}
