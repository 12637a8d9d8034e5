use cards::database::{self, CardFilter, DbPool, DeckFilter};
use cards::domain::{DeckSettings, never_viewed};
use cards::errors::ReviewError;
use cards::services::{Clock, StudyOutcome, StudyService};
use cards::store::{CardStore, ReviewSession, SqliteStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 20, 18, 45, 0).unwrap()
}

fn open_temp_database() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.db");
    let pool = database::open_database(path.to_str().unwrap()).unwrap();
    (dir, pool)
}

#[test]
fn test_new_rows_take_schema_defaults() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let deck = database::decks::insert_deck(&mut conn, "Kanji", &DeckSettings::default()).unwrap();
    let card = database::cards::insert_card(&mut conn, "NewCard", "").unwrap();

    assert_eq!(deck.settings(), DeckSettings::default());
    assert_eq!(card.views, 0);
    assert_eq!(card.last_view, never_viewed());
    assert!(card.is_unviewed());
}

#[test]
fn test_updates_round_trip() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let mut deck = database::decks::insert_deck(&mut conn, "Kanji", &DeckSettings::default()).unwrap();
    deck.name = "Kana".to_string();
    deck.view_limit = 5;
    assert!(database::decks::update_deck(&mut conn, &deck).unwrap());
    assert_eq!(database::decks::find_by_id(&mut conn, deck.id).unwrap(), Some(deck));

    let mut card = database::cards::insert_card(&mut conn, "front", "back").unwrap();
    card.views = 7;
    card.last_view = now();
    assert!(database::cards::update_card(&mut conn, &card).unwrap());
    assert_eq!(database::cards::find_by_id(&mut conn, card.id).unwrap(), Some(card));

    assert!(database::cards::find_by_id(&mut conn, 999).unwrap().is_none());
}

#[test]
fn test_listing_filters() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let verbs = database::decks::insert_deck(&mut conn, "Verbs", &DeckSettings::default()).unwrap();
    let adjectives =
        database::decks::insert_deck(&mut conn, "Adjectives", &DeckSettings::default()).unwrap();
    let run = database::cards::insert_card(&mut conn, "run", "correr").unwrap();
    let big = database::cards::insert_card(&mut conn, "big", "grande").unwrap();
    database::membership::add_card_to_deck(&mut conn, run.id, verbs.id).unwrap();

    let all = database::decks::list(&mut conn, DeckFilter::All).unwrap();
    let names: Vec<_> = all.iter().map(|deck| deck.name.as_str()).collect();
    assert_eq!(names, vec!["Adjectives", "Verbs"]);

    let empty = database::decks::list(&mut conn, DeckFilter::Empty).unwrap();
    assert_eq!(empty, vec![adjectives.clone()]);

    let holding_run = database::decks::list(&mut conn, DeckFilter::Containing(run.id)).unwrap();
    assert_eq!(holding_run, vec![verbs.clone()]);

    let unassigned = database::cards::list(&mut conn, CardFilter::Unassigned).unwrap();
    assert_eq!(unassigned, vec![big.clone()]);

    let in_verbs = database::cards::list(&mut conn, CardFilter::InDeck(verbs.id)).unwrap();
    assert_eq!(in_verbs, vec![run.clone()]);

    let every_card = database::cards::list(&mut conn, CardFilter::All).unwrap();
    assert_eq!(every_card, vec![run, big]);

    let summaries = database::decks::list_summaries(&mut conn).unwrap();
    let counts: Vec<_> = summaries
        .iter()
        .map(|summary| (summary.deck.id, summary.card_count))
        .collect();
    assert_eq!(counts, vec![(adjectives.id, 0), (verbs.id, 1)]);
}

#[test]
fn test_membership_is_unique() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let deck = database::decks::insert_deck(&mut conn, "Verbs", &DeckSettings::default()).unwrap();
    let card = database::cards::insert_card(&mut conn, "run", "correr").unwrap();

    assert!(database::membership::add_card_to_deck(&mut conn, card.id, deck.id).unwrap());
    assert!(!database::membership::add_card_to_deck(&mut conn, card.id, deck.id).unwrap());
    assert_eq!(database::decks::count_cards(&mut conn, deck.id).unwrap(), 1);

    assert!(database::membership::remove_card_from_deck(&mut conn, card.id, deck.id).unwrap());
    assert!(!database::membership::remove_card_from_deck(&mut conn, card.id, deck.id).unwrap());
    assert_eq!(database::decks::count_cards(&mut conn, deck.id).unwrap(), 0);
}

#[test]
fn test_deleting_removes_memberships() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let first = database::decks::insert_deck(&mut conn, "First", &DeckSettings::default()).unwrap();
    let second = database::decks::insert_deck(&mut conn, "Second", &DeckSettings::default()).unwrap();
    let shared = database::cards::insert_card(&mut conn, "shared", "").unwrap();
    let other = database::cards::insert_card(&mut conn, "other", "").unwrap();
    for deck in [&first, &second] {
        database::membership::add_card_to_deck(&mut conn, shared.id, deck.id).unwrap();
    }
    database::membership::add_card_to_deck(&mut conn, other.id, first.id).unwrap();

    assert!(database::cards::delete_card(&mut conn, shared.id).unwrap());
    assert_eq!(database::decks::count_cards(&mut conn, first.id).unwrap(), 1);
    assert_eq!(database::decks::count_cards(&mut conn, second.id).unwrap(), 0);

    assert!(database::decks::delete_deck(&mut conn, first.id).unwrap());
    assert!(!database::decks::delete_deck(&mut conn, first.id).unwrap());
    // The card survives its deck
    let unassigned = database::cards::list(&mut conn, CardFilter::Unassigned).unwrap();
    assert_eq!(unassigned, vec![other]);
}

#[test]
fn test_study_session_persists_the_pick() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    let deck = database::decks::insert_deck(&mut conn, "Verbs", &DeckSettings::default()).unwrap();
    let fresh = database::cards::insert_card(&mut conn, "run", "correr").unwrap();
    let mut seen = database::cards::insert_card(&mut conn, "eat", "comer").unwrap();
    seen.views = 2;
    seen.last_view = now() - Duration::hours(1);
    database::cards::update_card(&mut conn, &seen).unwrap();
    for card in [&fresh, &seen] {
        database::membership::add_card_to_deck(&mut conn, card.id, deck.id).unwrap();
    }
    drop(conn);

    let service = StudyService::with_clock(SqliteStore::new(pool.clone()), FixedClock(now()));
    let mut rng = StdRng::seed_from_u64(19);

    let StudyOutcome::Card(picked) = service.pick_next_card(deck.id, &mut rng).unwrap() else {
        panic!("expected a card");
    };

    assert_eq!(picked.id, fresh.id);
    let mut conn = database::get_connection(&pool).unwrap();
    let stored = database::cards::find_by_id(&mut conn, fresh.id).unwrap().unwrap();
    assert_eq!(stored.views, 1);
    assert_eq!(stored.last_view, now());
    assert_eq!(database::cards::find_by_id(&mut conn, seen.id).unwrap(), Some(seen));
}

#[test]
fn test_study_reports_empty_and_missing_decks() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();
    let deck = database::decks::insert_deck(&mut conn, "Empty", &DeckSettings::default()).unwrap();
    drop(conn);

    let service = StudyService::new(SqliteStore::new(pool));
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
        service.pick_next_card(deck.id, &mut rng).unwrap(),
        StudyOutcome::EmptyDeck
    );
    assert!(matches!(
        service.pick_next_card(deck.id + 1, &mut rng),
        Err(ReviewError::DeckNotFound(_))
    ));
}

#[test]
fn test_uncommitted_session_rolls_back() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();
    let card = database::cards::insert_card(&mut conn, "run", "correr").unwrap();
    drop(conn);

    let store = SqliteStore::new(pool.clone());
    {
        let mut session = store.begin().unwrap();
        let mut changed = session.fetch_card(card.id).unwrap();
        changed.views = 40;
        session.persist_card_state(&changed).unwrap();
    }

    let mut conn = database::get_connection(&pool).unwrap();
    assert_eq!(database::cards::find_by_id(&mut conn, card.id).unwrap(), Some(card));
}

#[test]
fn test_adjust_views_is_clamped_in_storage() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();
    let card = database::cards::insert_card(&mut conn, "run", "correr").unwrap();
    drop(conn);

    let service = StudyService::new(SqliteStore::new(pool.clone()));
    let adjustment = service.adjust_views(card.id, -5).unwrap();

    assert!(adjustment.clamped);
    let mut conn = database::get_connection(&pool).unwrap();
    let stored = database::cards::find_by_id(&mut conn, card.id).unwrap().unwrap();
    assert_eq!(stored.views, 0);
    assert_eq!(stored.last_view, never_viewed());
}

#[test]
fn test_concurrent_picks_never_lose_a_view() {
    const THREADS: u64 = 8;
    const PICKS_PER_THREAD: usize = 25;

    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();
    let deck = database::decks::insert_deck(&mut conn, "Solo", &DeckSettings::default()).unwrap();
    let card = database::cards::insert_card(&mut conn, "only", "card").unwrap();
    database::membership::add_card_to_deck(&mut conn, card.id, deck.id).unwrap();
    drop(conn);

    let service = StudyService::with_clock(SqliteStore::new(pool.clone()), FixedClock(now()));

    let picked: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|seed| {
                let service = &service;
                scope.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    (0..PICKS_PER_THREAD)
                        .filter(|_| {
                            matches!(
                                service.pick_next_card(deck.id, &mut rng),
                                Ok(StudyOutcome::Card(_))
                            )
                        })
                        .count()
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join().unwrap()).sum()
    });

    assert_eq!(picked, THREADS as usize * PICKS_PER_THREAD);
    let mut conn = database::get_connection(&pool).unwrap();
    let stored = database::cards::find_by_id(&mut conn, card.id).unwrap().unwrap();
    assert_eq!(stored.views as usize, picked);
}

#[test]
fn test_card_edit_waits_for_open_review() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();
    let card = database::cards::insert_card(&mut conn, "run", "correr").unwrap();
    drop(conn);

    let store = SqliteStore::new(pool.clone());
    let (persisted_tx, persisted_rx) = std::sync::mpsc::channel();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            let mut session = store.begin().unwrap();
            let mut reviewed = session.fetch_card(card.id).unwrap();
            reviewed.views = 1;
            reviewed.last_view = now();
            session.persist_card_state(&reviewed).unwrap();
            persisted_tx.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(200));
            session.commit().unwrap();
        });

        persisted_rx.recv().unwrap();
        let mut conn = database::get_connection(&pool).unwrap();
        let edited = database::cards::modify_card(&mut conn, card.id, |card| {
            card.front = "to run".to_string();
        })
        .unwrap()
        .unwrap();

        assert_eq!(edited.front, "to run");
        assert_eq!(edited.views, 1);
        assert_eq!(edited.last_view, now());
    });

    let mut conn = database::get_connection(&pool).unwrap();
    let stored = database::cards::find_by_id(&mut conn, card.id).unwrap().unwrap();
    assert_eq!(stored.front, "to run");
    assert_eq!(stored.views, 1);
    assert!(database::cards::modify_card(&mut conn, 999, |_| {}).unwrap().is_none());
}

#[test]
fn test_card_insert_into_missing_deck_leaves_nothing_behind() {
    let (_dir, pool) = open_temp_database();
    let mut conn = database::get_connection(&pool).unwrap();

    assert!(database::cards::insert_card_in_deck(&mut conn, "lost", "", 404).is_err());
    assert!(database::cards::list(&mut conn, CardFilter::All).unwrap().is_empty());

    let deck = database::decks::insert_deck(&mut conn, "Verbs", &DeckSettings::default()).unwrap();
    let card = database::cards::insert_card_in_deck(&mut conn, "run", "correr", deck.id).unwrap();
    assert_eq!(
        database::cards::list(&mut conn, CardFilter::InDeck(deck.id)).unwrap(),
        vec![card]
    );
}
