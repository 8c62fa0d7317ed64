//! Integration tests for the promotion desk and its storage: persistence, roster checks,
//! championship updates and tournament history.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::RwLock;
use uuid::Uuid;
use wrestling_bracket::storage::{load_collection, save_collection, HISTORY_KEY, TOURNAMENTS_KEY};
use wrestling_bracket::{
    import_roster_csv, Championship, JsonDirStore, KeyValueStore, MemoryStore, NewTournament,
    Promotion, PromotionError, StorageError, Tournament, TournamentError, TournamentId, Wrestler,
};

fn promotion_with_roster(n: usize) -> Promotion<MemoryStore> {
    let promotion = Promotion::new(MemoryStore::new());
    let wrestlers: Vec<Wrestler> = (0..n)
        .map(|i| Wrestler::new(format!("w{i}"), format!("Wrestler {i}")))
        .collect();
    promotion.save_wrestlers(&wrestlers).unwrap();
    promotion
        .save_championships(&[Championship::new("ic-title", "Intercontinental Championship")])
        .unwrap();
    promotion
}

fn new_tournament(participants: u32, championship_id: Option<&str>) -> NewTournament {
    NewTournament {
        name: "King of the Ring".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(),
        participants,
        championship_id: championship_id.map(str::to_string),
        wrestler_ids: (0..participants).map(|i| format!("w{i}")).collect(),
    }
}

/// Decide every match in round order, the first-slot wrestler always winning.
fn play_out<S: KeyValueStore>(promotion: &Promotion<S>, id: TournamentId) -> Tournament {
    let mut t = promotion.tournament(id).unwrap();
    for round in 1..=t.rounds() {
        let to_play: Vec<(String, String)> = t
            .round_matches(round)
            .iter()
            .map(|m| (m.id.clone(), m.wrestler1_id.clone().unwrap()))
            .collect();
        for (match_id, winner) in to_play {
            t = promotion.record_winner(id, &match_id, &winner).unwrap().tournament;
        }
    }
    t
}

#[test]
fn created_tournament_is_stored() {
    let promotion = promotion_with_roster(8);
    let mut rng = StdRng::seed_from_u64(3);
    let t = promotion
        .create_tournament(new_tournament(8, None), &mut rng)
        .unwrap();
    assert_eq!(promotion.tournaments().unwrap(), vec![t.clone()]);
    assert_eq!(promotion.tournament(t.id).unwrap(), t);
}

#[test]
fn create_checks_roster_and_championship() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(3);
    assert!(matches!(
        promotion.create_tournament(new_tournament(8, None), &mut rng),
        Err(PromotionError::Tournament(TournamentError::WrestlerNotFound(id))) if id == "w4"
    ));
    assert!(matches!(
        promotion.create_tournament(new_tournament(4, Some("tag-titles")), &mut rng),
        Err(PromotionError::Tournament(TournamentError::ChampionshipNotFound(_)))
    ));
    assert!(promotion.tournaments().unwrap().is_empty());
}

#[test]
fn completed_championship_tournament_crowns_the_winner() {
    let promotion = promotion_with_roster(8);
    let mut rng = StdRng::seed_from_u64(11);
    let created = promotion
        .create_tournament(new_tournament(8, Some("ic-title")), &mut rng)
        .unwrap();

    let t = play_out(&promotion, created.id);
    assert!(t.completed);
    let winner = t.winner.clone().unwrap();

    let championships = promotion.championships().unwrap();
    assert_eq!(championships[0].current_holder.as_deref(), Some(winner.as_str()));
    let wrestlers = promotion.wrestlers().unwrap();
    let champ: Vec<&Wrestler> = wrestlers.iter().filter(|w| w.holds("ic-title")).collect();
    assert_eq!(champ.len(), 1);
    assert_eq!(champ[0].id, winner);

    let history = promotion.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], t);
    assert_eq!(promotion.tournament(created.id).unwrap(), t);
}

#[test]
fn history_gets_one_entry_per_completion() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(5);
    let created = promotion
        .create_tournament(new_tournament(4, None), &mut rng)
        .unwrap();
    assert!(promotion.history().unwrap().is_empty());

    let t = play_out(&promotion, created.id);
    let final_winner = t.winner.clone().unwrap();
    promotion
        .record_winner(created.id, "2-1", &final_winner)
        .unwrap();
    assert_eq!(promotion.history().unwrap().len(), 1);
}

#[test]
fn engine_errors_leave_storage_untouched() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(5);
    let created = promotion
        .create_tournament(new_tournament(4, None), &mut rng)
        .unwrap();

    assert!(matches!(
        promotion.record_winner(created.id, "9-9", "w0"),
        Err(PromotionError::Tournament(TournamentError::MatchNotFound(_)))
    ));
    assert!(matches!(
        promotion.record_winner(created.id, "2-1", "w0"),
        Err(PromotionError::Tournament(TournamentError::MatchNotReady(_)))
    ));
    assert_eq!(promotion.tournament(created.id).unwrap(), created);
}

#[test]
fn unknown_tournament() {
    let promotion = promotion_with_roster(4);
    let id = Uuid::new_v4();
    assert!(matches!(
        promotion.tournament(id),
        Err(PromotionError::TournamentNotFound(x)) if x == id
    ));
    assert!(matches!(
        promotion.record_winner(id, "1-1", "w0"),
        Err(PromotionError::TournamentNotFound(_))
    ));
    assert!(matches!(
        promotion.delete_tournament(id),
        Err(PromotionError::TournamentNotFound(_))
    ));
}

#[test]
fn delete_removes_only_that_tournament() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(9);
    let a = promotion.create_tournament(new_tournament(4, None), &mut rng).unwrap();
    let b = promotion.create_tournament(new_tournament(2, None), &mut rng).unwrap();
    promotion.delete_tournament(a.id).unwrap();
    assert_eq!(promotion.tournaments().unwrap(), vec![b]);
}

#[test]
fn corrupt_collection_is_an_error_not_an_empty_list() {
    let store = MemoryStore::new();
    store.write(TOURNAMENTS_KEY, "{ not json").unwrap();
    let promotion = Promotion::new(store);
    assert!(matches!(
        promotion.tournaments(),
        Err(PromotionError::Storage(StorageError::Corrupt { .. }))
    ));
}

#[test]
fn roster_csv_import_merges_by_id() {
    let promotion = promotion_with_roster(2);
    let csv = "id,name\nw1, The Miz \nw5,Rhea\n,Nameless\n";
    let imported = import_roster_csv(csv.as_bytes()).unwrap();
    assert_eq!(imported.len(), 2);

    let added = promotion.import_roster(imported).unwrap();
    assert_eq!(added, 1);
    let wrestlers = promotion.wrestlers().unwrap();
    assert_eq!(wrestlers.len(), 3);
    assert_eq!(wrestlers[1].name, "The Miz");
    assert_eq!(wrestlers[2].id, "w5");
}

#[test]
fn json_dir_store_round_trips_collections() {
    let dir = std::env::temp_dir().join(format!("wrestling-bracket-{}", Uuid::new_v4()));
    let store = JsonDirStore::open(&dir).unwrap();
    assert_eq!(store.read("wrestlers").unwrap(), None);

    let wrestlers = vec![Wrestler::new("w1", "Seth"), Wrestler::new("w2", "Bianca")];
    save_collection(&store, "wrestlers", &wrestlers).unwrap();
    assert!(dir.join("wrestlers.json").exists());
    let loaded: Vec<Wrestler> = load_collection(&store, "wrestlers").unwrap();
    assert_eq!(loaded, wrestlers);

    std::fs::remove_dir_all(&dir).unwrap();
}

/// Decide round 1 with the first-slot wrestlers and return the final's two wrestlers.
fn play_to_final<S: KeyValueStore>(promotion: &Promotion<S>, id: TournamentId) -> (String, String) {
    let t = promotion.tournament(id).unwrap();
    for m in t.round_matches(1) {
        let winner = m.wrestler1_id.clone().unwrap();
        promotion.record_winner(id, &m.id, &winner).unwrap();
    }
    let t = promotion.tournament(id).unwrap();
    let final_match = t.final_match().unwrap();
    (
        final_match.wrestler1_id.clone().unwrap(),
        final_match.wrestler2_id.clone().unwrap(),
    )
}

#[test]
fn missing_championship_does_not_block_the_final() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(21);
    let created = promotion
        .create_tournament(new_tournament(4, Some("ic-title")), &mut rng)
        .unwrap();
    let (first, _) = play_to_final(&promotion, created.id);
    promotion.save_championships(&[]).unwrap();

    let result = promotion.record_winner(created.id, "2-1", &first).unwrap();
    assert!(result.championship_transfer.is_some());

    let stored = promotion.tournament(created.id).unwrap();
    assert!(stored.completed);
    assert_eq!(stored.winner.as_deref(), Some(first.as_str()));
    assert!(promotion.championships().unwrap().is_empty());
    assert!(promotion.wrestlers().unwrap().iter().all(|w| w.championships.is_empty()));
    assert_eq!(promotion.history().unwrap().len(), 1);
}

#[test]
fn missing_winner_record_does_not_block_the_final() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(22);
    let created = promotion
        .create_tournament(new_tournament(4, Some("ic-title")), &mut rng)
        .unwrap();
    let (first, _) = play_to_final(&promotion, created.id);
    let remaining: Vec<Wrestler> = promotion
        .wrestlers()
        .unwrap()
        .into_iter()
        .filter(|w| w.id != first)
        .collect();
    promotion.save_wrestlers(&remaining).unwrap();

    promotion.record_winner(created.id, "2-1", &first).unwrap();
    assert!(promotion.tournament(created.id).unwrap().completed);
    assert_eq!(promotion.championships().unwrap()[0].current_holder, None);
}

#[test]
fn changing_the_final_winner_updates_history_and_title() {
    let promotion = promotion_with_roster(4);
    let mut rng = StdRng::seed_from_u64(23);
    let created = promotion
        .create_tournament(new_tournament(4, Some("ic-title")), &mut rng)
        .unwrap();
    let (first, second) = play_to_final(&promotion, created.id);

    promotion.record_winner(created.id, "2-1", &first).unwrap();
    promotion.record_winner(created.id, "2-1", &second).unwrap();

    let history = promotion.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].winner.as_deref(), Some(second.as_str()));
    assert_eq!(
        promotion.championships().unwrap()[0].current_holder.as_deref(),
        Some(second.as_str())
    );
    let holders: Vec<String> = promotion
        .wrestlers()
        .unwrap()
        .into_iter()
        .filter(|w| w.holds("ic-title"))
        .map(|w| w.id)
        .collect();
    assert_eq!(holders, vec![second]);
}

/// Memory store whose writes to one key can be made to fail.
#[derive(Default)]
struct FailingStore {
    inner: MemoryStore,
    fail_key: RwLock<Option<&'static str>>,
}

impl KeyValueStore for FailingStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_key.read().unwrap() == Some(key) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.write(key, value)
    }
}

#[test]
fn retry_after_a_failed_tournament_save_completes_the_transfer() {
    let promotion = Promotion::new(FailingStore::default());
    let wrestlers: Vec<Wrestler> = (0..4)
        .map(|i| Wrestler::new(format!("w{i}"), format!("Wrestler {i}")))
        .collect();
    promotion.save_wrestlers(&wrestlers).unwrap();
    promotion
        .save_championships(&[Championship::new("ic-title", "Intercontinental Championship")])
        .unwrap();
    let mut rng = StdRng::seed_from_u64(24);
    let created = promotion
        .create_tournament(new_tournament(4, Some("ic-title")), &mut rng)
        .unwrap();
    let (first, _) = play_to_final(&promotion, created.id);

    *promotion.store().fail_key.write().unwrap() = Some(TOURNAMENTS_KEY);
    assert!(matches!(
        promotion.record_winner(created.id, "2-1", &first),
        Err(PromotionError::Storage(_))
    ));
    assert!(!promotion.tournament(created.id).unwrap().completed);

    *promotion.store().fail_key.write().unwrap() = None;
    promotion.record_winner(created.id, "2-1", &first).unwrap();
    assert!(promotion.tournament(created.id).unwrap().completed);
    assert_eq!(
        promotion.championships().unwrap()[0].current_holder.as_deref(),
        Some(first.as_str())
    );
    let history: Vec<Tournament> = load_collection(promotion.store(), HISTORY_KEY).unwrap();
    assert_eq!(history.len(), 1);
}
