use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use tchu::bot::RandomPlayer;
use tchu::constants::LAST_TURN_CAR_COUNT;
use tchu::game_phase::GamePhase;
use tchu::game_state::{PlayerId, PlayerMap, PublicGameState};
use tchu::manager::{GameOutcome, Manager};
use tchu::map;
use tchu::player::{Player, Spectator};

#[derive(Default)]
struct Recording {
    names: Option<PlayerMap<String>>,
    states: Vec<PublicGameState>,
    infos: Vec<String>,
}

/// Records everything it is told, for the test to inspect afterwards.
#[derive(Clone, Default)]
struct RecordingSpectator(Rc<RefCell<Recording>>);

impl Spectator for RecordingSpectator {
    fn init_spectator(&mut self, names: &PlayerMap<String>) {
        self.0.borrow_mut().names = Some(names.clone());
    }

    fn set_state(&mut self, state: &PublicGameState) {
        self.0.borrow_mut().states.push(state.clone());
    }

    fn receive_info(&mut self, info: &str) {
        self.0.borrow_mut().infos.push(info.to_owned());
    }
}

fn bot_manager(seed: u64, games: usize) -> Manager {
    let players: PlayerMap<Box<dyn Player>> = PlayerMap::new(|id| {
        Box::new(RandomPlayer::new(seed + id.index() as u64, map::routes()).unwrap().with_games(games))
            as Box<dyn Player>
    });
    let names = PlayerMap::new(|id| ["Ada", "Charles"][id.index()].to_owned());

    Manager::new(players, names, map::tickets().clone(), seed).with_turn_limit(1000)
}

fn check_outcome(outcome: &GameOutcome) {
    let (p1, p2) = (PlayerId::Player1, PlayerId::Player2);
    let points = &outcome.final_points;

    match outcome.winner {
        Some(winner) => assert!(points[winner] > points[winner.next()]),
        None => assert_eq!(points[p1], points[p2]),
    }
    assert!(outcome.turns > 0);
    assert!(outcome.longest_trails.iter().any(|(_, length)| *length > 0));
}

#[test]
fn bot_games_run_to_the_end() {
    for seed in [1, 7, 42, 2021] {
        let mut manager = bot_manager(seed, 1);
        let outcomes = manager.run().unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(manager.phase(), GamePhase::Ended);
        assert_eq!(manager.games_played(), 1);
        check_outcome(&outcomes[0]);
    }
}

#[test]
fn bots_play_again_until_they_quit() {
    let mut manager = bot_manager(5, 3);
    let outcomes = manager.run().unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(manager.games_played(), 3);
    outcomes.iter().for_each(check_outcome);
}

#[test]
fn same_seed_same_game() {
    let first = bot_manager(11, 1).run().unwrap();
    let second = bot_manager(11, 1).run().unwrap();

    assert_eq!(first, second);
}

#[test]
fn spectator_follows_the_game() {
    let spectator = RecordingSpectator::default();
    let mut manager = bot_manager(3, 1);
    manager.add_spectator(Box::new(spectator.clone()));

    let outcome = manager.play_game().unwrap();
    assert_eq!(manager.phase(), GamePhase::Scoring);

    let recording = spectator.0.borrow();
    let names = recording.names.as_ref().unwrap();
    assert_eq!(names[PlayerId::Player1], "Ada");
    assert_eq!(names[PlayerId::Player2], "Charles");

    assert!(recording.infos[0].ends_with("will play first.\n\n"));
    assert_eq!(recording.infos.last(), Some(&outcome.summary));
    assert!(recording.infos.iter().any(|info| info.contains("the last turn begins!")));

    // The last state is sent once the final round is over.
    let last_state = recording.states.last().unwrap();
    let last_player = last_state.last_player().unwrap();
    assert!(last_state.player_state(last_player).car_count() <= LAST_TURN_CAR_COUNT);
    assert!(last_state.claimed_routes().count() > 0);
}

#[test]
fn outcome_and_states_to_json() -> serde_json::Result<()> {
    let spectator = RecordingSpectator::default();
    let mut manager = bot_manager(9, 1);
    manager.add_spectator(Box::new(spectator.clone()));
    let outcome = manager.play_game().unwrap();

    let json = serde_json::to_string(&outcome)?;
    assert_eq!(serde_json::from_str::<GameOutcome>(&json)?, outcome);

    let recording = spectator.0.borrow();
    let last_state = recording.states.last().unwrap();
    let json = serde_json::to_string(last_state)?;
    assert_eq!(&serde_json::from_str::<PublicGameState>(&json)?, last_state);

    Ok(())
}
