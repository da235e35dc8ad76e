// Plays tCHu games between two bots on the Swiss network, and prints the results.

use anyhow::Context;
use log::*;
use structopt::StructOpt;
use tchu::bot::RandomPlayer;
use tchu::game_state::{PlayerId, PlayerMap, PublicGameState};
use tchu::manager::Manager;
use tchu::map;
use tchu::player::{Player, Spectator};

#[derive(Debug, StructOpt)]
#[structopt(name = "simulator", about = "Bot-vs-bot tCHu games")]
struct Opt {
    /// Seed of the game, bots are seeded from it too
    #[structopt(short, long, default_value = "2021")]
    seed: u64,

    /// Number of games to play
    #[structopt(short, long, default_value = "1")]
    games: usize,

    #[structopt(long, default_value = "Ada")]
    player1: String,

    #[structopt(long, default_value = "Charles")]
    player2: String,

    /// Aborts a game still running after this many turns
    #[structopt(long, default_value = "1000")]
    max_turns: usize,

    /// Prints every message of the games
    #[structopt(short, long)]
    verbose: bool,
}

/// Prints the messages of the games as they are broadcast.
struct Printer;

impl Spectator for Printer {
    fn init_spectator(&mut self, names: &PlayerMap<String>) {
        println!("{} against {}", names[PlayerId::Player1], names[PlayerId::Player2]);
    }

    fn set_state(&mut self, _state: &PublicGameState) {}

    fn receive_info(&mut self, info: &str) {
        print!("{}", info);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("tchu=info")).init();

    let args = Opt::from_args();

    let players = PlayerMap::try_new(|id| -> anyhow::Result<Box<dyn Player>> {
        let seed = args.seed.wrapping_add(id.index() as u64 + 1);
        let bot = RandomPlayer::new(seed, map::routes()).context("the network has no route")?;
        Ok(Box::new(bot.with_games(args.games)) as Box<dyn Player>)
    })?;
    let names = PlayerMap::new(|id| match id {
        PlayerId::Player1 => args.player1.clone(),
        PlayerId::Player2 => args.player2.clone(),
    });

    let mut manager =
        Manager::new(players, names.clone(), map::tickets().clone(), args.seed).with_turn_limit(args.max_turns);
    if args.verbose {
        manager.add_spectator(Box::new(Printer));
    }

    let outcomes = manager
        .run()
        .with_context(|| format!("game aborted (seed {})", args.seed))?;

    let mut wins = PlayerMap::<usize>::default();
    for (index, outcome) in outcomes.iter().enumerate() {
        debug!("Game #{}: {:?}", index + 1, outcome);
        if let Some(winner) = outcome.winner {
            wins[winner] += 1;
        }
        print!("#{} ({} turns) {}", index + 1, outcome.turns, outcome.summary.trim_start());
    }

    println!(
        "{} {} - {} {} ({} games)",
        names[PlayerId::Player1],
        wins[PlayerId::Player1],
        wins[PlayerId::Player2],
        names[PlayerId::Player2],
        outcomes.len()
    );

    Ok(())
}
