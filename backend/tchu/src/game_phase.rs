use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Where the turn engine stands in a game.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
  /// Players are told who they are, and choose their initial tickets.
  Setup,
  /// Regular turns, until a player is left with 2 cars or fewer.
  Round,
  /// One last turn for each player.
  FinalRound,
  /// Longest trails and final points are computed.
  Scoring,
  /// Players decide whether to play again.
  EndScreen,
  /// The session is over.
  Ended,
}
