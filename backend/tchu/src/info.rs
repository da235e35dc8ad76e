//! Messages broadcast to players and spectators as the game unfolds.

use crate::bag::SortedBag;
use crate::card::Card;
use crate::constants::LONGEST_TRAIL_BONUS_POINTS;
use crate::route::Route;
use crate::trail::Trail;

/// Builds the messages describing what a given player does.
#[derive(Clone, Debug)]
pub struct Info {
    player_name: String,
}

fn plural(count: usize) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}

fn card_name(card: Card, count: usize) -> String {
    match card {
        Card::Locomotive => format!("locomotive{}", plural(count)),
        car => car.to_string(),
    }
}

/// "2 red, 1 blue and 1 locomotive".
fn describe_cards(cards: &SortedBag<Card>) -> String {
    let parts: Vec<String> = cards
        .distinct()
        .map(|card| {
            let count = cards.count_of(card);
            format!("{} {}", count, card_name(*card, count))
        })
        .collect();

    match parts.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

impl Info {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
        }
    }

    /// The game ended with both players tied.
    pub fn draw(player_names: &[String], points: i32) -> String {
        format!(
            "{} are tied with {} points each!\n",
            player_names.join(" and "),
            points
        )
    }

    pub fn will_play_first(&self) -> String {
        format!("{} will play first.\n\n", self.player_name)
    }

    pub fn kept_tickets(&self, count: usize) -> String {
        format!("{} kept {} ticket{}.\n", self.player_name, count, plural(count))
    }

    pub fn can_play(&self) -> String {
        format!("\nIt is {}'s turn to play.\n", self.player_name)
    }

    pub fn drew_tickets(&self, count: usize) -> String {
        format!("{} drew {} ticket{}...\n", self.player_name, count, plural(count))
    }

    pub fn drew_blind_card(&self) -> String {
        format!("{} drew a card from the deck.\n", self.player_name)
    }

    pub fn drew_visible_card(&self, card: Card) -> String {
        format!("{} drew a face-up {} card.\n", self.player_name, card_name(card, 1))
    }

    pub fn claimed_route(&self, route: &Route, cards: &SortedBag<Card>) -> String {
        format!(
            "{} claimed the route {} using {}.\n",
            self.player_name,
            route,
            describe_cards(cards)
        )
    }

    pub fn attempts_tunnel_claim(&self, route: &Route, initial_cards: &SortedBag<Card>) -> String {
        format!(
            "{} wants to claim the tunnel {} using {}!\n",
            self.player_name,
            route,
            describe_cards(initial_cards)
        )
    }

    pub fn drew_additional_cards(&self, drawn_cards: &SortedBag<Card>, additional_count: usize) -> String {
        let cost = if additional_count == 0 {
            "They imply no additional cost.\n".to_owned()
        } else {
            format!(
                "They imply an additional cost of {} card{}.\n",
                additional_count,
                plural(additional_count)
            )
        };

        format!("The additional cards are {}. {}", describe_cards(drawn_cards), cost)
    }

    pub fn did_not_claim_route(&self, route: &Route) -> String {
        format!("{} could not (or would not) claim the route {}.\n", self.player_name, route)
    }

    pub fn last_turn_begins(&self, car_count: u8) -> String {
        format!(
            "\n{} has only {} car{} left, the last turn begins!\n\n",
            self.player_name,
            car_count,
            plural(car_count as usize)
        )
    }

    pub fn gets_longest_trail_bonus(&self, trail: &Trail) -> String {
        format!(
            "\n{} gets the bonus of {} points for the longest trail {}.\n",
            self.player_name, LONGEST_TRAIL_BONUS_POINTS, trail
        )
    }

    pub fn won(&self, points: i32, loser_points: i32) -> String {
        format!(
            "\n{} wins with {} points, against {} points!\n",
            self.player_name, points, loser_points
        )
    }
}
