//! Supported game titles and their coaching instructions.
//!
//! The table is closed: every [`Game`] has exactly one instruction string and
//! the strings never change after startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Game titles a clip can be coached for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    Valorant,
    #[serde(rename = "counter-strike-2")]
    CounterStrike2,
    LeagueOfLegends,
    RocketLeague,
    Fortnite,
    #[serde(rename = "overwatch-2")]
    Overwatch2,
    ApexLegends,
}

impl Game {
    /// All supported games, in the order they are offered to users.
    pub const ALL: &'static [Game] = &[
        Game::Valorant,
        Game::CounterStrike2,
        Game::LeagueOfLegends,
        Game::RocketLeague,
        Game::Fortnite,
        Game::Overwatch2,
        Game::ApexLegends,
    ];

    /// Human-readable title, as shown in the game selector.
    pub fn label(&self) -> &'static str {
        match self {
            Game::Valorant => "Valorant",
            Game::CounterStrike2 => "Counter-Strike 2",
            Game::LeagueOfLegends => "League of Legends",
            Game::RocketLeague => "Rocket League",
            Game::Fortnite => "Fortnite",
            Game::Overwatch2 => "Overwatch 2",
            Game::ApexLegends => "Apex Legends",
        }
    }

    /// URL-safe identifier used by API clients.
    pub fn slug(&self) -> &'static str {
        match self {
            Game::Valorant => "valorant",
            Game::CounterStrike2 => "counter-strike-2",
            Game::LeagueOfLegends => "league-of-legends",
            Game::RocketLeague => "rocket-league",
            Game::Fortnite => "fortnite",
            Game::Overwatch2 => "overwatch-2",
            Game::ApexLegends => "apex-legends",
        }
    }

    /// Instruction sent to the model alongside the clip.
    pub fn instruction(&self) -> &'static str {
        match self {
            Game::Valorant => {
                "You are a professional Valorant coach. Watch this clip and tell me 3 specific \
                 things I did wrong regarding crosshair placement and movement."
            }
            Game::CounterStrike2 => {
                "You are a professional Counter-Strike 2 coach. Watch this clip and tell me 3 \
                 specific things I did wrong regarding crosshair placement, spray control and \
                 positioning."
            }
            Game::LeagueOfLegends => {
                "You are a professional League of Legends coach. Watch this clip and tell me 3 \
                 specific things I did wrong regarding positioning, map awareness and trading."
            }
            Game::RocketLeague => {
                "You are a professional Rocket League coach. Watch this clip and tell me 3 \
                 specific things I did wrong regarding rotation, boost management and touches \
                 on the ball."
            }
            Game::Fortnite => {
                "You are a professional Fortnite coach. Watch this clip and tell me 3 specific \
                 things I did wrong regarding building, editing and fight positioning."
            }
            Game::Overwatch2 => {
                "You are a professional Overwatch 2 coach. Watch this clip and tell me 3 specific \
                 things I did wrong regarding positioning, cooldown usage and target priority."
            }
            Game::ApexLegends => {
                "You are a professional Apex Legends coach. Watch this clip and tell me 3 \
                 specific things I did wrong regarding movement, cover usage and recoil control."
            }
        }
    }

    /// Look up a game by its exact label (`"Rocket League"`).
    pub fn from_label(label: &str) -> Option<Game> {
        Self::ALL.iter().copied().find(|g| g.label() == label)
    }

    /// Look up a game by its slug (`"rocket-league"`).
    pub fn from_slug(slug: &str) -> Option<Game> {
        Self::ALL.iter().copied().find(|g| g.slug() == slug)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Game {
    type Err = UnknownGameError;

    /// Accepts either the exact label or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Game::from_label(s)
            .or_else(|| Game::from_slug(s))
            .ok_or_else(|| UnknownGameError(s.to_string()))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown game: {0}")]
pub struct UnknownGameError(pub String);

/// Entry returned to clients listing the selectable games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOption {
    pub slug: String,
    pub label: String,
}

impl From<Game> for GameOption {
    fn from(game: Game) -> Self {
        Self {
            slug: game.slug().to_string(),
            label: game.label().to_string(),
        }
    }
}

/// Instruction for a game label.
///
/// Total over the labels in [`Game::ALL`]; anything else is an error.
pub fn lookup(category: &str) -> Result<&'static str, UnknownGameError> {
    Game::from_label(category)
        .map(|g| g.instruction())
        .ok_or_else(|| UnknownGameError(category.to_string()))
}
