pub mod ability;
pub mod dependencies;
pub mod evolution;
pub mod game_move;
pub mod pokemon;
pub mod pokemon_move;
pub mod species;
pub mod tables;
pub mod types;

pub use ability::Ability;
pub use dependencies::*;
pub use evolution::EvolutionChain;
pub use game_move::{Move, MoveMeta};
pub use pokemon::{Pokemon, Sprites, Stat, Stats};
pub use pokemon_move::PokemonMove;
pub use species::PokemonSpecies;
pub use tables::*;
pub use types::*;
