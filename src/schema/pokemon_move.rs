use serde_json::Value;

use super::types::{required_id, Entity};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement};

/// One move a pokemon can learn, flattened to the most recent game's rule
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonMove {
    pub pokemon: i64,
    pub move_id: i64,
    pub level_learned_at: Option<i64>,
    pub learn_method: Option<String>,
}

impl PokemonMove {
    /// Build the record for one entry of a pokemon's `moves` list.
    ///
    /// Returns `None` when the entry names no move or has no learn details.
    pub fn from_entry(pokemon: i64, entry: &Value) -> Option<Self> {
        let move_id = parser::resource_id(entry, "move")?;
        let detail = parser::list(entry, "version_group_details")
            .iter()
            .max_by_key(|detail| parser::resource_id(detail, "version_group").unwrap_or(i64::MIN))?;

        Some(Self {
            pokemon,
            move_id,
            level_learned_at: parser::int(detail, "level_learned_at"),
            learn_method: parser::named(detail, "move_learn_method"),
        })
    }

    /// Every learnable move of a pokemon payload, one record per move
    pub fn from_json(payload: &Value) -> Result<Vec<Self>, SeedError> {
        let pokemon = required_id(payload, Self::TABLE, "id")?;
        Ok(parser::list(payload, "moves")
            .iter()
            .filter_map(|entry| Self::from_entry(pokemon, entry))
            .collect())
    }

    pub fn records(payload: &Value) -> Result<Vec<InsertStatement>, SeedError> {
        Ok(Self::from_json(payload)?
            .iter()
            .map(Entity::insert_statement)
            .collect())
    }
}

impl Entity for PokemonMove {
    const TABLE: &'static str = "pokemon_move";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS pokemon_move (
            pokemon INTEGER REFERENCES pokemon(id),
            move INTEGER REFERENCES move(id),
            level_learned_at INTEGER,
            learn_method TEXT
        );";

    fn insert_statement(&self) -> InsertStatement {
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO pokemon_move (pokemon, move, level_learned_at, learn_method) \
             VALUES (:pokemon, :move, :level_learned_at, :learn_method);",
        )
        .bind("pokemon", self.pokemon)
        .bind("move", self.move_id)
        .bind("level_learned_at", self.level_learned_at)
        .bind("learn_method", self.learn_method.clone())
    }
}
