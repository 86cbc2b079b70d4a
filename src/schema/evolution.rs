use serde_json::Value;

use super::types::{required_id, Entity};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement};

/// One evolution step: `from_id` evolves into `to_id` under the given conditions.
///
/// `from`/`to` are reserved words, so the columns are quoted and the insert
/// binds these fields as `:from`/`:to`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvolutionChain {
    pub id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub gender: Option<i64>,
    pub min_beauty: Option<i64>,
    pub min_happiness: Option<i64>,
    pub min_level: Option<i64>,
    pub trade_species: Option<String>,
    pub relative_physical_stats: Option<i64>,
    pub item: Option<String>,
    pub held_item: Option<String>,
    pub known_move: Option<String>,
    pub known_move_type: Option<String>,
    pub trigger: Option<String>,
    pub party_species: Option<String>,
    pub party_type: Option<String>,
    pub time_of_day: Option<String>,
    pub needs_overworld_rain: bool,
    pub turn_upside_down: bool,
}

impl EvolutionChain {
    /// Build the step into `to_id`; `detail` is the first `evolution_details` entry
    fn link(from_id: i64, to_id: i64, detail: &Value) -> Self {
        Self {
            id: to_id,
            from_id,
            to_id,
            gender: parser::int(detail, "gender"),
            min_beauty: parser::int(detail, "min_beauty"),
            min_happiness: parser::int(detail, "min_happiness"),
            min_level: parser::int(detail, "min_level"),
            trade_species: parser::named(detail, "trade_species"),
            relative_physical_stats: parser::int(detail, "relative_physical_stats"),
            item: parser::named(detail, "item"),
            held_item: parser::named(detail, "held_item"),
            known_move: parser::named(detail, "known_move"),
            known_move_type: parser::named(detail, "known_move_type"),
            trigger: parser::named(detail, "trigger"),
            party_species: parser::named(detail, "party_species"),
            party_type: parser::named(detail, "party_type"),
            time_of_day: parser::text(detail, "time_of_day").filter(|t| !t.is_empty()),
            needs_overworld_rain: parser::flag(detail, "needs_overworld_rain"),
            turn_upside_down: parser::flag(detail, "turn_upside_down"),
        }
    }

    /// Every step of an `evolution-chain` payload, parents before children.
    /// A single-stage chain yields no records.
    pub fn from_json(payload: &Value) -> Result<Vec<Self>, SeedError> {
        required_id(payload, Self::TABLE, "id")?;
        let root = payload.get("chain").ok_or(SeedError::Mapping {
            table: Self::TABLE,
            field: "chain",
        })?;

        let mut links = Vec::new();
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            let Some(from_id) = parser::resource_id(node, "species") else {
                continue;
            };
            let children = parser::list(node, "evolves_to");
            for child in children {
                if let Some(to_id) = parser::resource_id(child, "species") {
                    let detail = parser::list(child, "evolution_details")
                        .first()
                        .unwrap_or(&parser::NULL);
                    links.push(Self::link(from_id, to_id, detail));
                }
            }
            pending.extend(children.iter().rev());
        }
        Ok(links)
    }

    pub fn records(payload: &Value) -> Result<Vec<InsertStatement>, SeedError> {
        Ok(Self::from_json(payload)?
            .iter()
            .map(Entity::insert_statement)
            .collect())
    }
}

impl Entity for EvolutionChain {
    const TABLE: &'static str = "evolution_chain";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS evolution_chain (
            id INTEGER PRIMARY KEY,
            \"from\" INTEGER REFERENCES pokemon(id),
            \"to\" INTEGER REFERENCES pokemon(id),
            gender INTEGER,
            min_beauty INTEGER,
            min_happiness INTEGER,
            min_level INTEGER,
            trade_species TEXT,
            relative_physical_stats INTEGER,
            item TEXT,
            held_item TEXT,
            known_move TEXT,
            known_move_type TEXT,
            trigger TEXT,
            party_species TEXT,
            party_type TEXT,
            time_of_day TEXT,
            needs_overworld_rain BOOLEAN,
            turn_upside_down BOOLEAN
        );";

    fn insert_statement(&self) -> InsertStatement {
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO evolution_chain (id, \"from\", \"to\", gender, min_beauty, \
             min_happiness, min_level, trade_species, relative_physical_stats, item, held_item, \
             known_move, known_move_type, trigger, party_species, party_type, time_of_day, \
             needs_overworld_rain, turn_upside_down) \
             VALUES (:id, :from, :to, :gender, :min_beauty, :min_happiness, :min_level, \
             :trade_species, :relative_physical_stats, :item, :held_item, :known_move, \
             :known_move_type, :trigger, :party_species, :party_type, :time_of_day, \
             :needs_overworld_rain, :turn_upside_down);",
        )
        .bind("id", self.id)
        .bind("from", self.from_id)
        .bind("to", self.to_id)
        .bind("gender", self.gender)
        .bind("min_beauty", self.min_beauty)
        .bind("min_happiness", self.min_happiness)
        .bind("min_level", self.min_level)
        .bind("trade_species", self.trade_species.clone())
        .bind("relative_physical_stats", self.relative_physical_stats)
        .bind("item", self.item.clone())
        .bind("held_item", self.held_item.clone())
        .bind("known_move", self.known_move.clone())
        .bind("known_move_type", self.known_move_type.clone())
        .bind("trigger", self.trigger.clone())
        .bind("party_species", self.party_species.clone())
        .bind("party_type", self.party_type.clone())
        .bind("time_of_day", self.time_of_day.clone())
        .bind("needs_overworld_rain", self.needs_overworld_rain)
        .bind("turn_upside_down", self.turn_upside_down)
    }
}
