use serde_json::Value;

use super::types::{required_id, Entity, FromJson};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement};

/// Battle mechanics from a move's `meta` block, absent for some moves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveMeta {
    pub ailment: Option<String>,
    pub ailment_chance: Option<i64>,
    pub crit_rate: Option<i64>,
    pub drain: Option<i64>,
    pub flinch_chance: Option<i64>,
    pub healing: Option<i64>,
    pub max_hits: Option<i64>,
    pub max_turns: Option<i64>,
    pub min_hits: Option<i64>,
    pub min_turns: Option<i64>,
    pub stat_chance: Option<i64>,
}

impl MoveMeta {
    fn from_json(payload: &Value) -> Self {
        let meta = payload.get("meta").unwrap_or(&parser::NULL);
        let number = |key: &str| parser::int(meta, key);
        Self {
            ailment: parser::named(meta, "ailment"),
            ailment_chance: number("ailment_chance"),
            crit_rate: number("crit_rate"),
            drain: number("drain"),
            flinch_chance: number("flinch_chance"),
            healing: number("healing"),
            max_hits: number("max_hits"),
            max_turns: number("max_turns"),
            min_hits: number("min_hits"),
            min_turns: number("min_turns"),
            stat_chance: number("stat_chance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: i64,
    pub name: Option<String>,
    pub accuracy: Option<i64>,
    pub damage_class: Option<String>,
    pub effect_chance: Option<i64>,
    pub generation: Option<i64>,
    pub meta: MoveMeta,
    pub power: Option<i64>,
    pub pp: Option<i64>,
    pub priority: Option<i64>,
    pub target: Option<String>,
    pub move_type: Option<String>,
    pub description: String,
}

impl Entity for Move {
    const TABLE: &'static str = "move";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS move (
            id INTEGER PRIMARY KEY,
            name TEXT,
            accuracy INTEGER,
            damage_class TEXT,
            effect_chance INTEGER,
            generation INTEGER,
            ailment TEXT,
            ailment_chance INTEGER,
            crit_rate INTEGER,
            drain INTEGER,
            flinch_chance INTEGER,
            healing INTEGER,
            max_hits INTEGER,
            max_turns INTEGER,
            min_hits INTEGER,
            min_turns INTEGER,
            stat_chance INTEGER,
            power INTEGER,
            pp INTEGER,
            priority INTEGER,
            target TEXT,
            type TEXT,
            description TEXT
        );";

    fn insert_statement(&self) -> InsertStatement {
        let meta = &self.meta;
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO move (id, name, accuracy, damage_class, effect_chance, generation, \
             ailment, ailment_chance, crit_rate, drain, flinch_chance, healing, max_hits, \
             max_turns, min_hits, min_turns, stat_chance, power, pp, priority, target, type, \
             description) \
             VALUES (:id, :name, :accuracy, :damage_class, :effect_chance, :generation, \
             :ailment, :ailment_chance, :crit_rate, :drain, :flinch_chance, :healing, \
             :max_hits, :max_turns, :min_hits, :min_turns, :stat_chance, :power, :pp, \
             :priority, :target, :type, :description);",
        )
        .bind("id", self.id)
        .bind("name", self.name.clone())
        .bind("accuracy", self.accuracy)
        .bind("damage_class", self.damage_class.clone())
        .bind("effect_chance", self.effect_chance)
        .bind("generation", self.generation)
        .bind("ailment", meta.ailment.clone())
        .bind("ailment_chance", meta.ailment_chance)
        .bind("crit_rate", meta.crit_rate)
        .bind("drain", meta.drain)
        .bind("flinch_chance", meta.flinch_chance)
        .bind("healing", meta.healing)
        .bind("max_hits", meta.max_hits)
        .bind("max_turns", meta.max_turns)
        .bind("min_hits", meta.min_hits)
        .bind("min_turns", meta.min_turns)
        .bind("stat_chance", meta.stat_chance)
        .bind("power", self.power)
        .bind("pp", self.pp)
        .bind("priority", self.priority)
        .bind("target", self.target.clone())
        .bind("type", self.move_type.clone())
        .bind("description", self.description.as_str())
    }
}

impl FromJson for Move {
    fn from_json(payload: &Value) -> Result<Self, SeedError> {
        Ok(Self {
            id: required_id(payload, Self::TABLE, "id")?,
            name: parser::display_name(payload),
            accuracy: parser::int(payload, "accuracy"),
            damage_class: parser::named(payload, "damage_class"),
            effect_chance: parser::int(payload, "effect_chance"),
            generation: parser::resource_id(payload, "generation"),
            meta: MoveMeta::from_json(payload),
            power: parser::int(payload, "power"),
            pp: parser::int(payload, "pp"),
            priority: parser::int(payload, "priority"),
            target: parser::named(payload, "target"),
            move_type: parser::named(payload, "type"),
            description: parser::description(payload),
        })
    }
}
