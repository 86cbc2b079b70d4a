use serde_json::Value;

use super::types::{required_id, Entity, FromJson};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement, ABSENT};

/// Base value and effort value of one stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub base: Option<i64>,
    pub effort: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub hp: Stat,
    pub attack: Stat,
    pub defense: Stat,
    pub special_attack: Stat,
    pub special_defense: Stat,
    pub speed: Stat,
}

impl Stats {
    fn from_json(payload: &Value) -> Self {
        let mut stats = Stats::default();
        for entry in parser::list(payload, "stats") {
            let Some(name) = parser::named(entry, "stat") else {
                continue;
            };
            let stat = Stat {
                base: parser::int(entry, "base_stat"),
                effort: parser::int(entry, "effort"),
            };
            match name.replace('-', "_").as_str() {
                "hp" => stats.hp = stat,
                "attack" => stats.attack = stat,
                "defense" => stats.defense = stat,
                "special_attack" => stats.special_attack = stat,
                "special_defense" => stats.special_defense = stat,
                "speed" => stats.speed = stat,
                _ => {}
            }
        }
        stats
    }
}

/// Sprite URLs, any of which may be missing for a given form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny_female: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_female: Option<String>,
    pub back_shiny_female: Option<String>,
    pub back_shiny: Option<String>,
}

impl Sprites {
    fn from_json(payload: &Value) -> Self {
        let sprites = payload.get("sprites").unwrap_or(&parser::NULL);
        let url = |key: &str| parser::text(sprites, key);
        Self {
            front_default: url("front_default"),
            front_female: url("front_female"),
            front_shiny_female: url("front_shiny_female"),
            front_shiny: url("front_shiny"),
            back_default: url("back_default"),
            back_female: url("back_female"),
            back_shiny_female: url("back_shiny_female"),
            back_shiny: url("back_shiny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    pub id: i64,
    pub base_experience: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub order: Option<i64>,
    /// Ability ids by slot, `-1` when the slot is empty
    pub primary_ability: i64,
    pub secondary_ability: i64,
    pub hidden_ability: i64,
    pub species: Option<i64>,
    pub stats: Stats,
    pub sprites: Sprites,
    pub cry: Option<String>,
    pub cry_legacy: Option<String>,
    pub name: Option<String>,
    pub primary_type: Option<String>,
    pub secondary_type: Option<String>,
}

impl Entity for Pokemon {
    const TABLE: &'static str = "pokemon";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS pokemon (
            id INTEGER PRIMARY KEY,
            base_experience INTEGER,
            height INTEGER,
            weight INTEGER,
            \"order\" INTEGER,
            primary_ability INTEGER,
            secondary_ability INTEGER,
            hidden_ability INTEGER,
            species INTEGER REFERENCES pokemon_species(id),
            hp INTEGER,
            hp_effort INTEGER,
            attack INTEGER,
            attack_effort INTEGER,
            defense INTEGER,
            defense_effort INTEGER,
            special_attack INTEGER,
            special_attack_effort INTEGER,
            special_defense INTEGER,
            special_defense_effort INTEGER,
            speed INTEGER,
            speed_effort INTEGER,
            sprite_front_default TEXT,
            sprite_front_female TEXT,
            sprite_front_shiny_female TEXT,
            sprite_front_shiny TEXT,
            sprite_back_default TEXT,
            sprite_back_female TEXT,
            sprite_back_shiny_female TEXT,
            sprite_back_shiny TEXT,
            cry TEXT,
            cry_legacy TEXT,
            name TEXT,
            primary_type TEXT,
            secondary_type TEXT
        );";

    fn insert_statement(&self) -> InsertStatement {
        let stats = &self.stats;
        let sprites = &self.sprites;
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO pokemon (id, base_experience, height, weight, \"order\", \
             primary_ability, secondary_ability, hidden_ability, species, hp, hp_effort, \
             attack, attack_effort, defense, defense_effort, special_attack, \
             special_attack_effort, special_defense, special_defense_effort, speed, \
             speed_effort, sprite_front_default, sprite_front_female, \
             sprite_front_shiny_female, sprite_front_shiny, sprite_back_default, \
             sprite_back_female, sprite_back_shiny_female, sprite_back_shiny, cry, \
             cry_legacy, name, primary_type, secondary_type) \
             VALUES (:id, :base_experience, :height, :weight, :order, :primary_ability, \
             :secondary_ability, :hidden_ability, :species, :hp, :hp_effort, :attack, \
             :attack_effort, :defense, :defense_effort, :special_attack, \
             :special_attack_effort, :special_defense, :special_defense_effort, :speed, \
             :speed_effort, :sprite_front_default, :sprite_front_female, \
             :sprite_front_shiny_female, :sprite_front_shiny, :sprite_back_default, \
             :sprite_back_female, :sprite_back_shiny_female, :sprite_back_shiny, :cry, \
             :cry_legacy, :name, :primary_type, :secondary_type);",
        )
        .bind("id", self.id)
        .bind("base_experience", self.base_experience)
        .bind("height", self.height)
        .bind("weight", self.weight)
        .bind("order", self.order)
        .bind("primary_ability", self.primary_ability)
        .bind("secondary_ability", self.secondary_ability)
        .bind("hidden_ability", self.hidden_ability)
        .bind("species", self.species)
        .bind("hp", stats.hp.base)
        .bind("hp_effort", stats.hp.effort)
        .bind("attack", stats.attack.base)
        .bind("attack_effort", stats.attack.effort)
        .bind("defense", stats.defense.base)
        .bind("defense_effort", stats.defense.effort)
        .bind("special_attack", stats.special_attack.base)
        .bind("special_attack_effort", stats.special_attack.effort)
        .bind("special_defense", stats.special_defense.base)
        .bind("special_defense_effort", stats.special_defense.effort)
        .bind("speed", stats.speed.base)
        .bind("speed_effort", stats.speed.effort)
        .bind("sprite_front_default", sprites.front_default.clone())
        .bind("sprite_front_female", sprites.front_female.clone())
        .bind("sprite_front_shiny_female", sprites.front_shiny_female.clone())
        .bind("sprite_front_shiny", sprites.front_shiny.clone())
        .bind("sprite_back_default", sprites.back_default.clone())
        .bind("sprite_back_female", sprites.back_female.clone())
        .bind("sprite_back_shiny_female", sprites.back_shiny_female.clone())
        .bind("sprite_back_shiny", sprites.back_shiny.clone())
        .bind("cry", self.cry.clone())
        .bind("cry_legacy", self.cry_legacy.clone())
        .bind("name", self.name.clone())
        .bind("primary_type", self.primary_type.clone())
        .bind("secondary_type", self.secondary_type.clone())
    }
}

impl FromJson for Pokemon {
    fn from_json(payload: &Value) -> Result<Self, SeedError> {
        let (primary_ability, secondary_ability, hidden_ability) = ability_slots(payload);
        let types = parser::list(payload, "types");
        let cries = payload.get("cries").unwrap_or(&parser::NULL);

        Ok(Self {
            id: required_id(payload, Self::TABLE, "id")?,
            base_experience: parser::int(payload, "base_experience"),
            height: parser::int(payload, "height"),
            weight: parser::int(payload, "weight"),
            order: parser::int(payload, "order"),
            primary_ability,
            secondary_ability,
            hidden_ability,
            species: parser::resource_id(payload, "species"),
            stats: Stats::from_json(payload),
            sprites: Sprites::from_json(payload),
            cry: parser::text(cries, "latest"),
            cry_legacy: parser::text(cries, "legacy"),
            name: parser::text(payload, "name"),
            primary_type: types.first().and_then(|t| parser::named(t, "type")),
            secondary_type: types.get(1).and_then(|t| parser::named(t, "type")),
        })
    }
}

/// Resolve (primary, secondary, hidden) ability ids.
///
/// Slot 1 is primary and slot 2 secondary; the hidden flag wins over the slot
/// number. Empty slots stay at `-1`.
fn ability_slots(payload: &Value) -> (i64, i64, i64) {
    let (mut primary, mut secondary, mut hidden) = (ABSENT, ABSENT, ABSENT);
    for entry in parser::list(payload, "abilities") {
        let Some(id) = parser::resource_id(entry, "ability") else {
            continue;
        };
        if parser::flag(entry, "is_hidden") {
            hidden = id;
            continue;
        }
        match parser::int(entry, "slot") {
            Some(1) => primary = id,
            Some(2) => secondary = id,
            _ => {}
        }
    }
    (primary, secondary, hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SqlValue;
    use serde_json::json;

    fn ability(id: i64, slot: i64, is_hidden: bool) -> Value {
        json!({
            "ability": {"name": "x", "url": format!("https://pokeapi.co/api/v2/ability/{}/", id)},
            "is_hidden": is_hidden,
            "slot": slot
        })
    }

    fn stat(name: &str, base: i64, effort: i64) -> Value {
        json!({"base_stat": base, "effort": effort, "stat": {"name": name, "url": ""}})
    }

    fn bulbasaur() -> Value {
        json!({
            "id": 1,
            "name": "bulbasaur",
            "base_experience": 64,
            "height": 7,
            "weight": 69,
            "order": 1,
            "abilities": [ability(65, 1, false), ability(34, 3, true)],
            "species": {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/"},
            "stats": [
                stat("hp", 45, 0),
                stat("attack", 49, 0),
                stat("defense", 49, 0),
                stat("special-attack", 65, 1),
                stat("special-defense", 65, 0),
                stat("speed", 45, 0)
            ],
            "sprites": {
                "front_default": "https://img/1.png",
                "front_female": null,
                "front_shiny": "https://img/shiny/1.png",
                "back_default": "https://img/back/1.png"
            },
            "cries": {"latest": "https://cries/latest/1.ogg", "legacy": "https://cries/legacy/1.ogg"},
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": ""}},
                {"slot": 2, "type": {"name": "poison", "url": ""}}
            ]
        })
    }

    #[test]
    fn test_from_json() {
        let pokemon = Pokemon::from_json(&bulbasaur()).unwrap();
        assert_eq!(pokemon.id, 1);
        assert_eq!(pokemon.species, Some(1));
        assert_eq!(pokemon.stats.special_attack, Stat { base: Some(65), effort: Some(1) });
        assert_eq!(pokemon.stats.speed.base, Some(45));
        assert_eq!(pokemon.sprites.front_default.as_deref(), Some("https://img/1.png"));
        assert_eq!(pokemon.sprites.front_female, None);
        assert_eq!(pokemon.sprites.back_shiny_female, None);
        assert_eq!(pokemon.cry_legacy.as_deref(), Some("https://cries/legacy/1.ogg"));
        assert_eq!(pokemon.primary_type.as_deref(), Some("grass"));
        assert_eq!(pokemon.secondary_type.as_deref(), Some("poison"));
    }

    #[test]
    fn test_ability_slots() {
        let payload = json!({
            "id": 6,
            "abilities": [ability(94, 3, true), ability(66, 1, false), ability(7, 2, false)]
        });
        let pokemon = Pokemon::from_json(&payload).unwrap();
        assert_eq!(pokemon.primary_ability, 66);
        assert_eq!(pokemon.secondary_ability, 7);
        assert_eq!(pokemon.hidden_ability, 94);
    }

    #[test]
    fn test_single_ability_leaves_other_slots_absent() {
        let payload = json!({"id": 92, "abilities": [ability(26, 1, false)]});
        let pokemon = Pokemon::from_json(&payload).unwrap();
        assert_eq!(pokemon.primary_ability, 26);
        assert_eq!(pokemon.secondary_ability, ABSENT);
        assert_eq!(pokemon.hidden_ability, ABSENT);
    }

    #[test]
    fn test_single_type_and_missing_cries() {
        let payload = json!({"id": 4, "types": [{"slot": 1, "type": {"name": "fire"}}]});
        let pokemon = Pokemon::from_json(&payload).unwrap();
        assert_eq!(pokemon.primary_type.as_deref(), Some("fire"));
        assert_eq!(pokemon.secondary_type, None);
        assert_eq!(pokemon.cry, None);
        assert_eq!(pokemon.stats, Stats::default());
    }

    #[test]
    fn test_insert_statement() {
        let stmt = Pokemon::from_json(&bulbasaur()).unwrap().insert_statement();
        assert_eq!(stmt.get("special_attack_effort"), Some(&SqlValue::Integer(1)));
        assert_eq!(stmt.get("secondary_ability"), Some(&SqlValue::Integer(-1)));
        assert_eq!(stmt.get("sprite_front_female"), Some(&SqlValue::Null));

        let mut keys: Vec<_> = stmt.params.iter().map(|(k, _)| *k).collect();
        let mut placeholders = stmt.placeholders();
        keys.sort_unstable();
        placeholders.sort_unstable();
        assert_eq!(keys, placeholders);
        assert_eq!(keys.len(), 34);
    }
}
