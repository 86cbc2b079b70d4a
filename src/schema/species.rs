use serde_json::Value;

use super::types::{required_id, Entity, FromJson};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement, ABSENT};

#[derive(Debug, Clone, PartialEq)]
pub struct PokemonSpecies {
    pub id: i64,
    pub base_happiness: Option<i64>,
    pub capture_rate: Option<i64>,
    pub gender_rate: Option<i64>,
    pub hatch_counter: Option<i64>,
    pub order: Option<i64>,
    pub generation: Option<i64>,
    pub national_pokedex_number: i64,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub color: Option<String>,
    pub growth_rate: Option<String>,
    pub habitat: Option<String>,
    pub shape: Option<String>,
    pub genera: String,
    pub name: Option<String>,
    /// Egg group names, stringified as `['monster', 'plant']`
    pub egg_group: Option<String>,
    /// Pokemon ids of every variety, stringified as `[3, 10033]`
    pub varieties: String,
    pub description: String,
}

impl Entity for PokemonSpecies {
    const TABLE: &'static str = "pokemon_species";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS pokemon_species (
            id INTEGER PRIMARY KEY,
            base_happiness INTEGER,
            capture_rate INTEGER,
            gender_rate INTEGER,
            hatch_counter INTEGER,
            \"order\" INTEGER,
            generation INTEGER,
            national_pokedex_number INTEGER,
            is_baby BOOLEAN,
            is_legendary BOOLEAN,
            is_mythical BOOLEAN,
            color TEXT,
            growth_rate TEXT,
            habitat TEXT,
            shape TEXT,
            genera TEXT,
            name TEXT,
            egg_group TEXT,
            varieties TEXT,
            description TEXT
        );";

    fn insert_statement(&self) -> InsertStatement {
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO pokemon_species (id, base_happiness, capture_rate, gender_rate, \
             hatch_counter, \"order\", generation, national_pokedex_number, is_baby, \
             is_legendary, is_mythical, color, growth_rate, habitat, shape, genera, name, \
             egg_group, varieties, description) \
             VALUES (:id, :base_happiness, :capture_rate, :gender_rate, :hatch_counter, \
             :order, :generation, :national_pokedex_number, :is_baby, :is_legendary, \
             :is_mythical, :color, :growth_rate, :habitat, :shape, :genera, :name, \
             :egg_group, :varieties, :description);",
        )
        .bind("id", self.id)
        .bind("base_happiness", self.base_happiness)
        .bind("capture_rate", self.capture_rate)
        .bind("gender_rate", self.gender_rate)
        .bind("hatch_counter", self.hatch_counter)
        .bind("order", self.order)
        .bind("generation", self.generation)
        .bind("national_pokedex_number", self.national_pokedex_number)
        .bind("is_baby", self.is_baby)
        .bind("is_legendary", self.is_legendary)
        .bind("is_mythical", self.is_mythical)
        .bind("color", self.color.clone())
        .bind("growth_rate", self.growth_rate.clone())
        .bind("habitat", self.habitat.clone())
        .bind("shape", self.shape.clone())
        .bind("genera", self.genera.as_str())
        .bind("name", self.name.clone())
        .bind("egg_group", self.egg_group.clone())
        .bind("varieties", self.varieties.as_str())
        .bind("description", self.description.as_str())
    }
}

impl FromJson for PokemonSpecies {
    fn from_json(payload: &Value) -> Result<Self, SeedError> {
        Ok(Self {
            id: required_id(payload, Self::TABLE, "id")?,
            base_happiness: parser::int(payload, "base_happiness"),
            capture_rate: parser::int(payload, "capture_rate"),
            gender_rate: parser::int(payload, "gender_rate"),
            hatch_counter: parser::int(payload, "hatch_counter"),
            order: parser::int(payload, "order"),
            generation: parser::resource_id(payload, "generation"),
            national_pokedex_number: national_number(payload),
            is_baby: parser::flag(payload, "is_baby"),
            is_legendary: parser::flag(payload, "is_legendary"),
            is_mythical: parser::flag(payload, "is_mythical"),
            color: category(payload, "color"),
            growth_rate: category(payload, "growth_rate"),
            habitat: category(payload, "habitat"),
            shape: category(payload, "shape"),
            genera: parser::localized_text(payload, "genera", "genus").unwrap_or_default(),
            name: parser::display_name(payload),
            egg_group: egg_groups(payload),
            varieties: varieties(payload),
            description: parser::description(payload),
        })
    }
}

/// Category name with hyphens spelled as spaces ("rough-terrain" -> "rough terrain")
fn category(payload: &Value, key: &str) -> Option<String> {
    parser::named(payload, key).map(|name| name.replace('-', " "))
}

fn national_number(payload: &Value) -> i64 {
    parser::list(payload, "pokedex_numbers")
        .iter()
        .find(|entry| parser::named(entry, "pokedex").as_deref() == Some("national"))
        .and_then(|entry| parser::int(entry, "entry_number"))
        .unwrap_or(ABSENT)
}

fn egg_groups(payload: &Value) -> Option<String> {
    let names: Vec<String> = parser::list(payload, "egg_groups")
        .iter()
        .filter_map(|group| parser::text(group, "name"))
        .map(|name| format!("'{}'", name))
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(format!("[{}]", names.join(", ")))
    }
}

/// `[1, 10033]` when the list is present (`[]` if it is empty), `""` when absent
fn varieties(payload: &Value) -> String {
    let Some(varieties) = payload.get("varieties").and_then(Value::as_array) else {
        return String::new();
    };
    let ids: Vec<String> = varieties
        .iter()
        .filter_map(|variety| parser::resource_id(variety, "pokemon"))
        .map(|id| id.to_string())
        .collect();
    format!("[{}]", ids.join(", "))
}
