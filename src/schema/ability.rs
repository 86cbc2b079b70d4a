use serde_json::Value;

use super::types::{required_id, Entity, FromJson};
use crate::error::SeedError;
use crate::parser::{self, InsertStatement, NO_DESCRIPTION};

#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub id: i64,
    pub name: Option<String>,
    pub effect: String,
    pub short_effect: String,
    pub description: String,
    pub generation: Option<i64>,
}

impl Entity for Ability {
    const TABLE: &'static str = "ability";
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS ability (
            id INTEGER PRIMARY KEY,
            name TEXT,
            effect TEXT,
            short_effect TEXT,
            description TEXT,
            generation INTEGER
        );";

    fn insert_statement(&self) -> InsertStatement {
        InsertStatement::new(
            Self::TABLE,
            "INSERT INTO ability (id, name, effect, short_effect, description, generation) \
             VALUES (:id, :name, :effect, :short_effect, :description, :generation);",
        )
        .bind("id", self.id)
        .bind("name", self.name.clone())
        .bind("effect", self.effect.as_str())
        .bind("short_effect", self.short_effect.as_str())
        .bind("description", self.description.as_str())
        .bind("generation", self.generation)
    }
}

impl FromJson for Ability {
    fn from_json(payload: &Value) -> Result<Self, SeedError> {
        let effect = parser::localized(payload, "effect_entries");
        let effect_text = |field: &str| {
            effect
                .and_then(|entry| parser::text(entry, field))
                .unwrap_or_else(|| NO_DESCRIPTION.to_string())
        };

        Ok(Self {
            id: required_id(payload, Self::TABLE, "id")?,
            name: parser::display_name(payload),
            effect: effect_text("effect"),
            short_effect: effect_text("short_effect"),
            description: parser::description(payload),
            generation: parser::resource_id(payload, "generation"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stench() -> Value {
        json!({
            "id": 1,
            "name": "stench",
            "generation": {"name": "generation-iii", "url": "https://pokeapi.co/api/v2/generation/3/"},
            "names": [
                {"name": "Duftnote", "language": {"name": "de"}},
                {"name": "Stench", "language": {"name": "en"}}
            ],
            "effect_entries": [
                {"effect": "Wirkung", "short_effect": "Kurz", "language": {"name": "de"}},
                {"effect": "Has a 10% chance of making target flinch.", "short_effect": "May cause flinch.", "language": {"name": "en"}}
            ],
            "flavor_text_entries": [
                {"flavor_text": "Helps repel wild POKéMON.", "language": {"name": "en"}}
            ]
        })
    }

    #[test]
    fn test_from_json() {
        let ability = Ability::from_json(&stench()).unwrap();
        assert_eq!(ability.id, 1);
        assert_eq!(ability.name.as_deref(), Some("Stench"));
        assert_eq!(ability.short_effect, "May cause flinch.");
        assert_eq!(ability.description, "Helps repel wild POKéMON.");
        assert_eq!(ability.generation, Some(3));
    }

    #[test]
    fn test_missing_localizations_use_sentinels() {
        let ability = Ability::from_json(&json!({"id": 300, "name": "mystery"})).unwrap();
        assert_eq!(ability.name.as_deref(), Some("mystery"));
        assert_eq!(ability.effect, NO_DESCRIPTION);
        assert_eq!(ability.short_effect, NO_DESCRIPTION);
        assert_eq!(ability.description, NO_DESCRIPTION);
        assert_eq!(ability.generation, None);
    }

    #[test]
    fn test_missing_id_is_mapping_error() {
        let err = Ability::from_json(&json!({"name": "stench"})).unwrap_err();
        assert!(matches!(err, SeedError::Mapping { table: "ability", field: "id" }));
    }

    #[test]
    fn test_insert_binds_every_placeholder() {
        let stmt = Ability::from_json(&stench()).unwrap().insert_statement();
        let mut keys: Vec<_> = stmt.params.iter().map(|(k, _)| *k).collect();
        let mut placeholders = stmt.placeholders();
        keys.sort_unstable();
        placeholders.sort_unstable();
        assert_eq!(keys, placeholders);
        assert!(Ability::schema().contains("CREATE TABLE IF NOT EXISTS ability"));
    }
}
