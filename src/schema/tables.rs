//! Registry of every loadable table, in foreign-key dependency order

use super::types::{single, Entity, TableSchema};
use super::{Ability, EvolutionChain, Move, Pokemon, PokemonMove, PokemonSpecies};

pub static ABILITY: TableSchema = TableSchema {
    name: Ability::TABLE,
    resource: "ability",
    create_sql: Ability::SCHEMA,
    foreign_keys: &[],
    records: single::<Ability>,
};

pub static POKEMON_SPECIES: TableSchema = TableSchema {
    name: PokemonSpecies::TABLE,
    resource: "pokemon-species",
    create_sql: PokemonSpecies::SCHEMA,
    foreign_keys: &[],
    records: single::<PokemonSpecies>,
};

pub static MOVE: TableSchema = TableSchema {
    name: Move::TABLE,
    resource: "move",
    create_sql: Move::SCHEMA,
    foreign_keys: &[],
    records: single::<Move>,
};

// Ability ids are stored without a constraint (-1 marks an empty slot), but the
// ability table still has to be loaded alongside its users.
pub static POKEMON: TableSchema = TableSchema {
    name: Pokemon::TABLE,
    resource: "pokemon",
    create_sql: Pokemon::SCHEMA,
    foreign_keys: &["ability", "pokemon_species"],
    records: single::<Pokemon>,
};

/// Derived from the `moves` list of each pokemon payload
pub static POKEMON_MOVE: TableSchema = TableSchema {
    name: PokemonMove::TABLE,
    resource: "pokemon",
    create_sql: PokemonMove::SCHEMA,
    foreign_keys: &["pokemon", "move"],
    records: PokemonMove::records,
};

pub static EVOLUTION_CHAIN: TableSchema = TableSchema {
    name: EvolutionChain::TABLE,
    resource: "evolution-chain",
    create_sql: EvolutionChain::SCHEMA,
    foreign_keys: &["pokemon"],
    records: EvolutionChain::records,
};

pub static ALL_TABLES: &[&TableSchema] = &[
    &ABILITY,
    &POKEMON_SPECIES,
    &MOVE,
    &POKEMON,
    &POKEMON_MOVE,
    &EVOLUTION_CHAIN,
];

/// Tables loaded when no filter is given
pub static DEFAULT_TABLES: &[&TableSchema] = &[&ABILITY, &POKEMON_SPECIES, &POKEMON];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_dependency_ordered() {
        for (position, table) in ALL_TABLES.iter().enumerate() {
            for parent in table.foreign_keys {
                let parent_position = ALL_TABLES.iter().position(|t| t.name == *parent).unwrap();
                assert!(parent_position < position, "{} listed before {}", table.name, parent);
            }
        }
    }

    #[test]
    fn test_schemas_are_idempotent_ddl() {
        for table in ALL_TABLES {
            let expected = format!("CREATE TABLE IF NOT EXISTS {} (", table.name);
            assert!(table.create_sql.contains(&expected), "{}", table.name);
        }
    }

    #[test]
    fn test_default_tables() {
        let names: Vec<_> = DEFAULT_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["ability", "pokemon_species", "pokemon"]);
        assert!(get_table("evolution_chain").is_some());
        assert!(get_table("types").is_none());
    }
}
