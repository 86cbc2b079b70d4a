//! Runs the load against a real PostgreSQL server.
//!
//! The tables it touches are dropped first, so point it at a scratch database:
//! ```sh
//! POKEDEX_TEST_DATABASE="host=localhost user=postgres dbname=pokedex_test" \
//!     cargo test --test postgres_test -- --ignored
//! ```

use postgres::{Client, NoTls};
use serde_json::{json, Value};
use std::collections::HashMap;

use pokedex_seed::error::{FetchError, SeedError};
use pokedex_seed::fetch::{Fetch, ResourceRef};
use pokedex_seed::loader::{seed, seed_if_empty};
use pokedex_seed::schema::{ABILITY, ALL_TABLES, EVOLUTION_CHAIN, POKEMON, POKEMON_SPECIES};
use pokedex_seed::ui::SilentUi;
use pokedex_seed::writer::{PgWriter, Sink};

fn connect() -> Client {
    let config = std::env::var("POKEDEX_TEST_DATABASE")
        .expect("POKEDEX_TEST_DATABASE must be set to a libpq connection string");
    Client::connect(&config, NoTls).expect("Failed to connect to test database")
}

fn reset(client: &mut Client) {
    client
        .batch_execute(
            "DROP TABLE IF EXISTS evolution_chain, pokemon_move, pokemon, move, \
             pokemon_species, ability CASCADE;",
        )
        .expect("Failed to drop tables");
}

struct FixtureApi(HashMap<&'static str, Vec<Value>>);

impl FixtureApi {
    fn url(resource: &str, payload: &Value) -> String {
        format!("https://pokeapi.test/api/v2/{}/{}/", resource, payload["id"])
    }
}

impl Fetch for FixtureApi {
    fn list(&self, resource: &str) -> Result<Vec<ResourceRef>, FetchError> {
        Ok(self
            .0
            .get(resource)
            .map(|payloads| {
                payloads
                    .iter()
                    .map(|p| ResourceRef {
                        name: p["name"].as_str().unwrap_or_default().to_string(),
                        url: Self::url(resource, p),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn detail(&self, url: &str) -> Result<Value, FetchError> {
        self.0
            .iter()
            .flat_map(|(resource, payloads)| payloads.iter().map(move |p| (Self::url(resource, p), p)))
            .find(|(candidate, _)| candidate == url)
            .map(|(_, p)| p.clone())
            .ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn fixtures() -> FixtureApi {
    let mut map = HashMap::new();
    map.insert(
        "ability",
        vec![json!({
            "id": 65,
            "name": "overgrow",
            "names": [{"name": "Overgrow", "language": {"name": "en"}}],
            "generation": {"name": "generation-iii", "url": "https://pokeapi.co/api/v2/generation/3/"}
        })],
    );
    map.insert(
        "pokemon-species",
        vec![json!({
            "id": 1,
            "name": "bulbasaur",
            "order": 1,
            "egg_groups": [{"name": "monster"}, {"name": "plant"}],
            "names": [{"name": "Bulbasaur", "language": {"name": "en"}}]
        })],
    );
    map.insert(
        "pokemon",
        vec![json!({
            "id": 1,
            "name": "bulbasaur",
            "species": {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/"},
            "abilities": [
                {"ability": {"name": "overgrow", "url": "https://pokeapi.co/api/v2/ability/65/"}, "is_hidden": false, "slot": 1}
            ],
            "types": [{"slot": 1, "type": {"name": "grass"}}],
            "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp"}}]
        })],
    );
    map.insert(
        "evolution-chain",
        vec![json!({
            "id": 1,
            "chain": {
                "species": {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/"},
                "evolution_details": [],
                "evolves_to": []
            }
        })],
    );
    FixtureApi(map)
}

#[test]
#[ignore]
fn test_live_load_and_skip_on_rerun() {
    let mut client = connect();
    reset(&mut client);

    let api = fixtures();
    let tables = [&ABILITY, &POKEMON_SPECIES, &POKEMON, &EVOLUTION_CHAIN];

    let mut writer = PgWriter::new(connect());
    let rows = seed(&api, &mut writer, &tables, &mut SilentUi).unwrap();
    assert_eq!(rows, 3);

    let row = client
        .query_one("SELECT name, primary_ability, hidden_ability FROM pokemon WHERE id = 1", &[])
        .unwrap();
    assert_eq!(row.get::<_, Option<String>>(0).as_deref(), Some("bulbasaur"));
    assert_eq!(row.get::<_, i32>(1), 65);
    assert_eq!(row.get::<_, i32>(2), -1);

    let mut writer = PgWriter::new(connect());
    assert!(writer.has_rows("pokemon").unwrap());
    let rerun = seed_if_empty(&api, &mut writer, &[&ABILITY, &POKEMON], &mut SilentUi).unwrap();
    assert_eq!(rerun, None);

    // Single-stage chains produce no rows, so only `evolution_chain` is retried
    // and the populated parents are not inserted a second time
    let mut writer = PgWriter::new(connect());
    assert!(!writer.has_rows("evolution_chain").unwrap());
    let rerun = seed_if_empty(&api, &mut writer, &tables, &mut SilentUi).unwrap();
    assert_eq!(rerun, Some(0));

    let abilities: i64 = client.query_one("SELECT COUNT(*) FROM ability", &[]).unwrap().get(0);
    assert_eq!(abilities, 1);
}

#[test]
#[ignore]
fn test_schema_statements_are_repeatable() {
    let mut client = connect();
    reset(&mut client);

    let mut writer = PgWriter::new(connect());
    for table in ALL_TABLES.iter().chain(ALL_TABLES.iter()) {
        writer.create_table(table).unwrap();
    }
    writer.commit().unwrap();

    // Again in a later transaction, as a second run would
    for table in ALL_TABLES {
        writer.create_table(table).unwrap();
    }
    writer.commit().unwrap();

    for table in ALL_TABLES {
        let count: i64 = client
            .query_one(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_name = $1",
                &[&table.name],
            )
            .unwrap()
            .get(0);
        assert_eq!(count, 1, "table {}", table.name);
    }
}

#[test]
#[ignore]
fn test_uncommitted_load_leaves_nothing() {
    let mut client = connect();
    reset(&mut client);

    {
        let mut writer = PgWriter::new(connect());
        let mut api = fixtures();
        api.0.remove("pokemon");
        api.0.insert("pokemon", vec![json!({"name": "missingno"})]);
        let err = seed(&api, &mut writer, &[&ABILITY, &POKEMON_SPECIES, &POKEMON], &mut SilentUi)
            .unwrap_err();
        assert!(matches!(err, SeedError::Mapping { table: "pokemon", field: "id" }));
    }

    let exists: bool = client
        .query_one(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = 'ability')",
            &[],
        )
        .unwrap()
        .get(0);
    assert!(!exists);
}
