use crate::schema::{table_names, DependencyResolver, TableSchema, DEFAULT_TABLES};
use anyhow::{anyhow, bail, Result};

/// Resolves which tables to load based on include/exclude filters
pub fn resolve_tables(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static TableSchema>> {
    let resolver = DependencyResolver::new();

    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let refs: Vec<&str> = include_list.iter().map(|s| s.as_str()).collect();
            log::debug!("resolving dependencies for {:?}", refs);
            resolver.resolve_includes(&refs).map_err(unknown_table)
        }
        (None, Some(exclude_list)) => {
            let refs: Vec<&str> = exclude_list.iter().map(|s| s.as_str()).collect();
            log::debug!("excluding tables {:?}", refs);
            resolver.resolve_excludes(&refs).map_err(unknown_table)
        }
        (None, None) => Ok(DEFAULT_TABLES.to_vec()),
    }
}

fn unknown_table(message: String) -> anyhow::Error {
    anyhow!("{} (available: {})", message, table_names().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tables: &[&TableSchema]) -> Vec<&'static str> {
        tables.iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_default_is_core_load() {
        let tables = resolve_tables(None, None).unwrap();
        assert_eq!(names(&tables), vec!["ability", "pokemon_species", "pokemon"]);
    }

    #[test]
    fn test_include_and_exclude_conflict() {
        let result = resolve_tables(Some(vec!["ability".into()]), Some(vec!["move".into()]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_table_lists_choices() {
        let err = resolve_tables(Some(vec!["berry".into()]), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown table: berry (available: ability, pokemon_species, move, pokemon, pokemon_move, evolution_chain)"
        );
    }

    #[test]
    fn test_include_evolution_chain() {
        let tables = resolve_tables(Some(vec!["evolution_chain".into()]), None).unwrap();
        assert_eq!(
            names(&tables),
            vec!["ability", "pokemon_species", "pokemon", "evolution_chain"]
        );
    }
}
