use anyhow::{Context, Result};
use barkeep_core::catalog::{BarContext, IngredientAliases, LiquorDatabase, RecipeBook};
use barkeep_schemas::{
    alias::IngredientAlias,
    container::ContainerDefinition,
    file_formats::{AliasFile, ContainerFile, LiquorFile, RecipeFile},
    liquor::Liquor,
    recipe::Recipe,
};
use std::{collections::HashMap, fs, path::Path};

/// All the static bar data loaded from YAML files: what can be poured, what can be
/// recognized, and what the liquids are poured into.
pub struct KnowledgeBase {
    pub liquors: HashMap<String, Liquor>,
    pub recipes: HashMap<String, Recipe>,
    pub aliases: HashMap<String, IngredientAlias>,
    pub containers: HashMap<String, ContainerDefinition>,
}

impl KnowledgeBase {
    /// Loads all data from the specified base directory.
    pub fn load(base_path: &str) -> Result<Self> {
        println!("Loading knowledge base from '{}'...", base_path);

        let liquors = load_yaml_files_into_map(
            Path::new(base_path).join("1_liquors"),
            |file: LiquorFile| file.liquors,
            |item: &Liquor| item.liquor_id.clone(),
        )?;
        let recipes = load_yaml_files_into_map(
            Path::new(base_path).join("2_recipes"),
            |file: RecipeFile| file.recipes,
            |item: &Recipe| item.recipe_id.clone(),
        )?;
        let aliases = load_yaml_files_into_map(
            Path::new(base_path).join("3_aliases"),
            |file: AliasFile| file.aliases,
            |item: &IngredientAlias| item.alias.clone(),
        )?;
        let containers = load_yaml_files_into_map(
            Path::new(base_path).join("4_containers"),
            |file: ContainerFile| file.containers,
            |item: &ContainerDefinition| item.definition_id.clone(),
        )?;

        println!(
            "Knowledge base loaded: {} liquors, {} recipes, {} aliases, {} container types.",
            liquors.len(),
            recipes.len(),
            aliases.len(),
            containers.len()
        );
        Ok(Self {
            liquors,
            recipes,
            aliases,
            containers,
        })
    }

    /// Builds the lookup tables the simulation core is handed.
    pub fn bar_context(&self) -> BarContext {
        BarContext::new(
            LiquorDatabase::new(self.liquors.values().cloned().collect()),
            RecipeBook::new(self.recipes.values().cloned().collect()),
            IngredientAliases::new(self.aliases.values().cloned().collect()),
        )
    }

    pub fn container_definitions(&self) -> Vec<ContainerDefinition> {
        self.containers.values().cloned().collect()
    }
}

/// Generic helper to load all YAML files in a directory into a HashMap.
fn load_yaml_files_into_map<P, F, E, T, K>(
    dir_path: P,
    extract_vec: E,
    get_key: K,
) -> Result<HashMap<String, T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., LiquorFile)
    E: Fn(F) -> Vec<T>,                  // Pulls the Vec<T> out of the wrapper
    K: Fn(&T) -> String,                 // Map key for an item T
{
    let mut map = HashMap::new();
    for entry in fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let file_wrapper: F = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML from {:?}", path))?;

            for item in extract_vec(file_wrapper) {
                let key = get_key(&item);
                if map.insert(key.clone(), item).is_some() {
                    tracing::warn!(key = %key, file = ?path, "duplicate knowledge base entry replaced");
                }
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_core::catalog::{LiquorLookup, NameNormalizer};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn write(base: &Path, dir: &str, name: &str, content: &str) {
        let dir = base.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_kb(base: &Path) {
        write(
            base,
            "1_liquors",
            "spirits.yaml",
            r#"
schema_version: "1.0"
liquors:
  - liquor_id: gin
    display_name: Gin
    category: spirit
    color: { r: 0.95, g: 0.95, b: 1.0, a: 0.2 }
    abv: 40
  - liquor_id: vermouth
    display_name: Dry Vermouth
    category: wine
    color: { r: 0.9, g: 0.85, b: 0.6 }
    abv: 18
"#,
        );
        write(
            base,
            "2_recipes",
            "classics.yml",
            r#"
schema_version: "1.0"
recipes:
  - recipe_id: martini
    display_name: Martini
    ingredients: { gin: 6, vermouth: 1 }
    glass: martini
    price: 12
"#,
        );
        write(
            base,
            "3_aliases",
            "aliases.yaml",
            r#"
schema_version: "1.0"
aliases:
  - alias: dry_vermouth
    canonical_id: vermouth
"#,
        );
        write(
            base,
            "4_containers",
            "glassware.yaml",
            r#"
schema_version: "1.0"
containers:
  - definition_id: COUPE
    kind: glass
    max_volume_ml: 200
"#,
        );
        write(base, "4_containers", "README.txt", "not yaml");
    }

    #[test]
    fn loads_every_section() {
        let dir = tempdir().unwrap();
        sample_kb(dir.path());

        let kb = KnowledgeBase::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(kb.liquors.len(), 2);
        assert_eq!(kb.recipes["martini"].price, 12.0);
        assert!(!kb.recipes["martini"].requires_shaking);
        assert_eq!(kb.containers["COUPE"].max_volume_ml, 200.0);
        assert_eq!(kb.liquors["vermouth"].color.a, 1.0);

        let context = kb.bar_context();
        assert_eq!(context.liquors.get_liquor("gin").unwrap().abv, 40.0);
        assert_eq!(context.recipes.len(), 1);
        let normalized = context
            .aliases
            .normalize(&BTreeMap::from([("dry_vermouth".to_string(), 10.0)]));
        assert_eq!(normalized["vermouth"], 10.0);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempdir().unwrap();
        write(dir.path(), "1_liquors", "empty.yaml", "schema_version: \"1.0\"\nliquors: []\n");

        let err = KnowledgeBase::load(dir.path().to_str().unwrap())
            .err()
            .unwrap();
        assert!(err.to_string().contains("2_recipes"));
    }

    #[test]
    fn malformed_yaml_names_the_file() {
        let dir = tempdir().unwrap();
        sample_kb(dir.path());
        write(dir.path(), "2_recipes", "broken.yaml", "recipes: [");

        let err = KnowledgeBase::load(dir.path().to_str().unwrap())
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("broken.yaml"));
    }
}
