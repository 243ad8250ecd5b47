use crate::config::KnowledgeBase;
use crate::plotting;
use anyhow::{Context, Result};
use barkeep_core::{
    analysis::{self, SessionSummary},
    catalog::LiquorLookup,
    contents::ContainerContents,
    recognition::{RecipeMatcher, RecognitionResult},
    scenario,
    simulation::{builder::SimulationBuilder, engine::SimulationEngine},
};
use barkeep_schemas::{color::Rgba, ingredient::IngredientContribution};
use serde::Serialize;
use std::{collections::BTreeMap, fs, path::Path};

pub struct RunOptions<'a> {
    pub scenario_path: &'a str,
    pub scenario_id: Option<&'a str>,
    pub output_root: &'a str,
    pub dt: f64,
    pub plots: bool,
}

/// Runs one scenario against the knowledge base, writes its session log, charts and a
/// copy of the scenario file into a timestamped directory, and returns that directory.
pub fn run_scenario(kb: &KnowledgeBase, options: &RunOptions) -> Result<String> {
    let scenarios = scenario::load_scenarios(options.scenario_path)?;
    let scenario = scenario::select_scenario(scenarios, options.scenario_id)?;

    let output_dir = format!(
        "{}/{}_{}",
        options.output_root,
        scenario.scenario_id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    // Keep the scenario next to its results
    fs::copy(options.scenario_path, Path::new(&output_dir).join("scenario.yaml"))
        .with_context(|| format!("Failed to copy {}", options.scenario_path))?;

    let log_path = Path::new(&output_dir).join("session.csv");
    let log_path = log_path
        .to_str()
        .context("Output path is not valid UTF-8")?
        .to_string();

    println!("\n--- [Workflow] Running '{}' ---", scenario.scenario_name);
    if let Some(notes) = &scenario.notes {
        println!("{}", notes.trim());
    }

    let mut engine = SimulationBuilder::new()
        .with_context(kb.bar_context())
        .with_container_definitions(kb.container_definitions())
        .with_scenario(scenario)
        .with_timeseries_logging_to_file(&log_path)
        .build()?;

    engine.run(options.dt)?;

    let summary = analysis::summarize_session(&log_path)?;
    write_reports(&output_dir, &summary)?;
    print_container_report(&engine);
    print_summary_report(&summary, kb);

    if options.plots {
        plotting::generate_all_plots(&output_dir, &log_path)?;
    }

    Ok(output_dir)
}

/// Recognizes an ad-hoc mix given as `(ingredient id, ml)` pairs. Unknown ids are
/// poured as colorless liquid so they still count as contamination.
pub fn recognize_mix(
    kb: &KnowledgeBase,
    pours: &[(String, f64)],
    shaken: bool,
) -> (RecognitionResult, ContainerContents) {
    let context = kb.bar_context();
    let capacity: f64 = pours.iter().map(|(_, ml)| ml.max(0.0)).sum();
    let mut contents = ContainerContents::new(capacity.max(1.0));

    for (id, ml) in pours {
        match context.liquors.get_liquor(id) {
            Some(liquor) => contents.add_liquor(liquor, *ml),
            None => contents.add_ingredient(IngredientContribution::new(
                id,
                id,
                *ml,
                Rgba::TRANSPARENT,
            )),
        };
    }
    if shaken {
        contents.mark_shaken();
    }

    let matcher = RecipeMatcher::new(&context.recipes, &context.aliases, &context.liquors);
    let result = matcher.recognize(&contents.ingredient_volumes(), contents.is_shaken());
    (result, contents)
}

pub fn print_recognition(kb: &KnowledgeBase, result: &RecognitionResult, contents: &ContainerContents) {
    let context = kb.bar_context();
    println!("\n--- Recognition ---");
    println!("  Drink:   {}", result.name);
    if let Some(id) = &result.recipe_id {
        println!("  Recipe:  {}", id);
    }
    println!("  Score:   {:.3}{}", result.score, if result.is_perfect { " (perfect)" } else { "" });
    println!("  Volume:  {:.1} ml", contents.volume_ml());
    println!(
        "  ABV:     {:.1}%",
        contents.calculate_alcohol_content(&context.liquors)
    );
    println!("  Color:   {}", contents.mixed_color().to_hex());
}

pub fn print_recipes(kb: &KnowledgeBase) {
    let mut recipes: Vec<_> = kb.recipes.values().collect();
    recipes.sort_by(|a, b| a.recipe_id.cmp(&b.recipe_id));

    println!("\n--- Recipes ({}) ---", recipes.len());
    for recipe in recipes {
        let parts: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|(id, parts)| {
                let name = kb
                    .liquors
                    .get(id)
                    .map_or(id.as_str(), |l| l.display_name.as_str());
                format!("{} {}", parts, name)
            })
            .collect();
        println!(
            "  {:<16} ${:>6.2}  {}{}",
            recipe.display_name,
            recipe.price,
            parts.join(" : "),
            if recipe.requires_shaking { "  [shaken]" } else { "" }
        );
    }
}

#[derive(Serialize)]
struct OrderRow<'a> {
    drink_name: &'a str,
    recipe_id: &'a str,
    order_recipe_id: &'a str,
    score: f64,
    is_perfect: bool,
    matched_order: bool,
    temperature_c: f64,
    payment: f64,
    tip: f64,
}

/// Writes `summary.json` and an `orders.csv` ledger of served drinks.
fn write_reports(output_dir: &str, summary: &SessionSummary) -> Result<()> {
    let summary_path = Path::new(output_dir).join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(summary)?)
        .with_context(|| format!("Failed to write {:?}", summary_path))?;

    let orders_path = Path::new(output_dir).join("orders.csv");
    let mut writer = csv::Writer::from_path(&orders_path)
        .with_context(|| format!("Failed to create {:?}", orders_path))?;
    for outcome in &summary.drinks_served {
        writer.serialize(OrderRow {
            drink_name: &outcome.drink_name,
            recipe_id: outcome.recipe_id.as_deref().unwrap_or(""),
            order_recipe_id: outcome.order_recipe_id.as_deref().unwrap_or(""),
            score: outcome.score,
            is_perfect: outcome.is_perfect,
            matched_order: outcome.matched_order,
            temperature_c: outcome.temperature_c,
            payment: outcome.payment,
            tip: outcome.tip,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_container_report(engine: &SimulationEngine) {
    println!("\n--- Final Containers ---");
    for (id, container) in engine.get_containers() {
        let contents = container.contents();
        let volumes: BTreeMap<String, f64> = contents.ingredient_volumes();
        let listing: Vec<String> = volumes
            .iter()
            .map(|(ingredient, ml)| format!("{} {:.1} ml", ingredient, ml))
            .collect();
        println!(
            "  {:<14} {:>7.1} / {:<7.1} ml {:>6.1} °C  {}",
            id,
            contents.volume_ml(),
            contents.max_volume_ml(),
            container.temperature_c(),
            if listing.is_empty() {
                "(empty)".to_string()
            } else {
                listing.join(", ")
            }
        );
    }
}

fn print_summary_report(summary: &SessionSummary, kb: &KnowledgeBase) {
    println!("\n\n--- [Session Summary] ---");
    println!("========================================");
    println!("Ticks:            {}", summary.total_ticks);
    println!("Duration:         {:.2} s", summary.duration_s);
    println!("Total poured:     {:.1} ml", summary.total_poured_ml);
    println!("Shakes completed: {}", summary.shakes_completed);

    if !summary.ingredients_added.is_empty() {
        println!("\nIngredients added:");
        for (id, ml) in &summary.ingredients_added {
            let name = kb.liquors.get(id).map_or(id.as_str(), |l| l.display_name.as_str());
            println!("  - {}: {:.1} ml", name, ml);
        }
    }

    println!("\nDrinks served:");
    if summary.drinks_served.is_empty() {
        println!("  (none)");
    }
    for outcome in &summary.drinks_served {
        println!(
            "  - {:<18} ordered {:<12} score {:.2}  {:>5.1} °C  ${:.2} + ${:.2} tip",
            outcome.drink_name,
            outcome.order_recipe_id.as_deref().unwrap_or("-"),
            outcome.score,
            outcome.temperature_c,
            outcome.payment,
            outcome.tip
        );
    }
    println!("----------------------------------------");
    println!("Revenue:          ${:.2}", summary.revenue);
    println!("Tips:             ${:.2}", summary.tips);
    println!("========================================");
}

/// Parses `id=ml` arguments.
pub fn parse_pours(args: &[String]) -> Result<Vec<(String, f64)>> {
    args.iter()
        .map(|arg| {
            let (id, ml) = arg
                .split_once('=')
                .with_context(|| format!("Expected <ingredient>=<ml>, got '{}'", arg))?;
            let ml: f64 = ml
                .trim()
                .parse()
                .with_context(|| format!("Invalid amount in '{}'", arg))?;
            Ok((id.trim().to_string(), ml))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_schemas::{
        liquor::{Liquor, LiquorCategory},
        recipe::Recipe,
    };
    use std::collections::HashMap;

    fn kb() -> KnowledgeBase {
        let liquor = |id: &str, name: &str, abv: f64| Liquor {
            liquor_id: id.to_string(),
            display_name: name.to_string(),
            category: LiquorCategory::Spirit,
            color: Rgba::new(1.0, 1.0, 1.0, 0.3),
            abv,
            description: None,
        };
        let martini = Recipe {
            recipe_id: "martini".to_string(),
            display_name: "Martini".to_string(),
            ingredients: BTreeMap::from([("gin".to_string(), 6.0), ("vermouth".to_string(), 1.0)]),
            requires_shaking: false,
            glass: None,
            garnish: None,
            description: None,
            price: 12.0,
        };
        KnowledgeBase {
            liquors: HashMap::from([
                ("gin".to_string(), liquor("gin", "Gin", 40.0)),
                ("vermouth".to_string(), liquor("vermouth", "Dry Vermouth", 18.0)),
            ]),
            recipes: HashMap::from([("martini".to_string(), martini)]),
            aliases: HashMap::new(),
            containers: HashMap::new(),
        }
    }

    #[test]
    fn parses_pour_arguments() {
        let pours = parse_pours(&["gin=60".to_string(), " vermouth = 10.5".to_string()]).unwrap();
        assert_eq!(pours, vec![("gin".to_string(), 60.0), ("vermouth".to_string(), 10.5)]);
        assert!(parse_pours(&["gin".to_string()]).is_err());
        assert!(parse_pours(&["gin=lots".to_string()]).is_err());
    }

    #[test]
    fn recognizes_an_adhoc_martini() {
        let kb = kb();
        let (result, contents) = recognize_mix(
            &kb,
            &[("gin".to_string(), 60.0), ("vermouth".to_string(), 10.0)],
            false,
        );
        assert_eq!(result.recipe_id.as_deref(), Some("martini"));
        assert!((contents.volume_ml() - 70.0).abs() < 1e-9);
    }

    fn shipped(path: &str) -> String {
        format!("{}/../data/{}", env!("CARGO_MANIFEST_DIR"), path)
    }

    #[test]
    fn shipped_scenarios_serve_what_they_order() {
        let kb = KnowledgeBase::load(&shipped("knowledge_base")).unwrap();
        let mut served = BTreeMap::new();

        for file in ["scenarios/classics.yaml", "scenarios/highballs.yaml"] {
            for scenario in scenario::load_scenarios(&shipped(file)).unwrap() {
                let id = scenario.scenario_id.clone();
                let mut engine = SimulationBuilder::new()
                    .with_context(kb.bar_context())
                    .with_container_definitions(kb.container_definitions())
                    .with_scenario(scenario)
                    .build()
                    .unwrap();
                engine.run(0.05).unwrap();
                served.insert(id, engine.get_served().to_vec());
            }
        }

        for (scenario_id, recipe_id) in [
            ("stirred_martini", "martini"),
            ("shaken_margarita", "margarita"),
            ("gin_and_tonic", "gin_and_tonic"),
        ] {
            let outcome = &served[scenario_id][0];
            assert_eq!(outcome.recipe_id.as_deref(), Some(recipe_id), "{}", scenario_id);
            assert!(outcome.matched_order, "{}", scenario_id);
            assert!(outcome.payment > 0.0, "{}", scenario_id);
        }

        let wrong = &served["wrong_order"][0];
        assert_eq!(wrong.recipe_id.as_deref(), Some("screwdriver"));
        assert!(!wrong.matched_order);
        assert_eq!(wrong.payment, 0.0);
    }

    #[test]
    fn run_writes_its_artifacts() {
        let kb = KnowledgeBase::load(&shipped("knowledge_base")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let scenario_path = shipped("scenarios/classics.yaml");
        let options = RunOptions {
            scenario_path: &scenario_path,
            scenario_id: Some("stirred_martini"),
            output_root: out.path().to_str().unwrap(),
            dt: 0.05,
            plots: false,
        };

        let output_dir = run_scenario(&kb, &options).unwrap();
        let dir = Path::new(&output_dir);
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("stirred_martini_"));
        for artifact in ["scenario.yaml", "session.csv", "summary.json", "orders.csv"] {
            assert!(dir.join(artifact).is_file(), "missing {}", artifact);
        }

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["drinks_served"][0]["recipe_id"], "martini");

        let mut orders = csv::Reader::from_path(dir.join("orders.csv")).unwrap();
        assert_eq!(orders.records().count(), 1);
    }

    #[test]
    fn unknown_ingredients_contaminate() {
        let kb = kb();
        let (result, contents) = recognize_mix(
            &kb,
            &[
                ("gin".to_string(), 60.0),
                ("vermouth".to_string(), 10.0),
                ("pickle_brine".to_string(), 40.0),
            ],
            false,
        );
        assert!(!result.is_recognized());
        assert_eq!(result.name, "Mixed Gin");
        assert_eq!(contents.ingredients().len(), 3);
    }
}
