mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use remix_core::ai::{self, FlowConfig};
use remix_core::{store, ActionResult, RecipeActions, SubmittedRecipe};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "remix")]
#[command(about = "Recipe Remix CLI", long_about = None)]
struct Cli {
    /// Directory for submitted and saved recipes
    #[arg(long, global = true, env = "REMIX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a recipe from comma-separated ingredients
    Generate {
        /// e.g. "eggs, spinach, feta"
        ingredients: String,
        /// Free-text request such as "make it spicy"
        #[arg(long)]
        customization: Option<String>,
        /// Also generate a photo of the dish
        #[arg(long)]
        with_image: bool,
    },
    /// Produce a variation of a recipe
    Vary {
        /// Recipe JSON file, or "-" for stdin
        #[arg(long)]
        recipe: PathBuf,
        /// What to change, e.g. "make it vegan"
        variation: String,
    },
    /// Check whether a recipe is viable
    Check {
        #[arg(long)]
        name: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        instructions: String,
    },
    /// Generate a photo for a recipe name
    Image {
        name: String,
    },
    /// Show the recipe of the day
    Daily {
        /// Invalidate the cached recipe and regenerate it
        #[arg(long)]
        reset: bool,
    },
    /// Submit a recipe; it is stored only if judged viable
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        instructions: String,
    },
    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
}

#[derive(Subcommand)]
enum SavedCommands {
    /// List saved recipes
    List,
    /// Save a recipe from a JSON file, or "-" for stdin
    Add {
        recipe: PathBuf,
    },
    /// Remove one saved recipe by id
    Remove {
        id: Uuid,
    },
    /// Remove all saved recipes
    Clear,
}

/// Print the envelope as pretty JSON. Returns whether the action succeeded.
fn print_result<T: Serialize>(result: &ActionResult<T>) -> Result<bool> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(result.is_success())
}

async fn run(cli: Cli) -> Result<bool> {
    let mut flow_config = FlowConfig::from_env()?;
    if let Commands::Generate {
        with_image: true, ..
    } = &cli.command
    {
        flow_config.generate_recipe_image = true;
    }

    let ai_client = ai::create_client_from_env()?;
    let data_dir = cli.data_dir.unwrap_or_else(store::default_data_dir);
    let actions = RecipeActions::with_json_stores(ai_client, flow_config, &data_dir);

    match cli.command {
        Commands::Generate {
            ingredients,
            customization,
            ..
        } => print_result(
            &actions
                .generate_recipe(&ingredients, customization.as_deref())
                .await,
        ),
        Commands::Vary { recipe, variation } => {
            let recipe = input::read_recipe(&recipe)?;
            print_result(&actions.generate_variation(&recipe, &variation).await)
        }
        Commands::Check {
            name,
            ingredients,
            instructions,
        } => print_result(
            &actions
                .check_viability(&name, &ingredients, &instructions)
                .await,
        ),
        Commands::Image { name } => print_result(&actions.generate_image(&name).await),
        Commands::Daily { reset } => {
            let result = if reset {
                actions.reset_recipe_of_the_day().await
            } else {
                actions.recipe_of_the_day().await
            };
            print_result(&result)
        }
        Commands::Submit {
            name,
            ingredients,
            instructions,
        } => {
            let submission = SubmittedRecipe {
                name,
                ingredients,
                instructions,
            };
            print_result(&actions.submit_recipe(submission).await)
        }
        Commands::Saved { command } => match command {
            SavedCommands::List => print_result(&actions.list_saved().await),
            SavedCommands::Add { recipe } => {
                let recipe = input::read_recipe(&recipe)?;
                print_result(&actions.save_recipe(recipe).await)
            }
            SavedCommands::Remove { id } => print_result(&actions.remove_saved(id).await),
            SavedCommands::Clear => print_result(&actions.clear_saved().await),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !run(cli).await? {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "remix",
            "generate",
            "egg, flour, milk",
            "--customization",
            "breakfast",
            "--with-image",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                ingredients,
                customization,
                with_image,
            } => {
                assert_eq!(ingredients, "egg, flour, milk");
                assert_eq!(customization.as_deref(), Some("breakfast"));
                assert!(with_image);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_saved_remove() {
        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["remix", "saved", "remove", &id.to_string()]).unwrap();
        match cli.command {
            Commands::Saved {
                command: SavedCommands::Remove { id: parsed },
            } => assert_eq!(parsed, id),
            _ => panic!("expected saved remove"),
        }
    }

    #[test]
    fn test_bad_uuid_rejected() {
        assert!(Cli::try_parse_from(["remix", "saved", "remove", "not-a-uuid"]).is_err());
    }
}
