//! Populates the drinks database with sample data.

use coffeeshop_server::config::AppConfig;
use coffeeshop_server::db::models::{encode_recipe, Ingredient};
use coffeeshop_server::db::{DrinkStore, StoreError};
use log::{error, info, warn};

fn sample_drinks() -> Vec<(&'static str, Vec<Ingredient>)> {
    vec![
        (
            "Espresso",
            vec![Ingredient {
                name: "Coffee".to_string(),
                color: "#8B4513".to_string(),
                parts: 1,
            }],
        ),
        (
            "Cappuccino",
            vec![
                Ingredient {
                    name: "Coffee".to_string(),
                    color: "#8B4513".to_string(),
                    parts: 1,
                },
                Ingredient {
                    name: "Steamed Milk".to_string(),
                    color: "#FFFFFF".to_string(),
                    parts: 2,
                },
            ],
        ),
        (
            "Latte",
            vec![
                Ingredient {
                    name: "Coffee".to_string(),
                    color: "#8B4513".to_string(),
                    parts: 1,
                },
                Ingredient {
                    name: "Steamed Milk".to_string(),
                    color: "#FFFFFF".to_string(),
                    parts: 3,
                },
            ],
        ),
    ]
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let store = match DrinkStore::new(&config.database.url) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.initialize_schema().await {
        error!("Failed to prepare database: {}", e);
        std::process::exit(1);
    }

    info!("Populating {} with sample drinks", config.database.url);
    for (title, ingredients) in sample_drinks() {
        let recipe = match encode_recipe(&ingredients) {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("Failed to encode recipe for '{}': {}", title, e);
                std::process::exit(1);
            }
        };

        match store.insert(title.to_string(), recipe).await {
            Ok(drink) => info!("Created drink: {}", drink.title),
            Err(StoreError::TitleTaken) => warn!("Drink '{}' already exists, skipping", title),
            Err(e) => {
                error!("Failed to create drink '{}': {}", title, e);
                std::process::exit(1);
            }
        }
    }

    info!("Database populated successfully");
}
