use clap::Parser;

mod app;
mod cli;
mod config;
mod engine;
mod flavordb;
mod recipedb;
mod taste;
#[cfg(test)]
mod tests;
mod upstream;
mod vectorize;
mod web;

use app::App;
use config::Config;
use engine::RecommendRequest;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let config = Config::from_env();

    match args.command {
        cli::Command::Daemon {} => {
            let bind_addr = config.bind_addr.clone();
            let app = App::new(config);
            web::start_daemon(app, &bind_addr);
            Ok(())
        }

        cli::Command::Recommend {
            taste,
            exclude,
            mode,
            budget,
        } => {
            let mut app = App::new(config);
            let outcome = app.recommend(RecommendRequest {
                mode,
                taste_inputs: taste,
                exclude,
                budget,
            });
            println!("{}", serde_json::to_string_pretty(&outcome.into_body())?);
            Ok(())
        }

        cli::Command::Compounds { term } => {
            let app = App::new(config);
            let compounds = app.flavordb().compounds(&term);
            println!("{}", serde_json::to_string_pretty(&compounds)?);
            Ok(())
        }

        cli::Command::Recipes {} => {
            let mut app = App::new(config);
            app.cached_recipes();
            let debug = app.debug_recipes();
            println!("{}", serde_json::to_string_pretty(&debug)?);
            Ok(())
        }
    }
}
