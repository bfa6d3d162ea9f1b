use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use factor_core::{
    factors_card, load_ranking_config_from_env, rank, ContentCatalog, FactorsCard, GameState,
    Rankings, Var,
};
use tracing::info;

mod report;
mod worker;

use worker::{FactorWorker, FactorWorkerClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ranked factor inspector", long_about = None)]
struct Cli {
    /// Game-state snapshot JSON. Uses the builtin sample when omitted.
    #[arg(long)]
    state: Option<PathBuf>,
    /// Content catalog JSON. Uses the builtin catalog when omitted.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Only show one variable, e.g. `emissions` or `plant_calories`.
    #[arg(long)]
    var: Option<Var>,
    /// Rank on a worker thread through the RPC channel.
    #[arg(long)]
    offload: bool,
    /// Print rankings as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let state = match &cli.state {
        Some(path) => GameState::from_json_str(&fs::read_to_string(path)?)?,
        None => (*GameState::builtin_sample()).clone(),
    };
    let catalog = match &cli.content {
        Some(path) => ContentCatalog::from_file(path)?,
        None => (*ContentCatalog::builtin()).clone(),
    };
    info!(
        year = state.world.year,
        projects = catalog.projects.len(),
        events = catalog.events.len(),
        "inspector.loaded"
    );

    let (rankings, cards) = if cli.offload {
        rank_on_worker(&state, &catalog, cli.var).await?
    } else {
        let (config, _) = load_ranking_config_from_env();
        let cards = Var::ALL
            .into_iter()
            .map(|var| factors_card(var, &state, None))
            .collect();
        (rank(&state, &catalog, &config), cards)
    };

    if cli.json {
        let json = match cli.var {
            Some(var) => serde_json::to_string_pretty(rankings.get(var))?,
            None => serde_json::to_string_pretty(&rankings)?,
        };
        println!("{json}");
    } else {
        print!("{}", report::render_text(&rankings, &cards, cli.var));
    }
    Ok(())
}

async fn rank_on_worker(
    state: &GameState,
    catalog: &ContentCatalog,
    only: Option<Var>,
) -> Result<(Rankings, Vec<FactorsCard>)> {
    let (controller, port) = worker_rpc::channel();
    let handle = worker_rpc::prepare::<FactorWorker>(port)?;
    let constructor = worker_rpc::initialize(controller)?;
    let client: FactorWorkerClient = constructor
        .construct_as(vec![serde_json::to_value(state)?, serde_json::to_value(catalog)?])
        .await?;

    let rankings = match only {
        Some(var) => Rankings(BTreeMap::from([(var, client.rank_var(var).await?)])),
        None => client.rank().await?,
    };
    let mut cards = Vec::new();
    for var in only.map_or(Var::ALL.to_vec(), |var| vec![var]) {
        cards.push(client.factors_card(var, None).await?);
    }
    info!(
        worker = handle.name().unwrap_or("unnamed"),
        factors = rankings.len(),
        fingerprint = client.fingerprint().await?,
        "inspector.offloaded"
    );
    Ok((rankings, cards))
}
