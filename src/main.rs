use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    signer::keypair,
    transaction::Transaction,
};

use movie_review_client::{
    chain::RpcChain,
    cluster::Cluster,
    config::Config,
    error::parse_pubkey,
    pda::find_movie_address,
    server,
    service::MovieService,
    validation::{validate_movie, validate_review},
};

#[derive(Parser)]
#[command(name = "movie-review")]
#[command(about = "Browse movies, manage reviews and check AST rewards on the movie review program")]
struct Cli {
    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to ./movie-review.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cluster to talk to, overriding the configuration
    #[arg(long)]
    cluster: Option<Cluster>,

    /// RPC endpoint, overriding the cluster's public one
    #[arg(long)]
    url: Option<String>,

    /// Signer keypair file
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API and review action server
    Serve,
    /// List all movies
    Movies,
    /// Show one movie by name
    Movie { name: String },
    /// List reviews
    Reviews {
        /// Only reviews written by the signer
        #[arg(long)]
        mine: bool,
        /// Only reviews of this movie
        #[arg(long)]
        movie_name: Option<String>,
    },
    /// Show the AST reward vault balance
    Rewards {
        /// Wallet to inspect (defaults to the signer)
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Show the program account
    Program,
    /// Create a movie (program admin only)
    CreateMovie {
        #[arg(long)]
        name: String,
        #[arg(long)]
        director: String,
        #[arg(long)]
        hero: String,
        #[arg(long)]
        release_year: i64,
    },
    /// Review a movie
    Review(ReviewArgs),
    /// Edit your review of a movie
    UpdateReview(ReviewArgs),
    /// Delete your review of a movie
    DeleteReview {
        #[arg(long)]
        movie_name: String,
    },
}

#[derive(clap::Args)]
struct ReviewArgs {
    #[arg(long)]
    movie_name: String,
    #[arg(long)]
    rating: i64,
    #[arg(long)]
    comment: String,
    #[arg(long)]
    reviewer_name: String,
}

struct App {
    config: Config,
    service: MovieService,
    keypair_path: Option<PathBuf>,
}

impl App {
    fn signer(&self) -> Result<Keypair> {
        let path = match &self.keypair_path {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("no home directory to find the default keypair in"))?
                .join(".config/solana/id.json"),
        };

        keypair::read_keypair_file(&path)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("reading keypair {}", path.display()))
    }

    async fn send(&self, transaction: Transaction, signer: &Keypair) -> Result<()> {
        let signature = self.service.submit(transaction, signer).await?;

        println!("tx signature: {}", signature);
        println!("{}", self.config.cluster.explorer_tx_url(&signature.to_string()));

        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(cluster) = cli.cluster {
        config.cluster = cluster;
    }
    if let Some(url) = cli.url {
        config.rpc_url = Some(url);
    }
    let keypair_path = cli.keypair.or_else(|| config.keypair.clone());

    let chain = Arc::new(RpcChain::new(config.rpc_url(), config.commitment()));
    tracing::debug!("Using RPC endpoint {}", chain.url());
    let service = server::build_service(&config, chain)?;
    let ctx = App {
        config,
        service,
        keypair_path,
    };

    run(&ctx, cli.command).await
}

async fn run(ctx: &App, command: Command) -> Result<()> {
    let service = &ctx.service;

    match command {
        Command::Serve => {
            tracing::info!("Starting movie review server on {}", ctx.config.cluster);
            server::serve(&ctx.config, ctx.service.clone()).await
        }
        Command::Movies => print_json(&service.list_movies().await?),
        Command::Movie { name } => print_json(&service.find_movie_by_name(&name).await?),
        Command::Reviews { mine, movie_name } => {
            let mut reviews = if mine {
                let signer = ctx.signer()?;
                service.my_reviews(&signer.pubkey()).await?
            } else {
                service.list_reviews().await?
            };
            if let Some(name) = movie_name {
                let (movie, _) = find_movie_address(&name, service.program_id())?;
                reviews.retain(|review| review.account.movie_address == movie);
            }
            print_json(&reviews)
        }
        Command::Rewards { wallet } => {
            let wallet: Pubkey = match wallet {
                Some(wallet) => parse_pubkey(&wallet)?,
                None => ctx.signer()?.pubkey(),
            };
            print_json(&service.reward_balance(&wallet).await?)
        }
        Command::Program => {
            let info = service.program_account().await?;
            print_json(&info)?;
            println!("{}", ctx.config.cluster.explorer_address_url(&info.address.to_string()));
            Ok(())
        }
        Command::CreateMovie {
            name,
            director,
            hero,
            release_year,
        } => {
            let form = validate_movie(&name, &director, &hero, release_year)?;
            let signer = ctx.signer()?;
            let transaction = service.create_movie_transaction(&signer.pubkey(), &form).await?;
            ctx.send(transaction, &signer).await
        }
        Command::Review(args) => {
            let form = validate_review(args.rating, &args.comment, &args.reviewer_name)?;
            let signer = ctx.signer()?;
            let transaction = service
                .create_review_for_movie_name(&signer.pubkey(), &args.movie_name, &form)
                .await?;
            ctx.send(transaction, &signer).await
        }
        Command::UpdateReview(args) => {
            let form = validate_review(args.rating, &args.comment, &args.reviewer_name)?;
            let signer = ctx.signer()?;
            let movie = service.find_movie_by_name(&args.movie_name).await?;
            let transaction = service
                .update_review_transaction(&signer.pubkey(), &movie.public_key, &form)
                .await?;
            ctx.send(transaction, &signer).await
        }
        Command::DeleteReview { movie_name } => {
            let signer = ctx.signer()?;
            let movie = service.find_movie_by_name(&movie_name).await?;
            let transaction = service
                .delete_review_transaction(&signer.pubkey(), &movie.public_key)
                .await?;
            ctx.send(transaction, &signer).await
        }
    }
}
