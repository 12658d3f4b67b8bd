use anyhow::Context;
use clap::Parser;
use colored::*;
use stars_and_shelves::cli::{ Cli, Command, DatabaseArgs, GitHubArgs };
use stars_and_shelves::github::GitHubClient;
use stars_and_shelves::graphql::{ build_schema, schema_sdl };
use stars_and_shelves::pool::{
    acquire,
    create_pool,
    PoolConfig,
    StoreConnectionConfig,
    StorePool,
};
use stars_and_shelves::render::{ render_viewer, star_glyph };
use stars_and_shelves::seed::{ seed_store, SeedData };
use stars_and_shelves::server::{ start_server, AppState };
use stars_and_shelves::types::Starrable;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, seed, db } => {
            println!("{}", "Bookshelf GraphQL Server".bold().green());
            println!("{}\n", "=".repeat(50).dimmed());

            let db_pool = Arc::new(open_pool(&db, db.connection_config()).await?);

            let conn = acquire(&db_pool).await?;
            conn.define_schema().await?;
            if seed {
                seed_store(&conn, &SeedData::bundled()?).await?;
                println!("✅ Loaded demo data");
            }
            drop(conn);

            let schema = build_schema(db_pool.clone());
            let state = AppState::new(schema, db_pool);

            println!("📡 GraphiQL available at http://{}/graphql", bind);
            println!("\nPress Ctrl+C to stop the server\n");

            tokio::select! {
                result = start_server(state, bind) => {
                    result.context("GraphQL server failed")?;
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("\n🛑 Shutting down server...");
                }
            }

            println!("✅ Server stopped");
        }
        Command::Seed { fixture, db } => {
            let connection_config = db.persistent_connection_config()?;

            let data = match fixture {
                Some(path) => SeedData::from_file(&path)?,
                None => SeedData::bundled()?,
            };

            let db_pool = open_pool(&db, connection_config).await?;
            let conn = acquire(&db_pool).await?;
            seed_store(&conn, &data).await?;

            println!(
                "✅ Seeded {} users, {} books, {} ratings",
                data.users.len(),
                data.books.len(),
                data.ratings.len()
            );
        }
        Command::Schema { out } => {
            let sdl = schema_sdl();
            match out {
                Some(path) => {
                    std::fs::write(&path, sdl)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote schema to {}", path.display());
                }
                None => println!("{}", sdl),
            }
        }
        Command::Whoami { github } => {
            let client = github_client(&github)?;
            let name = client.viewer_name().await?;
            println!("Hello {}", name.unwrap_or_else(|| "anonymous".to_string()));
        }
        Command::Repos { first, github } => {
            let client = github_client(&github)?;
            let viewer = client.viewer_repositories(first).await?;
            print!("{}", render_viewer(&viewer));
        }
        Command::Star { id, github } => {
            let client = github_client(&github)?;
            report_star(&id, &client.add_star(&id).await?);
        }
        Command::Unstar { id, github } => {
            let client = github_client(&github)?;
            report_star(&id, &client.remove_star(&id).await?);
        }
        Command::Toggle { id, github } => {
            let client = github_client(&github)?;
            report_star(&id, &client.toggle_star(&id).await?);
        }
    }

    Ok(())
}

async fn open_pool(
    db: &DatabaseArgs,
    connection_config: StoreConnectionConfig
) -> anyhow::Result<StorePool> {
    info!(url = %connection_config.url, "Opening store pool");

    let pool_config = PoolConfig {
        max_size: db.db_pool_max_size,
        connection_timeout: std::time::Duration::from_secs(db.db_connection_timeout),
        ..Default::default()
    };

    let pool = create_pool(connection_config, pool_config).await?;
    println!("✅ Created SurrealDB connection pool with {} connections", db.db_pool_max_size);
    Ok(pool)
}

fn github_client(github: &GitHubArgs) -> anyhow::Result<GitHubClient> {
    GitHubClient::with_endpoint(github.token.clone(), &github.endpoint).context(
        "Set GITHUB_TOKEN or pass --token with a personal access token"
    )
}

fn report_star(id: &str, starrable: &Starrable) {
    let name = starrable.name.as_deref().unwrap_or(id);
    println!("{} {}", name.bold(), star_glyph(starrable.viewer_has_starred).to_string().yellow());
}
