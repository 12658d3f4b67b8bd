use clap::{ Args, Parser, Subcommand };
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::github::{ DEFAULT_REPO_COUNT, GITHUB_GRAPHQL_URL };
use crate::pool::StoreConnectionConfig;

#[derive(Parser)]
#[command(name = "stars-and-shelves")]
#[command(about = "Bookshelf GraphQL server and GitHub stars client")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the bookshelf GraphQL API
    Serve {
        /// Address to bind the HTTP server to
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:4000")]
        bind: SocketAddr,

        /// Load the bundled demo data before serving
        #[arg(long)]
        seed: bool,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Define the store schema and load demo data
    Seed {
        /// JSON fixture to load instead of the bundled one
        #[arg(long)]
        fixture: Option<PathBuf>,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Print the GraphQL schema as SDL
    Schema {
        /// Write the SDL to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the GitHub viewer's name
    Whoami {
        #[command(flatten)]
        github: GitHubArgs,
    },

    /// List the viewer's repositories with their star state
    Repos {
        /// Number of repositories to fetch
        #[arg(long, default_value_t = DEFAULT_REPO_COUNT)]
        first: u32,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Star a repository by node id
    Star {
        id: String,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Remove the star from a repository by node id
    Unstar {
        id: String,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Star a repository if it is not starred yet, otherwise unstar it
    Toggle {
        id: String,

        #[command(flatten)]
        github: GitHubArgs,
    },
}

#[derive(Args, Clone)]
pub struct DatabaseArgs {
    /// SurrealDB connection URL (`mem://` for an embedded in-memory store)
    #[arg(long, env = "DB_URL", default_value = "mem://")]
    pub db_url: String,

    /// Use a local SurrealDB server at ws://localhost:8000
    #[arg(long)]
    pub local: bool,

    /// SurrealDB username
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// SurrealDB password
    #[arg(long, env = "DB_PASS")]
    pub db_pass: Option<String>,

    /// SurrealDB namespace
    #[arg(long, env = "DB_NAMESPACE", default_value = "shelves")]
    pub db_namespace: String,

    /// SurrealDB database
    #[arg(long, env = "DB_DATABASE", default_value = "books")]
    pub db_database: String,

    /// Maximum number of pooled store connections
    #[arg(long, env = "DB_POOL_MAX_SIZE", default_value_t = 10)]
    pub db_pool_max_size: usize,

    /// Seconds to wait for a new store connection
    #[arg(long, env = "DB_CONNECTION_TIMEOUT", default_value_t = 30)]
    pub db_connection_timeout: u64,
}

impl DatabaseArgs {
    pub fn connection_config(&self) -> StoreConnectionConfig {
        let url = if self.local { "ws://localhost:8000".to_string() } else { self.db_url.clone() };

        StoreConnectionConfig {
            url,
            username: self.db_user.clone(),
            password: self.db_pass.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
        }
    }

    /// Connection config for commands whose writes must outlive the process.
    ///
    /// An embedded `mem://` store is dropped on exit, so seeding it from a
    /// one-shot command would report success and keep nothing.
    pub fn persistent_connection_config(&self) -> anyhow::Result<StoreConnectionConfig> {
        let config = self.connection_config();
        if config.is_embedded() {
            anyhow::bail!(
                "{} is an in-memory store that is discarded on exit; point --db-url (DB_URL) at a SurrealDB server or use `serve --seed`",
                config.url
            );
        }
        Ok(config)
    }
}

#[derive(Args, Clone)]
pub struct GitHubArgs {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// GraphQL endpoint to talk to
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = GITHUB_GRAPHQL_URL)]
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_flag_overrides_db_url() {
        let cli = Cli::parse_from(["stars-and-shelves", "seed", "--local"]);
        match cli.command {
            Command::Seed { db, .. } => {
                assert_eq!(db.connection_config().url, "ws://localhost:8000");
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn seed_rejects_embedded_store() {
        let cli = Cli::parse_from(["stars-and-shelves", "seed", "--db-url", "mem://"]);
        match cli.command {
            Command::Seed { db, .. } => {
                let err = db.persistent_connection_config().unwrap_err();
                assert!(err.to_string().contains("serve --seed"));
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn seed_accepts_server_store() {
        let cli = Cli::parse_from([
            "stars-and-shelves",
            "seed",
            "--db-url",
            "ws://db.internal:8000",
        ]);
        match cli.command {
            Command::Seed { db, .. } => {
                let config = db.persistent_connection_config().expect("server URL is persistent");
                assert_eq!(config.url, "ws://db.internal:8000");
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn repos_defaults_to_ten() {
        let cli = Cli::parse_from(["stars-and-shelves", "repos", "--token", "abc"]);
        match cli.command {
            Command::Repos { first, github } => {
                assert_eq!(first, 10);
                assert_eq!(github.token, "abc");
            }
            _ => panic!("expected repos command"),
        }
    }
}
