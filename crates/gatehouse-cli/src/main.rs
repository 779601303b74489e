use clap::{Parser, Subcommand, ValueEnum};
use gatehouse_core::{GatehouseConfig, ObservabilityConfig, Role, UserId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse identity issuer and access guard")]
struct Cli {
    /// Config file (default: $GATEHOUSE_CONFIG, then ./gatehouse.toml)
    #[arg(long, global = true, env = "GATEHOUSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one of the services.
    Serve {
        #[arg(value_enum)]
        service: Service,

        /// Override the configured bind address, e.g. 127.0.0.1:8001
        #[arg(long)]
        bind: Option<String>,
    },

    /// Token management (mint/verify/inspect)
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Read a password from stdin and print its Argon2id hash.
    HashPassword,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Service {
    /// Credential issuer (register/login)
    Issuer,
    /// Profile service (/users)
    Users,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Sign a token for the given identity.
    Mint {
        #[arg(long)]
        sub: String,

        #[arg(long = "user-id")]
        user_id: UserId,

        #[arg(long, default_value = "client")]
        role: Role,

        /// Lifetime, e.g. "30m" or "12h" (default: [token].ttl)
        #[arg(long)]
        ttl: Option<String>,
    },

    /// Verify a token (or a file containing one) and print the identity.
    Verify { token: String },

    /// Print a token's claims without checking the signature.
    Inspect { token: String },
}

fn init_tracing(cfg: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = GatehouseConfig::load(cli.config.as_deref())?;
    init_tracing(&cfg.observability);

    match cli.cmd {
        Command::Serve { service, bind } => match service {
            Service::Issuer => commands::serve::issuer(cfg, bind).await?,
            Service::Users => commands::serve::users(cfg, bind).await?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                sub,
                user_id,
                role,
                ttl,
            } => {
                let issued = commands::token::mint(&cfg.token, sub, user_id, role, ttl)?;
                println!("{}", issued.token);
            }
            TokenCommand::Verify { token } => {
                let identity = commands::token::verify(&cfg.token, token)?;
                commands::token::print_identity(&identity);
            }
            TokenCommand::Inspect { token } => {
                let info = commands::token::inspect(token)?;
                commands::token::print_info(&info)?;
            }
        },

        Command::HashPassword => {
            let hash =
                commands::password::hash_password(&cfg.password, std::io::stdin().lock()).await?;
            println!("{hash}");
        }
    }

    Ok(())
}
