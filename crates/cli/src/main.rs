use std::sync::Arc;

use clap::{Parser, Subcommand};
use clinica_core::{ClinicService, Collection, CoreConfig, CouchServer, DEFAULT_COUCH_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinica")]
#[command(about = "Clinica document store CLI")]
struct Cli {
    /// CouchDB connection string, credentials included
    #[arg(long, env = "COUCHDB_URL", default_value = DEFAULT_COUCH_URL, global = true)]
    url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every clinic database can be opened
    Check,
    /// Print every document of a collection as one JSON line each
    List {
        /// pacienti, doctori, istoric, programari or imagini
        collection: Collection,
    },
    /// Add a patient from a JSON document (must contain nume_complet)
    AddPatient {
        /// Patient document, e.g. '{"nume_complet": "Ana Pop"}'
        json: String,
    },
    /// Print revenue per doctor from the treatment history view
    Revenue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'clinica --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::new(&cli.url)?);
    let server = CouchServer::new(cfg.couch_url())?;
    let collections = match server.connect().await {
        Ok(collections) => collections,
        Err(e) => anyhow::bail!(
            "cannot open the clinic databases at {}: {}",
            cfg.redacted_couch_url(),
            e
        ),
    };
    let service = ClinicService::new(cfg.clone(), Some(collections));

    match command {
        Commands::Check => {
            println!(
                "Connected to {}; all {} databases are available.",
                cfg.redacted_couch_url(),
                Collection::ALL.len()
            );
        }
        Commands::List { collection } => {
            let records = service.list(collection).await?;
            if records.is_empty() {
                println!("No documents found in {}.", collection);
            }
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Commands::AddPatient { json } => {
            let candidate = serde_json::from_str(&json).ok();
            let id = service.add_patient(candidate).await?;
            println!("Added patient with id: {}", id);
        }
        Commands::Revenue => {
            let report = service.revenue_per_doctor().await?;
            if report.is_empty() {
                println!("No revenue recorded.");
            }
            for entry in report {
                println!("{}\t{:.2}", entry.id_doctor, entry.venit_total);
            }
        }
    }

    Ok(())
}
