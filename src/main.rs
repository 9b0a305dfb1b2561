//! Small inspection CLI: fetch or delete single entities against a live
//! SPARQL endpoint. Useful for poking at a store during development; the
//! real API surface lives in the services consuming the library.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use plantgraph::{
    Caller, EntityId, EntityKind, GraphRepository, HttpTransport, LoggingConfig, StoreConfig,
    init_logging,
};

#[derive(Parser, Debug)]
#[command(name = "plantgraph", about = "Inspect a plantgraph triple store", version)]
struct CliArgs {
    #[arg(long, value_name = "FILE", help = "Path to a configuration file (YAML or JSON)")]
    config: Option<PathBuf>,

    #[arg(
        long,
        env = "PLANTGRAPH_TENANT",
        value_name = "TENANT",
        help = "Tenant group to operate as"
    )]
    tenant: String,

    #[arg(long, help = "Read across all tenant partitions")]
    shared_read: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hydrate an entity and print it
    Get {
        #[arg(help = "Entity kind, e.g. enterprise")]
        kind: String,
        #[arg(help = "Entity IRI")]
        id: String,
    },
    /// Delete an entity (verified by re-read)
    Delete {
        kind: String,
        id: String,
    },
    /// Cascade-delete an entity and what it owns, two hops deep
    BulkDelete {
        kind: String,
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let args = CliArgs::parse();

    let config = StoreConfig::from_sources(args.config.as_deref())?;
    let transport = HttpTransport::new(
        &config.query_endpoint,
        &config.update_endpoint,
        config.request_timeout,
    )?;
    let repository = GraphRepository::with_max_depth(transport, config.max_traversal_depth);

    let mut caller = Caller::new("plantgraph-cli", vec![args.tenant.clone()]);
    if args.shared_read {
        caller = caller.with_shared_read();
    }

    match args.command {
        Command::Get { kind, id } => {
            let kind = parse_kind(&kind)?;
            let id = EntityId::new(id)?;
            match repository.get_entity(&caller, kind, &id).await? {
                Some(entity) => println!("{entity:#?}"),
                None => println!("not found"),
            }
        }
        Command::Delete { kind, id } => {
            let kind = parse_kind(&kind)?;
            let id = EntityId::new(id)?;
            let gone = repository.delete(&caller, kind, &id).await?;
            println!("deleted: {gone}");
        }
        Command::BulkDelete { kind, id } => {
            let kind = parse_kind(&kind)?;
            let id = EntityId::new(id)?;
            let gone = repository.bulk_delete(&caller, kind, &id).await?;
            println!("deleted: {gone}");
        }
    }

    Ok(())
}

fn parse_kind(value: &str) -> Result<EntityKind> {
    value
        .parse::<EntityKind>()
        .with_context(|| format!("unknown entity kind {value:?}"))
}
