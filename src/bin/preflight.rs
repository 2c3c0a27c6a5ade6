use contact_management::infra::{logging, AppConfig, StoreKind};
use contact_management::storage::{ContactStore, PgContactStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--sync-schema]\n\
         \n\
         Reads the same environment as api_server:\n\
           DATABASE_URL, or DB_HOST / DB_PORT / DB_USERNAME / DB_PASSWORD / DB_DATABASE\n\
         --sync-schema creates the contacts table when it is missing.\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let sync_schema = args.iter().any(|a| a == "--sync-schema");

    // Force-read config (nice error messages if anything is malformed)
    let config = AppConfig::from_env()?;
    let db = &config.database;

    tracing::info!("preflight:");
    tracing::info!("  PORT={}", config.port);
    tracing::info!("  database={}", db.display_target());
    tracing::info!("  CONTACTS_STORE={:?}", config.store);
    tracing::info!("  production={}", config.production);

    if config.store == StoreKind::Memory {
        tracing::info!("in-memory store selected; nothing to check. Preflight OK.");
        return Ok(());
    }

    let store = PgContactStore::connect(db.connect_options()?, 1)
        .await
        .map_err(|e| anyhow::anyhow!("cannot connect to {}: {}", db.display_target(), e))?;

    store.ping().await?;
    tracing::info!("  database reachable");

    if store.schema_present().await? {
        tracing::info!("  contacts table present");
    } else if sync_schema {
        tracing::info!("  contacts table missing -> creating it");
        store.sync_schema().await?;
        if !store.schema_present().await? {
            return Err(anyhow::anyhow!("contacts table still missing after sync"));
        }
        tracing::info!("  contacts table created");
    } else if db.synchronize {
        tracing::warn!("  contacts table missing; api_server will create it at startup (DB_SYNC=true)");
    } else {
        return Err(anyhow::anyhow!(
            "contacts table does not exist and DB_SYNC=false. Re-run with --sync-schema"
        ));
    }

    tracing::info!("Preflight OK.");
    Ok(())
}
