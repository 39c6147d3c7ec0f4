use engine::session::{self, Identity, SessionGate, StaticProvider};
use engine::store::SqlStore;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hucha={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let store = SqlStore::new(db);

    // The local deployment has a single pre-resolved identity from settings;
    // swapping in a real identity provider only changes this wiring.
    let provider = StaticProvider::signed_in(Identity {
        user_id: settings.app.user.clone(),
        email: settings.app.email.clone(),
    });

    let mut gate = SessionGate::new(&provider);
    let Some(identity) = gate.resolved().await? else {
        tracing::info!("no identity resolved; login required");
        return Ok(());
    };

    tracing::info!(user = %identity.user_id, "session resolved");
    let finance = engine::Engine::load(store, &identity.user_id).await?;

    tracing::info!(
        wallets = finance.wallets().len(),
        transactions = finance.transactions().len(),
        budgets = finance.budgets().len(),
        categories = finance.categories().all().len(),
        "mirror loaded"
    );
    tracing::info!(
        "income {} / expenses {} / balance {}",
        finance.total_income(),
        finance.total_expenses(),
        finance.total_balance()
    );

    session::logout(&provider).await;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
