use std::process;
use todo_backend::config::Config;
use todo_backend::database::Database;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("[migrate] Failed to load configuration: {err}");
            process::exit(1);
        }
    };

    println!(
        "[migrate] Connecting to database: {}",
        config.redacted_database_url()
    );
    let db = match Database::new_with_migrations(&config.database_url).await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("[migrate] Database migration failed: {err}");
            process::exit(1);
        }
    };

    db.close().await;
    println!("[migrate] Database schema is up to date.");
}
