use imgpress_api::setup;
use imgpress_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, services, routes)
    let (state, router) = setup::initialize_app(config.clone()).await?;

    let background_tasks = setup::services::start_background_tasks(&config, &state)?;

    // Start the server
    setup::server::start_server(&config, router, background_tasks).await?;

    Ok(())
}
