use std::net::SocketAddr;

use peoplecore::logging::init_tracing;
use peoplecore::router::init_router;
use peoplecore::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
