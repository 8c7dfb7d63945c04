use anyhow::Context;
use employee_portal::config::AppConfig;
use employee_portal::modules::dashboard::store::DashboardQuery;
use employee_portal::shell::state::AppState;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let state = AppState::from_config(&config).context("wiring backend adapters")?;
    let query = DashboardQuery {
        month: std::env::args().nth(1),
    };
    info!(project = %config.firebase.project_id, month = ?query.month, "fetching portal overview");

    state.checkins.fetch_items().await.context("fetching today's check-ins")?;
    state
        .dashboard
        .get_dashboard_report_user(query.clone())
        .await
        .context("fetching the report summary")?;
    state
        .dashboard
        .get_dashboard_attendance_user(query)
        .context("starting the attendance fetch")?;

    let attendance = match state.dashboard.items_attendance_user().resolve().await {
        Some(result) => serde_json::to_value(result.context("fetching the attendance summary")?)?,
        None => Value::Null,
    };

    let overview = json!({
        "checkins": state.checkins.items(),
        "report_user": state.dashboard.items_report_user(),
        "attendance_user": attendance,
    });
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}
