use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_reservation::{
    App,
    config::Config,
    models::{OrderSummary, SeatId},
    services::checkout,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting seat selection demo ({})", config.app.environment);

    let mut app = App::from_config(config)?;

    // Клики по схеме
    for id in ["2-5", "1-3", "4-7", "4-7"] {
        let id: SeatId = id.parse()?;
        let selected = app.engine.toggle(id);
        info!("Clicked seat {}: {}", id, if selected { "selected" } else { "deselected" });
    }

    let summary = app.engine.compute_summary();
    if summary.is_empty() {
        info!("{}", OrderSummary::PLACEHOLDER);
    } else {
        for line in &summary.lines {
            info!("{}", line);
        }
        info!("Tickets: {}, total: {}", summary.ticket_count, summary.total_label());
    }

    // Отправка формы оформления
    let body = "fullname=Demo+Buyer&email=demo%40example.com&phone=%2B380671234567&payment=google-pay";
    let (record, validation) = checkout::submit_checkout(&mut app.engine, body)?;
    if let Err(e) = validation {
        for (field, message) in e.field_messages() {
            warn!("{}: {}", field, message);
        }
    }

    info!("{}", record.confirmation_text());
    info!("Order record: {}", serde_json::to_string(&record)?);

    Ok(())
}
