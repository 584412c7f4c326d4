use drqa::config::ClientConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::load()?;
    tracing::info!(api_base = %config.api_base, "starting drqa");

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(drqa::ui::App);
    Ok(())
}
