use super::ui;
use crate::core::config::AppConfig;
use anyhow::Result;

/// Prints the supported currencies with the configured defaults marked.
pub fn run(config: &AppConfig) -> Result<()> {
    let table = config.currency_table()?;
    let from = table.get(&config.default_from).map(|c| c.code.as_str());
    let to = table.get(&config.default_to).map(|c| c.code.as_str());
    println!(
        "{}\n\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        ui::currency_list(&table, from, to)
    );
    Ok(())
}
