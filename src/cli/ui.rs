use crate::core::convert::format_amount;
use crate::core::currency::CurrencyTable;
use crate::core::state::{ConversionResult, ConverterView};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn symbol_for<'a>(currencies: &'a CurrencyTable, code: &str) -> &'a str {
    currencies.get(code).map_or("", |c| c.symbol.as_str())
}

/// Renders the result card. Labels come from the result itself, so a kept
/// result is never shown against a pair it was not computed for.
pub fn result_card(result: &ConversionResult, currencies: &CurrencyTable) -> String {
    let from = &result.request.from;
    let to = &result.request.to;

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Amount"),
        header_cell("Rate"),
        header_cell("Converted"),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "{} {} {}",
            symbol_for(currencies, from),
            result.request.amount,
            from
        ))
        .set_alignment(CellAlignment::Right),
        Cell::new(format!("1 {} = {} {}", from, result.rate, to)).fg(Color::DarkGrey),
        Cell::new(format!(
            "{} {} {}",
            symbol_for(currencies, to),
            format_amount(result.converted_amount),
            to
        ))
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
        .set_alignment(CellAlignment::Right),
    ]);
    table.to_string()
}

/// Lists the currency table with the current selection marked.
pub fn currency_list(currencies: &CurrencyTable, from: Option<&str>, to: Option<&str>) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Currency"),
        header_cell("Symbol"),
        header_cell("Selected"),
    ]);

    for currency in currencies.iter() {
        let code = currency.code.as_str();
        let selected = match (from == Some(code), to == Some(code)) {
            (true, true) => "from, to",
            (true, false) => "from",
            (false, true) => "to",
            (false, false) => "",
        };
        table.add_row(vec![
            Cell::new(code).add_attribute(Attribute::Bold),
            Cell::new(&currency.label),
            Cell::new(&currency.symbol).set_alignment(CellAlignment::Center),
            Cell::new(selected).fg(Color::Cyan),
        ]);
    }
    table.to_string()
}

/// One-screen summary of the converter state.
pub fn render_view(view: &ConverterView, currencies: &CurrencyTable) -> String {
    let amount = if view.amount.trim().is_empty() {
        style_text("(empty)", StyleType::Subtle)
    } else {
        view.amount.clone()
    };
    let trigger = match (view.busy, view.can_convert) {
        (true, _) => style_text("converting...", StyleType::Warning),
        (false, true) => style_text("ready", StyleType::Value),
        (false, false) => style_text("disabled", StyleType::Subtle),
    };

    let mut output = format!(
        "{} {}  {} {}  {} {}  [{}]",
        style_text("From:", StyleType::Label),
        view.from,
        style_text("To:", StyleType::Label),
        view.to,
        style_text("Amount:", StyleType::Label),
        amount,
        trigger
    );

    if let Some(result) = &view.result {
        output.push('\n');
        output.push_str(&result_card(result, currencies));
    }
    if let Some(alert) = &view.alert {
        output.push('\n');
        output.push_str(&style_text(alert, StyleType::Error));
    }
    output
}

/// Spinner shown while a conversion is loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
