use super::ui;
use crate::core::ConversionController;
use anyhow::{Result, bail};

/// Performs a single conversion and prints the result card.
pub async fn run(
    controller: &ConversionController,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    if let Some(warning) = controller.start().await {
        eprintln!("{}", ui::style_text(&warning, ui::StyleType::Warning));
    }

    if let Some(code) = from {
        controller.select_from(code).await?;
    }
    if let Some(code) = to {
        controller.select_to(code).await?;
    }
    controller.set_amount(amount).await;

    if !controller.can_convert().await {
        bail!("Enter an amount to convert.");
    }

    let view = controller.snapshot().await;
    let pb = ui::new_spinner(&format!("Fetching {} rates...", view.from));
    let outcome = controller.convert().await;
    pb.finish_and_clear();

    match outcome {
        Ok(Some(result)) => {
            println!("{}", ui::result_card(&result, controller.currencies()));
            Ok(())
        }
        Ok(None) => bail!("Conversion was superseded before the rates arrived"),
        Err(e) => {
            let alert = e.alert_message();
            Err(anyhow::Error::new(e).context(alert))
        }
    }
}
