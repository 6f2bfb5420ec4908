//! Price breakdown for the cart.

use anyhow::{Context as _, Result};
use shop_commerce::pricing::Adjustments;

use super::TotalsArgs;
use crate::context::Context;
use crate::output::{format_deduction, format_shipping};

/// Run the totals command.
pub async fn run(args: TotalsArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart(args.session.as_deref())?;
    let calculator = ctx.calculator();

    let adjustments = Adjustments::none()
        .with_discount(args.discount)
        .with_loyalty_points(args.points, args.balance);
    let totals = calculator
        .calculate(cart.total(), &adjustments)
        .context("Failed to price the cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&totals);
        return Ok(());
    }

    ctx.output.header("Order summary");
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    ctx.output.kv("Tax", &totals.tax.display());
    ctx.output.kv("Shipping", &format_shipping(&totals.shipping));
    if !totals.discount.is_zero() {
        ctx.output.kv("Discount", &format_deduction(&totals.discount));
    }
    if totals.loyalty_points_used > 0 {
        ctx.output.kv(
            &format!("Points ({})", totals.loyalty_points_used),
            &format_deduction(&totals.loyalty_discount),
        );
    }
    ctx.output.kv("Total", &totals.grand_total.display());

    let remaining = calculator.remaining_for_free_shipping(totals.subtotal);
    if !cart.is_empty() && !remaining.is_zero() {
        ctx.output.info(&format!(
            "Add {} more for free shipping",
            remaining.display()
        ));
    }

    Ok(())
}
