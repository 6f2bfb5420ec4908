//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use serde_json::json;
use shop_cache::FileStore;
use shop_commerce::cart::{parse_quantity, CartProduct, CartStore};
use shop_commerce::{Money, ProductId};

use super::{AddArgs, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart(args.session.as_deref())?;

    match args.command {
        CartCommand::Add(add) => add_item(add, &mut cart, ctx),
        CartCommand::Remove { id } => remove_item(&id, &mut cart, ctx),
        CartCommand::Set { id, quantity } => set_quantity(&id, &quantity, &mut cart, ctx),
        CartCommand::Clear { yes } => clear_cart(yes, &mut cart, ctx),
        CartCommand::Show => {
            show_cart(&cart, ctx);
            Ok(())
        }
    }
}

fn add_item(args: AddArgs, cart: &mut CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let quantity = parse_quantity(&args.quantity)?;

    let mut product = CartProduct::new(args.id, args.name, args.price);
    if let Some(stock) = args.stock {
        product = product.with_stock(stock);
    }
    if let Some(image) = args.image {
        product = product.with_image(image);
    }
    if let Some(brand) = args.brand {
        product = product.with_brand(brand, args.model.unwrap_or_default());
    }
    if let Some(category) = args.category {
        product = product.with_category(category);
    }

    let now = cart.add_quantity(&product, quantity)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "id": product.id, "quantity": now }));
    } else {
        ctx.output.success(&format!("{} x{} in cart", product.name, now));
    }
    Ok(())
}

fn remove_item(id: &str, cart: &mut CartStore<FileStore>, ctx: &Context) -> Result<()> {
    if !cart.remove(&ProductId::new(id)) {
        bail!("{} is not in the cart", id);
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "removed": id }));
    } else {
        ctx.output.success(&format!("Removed {}", id));
    }
    Ok(())
}

fn set_quantity(
    id: &str,
    quantity: &str,
    cart: &mut CartStore<FileStore>,
    ctx: &Context,
) -> Result<()> {
    let quantity = parse_quantity(quantity)?;
    cart.set_quantity(&ProductId::new(id), quantity)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "id": id, "quantity": quantity }));
    } else if quantity == 0 {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.success(&format!("{} quantity set to {}", id, quantity));
    }
    Ok(())
}

fn clear_cart(yes: bool, cart: &mut CartStore<FileStore>, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", cart.item_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    cart.clear();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "cleared": true }));
    } else {
        ctx.output.success("Cart cleared");
    }
    Ok(())
}

fn show_cart(cart: &CartStore<FileStore>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "items": cart.items(),
            "itemCount": cart.item_count(),
            "total": cart.total(),
        }));
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [16, 28, 6, 16];
    ctx.output.table_row(&["ID", "NAME", "QTY", "LINE TOTAL"], &widths);
    let currency = cart.currency();
    for item in cart.items() {
        let quantity = match item.stock {
            Some(stock) => format!("{}/{}", item.quantity, stock),
            None => item.quantity.to_string(),
        };
        let line_total = Money::new(item.line_total(), currency).display();
        let row = [item.id.as_str(), item.name.as_str(), quantity.as_str(), line_total.as_str()];
        ctx.output.table_row(&row, &widths);
    }

    println!();
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Subtotal", &cart.total().display());
}
