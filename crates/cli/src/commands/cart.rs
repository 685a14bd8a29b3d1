//! Cart commands.
//!
//! The cart ID persists in `<state-dir>/cart.json`, so consecutive commands
//! work on the same Shopify cart. A stored cart that Shopify no longer knows
//! is forgotten on the next command. With `--no-persist` every command starts
//! from no cart and nothing is written.

use std::path::Path;

use marquee_core::{CartLineId, VariantId};
use marquee_storefront::cart::{
    CartError, CartIdStore, CartStore, DisabledCartIdStore, FileCartIdStore, MutationGate,
};
use marquee_storefront::shopify::{Cart, StorefrontClient};

use super::{CliError, Output, print_json, print_lines, storefront_client};

/// Cart state holder backed by the Storefront API.
pub type CliCart<S> = CartStore<StorefrontClient, S>;

/// Open the cart remembered in `state_dir`.
pub async fn open(state_dir: &Path) -> Result<CliCart<FileCartIdStore>, CliError> {
    let store = CartStore::new(
        storefront_client()?,
        FileCartIdStore::new(state_dir),
        MutationGate::new(),
        state_dir.display().to_string(),
    );
    store.initialize().await?;
    Ok(store)
}

/// Open a cart that remembers nothing between commands.
pub fn open_ephemeral() -> Result<CliCart<DisabledCartIdStore>, CliError> {
    Ok(CartStore::new(
        storefront_client()?,
        DisabledCartIdStore,
        MutationGate::new(),
        "ephemeral".to_string(),
    ))
}

pub fn show<S: CartIdStore>(cart: &CliCart<S>, output: Output) -> Result<(), CliError> {
    render(cart.cart().as_ref(), output)
}

pub async fn add<S: CartIdStore>(
    cart: &CliCart<S>,
    variant_id: &str,
    quantity: i64,
    output: Output,
) -> Result<(), CliError> {
    if quantity < 1 {
        return Err(CliError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }
    let updated = cart.add_line(parse_variant_id(variant_id)?, quantity).await?;
    render(Some(&updated), output)
}

pub async fn update<S: CartIdStore>(
    cart: &CliCart<S>,
    line_id: String,
    quantity: i64,
    output: Output,
) -> Result<(), CliError> {
    if quantity < 0 {
        return Err(CliError::InvalidArgument(
            "quantity must not be negative".to_string(),
        ));
    }
    let updated = cart.update_line(CartLineId::new(line_id), quantity).await?;
    render(Some(&updated), output)
}

pub async fn remove<S: CartIdStore>(
    cart: &CliCart<S>,
    line_id: String,
    output: Output,
) -> Result<(), CliError> {
    let updated = cart.remove_line(CartLineId::new(line_id)).await?;
    render(Some(&updated), output)
}

pub async fn clear<S: CartIdStore>(cart: &CliCart<S>, output: Output) -> Result<(), CliError> {
    let updated = cart.clear_cart().await?;
    render(updated.as_ref(), output)
}

pub fn checkout<S: CartIdStore>(cart: &CliCart<S>) -> Result<(), CliError> {
    let url = cart.checkout_url().ok_or(CartError::NoCart)?;
    print_lines(&[url]);
    Ok(())
}

fn render(cart: Option<&Cart>, output: Output) -> Result<(), CliError> {
    if output.json {
        return print_json(&cart);
    }
    print_lines(&summarize(cart));
    Ok(())
}

/// Variant GID, or a numeric ID turned into one.
fn parse_variant_id(raw: &str) -> Result<VariantId, CliError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CliError::InvalidArgument("variant ID is empty".to_string()));
    }
    Ok(raw
        .parse::<u64>()
        .map_or_else(|_| VariantId::new(raw), VariantId::from_numeric))
}

/// Human-readable cart summary.
fn summarize(cart: Option<&Cart>) -> Vec<String> {
    let Some(cart) = cart else {
        return vec!["No cart".to_string()];
    };
    if cart.is_empty() {
        return vec![format!("Cart {} is empty", cart.id)];
    }

    let mut lines = vec![format!("Cart {} ({} items)", cart.id, cart.total_quantity)];
    for line in &cart.lines {
        let merchandise = &line.merchandise;
        let variant = if merchandise.title == "Default Title" {
            String::new()
        } else {
            format!(" ({})", merchandise.title)
        };
        lines.push(format!(
            "  {} x {}{variant}  {}  [{}]",
            line.quantity,
            merchandise.product.title,
            line.cost.subtotal_amount.display(),
            line.id,
        ));
    }
    lines.push(format!("Subtotal: {}", cart.cost.subtotal.display()));
    if let Some(tax) = &cart.cost.total_tax {
        lines.push(format!("Tax: {}", tax.display()));
    }
    lines.push(format!("Total: {}", cart.cost.total.display()));
    lines
}
