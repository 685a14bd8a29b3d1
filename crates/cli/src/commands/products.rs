//! Catalog commands.

use marquee_storefront::shopify::Product;

use super::{CliError, Output, print_json, print_lines, storefront_client};

pub async fn list(first: Option<i64>, after: Option<String>, output: Output) -> Result<(), CliError> {
    let page = storefront_client()?.get_products(first, after).await?;

    if output.json {
        return print_json(&page);
    }

    let mut lines: Vec<String> = page.products.iter().map(product_line).collect();
    if page.page_info.has_next_page {
        if let Some(cursor) = &page.page_info.end_cursor {
            lines.push(format!("More: --after {cursor}"));
        }
    }
    print_lines(&lines);
    Ok(())
}

pub async fn show(handle: &str, output: Output) -> Result<(), CliError> {
    let product = storefront_client()?.get_product_by_handle(handle).await?;

    if output.json {
        return print_json(&product);
    }

    let mut lines = vec![product_line(&product)];
    for variant in &product.variants {
        lines.push(format!(
            "  {}  {}  {}",
            variant.id,
            variant.title,
            variant.price.display()
        ));
    }
    print_lines(&lines);
    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "{}  {}  from {}",
        product.handle,
        product.title,
        product.price_range.min_variant_price.display()
    )
}
