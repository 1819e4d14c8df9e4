use crate::models::Product;

const TABLE_WIDTH: usize = 110;

/// Groups the digits of an amount in threes, e.g. `1234567` -> `1,234,567`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn table_header() -> String {
    format!(
        "{:<5} {:<12} {:<30} {:<12} {:<12} {:<15} {:<15}\n",
        "No.", "ID", "Name", "Price", "Quantity", "Stock value", "Status"
    )
}

fn table_row(index: usize, product: &Product) -> String {
    format!(
        "{:<5} {:<12} {:<30} {:<12} {:<12} {:<15} {:<15}\n",
        index,
        product.id(),
        product.name(),
        format_thousands(product.unit_price()),
        product.quantity(),
        format_thousands(product.stock_value()),
        product.status()
    )
}

/// Renders products as a numbered table, rows numbered from 1
pub fn format_product_table(products: &[&Product]) -> String {
    let mut output = String::new();

    output.push_str(&"=".repeat(TABLE_WIDTH));
    output.push('\n');
    output.push_str(&table_header());
    output.push_str(&"-".repeat(TABLE_WIDTH));
    output.push('\n');
    for (i, product) in products.iter().enumerate() {
        output.push_str(&table_row(i + 1, product));
    }
    output.push_str(&"=".repeat(TABLE_WIDTH));
    output.push('\n');

    output
}

/// Multi-line summary of one product, used before updating or deleting it
pub fn format_product_details(product: &Product) -> String {
    format!(
        "  ID: {}\n  Name: {}\n  Price: {}\n  Quantity: {}\n  Stock value: {}\n  Status: {}\n",
        product.id(),
        product.name(),
        format_thousands(product.unit_price()),
        product.quantity(),
        format_thousands(product.stock_value()),
        product.status()
    )
}
