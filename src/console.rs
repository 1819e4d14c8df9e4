//! Interactive menu on top of the ledger.
//!
//! The shell owns the [`Inventory`] for the session and talks to the user via
//! any `BufRead`/`Write` pair, which keeps it scriptable in tests. Errors from
//! the ledger are printed and the menu is shown again; only I/O errors on the
//! console itself end the session early.

use crate::chart::render_status_pie;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, ValidationError};
use crate::field_parsers::{
    parse_optional_quantity, parse_optional_unit_price, parse_quantity, parse_unit_price,
};
use crate::formatters::{format_product_details, format_product_table, format_thousands};
use crate::models::Product;
use crate::persistence::{save, save_on_exit, StorageFormat};
use crate::stats::{compute_status_counts, format_status_counts, total_stock_value};
use crate::store::{Inventory, SortCriterion};
use log::{debug, error};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Answers accepted as "yes" when confirming a delete
const CONFIRM_ANSWERS: [&str; 4] = ["yes", "y", "có", "co"];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MenuChoice {
    List,
    Add,
    Update,
    Delete,
    Search,
    Sort,
    Statistics,
    Chart,
    Save,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::List),
            "2" => Some(MenuChoice::Add),
            "3" => Some(MenuChoice::Update),
            "4" => Some(MenuChoice::Delete),
            "5" => Some(MenuChoice::Search),
            "6" => Some(MenuChoice::Sort),
            "7" => Some(MenuChoice::Statistics),
            "8" => Some(MenuChoice::Chart),
            "9" => Some(MenuChoice::Save),
            "10" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "\
==================================================
PRODUCT MANAGEMENT
==================================================
1. Show product list
2. Add product
3. Update product
4. Delete product
5. Search products
6. Sort product list
7. Stock statistics
8. Draw stock chart
9. Save to CSV/JSON
10. Exit
==================================================";

pub struct Shell<R, W> {
    input: R,
    output: W,
    inventory: Inventory,
    config: LedgerConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, inventory: Inventory, config: LedgerConfig) -> Self {
        Self {
            input,
            output,
            inventory,
            config,
        }
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Runs the menu loop until the user exits or input ends.
    /// End of input is handled like choosing "Exit".
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                debug!("Input closed, exiting");
                self.exit()?;
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::List) => self.show_products()?,
                Some(MenuChoice::Add) => self.add_product()?,
                Some(MenuChoice::Update) => self.update_product()?,
                Some(MenuChoice::Delete) => self.delete_product()?,
                Some(MenuChoice::Search) => self.search_products()?,
                Some(MenuChoice::Sort) => self.sort_products()?,
                Some(MenuChoice::Statistics) => self.show_statistics()?,
                Some(MenuChoice::Chart) => self.draw_chart()?,
                Some(MenuChoice::Save) => self.save_products()?,
                Some(MenuChoice::Exit) => {
                    self.exit()?;
                    return Ok(());
                }
                None => writeln!(self.output, "Invalid choice, please try again!")?,
            }
        }
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, err: impl Display) -> io::Result<()> {
        writeln!(self.output, "Error: {err}")
    }

    /// Prints the empty-list notice; returns true if there is nothing to work on
    fn report_if_empty(&mut self) -> io::Result<bool> {
        if self.inventory.is_empty() {
            writeln!(self.output, "\nThe product list is empty!")?;
            return Ok(true);
        }
        Ok(false)
    }

    fn show_products(&mut self) -> io::Result<()> {
        if self.report_if_empty()? {
            return Ok(());
        }
        let rows: Vec<&Product> = self.inventory.products().iter().collect();
        let table = format_product_table(&rows);
        writeln!(self.output, "\n{table}")?;
        writeln!(self.output, "Total: {} products", self.inventory.len())
    }

    fn add_product(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== ADD PRODUCT ===")?;

        let Some(id) = self.prompt("Product ID: ")? else {
            return Ok(());
        };
        if id.is_empty() {
            return self.report(ValidationError::EmptyId);
        }
        if self.inventory.find_by_id(&id).is_ok() {
            return self.report(ValidationError::DuplicateKey(id));
        }

        let Some(name) = self.prompt("Product name: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            return self.report(ValidationError::EmptyName);
        }

        let Some(price_input) = self.prompt("Unit price: ")? else {
            return Ok(());
        };
        let unit_price = match parse_unit_price(&price_input) {
            Ok(price) => price,
            Err(e) => return self.report(e),
        };

        let Some(quantity_input) = self.prompt("Quantity: ")? else {
            return Ok(());
        };
        let quantity = match parse_quantity(&quantity_input) {
            Ok(quantity) => quantity,
            Err(e) => return self.report(e),
        };

        match self.inventory.create(&id, &name, unit_price, quantity) {
            Ok(product) => {
                let message = format!("\nAdded product '{}'.", product.name());
                writeln!(self.output, "{message}")
            }
            Err(e) => self.report(e),
        }
    }

    fn update_product(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== UPDATE PRODUCT ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }

        let Some(id) = self.prompt("Product ID to update: ")? else {
            return Ok(());
        };
        let details = match self.inventory.find_by_id(&id) {
            Ok(product) => format_product_details(product),
            Err(e) => return self.report(e),
        };
        writeln!(self.output, "\nCurrent values:\n{details}")?;

        let Some(price_input) = self.prompt("New unit price (Enter to keep): ")? else {
            return Ok(());
        };
        let new_price = match parse_optional_unit_price(&price_input) {
            Ok(price) => price,
            Err(e) => return self.report(e),
        };

        let Some(quantity_input) = self.prompt("New quantity (Enter to keep): ")? else {
            return Ok(());
        };
        let new_quantity = match parse_optional_quantity(&quantity_input) {
            Ok(quantity) => quantity,
            Err(e) => return self.report(e),
        };

        match self.inventory.update(&id, new_price, new_quantity) {
            Ok(product) => {
                let message = format!("\nUpdated product '{}'.", product.name());
                writeln!(self.output, "{message}")
            }
            Err(e) => self.report(e),
        }
    }

    fn delete_product(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== DELETE PRODUCT ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }

        let Some(id) = self.prompt("Product ID to delete: ")? else {
            return Ok(());
        };
        let details = match self.inventory.find_by_id(&id) {
            Ok(product) => format_product_details(product),
            Err(e) => return self.report(e),
        };
        writeln!(self.output, "\nProduct to delete:\n{details}")?;

        let Some(answer) = self.prompt("Are you sure? (yes/no): ")? else {
            return Ok(());
        };
        if !CONFIRM_ANSWERS.contains(&answer.to_lowercase().as_str()) {
            return writeln!(self.output, "Delete cancelled.");
        }

        match self.inventory.delete(&id) {
            Ok(removed) => writeln!(self.output, "Deleted product '{}'.", removed.name()),
            Err(e) => self.report(e),
        }
    }

    fn search_products(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== SEARCH PRODUCTS ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }

        let Some(keyword) = self.prompt("Keyword (ID or name): ")? else {
            return Ok(());
        };
        let output = match self.inventory.search(&keyword) {
            Ok(results) if results.is_empty() => {
                format!("\nNo products match '{keyword}'.")
            }
            Ok(results) => format!(
                "\nFound {} products:\n{}",
                results.len(),
                format_product_table(&results)
            ),
            Err(e) => return self.report(e),
        };
        writeln!(self.output, "{output}")
    }

    fn sort_products(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== SORT PRODUCTS ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }

        writeln!(self.output, "1. By unit price, ascending")?;
        writeln!(self.output, "2. By stock value, descending")?;
        let Some(choice) = self.prompt("Choose (1 or 2): ")? else {
            return Ok(());
        };
        let criterion = match choice.as_str() {
            "1" => SortCriterion::UnitPriceAscending,
            "2" => SortCriterion::StockValueDescending,
            _ => return writeln!(self.output, "Invalid choice!"),
        };

        self.inventory.sort_by(criterion);
        match criterion {
            SortCriterion::UnitPriceAscending => {
                writeln!(self.output, "\nSorted by unit price, ascending.")?
            }
            SortCriterion::StockValueDescending => {
                writeln!(self.output, "\nSorted by stock value, descending.")?
            }
        }
        self.show_products()
    }

    fn show_statistics(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== STOCK STATISTICS ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }
        let stats = compute_status_counts(self.inventory.products());
        let total_value = total_stock_value(self.inventory.products());
        writeln!(self.output, "\n{}", format_status_counts(&stats))?;
        writeln!(self.output, "Total stock value: {}", format_thousands(total_value))
    }

    fn draw_chart(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== STOCK CHART ===")?;
        if self.report_if_empty()? {
            return Ok(());
        }
        let stats = compute_status_counts(self.inventory.products());
        writeln!(self.output, "\n{}", format_status_counts(&stats))?;

        let path = self.config.chart_path.clone();
        match render_status_pie(&stats, &path) {
            Ok(()) => writeln!(self.output, "Chart saved to '{}'.", path.display()),
            Err(e) => {
                error!("Chart rendering failed: {e}");
                self.report(LedgerError::from(e))
            }
        }
    }

    fn save_products(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== SAVE DATA ===")?;
        if self.inventory.is_empty() {
            return writeln!(self.output, "The product list is empty, nothing to save!");
        }

        writeln!(self.output, "1. Save as CSV")?;
        writeln!(self.output, "2. Save as JSON")?;
        let Some(choice) = self.prompt("Choose a format (1 or 2): ")? else {
            return Ok(());
        };
        let format = match choice.as_str() {
            "1" => StorageFormat::Csv,
            "2" => StorageFormat::Json,
            _ => return writeln!(self.output, "Invalid choice!"),
        };

        match save(self.inventory.products(), format, &self.config.files) {
            Ok(path) => writeln!(
                self.output,
                "Saved {} products to '{}'.",
                self.inventory.len(),
                path.display()
            ),
            Err(e) => {
                error!("Saving {} failed: {e}", format.as_str());
                self.report(LedgerError::from(e))
            }
        }
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.inventory.is_empty() {
            writeln!(self.output, "\nSaving data before exit...")?;
        }
        match save_on_exit(self.inventory.products(), &self.config.files) {
            Ok(Some(format)) => {
                let path = self.config.files.path_for(format).display().to_string();
                writeln!(self.output, "Saved automatically to '{path}'.")?;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Exit save failed: {e}");
                self.report(LedgerError::from(e))?;
            }
        }
        writeln!(self.output, "\nThank you for using the program!")
    }
}
