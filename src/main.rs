use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitCode};

use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use inquire::{Confirm, DateSelect, InquireError, Select, Text};
use thiserror::Error;

use invoice_desk::config::{self, AppSettings};
use invoice_desk::dashboard::{recent_invoices, upcoming_invoices, DashboardStats};
use invoice_desk::export::Exporter;
use invoice_desk::format::{format_currency, format_date};
use invoice_desk::ids::new_invoice_item;
use invoice_desk::mail::compose_reminder;
use invoice_desk::validation::ValidationErrors;
use invoice_desk::{
    logging, ClientDraft, ClientPatch, CompanyInfo, FileStorage, Invoice, InvoiceDraft,
    InvoiceItem, InvoicePatch, InvoiceStatus, ProductDraft, ProductPatch, Store,
};

// ==========================================
// Constants
// ==========================================
const DONE_OPT: &str = "✅ Done";
const ADD_ITEM_OPT: &str = "➕ Add Item";
const CUSTOM_ITEM_OPT: &str = "✏️  Custom Item (no product)";
const RECENT_LIMIT: usize = 5;

// ==========================================
// Structs & Enums
// ==========================================

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] invoice_desk::Error),
    #[error("prompt failed: {0}")]
    Prompt(#[from] InquireError),
}

type CliResult<T> = Result<T, CliError>;

type AppStore = Store<FileStorage>;

#[derive(Parser)]
#[command(name = "invoice-desk", version, about = "Clients, products and invoices on your own disk")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Revenue overview, recent and upcoming invoices
    Dashboard,
    /// Manage invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Manage products and services
    #[command(subcommand)]
    Product(EntityCommand),
    /// Manage clients
    #[command(subcommand)]
    Client(EntityCommand),
    /// Company profile printed on invoices
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Configure data directory
    Config,
}

#[derive(Subcommand)]
enum InvoiceCommand {
    /// List invoices
    List {
        /// Only show invoices with this status
        #[arg(long)]
        status: Option<InvoiceStatus>,
    },
    /// Show invoice details (by id or invoice number)
    Show { invoice: Option<String> },
    /// Create a new invoice
    New,
    /// Edit an invoice
    Edit { invoice: Option<String> },
    /// Change invoice status
    Status {
        invoice: Option<String>,
        status: Option<InvoiceStatus>,
    },
    /// Delete an invoice
    Delete { invoice: Option<String> },
    /// Export an invoice as PDF
    Export { invoice: Option<String> },
    /// Send a payment reminder through the system mail client
    Email { invoice: Option<String> },
}

#[derive(Subcommand)]
enum EntityCommand {
    /// List all records
    List,
    /// Add a new record
    Add,
    /// Edit a record
    Edit { id: Option<String> },
    /// Delete a record
    Delete { id: Option<String> },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show company information
    Show,
    /// Edit company information
    Edit,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("warn");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Prompt(InquireError::OperationCanceled | InquireError::OperationInterrupted)) => {
            println!("Operation cancelled.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        return Ok(());
    };

    // 1. Initialize configuration
    let config_path = config::config_path();
    if let Commands::Config = command {
        setup_config_wizard(&config_path)?;
        return Ok(());
    }
    let settings = match config::load_settings(&config_path)? {
        Some(settings) => settings,
        None => setup_config_wizard(&config_path)?,
    };
    let root = settings.data_dir();

    // 2. Open the store (malformed data aborts here)
    let storage = FileStorage::new(root.join("data"))?;
    let mut store = Store::open(storage)?;
    store.seed_demo_data()?;

    match command {
        Commands::Dashboard => show_dashboard(&store),
        Commands::Invoice(cmd) => run_invoice_command(&mut store, &root, cmd)?,
        Commands::Product(cmd) => run_product_command(&mut store, cmd)?,
        Commands::Client(cmd) => run_client_command(&mut store, cmd)?,
        Commands::Settings(SettingsCommand::Show) => show_company(store.company()),
        Commands::Settings(SettingsCommand::Edit) => edit_company(&mut store)?,
        Commands::Config => unreachable!("handled before the store is opened"),
    }
    Ok(())
}

// ==========================================
// 1. Dashboard
// ==========================================

fn show_dashboard(store: &AppStore) {
    let stats = DashboardStats::collect(store);

    let mut table = Table::new();
    table.set_header(vec![Cell::new("Metric"), Cell::new("Value")]);
    table.add_row(vec![
        Cell::new("Total Revenue"),
        Cell::new(format_currency(stats.total_revenue)).fg(status_color(InvoiceStatus::Paid)),
    ]);
    table.add_row(vec![Cell::new("Paid Invoices"), Cell::new(stats.paid_invoices)]);
    table.add_row(vec![
        Cell::new("Pending Amount"),
        Cell::new(format_currency(stats.pending_amount)).fg(status_color(InvoiceStatus::Pending)),
    ]);
    table.add_row(vec![
        Cell::new("Overdue Amount"),
        Cell::new(format_currency(stats.overdue_amount)).fg(status_color(InvoiceStatus::Overdue)),
    ]);
    table.add_row(vec![Cell::new("Average Invoice"), Cell::new(format_currency(stats.average_invoice))]);
    table.add_row(vec![Cell::new("Invoices"), Cell::new(stats.invoice_count)]);
    table.add_row(vec![Cell::new("Clients"), Cell::new(stats.client_count)]);
    table.add_row(vec![Cell::new("Products"), Cell::new(stats.product_count)]);

    println!("\n--- Dashboard ---");
    println!("{table}");

    println!("\n--- Recent Invoices ---");
    print_invoice_table(store, &recent_invoices(store.invoices(), RECENT_LIMIT));

    println!("\n--- Upcoming Payments ---");
    print_invoice_table(store, &upcoming_invoices(store.invoices(), RECENT_LIMIT));
}

// ==========================================
// 2. Invoices
// ==========================================

fn run_invoice_command(store: &mut AppStore, root: &Path, cmd: InvoiceCommand) -> CliResult<()> {
    match cmd {
        InvoiceCommand::List { status } => {
            let invoices: Vec<&Invoice> = store
                .invoices()
                .iter()
                .filter(|i| status.is_none_or(|s| i.status == s))
                .collect();
            print_invoice_table(store, &invoices);
        }
        InvoiceCommand::Show { invoice } => {
            let id = select_invoice(store, invoice, "Select Invoice:")?;
            show_invoice(store, &id);
        }
        InvoiceCommand::New => {
            let today = Local::now().date_naive();
            let draft = invoice_wizard(store, InvoiceDraft::new(today))?;
            match store.add_invoice(draft) {
                Ok(id) => {
                    println!("✅ Invoice created.");
                    show_invoice(store, &id);
                }
                Err(e) => report_failure(e)?,
            }
        }
        InvoiceCommand::Edit { invoice } => {
            let id = select_invoice(store, invoice, "Select Invoice to Edit:")?;
            let Some(current) = store.invoice(&id) else { return Ok(()) };
            let draft = invoice_wizard(store, InvoiceDraft::from_invoice(current))?;
            match store.update_invoice(&id, InvoicePatch::from(draft)) {
                Ok(()) => {
                    println!("✅ Invoice updated.");
                    show_invoice(store, &id);
                }
                Err(e) => report_failure(e)?,
            }
        }
        InvoiceCommand::Status { invoice, status } => {
            let id = select_invoice(store, invoice, "Select Invoice:")?;
            let next = match status {
                Some(s) => s,
                None => match prompt_status_change(store, &id)? {
                    Some(s) => s,
                    None => return Ok(()),
                },
            };
            store.set_invoice_status(&id, next)?;
            println!("✅ Status set to {}.", next.label());
        }
        InvoiceCommand::Delete { invoice } => {
            let id = select_invoice(store, invoice, "Select Invoice to Delete:")?;
            let number = store.invoice(&id).map(|i| i.invoice_number.clone()).unwrap_or_default();
            let confirmed = Confirm::new(&format!("Delete invoice {number}? This cannot be undone."))
                .with_default(false)
                .prompt()?;
            if confirmed {
                store.delete_invoice(&id)?;
                println!("🗑️  Invoice {number} deleted.");
            }
        }
        InvoiceCommand::Export { invoice } => {
            let id = select_invoice(store, invoice, "Select Invoice to Export:")?;
            let Some(invoice) = store.invoice(&id) else { return Ok(()) };
            println!("\n🔨 Compiling PDF...");
            if let Some(path) = Exporter::new(root).export_or_log(invoice, store) {
                println!("✅ PDF Generated: {}", path.display());
                open_and_reveal(&path);
            }
        }
        InvoiceCommand::Email { invoice } => {
            let id = select_invoice(store, invoice, "Select Invoice to Send:")?;
            let Some(invoice) = store.invoice(&id) else { return Ok(()) };
            match store.client(&invoice.client_id) {
                Some(client) => {
                    let draft = compose_reminder(invoice, client);
                    println!("📧 Opening mail client for {}...", draft.to);
                    open_with_host(OsStr::new(&draft.mailto_url()));
                }
                None => println!("❌ Client not found."),
            }
        }
    }
    Ok(())
}

fn select_invoice(store: &AppStore, key: Option<String>, prompt: &str) -> CliResult<String> {
    if let Some(key) = key {
        return store
            .find_invoice(&key)
            .map(|i| i.id.clone())
            .ok_or_else(|| invoice_desk::Error::not_found("invoice", key).into());
    }

    let mut invoices: Vec<&Invoice> = store.invoices().iter().collect();
    if invoices.is_empty() {
        return Err(invoice_desk::Error::not_found("invoice", "(none yet)").into());
    }
    invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let options: Vec<String> = invoices
        .iter()
        .map(|i| {
            format!(
                "{} | {} | {} | {}",
                i.invoice_number,
                store.client_name(&i.client_id),
                format_currency(i.total),
                i.status.label()
            )
        })
        .collect();
    let choice = Select::new(prompt, options).with_page_size(10).raw_prompt()?;
    Ok(invoices[choice.index].id.clone())
}

fn prompt_status_change(store: &AppStore, id: &str) -> CliResult<Option<InvoiceStatus>> {
    let Some(current) = store.invoice(id).map(|i| i.status) else {
        return Ok(None);
    };
    let offered = current.available_transitions();
    if offered.is_empty() {
        println!("Invoice is {}; no further status changes offered.", current.label());
        return Ok(None);
    }
    let options: Vec<&str> = offered.iter().map(|s| s.action()).collect();
    let choice = Select::new(&format!("Current status: {}", current.label()), options).raw_prompt()?;
    Ok(Some(offered[choice.index]))
}

/// Walks through the invoice form, starting from `draft`.
fn invoice_wizard(store: &AppStore, mut draft: InvoiceDraft) -> CliResult<InvoiceDraft> {
    println!("\n--- Invoice {} ---", draft.invoice_number);

    // Client
    let clients = store.clients();
    if clients.is_empty() {
        println!("⚠️  No clients yet. Add one with `invoice-desk client add`.");
    } else {
        let options: Vec<String> = clients.iter().map(client_option).collect();
        let start = clients.iter().position(|c| c.id == draft.client_id).unwrap_or(0);
        let choice = Select::new("Client:", options)
            .with_starting_cursor(start)
            .raw_prompt()?;
        draft.client_id = clients[choice.index].id.clone();
    }

    // Dates
    draft.issue_date = DateSelect::new("Issue Date:")
        .with_default(draft.issue_date)
        .prompt()?;
    draft.due_date = DateSelect::new("Due Date:")
        .with_default(draft.due_date)
        .prompt()?;

    // Items
    edit_items(store, &mut draft.items)?;

    // Tax & discount
    let tax_default = draft.tax.to_string();
    draft.tax = parse_number(&Text::new("Tax Rate %:").with_default(&tax_default).prompt()?);
    let discount_default = draft.discount.to_string();
    draft.discount = parse_number(&Text::new("Discount %:").with_default(&discount_default).prompt()?);

    let totals = store.recalculate_invoice(&draft.items, draft.tax, draft.discount);
    println!(
        "Subtotal {} | Tax {} | Discount {} | Total {}",
        format_currency(totals.subtotal),
        format_currency(totals.tax_amount),
        format_currency(totals.discount_amount),
        format_currency(totals.total)
    );

    // Notes
    let notes_default = draft.notes.clone().unwrap_or_default();
    let notes = Text::new("Notes (Optional):").with_default(&notes_default).prompt()?;
    draft.notes = optional(notes);

    let save_options = vec!["Save & Send (pending)", "Save as Draft"];
    let choice = Select::new("Save:", save_options).raw_prompt()?;
    draft.status = if choice.index == 0 { InvoiceStatus::Pending } else { InvoiceStatus::Draft };
    Ok(draft)
}

fn edit_items(store: &AppStore, items: &mut Vec<InvoiceItem>) -> CliResult<()> {
    println!("\n--- Invoice Items ---");
    loop {
        print_items(store, items);

        let mut options = vec![DONE_OPT.to_string(), ADD_ITEM_OPT.to_string()];
        options.extend(items.iter().enumerate().map(|(n, item)| {
            format!("Edit #{} {}", n + 1, store.product_name(&item.product_id))
        }));
        let choice = Select::new("Items:", options).raw_prompt()?;

        match choice.index {
            0 => break,
            1 => {
                let item = pick_product_item(store)?;
                items.push(item);
                let last = items.len() - 1;
                edit_item(&mut items[last])?;
            }
            n => {
                let idx = n - 2;
                let remove = Confirm::new("Remove this item?").with_default(false).prompt()?;
                if remove {
                    items.remove(idx);
                } else {
                    edit_item(&mut items[idx])?;
                }
            }
        }
    }
    Ok(())
}

fn pick_product_item(store: &AppStore) -> CliResult<InvoiceItem> {
    let products = store.products();
    let mut options = vec![CUSTOM_ITEM_OPT.to_string()];
    options.extend(
        products
            .iter()
            .map(|p| format!("{} | {}", p.name, format_currency(p.price))),
    );
    let choice = Select::new("Product:", options).raw_prompt()?;
    let product = choice.index.checked_sub(1).map(|i| &products[i]);
    Ok(new_invoice_item(product))
}

fn edit_item(item: &mut InvoiceItem) -> CliResult<()> {
    let description = Text::new("Description:").with_default(&item.description).prompt()?;
    item.description = description;
    let quantity_default = item.quantity.to_string();
    item.set_quantity(parse_number(&Text::new("Quantity:").with_default(&quantity_default).prompt()?));
    let price_default = item.price.to_string();
    item.set_price(parse_number(&Text::new("Unit Price ($):").with_default(&price_default).prompt()?));
    println!(
        "   {} x {} = {}",
        item.quantity,
        format_currency(item.price),
        format_currency(item.total)
    );
    Ok(())
}

fn show_invoice(store: &AppStore, id: &str) {
    let Some(invoice) = store.invoice(id) else {
        println!("❌ Invoice not found.");
        return;
    };
    let company = store.company();

    println!("\n=== {} ===", company.name);
    println!("{}\n{}\n{}", company.address, company.phone, company.email);

    let mut meta = Table::new();
    meta.add_row(vec![Cell::new("Invoice Number"), Cell::new(&invoice.invoice_number)]);
    meta.add_row(vec![
        Cell::new("Status"),
        Cell::new(invoice.status.label())
            .fg(status_color(invoice.status))
            .add_attribute(Attribute::Bold),
    ]);
    meta.add_row(vec![Cell::new("Issue Date"), Cell::new(format_date(invoice.issue_date))]);
    meta.add_row(vec![Cell::new("Due Date"), Cell::new(format_date(invoice.due_date))]);
    println!("{meta}");

    println!("\nBill To:");
    match store.client(&invoice.client_id) {
        Some(client) => {
            println!("  {}", client.name);
            if let Some(company) = &client.company {
                println!("  {company}");
            }
            println!("  {}\n  {}", client.address, client.email);
        }
        None => println!("  {}", store.client_name(&invoice.client_id)),
    }

    println!();
    print_items(store, &invoice.items);

    let mut totals = Table::new();
    totals.add_row(vec![Cell::new("Subtotal"), money_cell(invoice.subtotal)]);
    totals.add_row(vec![Cell::new(format!("Tax ({}%)", invoice.tax)), money_cell(invoice.tax_amount)]);
    totals.add_row(vec![
        Cell::new(format!("Discount ({}%)", invoice.discount)),
        money_cell(invoice.discount_amount),
    ]);
    totals.add_row(vec![
        Cell::new("Total Due").add_attribute(Attribute::Bold),
        money_cell(invoice.total).add_attribute(Attribute::Bold),
    ]);
    println!("{totals}");

    if let Some(notes) = &invoice.notes {
        println!("\nNotes:\n{notes}");
    }

    let actions: Vec<String> = invoice
        .status
        .available_transitions()
        .iter()
        .map(|s| format!("{} (invoice status {} {})", s.action(), invoice.invoice_number, s))
        .collect();
    if !actions.is_empty() {
        println!("\nNext: {}", actions.join(", "));
    }
}

fn print_items(store: &AppStore, items: &[InvoiceItem]) {
    if items.is_empty() {
        println!("(No items)");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Item", "Description", "Qty", "Price", "Total"]);
    for item in items {
        table.add_row(vec![
            Cell::new(store.product_name(&item.product_id)),
            Cell::new(&item.description),
            Cell::new(item.quantity).set_alignment(CellAlignment::Center),
            money_cell(item.price),
            money_cell(item.total),
        ]);
    }
    println!("{table}");
}

fn print_invoice_table(store: &AppStore, invoices: &[&Invoice]) {
    if invoices.is_empty() {
        println!("(None found)");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Invoice", "Client", "Issued", "Due", "Total", "Status"]);
    for invoice in invoices {
        table.add_row(vec![
            Cell::new(&invoice.invoice_number),
            Cell::new(store.client_name(&invoice.client_id)),
            Cell::new(format_date(invoice.issue_date)),
            Cell::new(format_date(invoice.due_date)),
            money_cell(invoice.total),
            Cell::new(invoice.status.label()).fg(status_color(invoice.status)),
        ]);
    }
    println!("{table}");
}

// ==========================================
// 3. Products
// ==========================================

fn run_product_command(store: &mut AppStore, cmd: EntityCommand) -> CliResult<()> {
    match cmd {
        EntityCommand::List => {
            let mut table = Table::new();
            table.set_header(vec!["Name", "Description", "Unit", "Price"]);
            for p in store.products() {
                table.add_row(vec![
                    Cell::new(&p.name),
                    Cell::new(p.description.as_deref().unwrap_or("")),
                    Cell::new(p.unit.as_deref().unwrap_or("")),
                    money_cell(p.price),
                ]);
            }
            println!("{table}");
        }
        EntityCommand::Add => {
            let mut draft = ProductDraft::default();
            loop {
                draft = product_form(draft)?;
                match store.add_product(draft.clone()) {
                    Ok(id) => {
                        println!("✅ Product created: {id}");
                        break;
                    }
                    Err(e) => report_failure(e)?,
                }
            }
        }
        EntityCommand::Edit { id } => {
            let id = select_product(store, id, "Select Product to Edit:")?;
            let Some(current) = store.product(&id) else { return Ok(()) };
            let mut draft = ProductDraft {
                name: current.name.clone(),
                price: current.price,
                description: current.description.clone(),
                unit: current.unit.clone(),
            };
            loop {
                draft = product_form(draft)?;
                match store.update_product(&id, ProductPatch::from(draft.clone())) {
                    Ok(()) => {
                        println!("✅ Product updated.");
                        break;
                    }
                    Err(e) => report_failure(e)?,
                }
            }
        }
        EntityCommand::Delete { id } => {
            let id = select_product(store, id, "Select Product to Delete:")?;
            let name = store.product_name(&id).to_string();
            if Confirm::new(&format!("Delete product {name}?")).with_default(false).prompt()? {
                store.delete_product(&id)?;
                println!("🗑️  Product {name} deleted.");
            }
        }
    }
    Ok(())
}

fn product_form(draft: ProductDraft) -> CliResult<ProductDraft> {
    println!("\n--- Product ---");
    let name = Text::new("Product Name:").with_default(&draft.name).prompt()?;
    let price_default = draft.price.to_string();
    let price = parse_number(&Text::new("Price ($):").with_default(&price_default).prompt()?);
    let description_default = draft.description.unwrap_or_default();
    let description = Text::new("Description (Optional):").with_default(&description_default).prompt()?;
    let unit_default = draft.unit.unwrap_or_default();
    let unit = Text::new("Unit (hour, item, project...):").with_default(&unit_default).prompt()?;

    Ok(ProductDraft {
        name,
        price,
        description: optional(description),
        unit: optional(unit),
    })
}

fn select_product(store: &AppStore, id: Option<String>, prompt: &str) -> CliResult<String> {
    if let Some(id) = id {
        return Ok(id);
    }
    let products = store.products();
    if products.is_empty() {
        return Err(invoice_desk::Error::not_found("product", "(none yet)").into());
    }
    let options: Vec<String> = products
        .iter()
        .map(|p| format!("{} | {}", p.name, format_currency(p.price)))
        .collect();
    let choice = Select::new(prompt, options).with_page_size(10).raw_prompt()?;
    Ok(products[choice.index].id.clone())
}

// ==========================================
// 4. Clients
// ==========================================

fn run_client_command(store: &mut AppStore, cmd: EntityCommand) -> CliResult<()> {
    match cmd {
        EntityCommand::List => {
            let mut table = Table::new();
            table.set_header(vec!["Name", "Company", "Email", "Phone", "Address"]);
            for c in store.clients() {
                table.add_row(vec![
                    Cell::new(&c.name),
                    Cell::new(c.company.as_deref().unwrap_or("")),
                    Cell::new(&c.email),
                    Cell::new(c.phone.as_deref().unwrap_or("")),
                    Cell::new(&c.address),
                ]);
            }
            println!("{table}");
        }
        EntityCommand::Add => {
            let mut draft = ClientDraft::default();
            loop {
                draft = client_form(draft)?;
                match store.add_client(draft.clone()) {
                    Ok(id) => {
                        println!("✅ Client created successfully: {id}");
                        break;
                    }
                    Err(e) => report_failure(e)?,
                }
            }
        }
        EntityCommand::Edit { id } => {
            let id = select_client(store, id, "Select Client to Edit:")?;
            let Some(current) = store.client(&id) else { return Ok(()) };
            let mut draft = ClientDraft {
                name: current.name.clone(),
                email: current.email.clone(),
                address: current.address.clone(),
                phone: current.phone.clone(),
                company: current.company.clone(),
            };
            loop {
                draft = client_form(draft)?;
                match store.update_client(&id, ClientPatch::from(draft.clone())) {
                    Ok(()) => {
                        println!("✅ Client updated.");
                        break;
                    }
                    Err(e) => report_failure(e)?,
                }
            }
        }
        EntityCommand::Delete { id } => {
            let id = select_client(store, id, "Select Client to Delete:")?;
            let name = store.client_name(&id).to_string();
            let referenced = store.invoices().iter().filter(|i| i.client_id == id).count();
            if referenced > 0 {
                println!("⚠️  {referenced} invoice(s) will show this client as \"Unknown Client\".");
            }
            if Confirm::new(&format!("Delete client {name}?")).with_default(false).prompt()? {
                store.delete_client(&id)?;
                println!("🗑️  Client {name} deleted.");
            }
        }
    }
    Ok(())
}

fn client_form(draft: ClientDraft) -> CliResult<ClientDraft> {
    println!("\n--- Client ---");
    let name = Text::new("Client Name:").with_default(&draft.name).prompt()?;
    let company_default = draft.company.unwrap_or_default();
    let company = Text::new("Company Name (Optional):").with_default(&company_default).prompt()?;
    let email = Text::new("Email:").with_default(&draft.email).prompt()?;
    let phone_default = draft.phone.unwrap_or_default();
    let phone = Text::new("Phone (Optional):").with_default(&phone_default).prompt()?;
    let address = Text::new("Address:").with_default(&draft.address).prompt()?;

    Ok(ClientDraft {
        name,
        email,
        address,
        phone: optional(phone),
        company: optional(company),
    })
}

fn select_client(store: &AppStore, id: Option<String>, prompt: &str) -> CliResult<String> {
    if let Some(id) = id {
        return Ok(id);
    }
    let clients = store.clients();
    if clients.is_empty() {
        return Err(invoice_desk::Error::not_found("client", "(none yet)").into());
    }
    let options: Vec<String> = clients.iter().map(client_option).collect();
    let choice = Select::new(prompt, options).with_page_size(10).raw_prompt()?;
    Ok(clients[choice.index].id.clone())
}

fn client_option(client: &invoice_desk::Client) -> String {
    match &client.company {
        Some(company) => format!("{} ({company}) | {}", client.name, client.email),
        None => format!("{} | {}", client.name, client.email),
    }
}

// ==========================================
// 5. Company Settings
// ==========================================

fn show_company(company: &CompanyInfo) {
    let mut table = Table::new();
    table.add_row(vec!["Company Name", company.name.as_str()]);
    table.add_row(vec!["Address", company.address.as_str()]);
    table.add_row(vec!["Phone", company.phone.as_str()]);
    table.add_row(vec!["Email", company.email.as_str()]);
    table.add_row(vec!["Website", company.website.as_deref().unwrap_or("")]);
    println!("\n--- Company Information ---");
    println!("{table}");
}

fn edit_company(store: &mut AppStore) -> CliResult<()> {
    let current = store.company().clone();
    println!("\n--- Company Information ---");
    let name = Text::new("Company Name:").with_default(&current.name).prompt()?;
    let address = Text::new("Address:").with_default(&current.address).prompt()?;
    let phone = Text::new("Phone:").with_default(&current.phone).prompt()?;
    let email = Text::new("Email:").with_default(&current.email).prompt()?;
    let website_default = current.website.clone().unwrap_or_default();
    let website = Text::new("Website (Optional):").with_default(&website_default).prompt()?;

    store.save_company(CompanyInfo {
        name,
        address,
        phone,
        email,
        website: optional(website),
        logo: current.logo,
    })?;
    println!("✅ Settings saved.");
    Ok(())
}

// ==========================================
// 6. Config & Utilities
// ==========================================

fn setup_config_wizard(config_path: &Path) -> CliResult<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = config::load_settings(config_path).ok().flatten().unwrap_or_default();

    println!("📂 Opening folder picker...");
    let picked_path = rfd::FileDialog::new()
        .set_title("Select Invoice Data Directory")
        .pick_folder();

    let data_root = match picked_path {
        Some(path) => path.to_string_lossy().to_string(),
        None => {
            println!("❌ No folder selected. Falling back to manual input.");
            Text::new("Enter Data Directory:")
                .with_default(&current.data_root)
                .prompt()?
        }
    };

    let settings = AppSettings { data_root };
    config::save_settings(config_path, &settings)?;
    println!("✅ Settings saved.");
    Ok(settings)
}

/// Prints field errors for validation failures; anything else propagates.
fn report_failure(err: invoice_desk::Error) -> CliResult<()> {
    match err.validation_errors() {
        Some(errors) => {
            print_validation(errors);
            Ok(())
        }
        None => Err(err.into()),
    }
}

fn print_validation(errors: &ValidationErrors) {
    println!("❌ Please fix the following:");
    for (field, message) in errors.iter() {
        println!("   • {field}: {message}");
    }
}

fn status_color(status: InvoiceStatus) -> Color {
    let (r, g, b) = status.color();
    Color::Rgb { r, g, b }
}

fn money_cell(amount: f64) -> Cell {
    Cell::new(format_currency(amount)).set_alignment(CellAlignment::Right)
}

fn parse_number(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

fn optional(input: String) -> Option<String> {
    if input.trim().is_empty() { None } else { Some(input.trim().to_string()) }
}

// Helper: open a file, folder or URL with the platform handler
fn open_with_host(target: &OsStr) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg(target).spawn().ok();

    #[cfg(target_os = "windows")]
    Command::new("explorer").arg(target).spawn().ok();

    #[cfg(target_os = "linux")]
    Command::new("xdg-open").arg(target).spawn().ok();
}

// Helper: Open file and reveal in Finder/Explorer
fn open_and_reveal(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg("-R").arg(path).spawn().ok();

    #[cfg(target_os = "windows")]
    Command::new("explorer")
        .arg(format!("/select,{}", path.to_string_lossy()))
        .spawn()
        .ok();

    open_with_host(path.as_os_str());
}
