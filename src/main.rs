//! Catalog Intake — Entry Point
//!
//! A command-line renderer over the storefront core. Each invocation is
//! one render cycle: load the session, apply one user action, print the
//! resulting view.
//!
//! Wiring sequence:
//! 1. Parse CLI args, load config.toml (defaults if absent) + validate
//! 2. Init tracing (JSON structured logging on stderr)
//! 3. Open the JSON file store and flat storage in `storage.data_dir`
//! 4. Build repositories, admin gate, order intake, storefront
//! 5. Load (migrate → seed → repair → read), consuming `--product-id`
//! 6. Dispatch the subcommand and print the view

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use url::Url;

use catalog_intake::adapters::media::data_url_from_file;
use catalog_intake::adapters::persistence::{
    JsonFileStore, JsonFlatStorage, MemoryFlatStorage, MemoryStore,
};
use catalog_intake::config::{self, AppConfig};
use catalog_intake::domain::{IntakeError, MessageTemplate, OrderDraft, ProductDraft};
use catalog_intake::ports::flat_storage::FlatStorage;
use catalog_intake::ports::messaging::LinkLauncher;
use catalog_intake::ports::prompt::Confirm;
use catalog_intake::ports::store::PersistentStore;
use catalog_intake::usecases::admin::AdminSession;
use catalog_intake::usecases::catalog::CatalogRepository;
use catalog_intake::usecases::intake::OrderIntake;
use catalog_intake::usecases::migration::LegacyMigrator;
use catalog_intake::usecases::orders::OrderRepository;
use catalog_intake::usecases::storefront::{Storefront, StorefrontError, StorefrontView};

#[derive(Debug, Parser)]
#[command(name = "catalog-intake", version, about = "Product catalog and order intake")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Pre-select a product, as the `productId` link parameter does.
    #[arg(long)]
    product_id: Option<String>,

    /// Keep everything in memory for this run only.
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List products, optionally filtered by exact category.
    Products {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Show one product with its quick inquiry link.
    Show { id: String },
    /// Add a product (admin).
    Add(NewProductArgs),
    /// Edit a product in place (admin). Omitted fields keep their value.
    Edit(EditProductArgs),
    /// Delete a product (admin).
    Delete { id: String },
    /// Delete every product (admin). The default catalog is restored.
    Clear,
    /// Place an order and open the messaging link.
    Order(OrderArgs),
    /// Show order history, newest first (admin).
    Orders,
    /// Delete an order from the history (admin).
    DeleteOrder { id: String },
    /// Enter admin mode.
    Login { password: String },
    /// Leave admin mode.
    Logout,
}

#[derive(Debug, Args)]
struct NewProductArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Image file, stored inline as a data URL.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct EditProductArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// New image file. Without it the current image is kept.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Product to order. Defaults to `--product-id`.
    #[arg(long)]
    product: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long, default_value = "1")]
    quantity: String,
    #[arg(long, default_value = "")]
    notes: String,
}

/// Reads y/n answers from stdin, or always says yes with `--yes`.
struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{question} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "نعم")
    }
}

/// Prints the deep link for the user to open.
struct PrintLauncher;

impl LinkLauncher for PrintLauncher {
    fn launch(&self, link: &Url) -> Result<()> {
        println!("{link}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_or_default(&cli.config)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.storage.data_dir,
        ephemeral = cli.ephemeral,
        "Starting catalog intake"
    );

    // ── 3-5. Wire the storefront and load ───────────────────
    let mut shop = build_storefront(&config, cli.ephemeral)?
        .with_startup_product(cli.product_id.clone());

    if let Err(e) = shop.load().await {
        eprintln!("{}", user_message(&e));
        return Err(e).context("Failed to load storefront");
    }

    // ── 6. Dispatch ─────────────────────────────────────────
    let confirm = StdinConfirm {
        assume_yes: cli.yes,
    };
    if let Err(e) = run(&mut shop, cli.command, &confirm).await {
        if let Some(action) = e.downcast_ref::<StorefrontError>() {
            eprintln!("{}", user_message(action));
        }
        return Err(e);
    }
    Ok(())
}

fn build_storefront(config: &AppConfig, ephemeral: bool) -> Result<Storefront> {
    let store: Arc<dyn PersistentStore>;
    let flat: Arc<dyn FlatStorage>;
    if ephemeral {
        store = Arc::new(MemoryStore::new());
        flat = Arc::new(MemoryFlatStorage::new());
    } else {
        let data_dir = Path::new(&config.storage.data_dir);
        store = Arc::new(JsonFileStore::new(data_dir, config.storage.schema_version));
        flat = Arc::new(JsonFlatStorage::new(
            data_dir.join(&config.storage.flat_storage_file),
        ));
    }

    let migrator = Arc::new(LegacyMigrator::new(Arc::clone(&store), Arc::clone(&flat)));
    let catalog = CatalogRepository::new(Arc::clone(&store), Arc::clone(&migrator))
        .with_required_product(config.catalog.ensure_required_product);
    let orders = Arc::new(OrderRepository::new(store, migrator));

    let template = MessageTemplate::new(
        &config.messaging.base_url,
        &config.messaging.phone,
        config.messaging.signature.clone(),
    )
    .context("Invalid messaging configuration")?;
    let intake = OrderIntake::new(Arc::clone(&orders), template, Arc::new(PrintLauncher));
    let admin = AdminSession::new(flat, config.admin.password.clone());

    Ok(Storefront::new(catalog, orders, intake, admin))
}

async fn run(shop: &mut Storefront, command: Command, confirm: &StdinConfirm) -> Result<()> {
    match command {
        Command::Products { category } => {
            shop.set_filter(category.as_str());
            print_products(&shop.snapshot());
        }
        Command::Show { id } => {
            let Some(product) = shop.select_product(&id).cloned() else {
                println!("المنتج المطلوب غير موجود أو تم حذفه.");
                return Ok(());
            };
            println!("{} ({})", product.title, product.category);
            if !product.description_or_empty().is_empty() {
                println!("{}", product.description_or_empty());
            }
            println!("{}", shop.intake().template().inquiry_link(&product));
        }
        Command::Add(args) => {
            let draft = ProductDraft {
                title: args.title,
                category: args.category,
                description: args.description,
                image_data_url: load_image(args.image.as_deref()).await?,
            };
            let product = shop.submit_product(draft).await?;
            println!("{}", product.id);
        }
        Command::Edit(args) => {
            let current = shop
                .products()
                .iter()
                .find(|p| p.id == args.id)
                .cloned()
                .ok_or_else(|| StorefrontError::UnknownProduct(args.id.clone()))?;
            shop.begin_edit(&args.id)?;
            let draft = ProductDraft {
                title: args.title.unwrap_or(current.title),
                category: args.category.unwrap_or(current.category),
                description: args
                    .description
                    .unwrap_or_else(|| current.description.unwrap_or_default()),
                image_data_url: load_image(args.image.as_deref()).await?,
            };
            let product = shop.submit_product(draft).await?;
            println!("{}", product.id);
        }
        Command::Delete { id } => {
            shop.delete_product(&id, confirm).await?;
        }
        Command::Clear => {
            shop.clear_products(confirm).await?;
        }
        Command::Order(args) => {
            if let Some(id) = &args.product {
                shop.select_product(id);
            }
            let draft = OrderDraft {
                name: args.name,
                phone: args.phone,
                address: args.address,
                quantity: args.quantity,
                notes: args.notes,
            };
            let receipt = shop.submit_order(draft).await?;
            if !receipt.persisted {
                eprintln!("تعذر حفظ الطلب محلياً، تم إرساله عبر واتساب.");
            }
        }
        Command::Orders => {
            let view = shop.snapshot();
            if !view.is_admin {
                return Err(StorefrontError::AdminRequired.into());
            }
            print_orders(&view);
        }
        Command::DeleteOrder { id } => {
            shop.delete_order(&id, confirm).await?;
        }
        Command::Login { password } => {
            if !shop.login(&password).await? {
                eprintln!("كلمة السر غير صحيحة");
                anyhow::bail!("admin login rejected");
            }
            println!("وضع الأدمن مفعل");
        }
        Command::Logout => {
            shop.logout(confirm)?;
        }
    }
    Ok(())
}

async fn load_image(path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(path) => Ok(Some(data_url_from_file(path).await?)),
        None => Ok(None),
    }
}

fn print_products(view: &StorefrontView) {
    if view.is_empty() {
        println!("لا توجد منتجات حالياً.");
        return;
    }
    for product in &view.products {
        let marker = if product.has_image() { "🖼" } else { " " };
        println!(
            "{marker} [{}] {} — {}",
            product.id, product.title, product.category
        );
    }
}

fn print_orders(view: &StorefrontView) {
    if view.orders.is_empty() {
        println!("لا توجد طلبات.");
        return;
    }
    for order in &view.orders {
        println!(
            "[{}] {}  {}  {}  {}  x{}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.name,
            order.phone,
            order.display_title(),
            order.display_quantity()
        );
    }
}

/// Localized message shown for a failed action.
fn user_message(error: &StorefrontError) -> &'static str {
    match error {
        StorefrontError::Store(_) | StorefrontError::FlatStorage(_) => {
            "حدث خطأ في الوصول إلى البيانات."
        }
        StorefrontError::Intake(IntakeError::NoProductSelected) => "يرجى اختيار منتج.",
        StorefrontError::Intake(IntakeError::MissingField(_))
        | StorefrontError::ProductForm(_) => "يرجى ملء جميع الحقول المطلوبة.",
        StorefrontError::AdminRequired => "هذا الإجراء متاح لوضع الأدمن فقط.",
        StorefrontError::UnknownProduct(_) => "المنتج المطلوب غير موجود أو تم حذفه.",
    }
}
