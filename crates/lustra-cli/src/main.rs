use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use lustra_core::load_app_config;
use lustra_engine::{CatalogSession, CatalogView};
use lustra_taxonomy::{load_taxonomy, resolve};

#[derive(Debug, Parser)]
#[command(name = "lustra")]
#[command(about = "Storefront catalog engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a path segment or free-text category to its canonical node.
    Resolve {
        input: String,
        /// Brand to prioritize during resolution.
        #[arg(long)]
        brand: Option<String>,
    },
    /// Decode an address, run one navigation, and print the resulting page.
    Browse { address: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { input, brand } => run_resolve(&input, brand.as_deref()),
        Commands::Browse { address } => run_browse(&address).await,
    }
}

fn catalog_path() -> PathBuf {
    std::env::var("LUSTRA_CATALOG_PATH")
        .unwrap_or_else(|_| "./config/catalog.yaml".to_owned())
        .into()
}

fn run_resolve(input: &str, brand: Option<&str>) -> anyhow::Result<()> {
    let taxonomy = load_taxonomy(&catalog_path())?;
    match resolve(&taxonomy, input, brand) {
        Some(hit) => {
            println!("brand:      {}", hit.brand);
            println!("label:      {}", hit.node.label);
            println!("search key: {}", hit.node.search_key);
            if hit.redirected {
                println!("(redirected from a parent category to its first child)");
            }
            if let Some(path) = taxonomy.path_for_category(&hit.node.search_key) {
                println!("path:       {path}");
            }
        }
        None => {
            println!("no taxonomy match — '{input}' would run as a free-text search");
        }
    }
    Ok(())
}

async fn run_browse(address: &str) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let taxonomy = Arc::new(load_taxonomy(&config.catalog_path)?);
    let session = CatalogSession::from_config(&config, taxonomy)?;

    let Some(view) = session.navigate_address(address).await else {
        // A single navigation cannot be superseded, but keep the branch honest.
        anyhow::bail!("navigation was superseded before completing");
    };
    print_view(&view);
    Ok(())
}

fn print_view(view: &CatalogView) {
    if let Some(notice) = view.notice {
        println!("notice: {notice}");
    }

    println!(
        "{:<10} {:<14} {:<42} {:<12} {:>10} {:>6}",
        "id", "article", "name", "brand", "price", "stock"
    );
    for product in &view.products {
        println!(
            "{:<10} {:<14} {:<42} {:<12} {:>10.2} {:>6}",
            product.id,
            product.article_code,
            product.name,
            product.brand,
            product.price,
            product.stock_count
        );
    }

    println!();
    println!(
        "page {}/{} — {} products total",
        view.query.page, view.total_pages, view.total_products
    );

    if !view.facets.colors.is_empty() {
        let colors: Vec<String> = view
            .facets
            .colors
            .iter()
            .map(|c| {
                if c.variants.is_empty() {
                    c.label.clone()
                } else {
                    format!("{} ({})", c.label, c.variants.join(", "))
                }
            })
            .collect();
        println!("colors:    {}", colors.join(", "));
    }
    if !view.facets.materials.is_empty() {
        println!("materials: {}", view.facets.materials.join(", "));
    }
    if !view.facets.socket_types.is_empty() {
        println!("sockets:   {}", view.facets.socket_types.join(", "));
    }
    if !view.facets.lamp_counts.is_empty() {
        let counts: Vec<String> = view.facets.lamp_counts.iter().map(u32::to_string).collect();
        println!("lamps:     {}", counts.join(", "));
    }

    println!("url: {}", view.url);
}
