mod crawl;
mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "st11")]
#[command(about = "11st category page crawler: scrape, download thumbnails, export to xlsx")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl one category listing page end to end.
    Crawl {
        /// Category listing URL, e.g.
        /// https://www.11st.co.kr/page/martplus/category?dispCtgr2No=1361105
        #[arg(long)]
        url: String,

        /// Write the result set to this .xlsx file after the crawl.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Directory for downloaded thumbnails (default: thumbnails/).
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Run the browser without a visible window.
        #[arg(long)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl {
            url,
            export,
            images_dir,
            headless,
        } => crawl::run(url, export, images_dir, headless).await,
    }
}
