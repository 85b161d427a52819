use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

use mmcartbox::dataset::Dataset;
use mmcartbox::oracle::OracleClient;
use mmcartbox::render;
use mmcartbox::suggest::resolve_with_oracle;

#[derive(Parser, Debug)]
#[command(name = "mmcartbox")]
#[command(about = "Suggest and render charts from CSV data using a natural-language prompt", long_about = None)]
struct Args {
    /// Natural-language prompt (e.g. "compare sales by region")
    prompt: String,

    /// Read CSV from this file instead of stdin
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Use the bundled sample dataset
    #[arg(long)]
    sample: bool,

    /// Ask the configured oracle first, falling back locally on any failure
    #[arg(long)]
    remote: bool,

    /// Render the suggestion to this PNG file
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let data = if args.sample {
        Dataset::sample()?
    } else if let Some(path) = &args.csv {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        Dataset::from_csv_str(&text, &name).context("Failed to parse CSV")?
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read CSV from stdin")?;
        Dataset::from_csv_str(&text, "stdin").context("Failed to parse CSV")?
    };

    let oracle = if args.remote {
        OracleClient::from_env()
    } else {
        None
    };
    let suggestion = resolve_with_oracle(oracle.as_ref(), &args.prompt, &data).await;

    println!("{}", serde_json::to_string_pretty(&suggestion.spec)?);

    if let Some(out) = &args.out {
        let png = render::render_chart(&suggestion.spec, &data, args.width, args.height)
            .context("Failed to render chart")?;
        std::fs::write(out, png)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        eprintln!("Wrote {}", out.display());
    }

    Ok(())
}
