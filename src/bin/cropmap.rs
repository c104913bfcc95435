use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cropmap::config::{DEFAULT_PORT, ServerConfig, default_boundary_candidates};
use cropmap::scale::{ColorScale, DEFAULT_BASE_COLOR};
use cropmap::view::DEFAULT_LEGEND_STEPS;
use cropmap::viz::util::format_hectares;
use cropmap::{geo, server, stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cropmap",
    version,
    about = "Color, chart & serve municipal harvested-area data for Brazil"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the dashboard HTTP server.
    Serve(ServeArgs),
    /// Print the color legend for one crop.
    Legend(LegendArgs),
    /// Render a crop's top-municipality chart (.svg or .png).
    Chart(ChartArgs),
    /// Print per-crop summary statistics.
    Stats(StatsArgs),
    /// Convert a crop table between JSON and CSV.
    Convert(ConvertArgs),
    /// Merge several GeoJSON boundary files into one FeatureCollection.
    CombineGeojson(CombineArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Crop data file (.json or .csv).
    #[arg(long, default_value = "data/crop_data_static.json")]
    data: PathBuf,
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Dashboard page served at `/`.
    #[arg(long, default_value = "templates/index.html")]
    index: PathBuf,
    /// Boundary GeoJSON; may be repeated. Defaults to the usual locations.
    #[arg(long)]
    boundary: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct LegendArgs {
    /// Crop data file (.json or .csv).
    #[arg(long)]
    data: PathBuf,
    #[arg(long)]
    crop: String,
    /// Base color as hex (e.g. #4CAF50).
    #[arg(long, default_value = DEFAULT_BASE_COLOR)]
    color: String,
    #[arg(long, default_value_t = DEFAULT_LEGEND_STEPS)]
    steps: usize,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[arg(long)]
    data: PathBuf,
    #[arg(long)]
    crop: String,
    /// Output path; the extension picks SVG or PNG.
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value = DEFAULT_BASE_COLOR)]
    color: String,
    /// Number of municipalities to rank.
    #[arg(long, default_value_t = stats::TOP_N)]
    top: usize,
    #[arg(long, default_value_t = viz::types::DEFAULT_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = viz::types::DEFAULT_HEIGHT)]
    height: u32,
    /// Chart caption; derived from the crop when omitted.
    #[arg(long)]
    title: Option<String>,
    /// Legend swatches; below 2 hides the legend.
    #[arg(long, default_value_t = DEFAULT_LEGEND_STEPS)]
    legend_steps: usize,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long)]
    data: PathBuf,
    /// Restrict to one crop.
    #[arg(long)]
    crop: Option<String>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Output format. If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct CombineArgs {
    /// Input GeoJSON files, merged in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    #[arg(long)]
    out: PathBuf,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format_hectares(x),
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Legend(args) => cmd_legend(args),
        Command::Chart(args) => cmd_chart(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Convert(args) => cmd_convert(args),
        Command::CombineGeojson(args) => cmd_combine(args),
    }
}

fn cmd_serve(args: ServeArgs) -> Result<()> {
    let boundary_candidates = if args.boundary.is_empty() {
        default_boundary_candidates()
    } else {
        args.boundary
    };
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        data_file: args.data,
        static_dir: args.static_dir,
        data_dir: args.data_dir,
        index_file: args.index,
        boundary_candidates,
    };
    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    rt.block_on(server::run(config))
}

fn cmd_legend(args: LegendArgs) -> Result<()> {
    let table = storage::load_table(&args.data)?;
    let data = table.get(&args.crop).cloned().unwrap_or_default();
    let scale = ColorScale::new(stats::crop_range(&data), &args.color);
    let (min, max) = scale.range.effective();
    println!("{}  min={} max={}", args.crop, fmt_opt(Some(min)), fmt_opt(Some(max)));
    for step in scale.legend(args.steps)? {
        println!("{}  {}", step.color, format_hectares(step.value));
    }
    Ok(())
}

fn cmd_chart(args: ChartArgs) -> Result<()> {
    let table = storage::load_table(&args.data)?;
    let chart = stats::top_municipalities(&table, &args.crop, args.top)?;
    let data = table.get(&args.crop).cloned().unwrap_or_default();
    let scale = ColorScale::new(stats::crop_range(&data), &args.color);
    let opts = viz::ChartOptions {
        width: args.width,
        height: args.height,
        title: args.title.unwrap_or_default(),
        legend_steps: args.legend_steps,
    };
    viz::plot_chart(&chart, &scale, &args.out, &opts)?;
    eprintln!("Wrote chart to {}", args.out.display());
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let table = storage::load_table(&args.data)?;
    let summaries = match args.crop.as_deref() {
        Some(crop) => {
            let data = table
                .get(crop)
                .ok_or_else(|| cropmap::models::DataError::UnknownCrop(crop.to_string()))?;
            vec![stats::crop_summary(crop, data)]
        }
        None => stats::crop_summaries(&table),
    };

    let overall = stats::statistics(&table);
    println!(
        "crops={} municipalities={} records={}",
        overall.total_crops, overall.total_municipalities, overall.total_records
    );
    for s in summaries {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={} total={}",
            s.crop,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            format_hectares(s.total)
        );
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let table = storage::load_table(&args.input)?;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => args.out.extension().and_then(|e| e.to_str()).unwrap_or("json"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&table, &args.out)?,
        "json" => storage::save_json(&table, &args.out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!(
        "Saved {} records to {}",
        table.total_records(),
        args.out.display()
    );
    Ok(())
}

fn cmd_combine(args: CombineArgs) -> Result<()> {
    let combined = geo::combine_files(&args.inputs);
    if combined.features.is_empty() {
        anyhow::bail!("no features could be read from the inputs");
    }
    geo::save_collection(&combined, &args.out)?;
    eprintln!(
        "Wrote {} features to {}",
        combined.features.len(),
        args.out.display()
    );
    Ok(())
}
