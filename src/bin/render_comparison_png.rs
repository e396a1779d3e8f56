#[cfg(feature = "cairo-backend")]
use std::fs;
#[cfg(feature = "cairo-backend")]
use std::path::PathBuf;

#[cfg(feature = "cairo-backend")]
use card_compare::core::FilterState;

#[cfg(feature = "cairo-backend")]
const DEFAULT_OUTPUT_DIR: &str = ".";

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    input_path: PathBuf,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    user: String,
    seed: Option<u64>,
    filter: FilterState,
}

#[cfg(feature = "cairo-backend")]
fn main() {
    let _ = card_compare::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    use card_compare::api::{ComparisonSession, StaticComparisonSource};
    use card_compare::export::{DirectorySink, ExportConfig};
    use card_compare::render::CairoRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let args = parse_args()?;

    let raw = fs::read_to_string(&args.input_path).map_err(|err| {
        format!(
            "failed to read records `{}`: {err}",
            args.input_path.display()
        )
    })?;
    let source = StaticComparisonSource::from_json_str(&raw).map_err(|err| err.to_string())?;

    let config = match &args.config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
            ExportConfig::from_json_str(&text).map_err(|err| err.to_string())?
        }
        None => ExportConfig::default(),
    };

    let mut session = ComparisonSession::new(source)
        .with_export_config(config)
        .map_err(|err| err.to_string())?;
    session.set_filter(args.filter);
    let summary = session.load().map_err(|err| err.to_string())?;
    println!(
        "loaded {} card(s), skipped {} malformed record(s)",
        summary.accepted, summary.rejected
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut renderer = CairoRenderer::new();
    let mut sink = DirectorySink::new(&args.output_dir);
    let filename = session
        .export(
            &mut renderer,
            &mut sink,
            &args.user,
            chrono::Utc::now(),
            &mut rng,
        )
        .map_err(|err| format!("{} ({err})", err.user_message()))?;

    println!("wrote {}", args.output_dir.join(filename).display());
    Ok(())
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut input_path: Option<PathBuf> = None;
    let mut output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut config_path: Option<PathBuf> = None;
    let mut user = String::new();
    let mut seed: Option<u64> = None;
    let mut filter = FilterState::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match arg.as_str() {
            "--input" => input_path = Some(PathBuf::from(value("--input")?)),
            "--output-dir" => output_dir = PathBuf::from(value("--output-dir")?),
            "--config" => config_path = Some(PathBuf::from(value("--config")?)),
            "--user" => user = value("--user")?,
            "--search" => filter.search = value("--search")?,
            "--bank" => filter.bank = Some(value("--bank")?),
            "--category" => filter.category = Some(value("--category")?),
            "--tier" => filter.tier = Some(value("--tier")?),
            "--seed" => {
                let raw = value("--seed")?;
                seed = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --seed value `{raw}`"))?,
                );
            }
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let input_path =
        input_path.ok_or_else(|| format!("missing --input\n\n{}", usage_message()))?;
    Ok(CliArgs {
        input_path,
        output_dir,
        config_path,
        user,
        seed,
        filter,
    })
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend --bin render_comparison_png -- \
         --input <records.json> [options]

Options:
  --input <path>        JSON array of card comparison records
  --output-dir <path>   Directory for the PNG (default: {DEFAULT_OUTPUT_DIR})
  --config <path>       Export config JSON overrides
  --user <name>         Display name stamped on the export
  --search <text>       Filter by card or bank name
  --bank <name>         Filter by bank
  --category <key>      Filter by category or merchant key
  --tier <tier>         Filter by card tier
  --seed <u64>          Seed for caption selection
  -h, --help            Show this message"
    )
}
