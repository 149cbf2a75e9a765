use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use farmdown_core::api::{
    AiAnalysis, ApiClient, ApiError, CropRecommendationOptions, CropRecommendationRequest,
};
use farmdown_core::session::{FileSessionStore, SessionStore};
use farmdown_core::transport::{HttpTransport, Transport};
use farmdown_core::{Config, Node, nodes_to_html, nodes_to_text, parse_with_config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "farmdown")]
#[command(about = "Render AI analysis markdown into structured content")]
struct Cli {
    /// Config file (defaults apply when it is missing)
    #[arg(long, global = true, default_value = "farmdown.toml")]
    config: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown file, or stdin when no file is given
    Render {
        input: Option<PathBuf>,

        /// Treat the input as an AI analysis JSON payload
        #[arg(long)]
        payload: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Fetch the AI analysis of a lab analysis or soil sample and render it
    Fetch {
        #[arg(value_enum)]
        source: Source,

        id: u64,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Request a crop recommendation and render it
    Recommend {
        /// List the fields, soil samples and plants to choose from instead
        #[arg(long, conflicts_with_all = ["field", "soil", "plant"])]
        options: bool,

        #[arg(long, required_unless_present = "options")]
        field: Option<u64>,

        #[arg(long, required_unless_present = "options")]
        soil: Option<u64>,

        #[arg(long, required_unless_present = "options")]
        plant: Option<u64>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Session,
}

#[derive(clap::Args)]
struct OutputArgs {
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Html,
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Analysis,
    Soil,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config).with_env_overrides();

    match cli.command {
        Command::Render {
            input,
            payload,
            out,
        } => {
            let source = read_input(input.as_deref())?;
            let markdown = if payload {
                let analysis = AiAnalysis::from_json(&source)
                    .context("input is not an AI analysis payload")?;
                analysis_text(&analysis)?.to_string()
            } else {
                source
            };
            let nodes = parse_with_config(&markdown, &config.render);
            write_output(&nodes, &out)
        }
        Command::Fetch { source, id, out } => {
            let client = api_client(&config)?;
            let analysis = match source {
                Source::Analysis => client.analysis_ai(id),
                Source::Soil => client.soil_ai(id),
            }
            .with_context(|| format!("fetching AI analysis {id}"))?;
            if let Some(at) = &analysis.generated_at {
                tracing::info!("analysis generated at {at}");
            }
            let nodes = parse_with_config(analysis_text(&analysis)?, &config.render);
            write_output(&nodes, &out)
        }
        Command::Recommend {
            options,
            field,
            soil,
            plant,
            out,
        } => {
            let client = api_client(&config)?;
            if options {
                let options = client
                    .crop_recommendation_options()
                    .context("loading recommendation options")?;
                return write_options(&options, &out);
            }
            let (Some(field_id), Some(soil_id), Some(plant_id)) = (field, soil, plant) else {
                bail!("--field, --soil and --plant are required");
            };
            let recommendation = client
                .crop_recommendation(&CropRecommendationRequest {
                    field_id,
                    soil_id,
                    plant_id,
                })
                .context("requesting crop recommendation")?;
            if !recommendation.success {
                bail!(
                    "{}",
                    recommendation
                        .error
                        .as_deref()
                        .unwrap_or("recommendation failed")
                );
            }
            let Some(text) = recommendation.text() else {
                bail!("response has no recommendation text");
            };
            let nodes = parse_with_config(text, &config.render);
            write_output(&nodes, &out)
        }
        Command::Login { email, password } => {
            let client = api_client(&config)?;
            let user = client.login(&email, &password).context("signing in")?;
            println!("Signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        Command::Logout => {
            let client = api_client(&config)?;
            sign_out(&client)?;
            println!("Signed out");
            Ok(())
        }
        Command::Session => {
            let store = FileSessionStore::new(&config.session.path);
            match store.user() {
                Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
                None => println!("Not signed in"),
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn api_client(config: &Config) -> Result<ApiClient<HttpTransport, FileSessionStore>> {
    let transport = HttpTransport::new(Duration::from_secs(config.api.timeout_secs))
        .context("building HTTP client")?;
    let session = FileSessionStore::new(&config.session.path);
    Ok(ApiClient::new(&config.api, transport, session))
}

/// Sign out upstream. Only a session that could not be removed locally is
/// an error; an unreachable or refusing server is logged.
fn sign_out<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> Result<()> {
    match client.logout() {
        Ok(()) => Ok(()),
        Err(ApiError::Session(e)) => Err(e).context("removing the stored session"),
        Err(e) => {
            tracing::warn!("logout request failed: {e}");
            Ok(())
        }
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn analysis_text(analysis: &AiAnalysis) -> Result<&str> {
    if !analysis.success {
        bail!(
            "{}",
            analysis.error.as_deref().unwrap_or("AI analysis failed")
        );
    }
    analysis
        .text()
        .context("response has no analysis text")
}

fn write_output(nodes: &[Node], out: &OutputArgs) -> Result<()> {
    let rendered = match out.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(nodes)?;
            json.push('\n');
            json
        }
        Format::Html => nodes_to_html(nodes),
        Format::Text => nodes_to_text(nodes),
    };
    emit(rendered, out)
}

fn emit(rendered: String, out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            println!("Created {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn write_options(options: &CropRecommendationOptions, out: &OutputArgs) -> Result<()> {
    let rendered = match out.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(options)?;
            json.push('\n');
            json
        }
        Format::Html | Format::Text => options_to_text(options),
    };
    emit(rendered, out)
}

fn options_to_text(options: &CropRecommendationOptions) -> String {
    let mut text = String::from("Fields:\n");
    for field in &options.fields {
        text.push_str(&format!("  {}  {}", field.id, field.name));
        if let Some(area) = field.area_ha {
            text.push_str(&format!(" ({area} ha)"));
        }
        text.push('\n');
        for soil in &field.soils {
            let name = soil.name.as_deref().unwrap_or("soil sample");
            text.push_str(&format!("    soil {}  {name}", soil.id));
            if let Some(at) = &soil.sampled_at {
                text.push_str(&format!(", sampled {at}"));
            }
            text.push('\n');
        }
    }
    text.push_str("Plants:\n");
    for plant in &options.plants {
        text.push_str(&format!("  {}  {}\n", plant.id, plant.name));
    }
    text
}
