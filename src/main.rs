use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use formlogic_rs::engine::{field_dependencies, Evaluator, FieldIndex};
use formlogic_rs::form::{EngineConfig, FormDefinition, FormField, FormLoader};
use schemars::schema_for;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine config file (YAML); defaults plus environment overrides otherwise
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a form's logic and recall configuration
    Validate {
        /// Path to the form file (YAML or JSON)
        #[arg(short, long)]
        form: String,
    },
    /// Evaluate a form against a set of responses
    Simulate {
        /// Path to the form file (YAML or JSON)
        #[arg(short, long)]
        form: String,

        /// Path to the responses file, an object keyed by field id
        #[arg(short, long)]
        responses: String,
    },
    /// List the fields a field's logic and recall read
    Deps {
        /// Path to the form file (YAML or JSON)
        #[arg(short, long)]
        form: String,

        /// Field id to inspect
        #[arg(long)]
        field: String,
    },
    /// Print the JSON Schema for form documents
    Schema,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => EngineConfig::from_env(),
    };
    let evaluator = Evaluator::new(config);
    log::debug!("Engine config: {:?}", evaluator.config());
    let loader = FormLoader::new();

    match args.command {
        Commands::Validate { form } => {
            let fields = load_fields(&loader, &form)?;
            let report = evaluator.validate(&fields);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.has_errors() {
                anyhow::bail!("{} has {} configuration errors", form, report.errors.len());
            }
        }
        Commands::Simulate { form, responses } => {
            let fields = load_fields(&loader, &form)?;
            let responses = loader
                .load_responses(&responses)
                .with_context(|| format!("Failed to load responses from {}", responses))?;

            log::info!(
                "Simulating {} fields against {} responses",
                fields.len(),
                responses.len()
            );
            let result = evaluator.evaluate(&fields, &responses);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Deps { form, field } => {
            let fields = load_fields(&loader, &form)?;
            let index = FieldIndex::build(&fields);
            let target = index
                .get(&field)
                .with_context(|| format!("Field '{}' not found in {}", field, form))?;

            let deps = field_dependencies(target);
            let forward: Vec<&String> = deps
                .iter()
                .filter(|d| index.is_forward(&field, d))
                .collect();
            let missing: Vec<&String> = deps.iter().filter(|d| !index.contains(d)).collect();
            let output = json!({
                "field": field,
                "depends_on": deps,
                "forward": forward,
                "missing": missing,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Schema => {
            let schema = schema_for!(FormDefinition);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn load_fields(loader: &FormLoader, path: &str) -> anyhow::Result<Vec<FormField>> {
    loader
        .load_fields(path)
        .with_context(|| format!("Failed to load form from {}", path))
}
