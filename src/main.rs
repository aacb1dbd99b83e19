use clap::{Parser, Subcommand};
use dotenv::dotenv;
use formwork_rs::forms::condition::is_field_visible;
use formwork_rs::forms::loader::FormLoader;
use formwork_rs::forms::response::ResponseSet;
use formwork_rs::forms::schema::{validate_form, FormDefinition};
use formwork_rs::forms::submission::check_submission;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a form definition file
    Validate {
        /// Path to the definition file
        #[arg(short, long)]
        file: String,
    },
    /// Show which fields a set of answers makes visible
    Preview {
        /// Path to the definition file
        #[arg(short, long)]
        file: String,

        /// Answers as a JSON object
        #[arg(short, long, default_value = "{}")]
        answers: String,
    },
    /// Print the JSON Schema that definition files must satisfy
    Schema,
    /// Serve the form preview API
    Serve {
        /// Port to listen on (falls back to PORT, then 8787)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of form definition files (falls back to FORMS_DIR, then "forms")
        #[arg(short = 'd', long)]
        forms_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();

    // The server routes tower-http spans through tracing; everything else
    // logs through env_logger.
    if matches!(&args.command, Commands::Serve { .. }) {
        tracing_subscriber::fmt::init();
    } else {
        env_logger::init();
    }

    match args.command {
        Commands::Validate { file } => {
            let def = FormLoader::new().load_form(&file)?;
            let violations = validate_form(&def);
            if violations.is_empty() {
                println!(
                    "{}: ok ({} fields, {} conditions)",
                    def.id,
                    def.fields.len(),
                    def.conditions.len()
                );
            } else {
                for violation in &violations {
                    println!("{}", violation);
                }
                anyhow::bail!("{} violation(s) in {}", violations.len(), file);
            }
        }
        Commands::Preview { file, answers } => {
            let def = FormLoader::new().load_form(&file)?;
            let parsed: serde_json::Value = serde_json::from_str(&answers)?;
            let values = ResponseSet::from_json(&parsed)?;

            println!("Form: {}", def.title);
            for field in &def.fields {
                let shown = is_field_visible(&field.id, &def.conditions, &values);
                println!(
                    "  [{}] {} ({})",
                    if shown { "x" } else { " " },
                    field.label,
                    field.id
                );
            }

            let report = check_submission(&def, &values);
            if report.is_ok() {
                println!("Submission would be accepted");
            } else {
                for flagged in &report.issues {
                    println!("  ! {}: {}", flagged.field_id, flagged.issue);
                }
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(FormDefinition);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Serve { port, forms_dir } => {
            let port = port
                .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
                .unwrap_or(8787);
            let dir = forms_dir
                .or_else(|| std::env::var("FORMS_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("forms"));
            formwork_rs::server::serve(port, dir)
                .await
                .map_err(anyhow::Error::from_boxed)?;
        }
    }

    Ok(())
}
