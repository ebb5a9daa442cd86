use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use mediakit::config::Config;
use mediakit::db::models::{EngagementAnalysisRecord, SocialAccount};
use mediakit::db::Database;
use mediakit::engagement::models::AnalysisRequest;
use mediakit::engagement::{validate, EngagementAnalyzer, ProfileCompleteness};
use mediakit::output::terminal;
use mediakit::render::{self, RenderContext};

/// mediakit: engagement analytics and media kits for creators.
///
/// Analyze post metrics, score brand readiness and render shareable
/// media kits as HTML or PDF.
#[derive(Parser)]
#[command(name = "mediakit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Analyze engagement from a JSON file of post metrics
    Analyze {
        /// Path to an analysis request (platform, handle, followers, posts)
        file: PathBuf,

        /// Store the analysis in the database
        #[arg(long)]
        save: bool,

        /// User id to store the analysis under
        #[arg(long, default_value = "local")]
        user: String,

        /// Print the result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Score brand readiness for the profile in a JSON request file
    Readiness {
        /// Path to an analysis request
        file: PathBuf,

        /// Profile completeness between 0.0 and 1.0 (default 0.8)
        #[arg(long)]
        completeness: Option<f64>,

        /// Print the result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Render a stored media kit to HTML (or PDF)
    Render {
        /// Media kit id
        kit_id: String,

        /// Output file (default: <username>-media-kit.html or .pdf)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Convert to PDF with wkhtmltopdf
        #[arg(long)]
        pdf: bool,
    },

    /// Show a stored engagement analysis
    Show {
        /// Analysis id
        analysis_id: String,
    },

    /// List a user's stored analyses, newest first
    History {
        #[arg(long, default_value = "local")]
        user: String,

        /// Maximum number of analyses to list
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Show system status (DB location, stored rows)
    Status,

    /// Mint an API bearer token for a user
    #[cfg(feature = "web")]
    Token {
        #[arg(long)]
        user: String,
    },

    /// Run the HTTP API
    #[cfg(feature = "web")]
    Serve {
        #[arg(long, default_value = "8000")]
        port: u16,

        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mediakit=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing mediakit database...");
            let config = Config::load()?;
            let db = mediakit::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: analyze some posts");
            println!("  mediakit analyze posts.json --save");
        }

        Commands::Analyze {
            file,
            save,
            user,
            json,
        } => {
            let config = Config::load()?;
            let request = read_request(&file)?;
            let analyzer = EngagementAnalyzer::new(config.benchmarks.clone());
            let result = analyzer.analyze(&request);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_analysis(&request, &result);
            }

            if save {
                let db = mediakit::db::initialize_sqlite(&config.db_path)?;
                let account =
                    SocialAccount::new(&user, request.platform, &request.handle, request.followers);
                db.create_social_account(&account).await?;
                let record = EngagementAnalysisRecord::from_result(&user, &account.id, &request, &result);
                db.create_engagement_analysis(&record).await?;
                info!(analysis = %record.id, user = %user, "Stored analysis");
                if !json {
                    println!("\n{}", format!("Saved analysis {}", record.id).green());
                }
            }
        }

        Commands::Readiness {
            file,
            completeness,
            json,
        } => {
            let config = Config::load()?;
            let completeness = match completeness {
                Some(value) => ProfileCompleteness::new(value)?,
                None => ProfileCompleteness::default(),
            };
            let request = read_request(&file)?;
            let analyzer = EngagementAnalyzer::new(config.benchmarks.clone());
            let result = analyzer.analyze(&request);
            let score = analyzer.score_readiness(
                result.engagement_rate,
                request.followers,
                request.platform,
                completeness,
            );

            if json {
                let body = serde_json::json!({
                    "engagement_analysis": result,
                    "brand_readiness": score,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                terminal::display_analysis(&request, &result);
                terminal::display_readiness(&score);
            }
        }

        Commands::Render {
            kit_id,
            output,
            pdf,
        } => {
            let config = Config::load()?;
            if pdf {
                config.require_pdf_converter()?;
            }
            let db = mediakit::db::open_sqlite(&config.db_path)?;
            let view = db
                .get_media_kit_view(&kit_id)
                .await?
                .with_context(|| format!("Media kit {kit_id} not found"))?;

            let ctx = RenderContext::from_view(&view, &config.benchmarks);
            let document = render::html::render(&ctx);

            let extension = if pdf { "pdf" } else { "html" };
            let path = output
                .unwrap_or_else(|| PathBuf::from(format!("{}-media-kit.{extension}", ctx.username)));

            if pdf {
                let bytes = render::pdf::html_to_pdf(&config.wkhtmltopdf_path, &document).await?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                db.mark_pdf_generated(&view.kit.id).await?;
            } else {
                std::fs::write(&path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            println!(
                "{}",
                format!("Media kit saved to: {}", path.display()).bold()
            );
        }

        Commands::Show { analysis_id } => {
            let config = Config::load()?;
            let db = mediakit::db::open_sqlite(&config.db_path)?;
            let record = db
                .get_engagement_analysis(&analysis_id)
                .await?
                .with_context(|| format!("Analysis {analysis_id} not found"))?;

            if let Some(account) = db.get_social_account(&record.social_account_id).await? {
                println!(
                    "Account: @{} on {} ({} followers)",
                    account.handle,
                    account.platform.display_name(),
                    render::format_number(account.followers)
                );
            }
            terminal::display_record(&record);
        }

        Commands::History { user, limit } => {
            let config = Config::load()?;
            let db = mediakit::db::open_sqlite(&config.db_path)?;
            show_history(&db, &user, limit).await?;
        }

        Commands::Status => {
            let config = Config::load()?;
            let db = mediakit::db::open_sqlite(&config.db_path)?;
            mediakit::status::show(&db, &config).await?;
        }

        #[cfg(feature = "web")]
        Commands::Token { user } => {
            let config = Config::load()?;
            config.require_session_secret()?;
            let token = mediakit::web::auth::create_token(&config.session_secret, &user);
            println!("{token}");
            eprintln!(
                "{}",
                format!(
                    "Valid for {} hours. Send as: Authorization: Bearer <token>",
                    mediakit::web::auth::TOKEN_TTL_SECS / 3600
                )
                .dimmed()
            );
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let db = mediakit::db::initialize_sqlite(&config.db_path)?;
            mediakit::web::run_server(config, db, port, &bind).await?;
        }
    }

    Ok(())
}

/// Read and validate an analysis request file.
fn read_request(path: &Path) -> Result<AnalysisRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let request: AnalysisRequest = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid analysis request", path.display()))?;
    validate::validate_request(&request)?;
    Ok(request)
}

async fn show_history(db: &Arc<dyn Database>, user: &str, limit: u32) -> Result<()> {
    let records = db.list_engagement_analyses(user, limit).await?;
    if records.is_empty() {
        println!("No stored analyses for {user}.");
        return Ok(());
    }

    println!("{}", format!("Analyses for {user}:").bold());
    for record in &records {
        println!(
            "  {}  {}  {:>6.2}%  {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.id,
            record.engagement_rate,
            record.quality
        );
    }
    Ok(())
}
