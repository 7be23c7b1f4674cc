use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;

use aios_lib::catalog::color::ColorClasses;
use aios_lib::catalog::{display_location, Browser, Catalog, GroupSummary, WorkTypeColor};
use aios_lib::contact::{self, ContactForm, SubmitStatus};
use aios_lib::enrich::run_enrichment;
use aios_lib::json_loader::{load_catalog, LoadState};
use aios_lib::media::{verify_all, VideoPlayback};
use aios_lib::state::{apply_env_overrides, bypass_secret, load_config, load_config_from};
use aios_lib::types::{Config, WorkOrder, WorkOrderGroup};
use aios_lib::util::{
    capitalize_first, decode_route_title, format_date_long, format_date_short, generate_slug,
    truncate_text,
};

#[derive(Parser)]
#[command(name = "aios")]
#[command(about = "Browse the AI/OS work log and maintain its inputs")]
#[command(
    after_help = "Environment:\n  AIOS_DATA_SOURCE                   Work-order export (path or URL)\n  VERCEL_AUTOMATION_BYPASS_SECRET    Sent with deployed video checks\n  RUST_LOG                           Log filter (default: info)"
)]
struct Cli {
    /// Config file (default: ~/.aios/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Work-order export path or URL, overriding config and environment
    #[arg(long, global = true)]
    source: Option<String>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List ranked work-log groups
    Browse {
        #[arg(long, short, default_value = "")]
        query: String,
        #[arg(long = "type", default_value = "")]
        type_filter: String,
        #[arg(long = "state", default_value = "")]
        state_filter: String,
        /// Pages to reveal; each page past the first is one "load more"
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show a single work order
    Show { id: String },
    /// Show every work order sharing a title (percent-encoded titles are decoded)
    Group { title: String },
    /// List the type and state filter values
    Options,
    /// Merge OCR-extracted text into the export
    Enrich {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        extracted: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Check hero video files locally, on the dev server and on the deployment
    VerifyVideos {
        /// Deployed site base URL, overriding config
        #[arg(long)]
        deployed: Option<String>,
    },
    /// Validate and submit a contact request
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        project_type: String,
        #[arg(long, default_value = "")]
        budget: String,
        #[arg(long, default_value = "")]
        timeline: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => apply_env_overrides(load_config_from(path)?, |key| std::env::var(key).ok()),
        None => load_config()?,
    };
    if let Some(source) = &cli.source {
        config.data_source = source.clone();
    }
    Ok(config)
}

/// Under `--json` a failed load is also printed as an error payload on stdout.
async fn ready_catalog(config: &Config, json: bool) -> anyhow::Result<Arc<Catalog>> {
    match load_catalog(config).await {
        LoadState::Ready(catalog) => Ok(catalog),
        LoadState::Failed { error } => {
            if json {
                print_json(&error)?;
            }
            bail!(
                "Error loading work orders: {} ({})",
                error.message,
                error.recovery_suggestion
            )
        }
    }
}

fn date_range(group: &WorkOrderGroup) -> String {
    if group.earliest_date == group.latest_date {
        format_date_short(&group.latest_date)
    } else {
        format!(
            "{} - {}",
            format_date_short(&group.earliest_date),
            format_date_short(&group.latest_date)
        )
    }
}

fn print_group_card(group: &WorkOrderGroup) {
    let color = WorkTypeColor::for_type(&group.type_of_work);
    if group.is_multi() {
        println!("{} ({} engagements)", group.title, group.count);
    } else {
        println!("{}", group.title);
    }
    println!("  {} [{}]  {}", group.type_of_work, color, date_range(group));
    println!("  {}", truncate_text(&group.locations.join("; "), 100));
    if group.is_multi() {
        println!("  -> aios group {:?}", group.title);
    } else {
        println!("  -> aios show {}", group.id);
    }
}

fn print_order(order: &WorkOrder) {
    println!("{}", order.title);
    println!("  Date:     {}", format_date_long(&order.service_date));
    println!("  Type:     {}", order.type_of_work);
    println!("  Location: {}", display_location(&order.city, &order.state));
    println!("  Company:  {}", order.company);
    if let Some(rating) = order.buyer_rating.or(order.rating) {
        println!("  Rating:   {:.1}", rating);
    }
    if let Some(description) = &order.service_description {
        println!("  Service:  {}", capitalize_first(description.trim()));
    }
    if let Some(notes) = &order.closeout_notes {
        println!("  Closeout: {}", capitalize_first(notes.trim()));
    }
}

fn print_summary(summary: &GroupSummary) {
    println!("{} ({} work orders)", summary.title, summary.count);
    println!("  Type:      {} [{}]", summary.type_of_work, summary.color);
    println!("  Locations: {}", summary.locations.join("; "));
    println!("  Companies: {}", summary.companies.join("; "));
    println!("  States:    {}", summary.states.join(", "));
    for order in &summary.work_orders {
        println!(
            "  - {}  {}  {}",
            format_date_short(&order.service_date),
            display_location(&order.city, &order.state),
            order.id
        );
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupCard<'a> {
    #[serde(flatten)]
    group: &'a WorkOrderGroup,
    slug: String,
    color: WorkTypeColor,
    classes: ColorClasses,
}

impl<'a> GroupCard<'a> {
    fn new(group: &'a WorkOrderGroup) -> Self {
        let color = WorkTypeColor::for_type(&group.type_of_work);
        Self {
            group,
            slug: generate_slug(&group.title),
            color,
            classes: color.classes(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowsePage<'a> {
    groups: Vec<GroupCard<'a>>,
    shown: usize,
    total: usize,
    has_more: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match &cli.command {
        Commands::Browse {
            query,
            type_filter,
            state_filter,
            pages,
        } => {
            let catalog = ready_catalog(&config, cli.json).await?;
            let mut browser = Browser::new(
                catalog,
                config.page_size,
                Duration::from_millis(config.load_more_delay_ms),
            );
            browser.set_query(query);
            browser.set_type_filter(type_filter);
            browser.set_state_filter(state_filter);
            for _ in 1..(*pages).max(1) {
                if !browser.load_more().await {
                    break;
                }
            }

            let visible = browser.visible();
            if cli.json {
                return print_json(&BrowsePage {
                    shown: visible.len(),
                    total: browser.filtered_len(),
                    has_more: browser.has_more(),
                    groups: visible.iter().copied().map(GroupCard::new).collect(),
                });
            }

            if visible.is_empty() {
                println!("No work orders match the current filters.");
                return Ok(());
            }
            for group in &visible {
                print_group_card(group);
            }
            println!();
            println!("{} of {} projects", visible.len(), browser.filtered_len());
            if browser.has_more() {
                println!("More available: rerun with --pages {}", pages + 1);
            }
        }

        Commands::Show { id } => {
            let catalog = ready_catalog(&config, cli.json).await?;
            let Some(order) = catalog.find_by_id(id) else {
                bail!("Work order not found: {id}");
            };
            if cli.json {
                return print_json(order);
            }
            print_order(order);
        }

        Commands::Group { title } => {
            let catalog = ready_catalog(&config, cli.json).await?;
            let title = decode_route_title(title);
            let Some(summary) = catalog.group_summary(&title) else {
                bail!("No work orders titled {title:?}");
            };
            if cli.json {
                return print_json(&summary);
            }
            print_summary(&summary);
        }

        Commands::Options => {
            let catalog = ready_catalog(&config, cli.json).await?;
            let options = catalog.filter_options();
            if cli.json {
                return print_json(&options);
            }
            println!("Types:  {}", options.types.join(", "));
            println!("States: {}", options.states.join(", "));
        }

        Commands::Enrich {
            existing,
            extracted,
            output,
        } => {
            let stats = run_enrichment(existing, extracted, output)
                .with_context(|| format!("Failed to enrich {}", existing.display()))?;
            if cli.json {
                return print_json(&stats);
            }
            println!(
                "Matched {}/{} work orders ({:.1}%) from {} extracted records",
                stats.successful_matches,
                stats.total_existing_orders,
                stats.match_rate,
                stats.total_extracted_records
            );
        }

        Commands::VerifyVideos { deployed } => {
            let mut video = config.video.clone();
            if deployed.is_some() {
                video.deployed_base_url = deployed.clone();
            }
            let secret = bypass_secret();
            let report = verify_all(
                &video,
                Duration::from_secs(config.request_timeout_secs.max(1)),
                secret.as_deref(),
            )
            .await
            .context("Failed to build HTTP client")?;

            let mut playback = VideoPlayback::new(video.sources.clone(), video.fallback_image.clone());
            if let Some(source) = report.first_playable() {
                playback.prefer(source);
            }

            if cli.json {
                return print_json(&serde_json::json!({
                    "report": report,
                    "verdict": report.verdict(),
                    "playback": playback.current(),
                }));
            }
            print!("{}", report.render_text());
            println!("Playback starts with: {:?}", playback.current());
        }

        Commands::Contact {
            name,
            email,
            phone,
            company,
            project_type,
            budget,
            timeline,
            message,
        } => {
            let form = ContactForm {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                company: company.clone(),
                project_type: project_type.clone(),
                budget: budget.clone(),
                timeline: timeline.clone(),
                message: message.clone(),
            };
            let status =
                contact::submit(&form, Duration::from_millis(config.contact.submit_delay_ms)).await;
            if cli.json {
                print_json(&status)?;
            } else {
                match &status {
                    SubmitStatus::Success => {
                        println!("Thanks! Your message has been sent. We'll be in touch shortly.")
                    }
                    SubmitStatus::Error(errors) => {
                        for error in errors {
                            eprintln!("{}", error);
                        }
                    }
                }
            }
            if matches!(status, SubmitStatus::Error(_)) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
