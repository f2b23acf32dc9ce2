mod cli;

use catalog_mapper::adapters::outbound::network::{ShopifyAdminClient, ShopifyConnection};
use catalog_mapper::application::dto::{AssemblyRequest, PublishRequest, ResolveRequest};
use catalog_mapper::application::AppContext;
use catalog_mapper::catalog::domain::{AssemblyOutcome, DecodedTemplate, MatchKind};
use catalog_mapper::config::{self, Settings, ACCESS_TOKEN_ENV};
use catalog_mapper::ports::outbound::{
    ReportFormatter, ReportPaths, SpecificationRepository, TemplateRepository,
};
use catalog_mapper::shared::error::{CatalogError, ExitCode};
use catalog_mapper::shared::logging::init_tracing;
use catalog_mapper::shared::Result;
use cli::{Args, Command, MissingAction, SpecsAction};
use owo_colors::OwoColorize;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("⚠️  {}", e);
    }

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n{} An error occurred:\n", "❌".red());
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };
    Ok(Settings::resolve(file, args.overrides()))
}

fn remote_client(settings: &Settings) -> Result<ShopifyAdminClient> {
    let shop_domain = settings.shop_domain.clone().ok_or_else(|| CatalogError::Validation {
        message: "no shop domain configured; pass --shop-domain or set shop_domain in the config file"
            .to_string(),
    })?;
    let access_token = config::access_token().ok_or_else(|| CatalogError::Validation {
        message: format!("{} is not set", ACCESS_TOKEN_ENV),
    })?;
    ShopifyAdminClient::new(ShopifyConnection {
        shop_domain,
        api_version: settings.api_version.clone(),
        access_token,
    })
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(&args)?;
    let context = AppContext::open(settings)?;

    match args.command {
        Command::Templates { search, regenerate } => {
            let templates = context.templates();
            let list = if regenerate {
                templates.regenerate_cache()?
            } else {
                match search {
                    Some(term) => templates.search(&term)?,
                    None => templates.get_all_templates()?,
                }
            };
            for template in &list {
                println!("{}", template);
            }
            eprintln!("{} {} templates", "✔".green(), list.len());
            Ok(ExitCode::Success)
        }

        Command::Decode { template } => match context.decode_template().execute(&template)? {
            Some(decoded) => {
                print_decoded(&decoded);
                Ok(ExitCode::Success)
            }
            None => {
                eprintln!("{} template not recognized: {}", "✘".red(), template);
                Ok(ExitCode::Failed)
            }
        },

        Command::Assemble { template, extra } => {
            let Some(decoded) = context.decode_template().execute(&template)? else {
                eprintln!("{} template not recognized: {}", "✘".red(), template);
                return Ok(ExitCode::Failed);
            };
            let request = AssemblyRequest::from_decoded(&decoded).with_extra_fields(extra.to_fields());
            let outcome = context.assemble_metafields().execute(&request)?;
            print_outcome(&outcome);
            Ok(if outcome.is_complete() {
                ExitCode::Success
            } else {
                ExitCode::Partial
            })
        }

        Command::Publish {
            template,
            product,
            extra,
        } => {
            let client = remote_client(context.settings())?;
            let request = PublishRequest {
                template,
                price: product.price,
                sku: product.sku,
                title: product.title,
                tags: product.tags,
                collection_ids: product.collection_ids,
                channel_ids: product.channel_ids,
                image_urls: product.image_urls,
                extra_fields: extra.to_fields(),
            };
            let response = context.publish_product(&client).execute(request).await?;
            println!(
                "{} created {} ({})",
                "✔".green(),
                response.product.id,
                response.product.handle.as_deref().unwrap_or("-")
            );
            for (field, values) in &response.missing {
                println!("  {} {} published as text: {}", "!".yellow(), field, values.join(", "));
            }
            Ok(ExitCode::Success)
        }

        Command::Missing { action } => {
            let tracker = context.tracker();
            match action.unwrap_or(MissingAction::Summary) {
                MissingAction::Summary => {
                    let summary = tracker.get_missing_summary();
                    let statistics = tracker.get_statistics();
                    print!(
                        "{}",
                        context
                            .formatter()
                            .format_missing_summary(&summary, &statistics)
                    );
                }
                MissingAction::Stats => {
                    let statistics = tracker.get_statistics();
                    println!("fields:        {}", statistics.total_fields);
                    println!("unique values: {}", statistics.total_unique_values);
                    println!("occurrences:   {}", statistics.total_frequency);
                    println!("log:           {}", statistics.storage_location);
                }
                MissingAction::Prune { days } => {
                    let removed = tracker.prune_older_than(i64::from(days))?;
                    eprintln!(
                        "{} removed {} entries not seen in {} days",
                        "✔".green(),
                        removed,
                        days
                    );
                }
            }
            Ok(ExitCode::Success)
        }

        Command::Specs { action } => {
            let specs = context.specs();
            match action.unwrap_or(SpecsAction::Stats) {
                SpecsAction::Validate => {
                    let report = specs.validate()?;
                    for error in &report.errors {
                        println!("{} {}", "error:".red().bold(), error);
                    }
                    for warning in &report.warnings {
                        println!("{} {}", "warning:".yellow().bold(), warning);
                    }
                    return Ok(if !report.is_valid() {
                        ExitCode::Failed
                    } else if !report.warnings.is_empty() {
                        ExitCode::Partial
                    } else {
                        println!("{} specifications are valid", "✔".green());
                        ExitCode::Success
                    });
                }
                SpecsAction::Stats => {
                    let counts = specs.counts()?;
                    println!("brands:         {}", counts.brands);
                    println!("models:         {}", counts.models);
                    println!("configurations: {}", counts.configurations);
                }
                SpecsAction::Index => {
                    let path = specs.write_index()?;
                    eprintln!("{} wrote {}", "✔".green(), path.display());
                }
                SpecsAction::Search { term, brand } => {
                    for key in specs.search_models(&term, brand.as_deref())? {
                        println!("{}", key);
                    }
                }
            }
            Ok(ExitCode::Success)
        }

        Command::AnalyzeGaps => {
            let response = context.analyze_gaps().execute()?;
            print_paths(&response.paths);
            Ok(response.exit_code())
        }

        Command::ResolveMissing { dry_run, create } => {
            let client = remote_client(context.settings())?;
            let request = ResolveRequest::new(
                dry_run,
                create,
                Duration::from_millis(context.settings().request_delay_ms),
            );
            let response = context.resolve_missing(&client).execute(request).await?;
            print_paths(&response.paths);
            Ok(response.exit_code())
        }

        Command::ValidateCatalog => {
            let response = context.validate_catalog().execute()?;
            println!(
                "health score {}/100, {} issues",
                response.report.health_score,
                response.report.issues.len()
            );
            print_paths(&response.paths);
            Ok(response.exit_code())
        }
    }
}

fn print_decoded(decoded: &DecodedTemplate) {
    println!("{} {}", "model:".bold(), decoded.model);
    println!("{} {}", "brand:".bold(), decoded.brand);
    let config = &decoded.configuration;
    for (label, value) in [
        ("processor", config.processor.as_deref()),
        ("ram", config.ram.as_deref()),
        ("vga", config.vga.as_deref()),
        ("graphics", config.graphics.as_deref()),
        ("display", config.display.as_deref()),
        ("storage", config.storage.as_deref()),
        ("os", config.os.as_deref()),
    ] {
        if let Some(value) = value {
            println!("{} {}", format!("{}:", label).bold(), value);
        }
    }
    println!("{} {}", "color:".bold(), decoded.color);
    if let Some(preset) = &decoded.inclusion_preset {
        println!("{} {}", "inclusions:".bold(), preset);
    }
    if let MatchKind::Partial { matched, compared } = decoded.match_kind {
        eprintln!(
            "{} partial match: {} of {} components agree",
            "warning:".yellow().bold(),
            matched,
            compared
        );
    }
}

fn print_outcome(outcome: &AssemblyOutcome) {
    for (key, value) in &outcome.resolved {
        println!("{} {} = {}", "✔".green(), key, value.to_remote_value());
    }
    for (field, values) in &outcome.missing {
        for value in values {
            println!("{} {} = {} (not in catalog)", "✘".red(), field, value);
        }
    }
}

fn print_paths(paths: &ReportPaths) {
    eprintln!("📄 {}", paths.json.display());
    eprintln!("📄 {}", paths.markdown.display());
}
