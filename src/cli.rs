use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use catalog_mapper::catalog::domain::{FieldValue, ProductFields};
use catalog_mapper::config::SettingsOverrides;

/// Map product templates to catalog metaobjects and reconcile the catalog
#[derive(Parser, Debug)]
#[command(name = "catalog-mapper")]
#[command(version)]
#[command(about = "Map product templates to catalog metaobjects and reconcile the catalog", long_about = None)]
pub struct Args {
    /// Config file (defaults to ./catalog-mapper.config.yml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory holding metaobjects/, products/, cache/ ...
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Store domain, e.g. my-store.myshopify.com
    #[arg(long, global = true, value_name = "DOMAIN")]
    pub shop_domain: Option<String>,

    /// Admin API version
    #[arg(long, global = true, value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Pause between remote calls during reconciliation
    #[arg(long, global = true, value_name = "MS")]
    pub request_delay_ms: Option<u64>,

    /// Components (of 6) that must agree for a non-exact template match
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub partial_match_threshold: Option<u8>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List generated templates, regenerating the cache when stale
    Templates {
        /// Only templates containing this text (case-insensitive)
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,

        /// Rebuild the cache even if it is fresh
        #[arg(long)]
        regenerate: bool,
    },

    /// Decode a template to full component names
    Decode { template: String },

    /// Resolve a template's components to catalog identifiers
    Assemble {
        template: String,

        #[command(flatten)]
        extra: ExtraFields,
    },

    /// Decode, assemble and create the product on the remote platform
    Publish {
        template: String,

        #[command(flatten)]
        product: ProductOptions,

        #[command(flatten)]
        extra: ExtraFields,
    },

    /// Inspect or maintain the missing-entry log
    Missing {
        #[command(subcommand)]
        action: Option<MissingAction>,
    },

    /// Inspect the product specification store
    Specs {
        #[command(subcommand)]
        action: Option<SpecsAction>,
    },

    /// List specification values with no catalog entry
    AnalyzeGaps,

    /// Search the remote platform for identifiers of unmapped values
    ResolveMissing {
        /// Search only; do not write catalog files
        #[arg(long)]
        dry_run: bool,

        /// Create remote records for values no search found
        #[arg(long)]
        create: bool,
    },

    /// Check identifier format and duplicates across every catalog file
    ValidateCatalog,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MissingAction {
    /// Per-field summary of the most frequent misses (default)
    Summary,
    /// Totals only
    Stats,
    /// Drop entries not seen for the given number of days
    Prune {
        #[arg(long)]
        days: u32,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SpecsAction {
    /// Report structural problems in brand files
    Validate,
    /// Brand, model and configuration counts (default)
    Stats,
    /// Regenerate products/index.json
    Index,
    /// Find model keys containing text
    Search {
        term: String,
        #[arg(long)]
        brand: Option<String>,
    },
}

/// Fields an operator adds on top of what the template decodes to
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ExtraFields {
    /// Product rank (condition grade)
    #[arg(long)]
    pub rank: Option<String>,

    /// Included item; repeat for several
    #[arg(long = "inclusion", value_name = "ITEM")]
    pub inclusions: Vec<String>,

    /// Known issue of the unit; repeat for several
    #[arg(long = "minus", value_name = "ISSUE")]
    pub minus: Vec<String>,
}

impl ExtraFields {
    pub fn to_fields(&self) -> ProductFields {
        let mut fields = ProductFields::new();
        if let Some(rank) = &self.rank {
            fields.insert("rank".to_string(), FieldValue::Single(rank.clone()));
        }
        if !self.inclusions.is_empty() {
            fields.insert(
                "inclusions".to_string(),
                FieldValue::List(self.inclusions.clone()),
            );
        }
        if !self.minus.is_empty() {
            fields.insert("minus".to_string(), FieldValue::List(self.minus.clone()));
        }
        fields
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProductOptions {
    /// Variant price, e.g. 1299.00
    #[arg(long)]
    pub price: String,

    #[arg(long)]
    pub sku: Option<String>,

    /// Product title (defaults to the template)
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Collection identifier; repeat for several
    #[arg(long = "collection", value_name = "ID")]
    pub collection_ids: Vec<String>,

    /// Sales channel (publication) identifier; repeat for several
    #[arg(long = "channel", value_name = "ID")]
    pub channel_ids: Vec<String>,

    /// Public image URL; repeat for several
    #[arg(long = "image", value_name = "URL")]
    pub image_urls: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            data_dir: self.data_dir.clone(),
            shop_domain: self.shop_domain.clone(),
            api_version: self.api_version.clone(),
            request_delay_ms: self.request_delay_ms,
            partial_match_threshold: self.partial_match_threshold.map(usize::from),
        }
    }
}
