use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for coffeetour
/// Manage coffee-tour blog posts stored in SQLite
#[derive(Parser)]
#[command(
    name = "coffeetour",
    version = env!("CARGO_PKG_VERSION"),
    about = "Coffee travel blog admin: import, deduplicate and regenerate posts from SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the directory generated pages are written to
    #[arg(global = true, long = "posts-dir")]
    pub posts_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Post fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,

    /// Date of the visit (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub continent: Option<String>,

    #[arg(long = "lat", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long = "lon", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    #[arg(long = "cafe")]
    pub cafe_name: Option<String>,

    /// Rating from 0 to 5
    #[arg(long)]
    pub rating: Option<i64>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Image URL (repeatable, order is kept)
    #[arg(long = "image", value_name = "URL")]
    pub images: Vec<String>,

    #[arg(long = "instagram")]
    pub instagram_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Import posts from an Instagram export file or a directory of pages
    Import {
        /// posts_1.json file, or a directory of *.md pages
        path: String,

        #[arg(long = "all", help = "Keep posts that do not look coffee related")]
        all: bool,

        #[arg(
            long = "fill-missing",
            help = "For posts already stored, fill fields that are still empty"
        )]
        fill_missing: bool,

        #[arg(long = "dry-run", help = "Report what would happen without writing")]
        dry_run: bool,

        #[arg(long = "regenerate", help = "Regenerate all pages after importing")]
        regenerate: bool,
    },

    /// List posts
    List {
        #[arg(long, conflicts_with = "unpublished")]
        published: bool,

        #[arg(long)]
        unpublished: bool,

        #[arg(long)]
        continent: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Show one post in full
    Show { id: i64 },

    /// Add a new post
    Add {
        #[command(flatten)]
        fields: PostFields,

        #[arg(long, help = "Store the post as unpublished")]
        draft: bool,

        #[arg(long = "no-regen", help = "Do not write the post page")]
        no_regen: bool,
    },

    /// Update fields of an existing post
    Edit {
        id: i64,

        #[command(flatten)]
        fields: PostFields,

        #[arg(long = "no-regen", help = "Do not rewrite the post page")]
        no_regen: bool,
    },

    /// Delete a post and its generated page
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Find posts stored more than once (dry run unless --apply)
    Dedup {
        #[arg(long, help = "Delete the duplicates instead of only listing them")]
        apply: bool,
    },

    /// Publish or unpublish a post
    Publish {
        id: i64,

        #[arg(long, help = "Unpublish instead")]
        off: bool,
    },

    /// Free-text search over title, cafe, city, country and notes
    Search { query: String },

    /// Post statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Regenerate the static post pages from the database
    Regenerate {
        #[arg(long, help = "Regenerate only this post")]
        id: Option<i64>,

        #[arg(long, help = "Only remove pages that belong to no post", conflicts_with = "id")]
        clean: bool,

        #[arg(long = "no-backup", help = "Do not archive existing pages first")]
        no_backup: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file")]
        force: bool,
    },

    /// Export posts
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Only published posts")]
        published: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the local admin HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Map tile planning and cache warming
    Tiles {
        #[arg(long, help = "Print the tiles that would be requested")]
        plan: bool,

        #[arg(long, help = "Request every planned tile")]
        prefetch: bool,

        #[arg(
            long,
            value_name = "LAT,LON",
            allow_hyphen_values = true,
            requires = "zoom",
            help = "Print the tile containing a coordinate"
        )]
        at: Option<String>,

        #[arg(long)]
        zoom: Option<u8>,
    },
}
