use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use variant_browser::app::ViewSession;
use variant_browser::config::AppConfig;
use variant_browser::domain::entities::dataset::SetId;
use variant_browser::domain::entities::edit::MembershipAction;
use variant_browser::domain::entities::view_state::Orientation;
use variant_browser::infra::render::console::{write_owned_sets_csv, ConsoleRenderer};

#[derive(Parser, Debug)]
#[command(
    name = "variant-browser",
    about = "Browse, filter and bulk-edit variants held by a genome server"
)]
struct Cli {
    /// TOML config file; defaults to the per-user config directory.
    #[arg(long, env = "VARIANT_BROWSER_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "VARIANT_BROWSER_BASE_URL")]
    base_url: Option<String>,

    #[arg(long = "project", env = "VARIANT_BROWSER_PROJECT")]
    project_uid: Option<String>,

    #[arg(long = "ref-genome", env = "VARIANT_BROWSER_REF_GENOME")]
    ref_genome_uid: Option<String>,

    #[arg(long, env = "VARIANT_BROWSER_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, env = "VARIANT_BROWSER_PAGE_SIZE")]
    page_size: Option<u32>,

    #[arg(long, env = "VARIANT_BROWSER_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    #[arg(long, env = "VARIANT_BROWSER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Shareable view URL; restores filter and orientation.
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(flatten)]
    view: ViewArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    #[arg(long, global = true)]
    filter: Option<String>,

    #[arg(long, global = true, value_enum)]
    orientation: Option<OrientationArg>,

    /// Comma-separated field keys to show instead of the server default.
    #[arg(long, global = true, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    #[arg(long, global = true, default_value_t = 0)]
    page: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OrientationArg {
    Cast,
    Melt,
}

impl From<OrientationArg> for Orientation {
    fn from(value: OrientationArg) -> Self {
        match value {
            OrientationArg::Cast => Orientation::Cast,
            OrientationArg::Melt => Orientation::Melt,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct SelectionArgs {
    /// Target every variant matching the current filter.
    #[arg(long, conflicts_with = "ids")]
    all: bool,

    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print one page.
    Show,
    /// List the variant sets owned in this project and reference genome.
    Sets,
    /// Add the selection to an existing set.
    Add {
        #[arg(long)]
        set: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Remove the selection from an existing set.
    Remove {
        #[arg(long)]
        set: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Create a set and add the selection to it.
    CreateSet {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Download the current view as CSV.
    Export {
        #[arg(long)]
        all: bool,
    },
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(project_uid) = &self.project_uid {
            config.project_uid = project_uid.clone();
        }
        if let Some(ref_genome_uid) = &self.ref_genome_uid {
            config.ref_genome_uid = ref_genome_uid.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.request_timeout_secs = timeout_secs;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(export_dir) = &self.export_dir {
            config.export_dir = Some(export_dir.clone());
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn apply_selection(session: &ViewSession, selection: &SelectionArgs) {
    session.selection.clear();
    if selection.all {
        session.selection.set_all_matching(true);
    } else {
        session
            .selection
            .check_all(selection.ids.iter().map(String::as_str));
    }
}

async fn run(cli: &Cli, session: &ViewSession) -> Result<()> {
    let view = &cli.view;
    session
        .controller
        .update(|state, paging| {
            if let Some(filter) = &view.filter {
                state.filter_expression = filter.clone();
            }
            if let Some(orientation) = view.orientation {
                state.orientation = orientation.into();
            }
            if view.fields.is_some() {
                state.visible_fields = view.fields.clone();
            }
            paging.page = view.page;
        })
        .await?;

    match &cli.command {
        Command::Show => {}
        Command::Sets => {
            if let Some(page) = session.controller.current_page() {
                write_owned_sets_csv(std::io::stdout(), &page.controls.owned_sets)?;
            }
        }
        Command::Add { set, selection } => {
            apply_selection(session, selection);
            session
                .coordinator
                .mutate_membership(&SetId::from(set.as_str()), MembershipAction::Add)
                .await?;
        }
        Command::Remove { set, selection } => {
            apply_selection(session, selection);
            session
                .coordinator
                .mutate_membership(&SetId::from(set.as_str()), MembershipAction::Remove)
                .await?;
        }
        Command::CreateSet { name, selection } => {
            apply_selection(session, selection);
            let created = session.coordinator.create_set_and_add(name).await?;
            tracing::info!(set = %created.id, populated = created.populated, "variant set ready");
        }
        Command::Export { all } => {
            session.selection.set_all_matching(*all);
            session.exporter.export().await?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("variant_browser=info,warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let renderer = Arc::new(match cli.command {
        Command::Sets => ConsoleRenderer::new(Box::new(std::io::sink()), None),
        _ => ConsoleRenderer::stdout(cli.view.fields.clone()),
    });
    let session = ViewSession::open(&config, cli.url.as_deref(), renderer.clone())?;

    let outcome = run(&cli, &session).await;
    tracing::info!(url = %session.shareable_url(), status = %renderer.status(), "view");
    outcome
}
