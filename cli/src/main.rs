//! govdash: governance dashboard on the command line.

use anyhow::{bail, Context};
use clap::Parser;
use govdash_balance::{format_amount, format_percent, BalancePair};
use govdash_dashboard::{Dashboard, DashboardConfig};
use govdash_governance::{ForumClient, ReducedProposal};
use govdash_types::{Timestamp, WalletAddress};
use govdash_utils::{format_relative, init_logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "govdash", about = "Token balances and governance proposals for one wallet")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "GOVDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Ethereum JSON-RPC endpoint.
    #[arg(long, env = "GOVDASH_RPC_URL")]
    rpc_url: Option<String>,

    /// Vote hub root URL.
    #[arg(long, env = "GOVDASH_HUB_URL")]
    hub_url: Option<String>,

    /// Vote hub space.
    #[arg(long, env = "GOVDASH_SPACE")]
    space: Option<String>,

    /// Activation service URL. No default; without it the `proposals`
    /// subcommand fails and only balances are available.
    #[arg(long, env = "GOVDASH_TALLY_URL")]
    tally_url: Option<String>,

    /// URL prefix for requests to the activation service.
    #[arg(long, env = "GOVDASH_CORS_PROXY")]
    cors_proxy: Option<String>,

    /// Directory for saved preferences.
    #[arg(long, env = "GOVDASH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GOVDASH_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GOVDASH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Discourse API key for draft discovery.
    #[arg(long, env = "DISCOURSE_API_KEY", hide_env_values = true)]
    forum_api_key: Option<String>,

    /// Discourse user the API key belongs to.
    #[arg(long, env = "DISCOURSE_USERNAME")]
    forum_username: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show primary and staked balances. Uses the saved default address when
    /// none is given.
    Balance { address: Option<String> },

    /// List governance proposals, newest ending first. Needs `--tally-url`.
    Proposals {
        /// Show links and the tally split for every proposal.
        #[arg(long)]
        all_details: bool,

        /// Mark proposals this address voted on (defaults to the saved address).
        #[arg(long)]
        address: Option<String>,
    },

    /// Manage the saved default address.
    Default {
        #[command(subcommand)]
        action: DefaultAction,
    },

    /// List draft proposals on the forum.
    Drafts,
}

#[derive(clap::Subcommand)]
enum DefaultAction {
    Show,
    Set { address: String },
    Clear,
}

impl Cli {
    /// Layer flags and env vars over the file (or built-in) configuration.
    fn resolve_config(&self) -> anyhow::Result<DashboardConfig> {
        let base = match &self.config {
            Some(path) => {
                let path = path.to_string_lossy();
                DashboardConfig::from_toml_file(&path)
                    .with_context(|| format!("failed to load config file {path}"))?
            }
            None => DashboardConfig::default(),
        };

        Ok(DashboardConfig {
            rpc_url: self.rpc_url.clone().unwrap_or(base.rpc_url),
            hub_url: self.hub_url.clone().unwrap_or(base.hub_url),
            space: self.space.clone().unwrap_or(base.space),
            tally_url: self.tally_url.clone().or(base.tally_url),
            cors_proxy: self.cors_proxy.clone().or(base.cors_proxy),
            data_dir: self.data_dir.clone().unwrap_or(base.data_dir),
            log_format: self.log_format.clone().unwrap_or(base.log_format),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            forum_api_key: self.forum_api_key.clone(),
            forum_api_username: self.forum_username.clone(),
            ..base
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format()?, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Balance { address } => {
            let dashboard = Dashboard::from_config(&config)?;
            let owner = match address {
                Some(address) => WalletAddress::parse_optional(Some(address.as_str())),
                None => dashboard.default_address()?,
            };
            let Some(owner) = owner else {
                bail!("no address given and no default address saved");
            };

            let pair = dashboard.lookup_balance(Some(owner.as_str())).await;
            match pair {
                Some(pair) if pair.is_loaded() => print_balance(&owner, &pair, config.token_decimals),
                _ => bail!("balance lookup for {owner} failed"),
            }
        }

        Command::Proposals {
            all_details,
            address,
        } => {
            let dashboard = Dashboard::from_config(&config)?;
            let voter = match address {
                Some(address) => WalletAddress::parse_optional(Some(address.as_str())),
                None => dashboard.default_address()?,
            };
            let list = dashboard.load_proposals().await?;
            if list.is_empty() {
                println!("No proposals.");
            }
            let now = Timestamp::now();
            for proposal in list.iter() {
                print_proposal(proposal, voter.as_ref(), now, all_details);
            }
        }

        Command::Default { action } => {
            let dashboard = Dashboard::from_config(&config)?;
            match action {
                DefaultAction::Show => match dashboard.default_address()? {
                    Some(address) => println!("{address}"),
                    None => println!("No default address saved."),
                },
                DefaultAction::Set { address } => {
                    let saved = dashboard.save_default_address(&address)?;
                    println!("Default address set to {saved}");
                }
                DefaultAction::Clear => {
                    dashboard.clear_default_address()?;
                    println!("Default address cleared.");
                }
            }
        }

        Command::Drafts => {
            let forum = ForumClient::new(
                config.forum_url.clone(),
                config.forum_category,
                config.request_timeout(),
            )?
            .with_credentials(config.forum_api_key.clone(), config.forum_api_username.clone());

            let drafts = forum.draft_topics(&config.name_prefix).await?;
            if drafts.is_empty() {
                println!("No draft proposals.");
            }
            for topic in drafts {
                println!("{}\n  {}", topic.title, topic.url(forum.forum_url()));
            }
        }
    }

    Ok(())
}

fn print_balance(owner: &WalletAddress, pair: &BalancePair, decimals: u32) {
    let amount = |b: &Option<govdash_types::TokenBalance>| {
        b.as_ref()
            .map(|b| format_amount(b, decimals, 1))
            .unwrap_or_else(|| "-".to_string())
    };
    println!("{owner}");
    println!("  total   {} ({} staked)", amount(&pair.total()), format_percent(pair));
    println!("  primary {}", amount(&pair.primary));
    println!("  staked  {}", amount(&pair.staked));
}

fn print_proposal(
    proposal: &ReducedProposal,
    voter: Option<&WalletAddress>,
    now: Timestamp,
    all_details: bool,
) {
    let window = if proposal.active {
        format!("ACTIVE, ends {}", format_relative(proposal.end, now))
    } else if proposal.is_completed(now) {
        format!("ended {}", format_relative(proposal.end, now))
    } else {
        format!("starts {}", format_relative(proposal.start, now))
    };
    let voted = match voter {
        Some(voter) if proposal.has_voted(voter) => "  [voted]",
        _ => "",
    };
    println!("{}  ({window}){voted}", proposal.name);

    println!(
        "  Yes {} voters{}  No {} voters{}",
        proposal.votes.yes.voters,
        points(proposal.votes.yes.points),
        proposal.votes.no.voters,
        points(proposal.votes.no.points),
    );
    if let Some(status) = proposal.status {
        let share = proposal
            .yes_share()
            .map(|s| format!(", {:.0}% yes", s * 100.0))
            .unwrap_or_default();
        println!("  {}{share}", status.as_str());
    }

    println!("  vote: {}", proposal.proposal_url);
    if all_details {
        if let Some(url) = &proposal.community_url {
            println!("  discussion: {url}");
        }
        if let Some(url) = &proposal.github_url {
            println!("  code: {url}");
        }
    }
}

fn points(points: Option<f64>) -> String {
    points
        .map(|p| format!(" ({p:.1} points)"))
        .unwrap_or_default()
}
