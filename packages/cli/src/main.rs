use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use reward_swap::{Address, Asset, Direction, PoolEvent, DEFAULT_REWARD_RATE_BPS, MAX_REWARD_RATE_BPS};
use reward_swap_sdk::{
    CreatePoolParams, ProvideParams, RemoveParams, SwapClient, SwapParams,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ─── Defaults ─────────────────────────────────────────────────────────────────

const DEFAULT_STATE_FILE: &str   = "reward-swap.json";
const DEFAULT_POOL_ADDRESS: &str = "pool";
const DEFAULT_LOG_FILTER: &str   = "reward_swap=info,reward_swap_sdk=info";

// ─── Token sides ──────────────────────────────────────────────────────────────

/// One of the two pooled tokens, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    A,
    B,
}

impl Side {
    fn asset(self) -> Asset {
        match self {
            Side::A => Asset::A,
            Side::B => Asset::B,
        }
    }

    /// Direction of a swap that sells this side.
    fn selling(self) -> Direction {
        match self {
            Side::A => Direction::AToB,
            Side::B => Direction::BToA,
        }
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::AToB => "A → B",
        Direction::BToA => "B → A",
    }
}

fn output_side(direction: Direction) -> &'static str {
    match direction {
        Direction::AToB => "B",
        Direction::BToA => "A",
    }
}

/// Convert a percent tolerance (0–100) to basis points.
fn slippage_bps(max_slippage: f64) -> Result<u16> {
    if !(0.0..=100.0).contains(&max_slippage) {
        return Err(anyhow!(
            "--max-slippage {} is out of range. Use 0–100 (percent). Default 0.5 = 0.5%.",
            max_slippage
        ));
    }
    Ok((max_slippage * 100.0).round() as u16)
}

// ─── Version banner ───────────────────────────────────────────────────────────

/// Print the reward-swap banner to stdout.
fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  reward-swap  v{ver}  ·  constant-product pool with LP rewards");
    println!("  {}", "─".repeat(62));
    println!("  State     {DEFAULT_STATE_FILE}  (override with --state)");
    println!("  Rewards   0.00%–100.00% of swap input, minted to LPs on claim");
    println!("  Default   {:.2}% reward rate", DEFAULT_REWARD_RATE_BPS as f64 / 100.0);
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// reward-swap — constant-product AMM that pays LPs a per-trade reward.
///
/// Every command supports --json for machine-readable output.
/// Global options can also be set via environment variables:
///   REWARD_SWAP_STATE   — path to the pool state file
///   REWARD_SWAP_CALLER  — identity the command runs as
#[derive(Parser)]
#[command(
    name        = "reward-swap",
    version     = env!("CARGO_PKG_VERSION"),
    long_version = concat!(
        env!("CARGO_PKG_VERSION"), "\n",
        "Pricing:      x · y = k, output floored, no trading fee\n",
        "Rewards:      reward_rate_bps of every swap input, pro rata per LP share\n",
        "License:      MIT",
    ),
    about   = "Constant-product AMM with per-trade LP rewards, backed by a local state file.",
    after_help = "\
ENVIRONMENT:
  REWARD_SWAP_STATE    Pool state file  [default: reward-swap.json]
  REWARD_SWAP_CALLER   Identity to act as (owner, provider or trader)
  RUST_LOG             Log filter  [default: reward_swap=info,reward_swap_sdk=info]

QUICK START:
  reward-swap --caller owner init
  reward-swap --caller alice faucet --amount 1000000
  reward-swap --caller alice provide --amount 100000 --amount-b 100000
  reward-swap --caller bob   faucet --amount 1000000
  reward-swap --caller bob   swap --in A --amount 1000
  reward-swap --caller alice claim-rewards"
)]
struct Cli {
    /// Pool state file
    #[arg(
        long,
        global     = true,
        value_name = "PATH",
        default_value = DEFAULT_STATE_FILE,
        env = "REWARD_SWAP_STATE"
    )]
    state: String,

    /// Identity the command acts as
    #[arg(long, global = true, value_name = "ID", env = "REWARD_SWAP_CALLER")]
    caller: Option<String>,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pool state file with fresh token ledgers
    ///
    /// The caller becomes the owner unless --owner is given. The owner is the
    /// only identity allowed to change the reward rate or sweep surplus.
    #[command(
        after_help = "\
EXAMPLES:
  # Pool owned by the caller, default 0.30% reward rate
  reward-swap --caller owner init

  # Explicit owner and 1% reward rate
  reward-swap init --owner treasury --reward-rate-bps 100

NOTES:
  After creation the pool is empty. Run `provide` to seed initial liquidity."
    )]
    Init {
        /// Pool owner [default: the caller]
        #[arg(long, value_name = "ID")]
        owner: Option<String>,

        /// Account that holds the pool's balances on each ledger
        #[arg(long, value_name = "ID", default_value = DEFAULT_POOL_ADDRESS)]
        pool_address: String,

        /// Reward credited to LPs per swap, in basis points of the input.
        /// Range 0–10000. Default 30 = 0.30%.
        #[arg(long, value_name = "BPS", default_value_t = DEFAULT_REWARD_RATE_BPS)]
        reward_rate_bps: u16,
    },

    /// Mint test tokens A and B to an account and approve the pool
    #[command(
        after_help = "\
EXAMPLES:
  reward-swap --caller alice faucet --amount 1000000
  reward-swap faucet --to bob --amount 500"
    )]
    Faucet {
        /// Recipient [default: the caller]
        #[arg(long, value_name = "ID")]
        to: Option<String>,

        /// Amount of each token (atomic units)
        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Show token A, token B and reward balances of an account
    Balance {
        /// Account to inspect [default: the caller]
        #[arg(long, value_name = "ID")]
        of: Option<String>,
    },

    /// Transfer pool tokens between accounts without touching the pool
    ///
    /// Sending to the pool address creates surplus that the owner can sweep
    /// with `emergency-withdraw`; it never changes the reserves.
    #[command(
        after_help = "\
EXAMPLES:
  reward-swap --caller alice send --to bob --asset A --amount 100"
    )]
    Send {
        #[arg(long, value_name = "ID")]
        to: String,

        #[arg(long, value_enum, ignore_case = true, value_name = "A|B")]
        asset: Side,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Add liquidity to the pool and receive LP shares
    ///
    /// LP shares track your proportional ownership of the pool.
    /// Swap rewards accrue to your shares automatically via a per-share
    /// accumulator; run `claim-rewards` to mint them.
    #[command(
        after_help = "\
EXAMPLES:
  # Seed the empty pool (first deposit sets the price)
  reward-swap --caller alice provide --amount 100000 --amount-b 400000

  # Add to an existing pool (amount-b computed from live reserves)
  reward-swap --caller bob provide --amount 5000

NOTES:
  First deposit requires --amount-b to establish the initial price.
  Deposits off the reserve ratio mint shares for the smaller side only."
    )]
    Provide {
        /// Amount of token A to deposit (atomic units)
        #[arg(long, value_name = "AMOUNT")]
        amount: u64,

        /// Amount of token B (atomic units).
        /// Required for the first deposit (sets the initial price ratio).
        /// Omit for subsequent deposits — computed from live reserves.
        #[arg(long, value_name = "AMOUNT")]
        amount_b: Option<u64>,

        /// Reject the deposit if fewer LP shares would be minted
        #[arg(long, value_name = "SHARES", default_value_t = 0)]
        min_shares: u64,
    },

    /// Burn LP shares and withdraw proportional tokens from the pool
    ///
    /// Rewards are settled before the burn but NOT minted — run
    /// `claim-rewards` separately, even after a full exit.
    #[command(
        name = "remove-liquidity",
        after_help = "\
EXAMPLES:
  # Exit the whole position
  reward-swap --caller alice remove-liquidity

  # Burn 1000 shares with slippage guards
  reward-swap --caller alice remove-liquidity --shares 1000 --min-a 240 --min-b 990"
    )]
    RemoveLiquidity {
        /// Number of LP shares to burn [default: all]
        #[arg(long, value_name = "SHARES")]
        shares: Option<u64>,

        /// Minimum token A to accept — reject if below (slippage guard, atomic units)
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        min_a: u64,

        /// Minimum token B to accept — reject if below (slippage guard, atomic units)
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        min_b: u64,
    },

    /// Execute a swap through the constant-product pool
    ///
    /// A pre-flight simulation runs first; the output floor is the estimate
    /// less --max-slippage. The LP reward is not deducted from your trade.
    #[command(
        after_help = "\
EXAMPLES:
  # Sell 1000 A for B with the default 0.5% slippage guard
  reward-swap --caller bob swap --in A --amount 1000

  # No slippage guard, JSON output
  reward-swap --caller bob swap --in B --amount 1000 --max-slippage 0 --json

PRICING:
  amount_out = reserve_out × amount_in / (reserve_in + amount_in)
  reward     = amount_in × reward_rate_bps / 10000  → accrues to LPs"
    )]
    Swap {
        /// Token to sell
        #[arg(long = "in", value_enum, ignore_case = true, value_name = "A|B")]
        token_in: Side,

        /// Amount of the input token to sell (atomic units)
        #[arg(long, value_name = "AMOUNT")]
        amount: u64,

        /// Reject the swap if real output falls more than this many percent below
        /// the pre-flight estimate. 0 = accept any output (no slippage guard).
        #[arg(long, value_name = "PCT", default_value_t = 0.5)]
        max_slippage: f64,
    },

    /// Preview a swap without executing it
    ///
    /// Safe to call as often as needed — nothing is written.
    #[command(
        after_help = "\
EXAMPLES:
  reward-swap simulate --in A --amount 1000
  reward-swap simulate --in B --amount 1000 --json"
    )]
    Simulate {
        /// Token to sell
        #[arg(long = "in", value_enum, ignore_case = true, value_name = "A|B")]
        token_in: Side,

        /// Amount of the input token to simulate selling (atomic units)
        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Show pool reserves, spot price, LP supply and reward rate
    #[command(name = "pool-info")]
    PoolInfo,

    /// Show the caller's LP shares, redeemable amounts and pending reward
    #[command(name = "my-position")]
    MyPosition,

    /// Mint every pending reward to the caller
    #[command(
        name = "claim-rewards",
        after_help = "\
EXAMPLES:
  reward-swap --caller alice claim-rewards

  # Check the claimable amount first (nothing written):
  reward-swap --caller alice my-position --json"
    )]
    ClaimRewards,

    /// Change the reward rate (owner only)
    #[command(name = "set-rate")]
    SetRate {
        /// New reward rate in basis points, 0–10000
        #[arg(long, value_name = "BPS")]
        bps: u16,
    },

    /// Sweep tokens held by the pool above its reserve to the owner (owner only)
    #[command(name = "emergency-withdraw")]
    EmergencyWithdraw {
        #[arg(long, value_enum, ignore_case = true, value_name = "A|B")]
        asset: Side,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// List committed pool operations, newest last
    History {
        /// Show only the most recent N events
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return Ok(());
    }

    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Commands::Init { owner, pool_address, reward_rate_bps } => {
            cmd_init(&cli, owner.as_deref(), pool_address, *reward_rate_bps)?;
        }
        Commands::Faucet { to, amount } => {
            cmd_faucet(&cli, to.as_deref(), *amount)?;
        }
        Commands::Balance { of } => {
            cmd_balance(&cli, of.as_deref())?;
        }
        Commands::Send { to, asset, amount } => {
            cmd_send(&cli, to, *asset, *amount)?;
        }
        Commands::Provide { amount, amount_b, min_shares } => {
            cmd_provide(&cli, *amount, *amount_b, *min_shares)?;
        }
        Commands::RemoveLiquidity { shares, min_a, min_b } => {
            cmd_remove_liquidity(&cli, *shares, *min_a, *min_b)?;
        }
        Commands::Swap { token_in, amount, max_slippage } => {
            cmd_swap(&cli, *token_in, *amount, *max_slippage)?;
        }
        Commands::Simulate { token_in, amount } => {
            cmd_simulate(&cli, *token_in, *amount)?;
        }
        Commands::PoolInfo => {
            cmd_pool_info(&cli)?;
        }
        Commands::MyPosition => {
            cmd_my_position(&cli)?;
        }
        Commands::ClaimRewards => {
            cmd_claim_rewards(&cli)?;
        }
        Commands::SetRate { bps } => {
            cmd_set_rate(&cli, *bps)?;
        }
        Commands::EmergencyWithdraw { asset, amount } => {
            cmd_emergency_withdraw(&cli, *asset, *amount)?;
        }
        Commands::History { limit } => {
            cmd_history(&cli, *limit)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ─── init ─────────────────────────────────────────────────────────────────────

fn cmd_init(cli: &Cli, owner: Option<&str>, pool_address: &str, reward_rate_bps: u16) -> Result<()> {
    if reward_rate_bps > MAX_REWARD_RATE_BPS {
        return Err(anyhow!(
            "--reward-rate-bps {} is out of range. Use 0–{}.",
            reward_rate_bps, MAX_REWARD_RATE_BPS
        ));
    }
    let owner = match owner {
        Some(id) => Address::from(id),
        None => caller(cli).context("init needs --owner or --caller")?,
    };

    let (_, created) = SwapClient::create(&cli.state, CreatePoolParams {
        owner,
        pool_address: Address::from(pool_address),
        reward_rate_bps,
    })
    .with_context(|| format!("cannot create pool state at '{}'", cli.state))?;

    if cli.json {
        println!("{}", json!({
            "status":          "ok",
            "command":         "init",
            "state":           cli.state,
            "owner":           created.owner,
            "pool_address":    created.pool_address,
            "token_a":         created.token_a,
            "token_b":         created.token_b,
            "reward_token":    created.reward_token,
            "reward_rate_bps": created.reward_rate_bps,
        }));
    } else {
        println!("─── Pool Created ─────────────────────────────────────────────────");
        println!("  State file       {}", cli.state);
        println!("  Owner            {}", created.owner);
        println!("  Pool address     {}", created.pool_address);
        println!("  Token A          {}", created.token_a);
        println!("  Token B          {}", created.token_b);
        println!("  Reward token     {}", created.reward_token);
        println!("  Reward rate      {:>6} bps  ({:.2}%)",
                 created.reward_rate_bps, created.reward_rate_bps as f64 / 100.0);
        println!();
        println!("  Pool is empty. Seed it with:");
        println!("    reward-swap --caller <ID> faucet --amount <AMT>");
        println!("    reward-swap --caller <ID> provide --amount <AMT> --amount-b <AMT>");
    }
    Ok(())
}

// ─── faucet / balance / send ──────────────────────────────────────────────────

fn cmd_faucet(cli: &Cli, to: Option<&str>, amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(anyhow!("--amount must be > 0 (atomic units)"));
    }
    let holder = match to {
        Some(id) => Address::from(id),
        None => caller(cli).context("faucet needs --to or --caller")?,
    };
    let mut client = open(cli)?;
    let balances = client.faucet(&holder, amount).context("faucet failed")?;

    if cli.json {
        println!("{}", json!({
            "status":   "ok",
            "command":  "faucet",
            "amount":   amount,
            "balances": balances,
        }));
    } else {
        println!("─── Faucet ───────────────────────────────────────────────────────");
        println!("  Recipient        {holder}");
        println!("  Minted           {:>20}  of A and B", amount);
        println!("  Balance A        {:>20}", balances.token_a);
        println!("  Balance B        {:>20}", balances.token_b);
    }
    Ok(())
}

fn cmd_balance(cli: &Cli, of: Option<&str>) -> Result<()> {
    let holder = match of {
        Some(id) => Address::from(id),
        None => caller(cli).context("balance needs --of or --caller")?,
    };
    let balances = open(cli)?.balances(&holder);

    if cli.json {
        println!("{}", json!({ "status": "ok", "command": "balance", "balances": balances }));
    } else {
        println!("─── Balances ─────────────────────────────────────────────────────");
        println!("  Account          {holder}");
        println!("  Token A          {:>20}", balances.token_a);
        println!("  Token B          {:>20}", balances.token_b);
        println!("  Reward           {:>20}", balances.reward);
    }
    Ok(())
}

fn cmd_send(cli: &Cli, to: &str, asset: Side, amount: u64) -> Result<()> {
    let from = caller(cli)?;
    let to = Address::from(to);
    let mut client = open(cli)?;
    let balances = client
        .send(&from, &to, asset.asset(), amount)
        .context("transfer failed")?;

    if cli.json {
        println!("{}", json!({
            "status":   "ok",
            "command":  "send",
            "from":     from,
            "to":       to,
            "asset":    asset.asset(),
            "amount":   amount,
            "balances": balances,
        }));
    } else {
        println!("─── Transfer ─────────────────────────────────────────────────────");
        println!("  {from} → {to}");
        println!("  Sent             {:>20}  {}", amount, asset.asset());
        println!("  Balance A        {:>20}", balances.token_a);
        println!("  Balance B        {:>20}", balances.token_b);
    }
    Ok(())
}

// ─── provide ──────────────────────────────────────────────────────────────────

fn cmd_provide(cli: &Cli, amount_a: u64, amount_b: Option<u64>, min_shares: u64) -> Result<()> {
    if amount_a == 0 || amount_b == Some(0) {
        return Err(anyhow!("--amount and --amount-b must be > 0 (atomic units)"));
    }
    let provider = caller(cli)?;
    let mut client = open(cli)?;
    let result = client
        .provide_liquidity(&provider, ProvideParams { amount_a, amount_b, min_shares })
        .context("provide failed")?;

    if cli.json {
        println!("{}", json!({
            "status":        "ok",
            "command":       "provide",
            "provider":      result.provider,
            "amount_a":      result.amount_a,
            "amount_b":      result.amount_b,
            "shares_minted": result.shares_minted,
            "total_shares":  result.total_shares,
        }));
    } else {
        println!("─── Liquidity Added ──────────────────────────────────────────────");
        println!("  Provider         {}", result.provider);
        println!("  Deposited A      {:>20}", result.amount_a);
        println!("  Deposited B      {:>20}", result.amount_b);
        println!("  Shares minted    {:>20}", result.shares_minted);
        println!("  Total shares     {:>20}", result.total_shares);
    }
    Ok(())
}

// ─── remove-liquidity ─────────────────────────────────────────────────────────

fn cmd_remove_liquidity(cli: &Cli, shares: Option<u64>, min_a: u64, min_b: u64) -> Result<()> {
    if shares == Some(0) {
        return Err(anyhow!("--shares must be > 0; omit it to exit the whole position"));
    }
    let provider = caller(cli)?;
    let mut client = open(cli)?;
    let result = client
        .remove_liquidity(&provider, RemoveParams { shares, min_a, min_b })
        .context("remove-liquidity failed")?;

    if cli.json {
        println!("{}", json!({
            "status":        "ok",
            "command":       "remove-liquidity",
            "provider":      result.provider,
            "shares_burned": result.shares_burned,
            "shares_left":   result.shares_left,
            "amount_a":      result.amount_a,
            "amount_b":      result.amount_b,
        }));
    } else {
        println!("─── Liquidity Removed ────────────────────────────────────────────");
        println!("  Provider         {}", result.provider);
        println!("  Shares burned    {:>20}", result.shares_burned);
        println!("  Shares left      {:>20}", result.shares_left);
        println!();
        println!("  ─── Withdrawn ────────────────────────────────────");
        println!("  Token A          {:>20}", result.amount_a);
        println!("  Token B          {:>20}", result.amount_b);
        println!();
        println!("  Pending rewards stay claimable: reward-swap claim-rewards");
    }
    Ok(())
}

// ─── swap ─────────────────────────────────────────────────────────────────────

fn cmd_swap(cli: &Cli, token_in: Side, amount_in: u64, max_slippage: f64) -> Result<()> {
    if amount_in == 0 {
        return Err(anyhow!("--amount must be > 0 (atomic units)"));
    }
    let max_slippage_bps = slippage_bps(max_slippage)?;
    let trader = caller(cli)?;
    let direction = token_in.selling();

    let mut client = open(cli)?;
    let result = client
        .convert(&trader, SwapParams { direction, amount_in, max_slippage_bps })
        .context("swap failed")?;

    if cli.json {
        println!("{}", json!({
            "status":         "ok",
            "command":        "swap",
            "trader":         result.trader,
            "direction":      result.direction,
            "amount_in":      result.amount_in,
            "estimated_out":  result.estimated_out,
            "min_amount_out": result.min_amount_out,
            "amount_out":     result.amount_out,
            "reward_fee":     result.reward_fee,
        }));
    } else {
        let sold = token_in.asset();
        let bought = output_side(direction);
        println!("─── Swap Executed ────────────────────────────────────────────────");
        println!("  Direction        {}", direction_label(direction));
        println!("  Trader           {}", result.trader);
        println!();
        println!("  ─── Output ───────────────────────────────────────");
        println!("  Sold             {:>20}  {sold}", result.amount_in);
        println!("  Received         {:>20}  {bought}", result.amount_out);
        println!("  Min accepted     {:>20}  {bought}  ({:.2}% slippage guard)",
                 result.min_amount_out, max_slippage);
        println!("  LP reward        {:>20}  (credited to LPs, not deducted)", result.reward_fee);
    }
    Ok(())
}

// ─── simulate ─────────────────────────────────────────────────────────────────

fn cmd_simulate(cli: &Cli, token_in: Side, amount_in: u64) -> Result<()> {
    if amount_in == 0 {
        return Err(anyhow!("--amount must be > 0 (atomic units)"));
    }
    let client = open(cli)?;
    let rate = client.pool().config().reward_rate_bps;
    let sim = client.simulate(token_in.selling(), amount_in).context("simulate failed")?;

    if cli.json {
        println!("{}", json!({
            "status":           "ok",
            "command":          "simulate",
            "direction":        sim.direction,
            "amount_in":        sim.amount_in,
            "estimated_out":    sim.amount_out,
            "reward_fee":       sim.fee,
            "reward_rate_bps":  rate,
            "reserve_in":       sim.reserve_in,
            "reserve_out":      sim.reserve_out,
            "reserve_a_after":  sim.reserves_after.0,
            "reserve_b_after":  sim.reserves_after.1,
            "effective_rate":   sim.effective_rate,
            "price_impact_pct": sim.price_impact_pct,
        }));
    } else {
        let sold = token_in.asset();
        let bought = output_side(sim.direction);
        println!("─── Swap Simulation ──────────────────────────────────────────────");
        println!("  {}", direction_label(sim.direction));
        println!("  Reserve in       {:>20}", sim.reserve_in);
        println!("  Reserve out      {:>20}", sim.reserve_out);
        println!();
        println!("  ─── Output Estimate ──────────────────────────────");
        println!("  Amount in        {:>20}  {sold}", sim.amount_in);
        println!("  Estimated out    {:>20}  {bought}", sim.amount_out);
        println!("  LP reward        {:>20}  ({:.2}%  →  LPs)", sim.fee, rate as f64 / 100.0);
        println!("  Effective rate   {:>20.8}  {bought}/{sold} (raw units)", sim.effective_rate);
        println!("  Price impact     {:>19.4}%", sim.price_impact_pct);
        println!();
        println!("  Nothing written.  To execute:");
        println!("    reward-swap swap --in {sold} --amount {amount_in}");
    }
    Ok(())
}

// ─── pool-info ────────────────────────────────────────────────────────────────

fn cmd_pool_info(cli: &Cli) -> Result<()> {
    let info = open(cli)?.pool_info();

    if cli.json {
        println!("{}", json!({
            "status":               "ok",
            "command":              "pool-info",
            "owner":                info.owner,
            "pool_address":         info.pool_address,
            "token_a":              info.token_a,
            "token_b":              info.token_b,
            "reward_token":         info.reward_token,
            "reserve_a":            info.reserve_a,
            "reserve_b":            info.reserve_b,
            "total_shares":         info.total_shares,
            "reward_rate_bps":      info.reward_rate_bps,
            "acc_reward_per_share": info.acc_reward_per_share.to_string(),
            "spot_price":           info.spot_price,
            "providers":            info.providers,
        }));
    } else {
        let unset = || "(unset)".to_string();
        println!("─── Pool Info ────────────────────────────────────────────────────");
        println!("  Owner            {}", info.owner);
        println!("  Pool address     {}", info.pool_address);
        println!("  Token A          {}", info.token_a.map(|a| a.to_string()).unwrap_or_else(unset));
        println!("  Token B          {}", info.token_b.map(|a| a.to_string()).unwrap_or_else(unset));
        println!("  Reward token     {}", info.reward_token.map(|a| a.to_string()).unwrap_or_else(unset));
        println!();
        println!("  ─── Reserves ─────────────────────────────────────");
        println!("  Reserve A        {:>20}", info.reserve_a);
        println!("  Reserve B        {:>20}", info.reserve_b);
        println!("  Spot price       {:>20.8}  B per A (raw units)", info.spot_price);
        println!("  LP shares        {:>20}", info.total_shares);
        println!("  Providers        {:>20}", info.providers);
        println!();
        println!("  ─── Rewards ──────────────────────────────────────");
        println!("  Reward rate      {:>16} bps  ({:.2}%)",
                 info.reward_rate_bps, info.reward_rate_bps as f64 / 100.0);
        println!("  Acc. per share   {:>20}  (× 1e18)", info.acc_reward_per_share);
    }
    Ok(())
}

// ─── my-position ──────────────────────────────────────────────────────────────

fn cmd_my_position(cli: &Cli) -> Result<()> {
    let provider = caller(cli)?;
    let position = open(cli)?.my_position(&provider).context("position lookup failed")?;

    if cli.json {
        println!("{}", json!({
            "status":   "ok",
            "command":  "my-position",
            "position": position,
        }));
    } else {
        println!("─── My Position ──────────────────────────────────────────────────");
        println!("  Provider         {}", position.provider);
        println!();
        if position.shares == 0 && position.pending_reward == 0 {
            println!("  No LP position.");
            println!("  Run `reward-swap provide --amount <AMT>` to become an LP.");
            return Ok(());
        }
        println!("  LP shares        {:>20}  ({:.4}% of pool)", position.shares, position.pool_share_pct);
        println!("  Redeemable A     {:>20}", position.redeemable_a);
        println!("  Redeemable B     {:>20}", position.redeemable_b);
        println!();
        println!("  ─── Rewards ──────────────────────────────────────");
        println!("  Pending          {:>20}", position.pending_reward);
        println!("  Claimed so far   {:>20}", position.reward_balance);
        if position.pending_reward > 0 {
            println!();
            println!("  To claim: reward-swap claim-rewards");
        }
    }
    Ok(())
}

// ─── claim-rewards ────────────────────────────────────────────────────────────

fn cmd_claim_rewards(cli: &Cli) -> Result<()> {
    let provider = caller(cli)?;
    let mut client = open(cli)?;
    let result = client.claim_rewards(&provider).context("claim-rewards failed")?;

    if cli.json {
        println!("{}", json!({
            "status":   "ok",
            "command":  "claim-rewards",
            "provider": result.provider,
            "amount":   result.amount,
        }));
    } else {
        println!("─── Rewards Claimed ──────────────────────────────────────────────");
        println!("  Provider         {}", result.provider);
        println!("  Minted           {:>20}  reward", result.amount);
    }
    Ok(())
}

// ─── set-rate ─────────────────────────────────────────────────────────────────

fn cmd_set_rate(cli: &Cli, bps: u16) -> Result<()> {
    let owner = caller(cli)?;
    let mut client = open(cli)?;
    let info = client.set_reward_rate(&owner, bps).context("set-rate failed")?;

    if cli.json {
        println!("{}", json!({
            "status":          "ok",
            "command":         "set-rate",
            "reward_rate_bps": info.reward_rate_bps,
        }));
    } else {
        println!("─── Reward Rate Updated ──────────────────────────────────────────");
        println!("  Reward rate      {:>16} bps  ({:.2}%)",
                 info.reward_rate_bps, info.reward_rate_bps as f64 / 100.0);
    }
    Ok(())
}

// ─── emergency-withdraw ───────────────────────────────────────────────────────

fn cmd_emergency_withdraw(cli: &Cli, asset: Side, amount: u64) -> Result<()> {
    let owner = caller(cli)?;
    let mut client = open(cli)?;
    let result = client
        .emergency_withdraw(&owner, asset.asset(), amount)
        .context("emergency-withdraw failed")?;

    if cli.json {
        println!("{}", json!({
            "status":  "ok",
            "command": "emergency-withdraw",
            "asset":   result.asset,
            "to":      result.to,
            "amount":  result.amount,
        }));
    } else {
        println!("─── Surplus Withdrawn ────────────────────────────────────────────");
        println!("  Asset            {}", result.asset);
        println!("  Amount           {:>20}", result.amount);
        println!("  Sent to          {}", result.to);
    }
    Ok(())
}

// ─── history ──────────────────────────────────────────────────────────────────

fn cmd_history(cli: &Cli, limit: Option<usize>) -> Result<()> {
    let client = open(cli)?;
    let events = client.history();
    let shown = &events[events.len().saturating_sub(limit.unwrap_or(events.len()))..];

    if cli.json {
        println!("{}", json!({
            "status":  "ok",
            "command": "history",
            "total":   events.len(),
            "events":  shown,
        }));
        return Ok(());
    }

    println!("─── History ──────────────────────────────────────────────────────");
    if shown.is_empty() {
        println!("  No operations recorded.");
        return Ok(());
    }
    let first = events.len() - shown.len();
    for (i, event) in shown.iter().enumerate() {
        println!("  [{:>4}]  {}", first + i, describe(event));
    }
    println!();
    println!("  Showing {} of {} event(s)", shown.len(), events.len());
    Ok(())
}

fn describe(event: &PoolEvent) -> String {
    match event {
        PoolEvent::LiquidityAdded { provider, amount_a, amount_b, shares } => {
            format!("add      {provider}  +{amount_a} A  +{amount_b} B  → {shares} shares")
        }
        PoolEvent::LiquidityRemoved { provider, amount_a, amount_b, shares } => {
            format!("remove   {provider}  -{shares} shares  → {amount_a} A  {amount_b} B")
        }
        PoolEvent::Swapped { trader, direction, amount_in, amount_out, fee } => {
            format!(
                "swap     {trader}  {}  {amount_in} → {amount_out}  (reward {fee})",
                direction_label(*direction)
            )
        }
        PoolEvent::RewardsClaimed { provider, amount } => {
            format!("claim    {provider}  {amount} reward")
        }
        PoolEvent::RewardRateUpdated { reward_rate_bps } => {
            format!("rate     {reward_rate_bps} bps")
        }
        PoolEvent::TokenBound { slot, token } => {
            format!("bind     {slot:?} = {token}")
        }
        PoolEvent::EmergencyWithdrawal { asset, to, amount } => {
            format!("sweep    {amount} {asset} → {to}")
        }
    }
}

// ─── Shared utilities ─────────────────────────────────────────────────────────

fn caller(cli: &Cli) -> Result<Address> {
    cli.caller.as_deref().map(Address::from).ok_or_else(|| anyhow!(
        "No caller identity.\n  \
         Set REWARD_SWAP_CALLER or pass --caller <ID>."
    ))
}

fn open(cli: &Cli) -> Result<SwapClient> {
    tracing::debug!(state = %cli.state, "opening pool state");
    SwapClient::open(&cli.state)
        .with_context(|| format!("cannot open pool state '{}'", cli.state))
}
