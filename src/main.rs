mod classify;
mod collectors;
mod config;
mod error;
mod input;
mod live;
mod models;
mod ui;
mod util;

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser};
use collectors::{monitor, DiskSource, FileSource, RemoteSource};
use config::{Config, MonitorConfig, Site};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use models::classification::ClassificationResult;
use models::server::ServerSnapshot;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdtop", about = "RAID physical disk report and rebuild monitor", version)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// Server to inspect, e.g. prx11a
    #[arg(required_unless_present = "print_config")]
    server: Option<String>,

    /// Short report: location, RAID health and disk counts
    #[arg(short, long, group = "mode")]
    compact: bool,

    /// Every field of every disk, serial numbers included
    #[arg(short, long, group = "mode")]
    serial: bool,

    /// Watch rebuild progress live until q is pressed
    #[arg(short, long, group = "mode")]
    progress: bool,

    /// Print the ticket templates even when no disk needs attention
    #[arg(short, long, group = "mode")]
    template: bool,

    /// Print a one-shot JSON snapshot and exit
    #[arg(long, group = "mode")]
    json: bool,

    /// Print config file path and current values, then exit
    #[arg(long, group = "mode")]
    print_config: bool,

    /// Refresh interval for --progress, in seconds (overrides the config)
    #[arg(short, long)]
    interval: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read the controller report from a file instead of the server
    #[arg(long, value_name = "FILE")]
    omreport_file: Option<PathBuf>,

    /// Read the inventory log from a file instead of the monitoring server
    #[arg(long, value_name = "FILE")]
    hinv_file: Option<PathBuf>,

    /// Read the disk health log from a file instead of the monitoring server
    #[arg(long, value_name = "FILE")]
    hwdisk_file: Option<PathBuf>,

    /// Color theme for --progress: default, mono
    #[arg(long, default_value = "default")]
    theme: String,

    /// More logging (debug level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None       => Config::load(),
    };

    if cli.print_config {
        init_tracing(cli.verbose, None);
        return run_print_config(&cfg, cli.config.as_deref());
    }

    let host = cli.server.clone().context("no server given")?;
    let cluster = util::host::cluster_letter(&host)
        .ok_or_else(|| anyhow!("server name not valid: {}", host))?;
    let site = cfg.site(&cluster)
        .cloned()
        .ok_or_else(|| anyhow!("cluster {} is not in the [sites] table", cluster))?;

    let source: Box<dyn DiskSource> = match &cli.omreport_file {
        Some(path) => Box::new(FileSource(path.clone())),
        None       => Box::new(RemoteSource { host: host.clone(), config: cfg.remote.clone() }),
    };

    if cli.progress {
        init_tracing(cli.verbose, Some(Config::log_path()));
        let interval = cli.interval.unwrap_or(cfg.general.refresh_interval_secs);
        return run_progress(&host, &cfg, interval, &cli.theme, source);
    }

    init_tracing(cli.verbose, None);
    let snap = collect_snapshot(&cli, &cfg, host, cluster, source);

    if cli.json {
        run_json_snapshot(&snap)?;
    } else {
        print!("{}", util::report::header(&snap, &site));
        if cli.compact {
            print!("{}", util::report::compact(&snap));
        } else {
            print!("{}", util::report::location(&snap, &site));
            if cli.serial {
                print!("{}", util::report::serial(&snap));
            } else {
                print!("{}", util::report::full(&snap, &site, &cfg.templates, cli.template));
            }
        }
    }

    if !snap.disks.reachable {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr, or to `log_file` when the terminal is taken.
/// `Some(None)` means the terminal is taken but there is nowhere to log.
fn init_tracing(verbose: u8, log_file: Option<Option<PathBuf>>) {
    let default = if verbose > 0 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match log_file {
        None => builder.with_writer(io::stderr).try_init(),
        Some(path) => match path.and_then(|p| open_log(&p)) {
            Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
            None       => builder.with_writer(io::sink).try_init(),
        },
    };
}

fn open_log(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Monitoring-system text for `test`, or the contents of `file` when given.
fn monitor_text(file: Option<&Path>, cfg: &MonitorConfig, host: &str, test: &str) -> String {
    match file {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => monitor::clean_markup(&text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read {} log file", test);
                String::new()
            }
        },
        None => monitor::query_or_empty(cfg, host, test),
    }
}

fn collect_snapshot(
    cli: &Cli,
    cfg: &Config,
    host: String,
    cluster: String,
    mut source: Box<dyn DiskSource>,
) -> ServerSnapshot {
    let hinv_text   = monitor_text(cli.hinv_file.as_deref(),   &cfg.monitor, &host, "hinv");
    let hwdisk_text = monitor_text(cli.hwdisk_file.as_deref(), &cfg.monitor, &host, "hw-disk");
    let disks = collectors::poll_cycle(source.as_mut());
    info!(%host, reachable = disks.reachable, disks = disks.all.len(), "collected");

    ServerSnapshot {
        inventory:     collectors::hinv::extract_inventory(&hinv_text),
        self_test:     collectors::hwdisk::extract_self_test(&hwdisk_text),
        self_test_log: hwdisk_text,
        host,
        cluster,
        disks,
    }
}

fn run_json_snapshot(snap: &ServerSnapshot) -> Result<()> {
    use serde_json::json;

    let out = json!({
        "pdtop_version": env!("CARGO_PKG_VERSION"),
        "timestamp":     chrono::Local::now().to_rfc3339(),
        "server":        snap,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_print_config(cfg: &Config, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  refresh_interval_secs = {}", cfg.general.refresh_interval_secs);
    println!("  tick_ms               = {}", cfg.general.tick_ms);
    println!();
    println!("[monitor]");
    println!("  host         = {}", cfg.monitor.host);
    println!("  port         = {}", cfg.monitor.port);
    println!("  timeout_secs = {}", cfg.monitor.timeout_secs);
    println!();
    println!("[remote]");
    println!("  ssh                  = {}", cfg.remote.ssh);
    println!("  command              = {}", cfg.remote.command);
    println!("  connect_timeout_secs = {}", cfg.remote.connect_timeout_secs);
    println!("  timeout_secs         = {}", cfg.remote.timeout_secs);
    println!();
    println!("[templates]");
    println!("  status_url = {}", cfg.templates.status_url);
    println!("  log_url    = {}", cfg.templates.log_url);
    println!();
    println!("[sites]");
    if cfg.sites.is_empty() {
        println!("  (none)");
    }
    for (letter, site) in &cfg.sites {
        print_site(letter, site);
    }
    Ok(())
}

fn print_site(letter: &str, site: &Site) {
    println!("  {} → {} ({})  {}", letter, site.name, site.code, site.url);
}

fn run_progress(
    host: &str,
    cfg: &Config,
    interval: u32,
    theme: &str,
    source: Box<dyn DiskSource>,
) -> Result<()> {
    let theme = ui::theme::Theme::for_variant(ui::theme::ThemeVariant::from_name(theme));

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let result = run_live(host, cfg, interval, theme, source);
    restore_terminal()?;
    let last = result?;
    print!("{}", util::report::rebuilding_summary(&last));
    Ok(())
}

fn run_live(
    host: &str,
    cfg: &Config,
    interval: u32,
    theme: ui::theme::Theme,
    mut source: Box<dyn DiskSource>,
) -> Result<ClassificationResult> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let screen = ui::progress::TerminalScreen::new(term, theme);
    let cadence = live::Cadence::from_secs(interval, Duration::from_millis(cfg.general.tick_ms));
    let waiter = ui::progress::KeyWaiter::new(cadence.unit);
    let poller = move || collectors::poll_cycle(source.as_mut());
    info!(%host, interval, units = cadence.units, unit_ms = cadence.unit.as_millis() as u64,
          "live refresh started");
    live::LiveRefresh::new(host, cadence, poller, screen, waiter).run()
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["pdtop", "prx11a", "-c", "-s"]).is_err());
        let cli = Cli::try_parse_from(["pdtop", "prx11a", "-p", "-i", "30"]).unwrap();
        assert!(cli.progress);
        assert_eq!(cli.interval, Some(30));
    }

    #[test]
    fn server_required_except_for_print_config() {
        assert!(Cli::try_parse_from(["pdtop"]).is_err());
        assert!(Cli::try_parse_from(["pdtop", "--print-config"]).is_ok());
    }

    #[test]
    fn offline_files_feed_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("omreport.txt");
        let hinv = dir.path().join("hinv.txt");
        let hwdisk = dir.path().join("hwdisk.txt");
        fs::write(&report, collectors::omreport::SAMPLE_REPORT).unwrap();
        fs::write(&hinv, collectors::hinv::SAMPLE_HINV).unwrap();
        fs::write(&hwdisk, collectors::hwdisk::SAMPLE_HWDISK).unwrap();

        let cli = Cli::try_parse_from([
            "pdtop", "prx11a",
            "--omreport-file", report.to_str().unwrap(),
            "--hinv-file", hinv.to_str().unwrap(),
            "--hwdisk-file", hwdisk.to_str().unwrap(),
        ]).unwrap();
        let source: Box<dyn DiskSource> = Box::new(FileSource(report));
        let snap = collect_snapshot(&cli, &Config::default(), "prx11a".into(), "A".into(), source);

        assert!(snap.disks.reachable);
        assert_eq!(snap.disks.all.len(), 3);
        assert_eq!(snap.disks.rebuilding.len(), 1);
        assert_eq!(snap.inventory.model.as_deref(), Some("PowerEdge R720"));
        assert_eq!(snap.self_test.raid_status, "Degraded");
    }

    #[test]
    fn missing_report_file_is_unreachable() {
        let cli = Cli::try_parse_from([
            "pdtop", "prx11a",
            "--hinv-file", "/nonexistent/hinv",
            "--hwdisk-file", "/nonexistent/hwdisk",
        ]).unwrap();
        let source: Box<dyn DiskSource> = Box::new(FileSource("/nonexistent/omreport".into()));
        let snap = collect_snapshot(&cli, &Config::default(), "prx11a".into(), "A".into(), source);
        assert!(!snap.disks.reachable);
        assert_eq!(snap.inventory.model, None);
    }
}
