use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    cli::args::Cli,
    config::{ConfigLoader, GlobalConfig, Wordlist},
    core::{
        baseline,
        errors::VhostError,
        models::{DiscoveryReport, Target},
        prober::HttpProber,
        scheduler,
        state::{RunEvent, RunState},
    },
    resolver::{ClientResolver, HostsFileResolver, NameResolver},
    ui::{events::UiEvent, printer, progress::ProgressManager},
    utils::{logging, net},
};

pub async fn run(cli: Cli) -> Result<DiscoveryReport, VhostError> {
    logging::init(logging::level_from_cli(&cli))?;

    // Nothing below touches the environment until every input is validated.
    let ip = net::parse_ipv4(&cli.target_ip).ok_or_else(|| {
        VhostError::Usage(format!("the IP address entered is not valid: {}", cli.target_ip))
    })?;
    let config = load_config(&cli)?;
    let wordlist_path = Wordlist::resolve(&cli.wordlist, &config.wordlists)
        .map_err(|e| VhostError::Usage(format!("{:#}", e)))?;
    let wordlist = Wordlist::load(&wordlist_path)?;
    let target = Target::new(ip, cli.domain.clone(), cli.protocol()).with_port(cli.port);

    tracing::info!("Starting vhostcrawler against {} ({})", target.domain, target.ip);

    let hosts = match cli.hosts_override() {
        None => None,
        Some(path) => {
            let path = path.unwrap_or_else(|| config.hosts.path.clone());
            printer::print_hosts_warning(&path);
            Some(Arc::new(HostsFileResolver::prepare(path, &config.hosts.backup_suffix)?))
        }
    };
    let resolver: Arc<dyn NameResolver> = match &hosts {
        Some(hosts) => Arc::clone(hosts) as Arc<dyn NameResolver>,
        None => Arc::new(ClientResolver),
    };

    printer::print_banner(&target, resolver.name(), config.concurrency.max_workers);

    let (ui_sender, ui_receiver) = mpsc::unbounded_channel();
    let ui = ProgressManager::spawn(cli.no_progress, ui_receiver);
    let mut state = RunState::new(target);

    let result = tokio::select! {
        res = execute(&mut state, resolver, &config, wordlist.candidates, &ui_sender) => res,
        _ = wait_for_interrupt() => Err(VhostError::Interrupted),
    };
    if let Err(e) = &result {
        state.on_event(RunEvent::Aborted(e.to_string()));
    }
    tracing::debug!("Run ended in phase {:?}", state.phase);

    let _ = ui_sender.send(UiEvent::Shutdown);
    drop(ui_sender);
    if let Err(e) = ui.await {
        tracing::warn!("UI task ended abnormally: {}", e);
    }

    conclude(result, hosts.as_deref())
}

/// Every exit path, normal or not, funnels through here: the hosts file is
/// put back before the outcome is reported. A failed restore only surfaces
/// when the run itself succeeded.
pub fn conclude(
    result: Result<DiscoveryReport, VhostError>,
    hosts: Option<&HostsFileResolver>,
) -> Result<DiscoveryReport, VhostError> {
    if let Some(hosts) = hosts {
        match hosts.restore() {
            Ok(true) => println!("[+] Restored {}", hosts.path().display()),
            Ok(false) => {}
            Err(e) => {
                printer::print_error(&format!("[!] {:#}", e));
                return Err(result.err().unwrap_or(VhostError::Environment(format!("{:#}", e))));
            }
        }
    }

    let report = result?;
    printer::print_summary(&report);
    Ok(report)
}

/// Baseline, then discovery. `state` records how far the run got.
pub async fn execute(
    state: &mut RunState,
    resolver: Arc<dyn NameResolver>,
    config: &GlobalConfig,
    candidates: Vec<String>,
    ui_sender: &mpsc::UnboundedSender<UiEvent>,
) -> Result<DiscoveryReport, VhostError> {
    let target = Arc::new(state.target.clone());

    let baseline = baseline::establish(&target, resolver.as_ref(), &config.http).await?;
    state.on_event(RunEvent::BaselineEstablished(baseline));
    let _ = ui_sender.send(UiEvent::BaselineEstablished {
        url: target.url_for(&target.domain),
        baseline,
    });

    let _ = ui_sender.send(UiEvent::Status {
        message: "[..] Starting subdomain discovery...".to_string(),
    });
    state.on_event(RunEvent::DiscoveryStarted { total: candidates.len() });

    let prober = Arc::new(HttpProber::new(
        Arc::clone(&target),
        baseline,
        resolver,
        config.http.clone(),
        &config.filter,
    ));
    let report = scheduler::discover(prober, candidates, config.concurrency.max_workers, ui_sender).await?;

    state.on_event(RunEvent::DiscoveryFinished(report.clone()));
    Ok(report)
}

fn load_config(cli: &Cli) -> Result<GlobalConfig, VhostError> {
    let mut config =
        ConfigLoader::load_with_custom_path(cli.config.as_deref()).map_err(VhostError::Config)?;

    if let Some(threads) = cli.threads {
        if threads == 0 {
            return Err(VhostError::Usage("--threads must be greater than 0".to_string()));
        }
        config.concurrency.max_workers = threads;
    }
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            return Err(VhostError::Usage("--timeout must be greater than 0".to_string()));
        }
        config.http.timeout_secs = timeout;
    }

    Ok(config)
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run simply
/// cannot be interrupted.
async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::warn!("Interrupt received, aborting run");
}
