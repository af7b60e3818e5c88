use anyhow::{Context, bail};
use clap::Parser;
use engine::auth::{AuthProvider, AzureAdProvider};
use engine::input::read_site_list;
use engine::orchestrator::check_site_tenant;
use engine::site::urls::admin_url;
use engine::{BrandingApplicator, Orchestrator, SharePointClient};
use sitebrand::args::Args;
use sitebrand::config::{self, AppConfig};
use sitebrand::{logger, summary};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config: AppConfig = config::load_config(args.config.as_deref())
        .into_result()
        .map_err(anyhow::Error::msg)?;
    app_config.apply_overrides(&args);

    logger::setup_logger(app_config.logging()).context("Failed to initialize logger")?;

    if let Err(errors) = app_config.validate() {
        for error in &errors {
            log::error!("{}", error.user_message());
        }
        bail!("Configuration validation failed with {} error(s)", errors.len());
    }

    let tenant_name = app_config.tenant().name().unwrap_or_default();
    let applicator = BrandingApplicator::new(app_config.branding().clone(), admin_url(tenant_name));

    if args.dry_run {
        let sites = read_site_list(&args.input).inspect_err(|e| log::error!("{e}"))?;
        for url in &sites {
            check_site_tenant(url, tenant_name);
        }
        for line in summary::plan_lines(&applicator, &sites) {
            log::info!("{line}");
        }
        return Ok(());
    }

    let auth_config = app_config
        .tenant()
        .auth_config()
        .context("Failed to prepare authentication")?;
    let client_id = auth_config.client_id.clone();
    let provider = AzureAdProvider::new(auth_config).context("Invalid authentication settings")?;
    log::info!(
        "Authenticating as app {client_id} using {:?} credentials",
        provider.auth_type()
    );
    let client = SharePointClient::new(Arc::new(provider));

    let started = chrono::Local::now();
    let result = Orchestrator::new(&client, applicator)
        .run_from_file(&args.input)
        .await?;
    let elapsed = chrono::Local::now() - started;

    for line in summary::summary_lines(&result, elapsed) {
        log::info!("{line}");
    }
    if result.failure_count > 0 {
        log::warn!(
            "{} site(s) failed, see the log above for details",
            result.failure_count
        );
    }

    Ok(())
}
