use crate::branding::BrandingApplicator;
use crate::common::{InputError, execute_with_retry};
use crate::discovery::list_all_subsites;
use crate::input::read_site_list;
use crate::site::SiteApi;
use crate::site::urls::{belongs_to_tenant, region_hint, tenant_from_url};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// One site to brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTarget {
    pub url: String,
    pub is_site_collection: bool,
}

impl SiteTarget {
    pub fn site_collection(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_site_collection: true,
        }
    }

    pub fn subsite(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_site_collection: false,
        }
    }

    fn kind(&self) -> &'static str {
        if self.is_site_collection {
            "site collection"
        } else {
            "subsite"
        }
    }
}

/// Tallies accumulated over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub total_sites: usize,
    /// Site collections branded successfully
    pub site_collections_processed: usize,
    /// Subsites branded successfully
    pub subsites_processed: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

impl RunResult {
    fn record(&mut self, target: &SiteTarget, succeeded: bool) {
        if !succeeded {
            self.failure_count += 1;
            return;
        }

        self.success_count += 1;
        if target.is_site_collection {
            self.site_collections_processed += 1;
        } else {
            self.subsites_processed += 1;
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} site(s) total, {} site collection(s) and {} subsite(s) branded, {} succeeded, {} failed",
            self.total_sites,
            self.site_collections_processed,
            self.subsites_processed,
            self.success_count,
            self.failure_count
        )
    }
}

/// Warns about a site outside `tenant`. The site is still processed.
pub fn check_site_tenant(url: &str, tenant: &str) {
    match belongs_to_tenant(url, tenant) {
        Some(true) => {}
        Some(false) => log::warn!("{url} does not belong to the configured tenant '{tenant}'"),
        None => log::warn!("{url} does not look like a SharePoint Online URL"),
    }
}

/// Drives branding across every site collection of a run, one site at a time.
pub struct Orchestrator<'a, A: SiteApi + ?Sized> {
    api: &'a A,
    applicator: BrandingApplicator,
}

impl<'a, A: SiteApi + ?Sized> Orchestrator<'a, A> {
    pub fn new(api: &'a A, applicator: BrandingApplicator) -> Self {
        Self { api, applicator }
    }

    pub fn applicator(&self) -> &BrandingApplicator {
        &self.applicator
    }

    /// Reads the site list and runs over it. An unreadable list fails before
    /// any site is contacted.
    pub async fn run_from_file(&self, path: &Path) -> Result<RunResult, InputError> {
        let site_collections = read_site_list(path).inspect_err(|e| log::error!("{e}"))?;
        Ok(self.run(&site_collections).await)
    }

    /// Brands every site collection in order, plus their subsites when
    /// configured. A failing site never stops the run.
    pub async fn run(&self, site_collections: &[String]) -> RunResult {
        let mut result = RunResult::default();
        let tenant = tenant_from_url(self.applicator.admin_url());

        for (index, url) in site_collections.iter().enumerate() {
            log::info!(
                "Processing site collection {} of {}: {url}",
                index + 1,
                site_collections.len()
            );
            if let Some(tenant) = &tenant {
                check_site_tenant(url, tenant);
            }

            let targets = self.build_targets(url).await;
            result.total_sites += targets.len();

            for target in &targets {
                let succeeded = self.process_target(target).await;
                result.record(target, succeeded);
            }
        }

        log::info!("Run finished: {result}");
        result
    }

    /// The site collection itself followed by its subsites, if enabled.
    pub async fn build_targets(&self, site_collection_url: &str) -> Vec<SiteTarget> {
        let mut targets = vec![SiteTarget::site_collection(site_collection_url)];

        if self.applicator.config().process_subsites {
            let subsites = list_all_subsites(
                self.api,
                site_collection_url,
                self.applicator.retry_policy(),
            )
            .await;
            targets.extend(subsites.into_iter().map(SiteTarget::subsite));
        }

        targets
    }

    async fn process_target(&self, target: &SiteTarget) -> bool {
        let api = self.api;
        let url = target.url.as_str();

        match region_hint(url) {
            Some(region) => log::info!("Connecting to {} {url} (region: {region})", target.kind()),
            None => log::info!("Connecting to {} {url}", target.kind()),
        }

        if let Err(e) =
            execute_with_retry("connect", self.applicator.retry_policy(), move || {
                api.connect(url)
            })
            .await
        {
            log::error!("Failed to connect to {url}, skipping: {e}");
            return false;
        }

        let outcome = self.applicator.apply(api, url).await;
        api.disconnect().await;

        match outcome {
            Ok(()) => true,
            Err(e) => {
                log::error!("Branding failed for {url}: {e}");
                false
            }
        }
    }
}
