mod support;

use claims::{assert_err, assert_ok};
use engine::common::InputError;
use engine::{BrandingApplicator, BrandingConfig, Orchestrator, RunResult, SiteTarget};
use std::io::Write;
use support::{ADMIN_URL, ScriptedSite};

const HR: &str = "https://contoso.sharepoint.com/sites/hr";
const IT: &str = "https://contoso.sharepoint.com/sites/it";
const FINANCE: &str = "https://contoso-eur.sharepoint.com/sites/finance";

/// Theme only, so no logo file is needed.
fn theme_only(process_subsites: bool) -> BrandingApplicator {
    BrandingApplicator::new(
        BrandingConfig {
            change_logo: false,
            process_subsites,
            theme_name: "Brand".to_string(),
            max_retries: 0,
            ..Default::default()
        },
        ADMIN_URL,
    )
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|url| url.to_string()).collect()
}

mod isolation {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_site_does_not_stop_the_run() {
        let site = ScriptedSite::new().unreachable(IT);
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        let result = orchestrator.run(&urls(&[HR, IT, FINANCE])).await;

        assert_eq!(
            result,
            RunResult {
                total_sites: 3,
                site_collections_processed: 2,
                subsites_processed: 0,
                success_count: 2,
                failure_count: 1,
            }
        );
        let calls = site.calls();
        assert!(calls.contains(&format!("connect:{HR}")));
        assert!(calls.contains(&format!("connect:{IT}")));
        assert!(calls.contains(&format!("connect:{FINANCE}")));
        assert_eq!(site.count("apply_theme"), 2);
    }

    #[tokio::test]
    async fn test_branding_failure_still_disconnects() {
        let site = ScriptedSite::new().unreachable(ADMIN_URL);
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        let result = orchestrator.run(&urls(&[HR, IT])).await;

        assert_eq!(result.failure_count, 2);
        assert_eq!(result.success_count, 0);
        assert_eq!(site.count("disconnect"), 2);
        assert_eq!(site.connected_to(), None);
    }

    #[tokio::test]
    async fn test_every_target_ends_disconnected() {
        let site = ScriptedSite::new();
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        orchestrator.run(&urls(&[HR, IT])).await;

        let calls = site.calls();
        assert_eq!(calls.last().map(String::as_str), Some("disconnect"));
        assert_eq!(site.count("disconnect"), 2);
    }

    #[tokio::test]
    async fn test_nothing_to_brand_still_connects_each_site() {
        let site = ScriptedSite::new();
        let applicator = BrandingApplicator::new(
            BrandingConfig {
                change_logo: false,
                apply_theme_colors: false,
                ..Default::default()
            },
            ADMIN_URL,
        );
        let orchestrator = Orchestrator::new(&site, applicator);

        let result = orchestrator.run(&urls(&[HR])).await;

        assert_eq!(result.success_count, 1);
        assert_eq!(
            site.calls(),
            vec![format!("connect:{HR}"), "disconnect".to_string()]
        );
    }
}

mod subsites {
    use super::*;

    const HR_NEWS: &str = "https://contoso.sharepoint.com/sites/hr/news";
    const HR_NEWS_ARCHIVE: &str = "https://contoso.sharepoint.com/sites/hr/news/archive";

    #[tokio::test]
    async fn test_targets_include_discovered_subsites() {
        let site = ScriptedSite::new().with_subsites(HR, &[HR_NEWS, HR_NEWS_ARCHIVE]);
        let orchestrator = Orchestrator::new(&site, theme_only(true));

        let targets = orchestrator.build_targets(HR).await;

        assert_eq!(
            targets,
            vec![
                SiteTarget::site_collection(HR),
                SiteTarget::subsite(HR_NEWS),
                SiteTarget::subsite(HR_NEWS_ARCHIVE),
            ]
        );
        // discovery cleans up its own connection
        assert_eq!(site.connected_to(), None);
    }

    #[tokio::test]
    async fn test_subsites_are_branded_and_counted() {
        let site = ScriptedSite::new().with_subsites(HR, &[HR_NEWS, HR_NEWS_ARCHIVE]);
        let orchestrator = Orchestrator::new(&site, theme_only(true));

        let result = orchestrator.run(&urls(&[HR])).await;

        assert_eq!(result.total_sites, 3);
        assert_eq!(result.site_collections_processed, 1);
        assert_eq!(result.subsites_processed, 2);
        assert_eq!(result.success_count, 3);
        assert_eq!(site.count("apply_theme"), 3);
        // the root is connected once for discovery and again for branding
        let root_connects = site
            .calls()
            .iter()
            .filter(|call| *call == &format!("connect:{HR}"))
            .count();
        assert_eq!(root_connects, 3);
    }

    #[tokio::test]
    async fn test_subsites_ignored_when_disabled() {
        let site = ScriptedSite::new().with_subsites(HR, &[HR_NEWS]);
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        let targets = orchestrator.build_targets(HR).await;

        assert_eq!(targets, vec![SiteTarget::site_collection(HR)]);
        assert!(site.calls().is_empty());
    }

    #[tokio::test]
    async fn test_discovery_failure_keeps_the_site_collection() {
        let site = ScriptedSite::new().failing("list_subsites");
        let orchestrator = Orchestrator::new(&site, theme_only(true));

        let result = orchestrator.run(&urls(&[HR])).await;

        assert_eq!(result.total_sites, 1);
        assert_eq!(result.success_count, 1);
    }

    #[tokio::test]
    async fn test_unreachable_collection_is_counted_once() {
        let site = ScriptedSite::new().unreachable(HR);
        let orchestrator = Orchestrator::new(&site, theme_only(true));

        let result = orchestrator.run(&urls(&[HR])).await;

        assert_eq!(result.total_sites, 1);
        assert_eq!(result.failure_count, 1);
        assert_eq!(site.count("list_subsites"), 0);
    }
}

mod input {
    use super::*;

    #[tokio::test]
    async fn test_input_without_url_column_contacts_no_site() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Site,Owner").unwrap();
        writeln!(file, "{HR},hr-team").unwrap();
        file.flush().unwrap();

        let site = ScriptedSite::new();
        let orchestrator = Orchestrator::new(&site, theme_only(true));

        let error = assert_err!(orchestrator.run_from_file(file.path()).await);
        assert!(matches!(error, InputError::MissingUrlColumn(_)));
        assert!(site.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_file_contacts_no_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = ScriptedSite::new();
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        let error = assert_err!(orchestrator.run_from_file(&dir.path().join("sites.csv")).await);
        assert!(matches!(error, InputError::NotFound(_)));
        assert!(site.calls().is_empty());
    }

    #[tokio::test]
    async fn test_input_feeds_the_run_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "URL").unwrap();
        writeln!(file, "{FINANCE}").unwrap();
        writeln!(file, "{HR}").unwrap();
        file.flush().unwrap();

        let site = ScriptedSite::new();
        let orchestrator = Orchestrator::new(&site, theme_only(false));

        let result = assert_ok!(orchestrator.run_from_file(file.path()).await);

        assert_eq!(result.success_count, 2);
        assert_eq!(site.calls().first(), Some(&format!("connect:{FINANCE}")));
    }
}
