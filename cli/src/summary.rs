use engine::{BrandingApplicator, RunResult};

/// What a run would do, without contacting anything.
pub fn plan_lines(applicator: &BrandingApplicator, sites: &[String]) -> Vec<String> {
    let config = applicator.config();
    let mut lines = vec![format!("Dry run: {} site collection(s)", sites.len())];
    lines.extend(sites.iter().map(|url| format!("  {url}")));

    if config.process_subsites {
        lines.push("Subsites: discovered at run time and branded too".to_string());
    }

    match (&config.logo_path, config.change_logo) {
        (Some(path), true) => lines.push(format!(
            "Logo: upload {} to {}",
            path.display(),
            config.asset_container
        )),
        _ => lines.push("Logo: unchanged".to_string()),
    }

    match applicator.resolved_theme() {
        Some(theme) => {
            let action = if config.apply_existing_theme {
                "apply existing"
            } else {
                "create and apply"
            };
            lines.push(format!(
                "Theme: {action} '{}' using the {} palette",
                theme.name,
                theme.palette.name()
            ));
        }
        None => lines.push("Theme: unchanged".to_string()),
    }

    lines.push(format!("Admin endpoint: {}", applicator.admin_url()));
    lines
}

/// Final tallies of a run.
pub fn summary_lines(result: &RunResult, elapsed: chrono::Duration) -> Vec<String> {
    let seconds = elapsed.num_seconds();
    vec![
        "Branding run summary".to_string(),
        format!("  Total sites:                {}", result.total_sites),
        format!(
            "  Site collections processed: {}",
            result.site_collections_processed
        ),
        format!("  Subsites processed:         {}", result.subsites_processed),
        format!("  Succeeded:                  {}", result.success_count),
        format!("  Failed:                     {}", result.failure_count),
        format!(
            "  Elapsed:                    {:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::BrandingConfig;
    use std::path::PathBuf;

    #[test]
    fn test_plan_mentions_logo_theme_and_sites() {
        let applicator = BrandingApplicator::new(
            BrandingConfig {
                logo_path: Some(PathBuf::from("logo.png")),
                color_theme_name: "Purple".to_string(),
                ..Default::default()
            },
            "https://contoso-admin.sharepoint.com",
        );
        let sites = vec!["https://contoso.sharepoint.com/sites/hr".to_string()];

        let lines = plan_lines(&applicator, &sites);

        assert_eq!(lines[0], "Dry run: 1 site collection(s)");
        assert!(lines.contains(&"  https://contoso.sharepoint.com/sites/hr".to_string()));
        assert!(lines.contains(&"Logo: upload logo.png to SiteAssets".to_string()));
        assert!(lines.contains(
            &"Theme: create and apply 'Corporate Theme' using the Purple palette".to_string()
        ));
    }

    #[test]
    fn test_summary_elapsed_format() {
        let result = RunResult {
            total_sites: 4,
            site_collections_processed: 2,
            subsites_processed: 1,
            success_count: 3,
            failure_count: 1,
        };
        let lines = summary_lines(&result, chrono::Duration::seconds(3725));
        assert!(lines.iter().any(|line| line.ends_with("01:02:05")));
        assert!(lines.iter().any(|line| line.ends_with("Failed:                     1")));
    }
}
