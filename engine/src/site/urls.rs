use reqwest::Url;

const SHAREPOINT_SUFFIX: &str = ".sharepoint.com";

/// Multi-geo location codes SharePoint appends to the tenant host label.
const GEO_CODES: [(&str, &str); 16] = [
    ("apc", "Asia-Pacific"),
    ("are", "United Arab Emirates"),
    ("aus", "Australia"),
    ("bra", "Brazil"),
    ("can", "Canada"),
    ("che", "Switzerland"),
    ("deu", "Germany"),
    ("eur", "Europe"),
    ("fra", "France"),
    ("gbr", "United Kingdom"),
    ("ind", "India"),
    ("jpn", "Japan"),
    ("kor", "Korea"),
    ("nam", "North America"),
    ("nor", "Norway"),
    ("zaf", "South Africa"),
];

/// Tenant admin endpoint for the given tenant short name.
pub fn admin_url(tenant: &str) -> String {
    format!("https://{}-admin{SHAREPOINT_SUFFIX}", tenant.trim().to_lowercase())
}

/// Strips a trailing slash so URLs can be joined with `/_api/...`.
pub fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn host_label(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    host.strip_suffix(SHAREPOINT_SUFFIX).map(str::to_string)
}

/// Tenant short name from a SharePoint Online URL.
///
/// `https://contoso.sharepoint.com/sites/hr` and
/// `https://contoso-admin.sharepoint.com` both give `contoso`.
pub fn tenant_from_url(url: &str) -> Option<String> {
    let label = host_label(url)?;
    let tenant = label
        .strip_suffix("-admin")
        .or_else(|| label.strip_suffix("-my"))
        .unwrap_or(&label);
    (!tenant.is_empty()).then(|| tenant.to_string())
}

/// Descriptive geo location when the host carries a multi-geo suffix of
/// the form `<tenant>-<geo>`, e.g. `contoso-eur`.
///
/// Only used for logging; connections always go to the URL as given.
pub fn region_hint(url: &str) -> Option<&'static str> {
    let label = host_label(url)?;
    let label = label.trim_end_matches("-admin").trim_end_matches("-my");
    GEO_CODES.iter().find_map(|(code, region)| {
        let tenant = label.strip_suffix(code)?.strip_suffix('-')?;
        (!tenant.is_empty()).then_some(*region)
    })
}

/// Whether `url` is a site of `tenant`, counting its multi-geo satellites.
///
/// `None` when the URL is not a SharePoint Online URL.
pub fn belongs_to_tenant(url: &str, tenant: &str) -> Option<bool> {
    let site_tenant = tenant_from_url(url)?;
    let rest = match site_tenant.strip_prefix(tenant.to_lowercase().as_str()) {
        Some(rest) => rest,
        None => return Some(false),
    };
    Some(rest.is_empty() || (rest.starts_with('-') && region_hint(url).is_some()))
}

/// Doubles single quotes so a value can sit inside an OData string literal.
pub fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}
