use crate::common::InputError;
use std::path::Path;

const URL_COLUMN: &str = "URL";

/// Reads the site collection URLs from a CSV file with a `URL` column.
///
/// The header match ignores case. A row without a URL is an error for the
/// whole file rather than a skipped row, and so is a file with no rows.
pub fn read_site_list(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let read_error = |source| InputError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    let headers = reader.headers().map_err(read_error)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(InputError::Empty(path.to_path_buf()));
    }

    let url_index = headers
        .iter()
        .position(|header| {
            header
                .trim_start_matches('\u{feff}')
                .eq_ignore_ascii_case(URL_COLUMN)
        })
        .ok_or_else(|| InputError::MissingUrlColumn(path.to_path_buf()))?;

    let mut urls = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        match record.get(url_index).filter(|url| !url.is_empty()) {
            Some(url) => urls.push(url.to_string()),
            None => {
                return Err(InputError::MissingUrl {
                    path: path.to_path_buf(),
                    // header is line 1
                    row: index + 2,
                });
            }
        }
    }

    if urls.is_empty() {
        return Err(InputError::Empty(path.to_path_buf()));
    }

    log::info!("Loaded {} site collection(s) from {}", urls.len(), path.display());
    Ok(urls)
}
