//! Downloadable CSV template for bulk user uploads

use crate::Result;
use matchdesk_services::TEMPLATE_HEADERS;
use std::path::Path;
use tracing::info;

/// File name the template is offered under
pub const TEMPLATE_FILE_NAME: &str = "user_upload_template.csv";

/// Example record, one value per template column
const EXAMPLE_ROW: [&str; 24] = [
    "Jane Doe",
    "jane.doe@example.com",
    "+1-555-0100",
    "28",
    "female",
    "male",
    "Coffee lover and weekend hiker",
    "Austin, TX",
    "30.2672",
    "-97.7431",
    "Product Designer",
    "Bachelor's",
    "168",
    "",
    "socially",
    "never",
    "long_term",
    "hiking;coffee;photography",
    "false",
    "https://example.com/photos/jane-1.jpg",
    "https://example.com/photos/jane-2.jpg",
    "",
    "",
    "",
];

/// Build the template: header row plus one example record
pub fn template_csv() -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADERS)?;
    writer.write_record(EXAMPLE_ROW)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::DashboardError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| crate::DashboardError::validation(e.to_string()))
}

/// Write the template to `path`
pub async fn write_template(path: &Path) -> Result<()> {
    let text = template_csv()?;
    tokio::fs::write(path, text).await?;
    info!(path = %path.display(), "Wrote bulk upload template");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use matchdesk_services::parse_csv_data;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_template_header_and_example() {
        let text = template_csv().unwrap();
        let mut lines = text.lines();

        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(header, TEMPLATE_HEADERS);
        assert_eq!(header.len(), 24);
        assert!(lines.next().unwrap().starts_with("Jane Doe,jane.doe@example.com"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_template_parses_and_validates() {
        let rows = parse_csv_data(&template_csv().unwrap()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].age, Some(28));
        assert_eq!(rows[0].photo_urls().len(), 2);
        assert!(rows[0].validate().is_ok());
    }

    #[tokio::test]
    async fn test_write_template_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TEMPLATE_FILE_NAME);

        write_template(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, template_csv().unwrap());
    }
}
