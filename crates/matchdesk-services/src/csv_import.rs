//! Spreadsheet parsing for bulk user uploads
//!
//! The column set is shared with the downloadable template so a filled-in
//! template always parses.

use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column names of the bulk upload spreadsheet, in template order
pub const TEMPLATE_HEADERS: [&str; 24] = [
    "name",
    "email",
    "phone",
    "age",
    "gender",
    "interested_in",
    "bio",
    "location",
    "latitude",
    "longitude",
    "occupation",
    "education",
    "height_cm",
    "religion",
    "drinking",
    "smoking",
    "relationship_goal",
    "interests",
    "is_verified",
    "photo_url_1",
    "photo_url_2",
    "photo_url_3",
    "photo_url_4",
    "photo_url_5",
];

/// Columns a spreadsheet must carry to be parsed at all
pub const REQUIRED_HEADERS: [&str; 2] = ["name", "email"];

/// Maximum photos a single row can attach
pub const MAX_PHOTOS_PER_USER: usize = 5;

/// Spreadsheet row number of the `index`-th data row; the header is row 1
pub const fn spreadsheet_row(index: usize) -> usize {
    index + 2
}

/// One user row of a bulk upload spreadsheet
///
/// Read from spreadsheet columns by their template names, sent to the admin
/// API with camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct UserCsvRow {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Self-reported gender
    pub gender: Option<String>,
    /// Gender(s) the user wants to see
    pub interested_in: Option<String>,
    /// Profile text
    pub bio: Option<String>,
    /// Location label
    pub location: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Job title
    pub occupation: Option<String>,
    /// Highest education
    pub education: Option<String>,
    /// Height in centimetres
    pub height_cm: Option<u32>,
    /// Religion
    pub religion: Option<String>,
    /// Drinking habit
    pub drinking: Option<String>,
    /// Smoking habit
    pub smoking: Option<String>,
    /// What the user is looking for
    pub relationship_goal: Option<String>,
    /// Semicolon separated interests
    pub interests: Option<String>,
    /// Whether to mark the profile verified
    pub is_verified: Option<bool>,
    /// First photo URL
    pub photo_url_1: Option<String>,
    /// Second photo URL
    pub photo_url_2: Option<String>,
    /// Third photo URL
    pub photo_url_3: Option<String>,
    /// Fourth photo URL
    pub photo_url_4: Option<String>,
    /// Fifth photo URL
    pub photo_url_5: Option<String>,
    /// Cells that could not be read as their column's type; those cells are left blank
    #[serde(skip)]
    pub cell_errors: Vec<String>,
}

impl UserCsvRow {
    /// Photo URLs in column order, skipping blanks
    pub fn photo_urls(&self) -> Vec<&str> {
        [
            &self.photo_url_1,
            &self.photo_url_2,
            &self.photo_url_3,
            &self.photo_url_4,
            &self.photo_url_5,
        ]
        .into_iter()
        .filter_map(|url| url.as_deref())
        .filter(|url| !url.trim().is_empty())
        .collect()
    }

    /// Interests split on `;`, trimmed, blanks dropped
    pub fn interest_list(&self) -> Vec<String> {
        self.interests
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// The row as JSON, attached to per-row upload errors
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Check the row before it is sent anywhere
    ///
    /// Returns the first problem found, phrased for the operator.
    pub fn validate(&self) -> Result<(), String> {
        if !self.cell_errors.is_empty() {
            return Err(self.cell_errors.join("; "));
        }
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !is_plausible_email(email) {
            return Err(format!("Invalid email address: {email}"));
        }
        if let Some(age) = self.age
            && !(18..=100).contains(&age)
        {
            return Err(format!("Age must be between 18 and 100, got {age}"));
        }
        if let Some(lat) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(format!("Latitude out of range: {lat}"));
        }
        if let Some(lon) = self.longitude
            && !(-180.0..=180.0).contains(&lon)
        {
            return Err(format!("Longitude out of range: {lon}"));
        }
        if let Some(url) = self
            .photo_urls()
            .into_iter()
            .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(format!("Photo URL must be http(s): {url}"));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy)]
enum CellKind {
    Whole,
    Decimal,
    Flag,
}

fn typed_column(column: &str) -> Option<CellKind> {
    match column {
        "age" | "height_cm" => Some(CellKind::Whole),
        "latitude" | "longitude" => Some(CellKind::Decimal),
        "is_verified" => Some(CellKind::Flag),
        _ => None,
    }
}

/// Read a yes/no cell the way spreadsheet tools write it
fn parse_flag(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Canonical text for a non-empty typed cell, or why it cannot be read
fn normalize_cell(kind: CellKind, cell: &str) -> Result<String, String> {
    match kind {
        CellKind::Whole => cell
            .parse::<u32>()
            .map(|_| cell.to_string())
            .map_err(|_| format!("expected a whole number, got \"{cell}\"")),
        CellKind::Decimal => cell
            .parse::<f64>()
            .map(|_| cell.to_string())
            .map_err(|_| format!("expected a number, got \"{cell}\"")),
        CellKind::Flag => parse_flag(cell)
            .map(|flag| String::from(if flag { "true" } else { "false" }))
            .ok_or_else(|| format!("expected true/false, yes/no or 1/0, got \"{cell}\"")),
    }
}

/// Parse spreadsheet text into user rows
///
/// Headers are matched case-insensitively against [`TEMPLATE_HEADERS`]; unknown
/// columns are ignored and missing optional columns parse as empty. Fully
/// blank lines are skipped. Yes/no columns accept `true`/`false`, `yes`/`no`
/// and `1`/`0` in any case.
///
/// A cell that cannot be read as its column's type does not fail the parse:
/// the cell is left blank and the problem is kept in
/// [`UserCsvRow::cell_errors`], so the row is reported on its own.
///
/// # Errors
///
/// Returns [`ServiceError::Csv`] when the header lacks a required column or
/// the text is not valid CSV.
pub fn parse_csv_data(text: &str) -> ServiceResult<Vec<UserCsvRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::csv(
            1,
            format!("missing required column(s): {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);

        let mut cell_errors = Vec::new();
        let cells: csv::StringRecord = record
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let Some(column) = headers.get(i) else {
                    return cell.to_string();
                };
                match typed_column(column) {
                    Some(kind) if !cell.is_empty() => normalize_cell(kind, cell)
                        .unwrap_or_else(|reason| {
                            cell_errors.push(format!("Invalid {column}: {reason}"));
                            String::new()
                        }),
                    _ => cell.to_string(),
                }
            })
            .collect();

        let mut row: UserCsvRow = cells
            .deserialize(Some(&headers))
            .map_err(|e| ServiceError::csv(line, e.to_string()))?;
        if !cell_errors.is_empty() {
            debug!(line, problems = cell_errors.len(), "Row has unreadable cells");
            row.cell_errors = cell_errors;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), "Parsed bulk upload spreadsheet");
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_template_has_24_columns() {
        assert_eq!(TEMPLATE_HEADERS.len(), 24);
        for required in REQUIRED_HEADERS {
            assert!(TEMPLATE_HEADERS.contains(&required));
        }
    }

    #[test]
    fn test_parse_maps_headers_to_fields() {
        let text = "name,email,age,location,interests,is_verified,photo_url_1,photo_url_3\n\
                    Ana Silva,ana@example.com,29,Lisbon,hiking; jazz ;,true,https://img.example.com/a.jpg,https://img.example.com/c.jpg\n";

        let rows = parse_csv_data(text).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Ana Silva");
        assert_eq!(row.email, "ana@example.com");
        assert_eq!(row.age, Some(29));
        assert_eq!(row.location.as_deref(), Some("Lisbon"));
        assert_eq!(row.is_verified, Some(true));
        assert_eq!(row.interest_list(), vec!["hiking", "jazz"]);
        assert_eq!(
            row.photo_urls(),
            vec!["https://img.example.com/a.jpg", "https://img.example.com/c.jpg"]
        );
        assert!(row.phone.is_none());
    }

    #[test]
    fn test_parse_handles_bom_case_and_blank_cells() {
        let text = "\u{feff}Name,EMAIL,Age,Phone\nBo,bo@example.com,,\n\nCy,cy@example.com,41,555-0101\n";

        let rows = parse_csv_data(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].age, None);
        assert_eq!(rows[0].phone, None);
        assert_eq!(rows[1].age, Some(41));
        assert_eq!(rows[1].phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn test_parse_short_rows_are_padded() {
        let text = "name,email,age,gender\nDee,dee@example.com\n";
        let rows = parse_csv_data(text).unwrap();
        assert_eq!(rows[0].name, "Dee");
        assert!(rows[0].gender.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_required_columns() {
        let err = parse_csv_data("name,phone\nEve,555\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV error on line 1: missing required column(s): email"
        );
    }

    #[test]
    fn test_parse_keeps_rows_around_a_bad_cell() {
        let text = "name,email,age\nAna,ana@example.com,31\nFay,fay@example.com,twenty\nGil,gil@example.com,44\n";

        let rows = parse_csv_data(text).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].cell_errors.is_empty());
        assert_eq!(rows[1].name, "Fay");
        assert_eq!(rows[1].age, None);
        assert_eq!(
            rows[1].cell_errors,
            vec!["Invalid age: expected a whole number, got \"twenty\"".to_string()]
        );
        assert_eq!(
            rows[1].validate().unwrap_err(),
            "Invalid age: expected a whole number, got \"twenty\""
        );
        assert_eq!(rows[2].age, Some(44));
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case("False", Some(false))]
    #[case("yes", Some(true))]
    #[case("NO", Some(false))]
    #[case("1", Some(true))]
    #[case("0", Some(false))]
    #[case("", None)]
    fn test_parse_flag_spellings(#[case] cell: &str, #[case] expected: Option<bool>) {
        let text = format!("name,email,is_verified\nAna,ana@example.com,{cell}\n");
        let rows = parse_csv_data(&text).unwrap();
        assert_eq!(rows[0].is_verified, expected);
        assert!(rows[0].cell_errors.is_empty());
    }

    #[test]
    fn test_parse_collects_every_bad_cell_in_a_row() {
        let text = "name,email,is_verified,latitude\nBo,bo@example.com,maybe,north\n";
        let rows = parse_csv_data(text).unwrap();
        assert_eq!(rows[0].cell_errors.len(), 2);
        assert!(rows[0].cell_errors[0].starts_with("Invalid is_verified"));
        assert!(rows[0].cell_errors[1].starts_with("Invalid latitude"));
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let row = UserCsvRow {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            is_verified: Some(true),
            photo_url_1: Some("https://img.example.com/a.jpg".to_string()),
            cell_errors: vec!["Invalid age: x".to_string()],
            ..UserCsvRow::default()
        };
        let json = row.to_json();
        assert_eq!(json["isVerified"], serde_json::json!(true));
        assert_eq!(json["photoUrl1"], serde_json::json!("https://img.example.com/a.jpg"));
        assert!(json.get("photo_url_1").is_none());
        assert!(json.get("cellErrors").is_none());
    }

    #[test]
    fn test_spreadsheet_row_skips_header() {
        assert_eq!(spreadsheet_row(0), 2);
    }

    #[test]
    fn test_parse_header_only_yields_no_rows() {
        assert!(parse_csv_data("name,email\n").unwrap().is_empty());
    }

    #[rstest]
    #[case("", "ok@example.com", None, "Name is required")]
    #[case("Gus", "", None, "Email is required")]
    #[case("Gus", "not-an-email", None, "Invalid email address: not-an-email")]
    #[case("Gus", "gus@example.com", Some(16), "Age must be between 18 and 100, got 16")]
    fn test_row_validation_failures(
        #[case] name: &str,
        #[case] email: &str,
        #[case] age: Option<u32>,
        #[case] expected: &str,
    ) {
        let row = UserCsvRow {
            name: name.to_string(),
            email: email.to_string(),
            age,
            ..UserCsvRow::default()
        };
        assert_eq!(row.validate().unwrap_err(), expected);
    }

    #[test]
    fn test_row_validation_rejects_non_http_photo() {
        let row = UserCsvRow {
            name: "Hal".to_string(),
            email: "hal@example.com".to_string(),
            photo_url_2: Some("ftp://files.example.com/h.jpg".to_string()),
            ..UserCsvRow::default()
        };
        assert_eq!(
            row.validate().unwrap_err(),
            "Photo URL must be http(s): ftp://files.example.com/h.jpg"
        );
    }

    #[test]
    fn test_row_validation_accepts_complete_row() {
        let row = UserCsvRow {
            name: "Ivy".to_string(),
            email: "ivy@example.com".to_string(),
            age: Some(30),
            latitude: Some(38.72),
            longitude: Some(-9.14),
            photo_url_1: Some("https://img.example.com/ivy.jpg".to_string()),
            ..UserCsvRow::default()
        };
        assert!(row.validate().is_ok());
    }
}
