//! Test fixtures and sample data

use matchdesk_core::types::User;
use matchdesk_services::MockAdminService;
use std::sync::Arc;

/// Spreadsheet with three valid rows and two broken ones
///
/// Data rows 3 and 5 (spreadsheet rows 4 and 6) fail validation.
pub const MIXED_UPLOAD_CSV: &str = "\
name,email,age,location,photo_url_1
Ana Silva,ana@example.com,29,Lisbon,https://img.example.com/ana.jpg
Ben Okafor,ben@example.com,34,London,
,missing-name@example.com,40,Paris,
Chloe Martin,chloe@example.com,27,Paris,
Dan Young,dan@example.com,16,Madrid,
";

/// Spreadsheet as a spreadsheet tool exports it, with one unreadable age
///
/// Data row 2 (spreadsheet row 3) has a word where the age should be.
pub const SPREADSHEET_EXPORT_CSV: &str = "\
name,email,age,is_verified
Ana Silva,ana@example.com,29,TRUE
Bo Chen,bo@example.com,twenty,FALSE
Cy Diaz,cy@example.com,41,No
";

/// Spreadsheet where every row is valid
pub const CLEAN_UPLOAD_CSV: &str = "\
name,email
Eve Adams,eve@example.com
Finn Berg,finn@example.com
";

/// Sample user data for testing
pub struct UserFixtures;

impl UserFixtures {
    /// A user with only the required fields
    pub fn minimal(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            age: None,
            gender: None,
            location: None,
            is_verified: false,
            created_at: None,
        }
    }

    /// `count` minimal users with ids `u1..=u{count}`
    pub fn many(count: usize) -> Vec<User> {
        (1..=count).map(|n| Self::minimal(&format!("u{n}"))).collect()
    }
}

/// In-memory backend seeded with `count` users
pub fn backend_with_users(count: usize) -> Arc<MockAdminService> {
    Arc::new(MockAdminService::new().with_users(UserFixtures::many(count)))
}
