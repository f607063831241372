/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD and listing
/// - `comments`: Task comments
/// - `folders`: Notes folders
/// - `pages`: Notes pages

use serde::{Deserialize, Serialize};

pub mod comments;
pub mod folders;
pub mod health;
pub mod pages;
pub mod tasks;

/// Response body for delete operations
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
