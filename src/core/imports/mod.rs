// Core imports module - operator maintenance of teams and games.

pub mod import_service;
pub mod score_lines;
pub mod team_directory;

pub use import_service::*;
pub use score_lines::{normalize_team_name, parse_score_line, parse_score_text, ScoreLine};
pub use team_directory::{TeamDirectory, TeamRecord};
