pub mod engine;
pub mod playwright;
pub mod scanner;

pub use engine::RuleEngine;
pub use playwright::PlaywrightEngine;
pub use scanner::{validate_url, Scanner};
