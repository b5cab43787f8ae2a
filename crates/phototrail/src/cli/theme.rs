//! Prompt theme shared by interactive confirmations.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// A `ColorfulTheme` that renders entirely on stderr.
///
/// - Prompt prefix: yellow `!` (prompts here guard destructive actions)
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn trail_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("!".to_string()).for_stderr().yellow(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}
