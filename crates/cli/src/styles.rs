//! Help output colors.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};

/// Section headers in yellow, flags and subcommands in cyan, placeholders dimmed.
pub fn help_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
		.placeholder(AnsiColor::White.on_default().effects(Effects::DIMMED))
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
}
