//! procbar library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod ops;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which glyph set the panel draws with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum IconStyle {
    #[default]
    NerdFont,
    Plain,
}
