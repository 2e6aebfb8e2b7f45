//! # Operation Catalog
//!
//! Maps each kind of file operation to the icon and verbs the process
//! panel shows for it. Pure lookups, no state.

use crate::IconStyle;

/// Nerd Font glyphs used by the panel.
pub mod glyph {
    pub const COPY: &str = "\u{f018f}";
    pub const CUT: &str = "\u{f0190}";
    pub const DELETE: &str = "\u{f01b4}";
    pub const COMPRESS_FILE: &str = "\u{f05c4}";
    pub const EXTRACT_FILE: &str = "\u{f06eb}";
    pub const LOCK: &str = "\u{f033e}";
    pub const UNLOCK: &str = "\u{f0fc6}";

    pub const ERROR: &str = "\u{f530}";
    pub const WARN: &str = "\u{f071}";
    pub const DONE: &str = "\u{f4a4}";
    pub const IN_OPERATION: &str = "\u{f0954}";
}

/// The kind of file operation a process tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OperationType {
    #[default]
    Copy,
    Cut,
    Delete,
    Compress,
    Extract,
    Encrypt,
    Decrypt,
    /// Anything the catalog has no dedicated icon or verbs for.
    Other,
}

impl OperationType {
    pub const ALL: [OperationType; 8] = [
        OperationType::Copy,
        OperationType::Cut,
        OperationType::Delete,
        OperationType::Compress,
        OperationType::Extract,
        OperationType::Encrypt,
        OperationType::Decrypt,
        OperationType::Other,
    ];

    /// Icon drawn in front of the display name. Empty in plain mode.
    pub fn icon(self, style: IconStyle) -> &'static str {
        if style == IconStyle::Plain {
            return "";
        }
        match self {
            OperationType::Copy => glyph::COPY,
            OperationType::Cut => glyph::CUT,
            OperationType::Delete => glyph::DELETE,
            OperationType::Compress => glyph::COMPRESS_FILE,
            OperationType::Extract => glyph::EXTRACT_FILE,
            OperationType::Encrypt => glyph::LOCK,
            OperationType::Decrypt => glyph::UNLOCK,
            OperationType::Other => glyph::IN_OPERATION,
        }
    }

    /// Present tense verb, used while the operation runs.
    pub fn verb(self) -> &'static str {
        match self {
            OperationType::Copy => "Copying",
            OperationType::Cut => "Moving",
            OperationType::Delete => "Deleting",
            OperationType::Compress => "Compressing",
            OperationType::Extract => "Extracting",
            OperationType::Encrypt => "Encrypting",
            OperationType::Decrypt => "Decrypting",
            OperationType::Other => "Processing",
        }
    }

    /// Past tense verb, used once the operation finished.
    pub fn past_verb(self) -> &'static str {
        match self {
            OperationType::Copy => "Copied",
            OperationType::Cut => "Moved",
            OperationType::Delete => "Deleted",
            OperationType::Compress => "Compressed",
            OperationType::Extract => "Extracted",
            OperationType::Encrypt => "Encrypted",
            OperationType::Decrypt => "Decrypted",
            OperationType::Other => "Processed",
        }
    }
}

/// Separator between an icon and the text that follows it.
pub fn icon_space(style: IconStyle) -> &'static str {
    match style {
        IconStyle::NerdFont => " ",
        IconStyle::Plain => "",
    }
}
