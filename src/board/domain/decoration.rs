//! Presentational decoration for columns.
//!
//! A decoration is a pure function of a column's kind, so the same column
//! renders identically across reloads.

use super::DefaultColumn;
use serde::Serialize;

/// Colours and glyph used when rendering a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decoration {
    /// CSS background gradient.
    pub gradient: &'static str,
    /// Accent colour as a hex string.
    pub accent: &'static str,
    /// Emoji shown next to the column title.
    pub emoji: &'static str,
}

const TO_DO: Decoration = Decoration {
    gradient: "linear-gradient(135deg, #ffb74d 0%, #ff9800 100%)",
    accent: "#ff9800",
    emoji: "📋",
};

const IN_PROGRESS: Decoration = Decoration {
    gradient: "linear-gradient(135deg, #64b5f6 0%, #2196f3 100%)",
    accent: "#2196f3",
    emoji: "⚡",
};

const COMPLETED: Decoration = Decoration {
    gradient: "linear-gradient(135deg, #81c784 0%, #4caf50 100%)",
    accent: "#4caf50",
    emoji: "✅",
};

/// Repeating palette for user-created columns.
const PALETTE: [Decoration; 10] = [
    Decoration {
        gradient: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        accent: "#764ba2",
        emoji: "🔖",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
        accent: "#f5576c",
        emoji: "🎯",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
        accent: "#00b8d4",
        emoji: "💡",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)",
        accent: "#26a69a",
        emoji: "🌱",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
        accent: "#fa709a",
        emoji: "🔥",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #30cfd0 0%, #330867 100%)",
        accent: "#330867",
        emoji: "🌙",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #a8edea 0%, #fed6e3 100%)",
        accent: "#ec407a",
        emoji: "🧩",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #ff9a9e 0%, #fecfef 100%)",
        accent: "#e57373",
        emoji: "🎨",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #fbc2eb 0%, #a6c1ee 100%)",
        accent: "#7e57c2",
        emoji: "🚀",
    },
    Decoration {
        gradient: "linear-gradient(135deg, #fdcbf1 0%, #e6dee9 100%)",
        accent: "#8d6e63",
        emoji: "📌",
    },
];

impl Decoration {
    /// Number of entries in the custom-column palette.
    pub const PALETTE_LEN: u32 = 10;

    /// Fixed decoration of a default column.
    #[must_use]
    pub const fn for_default(column: DefaultColumn) -> Self {
        match column {
            DefaultColumn::ToDo => TO_DO,
            DefaultColumn::InProgress => IN_PROGRESS,
            DefaultColumn::Completed => COMPLETED,
        }
    }

    /// Palette entry for a custom column, cycling every ten ordinals.
    #[expect(
        clippy::indexing_slicing,
        clippy::integer_division_remainder_used,
        reason = "the slot is reduced modulo the palette length"
    )]
    #[must_use]
    pub const fn for_custom(ordinal: u32) -> Self {
        PALETTE[(ordinal % Self::PALETTE_LEN) as usize]
    }
}
