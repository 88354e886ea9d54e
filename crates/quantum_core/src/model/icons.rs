//! Emoji catalog for the page icon picker.
//!
//! Data plus pure lookup only; the picker surface owns rendering and input
//! handling. Search matches the hexadecimal codepoint of each emoji, which
//! is what the picker exposes as its search key.

/// A named group of icons shown as one picker section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconCategory {
    pub name: &'static str,
    pub icons: &'static [&'static str],
}

/// Icon catalog in picker section order.
pub const ICON_CATEGORIES: [IconCategory; 8] = [
    IconCategory {
        name: "Smileys & Emotion",
        icons: &[
            "😀", "😂", "😍", "🤔", "😢", "😡", "🤩", "🥳", "🤯", "😭", "😱", "😇",
        ],
    },
    IconCategory {
        name: "People & Body",
        icons: &[
            "👋", "👍", "🙏", "💪", "👀", "🧠", "🧑‍💻", "👩‍🎨", "👨‍🚀", "🦸‍♂️", "🏃‍♀️", "💃",
        ],
    },
    IconCategory {
        name: "Animals & Nature",
        icons: &[
            "🐶", "🐱", "🐭", "🌍", "🌳", "🌸", "🐳", "🦋", "⭐", "🔥", "💧", "⚡",
        ],
    },
    IconCategory {
        name: "Food & Drink",
        icons: &[
            "🍎", "🍌", "🍕", "🍔", "☕️", "🍺", "🍇", "🍓", "🥑", "🌮", "🍣", "🍩",
        ],
    },
    IconCategory {
        name: "Travel & Places",
        icons: &[
            "✈️", "🚗", "🏠", "🚀", "🗺️", "🏛️", "🗼", "🗽", "🏝️", "⛰️", "🏕️", "🏟️",
        ],
    },
    IconCategory {
        name: "Activities",
        icons: &[
            "⚽️", "🏀", "🎨", "🎵", "🎮", "🎉", "🏆", "🎯", "🎬", "🎤", "🎸", "📚",
        ],
    },
    IconCategory {
        name: "Objects",
        icons: &[
            "💻", "📱", "💡", "🔔", "✏️", "📎", "🔑", "💰", "💎", "⚙️", "🔬", "🔭",
        ],
    },
    IconCategory {
        name: "Symbols",
        icons: &[
            "❤️", "✅", "❌", "❓", "❗️", "💯", "➕", "➖", "➗", "✖️", "©️", "®️",
        ],
    },
];

/// Searches the catalog by codepoint hex fragment.
///
/// An empty term yields an empty result; the picker falls back to the full
/// category view in that case.
pub fn search_icons(term: &str) -> Vec<&'static str> {
    let needle = term.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    ICON_CATEGORIES
        .iter()
        .flat_map(|category| category.icons.iter().copied())
        .filter(|icon| {
            icon.chars()
                .next()
                .map(|first| format!("{:x}", first as u32).contains(&needle))
                .unwrap_or(false)
        })
        .collect()
}
