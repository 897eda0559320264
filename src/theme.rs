//! Theme registry.
//!
//! Each theme pairs the classes the on-screen preview uses with the color
//! triple the exporter paints slides with. The table is a process-wide
//! constant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Identifier of one of the predefined themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    /// Yellow on black.
    BeeHappy,
    /// Dark gray on white.
    Ash,
    /// Greens on a pale green background.
    Oasis,
    /// Blues on a pale blue gradient.
    Tranquil,
    /// Browns on paper.
    Kraft,
    /// White on deep teal.
    Verdigris,
}

impl ThemeId {
    /// Returns all themes in swatch order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::BeeHappy, Self::Ash, Self::Oasis, Self::Tranquil, Self::Kraft, Self::Verdigris]
    }

    /// Identifier as it appears in configuration.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::BeeHappy => "bee-happy",
            Self::Ash => "ash",
            Self::Oasis => "oasis",
            Self::Tranquil => "tranquil",
            Self::Kraft => "kraft",
            Self::Verdigris => "verdigris",
        }
    }

    /// Human-readable name for swatches.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeeHappy => "Bee Happy",
            Self::Ash => "Ash",
            Self::Oasis => "Oasis",
            Self::Tranquil => "Tranquil",
            Self::Kraft => "Kraft",
            Self::Verdigris => "Verdigris",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ThemeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| Error::invalid("style", format!("unknown theme '{s}'")))
    }
}

/// Classes used by the on-screen preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayClasses {
    /// Slide background.
    pub background: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Headings.
    pub heading: &'static str,
    /// Borders and highlights.
    pub accent: &'static str,
}

/// Colors used in exported documents, six-digit hex without `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColors {
    /// Slide background fill.
    pub background: &'static str,
    /// Accent color.
    pub accent: &'static str,
    /// Text color for titles, bodies, sources and references.
    pub text: &'static str,
}

/// Rendering attributes for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    /// Which theme this is.
    pub id: ThemeId,
    /// On-screen classes.
    pub display: DisplayClasses,
    /// Export color triple.
    pub export: ExportColors,
}

static THEMES: [ThemeStyle; 6] = [
    ThemeStyle {
        id: ThemeId::BeeHappy,
        display: DisplayClasses {
            background: "bg-black text-yellow-400",
            text: "text-yellow-400",
            heading: "text-yellow-400 font-bold",
            accent: "border-yellow-400",
        },
        export: ExportColors { background: "000000", accent: "FFD700", text: "FFD700" },
    },
    ThemeStyle {
        id: ThemeId::Ash,
        display: DisplayClasses {
            background: "bg-white",
            text: "text-gray-800",
            heading: "text-gray-900 font-bold",
            accent: "border-gray-200",
        },
        export: ExportColors { background: "FFFFFF", accent: "1F2937", text: "1F2937" },
    },
    ThemeStyle {
        id: ThemeId::Oasis,
        display: DisplayClasses {
            background: "bg-green-50",
            text: "text-gray-700",
            heading: "text-green-800 font-bold",
            accent: "border-green-200",
        },
        export: ExportColors { background: "F0FDF4", accent: "166534", text: "374151" },
    },
    ThemeStyle {
        id: ThemeId::Tranquil,
        display: DisplayClasses {
            background: "bg-gradient-to-br from-blue-50 to-blue-100",
            text: "text-blue-900",
            heading: "text-blue-800 font-bold",
            accent: "border-blue-300",
        },
        export: ExportColors { background: "EFF6FF", accent: "1E40AF", text: "1E3A8A" },
    },
    ThemeStyle {
        id: ThemeId::Kraft,
        display: DisplayClasses {
            background: "bg-amber-50",
            text: "text-amber-900",
            heading: "text-amber-800 font-bold",
            accent: "border-amber-200",
        },
        export: ExportColors { background: "FFFBEB", accent: "92400E", text: "78350F" },
    },
    ThemeStyle {
        id: ThemeId::Verdigris,
        display: DisplayClasses {
            background: "bg-gradient-to-br from-teal-900 to-emerald-800",
            text: "text-white",
            heading: "text-white font-bold",
            accent: "border-teal-400",
        },
        export: ExportColors { background: "134E4A", accent: "2DD4BF", text: "FFFFFF" },
    },
];

/// Rendering attributes for a theme.
pub fn resolve(id: ThemeId) -> &'static ThemeStyle {
    match id {
        ThemeId::BeeHappy => &THEMES[0],
        ThemeId::Ash => &THEMES[1],
        ThemeId::Oasis => &THEMES[2],
        ThemeId::Tranquil => &THEMES[3],
        ThemeId::Kraft => &THEMES[4],
        ThemeId::Verdigris => &THEMES[5],
    }
}

/// Rendering attributes for a theme given by its configuration identifier.
pub fn lookup(id: &str) -> Option<&'static ThemeStyle> {
    id.parse().ok().map(resolve)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn resolve_matches_table_entry() {
        for &id in ThemeId::all() {
            assert_eq!(resolve(id).id, id);
        }
    }

    #[test]
    fn oasis_export_colors() {
        let oasis = resolve(ThemeId::Oasis);
        assert_eq!(oasis.export.background, "F0FDF4");
        assert_eq!(oasis.export.accent, "166534");
        assert_eq!(oasis.export.text, "374151");
    }

    #[test]
    fn export_colors_are_six_digit_hex() {
        for &id in ThemeId::all() {
            let c = resolve(id).export;
            for hex in [c.background, c.accent, c.text] {
                assert_eq!(hex.len(), 6, "{id}: {hex}");
                assert!(hex.chars().all(|ch| ch.is_ascii_hexdigit()), "{id}: {hex}");
            }
        }
    }

    #[test]
    fn lookup_by_identifier() {
        assert_eq!(lookup("bee-happy").unwrap().export.text, "FFD700");
        assert_eq!(lookup("verdigris").unwrap().export.background, "134E4A");
        assert!(lookup("modern").is_none());
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let err = "classic".parse::<ThemeId>().unwrap_err();
        assert!(err.to_string().contains("classic"));
    }

    #[test]
    fn identifiers_round_trip_through_serde() {
        for &id in ThemeId::all() {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.id()));
            let back: ThemeId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }
    }
}
