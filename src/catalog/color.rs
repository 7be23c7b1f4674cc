use serde::Serialize;

/// Display palette for work-type badges and group tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkTypeColor {
    DeepSkyBlue,
    NavyBlue,
    EmeraldGreen,
    OrangePeel,
}

const PALETTE: [WorkTypeColor; 4] = [
    WorkTypeColor::DeepSkyBlue,
    WorkTypeColor::NavyBlue,
    WorkTypeColor::EmeraldGreen,
    WorkTypeColor::OrangePeel,
];

/// Tailwind class tokens for one palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorClasses {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub button: &'static str,
}

impl WorkTypeColor {
    /// Stable color for a work type: UTF-16 code-unit sum mod 4.
    pub fn for_type(type_of_work: &str) -> Self {
        let sum: u64 = type_of_work.encode_utf16().map(u64::from).sum();
        PALETTE[(sum % PALETTE.len() as u64) as usize]
    }

    pub fn token(self) -> &'static str {
        match self {
            WorkTypeColor::DeepSkyBlue => "deep-sky-blue",
            WorkTypeColor::NavyBlue => "navy-blue",
            WorkTypeColor::EmeraldGreen => "emerald-green",
            WorkTypeColor::OrangePeel => "orange-peel",
        }
    }

    pub fn classes(self) -> ColorClasses {
        match self {
            WorkTypeColor::DeepSkyBlue => ColorClasses {
                background: "bg-sky-500/20",
                border: "border-sky-500/30",
                text: "text-sky-900",
                button: "bg-sky-600 hover:bg-sky-700",
            },
            WorkTypeColor::NavyBlue => ColorClasses {
                background: "bg-blue-800/20",
                border: "border-blue-800/30",
                text: "text-blue-900",
                button: "bg-blue-700 hover:bg-blue-800",
            },
            WorkTypeColor::EmeraldGreen => ColorClasses {
                background: "bg-emerald-500/20",
                border: "border-emerald-500/30",
                text: "text-emerald-900",
                button: "bg-emerald-600 hover:bg-emerald-700",
            },
            WorkTypeColor::OrangePeel => ColorClasses {
                background: "bg-orange-500/20",
                border: "border-orange-500/30",
                text: "text-orange-900",
                button: "bg-orange-600 hover:bg-orange-700",
            },
        }
    }
}

impl std::fmt::Display for WorkTypeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_code_sum_indexes_palette() {
        // "A" = 65 -> 1, "B" = 66 -> 2, "C" = 67 -> 3, "D" = 68 -> 0
        assert_eq!(WorkTypeColor::for_type("A"), WorkTypeColor::NavyBlue);
        assert_eq!(WorkTypeColor::for_type("B"), WorkTypeColor::EmeraldGreen);
        assert_eq!(WorkTypeColor::for_type("C"), WorkTypeColor::OrangePeel);
        assert_eq!(WorkTypeColor::for_type("D"), WorkTypeColor::DeepSkyBlue);
        assert_eq!(WorkTypeColor::for_type(""), WorkTypeColor::DeepSkyBlue);
    }

    #[test]
    fn test_deterministic_and_order_insensitive() {
        let a = WorkTypeColor::for_type("Networking");
        assert_eq!(a, WorkTypeColor::for_type("Networking"));
        // Same multiset of characters, same sum
        assert_eq!(WorkTypeColor::for_type("ab"), WorkTypeColor::for_type("ba"));
    }

    #[test]
    fn test_token_serializes_kebab_case() {
        let json = serde_json::to_string(&WorkTypeColor::OrangePeel).expect("serialize");
        assert_eq!(json, "\"orange-peel\"");
        assert_eq!(WorkTypeColor::NavyBlue.to_string(), "navy-blue");
    }

    #[test]
    fn test_classes_follow_palette_entry() {
        let classes = WorkTypeColor::EmeraldGreen.classes();
        assert_eq!(classes.background, "bg-emerald-500/20");
        assert!(classes.button.starts_with("bg-emerald-600"));

        let json = serde_json::to_value(WorkTypeColor::NavyBlue.classes()).expect("serialize");
        assert_eq!(json["border"], "border-blue-800/30");
        for color in PALETTE {
            assert!(color.classes().text.starts_with("text-"));
        }
    }
}
