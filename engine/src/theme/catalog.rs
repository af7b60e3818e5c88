use super::types::Palette;

/// Palette used whenever a requested name is not in the catalog.
pub const DEFAULT_PALETTE: &str = "Green";

/// Every palette name the catalog knows, in display order.
pub const PALETTE_NAMES: [&str; 11] = [
    "Custom",
    "Teal",
    "Red",
    "Orange",
    "Green",
    "Blue",
    "Purple",
    "Gray",
    "Periwinkle",
    "DarkYellow",
    "DarkBlue",
];

const THEME_SLOTS: [&str; 9] = [
    "themePrimary",
    "themeLighterAlt",
    "themeLighter",
    "themeLight",
    "themeTertiary",
    "themeSecondary",
    "themeDarkAlt",
    "themeDark",
    "themeDarker",
];

const NEUTRAL_SLOTS: [&str; 13] = [
    "neutralLighterAlt",
    "neutralLighter",
    "neutralLight",
    "neutralQuaternaryAlt",
    "neutralQuaternary",
    "neutralTertiaryAlt",
    "neutralTertiary",
    "neutralSecondary",
    "neutralPrimaryAlt",
    "neutralPrimary",
    "neutralDark",
    "black",
    "white",
];

const LIGHT_NEUTRALS: [&str; 13] = [
    "#faf9f8", "#f3f2f1", "#edebe9", "#e1dfdd", "#d0d0d0", "#c8c6c4", "#a19f9d", "#605e5c",
    "#3b3a39", "#323130", "#201f1e", "#000000", "#ffffff",
];

const DARK_NEUTRALS: [&str; 13] = [
    "#282828", "#313131", "#3f3f3f", "#484848", "#4f4f4f", "#6d6d6d", "#c8c8c8", "#d0d0d0",
    "#dadada", "#ffffff", "#f4f4f4", "#f8f8f8", "#1f1f1f",
];

struct Ramp {
    name: &'static str,
    theme: [&'static str; 9],
    accent: &'static str,
    dark: bool,
}

const RAMPS: [Ramp; 11] = [
    Ramp {
        name: "Custom",
        theme: [
            "#1b4f72", "#f2f6f9", "#cddde8", "#a5c1d4", "#5a8aaa", "#285f83", "#184767",
            "#143c57", "#0f2c40",
        ],
        accent: "#d35400",
        dark: false,
    },
    Ramp {
        name: "Teal",
        theme: [
            "#03787c", "#f0f9fa", "#c5e9ea", "#98d6d8", "#49aeb1", "#13898d", "#026d70",
            "#025c5f", "#014446",
        ],
        accent: "#02878b",
        dark: false,
    },
    Ramp {
        name: "Red",
        theme: [
            "#a4262c", "#fbf4f4", "#f0d3d4", "#e3aeb1", "#c86c70", "#ae383e", "#942228",
            "#7c1d22", "#5c1519",
        ],
        accent: "#ca5010",
        dark: false,
    },
    Ramp {
        name: "Orange",
        theme: [
            "#ca5010", "#fdf6f3", "#f4dfd2", "#ecc4ab", "#dc925f", "#d06228", "#b5480e",
            "#993d0c", "#712d09",
        ],
        accent: "#986f0b",
        dark: false,
    },
    Ramp {
        name: "Green",
        theme: [
            "#498205", "#f4f9f0", "#d5e7c1", "#b2d28f", "#77ab38", "#548f12", "#427505",
            "#376304", "#294903",
        ],
        accent: "#038387",
        dark: false,
    },
    Ramp {
        name: "Blue",
        theme: [
            "#0078d4", "#eff6fc", "#deecf9", "#c7e0f4", "#71afe5", "#2b88d8", "#106ebe",
            "#005a9e", "#004578",
        ],
        accent: "#8764b8",
        dark: false,
    },
    Ramp {
        name: "Purple",
        theme: [
            "#8764b8", "#f9f8fc", "#e9e2f4", "#d7cbeb", "#b29ad4", "#9271bf", "#7a5aa6",
            "#674c8c", "#4c3867",
        ],
        accent: "#038387",
        dark: false,
    },
    Ramp {
        name: "Gray",
        theme: [
            "#69797e", "#f8f9fa", "#e4e9ea", "#cdd6d8", "#9eadb1", "#778a8f", "#5f6d72",
            "#505c60", "#3b4447",
        ],
        accent: "#0078d4",
        dark: false,
    },
    Ramp {
        name: "Periwinkle",
        theme: [
            "#6264a7", "#f7f7fb", "#e1e1f1", "#c8c9e4", "#989ac9", "#7173b0", "#585a95",
            "#4a4c7e", "#37385d",
        ],
        accent: "#8764b8",
        dark: false,
    },
    Ramp {
        name: "DarkYellow",
        theme: [
            "#fce100", "#0d0b00", "#191700", "#322d00", "#6a5f00", "#e3cc00", "#ffe817",
            "#ffec3d", "#fff171",
        ],
        accent: "#3a96dd",
        dark: true,
    },
    Ramp {
        name: "DarkBlue",
        theme: [
            "#3a96dd", "#020609", "#091823", "#112d43", "#235a85", "#3385c3", "#4ba0e1",
            "#65aee6", "#8ac2ec",
        ],
        accent: "#fce100",
        dark: true,
    },
];

fn build_palette(ramp: &Ramp) -> Palette {
    let neutrals = if ramp.dark {
        &DARK_NEUTRALS
    } else {
        &LIGHT_NEUTRALS
    };
    // white and neutralPrimary double as page background and body text.
    let background = neutrals[12];
    let text = neutrals[9];

    let slots = THEME_SLOTS
        .iter()
        .zip(ramp.theme.iter())
        .chain(NEUTRAL_SLOTS.iter().zip(neutrals.iter()))
        .map(|(slot, color)| (*slot, *color))
        .chain([
            ("primaryBackground", background),
            ("primaryText", text),
            ("bodyBackground", background),
            ("bodyText", text),
            ("accent", ramp.accent),
        ])
        .map(|(slot, color)| (slot.to_string(), color.to_string()))
        .collect();

    Palette::new(ramp.name, slots, ramp.dark)
}

fn lookup(name: &str) -> Option<Palette> {
    RAMPS
        .iter()
        .find(|ramp| ramp.name == name)
        .map(build_palette)
}

/// Looks a palette up by exact name.
///
/// Unknown names are not an error: a warning listing the valid names is
/// logged and the [`DEFAULT_PALETTE`] is returned so the run can continue.
pub fn resolve_palette(name: &str) -> Palette {
    if let Some(palette) = lookup(name) {
        return palette;
    }

    log::warn!(
        "Unknown color theme '{name}'. Valid options: {}. Falling back to '{DEFAULT_PALETTE}'",
        PALETTE_NAMES.join(", ")
    );
    match lookup(DEFAULT_PALETTE) {
        Some(palette) => palette,
        None => build_palette(&RAMPS[4]),
    }
}
