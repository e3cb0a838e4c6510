// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// The five selectable effects. Exactly one is active at a time.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    #[value(name = "fluid", alias = "water")]
    Fluid,
    #[value(name = "fire")]
    Fire,
    #[value(name = "discharge", alias = "lightning")]
    Discharge,
    #[value(name = "fog", alias = "smoke")]
    Fog,
    #[value(name = "light", alias = "flashlight")]
    LightMask,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Fluid,
        EffectKind::Fire,
        EffectKind::Discharge,
        EffectKind::Fog,
        EffectKind::LightMask,
    ];

    /// Selection key on the keyboard ('1'..='5').
    pub fn hotkey(self) -> char {
        match self {
            EffectKind::Fluid => '1',
            EffectKind::Fire => '2',
            EffectKind::Discharge => '3',
            EffectKind::Fog => '4',
            EffectKind::LightMask => '5',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.hotkey() == c)
    }

    /// First HUD row for this mode.
    pub fn hud_line(self) -> &'static str {
        match self {
            EffectKind::Fluid => "FLUID (1)     | waves + bubbles",
            EffectKind::Fire => "FIRE (2)      | rising embers, follows the pointer",
            EffectKind::Discharge => "DISCHARGE (3) | space: regenerate | drag: move the end point",
            EffectKind::Fog => "FOG (4)       | breathing fog + smoke",
            EffectKind::LightMask => "LIGHT (5)     | pointer cuts the darkness | +/-: radius",
        }
    }
}

pub const HUD_LEGEND: &str =
    "1:Fluid  2:Fire  3:Discharge  4:Fog  5:Light  |  p: pause  Esc/q: quit";
