/// Qualitative verdict for a reaction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rating {
    Amazing,
    #[strum(serialize = "Very Good")]
    VeryGood,
    Good,
    Average,
    #[strum(serialize = "Below Average")]
    BelowAverage,
}

impl Rating {
    /// Classify a reaction time in milliseconds.
    ///
    /// The value is rounded to whole milliseconds first so the verdict always
    /// agrees with the number shown next to it.
    pub fn from_ms(ms: f64) -> Self {
        let ms = ms.round();
        if ms < 200.0 {
            Rating::Amazing
        } else if ms < 250.0 {
            Rating::VeryGood
        } else if ms < 300.0 {
            Rating::Good
        } else if ms < 400.0 {
            Rating::Average
        } else {
            Rating::BelowAverage
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rating::Amazing => "⚡",
            Rating::VeryGood => "🎯",
            Rating::Good => "✅",
            Rating::Average => "👍",
            Rating::BelowAverage => "🐌",
        }
    }

    /// Icon and label, e.g. "⚡ Amazing"
    pub fn label(&self) -> String {
        format!("{} {}", self.icon(), self)
    }
}
