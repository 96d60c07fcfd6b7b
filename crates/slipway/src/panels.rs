//! Side panels: simulation values, reference formulas and controls.
//!
//! Panels are plain text boxes laid over the scene by the terminal view. The
//! values table is also what the headless runner prints.

use unicode_width::UnicodeWidthStr;

use crate::render::Rgb;
use crate::simulation::{Phase, SimulationState};

/// Label column width of the values table.
pub const LABEL_WIDTH: usize = 22;
/// Value column width of the values table (number and unit).
pub const VALUE_WIDTH: usize = 11;

/// Accent of the values panel.
pub const VALUES_ACCENT: Rgb = Rgb::hex(0x2563eb);
/// Accent of the formulas panel.
pub const FORMULAS_ACCENT: Rgb = Rgb::hex(0x9333ea);
/// Accent of the controls panel.
pub const CONTROLS_ACCENT: Rgb = Rgb::hex(0x16a34a);

/// One row of the values table.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueRow {
    /// A labelled number with a unit suffix.
    Number {
        label: &'static str,
        value: f64,
        unit: &'static str,
    },
    /// A labelled piece of text.
    Text { label: &'static str, value: String },
    /// A horizontal rule between groups.
    Separator,
}

impl ValueRow {
    const fn number(label: &'static str, value: f64, unit: &'static str) -> Self {
        Self::Number { label, value, unit }
    }

    /// Formats the row to exactly `LABEL_WIDTH + VALUE_WIDTH` columns.
    pub fn format(&self) -> String {
        match self {
            Self::Number { label, value, unit } => row(label, &format!("{value:.2}{unit}")),
            Self::Text { label, value } => row(label, value),
            Self::Separator => "─".repeat(LABEL_WIDTH + VALUE_WIDTH),
        }
    }
}

fn row(label: &str, value: &str) -> String {
    let mut line = pad_right(&format!("{label}:"), LABEL_WIDTH);
    line.push_str(&pad_left(value, VALUE_WIDTH));
    line
}

/// Every value of `state`, grouped as parameters, forces and kinematics.
pub fn value_rows(state: &SimulationState) -> Vec<ValueRow> {
    vec![
        ValueRow::Text {
            label: "Surface",
            value: state.surface.to_string(),
        },
        ValueRow::number("Mass (m)", state.mass, " kg"),
        ValueRow::number("Angle (α)", state.angle_degrees, "°"),
        ValueRow::number("Friction coeff. (μ)", state.friction_coefficient, ""),
        ValueRow::Separator,
        ValueRow::number("Gravity (G)", state.gravity_force, " N"),
        ValueRow::number("Normal force (N)", state.normal_force, " N"),
        ValueRow::number("Friction force (Ff)", state.friction_force, " N"),
        ValueRow::number("Net force (F)", state.net_force, " N"),
        ValueRow::Separator,
        ValueRow::number("Acceleration (a)", state.acceleration, " m/s²"),
        ValueRow::number("Velocity (v)", state.velocity, " m/s"),
    ]
}

/// The values table as text, one row per line.
pub fn values_text(state: &SimulationState) -> String {
    value_rows(state)
        .iter()
        .map(ValueRow::format)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A titled group of formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaGroup {
    /// Heading shown above the formulas.
    pub title: &'static str,
    /// One formula per line.
    pub formulas: &'static [&'static str],
}

/// Reference formulas for the model.
pub const FORMULAS: &[FormulaGroup] = &[
    FormulaGroup {
        title: "Gravity",
        formulas: &["G = m · g"],
    },
    FormulaGroup {
        title: "Normal force",
        formulas: &["N = m · g · cos(α)"],
    },
    FormulaGroup {
        title: "Gravity along the incline",
        formulas: &["Gx = m · g · sin(α)"],
    },
    FormulaGroup {
        title: "Friction",
        formulas: &["Ff = μ · N", "Ff = μ · m · g · cos(α)"],
    },
    FormulaGroup {
        title: "Net force",
        formulas: &["F = Gx − Ff", "F = m · g · sin(α) − μ · m · g · cos(α)"],
    },
    FormulaGroup {
        title: "Rest condition",
        formulas: &[
            "Ff ≥ Gx",
            "μ · m · g · cos(α) ≥ m · g · sin(α)",
            "μ ≥ tan(α)",
        ],
    },
    FormulaGroup {
        title: "Acceleration",
        formulas: &["a = F / m", "a = g · sin(α) − μ · g · cos(α)"],
    },
    FormulaGroup {
        title: "Velocity",
        formulas: &["v = v₀ + a · t"],
    },
    FormulaGroup {
        title: "Displacement",
        formulas: &["s = v₀ · t + (a · t²) / 2"],
    },
];

/// A boxed block of text with a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub accent: Rgb,
    pub lines: Vec<String>,
}

impl Panel {
    /// Width of the box including borders.
    pub fn width(&self) -> usize {
        let content = self
            .lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .max(self.title.width() + 2);
        content + 4
    }

    /// Height of the box including borders.
    pub fn height(&self) -> usize {
        self.lines.len() + 2
    }

    /// Draws the box with rounded corners.
    ///
    /// ```rust
    /// use slipway::panels::Panel;
    /// use slipway::render::Rgb;
    ///
    /// let panel = Panel {
    ///     title: "Hi".to_owned(),
    ///     accent: Rgb::BLACK,
    ///     lines: vec!["abc".to_owned()],
    /// };
    /// assert_eq!(panel.render(), vec!["╭─ Hi ─╮", "│ abc  │", "╰──────╯"]);
    /// ```
    pub fn render(&self) -> Vec<String> {
        let inner = self.width() - 2;
        let mut out = Vec::with_capacity(self.height());

        let title = format!("─ {} ", self.title);
        let fill = inner.saturating_sub(title.width());
        out.push(format!("╭{title}{}╮", "─".repeat(fill)));

        for line in &self.lines {
            out.push(format!("│ {} │", pad_right(line, inner - 2)));
        }

        out.push(format!("╰{}╯", "─".repeat(inner)));
        out
    }
}

/// The values panel.
pub fn values_panel(state: &SimulationState) -> Panel {
    Panel {
        title: "Values".to_owned(),
        accent: VALUES_ACCENT,
        lines: value_rows(state).iter().map(ValueRow::format).collect(),
    }
}

/// The formulas panel.
pub fn formulas_panel() -> Panel {
    let mut lines = Vec::new();
    for group in FORMULAS {
        lines.push(format!("{}:", group.title));
        lines.extend(group.formulas.iter().map(|f| format!("  {f}")));
    }
    Panel {
        title: "Formulas".to_owned(),
        accent: FORMULAS_ACCENT,
        lines,
    }
}

/// The controls panel, with the key for each input.
pub fn controls_panel(state: &SimulationState) -> Panel {
    let phase = state.phase();
    let toggle = if phase == Phase::Running {
        "Pause"
    } else {
        "Start"
    };

    let surface = format!("{} (μ = {})", state.surface, state.friction_coefficient);
    let mut lines = vec![
        control_line("Surface", &surface, "s/S"),
        control_line("Mass", &format!("{:.1} kg", state.mass), "-/+"),
        control_line("Angle", &format!("{:.0}°", state.angle_degrees), "[/]"),
        format!("space {toggle}   r Reset"),
    ];
    if phase == Phase::Running {
        lines.push("locked while running".to_owned());
    }

    Panel {
        title: "Controls".to_owned(),
        accent: CONTROLS_ACCENT,
        lines,
    }
}

fn control_line(label: &str, value: &str, keys: &str) -> String {
    format!("{}{}{keys}", pad_right(label, 9), pad_right(value, 20))
}

/// Pads `text` with spaces on the right to `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_owned();
    out.push_str(&" ".repeat(width.saturating_sub(text.width())));
    out
}

/// Pads `text` with spaces on the left to `width` columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let mut out = " ".repeat(width.saturating_sub(text.width()));
    out.push_str(text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use incline::Surface;

    #[test]
    fn rows_have_fixed_width() {
        let state = SimulationState::new(Surface::Metal, 9.9, 30.0).unwrap();
        for row in value_rows(&state) {
            assert_eq!(row.format().width(), LABEL_WIDTH + VALUE_WIDTH, "{row:?}");
        }
    }

    #[test]
    fn numbers_use_two_decimals() {
        let row = ValueRow::number("Velocity (v)", 1.0 / 3.0, " m/s");
        assert!(row.format().ends_with("0.33 m/s"));
    }

    #[test]
    fn panel_lines_share_width() {
        let panel = formulas_panel();
        let rendered = panel.render();
        assert_eq!(rendered.len(), panel.height());
        for line in &rendered {
            assert_eq!(line.width(), panel.width(), "{line}");
        }
    }

    #[test]
    fn controls_show_lock_only_while_running() {
        let mut state = SimulationState::default();
        assert!(!controls_panel(&state).lines.iter().any(|l| l.contains("locked")));

        state.is_running = true;
        let panel = controls_panel(&state);
        assert!(panel.lines.iter().any(|l| l.contains("locked")));
        assert!(panel.lines.iter().any(|l| l.contains("Pause")));
    }
}
