use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{parameters::Reservoir, policy::HourBand, step::Step, summary::Summary},
    quantity::{cost::Cost, length::Metres, rate::KilowattHourRate, time::Hours},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn level_cell(level: Metres, reservoir: &Reservoir) -> Cell {
    Cell::new(level).set_alignment(CellAlignment::Right).fg(if level < reservoir.min_level {
        Color::Red
    } else if level < reservoir.operational_limit() {
        Color::Reset
    } else {
        Color::Blue
    })
}

pub fn build_steps_table(
    steps: &[Step],
    reservoir: &Reservoir,
    mean_rate: KilowattHourRate,
) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Hour",
        "Band",
        "Grid rate",
        "Consumption",
        "Pump",
        "Flow",
        "Before",
        "After",
        "Energy",
        "Energy cost",
        "Penalty",
        "Cumulative",
    ]);
    let mut cumulative_cost = Cost::ZERO;
    for step in steps {
        cumulative_cost += step.cost();
        #[expect(clippy::cast_precision_loss)]
        let hour = Hours(step.hour as f64);
        table.add_row(vec![
            Cell::new(format!("{hour:.0}")),
            Cell::new(step.band).add_attribute(Attribute::Dim).fg(match step.band {
                HourBand::OffPeak => Color::Green,
                HourBand::Shoulder => Color::DarkYellow,
                HourBand::Peak => Color::Red,
            }),
            Cell::new(step.grid_rate).set_alignment(CellAlignment::Right).fg(
                if step.grid_rate >= mean_rate { Color::Red } else { Color::Green },
            ),
            Cell::new(step.consumption).set_alignment(CellAlignment::Right),
            if step.pump_on {
                Cell::new("on").fg(Color::Green)
            } else {
                Cell::new("off").add_attribute(Attribute::Dim)
            },
            Cell::new(step.flow).set_alignment(CellAlignment::Right),
            level_cell(step.level_before, reservoir),
            level_cell(step.level_after, reservoir),
            Cell::new(step.energy).set_alignment(CellAlignment::Right),
            Cell::new(step.energy_cost).set_alignment(CellAlignment::Right),
            Cell::new(step.penalty)
                .set_alignment(CellAlignment::Right)
                .fg(if step.penalty > Cost::ZERO { Color::Red } else { Color::Reset }),
            Cell::new(cumulative_cost).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_summary_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_rows(vec![
        vec![
            Cell::new("Total cost").add_attribute(Attribute::Bold),
            Cell::new(summary.total_cost())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
        ],
        vec![
            Cell::new("Energy cost"),
            Cell::new(summary.energy_cost).set_alignment(CellAlignment::Right),
        ],
        vec![
            Cell::new("Penalty cost"),
            Cell::new(summary.penalty_cost).set_alignment(CellAlignment::Right).fg(
                if summary.penalty_cost > Cost::ZERO { Color::Red } else { Color::Green },
            ),
        ],
        vec![
            Cell::new("Pumped energy"),
            Cell::new(summary.energy).set_alignment(CellAlignment::Right),
        ],
        vec![
            Cell::new("Pumping hours"),
            Cell::new(summary.pumping_hours.iter().join(", ")),
        ],
        vec![
            Cell::new("Penalized hours"),
            Cell::new(summary.penalized_hours.iter().join(", ")),
        ],
        vec![
            Cell::new("Penalties"),
            Cell::new(
                summary.penalties.iter().map(|penalty| format!("{:.0}", penalty.0)).join(" "),
            ),
        ],
        vec![
            Cell::new("Level range"),
            Cell::new(format!("{} – {}", summary.min_level, summary.max_level)),
        ],
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::parameters::SystemParameters,
        quantity::{energy::KilowattHours, flow::CubicMetresPerHour},
    };

    fn step(hour: usize, penalty: f64) -> Step {
        let pump_on = penalty <= 0.0;
        Step {
            hour,
            band: HourBand::of(hour),
            grid_rate: KilowattHourRate(0.1),
            consumption: CubicMetresPerHour(30.0),
            pump_on,
            flow: CubicMetresPerHour(if pump_on { 180.0 } else { 0.0 }),
            level_before: Metres(2.0),
            level_after: Metres(1.5),
            energy: KilowattHours(10.0),
            energy_cost: Cost(1.0),
            penalty: Cost(penalty),
        }
    }

    #[test]
    fn test_steps_table_rows() {
        let steps = [step(13, 0.0), step(22, 5.0)];
        let table = build_steps_table(
            &steps,
            &SystemParameters::default().reservoir,
            KilowattHourRate(0.1),
        );
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("peak"));
        assert!(rendered.contains("7.00 €"), "cumulative cost: {rendered}");
    }

    #[test]
    fn test_summary_table() {
        let summary = Summary::from_steps(&[step(13, 0.0), step(22, 5.0)]);
        let rendered = build_summary_table(&summary).to_string();
        assert!(rendered.contains("7.00 €"));
        assert!(rendered.contains("0 5"));
    }
}
