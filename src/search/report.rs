use crate::search::TrialResult;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// One row per sweep point; the chosen factor is highlighted.
pub fn sweep_table(trials: &[TrialResult], best: f64) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Factor").add_attribute(Attribute::Bold),
        Cell::new("Spearman IF/dist").fg(Color::Cyan),
        Cell::new("RMSE"),
        Cell::new("Models"),
        Cell::new("Failed").fg(Color::Red),
    ]);

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for t in trials {
        let is_best = (t.convert_factor - best).abs() < 1e-9;
        let factor = Cell::new(format!("{:.2}", t.convert_factor));
        let factor = if is_best {
            factor.add_attribute(Attribute::Bold).fg(Color::Green)
        } else {
            factor
        };

        let (cor, rmse) = match t.correlation {
            Some(c) => (format!("{:.4}", c), format!("{:.4}", t.mean_rmse)),
            None => ("-".to_string(), "-".to_string()),
        };

        table.add_row(vec![
            factor,
            Cell::new(cor).fg(Color::Cyan),
            Cell::new(rmse),
            Cell::new(t.models_ok),
            Cell::new(t.models_failed).fg(Color::Red),
        ]);
    }
    table
}
