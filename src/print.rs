//! Console tables for reports and sampled frequencies.

use comfy_table::presets::UTF8_NO_BORDERS;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::analysis::{AttrReport, ContReport, Report, Row};
use crate::approx::Empirical;
use crate::pool::Pool;
use crate::solver::{Requirement, RitualReport};

pub trait PrintExt {
    fn table(&self) -> String;

    fn print_table(&self) {
        print!("{}", self.table());
    }
}

impl PrintExt for AttrReport {
    fn table(&self) -> String {
        let head = describe(&self.pool, self.botch);
        let table = rows_table("Successes", &self.rows);
        format!("{head}\n\n{table}\n")
    }
}

impl PrintExt for ContReport {
    fn table(&self) -> String {
        let ours = describe(&self.contest.ours(), self.our_botch);
        let theirs = describe(&self.contest.theirs(), self.their_botch);
        let table = rows_table("Margin", &self.rows);
        format!("Ours:   {ours}\nTheirs: {theirs}\n\n{table}\n")
    }
}

impl PrintExt for RitualReport {
    fn table(&self) -> String {
        let mut table = new_table(vec!["Roll", "Successes", "Dice", "Chance", "Botch"]);
        for (name, r) in [("Casting", &self.casting), ("No ageing", &self.ageing)] {
            table.add_row(requirement_row(name, r));
        }
        format!("Casting TN {}\n\n{table}\n", self.target)
    }
}

impl PrintExt for Report {
    fn table(&self) -> String {
        match self {
            Report::Attr(r) => r.table(),
            Report::Cast(r) => r.table(),
            Report::Cont(r) => r.table(),
        }
    }
}

impl PrintExt for Empirical {
    fn table(&self) -> String {
        let mut table = new_table(vec!["Value", "Frequency", "At least"]);
        for (value, p) in self.iter() {
            table.add_row(vec![
                Cell::new(value).set_alignment(CellAlignment::Right),
                Cell::new(percent(p)),
                Cell::new(percent(self.at_least(value))),
            ]);
        }
        format!("Samples: {}\n\n{table}\n", self.samples())
    }
}

fn describe(pool: &Pool, botch: f64) -> String {
    format!(
        "{} x d{} vs TN {} | Botch: {}",
        pool.size(),
        pool.die().sides(),
        pool.target(),
        percent(botch).trim_start()
    )
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Cell::new).collect::<Vec<_>>());
    table
}

fn rows_table(label: &str, rows: &[Row]) -> Table {
    let mut table = new_table(vec![label, "Exactly", "At least"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.value).set_alignment(CellAlignment::Right),
            Cell::new(percent(row.exact)),
            Cell::new(percent(row.at_least)),
        ]);
    }
    table
}

fn requirement_row(name: &str, r: &Requirement) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(r.successes).set_alignment(CellAlignment::Right),
        Cell::new(r.pool).set_alignment(CellAlignment::Right),
        Cell::new(percent(r.chance)),
        Cell::new(percent(r.botch)),
    ]
}

fn percent(p: f64) -> String {
    format!("{:9.4}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Request;
    use crate::die::Die;

    #[test]
    fn percent_formatting() {
        assert_eq!(percent(1.0), " 100.0000%");
        assert_eq!(percent(0.0123), "   1.2300%");
    }

    #[test]
    fn one_table_row_per_report_row() {
        let report = AttrReport::new(&Pool::new(4, 7).build());
        let table = rows_table("Successes", &report.rows);
        assert_eq!(table.row_iter().count(), report.rows.len());
    }

    #[test]
    fn attr_table_mentions_pool() {
        let text = Request::attr(Die::d10(), 3, 8).eval().unwrap().table();
        assert!(text.starts_with("3 x d10 vs TN 8 | Botch:"));
        assert!(text.contains("At least"));
    }

    #[test]
    fn cont_table_names_both_sides() {
        let text = Request::cont(Die::d10(), 2, 6, 1, 7).eval().unwrap().table();
        assert!(text.contains("Ours:   2 x d10 vs TN 6"));
        assert!(text.contains("Theirs: 1 x d10 vs TN 7"));
        assert!(text.contains("Margin"));
    }

    #[test]
    fn cast_table_lists_both_rolls() {
        let text = Request::cast(Die::d10(), 5, 0.9, 0.9, None)
            .eval()
            .unwrap()
            .table();
        assert!(text.starts_with("Casting TN 5"));
        assert!(text.contains("No ageing"));
    }
}
