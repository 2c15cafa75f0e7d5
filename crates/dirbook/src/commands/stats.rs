//! Statistics command handlers.

use tabled::Tabled;

use dirbook_core::{ContactService, LdapDirectory, StatisticsReport};

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    service: &ContactService<LdapDirectory>,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StatsCommand::Get { name } => {
            let value = service.get_statistic(&name).await?;
            output::print_output(&format_value(value), global.quiet);
            Ok(())
        }
        StatsCommand::All => {
            let report = service.get_all_statistics().await?;
            let rendered =
                output::render_single(&global.output, &report, report_table, report_plain);
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Statistic")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn rows(report: &StatisticsReport) -> Vec<StatRow> {
    vec![
        StatRow { name: "entries", value: report.entries.to_string() },
        StatRow { name: "entries_filled", value: report.entries_filled.to_string() },
        StatRow { name: "entries_empty", value: report.entries_empty.to_string() },
        StatRow { name: "entries_filled_percent", value: format_value(report.entries_filled_percent) },
        StatRow { name: "entries_empty_percent", value: format_value(report.entries_empty_percent) },
        StatRow { name: "users", value: report.users.to_string() },
        StatRow { name: "users_filled_entries", value: report.users_filled_entries.to_string() },
        StatRow { name: "users_empty_entries", value: report.users_empty_entries.to_string() },
        StatRow {
            name: "users_filled_entries_percent",
            value: format_value(report.users_filled_entries_percent),
        },
        StatRow {
            name: "users_empty_entries_percent",
            value: format_value(report.users_empty_entries_percent),
        },
    ]
}

fn report_table(report: &StatisticsReport) -> String {
    use tabled::{Table, settings::Style};
    Table::new(rows(report)).with(Style::rounded()).to_string()
}

fn report_plain(report: &StatisticsReport) -> String {
    rows(report)
        .iter()
        .map(|row| format!("{} {}", row.name, row.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Counts print without a fraction; percentages keep their two decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
