use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use sortematica_data::models::{Lottery, NumberStats, Ticket};
use sortematica_data::sniff::{ColumnRoles, MetaRole};
use sortematica_data::table::RawTable;

use crate::analysis::latest::LatestResult;
use crate::analysis::simulator::MatchResult;
use crate::analysis::{Analysis, NO_DATA_MESSAGE};

fn numbers_str(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_latest(lottery: Lottery, results: &[LatestResult]) {
    if results.is_empty() {
        println!("Nenhum resultado válido para {}.", lottery);
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "Dezenas", "Ganhadores"]);
    for r in results {
        table.add_row(vec![
            r.concurso.to_string(),
            r.data.clone(),
            numbers_str(&r.numeros),
            r.ganhadores.clone(),
        ]);
    }
    println!("{table}");
}

pub fn display_stats(lottery: Lottery, analysis: &Analysis, stats: &[NumberStats]) {
    let Some(report) = analysis.report() else {
        println!("{NO_DATA_MESSAGE}");
        return;
    };

    println!(
        "\n📊 {} — {} concursos (1-{})\n",
        lottery,
        report.total_draws,
        lottery.max_number()
    );
    println!("TOP 10              : {}", numbers_str(&report.top10));
    println!("Mais atrasados      : {}", numbers_str(&report.most_overdue));
    if let (Some(even), Some(odd)) = (report.even_mean, report.odd_mean) {
        println!("Média pares/ímpares : {even:.2} / {odd:.2}");
    }
    println!();

    let mut table = new_table(vec!["Número", "Frequência", "Atraso"]);
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        let number = Cell::new(format!("{:02}", stat.number));
        let number = if report.top10.contains(&stat.number) {
            number.fg(Color::Red)
        } else if report.most_overdue.contains(&stat.number) {
            number.fg(Color::Blue)
        } else {
            number
        };
        table.add_row(vec![
            number,
            Cell::new(stat.frequency),
            Cell::new(stat.gap),
        ]);
    }
    println!("{table}");
}

pub fn display_tickets(lottery: Lottery, tickets: &[Ticket]) {
    println!("\n🎲 Palpites gerados — {}\n", lottery);
    let mut table = new_table(vec!["Jogo", "Dezenas"]);
    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), numbers_str(ticket)]);
    }
    println!("{table}");
}

pub fn display_matches(drawn: &[u8], tickets: &[Ticket], results: &[MatchResult]) {
    println!("\nSorteio: {}\n", numbers_str(drawn));
    let mut table = new_table(vec!["Jogo", "Dezenas", "Acertos"]);
    for (ticket, result) in tickets.iter().zip(results) {
        table.add_row(vec![
            result.jogo.to_string(),
            numbers_str(ticket),
            result.acertos.to_string(),
        ]);
    }
    println!("{table}");
}

fn role_tag(role: MetaRole) -> &'static str {
    match role {
        MetaRole::Contest => "concurso",
        MetaRole::Date => "data",
        MetaRole::Winners => "ganhadores",
    }
}

fn column_tags(roles: &ColumnRoles, idx: usize) -> String {
    let mut tags: Vec<&str> = MetaRole::ALL
        .into_iter()
        .filter(|&role| roles.role(role) == Some(idx))
        .map(role_tag)
        .collect();
    if roles.numbers.contains(&idx) {
        tags.push("dezena");
    }
    if tags.is_empty() {
        "—".to_string()
    } else {
        tags.join(", ")
    }
}

pub fn display_columns(raw: &RawTable, roles: &ColumnRoles) {
    println!("{} linhas, {} colunas\n", raw.len(), raw.columns.len());
    let mut table = new_table(vec!["#", "Coluna", "Papel"]);
    for (idx, label) in raw.columns.iter().enumerate() {
        table.add_row(vec![idx.to_string(), label.clone(), column_tags(roles, idx)]);
    }
    println!("{table}");
}
