// src/common/format.rs

use chrono::{NaiveDate, NaiveDateTime};

pub const MISSING: &str = "N/A";

/// `$` seguido de duas casas decimais, sem separador de milhar.
/// Valores que arredondam para zero saem como `$0.00`, nunca `$-0.00`.
pub fn money(value: f64) -> String {
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    format!("${:.2}", value)
}

/// Soma de valores monetários. Lista vazia dá `0.0` positivo
/// (`Iterator::sum` de `f64` começa em `-0.0`).
pub fn sum_amounts(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, value| acc + value)
}

/// Data curta no formato usado pelo painel (dd/mm/aaaa).
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Linha de data e hora do cabeçalho da planilha.
pub fn masthead_timestamp(at: NaiveDateTime) -> String {
    format!(
        "Fecha: {} | Hora: {}",
        at.format("%d/%m/%Y"),
        at.format("%H:%M:%S")
    )
}

/// Linha "Generado el ..." abaixo do título do PDF.
pub fn generated_line(at: NaiveDateTime) -> String {
    format!(
        "Generado el {} a las {}",
        at.format("%d/%m/%Y"),
        at.format("%H:%M:%S")
    )
}

/// Data ISO usada nos nomes de arquivo.
pub fn file_date(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Corta o texto em `max` caracteres, acrescentando reticências.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
