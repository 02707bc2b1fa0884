// src/common/fields.rs

//! Resolução defensiva de campos sobre registros sem esquema.
//!
//! O backend devolve o mesmo conceito com nomes diferentes dependendo da
//! versão do DTO (`estadoPedido` ou `estado`, `total` ou `monto`...). Cada
//! conceito é descrito por um [`Field`]: uma lista ordenada de caminhos
//! candidatos. O primeiro candidato presente (não nulo) vence.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

pub const DEFAULT_CATEGORY: &str = "Sin categoría";

/// Um conceito e seus caminhos candidatos, em ordem de prioridade.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    candidates: &'static [&'static [&'static str]],
}

impl Field {
    pub const fn new(name: &'static str, candidates: &'static [&'static [&'static str]]) -> Self {
        Self { name, candidates }
    }

    /// Primeiro valor presente e não nulo entre os candidatos.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|path| lookup(record, path))
            .find(|value| !value.is_null())
    }

    /// `true` apenas para `true`, `1` ou `"1"`. Ausência é `false`.
    pub fn flag(&self, record: &Value) -> bool {
        self.resolve(record).map(is_truthy_flag).unwrap_or(false)
    }

    /// Valor numérico; strings são interpretadas, o resto vira 0.
    pub fn number(&self, record: &Value) -> f64 {
        self.resolve(record).and_then(as_number).unwrap_or(0.0)
    }

    pub fn optional_number(&self, record: &Value) -> Option<f64> {
        self.resolve(record).and_then(as_number)
    }

    pub fn text(&self, record: &Value) -> Option<String> {
        self.resolve(record).and_then(as_text)
    }

    /// Dia local do registro, se a data for interpretável.
    pub fn local_date(&self, record: &Value) -> Option<NaiveDate> {
        self.resolve(record).and_then(parse_local_date)
    }

    /// Identificador usado em contagens distintas. Strings vazias não contam.
    pub fn identifier(&self, record: &Value) -> Option<String> {
        match self.resolve(record)? {
            Value::String(s) if s.trim().is_empty() => None,
            // Mantém o tipo na chave: 7 e "7" são identificadores distintos
            other => Some(other.to_string()),
        }
    }
}

fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |current, key| current.get(*key))
}

pub fn is_truthy_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "1",
        _ => false,
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Nome de algo que pode vir como string, `{nombre}` ou `{name}`.
pub fn display_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("nombre")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Categoria de um produto, com o padrão `Sin categoría`.
pub fn category_name(record: &Value) -> String {
    CATEGORY
        .resolve(record)
        .and_then(display_name)
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Interpreta as datas que o backend costuma devolver e trunca para o dia local.
pub fn parse_local_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        // Epoch em milissegundos
        Value::Number(n) => {
            let millis = n.as_i64()?;
            Local.timestamp_millis_opt(millis).single().map(|dt| dt.date_naive())
        }
        // LocalDate/LocalDateTime serializados pelo Jackson como array
        Value::Array(parts) => {
            let mut numbers = parts.iter().map(Value::as_i64);
            let year = numbers.next()??;
            let month = numbers.next()??;
            let day = numbers.next()??;
            NaiveDate::from_ymd_opt(
                i32::try_from(year).ok()?,
                u32::try_from(month).ok()?,
                u32::try_from(day).ok()?,
            )
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// --- Conceitos conhecidos ---

pub const ACTIVE: Field = Field::new("activo", &[&["activo"]]);

pub const USER_ROLE: Field = Field::new("rol", &[&["rol"]]);

pub const USER_REGISTERED_AT: Field = Field::new(
    "fechaRegistro",
    &[&["fechaRegistro"], &["createdAt"], &["fechaCreacion"]],
);

pub const PRODUCT_STOCK: Field = Field::new("cantidad", &[&["cantidad"], &["stock"]]);

pub const PRODUCT_VENDOR: Field = Field::new(
    "vendedor",
    &[
        &["usuarioId"],
        &["vendedorId"],
        &["usuario", "id"],
        &["vendedor", "id"],
        &["usuarioDocumento"],
        &["vendedor", "documento"],
    ],
);

pub const CATEGORY: Field = Field::new(
    "categoria",
    &[&["categoria"], &["categoriaNombre"], &["category"]],
);

pub const ORDER_STATUS: Field = Field::new("estadoPedido", &[&["estadoPedido"], &["estado"]]);

// `costoFlete` aparece logo depois de `total`: um pedido sem total soma o frete
// como se fosse o valor da venda. Mantido por compatibilidade com o painel.
pub const ORDER_AMOUNT: Field = Field::new(
    "total",
    &[
        &["total"],
        &["costoFlete"],
        &["monto"],
        &["totalPagar"],
        &["montoTotal"],
        &["precioTotal"],
        &["amount"],
    ],
);

pub const ORDER_DATE: Field = Field::new(
    "fechaPedido",
    &[&["fechaPedido"], &["fecha"], &["createdAt"], &["fechaCreacion"]],
);

pub const ORDER_BUYER: Field = Field::new(
    "comprador",
    &[
        &["usuarioId"],
        &["compradorId"],
        &["usuario", "id"],
        &["comprador", "id"],
        &["usuarioDocumento"],
        &["usuario", "documento"],
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_present_candidate_wins() {
        let record = json!({ "total": null, "costoFlete": 12.5, "monto": 99 });
        assert_eq!(ORDER_AMOUNT.number(&record), 12.5);

        let record = json!({ "monto": "40.25" });
        assert_eq!(ORDER_AMOUNT.number(&record), 40.25);

        assert_eq!(ORDER_AMOUNT.number(&json!({})), 0.0);
    }

    #[test]
    fn zero_total_is_present_and_does_not_fall_through() {
        let record = json!({ "total": 0, "costoFlete": 8000 });
        assert_eq!(ORDER_AMOUNT.number(&record), 0.0);
    }

    #[test]
    fn nested_paths_are_followed() {
        let record = json!({ "vendedor": { "documento": "1020" } });
        assert_eq!(PRODUCT_VENDOR.identifier(&record).as_deref(), Some("\"1020\""));

        let record = json!({ "usuario": { "id": 7 } });
        assert_eq!(PRODUCT_VENDOR.identifier(&record).as_deref(), Some("7"));
    }

    #[test]
    fn flags_only_accept_true_one_and_string_one() {
        for truthy in [json!(true), json!(1), json!("1"), json!(1.0)] {
            assert!(is_truthy_flag(&truthy), "{truthy} should be true");
        }
        for falsy in [json!(false), json!(0), json!("0"), json!("true"), json!(2), json!(null)] {
            assert!(!is_truthy_flag(&falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn category_shapes_resolve_to_names() {
        assert_eq!(category_name(&json!({ "categoria": "Frutas" })), "Frutas");
        assert_eq!(category_name(&json!({ "categoria": { "nombre": "Lácteos" } })), "Lácteos");
        assert_eq!(category_name(&json!({ "categoria": { "name": "Granos" } })), "Granos");
        assert_eq!(category_name(&json!({ "categoriaNombre": "Café" })), "Café");
        assert_eq!(category_name(&json!({ "category": { "name": "Miel" } })), "Miel");
        assert_eq!(category_name(&json!({ "categoria": { "id": 3 } })), DEFAULT_CATEGORY);
        assert_eq!(category_name(&json!({})), DEFAULT_CATEGORY);
    }

    #[test]
    fn dates_in_backend_shapes_are_understood() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert_eq!(parse_local_date(&json!("2025-11-30")), Some(expected));
        assert_eq!(parse_local_date(&json!("2025-11-30T10:15:00")), Some(expected));
        assert_eq!(parse_local_date(&json!("2025-11-30T10:15:00.123")), Some(expected));
        assert_eq!(parse_local_date(&json!([2025, 11, 30, 10, 15])), Some(expected));
        assert_eq!(parse_local_date(&json!("ayer")), None);
        assert_eq!(parse_local_date(&json!("")), None);
        assert_eq!(parse_local_date(&json!([2025, 13, 1])), None);
    }

    #[test]
    fn empty_identifiers_are_ignored() {
        assert_eq!(ORDER_BUYER.identifier(&json!({ "usuarioDocumento": "  " })), None);
        assert_eq!(ORDER_BUYER.identifier(&json!({})), None);
    }
}
