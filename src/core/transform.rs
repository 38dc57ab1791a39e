use crate::domain::model::{RawRow, RawValue, SalesRecord, TransformResult};
use crate::domain::ports::Logger;
use crate::utils::error::{Result, SyncError};

fn reject(row: &RawRow, reason: impl Into<String>) -> SyncError {
    SyncError::ConversionError {
        row: row.to_string(),
        reason: reason.into(),
    }
}

fn column<'a>(row: &'a RawRow, index: usize, name: &str) -> Result<&'a RawValue> {
    row.get(index)
        .ok_or_else(|| reject(row, format!("missing column {}", name)))
}

fn product_name(row: &RawRow) -> Result<String> {
    Ok(match column(row, 0, "Produto")? {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Int(n) => n.to_string(),
        RawValue::Float(x) => x.to_string(),
        RawValue::Null => return Err(reject(row, "Produto is NULL")),
        RawValue::Binary(_) => return Err(reject(row, "Produto is not valid UTF-8 text")),
    })
}

fn quantity(row: &RawRow) -> Result<i64> {
    let value = match column(row, 1, "Quantidade_Vendida")? {
        RawValue::Int(n) => *n,
        // 與 int() 相同：浮點數直接截斷
        RawValue::Float(x) if x.is_finite() && x.abs() < i64::MAX as f64 => x.trunc() as i64,
        RawValue::Float(x) => return Err(reject(row, format!("quantity {} is not finite", x))),
        RawValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| reject(row, format!("invalid quantity '{}': {}", s, e)))?,
        RawValue::Null => return Err(reject(row, "Quantidade_Vendida is NULL")),
        RawValue::Binary(_) => return Err(reject(row, "Quantidade_Vendida is binary")),
    };

    if value < 0 {
        return Err(reject(row, format!("quantity {} is negative", value)));
    }
    Ok(value)
}

fn total(row: &RawRow) -> Result<f64> {
    let value = match column(row, 2, "Total_Vendas")? {
        RawValue::Int(n) => *n as f64,
        RawValue::Float(x) => *x,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| reject(row, format!("invalid total '{}': {}", s, e)))?,
        RawValue::Null => return Err(reject(row, "Total_Vendas is NULL")),
        RawValue::Binary(_) => return Err(reject(row, "Total_Vendas is binary")),
    };

    // NaN 與無限大無法以 JSON 數字送出
    if !value.is_finite() {
        return Err(reject(row, format!("total {} is not finite", value)));
    }
    Ok(value)
}

/// Coerces one `(product, quantity, total)` row.
pub fn convert_row(row: &RawRow) -> Result<SalesRecord> {
    Ok(SalesRecord {
        product: product_name(row)?,
        quantity_sold: quantity(row)?,
        total_sales: total(row)?,
    })
}

/// Converts every row it can. A row that fails coercion is logged and
/// counted in `rejected`; the rest of the batch still goes through.
pub fn convert_rows(rows: Vec<RawRow>, logger: &dyn Logger) -> TransformResult {
    let mut result = TransformResult::default();

    for row in &rows {
        match convert_row(row) {
            Ok(record) => result.records.push(record),
            Err(e) => {
                logger.error(&e.to_string());
                result.rejected += 1;
            }
        }
    }

    logger.info(&format!(
        "Rows converted. Total records: {} ({} rejected)",
        result.records.len(),
        result.rejected
    ));
    result
}
