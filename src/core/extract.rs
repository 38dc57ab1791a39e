use crate::domain::model::RawRow;
use crate::domain::ports::{Connection, Logger};
use crate::utils::error::Result;

/// Units sold and revenue per product, best sellers first.
pub const SALES_QUERY: &str = "\
SELECT p.nome AS Produto, COUNT(v.cod_venda) AS Quantidade_Vendida, SUM(v.valor_total) AS Total_Vendas \
FROM vendas v \
JOIN produtos p ON v.cod_produto = p.cod \
GROUP BY p.nome \
ORDER BY Total_Vendas DESC";

/// Runs `sql` and fetches every row. An empty `Ok` means the query ran and
/// matched nothing.
pub async fn extract_data(
    connection: &mut dyn Connection,
    sql: &str,
    logger: &dyn Logger,
) -> Result<Vec<RawRow>> {
    logger.debug(&format!("Executing query: {}", sql));
    let rows = connection.fetch_rows(sql).await?;
    logger.info(&format!(
        "Query executed successfully. {} rows extracted.",
        rows.len()
    ));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_query_shape() {
        assert!(SALES_QUERY.contains("AS Produto"));
        assert!(SALES_QUERY.contains("AS Quantidade_Vendida"));
        assert!(SALES_QUERY.contains("AS Total_Vendas"));
        assert!(SALES_QUERY.ends_with("ORDER BY Total_Vendas DESC"));
        // Firebird 不接受結尾的分號
        assert!(!SALES_QUERY.contains(';'));
    }
}
