// Analytical Query Catalog
//
// The fixed set of named aggregations over customers / contracts / claims.
// SQL does the grouping; the typed rows and chart specs are derived from the
// returned QueryTable so the table view and the chart always agree.

use crate::error::{DashboardError, DashboardResult};
use crate::query::{execute_query, CellValue, QueryTable};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

// ============================================================================
// AGE BUCKETS
// ============================================================================

/// Ordered, non-overlapping age buckets. `Unknown` is for NULL ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Under25,
    From25To40,
    From41To60,
    Above60,
    Unknown,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Under25,
        AgeBand::From25To40,
        AgeBand::From41To60,
        AgeBand::Above60,
        AgeBand::Unknown,
    ];

    /// First match wins: <25, 25..=40, 41..=60, everything else
    pub fn from_age(age: Option<i64>) -> Self {
        match age {
            None => AgeBand::Unknown,
            Some(a) if a < 25 => AgeBand::Under25,
            Some(a) if (25..=40).contains(&a) => AgeBand::From25To40,
            Some(a) if (41..=60).contains(&a) => AgeBand::From41To60,
            Some(_) => AgeBand::Above60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under25 => "Under 25",
            AgeBand::From25To40 => "25-40",
            AgeBand::From41To60 => "41-60",
            AgeBand::Above60 => "Above 60",
            AgeBand::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        AgeBand::ALL.into_iter().find(|band| band.label() == label)
    }
}

/// SQL rendering of `AgeBand::from_age`; keep the two in lockstep.
const AGE_GROUP_CASE: &str = "CASE
            WHEN AGE IS NULL THEN 'Unknown'
            WHEN AGE < 25 THEN 'Under 25'
            WHEN AGE BETWEEN 25 AND 40 THEN '25-40'
            WHEN AGE BETWEEN 41 AND 60 THEN '41-60'
            ELSE 'Above 60'
        END";

/// Sort key matching `AgeBand::ALL` order
const AGE_GROUP_ORDER: &str = "CASE AGE_GROUP
            WHEN 'Under 25' THEN 1
            WHEN '25-40' THEN 2
            WHEN '41-60' THEN 3
            WHEN 'Above 60' THEN 4
            ELSE 5
        END";

// ============================================================================
// FRAUD RATE
// ============================================================================

/// Percentage of flagged rows. An empty group is 0.0, never a division error.
pub fn fraud_rate(fraud_count: i64, total_count: i64) -> f64 {
    if total_count <= 0 {
        return 0.0;
    }
    fraud_count as f64 * 100.0 / total_count as f64
}

/// Two-decimal rounding used for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

const FRAUD_COUNT_EXPR: &str = "SUM(CASE WHEN SIU_CUST_YN = 'Y' THEN 1 ELSE 0 END)";

fn fraud_rate_expr(flag_column: &str) -> String {
    format!(
        "CASE WHEN COUNT(*) = 0 THEN 0.0
              ELSE SUM(CASE WHEN {flag} = 'Y' THEN 1 ELSE 0 END) * 100.0 / COUNT(*)
         END",
        flag = flag_column
    )
}

// ============================================================================
// NAMED QUERIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedQuery {
    FraudByGender,
    FraudByAgeGroup,
    FraudByProduct,
    TopClaimants,
}

impl NamedQuery {
    pub const ALL: [NamedQuery; 4] = [
        NamedQuery::FraudByGender,
        NamedQuery::FraudByAgeGroup,
        NamedQuery::FraudByProduct,
        NamedQuery::TopClaimants,
    ];

    /// The analysis menu; Top Claimants is offered as the ad-hoc example instead
    pub const MENU: [NamedQuery; 3] = [
        NamedQuery::FraudByGender,
        NamedQuery::FraudByAgeGroup,
        NamedQuery::FraudByProduct,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            NamedQuery::FraudByGender => "Fraud by Gender",
            NamedQuery::FraudByAgeGroup => "Fraud by Age Group",
            NamedQuery::FraudByProduct => "Fraud by Insurance Products",
            NamedQuery::TopClaimants => "Top Claimants",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            NamedQuery::FraudByGender => "gender",
            NamedQuery::FraudByAgeGroup => "age-group",
            NamedQuery::FraudByProduct => "products",
            NamedQuery::TopClaimants => "top-claimants",
        }
    }

    /// Display name or slug, case-insensitive
    pub fn from_name(name: &str) -> DashboardResult<Self> {
        let wanted = name.trim();
        NamedQuery::ALL
            .into_iter()
            .find(|q| {
                q.display_name().eq_ignore_ascii_case(wanted) || q.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| DashboardError::UnknownQuery(name.to_string()))
    }

    pub fn sql(&self) -> String {
        match self {
            NamedQuery::FraudByGender => format!(
                "SELECT SEX,
                        COUNT(*) AS TOTAL_COUNT,
                        {fraud} AS FRAUD_COUNT,
                        {rate} AS FRAUD_RATE
                 FROM customers
                 GROUP BY SEX
                 ORDER BY SEX",
                fraud = FRAUD_COUNT_EXPR,
                rate = fraud_rate_expr("SIU_CUST_YN"),
            ),
            NamedQuery::FraudByAgeGroup => format!(
                "SELECT {bucket} AS AGE_GROUP,
                        COUNT(*) AS TOTAL_COUNT,
                        {fraud} AS FRAUD_COUNT,
                        {rate} AS FRAUD_RATE
                 FROM customers
                 GROUP BY AGE_GROUP
                 ORDER BY {order}",
                bucket = AGE_GROUP_CASE,
                fraud = FRAUD_COUNT_EXPR,
                rate = fraud_rate_expr("SIU_CUST_YN"),
                order = AGE_GROUP_ORDER,
            ),
            NamedQuery::FraudByProduct => format!(
                "SELECT contracts.GOOD_CLSF_CDNM AS GOOD_CLSF_CDNM,
                        COUNT(*) AS TOTAL_CONTRACTS,
                        SUM(CASE WHEN customers.SIU_CUST_YN = 'Y' THEN 1 ELSE 0 END) AS FRAUD_COUNT,
                        {rate} AS FRAUD_RATE
                 FROM contracts
                 JOIN customers ON contracts.CUST_ID = customers.CUST_ID
                 GROUP BY contracts.GOOD_CLSF_CDNM
                 ORDER BY FRAUD_RATE DESC, GOOD_CLSF_CDNM ASC
                 LIMIT 5",
                rate = fraud_rate_expr("customers.SIU_CUST_YN"),
            ),
            NamedQuery::TopClaimants => TOP_CLAIMANTS_SQL.to_string(),
        }
    }

    pub fn has_chart(&self) -> bool {
        !matches!(self, NamedQuery::TopClaimants)
    }
}

/// Shown verbatim in the ad-hoc tab as the example query
pub const TOP_CLAIMANTS_SQL: &str = "SELECT CUST_ID, COUNT(*) AS TOTAL_CLAIMS
FROM claims
GROUP BY CUST_ID
ORDER BY TOTAL_CLAIMS DESC, CUST_ID ASC
LIMIT 10";

pub fn run_named_query(conn: &Connection, query: NamedQuery) -> DashboardResult<QueryTable> {
    tracing::debug!(query = query.display_name(), "running named query");
    execute_query(conn, &query.sql())
}

// ============================================================================
// TYPED ROWS
// ============================================================================

/// One group of a fraud-rate breakdown; `fraud_rate` is unrounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRateRow {
    pub group: String,
    pub total_count: i64,
    pub fraud_count: i64,
    pub fraud_rate: f64,
}

impl FraudRateRow {
    pub fn display_rate(&self) -> f64 {
        round2(self.fraud_rate)
    }
}

fn cell_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

/// Read the (group, total, fraud, rate) shape shared by the fraud queries
pub fn fraud_rows(table: &QueryTable) -> Vec<FraudRateRow> {
    table
        .rows
        .iter()
        .filter(|row| row.len() >= 4)
        .map(|row| {
            let total_count = row[1].as_i64().unwrap_or(0);
            let fraud_count = row[2].as_i64().unwrap_or(0);
            FraudRateRow {
                group: cell_label(&row[0]),
                total_count,
                fraud_count,
                fraud_rate: row[3]
                    .as_f64()
                    .unwrap_or_else(|| fraud_rate(fraud_count, total_count)),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimantRow {
    pub cust_id: String,
    pub total_claims: i64,
}

pub fn claimant_rows(table: &QueryTable) -> Vec<ClaimantRow> {
    table
        .rows
        .iter()
        .filter(|row| row.len() >= 2)
        .map(|row| ClaimantRow {
            cust_id: cell_label(&row[0]),
            total_claims: row[1].as_i64().unwrap_or(0),
        })
        .collect()
}

pub fn fraud_by_gender(conn: &Connection) -> DashboardResult<Vec<FraudRateRow>> {
    Ok(fraud_rows(&run_named_query(conn, NamedQuery::FraudByGender)?))
}

pub fn fraud_by_age_group(conn: &Connection) -> DashboardResult<Vec<FraudRateRow>> {
    Ok(fraud_rows(&run_named_query(conn, NamedQuery::FraudByAgeGroup)?))
}

pub fn fraud_by_product(conn: &Connection) -> DashboardResult<Vec<FraudRateRow>> {
    Ok(fraud_rows(&run_named_query(conn, NamedQuery::FraudByProduct)?))
}

pub fn top_claimants(conn: &Connection) -> DashboardResult<Vec<ClaimantRow>> {
    Ok(claimant_rows(&run_named_query(conn, NamedQuery::TopClaimants)?))
}

// ============================================================================
// OVERVIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    pub total_customers: i64,
    pub total_policies: i64,
    pub total_claims: i64,
    pub by_gender: Vec<FraudRateRow>,
    pub by_age_group: Vec<FraudRateRow>,
}

pub fn overview(conn: &Connection) -> DashboardResult<OverviewReport> {
    let total_customers: i64 =
        conn.query_row("SELECT COUNT(DISTINCT CUST_ID) FROM customers", [], |r| r.get(0))?;
    let total_policies: i64 =
        conn.query_row("SELECT COUNT(DISTINCT POLY_NO) FROM contracts", [], |r| r.get(0))?;
    let total_claims: i64 = conn.query_row("SELECT COUNT(POLY_NO) FROM claims", [], |r| r.get(0))?;

    Ok(OverviewReport {
        total_customers,
        total_policies,
        total_claims,
        by_gender: fraud_by_gender(conn)?,
        by_age_group: fraud_by_age_group(conn)?,
    })
}

// ============================================================================
// CHARTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<ChartBar>,
}

/// Bar chart for a named query result, or None for Top Claimants.
///
/// Product names are replaced with their rank ("1".."5") on the x axis.
pub fn chart_for(query: NamedQuery, table: &QueryTable) -> Option<ChartSpec> {
    let (title, x_label) = match query {
        NamedQuery::FraudByGender => ("Fraud Rate by Gender", "SEX"),
        NamedQuery::FraudByAgeGroup => ("Fraud Rate by Age Group", "AGE_GROUP"),
        NamedQuery::FraudByProduct => ("Fraud Rate by Insurance Products", "GOOD_CLSF_CDNM"),
        NamedQuery::TopClaimants => return None,
    };

    let bars = fraud_rows(table)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| ChartBar {
            label: if query == NamedQuery::FraudByProduct {
                (idx + 1).to_string()
            } else {
                row.group
            },
            value: row.fraud_rate,
        })
        .collect();

    Some(ChartSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Fraud Rate (%)".to_string(),
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::lock_down;

    fn setup(customers: &[(i64, &str, Option<i64>, &str)]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE customers (CUST_ID INTEGER, SEX TEXT, AGE INTEGER, SIU_CUST_YN TEXT);
             CREATE TABLE contracts (POLY_NO INTEGER, CUST_ID INTEGER, GOOD_CLSF_CDNM TEXT);
             CREATE TABLE claims (POLY_NO INTEGER, CUST_ID INTEGER);",
        )
        .unwrap();
        for (id, sex, age, flag) in customers {
            conn.execute(
                "INSERT INTO customers VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, sex, age, flag],
            )
            .unwrap();
        }
        conn
    }

    fn add_contract(conn: &Connection, poly: i64, cust: i64, product: &str) {
        conn.execute(
            "INSERT INTO contracts VALUES (?1, ?2, ?3)",
            rusqlite::params![poly, cust, product],
        )
        .unwrap();
    }

    fn add_claim(conn: &Connection, poly: i64, cust: i64) {
        conn.execute("INSERT INTO claims VALUES (?1, ?2)", rusqlite::params![poly, cust])
            .unwrap();
    }

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(AgeBand::from_age(Some(24)), AgeBand::Under25);
        assert_eq!(AgeBand::from_age(Some(25)), AgeBand::From25To40);
        assert_eq!(AgeBand::from_age(Some(40)), AgeBand::From25To40);
        assert_eq!(AgeBand::from_age(Some(41)), AgeBand::From41To60);
        assert_eq!(AgeBand::from_age(Some(60)), AgeBand::From41To60);
        assert_eq!(AgeBand::from_age(Some(61)), AgeBand::Above60);
        assert_eq!(AgeBand::from_age(Some(-3)), AgeBand::Under25);
        assert_eq!(AgeBand::from_age(None), AgeBand::Unknown);
        assert_eq!(AgeBand::from_label("41-60"), Some(AgeBand::From41To60));
        assert_eq!(AgeBand::from_label("41 to 60"), None);
    }

    #[test]
    fn test_age_band_partitions_integer_line() {
        for age in -10..=130 {
            let band = AgeBand::from_age(Some(age));
            assert_ne!(band, AgeBand::Unknown);

            let matches = [age < 25, (25..=40).contains(&age), (41..=60).contains(&age), age > 60];
            assert_eq!(matches.iter().filter(|m| **m).count(), 1, "age {}", age);
        }
    }

    #[test]
    fn test_sql_bucketing_agrees_with_age_band() {
        let ages: Vec<Option<i64>> = (0..=100).map(Some).chain(std::iter::once(None)).collect();
        let customers: Vec<(i64, &str, Option<i64>, &str)> = ages
            .iter()
            .enumerate()
            .map(|(i, age)| (i as i64, "M", *age, "N"))
            .collect();
        let conn = setup(&customers);

        for (i, age) in ages.iter().enumerate() {
            let label: String = conn
                .query_row(
                    &format!("SELECT {} FROM customers WHERE CUST_ID = ?1", AGE_GROUP_CASE),
                    [i as i64],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(label, AgeBand::from_age(*age).label(), "age {:?}", age);
        }
    }

    #[test]
    fn test_fraud_rate_empty_group() {
        assert_eq!(fraud_rate(0, 0), 0.0);
        assert_eq!(fraud_rate(1, 2), 50.0);
        assert_eq!(round2(100.0 / 3.0), 33.33);
    }

    #[test]
    fn test_table_cells_and_typed_rows_round_alike() {
        // 1 flagged in 800 is exactly 0.125%
        let customers: Vec<(i64, &str, Option<i64>, &str)> = (1..=800)
            .map(|id| (id, "M", Some(30), if id == 1 { "Y" } else { "N" }))
            .collect();
        let conn = setup(&customers);

        let table = run_named_query(&conn, NamedQuery::FraudByGender).unwrap();
        let rate_idx = table.column_index("FRAUD_RATE").unwrap();
        let rows = fraud_rows(&table);

        assert_eq!(rows[0].display_rate(), 0.13);
        assert_eq!(table.rows[0][rate_idx].to_string(), "0.13");
        assert_eq!(
            table.rows[0][rate_idx].to_string(),
            format!("{:.2}", rows[0].display_rate())
        );
    }

    #[test]
    fn test_fraud_by_gender_example() {
        let conn = setup(&[(1, "M", Some(30), "Y"), (2, "M", Some(50), "N"), (3, "F", Some(20), "N")]);
        let rows = fraud_by_gender(&conn).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "F");
        assert_eq!((rows[0].total_count, rows[0].fraud_count), (1, 0));
        assert_eq!(rows[0].display_rate(), 0.00);
        assert_eq!(rows[1].group, "M");
        assert_eq!((rows[1].total_count, rows[1].fraud_count), (2, 1));
        assert_eq!(rows[1].display_rate(), 50.00);
    }

    #[test]
    fn test_named_query_columns() {
        let conn = setup(&[(1, "M", Some(30), "Y")]);
        let table = run_named_query(&conn, NamedQuery::FraudByGender).unwrap();
        assert_eq!(table.columns, vec!["SEX", "TOTAL_COUNT", "FRAUD_COUNT", "FRAUD_RATE"]);

        let table = run_named_query(&conn, NamedQuery::FraudByProduct).unwrap();
        assert_eq!(
            table.columns,
            vec!["GOOD_CLSF_CDNM", "TOTAL_CONTRACTS", "FRAUD_COUNT", "FRAUD_RATE"]
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_fraud_by_age_group_one_each() {
        let conn = setup(&[
            (1, "M", Some(10), "N"),
            (2, "M", Some(30), "Y"),
            (3, "F", Some(50), "N"),
            (4, "F", Some(70), "Y"),
        ]);
        let rows = fraud_by_age_group(&conn).unwrap();

        let labels: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(labels, vec!["Under 25", "25-40", "41-60", "Above 60"]);
        assert!(rows.iter().all(|r| r.total_count == 1));
    }

    #[test]
    fn test_fraud_by_age_group_omits_empty_buckets_and_keeps_null() {
        let conn = setup(&[(1, "M", Some(33), "Y"), (2, "F", None, "N")]);
        let rows = fraud_by_age_group(&conn).unwrap();

        let labels: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(labels, vec!["25-40", "Unknown"]);
    }

    #[test]
    fn test_fraud_counts_and_rates_in_range() {
        let customers: Vec<(i64, &str, Option<i64>, &str)> = (0..50)
            .map(|i| {
                (
                    i,
                    if i % 3 == 0 { "F" } else { "M" },
                    Some(18 + i),
                    if i % 4 == 0 { "Y" } else { "N" },
                )
            })
            .collect();
        let conn = setup(&customers);

        for rows in [fraud_by_gender(&conn).unwrap(), fraud_by_age_group(&conn).unwrap()] {
            assert_eq!(rows.iter().map(|r| r.total_count).sum::<i64>(), 50);
            for row in rows {
                assert!(row.fraud_count <= row.total_count);
                assert!((0.0..=100.0).contains(&row.fraud_rate));
            }
        }
    }

    #[test]
    fn test_fraud_by_product_top5_sorted_with_tiebreak() {
        let conn = setup(&[(1, "M", Some(30), "Y"), (2, "F", Some(45), "N")]);
        // Two 100% products, tie broken by name; one 50%; four 0%
        add_contract(&conn, 1, 1, "Zeta");
        add_contract(&conn, 2, 1, "Alpha");
        add_contract(&conn, 3, 1, "Mixed");
        add_contract(&conn, 4, 2, "Mixed");
        for (i, name) in ["Annuity", "Child", "Education", "Term"].iter().enumerate() {
            add_contract(&conn, 10 + i as i64, 2, name);
        }

        let rows = fraud_by_product(&conn).unwrap();
        assert_eq!(rows.len(), 5);
        let names: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta", "Mixed", "Annuity", "Child"]);
        assert_eq!(rows[2].total_count, 2);
        assert_eq!(rows[2].fraud_rate, 50.0);
        assert!(rows.windows(2).all(|w| w[0].fraud_rate >= w[1].fraud_rate));
    }

    #[test]
    fn test_fraud_by_product_drops_unknown_customers() {
        let conn = setup(&[(1, "M", Some(30), "N")]);
        add_contract(&conn, 1, 1, "Term");
        add_contract(&conn, 2, 99, "Term");
        add_contract(&conn, 3, 98, "Orphan");

        let rows = fraud_by_product(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group, "Term");
        assert_eq!(rows[0].total_count, 1);
    }

    #[test]
    fn test_top_claimants_limit_and_order() {
        let conn = setup(&[]);
        let mut poly = 0;
        for cust in 1..=12 {
            for _ in 0..cust {
                poly += 1;
                add_claim(&conn, poly, cust);
            }
        }
        add_claim(&conn, 500, 100);
        add_claim(&conn, 501, 100);

        let rows = top_claimants(&conn).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], ClaimantRow { cust_id: "12".to_string(), total_claims: 12 });
        assert!(rows.windows(2).all(|w| w[0].total_claims >= w[1].total_claims));
    }

    #[test]
    fn test_overview_counts() {
        let conn = setup(&[(1, "M", Some(30), "Y"), (2, "F", Some(20), "N")]);
        add_contract(&conn, 1, 1, "Term");
        add_contract(&conn, 1, 1, "Term");
        add_contract(&conn, 2, 2, "Annuity");
        add_claim(&conn, 1, 1);
        add_claim(&conn, 1, 1);
        conn.execute("INSERT INTO claims VALUES (NULL, 2)", []).unwrap();
        lock_down(&conn).unwrap();

        let report = overview(&conn).unwrap();
        assert_eq!(report.total_customers, 2);
        assert_eq!(report.total_policies, 2);
        assert_eq!(report.total_claims, 2);
        assert_eq!(report.by_gender.len(), 2);
        assert_eq!(report.by_age_group.len(), 2);
    }

    #[test]
    fn test_product_chart_uses_rank_labels() {
        let conn = setup(&[(1, "M", Some(30), "Y"), (2, "F", Some(45), "N")]);
        add_contract(&conn, 1, 1, "Term");
        add_contract(&conn, 2, 2, "Annuity");
        add_contract(&conn, 3, 2, "Savings");

        let table = run_named_query(&conn, NamedQuery::FraudByProduct).unwrap();
        let chart = chart_for(NamedQuery::FraudByProduct, &table).unwrap();
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
        assert_eq!(chart.bars[0].value, 100.0);
        assert_eq!(chart.y_label, "Fraud Rate (%)");
    }

    #[test]
    fn test_gender_chart_keeps_group_labels() {
        let conn = setup(&[(1, "M", Some(30), "Y"), (3, "F", Some(20), "N")]);
        let table = run_named_query(&conn, NamedQuery::FraudByGender).unwrap();
        let chart = chart_for(NamedQuery::FraudByGender, &table).unwrap();
        assert_eq!(chart.bars[0].label, "F");
        assert_eq!(chart.bars[1].label, "M");
        assert!(chart_for(NamedQuery::TopClaimants, &table).is_none());
    }

    #[test]
    fn test_named_query_lookup() {
        assert_eq!(NamedQuery::from_name("fraud by gender").unwrap(), NamedQuery::FraudByGender);
        assert_eq!(NamedQuery::from_name(" products ").unwrap(), NamedQuery::FraudByProduct);
        assert_eq!(NamedQuery::from_name("Top Claimants").unwrap(), NamedQuery::TopClaimants);
        assert!(matches!(
            NamedQuery::from_name("Fraud by Region"),
            Err(DashboardError::UnknownQuery(_))
        ));
    }
}
