//! Coverage lookup over the imported tables.

use super::request::CoverageQuery;
use crate::error::Result;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use tracing::debug;

/// Closest dealers first; dealers without a distance go last and equal
/// distances are ordered by dealer code.
const COVERAGE_SQL: &str = "\
SELECT b.name, bt.name, m.slug,
       bd.code, bd.name, bd.address, bd.city, bd.state, bd.zipcode, bd.phone,
       c.distance, c.zipcode
FROM buyer_tier bt
JOIN buyer b ON b.slug = bt.buyer_slug
JOIN buyer_dealer bd ON bd.buyer_slug = b.slug
JOIN buyer_tier_make btm ON btm.buyer_slug = bt.buyer_slug AND btm.tier_slug = bt.slug
JOIN make m ON m.slug = btm.make_slug
JOIN buyer_tier_dealer_coverage c ON c.buyer_tier_slug = bt.slug AND c.dealer_code = bd.code
WHERE bt.slug = ?1 AND btm.make_slug = ?2 AND c.zipcode = ?3
ORDER BY c.distance IS NULL, c.distance, bd.code
LIMIT ?4";

/// One dealer covering the requested zipcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    pub dealer_code: String,
    pub dealer_name: Option<String>,
    pub dealer_address: Option<String>,
    pub dealer_city: Option<String>,
    pub dealer_state: Option<String>,
    pub dealer_zipcode: Option<String>,
    pub dealer_phone: Option<String>,
    pub distance: Option<i64>,
    pub zipcode: String,
    pub make: String,
}

/// Resolver output. `buyer`, `buyer_tier` and `coverage` are only present
/// when at least one dealer matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageResult {
    pub has_coverage: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Vec<CoverageRow>>,
}

impl CoverageResult {
    pub fn none() -> Self {
        CoverageResult {
            has_coverage: false,
            buyer: None,
            buyer_tier: None,
            coverage: None,
        }
    }
}

/// Read-only coverage queries against a borrowed connection.
pub struct CoverageResolver<'a> {
    conn: &'a Connection,
}

impl<'a> CoverageResolver<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        CoverageResolver { conn }
    }

    pub fn resolve(&self, query: &CoverageQuery) -> Result<CoverageResult> {
        let mut stmt = self.conn.prepare_cached(COVERAGE_SQL)?;
        let mut names = None;

        let coverage = stmt
            .query_map(
                params![query.tier_slug, query.make_slug, query.zipcode, query.limit],
                |row| {
                    let buyer: String = row.get(0)?;
                    let tier: String = row.get(1)?;
                    Ok(((buyer, tier), coverage_row(row)?))
                },
            )?
            .map(|row| {
                row.map(|(row_names, coverage)| {
                    names.get_or_insert(row_names);
                    coverage
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            tier = %query.tier_slug,
            make = %query.make_slug,
            zipcode = %query.zipcode,
            dealers = coverage.len(),
            "resolved coverage"
        );

        let Some((buyer, buyer_tier)) = names else {
            return Ok(CoverageResult::none());
        };

        Ok(CoverageResult {
            has_coverage: true,
            buyer: Some(buyer),
            buyer_tier: Some(buyer_tier),
            coverage: Some(coverage),
        })
    }
}

fn coverage_row(row: &Row<'_>) -> rusqlite::Result<CoverageRow> {
    Ok(CoverageRow {
        make: row.get(2)?,
        dealer_code: row.get(3)?,
        dealer_name: row.get(4)?,
        dealer_address: row.get(5)?,
        dealer_city: row.get(6)?,
        dealer_state: row.get(7)?,
        dealer_zipcode: row.get(8)?,
        dealer_phone: row.get(9)?,
        distance: row.get(10)?,
        zipcode: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&SchemaRegistry::new().unwrap().ddl().unwrap()).unwrap();
        conn.execute_batch(
            "INSERT INTO buyer VALUES ('b1', 'Buyer One');
             INSERT INTO buyer_tier VALUES ('b1', 't1', 'Tier One');
             INSERT INTO make VALUES ('honda', 'Honda');
             INSERT INTO buyer_make VALUES ('b1', 'honda');
             INSERT INTO buyer_tier_make VALUES ('b1', 't1', 'honda');
             INSERT INTO buyer_dealer (buyer_slug, code, name, address, city, state, zipcode, phone)
                 VALUES ('b1', 'd1', 'Dealer A', 'St 123', 'New York', 'NY', '10020', '123-4567');
             INSERT INTO buyer_tier_dealer_coverage VALUES ('t1', 'd1', '10010', 10);",
        )
        .unwrap();
        conn
    }

    fn add_dealer(conn: &Connection, code: &str, distance: Option<i64>) {
        conn.execute(
            "INSERT INTO buyer_dealer (buyer_slug, code, name) VALUES ('b1', ?1, ?1)",
            params![code],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO buyer_tier_dealer_coverage VALUES ('t1', ?1, '20020', ?2)",
            params![code, distance],
        )
        .unwrap();
    }

    #[test]
    fn test_resolve_seeded_coverage() {
        let conn = seeded();
        let result = CoverageResolver::new(&conn)
            .resolve(&CoverageQuery::new("t1", "honda", "10010"))
            .unwrap();

        assert!(result.has_coverage);
        assert_eq!(result.buyer.as_deref(), Some("Buyer One"));
        assert_eq!(result.buyer_tier.as_deref(), Some("Tier One"));
        assert_eq!(
            result.coverage.unwrap(),
            vec![CoverageRow {
                dealer_code: "d1".into(),
                dealer_name: Some("Dealer A".into()),
                dealer_address: Some("St 123".into()),
                dealer_city: Some("New York".into()),
                dealer_state: Some("NY".into()),
                dealer_zipcode: Some("10020".into()),
                dealer_phone: Some("123-4567".into()),
                distance: Some(10),
                zipcode: "10010".into(),
                make: "honda".into(),
            }]
        );
    }

    #[test]
    fn test_closest_dealers_first() {
        let conn = seeded();
        add_dealer(&conn, "far", Some(50));
        add_dealer(&conn, "near", Some(10));
        add_dealer(&conn, "mid", Some(30));

        let query = CoverageQuery::new("t1", "honda", "20020").with_limit(2);
        let coverage = CoverageResolver::new(&conn).resolve(&query).unwrap().coverage.unwrap();

        let distances: Vec<Option<i64>> = coverage.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![Some(10), Some(30)]);
    }

    #[test]
    fn test_ties_and_unknown_distances() {
        let conn = seeded();
        add_dealer(&conn, "unknown", None);
        add_dealer(&conn, "zeta", Some(5));
        add_dealer(&conn, "alpha", Some(5));

        let query = CoverageQuery::new("t1", "honda", "20020").with_limit(10);
        let coverage = CoverageResolver::new(&conn).resolve(&query).unwrap().coverage.unwrap();

        let codes: Vec<&str> = coverage.iter().map(|c| c.dealer_code.as_str()).collect();
        assert_eq!(codes, vec!["alpha", "zeta", "unknown"]);
    }

    #[test]
    fn test_no_match() {
        let conn = seeded();
        let resolver = CoverageResolver::new(&conn);

        let result = resolver.resolve(&CoverageQuery::new("unknown-tier", "honda", "10010")).unwrap();
        assert_eq!(result, CoverageResult::none());
        assert_eq!(serde_json::to_value(&result).unwrap(), serde_json::json!({"has_coverage": false}));

        let other_make = resolver.resolve(&CoverageQuery::new("t1", "ford", "10010")).unwrap();
        assert!(!other_make.has_coverage);
    }
}
