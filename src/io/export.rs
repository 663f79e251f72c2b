use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerStore;
use crate::domain::{Bill, TotalCents, UserId, format_cents, total_serde};
use crate::storage::BlobStore;

/// Full ledger snapshot for JSON export. Bill amounts and totals are both
/// written as numbers of units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub bills: Vec<Bill>,
    pub totals: SnapshotTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTotals {
    pub users: Vec<UserTotal>,
    pub categories: Vec<CategoryTotal>,
    #[serde(with = "total_serde")]
    pub grand_total: TotalCents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTotal {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(with = "total_serde")]
    pub total: TotalCents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "total_serde")]
    pub total: TotalCents,
}

/// Exporter for converting ledger data to CSV or JSON
pub struct Exporter<'a, S: BlobStore> {
    store: &'a LedgerStore<S>,
}

impl<'a, S: BlobStore> Exporter<'a, S> {
    pub fn new(store: &'a LedgerStore<S>) -> Self {
        Self { store }
    }

    /// Export bills to CSV in insertion order. Returns the number of rows.
    pub fn export_bills_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "user_id",
            "user_name",
            "amount",
            "date",
            "category",
            "description",
        ])?;

        let mut count = 0;
        for bill in self.store.bills() {
            csv_writer.write_record([
                bill.id.to_string(),
                bill.user_id.to_string(),
                bill.user_name.clone(),
                format_cents(bill.amount),
                bill.date.to_rfc3339(),
                bill.category.clone(),
                bill.description.clone().unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            bills: self.store.bills().to_vec(),
            totals: SnapshotTotals {
                users: self
                    .store
                    .user_totals()
                    .into_iter()
                    .map(|(user, total)| UserTotal {
                        user_id: user.id,
                        user_name: user.name,
                        total,
                    })
                    .collect(),
                categories: self
                    .store
                    .category_totals()
                    .into_iter()
                    .map(|(category, total)| CategoryTotal {
                        category: category.id,
                        total,
                    })
                    .collect(),
                grand_total: self.store.grand_total(),
            },
        }
    }

    /// Export the ledger and its totals as pretty-printed JSON.
    pub fn export_snapshot_json<W: Write>(&self, writer: W) -> Result<usize> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(snapshot.bills.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::User;
    use crate::storage::MemoryBlobStore;

    fn sample_store() -> LedgerStore<MemoryBlobStore> {
        let mut store = LedgerStore::open(MemoryBlobStore::new()).unwrap();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        store
            .add_bill(Some(&User::new(1, "Zohaib")), "50", "food", Some(date), "Lunch, team")
            .unwrap();
        store
            .add_bill(Some(&User::new(2, "Babar")), "7.5", "transport", Some(date), "")
            .unwrap();
        store
    }

    #[test]
    fn test_export_csv() {
        let store = sample_store();
        let mut out = Vec::new();

        let count = Exporter::new(&store).export_bills_csv(&mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,user_id,user_name,amount,date,category,description");
        assert!(lines[1].contains(",1,Zohaib,50.00,"));
        assert!(lines[1].ends_with(",food,\"Lunch, team\""));
        assert!(lines[2].contains(",2,Babar,7.50,"));
    }

    #[test]
    fn test_export_json_snapshot() {
        let store = sample_store();
        let mut out = Vec::new();

        Exporter::new(&store).export_snapshot_json(&mut out).unwrap();
        let snapshot: LedgerSnapshot = serde_json::from_slice(&out).unwrap();

        assert_eq!(snapshot.bills, store.bills());
        assert_eq!(snapshot.totals.grand_total, 5750);
        assert_eq!(snapshot.totals.users.len(), 3);
        assert_eq!(snapshot.totals.users[0].total, 5000);
        assert_eq!(snapshot.totals.categories[1].category, "transport");
        assert_eq!(snapshot.totals.categories[1].total, 750);
    }

    #[test]
    fn test_json_snapshot_uses_units_throughout() {
        let store = sample_store();
        let mut out = Vec::new();

        Exporter::new(&store).export_snapshot_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["bills"][1]["amount"], serde_json::json!(7.5));
        assert_eq!(value["totals"]["grand_total"], serde_json::json!(57.5));
        assert_eq!(value["totals"]["users"][0]["total"], serde_json::json!(50));
        assert_eq!(value["totals"]["categories"][1]["total"], serde_json::json!(7.5));
    }
}
