use crate::shared::core::registry::Collection;
use crate::shared::infrastructure::document_store::DocumentPath;
use chrono::{Local, NaiveDate};

pub const RECORDS_COLLECTION: &str = "records";
pub const CHECKIN_ORDER_FIELD: &str = "checkin_at";

/// Daily partition key, `yyyyMMdd`.
pub fn partition_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// `checkins/{yyyyMMdd}/records`
pub fn daily_records(date: NaiveDate) -> DocumentPath {
    DocumentPath::collection(Collection::Checkins)
        .doc(partition_key(date))
        .sub_collection(RECORDS_COLLECTION)
}
